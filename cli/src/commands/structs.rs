use std::path::Path;

use tracing::info_span;

use crate::terminal::print;
use tagscope_common::config::LoaderConfig;
use tagscope_core::{loader, structs::enumerate_structs};

pub fn structs(dir: &Path, cfg: &LoaderConfig) -> anyhow::Result<()> {
    let span = info_span!("structs", dir = %dir.display());
    let _guard = span.enter();

    let pkg = loader::load_package(dir, cfg)?;
    let names: Vec<String> = enumerate_structs(&pkg);

    print::lines(&names)
}
