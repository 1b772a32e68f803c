use std::path::Path;

use anyhow::Context;
use tracing::info_span;

use crate::terminal::print;
use tagscope_common::config::{LoaderConfig, TagsConfig};
use tagscope_core::{loader, tags::extract_tags};

pub fn tags(dir: &Path, cfg: &LoaderConfig, tags_cfg: &TagsConfig) -> anyhow::Result<()> {
    let span = info_span!("tags", dir = %dir.display(), key = %tags_cfg.key);
    let _guard = span.enter();

    let pkg = loader::load_package(dir, cfg)?;
    let lines: Vec<String> = extract_tags(&pkg, tags_cfg)
        .with_context(|| format!("extracting {:?} tags of {}", tags_cfg.key, tags_cfg.target))?;

    // Nothing is printed unless the whole walk succeeded.
    print::lines(&lines)
}
