use std::path::PathBuf;

use tagscope_common::config::LoaderConfig;
use tagscope_common::model::Package;
use tagscope_core::loader;

pub fn fixture(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(relative)
}

/// Loads `fixtures/shop/models`, whose import path comes from `fixtures/shop/go.mod`.
pub fn shop_models(include_tests: bool) -> Package {
    let cfg = LoaderConfig {
        package_path: None,
        include_tests,
    };
    loader::load_package(&fixture("shop/models"), &cfg).unwrap()
}

pub fn nested() -> Package {
    let cfg = LoaderConfig {
        package_path: Some("example.com/nested".into()),
        include_tests: false,
    };
    loader::load_package(&fixture("nested"), &cfg).unwrap()
}
