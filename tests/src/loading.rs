#![cfg(test)]
use tagscope_common::config::LoaderConfig;
use tagscope_core::loader::{self, LoadError};

use crate::common::{fixture, nested, shop_models};

#[test]
fn import_path_comes_from_go_mod() {
    let pkg = shop_models(false);
    assert_eq!(pkg.path(), "example.com/shop/models");
    assert_eq!(pkg.name(), "models");
}

#[test]
fn only_top_level_type_declarations_are_recorded() {
    let pkg = shop_models(false);
    let mut names: Vec<&str> = pkg.declarations().map(|d| d.name.as_str()).collect();
    names.sort();

    assert_eq!(
        names,
        vec![
            "Address",
            "Geo",
            "Order",
            "OrderLine",
            "Status",
            "User",
            "UserID",
            "UserRef",
            "Users",
        ]
    );
}

#[test]
fn test_files_are_opt_in_and_external_tests_are_skipped() {
    assert!(shop_models(false).declaration("fixtureUser").is_none());

    let pkg = shop_models(true);
    assert!(pkg.declaration("fixtureUser").is_some());
    assert!(pkg.declaration("External").is_none());
}

#[test]
fn explicit_package_path_wins() {
    let pkg = nested();
    assert_eq!(pkg.path(), "example.com/nested");
    assert_eq!(pkg.len(), 4);
}

#[test]
fn directory_without_go_files_is_rejected() {
    let err = loader::load_package(&fixture("docs"), &LoaderConfig::default()).unwrap_err();
    assert!(
        matches!(err.downcast_ref::<LoadError>(), Some(LoadError::NoGoFiles(_))),
        "{err:#}"
    );
}

#[test]
fn file_is_not_a_package_directory() {
    let err = loader::load_package(&fixture("nested/nested.go"), &LoaderConfig::default())
        .unwrap_err();
    assert!(
        matches!(err.downcast_ref::<LoadError>(), Some(LoadError::NotADirectory(_))),
        "{err:#}"
    );
}

#[test]
fn syntax_errors_name_the_file_and_position() {
    let err = loader::load_package(&fixture("broken"), &LoaderConfig::default()).unwrap_err();
    let message = format!("{err:#}");

    assert!(message.contains("broken.go"), "{message}");
    assert!(message.contains("4:14: raw string literal not terminated"), "{message}");
}

#[test]
fn build_ignored_generator_does_not_replace_the_package() {
    let cfg = LoaderConfig {
        package_path: Some("example.com/models".into()),
        include_tests: false,
    };
    let pkg = loader::load_package(&fixture("generated"), &cfg).unwrap();

    assert_eq!(pkg.name(), "models");
    assert!(pkg.declaration("User").is_some());
    assert!(pkg.declaration("Gen").is_none());
    assert_eq!(
        tagscope_core::structs::enumerate_structs(&pkg),
        vec!["example.com/models.User"]
    );
}
