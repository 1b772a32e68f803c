#![cfg(test)]
use rstest::rstest;
use tagscope_common::config::TagsConfig;
use tagscope_common::error::AnalysisError;
use tagscope_core::tags::extract_tags;

use crate::common::{nested, shop_models};

fn run(target: &str, key: &str) -> Result<Vec<String>, AnalysisError> {
    let pkg = shop_models(false);
    extract_tags(&pkg, &TagsConfig::new(target, key, None).unwrap())
}

#[test]
fn nested_paths_come_before_their_field() {
    let pkg = nested();
    let cfg = TagsConfig::new("example.com/nested.Outer", "k", None).unwrap();
    assert_eq!(extract_tags(&pkg, &cfg).unwrap(), vec!["`x`.`y`", "`x`", "`z`"]);
}

#[test]
fn pointer_fields_and_deep_nesting() {
    let lines = run("example.com/shop/models.User", "json").unwrap();
    assert_eq!(
        lines,
        vec![
            "`id`",
            "`name`",
            "`address`.`street`",
            "`address`.`city`",
            "`address`.`geo`.`lat`",
            "`address`.`geo`.`lng`",
            "`address`.`geo`",
            "`address`",
            "`created_at`",
        ]
    );
}

#[test]
fn ignored_field_is_not_descended() {
    let lines = run("example.com/shop/models.User", "db").unwrap();
    assert_eq!(lines, vec!["`id`", "`name`", "`password_hash`"]);
}

#[test]
fn alias_fields_and_anonymous_structs() {
    let lines = run("example.com/shop/models.Order", "json").unwrap();
    assert_eq!(
        lines,
        vec![
            "`id`",
            "`buyer`.`id`",
            "`buyer`.`name`",
            "`buyer`.`address`.`street`",
            "`buyer`.`address`.`city`",
            "`buyer`.`address`.`geo`.`lat`",
            "`buyer`.`address`.`geo`.`lng`",
            "`buyer`.`address`.`geo`",
            "`buyer`.`address`",
            "`buyer`.`created_at`",
            "`buyer`",
            "`lines`",
            "`meta`.`source`",
            "`meta`",
        ]
    );
}

#[test]
fn empty_struct_has_no_lines() {
    let pkg = nested();
    let cfg = TagsConfig::new("example.com/nested.Empty", "k", None).unwrap();
    assert!(extract_tags(&pkg, &cfg).unwrap().is_empty());
}

#[rstest]
#[case("example.com/other.User")]
#[case("example.com/shop/models/sub.User")]
#[case("example.com/shop/models.sub/x.User")]
#[case("User")]
fn foreign_targets_yield_nothing(#[case] target: &str) {
    assert!(run(target, "json").unwrap().is_empty());
}

#[test]
fn missing_struct_is_reported() {
    let err = run("example.com/shop/models.Invoice", "json").unwrap_err();
    assert_eq!(
        err.to_string(),
        "struct Invoice not found in package example.com/shop/models"
    );
}

#[rstest]
#[case("example.com/shop/models.Users", "this type is not a struct: example.com/shop/models.Users")]
#[case("example.com/shop/models.Status", "this type is not a struct: example.com/shop/models.Status")]
fn non_struct_targets_are_reported(#[case] target: &str, #[case] message: &str) {
    let err = run(target, "json").unwrap_err();
    assert!(matches!(err, AnalysisError::NotAStruct { .. }));
    assert_eq!(err.to_string(), message);
}

#[test]
fn self_referencing_struct_fails_cleanly() {
    let pkg = nested();
    let cfg = TagsConfig::new("example.com/nested.Node", "k", None).unwrap();
    let err = extract_tags(&pkg, &cfg).unwrap_err();
    assert_eq!(
        err.to_string(),
        "cyclic struct nesting: example.com/nested.Node -> Next"
    );
}
