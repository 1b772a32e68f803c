#![cfg(test)]
use tagscope_core::structs::enumerate_structs;

use crate::common::{nested, shop_models};

#[test]
fn lists_struct_declarations_sorted() {
    let pkg = shop_models(false);
    assert_eq!(
        enumerate_structs(&pkg),
        vec![
            "example.com/shop/models.Address",
            "example.com/shop/models.Geo",
            "example.com/shop/models.Order",
            "example.com/shop/models.OrderLine",
            "example.com/shop/models.User",
            "example.com/shop/models.UserRef",
        ]
    );
}

#[test]
fn test_only_structs_sort_after_exported_ones() {
    let names = enumerate_structs(&shop_models(true));
    assert_eq!(names.last().map(String::as_str), Some("example.com/shop/models.fixtureUser"));
    assert_eq!(names.len(), 7);
}

#[test]
fn output_is_stable_across_runs_and_loads() {
    let first = enumerate_structs(&nested());
    let second = enumerate_structs(&nested());

    assert_eq!(first, second);
    assert!(first.windows(2).all(|pair| pair[0] <= pair[1]));
    assert_eq!(
        first,
        vec![
            "example.com/nested.Empty",
            "example.com/nested.Inner",
            "example.com/nested.Node",
            "example.com/nested.Outer",
        ]
    );
}
