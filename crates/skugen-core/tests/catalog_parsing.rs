use std::str::FromStr;

use rust_decimal::Decimal;
use skugen_core::{Catalog, CatalogError};

const LEGACY_CATALOG: &str = r#"[
  {
    "name": "Size",
    "enabled": true,
    "required": true,
    "values": [
      { "value": "3030", "price": "1320" },
      { "value": "3036", "price": "1320.50" }
    ],
    "edit": 0
  },
  {
    "name": "Color",
    "enabled": true,
    "required": false,
    "values": [
      { "value": "Raw", "price": 0 },
      { "value": "AMW", "price": 300 },
      { "value": "PRM", "price": 99.95 }
    ],
    "edit": 0
  },
  {
    "name": "Depth",
    "values": [
      { "value": 18 },
      { "value": "ID19", "price": null }
    ]
  }
]"#;

#[test]
fn parses_mixed_numeric_and_string_prices() {
    let catalog = Catalog::from_json_str(LEGACY_CATALOG).expect("parse catalog");

    let size = &catalog.attributes()[0];
    assert_eq!(size.values[0].price, Decimal::from(1320));
    assert_eq!(
        size.values[1].price,
        Decimal::from_str("1320.5").expect("decimal")
    );

    let color = &catalog.attributes()[1];
    assert_eq!(color.values[0].price, Decimal::ZERO);
    assert_eq!(color.values[1].price, Decimal::from(300));
    assert_eq!(
        color.values[2].price,
        Decimal::from_str("99.95").expect("decimal")
    );
}

#[test]
fn defaults_flags_and_missing_prices() {
    let catalog = Catalog::from_json_str(LEGACY_CATALOG).expect("parse catalog");

    let depth = &catalog.attributes()[2];
    assert!(depth.enabled);
    assert!(!depth.required);
    assert_eq!(depth.values[0].value, "18");
    assert_eq!(depth.values[0].price, Decimal::ZERO);
    assert_eq!(depth.values[1].price, Decimal::ZERO);
}

#[test]
fn derived_sets_follow_catalog_order() {
    let catalog = Catalog::from_json_str(LEGACY_CATALOG).expect("parse catalog");
    let derived = catalog.derive_sets();

    let names: Vec<&str> = derived.sets.iter().map(|set| set.name.as_str()).collect();
    assert_eq!(names, vec!["Size", "Color", "Depth"]);
    assert_eq!(derived.required_sets.len(), 1);
    assert_eq!(derived.required_sets[0].name, "Size");
    assert_eq!(derived.sets[2].values, vec!["18", "ID19"]);
}

#[test]
fn rejects_unparsable_price() {
    let json = r#"[{ "name": "Size", "values": [{ "value": "XS", "price": "cheap" }] }]"#;

    let err = Catalog::from_json_str(json).expect_err("invalid price");

    match err {
        CatalogError::InvalidPrice {
            attribute,
            value,
            raw,
        } => {
            assert_eq!(attribute, "Size");
            assert_eq!(value, "XS");
            assert_eq!(raw, "\"cheap\"");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn rejects_boolean_price() {
    let json = r#"[{ "name": "Size", "values": [{ "value": "XS", "price": true }] }]"#;

    let err = Catalog::from_json_str(json).expect_err("invalid price");
    assert!(matches!(err, CatalogError::InvalidPrice { .. }));
}

#[test]
fn rejects_missing_values() {
    let json = r#"[
      { "name": "Size", "values": [{ "value": "XS", "price": 1 }] },
      { "name": "Color", "enabled": true }
    ]"#;

    let err = Catalog::from_json_str(json).expect_err("missing values");
    assert!(matches!(err, CatalogError::MissingValues { ref attribute } if attribute == "Color"));
}

#[test]
fn rejects_structured_value() {
    let json = r#"[{ "name": "Size", "values": [{ "value": { "code": "XS" } }] }]"#;

    let err = Catalog::from_json_str(json).expect_err("invalid value");
    assert!(matches!(err, CatalogError::InvalidValue { .. }));
}

#[test]
fn empty_value_list_is_not_an_error() {
    let json = r#"[{ "name": "Size", "required": true, "values": [] }]"#;

    let catalog = Catalog::from_json_str(json).expect("parse catalog");
    let derived = catalog.derive_sets();

    assert_eq!(catalog.len(), 1);
    assert!(derived.sets.is_empty());
    assert!(derived.required_sets.is_empty());
}

#[test]
fn rejects_malformed_json() {
    let err = Catalog::from_json_str("{ not json").expect_err("malformed json");
    assert!(matches!(err, CatalogError::Json(_)));
}
