use schemars::schema_for;
use skugen_core::CatalogDocument;

fn generated() -> serde_json::Value {
    serde_json::to_value(schema_for!(CatalogDocument)).expect("serialize generated schema")
}

#[test]
fn json_schema_is_deterministic() {
    assert_eq!(generated(), generated());
}

#[test]
fn json_schema_describes_attribute_array() {
    let schema = generated();

    assert_eq!(schema.get("type"), Some(&serde_json::json!("array")));

    let attribute = schema
        .pointer("/definitions/RawAttribute")
        .expect("RawAttribute definition");
    let properties = attribute
        .get("properties")
        .and_then(|value| value.as_object())
        .expect("attribute properties");
    for key in ["name", "enabled", "required", "values"] {
        assert!(properties.contains_key(key), "missing property {key}");
    }

    let required = attribute
        .get("required")
        .and_then(|value| value.as_array())
        .expect("required list");
    assert!(required.contains(&serde_json::json!("name")));
    assert!(!required.contains(&serde_json::json!("values")));

    assert!(schema.pointer("/definitions/RawValueEntry").is_some());
}
