use schemars::schema_for;
use skugen_core::CatalogDocument;

fn main() {
    let schema = schema_for!(CatalogDocument);
    let json = serde_json::to_string_pretty(&schema).expect("serialize json schema");
    println!("{json}");
}
