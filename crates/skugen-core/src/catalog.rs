use std::str::FromStr;

use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CatalogError, Result};

/// Catalog document as stored on disk: a JSON array of attributes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct CatalogDocument(pub Vec<RawAttribute>);

/// Attribute exactly as it appears in a catalog document.
///
/// Prices and values are kept as raw JSON until [`Catalog::from_raw`]
/// normalizes them, so that numeric and string-encoded prices can share one
/// layout.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RawAttribute {
    /// Display name of the attribute (e.g. `Size`).
    pub name: String,
    /// Disabled attributes never take part in enumeration.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Every emitted combination must carry one of this attribute's values.
    #[serde(default)]
    pub required: bool,
    /// Offered values; absence is a catalog error, an empty list is not.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<RawValueEntry>>,
}

/// Value entry exactly as it appears in a catalog document.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RawValueEntry {
    /// Value code; strings are kept verbatim, numbers use their JSON text.
    pub value: Value,
    /// Surcharge as a JSON number or a numeric string. Missing means zero.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Value>,
}

fn default_enabled() -> bool {
    true
}

/// A single offered value with its surcharge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueEntry {
    pub value: String,
    pub price: Decimal,
}

impl ValueEntry {
    pub fn new(value: impl Into<String>, price: Decimal) -> Self {
        Self {
            value: value.into(),
            price,
        }
    }
}

/// Normalized attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub enabled: bool,
    pub required: bool,
    pub values: Vec<ValueEntry>,
}

impl Attribute {
    /// Enabled, optional attribute with the given values.
    pub fn new(name: impl Into<String>, values: Vec<ValueEntry>) -> Self {
        Self {
            name: name.into(),
            enabled: true,
            required: false,
            values,
        }
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Value codes in declaration order.
    pub fn value_codes(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|entry| entry.value.as_str())
    }
}

/// Ordered value codes of one enabled attribute.
///
/// `position` is the index of the source attribute in the catalog and is the
/// identity used to relate required sets to sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSet {
    pub position: usize,
    pub name: String,
    pub values: Vec<String>,
}

impl AttributeSet {
    pub fn new<I, S>(position: usize, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            position,
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Exact string membership.
    pub fn contains(&self, value: &str) -> bool {
        self.values.iter().any(|candidate| candidate == value)
    }
}

/// Projections of a catalog used by the enumerator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DerivedSets {
    /// Enabled, non-empty attributes in catalog order.
    pub sets: Vec<AttributeSet>,
    /// The subset of `sets` whose attribute is required, in the same order.
    pub required_sets: Vec<AttributeSet>,
}

impl DerivedSets {
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}

/// Immutable attribute catalog for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    attributes: Vec<Attribute>,
}

impl Catalog {
    pub fn new(attributes: Vec<Attribute>) -> Self {
        Self { attributes }
    }

    /// Parse a catalog document and normalize it.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let document: CatalogDocument = serde_json::from_str(json)?;
        Self::from_raw(document.0)
    }

    /// Normalize raw attributes.
    ///
    /// Fails on the first malformed entry; no partially normalized catalog is
    /// ever returned.
    pub fn from_raw(raw: Vec<RawAttribute>) -> Result<Self> {
        let mut attributes = Vec::with_capacity(raw.len());
        for attribute in raw {
            let entries = attribute
                .values
                .ok_or_else(|| CatalogError::MissingValues {
                    attribute: attribute.name.clone(),
                })?;

            let mut values = Vec::with_capacity(entries.len());
            for entry in entries {
                let value = value_text(&attribute.name, &entry.value)?;
                let price = match entry.price {
                    None | Some(Value::Null) => Decimal::ZERO,
                    Some(raw_price) => parse_price(&raw_price).ok_or_else(|| {
                        CatalogError::InvalidPrice {
                            attribute: attribute.name.clone(),
                            value: value.clone(),
                            raw: raw_price.to_string(),
                        }
                    })?,
                };
                values.push(ValueEntry { value, price });
            }

            attributes.push(Attribute {
                name: attribute.name,
                enabled: attribute.enabled,
                required: attribute.required,
                values,
            });
        }

        Ok(Self { attributes })
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Split the catalog into enumerable sets and required sets.
    ///
    /// Disabled attributes and attributes without values are skipped. Order
    /// follows the catalog, which in turn fixes the SKU layout.
    pub fn derive_sets(&self) -> DerivedSets {
        let mut derived = DerivedSets::default();
        for (position, attribute) in self.attributes.iter().enumerate() {
            if !attribute.enabled || attribute.values.is_empty() {
                continue;
            }

            let set = AttributeSet::new(position, attribute.name.clone(), attribute.value_codes());
            if attribute.required {
                derived.required_sets.push(set.clone());
            }
            derived.sets.push(set);
        }
        derived
    }
}

fn value_text(attribute: &str, value: &Value) -> Result<String> {
    match value {
        Value::String(text) => Ok(text.clone()),
        Value::Number(number) => Ok(number.to_string()),
        other => Err(CatalogError::InvalidValue {
            attribute: attribute.to_string(),
            raw: other.to_string(),
        }),
    }
}

fn parse_price(raw: &Value) -> Option<Decimal> {
    match raw {
        Value::Number(number) => parse_decimal(&number.to_string()),
        Value::String(text) => parse_decimal(text.trim()),
        _ => None,
    }
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    if text.is_empty() {
        return None;
    }
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(value: &str, price: i64) -> ValueEntry {
        ValueEntry::new(value, Decimal::from(price))
    }

    #[test]
    fn parse_decimal_accepts_integer_fraction_and_exponent() {
        assert_eq!(parse_decimal("1320"), Some(Decimal::from(1320)));
        assert_eq!(parse_decimal("12.50"), Decimal::from_str("12.5").ok());
        assert_eq!(parse_decimal("1e3"), Some(Decimal::from(1000)));
        assert_eq!(parse_decimal(""), None);
        assert_eq!(parse_decimal("abc"), None);
    }

    #[test]
    fn derive_sets_skips_disabled_and_empty_attributes() {
        let catalog = Catalog::new(vec![
            Attribute::new("Size", vec![entry("XS", 0), entry("SM", 0)]),
            Attribute::new("Hidden", vec![entry("H1", 5)]).with_enabled(false),
            Attribute::new("Empty", Vec::new()).with_required(true),
            Attribute::new("Color", vec![entry("red", 1)]).with_required(true),
        ]);

        let derived = catalog.derive_sets();

        let names: Vec<&str> = derived.sets.iter().map(|set| set.name.as_str()).collect();
        assert_eq!(names, vec!["Size", "Color"]);
        assert_eq!(derived.required_sets.len(), 1);
        assert_eq!(derived.required_sets[0].position, 3);
        assert_eq!(derived.required_sets[0].values, vec!["red".to_string()]);
    }

    #[test]
    fn required_sets_keep_attribute_identity() {
        let catalog = Catalog::new(vec![
            Attribute::new("Front", vec![entry("A", 0)]),
            Attribute::new("Back", vec![entry("A", 0)]).with_required(true),
        ]);

        let derived = catalog.derive_sets();

        assert_eq!(derived.sets[0].values, derived.sets[1].values);
        assert_eq!(derived.required_sets[0].position, derived.sets[1].position);
        assert_ne!(derived.required_sets[0].position, derived.sets[0].position);
    }

    #[test]
    fn disabled_required_attribute_is_not_required() {
        let catalog = Catalog::new(vec![
            Attribute::new("Color", vec![entry("red", 0)])
                .with_required(true)
                .with_enabled(false),
        ]);

        let derived = catalog.derive_sets();

        assert!(derived.is_empty());
        assert!(derived.required_sets.is_empty());
    }
}
