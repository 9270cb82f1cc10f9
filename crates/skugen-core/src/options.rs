use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How a VAT or discount amount is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentKind {
    /// `amount` is a rate in percent of the amount it applies to.
    #[default]
    Percentage,
    /// `amount` is added or subtracted as-is.
    Fixed,
}

/// SKU layout and pricing policy for a run.
///
/// Keys are snake_case; the camelCase names used by legacy option files are
/// accepted as aliases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingOptions {
    /// Leading SKU segment.
    #[serde(alias = "prefixName")]
    pub prefix_name: String,
    /// Joins the prefix and every value.
    pub separator: String,
    /// Attach a price breakdown to each record.
    pub price: bool,
    #[serde(alias = "basePrice")]
    pub base_price: Decimal,
    pub vat: bool,
    #[serde(alias = "vatType")]
    pub vat_type: AdjustmentKind,
    #[serde(alias = "vatAmount")]
    pub vat_amount: Decimal,
    pub discount: bool,
    #[serde(alias = "discountType")]
    pub discount_type: AdjustmentKind,
    #[serde(alias = "discountAmount")]
    pub discount_amount: Decimal,
    /// Upper-case the SKU when set, lower-case it otherwise.
    pub uppercase: bool,
}

impl Default for PricingOptions {
    fn default() -> Self {
        Self {
            prefix_name: "Test".to_string(),
            separator: "-".to_string(),
            price: true,
            base_price: Decimal::ZERO,
            vat: true,
            vat_type: AdjustmentKind::Percentage,
            vat_amount: Decimal::from(50),
            discount: false,
            discount_type: AdjustmentKind::Percentage,
            discount_amount: Decimal::from(10),
            uppercase: true,
        }
    }
}
