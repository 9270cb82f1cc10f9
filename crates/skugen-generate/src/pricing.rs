use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use skugen_core::{AdjustmentKind, Catalog, PricingOptions};
use thiserror::Error;

use crate::enumerate::Combination;

/// Price of one combination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub vat: Decimal,
    pub total_price: Decimal,
}

/// Raised when a price step leaves the range of [`Decimal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("price arithmetic overflowed while computing {step}")]
pub struct PriceOverflow {
    pub step: &'static str,
}

/// Price a combination by scanning the catalog.
///
/// Each value adds the price of the first entry with the same code, looked up
/// in attribute-then-value order across the whole catalog. Unknown values add
/// nothing.
pub fn price(
    combination: &Combination<'_>,
    catalog: &Catalog,
    options: &PricingOptions,
) -> Result<PriceBreakdown, PriceOverflow> {
    let surcharges = combination.values().iter().filter_map(|value| {
        catalog
            .attributes()
            .iter()
            .flat_map(|attribute| attribute.values.iter())
            .find(|entry| entry.value == *value)
            .map(|entry| entry.price)
    });

    breakdown(subtotal(options.base_price, surcharges)?, options)
}

/// First-match price lookup built once per run.
///
/// Gives the same result as [`price`] without rescanning the catalog for
/// every value.
#[derive(Debug, Clone, Default)]
pub struct PriceBook<'a> {
    prices: HashMap<&'a str, Decimal>,
}

impl<'a> PriceBook<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        let mut prices = HashMap::new();
        for attribute in catalog.attributes() {
            for entry in &attribute.values {
                prices.entry(entry.value.as_str()).or_insert(entry.price);
            }
        }
        Self { prices }
    }

    pub fn surcharge(&self, value: &str) -> Option<Decimal> {
        self.prices.get(value).copied()
    }

    pub fn price(
        &self,
        combination: &Combination<'_>,
        options: &PricingOptions,
    ) -> Result<PriceBreakdown, PriceOverflow> {
        let surcharges = combination
            .values()
            .iter()
            .filter_map(|value| self.surcharge(value));

        breakdown(subtotal(options.base_price, surcharges)?, options)
    }
}

fn subtotal(
    base: Decimal,
    mut surcharges: impl Iterator<Item = Decimal>,
) -> Result<Decimal, PriceOverflow> {
    surcharges.try_fold(base, |acc, surcharge| {
        acc.checked_add(surcharge)
            .ok_or(PriceOverflow { step: "subtotal" })
    })
}

fn breakdown(
    subtotal: Decimal,
    options: &PricingOptions,
) -> Result<PriceBreakdown, PriceOverflow> {
    let discount = if options.discount {
        adjustment(options.discount_type, options.discount_amount, subtotal)
            .ok_or(PriceOverflow { step: "discount" })?
    } else {
        Decimal::ZERO
    };

    let discounted = subtotal
        .checked_sub(discount)
        .ok_or(PriceOverflow { step: "discount" })?;

    // VAT applies to the discounted amount.
    let vat = if options.vat {
        adjustment(options.vat_type, options.vat_amount, discounted)
            .ok_or(PriceOverflow { step: "vat" })?
    } else {
        Decimal::ZERO
    };

    let total_price = discounted
        .checked_add(vat)
        .ok_or(PriceOverflow { step: "total" })?;

    Ok(PriceBreakdown {
        subtotal,
        discount,
        vat,
        total_price,
    })
}

fn adjustment(kind: AdjustmentKind, amount: Decimal, basis: Decimal) -> Option<Decimal> {
    match kind {
        AdjustmentKind::Fixed => Some(amount),
        AdjustmentKind::Percentage => amount
            .checked_div(Decimal::ONE_HUNDRED)?
            .checked_mul(basis),
    }
}
