use skugen_core::PricingOptions;

use crate::enumerate::Combination;

/// Build the SKU string for a combination.
///
/// `prefix + sep + v1 + sep + v2 ...`, cased according to `uppercase`. The
/// root combination formats as the prefix alone.
pub fn format_sku(combination: &Combination<'_>, options: &PricingOptions) -> String {
    let capacity = options.prefix_name.len()
        + combination
            .values()
            .iter()
            .map(|value| value.len() + options.separator.len())
            .sum::<usize>();
    let mut sku = String::with_capacity(capacity);
    sku.push_str(&options.prefix_name);
    for value in combination.values() {
        sku.push_str(&options.separator);
        sku.push_str(value);
    }

    if options.uppercase {
        sku.to_uppercase()
    } else {
        sku.to_lowercase()
    }
}
