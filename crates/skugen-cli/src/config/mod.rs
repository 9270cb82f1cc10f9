//! Pricing options files and command-line overrides.

mod atomic;

use std::path::Path;

use rust_decimal::Decimal;
use skugen_core::{AdjustmentKind, PricingOptions};
use thiserror::Error;

use atomic::write_bytes_atomic;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("options decode error: {0}")]
    TomlDecode(#[from] toml::de::Error),
    #[error("options encode error: {0}")]
    TomlEncode(#[from] toml::ser::Error),
    #[error("invalid options: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Field-level replacements applied on top of a loaded options file.
#[derive(Debug, Clone, Default)]
pub struct PricingOverrides {
    pub prefix_name: Option<String>,
    pub separator: Option<String>,
    pub price: Option<bool>,
    pub base_price: Option<Decimal>,
    pub vat: Option<bool>,
    pub vat_type: Option<AdjustmentKind>,
    pub vat_amount: Option<Decimal>,
    pub discount: Option<bool>,
    pub discount_type: Option<AdjustmentKind>,
    pub discount_amount: Option<Decimal>,
    pub uppercase: Option<bool>,
}

impl PricingOverrides {
    pub fn apply(self, options: &mut PricingOptions) {
        if let Some(value) = self.prefix_name {
            options.prefix_name = value;
        }
        if let Some(value) = self.separator {
            options.separator = value;
        }
        if let Some(value) = self.price {
            options.price = value;
        }
        if let Some(value) = self.base_price {
            options.base_price = value;
        }
        if let Some(value) = self.vat {
            options.vat = value;
        }
        if let Some(value) = self.vat_type {
            options.vat_type = value;
        }
        if let Some(value) = self.vat_amount {
            options.vat_amount = value;
        }
        if let Some(value) = self.discount {
            options.discount = value;
        }
        if let Some(value) = self.discount_type {
            options.discount_type = value;
        }
        if let Some(value) = self.discount_amount {
            options.discount_amount = value;
        }
        if let Some(value) = self.uppercase {
            options.uppercase = value;
        }
    }
}

/// Read pricing options from `path`, or the defaults when no file is given.
pub fn load_options(path: Option<&Path>) -> ConfigResult<PricingOptions> {
    let Some(path) = path else {
        return Ok(PricingOptions::default());
    };
    let content = std::fs::read_to_string(path)?;
    let options: PricingOptions = toml::from_str(&content)?;
    Ok(options)
}

/// Write the default options to `path`. Refuses to replace an existing file
/// unless `force` is set.
pub fn write_default_options(path: &Path, force: bool) -> ConfigResult<()> {
    if path.exists() && !force {
        return Err(ConfigError::Invalid(format!(
            "{} already exists",
            path.display()
        )));
    }
    let encoded = toml::to_string_pretty(&PricingOptions::default())?;
    write_bytes_atomic(path, encoded.as_bytes())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn temp_file(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("skugen_config_{}", uuid::Uuid::new_v4()))
            .join(name)
    }

    #[test]
    fn missing_path_gives_defaults() {
        let options = load_options(None).expect("defaults");
        assert_eq!(options, PricingOptions::default());
    }

    #[test]
    fn default_options_file_round_trips() {
        let path = temp_file("options.toml");

        write_default_options(&path, false).expect("write defaults");
        let loaded = load_options(Some(&path)).expect("load defaults");

        assert_eq!(loaded, PricingOptions::default());
        assert!(!path.with_file_name("options.toml.tmp").exists());
    }

    #[test]
    fn existing_file_is_kept_without_force() {
        let path = temp_file("options.toml");
        std::fs::create_dir_all(path.parent().expect("parent")).expect("create dir");
        std::fs::write(&path, "prefix_name = \"Mine\"\n").expect("seed file");

        let err = write_default_options(&path, false).expect_err("should refuse");
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert_eq!(
            load_options(Some(&path)).expect("load").prefix_name,
            "Mine"
        );

        write_default_options(&path, true).expect("force overwrite");
        assert_eq!(load_options(Some(&path)).expect("load").prefix_name, "Test");
    }

    #[test]
    fn overrides_replace_only_given_fields() {
        let mut options = PricingOptions::default();
        PricingOverrides {
            prefix_name: Some("Cab".to_string()),
            vat: Some(false),
            discount_amount: Some(Decimal::from(25)),
            ..PricingOverrides::default()
        }
        .apply(&mut options);

        assert_eq!(options.prefix_name, "Cab");
        assert!(!options.vat);
        assert_eq!(options.discount_amount, Decimal::from(25));
        assert_eq!(options.separator, "-");
        assert!(options.price);
    }
}
