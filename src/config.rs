//! Estimator settings loaded from environment variables.

use crate::catalog::ProductType;
use std::path::PathBuf;

pub const DEFAULT_CATALOG_DIR: &str = "./Database";

/// Estimator settings.
#[derive(Debug, Clone, PartialEq)]
pub struct EstimatorConfig {
    /// Directory holding the price list CSV files.
    pub catalog_dir: PathBuf,
    /// Markup on materials, in percent.
    pub markup_percent: f64,
    /// Assembly charge on materials plus markup, in percent.
    pub assembly_percent: f64,
    /// Board price variant used for sheet goods.
    pub product_type: ProductType,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            catalog_dir: PathBuf::from(DEFAULT_CATALOG_DIR),
            markup_percent: 0.0,
            assembly_percent: 0.0,
            product_type: ProductType::default(),
        }
    }
}

fn parse_percent(value: &str) -> Option<f64> {
    value
        .trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|p| p.is_finite() && *p >= 0.0)
}

impl EstimatorConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; unparsable values keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            catalog_dir: lookup("ESTIMATOR_CATALOG_DIR")
                .filter(|s| !s.trim().is_empty())
                .map_or(defaults.catalog_dir, PathBuf::from),
            markup_percent: lookup("ESTIMATOR_MARKUP")
                .and_then(|s| parse_percent(&s))
                .unwrap_or(defaults.markup_percent),
            assembly_percent: lookup("ESTIMATOR_ASSEMBLY")
                .and_then(|s| parse_percent(&s))
                .unwrap_or(defaults.assembly_percent),
            product_type: lookup("ESTIMATOR_PRODUCT_TYPE")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.product_type),
        }
    }

    #[must_use]
    pub fn with_catalog_dir(mut self, dir: Option<PathBuf>) -> Self {
        if let Some(dir) = dir {
            self.catalog_dir = dir;
        }
        self
    }

    #[must_use]
    pub fn with_markup(mut self, percent: Option<f64>) -> Self {
        if let Some(percent) = percent {
            self.markup_percent = percent.max(0.0);
        }
        self
    }

    #[must_use]
    pub fn with_assembly(mut self, percent: Option<f64>) -> Self {
        if let Some(percent) = percent {
            self.assembly_percent = percent.max(0.0);
        }
        self
    }

    #[must_use]
    pub fn with_product_type(mut self, product: Option<ProductType>) -> Self {
        if let Some(product) = product {
            self.product_type = product;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = EstimatorConfig::from_lookup(|_| None);
        assert_eq!(config, EstimatorConfig::default());
        assert_eq!(config.catalog_dir, PathBuf::from("./Database"));
    }

    #[test]
    fn test_env_values() {
        let config = EstimatorConfig::from_lookup(lookup_from(&[
            ("ESTIMATOR_CATALOG_DIR", "/srv/cenniki"),
            ("ESTIMATOR_MARKUP", "15,5"),
            ("ESTIMATOR_ASSEMBLY", "-3"),
            ("ESTIMATOR_PRODUCT_TYPE", "laminate"),
        ]));

        assert_eq!(config.catalog_dir, PathBuf::from("/srv/cenniki"));
        assert_eq!(config.markup_percent, 15.5);
        assert_eq!(config.assembly_percent, 0.0);
        assert_eq!(config.product_type, ProductType::Laminate);
    }

    #[test]
    fn test_cli_overrides() {
        let config = EstimatorConfig::from_lookup(lookup_from(&[("ESTIMATOR_MARKUP", "10")]))
            .with_markup(Some(20.0))
            .with_assembly(None)
            .with_product_type(Some(ProductType::Fireproof))
            .with_catalog_dir(None);

        assert_eq!(config.markup_percent, 20.0);
        assert_eq!(config.assembly_percent, 0.0);
        assert_eq!(config.product_type, ProductType::Fireproof);
        assert_eq!(config.catalog_dir, PathBuf::from(DEFAULT_CATALOG_DIR));
    }
}
