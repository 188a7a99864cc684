use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Price list a catalog entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogSource {
    Egger,
    Woodeco,
    Blum,
    /// Name-only technical catalogs.
    Technical,
}

impl CatalogSource {
    #[must_use]
    pub fn is_hardware(self) -> bool {
        self == CatalogSource::Blum
    }
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CatalogSource::Egger => "EGGER",
            CatalogSource::Woodeco => "Woodeco",
            CatalogSource::Blum => "Blum",
            CatalogSource::Technical => "technical",
        };
        f.write_str(name)
    }
}

/// Board price variant used when quoting sheet goods.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProductType {
    #[default]
    Plate18mm,
    Fireproof,
    Laminate,
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProductType::Plate18mm => "plate-18mm",
            ProductType::Fireproof => "fireproof",
            ProductType::Laminate => "laminate",
        };
        f.write_str(name)
    }
}

impl FromStr for ProductType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "plate-18mm" | "plate_18mm" | "18mm" => Ok(ProductType::Plate18mm),
            "fireproof" | "plate_fireproof" => Ok(ProductType::Fireproof),
            "laminate" => Ok(ProductType::Laminate),
            other => Err(format!(
                "unknown product type '{other}' (expected plate-18mm, fireproof or laminate)"
            )),
        }
    }
}

/// Prices by variant; `None` means not listed or on request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Prices {
    pub plate_18mm: Option<f64>,
    pub fireproof: Option<f64>,
    pub laminate: Option<f64>,
    /// Per-piece price for hardware.
    pub unit: Option<f64>,
}

/// One row of a price list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogEntry {
    pub sku: String,
    pub name: String,
    /// Display symbol for hardware, e.g. `"71B3590"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    /// Board structure or hardware product group.
    pub structure: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub source: CatalogSource,
    pub prices: Prices,
}

impl CatalogEntry {
    #[must_use]
    pub fn board(
        sku: &str,
        name: &str,
        structure: &str,
        source: CatalogSource,
        prices: Prices,
    ) -> Self {
        Self {
            sku: sku.trim().to_string(),
            name: name.trim().to_string(),
            symbol: None,
            structure: structure.trim().to_string(),
            description: None,
            source,
            prices,
        }
    }

    #[must_use]
    pub fn hardware(sku: &str, symbol: &str, group: &str, unit_price: Option<f64>) -> Self {
        let symbol = symbol.split_whitespace().collect::<Vec<_>>().join(" ");
        Self {
            sku: sku.trim().to_string(),
            name: symbol.clone(),
            symbol: (!symbol.is_empty()).then_some(symbol),
            structure: group.trim().to_string(),
            description: None,
            source: CatalogSource::Blum,
            prices: Prices {
                unit: unit_price,
                ..Prices::default()
            },
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: &str) -> Self {
        let description = description.trim();
        self.description = (!description.is_empty()).then(|| description.to_string());
        self
    }

    /// Hardware uses its unit price; boards use the requested variant.
    #[must_use]
    pub fn price_for(&self, product: ProductType) -> Option<f64> {
        match self.source {
            CatalogSource::Blum => self.prices.unit,
            CatalogSource::Technical => None,
            CatalogSource::Egger | CatalogSource::Woodeco => match product {
                ProductType::Plate18mm => self.prices.plate_18mm,
                ProductType::Fireproof => self.prices.fireproof,
                ProductType::Laminate => self.prices.laminate,
            },
        }
    }

    /// Name used on hardware line items.
    #[must_use]
    pub fn display_name(&self) -> String {
        match (&self.description, &self.symbol) {
            (Some(description), _) => description.clone(),
            (None, Some(symbol)) => format!("Blum {symbol}"),
            (None, None) => self.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_product_type_parse() {
        assert_eq!("plate-18mm".parse::<ProductType>(), Ok(ProductType::Plate18mm));
        assert_eq!(" Fireproof ".parse::<ProductType>(), Ok(ProductType::Fireproof));
        assert!("mdf".parse::<ProductType>().is_err());
        assert_eq!(ProductType::Laminate.to_string(), "laminate");
    }

    #[test]
    fn test_price_for_variant() {
        let board = CatalogEntry::board(
            "W980",
            "Biały platynowy",
            "ST2",
            CatalogSource::Egger,
            Prices {
                plate_18mm: Some(280.0),
                fireproof: None,
                laminate: Some(95.5),
                unit: None,
            },
        );
        assert_eq!(board.price_for(ProductType::Plate18mm), Some(280.0));
        assert_eq!(board.price_for(ProductType::Fireproof), None);

        let hinge = CatalogEntry::hardware("71B3590", "71B3590  CLIP top", "Zawiasy", Some(11.48));
        assert_eq!(hinge.price_for(ProductType::Laminate), Some(11.48));
        assert_eq!(hinge.symbol.as_deref(), Some("71B3590 CLIP top"));
        assert_eq!(hinge.display_name(), "Blum 71B3590 CLIP top");
        assert_eq!(
            hinge.with_description("Zawias z Blumotion").display_name(),
            "Zawias z Blumotion"
        );
    }
}
