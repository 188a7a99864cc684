use super::entry::{CatalogEntry, CatalogSource, ProductType};
use crate::model::{Advisory, UNKNOWN_SKU};
use std::collections::HashMap;
use std::fmt;

const SEARCH_LIMIT: usize = 50;

/// Which lookup tier produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    Exact,
    Prefix,
    Token,
}

impl fmt::Display for MatchTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MatchTier::Exact => "exact",
            MatchTier::Prefix => "prefix",
            MatchTier::Token => "token",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatalogMatch<'a> {
    pub entry: &'a CatalogEntry,
    pub tier: MatchTier,
}

/// Price resolution for one line item.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub unit_price: Option<f64>,
    pub material_name: Option<String>,
    pub advisory: Option<Advisory>,
}

/// Read-only, indexed view over all loaded price lists.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    index: HashMap<String, usize>,
    /// Index keys in first-insertion order, for deterministic prefix scans.
    keys: Vec<String>,
}

/// Trimmed, whitespace-collapsed, upper-cased lookup key.
#[must_use]
pub fn normalize_query(sku: &str) -> String {
    sku.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

fn first_token(s: &str) -> &str {
    s.split(|c: char| c.is_whitespace() || c == '.')
        .find(|t| !t.is_empty())
        .unwrap_or("")
}

impl Catalog {
    #[must_use]
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        let mut catalog = Self {
            entries: Vec::with_capacity(entries.len()),
            index: HashMap::new(),
            keys: Vec::new(),
        };
        for entry in entries {
            catalog.insert(entry);
        }
        catalog
    }

    fn insert(&mut self, entry: CatalogEntry) {
        let position = self.entries.len();
        let mut keys = vec![normalize_query(&entry.sku)];
        if let Some(token) = entry.symbol.as_deref().and_then(|s| s.split_whitespace().next()) {
            keys.push(token.to_uppercase());
        }

        for key in keys.into_iter().filter(|k| !k.is_empty()) {
            if self.index.insert(key.clone(), position).is_none() {
                self.keys.push(key);
            }
        }
        self.entries.push(entry);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    #[must_use]
    pub fn count_by_source(&self, source: CatalogSource) -> usize {
        self.entries.iter().filter(|e| e.source == source).count()
    }

    /// Exact key, then prefix in either direction, then first-token match.
    #[must_use]
    pub fn find(&self, sku: &str) -> Option<CatalogMatch<'_>> {
        let query = normalize_query(sku);
        if query.is_empty() {
            return None;
        }

        if let Some(&pos) = self.index.get(&query) {
            return Some(self.matched(pos, MatchTier::Exact));
        }

        let prefix = self
            .keys
            .iter()
            .find(|key| key.starts_with(&query) || query.starts_with(key.as_str()));
        if let Some(pos) = prefix.and_then(|key| self.index.get(key)) {
            return Some(self.matched(*pos, MatchTier::Prefix));
        }

        let token = first_token(&query);
        if token.is_empty() {
            return None;
        }
        self.entries
            .iter()
            .position(|entry| {
                let symbol = entry.symbol.as_deref().unwrap_or(&entry.sku).to_uppercase();
                first_token(&symbol) == token
            })
            .map(|pos| self.matched(pos, MatchTier::Token))
    }

    fn matched(&self, pos: usize, tier: MatchTier) -> CatalogMatch<'_> {
        CatalogMatch {
            entry: &self.entries[pos],
            tier,
        }
    }

    /// Price and display name for `sku`, or the advisory explaining why not.
    #[must_use]
    pub fn quote(&self, sku: &str, product: ProductType) -> Quote {
        let found = if sku.trim().eq_ignore_ascii_case(UNKNOWN_SKU) {
            None
        } else {
            self.find(sku)
        };

        let Some(found) = found else {
            tracing::debug!(sku, "material not in catalog");
            return Quote {
                unit_price: None,
                material_name: None,
                advisory: Some(Advisory::UnknownMaterial {
                    sku: sku.to_string(),
                }),
            };
        };

        let entry = found.entry;
        let unit_price = entry.price_for(product);
        let material_name = if entry.source.is_hardware() {
            entry.display_name()
        } else {
            entry.name.clone()
        };

        Quote {
            unit_price,
            material_name: Some(material_name),
            advisory: unit_price.is_none().then(|| Advisory::PriceUnavailable {
                sku: sku.to_string(),
            }),
        }
    }

    /// Entries whose SKU or name contains `query`, case-insensitive.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&CatalogEntry> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }
        self.entries
            .iter()
            .filter(|e| {
                e.sku.to_lowercase().contains(&query) || e.name.to_lowercase().contains(&query)
            })
            .take(SEARCH_LIMIT)
            .collect()
    }
}
