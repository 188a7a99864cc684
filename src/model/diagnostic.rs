use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Width,
    Height,
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Width => f.write_str("width"),
            Dimension::Height => f.write_str("height"),
        }
    }
}

/// Something the pipeline changed or noticed while processing one analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Diagnostic {
    RemovedBuildingDoor { name: String },
    RemovedEdgeElement { name: String },
    RemovedWindow { name: String },
    RemovedBackPanel { name: String },
    WidePlinth { name: String, width: f64 },
    DimensionCorrected {
        name: String,
        dimension: Dimension,
        from: f64,
        to: f64,
    },
    OversizedDimension {
        name: String,
        dimension: Dimension,
        value: f64,
    },
    TooManyToppers { toppers: f64, upper_cabinets: f64 },
    RemovedMisplacedHardware { sku: String, name: String },
    MergedDuplicate { name: String, qty: u32 },
    MarkerMatched { marker_id: u64, name: String },
    MarkerPlaceholder { marker_id: u64, name: String },
    SkippedOrphanHardware { sku: String, count: usize },
    SkippedCargoHardware { sku: String, component_id: String },
}

impl Diagnostic {
    /// Warnings flag likely problems in the AI output; the rest record routine fixes.
    #[must_use]
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            Diagnostic::WidePlinth { .. }
                | Diagnostic::OversizedDimension { .. }
                | Diagnostic::TooManyToppers { .. }
                | Diagnostic::MarkerPlaceholder { .. }
        )
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::RemovedBuildingDoor { name } => {
                write!(f, "removed building door: {name}")
            }
            Diagnostic::RemovedEdgeElement { name } => {
                write!(f, "removed full-height element at image edge: {name}")
            }
            Diagnostic::RemovedWindow { name } => write!(f, "removed window: {name}"),
            Diagnostic::RemovedBackPanel { name } => write!(f, "removed back panel: {name}"),
            Diagnostic::WidePlinth { name, width } => {
                write!(f, "wide plinth {name} ({width}mm) may need splitting into sections")
            }
            Diagnostic::DimensionCorrected {
                name,
                dimension,
                from,
                to,
            } => write!(f, "corrected {dimension} of {name}: {from} -> {to} (cm -> mm)"),
            Diagnostic::OversizedDimension {
                name,
                dimension,
                value,
            } => write!(f, "very large {dimension} of {name} ({value}mm)"),
            Diagnostic::TooManyToppers {
                toppers,
                upper_cabinets,
            } => write!(
                f,
                "too many toppers ({toppers}) for the number of upper cabinets ({upper_cabinets})"
            ),
            Diagnostic::RemovedMisplacedHardware { sku, name } => {
                write!(f, "removed hardware from group {sku}: {name}")
            }
            Diagnostic::MergedDuplicate { name, qty } => {
                write!(f, "merged duplicate {name} -> total x{qty}")
            }
            Diagnostic::MarkerMatched { marker_id, name } => {
                write!(f, "marker M{marker_id} matched {name}")
            }
            Diagnostic::MarkerPlaceholder { marker_id, name } => {
                write!(f, "marker M{marker_id} had no match, placeholder {name}")
            }
            Diagnostic::SkippedOrphanHardware { sku, count } => {
                write!(f, "skipped {count} hardware item(s) {sku} without a component")
            }
            Diagnostic::SkippedCargoHardware { sku, component_id } => {
                write!(f, "skipped hardware {sku} for cargo component {component_id}")
            }
        }
    }
}

/// Ordered list of diagnostics collected during one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        if diagnostic.is_warning() {
            tracing::warn!(%diagnostic, "pipeline warning");
        } else {
            tracing::debug!(%diagnostic, "pipeline change");
        }
        self.0.push(diagnostic);
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.0.extend(other.0);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter()
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter().filter(|d| d.is_warning())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
