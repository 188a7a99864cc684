pub mod component;
pub mod diagnostic;
pub mod element;
pub mod estimate;
pub mod marker;
pub mod part;

pub use component::{ComponentGroup, ComponentPart, OTHER_COMPONENT};
pub use diagnostic::{Diagnostic, Diagnostics, Dimension};
pub use element::{
    AnalyzedGroup, BoundingBox, FurnitureElement, MAX_ELEMENT_QTY, UNKNOWN_SKU,
};
pub use estimate::{
    Advisory, AnalysisOutcome, EstimateTotals, LineElement, SheetResult, SHEET_AREA_MM2,
};
pub use marker::AnalysisMarker;
pub use part::{Part, PartKind};
