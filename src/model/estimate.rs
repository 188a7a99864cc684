use super::component::component_id_of;
use super::diagnostic::Diagnostics;
use super::element::BoundingBox;
use serde::Serialize;
use std::fmt;

pub const SHEET_WIDTH_MM: f64 = 2800.0;
pub const SHEET_HEIGHT_MM: f64 = 2070.0;
pub const SHEET_AREA_MM2: f64 = SHEET_WIDTH_MM * SHEET_HEIGHT_MM;

/// Number of standard sheets needed to cover `area_mm2`, never less than one.
#[must_use]
pub fn sheets_for_area(area_mm2: f64) -> u32 {
    let sheets = (area_mm2 / SHEET_AREA_MM2).ceil();
    if sheets.is_finite() && sheets > 1.0 {
        sheets as u32
    } else {
        1
    }
}

/// One part as listed under a priced line item.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineElement {
    pub name: String,
    pub width: f64,
    pub height: f64,
    pub qty: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub box_2d: Option<BoundingBox>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_id: Option<String>,
}

impl LineElement {
    #[must_use]
    pub fn new(name: &str, width: f64, height: f64, qty: u32, component: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            width,
            height,
            qty,
            box_2d: None,
            component_id: component.map(str::to_string),
        }
    }

    #[must_use]
    pub fn with_box(mut self, box_2d: Option<BoundingBox>) -> Self {
        self.box_2d = box_2d;
        self
    }

    /// Component of this element, from the field or parsed from the name.
    #[must_use]
    pub fn component(&self) -> Option<&str> {
        self.component_id
            .as_deref()
            .or_else(|| component_id_of(&self.name))
    }
}

/// Per-item problem that needs manual resolution but does not fail the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Advisory {
    UnknownMaterial { sku: String },
    PriceUnavailable { sku: String },
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::UnknownMaterial { sku } => write!(f, "unknown material: {sku}"),
            Advisory::PriceUnavailable { sku } => write!(f, "price on request: {sku}"),
        }
    }
}

/// A priced line item: sheet goods by area or hardware by piece count.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetResult {
    pub sku: String,
    pub elements: Vec<LineElement>,
    pub total_area_mm2: f64,
    /// Sheets for board items, total pieces for hardware.
    pub sheets_needed: u32,
    pub unit_price: Option<f64>,
    pub is_hardware: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advisory: Option<Advisory>,
}

impl SheetResult {
    /// Board line item; area and sheet count follow from the elements.
    #[must_use]
    pub fn sheet(sku: &str, elements: Vec<LineElement>) -> Self {
        let total_area_mm2: f64 = elements
            .iter()
            .map(|e| e.width * e.height * f64::from(e.qty))
            .sum();

        Self {
            sku: sku.to_string(),
            sheets_needed: sheets_for_area(total_area_mm2),
            total_area_mm2,
            elements,
            unit_price: None,
            is_hardware: false,
            material_name: None,
            advisory: None,
        }
    }

    /// Hardware line item counted in pieces.
    #[must_use]
    pub fn hardware(sku: &str, material_name: &str, elements: Vec<LineElement>) -> Self {
        let pieces = elements.iter().map(|e| e.qty).fold(0, u32::saturating_add);

        Self {
            sku: sku.to_string(),
            elements,
            total_area_mm2: 0.0,
            sheets_needed: pieces,
            unit_price: None,
            is_hardware: true,
            material_name: Some(material_name.to_string()),
            advisory: None,
        }
    }

    /// Component shared by the elements of this item, if any.
    #[must_use]
    pub fn component(&self) -> Option<&str> {
        self.elements.first().and_then(LineElement::component)
    }

    /// Cost of this item; unpriced or unresolved items cost nothing yet.
    #[must_use]
    pub fn cost(&self) -> Option<f64> {
        if self.advisory.is_some() {
            return None;
        }
        self.unit_price.map(|p| p * f64::from(self.sheets_needed))
    }

    /// Board usage across the purchased sheets, in whole percent.
    #[must_use]
    pub fn utilization_percent(&self) -> u32 {
        if self.is_hardware || self.sheets_needed == 0 || self.total_area_mm2 <= 0.0 {
            return 0;
        }
        let ratio = self.total_area_mm2 / (f64::from(self.sheets_needed) * SHEET_AREA_MM2);
        (ratio * 100.0).round() as u32
    }
}

/// Money summary over the priced items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateTotals {
    pub materials: f64,
    pub markup_percent: f64,
    pub markup_amount: f64,
    pub subtotal: f64,
    pub assembly_percent: f64,
    pub assembly_amount: f64,
    pub grand_total: f64,
    pub total_sheets: u32,
    pub total_pieces: u32,
}

impl EstimateTotals {
    /// Markup applies to materials, assembly to materials plus markup.
    #[must_use]
    pub fn compute(items: &[SheetResult], markup_percent: f64, assembly_percent: f64) -> Self {
        let materials: f64 = items.iter().filter_map(SheetResult::cost).sum();
        let markup_amount = materials * markup_percent / 100.0;
        let subtotal = materials + markup_amount;
        let assembly_amount = subtotal * assembly_percent / 100.0;

        Self {
            materials,
            markup_percent,
            markup_amount,
            subtotal,
            assembly_percent,
            assembly_amount,
            grand_total: subtotal + assembly_amount,
            total_sheets: items
                .iter()
                .filter(|i| !i.is_hardware)
                .map(|i| i.sheets_needed)
                .fold(0, u32::saturating_add),
            total_pieces: items
                .iter()
                .filter(|i| i.is_hardware)
                .map(|i| i.sheets_needed)
                .fold(0, u32::saturating_add),
        }
    }
}

/// Result of one analysis call: either line items or a single failure message.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AnalysisOutcome {
    pub success: bool,
    pub sheets: Vec<SheetResult>,
    pub diagnostics: Diagnostics,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnalysisOutcome {
    #[must_use]
    pub fn succeeded(sheets: Vec<SheetResult>, diagnostics: Diagnostics) -> Self {
        Self {
            success: true,
            sheets,
            diagnostics,
            error: None,
        }
    }

    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            sheets: Vec::new(),
            diagnostics: Diagnostics::new(),
            error: Some(message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sheet_count_never_below_one() {
        assert_eq!(sheets_for_area(0.0), 1);
        assert_eq!(sheets_for_area(1.0), 1);
        assert_eq!(sheets_for_area(SHEET_AREA_MM2), 1);
        assert_eq!(sheets_for_area(SHEET_AREA_MM2 + 1.0), 2);
    }

    #[test]
    fn test_sheet_item_area() {
        let item = SheetResult::sheet(
            "W980",
            vec![
                LineElement::new("Bok - D60", 510.0, 720.0, 2, Some("D60")),
                LineElement::new("Wieniec Dolny - D60", 564.0, 510.0, 1, Some("D60")),
            ],
        );
        assert_eq!(item.total_area_mm2, 510.0 * 720.0 * 2.0 + 564.0 * 510.0);
        assert_eq!(item.sheets_needed, 1);
        assert!(!item.is_hardware);
    }

    #[test]
    fn test_hardware_item_counts_pieces() {
        let item = SheetResult::hardware(
            "71B3590",
            "Zawias - D60",
            vec![
                LineElement::new("Zawias - D60", 0.0, 0.0, 2, Some("D60")),
                LineElement::new("Zawias - D60", 0.0, 0.0, 3, Some("D60")),
            ],
        );
        assert_eq!(item.sheets_needed, 5);
        assert_eq!(item.component(), Some("D60"));
    }

    #[test]
    fn test_totals_with_markup_and_assembly() {
        let mut boards = SheetResult::sheet(
            "W980",
            vec![LineElement::new("Bok", 510.0, 720.0, 2, None)],
        );
        boards.unit_price = Some(300.0);
        let mut hinges = SheetResult::hardware(
            "71B3590",
            "Zawias",
            vec![LineElement::new("Zawias", 0.0, 0.0, 4, Some("D60"))],
        );
        hinges.unit_price = Some(25.0);
        let mut unknown = SheetResult::sheet("XYZ", vec![LineElement::new("Bok", 1.0, 1.0, 1, None)]);
        unknown.unit_price = Some(999.0);
        unknown.advisory = Some(Advisory::UnknownMaterial {
            sku: "XYZ".to_string(),
        });

        let totals = EstimateTotals::compute(&[boards, hinges, unknown], 10.0, 50.0);

        assert_eq!(totals.materials, 400.0);
        assert_eq!(totals.markup_amount, 40.0);
        assert_eq!(totals.subtotal, 440.0);
        assert_eq!(totals.assembly_amount, 220.0);
        assert_eq!(totals.grand_total, 660.0);
        assert_eq!(totals.total_sheets, 2);
        assert_eq!(totals.total_pieces, 4);
    }

    #[test]
    fn test_piece_counts_saturate() {
        let hinge = SheetResult::hardware(
            "71B3590",
            "Zawias - D60",
            vec![
                LineElement::new("Zawias - D60", 0.0, 0.0, u32::MAX, Some("D60")),
                LineElement::new("Zawias - D60", 0.0, 0.0, 2, Some("D60")),
            ],
        );
        assert_eq!(hinge.sheets_needed, u32::MAX);

        let totals = EstimateTotals::compute(&[hinge.clone(), hinge], 0.0, 0.0);
        assert_eq!(totals.total_pieces, u32::MAX);
    }

    #[test]
    fn test_advisory_messages() {
        let unknown = Advisory::UnknownMaterial {
            sku: "X1".to_string(),
        };
        assert_eq!(unknown.to_string(), "unknown material: X1");
    }
}
