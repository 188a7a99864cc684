use super::element::UNKNOWN_SKU;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PartKind {
    /// Discrete purchased piece, counted by quantity.
    Hardware,
    /// Board cut from sheet goods, counted by area.
    Material,
}

/// One expanded part of a furniture unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Part {
    pub name: String,
    pub sku: String,
    pub qty: u32,
    #[serde(rename = "type")]
    pub kind: PartKind,
    pub width: f64,
    pub height: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Part {
    /// A board part; board SKUs come from the owning group, so it starts unresolved.
    #[must_use]
    pub fn material(name: impl Into<String>, width: f64, height: f64, qty: u32) -> Self {
        Self {
            name: name.into(),
            sku: UNKNOWN_SKU.to_string(),
            qty,
            kind: PartKind::Material,
            width,
            height,
            depth: None,
            description: None,
        }
    }

    /// A hardware part without dimensions.
    #[must_use]
    pub fn hardware(name: impl Into<String>, sku: impl Into<String>, qty: u32) -> Self {
        Self {
            name: name.into(),
            sku: sku.into(),
            qty,
            kind: PartKind::Hardware,
            width: 0.0,
            height: 0.0,
            depth: None,
            description: None,
        }
    }

    #[must_use]
    pub fn with_depth(mut self, depth: f64) -> Self {
        self.depth = Some(depth);
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn is_hardware(&self) -> bool {
        self.kind == PartKind::Hardware
    }

    /// Board area of all pieces in mm², zero for hardware.
    #[must_use]
    pub fn area_mm2(&self) -> f64 {
        match self.kind {
            PartKind::Material => self.width * self.height * f64::from(self.qty),
            PartKind::Hardware => 0.0,
        }
    }
}
