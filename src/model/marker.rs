use serde::{Deserialize, Serialize};

/// User annotation on the source drawing, in percent of the image (top-left anchor).
///
/// A marker with both `width` and `height` is a region; otherwise it is a point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisMarker {
    pub id: u64,
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl AnalysisMarker {
    #[must_use]
    pub fn point(id: u64, x: f64, y: f64) -> Self {
        Self {
            id,
            x,
            y,
            width: None,
            height: None,
            kind: None,
        }
    }

    #[must_use]
    pub fn region(id: u64, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            id,
            x,
            y,
            width: Some(width),
            height: Some(height),
            kind: None,
        }
    }

    #[must_use]
    pub fn with_type(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Region size in percent, present only when both sides are non-zero.
    #[must_use]
    pub fn region_size(&self) -> Option<(f64, f64)> {
        match (self.width, self.height) {
            (Some(w), Some(h)) if w != 0.0 && h != 0.0 => Some((w, h)),
            _ => None,
        }
    }

    /// User-declared furniture type, ignoring blank values.
    #[must_use]
    pub fn declared_type(&self) -> Option<&str> {
        self.kind
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}
