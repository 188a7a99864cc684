use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Material code used when the AI could not resolve one.
pub const UNKNOWN_SKU: &str = "NIEZNANY";

/// Largest per-element quantity accepted from the AI response.
pub const MAX_ELEMENT_QTY: u32 = 10_000;

/// Bounding box in the normalized 0-1000 image space, `[ymin, xmin, ymax, xmax]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "[f64; 4]", try_from = "[f64; 4]")]
pub struct BoundingBox {
    pub ymin: f64,
    pub xmin: f64,
    pub ymax: f64,
    pub xmax: f64,
}

impl BoundingBox {
    /// Builds a box, rejecting degenerate or non-finite coordinates.
    #[must_use]
    pub fn new(ymin: f64, xmin: f64, ymax: f64, xmax: f64) -> Option<Self> {
        let finite = [ymin, xmin, ymax, xmax].iter().all(|v| v.is_finite());
        if finite && ymin < ymax && xmin < xmax {
            Some(Self {
                ymin,
                xmin,
                ymax,
                xmax,
            })
        } else {
            None
        }
    }

    /// Center as `(cy, cx)`.
    #[must_use]
    pub fn center(&self) -> (f64, f64) {
        ((self.ymin + self.ymax) / 2.0, (self.xmin + self.xmax) / 2.0)
    }

    /// Inclusive point containment.
    #[must_use]
    pub fn contains(&self, y: f64, x: f64) -> bool {
        y >= self.ymin && y <= self.ymax && x >= self.xmin && x <= self.xmax
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }

    #[must_use]
    pub fn coordinates(&self) -> [f64; 4] {
        [self.ymin, self.xmin, self.ymax, self.xmax]
    }
}

impl From<BoundingBox> for [f64; 4] {
    fn from(b: BoundingBox) -> Self {
        b.coordinates()
    }
}

impl TryFrom<[f64; 4]> for BoundingBox {
    type Error = String;

    fn try_from(c: [f64; 4]) -> Result<Self, Self::Error> {
        BoundingBox::new(c[0], c[1], c[2], c[3])
            .ok_or_else(|| format!("degenerate box_2d {c:?}"))
    }
}

/// A detected or manually added piece of furniture, dimensions in millimeters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FurnitureElement {
    #[serde(default, deserialize_with = "lenient_name")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub width: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub height: f64,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_depth"
    )]
    pub depth: Option<f64>,
    #[serde(default = "default_qty", deserialize_with = "lenient_qty")]
    pub qty: u32,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_box"
    )]
    pub box_2d: Option<BoundingBox>,
}

impl FurnitureElement {
    #[must_use]
    pub fn new(name: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            depth: None,
            qty: 1,
            box_2d: None,
        }
    }

    #[must_use]
    pub fn with_qty(mut self, qty: u32) -> Self {
        self.qty = qty;
        self
    }

    #[must_use]
    pub fn with_depth(mut self, depth: f64) -> Self {
        self.depth = Some(depth);
        self
    }

    #[must_use]
    pub fn with_box(mut self, box_2d: BoundingBox) -> Self {
        self.box_2d = Some(box_2d);
        self
    }
}

/// Elements sharing one material code, as returned by the vision collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzedGroup {
    #[serde(default = "unknown_sku", deserialize_with = "normalized_sku")]
    pub sku: String,
    #[serde(default)]
    pub elements: Vec<FurnitureElement>,
}

impl AnalyzedGroup {
    #[must_use]
    pub fn new(sku: &str, elements: Vec<FurnitureElement>) -> Self {
        Self {
            sku: normalize_sku(sku),
            elements,
        }
    }

    #[must_use]
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }
}

/// Upper-cased, trimmed material code; blank codes become [`UNKNOWN_SKU`].
#[must_use]
pub fn normalize_sku(sku: &str) -> String {
    let trimmed = sku.trim();
    if trimmed.is_empty() {
        UNKNOWN_SKU.to_string()
    } else {
        trimmed.to_uppercase()
    }
}

/// Parses the leading number of a string ("600", "600mm", "11.5 cm").
#[must_use]
pub fn parse_leading_number(s: &str) -> Option<f64> {
    let s = s.trim();
    let end = s
        .char_indices()
        .find(|(i, c)| !(c.is_ascii_digit() || *c == '.' || (*i == 0 && *c == '-')))
        .map_or(s.len(), |(i, _)| i);
    s[..end].parse::<f64>().ok()
}

fn number_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_leading_number(s),
        _ => None,
    }
}

fn default_qty() -> u32 {
    1
}

fn unknown_sku() -> String {
    UNKNOWN_SKU.to_string()
}

fn lenient_name<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(match value {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    })
}

fn lenient_number<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(value.as_ref().and_then(number_from_value).unwrap_or(0.0))
}

fn lenient_depth<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(value
        .as_ref()
        .and_then(number_from_value)
        .filter(|v| *v > 0.0))
}

fn lenient_qty<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    let qty = value
        .as_ref()
        .and_then(number_from_value)
        .map_or(0.0, f64::trunc);
    if qty > f64::from(MAX_ELEMENT_QTY) {
        return Err(de::Error::custom(format!(
            "qty {qty} exceeds the limit of {MAX_ELEMENT_QTY}"
        )));
    }
    // A missing or non-positive quantity still means one piece.
    Ok(if qty >= 1.0 { qty as u32 } else { 1 })
}

fn lenient_box<'de, D: Deserializer<'de>>(d: D) -> Result<Option<BoundingBox>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    let coords: Vec<f64> = match value {
        Some(Value::Array(items)) => items.iter().filter_map(number_from_value).collect(),
        _ => return Ok(None),
    };
    if coords.len() != 4 {
        return Ok(None);
    }
    Ok(BoundingBox::new(coords[0], coords[1], coords[2], coords[3]))
}

fn normalized_sku<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(match value {
        Some(Value::String(s)) => normalize_sku(&s),
        _ => unknown_sku(),
    })
}
