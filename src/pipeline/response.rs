//! Intake of the vision collaborator's text response.

use crate::error::AnalysisError;
use crate::model::{AnalysisMarker, AnalyzedGroup};
use std::fs;
use std::path::{Path, PathBuf};

/// Source of raw element groups for one drawing.
pub trait DrawingAnalyzer {
    /// Reads the drawing, optionally guided by a free-text description.
    fn analyze(&self, description: Option<&str>) -> Result<Vec<AnalyzedGroup>, AnalysisError>;
}

/// Replays a stored response instead of calling a vision model.
#[derive(Debug, Clone)]
pub struct RecordedAnalyzer {
    text: String,
}

impl RecordedAnalyzer {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AnalysisError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| AnalysisError::InputRead {
            path: PathBuf::from(path),
            source: e,
        })?;
        Ok(Self::new(text))
    }
}

impl DrawingAnalyzer for RecordedAnalyzer {
    fn analyze(&self, description: Option<&str>) -> Result<Vec<AnalyzedGroup>, AnalysisError> {
        if let Some(description) = description {
            tracing::debug!(description, "recorded response ignores the description");
        }
        parse_ai_response(&self.text)
    }
}

/// JSON part of the response: a fenced block if present, else the outermost array.
#[must_use]
pub fn extract_payload(text: &str) -> Option<&str> {
    if let Some(start) = text.find("```") {
        let mut body = &text[start + 3..];
        body = body.strip_prefix("json").unwrap_or(body);
        body = body.strip_prefix('\n').unwrap_or(body);
        if let Some(end) = body.find("```") {
            return Some(body[..end].trim_end_matches('\n'));
        }
    }

    let start = text.find('[')?;
    let end = text.rfind(']')?;
    (start < end).then(|| &text[start..=end])
}

fn scan_digits(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    i
}

fn skip_spaces(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    i
}

/// Evaluates `: 600 - 36` and `: "600+36"` left in values by the model.
///
/// Only whole values are rewritten; text inside other strings is left alone,
/// and so is any sum that does not fit in an `i64`.
#[must_use]
pub fn repair_arithmetic(json: &str) -> String {
    let bytes = json.as_bytes();
    let mut out = String::with_capacity(json.len());
    let mut copied = 0;
    let mut in_string = false;
    let mut i = 0;

    while i < bytes.len() {
        if in_string {
            match bytes[i] {
                b'\\' => i += 1,
                b'"' => in_string = false,
                _ => {}
            }
            i += 1;
            continue;
        }

        match bytes[i] {
            b'"' => in_string = true,
            b':' => {
                if let Some((end, value)) = arithmetic_at(bytes, i + 1) {
                    out.push_str(&json[copied..i]);
                    out.push_str(&format!(": {value}"));
                    tracing::debug!(
                        expr = &json[i + 1..end],
                        value,
                        "fixed arithmetic in response"
                    );
                    copied = end;
                    i = end;
                    continue;
                }
            }
            _ => {}
        }
        i += 1;
    }

    out.push_str(&json[copied..]);
    out
}

/// `ws "? digits ws op ws digits "?` starting at `i` and filling the whole
/// value; returns the end and the result.
fn arithmetic_at(bytes: &[u8], i: usize) -> Option<(usize, i64)> {
    let mut i = skip_spaces(bytes, i);
    let quoted = bytes.get(i) == Some(&b'"');
    if quoted {
        i += 1;
    }

    let lhs_end = scan_digits(bytes, i);
    if lhs_end == i {
        return None;
    }
    let lhs: i64 = std::str::from_utf8(&bytes[i..lhs_end]).ok()?.parse().ok()?;

    let op_at = skip_spaces(bytes, lhs_end);
    let op = *bytes.get(op_at)?;
    if op != b'-' && op != b'+' {
        return None;
    }

    let rhs_start = skip_spaces(bytes, op_at + 1);
    let rhs_end = scan_digits(bytes, rhs_start);
    if rhs_end == rhs_start {
        return None;
    }
    let rhs: i64 = std::str::from_utf8(&bytes[rhs_start..rhs_end]).ok()?.parse().ok()?;

    let end = if quoted {
        // `"600 - 36 cm"` is a label, not a sum.
        if bytes.get(rhs_end) != Some(&b'"') {
            return None;
        }
        rhs_end + 1
    } else {
        rhs_end
    };
    let after = skip_spaces(bytes, end);
    if !matches!(bytes.get(after), None | Some(b',' | b'}' | b']')) {
        return None;
    }

    let value = if op == b'-' {
        lhs.checked_sub(rhs)?
    } else {
        lhs.checked_add(rhs)?
    };
    Some((end, value))
}

/// Parses the model's text into element groups.
pub fn parse_ai_response(text: &str) -> Result<Vec<AnalyzedGroup>, AnalysisError> {
    let payload = extract_payload(text).ok_or_else(|| AnalysisError::InvalidResponse {
        message: "no JSON array found in response".to_string(),
    })?;
    let repaired = repair_arithmetic(payload);

    let groups: Vec<AnalyzedGroup> =
        serde_json::from_str(repaired.trim()).map_err(|e| AnalysisError::InvalidResponse {
            message: e.to_string(),
        })?;

    let elements: usize = groups.iter().map(AnalyzedGroup::element_count).sum();
    tracing::info!(groups = groups.len(), elements, "parsed AI response");
    Ok(groups)
}

/// Reads a JSON array of markers.
pub fn load_markers<P: AsRef<Path>>(path: P) -> Result<Vec<AnalysisMarker>, AnalysisError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| AnalysisError::InputRead {
        path: PathBuf::from(path),
        source: e,
    })?;
    Ok(serde_json::from_str(&text)?)
}
