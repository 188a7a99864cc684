//! Cleanup filters over raw AI output.
//!
//! Filters run in a fixed order. Name-based removals come before the
//! dimension fix so that the edge heuristic sees the original boxes, and the
//! hardware guard runs after SKUs are normalized.

use crate::model::{AnalyzedGroup, Diagnostic, Diagnostics, Dimension, FurnitureElement};
use std::collections::HashMap;

const DOOR_WORDS: [&str; 5] = ["drzwi", "door", "wejści", "wejsci", "entrance"];
const CABINET_FRONT_WORDS: [&str; 4] = ["front", "szafk", "cargo", "zlew"];
const WINDOW_WORDS: [&str; 3] = ["okno", "window", "szpros"];
const BACK_PANEL_WORDS: [&str; 3] = ["plecy", "hdf", "back"];
const PLINTH_WORDS: [&str; 3] = ["cokół", "cokol", "plinth"];

/// Group SKUs for categories that never carry hardware.
const NON_UNIT_GROUPS: [&str; 9] = [
    "INNE", "OTHER", "BLAT", "WORKTOP", "COKÓŁ", "PLINTH", "PANEL", "LISTWA", "STRIP",
];
const HARDWARE_WORDS: [&str; 6] = [
    "PROWADNICA",
    "ZAWIAS",
    "MOVENTO",
    "TANDEM",
    "MERIVOBOX",
    "UCHWYT",
];

const UPPER_CABINET_WORDS: [&str; 8] = [
    "g30", "g40", "g50", "g60", "g80", "górn", "gorn", "witryn",
];
const TOPPER_WORDS: [&str; 3] = ["nadstawk", "n_", "overhead"];
const SIDE_WORDS: [&str; 2] = ["bok", "side"];

/// Image-edge band in the 0-1000 box space.
const EDGE_MARGIN: f64 = 50.0;
const FULL_HEIGHT: f64 = 700.0;
const CENTIMETER_LIMIT: f64 = 50.0;
const OVERSIZED_LIMIT: f64 = 3500.0;
const WIDE_PLINTH: f64 = 2000.0;

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

/// `letter` followed by two ASCII digits, e.g. `d60` or `g80`.
fn has_unit_code(lower: &str, letter: char) -> bool {
    let chars: Vec<char> = lower.chars().collect();
    chars
        .windows(3)
        .any(|w| w[0] == letter && w[1].is_ascii_digit() && w[2].is_ascii_digit())
}

/// Cabinet fronts and unit-coded names are never building doors.
fn is_cabinet_front(name: &str) -> bool {
    let lower = name.to_lowercase();
    contains_any(&lower, &CABINET_FRONT_WORDS)
        || has_unit_code(&lower, 'd')
        || has_unit_code(&lower, 'g')
}

fn is_edge_full_height(element: &FurnitureElement) -> bool {
    element.box_2d.is_some_and(|b| {
        (b.xmin < EDGE_MARGIN || b.xmax > 1000.0 - EDGE_MARGIN) && b.height() > FULL_HEIGHT
    })
}

fn retain_elements<F>(groups: Vec<AnalyzedGroup>, mut keep: F) -> Vec<AnalyzedGroup>
where
    F: FnMut(&AnalyzedGroup, &FurnitureElement) -> bool,
{
    groups
        .into_iter()
        .filter_map(|group| {
            let elements: Vec<_> = group
                .elements
                .iter()
                .filter(|el| keep(&group, el))
                .cloned()
                .collect();
            (!elements.is_empty()).then(|| AnalyzedGroup {
                sku: group.sku,
                elements,
            })
        })
        .collect()
}

/// Drops building doors by name, and full-height elements at the image edge.
#[must_use]
pub fn filter_building_doors(
    groups: Vec<AnalyzedGroup>,
    diagnostics: &mut Diagnostics,
) -> Vec<AnalyzedGroup> {
    retain_elements(groups, |_, el| {
        if is_cabinet_front(&el.name) {
            return true;
        }
        if contains_any(&el.name.to_lowercase(), &DOOR_WORDS) {
            diagnostics.push(Diagnostic::RemovedBuildingDoor {
                name: el.name.clone(),
            });
            return false;
        }
        if is_edge_full_height(el) {
            diagnostics.push(Diagnostic::RemovedEdgeElement {
                name: el.name.clone(),
            });
            return false;
        }
        true
    })
}

#[must_use]
pub fn filter_windows(
    groups: Vec<AnalyzedGroup>,
    diagnostics: &mut Diagnostics,
) -> Vec<AnalyzedGroup> {
    retain_elements(groups, |_, el| {
        let window = contains_any(&el.name.to_lowercase(), &WINDOW_WORDS);
        if window {
            diagnostics.push(Diagnostic::RemovedWindow {
                name: el.name.clone(),
            });
        }
        !window
    })
}

#[must_use]
pub fn filter_back_panels(
    groups: Vec<AnalyzedGroup>,
    diagnostics: &mut Diagnostics,
) -> Vec<AnalyzedGroup> {
    retain_elements(groups, |_, el| {
        let back = contains_any(&el.name.to_lowercase(), &BACK_PANEL_WORDS);
        if back {
            diagnostics.push(Diagnostic::RemovedBackPanel {
                name: el.name.clone(),
            });
        }
        !back
    })
}

/// Warns about single plinths wider than 2000mm. Never alters data.
pub fn check_wide_plinths(groups: &[AnalyzedGroup], diagnostics: &mut Diagnostics) {
    for el in groups.iter().flat_map(|g| &g.elements) {
        let lower = el.name.to_lowercase();
        if contains_any(&lower, &PLINTH_WORDS) && el.width > WIDE_PLINTH && el.qty == 1 {
            diagnostics.push(Diagnostic::WidePlinth {
                name: el.name.clone(),
                width: el.width,
            });
        }
    }
}

fn correct_dimension(
    name: &str,
    dimension: Dimension,
    value: f64,
    diagnostics: &mut Diagnostics,
) -> f64 {
    let corrected = if value > 0.0 && value < CENTIMETER_LIMIT {
        let to = value * 10.0;
        diagnostics.push(Diagnostic::DimensionCorrected {
            name: name.to_string(),
            dimension,
            from: value,
            to,
        });
        to
    } else {
        value
    };

    if corrected > OVERSIZED_LIMIT {
        diagnostics.push(Diagnostic::OversizedDimension {
            name: name.to_string(),
            dimension,
            value: corrected,
        });
    }
    corrected
}

/// Multiplies dimensions in (0, 50) by ten, read as centimeters.
#[must_use]
pub fn validate_dimensions(
    groups: Vec<AnalyzedGroup>,
    diagnostics: &mut Diagnostics,
) -> Vec<AnalyzedGroup> {
    groups
        .into_iter()
        .map(|group| AnalyzedGroup {
            elements: group
                .elements
                .into_iter()
                .map(|el| FurnitureElement {
                    width: correct_dimension(&el.name, Dimension::Width, el.width, diagnostics),
                    height: correct_dimension(&el.name, Dimension::Height, el.height, diagnostics),
                    ..el
                })
                .collect(),
            sku: group.sku,
        })
        .collect()
}

/// Compares topper side pairs with upper-cabinet side pairs. Approximate, warn only.
pub fn check_toppers(groups: &[AnalyzedGroup], diagnostics: &mut Diagnostics) {
    let mut upper_cabinets = 0.0;
    let mut toppers = 0.0;

    for el in groups.iter().flat_map(|g| &g.elements) {
        let lower = el.name.to_lowercase();
        if !contains_any(&lower, &SIDE_WORDS) {
            continue;
        }
        let pairs = f64::from(el.qty) / 2.0;
        if contains_any(&lower, &UPPER_CABINET_WORDS) {
            upper_cabinets += pairs;
        }
        if contains_any(&lower, &TOPPER_WORDS) {
            toppers += pairs;
        }
    }

    if toppers > upper_cabinets + 2.0 {
        diagnostics.push(Diagnostic::TooManyToppers {
            toppers,
            upper_cabinets,
        });
    }
}

/// Strips hardware-named elements from groups that are not furniture units.
#[must_use]
pub fn guard_hardware_placement(
    groups: Vec<AnalyzedGroup>,
    diagnostics: &mut Diagnostics,
) -> Vec<AnalyzedGroup> {
    retain_elements(groups, |group, el| {
        let sku = group.sku.to_uppercase();
        if !contains_any(&sku, &NON_UNIT_GROUPS) {
            return true;
        }
        let hardware = contains_any(&el.name.to_uppercase(), &HARDWARE_WORDS);
        if hardware {
            diagnostics.push(Diagnostic::RemovedMisplacedHardware {
                sku: group.sku.clone(),
                name: el.name.clone(),
            });
        }
        !hardware
    })
}

fn dedup_key(el: &FurnitureElement) -> String {
    let coords = el
        .box_2d
        .map(|b| {
            b.coordinates()
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(",")
        })
        .unwrap_or_default();
    format!("{}|{}|{}|{}", el.name, el.width, el.height, coords)
}

/// Merges identical elements within each group by summing quantities.
///
/// Per-unit parts differ by their component suffix and stay separate.
#[must_use]
pub fn deduplicate(
    groups: Vec<AnalyzedGroup>,
    diagnostics: &mut Diagnostics,
) -> Vec<AnalyzedGroup> {
    groups
        .into_iter()
        .map(|group| {
            let mut merged: Vec<FurnitureElement> = Vec::with_capacity(group.elements.len());
            let mut index: HashMap<String, usize> = HashMap::new();

            for el in group.elements {
                let key = dedup_key(&el);
                if let Some(&pos) = index.get(&key) {
                    merged[pos].qty = merged[pos].qty.saturating_add(el.qty);
                    diagnostics.push(Diagnostic::MergedDuplicate {
                        name: el.name,
                        qty: merged[pos].qty,
                    });
                } else {
                    index.insert(key, merged.len());
                    merged.push(el);
                }
            }

            AnalyzedGroup {
                sku: group.sku,
                elements: merged,
            }
        })
        .collect()
}

/// Runs every filter in order and returns the cleaned groups with what changed.
#[must_use]
pub fn post_process(groups: Vec<AnalyzedGroup>) -> (Vec<AnalyzedGroup>, Diagnostics) {
    let mut diagnostics = Diagnostics::new();
    let before: usize = groups.iter().map(AnalyzedGroup::element_count).sum();

    let groups = filter_building_doors(groups, &mut diagnostics);
    let groups = filter_windows(groups, &mut diagnostics);
    let groups = filter_back_panels(groups, &mut diagnostics);
    check_wide_plinths(&groups, &mut diagnostics);
    let groups = validate_dimensions(groups, &mut diagnostics);
    check_toppers(&groups, &mut diagnostics);
    let groups = guard_hardware_placement(groups, &mut diagnostics);
    let groups = deduplicate(groups, &mut diagnostics);

    let after: usize = groups.iter().map(AnalyzedGroup::element_count).sum();
    tracing::info!(before, after, changes = diagnostics.len(), "post-processing done");

    (groups, diagnostics)
}
