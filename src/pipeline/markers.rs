//! Reconciles user markers with AI-detected bounding boxes.
//!
//! With markers present the output holds exactly one element per marker:
//! the first unclaimed candidate the marker hits, or a placeholder.

use crate::model::{
    AnalysisMarker, AnalyzedGroup, BoundingBox, Diagnostic, Diagnostics, FurnitureElement,
    UNKNOWN_SKU,
};
use crate::rules::normalize::parse_declared_type;
use crate::rules::FurnitureType;

/// Marker percentages to the 0-1000 box space.
const PERCENT_TO_BOX: f64 = 10.0;
/// Half side of the synthetic box around a point marker.
const POINT_BOX_HALF: f64 = 50.0;
const PLACEHOLDER_WIDTH: f64 = 600.0;
const PLACEHOLDER_HEIGHT: f64 = 720.0;
const UNDETECTED_NAME: &str = "Szafka (Nie wykryto)";

struct Candidate {
    sku: String,
    box_2d: BoundingBox,
    element: FurnitureElement,
}

/// Area a marker claims, in box space.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Target {
    Region(BoundingBox),
    Point { y: f64, x: f64 },
}

impl Target {
    fn of(marker: &AnalysisMarker) -> Option<Self> {
        let my = marker.y * PERCENT_TO_BOX;
        let mx = marker.x * PERCENT_TO_BOX;
        match marker.region_size() {
            Some((w, h)) => BoundingBox::new(
                my,
                mx,
                my + h * PERCENT_TO_BOX,
                mx + w * PERCENT_TO_BOX,
            )
            .map(Target::Region),
            None => Some(Target::Point { y: my, x: mx }),
        }
    }

    fn matches(&self, candidate: &BoundingBox) -> bool {
        match self {
            Target::Region(region) => {
                let (cy, cx) = candidate.center();
                region.contains(cy, cx)
            }
            Target::Point { y, x } => candidate.contains(*y, *x),
        }
    }

    fn placeholder_box(&self) -> Option<BoundingBox> {
        match self {
            Target::Region(region) => Some(*region),
            Target::Point { y, x } => BoundingBox::new(
                y - POINT_BOX_HALF,
                x - POINT_BOX_HALF,
                y + POINT_BOX_HALF,
                x + POINT_BOX_HALF,
            ),
        }
    }
}

/// AI name without an earlier marker suffix (`" - M3 ..."`, `" - Marker ..."`).
#[must_use]
pub fn strip_marker_suffix(name: &str) -> &str {
    let mut end = name.len();
    for (pos, _) in name.match_indices(" - M") {
        let rest = &name[pos + 4..];
        let numbered = rest.chars().next().is_some_and(|c| c.is_ascii_digit());
        if numbered || rest.starts_with("arker") {
            end = pos;
            break;
        }
    }
    &name[..end]
}

/// `"<label> - <label> M<id>"`, so the component id reads `"<label> M<id>"`.
#[must_use]
pub fn marker_label(label: &str, marker_id: u64) -> String {
    format!("{label} - {label} M{marker_id}")
}

/// Canonical label for a user-declared type; unrecognized types keep the user's text.
fn declared_label(declared: &str) -> &str {
    parse_declared_type(declared).map_or(declared, |kind| kind.label())
}

fn collect_candidates(groups: &[AnalyzedGroup]) -> Vec<Candidate> {
    groups
        .iter()
        .flat_map(|group| {
            group.elements.iter().filter_map(|el| {
                el.box_2d.map(|box_2d| Candidate {
                    sku: group.sku.clone(),
                    box_2d,
                    element: el.clone(),
                })
            })
        })
        .collect()
}

/// Matches markers against boxed candidates and rebuilds the group list.
///
/// Groups in the result are keyed by the SKU of the group each match came
/// from, in first-seen order; placeholders go to the unknown-material group.
#[must_use]
pub fn match_markers(
    groups: &[AnalyzedGroup],
    markers: &[AnalysisMarker],
    diagnostics: &mut Diagnostics,
) -> Vec<AnalyzedGroup> {
    let mut candidates = collect_candidates(groups);
    let mut rebuilt: Vec<AnalyzedGroup> = Vec::new();

    tracing::info!(
        markers = markers.len(),
        candidates = candidates.len(),
        "matching markers"
    );

    for marker in markers {
        let target = Target::of(marker);
        let hit = target.and_then(|t| candidates.iter().position(|c| t.matches(&c.box_2d)));

        let (sku, element) = match hit {
            Some(index) => {
                let candidate = candidates.remove(index);
                let name = match marker.declared_type() {
                    Some(kind) => marker_label(declared_label(kind), marker.id),
                    None => {
                        let clean = strip_marker_suffix(&candidate.element.name);
                        let clean = if clean.trim().is_empty() { "Element" } else { clean };
                        marker_label(clean, marker.id)
                    }
                };
                diagnostics.push(Diagnostic::MarkerMatched {
                    marker_id: marker.id,
                    name: name.clone(),
                });
                let element = FurnitureElement {
                    name,
                    qty: 1,
                    ..candidate.element
                };
                (candidate.sku, element)
            }
            None => {
                let label = marker
                    .declared_type()
                    .map_or(UNDETECTED_NAME, declared_label);
                let name = marker_label(label, marker.id);
                diagnostics.push(Diagnostic::MarkerPlaceholder {
                    marker_id: marker.id,
                    name: name.clone(),
                });
                let mut element =
                    FurnitureElement::new(name, PLACEHOLDER_WIDTH, PLACEHOLDER_HEIGHT);
                element.box_2d = target.and_then(|t| t.placeholder_box());
                (UNKNOWN_SKU.to_string(), element)
            }
        };

        match rebuilt.iter_mut().find(|g| g.sku == sku) {
            Some(group) => group.elements.push(element),
            None => rebuilt.push(AnalyzedGroup {
                sku,
                elements: vec![element],
            }),
        }
    }

    rebuilt
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn boxed(name: &str, coords: [f64; 4]) -> FurnitureElement {
        FurnitureElement::new(name, 600.0, 720.0)
            .with_qty(3)
            .with_box(BoundingBox::new(coords[0], coords[1], coords[2], coords[3]).unwrap())
    }

    fn all_names(groups: &[AnalyzedGroup]) -> Vec<&str> {
        groups
            .iter()
            .flat_map(|g| g.elements.iter().map(|e| e.name.as_str()))
            .collect()
    }

    #[test]
    fn test_region_marker_matches_center() {
        let groups = vec![AnalyzedGroup::new(
            "W980",
            vec![boxed("Szafka Dolna", [1200.0, 1500.0, 1800.0, 2500.0])],
        )];
        let markers = vec![AnalysisMarker::region(7, 100.0, 100.0, 200.0, 100.0)];
        let mut diags = Diagnostics::new();

        let out = match_markers(&groups, &markers, &mut diags);

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].sku, "W980");
        let el = &out[0].elements[0];
        assert_eq!(el.name, "Szafka Dolna - Szafka Dolna M7");
        assert_eq!(el.qty, 1);
    }

    #[test]
    fn test_point_marker_and_type_override() {
        let groups = vec![AnalyzedGroup::new(
            "W980",
            vec![boxed("Szafka", [100.0, 100.0, 400.0, 300.0])],
        )];
        let markers = vec![AnalysisMarker::point(2, 20.0, 25.0).with_type("Cargo")];
        let mut diags = Diagnostics::new();

        let out = match_markers(&groups, &markers, &mut diags);

        assert_eq!(all_names(&out), vec!["Cargo - Cargo M2"]);
    }

    #[test]
    fn test_candidate_claimed_once() {
        let groups = vec![AnalyzedGroup::new(
            "W980",
            vec![boxed("Szafka", [100.0, 100.0, 400.0, 300.0])],
        )];
        let markers = vec![
            AnalysisMarker::point(1, 20.0, 25.0),
            AnalysisMarker::point(2, 20.0, 25.0),
        ];
        let mut diags = Diagnostics::new();

        let out = match_markers(&groups, &markers, &mut diags);

        assert_eq!(
            all_names(&out),
            vec![
                "Szafka - Szafka M1",
                "Szafka (Nie wykryto) - Szafka (Nie wykryto) M2"
            ]
        );
        assert_eq!(out[1].sku, UNKNOWN_SKU);
        assert_eq!(
            out[1].elements[0].box_2d,
            BoundingBox::new(200.0, 150.0, 300.0, 250.0)
        );
        assert_eq!(diags.warnings().count(), 1);
    }

    #[test]
    fn test_placeholder_for_region_uses_marker_rect() {
        let markers = vec![AnalysisMarker::region(4, 10.0, 20.0, 30.0, 40.0).with_type("Słupek")];
        let mut diags = Diagnostics::new();

        let out = match_markers(&[], &markers, &mut diags);
        let el = &out[0].elements[0];

        assert_eq!(el.name, "Słupek - Słupek M4");
        assert_eq!((el.width, el.height), (600.0, 720.0));
        assert_eq!(el.box_2d, BoundingBox::new(200.0, 100.0, 600.0, 400.0));
    }

    #[test]
    fn test_declared_type_resolves_to_canonical_label() {
        let groups = vec![AnalyzedGroup::new(
            "W980",
            vec![boxed("Szafka", [100.0, 100.0, 400.0, 300.0])],
        )];
        let markers = vec![
            AnalysisMarker::point(3, 20.0, 25.0).with_type("szafka gorna"),
            AnalysisMarker::point(5, 90.0, 90.0).with_type("cargo"),
            AnalysisMarker::point(6, 90.0, 90.0).with_type("Lustro"),
        ];
        let mut diags = Diagnostics::new();

        let out = match_markers(&groups, &markers, &mut diags);

        assert_eq!(
            all_names(&out),
            vec![
                "Szafka Górna - Szafka Górna M3",
                "Cargo - Cargo M5",
                "Lustro - Lustro M6",
            ]
        );
    }

    #[test]
    fn test_output_has_one_element_per_marker() {
        let groups = vec![
            AnalyzedGroup::new(
                "W980",
                vec![
                    boxed("A", [0.0, 0.0, 100.0, 100.0]),
                    boxed("B", [0.0, 200.0, 100.0, 300.0]),
                    FurnitureElement::new("No box", 600.0, 720.0),
                ],
            ),
            AnalyzedGroup::new("U999", vec![boxed("C", [500.0, 500.0, 900.0, 900.0])]),
        ];
        let markers: Vec<_> = (0..5)
            .map(|i| AnalysisMarker::point(i, 5.0 + 20.0 * i as f64, 5.0))
            .collect();
        let mut diags = Diagnostics::new();

        let out = match_markers(&groups, &markers, &mut diags);
        let total: usize = out.iter().map(AnalyzedGroup::element_count).sum();

        assert_eq!(total, markers.len());
        for marker in &markers {
            let suffix = format!(" M{}", marker.id);
            assert_eq!(
                all_names(&out).iter().filter(|n| n.ends_with(&suffix)).count(),
                1
            );
        }
    }

    #[test]
    fn test_strip_marker_suffix() {
        assert_eq!(strip_marker_suffix("Szafka - M3 stara"), "Szafka");
        assert_eq!(strip_marker_suffix("Szafka - Marker 2"), "Szafka");
        assert_eq!(strip_marker_suffix("Szafka - Moja"), "Szafka - Moja");
        assert_eq!(strip_marker_suffix("Szafka"), "Szafka");
    }
}
