//! Component identity: which physical furniture unit a part belongs to.
//!
//! Names carry the unit as a suffix, `"<Part> - <ComponentId>"`. The suffix is
//! parsed once at the pipeline boundary and carried as a field afterwards.

use super::estimate::SheetResult;
use serde::Serialize;
use std::collections::HashMap;

pub const COMPONENT_SEPARATOR: &str = " - ";

/// Bucket for parts without a component suffix.
pub const OTHER_COMPONENT: &str = "Inne";

/// Text after the last `" - "` in `name`, if non-empty.
#[must_use]
pub fn component_id_of(name: &str) -> Option<&str> {
    name.rsplit_once(COMPONENT_SEPARATOR)
        .map(|(_, id)| id.trim())
        .filter(|id| !id.is_empty())
}

/// Name without its component suffix.
#[must_use]
pub fn base_name(name: &str) -> &str {
    name.rsplit_once(COMPONENT_SEPARATOR)
        .map_or(name, |(base, _)| base)
        .trim()
}

/// `"<part> - <component>"`, or the bare part name without a component.
#[must_use]
pub fn tag_with_component(part: &str, component: Option<&str>) -> String {
    match component {
        Some(id) => format!("{part}{COMPONENT_SEPARATOR}{id}"),
        None => part.to_string(),
    }
}

/// Component ids that do not name a concrete furniture unit.
#[must_use]
pub fn is_orphan_component(id: &str) -> bool {
    let id = id.trim();
    id.is_empty() || id.eq_ignore_ascii_case(OTHER_COMPONENT) || id.eq_ignore_ascii_case("Other")
}

/// Cargo and pull-out systems are bought complete.
#[must_use]
pub fn is_cargo_name(name: &str) -> bool {
    let upper = name.to_uppercase();
    upper.contains("CARGO") || upper.contains("WYSUW")
}

/// Parts of one furniture unit, merged by name, size and material.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentGroup {
    pub component_id: String,
    pub parts: Vec<ComponentPart>,
    /// Indices into the line-item list that contribute to this unit.
    pub item_indices: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentPart {
    pub name: String,
    pub sku: String,
    pub width: f64,
    pub height: f64,
    pub qty: u32,
    pub is_hardware: bool,
}

impl ComponentGroup {
    #[must_use]
    pub fn hardware_pieces(&self) -> u32 {
        self.parts
            .iter()
            .filter(|p| p.is_hardware)
            .map(|p| p.qty)
            .fold(0, u32::saturating_add)
    }

    #[must_use]
    pub fn board_area_mm2(&self) -> f64 {
        self.parts
            .iter()
            .filter(|p| !p.is_hardware)
            .map(|p| p.width * p.height * f64::from(p.qty))
            .sum()
    }
}

/// Regroups priced line items by the furniture unit each element belongs to.
#[must_use]
pub fn group_by_component(items: &[SheetResult]) -> Vec<ComponentGroup> {
    let mut groups: Vec<ComponentGroup> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for (index, item) in items.iter().enumerate() {
        for element in &item.elements {
            let id = element
                .component_id
                .clone()
                .unwrap_or_else(|| OTHER_COMPONENT.to_string());

            let pos = *positions.entry(id.clone()).or_insert_with(|| {
                groups.push(ComponentGroup {
                    component_id: id,
                    parts: Vec::new(),
                    item_indices: Vec::new(),
                });
                groups.len() - 1
            });
            let group = &mut groups[pos];

            if !group.item_indices.contains(&index) {
                group.item_indices.push(index);
            }

            let name = base_name(&element.name).to_string();
            let existing = group.parts.iter_mut().find(|p| {
                p.name == name
                    && p.sku == item.sku
                    && p.width == element.width
                    && p.height == element.height
            });

            match existing {
                Some(part) => part.qty = part.qty.saturating_add(element.qty),
                None => group.parts.push(ComponentPart {
                    name,
                    sku: item.sku.clone(),
                    width: element.width,
                    height: element.height,
                    qty: element.qty,
                    is_hardware: item.is_hardware,
                }),
            }
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::estimate::LineElement;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_component_id_uses_last_separator() {
        assert_eq!(component_id_of("Bok - D60_Zlew"), Some("D60_Zlew"));
        assert_eq!(
            component_id_of("Szafka Dolna - Szafka Dolna M3"),
            Some("Szafka Dolna M3")
        );
        assert_eq!(component_id_of("Front - A - B"), Some("B"));
        assert_eq!(component_id_of("Bok"), None);
        assert_eq!(component_id_of("Bok - "), None);
    }

    #[test]
    fn test_base_name() {
        assert_eq!(base_name("Bok - D60"), "Bok");
        assert_eq!(base_name("Bok"), "Bok");
    }

    #[test]
    fn test_orphan_components() {
        assert!(is_orphan_component(""));
        assert!(is_orphan_component("Inne"));
        assert!(is_orphan_component("other"));
        assert!(!is_orphan_component("D60"));
    }

    #[test]
    fn test_group_by_component_merges_parts() {
        let boards = SheetResult::sheet(
            "W980",
            vec![
                LineElement::new("Bok - D60", 510.0, 720.0, 1, Some("D60")),
                LineElement::new("Bok - D60", 510.0, 720.0, 1, Some("D60")),
                LineElement::new("Bok - G60", 340.0, 720.0, 2, Some("G60")),
            ],
        );
        let hinges = SheetResult::hardware(
            "71B3590",
            "Zawias - D60",
            vec![LineElement::new("Zawias - D60", 0.0, 0.0, 2, Some("D60"))],
        );

        let groups = group_by_component(&[boards, hinges]);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].component_id, "D60");
        assert_eq!(groups[0].item_indices, vec![0, 1]);
        assert_eq!(groups[0].parts[0].qty, 2);
        assert_eq!(groups[0].hardware_pieces(), 2);
        assert_eq!(groups[1].component_id, "G60");
        assert_eq!(groups[1].board_area_mm2(), 340.0 * 720.0 * 2.0);
    }
}
