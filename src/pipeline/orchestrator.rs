//! Turns analyzed groups into priced line items.
//!
//! Each element is expanded as a drawer kit, by its furniture rule, or passed
//! through as a plain board. Boards are bucketed per component and material,
//! hardware per SKU and then per component.

use super::markers::match_markers;
use super::post_process::post_process;
use super::response::DrawingAnalyzer;
use crate::catalog::{Catalog, ProductType};
use crate::model::component::{
    base_name, component_id_of, is_cargo_name, is_orphan_component, tag_with_component,
};
use crate::model::{
    AnalysisMarker, AnalysisOutcome, AnalyzedGroup, Diagnostic, Diagnostics, FurnitureElement,
    LineElement, Part, SheetResult, OTHER_COMPONENT, UNKNOWN_SKU,
};
use crate::rules::{expand_as, expand_drawer, expand_element, has_expansion_rule, FurnitureType};
use crate::rules::{DrawerFamily, DEFAULT_DRAWER_SPEC};
use std::collections::HashMap;

const DRAWER_WORDS: [&str; 7] = [
    "SZUFLAD",
    "DRAWER",
    "SCHUBLADE",
    "MERIVOBOX",
    "TANDEMBOX",
    "MOVENTO",
    "LEGRABOX",
];
const DRAWER_SKU_PREFIX: &str = "SZUFLADA";
const FALLBACK_HARDWARE_NAME: &str = "Okucia Blum";

/// Insertion-ordered buckets of line elements.
#[derive(Debug, Default)]
struct Buckets {
    keys: HashMap<(String, String), usize>,
    entries: Vec<(String, Vec<LineElement>)>,
}

impl Buckets {
    /// `key` groups the elements, `sku` is the material reported for the bucket.
    fn push(&mut self, key: &str, sku: &str, element: LineElement) {
        let slot = (key.to_string(), sku.to_string());
        let index = match self.keys.get(&slot) {
            Some(&index) => index,
            None => {
                self.entries.push((sku.to_string(), Vec::new()));
                self.keys.insert(slot, self.entries.len() - 1);
                self.entries.len() - 1
            }
        };
        self.entries[index].1.push(element);
    }
}

fn is_drawer(name: &str, group_sku: &str) -> bool {
    let upper = name.to_uppercase();
    let named = DRAWER_WORDS.iter().any(|w| upper.contains(w)) && !is_cargo_name(&upper);
    named || group_sku.starts_with(DRAWER_SKU_PREFIX)
}

/// Digits after the first `L` or `L-` that is followed by a number.
fn depth_in_name(upper: &str) -> Option<&str> {
    upper.match_indices('L').find_map(|(pos, _)| {
        let rest = &upper[pos + 1..];
        let rest = rest.strip_prefix('-').unwrap_or(rest);
        let len = rest.bytes().take_while(u8::is_ascii_digit).count();
        (len > 0).then(|| &rest[..len])
    })
}

/// Drawer spec from the group material code and the element name.
#[must_use]
pub fn drawer_spec_for(name: &str, group_sku: &str) -> String {
    let mut spec = if group_sku.starts_with(DRAWER_SKU_PREFIX) {
        group_sku.to_string()
    } else {
        DEFAULT_DRAWER_SPEC.to_string()
    };

    let upper = name.to_uppercase();
    if let Some(depth) = depth_in_name(&upper) {
        spec = format!("SZUFLADA MERIVOBOX L-{depth}");
    }

    let merivobox = DrawerFamily::Merivobox.keyword();
    for family in [
        DrawerFamily::Tandembox,
        DrawerFamily::Movento,
        DrawerFamily::Legrabox,
    ] {
        if upper.contains(family.keyword()) && spec.contains(merivobox) {
            spec = spec.replace(merivobox, family.keyword());
        }
    }
    spec
}

fn hardware_element(
    part: &Part,
    qty: u32,
    component: Option<&str>,
    source: &FurnitureElement,
) -> LineElement {
    LineElement::new(
        &tag_with_component(&part.name, component),
        0.0,
        0.0,
        qty,
        component,
    )
    .with_box(source.box_2d)
}

/// Runs the pipeline against one loaded catalog.
#[derive(Debug, Clone, Copy)]
pub struct Orchestrator<'a> {
    catalog: &'a Catalog,
    product: ProductType,
}

impl<'a> Orchestrator<'a> {
    #[must_use]
    pub fn new(catalog: &'a Catalog, product: ProductType) -> Self {
        Self { catalog, product }
    }

    /// Asks `analyzer` for the drawing and prices it; any upstream error fails the whole run.
    #[must_use]
    pub fn analyze(
        &self,
        analyzer: &dyn DrawingAnalyzer,
        description: Option<&str>,
        markers: &[AnalysisMarker],
    ) -> AnalysisOutcome {
        match analyzer.analyze(description) {
            Ok(groups) => {
                let (sheets, diagnostics) = self.run(groups, markers);
                AnalysisOutcome::succeeded(sheets, diagnostics)
            }
            Err(e) => {
                tracing::error!(error = %e, "analysis failed");
                AnalysisOutcome::failed(e.to_string())
            }
        }
    }

    /// Post-processes, applies markers when given, expands and prices.
    #[must_use]
    pub fn run(
        &self,
        groups: Vec<AnalyzedGroup>,
        markers: &[AnalysisMarker],
    ) -> (Vec<SheetResult>, Diagnostics) {
        let (mut groups, mut diagnostics) = post_process(groups);
        if !markers.is_empty() {
            groups = match_markers(&groups, markers, &mut diagnostics);
        }

        let mut sheets = Buckets::default();
        let mut hardware = Buckets::default();

        for group in &groups {
            for element in &group.elements {
                self.expand_into(&group.sku, element, &mut sheets, &mut hardware);
            }
        }

        let mut items: Vec<SheetResult> = sheets
            .entries
            .into_iter()
            .map(|(sku, elements)| {
                let mut item = SheetResult::sheet(&sku, elements);
                self.reprice(&mut item, &sku);
                item
            })
            .collect();

        for (sku, elements) in hardware.entries {
            items.extend(self.hardware_items(&sku, elements, &mut diagnostics));
        }

        tracing::info!(
            items = items.len(),
            hardware = items.iter().filter(|i| i.is_hardware).count(),
            "estimate built"
        );
        (items, diagnostics)
    }

    fn expand_into(
        &self,
        group_sku: &str,
        element: &FurnitureElement,
        sheets: &mut Buckets,
        hardware: &mut Buckets,
    ) {
        let component = component_id_of(&element.name);
        let cargo = is_cargo_name(&element.name) || component.is_some_and(is_cargo_name);
        let sheet_key = component.unwrap_or(group_sku);

        if is_drawer(&element.name, group_sku) {
            let spec = drawer_spec_for(&element.name, group_sku);
            for part in expand_drawer(&spec, element.width) {
                let sku = if part.sku.is_empty() { UNKNOWN_SKU } else { &part.sku };
                let qty = part.qty.saturating_mul(element.qty);
                hardware.push(sku, sku, hardware_element(&part, qty, component, element));
            }
            return;
        }

        if cargo || has_expansion_rule(&element.name) {
            let parts = if cargo {
                expand_as(element, FurnitureType::Cargo)
            } else {
                expand_element(element)
            };
            for part in parts {
                if part.is_hardware() {
                    let sku = if part.sku.is_empty() { UNKNOWN_SKU } else { &part.sku };
                    hardware.push(sku, sku, hardware_element(&part, part.qty, component, element));
                } else {
                    let line = LineElement::new(
                        &tag_with_component(&part.name, component),
                        part.width,
                        part.height,
                        part.qty,
                        component,
                    )
                    .with_box(element.box_2d);
                    sheets.push(sheet_key, group_sku, line);
                }
            }
            return;
        }

        let line = LineElement::new(
            &element.name,
            element.width,
            element.height,
            element.qty,
            component,
        )
        .with_box(element.box_2d);
        sheets.push(sheet_key, group_sku, line);
    }

    /// One line item per component using this hardware SKU; orphan and cargo parts are dropped.
    fn hardware_items(
        &self,
        sku: &str,
        elements: Vec<LineElement>,
        diagnostics: &mut Diagnostics,
    ) -> Vec<SheetResult> {
        let mut by_component = Buckets::default();
        for element in elements {
            let id = element
                .component_id
                .clone()
                .unwrap_or_else(|| OTHER_COMPONENT.to_string());
            by_component.push(&id, &id, element);
        }

        let mut items = Vec::new();
        for (component, elements) in by_component.entries {
            if is_orphan_component(&component) {
                diagnostics.push(Diagnostic::SkippedOrphanHardware {
                    sku: sku.to_string(),
                    count: elements.len(),
                });
                continue;
            }
            if is_cargo_name(&component) {
                diagnostics.push(Diagnostic::SkippedCargoHardware {
                    sku: sku.to_string(),
                    component_id: component,
                });
                continue;
            }

            let quote = self.catalog.quote(sku, self.product);
            let base = quote
                .material_name
                .clone()
                .or_else(|| elements.first().map(|e| base_name(&e.name).to_string()))
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| FALLBACK_HARDWARE_NAME.to_string());

            let mut item =
                SheetResult::hardware(sku, &tag_with_component(&base, Some(&component)), elements);
            item.unit_price = quote.unit_price;
            item.advisory = quote.advisory;
            items.push(item);
        }
        items
    }

    /// Points `item` at `sku` and refreshes its price, e.g. after a manual correction.
    pub fn reprice(&self, item: &mut SheetResult, sku: &str) {
        let sku = sku.trim().to_uppercase();
        let quote = self.catalog.quote(&sku, self.product);

        item.sku = sku;
        item.unit_price = quote.unit_price;
        item.advisory = quote.advisory;
        if !item.is_hardware {
            item.material_name = quote.material_name;
        }
    }
}
