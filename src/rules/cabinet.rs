//! Parametric expansion of furniture units into boards and hardware.

use super::drawer::{drawer_kit, DrawerSpec};
use super::normalize::{classify, depth_from_name, FurnitureType};
use crate::model::{FurnitureElement, Part, UNKNOWN_SKU};

const HINGE_SOFT_CLOSE: &str = "71B3590";
const HINGE_CLIP_TOP: &str = "71B3550";

/// Board thickness times two, taken off inner widths.
const CARCASS_INSET: f64 = 36.0;
/// Gap taken off each front edge.
const FRONT_GAP: f64 = 3.0;
const RAIL_HEIGHT: f64 = 100.0;
const SHELF_PITCH: f64 = 350.0;
const TALL_LOWER_FRONT: f64 = 720.0;
const TALL_FRONT_GAP: f64 = 4.0;
const COUNTERTOP_JOINT_SPACING: f64 = 600.0;

/// Input to a rule with defaults already applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
    pub qty: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopConstruction {
    /// Full top for shallow or tall carcasses, rails otherwise.
    Auto,
    FullTop,
    Rails,
}

/// Sides, bottom and top of a carcass.
#[must_use]
pub fn cabinet_body(dim: Dimensions, top: TopConstruction) -> Vec<Part> {
    let Dimensions {
        width: w,
        height: h,
        depth: d,
        qty,
    } = dim;
    let inner = w - CARCASS_INSET;

    let mut parts = vec![
        Part::material("Bok", d, h, qty.saturating_mul(2)),
        Part::material("Wieniec Dolny", inner, d, qty),
    ];

    let full_top = match top {
        TopConstruction::Auto => d < 400.0 || h > 1800.0,
        TopConstruction::FullTop => true,
        TopConstruction::Rails => false,
    };

    if full_top {
        parts.push(Part::material("Wieniec Górny", inner, d, qty));
    } else {
        parts.push(Part::material("Trawers", inner, RAIL_HEIGHT, qty.saturating_mul(2)));
    }

    parts
}

/// Doors and hinges: two doors from 800mm wide, three hinges per door above 900mm tall.
fn fronts_and_hinges(dim: Dimensions) -> Vec<Part> {
    let doors: u32 = if dim.width >= 800.0 { 2 } else { 1 };
    let door_width = if doors == 2 {
        dim.width / 2.0 - FRONT_GAP
    } else {
        dim.width - FRONT_GAP
    };
    let hinges_per_door: u32 = if dim.height > 900.0 { 3 } else { 2 };

    vec![
        Part::material("Front", door_width, dim.height - FRONT_GAP, doors.saturating_mul(dim.qty)),
        Part::hardware(
            "Zawias Blum Clip Top Blumotion",
            HINGE_SOFT_CLOSE,
            (doors * hinges_per_door).saturating_mul(dim.qty),
        ),
    ]
}

fn lower_cabinet(dim: Dimensions) -> Vec<Part> {
    let mut parts = cabinet_body(dim, TopConstruction::Auto);
    parts.extend(fronts_and_hinges(dim));
    parts
}

fn upper_cabinet(dim: Dimensions) -> Vec<Part> {
    let mut parts = cabinet_body(dim, TopConstruction::FullTop);
    parts.extend(fronts_and_hinges(dim));

    let shelves = (dim.height / SHELF_PITCH).floor().max(0.0) as u32;
    if shelves > 0 {
        parts.push(Part::material(
            "Półka",
            dim.width - CARCASS_INSET,
            dim.depth - 20.0,
            shelves.saturating_mul(dim.qty),
        ));
    }
    parts
}

fn sink_cabinet(dim: Dimensions) -> Vec<Part> {
    let mut parts = cabinet_body(dim, TopConstruction::Rails);
    parts.push(Part::material(
        "Front",
        dim.width / 2.0 - FRONT_GAP,
        dim.height - FRONT_GAP,
        dim.qty.saturating_mul(2),
    ));
    parts.push(Part::hardware(
        "Zawias Blum Clip Top (zlew)",
        HINGE_CLIP_TOP,
        dim.qty.saturating_mul(4),
    ));
    parts.push(Part::hardware("Mata ochronna pod zlew", UNKNOWN_SKU, dim.qty));
    parts
}

fn dishwasher(dim: Dimensions) -> Vec<Part> {
    vec![Part::material("Front Zmywarki", dim.width, dim.height, dim.qty)]
}

fn tall_unit(dim: Dimensions) -> Vec<Part> {
    let front_width = dim.width - FRONT_GAP;
    let upper_front = dim.height - TALL_LOWER_FRONT - TALL_FRONT_GAP;

    let mut parts = cabinet_body(dim, TopConstruction::FullTop);
    parts.push(Part::material("Front Dolny", front_width, TALL_LOWER_FRONT, dim.qty));
    parts.push(Part::material("Front Górny", front_width, upper_front, dim.qty));
    parts.push(Part::hardware(
        "Zawias Blum Clip Top Blumotion",
        HINGE_SOFT_CLOSE,
        dim.qty.saturating_mul(5),
    ));
    parts
}

/// Only the front; the pull-out mechanism is bought complete.
fn cargo(dim: Dimensions) -> Vec<Part> {
    vec![Part::material(
        "Front Cargo",
        dim.width - FRONT_GAP,
        dim.height - FRONT_GAP,
        dim.qty,
    )]
}

fn blenda(dim: Dimensions) -> Vec<Part> {
    let mut parts = cabinet_body(dim, TopConstruction::FullTop);
    parts.push(Part::material(
        "Front",
        dim.width - FRONT_GAP,
        dim.height - FRONT_GAP,
        dim.qty,
    ));
    parts.push(Part::hardware("Zawias Blum Clip Top", HINGE_CLIP_TOP, dim.qty.saturating_mul(2)));
    parts
}

fn drawer(dim: Dimensions) -> Vec<Part> {
    let spec = DrawerSpec {
        depth: dim.depth.round().max(0.0) as u32,
        ..DrawerSpec::default()
    };
    let mut parts: Vec<Part> = drawer_kit(spec)
        .into_iter()
        .map(|mut p| {
            p.qty = p.qty.saturating_mul(dim.qty);
            p
        })
        .collect();
    parts.push(Part::material("Front szuflady", dim.width, dim.height, dim.qty));
    parts
}

fn door(dim: Dimensions) -> Vec<Part> {
    let hinges: u32 = if dim.height <= 800.0 {
        2
    } else if dim.height <= 1200.0 {
        3
    } else {
        4
    };

    vec![
        Part::hardware(
            "Zawias Blum Clip Top Blumotion",
            HINGE_SOFT_CLOSE,
            hinges.saturating_mul(dim.qty),
        )
        .with_description(format!("{hinges} zawiasy")),
        Part::hardware("Uchwyt meblowy", UNKNOWN_SKU, dim.qty),
    ]
}

fn countertop(dim: Dimensions) -> Vec<Part> {
    let joints = (dim.width / COUNTERTOP_JOINT_SPACING).ceil().max(1.0) as u32;
    vec![Part::hardware("Łącznik blatu", UNKNOWN_SKU, joints.saturating_mul(dim.qty))]
}

/// `(width, height)` used when the element leaves them at zero.
fn default_size(kind: FurnitureType) -> (f64, f64) {
    match kind {
        FurnitureType::TallUnit => (600.0, 2100.0),
        FurnitureType::Cargo => (400.0, 720.0),
        FurnitureType::Topper => (600.0, 360.0),
        FurnitureType::Door | FurnitureType::Front => (600.0, 700.0),
        _ => (600.0, 720.0),
    }
}

fn or_default(value: f64, default: f64) -> f64 {
    if value == 0.0 {
        default
    } else {
        value
    }
}

type Rule = fn(Dimensions) -> Vec<Part>;

/// Expansion function registered for a canonical type.
#[must_use]
pub fn rule_for(kind: FurnitureType) -> Option<Rule> {
    let rule: Rule = match kind {
        FurnitureType::LowerCabinet | FurnitureType::GenericCabinet => lower_cabinet,
        FurnitureType::UpperCabinet | FurnitureType::Topper => upper_cabinet,
        FurnitureType::SinkCabinet => sink_cabinet,
        FurnitureType::Dishwasher => dishwasher,
        FurnitureType::TallUnit => tall_unit,
        FurnitureType::Cargo => cargo,
        FurnitureType::Blenda => blenda,
        FurnitureType::Drawer => drawer,
        FurnitureType::Door | FurnitureType::Front => door,
        FurnitureType::Countertop => countertop,
        FurnitureType::Plinth | FurnitureType::Rail | FurnitureType::Side | FurnitureType::Shelf => {
            return None
        }
    };
    Some(rule)
}

/// Whether the element name maps to a type with an expansion rule.
#[must_use]
pub fn has_expansion_rule(name: &str) -> bool {
    classify(name)
        .furniture_type()
        .and_then(rule_for)
        .is_some()
}

/// Dimensions for `element` as `kind`, with size and depth defaults applied.
#[must_use]
pub fn resolve_dimensions(element: &FurnitureElement, kind: FurnitureType) -> Dimensions {
    let (default_width, default_height) = default_size(kind);
    let depth = element
        .depth
        .or_else(|| depth_from_name(&element.name))
        .or_else(|| kind.standard_depth())
        .unwrap_or(0.0);

    Dimensions {
        width: or_default(element.width, default_width),
        height: or_default(element.height, default_height),
        depth,
        qty: element.qty,
    }
}

/// Expands one element as the given type. No-op types expand to nothing.
#[must_use]
pub fn expand_as(element: &FurnitureElement, kind: FurnitureType) -> Vec<Part> {
    let Some(rule) = rule_for(kind) else {
        return Vec::new();
    };
    let dim = resolve_dimensions(element, kind);
    let parts = rule(dim);
    tracing::trace!(name = %element.name, %kind, parts = parts.len(), "expanded element");
    parts
}

/// Expands one element by its name; unknown names expand to nothing.
#[must_use]
pub fn expand_element(element: &FurnitureElement) -> Vec<Part> {
    match classify(&element.name).furniture_type() {
        Some(kind) => expand_as(element, kind),
        None => Vec::new(),
    }
}
