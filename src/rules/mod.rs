//! Expansion rules: name classification, unit bodies and drawer kits.

pub mod cabinet;
pub mod drawer;
pub mod normalize;

pub use cabinet::{expand_as, expand_element, has_expansion_rule};
pub use drawer::{expand_drawer, snap_depth, DrawerFamily, DrawerSpec, DEFAULT_DRAWER_SPEC};
pub use normalize::{classify, normalize_name, Classification, FurnitureType};
