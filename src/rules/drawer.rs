//! Drawer-system hardware kits.
//!
//! A drawer spec string looks like `"SZUFLADA TANDEMBOX L-500"`: an optional
//! system keyword and an `L-<depth>` token. Kits are per drawer; callers
//! multiply quantities by the number of drawers.

use crate::model::Part;
use std::fmt;

/// Runner lengths available from the manufacturer, ascending.
pub const STANDARD_DEPTHS: [u32; 15] = [
    250, 270, 300, 320, 350, 380, 400, 420, 450, 480, 500, 520, 550, 600, 650,
];

pub const DEFAULT_DEPTH: u32 = 500;

/// Spec string used when nothing more specific is known.
pub const DEFAULT_DRAWER_SPEC: &str = "SZUFLADA MERIVOBOX L-500";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawerFamily {
    /// Integrated box system, the default.
    Merivobox,
    /// Full-extension runners for wooden drawers.
    Movento,
    /// Ball-bearing box system.
    Tandembox,
    /// Thin-wall box system.
    Legrabox,
}

impl DrawerFamily {
    /// Family named in `text`, if any. Checked in a fixed order without fuzzy matching.
    #[must_use]
    pub fn detect(text: &str) -> Option<Self> {
        let upper = text.to_uppercase();
        if upper.contains("LEGRABOX") {
            Some(DrawerFamily::Legrabox)
        } else if upper.contains("TANDEMBOX") || upper.contains("TANDEM") {
            Some(DrawerFamily::Tandembox)
        } else if upper.contains("MOVENTO") {
            Some(DrawerFamily::Movento)
        } else {
            None
        }
    }

    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            DrawerFamily::Merivobox => "MERIVOBOX",
            DrawerFamily::Movento => "MOVENTO",
            DrawerFamily::Tandembox => "TANDEMBOX",
            DrawerFamily::Legrabox => "LEGRABOX",
        }
    }
}

/// Parsed drawer spec: system family and requested depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawerSpec {
    pub family: DrawerFamily,
    /// Depth as written, before snapping to a standard length.
    pub depth: u32,
}

impl Default for DrawerSpec {
    fn default() -> Self {
        Self {
            family: DrawerFamily::Merivobox,
            depth: DEFAULT_DEPTH,
        }
    }
}

impl DrawerSpec {
    #[must_use]
    pub fn parse(spec: &str) -> Self {
        Self {
            family: DrawerFamily::detect(spec).unwrap_or(DrawerFamily::Merivobox),
            depth: depth_token(spec).unwrap_or(DEFAULT_DEPTH),
        }
    }

    #[must_use]
    pub fn snapped_depth(&self) -> u32 {
        snap_depth(self.depth)
    }
}

impl fmt::Display for DrawerSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SZUFLADA {} L-{}", self.family.keyword(), self.depth)
    }
}

/// Digits following the first `L-` in `text`, case-insensitive.
#[must_use]
pub fn depth_token(text: &str) -> Option<u32> {
    let upper = text.to_uppercase();
    let (_, rest) = upper.split_once("L-")?;
    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    digits.parse().ok()
}

/// Nearest standard depth by absolute distance; ties go to the lower depth.
#[must_use]
pub fn snap_depth(depth: u32) -> u32 {
    let mut best = STANDARD_DEPTHS[0];
    for &candidate in &STANDARD_DEPTHS[1..] {
        if candidate.abs_diff(depth) < best.abs_diff(depth) {
            best = candidate;
        }
    }
    best
}

/// Hardware kit for one drawer built from a spec string.
///
/// `width` is the cabinet width; no current kit varies with it.
#[must_use]
pub fn expand_drawer(spec: &str, width: f64) -> Vec<Part> {
    let spec = DrawerSpec::parse(spec);
    tracing::debug!(%spec, width, "expanding drawer kit");
    drawer_kit(spec)
}

#[must_use]
pub fn drawer_kit(spec: DrawerSpec) -> Vec<Part> {
    let d = spec.snapped_depth();

    match spec.family {
        DrawerFamily::Merivobox => vec![
            Part::hardware(
                format!("Prowadnica MERIVOBOX 40kg L-{d} (kpl L+P)"),
                format!("450.{d}1B"),
                1,
            ),
            Part::hardware(
                format!("Bok MERIVOBOX M (91mm) L-{d} (kpl L+P)"),
                format!("470M{d}2S"),
                1,
            ),
            Part::hardware("Mocowanie frontu MERIVOBOX", "ZF4.1002", 2),
            Part::hardware("Mocowanie ścianki tylnej MERIVOBOX M", "ZB4M000S", 2),
        ],
        DrawerFamily::Movento => {
            let raw = spec.depth;
            vec![
                Part::hardware(
                    format!("MOVENTO prowadnica 40kg L-{raw} (kpl L+P)"),
                    format!("760H{raw}0S"),
                    1,
                ),
                Part::hardware(
                    "Sprzęgło Movento z regulacją boczną (kpl L+P)",
                    "T51.7601",
                    1,
                ),
            ]
        }
        DrawerFamily::Legrabox => vec![Part::hardware(
            format!("LEGRABOX prowadnica K L-{d} (kpl L+P)"),
            format!("770K{d}0S"),
            1,
        )],
        DrawerFamily::Tandembox => vec![
            Part::hardware(
                format!("TANDEM prowadnica 30kg L-{d} (kpl L+P)"),
                format!("560F{d}0B"),
                1,
            ),
            Part::hardware("Sprzęgło TANDEMBOX (kpl L+P)", "T51.1700", 1),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn skus(parts: &[Part]) -> Vec<(&str, u32)> {
        parts.iter().map(|p| (p.sku.as_str(), p.qty)).collect()
    }

    #[test]
    fn test_snap_depth() {
        assert_eq!(snap_depth(500), 500);
        assert_eq!(snap_depth(510), 500);
        assert_eq!(snap_depth(100), 250);
        assert_eq!(snap_depth(900), 650);
        assert_eq!(snap_depth(575), 550);
        // Ties resolve to the lower standard.
        assert_eq!(snap_depth(260), 250);
        assert_eq!(snap_depth(625), 600);
    }

    #[test]
    fn test_snap_depth_minimizes_distance() {
        for depth in 200..=700u32 {
            let snapped = snap_depth(depth);
            let best = STANDARD_DEPTHS
                .iter()
                .map(|s| s.abs_diff(depth))
                .min()
                .unwrap();
            assert_eq!(snapped.abs_diff(depth), best, "depth {depth}");
            let lower_tie = STANDARD_DEPTHS
                .iter()
                .find(|s| s.abs_diff(depth) == best)
                .unwrap();
            assert_eq!(snapped, *lower_tie, "depth {depth}");
        }
    }

    #[test]
    fn test_parse_spec() {
        assert_eq!(DrawerSpec::parse("szuflada l-450"), DrawerSpec {
            family: DrawerFamily::Merivobox,
            depth: 450,
        });
        assert_eq!(DrawerSpec::parse("SZUFLADA"), DrawerSpec::default());
        assert_eq!(
            DrawerSpec::parse("SZUFLADA TANDEM L-300").family,
            DrawerFamily::Tandembox
        );
        assert_eq!(
            DrawerSpec::parse("LEGRABOX TANDEMBOX").family,
            DrawerFamily::Legrabox
        );
    }

    #[test]
    fn test_default_kit() {
        let parts = expand_drawer(DEFAULT_DRAWER_SPEC, 600.0);
        assert_eq!(
            skus(&parts),
            vec![("450.5001B", 1), ("470M5002S", 1), ("ZF4.1002", 2), ("ZB4M000S", 2)]
        );
        assert!(parts.iter().all(Part::is_hardware));
    }

    #[test]
    fn test_default_kit_snaps_depth() {
        let parts = expand_drawer("SZUFLADA L-465", 600.0);
        assert_eq!(parts[0].sku, "450.4501B");
        assert_eq!(parts[0].name, "Prowadnica MERIVOBOX 40kg L-450 (kpl L+P)");
    }

    #[test]
    fn test_movento_uses_raw_depth() {
        let parts = expand_drawer("SZUFLADA MOVENTO L-465", 600.0);
        assert_eq!(skus(&parts), vec![("760H4650S", 1), ("T51.7601", 1)]);
    }

    #[test]
    fn test_legacy_families() {
        let legra = expand_drawer("SZUFLADA LEGRABOX L-500", 600.0);
        assert_eq!(skus(&legra), vec![("770K5000S", 1)]);

        let tandem = expand_drawer("SZUFLADA TANDEMBOX L-500", 600.0);
        assert_eq!(skus(&tandem), vec![("560F5000B", 1), ("T51.1700", 1)]);
    }

    #[test]
    fn test_spec_display_round_trips() {
        let spec = DrawerSpec {
            family: DrawerFamily::Movento,
            depth: 400,
        };
        assert_eq!(spec.to_string(), "SZUFLADA MOVENTO L-400");
        assert_eq!(DrawerSpec::parse(&spec.to_string()), spec);
    }
}
