//! Name normalization and canonical furniture-type classification.

use std::fmt;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Closed set of furniture categories that drive expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FurnitureType {
    LowerCabinet,
    UpperCabinet,
    SinkCabinet,
    Dishwasher,
    TallUnit,
    Cargo,
    Topper,
    /// Vertical plinth with a full body.
    Blenda,
    GenericCabinet,
    Drawer,
    Door,
    Front,
    Countertop,
    Plinth,
    Rail,
    Side,
    Shelf,
}

impl FurnitureType {
    /// Every variant, in declaration order.
    pub const ALL: [FurnitureType; 17] = [
        FurnitureType::LowerCabinet,
        FurnitureType::UpperCabinet,
        FurnitureType::SinkCabinet,
        FurnitureType::Dishwasher,
        FurnitureType::TallUnit,
        FurnitureType::Cargo,
        FurnitureType::Topper,
        FurnitureType::Blenda,
        FurnitureType::GenericCabinet,
        FurnitureType::Drawer,
        FurnitureType::Door,
        FurnitureType::Front,
        FurnitureType::Countertop,
        FurnitureType::Plinth,
        FurnitureType::Rail,
        FurnitureType::Side,
        FurnitureType::Shelf,
    ];

    /// Polish display label, also accepted as a marker type override.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            FurnitureType::LowerCabinet => "Szafka Dolna",
            FurnitureType::UpperCabinet => "Szafka Górna",
            FurnitureType::SinkCabinet => "Szafka Zlewozmywakowa",
            FurnitureType::Dishwasher => "Zmywarka",
            FurnitureType::TallUnit => "Słupek",
            FurnitureType::Cargo => "Cargo",
            FurnitureType::Topper => "Nadstawka",
            FurnitureType::Blenda => "Blenda",
            FurnitureType::GenericCabinet => "Szafka",
            FurnitureType::Drawer => "Szuflada",
            FurnitureType::Door => "Drzwi",
            FurnitureType::Front => "Front",
            FurnitureType::Countertop => "Blat",
            FurnitureType::Plinth => "Cokół",
            FurnitureType::Rail => "Wieniec",
            FurnitureType::Side => "Bok",
            FurnitureType::Shelf => "Półka",
        }
    }

    /// Standard carcass depth in mm, for types that have a body.
    #[must_use]
    pub fn standard_depth(self) -> Option<f64> {
        match self {
            FurnitureType::LowerCabinet
            | FurnitureType::SinkCabinet
            | FurnitureType::GenericCabinet
            | FurnitureType::Blenda => Some(510.0),
            FurnitureType::UpperCabinet | FurnitureType::Topper => Some(340.0),
            FurnitureType::TallUnit => Some(560.0),
            FurnitureType::Drawer => Some(500.0),
            _ => None,
        }
    }

    /// Plinths, rails, sides and shelves are already single boards.
    #[must_use]
    pub fn is_no_op(self) -> bool {
        matches!(
            self,
            FurnitureType::Plinth | FurnitureType::Rail | FurnitureType::Side | FurnitureType::Shelf
        )
    }
}

impl fmt::Display for FurnitureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of classifying a free-text name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Known(FurnitureType),
    /// No alias or heuristic matched; carries the normalized key.
    Unmatched(String),
}

impl Classification {
    #[must_use]
    pub fn furniture_type(&self) -> Option<FurnitureType> {
        match self {
            Classification::Known(t) => Some(*t),
            Classification::Unmatched(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Pattern {
    /// Substring of the normalized key.
    Contains(&'static str),
    /// One whole `_`-separated token of the normalized key.
    Word(&'static str),
}

impl Pattern {
    fn matches(self, key: &str) -> bool {
        match self {
            Pattern::Contains(p) => key.contains(p),
            Pattern::Word(w) => key.split('_').any(|t| t == w),
        }
    }
}

use FurnitureType as T;
use Pattern::{Contains, Word};

/// Pull-out systems win over every other reading of the name.
const CARGO_PATTERNS: [Pattern; 3] = [Contains("KOSZ_CARGO"), Contains("CARGO"), Contains("WYSUW")];

/// A name that starts with a part word describes that part, not a whole unit.
const LEADING_PART_WORDS: &[(&str, FurnitureType)] = &[
    ("BOK", T::Side),
    ("SIDE", T::Side),
    ("WIENIEC", T::Rail),
    ("TRAWERS", T::Rail),
    ("LISTWA", T::Rail),
    ("RAIL", T::Rail),
    ("POLKA", T::Shelf),
    ("SHELF", T::Shelf),
    ("COKOL", T::Plinth),
    ("PLINTH", T::Plinth),
    ("FRONT", T::Front),
    ("DRZWI", T::Door),
    ("DOOR", T::Door),
    ("BLAT", T::Countertop),
    ("WORKTOP", T::Countertop),
    ("COUNTERTOP", T::Countertop),
    ("BLENDA", T::Blenda),
    ("SZUFLADA", T::Drawer),
    ("DRAWER", T::Drawer),
];

/// Ordered most specific first; the first hit wins.
const ALIASES: &[(Pattern, FurnitureType)] = &[
    (Contains("SZAFKA_ZLEWOZMYWAKOWA"), T::SinkCabinet),
    (Contains("SZAFKA_POD_ZLEW"), T::SinkCabinet),
    (Contains("SZAFA_ZLEW"), T::SinkCabinet),
    (Contains("ZLEW"), T::SinkCabinet),
    (Word("SINK"), T::SinkCabinet),
    (Contains("ZMYWARK"), T::Dishwasher),
    (Word("DISHWASHER"), T::Dishwasher),
    (Contains("SLUPEK"), T::TallUnit),
    (Contains("LODOWK"), T::TallUnit),
    (Contains("PIEKARNIK"), T::TallUnit),
    (Word("TALL"), T::TallUnit),
    (Word("FRIDGE"), T::TallUnit),
    (Word("OVEN"), T::TallUnit),
    (Contains("NADSTAWK"), T::Topper),
    (Word("TOPPER"), T::Topper),
    (Word("OVERHEAD"), T::Topper),
    (Contains("BLENDA"), T::Blenda),
    (Contains("SZAFKA_DOLNA"), T::LowerCabinet),
    (Contains("LOWER_CABINET"), T::LowerCabinet),
    (Contains("BASE_CABINET"), T::LowerCabinet),
    (Contains("SZAFKA_GORNA"), T::UpperCabinet),
    (Contains("SZAFKA_WISZACA"), T::UpperCabinet),
    (Contains("UPPER_CABINET"), T::UpperCabinet),
    (Contains("WALL_CABINET"), T::UpperCabinet),
    (Contains("SZUFLAD"), T::Drawer),
    (Word("DRAWER"), T::Drawer),
    (Contains("FRONT"), T::Front),
    (Contains("DRZWI"), T::Door),
    (Word("DOOR"), T::Door),
    (Contains("BLAT"), T::Countertop),
    (Contains("COKOL"), T::Plinth),
    (Contains("D_"), T::LowerCabinet),
    (Contains("G_"), T::UpperCabinet),
    (Contains("NAD_"), T::Topper),
    (Contains("N_"), T::Topper),
    (Contains("SZAFKA"), T::GenericCabinet),
];

/// Canonical key for a free-text name.
///
/// Uppercases, folds accents to base Latin letters, drops `x<n>` quantity
/// tokens and all digits, and joins the remaining words with `_`.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    let folded: String = name
        .to_uppercase()
        .replace('Ł', "L")
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect();

    folded
        .split_whitespace()
        .filter(|token| !is_quantity_token(token))
        .map(|token| token.chars().filter(|c| !c.is_ascii_digit()).collect::<String>())
        .filter(|token| !token.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

fn is_quantity_token(token: &str) -> bool {
    token
        .strip_prefix('X')
        .is_some_and(|rest| !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()))
}

/// Maps a free-text element name to its canonical furniture type.
#[must_use]
pub fn classify(name: &str) -> Classification {
    let key = normalize_name(name);

    if CARGO_PATTERNS.iter().any(|p| p.matches(&key)) {
        return Classification::Known(T::Cargo);
    }

    if let Some(first) = key.split('_').next() {
        if let Some((_, t)) = LEADING_PART_WORDS.iter().find(|(w, _)| *w == first) {
            return Classification::Known(*t);
        }
    }

    if let Some((_, t)) = ALIASES.iter().find(|(p, _)| p.matches(&key)) {
        return Classification::Known(*t);
    }

    match prefix_heuristic(&key) {
        Some(t) => Classification::Known(t),
        None => Classification::Unmatched(key),
    }
}

/// Bare cabinet codes such as `D60`, `G40` or `N80`.
fn prefix_heuristic(key: &str) -> Option<FurnitureType> {
    if key.split('_').next() == Some("N") {
        return Some(T::Topper);
    }
    if key.starts_with('D') {
        Some(T::LowerCabinet)
    } else if key.starts_with('G') {
        Some(T::UpperCabinet)
    } else {
        None
    }
}

/// Resolves a marker's declared type against labels and aliases.
#[must_use]
pub fn parse_declared_type(declared: &str) -> Option<FurnitureType> {
    let key = normalize_name(declared);
    T::ALL
        .iter()
        .copied()
        .find(|t| normalize_name(t.label()) == key)
        .or_else(|| classify(declared).furniture_type())
}

/// First run of 3-4 digits in the name, if it is a plausible depth (200-700mm).
#[must_use]
pub fn depth_from_name(name: &str) -> Option<f64> {
    let bytes = name.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if !bytes[i].is_ascii_digit() {
            i += 1;
            continue;
        }
        let start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i - start >= 3 {
            let end = start + (i - start).min(4);
            let value: f64 = name[start..end].parse().ok()?;
            return (200.0..=700.0).contains(&value).then_some(value);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn known(name: &str) -> Option<FurnitureType> {
        classify(name).furniture_type()
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("Szafka Górna 60"), "SZAFKA_GORNA");
        assert_eq!(normalize_name("Półka x3"), "POLKA");
        assert_eq!(normalize_name("Słupek  lodówka"), "SLUPEK_LODOWKA");
        assert_eq!(normalize_name("Bok - D60"), "BOK_-_D");
    }

    #[test]
    fn test_classify_units() {
        assert_eq!(known("Szafka Dolna - D60"), Some(T::LowerCabinet));
        assert_eq!(known("Szafka zlewozmywakowa 80"), Some(T::SinkCabinet));
        assert_eq!(known("Szafka pod zlew"), Some(T::SinkCabinet));
        assert_eq!(known("Zmywarka 60"), Some(T::Dishwasher));
        assert_eq!(known("Słupek piekarnik"), Some(T::TallUnit));
        assert_eq!(known("Szafka wisząca"), Some(T::UpperCabinet));
        assert_eq!(known("Nadstawka N80"), Some(T::Topper));
        assert_eq!(known("Blenda"), Some(T::Blenda));
        assert_eq!(known("Szafka narożna"), Some(T::GenericCabinet));
        assert_eq!(known("Base cabinet"), Some(T::LowerCabinet));
    }

    #[test]
    fn test_cargo_wins_over_everything() {
        assert_eq!(known("Szafka Dolna Cargo"), Some(T::Cargo));
        assert_eq!(known("Front wysuwu"), Some(T::Cargo));
    }

    #[test]
    fn test_leading_part_words() {
        assert_eq!(known("Bok - D60_Zlew"), Some(T::Side));
        assert_eq!(known("Wieniec Dolny - G60"), Some(T::Rail));
        assert_eq!(known("Półka - G60"), Some(T::Shelf));
        assert_eq!(known("Front - D60"), Some(T::Front));
        assert_eq!(known("Cokół 2400"), Some(T::Plinth));
        assert_eq!(known("Blat roboczy"), Some(T::Countertop));
    }

    #[test]
    fn test_prefix_heuristics() {
        assert_eq!(known("D60"), Some(T::LowerCabinet));
        assert_eq!(known("G40"), Some(T::UpperCabinet));
        assert_eq!(known("N80"), Some(T::Topper));
        assert_eq!(
            classify("Lustro"),
            Classification::Unmatched("LUSTRO".to_string())
        );
    }

    #[test]
    fn test_movento_is_not_an_oven() {
        assert_eq!(known("Szuflada Movento"), Some(T::Drawer));
        assert_eq!(known("Zestaw Movento"), None);
    }

    #[test]
    fn test_declared_type() {
        assert_eq!(parse_declared_type("Szafka Górna"), Some(T::UpperCabinet));
        assert_eq!(parse_declared_type("cargo"), Some(T::Cargo));
        assert_eq!(parse_declared_type("Lustro"), None);
    }

    #[test]
    fn test_depth_from_name() {
        assert_eq!(depth_from_name("Szafka 560mm"), Some(560.0));
        assert_eq!(depth_from_name("Szafka D60"), None);
        assert_eq!(depth_from_name("Szafka 1200"), None);
        assert_eq!(depth_from_name("Szafka 45000"), None);
        assert_eq!(depth_from_name("Szafka 150"), None);
    }

    #[test]
    fn test_no_op_types_have_no_depth() {
        for t in T::ALL.iter().filter(|t| t.is_no_op()) {
            assert_eq!(t.standard_depth(), None);
        }
    }
}
