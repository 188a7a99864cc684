use furniture_estimator::catalog::{CatalogCache, MatchTier, ProductType};
use furniture_estimator::model::component::{is_cargo_name, is_orphan_component};
use furniture_estimator::model::{Advisory, AnalysisOutcome, Diagnostic, EstimateTotals};
use furniture_estimator::pipeline::{load_markers, Orchestrator, RecordedAnalyzer};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::PathBuf;

const EGGER: &str = "\
Kod,Struktura,Nazwa,Płyta 18mm,Trudnopalna,Laminat
W980,ST2,Biały platynowy,\"280,00 zł\",XXX,95
H3170,ST12,Dąb Kendal naturalny,\"412,50 zł\",,
";

const BLUM: &str = "\
Cennik okuć Blum 2024
Grupa;Symbol;Nr art.;Cena;Min. zam.;EAN;Opis
Zawiasy;71B3590 CLIP top BLUMOTION;71B3590;11,48;10;9002;Zawias CLIP top BLUMOTION 110°
Szuflady;450.4501B MERIVOBOX;450.4501B;52,10;1;9003;
Szuflady;470M4502S MERIVOBOX;470M4502S;NA ZAPYTANIE;1;9004;
";

const RESPONSE: &str = r#"Oto wynik analizy rysunku:
```json
[
  {"sku": "w980", "elements": [
    {"name": "Szafka Dolna - D60", "width": 600, "height": 720, "box_2d": [500, 100, 900, 300]},
    {"name": "Szafka Górna - G40", "width": "40", "height": 36, "box_2d": [100, 100, 300, 300]},
    {"name": "Cargo - Cargo 30", "width": 300, "height": 720, "box_2d": [500, 400, 900, 500]},
    {"name": "Szuflada L-450 - D40", "width": 400, "height": 150, "qty": 2},
    {"name": "Drzwi wejściowe", "width": 900, "height": 2000},
    {"name": "Okno", "width": 1200, "height": 1400},
    {"name": "Plecy HDF - D60", "width": 596, "height": 716}
  ]},
  {"sku": "BLAT", "elements": [
    {"name": "Blat - Blat", "width": 2400, "height": 600},
    {"name": "Zawias", "width": 0, "height": 0}
  ]}
]
```"#;

const MARKERS: &str = r#"[
  {"id": 1, "x": 20, "y": 70},
  {"id": 2, "x": 80, "y": 10, "width": 10, "height": 10, "type": "Cargo"}
]"#;

struct Fixture {
    dir: PathBuf,
}

impl Fixture {
    fn new(name: &str) -> Self {
        let dir = std::env::temp_dir().join(format!(
            "furniture-estimator-{name}-{}",
            std::process::id()
        ));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("CENNIK EGGER - Arkusz1.csv"), EGGER).unwrap();
        fs::write(dir.join("Cennik blum.csv"), BLUM).unwrap();
        Self { dir }
    }

    fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }
}

impl Drop for Fixture {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.dir);
    }
}

fn all_names(outcome: &AnalysisOutcome) -> Vec<&str> {
    outcome
        .sheets
        .iter()
        .flat_map(|s| s.elements.iter().map(|e| e.name.as_str()))
        .collect()
}

fn assert_hardware_belongs_to_units(outcome: &AnalysisOutcome) {
    for item in outcome.sheets.iter().filter(|s| s.is_hardware) {
        let component = item.component().unwrap_or("");
        assert!(!is_orphan_component(component), "orphan hardware {}", item.sku);
        assert!(!is_cargo_name(component), "cargo hardware {}", item.sku);
    }
}

#[test]
fn test_full_pipeline_without_markers() {
    let fixture = Fixture::new("full");
    let cache = CatalogCache::new(&fixture.dir);
    let catalog = cache.get().unwrap();
    let analyzer = RecordedAnalyzer::new(RESPONSE);

    let outcome = Orchestrator::new(catalog, ProductType::Plate18mm).analyze(&analyzer, None, &[]);

    assert!(outcome.success);
    let names = all_names(&outcome);
    assert!(!names.iter().any(|n| n.contains("Drzwi")));
    assert!(!names.iter().any(|n| n.contains("Okno")));
    assert!(!names.iter().any(|n| n.contains("Plecy")));
    assert!(outcome.diagnostics.iter().any(|d| matches!(
        d,
        Diagnostic::RemovedMisplacedHardware { name, .. } if name == "Zawias"
    )));

    for item in outcome.sheets.iter().filter(|s| !s.is_hardware) {
        assert!(item.sheets_needed >= 1);
    }
    assert_hardware_belongs_to_units(&outcome);

    // Centimeter input was scaled before expansion.
    let upper_side = outcome
        .sheets
        .iter()
        .flat_map(|s| &s.elements)
        .find(|e| e.name == "Bok - G40")
        .unwrap();
    assert_eq!((upper_side.width, upper_side.height), (340.0, 360.0));

    let cargo_parts: Vec<_> = outcome
        .sheets
        .iter()
        .flat_map(|s| &s.elements)
        .filter(|e| e.component() == Some("Cargo 30"))
        .map(|e| (e.name.as_str(), e.width, e.height))
        .collect();
    assert_eq!(cargo_parts, vec![("Front Cargo - Cargo 30", 297.0, 717.0)]);

    let hinges: Vec<_> = outcome
        .sheets
        .iter()
        .filter(|s| s.sku == "71B3590")
        .map(|s| (s.component().unwrap_or(""), s.sheets_needed, s.unit_price))
        .collect();
    assert_eq!(hinges, vec![("D60", 2, Some(11.48)), ("G40", 2, Some(11.48))]);

    let runners = outcome.sheets.iter().find(|s| s.sku == "450.4501B").unwrap();
    assert_eq!(runners.sheets_needed, 2);
    assert_eq!(runners.component(), Some("D40"));
    assert_eq!(runners.cost(), Some(104.2));

    let sides = outcome.sheets.iter().find(|s| s.sku == "470M4502S").unwrap();
    assert_eq!(
        sides.advisory,
        Some(Advisory::PriceUnavailable {
            sku: "470M4502S".to_string()
        })
    );

    let board = outcome.sheets.iter().find(|s| s.sku == "W980").unwrap();
    assert_eq!(board.material_name.as_deref(), Some("Biały platynowy"));
    assert_eq!(board.unit_price, Some(280.0));

    let totals = EstimateTotals::compute(&outcome.sheets, 10.0, 0.0);
    assert!(totals.materials > 0.0);
    assert!((totals.grand_total - totals.materials * 1.1).abs() < 1e-6);
}

#[test]
fn test_markers_replace_ai_candidates() {
    let fixture = Fixture::new("markers");
    let cache = CatalogCache::new(&fixture.dir);
    let catalog = cache.get().unwrap();
    let analyzer = RecordedAnalyzer::new(RESPONSE);
    let markers = load_markers(fixture.write("markers.json", MARKERS)).unwrap();

    let outcome =
        Orchestrator::new(catalog, ProductType::Plate18mm).analyze(&analyzer, None, &markers);

    assert!(outcome.success);
    let mut components: Vec<&str> = outcome
        .sheets
        .iter()
        .flat_map(|s| &s.elements)
        .filter_map(|e| e.component())
        .collect();
    components.sort_unstable();
    components.dedup();
    assert_eq!(components, vec!["Cargo M2", "D60 M1"]);

    assert_hardware_belongs_to_units(&outcome);
    assert!(outcome
        .sheets
        .iter()
        .filter(|s| s.is_hardware)
        .all(|s| s.component() == Some("D60 M1")));

    let marker_events = outcome
        .diagnostics
        .iter()
        .filter(|d| {
            matches!(
                d,
                Diagnostic::MarkerMatched { .. } | Diagnostic::MarkerPlaceholder { .. }
            )
        })
        .count();
    assert_eq!(marker_events, 2);

    let placeholder = outcome
        .sheets
        .iter()
        .find(|s| s.component() == Some("Cargo M2"))
        .unwrap();
    assert!(matches!(
        placeholder.advisory,
        Some(Advisory::UnknownMaterial { .. })
    ));
}

#[test]
fn test_unparsable_response_fails_whole_run() {
    let fixture = Fixture::new("failure");
    let cache = CatalogCache::new(&fixture.dir);
    let catalog = cache.get().unwrap();
    let analyzer = RecordedAnalyzer::new("Nie udało się odczytać rysunku.");

    let outcome = Orchestrator::new(catalog, ProductType::Plate18mm).analyze(&analyzer, None, &[]);

    assert!(!outcome.success);
    assert!(outcome.sheets.is_empty());
    assert!(outcome.error.unwrap().starts_with("invalid AI response"));
}

#[test]
fn test_catalog_lookup_tiers() {
    let fixture = Fixture::new("lookup");
    let cache = CatalogCache::new(&fixture.dir);
    let catalog = cache.get().unwrap();

    let exact = catalog.find("71b3590").unwrap();
    assert_eq!(exact.tier, MatchTier::Exact);
    assert_eq!(exact.entry.display_name(), "Zawias CLIP top BLUMOTION 110°");

    let prefix = catalog.find("450.450").unwrap();
    assert_eq!(prefix.tier, MatchTier::Prefix);
    assert_eq!(prefix.entry.sku, "450.4501B");

    assert_eq!(catalog.len(), 5);
    let hits: Vec<&str> = catalog
        .search("merivobox")
        .iter()
        .map(|e| e.sku.as_str())
        .collect();
    assert_eq!(hits, vec!["450.4501B", "470M4502S"]);

    let quote = catalog.quote("H3170", ProductType::Plate18mm);
    assert_eq!(quote.unit_price, Some(412.5));
    assert_eq!(quote.material_name.as_deref(), Some("Dąb Kendal naturalny"));
}
