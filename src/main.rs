use clap::Parser;
use color_eyre::Result;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use furniture_estimator::catalog::{CatalogCache, ProductType};
use furniture_estimator::config::EstimatorConfig;
use furniture_estimator::export::{export_csv, export_json, export_summary};
use furniture_estimator::model::EstimateTotals;
use furniture_estimator::pipeline::{load_markers, Orchestrator, RecordedAnalyzer};
use furniture_estimator::ui::App;

#[derive(Parser, Debug)]
#[command(name = "furniture-estimator")]
#[command(about = "Furniture Estimator - price boards and hardware from an analyzed drawing")]
#[command(version)]
struct Args {
    /// Recorded AI analysis of the drawing
    #[arg(required_unless_present_any = ["lookup", "search"])]
    analysis: Option<PathBuf>,

    /// JSON array of user markers
    #[arg(long, value_name = "FILE")]
    markers: Option<PathBuf>,

    /// Free-text description passed to the analyzer
    #[arg(long, value_name = "TEXT")]
    description: Option<String>,

    /// Directory with the price list CSV files
    #[arg(long, value_name = "DIR")]
    catalog: Option<PathBuf>,

    /// Markup on materials in percent
    #[arg(long, value_name = "PCT")]
    markup: Option<f64>,

    /// Assembly charge in percent
    #[arg(long, value_name = "PCT")]
    assembly: Option<f64>,

    /// Board price variant: plate-18mm, fireproof or laminate
    #[arg(long, value_name = "TYPE")]
    product: Option<ProductType>,

    /// Export line items to CSV
    #[arg(long, value_name = "FILE")]
    csv: Option<PathBuf>,

    /// Export the full outcome to JSON
    #[arg(long, value_name = "FILE")]
    json: Option<PathBuf>,

    /// Export a plain-text estimate
    #[arg(long, value_name = "FILE")]
    summary: Option<PathBuf>,

    /// Look up one SKU in the catalog and exit
    #[arg(long, value_name = "SKU")]
    lookup: Option<String>,

    /// List catalog entries whose SKU or name contains TEXT and exit
    #[arg(long, value_name = "TEXT")]
    search: Option<String>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = EstimatorConfig::from_env()
        .with_catalog_dir(args.catalog.clone())
        .with_markup(args.markup)
        .with_assembly(args.assembly)
        .with_product_type(args.product);

    let cache = CatalogCache::new(&config.catalog_dir);
    let catalog = cache.get()?;

    if let Some(sku) = &args.lookup {
        match catalog.find(sku) {
            Some(found) => {
                let price = found
                    .entry
                    .price_for(config.product_type)
                    .map_or_else(|| "no price".to_string(), |p| format!("{p:.2} zł"));
                println!(
                    "{} [{} match, {}] {} - {}",
                    found.entry.sku, found.tier, found.entry.source, found.entry.name, price
                );
            }
            None => println!("{sku}: not found"),
        }
        return Ok(());
    }

    if let Some(query) = &args.search {
        let hits = catalog.search(query);
        for entry in &hits {
            let price = entry
                .price_for(config.product_type)
                .map_or_else(|| "no price".to_string(), |p| format!("{p:.2} zł"));
            println!("{:<14} {:<8} {} - {}", entry.sku, entry.source, entry.name, price);
        }
        println!("{} match(es) for '{query}'", hits.len());
        return Ok(());
    }

    let Some(analysis) = &args.analysis else {
        return Ok(());
    };
    let analyzer = RecordedAnalyzer::from_file(analysis)?;
    let markers = match &args.markers {
        Some(path) => load_markers(path)?,
        None => Vec::new(),
    };

    let orchestrator = Orchestrator::new(catalog, config.product_type);
    let outcome = orchestrator.analyze(&analyzer, args.description.as_deref(), &markers);
    let totals = EstimateTotals::compute(
        &outcome.sheets,
        config.markup_percent,
        config.assembly_percent,
    );

    if let Some(csv_path) = &args.csv {
        export_csv(&outcome.sheets, csv_path)?;
        println!("Exported to CSV: {}", csv_path.display());
    }

    if let Some(json_path) = &args.json {
        export_json(&outcome, json_path)?;
        println!("Exported to JSON: {}", json_path.display());
    }

    if let Some(summary_path) = &args.summary {
        export_summary(&outcome, &totals, summary_path)?;
        println!("Exported summary: {}", summary_path.display());
    }

    if args.csv.is_some() || args.json.is_some() || args.summary.is_some() {
        return Ok(());
    }

    let terminal = ratatui::init();
    let result = App::new(outcome)
        .with_rates(config.markup_percent, config.assembly_percent)
        .run(terminal);
    ratatui::restore();
    result
}
