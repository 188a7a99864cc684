//! # Furniture Estimator
//!
//! Turns furniture elements read from a technical drawing into a priced bill
//! of materials: boards by sheet, hardware by piece.
//!
//! ## Features
//!
//! - Clean up raw AI element lists (false doors, windows, unit errors, duplicates)
//! - Reconcile user markers with detected bounding boxes
//! - Expand cabinets, drawers and fronts into boards and Blum hardware
//! - Price against EGGER, Woodeco and Blum price lists
//! - Export to CSV, JSON or a plain-text summary
//!
//! ## Example
//!
//! ```no_run
//! use furniture_estimator::catalog::{load_directory, ProductType};
//! use furniture_estimator::pipeline::{Orchestrator, RecordedAnalyzer};
//!
//! let catalog = load_directory("Database").expect("Failed to load catalog");
//! let analyzer = RecordedAnalyzer::from_file("response.txt").expect("Failed to read response");
//! let outcome = Orchestrator::new(&catalog, ProductType::Plate18mm).analyze(&analyzer, None, &[]);
//! println!("Line items: {}", outcome.sheets.len());
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod export;
pub mod model;
pub mod pipeline;
pub mod rules;
pub mod ui;
