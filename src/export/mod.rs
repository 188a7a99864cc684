pub mod csv;
pub mod json;
pub mod summary;

pub use crate::error::ExportError;
pub use csv::export_csv;
pub use json::export_json;
pub use summary::{export_summary, render_summary};
