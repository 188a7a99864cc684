//! From raw AI output to priced line items.

pub mod markers;
pub mod orchestrator;
pub mod post_process;
pub mod response;

pub use markers::match_markers;
pub use orchestrator::Orchestrator;
pub use post_process::post_process;
pub use response::{load_markers, parse_ai_response, DrawingAnalyzer, RecordedAnalyzer};
