//! Terminal browser for a finished estimate.

pub mod app;
pub mod dashboard;

pub use app::App;
