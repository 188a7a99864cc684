//! Error types for the furniture estimator.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when loading price catalogs.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog directory does not exist.
    #[error("catalog directory not found: '{path}'")]
    DirectoryNotFound { path: PathBuf },

    /// Failed to read a price list from disk.
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The price list is not valid delimited text.
    #[error("CSV read failed: {source}")]
    CsvRead {
        #[from]
        source: csv::Error,
    },
}

/// Errors that abort a whole analysis run.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Failed to read the recorded AI response or marker file.
    #[error("failed to read file '{path}': {source}")]
    InputRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The AI response does not contain a usable JSON payload.
    #[error("invalid AI response: {message}")]
    InvalidResponse { message: String },

    /// The JSON payload does not match the expected shape.
    #[error("JSON decoding failed: {source}")]
    JsonDecode {
        #[from]
        source: serde_json::Error,
    },

    /// The vision collaborator itself failed.
    #[error("drawing analysis failed: {message}")]
    Upstream { message: String },
}

/// Errors that can occur when exporting data.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Failed to create the output file.
    #[error("failed to create file '{path}': {source}")]
    FileCreate {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to write data to the file.
    #[error("failed to write data: {message}")]
    WriteError { message: String },

    /// Failed to serialize data to JSON.
    #[error("JSON serialization failed: {source}")]
    JsonSerialize {
        #[from]
        source: serde_json::Error,
    },

    /// Failed to write CSV data.
    #[error("CSV write failed: {source}")]
    CsvWrite {
        #[from]
        source: csv::Error,
    },
}
