//! Error types for PDCA toolbox operations.
//!
//! This module defines every error variant the toolbox can surface, from
//! loading the reference catalog to writing export artifacts. All errors use
//! `thiserror`; [`ToolboxError::user_notice`] maps them to the short inline
//! messages shown to users.

use crate::export::ExportFormat;
use std::path::PathBuf;
use thiserror::Error;

/// Comprehensive error types for toolbox operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ToolboxError {
    // Catalog errors
    /// No candidate location held a readable, parsable reference table.
    #[error("reference table unavailable (tried: {})", display_paths(.tried))]
    DataUnavailable {
        /// Candidate paths in the order they were tried.
        tried: Vec<PathBuf>,
    },

    /// Reference table lacks a required column after header normalization.
    #[error("reference table is missing required column: {0}")]
    MissingColumn(&'static str),

    /// Reference table could not be parsed as CSV.
    #[error("reference table parse error: {0}")]
    CatalogParse(String),

    // Session errors
    /// Phase name is not one of Plan, Do, Check, Act.
    #[error("unknown PDCA phase: {0}")]
    UnknownPhase(String),

    /// Metadata field name is not a known project field.
    #[error("unknown project field: {0}")]
    UnknownField(String),

    /// Session file could not be parsed.
    #[error("session parse error: {0}")]
    SessionParse(String),

    /// Session file could not be read.
    #[error("cannot read session {path}: {source}")]
    SessionRead {
        path: PathBuf,
        source: std::io::Error,
    },

    // Export errors
    /// Export format key is not one of the known formats.
    #[error("unknown export format: {0}")]
    UnknownFormat(String),

    /// The writer backing this format is not compiled into this build.
    #[error("{0} export is not available in this build")]
    ExporterUnavailable(ExportFormat),

    /// The writer failed while producing the artifact.
    #[error("{format} export failed: {reason}")]
    ExportFailed {
        /// Format being produced.
        format: ExportFormat,
        /// Writer error text.
        reason: String,
    },

    /// Report template failed to load or render.
    #[error(transparent)]
    Template(#[from] pdca_report::ReportError),

    // Config errors
    /// Error parsing configuration file.
    #[error("config parse error: {0}")]
    ConfigParseError(String),


    /// Configuration file already exists.
    #[error("already initialized: {0}")]
    AlreadyInitialized(PathBuf),

    // File system errors
    /// Error writing file.
    #[error("file write error: {0}")]
    FileWriteError(String),

    /// Permission denied for the specified operation.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Standard IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with context from anyhow.
    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl ToolboxError {
    /// Short message suitable for an inline notice.
    ///
    /// Never includes paths or writer internals; those go to the log.
    pub fn user_notice(&self) -> String {
        match self {
            ToolboxError::DataUnavailable { .. }
            | ToolboxError::MissingColumn(_)
            | ToolboxError::CatalogParse(_) => {
                "Tool descriptions could not be loaded. Check that the reference table is present."
                    .to_string()
            }
            ToolboxError::UnknownPhase(name) => {
                format!("\"{name}\" is not a PDCA phase (use Plan, Do, Check or Act).")
            }
            ToolboxError::UnknownField(name) => format!("\"{name}\" is not a project field."),
            ToolboxError::SessionParse(_) | ToolboxError::SessionRead { .. } => {
                "The session file could not be read.".to_string()
            }
            ToolboxError::UnknownFormat(name) => {
                format!("\"{name}\" is not an export format (use csv, tsv, xlsx, pdf or md).")
            }
            ToolboxError::ExporterUnavailable(format) => {
                format!("{format} export is unavailable in this installation.")
            }
            ToolboxError::ExportFailed { format, .. } => {
                format!("The {format} export could not be generated.")
            }
            ToolboxError::Template(_) => "The project report could not be generated.".to_string(),
            ToolboxError::ConfigParseError(_) => {
                "The toolbox configuration could not be read.".to_string()
            }
            ToolboxError::AlreadyInitialized(_) => {
                "This directory is already set up for the toolbox.".to_string()
            }
            ToolboxError::FileWriteError(_) | ToolboxError::PermissionDenied(_) => {
                "The file could not be saved.".to_string()
            }
            ToolboxError::Io(_) | ToolboxError::Anyhow(_) => {
                "A file could not be accessed.".to_string()
            }
        }
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type alias for toolbox operations.
pub type Result<T> = std::result::Result<T, ToolboxError>;
