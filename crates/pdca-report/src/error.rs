//! Error types for the report template crate.

use std::path::PathBuf;

/// Errors that can occur while loading or rendering report templates.
#[derive(thiserror::Error, Debug)]
pub enum ReportError {
    /// Template was not found in the bundled set or the templates directory.
    #[error("template not found: {0}")]
    TemplateNotFound(String),

    /// Error occurred while rendering a template.
    #[error("template render error: {0}")]
    TemplateRenderError(String),

    /// Templates directory does not exist or is not a directory.
    #[error("template directory not found: {0}")]
    TemplateDirectoryNotFound(PathBuf),

    /// Templates directory listing failed.
    #[error("failed to list templates in {path}")]
    TemplateListError {
        /// Path to the template directory.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for report template operations.
pub type Result<T> = std::result::Result<T, ReportError>;
