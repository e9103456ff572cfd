//! PDCA Core - selection state and report generation for the PDCA toolbox.
//!
//! This crate loads the reference table of continuous-improvement tools,
//! keeps the per-phase selections and project details of a session, and
//! turns them into downloadable project plans.
//!
//! # Architecture
//!
//! - [`catalog`]: reference table loading, header normalization, lookup
//! - [`selection`], [`metadata`], [`session`]: per-session user input
//! - [`plan`]: joins selections against the catalog
//! - [`export`]: CSV, text, Excel, PDF and Markdown exporters
//! - [`output`]: writes artifacts to disk
//! - [`runtime`]: the [`Toolbox`] tying it all together
//! - [`config`], [`error`]: configuration and error types
//!
//! # Example
//!
//! ```
//! use pdca_core::{assemble, Phase, ReferenceCatalog, SelectionState, ToolRecord};
//!
//! let catalog = ReferenceCatalog::from_records(vec![
//!     ToolRecord::new(Phase::Plan, "5 Whys", "Root cause analysis"),
//! ]);
//!
//! let mut selection = SelectionState::new();
//! selection.select(Phase::Plan, ["5 Whys", "Gemba"]);
//!
//! let tasks = assemble(&selection, &catalog);
//! assert_eq!(tasks[0].description, "Root cause analysis");
//! assert_eq!(tasks[1].description, "");
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod export;
pub mod metadata;
pub mod output;
pub mod phase;
pub mod plan;
pub mod runtime;
pub mod selection;
pub mod session;

pub use catalog::{CatalogCache, ReferenceCatalog, ToolRecord};
pub use config::{CatalogConfig, ExportConfig, TemplateConfig, ToolboxConfig};
pub use error::{Result, ToolboxError};
pub use export::{
    DocumentSettings, ExportArtifact, ExportFormat, Exporter, ExporterRegistry,
};
pub use metadata::{MetadataField, ProjectMetadata};
pub use output::write_artifact;
pub use phase::Phase;
pub use plan::{PlanTask, assemble};
pub use runtime::Toolbox;
pub use selection::SelectionState;
pub use session::Session;
