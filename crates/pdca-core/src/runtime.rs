//! The toolbox runtime: catalog, exporters and configuration in one place.
//!
//! [`Toolbox`] holds only read-only shared state. Every operation takes the
//! caller's [`Session`] explicitly, so one toolbox can serve any number of
//! independent sessions.

use crate::catalog::ReferenceCatalog;
use crate::config::ToolboxConfig;
use crate::error::Result;
use crate::export::{ExportArtifact, ExportFormat, ExporterRegistry};
use crate::output::write_artifact;
use crate::plan::{PlanTask, assemble};
use crate::session::Session;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Entry point for planning and exporting.
///
/// # Examples
///
/// ```no_run
/// use pdca_core::{ExportFormat, Session, Toolbox, ToolboxConfig};
/// use std::path::PathBuf;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ToolboxConfig::load(PathBuf::from("."))?;
/// let toolbox = Toolbox::new(config)?;
///
/// let session = Session::start();
/// let artifact = toolbox.export(&session, ExportFormat::Csv)?;
/// println!("{} ({} bytes)", artifact.filename, artifact.bytes.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Toolbox {
    /// Toolbox configuration.
    pub config: ToolboxConfig,

    catalog: Arc<ReferenceCatalog>,
    exporters: ExporterRegistry,
}

impl Toolbox {
    /// Creates a toolbox backed by the process-wide catalog.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ToolboxError::DataUnavailable`] if no candidate
    /// reference table can be loaded.
    pub fn new(config: ToolboxConfig) -> Result<Self> {
        let catalog = ReferenceCatalog::shared(&config.catalog_candidates())?;
        Ok(Self::with_catalog(config, catalog))
    }

    /// Creates a toolbox over an already loaded catalog.
    pub fn with_catalog(config: ToolboxConfig, catalog: Arc<ReferenceCatalog>) -> Self {
        let exporters = ExporterRegistry::detect(&config);
        Self {
            config,
            catalog,
            exporters,
        }
    }

    pub fn catalog(&self) -> &ReferenceCatalog {
        &self.catalog
    }

    /// Export formats with their availability in this build.
    pub fn capabilities(&self) -> Vec<(ExportFormat, bool)> {
        self.exporters.capabilities()
    }

    pub fn is_available(&self, format: ExportFormat) -> bool {
        self.exporters.is_available(format)
    }

    /// Assembles the ordered task list for `session`.
    pub fn plan(&self, session: &Session) -> Vec<PlanTask> {
        assemble(&session.selection, &self.catalog)
    }

    /// Produces one artifact for `session` in memory.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ToolboxError::ExporterUnavailable`] or
    /// [`crate::ToolboxError::ExportFailed`].
    #[tracing::instrument(skip(self, session), fields(tasks))]
    pub fn export(&self, session: &Session, format: ExportFormat) -> Result<ExportArtifact> {
        let tasks = self.plan(session);
        tracing::Span::current().record("tasks", tasks.len());
        self.exporters.export(format, &tasks, &session.metadata)
    }

    /// Exports every format in `formats` into `dir`.
    ///
    /// Each format succeeds or fails on its own; a failed format is logged
    /// and reported in its slot without stopping the others.
    pub fn export_to_dir(
        &self,
        session: &Session,
        formats: &[ExportFormat],
        dir: &Path,
    ) -> Vec<(ExportFormat, Result<PathBuf>)> {
        formats
            .iter()
            .map(|&format| {
                let result = self
                    .export(session, format)
                    .and_then(|artifact| write_artifact(dir, &artifact));
                if let Err(e) = &result {
                    tracing::error!(format = %format, error = %e, "export failed");
                }
                (format, result)
            })
            .collect()
    }

    /// Configured formats that can run in this build, in configured order.
    pub fn enabled_formats(&self) -> Vec<ExportFormat> {
        self.config
            .export
            .formats
            .iter()
            .copied()
            .filter(|f| self.is_available(*f))
            .collect()
    }

    /// Exports every enabled format into the configured output directory.
    pub fn export_all(&self, session: &Session) -> Vec<(ExportFormat, Result<PathBuf>)> {
        self.export_to_dir(session, &self.enabled_formats(), &self.config.output_dir())
    }
}
