//! Report exporters and the registry that tracks which ones can run.
//!
//! Every exporter is a stateless function from the assembled plan and the
//! project metadata to an in-memory artifact. Exporters backed by optional
//! writer crates report their availability up front so callers can disable
//! the option instead of failing at click time.

pub mod delimited;
pub mod document;
pub mod markdown;
pub mod spreadsheet;

use crate::config::ToolboxConfig;
use crate::error::{Result, ToolboxError};
use crate::metadata::ProjectMetadata;
use crate::plan::PlanTask;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use delimited::{DelimitedTextExporter, TabTextExporter};
pub use document::{DocumentExporter, DocumentSettings};
pub use markdown::MarkdownReportExporter;
pub use spreadsheet::SpreadsheetExporter;

/// Column titles shared by the tabular exports.
pub const PLAN_COLUMNS: [&str; 3] = ["PDCA Phase", "Task Name", "Description"];

/// Output formats for a project plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Tsv,
    Xlsx,
    Pdf,
    #[serde(alias = "md")]
    Markdown,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 5] = [
        ExportFormat::Csv,
        ExportFormat::Tsv,
        ExportFormat::Xlsx,
        ExportFormat::Pdf,
        ExportFormat::Markdown,
    ];

    /// Short key used in config files and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Tsv => "tsv",
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Markdown => "markdown",
        }
    }

    /// Fixed download filename.
    pub fn filename(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "Project_Plan.csv",
            ExportFormat::Tsv => "Project_Plan.txt",
            ExportFormat::Xlsx => "Project_Plan.xlsx",
            ExportFormat::Pdf => "Project_Plan.pdf",
            ExportFormat::Markdown => "Project_Report.md",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Tsv => "text/plain",
            ExportFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Markdown => "text/markdown",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ExportFormat::Csv => "CSV",
            ExportFormat::Tsv => "Text",
            ExportFormat::Xlsx => "Excel",
            ExportFormat::Pdf => "PDF",
            ExportFormat::Markdown => "Markdown report",
        };
        f.write_str(label)
    }
}

impl FromStr for ExportFormat {
    type Err = ToolboxError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "csv" => Ok(ExportFormat::Csv),
            "tsv" | "txt" => Ok(ExportFormat::Tsv),
            "xlsx" => Ok(ExportFormat::Xlsx),
            "pdf" => Ok(ExportFormat::Pdf),
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            _ => Err(ToolboxError::UnknownFormat(s.to_string())),
        }
    }
}

/// A generated file held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub format: ExportFormat,
    pub filename: &'static str,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    pub fn new(format: ExportFormat, bytes: Vec<u8>) -> Self {
        Self {
            format,
            filename: format.filename(),
            mime_type: format.mime_type(),
            bytes,
        }
    }
}

/// A serializer for the assembled project plan.
pub trait Exporter {
    /// The format this exporter produces.
    fn format(&self) -> ExportFormat;

    /// Whether the exporter can run in this build.
    fn is_available(&self) -> bool {
        true
    }

    /// Serializes `tasks` and `metadata` into an artifact.
    ///
    /// An empty `tasks` slice still yields a complete, openable file.
    ///
    /// # Errors
    ///
    /// Returns [`ToolboxError::ExporterUnavailable`] when the backing writer
    /// is not compiled in, or [`ToolboxError::ExportFailed`] when it fails.
    fn export(&self, tasks: &[PlanTask], metadata: &ProjectMetadata) -> Result<ExportArtifact>;
}

/// Registry of exporters with availability resolved once at construction.
pub struct ExporterRegistry {
    exporters: Vec<Box<dyn Exporter>>,
    available: Vec<ExportFormat>,
}

impl ExporterRegistry {
    /// Creates a registry from explicit exporters and records which of them
    /// can run.
    pub fn new(exporters: Vec<Box<dyn Exporter>>) -> Self {
        let mut available = Vec::new();
        for exporter in &exporters {
            if exporter.is_available() {
                available.push(exporter.format());
            } else {
                tracing::warn!(format = %exporter.format(), "exporter unavailable in this build");
            }
        }
        Self {
            exporters,
            available,
        }
    }

    /// Builds the standard exporter set for `config`.
    pub fn detect(config: &ToolboxConfig) -> Self {
        Self::new(vec![
            Box::new(DelimitedTextExporter),
            Box::new(TabTextExporter),
            Box::new(SpreadsheetExporter),
            Box::new(DocumentExporter::new(config.document.clone())),
            Box::new(MarkdownReportExporter::discover(&config.template_dirs())),
        ])
    }

    /// Every registered format with its availability, in registration order.
    pub fn capabilities(&self) -> Vec<(ExportFormat, bool)> {
        self.exporters
            .iter()
            .map(|e| (e.format(), self.is_available(e.format())))
            .collect()
    }

    pub fn is_available(&self, format: ExportFormat) -> bool {
        self.available.contains(&format)
    }

    /// Runs the exporter for `format`.
    ///
    /// # Errors
    ///
    /// Returns [`ToolboxError::ExporterUnavailable`] if the format is not
    /// registered or cannot run, otherwise whatever the exporter returns.
    pub fn export(
        &self,
        format: ExportFormat,
        tasks: &[PlanTask],
        metadata: &ProjectMetadata,
    ) -> Result<ExportArtifact> {
        if !self.is_available(format) {
            return Err(ToolboxError::ExporterUnavailable(format));
        }
        let exporter = self
            .exporters
            .iter()
            .find(|e| e.format() == format)
            .ok_or(ToolboxError::ExporterUnavailable(format))?;
        exporter.export(tasks, metadata)
    }
}

impl fmt::Debug for ExporterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExporterRegistry")
            .field("exporters", &self.exporters.len())
            .field("available", &self.available)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phase::Phase;

    struct Broken;

    impl Exporter for Broken {
        fn format(&self) -> ExportFormat {
            ExportFormat::Pdf
        }

        fn is_available(&self) -> bool {
            false
        }

        fn export(&self, _: &[PlanTask], _: &ProjectMetadata) -> Result<ExportArtifact> {
            panic!("unavailable exporter must not be called");
        }
    }

    #[test]
    fn test_should_map_formats_to_fixed_files() {
        assert_eq!(ExportFormat::Csv.filename(), "Project_Plan.csv");
        assert_eq!(ExportFormat::Tsv.filename(), "Project_Plan.txt");
        assert_eq!(ExportFormat::Xlsx.filename(), "Project_Plan.xlsx");
        assert_eq!(ExportFormat::Pdf.filename(), "Project_Plan.pdf");
        assert_eq!(ExportFormat::Tsv.mime_type(), "text/plain");
        assert_eq!(ExportFormat::Pdf.mime_type(), "application/pdf");
    }

    #[test]
    fn test_should_parse_format_keys() {
        for format in ExportFormat::ALL {
            assert_eq!(format.as_str().parse::<ExportFormat>().unwrap(), format);
        }
        assert_eq!("md".parse::<ExportFormat>().unwrap(), ExportFormat::Markdown);
        assert!(matches!(
            "docx".parse::<ExportFormat>(),
            Err(ToolboxError::UnknownFormat(name)) if name == "docx"
        ));
    }

    #[test]
    fn test_should_contain_unavailable_exporter() {
        let registry = ExporterRegistry::new(vec![Box::new(DelimitedTextExporter), Box::new(Broken)]);
        let tasks = vec![PlanTask::new(Phase::Plan, "5 Whys", "Root cause analysis")];
        let metadata = ProjectMetadata::new();

        assert_eq!(
            registry.capabilities(),
            vec![(ExportFormat::Csv, true), (ExportFormat::Pdf, false)]
        );
        assert!(matches!(
            registry.export(ExportFormat::Pdf, &tasks, &metadata),
            Err(ToolboxError::ExporterUnavailable(ExportFormat::Pdf))
        ));
        assert!(registry.export(ExportFormat::Csv, &tasks, &metadata).is_ok());
        assert!(matches!(
            registry.export(ExportFormat::Tsv, &tasks, &metadata),
            Err(ToolboxError::ExporterUnavailable(ExportFormat::Tsv))
        ));
    }

    #[test]
    fn test_should_detect_standard_set() {
        let config = ToolboxConfig::new(std::path::PathBuf::from("/nonexistent"));
        let registry = ExporterRegistry::detect(&config);
        let formats: Vec<_> = registry.capabilities().into_iter().map(|(f, _)| f).collect();
        assert_eq!(formats, ExportFormat::ALL);
        assert!(registry.is_available(ExportFormat::Csv));
        assert!(registry.is_available(ExportFormat::Tsv));
        assert!(registry.is_available(ExportFormat::Markdown));
        assert_eq!(
            registry.is_available(ExportFormat::Xlsx),
            cfg!(feature = "xlsx")
        );
        assert_eq!(registry.is_available(ExportFormat::Pdf), cfg!(feature = "pdf"));
    }
}
