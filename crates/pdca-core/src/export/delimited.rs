//! Comma- and tab-separated plan exports.

use super::{ExportArtifact, ExportFormat, Exporter, PLAN_COLUMNS};
use crate::error::{Result, ToolboxError};
use crate::metadata::ProjectMetadata;
use crate::plan::PlanTask;

/// UTF-8 signature so spreadsheet tools detect the encoding.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// CSV export: header row plus one row per task, UTF-8 with BOM.
#[derive(Debug, Default, Clone, Copy)]
pub struct DelimitedTextExporter;

/// Tab-separated text export: same columns as CSV, no BOM.
#[derive(Debug, Default, Clone, Copy)]
pub struct TabTextExporter;

impl Exporter for DelimitedTextExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Csv
    }

    fn export(&self, tasks: &[PlanTask], _metadata: &ProjectMetadata) -> Result<ExportArtifact> {
        let bytes = write_rows(tasks, b',', UTF8_BOM.to_vec(), ExportFormat::Csv)?;
        Ok(ExportArtifact::new(ExportFormat::Csv, bytes))
    }
}

impl Exporter for TabTextExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Tsv
    }

    fn export(&self, tasks: &[PlanTask], _metadata: &ProjectMetadata) -> Result<ExportArtifact> {
        let bytes = write_rows(tasks, b'\t', Vec::new(), ExportFormat::Tsv)?;
        Ok(ExportArtifact::new(ExportFormat::Tsv, bytes))
    }
}

fn write_rows(
    tasks: &[PlanTask],
    delimiter: u8,
    buffer: Vec<u8>,
    format: ExportFormat,
) -> Result<Vec<u8>> {
    let failed = |reason: String| ToolboxError::ExportFailed { format, reason };

    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(buffer);

    writer
        .write_record(PLAN_COLUMNS)
        .map_err(|e| failed(e.to_string()))?;
    for task in tasks {
        writer
            .write_record([
                task.phase.as_str(),
                task.task_name.as_str(),
                task.description.as_str(),
            ])
            .map_err(|e| failed(e.to_string()))?;
    }

    writer.into_inner().map_err(|e| failed(e.error().to_string()))
}
