//! Excel workbook export, backed by `rust_xlsxwriter` when the `xlsx`
//! feature is enabled.

use super::{ExportArtifact, ExportFormat, Exporter};
use crate::error::Result;
use crate::metadata::ProjectMetadata;
use crate::plan::PlanTask;

/// Name of the single worksheet.
pub const SHEET_NAME: &str = "Project Plan";

/// Single-sheet workbook with the plan columns.
#[derive(Debug, Default, Clone, Copy)]
pub struct SpreadsheetExporter;

impl Exporter for SpreadsheetExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Xlsx
    }

    fn is_available(&self) -> bool {
        cfg!(feature = "xlsx")
    }

    fn export(&self, tasks: &[PlanTask], _metadata: &ProjectMetadata) -> Result<ExportArtifact> {
        let bytes = write_workbook(tasks)?;
        Ok(ExportArtifact::new(ExportFormat::Xlsx, bytes))
    }
}

#[cfg(feature = "xlsx")]
fn write_workbook(tasks: &[PlanTask]) -> Result<Vec<u8>> {
    build_workbook(tasks).map_err(|e| crate::error::ToolboxError::ExportFailed {
        format: ExportFormat::Xlsx,
        reason: e.to_string(),
    })
}

#[cfg(not(feature = "xlsx"))]
fn write_workbook(_tasks: &[PlanTask]) -> Result<Vec<u8>> {
    Err(crate::error::ToolboxError::ExporterUnavailable(
        ExportFormat::Xlsx,
    ))
}

#[cfg(feature = "xlsx")]
fn build_workbook(tasks: &[PlanTask]) -> std::result::Result<Vec<u8>, rust_xlsxwriter::XlsxError> {
    use super::PLAN_COLUMNS;
    use rust_xlsxwriter::{Format, Workbook};

    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, title) in PLAN_COLUMNS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *title, &header)?;
    }

    for (index, task) in tasks.iter().enumerate() {
        let row = index as u32 + 1;
        sheet.write_string(row, 0, task.phase.as_str())?;
        sheet.write_string(row, 1, &task.task_name)?;
        sheet.write_string(row, 2, &task.description)?;
    }

    sheet.set_column_width(0, 12.0)?;
    sheet.set_column_width(1, 30.0)?;
    sheet.set_column_width(2, 80.0)?;

    workbook.save_to_buffer()
}

#[cfg(test)]
mod tests {
    use super::*;
    #[cfg(feature = "xlsx")]
    use crate::export::PLAN_COLUMNS;
    use crate::phase::Phase;

    #[cfg(feature = "xlsx")]
    fn read_rows(bytes: &[u8]) -> (Vec<String>, Vec<Vec<String>>) {
        use calamine::{Reader, Xlsx, open_workbook_from_rs};

        let mut workbook: Xlsx<_> =
            open_workbook_from_rs(std::io::Cursor::new(bytes.to_vec())).unwrap();
        let sheets = workbook.sheet_names();
        let range = workbook.worksheet_range(SHEET_NAME).unwrap();
        let rows = range
            .rows()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect();
        (sheets, rows)
    }

    #[cfg(feature = "xlsx")]
    #[test]
    fn test_should_write_zip_workbook() {
        let tasks = vec![
            PlanTask::new(Phase::Plan, "5 Whys", "Root cause analysis"),
            PlanTask::new(Phase::Do, "Kaizen", "Petits changements continus, café"),
        ];
        let artifact = SpreadsheetExporter
            .export(&tasks, &ProjectMetadata::new())
            .unwrap();

        assert_eq!(artifact.filename, "Project_Plan.xlsx");
        assert!(artifact.bytes.starts_with(b"PK"));

        let (sheets, rows) = read_rows(&artifact.bytes);
        assert_eq!(sheets, [SHEET_NAME]);
        assert_eq!(
            rows,
            [
                PLAN_COLUMNS.to_vec(),
                vec!["Plan", "5 Whys", "Root cause analysis"],
                vec!["Do", "Kaizen", "Petits changements continus, café"],
            ]
        );
    }

    #[cfg(feature = "xlsx")]
    #[test]
    fn test_should_write_header_only_workbook() {
        let artifact = SpreadsheetExporter
            .export(&[], &ProjectMetadata::new())
            .unwrap();
        assert!(artifact.bytes.starts_with(b"PK"));

        let (sheets, rows) = read_rows(&artifact.bytes);
        assert_eq!(sheets, [SHEET_NAME]);
        assert_eq!(rows, [PLAN_COLUMNS.to_vec()]);
    }

    #[cfg(not(feature = "xlsx"))]
    #[test]
    fn test_should_report_unavailable() {
        assert!(!SpreadsheetExporter.is_available());
        let result = SpreadsheetExporter.export(
            &[PlanTask::new(Phase::Plan, "5 Whys", "")],
            &ProjectMetadata::new(),
        );
        assert!(matches!(
            result,
            Err(crate::error::ToolboxError::ExporterUnavailable(
                ExportFormat::Xlsx
            ))
        ));
    }
}
