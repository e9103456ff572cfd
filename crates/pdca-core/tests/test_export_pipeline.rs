//! End-to-end tests: session file to exported artifacts on disk.

use chrono::NaiveDate;
use pdca_core::{
    ExportFormat, MetadataField, Phase, ReferenceCatalog, Session, Toolbox, ToolboxConfig,
    ToolboxError,
};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

const CATALOG: &str = "Tool Name,Tool Description,PDCA Category\n\
5 Whys,Root cause analysis,Plan\n\
Kaizen,Continuous small changes,Do\n\
Pareto,Rank causes by impact,Check\n\
Pareto,Compare before and after,Act\n";

const SESSION: &str = r#"
[project]
project_name = "Line 4 scrap"
project_owner = "A. Rivera"
created_date = "01-10-2026"

[selection]
Act = ["Pareto"]
Plan = ["5 Whys", "Gemba"]
Do = ["Kaizen", "Kaizen"]
"#;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
}

fn toolbox(root: &Path) -> Toolbox {
    let catalog = ReferenceCatalog::from_reader(CATALOG.as_bytes()).unwrap();
    Toolbox::with_catalog(ToolboxConfig::new(root.to_path_buf()), Arc::new(catalog))
}

#[test]
fn test_session_file_to_plan() {
    let temp_dir = TempDir::new().unwrap();
    let toolbox = toolbox(temp_dir.path());
    let session = Session::from_toml_str(SESSION, today()).unwrap();

    let tasks = toolbox.plan(&session);
    let rows: Vec<_> = tasks
        .iter()
        .map(|t| (t.phase, t.task_name.as_str(), t.description.as_str()))
        .collect();
    assert_eq!(
        rows,
        [
            (Phase::Plan, "5 Whys", "Root cause analysis"),
            (Phase::Plan, "Gemba", ""),
            (Phase::Do, "Kaizen", "Continuous small changes"),
            (Phase::Act, "Pareto", "Compare before and after"),
        ]
    );
    assert_eq!(
        session.metadata.get(MetadataField::CreatedDate),
        "01-10-2026"
    );
}

#[test]
fn test_export_all_formats_to_disk() {
    let temp_dir = TempDir::new().unwrap();
    let toolbox = toolbox(temp_dir.path());
    let session = Session::from_toml_str(SESSION, today()).unwrap();
    let out = temp_dir.path().join("out");

    let results = toolbox.export_to_dir(&session, &toolbox.enabled_formats(), &out);
    assert!(results.iter().all(|(_, r)| r.is_ok()));

    let csv = fs::read(out.join("Project_Plan.csv")).unwrap();
    assert!(csv.starts_with(b"\xEF\xBB\xBFPDCA Phase,Task Name,Description"));

    let tsv = fs::read_to_string(out.join("Project_Plan.txt")).unwrap();
    let lines: Vec<_> = tsv.lines().collect();
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[2], "Plan\tGemba\t");

    let report = fs::read_to_string(out.join("Project_Report.md")).unwrap();
    assert!(report.contains("Line 4 scrap"));
    assert!(report.contains("### Act"));
    assert!(!report.contains("### Check"));

    if cfg!(feature = "xlsx") {
        assert!(fs::read(out.join("Project_Plan.xlsx")).unwrap().starts_with(b"PK"));
    }
    if cfg!(feature = "pdf") {
        assert!(fs::read(out.join("Project_Plan.pdf")).unwrap().starts_with(b"%PDF"));
    }
}

#[test]
fn test_empty_selection_still_exports() {
    let temp_dir = TempDir::new().unwrap();
    let toolbox = toolbox(temp_dir.path());
    let session = Session::new(today());

    let artifact = toolbox.export(&session, ExportFormat::Tsv).unwrap();
    assert_eq!(
        String::from_utf8(artifact.bytes).unwrap(),
        "PDCA Phase\tTask Name\tDescription\n"
    );

    let report = toolbox.export(&session, ExportFormat::Markdown).unwrap();
    assert!(String::from_utf8(report.bytes).unwrap().contains("_No tasks selected._"));
}

#[test]
fn test_session_rejects_unknown_keys() {
    let phase = Session::from_toml_str("[selection]\nPlanning = [\"5 Whys\"]\n", today());
    assert!(matches!(phase, Err(ToolboxError::UnknownPhase(_))));

    let field = Session::from_toml_str("[project]\nbudget = \"10k\"\n", today());
    assert!(matches!(field, Err(ToolboxError::UnknownField(_))));
}
