//! Markdown project report rendered through `pdca-report`.

use super::{ExportArtifact, ExportFormat, Exporter};
use crate::error::{Result, ToolboxError};
use crate::metadata::{MetadataField, ProjectMetadata};
use crate::phase::Phase;
use crate::plan::PlanTask;
use pdca_report::{PhaseGroup, ReportContext, ReportEngine, ReportManager};
use std::path::PathBuf;

/// Template rendered for the report.
pub const REPORT_TEMPLATE: &str = "project_report";

/// Heading of the rendered report.
pub const REPORT_TITLE: &str = "PDCA Project Report";

/// Fill-in project report grouped by phase.
#[derive(Debug)]
pub struct MarkdownReportExporter {
    manager: Option<ReportManager>,
}

impl MarkdownReportExporter {
    pub fn new(manager: ReportManager) -> Self {
        Self {
            manager: Some(manager),
        }
    }

    /// Uses the first directory holding `project_report.j2`, otherwise the
    /// bundled template.
    ///
    /// A template set that cannot be loaded leaves the exporter unavailable.
    pub fn discover(dirs: &[PathBuf]) -> Self {
        let file = format!("{REPORT_TEMPLATE}.j2");
        let manager = match dirs.iter().find(|dir| dir.join(&file).is_file()) {
            Some(dir) => {
                tracing::debug!(dir = %dir.display(), "using report template override");
                ReportManager::new(dir.clone())
            }
            None => ReportManager::bundled(),
        };

        match manager {
            Ok(manager) => Self::new(manager),
            Err(e) => {
                tracing::warn!(error = %e, "report templates unavailable");
                Self { manager: None }
            }
        }
    }
}

/// Maps the plan and metadata onto the report template context.
pub fn build_context(tasks: &[PlanTask], metadata: &ProjectMetadata) -> ReportContext {
    let mut context = ReportContext::new(REPORT_TITLE)
        .with_project_name(metadata.get(MetadataField::ProjectName))
        .with_project_owner(metadata.get(MetadataField::ProjectOwner))
        .with_dates(
            metadata.get(MetadataField::StartDate),
            metadata.get(MetadataField::EndDate),
        )
        .with_created_date(metadata.get(MetadataField::CreatedDate))
        .with_objective(metadata.get(MetadataField::ProjectObjective))
        .with_milestones(metadata.get(MetadataField::ProjectMilestones))
        .with_cost_savings(metadata.get(MetadataField::ProjectCostSavings))
        .with_next_steps(metadata.get(MetadataField::NextSteps));

    for phase in Phase::ALL {
        let group = tasks
            .iter()
            .filter(|t| t.phase == phase)
            .fold(PhaseGroup::new(phase.as_str()), |group, task| {
                group.with_task(&task.task_name, &task.description)
            });
        context = context.with_phase(group);
    }

    context
}

impl Exporter for MarkdownReportExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Markdown
    }

    fn is_available(&self) -> bool {
        self.manager.is_some()
    }

    fn export(&self, tasks: &[PlanTask], metadata: &ProjectMetadata) -> Result<ExportArtifact> {
        let manager = self
            .manager
            .as_ref()
            .ok_or(ToolboxError::ExporterUnavailable(ExportFormat::Markdown))?;
        let report = manager.render(REPORT_TEMPLATE, &build_context(tasks, metadata))?;
        Ok(ExportArtifact::new(ExportFormat::Markdown, report.into_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn sample() -> (Vec<PlanTask>, ProjectMetadata) {
        let tasks = vec![
            PlanTask::new(Phase::Plan, "5 Whys", "Root cause analysis"),
            PlanTask::new(Phase::Act, "Standard Work", "Lock in the new method"),
            PlanTask::new(Phase::Plan, "Fishbone", "Cause categories"),
        ];
        let mut metadata = ProjectMetadata::new();
        metadata.set(MetadataField::ProjectName, "Line 4 scrap");
        metadata.set(MetadataField::CreatedDate, "17-10-2026");
        (tasks, metadata)
    }

    #[test]
    fn test_should_group_tasks_in_phase_order() {
        let (tasks, metadata) = sample();
        let context = build_context(&tasks, &metadata);

        let names: Vec<_> = context.phases.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, ["Plan", "Act"]);
        let plan: Vec<_> = context.phases[0].tasks.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(plan, ["5 Whys", "Fishbone"]);
        assert_eq!(context.project_name, "Line 4 scrap");
        assert_eq!(context.created_date, "17-10-2026");
    }

    #[test]
    fn test_should_render_bundled_report() {
        let (tasks, metadata) = sample();
        let exporter = MarkdownReportExporter::discover(&[]);
        assert!(exporter.is_available());

        let artifact = exporter.export(&tasks, &metadata).unwrap();
        assert_eq!(artifact.filename, "Project_Report.md");
        let text = String::from_utf8(artifact.bytes).unwrap();
        assert!(text.starts_with("# PDCA Project Report"));
        assert!(text.contains("### Plan"));
        assert!(text.contains("| Fishbone | Cause categories |"));
        assert!(!text.contains("### Do"));
    }

    #[test]
    fn test_should_prefer_template_override() {
        let empty = TempDir::new().unwrap();
        let custom = TempDir::new().unwrap();
        fs::write(
            custom.path().join("project_report.j2"),
            "{{ project_name }}{% for p in phases %};{{ p.name }}{% endfor %}",
        )
        .unwrap();

        let (tasks, metadata) = sample();
        let exporter = MarkdownReportExporter::discover(&[
            empty.path().to_path_buf(),
            custom.path().to_path_buf(),
        ]);
        let artifact = exporter.export(&tasks, &metadata).unwrap();
        assert_eq!(artifact.bytes, b"Line 4 scrap;Plan;Act");
    }
}
