//! Context structures for report rendering.

use serde::Serialize;

/// Data handed to the project report template.
///
/// Every text field is rendered verbatim; empty fields are shown by the
/// template as a blank line to fill in by hand.
///
/// # Examples
///
/// ```
/// use pdca_report::{PhaseGroup, ReportContext};
///
/// let context = ReportContext::new("ONE TEAM PDCA Project Report")
///     .with_project_name("Line 4 scrap")
///     .with_project_owner("A. Rivera")
///     .with_phase(PhaseGroup::new("Plan").with_task("5 Whys", "Root cause analysis"));
/// assert_eq!(context.phases.len(), 1);
/// ```
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReportContext {
    /// Report heading.
    pub title: String,
    pub project_name: String,
    pub project_owner: String,
    pub start_date: String,
    pub end_date: String,
    pub created_date: String,
    pub objective: String,
    pub milestones: String,
    pub cost_savings: String,
    pub next_steps: String,

    /// Selected tools grouped by phase, in phase order. Phases without
    /// selections are omitted.
    pub phases: Vec<PhaseGroup>,
}

/// Tools selected for one phase.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PhaseGroup {
    pub name: String,
    pub tasks: Vec<TaskLine>,
}

/// A single tool row in the report.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TaskLine {
    pub name: String,
    pub description: String,
}

impl PhaseGroup {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tasks: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_task(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.tasks.push(TaskLine {
            name: name.into(),
            description: description.into(),
        });
        self
    }
}

impl ReportContext {
    /// Creates an empty context with the given heading.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_project_name(mut self, name: impl Into<String>) -> Self {
        self.project_name = name.into();
        self
    }

    #[must_use]
    pub fn with_project_owner(mut self, owner: impl Into<String>) -> Self {
        self.project_owner = owner.into();
        self
    }

    /// Sets the start and end dates shown on the schedule line.
    #[must_use]
    pub fn with_dates(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.start_date = start.into();
        self.end_date = end.into();
        self
    }

    #[must_use]
    pub fn with_created_date(mut self, created: impl Into<String>) -> Self {
        self.created_date = created.into();
        self
    }

    #[must_use]
    pub fn with_objective(mut self, objective: impl Into<String>) -> Self {
        self.objective = objective.into();
        self
    }

    #[must_use]
    pub fn with_milestones(mut self, milestones: impl Into<String>) -> Self {
        self.milestones = milestones.into();
        self
    }

    #[must_use]
    pub fn with_cost_savings(mut self, cost_savings: impl Into<String>) -> Self {
        self.cost_savings = cost_savings.into();
        self
    }

    #[must_use]
    pub fn with_next_steps(mut self, next_steps: impl Into<String>) -> Self {
        self.next_steps = next_steps.into();
        self
    }

    /// Appends a phase group. Groups without tasks are dropped.
    #[must_use]
    pub fn with_phase(mut self, group: PhaseGroup) -> Self {
        if !group.tasks.is_empty() {
            self.phases.push(group);
        }
        self
    }
}
