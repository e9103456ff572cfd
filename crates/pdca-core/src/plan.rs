//! Plan assembly: joining selections against the reference catalog.

use crate::catalog::ReferenceCatalog;
use crate::phase::Phase;
use crate::selection::SelectionState;

/// One row of the exported project plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanTask {
    pub phase: Phase,
    pub task_name: String,
    /// Catalog description, empty when the tool is not in the catalog for
    /// this phase.
    pub description: String,
}

impl PlanTask {
    pub fn new(phase: Phase, task_name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            phase,
            task_name: task_name.into(),
            description: description.into(),
        }
    }
}

/// Builds the ordered task list for the current selections.
///
/// Tasks are ordered by phase (Plan, Do, Check, Act), then by selection
/// order within the phase. A tool missing from the catalog under its phase
/// still produces a task, with an empty description.
pub fn assemble(selection: &SelectionState, catalog: &ReferenceCatalog) -> Vec<PlanTask> {
    let mut tasks = Vec::with_capacity(selection.total());

    for (phase, names) in selection.iter() {
        for name in names {
            let description = match catalog.find(phase, name) {
                Some(record) => record.description.clone(),
                None => {
                    tracing::debug!(tool = %name, phase = %phase, "tool not in catalog for phase");
                    String::new()
                }
            };
            tasks.push(PlanTask::new(phase, name.clone(), description));
        }
    }

    tasks
}
