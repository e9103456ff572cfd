//! Per-session tool selections, keyed by PDCA phase.

use crate::phase::Phase;

/// Ordered, duplicate-free tool selections for each PDCA phase.
///
/// Each phase holds its own list; the same tool name may be selected under
/// several phases at once. Order is the order in which the selection
/// control submitted the names and is carried through to the plan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    phases: [Vec<String>; 4],
}

impl SelectionState {
    /// Creates a state with every phase empty.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole selection for `phase`.
    ///
    /// Repeated names keep their first position. Partial updates are not
    /// supported; pass the complete desired set.
    pub fn select<I, S>(&mut self, phase: Phase, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for name in names {
            let name = name.into();
            if !unique.contains(&name) {
                unique.push(name);
            }
        }
        self.phases[phase.index()] = unique;
    }

    /// Returns the selected tool names for `phase`, in selection order.
    pub fn get(&self, phase: Phase) -> &[String] {
        &self.phases[phase.index()]
    }

    /// Returns whether `name` is selected under `phase`.
    pub fn contains(&self, phase: Phase, name: &str) -> bool {
        self.get(phase).iter().any(|n| n == name)
    }

    /// Adds `name` to the end of `phase` if absent, removes it otherwise.
    ///
    /// Returns `true` if the tool is selected afterwards.
    pub fn toggle(&mut self, phase: Phase, name: &str) -> bool {
        let current = self.get(phase);
        let selected = !current.iter().any(|n| n == name);
        let next: Vec<String> = if selected {
            current.iter().cloned().chain([name.to_string()]).collect()
        } else {
            current.iter().filter(|n| *n != name).cloned().collect()
        };
        self.select(phase, next);
        selected
    }

    /// Total number of selections across all phases.
    pub fn total(&self) -> usize {
        self.phases.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Iterates phases in cycle order with their selections.
    pub fn iter(&self) -> impl Iterator<Item = (Phase, &[String])> {
        Phase::ALL.into_iter().map(|phase| (phase, self.get(phase)))
    }
}
