//! PDCA phase enumeration.

use crate::error::ToolboxError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// One of the four phases of a Plan-Do-Check-Act cycle.
///
/// The set is closed: every tool record, selection and plan task carries
/// exactly one of these. Ordering follows the cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Phase {
    /// Define the problem and plan the change.
    Plan,

    /// Carry out the change on a small scale.
    Do,

    /// Measure the results against the plan.
    Check,

    /// Standardize or adjust.
    Act,
}

impl Phase {
    /// All phases in cycle order.
    pub const ALL: [Phase; 4] = [Phase::Plan, Phase::Do, Phase::Check, Phase::Act];

    /// Returns the canonical name, as it appears in the `PDCA Category`
    /// column and in every export.
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Plan => "Plan",
            Phase::Do => "Do",
            Phase::Check => "Check",
            Phase::Act => "Act",
        }
    }

    /// Position in [`Phase::ALL`].
    pub fn index(&self) -> usize {
        match self {
            Phase::Plan => 0,
            Phase::Do => 1,
            Phase::Check => 2,
            Phase::Act => 3,
        }
    }

    /// Heading color used for this phase in rendered documents.
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            Phase::Plan => (243, 124, 42),
            Phase::Do => (45, 190, 156),
            Phase::Check => (165, 216, 208),
            Phase::Act => (30, 76, 72),
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Phase {
    type Err = ToolboxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Plan" => Ok(Phase::Plan),
            "Do" => Ok(Phase::Do),
            "Check" => Ok(Phase::Check),
            "Act" => Ok(Phase::Act),
            _ => Err(ToolboxError::UnknownPhase(s.to_string())),
        }
    }
}
