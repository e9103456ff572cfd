//! Free-text project metadata.

use crate::error::ToolboxError;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Format of `created_date`.
pub const CREATED_DATE_FORMAT: &str = "%d-%m-%Y";

/// Keys of the project metadata record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetadataField {
    ProjectName,
    ProjectOwner,
    StartDate,
    EndDate,
    ProjectObjective,
    ProjectMilestones,
    ProjectCostSavings,
    NextSteps,
    CreatedDate,
}

impl MetadataField {
    /// Every field, in form order.
    pub const ALL: [MetadataField; 9] = [
        MetadataField::ProjectName,
        MetadataField::ProjectOwner,
        MetadataField::StartDate,
        MetadataField::EndDate,
        MetadataField::ProjectObjective,
        MetadataField::ProjectMilestones,
        MetadataField::ProjectCostSavings,
        MetadataField::NextSteps,
        MetadataField::CreatedDate,
    ];

    /// Key used in session files.
    pub fn as_str(&self) -> &'static str {
        match self {
            MetadataField::ProjectName => "project_name",
            MetadataField::ProjectOwner => "project_owner",
            MetadataField::StartDate => "start_date",
            MetadataField::EndDate => "end_date",
            MetadataField::ProjectObjective => "project_objective",
            MetadataField::ProjectMilestones => "project_milestones",
            MetadataField::ProjectCostSavings => "project_cost_savings",
            MetadataField::NextSteps => "next_steps",
            MetadataField::CreatedDate => "created_date",
        }
    }

    /// Form label.
    pub fn label(&self) -> &'static str {
        match self {
            MetadataField::ProjectName => "Project Name",
            MetadataField::ProjectOwner => "Project Owner",
            MetadataField::StartDate => "Start Date",
            MetadataField::EndDate => "End Date",
            MetadataField::ProjectObjective => "Project Objective",
            MetadataField::ProjectMilestones => "Milestones",
            MetadataField::ProjectCostSavings => "Estimated Cost / Projected Savings",
            MetadataField::NextSteps => "Next Steps / Action Plan",
            MetadataField::CreatedDate => "Created",
        }
    }
}

impl fmt::Display for MetadataField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetadataField {
    type Err = ToolboxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MetadataField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| ToolboxError::UnknownField(s.to_string()))
    }
}

/// Project metadata entered alongside the tool selections.
///
/// Values are stored verbatim and overwritten on every edit. Reading an
/// unset field yields the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectMetadata {
    values: HashMap<MetadataField, String>,
}

impl ProjectMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites `field` with `value`.
    ///
    /// `created_date` is fixed once present; later writes to it are ignored.
    pub fn set(&mut self, field: MetadataField, value: impl Into<String>) {
        if field == MetadataField::CreatedDate && self.values.contains_key(&field) {
            tracing::debug!("ignoring overwrite of created_date");
            return;
        }
        self.values.insert(field, value.into());
    }

    /// Returns the value of `field`, or `""` if it was never set.
    pub fn get(&self, field: MetadataField) -> &str {
        self.values.get(&field).map(String::as_str).unwrap_or("")
    }

    /// Sets `created_date` to `today` (`DD-MM-YYYY`) unless already set.
    pub fn ensure_created_date(&mut self, today: NaiveDate) {
        self.values
            .entry(MetadataField::CreatedDate)
            .or_insert_with(|| today.format(CREATED_DATE_FORMAT).to_string());
    }
}
