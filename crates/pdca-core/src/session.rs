//! Session-scoped context: the selections and metadata of one user.

use crate::error::{Result, ToolboxError};
use crate::metadata::{MetadataField, ProjectMetadata};
use crate::phase::Phase;
use crate::selection::SelectionState;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Everything one user has entered so far.
///
/// A session is owned by exactly one caller and passed explicitly to the
/// plan and export pipeline; nothing is shared between sessions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub selection: SelectionState,
    pub metadata: ProjectMetadata,
}

impl Session {
    /// Starts a session whose `created_date` is `today`.
    pub fn new(today: NaiveDate) -> Self {
        let mut metadata = ProjectMetadata::new();
        metadata.ensure_created_date(today);
        Self {
            selection: SelectionState::new(),
            metadata,
        }
    }

    /// Starts a session dated with the local calendar day.
    pub fn start() -> Self {
        Self::new(today())
    }

    /// Builds a session from the TOML session format.
    ///
    /// ```toml
    /// [project]
    /// project_name = "Line 4 scrap"
    ///
    /// [selection]
    /// Plan = ["5 Whys"]
    /// ```
    ///
    /// A `created_date` given in the file is kept; otherwise `today` is used.
    ///
    /// # Errors
    ///
    /// Returns [`ToolboxError::SessionParse`] for malformed TOML,
    /// [`ToolboxError::UnknownField`] or [`ToolboxError::UnknownPhase`] for
    /// keys outside the fixed sets.
    pub fn from_toml_str(content: &str, today: NaiveDate) -> Result<Self> {
        let file: SessionFile =
            toml::from_str(content).map_err(|e| ToolboxError::SessionParse(e.to_string()))?;

        let mut metadata = ProjectMetadata::new();
        for (key, value) in file.project {
            metadata.set(key.parse::<MetadataField>()?, value);
        }
        metadata.ensure_created_date(today);

        let mut selection = SelectionState::new();
        for (key, names) in file.selection {
            selection.select(key.parse::<Phase>()?, names);
        }

        Ok(Self {
            selection,
            metadata,
        })
    }

    /// Reads a session file from disk.
    ///
    /// # Errors
    ///
    /// Returns [`ToolboxError::SessionRead`] if the file cannot be read, or
    /// any error of [`Session::from_toml_str`].
    pub fn load(path: &Path, today: NaiveDate) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|source| ToolboxError::SessionRead {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_toml_str(&content, today)
    }
}

/// The local calendar day.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SessionFile {
    #[serde(default)]
    project: BTreeMap<String, String>,
    #[serde(default)]
    selection: BTreeMap<String, Vec<String>>,
}
