//! Configuration types for the PDCA toolbox.
//!
//! Configuration lives in `.pdca/config.toml` under the workspace root. Every
//! section is optional; missing keys take the defaults defined here.

use crate::error::{Result, ToolboxError};
use crate::export::ExportFormat;
use crate::export::document::DocumentSettings;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Directory holding toolbox configuration, relative to the root.
pub const CONFIG_DIR: &str = ".pdca";

/// Main toolbox configuration.
///
/// Relative paths in the file are resolved against `root`.
#[derive(Debug, Clone)]
pub struct ToolboxConfig {
    /// Workspace root directory.
    pub root: PathBuf,

    /// Path to the configuration file (`.pdca/config.toml`).
    pub config_file: PathBuf,

    /// Reference table locations.
    pub catalog: CatalogConfig,

    /// Export destination and enabled formats.
    pub export: ExportConfig,

    /// Page layout for the PDF document.
    pub document: DocumentSettings,

    /// Report template overrides.
    pub templates: TemplateConfig,
}

/// Reference table candidate locations, tried in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub primary: PathBuf,
    pub fallback: PathBuf,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            primary: PathBuf::from("Tools_description.csv"),
            fallback: PathBuf::from("data/Tools_description.csv"),
        }
    }
}

/// Export settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory artifacts are written to.
    pub output_dir: PathBuf,

    /// Formats produced by "export all".
    pub formats: Vec<ExportFormat>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("exports"),
            formats: ExportFormat::ALL.to_vec(),
        }
    }
}

/// Report template settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Directories searched for `project_report.j2` before the bundled copy.
    pub dirs: Vec<PathBuf>,
}

/// On-disk shape of `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct ConfigFile {
    catalog: CatalogConfig,
    export: ExportConfig,
    document: DocumentSettings,
    templates: TemplateConfig,
}

impl ToolboxConfig {
    /// Creates a configuration with defaults for the given root.
    pub fn new(root: PathBuf) -> Self {
        Self::from_file(root, ConfigFile::default())
    }

    fn from_file(root: PathBuf, file: ConfigFile) -> Self {
        Self {
            config_file: root.join(CONFIG_DIR).join("config.toml"),
            root,
            catalog: file.catalog,
            export: file.export,
            document: file.document,
            templates: file.templates,
        }
    }

    /// Loads `.pdca/config.toml` under `root`, falling back to defaults when
    /// the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ToolboxError::ConfigParseError`] if the file exists but is
    /// not valid TOML for this schema.
    pub fn load(root: PathBuf) -> Result<Self> {
        let config_file = root.join(CONFIG_DIR).join("config.toml");
        if !config_file.exists() {
            tracing::debug!(path = %config_file.display(), "no config file, using defaults");
            return Ok(Self::new(root));
        }

        let content = std::fs::read_to_string(&config_file)?;
        let file: ConfigFile = toml::from_str(&content)
            .map_err(|e| ToolboxError::ConfigParseError(format!("{}: {e}", config_file.display())))?;

        Ok(Self::from_file(root, file))
    }

    /// Writes a configuration file with every default spelled out.
    ///
    /// # Errors
    ///
    /// Returns [`ToolboxError::AlreadyInitialized`] if a config file exists.
    pub fn write_default(root: &Path) -> Result<PathBuf> {
        let config = Self::new(root.to_path_buf());
        if config.config_file.exists() {
            return Err(ToolboxError::AlreadyInitialized(config.config_file));
        }

        let content = toml::to_string_pretty(&ConfigFile::default())
            .map_err(|e| ToolboxError::ConfigParseError(e.to_string()))?;
        let dir = root.join(CONFIG_DIR);
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
        std::fs::write(&config.config_file, content)
            .with_context(|| format!("failed to write {}", config.config_file.display()))?;

        tracing::info!(path = %config.config_file.display(), "wrote default config");
        Ok(config.config_file)
    }

    /// Reference table candidates, primary first.
    pub fn catalog_candidates(&self) -> Vec<PathBuf> {
        vec![
            self.root.join(&self.catalog.primary),
            self.root.join(&self.catalog.fallback),
        ]
    }

    /// Absolute export directory.
    pub fn output_dir(&self) -> PathBuf {
        self.root.join(&self.export.output_dir)
    }

    /// Template directories, resolved against the root.
    pub fn template_dirs(&self) -> Vec<PathBuf> {
        self.templates
            .dirs
            .iter()
            .map(|dir| self.root.join(dir))
            .collect()
    }
}
