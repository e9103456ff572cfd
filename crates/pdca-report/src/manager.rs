//! Report manager implementation using minijinja.

use crate::{
    engine::ReportEngine,
    error::{ReportError, Result},
};
use serde::Serialize;
use std::path::PathBuf;

/// Templates compiled into the binary, as `(name, source)`.
const BUNDLED: &[(&str, &str)] = &[(
    "project_report",
    include_str!("../templates/project_report.j2"),
)];

/// Manager for loading and rendering report templates.
///
/// A manager either serves the templates bundled with the crate or loads
/// `.j2` files from a directory on disk, which lets a team restyle the
/// report without rebuilding.
///
/// # Examples
///
/// ```no_run
/// use pdca_report::{ReportContext, ReportEngine, ReportManager};
/// use std::path::PathBuf;
///
/// let manager = ReportManager::new(PathBuf::from("./templates"))?;
/// let report = manager.render("project_report", &ReportContext::new("Plan"))?;
/// # Ok::<(), pdca_report::ReportError>(())
/// ```
#[derive(Debug)]
pub struct ReportManager {
    /// Directory containing template files, `None` for the bundled set.
    pub templates_dir: Option<PathBuf>,
    /// Minijinja environment for template rendering.
    env: minijinja::Environment<'static>,
}

impl ReportManager {
    /// Creates a manager that loads `.j2` templates from `templates_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::TemplateDirectoryNotFound`] if the directory
    /// does not exist or is not a directory.
    pub fn new(templates_dir: PathBuf) -> Result<Self> {
        if !templates_dir.is_dir() {
            return Err(ReportError::TemplateDirectoryNotFound(templates_dir));
        }

        let mut env = Self::base_environment();
        env.set_loader(minijinja::path_loader(&templates_dir));

        Ok(Self {
            templates_dir: Some(templates_dir),
            env,
        })
    }

    /// Creates a manager serving only the bundled templates.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::TemplateRenderError`] if a bundled template
    /// fails to compile.
    pub fn bundled() -> Result<Self> {
        let mut env = Self::base_environment();
        for (name, source) in BUNDLED {
            env.add_template(*name, *source)
                .map_err(|e| ReportError::TemplateRenderError(format!("{name}: {e}")))?;
        }

        Ok(Self {
            templates_dir: None,
            env,
        })
    }

    fn base_environment() -> minijinja::Environment<'static> {
        let mut env = minijinja::Environment::new();
        env.set_trim_blocks(true);
        env.add_filter("cell", table_cell);
        env
    }

    fn load_template(&self, name: &str) -> Result<minijinja::Template<'_, '_>> {
        let template_name = match &self.templates_dir {
            Some(_) => format!("{name}.j2"),
            None => name.to_string(),
        };
        self.env
            .get_template(&template_name)
            .map_err(|e| ReportError::TemplateNotFound(format!("{name}: {e}")))
    }
}

/// Escapes a value for use inside a Markdown table cell.
fn table_cell(value: String) -> String {
    value
        .replace('|', "\\|")
        .replace("\r\n", " ")
        .replace('\n', " ")
}

impl ReportEngine for ReportManager {
    fn render<T: Serialize>(&self, template: &str, ctx: &T) -> Result<String> {
        let tmpl = self.load_template(template)?;
        tmpl.render(ctx)
            .map_err(|e| ReportError::TemplateRenderError(format!("{template}: {e}")))
    }

    fn list_templates(&self) -> Result<Vec<String>> {
        let Some(dir) = &self.templates_dir else {
            return Ok(BUNDLED.iter().map(|(name, _)| name.to_string()).collect());
        };

        let entries = std::fs::read_dir(dir).map_err(|source| ReportError::TemplateListError {
            path: dir.clone(),
            source,
        })?;

        let mut templates = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|source| ReportError::TemplateListError {
                path: dir.clone(),
                source,
            })?;

            let path = entry.path();

            if path.is_file()
                && let Some(ext) = path.extension()
                && ext == "j2"
                && let Some(name) = path.file_stem()
                && let Some(name_str) = name.to_str()
            {
                templates.push(name_str.to_string());
            }
        }

        templates.sort();
        Ok(templates)
    }
}
