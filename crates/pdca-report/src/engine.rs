//! Report engine trait definition.

use crate::error::Result;
use serde::Serialize;

/// Trait for rendering report templates with a serializable context.
///
/// # Examples
///
/// ```
/// use pdca_report::{ReportContext, ReportEngine, ReportManager};
///
/// let manager = ReportManager::bundled().unwrap();
/// let context = ReportContext::new("Project Plan").with_project_name("Line 4 scrap");
/// let report = manager.render("project_report", &context).unwrap();
/// assert!(report.contains("Line 4 scrap"));
/// ```
pub trait ReportEngine {
    /// Renders a template with the provided context.
    ///
    /// # Arguments
    ///
    /// * `template` - Name of the template to render (without extension)
    /// * `ctx` - Context data to use for rendering
    ///
    /// # Errors
    ///
    /// Returns an error if the template does not exist, contains syntax
    /// errors, or rendering fails.
    fn render<T: Serialize>(&self, template: &str, ctx: &T) -> Result<String>;

    /// Lists the names (without extension) of all templates available for
    /// rendering.
    ///
    /// # Errors
    ///
    /// Returns an error if the templates directory cannot be read.
    fn list_templates(&self) -> Result<Vec<String>>;
}
