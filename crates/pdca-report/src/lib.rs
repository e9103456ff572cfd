//! Report template crate for the PDCA toolbox.
//!
//! Renders the human-readable project report with minijinja. A bundled
//! `project_report` template ships with the crate; a directory of `.j2`
//! files can replace it.
//!
//! # Examples
//!
//! ```
//! use pdca_report::{PhaseGroup, ReportContext, ReportEngine, ReportManager};
//!
//! let manager = ReportManager::bundled()?;
//! let context = ReportContext::new("ONE TEAM PDCA Project Report")
//!     .with_project_name("Line 4 scrap")
//!     .with_phase(PhaseGroup::new("Plan").with_task("5 Whys", "Root cause analysis"));
//!
//! let report = manager.render("project_report", &context)?;
//! assert!(report.contains("5 Whys"));
//! # Ok::<(), pdca_report::ReportError>(())
//! ```

pub mod context;
pub mod engine;
pub mod error;
pub mod manager;

pub use context::{PhaseGroup, ReportContext, TaskLine};
pub use engine::ReportEngine;
pub use error::{ReportError, Result};
pub use manager::ReportManager;
