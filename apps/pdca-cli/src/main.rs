//! PDCA toolbox CLI
//!
//! Browse the tool catalog, select tools per phase and export the resulting
//! project plan.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pdca_core::session::today;
use pdca_core::{ExportFormat, Phase, Session, Toolbox, ToolboxConfig, ToolboxError};
use std::path::{Path, PathBuf};
use tracing::{error, info};

mod tui;

/// PDCA toolbox
///
/// Pick continuous-improvement tools for each Plan-Do-Check-Act phase and
/// export the project plan as CSV, text, Excel, PDF or a Markdown report.
#[derive(Parser)]
#[command(name = "pdca", version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default .pdca/config.toml in the current directory
    Init,

    /// List the tools in the reference table
    Catalog {
        /// Only list tools of this phase (Plan, Do, Check, Act)
        #[arg(short, long)]
        phase: Option<String>,

        /// Print records as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show which export formats this build can produce
    Capabilities,

    /// Export the plan described by a session file
    Export {
        /// Session file (TOML with [project] and [selection] tables)
        #[arg(short, long)]
        session: PathBuf,

        /// csv, tsv, xlsx, pdf, md or all
        #[arg(short, long, default_value = "all", value_parser = parse_format_choice)]
        format: FormatChoice,

        /// Output directory, defaults to the configured export directory
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Interactive terminal selector
    Select {
        /// Session file to start from
        #[arg(short, long)]
        session: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormatChoice {
    One(ExportFormat),
    All,
}

fn parse_format_choice(value: &str) -> std::result::Result<FormatChoice, String> {
    if value == "all" {
        return Ok(FormatChoice::All);
    }
    value
        .parse()
        .map(FormatChoice::One)
        .map_err(|e: ToolboxError| e.user_notice())
}

fn main() {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    if let Err(e) = run_command(cli.command) {
        error!("Command failed: {:#}", e);
        match e.downcast_ref::<ToolboxError>() {
            Some(toolbox_error) => eprintln!("Error: {}", toolbox_error.user_notice()),
            None => eprintln!("Error: {:#}", e),
        }
        std::process::exit(1);
    }
}

/// Initialize tracing subscriber for structured logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = if verbose {
        EnvFilter::new("pdca=debug,pdca_core=debug,pdca_report=debug")
    } else {
        EnvFilter::new("pdca=info,pdca_core=info,pdca_report=info")
    };

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .init();
}

fn run_command(command: Commands) -> Result<()> {
    let root = std::env::current_dir().context("Failed to get current directory")?;

    match command {
        Commands::Init => run_init(&root),
        Commands::Catalog { phase, json } => run_catalog(&root, phase.as_deref(), json),
        Commands::Capabilities => run_capabilities(&root),
        Commands::Export {
            session,
            format,
            out,
        } => run_export(&root, &session, format, out),
        Commands::Select { session } => run_select(&root, session.as_deref()),
    }
}

fn open_toolbox(root: &Path) -> Result<Toolbox> {
    let config = ToolboxConfig::load(root.to_path_buf()).context("Failed to load configuration")?;
    Toolbox::new(config).context("Failed to load the reference table")
}

fn run_init(root: &Path) -> Result<()> {
    let path = ToolboxConfig::write_default(root).context("Failed to initialize")?;

    println!("✔ Wrote {}", path.display());
    println!("\nNext steps:");
    println!("  pdca catalog                      List available tools");
    println!("  pdca select                       Pick tools interactively");
    println!("  pdca export --session plan.toml   Export a saved selection");

    Ok(())
}

fn run_catalog(root: &Path, phase: Option<&str>, json: bool) -> Result<()> {
    let phase = phase.map(str::parse::<Phase>).transpose()?;
    let toolbox = open_toolbox(root)?;

    let records: Vec<_> = toolbox
        .catalog()
        .records()
        .iter()
        .filter(|r| phase.is_none_or(|p| r.phase == p))
        .collect();

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&records).context("Failed to serialize catalog")?
        );
        return Ok(());
    }

    for record in records {
        println!("{}\t{}\t{}", record.phase, record.name, record.description);
    }
    Ok(())
}

fn run_capabilities(root: &Path) -> Result<()> {
    let config = ToolboxConfig::load(root.to_path_buf()).context("Failed to load configuration")?;
    let registry = pdca_core::ExporterRegistry::detect(&config);

    for (format, available) in registry.capabilities() {
        let status = if available { "available" } else { "unavailable" };
        println!("{:<10} {:<18} {}", format.as_str(), format.filename(), status);
    }
    Ok(())
}

fn run_export(
    root: &Path,
    session_file: &Path,
    format: FormatChoice,
    out: Option<PathBuf>,
) -> Result<()> {
    let toolbox = open_toolbox(root)?;
    let session = Session::load(session_file, today())
        .with_context(|| format!("Failed to read session {}", session_file.display()))?;

    let formats = match format {
        FormatChoice::One(format) => vec![format],
        FormatChoice::All => toolbox.enabled_formats(),
    };
    let dir = out
        .map(|dir| root.join(dir))
        .unwrap_or_else(|| toolbox.config.output_dir());

    info!(tasks = toolbox.plan(&session).len(), dir = %dir.display(), "exporting plan");
    report_exports(toolbox.export_to_dir(&session, &formats, &dir))
}

fn run_select(root: &Path, session_file: Option<&Path>) -> Result<()> {
    let toolbox = open_toolbox(root)?;
    let session = match session_file {
        Some(path) => Session::load(path, today())
            .with_context(|| format!("Failed to read session {}", path.display()))?,
        None => Session::start(),
    };

    let session = tui::run_selector(&toolbox, session).context("Interactive selector failed")?;
    println!(
        "{} tool(s) selected across {} phase(s)",
        session.selection.total(),
        session
            .selection
            .iter()
            .filter(|(_, names)| !names.is_empty())
            .count()
    );
    Ok(())
}

/// Prints one line per format and fails if any format failed.
fn report_exports(results: Vec<(ExportFormat, pdca_core::Result<PathBuf>)>) -> Result<()> {
    let mut failed = None;
    for (format, result) in results {
        match result {
            Ok(path) => println!("✔ {format}: {}", path.display()),
            Err(e) => {
                println!("✘ {format}: {}", e.user_notice());
                failed.get_or_insert(e);
            }
        }
    }

    match failed {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}
