//! # tabtrans-cli
//!
//! Command-line interface for cleaning and translating spreadsheets.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tabtrans_core::{load_file, Config, Session, TranslateReport, TranslateRequest};
use tabtrans_sheet::{CleanStep, Table};
use tabtrans_translate::{
    JsonFileStore, KvStore, MemoryStore, TranslationCache, TranslationEngine,
};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Rows shown in the `inspect` preview.
const PREVIEW_ROWS: usize = 5;

/// tabtrans - clean and translate spreadsheets
#[derive(Parser)]
#[command(name = "tabtrans")]
#[command(author, version, about = "Clean and translate spreadsheet tables", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (.yaml, .yml or .json)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show sheets, inferred headers, a summary and data-quality issues
    Inspect {
        /// Workbook to read (.xlsx, .xls or .csv)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Sheet to inspect instead of the densest one
        #[arg(long)]
        sheet: Option<String>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },
    /// Clean and optionally translate, writing `<name>_result.xlsx`
    Process(ProcessArgs),
}

#[derive(Args)]
struct ProcessArgs {
    /// Workbook to read (.xlsx, .xls or .csv)
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Cleaning steps in order (garble, trim, booleans, prune).
    /// Defaults to all of them when neither steps nor --translate are given.
    #[arg(long, value_delimiter = ',')]
    steps: Vec<CleanStep>,

    /// Translate text cells after cleaning
    #[arg(short, long)]
    translate: bool,

    /// Source language code, or `auto`
    #[arg(long)]
    from: Option<String>,

    /// Target language code
    #[arg(long)]
    to: Option<String>,

    /// Only translate these columns
    #[arg(long, value_delimiter = ',')]
    columns: Vec<String>,

    /// Process every sheet instead of the densest one
    #[arg(long)]
    all_sheets: bool,

    /// Output directory (defaults to the input's directory)
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Keep translations in memory only
    #[arg(long)]
    no_cache: bool,
}

/// Output format for `inspect`.
#[derive(Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    /// Human-readable text (default)
    #[default]
    Text,
    /// JSON output
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .init();
    }

    let config = match &cli.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => Config::default(),
    };

    match cli.command {
        Command::Inspect {
            file,
            sheet,
            format,
        } => inspect(config, &file, sheet.as_deref(), format).await,
        Command::Process(args) => process(config, args).await,
    }
}

/// Load `path` into a fresh session.
async fn open_session(config: Config, path: &Path) -> Result<Session> {
    let decoded = load_file(path, |pct| tracing::debug!(pct, "loading"))
        .await
        .with_context(|| format!("Failed to read workbook: {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut session = Session::new(config);
    session.open(&file_name, decoded);
    Ok(session)
}

async fn inspect(config: Config, path: &Path, sheet: Option<&str>, format: OutputFormat) -> Result<()> {
    let mut session = open_session(config, path).await?;
    if let Some(name) = sheet {
        if !session.switch_sheet(name) {
            bail!("No sheet named '{name}'");
        }
    }

    let workbook = session.workbook();
    let active = workbook.active_sheet_name().unwrap_or_default();
    let table = workbook.result().cloned().unwrap_or_default();
    let summary = session.summary();
    let anomalies = session.anomalies().unwrap_or_default();

    match format {
        OutputFormat::Json => {
            let report = serde_json::json!({
                "file": workbook.file_name(),
                "sheets": workbook.sheet_names(),
                "active_sheet": active,
                "headers": table.headers(),
                "summary": summary,
                "anomalies": anomalies,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            println!("{} {}", "File:".cyan().bold(), workbook.file_name());
            for name in workbook.sheet_names() {
                if name == active {
                    println!("  {} {}", "*".green().bold(), name.green());
                } else {
                    println!("    {name}");
                }
            }
            println!();
            println!("{} {}", "Headers:".cyan().bold(), table.headers().join(", "));
            print_preview(&table);
            if let Some(summary) = summary {
                println!();
                println!("{} {}", "Summary:".cyan().bold(), summary.summary_text);
            }
            if anomalies.has_issues() {
                println!();
                println!("{}", "Issues:".yellow().bold());
                for issue in &anomalies.issues {
                    println!("  - {issue}");
                }
            }
        }
    }
    Ok(())
}

fn print_preview(table: &Table) {
    for row in table.rows().iter().take(PREVIEW_ROWS) {
        let cells: Vec<String> = row.values().map(ToString::to_string).collect();
        println!("  {}", cells.join(" | ").dimmed());
    }
    if table.row_count() > PREVIEW_ROWS {
        println!("  {}", format!("... {} more rows", table.row_count() - PREVIEW_ROWS).dimmed());
    }
}

async fn process(mut config: Config, args: ProcessArgs) -> Result<()> {
    if let Some(from) = &args.from {
        config.translation.from.clone_from(from);
    }
    if let Some(to) = &args.to {
        config.translation.to.clone_from(to);
    }
    config.validate()?;

    let steps: Vec<CleanStep> = if args.steps.is_empty() && !args.translate {
        CleanStep::ALL.to_vec()
    } else {
        args.steps.clone()
    };

    let mut session = open_session(config, &args.file).await?;
    let sheets: Vec<String> = if args.all_sheets {
        session.workbook().sheet_names().to_vec()
    } else {
        session
            .workbook()
            .active_sheet_name()
            .map(|s| vec![s.to_string()])
            .unwrap_or_default()
    };
    if sheets.is_empty() {
        bail!("Workbook has no sheets: {}", args.file.display());
    }

    for sheet in &sheets {
        session.switch_sheet(sheet);
        session.apply_steps(&steps)?;
        if !steps.is_empty() {
            println!("{} {sheet}: {}", "Cleaned".green(), describe_steps(&steps));
        }
    }

    if args.translate {
        let options = session.config().translation.clone();
        if args.no_cache {
            translate_sheets(&mut session, &sheets, &args, MemoryStore::new()).await?;
        } else if let Some(path) = options.resolved_cache_path() {
            tracing::debug!(path = %path.display(), "using translation cache");
            translate_sheets(&mut session, &sheets, &args, JsonFileStore::new(path)).await?;
        } else {
            tracing::warn!("no cache directory available, caching in memory");
            translate_sheets(&mut session, &sheets, &args, MemoryStore::new()).await?;
        }
    }

    let (name, bytes) = session.export_xlsx()?;
    let dir = match &args.output {
        Some(dir) => dir.clone(),
        None => args
            .file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default(),
    };
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
    let out_path = dir.join(name);
    std::fs::write(&out_path, bytes)
        .with_context(|| format!("Failed to write file: {}", out_path.display()))?;

    println!("{} {}", "Wrote".green().bold(), out_path.display());
    Ok(())
}

async fn translate_sheets<S: KvStore>(
    session: &mut Session,
    sheets: &[String],
    args: &ProcessArgs,
    store: S,
) -> Result<()> {
    let options = &session.config().translation;
    let mut request = TranslateRequest::from_options(options)?;
    if !args.columns.is_empty() {
        request = request.with_columns(args.columns.clone());
    }
    let mut engine = TranslationEngine::standard(
        TranslationCache::new(store),
        options.engine_config(),
        &options.provider_settings(),
    )?;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    for sheet in sheets {
        session.switch_sheet(sheet);
        let report = session
            .translate(&mut engine, &request, &cancel, |done, total| {
                eprint!("\r  {sheet}: {done}/{total}");
                let _ = std::io::stderr().flush();
            })
            .await?;
        eprintln!();
        print_report(sheet, &report);
        if report.cancelled {
            println!("{}", "Translation cancelled, keeping partial results".yellow());
            break;
        }
    }
    Ok(())
}

fn print_report(sheet: &str, report: &TranslateReport) {
    let stats = &report.stats;
    println!(
        "{} {sheet}: {} -> {}",
        "Translated".green(),
        report.from.label(),
        report.to.label()
    );
    println!(
        "  {} unique, {} cached, {} translated, {} failed, {} changed, {} unchanged",
        stats.total,
        stats.cached,
        stats.api_ok.to_string().green(),
        if stats.api_fail > 0 {
            stats.api_fail.to_string().red()
        } else {
            stats.api_fail.to_string().normal()
        },
        stats.changed,
        stats.unchanged
    );
    if let Some(err) = &stats.last_error {
        println!("  {} {err}", "Last error:".red().bold());
    }
}

fn describe_steps(steps: &[CleanStep]) -> String {
    steps
        .iter()
        .map(|s| s.label())
        .collect::<Vec<_>>()
        .join(", ")
}
