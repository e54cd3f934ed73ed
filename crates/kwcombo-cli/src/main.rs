//! kwcombo CLI - keyword combination generator

use anyhow::{bail, Context, Result};
use clap::Parser;
use kwcombo::prelude::*;
use kwcombo::{write_template, DASHBOARD_SHEET};
use log::debug;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "kwcombo")]
#[command(
    author,
    version,
    about = "Expand a keyword rule table into every combination and export it as XLSX"
)]
struct Cli {
    /// Rule table (xlsx, xlsm, csv)
    #[arg(short, long, default_value = "resources/keyword_rules.xlsx")]
    input: PathBuf,

    /// Directory for the generated workbook
    #[arg(short, long, default_value = "output")]
    output: PathBuf,

    /// Abort when the run would produce more rows than this
    #[arg(long, value_name = "N")]
    max_rows: Option<usize>,

    /// Group name for rows without one
    #[arg(long, default_value = kwcombo::UNGROUPED)]
    ungrouped_label: String,

    /// Print the dashboard summary as JSON
    #[arg(long)]
    json: bool,

    /// Only list keywords from these groups (repeatable)
    #[arg(short, long = "group", value_name = "GROUP")]
    groups: Vec<String>,

    /// Number of keywords to list
    #[arg(long, default_value = "10", value_name = "N")]
    preview: usize,

    /// Write the sample input template to PATH and exit
    #[arg(long, value_name = "PATH")]
    template: Option<PathBuf>,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Some(path) = &cli.template {
        write_template(path)
            .with_context(|| format!("Failed to write template '{}'", path.display()))?;
        println!("Template written to {}", path.display());
        return Ok(());
    }

    run(&cli)
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn run(cli: &Cli) -> Result<()> {
    let mut session = match Session::load(&cli.input) {
        Ok(session) => session,
        Err(LoadError::NotFound(path)) => bail!(missing_input_message(&path)),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to load '{}'", cli.input.display()))
        }
    };

    let mut options = ExpansionOptions::new().with_ungrouped_label(cli.ungrouped_label.as_str());
    if let Some(max_rows) = cli.max_rows {
        options = options.with_max_rows(max_rows);
    }

    let expansion = session
        .generate(&options)
        .context("Keyword generation failed")?;
    for report in expansion.degraded() {
        debug!("Rule '{}' degraded: {:?}", report.rule, report);
    }
    if expansion.is_empty() {
        bail!(
            "No keywords were generated from '{}'. Check that the rule column holds column \
             numbers (e.g. 1,3) and that the referenced columns have titles and values.",
            cli.input.display()
        );
    }

    let written = session
        .export_to_dir(&cli.output)
        .with_context(|| format!("Failed to export to '{}'", cli.output.display()))?;

    let summary = session
        .summary()
        .context("Generation produced no summary")?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(summary)?);
    } else {
        print_summary(&session, summary, &written, cli);
    }

    Ok(())
}

fn missing_input_message(path: &Path) -> String {
    format!(
        "Input file not found: {}\n\
         \n\
         Check that:\n\
         \x20 - the path is spelled correctly (use -i to choose another file)\n\
         \x20 - the file exists and is an .xlsx, .xlsm or .csv rule table\n\
         \x20 - you have permission to read it\n\
         \n\
         Run with --template PATH to get a sample rule table.",
        path.display()
    )
}

fn print_summary(session: &Session, summary: &DashboardSummary, written: &Path, cli: &Cli) {
    println!("Saved: {}", written.display());
    println!("Total keywords: {}", kwcombo::format_count(summary.total_keywords));

    println!();
    println!("Keywords per rule:");
    for entry in summary.top_rules(10) {
        println!("  {}: {}", entry.name, entry.count);
    }

    println!();
    println!("Keywords per group:");
    for entry in &summary.group_counts {
        println!(
            "  {}: {} ({:.1}%)",
            entry.name,
            entry.count,
            summary.share(entry)
        );
    }

    println!();
    println!("Sheets:");
    println!("  1. {} (statistics)", DASHBOARD_SHEET);
    for (i, sheet) in session.group_sheets().iter().enumerate() {
        println!(
            "  {}. {} ({} keywords)",
            i + 2,
            sheet.name,
            kwcombo::format_count(sheet.rows.len())
        );
    }

    let groups: Vec<&str> = cli.groups.iter().map(String::as_str).collect();
    let preview = session.preview(&groups, cli.preview);
    if !preview.is_empty() {
        println!();
        println!("Keywords:");
        for row in preview {
            println!("  [{}] [{}] {}", row.rule, row.group, row.keyword);
        }
    }
}
