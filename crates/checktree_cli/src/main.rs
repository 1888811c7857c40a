//! `checktree` command line entry point.
//!
//! # Responsibility
//! - Load an outline file, run one engine entry point at a 1-based line,
//!   and save the result.
//! - Keep stdout to one short human-readable summary per command.

use anyhow::{Context, Result};
use checktree_core::{
    default_log_level, init_logging, CheckboxForest, CheckboxStatus, EngineConfig,
    HeadingContext, NodeId, OrgDocument, PropagationDriver, RefreshReport, ToggleOutcome,
};
use clap::{Args, Parser, Subcommand};
use log::info;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "checktree: keep org checkbox trees and [m/n] cookies consistent",
    long_about = None
)]
struct Cli {
    /// JSON engine configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Absolute directory for rolling log files. Logging is off without it.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Log level (trace|debug|info|warn|error).
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Toggle the checkbox at a line, then refresh the heading.
    Toggle(TargetArgs),
    /// Recompute statuses and counters under the heading at a line.
    Update(TargetArgs),
    /// Insert an empty checkbox next to the one at a line.
    New {
        #[command(flatten)]
        target: TargetArgs,
        /// Insert after the checkbox and its children instead of before it.
        #[arg(long)]
        below: bool,
    },
    /// Print the checkbox tree under the heading at a line.
    Show {
        #[command(flatten)]
        target: TargetArgs,
        /// Emit the forest as JSON.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
struct TargetArgs {
    /// Outline file to operate on.
    file: PathBuf,

    /// 1-based cursor line.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
    line: u64,
}

impl TargetArgs {
    fn cursor(&self) -> Result<usize> {
        usize::try_from(self.line - 1).context("line number does not fit in memory")
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    start_logging(&cli)?;
    let config = load_config(cli.config.as_deref())?;

    match &cli.command {
        Commands::Toggle(target) => {
            let mut driver = open_driver(target, config)?;
            let report = driver.toggle_current()?;
            driver.document().save(&target.file)?;
            println!("{}", describe_toggle(&report.outcome, target.line));
            print_refresh(&report.refresh);
        }
        Commands::Update(target) => {
            let mut driver = open_driver(target, config)?;
            let report = driver.refresh_all()?;
            driver.document().save(&target.file)?;
            print_refresh(&report);
        }
        Commands::New { target, below } => {
            let mut driver = open_driver(target, config)?;
            match driver.insert_new_checkbox(*below)? {
                Some(line) => {
                    driver.document().save(&target.file)?;
                    println!("inserted checkbox at line {}", line + 1);
                }
                None => println!("no heading at line {}", target.line),
            }
        }
        Commands::Show { target, json } => {
            let driver = open_driver(target, config)?;
            let Some(heading) = driver.document().heading_at(target.cursor()?) else {
                println!("no heading at line {}", target.line);
                return Ok(());
            };
            let forest = heading.init_checkboxes();
            if *json {
                println!("{}", serde_json::to_string_pretty(&forest)?);
            } else {
                println!("{}", heading.title());
                let marker = driver.document().config().checked_marker;
                print_group(&forest, forest.roots(), 1, marker);
            }
        }
    }
    Ok(())
}

fn start_logging(cli: &Cli) -> Result<()> {
    let Some(log_dir) = &cli.log_dir else {
        return Ok(());
    };
    let level = cli.log_level.as_deref().unwrap_or(default_log_level());
    let log_dir = log_dir
        .to_str()
        .context("log directory must be valid UTF-8")?;
    init_logging(level, log_dir)?;
    info!("event=cli_start module=cli status=ok");
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    EngineConfig::from_json_str(&source)
        .with_context(|| format!("invalid config {}", path.display()))
}

fn open_driver(target: &TargetArgs, config: EngineConfig) -> Result<PropagationDriver<OrgDocument>> {
    let mut document = OrgDocument::load(&target.file, config)?;
    document.set_cursor(target.cursor()?);
    Ok(PropagationDriver::new(document))
}

fn describe_toggle(outcome: &ToggleOutcome, line: u64) -> String {
    match outcome {
        ToggleOutcome::Toggled { line, from, to } => {
            format!("toggled line {}: {from} -> {to}", line + 1)
        }
        ToggleOutcome::Rejected { line, reason } => {
            format!("unchanged line {}: {reason}", line + 1)
        }
        ToggleOutcome::NoCheckbox => format!("no checkbox at line {line}"),
        ToggleOutcome::NoHeading => format!("no heading at line {line}"),
    }
}

fn print_refresh(report: &RefreshReport) {
    if report.heading_line.is_none() {
        return;
    }
    println!(
        "updated {} statuses, {} counters",
        report.status_writes, report.counters_changed
    );
    if let Some(counters) = report.heading_counters {
        println!("heading {counters}");
    }
}

fn print_group(forest: &CheckboxForest, group: &[NodeId], depth: usize, checked_marker: char) {
    for id in group {
        let node = &forest[*id];
        let marker = match node.status {
            CheckboxStatus::Unmarked => "   ".to_string(),
            status => format!("[{}]", status.marker_char(checked_marker).unwrap_or(' ')),
        };
        let counters = if node.has_children() {
            format!(" {}", forest.group_counters(&node.children))
        } else {
            String::new()
        };
        println!(
            "{}{marker} line {}{counters}",
            "  ".repeat(depth),
            node.line + 1
        );
        print_group(forest, &node.children, depth + 1, checked_marker);
    }
}
