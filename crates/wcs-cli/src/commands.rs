use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use colored::{ColoredString, Colorize};
use serde::Serialize;
use wcs_commit::CommitPlan;
use wcs_index::ResourceIndexManager;
use wcs_sdk::{CommitFlow, InMemoryStatusSource, RefreshSummary, StaticConfig, WorkingCopy};
use wcs_types::{RawStatusRecord, ScmConfig, Status, TrackedResource};

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Status(args) => cmd_status(args, cli.format).await,
        Command::CommitPaths(args) => cmd_commit_paths(args, cli.format).await,
        Command::Config(args) => cmd_config(args, cli.format),
    }
}

// ---- Loading ----

pub(crate) fn load_records(path: &Path) -> anyhow::Result<Vec<RawStatusRecord>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read records from {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("invalid status records in {}", path.display()))
}

pub(crate) fn load_config(path: Option<&Path>) -> anyhow::Result<ScmConfig> {
    let Some(path) = path else {
        return Ok(ScmConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read config from {}", path.display()))?;
    ScmConfig::from_toml_str(&text).with_context(|| format!("invalid config in {}", path.display()))
}

fn open_working_copy(args: &SourceArgs) -> anyhow::Result<(WorkingCopy, ScmConfig)> {
    let records = load_records(&args.records)?;
    let config = load_config(args.config.as_deref())?;
    let source = InMemoryStatusSource::new(records);
    source.set_upstream(args.upstream.clone());
    let wc = WorkingCopy::new(
        args.root.clone(),
        Arc::new(source),
        Arc::new(StaticConfig::new(config.clone())),
    );
    Ok((wc, config))
}

// ---- Status ----

#[derive(Debug, Serialize)]
pub(crate) struct StatusReport {
    count: usize,
    incomplete: bool,
    needs_cleanup: bool,
    groups: Vec<GroupReport>,
}

#[derive(Debug, Serialize)]
struct GroupReport {
    id: String,
    label: String,
    resources: Vec<ResourceLine>,
}

#[derive(Debug, Serialize)]
struct ResourceLine {
    path: String,
    status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    renamed_from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    lock: Option<char>,
    remote: bool,
}

pub(crate) fn build_status_report(
    root: &Path,
    index: &ResourceIndexManager,
    summary: &RefreshSummary,
) -> StatusReport {
    let groups = index
        .groups()
        .into_iter()
        .filter(|group| !group.is_empty())
        .map(|group| GroupReport {
            id: group.id().to_string(),
            label: group.label().to_string(),
            resources: group
                .resources()
                .iter()
                .map(|resource| resource_line(root, resource))
                .collect(),
        })
        .collect();
    StatusReport {
        count: summary.count,
        incomplete: summary.is_incomplete,
        needs_cleanup: summary.needs_cleanup,
        groups,
    }
}

fn resource_line(root: &Path, resource: &TrackedResource) -> ResourceLine {
    ResourceLine {
        path: display_path(root, &resource.resource_path),
        status: resource.status,
        renamed_from: resource
            .rename_source
            .as_deref()
            .filter(|_| resource.is_rename_target())
            .map(|source| display_path(root, source)),
        lock: resource.lock_status.map(|lock| lock.badge()),
        remote: resource.remote,
    }
}

fn display_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

async fn cmd_status(args: StatusArgs, format: OutputFormat) -> anyhow::Result<()> {
    let (wc, _config) = open_working_copy(&args.source)?;
    let summary = wc.refresh().await?;
    let report = wc
        .with_index(|index| build_status_report(wc.root(), index, &summary))
        .await;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => print_status(&report),
    }
    Ok(())
}

fn print_status(report: &StatusReport) {
    if report.incomplete {
        println!("{} working copy is incomplete or switched", "warning:".yellow().bold());
    }
    if report.needs_cleanup {
        println!("{} working copy is locked, run cleanup", "warning:".yellow().bold());
    }
    if report.groups.is_empty() {
        println!("No changes.");
    }
    for group in &report.groups {
        println!("{} ({})", group.label.bold(), group.resources.len());
        for line in &group.resources {
            let mut text = format!("  {} {}", status_badge(line.status), line.path);
            if let Some(source) = &line.renamed_from {
                text.push_str(&format!(" {}", format!("(from {source})").dimmed()));
            }
            if let Some(lock) = line.lock {
                text.push_str(&format!(" {}", format!("[{lock}]").cyan()));
            }
            println!("{text}");
        }
    }
    println!("\n{} pending change(s)", report.count.to_string().bold());
}

fn status_badge(status: Status) -> ColoredString {
    let letter = status.letter().to_string();
    match status {
        Status::Added => letter.green(),
        Status::Modified | Status::Merged => letter.yellow(),
        Status::Deleted | Status::Missing => letter.red(),
        Status::Conflicted | Status::Obstructed => letter.red().bold(),
        Status::Replaced => letter.blue(),
        Status::Unversioned => letter.magenta(),
        _ => letter.normal(),
    }
}

// ---- Commit paths ----

#[derive(Debug, Serialize)]
struct CommitReport<'a> {
    #[serde(flatten)]
    plan: &'a CommitPlan,
    submitted: Vec<PathBuf>,
}

pub(crate) fn resolve_paths(root: &Path, paths: &[PathBuf]) -> Vec<PathBuf> {
    paths
        .iter()
        .map(|path| {
            if path.is_absolute() {
                path.clone()
            } else {
                root.join(path)
            }
        })
        .collect()
}

async fn cmd_commit_paths(args: CommitPathsArgs, format: OutputFormat) -> anyhow::Result<()> {
    let (wc, config) = open_working_copy(&args.source)?;
    wc.refresh().await?;

    let flow = CommitFlow::new(&config);
    let plan = if args.all {
        wc.plan_commit_all(&flow).await?
    } else {
        let paths = resolve_paths(wc.root(), &args.paths);
        wc.plan_commit(&flow, &paths).await?
    };
    let submitted = plan.submitted_paths();

    match format {
        OutputFormat::Json => {
            let report = CommitReport {
                plan: &plan,
                submitted,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            for path in &submitted {
                println!("{}", path.display());
            }
        }
    }
    Ok(())
}

// ---- Config ----

fn cmd_config(args: ConfigArgs, format: OutputFormat) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&config)?),
        OutputFormat::Text => print!("{}", toml::to_string_pretty(&config)?),
    }
    Ok(())
}
