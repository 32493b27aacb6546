//! Terminal table and JSON output for scan results.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::SystemTime;

use chrono::{DateTime, Local, SecondsFormat, Utc};
use serde::Serialize;

use crate::error::AppError;
use crate::index::ViewOptions;
use crate::model::{ArtifactKind, ProjectRecord, ScanStatus, ScanSummary, projects};
use crate::utils::{display_path, format_bytes, truncate};

const NAME_WIDTH: usize = 28;

pub fn render_table(rows: &[&ProjectRecord], now: SystemTime) -> String {
    if rows.is_empty() {
        return String::from("No matching projects.\n");
    }

    let mut output = format!(
        "{:<name$} {:>8} {:>12} {:>12} {:>12}  {:<10}  {}\n",
        "Project",
        "Idle",
        "node_modules",
        "dist",
        "Reclaimable",
        "Last active",
        "Path",
        name = NAME_WIDTH
    );
    output.push_str(&"-".repeat(NAME_WIDTH + 72));
    output.push('\n');

    for record in rows {
        output.push_str(&format!(
            "{:<name$} {:>8} {:>12} {:>12} {:>12}  {:<10}  {}\n",
            truncate(&record.name, NAME_WIDTH),
            idle_label(record, now),
            format_bytes(record.dependencies.size),
            format_bytes(record.build_output.size),
            format_bytes(record.reclaimable_bytes()),
            last_active_label(record),
            display_path(&record.path),
            name = NAME_WIDTH
        ));
    }

    let total: u64 = rows.iter().map(|record| record.reclaimable_bytes()).sum();
    output.push_str(&format!(
        "{:>width$}\n",
        format!("TOTAL: {}", format_bytes(total)),
        width = NAME_WIDTH + 48
    ));
    output
}

pub fn summary_line(summary: &ScanSummary, shown: usize, reclaimable: u64) -> String {
    format!(
        "{}; {} shown, {} reclaimable ({:.2}s)",
        summary.message(),
        shown,
        format_bytes(reclaimable),
        summary.elapsed.as_secs_f64()
    )
}

/// One-line description of a project for selection prompts.
pub fn project_label(record: &ProjectRecord, now: SystemTime) -> String {
    format!(
        "{:<name$} {:>8} idle {:>12}  {}",
        truncate(&record.name, NAME_WIDTH),
        idle_label(record, now),
        format_bytes(record.reclaimable_bytes()),
        display_path(&record.path),
        name = NAME_WIDTH
    )
}

fn idle_label(record: &ProjectRecord, now: SystemTime) -> String {
    match record.last_active_at {
        Some(_) => format!("{}d", record.inactive_days_at(now)),
        None => "unknown".to_string(),
    }
}

fn last_active_label(record: &ProjectRecord) -> String {
    record
        .last_active_at
        .map(|at| DateTime::<Local>::from(at).format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}

#[derive(Serialize)]
struct ScanJson<'a> {
    root: &'a Path,
    status: ScanStatus,
    discovered: usize,
    shown: usize,
    only_inactive: bool,
    threshold_days: u64,
    reclaimable_bytes: u64,
    projects: Vec<ProjectJson<'a>>,
}

#[derive(Serialize)]
struct ProjectJson<'a> {
    name: &'a str,
    path: &'a Path,
    last_active_at: Option<String>,
    inactive_days: u64,
    reclaimable_bytes: u64,
    artifacts: BTreeMap<ArtifactKind, ArtifactJson<'a>>,
}

#[derive(Serialize)]
struct ArtifactJson<'a> {
    path: Option<&'a Path>,
    size_bytes: u64,
}

pub fn render_json(
    summary: &ScanSummary,
    rows: &[&ProjectRecord],
    view: &ViewOptions,
    now: SystemTime,
) -> Result<String, AppError> {
    let projects: Vec<ProjectJson<'_>> = rows
        .iter()
        .map(|record| ProjectJson {
            name: &record.name,
            path: &record.path,
            last_active_at: record
                .last_active_at
                .map(|at| DateTime::<Utc>::from(at).to_rfc3339_opts(SecondsFormat::Secs, true)),
            inactive_days: record.inactive_days_at(now),
            reclaimable_bytes: record.reclaimable_bytes(),
            artifacts: ArtifactKind::ALL
                .into_iter()
                .map(|kind| {
                    let slot = record.artifact(kind);
                    (kind, ArtifactJson { path: slot.path.as_deref(), size_bytes: slot.size })
                })
                .collect(),
        })
        .collect();

    let document = ScanJson {
        root: &summary.root,
        status: summary.status,
        discovered: summary.discovered,
        shown: rows.len(),
        only_inactive: view.only_inactive,
        threshold_days: view.threshold_days,
        reclaimable_bytes: rows.iter().map(|record| record.reclaimable_bytes()).sum(),
        projects,
    };
    Ok(serde_json::to_string_pretty(&document)?)
}

pub fn selection_line(count: usize, bytes: u64) -> String {
    format!("Selected: {} ({} {})", format_bytes(bytes), count, projects(count))
}
