use std::path::PathBuf;
use std::time::SystemTime;

use dialoguer::{Confirm, MultiSelect};
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::Config;
use crate::error::AppError;
use crate::index::{ProjectIndex, SortKey};
use crate::model::{DeletionTarget, OutcomeStatus, ProjectRecord, ReclaimEvent};
use crate::reclaim::{ReclamationExecutor, RemovalMode, build_targets};
use crate::report;
use crate::scanner::Scanner;
use crate::utils::{display_path, format_bytes};

use super::scan::{run_scan, view_options};

pub struct CleanOptions {
    pub root: PathBuf,
    pub threshold_days: Option<u64>,
    pub show_all: bool,
    pub permanent: bool,
    pub assume_yes: bool,
    pub verbose: bool,
}

pub fn execute_clean(options: CleanOptions) -> Result<(), AppError> {
    let config = Config::load()?;
    let mode = if options.permanent || !config.use_trash {
        RemovalMode::Permanent
    } else {
        RemovalMode::Reversible
    };
    // checked before scanning so a missing trash facility is reported up front
    let executor = ReclamationExecutor::for_mode(mode)?;

    let scanner = Scanner::from_config(&config)?;
    let (mut index, summary) = run_scan(&scanner, &options.root, true)?;
    println!("{}", summary.message());

    let view = view_options(&config, options.threshold_days, options.show_all)
        .sorted_by(SortKey::Days, false);
    let now = SystemTime::now();
    let visible: Vec<ProjectRecord> = index.visible(&view, now).into_iter().cloned().collect();
    if visible.is_empty() {
        println!("No projects match the current filter.");
        return Ok(());
    }

    let selected = if options.assume_yes {
        visible
    } else {
        match prompt_for_projects(&visible, view.threshold_days, now) {
            Ok(selected) => selected,
            Err(AppError::Cancelled) => {
                println!("Aborted. Nothing was deleted.");
                return Ok(());
            }
            Err(err) => return Err(err),
        }
    };

    let paths: Vec<PathBuf> = selected.iter().map(|record| record.path.clone()).collect();
    let selection = index.estimate(&paths);
    println!("{}", report::selection_line(selection.projects, selection.bytes));

    let targets = build_targets(&selected);
    if targets.is_empty() {
        println!("The selected projects have no node_modules or dist to clean.");
        return Ok(());
    }

    let planned = planned_bytes(&index, &targets);
    print_plan(&index, &targets, options.verbose);

    if !options.assume_yes && !confirm_removal(mode, targets.len(), planned)? {
        println!("Aborted. Nothing was deleted.");
        return Ok(());
    }

    let bar = ProgressBar::new(targets.len() as u64);
    bar.set_style(
        ProgressStyle::with_template("{bar:30} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let mut freed = 0u64;
    let handle = executor.spawn(targets)?;
    let outcome = handle.wait(|event| match event {
        ReclaimEvent::Started { index: position, total, label } => {
            bar.set_message(format!("Deleting ({position}/{total}): {label}"));
        }
        ReclaimEvent::Outcome(outcome) => {
            if outcome.is_success()
                && let Some(record) = index.get(&outcome.target.owner)
            {
                freed = freed.saturating_add(record.artifact(outcome.target.kind).size);
            }
            index.apply_outcome(&outcome);
            bar.inc(1);
        }
        ReclaimEvent::Finished { .. } => {}
    })?;
    bar.finish_and_clear();

    for failure in outcome.failures() {
        if let OutcomeStatus::Failed { reason } = &failure.status {
            eprintln!("  failed: {} ({})", display_path(&failure.target.path), reason);
        }
    }
    println!("{}", outcome.message());
    println!("Reclaimed {}", format_bytes(freed));

    Ok(())
}

fn prompt_for_projects(
    visible: &[ProjectRecord],
    threshold_days: u64,
    now: SystemTime,
) -> Result<Vec<ProjectRecord>, AppError> {
    let labels: Vec<String> =
        visible.iter().map(|record| report::project_label(record, now)).collect();
    let defaults: Vec<bool> =
        visible.iter().map(|record| record.is_inactive(threshold_days, now)).collect();

    let chosen = MultiSelect::new()
        .with_prompt("Select projects to clean (space toggles, enter confirms)")
        .items(&labels)
        .defaults(&defaults)
        .interact_opt()?;

    match chosen {
        Some(indices) if !indices.is_empty() => {
            Ok(indices.into_iter().map(|i| visible[i].clone()).collect())
        }
        _ => Err(AppError::Cancelled),
    }
}

fn planned_bytes(index: &ProjectIndex, targets: &[DeletionTarget]) -> u64 {
    targets
        .iter()
        .filter_map(|target| index.get(&target.owner).map(|record| record.artifact(target.kind).size))
        .sum()
}

fn print_plan(index: &ProjectIndex, targets: &[DeletionTarget], verbose: bool) {
    println!("Cleanup plan: {} director(ies)", targets.len());
    if verbose {
        for target in targets {
            let size = index
                .get(&target.owner)
                .map(|record| record.artifact(target.kind).size)
                .unwrap_or_default();
            println!("    • {:<40} {:>10}  {}", target.label, format_bytes(size), display_path(&target.path));
        }
    }
}

fn confirm_removal(mode: RemovalMode, count: usize, bytes: u64) -> Result<bool, AppError> {
    let prompt = match mode {
        RemovalMode::Reversible => format!(
            "Move {count} director(ies) to the trash, reclaiming about {}?",
            format_bytes(bytes)
        ),
        RemovalMode::Permanent => format!(
            "Permanently delete {count} director(ies), reclaiming about {}? This cannot be undone.",
            format_bytes(bytes)
        ),
    };
    Ok(Confirm::new().with_prompt(prompt).default(false).interact()?)
}
