use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use indicatif::{ProgressBar, ProgressStyle};

use crate::config::Config;
use crate::error::AppError;
use crate::index::{ProjectIndex, SortKey, ViewOptions};
use crate::model::{ScanEvent, ScanSummary};
use crate::report;
use crate::scanner::Scanner;

pub struct ScanOptions {
    pub root: PathBuf,
    pub threshold_days: Option<u64>,
    pub show_all: bool,
    pub sort: SortKey,
    pub reverse: bool,
    pub json: bool,
}

pub fn execute_scan(options: ScanOptions) -> Result<ProjectIndex, AppError> {
    let config = Config::load()?;
    let scanner = Scanner::from_config(&config)?;
    let (index, summary) = run_scan(&scanner, &options.root, !options.json)?;

    let view = view_options(&config, options.threshold_days, options.show_all)
        .sorted_by(options.sort, options.reverse);
    let now = SystemTime::now();
    let rows = index.visible(&view, now);

    if options.json {
        println!("{}", report::render_json(&summary, &rows, &view, now)?);
    } else {
        print!("{}", report::render_table(&rows, now));
        let reclaimable = rows.iter().map(|record| record.reclaimable_bytes()).sum();
        println!("{}", report::summary_line(&summary, rows.len(), reclaimable));
    }
    Ok(index)
}

/// Run a scan in the background, folding its records into a fresh index
/// while a spinner shows the latest status line.
pub(crate) fn run_scan(
    scanner: &Scanner,
    root: &Path,
    show_progress: bool,
) -> Result<(ProjectIndex, ScanSummary), AppError> {
    let handle = scanner.start(root)?;

    let spinner = if show_progress { ProgressBar::new_spinner() } else { ProgressBar::hidden() };
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("Scanning…");
    spinner.enable_steady_tick(Duration::from_millis(120));

    let mut index = ProjectIndex::new();
    let summary = handle.wait(|event| {
        index.apply_event(&event);
        if let ScanEvent::Status(text) = event {
            spinner.set_message(text);
        }
    })?;
    spinner.finish_and_clear();

    Ok((index, summary))
}

pub(crate) fn view_options(config: &Config, threshold_days: Option<u64>, show_all: bool) -> ViewOptions {
    let mut view = ViewOptions::from_config(config);
    if let Some(days) = threshold_days {
        view.threshold_days = days;
    }
    if show_all {
        view.only_inactive = false;
    }
    view
}
