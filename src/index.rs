//! Caller-owned collection of scan results.
//!
//! The engine only emits values; this is where they are reconciled by path,
//! filtered by inactivity and sorted for display.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::SystemTime;

use crate::config::Config;
use crate::error::AppError;
use crate::model::{ArtifactKind, DeletionOutcome, ProjectRecord, ReclaimReport, ScanEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Inserted,
    Updated,
}

#[derive(Debug, Clone, Default)]
pub struct ProjectIndex {
    records: BTreeMap<PathBuf, ProjectRecord>,
}

impl ProjectIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, path: &Path) -> Option<&ProjectRecord> {
        self.records.get(path)
    }

    pub fn upsert(&mut self, record: ProjectRecord) -> Upsert {
        match self.records.insert(record.path.clone(), record) {
            Some(_) => Upsert::Updated,
            None => Upsert::Inserted,
        }
    }

    pub fn apply_event(&mut self, event: &ScanEvent) -> Option<Upsert> {
        match event {
            ScanEvent::Discovered(record) => Some(self.upsert(record.clone())),
            ScanEvent::Status(_) | ScanEvent::Finished(_) => None,
        }
    }

    /// Fold a deletion result into the owning record. Returns true when a
    /// size changed.
    pub fn apply_outcome(&mut self, outcome: &DeletionOutcome) -> bool {
        let Some(size) = outcome.updated_size() else {
            return false;
        };
        match self.records.get_mut(&outcome.target.owner) {
            Some(record) => {
                record.artifact_mut(outcome.target.kind).size = size;
                true
            }
            None => false,
        }
    }

    pub fn apply_report(&mut self, report: &ReclaimReport) {
        for outcome in &report.outcomes {
            self.apply_outcome(outcome);
        }
    }

    pub fn selected<'a>(&'a self, paths: &'a [PathBuf]) -> impl Iterator<Item = &'a ProjectRecord> {
        paths.iter().filter_map(|path| self.records.get(path))
    }

    pub fn estimate(&self, paths: &[PathBuf]) -> Selection {
        self.selected(paths).fold(Selection::default(), |selection, record| Selection {
            projects: selection.projects + 1,
            bytes: selection.bytes.saturating_add(record.reclaimable_bytes()),
        })
    }

    /// Records passing the view's filter, in the view's order.
    pub fn visible(&self, view: &ViewOptions, now: SystemTime) -> Vec<&ProjectRecord> {
        let mut rows: Vec<&ProjectRecord> = self
            .records
            .values()
            .filter(|record| !view.only_inactive || record.is_inactive(view.threshold_days, now))
            .collect();
        rows.sort_by(|a, b| {
            let ordering = view.sort.compare(a, b, now);
            if view.descending { ordering.reverse() } else { ordering }
        });
        rows
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    pub projects: usize,
    pub bytes: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Name,
    Days,
    Dependencies,
    BuildOutput,
    Reclaimable,
    Path,
}

impl SortKey {
    pub const ALL: [SortKey; 6] = [
        SortKey::Name,
        SortKey::Days,
        SortKey::Dependencies,
        SortKey::BuildOutput,
        SortKey::Reclaimable,
        SortKey::Path,
    ];

    /// Every accepted key, comma separated.
    pub fn names() -> String {
        SortKey::ALL.iter().map(SortKey::as_str).collect::<Vec<_>>().join(", ")
    }

    pub fn from_name(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "name" => Some(SortKey::Name),
            "days" => Some(SortKey::Days),
            "dependencies" | "node_modules" => Some(SortKey::Dependencies),
            "build" | "dist" => Some(SortKey::BuildOutput),
            "reclaimable" | "size" => Some(SortKey::Reclaimable),
            "path" => Some(SortKey::Path),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Name => "name",
            SortKey::Days => "days",
            SortKey::Dependencies => "dependencies",
            SortKey::BuildOutput => "build",
            SortKey::Reclaimable => "reclaimable",
            SortKey::Path => "path",
        }
    }

    /// Numeric columns read best largest-first.
    pub fn default_descending(&self) -> bool {
        !matches!(self, SortKey::Name | SortKey::Path)
    }

    fn compare(&self, a: &ProjectRecord, b: &ProjectRecord, now: SystemTime) -> Ordering {
        match self {
            SortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortKey::Days => a.inactive_days_at(now).cmp(&b.inactive_days_at(now)),
            SortKey::Dependencies => artifact_size(a, ArtifactKind::Dependencies)
                .cmp(&artifact_size(b, ArtifactKind::Dependencies)),
            SortKey::BuildOutput => artifact_size(a, ArtifactKind::BuildOutput)
                .cmp(&artifact_size(b, ArtifactKind::BuildOutput)),
            SortKey::Reclaimable => a.reclaimable_bytes().cmp(&b.reclaimable_bytes()),
            SortKey::Path => a
                .path
                .to_string_lossy()
                .to_lowercase()
                .cmp(&b.path.to_string_lossy().to_lowercase()),
        }
    }
}

fn artifact_size(record: &ProjectRecord, kind: ArtifactKind) -> u64 {
    record.artifact(kind).size
}

impl FromStr for SortKey {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::from_name(s).ok_or_else(|| AppError::InvalidSortKey(s.to_string()))
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewOptions {
    pub only_inactive: bool,
    pub threshold_days: u64,
    pub sort: SortKey,
    pub descending: bool,
}

impl ViewOptions {
    pub fn from_config(config: &Config) -> Self {
        ViewOptions {
            only_inactive: config.only_inactive,
            threshold_days: config.threshold_days,
            ..ViewOptions::default()
        }
    }

    /// Sort by `key` in its natural direction, flipped when `reverse` is set.
    pub fn sorted_by(mut self, key: SortKey, reverse: bool) -> Self {
        self.sort = key;
        self.descending = key.default_descending() != reverse;
        self
    }
}

impl Default for ViewOptions {
    fn default() -> Self {
        ViewOptions {
            only_inactive: true,
            threshold_days: crate::config::DEFAULT_THRESHOLD_DAYS,
            sort: SortKey::Days,
            descending: true,
        }
    }
}
