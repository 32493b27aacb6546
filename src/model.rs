use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use serde::Serialize;

pub const SECONDS_PER_DAY: u64 = 86_400;

/// Inactivity reported for a project whose last activity could not be read.
pub const UNKNOWN_INACTIVE_DAYS: u64 = 99_999;

/// Reclaimable subdirectories a project may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Dependencies,
    BuildOutput,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 2] = [ArtifactKind::Dependencies, ArtifactKind::BuildOutput];

    /// Name of the subdirectory holding this artifact inside a project.
    pub fn dir_name(&self) -> &'static str {
        match self {
            ArtifactKind::Dependencies => "node_modules",
            ArtifactKind::BuildOutput => "dist",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.dir_name())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactSlot {
    /// Present only when the subdirectory existed at scan time.
    pub path: Option<PathBuf>,
    pub size: u64,
}

/// One discovered project. `path` is the unique key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRecord {
    pub path: PathBuf,
    pub name: String,
    pub last_active_at: Option<SystemTime>,
    pub dependencies: ArtifactSlot,
    pub build_output: ArtifactSlot,
}

impl ProjectRecord {
    pub fn new(path: PathBuf) -> Self {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        ProjectRecord {
            path,
            name,
            last_active_at: None,
            dependencies: ArtifactSlot::default(),
            build_output: ArtifactSlot::default(),
        }
    }

    pub fn artifact(&self, kind: ArtifactKind) -> &ArtifactSlot {
        match kind {
            ArtifactKind::Dependencies => &self.dependencies,
            ArtifactKind::BuildOutput => &self.build_output,
        }
    }

    pub fn artifact_mut(&mut self, kind: ArtifactKind) -> &mut ArtifactSlot {
        match kind {
            ArtifactKind::Dependencies => &mut self.dependencies,
            ArtifactKind::BuildOutput => &mut self.build_output,
        }
    }

    pub fn reclaimable_bytes(&self) -> u64 {
        self.dependencies.size.saturating_add(self.build_output.size)
    }

    pub fn inactive_days(&self) -> u64 {
        self.inactive_days_at(SystemTime::now())
    }

    /// Whole days between the last activity and `now`. Timestamps in the
    /// future count as zero days.
    pub fn inactive_days_at(&self, now: SystemTime) -> u64 {
        match self.last_active_at {
            Some(at) => now.duration_since(at).map(|d| d.as_secs() / SECONDS_PER_DAY).unwrap_or(0),
            None => UNKNOWN_INACTIVE_DAYS,
        }
    }

    pub fn is_inactive(&self, threshold_days: u64, now: SystemTime) -> bool {
        self.inactive_days_at(now) >= threshold_days
    }
}

/// A single directory queued for removal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionTarget {
    pub path: PathBuf,
    pub kind: ArtifactKind,
    pub owner: PathBuf,
    pub label: String,
}

impl DeletionTarget {
    pub fn new(owner: &ProjectRecord, kind: ArtifactKind, path: &Path) -> Self {
        DeletionTarget {
            path: path.to_path_buf(),
            kind,
            owner: owner.path.clone(),
            label: format!("{} · {}", owner.name, kind.dir_name()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomeStatus {
    Succeeded,
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionOutcome {
    pub target: DeletionTarget,
    pub status: OutcomeStatus,
}

impl DeletionOutcome {
    pub fn succeeded(target: DeletionTarget) -> Self {
        DeletionOutcome { target, status: OutcomeStatus::Succeeded }
    }

    pub fn failed<S: Into<String>>(target: DeletionTarget, reason: S) -> Self {
        DeletionOutcome { target, status: OutcomeStatus::Failed { reason: reason.into() } }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status, OutcomeStatus::Succeeded)
    }

    /// Size the owner's artifact should now report, or `None` to leave it
    /// as it was.
    pub fn updated_size(&self) -> Option<u64> {
        if self.is_success() { Some(0) } else { None }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReclaimReport {
    pub outcomes: Vec<DeletionOutcome>,
}

impl ReclaimReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|outcome| outcome.is_success()).count()
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn failures(&self) -> impl Iterator<Item = &DeletionOutcome> {
        self.outcomes.iter().filter(|outcome| !outcome.is_success())
    }

    pub fn message(&self) -> String {
        format!("Done: cleaned {}/{} directories", self.succeeded(), self.total())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanStatus {
    Idle,
    Running,
    Completed,
    Cancelled,
}

impl ScanStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ScanStatus::Completed | ScanStatus::Cancelled)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanSummary {
    pub root: PathBuf,
    pub discovered: usize,
    pub status: ScanStatus,
    pub elapsed: Duration,
}

impl ScanSummary {
    pub fn message(&self) -> String {
        match self.status {
            ScanStatus::Cancelled => {
                format!("Scan cancelled, found {} {}", self.discovered, projects(self.discovered))
            }
            _ => format!("Scan complete, found {} {}", self.discovered, projects(self.discovered)),
        }
    }
}

/// Emitted by a walk. Consumers upsert `Discovered` records by path.
#[derive(Debug, Clone)]
pub enum ScanEvent {
    Discovered(ProjectRecord),
    Status(String),
    Finished(ScanSummary),
}

#[derive(Debug, Clone)]
pub enum ReclaimEvent {
    Started { index: usize, total: usize, label: String },
    Outcome(DeletionOutcome),
    Finished { succeeded: usize, total: usize },
}

pub(crate) fn projects(count: usize) -> &'static str {
    if count == 1 { "project" } else { "projects" }
}
