use std::path::Path;
use std::time::Instant;

use globset::GlobSet;
use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

use crate::model::{ArtifactKind, ArtifactSlot, ProjectRecord, ScanEvent, ScanStatus, ScanSummary, projects};
use crate::path::{is_excluded, is_real_dir};
use crate::scanner::ScanSession;

use super::{ProjectDetector, dir_size, is_pruned_dir, last_activity};

/// Top-down traversal that turns every qualifying directory into a
/// [`ProjectRecord`] and hands it to the sink as soon as it is complete.
pub struct ProjectWalker {
    detector: ProjectDetector,
    exclude: Option<GlobSet>,
}

impl ProjectWalker {
    pub fn new(detector: ProjectDetector, exclude: Option<GlobSet>) -> Self {
        Self { detector, exclude }
    }

    /// Walk `session.root`, emitting records, status text and finally the
    /// summary. The cancel flag is polled before each directory and between
    /// artifacts; a project interrupted half-way is not emitted.
    pub fn walk<F>(&self, session: &mut ScanSession, sink: &mut F) -> ScanSummary
    where
        F: FnMut(ScanEvent),
    {
        let started = Instant::now();
        session.status = ScanStatus::Running;
        info!(root = %session.root.display(), "scan started");

        let walker = WalkDir::new(&session.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !self.should_prune(entry));

        let mut cancelled = false;
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    debug!("Skipping {:?}: {}", err.path(), err);
                    continue;
                }
            };
            if !entry.file_type().is_dir() {
                continue;
            }

            if session.is_cancelled() {
                cancelled = true;
                break;
            }
            if !self.detector.is_project(entry.path()) {
                continue;
            }

            let Some(record) = self.build_record(entry.path(), session) else {
                cancelled = true;
                break;
            };
            session.discovered += 1;
            debug!(project = %record.path.display(), bytes = record.reclaimable_bytes(), "project found");
            sink(ScanEvent::Discovered(record));
            sink(ScanEvent::Status(format!(
                "Found {} {}…",
                session.discovered,
                projects(session.discovered)
            )));
        }

        session.status = if cancelled { ScanStatus::Cancelled } else { ScanStatus::Completed };

        let summary = ScanSummary {
            root: session.root.clone(),
            discovered: session.discovered,
            status: session.status,
            elapsed: started.elapsed(),
        };
        info!(
            discovered = summary.discovered,
            status = ?summary.status,
            elapsed_ms = summary.elapsed.as_millis() as u64,
            "scan finished"
        );
        sink(ScanEvent::Status(summary.message()));
        sink(ScanEvent::Finished(summary.clone()));
        summary
    }

    fn should_prune(&self, entry: &DirEntry) -> bool {
        is_pruned_dir(entry)
            || (entry.file_type().is_dir() && is_excluded(entry.path(), self.exclude.as_ref()))
    }

    fn build_record(&self, dir: &Path, session: &ScanSession) -> Option<ProjectRecord> {
        let mut record = ProjectRecord::new(dir.to_path_buf());

        for kind in ArtifactKind::ALL {
            if session.is_cancelled() {
                return None;
            }
            let path = dir.join(kind.dir_name());
            // a linked artifact points at storage the project does not own
            if is_real_dir(&path) {
                let size = dir_size(&path);
                *record.artifact_mut(kind) = ArtifactSlot { path: Some(path), size };
            }
        }

        if session.is_cancelled() {
            return None;
        }
        record.last_active_at = last_activity(dir);
        Some(record)
    }
}

impl Default for ProjectWalker {
    fn default() -> Self {
        ProjectWalker::new(ProjectDetector::default(), None)
    }
}
