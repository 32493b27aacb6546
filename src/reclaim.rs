//! Removal of artifact directories.
//!
//! A batch runs sequentially over its targets in the order given. A failure
//! is recorded against its own target and the batch moves on; nothing is
//! retried. Reversible removal exists only when the crate is built with the
//! `trash` feature, and asking for it otherwise is an error rather than a
//! quiet switch to permanent deletion.

use std::error::Error;
use std::fmt;
use std::fs;
use std::path::Path;
use std::thread::{self, JoinHandle};

use crossbeam_channel::Receiver;
use tracing::{info, warn};

use crate::error::AppError;
use crate::path::is_real_dir;
use crate::model::{
    ArtifactKind, DeletionOutcome, DeletionTarget, ProjectRecord, ReclaimEvent, ReclaimReport,
};

pub type RemovalResult = Result<(), Box<dyn Error + Send + Sync>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalMode {
    /// Move to the platform trash so the operator can restore it.
    Reversible,
    /// Remove the tree outright.
    Permanent,
}

impl fmt::Display for RemovalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemovalMode::Reversible => write!(f, "move to trash"),
            RemovalMode::Permanent => write!(f, "delete permanently"),
        }
    }
}

pub trait Remover: Send {
    fn mode(&self) -> RemovalMode;

    fn remove(&self, path: &Path) -> RemovalResult;
}

pub struct PermanentRemover;

impl Remover for PermanentRemover {
    fn mode(&self) -> RemovalMode {
        RemovalMode::Permanent
    }

    fn remove(&self, path: &Path) -> RemovalResult {
        let metadata = fs::symlink_metadata(path)?;
        if metadata.is_dir() {
            fs::remove_dir_all(path)?;
        } else {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

#[cfg(feature = "trash")]
pub struct TrashRemover;

#[cfg(feature = "trash")]
impl Remover for TrashRemover {
    fn mode(&self) -> RemovalMode {
        RemovalMode::Reversible
    }

    fn remove(&self, path: &Path) -> RemovalResult {
        // the trash backend reports a missing path inconsistently across platforms
        fs::symlink_metadata(path)?;
        trash::delete(path).map_err(|err| err.to_string())?;
        Ok(())
    }
}

pub fn remover_for(mode: RemovalMode) -> Result<Box<dyn Remover>, AppError> {
    match mode {
        RemovalMode::Permanent => Ok(Box::new(PermanentRemover)),
        RemovalMode::Reversible => reversible_remover(),
    }
}

#[cfg(feature = "trash")]
fn reversible_remover() -> Result<Box<dyn Remover>, AppError> {
    Ok(Box::new(TrashRemover))
}

#[cfg(not(feature = "trash"))]
fn reversible_remover() -> Result<Box<dyn Remover>, AppError> {
    Err(AppError::TrashUnavailable)
}

/// Deletion targets for the artifacts of `records` that are still
/// directories right now.
pub fn build_targets<'a, I>(records: I) -> Vec<DeletionTarget>
where
    I: IntoIterator<Item = &'a ProjectRecord>,
{
    let mut targets = Vec::new();
    for record in records {
        for kind in ArtifactKind::ALL {
            if let Some(path) = &record.artifact(kind).path
                && is_real_dir(path)
            {
                targets.push(DeletionTarget::new(record, kind, path));
            }
        }
    }
    targets
}

pub struct ReclamationExecutor {
    remover: Box<dyn Remover>,
}

impl ReclamationExecutor {
    pub fn new(remover: Box<dyn Remover>) -> Self {
        Self { remover }
    }

    pub fn for_mode(mode: RemovalMode) -> Result<Self, AppError> {
        Ok(Self::new(remover_for(mode)?))
    }

    pub fn mode(&self) -> RemovalMode {
        self.remover.mode()
    }

    /// Remove every target in order, reporting each start and outcome to
    /// `sink`.
    pub fn reclaim<F>(&self, targets: &[DeletionTarget], sink: &mut F) -> ReclaimReport
    where
        F: FnMut(ReclaimEvent),
    {
        let total = targets.len();
        info!(total, mode = %self.mode(), "reclaim started");

        let mut report = ReclaimReport::default();
        for (index, target) in targets.iter().enumerate() {
            sink(ReclaimEvent::Started { index: index + 1, total, label: target.label.clone() });

            let outcome = match self.remover.remove(&target.path) {
                Ok(()) => DeletionOutcome::succeeded(target.clone()),
                Err(err) => {
                    warn!("Failed to remove {}: {}", target.path.display(), err);
                    DeletionOutcome::failed(target.clone(), err.to_string())
                }
            };
            sink(ReclaimEvent::Outcome(outcome.clone()));
            report.outcomes.push(outcome);
        }

        let succeeded = report.succeeded();
        info!(succeeded, total, "reclaim finished");
        sink(ReclaimEvent::Finished { succeeded, total });
        report
    }

    /// Run the batch on a background thread. The batch cannot be cancelled
    /// once started.
    pub fn spawn(self, targets: Vec<DeletionTarget>) -> Result<ReclaimHandle, AppError> {
        let (tx, rx) = crossbeam_channel::unbounded();
        let thread = thread::Builder::new().name("vuesweep-reclaim".into()).spawn(move || {
            self.reclaim(&targets, &mut |event| {
                let _ = tx.send(event);
            })
        })?;
        Ok(ReclaimHandle { events: rx, thread })
    }
}

pub struct ReclaimHandle {
    events: Receiver<ReclaimEvent>,
    thread: JoinHandle<ReclaimReport>,
}

impl ReclaimHandle {
    pub fn wait<F>(self, mut on_event: F) -> Result<ReclaimReport, AppError>
    where
        F: FnMut(ReclaimEvent),
    {
        for event in self.events.iter() {
            on_event(event);
        }
        self.join()
    }

    pub fn join(self) -> Result<ReclaimReport, AppError> {
        self.thread.join().map_err(|_| AppError::WorkerPanicked)
    }
}
