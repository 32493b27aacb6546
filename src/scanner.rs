use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use crossbeam_channel::Receiver;
use tracing::warn;

use crate::config::Config;
use crate::error::AppError;
use crate::model::{ScanEvent, ScanStatus, ScanSummary};
use crate::path::validate_root;
use crate::scanners::{ProjectDetector, ProjectWalker};

/// Cooperative cancellation flag shared between a caller and a scan.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// State of one walk. Only the walking thread mutates it; the cancel token
/// may be set from anywhere.
#[derive(Debug)]
pub struct ScanSession {
    pub root: PathBuf,
    pub cancel: CancelToken,
    pub discovered: usize,
    pub status: ScanStatus,
}

impl ScanSession {
    pub fn new(root: PathBuf) -> Self {
        Self::with_token(root, CancelToken::new())
    }

    pub fn with_token(root: PathBuf, cancel: CancelToken) -> Self {
        ScanSession { root, cancel, discovered: 0, status: ScanStatus::Idle }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

/// Starts background scans, allowing at most one to run at a time.
pub struct Scanner {
    walker: Arc<ProjectWalker>,
    active: Arc<AtomicBool>,
}

impl Scanner {
    pub fn new(walker: ProjectWalker) -> Self {
        Self { walker: Arc::new(walker), active: Arc::new(AtomicBool::new(false)) }
    }

    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let exclude = config.compile_excludes()?;
        Ok(Scanner::new(ProjectWalker::new(ProjectDetector::default(), exclude)))
    }

    pub fn is_running(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Validate `root` and spawn the walk. Both a running scan and an
    /// unusable root are rejected before any work starts.
    pub fn start(&self, root: &Path) -> Result<ScanHandle, AppError> {
        if self.active.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire).is_err() {
            warn!("scan requested while another scan is running");
            return Err(AppError::ScanInProgress);
        }
        let guard = ActiveGuard(Arc::clone(&self.active));

        let root = validate_root(root)?;
        let mut session = ScanSession::new(root);
        let cancel = session.cancel.clone();
        let (tx, rx) = crossbeam_channel::unbounded();
        let walker = Arc::clone(&self.walker);

        let thread = thread::Builder::new().name("vuesweep-scan".into()).spawn(move || {
            let _guard = guard;
            walker.walk(&mut session, &mut |event| {
                // the receiver may have been dropped; the walk still runs to its end
                let _ = tx.send(event);
            })
        })?;

        Ok(ScanHandle { cancel, events: rx, thread })
    }
}

impl Default for Scanner {
    fn default() -> Self {
        Scanner::new(ProjectWalker::default())
    }
}

struct ActiveGuard(Arc<AtomicBool>);

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Caller's side of a running scan.
pub struct ScanHandle {
    cancel: CancelToken,
    events: Receiver<ScanEvent>,
    thread: JoinHandle<ScanSummary>,
}

impl ScanHandle {
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Deliver every event to `on_event` until the walk ends, then return
    /// its summary.
    pub fn wait<F>(self, mut on_event: F) -> Result<ScanSummary, AppError>
    where
        F: FnMut(ScanEvent),
    {
        for event in self.events.iter() {
            on_event(event);
        }
        self.join()
    }

    pub fn join(self) -> Result<ScanSummary, AppError> {
        self.thread.join().map_err(|_| AppError::WorkerPanicked)
    }
}
