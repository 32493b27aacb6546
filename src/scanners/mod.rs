//! Filesystem probes used by a project scan.
//!
//! Every probe here recovers from unreadable entries locally: a permission
//! error or a file that vanished mid-walk is logged and skipped, never
//! returned to the caller.

use walkdir::DirEntry;

pub mod activity;
pub mod detector;
pub mod size;
pub mod walker;

pub use activity::last_activity;
pub use detector::{MANIFEST_FILE, ProjectDetector, VUE_SIGNATURES};
pub use size::dir_size;
pub use walker::ProjectWalker;

/// Directory names that are never descended into, neither by the project
/// walk nor by the activity probe.
pub const PRUNED_DIRS: &[&str] = &[
    "node_modules",
    "dist",
    ".git",
    ".idea",
    ".vscode",
    "build",
    "out",
    ".next",
    ".nuxt",
    ".vercel",
];

pub fn is_pruned_name(name: &str) -> bool {
    PRUNED_DIRS.contains(&name)
}

pub(crate) fn is_pruned_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir() && entry.file_name().to_str().is_some_and(is_pruned_name)
}
