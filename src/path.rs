use std::path::{Path, PathBuf};

use dirs_next as dirs;

use crate::error::AppError;

/// The directory to scan when none is given: the home directory, or the
/// current directory when home is unknown.
pub fn resolve_root(explicit: Option<PathBuf>) -> PathBuf {
    explicit
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// Absolute form of `root`, provided it names an existing directory.
pub fn validate_root(root: &Path) -> Result<PathBuf, AppError> {
    if root.as_os_str().is_empty() || !root.is_dir() {
        return Err(AppError::InvalidRoot(root.to_path_buf()));
    }
    root.canonicalize().map_err(|_| AppError::InvalidRoot(root.to_path_buf()))
}

/// True when `path` is itself a directory. A symlink to a directory is not.
pub fn is_real_dir(path: &Path) -> bool {
    std::fs::symlink_metadata(path).is_ok_and(|metadata| metadata.is_dir())
}

pub fn is_excluded(path: &Path, exclude: Option<&globset::GlobSet>) -> bool {
    if let Some(set) = exclude {
        let candidate = if path.is_absolute() {
            path.to_string_lossy().to_string()
        } else {
            match std::env::current_dir() {
                Ok(cwd) => cwd.join(path).to_string_lossy().to_string(),
                Err(_) => path.to_string_lossy().to_string(),
            }
        };
        set.is_match(&candidate)
    } else {
        false
    }
}
