use std::fs::{self, Metadata};
use std::path::Path;
use std::time::SystemTime;

use tracing::debug;
use walkdir::WalkDir;

use super::is_pruned_dir;

/// Most recent modification or status-change time found below `path`.
///
/// Pruned directories (VCS metadata, editor settings, installed dependencies,
/// build output) are not descended into and do not contribute. When nothing
/// below `path` yields a timestamp the directory's own time is used; `None`
/// means even that was unreadable.
pub fn last_activity(path: &Path) -> Option<SystemTime> {
    let mut latest: Option<SystemTime> = None;

    let walker = WalkDir::new(path)
        .follow_links(false)
        .min_depth(1)
        .into_iter()
        .filter_entry(|entry| !is_pruned_dir(entry));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                debug!("Skipping {:?}: {}", err.path(), err);
                continue;
            }
        };

        match entry.metadata() {
            Ok(metadata) => latest = latest.max(entry_timestamp(&metadata)),
            Err(err) => debug!("Skipping {}: {}", entry.path().display(), err),
        }
    }

    latest.or_else(|| fs::metadata(path).ok().and_then(|metadata| entry_timestamp(&metadata)))
}

fn entry_timestamp(metadata: &Metadata) -> Option<SystemTime> {
    metadata.modified().ok().max(status_changed(metadata))
}

#[cfg(unix)]
fn status_changed(metadata: &Metadata) -> Option<SystemTime> {
    use std::os::unix::fs::MetadataExt;
    use std::time::{Duration, UNIX_EPOCH};

    let secs = u64::try_from(metadata.ctime()).ok()?;
    let nanos = u32::try_from(metadata.ctime_nsec()).ok()?;
    UNIX_EPOCH.checked_add(Duration::new(secs, nanos))
}

// Windows has no inode change time; creation time is the closest stand-in.
#[cfg(not(unix))]
fn status_changed(metadata: &Metadata) -> Option<SystemTime> {
    metadata.created().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn empty_directory_falls_back_to_its_own_time() {
        let temp = tempfile::tempdir().unwrap();
        assert!(last_activity(temp.path()).is_some());
    }

    #[test]
    fn missing_directory_is_unknown() {
        let temp = tempfile::tempdir().unwrap();
        assert_eq!(last_activity(&temp.path().join("gone")), None);
    }

    #[test]
    fn pruned_directories_do_not_count() {
        let temp = tempfile::tempdir().unwrap();
        let project = temp.path().join("app");
        fs::create_dir_all(project.join("src")).unwrap();
        fs::create_dir_all(project.join("node_modules/pkg")).unwrap();
        fs::create_dir_all(project.join(".git")).unwrap();
        fs::write(project.join("src/main.js"), "export {}").unwrap();

        let before = last_activity(&project).unwrap();
        thread::sleep(Duration::from_millis(50));
        fs::write(project.join("node_modules/pkg/index.js"), "module.exports = {}").unwrap();
        fs::write(project.join(".git/HEAD"), "ref: refs/heads/main").unwrap();

        assert_eq!(last_activity(&project), Some(before));
    }

    #[test]
    fn newer_source_file_moves_the_timestamp_forward() {
        let temp = tempfile::tempdir().unwrap();
        let project = temp.path().join("app");
        fs::create_dir_all(project.join("src")).unwrap();
        fs::write(project.join("src/main.js"), "export {}").unwrap();

        let before = last_activity(&project).unwrap();
        thread::sleep(Duration::from_millis(50));
        fs::write(project.join("src/main.js"), "export default 1").unwrap();

        assert!(last_activity(&project).unwrap() > before);
    }
}
