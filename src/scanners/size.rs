use std::path::Path;

use tracing::debug;
use walkdir::WalkDir;

use crate::path::is_real_dir;

/// Total byte length of the regular files below `path`.
///
/// Symbolic links are neither followed nor counted. Entries that cannot be
/// read are skipped, so the result may undercount but never fails. A missing
/// path, a symlink, or anything else that is not a directory yields 0.
pub fn dir_size(path: &Path) -> u64 {
    if !is_real_dir(path) {
        return 0;
    }

    let mut total = 0u64;
    for entry in WalkDir::new(path).follow_links(false).follow_root_links(false).min_depth(1) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                debug!("Skipping {:?}: {}", err.path(), err);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        match entry.metadata() {
            Ok(metadata) => total = total.saturating_add(metadata.len()),
            Err(err) => debug!("Skipping {}: {}", entry.path().display(), err),
        }
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn sums_nested_files() {
        let temp = tempfile::tempdir().unwrap();
        fs::create_dir_all(temp.path().join("a/b")).unwrap();
        fs::write(temp.path().join("top.bin"), vec![0u8; 100]).unwrap();
        fs::write(temp.path().join("a/b/deep.bin"), vec![0u8; 250]).unwrap();

        assert_eq!(dir_size(temp.path()), 350);
    }

    #[test]
    fn missing_or_file_path_is_zero() {
        let temp = tempfile::tempdir().unwrap();
        let file = temp.path().join("file.txt");
        fs::write(&file, "hello").unwrap();

        assert_eq!(dir_size(&file), 0);
        assert_eq!(dir_size(&temp.path().join("absent")), 0);
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_are_not_counted() {
        let temp = tempfile::tempdir().unwrap();
        let outside = temp.path().join("outside");
        let measured = temp.path().join("measured");
        fs::create_dir_all(&outside).unwrap();
        fs::create_dir_all(&measured).unwrap();
        fs::write(outside.join("big.bin"), vec![0u8; 4_096]).unwrap();
        fs::write(measured.join("small.bin"), vec![0u8; 10]).unwrap();
        std::os::unix::fs::symlink(&outside, measured.join("dir-link")).unwrap();
        std::os::unix::fs::symlink(outside.join("big.bin"), measured.join("file-link")).unwrap();
        std::os::unix::fs::symlink(&measured, measured.join("loop")).unwrap();

        assert_eq!(dir_size(&measured), 10);
    }

    #[cfg(unix)]
    #[test]
    fn linked_root_is_zero() {
        let temp = tempfile::tempdir().unwrap();
        let target = temp.path().join("store");
        fs::create_dir_all(&target).unwrap();
        fs::write(target.join("pkg.js"), vec![0u8; 2_048]).unwrap();
        let link = temp.path().join("node_modules");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        assert_eq!(dir_size(&link), 0);
        assert_eq!(dir_size(&target), 2_048);
    }
}
