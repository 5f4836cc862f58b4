//! Locating files inside an archive directory.

use std::fs;
use std::path::{Path, PathBuf};

/// Resolves the directory argument; an empty path means the current directory.
#[must_use]
pub fn archive_dir(path: &Path) -> PathBuf {
    if path.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        path.to_path_buf()
    }
}

/// Finds `name` in `dir`, falling back to a case-insensitive match.
///
/// Archives copied off Windows media often arrive with lower-cased names.
/// When several spellings exist the lexicographically smallest path wins.
#[must_use]
pub fn locate(dir: &Path, name: &str) -> Option<PathBuf> {
    let exact = dir.join(name);
    if exact.is_file() {
        return Some(exact);
    }

    fs::read_dir(dir)
        .ok()?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.eq_ignore_ascii_case(name))
                && path.is_file()
        })
        .min()
}
