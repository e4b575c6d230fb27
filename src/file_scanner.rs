use crate::ignore_rules::IgnorePredicate;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Directory,
    File,
}

/// One immediate child of a scanned directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildEntry {
    pub name: OsString,
    pub kind: EntryKind,
    /// Canonical target when the entry is a symlink to a file.
    pub link_target: Option<PathBuf>,
}

/// Lists the immediate children of `dir`: directories first, then files,
/// each group ordered by raw name bytes.
///
/// Entries whose base name matches `ignore` are dropped. A directory that
/// cannot be read is treated as empty. Symlinks are never descended into: a
/// link to a file counts as a file and carries its canonical target,
/// anything else behind a link is skipped.
pub fn list_children(dir: &Path, ignore: &IgnorePredicate) -> Vec<ChildEntry> {
    let mut children = Vec::new();

    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false);

    for result in walker {
        let dirent = match result {
            Ok(v) => v,
            Err(e) => {
                let path = e.path().unwrap_or(dir).to_path_buf();
                warn!(
                    event = "scanner.read_dir.failed",
                    path = %path.display(),
                    error = %e
                );
                continue;
            }
        };

        let name = dirent.file_name().to_os_string();
        if ignore.matches(&name.to_string_lossy()) {
            debug!(event = "scanner.entry.ignored", path = %dirent.path().display());
            continue;
        }

        let file_type = dirent.file_type();
        let (kind, link_target) = if file_type.is_dir() {
            (EntryKind::Directory, None)
        } else if file_type.is_file() {
            (EntryKind::File, None)
        } else if file_type.is_symlink() {
            match fs::canonicalize(dirent.path()) {
                Ok(target) if target.is_file() => (EntryKind::File, Some(target)),
                _ => {
                    debug!(event = "scanner.symlink.skipped", path = %dirent.path().display());
                    continue;
                }
            }
        } else {
            continue;
        };

        children.push(ChildEntry {
            name,
            kind,
            link_target,
        });
    }

    children.sort_by(|a, b| {
        let a_key = (a.kind != EntryKind::Directory, &a.name);
        let b_key = (b.kind != EntryKind::Directory, &b.name);
        a_key.cmp(&b_key)
    });
    children
}
