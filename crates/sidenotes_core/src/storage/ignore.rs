//! Ignore-file (`.gitignore`) entry maintenance.

use super::{StorageError, StorageResult};
use log::info;
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::Path;

/// Result of `ensure_ignore_entry`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreEntryStatus {
    AlreadyPresent,
    Appended,
}

/// Returns whether `content` already has a line excluding `entry`.
///
/// Lines are compared after trimming; anchored (`/entry`) and
/// directory-only (`entry/`) spellings count as the same exclusion.
pub fn contains_entry(content: &str, entry: &str) -> bool {
    content.lines().map(str::trim).any(|line| {
        let line = line.strip_prefix('/').unwrap_or(line);
        let line = line.strip_suffix('/').unwrap_or(line);
        line == entry
    })
}

/// Ensures `ignore_file` exists and carries a line for `entry`.
///
/// Existing content is never rewritten; the entry is appended on its own
/// line when missing.
pub fn ensure_entry(ignore_file: &Path, entry: &str) -> StorageResult<IgnoreEntryStatus> {
    let content = match std::fs::read_to_string(ignore_file) {
        Ok(content) => content,
        Err(err) if err.kind() == ErrorKind::NotFound => String::new(),
        Err(err) => return Err(StorageError::io(ignore_file, err)),
    };

    if contains_entry(&content, entry) {
        return Ok(IgnoreEntryStatus::AlreadyPresent);
    }

    let mut line = String::new();
    if !content.is_empty() && !content.ends_with('\n') {
        line.push('\n');
    }
    line.push_str(entry);
    line.push('\n');

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(ignore_file)
        .map_err(|err| StorageError::io(ignore_file, err))?;
    file.write_all(line.as_bytes())
        .map_err(|err| StorageError::io(ignore_file, err))?;

    info!(
        "event=ignore_entry_appended module=storage status=ok file={} entry={}",
        ignore_file.display(),
        entry
    );
    Ok(IgnoreEntryStatus::Appended)
}

#[cfg(test)]
mod tests {
    use super::contains_entry;

    #[test]
    fn contains_entry_matches_whole_lines_only() {
        assert!(contains_entry("target\n.notes\n", ".notes"));
        assert!(contains_entry("  /.notes/  ", ".notes"));
        assert!(!contains_entry("my.notes.bak\n", ".notes"));
        assert!(!contains_entry(".notes-old\n", ".notes"));
        assert!(!contains_entry("", ".notes"));
    }
}
