//! Atomic write operations for issue files.
//!
//! Writes use the temp-file-then-rename pattern:
//!
//! 1. Content is written to a sibling file with a `.tmp` suffix
//! 2. The temporary file is flushed to disk
//! 3. The temporary file is renamed over the target path
//!
//! Renames within one filesystem are atomic on POSIX systems, so a crash
//! leaves either the old content or the new content, never a partial file.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::Result;

/// Atomically replace the content of `path` with `content`.
///
/// # Errors
///
/// Returns an error if the temporary file cannot be written or the rename
/// fails. On failure the original file (if any) is left unchanged and the
/// temporary file is removed on a best-effort basis.
pub fn write_atomic<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
    let path = path.as_ref();
    let temp_path = make_temp_path(path);

    if let Err(e) = write_to_temp_file(&temp_path, content) {
        let _ = std::fs::remove_file(&temp_path);
        return Err(e);
    }

    std::fs::rename(&temp_path, path)?;
    tracing::trace!(path = %path.display(), bytes = content.len(), "Wrote issue file");
    Ok(())
}

/// Creates the temporary path used while writing `path`.
///
/// `.tmp` is appended to the full file name so `a.md` becomes `a.md.tmp`
/// and never matches the `.md` listing filter.
fn make_temp_path(path: &Path) -> PathBuf {
    let mut temp_path = path.to_path_buf();
    let new_extension = match path.extension() {
        Some(ext) => {
            let mut new_ext = ext.to_os_string();
            new_ext.push(".tmp");
            new_ext
        }
        None => std::ffi::OsString::from("tmp"),
    };
    temp_path.set_extension(new_extension);
    temp_path
}

fn write_to_temp_file(temp_path: &Path, content: &str) -> Result<()> {
    let mut file = File::create(temp_path)?;
    file.write_all(content.as_bytes())?;
    file.sync_all()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn make_temp_path_with_extension() {
        let temp = make_temp_path(Path::new("/issues/fix_login_bug.md"));
        assert_eq!(temp, Path::new("/issues/fix_login_bug.md.tmp"));
    }

    #[test]
    fn make_temp_path_without_extension() {
        let temp = make_temp_path(Path::new("/issues/notes"));
        assert_eq!(temp, Path::new("/issues/notes.tmp"));
    }

    #[test]
    fn atomic_write_creates_file() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("new.md");

        write_atomic(&target, "id\nTitle\n\nBody\n").unwrap();

        assert_eq!(std::fs::read_to_string(&target).unwrap(), "id\nTitle\n\nBody\n");
        assert!(!dir.path().join("new.md.tmp").exists());
    }

    #[test]
    fn atomic_write_replaces_existing_file() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("existing.md");
        std::fs::write(&target, "old content that is much longer than the new one\n").unwrap();

        write_atomic(&target, "new\n").unwrap();

        assert_eq!(std::fs::read_to_string(&target).unwrap(), "new\n");
    }

    #[test]
    fn atomic_write_into_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("missing").join("file.md");

        let result = write_atomic(&target, "content");

        assert!(matches!(result, Err(crate::Error::Io(_))));
        assert!(!target.exists());
    }
}
