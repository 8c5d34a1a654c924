//! Replacing a file with another in one directory-entry swap.

use super::StoreError;
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, warn};

/// Remove-then-rename attempts made after a plain rename fails.
pub const REPLACE_ATTEMPTS: u32 = 5;

/// Move `src` over `dst`.
///
/// POSIX `rename` replaces an existing target atomically. Elsewhere the
/// replace is emulated with [`replace_with_retry`].
pub fn replace_file(src: &Path, dst: &Path) -> Result<(), StoreError> {
    #[cfg(unix)]
    {
        fs::rename(src, dst).map_err(StoreError::Io)
    }

    #[cfg(not(unix))]
    {
        replace_with_retry(src, dst, |from, to| fs::rename(from, to))
    }
}

/// Emulate an atomic replace with a rename that refuses existing targets.
///
/// Tries `rename` once. On failure it removes `dst` and renames again, up to
/// [`REPLACE_ATTEMPTS`] times; a concurrent writer may recreate `dst` between
/// the two steps. When every attempt fails the last rename error is kept as
/// the source of [`StoreError::ReplaceFailed`].
pub fn replace_with_retry<F>(src: &Path, dst: &Path, mut rename: F) -> Result<(), StoreError>
where
    F: FnMut(&Path, &Path) -> io::Result<()>,
{
    let mut last_error = match rename(src, dst) {
        Ok(()) => return Ok(()),
        Err(e) => e,
    };

    for attempt in 1..=REPLACE_ATTEMPTS {
        warn!(
            src = %src.display(),
            dst = %dst.display(),
            attempt,
            error = %last_error,
            "Rename failed, removing target and retrying"
        );

        match fs::remove_file(dst) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => debug!(dst = %dst.display(), error = %e, "Could not remove target"),
        }

        match rename(src, dst) {
            Ok(()) => return Ok(()),
            Err(e) => last_error = e,
        }
    }

    Err(StoreError::ReplaceFailed {
        src: src.to_path_buf(),
        dst: dst.to_path_buf(),
        attempts: REPLACE_ATTEMPTS,
        source: last_error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;
    use tempfile::TempDir;

    fn setup() -> (TempDir, std::path::PathBuf, std::path::PathBuf) {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("tile.json.swp");
        let dst = temp.path().join("tile.json");
        fs::write(&src, b"new").unwrap();
        fs::write(&dst, b"old").unwrap();
        (temp, src, dst)
    }

    #[test]
    fn test_replace_file_overwrites_target() {
        let (_temp, src, dst) = setup();
        replace_file(&src, &dst).unwrap();
        assert_eq!(fs::read(&dst).unwrap(), b"new");
        assert!(!src.exists());
    }

    #[test]
    fn test_retry_removes_target_when_rename_refuses() {
        let (_temp, src, dst) = setup();
        let mut calls = 0;
        replace_with_retry(&src, &dst, |from, to| {
            calls += 1;
            if to.exists() {
                Err(io::Error::new(io::ErrorKind::AlreadyExists, "target exists"))
            } else {
                fs::rename(from, to)
            }
        })
        .unwrap();

        assert_eq!(calls, 2);
        assert_eq!(fs::read(&dst).unwrap(), b"new");
    }

    #[test]
    fn test_retry_tolerates_recreated_target() {
        let (_temp, src, dst) = setup();
        let mut calls = 0;
        replace_with_retry(&src, &dst, |from, to| {
            calls += 1;
            if calls < 4 {
                // another writer keeps putting the target back
                fs::write(to, b"racer")?;
                Err(io::Error::new(io::ErrorKind::AlreadyExists, "target exists"))
            } else {
                fs::rename(from, to)
            }
        })
        .unwrap();

        assert_eq!(calls, 4);
        assert_eq!(fs::read(&dst).unwrap(), b"new");
    }

    #[test]
    fn test_retry_exhaustion_chains_last_error() {
        let (_temp, src, dst) = setup();
        let mut calls = 0u32;
        let err = replace_with_retry(&src, &dst, |_, _| {
            calls += 1;
            Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("denied #{}", calls),
            ))
        })
        .unwrap_err();

        assert_eq!(calls, REPLACE_ATTEMPTS + 1);
        match &err {
            StoreError::ReplaceFailed { attempts, source, .. } => {
                assert_eq!(*attempts, REPLACE_ATTEMPTS);
                assert_eq!(source.kind(), io::ErrorKind::PermissionDenied);
                assert_eq!(source.to_string(), "denied #6");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.source().is_some());
        assert!(src.exists());
    }
}
