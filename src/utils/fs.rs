//! File system utilities.

use crate::error::Result;
use std::{
    io,
    path::{Path, PathBuf},
};
use tokio::fs;

/// Removes everything inside `dir`, keeping `dir` itself.
///
/// A missing directory is not an error. Symlinks are removed, never followed.
/// Returns the number of top-level entries removed.
pub async fn clear_dir_contents(dir: &Path) -> Result<usize> {
    let mut entries = match fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0), // Idempotent
        Err(e) => return Err(e.into()),
    };

    let mut removed = 0;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let file_type = entry.file_type().await?;

        let result = if file_type.is_dir() {
            fs::remove_dir_all(&path).await
        } else {
            fs::remove_file(&path).await
        };

        match result {
            Ok(()) => removed += 1,
            // Removed concurrently by someone else
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
    }

    Ok(removed)
}

/// Lists the regular files directly inside `dir`, the way the shell expands `dir/*`.
///
/// Hidden files and subdirectories are skipped; the result is sorted by name.
/// A missing directory yields an empty list.
pub async fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = match fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        // Follows symlinks, like the upload tool will
        if fs::metadata(entry.path()).await.map(|m| m.is_file()).unwrap_or(false) {
            files.push(entry.path());
        }
    }

    files.sort();
    Ok(files)
}
