//! Upload argument discovery.

use crate::error::Result;
use crate::process::Executor;
use std::ffi::OsString;
use std::path::Path;

/// Artifacts to hand to the upload tool, relative to the project directory.
///
/// Lists `project_dir/dist_dir`. When nothing matches, returns the literal
/// `dist_dir/*` pattern, which is what an unmatched shell glob passes on.
pub async fn upload_arguments<E: Executor>(
    executor: &E,
    project_dir: &Path,
    dist_dir: &Path,
) -> Result<Vec<OsString>> {
    let found = executor.list_files(&project_dir.join(dist_dir)).await?;

    if found.is_empty() {
        log::warn!(
            "No artifacts in {}, passing the pattern through unexpanded",
            dist_dir.display()
        );
        return Ok(vec![glob_pattern(dist_dir)]);
    }

    Ok(found
        .iter()
        .filter_map(|path| path.file_name())
        .map(|name| dist_dir.join(name).into_os_string())
        .collect())
}

fn glob_pattern(dist_dir: &Path) -> OsString {
    dist_dir.join("*").into_os_string()
}
