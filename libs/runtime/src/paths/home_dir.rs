//! Resolution of the application home directory.
//!
//! Rules:
//! - `None` => platform default (`<home>/<subdir>` on Unix, `<app data>/<subdir>` on Windows).
//! - A leading `~` is expanded against the user's home directory.
//! - Relative paths are joined onto the current working directory.

use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum HomeDirError {
    #[error("no home directory could be determined for the current user")]
    NoHomeDir,

    #[error("failed to read current directory: {0}")]
    CurrentDir(#[source] std::io::Error),

    #[error("failed to create home directory '{path}': {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Directory the default `<subdir>` lives in: the roaming app-data dir on
/// Windows, the user's home elsewhere.
fn platform_base() -> Result<PathBuf, HomeDirError> {
    #[cfg(target_os = "windows")]
    let base = dirs::data_dir();
    #[cfg(not(target_os = "windows"))]
    let base = dirs::home_dir();
    base.ok_or(HomeDirError::NoHomeDir)
}

fn expand_tilde(raw: &str) -> Result<PathBuf, HomeDirError> {
    let rest = match raw.strip_prefix('~') {
        Some("") => "",
        Some(rest) if rest.starts_with('/') || rest.starts_with('\\') => &rest[1..],
        _ => return Ok(PathBuf::from(raw)),
    };
    let home = dirs::home_dir().ok_or(HomeDirError::NoHomeDir)?;
    Ok(if rest.is_empty() { home } else { home.join(rest) })
}

/// Resolve `requested` (or the platform default joined with `default_subdir`)
/// into an absolute path, optionally creating it.
pub fn resolve_home_dir(
    requested: Option<String>,
    default_subdir: &str,
    create: bool,
) -> Result<PathBuf, HomeDirError> {
    let mut path = match requested {
        Some(raw) => expand_tilde(raw.trim())?,
        None => platform_base()?.join(default_subdir),
    };

    if path.is_relative() {
        let cwd = std::env::current_dir().map_err(HomeDirError::CurrentDir)?;
        path = cwd.join(path);
    }

    if create {
        ensure_dir(&path)?;
    }
    Ok(path)
}

fn ensure_dir(path: &Path) -> Result<(), HomeDirError> {
    std::fs::create_dir_all(path).map_err(|source| HomeDirError::Create {
        path: path.to_path_buf(),
        source,
    })
}
