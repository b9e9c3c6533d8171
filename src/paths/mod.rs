//! Normalization of paths declared inside project descriptors.
//!
//! Descriptors written on Windows record paths with `\` separators and
//! freely use `..` segments. Everything here is lexical: nothing touches
//! the filesystem except [`absolutize`], which only reads the working
//! directory.

use std::io;
use std::path::{Component, Path, PathBuf};


/// Convert a declared path into a host path, treating both `\` and `/` as separators
///
/// Empty segments and `.` markers are dropped. `..` and root markers are kept so
/// that [`resolve`] can apply them.
pub fn declared(raw: &str) -> PathBuf {
    let unified = raw.trim().replace('\\', "/");
    let mut out = PathBuf::new();
    if unified.starts_with('/') {
        out.push(Component::RootDir.as_os_str());
    }
    for part in unified.split('/') {
        match part {
            "" | "." => continue,
            other => out.push(other),
        }
    }
    out
}

/// Resolve a declared path against `base` and lexically clean the result
///
/// An absolute declared path ignores `base`.
pub fn resolve(base: &Path, raw: &str) -> PathBuf {
    path_clean::clean(base.join(declared(raw)))
}

/// Display name of a declared path: its final segment, or the raw text when it has none
pub fn display_name(raw: &str) -> String {
    declared(raw)
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| raw.trim().to_string())
}

/// Make `path` absolute relative to the working directory and clean it
pub fn absolutize(path: &Path) -> io::Result<PathBuf> {
    Ok(path_clean::clean(std::path::absolute(path)?))
}

/// Directory containing `path`, or `.` for a bare file name
pub fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Final component of `path` as an owned string
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Lowercased extension of `path`, empty when there is none
pub fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default()
}
