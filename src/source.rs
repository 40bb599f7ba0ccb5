//! Enumerating article and page source files on disk.
//!
//! The loader walks exactly one directory level, emits `{slug, path}` pairs
//! in lexicographic file-name order, and silently skips anything that isn't
//! a visible file with the expected extension. A missing directory is a
//! configuration problem and fails the build; a missing *file* shows up
//! later as a read error and is absorbed by the pipeline.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// A discovered source file: the slug derived from its file name plus the
/// path to read it from.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    pub slug: String,
    pub path: PathBuf,
}

/// Enumerates the files with the given extension directly under `dir`,
/// ordered lexicographically by file name. Hidden files (leading `.`) and
/// non-matching extensions are skipped silently; subdirectories are not
/// descended into. An empty directory yields an empty vector.
pub fn list_files(dir: &Path, ext: &str) -> Result<Vec<SourceFile>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|err| Error::ListDirectory {
            path: dir.to_owned(),
            err,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = match entry.file_name().to_str() {
            Some(name) => name,
            None => {
                tracing::debug!("Skipping non-UTF-8 file name in {}", dir.display());
                continue;
            }
        };
        if name.starts_with('.') || !name.ends_with(ext) {
            tracing::debug!("Skipping {}", name);
            continue;
        }
        files.push(SourceFile {
            slug: name[..name.len() - ext.len()].to_owned(),
            path: entry.into_path(),
        });
    }
    Ok(files)
}

/// Reads a source file as UTF-8 text.
pub fn read_file(path: &Path) -> io::Result<String> {
    std::fs::read_to_string(path)
}

/// Represents the result of a source-enumeration operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error enumerating source files.
#[derive(Debug)]
pub enum Error {
    /// Returned when a content directory cannot be listed. Unlike per-file
    /// problems, this fails the whole build.
    ListDirectory { path: PathBuf, err: walkdir::Error },
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::ListDirectory { path, err } => {
                write!(f, "Listing directory '{}': {}", path.display(), err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::ListDirectory { path: _, err } => Some(err),
        }
    }
}
