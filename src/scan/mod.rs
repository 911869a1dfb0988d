//! Input enumeration.
//!
//! [`Source::scan`] turns the input path into an ordered list of
//! [`FileEntry`] values. Directories are walked recursively with entries
//! sorted by file name at every level, so the order is stable across runs
//! and platforms.

use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// One regular file of the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Slash-separated path relative to the input root. For a single-file
    /// input this is the file name.
    pub path: String,
    /// Size in bytes at enumeration time.
    pub size: u64,
}

impl FileEntry {
    /// Path components, as listed in a multi-file torrent.
    pub fn components(&self) -> Vec<String> {
        self.path.split('/').map(str::to_string).collect()
    }
}

/// An enumerated input: a single file or a directory tree.
#[derive(Debug, Clone)]
pub struct Source {
    root: PathBuf,
    is_dir: bool,
    name: String,
    files: Vec<FileEntry>,
    total_size: u64,
}

impl Source {
    /// Enumerates `path`.
    ///
    /// Fails if the path cannot be inspected, if a directory holds no regular
    /// files, or if any path is not valid UTF-8. Symlinks are not followed.
    pub fn scan(path: impl AsRef<Path>) -> Result<Self> {
        let root = path.as_ref().to_path_buf();
        let meta = fs::metadata(&root).map_err(|source| Error::Access {
            path: root.clone(),
            source,
        })?;
        let name = base_name(&root)?;

        let files = if meta.is_dir() {
            walk(&root)?
        } else {
            vec![FileEntry {
                path: name.clone(),
                size: meta.len(),
            }]
        };

        if files.is_empty() {
            return Err(Error::NoFiles(root));
        }

        let total_size = files.iter().map(|f| f.size).sum();
        debug!(root = %root.display(), files = files.len(), total_size, "scanned input");

        Ok(Self {
            root,
            is_dir: meta.is_dir(),
            name,
            files,
            total_size,
        })
    }

    /// The path that was scanned.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether the input is a directory.
    pub fn is_dir(&self) -> bool {
        self.is_dir
    }

    /// The input's final path segment, used to name both documents.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Files in enumeration order.
    pub fn files(&self) -> &[FileEntry] {
        &self.files
    }

    /// Sum of all file sizes.
    pub fn total_size(&self) -> u64 {
        self.total_size
    }

    /// Filesystem path of an entry.
    pub fn full_path(&self, entry: &FileEntry) -> PathBuf {
        if self.is_dir {
            entry.path.split('/').fold(self.root.clone(), |p, c| p.join(c))
        } else {
            self.root.clone()
        }
    }
}

fn walk(root: &Path) -> Result<Vec<FileEntry>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        let entry = entry.map_err(|source| Error::Walk {
            path: root.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let rel = entry.path().strip_prefix(root).unwrap_or(entry.path());
        let size = entry
            .metadata()
            .map_err(|source| Error::Walk {
                path: root.to_path_buf(),
                source,
            })?
            .len();

        files.push(FileEntry {
            path: slash_path(rel)?,
            size,
        });
    }

    Ok(files)
}

fn slash_path(rel: &Path) -> Result<String> {
    let mut parts = Vec::new();
    for component in rel.components() {
        if let Component::Normal(part) = component {
            let part = part
                .to_str()
                .ok_or_else(|| Error::NonUtf8Path(rel.to_path_buf()))?;
            parts.push(part);
        }
    }
    Ok(parts.join("/"))
}

fn base_name(path: &Path) -> Result<String> {
    let name = match path.file_name() {
        Some(name) => name.to_os_string(),
        None => fs::canonicalize(path)
            .map_err(|source| Error::Access {
                path: path.to_path_buf(),
                source,
            })?
            .file_name()
            .ok_or_else(|| Error::NoBaseName(path.to_path_buf()))?
            .to_os_string(),
    };

    name.into_string()
        .map_err(|_| Error::NonUtf8Path(path.to_path_buf()))
}
