use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::Options;
use crate::error::{DhelpError, Result};

/// An absolute filesystem path with the helpers shared by every file and
/// folder type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathHandle {
    path: PathBuf,
}

impl PathHandle {
    /// Binds to `path`, resolving relative paths against the current
    /// directory. An empty path means the current directory.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let cwd = std::env::current_dir()?;
        let path = if path.as_os_str().is_empty() {
            cwd
        } else if path.is_absolute() {
            path.to_path_buf()
        } else {
            cwd.join(path)
        };
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Size in bytes; folders report the total of their contents and
    /// missing paths report 0.
    pub fn size(&self) -> u64 {
        fn walk(path: &Path) -> u64 {
            match fs::symlink_metadata(path) {
                Ok(meta) if meta.is_dir() => fs::read_dir(path)
                    .map(|entries| {
                        entries
                            .filter_map(|entry| entry.ok())
                            .map(|entry| walk(&entry.path()))
                            .sum()
                    })
                    .unwrap_or(0),
                Ok(meta) => meta.len(),
                Err(_) => 0,
            }
        }
        walk(&self.path)
    }

    pub fn basename(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn dirname(&self) -> Option<&Path> {
        self.path.parent()
    }

    pub fn is_dir(&self) -> bool {
        self.path.is_dir()
    }

    pub fn is_file(&self) -> bool {
        self.path.is_file()
    }

    pub fn is_link(&self) -> bool {
        fs::symlink_metadata(&self.path)
            .map(|meta| meta.file_type().is_symlink())
            .unwrap_or(false)
    }

    /// Copies whatever is at this path (recursively for folders) to
    /// `destination` and returns a handle bound to the copy.
    ///
    /// An existing destination is replaced only when `overwrite` is set.
    pub fn copy_to(&self, destination: impl AsRef<Path>, options: &Options) -> Result<PathHandle> {
        if !self.exists() {
            return Err(DhelpError::NotFound(self.path.clone()));
        }
        let target = PathHandle::new(destination)?;
        self.require_disjoint(&target)?;
        if target.exists() {
            if !options.overwrite {
                return Err(DhelpError::OverwriteDenied(target.path.clone()));
            }
            target.remove()?;
        }
        target.makedirs()?;
        if self.is_dir() {
            copy_dir_all(&self.path, &target.path)?;
        } else {
            fs::copy(&self.path, &target.path)?;
        }
        debug!("Copied {} to {}", self.path.display(), target.path.display());
        Ok(target)
    }

    pub fn remove(&self) -> Result<()> {
        if !self.exists() && !self.is_link() {
            return Err(DhelpError::NotFound(self.path.clone()));
        }
        if self.is_dir() && !self.is_link() {
            fs::remove_dir_all(&self.path)?;
        } else {
            fs::remove_file(&self.path)?;
        }
        debug!("Removed {}", self.path.display());
        Ok(())
    }

    /// Moves whatever is at this path to `destination`, falling back to copy
    /// and remove when a rename is not possible (e.g. across devices).
    pub fn move_to(&self, destination: impl AsRef<Path>, options: &Options) -> Result<PathHandle> {
        if !self.exists() {
            return Err(DhelpError::NotFound(self.path.clone()));
        }
        let target = PathHandle::new(destination)?;
        self.require_disjoint(&target)?;
        if target.exists() {
            if !options.overwrite {
                return Err(DhelpError::OverwriteDenied(target.path.clone()));
            }
            target.remove()?;
        }
        target.makedirs()?;
        if fs::rename(&self.path, &target.path).is_err() {
            let copied = self.copy_to(&target.path, options)?;
            self.remove()?;
            return Ok(copied);
        }
        Ok(target)
    }

    /// The path with symlinks and `..` resolved for the part that exists
    /// on disk; missing trailing components are appended unchanged.
    fn resolved(&self) -> PathBuf {
        let mut existing = self.path.as_path();
        let mut missing = Vec::new();
        loop {
            if let Ok(canonical) = existing.canonicalize() {
                return missing
                    .iter()
                    .rev()
                    .fold(canonical, |resolved, name| resolved.join(name));
            }
            match (existing.parent(), existing.file_name()) {
                (Some(parent), Some(name)) => {
                    missing.push(name.to_os_string());
                    existing = parent;
                }
                _ => return self.path.clone(),
            }
        }
    }

    /// Fails when `target` is this path, lies inside it, or contains it.
    /// Copying or moving in any of those cases would read from the output
    /// or remove the source.
    pub(crate) fn require_disjoint(&self, target: &PathHandle) -> Result<()> {
        let source = self.resolved();
        let destination = target.resolved();
        if source.starts_with(&destination) || destination.starts_with(&source) {
            return Err(DhelpError::MalformedInput(format!(
                "{} and {} overlap; one path contains the other",
                self, target
            )));
        }
        Ok(())
    }

    /// Creates any missing parent directories of this path.
    pub fn makedirs(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    /// Announces a load and fails when nothing exists at the path.
    pub(crate) fn prepare_load(&self, options: &Options) -> Result<()> {
        if options.silent {
            debug!("Loading {}", self.path.display());
        } else {
            info!("Loading {}", self.path.display());
        }
        if !self.exists() {
            return Err(DhelpError::NotFound(self.path.clone()));
        }
        Ok(())
    }

    /// Announces a save, refuses to clobber without `overwrite`, and creates
    /// parent directories.
    pub(crate) fn prepare_save(&self, options: &Options) -> Result<()> {
        if options.silent {
            debug!("Saving to {}", self.path.display());
        } else {
            info!("Saving to {}", self.path.display());
        }
        if self.exists() && !options.overwrite {
            return Err(DhelpError::OverwriteDenied(self.path.clone()));
        }
        self.makedirs()
    }

    pub(crate) fn require_file(&self) -> Result<()> {
        if !self.is_file() {
            return Err(DhelpError::WrongKind {
                path: self.path.clone(),
                expected: "file",
            });
        }
        Ok(())
    }

    pub(crate) fn require_dir(&self) -> Result<()> {
        if !self.exists() {
            return Err(DhelpError::NotFound(self.path.clone()));
        }
        if !self.is_dir() {
            return Err(DhelpError::WrongKind {
                path: self.path.clone(),
                expected: "folder",
            });
        }
        Ok(())
    }

    /// First sibling path named `<stem>_backup[_N][.ext]` that does not exist.
    pub(crate) fn backup_path(&self) -> PathBuf {
        let parent = self.dirname().map(Path::to_path_buf).unwrap_or_default();
        let (stem, extension) = if self.is_dir() {
            (self.basename(), None)
        } else {
            let stem = self
                .path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            let extension = self
                .path
                .extension()
                .map(|e| e.to_string_lossy().into_owned());
            (stem, extension)
        };
        let mut counter = 0usize;
        loop {
            let mut name = if counter == 0 {
                format!("{stem}_backup")
            } else {
                format!("{stem}_backup_{counter}")
            };
            if let Some(extension) = &extension {
                name.push('.');
                name.push_str(extension);
            }
            let candidate = parent.join(name);
            if !candidate.exists() {
                return candidate;
            }
            counter += 1;
        }
    }
}

impl AsRef<Path> for PathHandle {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}

impl std::fmt::Display for PathHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

fn copy_dir_all(source: &Path, destination: &Path) -> std::io::Result<()> {
    fs::create_dir_all(destination)?;
    for entry in fs::read_dir(source)? {
        let entry = entry?;
        let target = destination.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir_all(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}
