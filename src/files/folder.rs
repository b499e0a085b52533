use std::fs;
use std::ops::Deref;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::files::path::PathHandle;

/// A directory on disk. Listings are sorted by name so every walk over a
/// folder visits entries in the same order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Folder {
    handle: PathHandle,
}

impl Folder {
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            handle: PathHandle::new(path)?,
        })
    }

    /// Names of every entry in the folder.
    pub fn contents(&self) -> Result<Vec<String>> {
        self.handle.require_dir()?;
        let mut names = Vec::new();
        for entry in fs::read_dir(self.handle.path())? {
            let entry = entry?;
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }

    /// Absolute paths of the regular files in the folder.
    pub fn files(&self) -> Result<Vec<PathBuf>> {
        Ok(self
            .contents()?
            .into_iter()
            .map(|name| self.handle.path().join(name))
            .filter(|path| path.is_file())
            .collect())
    }

    /// Absolute paths of the sub-folders.
    pub fn folders(&self) -> Result<Vec<PathBuf>> {
        Ok(self
            .contents()?
            .into_iter()
            .map(|name| self.handle.path().join(name))
            .filter(|path| path.is_dir())
            .collect())
    }

    pub fn length(&self) -> Result<usize> {
        Ok(self.contents()?.len())
    }
}

impl From<PathHandle> for Folder {
    fn from(handle: PathHandle) -> Self {
        Self { handle }
    }
}

impl Deref for Folder {
    type Target = PathHandle;

    fn deref(&self) -> &PathHandle {
        &self.handle
    }
}

impl std::fmt::Display for Folder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.handle, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DhelpError;
    use tempfile::tempdir;

    #[test]
    fn test_contents_are_sorted_and_split() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.txt"), "b").unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();

        let folder = Folder::new(dir.path()).unwrap();
        assert_eq!(folder.contents().unwrap(), vec!["a.txt", "b.txt", "sub"]);
        assert_eq!(folder.length().unwrap(), 3);
        assert_eq!(
            folder.files().unwrap(),
            vec![dir.path().join("a.txt"), dir.path().join("b.txt")]
        );
        assert_eq!(folder.folders().unwrap(), vec![dir.path().join("sub")]);
    }

    #[test]
    fn test_missing_folder() {
        let dir = tempdir().unwrap();
        let folder = Folder::new(dir.path().join("nope")).unwrap();
        assert!(matches!(folder.contents(), Err(DhelpError::NotFound(_))));
    }

    #[test]
    fn test_file_is_not_a_folder() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        let folder = Folder::new(dir.path().join("a.txt")).unwrap();
        assert!(matches!(folder.contents(), Err(DhelpError::WrongKind { .. })));
    }
}
