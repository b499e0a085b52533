use std::fs;
use std::ops::Deref;
use std::path::Path;

use crate::config::Options;
use crate::encoding;
use crate::error::Result;
use crate::files::path::PathHandle;

/// A single plain text file, loaded and saved as one string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextFile {
    handle: PathHandle,
}

impl TextFile {
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            handle: PathHandle::new(path)?,
        })
    }

    pub fn load(&self, options: &Options) -> Result<String> {
        self.handle.prepare_load(options)?;
        self.handle.require_file()?;
        let bytes = fs::read(self.handle.path())?;
        encoding::decode(&bytes, &options.encoding, self.handle.path())
    }

    /// Writes `data`, refusing to replace an existing file unless
    /// `overwrite` is set.
    pub fn save(&self, data: &str, options: &Options) -> Result<&Self> {
        let bytes = encoding::encode(data, &options.encoding)?;
        self.handle.prepare_save(options)?;
        fs::write(self.handle.path(), bytes)?;
        Ok(self)
    }
}

impl From<PathHandle> for TextFile {
    fn from(handle: PathHandle) -> Self {
        Self { handle }
    }
}

impl Deref for TextFile {
    type Target = PathHandle;

    fn deref(&self) -> &PathHandle {
        &self.handle
    }
}

impl std::fmt::Display for TextFile {
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
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let file = TextFile::new(dir.path().join("nested").join("lorem.txt")).unwrap();
        let options = Options::new().silent(true);
        file.save("Lorem ipsum dolor sit amet...", &options).unwrap();
        assert_eq!(file.load(&options).unwrap(), "Lorem ipsum dolor sit amet...");
    }

    #[test]
    fn test_save_requires_overwrite() {
        let dir = tempdir().unwrap();
        let file = TextFile::new(dir.path().join("lorem.txt")).unwrap();
        let options = Options::new().silent(true);
        file.save("first", &options).unwrap();

        let denied = file.save("second", &options);
        assert!(matches!(denied, Err(DhelpError::OverwriteDenied(_))));

        file.save("second", &options.clone().overwrite(true)).unwrap();
        assert_eq!(file.load(&options).unwrap(), "second");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let file = TextFile::new(dir.path().join("missing.txt")).unwrap();
        let result = file.load(&Options::new().silent(true));
        assert!(matches!(result, Err(DhelpError::NotFound(_))));
    }

    #[test]
    fn test_load_folder_is_wrong_kind() {
        let dir = tempdir().unwrap();
        let file = TextFile::new(dir.path()).unwrap();
        let result = file.load(&Options::new().silent(true));
        assert!(matches!(result, Err(DhelpError::WrongKind { .. })));
    }

    #[test]
    fn test_load_with_declared_encoding() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("latin1.txt");
        fs::write(&path, [0x63, 0x61, 0x66, 0xe9]).unwrap();
        let file = TextFile::new(&path).unwrap();
        let options = Options::new().silent(true).encoding("latin_1");
        assert_eq!(file.load(&options).unwrap(), "café");
    }

    #[test]
    fn test_unknown_encoding_is_reported() {
        let dir = tempdir().unwrap();
        let file = TextFile::new(dir.path().join("x.txt")).unwrap();
        let options = Options::new().silent(true).encoding("martian");
        assert!(matches!(
            file.save("x", &options),
            Err(DhelpError::UnsupportedEncoding(_))
        ));
    }
}
