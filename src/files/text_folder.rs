use std::ops::Deref;
use std::path::Path;

use crate::config::Options;
use crate::error::Result;
use crate::files::folder::Folder;
use crate::files::path::PathHandle;
use crate::files::text_file::TextFile;
use crate::pipeline::{self, BoxError, Record, RecordCollection};

/// A folder of plain text files, loaded as a list of strings and editable in
/// batch through [`TextFolder::modify`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextFolder {
    folder: Folder,
}

impl TextFolder {
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            folder: Folder::new(path)?,
        })
    }

    /// Files whose extension is listed in `options.extensions`, sorted by
    /// name.
    pub fn text_files(&self, options: &Options) -> Result<Vec<TextFile>> {
        let files = self
            .folder
            .files()?
            .into_iter()
            .filter(|path| {
                path.extension()
                    .map(|ext| ext.to_string_lossy())
                    .map(|ext| options.extensions.iter().any(|wanted| wanted.eq_ignore_ascii_case(&ext)))
                    .unwrap_or(false)
            })
            .map(TextFile::new)
            .collect::<Result<Vec<_>>>()?;
        Ok(files)
    }

    pub fn load(&self, options: &Options) -> Result<Vec<String>> {
        self.text_files(options)?
            .iter()
            .map(|file| file.load(options))
            .collect()
    }

    /// Writes each text to a positionally numbered file (`0.txt`, `1.txt`,
    /// ...) using the first configured extension.
    pub fn save<S: AsRef<str>>(&self, texts: &[S], options: &Options) -> Result<&Self> {
        let extension = options
            .extensions
            .first()
            .map(String::as_str)
            .unwrap_or("txt");
        for (index, text) in texts.iter().enumerate() {
            let file = TextFile::new(self.path().join(format!("{index}.{extension}")))?;
            file.save(text.as_ref(), options)?;
        }
        Ok(self)
    }

    /// Applies `modify` to the content of every text file.
    pub fn modify<F>(&self, mut modify: F, options: &Options) -> Result<TextFolder>
    where
        F: FnMut(String) -> String,
    {
        pipeline::run_batch(self, |content| Ok::<_, BoxError>(modify(content)), options)
    }

    /// Like [`TextFolder::modify`] but the callback may fail, which aborts
    /// the batch with the failing file's name.
    pub fn try_modify<F, E>(&self, modify: F, options: &Options) -> Result<TextFolder>
    where
        F: FnMut(String) -> std::result::Result<String, E>,
        E: Into<BoxError>,
    {
        pipeline::run_batch(self, modify, options)
    }
}

impl RecordCollection for TextFolder {
    type Content = String;

    fn location(&self) -> &PathHandle {
        &self.folder
    }

    fn require_kind(&self) -> Result<()> {
        self.folder.require_dir()
    }

    fn rebind(&self, location: PathHandle) -> Self {
        Self {
            folder: Folder::from(location),
        }
    }

    fn read_records(&self, options: &Options) -> Result<Vec<Record<String>>> {
        self.text_files(options)?
            .into_iter()
            .map(|file| {
                Ok(Record {
                    id: file.basename(),
                    content: file.load(options)?,
                })
            })
            .collect()
    }

    fn write_records<I>(&self, records: I, options: &Options) -> Result<()>
    where
        I: Iterator<Item = Result<Record<String>>>,
    {
        for record in records {
            let record = record?;
            TextFile::new(self.path().join(&record.id))?.save(&record.content, options)?;
        }
        Ok(())
    }
}

impl From<PathHandle> for TextFolder {
    fn from(handle: PathHandle) -> Self {
        Self {
            folder: Folder::from(handle),
        }
    }
}

impl Deref for TextFolder {
    type Target = Folder;

    fn deref(&self) -> &Folder {
        &self.folder
    }
}

impl std::fmt::Display for TextFolder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.folder, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_text_files_filters_by_extension() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.txt"), "b").unwrap();
        fs::write(dir.path().join("a.TXT"), "a").unwrap();
        fs::write(dir.path().join("notes.md"), "m").unwrap();
        fs::write(dir.path().join("README"), "r").unwrap();

        let folder = TextFolder::new(dir.path()).unwrap();
        let options = Options::new().silent(true);
        let names: Vec<String> = folder
            .text_files(&options)
            .unwrap()
            .iter()
            .map(|f| f.basename())
            .collect();
        assert_eq!(names, vec!["a.TXT", "b.txt"]);

        let with_md = options.extensions(["txt", "md"]);
        assert_eq!(folder.text_files(&with_md).unwrap().len(), 3);
    }

    #[test]
    fn test_save_numbers_files() {
        let dir = tempdir().unwrap();
        let folder = TextFolder::new(dir.path().join("out")).unwrap();
        let options = Options::new().silent(true);
        folder.save(&["zero", "one"], &options).unwrap();
        assert_eq!(folder.contents().unwrap(), vec!["0.txt", "1.txt"]);
        assert_eq!(folder.load(&options).unwrap(), vec!["zero", "one"]);
    }
}
