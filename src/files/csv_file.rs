use csv::{ReaderBuilder, WriterBuilder};
use std::collections::BTreeMap;
use std::fs;
use std::ops::Deref;
use std::path::Path;
use tracing::debug;

use crate::config::Options;
use crate::encoding;
use crate::error::{DhelpError, Result};
use crate::files::path::PathHandle;
use crate::files::text_file::TextFile;
use crate::files::text_folder::TextFolder;
use crate::pipeline::{self, BoxError, Record, RecordCollection};

/// One CSV data row keyed by column header.
pub type CsvRow = BTreeMap<String, String>;

/// A CSV file with a header row, loaded and saved as a list of rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvFile {
    handle: PathHandle,
}

impl CsvFile {
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            handle: PathHandle::new(path)?,
        })
    }

    fn read_text(&self, options: &Options) -> Result<String> {
        self.handle.prepare_load(options)?;
        self.handle.require_file()?;
        let bytes = fs::read(self.handle.path())?;
        encoding::decode(&bytes, &options.encoding, self.handle.path())
    }

    /// Column names from the header row.
    pub fn fieldnames(&self, options: &Options) -> Result<Vec<String>> {
        let text = self.read_text(options)?;
        let mut reader = ReaderBuilder::new().has_headers(true).from_reader(text.as_bytes());
        let fieldnames = reader.headers()?.iter().map(str::to_string).collect();
        Ok(fieldnames)
    }

    pub fn load(&self, options: &Options) -> Result<Vec<CsvRow>> {
        let text = self.read_text(options)?;
        // Flexible so short or long rows reach our own check below.
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(text.as_bytes());
        let headers = reader.headers()?.clone();

        let mut rows = Vec::new();
        for (index, record) in reader.records().enumerate() {
            let record = record?;
            if record.len() != headers.len() {
                return Err(DhelpError::MalformedInput(format!(
                    "{}: row {} has {} field(s), expected {}",
                    self.handle,
                    index + 1,
                    record.len(),
                    headers.len()
                )));
            }
            let row: CsvRow = headers
                .iter()
                .zip(record.iter())
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect();
            rows.push(row);
        }
        debug!("Loaded {} row(s) from {}", rows.len(), self.handle);
        Ok(rows)
    }

    /// Writes a header row from `fieldnames` followed by `rows` in that
    /// column order. Every row must carry exactly those fields.
    pub fn save<S: AsRef<str>>(&self, rows: &[CsvRow], fieldnames: &[S], options: &Options) -> Result<&Self> {
        let fieldnames: Vec<&str> = fieldnames.iter().map(|field| field.as_ref()).collect();
        let mut writer = WriterBuilder::new().from_writer(Vec::new());
        writer.write_record(&fieldnames)?;
        for (index, row) in rows.iter().enumerate() {
            let mut values = Vec::with_capacity(fieldnames.len());
            for field in &fieldnames {
                let value = row.get(*field).ok_or_else(|| {
                    DhelpError::MalformedInput(format!("row {} is missing field '{}'", index + 1, field))
                })?;
                values.push(value.as_str());
            }
            // Every key must be a header column.
            if let Some(extra) = row.keys().find(|key| !fieldnames.contains(&key.as_str())) {
                return Err(DhelpError::MalformedInput(format!(
                    "row {} has unknown field '{}'",
                    index + 1,
                    extra
                )));
            }
            writer.write_record(values)?;
        }
        // Serialize every row before the file is touched.
        let buffer = writer
            .into_inner()
            .map_err(|e| DhelpError::Io(e.into_error()))?;
        let text = String::from_utf8(buffer)
            .map_err(|e| DhelpError::MalformedInput(e.to_string()))?;
        let bytes = encoding::encode(&text, &options.encoding)?;

        self.handle.prepare_save(options)?;
        fs::write(self.handle.path(), bytes)?;
        Ok(self)
    }

    /// Applies `modify` to every row. Column order and row order are kept.
    pub fn modify<F>(&self, mut modify: F, options: &Options) -> Result<CsvFile>
    where
        F: FnMut(CsvRow) -> CsvRow,
    {
        pipeline::run_batch(self, |row| Ok::<_, BoxError>(modify(row)), options)
    }

    /// Like [`CsvFile::modify`] but the callback may fail, which aborts the
    /// batch naming the failing row.
    pub fn try_modify<F, E>(&self, modify: F, options: &Options) -> Result<CsvFile>
    where
        F: FnMut(CsvRow) -> std::result::Result<CsvRow, E>,
        E: Into<BoxError>,
    {
        pipeline::run_batch(self, modify, options)
    }

    /// Writes the `text_column` of every row to its own text file inside
    /// `destination`. Files are named after `filename_column` when given,
    /// otherwise numbered from 0 in row order.
    pub fn column_to_txts(
        &self,
        destination: impl AsRef<Path>,
        text_column: &str,
        filename_column: Option<&str>,
        options: &Options,
    ) -> Result<TextFolder> {
        let folder = TextFolder::new(destination)?;
        let extension = options
            .extensions
            .first()
            .map(String::as_str)
            .unwrap_or("txt");
        for (index, row) in self.load(options)?.iter().enumerate() {
            let text = row.get(text_column).ok_or_else(|| {
                DhelpError::MalformedInput(format!("row {} has no column '{}'", index + 1, text_column))
            })?;
            let stem = match filename_column {
                Some(column) => row.get(column).cloned().ok_or_else(|| {
                    DhelpError::MalformedInput(format!("row {} has no column '{}'", index + 1, column))
                })?,
                None => index.to_string(),
            };
            TextFile::new(folder.path().join(format!("{stem}.{extension}")))?.save(text, options)?;
        }
        Ok(folder)
    }
}

impl RecordCollection for CsvFile {
    type Content = CsvRow;

    fn location(&self) -> &PathHandle {
        &self.handle
    }

    fn require_kind(&self) -> Result<()> {
        self.handle.require_file()
    }

    fn rebind(&self, location: PathHandle) -> Self {
        Self { handle: location }
    }

    fn read_records(&self, options: &Options) -> Result<Vec<Record<CsvRow>>> {
        Ok(self
            .load(options)?
            .into_iter()
            .enumerate()
            .map(|(index, row)| Record {
                id: format!("row {}", index + 1),
                content: row,
            })
            .collect())
    }

    fn write_records<I>(&self, records: I, options: &Options) -> Result<()>
    where
        I: Iterator<Item = Result<Record<CsvRow>>>,
    {
        // Keep the column order of the file being rewritten.
        let fieldnames = self.fieldnames(&options.clone().silent(true))?;
        let rows = records
            .map(|record| record.map(|r| r.content))
            .collect::<Result<Vec<_>>>()?;
        self.save(&rows, &fieldnames, options)?;
        Ok(())
    }
}

impl From<PathHandle> for CsvFile {
    fn from(handle: PathHandle) -> Self {
        Self { handle }
    }
}

impl Deref for CsvFile {
    type Target = PathHandle;

    fn deref(&self) -> &PathHandle {
        &self.handle
    }
}

impl std::fmt::Display for CsvFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.handle, f)
    }
}
