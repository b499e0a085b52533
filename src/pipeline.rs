//! Batch transform pipeline: load every record of a collection, hand it to a
//! caller-supplied function, and persist the result.
//!
//! Without a `destination` option the source is first copied verbatim to a
//! fresh backup location and then rewritten in place. With a `destination`
//! the source is copied there and only the copy is rewritten. The first
//! failing record aborts the batch; records already written stay as they
//! are.

use tracing::{debug, info, instrument};

use crate::config::Options;
use crate::error::{DhelpError, Result};
use crate::files::path::PathHandle;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// One addressable record and its content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record<C> {
    pub id: String,
    pub content: C,
}

/// A collection of records bound to a location on disk.
pub trait RecordCollection: Sized {
    type Content;

    fn location(&self) -> &PathHandle;

    /// Fails when the location holds the wrong kind of entry (a file where a
    /// folder is expected, or the reverse).
    fn require_kind(&self) -> Result<()>;

    /// The same kind of collection bound to another location.
    fn rebind(&self, location: PathHandle) -> Self;

    /// Every record, in the natural order of the collection.
    fn read_records(&self, options: &Options) -> Result<Vec<Record<Self::Content>>>;

    /// Persists records as they are produced. An `Err` item stops the write
    /// and is returned unchanged.
    fn write_records<I>(&self, records: I, options: &Options) -> Result<()>
    where
        I: Iterator<Item = Result<Record<Self::Content>>>;
}

#[instrument(skip_all, fields(source = %source.location()))]
pub fn run_batch<C, F, E>(source: &C, mut transform: F, options: &Options) -> Result<C>
where
    C: RecordCollection,
    F: FnMut(C::Content) -> std::result::Result<C::Content, E>,
    E: Into<BoxError>,
{
    let location = source.location();
    if !location.exists() {
        return Err(DhelpError::NotFound(location.path().to_path_buf()));
    }
    // Check the kind before anything is copied so a bad source leaves no backup.
    source.require_kind()?;

    let working = match &options.destination {
        Some(destination) => {
            let target = PathHandle::new(destination)?;
            // Writing in place is only allowed when asked for explicitly.
            if target == *location {
                if !options.overwrite {
                    return Err(DhelpError::OverwriteDenied(target.path().to_path_buf()));
                }
                source.rebind(target)
            } else {
                // copy_to refuses destinations nested in or around the source.
                source.rebind(location.copy_to(target.path(), options)?)
            }
        }
        None => {
            // No destination: keep the original next to the source and edit in place.
            let backup = location.copy_to(location.backup_path(), &options.clone().overwrite(false))?;
            if options.silent {
                debug!("Backed up {} to {}", location, backup);
            } else {
                info!("Backed up {} to {}", location, backup);
            }
            source.rebind(location.clone())
        }
    };

    let records = working.read_records(options)?;
    let total = records.len();
    if !options.silent {
        info!("Modifying {} record(s) at {}", total, working.location());
    }

    // Records are transformed lazily while writing; the first error stops the batch.
    let write_options = options.clone().overwrite(true);
    let transformed = records.into_iter().enumerate().map(|(index, record)| {
        let Record { id, content } = record;
        debug!("Transforming record {}/{}: {}", index + 1, total, id);
        transform(content)
            .map(|content| Record { id: id.clone(), content })
            .map_err(|e| DhelpError::TransformFailed {
                record: id,
                source: e.into(),
            })
    });
    working.write_records(transformed, &write_options)?;

    Ok(working)
}
