//! Dataset assembly: whole-file reads and writes.
//!
//! A full read decodes the header, then exactly `item_count` item records.
//! A header-only read stops after the header and never touches the item
//! region, so it works on files whose items are missing or corrupt.
//!
//! Every function here takes its source or sink by value and releases it
//! before returning, on success and on failure alike.

use std::fs::File;
use std::io::{BufReader, BufWriter, Cursor, Read, Seek, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use super::binary::{BinaryReader, BinaryWriter};
use super::header::{read_header, write_header};
use super::item::{read_item, write_item};
use super::model::{Dataset, Header};
use super::options::{ReadOptions, ReadWarning};
use crate::error::JdxError;
use crate::validation::{check_item_count_fits, check_trailing};

/// Upper bound on the item vector preallocated from a header's count.
const MAX_PREALLOCATED_ITEMS: usize = 4096;

/// A fully decoded dataset plus any non-fatal conditions met on the way.
#[derive(Clone, Debug, PartialEq)]
pub struct DatasetRead {
    pub dataset: Dataset,
    pub warnings: Vec<ReadWarning>,
}

/// Reads only the header from a source.
pub fn read_header_only<R: Read + Seek>(source: R) -> Result<Header, JdxError> {
    let mut reader = BinaryReader::new(source)?;
    read_header(&mut reader)
}

/// Reads a complete dataset from a source.
///
/// # Errors
/// Fails if the header is invalid, the stream ends before `item_count`
/// items are decoded, an annotation violates `opts.annotations`, or (in
/// strict mode) bytes remain after the last item.
pub fn read_dataset<R: Read + Seek>(
    source: R,
    opts: &ReadOptions,
) -> Result<DatasetRead, JdxError> {
    let mut reader = BinaryReader::new(source)?;
    let header = read_header(&mut reader)?;
    check_item_count_fits(header.item_count, reader.position(), reader.remaining())?;

    let mut warnings = Vec::new();
    // The count is untrusted until the items are actually decoded.
    let capacity = usize::try_from(header.item_count)
        .map_or(0, |count| count.min(MAX_PREALLOCATED_ITEMS));
    let mut items = Vec::with_capacity(capacity);
    for index in 0..header.item_count {
        items.push(read_item(&mut reader, index, opts.annotations, &mut warnings)?);
    }

    if let Some(warning) = check_trailing(reader.position(), reader.remaining(), opts.strict)? {
        warnings.push(warning);
    }

    Ok(DatasetRead {
        dataset: Dataset { header, items },
        warnings,
    })
}

/// Writes a dataset to a sink.
///
/// The header's `item_count` is taken from `dataset.items.len()`, not from
/// `dataset.header.item_count`.
pub fn write_dataset<W: Write>(dataset: &Dataset, sink: W) -> Result<(), JdxError> {
    let mut writer = BinaryWriter::new(sink);

    let header = Header {
        item_count: dataset.items.len() as u64,
        ..dataset.header.clone()
    };
    write_header(&header, &mut writer)?;
    for item in &dataset.items {
        write_item(item, &mut writer)?;
    }

    writer.finish()?;
    Ok(())
}

/// Reads the header of a JDX file.
///
/// # Example
/// ```no_run
/// use std::path::Path;
/// use jdx::format::read_header_from_path;
///
/// let header = read_header_from_path(Path::new("train.jdx"))?;
/// println!("{} items, {} labels", header.item_count, header.labels.len());
/// # Ok::<(), jdx::JdxError>(())
/// ```
pub fn read_header_from_path(path: &Path) -> Result<Header, JdxError> {
    let file = File::open(path).map_err(JdxError::Io)?;
    read_header_only(BufReader::new(file))
}

/// Reads a JDX file with default options, discarding warnings.
pub fn read_dataset_from_path(path: &Path) -> Result<Dataset, JdxError> {
    read_dataset_from_path_with(path, &ReadOptions::default()).map(|read| read.dataset)
}

/// Reads a JDX file with explicit options.
pub fn read_dataset_from_path_with(
    path: &Path,
    opts: &ReadOptions,
) -> Result<DatasetRead, JdxError> {
    let file = File::open(path).map_err(JdxError::Io)?;
    read_dataset(BufReader::new(file), opts)
}

/// Writes a dataset to a JDX file.
///
/// The bytes go to a uniquely named temporary file in the destination's
/// directory, which is renamed over `path` only after everything has been
/// written and synced. A failed write never leaves a truncated dataset at
/// the destination, and concurrent writers never share a temporary file.
pub fn write_dataset_to_path(dataset: &Dataset, path: &Path) -> Result<(), JdxError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    // Dropping `tmp` on any early return deletes the temporary file.
    let mut tmp = NamedTempFile::new_in(dir).map_err(JdxError::Io)?;
    write_dataset(dataset, BufWriter::new(tmp.as_file_mut()))?;
    tmp.as_file().sync_all().map_err(JdxError::Io)?;
    tmp.persist(path).map_err(|e| JdxError::Io(e.error))?;
    Ok(())
}

/// Reads a dataset from JDX bytes with default options.
///
/// Useful for fuzzing and processing in-memory buffers.
pub fn from_jdx_slice(bytes: &[u8]) -> Result<Dataset, JdxError> {
    read_dataset(Cursor::new(bytes), &ReadOptions::default()).map(|read| read.dataset)
}

/// Encodes a dataset to JDX bytes.
///
/// Useful for testing without file I/O.
pub fn to_jdx_bytes(dataset: &Dataset) -> Result<Vec<u8>, JdxError> {
    let mut bytes = Vec::with_capacity(encoded_len(dataset) as usize);
    write_dataset(dataset, &mut bytes)?;
    Ok(bytes)
}

/// Exact size of a dataset once encoded.
pub fn encoded_len(dataset: &Dataset) -> u64 {
    dataset.header.encoded_len() + dataset.items.iter().map(|item| item.encoded_len()).sum::<u64>()
}
