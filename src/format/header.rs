//! Header codec: magic, version, item count and the metadata block.
//!
//! # Layout
//!
//! ```text
//! [magic: "JDX1"]
//! [version: major u16, minor u16, patch u16]
//! [item_count: u64]
//! [metadata_len: u32]
//!   [label_count: u32]
//!   repeated label_count times: [label_len: u16][utf-8 bytes]
//!   [bytes appended by later minor versions, carried through opaquely]
//! ```
//!
//! The header can be decoded on its own, so listing labels or counting
//! items costs O(header size) regardless of how large the item region is.

use std::io::{Read, Seek, Write};

use super::binary::{BinaryReader, BinaryWriter};
use super::model::Header;
use super::version::Version;
use crate::error::JdxError;
use crate::validation::{check_available, check_encodable_len, check_magic, check_version};

/// Format signature at the start of every JDX file.
pub const MAGIC: [u8; 4] = *b"JDX1";

/// Version written by this crate.
pub const CURRENT_VERSION: Version = Version::new(1, 0, 0);

/// Major versions this crate can read.
pub const SUPPORTED_MAJOR_VERSIONS: &[u16] = &[1];

/// Bytes before the metadata block body: magic, version, count, block length.
pub const FIXED_HEADER_LEN: u64 = 4 + Version::ENCODED_LEN as u64 + 8 + 4;

/// Reads and validates a header at the reader's current position.
///
/// On success the cursor sits at the first item record.
pub fn read_header<R: Read + Seek>(reader: &mut BinaryReader<R>) -> Result<Header, JdxError> {
    let available = reader.remaining().min(MAGIC.len() as u64) as usize;
    let found = reader.read_bytes(available, "magic")?;
    check_magic(&found)?;

    let version = Version::from_bytes(reader.read_array("format version")?);
    check_version(&version)?;

    let item_count = reader.read_u64("item count")?;
    let (labels, extra_metadata) = read_metadata(reader)?;

    Ok(Header {
        magic: MAGIC,
        version,
        item_count,
        labels,
        extra_metadata,
    })
}

fn read_metadata<R: Read + Seek>(
    reader: &mut BinaryReader<R>,
) -> Result<(Vec<String>, Vec<u8>), JdxError> {
    let metadata_len = reader.read_u32("metadata length")? as u64;
    let block_start = reader.position();
    let block_end = block_start + metadata_len;
    // The whole block must be present before any of it is interpreted.
    check_available(block_start, metadata_len, reader.remaining(), "metadata block")?;

    if metadata_len == 0 {
        return Ok((Vec::new(), Vec::new()));
    }

    let overrun = |offset: u64, what: &str| JdxError::Format {
        offset,
        message: format!("{what} overruns the {metadata_len}-byte metadata block"),
    };

    if metadata_len < 4 {
        return Err(overrun(block_start, "label count"));
    }
    let label_count = reader.read_u32("label count")?;

    // Each label needs at least its 2-byte length prefix.
    let max_labels = (block_end - reader.position()) / 2;
    if label_count as u64 > max_labels {
        return Err(overrun(reader.position(), "label table"));
    }

    let mut labels = Vec::with_capacity(label_count as usize);
    for _ in 0..label_count {
        let offset = reader.position();
        if block_end - offset < 2 {
            return Err(overrun(offset, "label length"));
        }
        let len = reader.read_u16("label length")? as u64;
        if block_end - reader.position() < len {
            return Err(overrun(offset, "label"));
        }
        labels.push(reader.read_fixed_string(len as usize, "label")?);
    }

    // Fields added by newer minor versions live after the label table.
    let extra_len = (block_end - reader.position()) as usize;
    let extra_metadata = reader.read_bytes(extra_len, "metadata extension")?;
    Ok((labels, extra_metadata))
}

/// Writes a header.
///
/// The caller is responsible for `header.item_count` matching the number of
/// items that follow; [`write_dataset`](super::write_dataset) takes care of
/// that automatically.
pub fn write_header<W: Write>(
    header: &Header,
    writer: &mut BinaryWriter<W>,
) -> Result<(), JdxError> {
    check_magic(&header.magic)?;
    check_version(&header.version)?;

    let metadata_len = header.metadata_len();
    check_encodable_len(
        header.labels.len(),
        u32::MAX as u64,
        "label count",
        writer.position(),
    )?;
    for label in &header.labels {
        check_encodable_len(label.len(), u16::MAX as u64, "label length", writer.position())?;
    }
    check_encodable_len(
        metadata_len as usize,
        u32::MAX as u64,
        "metadata block length",
        writer.position(),
    )?;

    writer.write_bytes(&header.magic)?;
    writer.write_bytes(&header.version.to_bytes())?;
    writer.write_u64(header.item_count)?;

    writer.write_u32(metadata_len as u32)?;
    writer.write_u32(header.labels.len() as u32)?;
    for label in &header.labels {
        writer.write_u16(label.len() as u16)?;
        writer.write_bytes(label.as_bytes())?;
    }
    writer.write_bytes(&header.extra_metadata)?;

    Ok(())
}
