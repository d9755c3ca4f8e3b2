//! Item codec: one payload plus its annotations.
//!
//! # Layout
//!
//! ```text
//! [payload_len: u32][payload bytes]
//! [annotation_count: u16]
//!   repeated: [class_id: u32][x: f32][y: f32][w: f32][h: f32]
//! ```

use std::io::{Read, Seek, Write};

use super::binary::{BinaryReader, BinaryWriter};
use super::model::{Annotation, Item};
use super::options::{AnnotationPolicy, ReadWarning};
use super::region::Region;
use crate::error::JdxError;
use crate::validation::{check_available, check_encodable_len, check_region};

/// Smallest possible item record: empty payload, no annotations.
pub const MIN_ITEM_LEN: u64 = 4 + 2;

/// Reads the item at position `index` in the item region.
///
/// Out-of-range regions accepted by a lenient policy are appended to
/// `warnings`.
pub fn read_item<R: Read + Seek>(
    reader: &mut BinaryReader<R>,
    index: u64,
    policy: AnnotationPolicy,
    warnings: &mut Vec<ReadWarning>,
) -> Result<Item, JdxError> {
    let payload_len = reader.read_u32("payload length")?;
    let payload = reader.read_bytes(payload_len as usize, "payload")?;

    let annotation_count = reader.read_u16("annotation count")? as usize;
    check_available(
        reader.position(),
        (annotation_count * Annotation::ENCODED_LEN) as u64,
        reader.remaining(),
        "annotation records",
    )?;

    let mut annotations = Vec::with_capacity(annotation_count);
    for n in 0..annotation_count {
        let class_id = reader.read_u32("class id")?;
        let region = Region::new(
            reader.read_f32("region x")?,
            reader.read_f32("region y")?,
            reader.read_f32("region width")?,
            reader.read_f32("region height")?,
        );

        if let Some(warning) = check_region(&region, policy, index, n)? {
            warnings.push(warning);
        }
        annotations.push(Annotation { class_id, region });
    }

    Ok(Item {
        payload,
        annotations,
    })
}

/// Writes one item.
///
/// Size limits are checked before the first byte is written, so a rejected
/// item never leaves a partial record behind.
pub fn write_item<W: Write>(item: &Item, writer: &mut BinaryWriter<W>) -> Result<(), JdxError> {
    check_encodable_len(
        item.payload.len(),
        u32::MAX as u64,
        "payload length",
        writer.position(),
    )?;
    check_encodable_len(
        item.annotations.len(),
        u16::MAX as u64,
        "annotation count",
        writer.position(),
    )?;

    writer.write_u32(item.payload.len() as u32)?;
    writer.write_bytes(&item.payload)?;
    writer.write_u16(item.annotations.len() as u16)?;
    for annotation in &item.annotations {
        writer.write_u32(annotation.class_id)?;
        writer.write_bytes(&annotation.region.to_bytes())?;
    }

    Ok(())
}

/// Fuzz-only entrypoint for single-item decoding.
#[cfg(feature = "fuzzing")]
pub fn fuzz_parse_item(data: &[u8]) -> Result<(), JdxError> {
    let mut reader = BinaryReader::new(std::io::Cursor::new(data))?;
    let mut warnings = Vec::new();
    let _ = read_item(&mut reader, 0, AnnotationPolicy::default(), &mut warnings)?;
    Ok(())
}
