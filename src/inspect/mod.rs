//! Header-only inspection of JDX files.
//!
//! Inspection never decodes the item region: it reads the header and the
//! file size, so it stays cheap for arbitrarily large datasets.

mod report;

pub use report::{InspectReport, LabelEntry};

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::JdxError;
use crate::format::{read_header, BinaryReader, Header, CURRENT_VERSION};

/// Options for header inspection.
#[derive(Clone, Debug)]
pub struct InspectOptions {
    /// Maximum number of labels to list.
    pub max_labels: usize,
}

impl Default for InspectOptions {
    fn default() -> Self {
        Self { max_labels: 20 }
    }
}

/// Builds a report from an already decoded header.
///
/// `header_len` is the number of bytes the header occupied on disk and
/// `file_len` the size of the whole file.
pub fn inspect_header(
    header: &Header,
    header_len: u64,
    file_len: u64,
    opts: &InspectOptions,
) -> InspectReport {
    let labels = header
        .labels
        .iter()
        .enumerate()
        .take(opts.max_labels)
        .map(|(class_id, name)| LabelEntry {
            class_id: class_id as u32,
            name: name.clone(),
        })
        .collect::<Vec<_>>();

    InspectReport {
        version: header.version,
        reader_version: CURRENT_VERSION,
        item_count: header.item_count,
        label_count: header.labels.len(),
        hidden_labels: header.labels.len() - labels.len(),
        labels,
        header_len,
        file_len,
        item_region_len: file_len.saturating_sub(header_len),
    }
}

/// Inspects a JDX file on disk without reading its items.
pub fn inspect_path(path: &Path, opts: &InspectOptions) -> Result<InspectReport, JdxError> {
    let file = File::open(path).map_err(JdxError::Io)?;
    let mut reader = BinaryReader::new(BufReader::new(file))?;
    let header = read_header(&mut reader)?;
    Ok(inspect_header(&header, reader.position(), reader.len(), opts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{to_jdx_bytes, Dataset, Item, Version};

    #[test]
    fn test_inspect_header_counts() {
        let dataset = Dataset::from_items(["a", "b", "c"], vec![Item::new(vec![0u8; 10]); 4]);
        let bytes = to_jdx_bytes(&dataset).unwrap();

        let report = inspect_header(
            &dataset.header,
            dataset.header.encoded_len(),
            bytes.len() as u64,
            &InspectOptions { max_labels: 2 },
        );

        assert_eq!(report.item_count, 4);
        assert_eq!(report.label_count, 3);
        assert_eq!(report.labels.len(), 2);
        assert_eq!(report.hidden_labels, 1);
        assert_eq!(report.labels[1].name, "b");
        assert_eq!(report.item_region_len, 4 * (4 + 10 + 2));
        assert_eq!(report.version, Version::new(1, 0, 0));
    }

    #[test]
    fn test_inspect_path() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let path = temp.path().join("data.jdx");
        let dataset = Dataset::from_items(["person"], vec![Item::new(vec![1, 2, 3])]);
        crate::format::write_dataset_to_path(&dataset, &path).unwrap();

        let report = inspect_path(&path, &InspectOptions::default()).unwrap();
        assert_eq!(report.item_count, 1);
        assert_eq!(report.file_len, report.header_len + 4 + 3 + 2);
    }

    fn write_newer_minor_file(path: &Path, metadata_len: u32, metadata: &[u8]) {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"JDX1");
        bytes.extend_from_slice(&Version::new(1, 3, 7).to_bytes());
        bytes.extend_from_slice(&0u64.to_le_bytes());
        bytes.extend_from_slice(&metadata_len.to_le_bytes());
        bytes.extend_from_slice(metadata);
        std::fs::write(path, bytes).expect("write file");
    }

    #[test]
    fn test_inspect_counts_unknown_metadata_as_header() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let path = temp.path().join("newer.jdx");
        // Label table with one label "a", then 5 bytes of a later field.
        let mut metadata = Vec::new();
        metadata.extend_from_slice(&1u32.to_le_bytes());
        metadata.extend_from_slice(&1u16.to_le_bytes());
        metadata.push(b'a');
        metadata.extend_from_slice(&[7; 5]);
        write_newer_minor_file(&path, metadata.len() as u32, &metadata);

        let report = inspect_path(&path, &InspectOptions::default()).unwrap();
        assert_eq!(report.version, Version::new(1, 3, 7));
        assert_eq!(report.file_len, 34);
        assert_eq!(report.header_len, 34);
        assert_eq!(report.item_region_len, 0);
    }

    #[test]
    fn test_inspect_empty_metadata_block() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let path = temp.path().join("bare.jdx");
        write_newer_minor_file(&path, 0, &[]);

        let report = inspect_path(&path, &InspectOptions::default()).unwrap();
        assert_eq!(report.label_count, 0);
        assert_eq!(report.header_len, 22);
        assert_eq!(report.item_region_len, 0);
    }
}
