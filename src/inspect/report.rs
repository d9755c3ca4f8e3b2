//! Inspect report types and terminal formatting.

use serde::Serialize;
use std::fmt;

use crate::format::Version;

/// The result of inspecting a JDX header.
#[derive(Clone, Debug, Serialize)]
pub struct InspectReport {
    /// Version the file was written with.
    pub version: Version,
    /// Version this reader writes.
    pub reader_version: Version,
    /// Number of items declared by the header.
    pub item_count: u64,
    /// Total number of labels in the table.
    pub label_count: usize,
    /// Listed labels, in class id order.
    pub labels: Vec<LabelEntry>,
    /// Labels left out of `labels`.
    pub hidden_labels: usize,
    /// Encoded header size in bytes.
    pub header_len: u64,
    /// Total file size in bytes.
    pub file_len: u64,
    /// Bytes after the header (items plus any trailing data).
    pub item_region_len: u64,
}

/// A single label table entry.
#[derive(Clone, Debug, Serialize)]
pub struct LabelEntry {
    pub class_id: u32,
    pub name: String,
}

impl fmt::Display for InspectReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "JDX dataset")?;
        writeln!(f, "  format version: {}", self.version)?;
        if self.version > self.reader_version {
            writeln!(
                f,
                "  note: written by a newer minor version than this reader ({})",
                self.reader_version
            )?;
        }
        writeln!(f, "  items:          {}", self.item_count)?;
        writeln!(
            f,
            "  size:           {} bytes ({} header, {} items)",
            self.file_len, self.header_len, self.item_region_len
        )?;
        writeln!(f)?;

        if self.label_count == 0 {
            return writeln!(f, "Labels: none");
        }

        writeln!(f, "Labels ({}):", self.label_count)?;
        let width = self.labels.last().map_or(1, |l| l.class_id.to_string().len());
        for entry in &self.labels {
            writeln!(f, "  {:>width$}  {}", entry.class_id, entry.name, width = width)?;
        }
        if self.hidden_labels > 0 {
            writeln!(f, "  ... and {} more", self.hidden_labels)?;
        }

        Ok(())
    }
}
