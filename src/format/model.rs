//! In-memory model of a JDX dataset.
//!
//! These are plain values: a [`Dataset`] owns its [`Header`] and its
//! [`Item`]s, and items have no identity beyond their position.

use serde::{Deserialize, Serialize};

use super::header::{CURRENT_VERSION, MAGIC};
use super::region::Region;
use super::version::Version;

/// The preamble of a JDX file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Header {
    /// Format signature; always [`MAGIC`] for headers produced by this crate.
    pub magic: [u8; 4],

    /// Format version the file was written with.
    pub version: Version,

    /// Number of item records following the header.
    pub item_count: u64,

    /// Ordered class label table. Annotation class ids index into it.
    #[serde(default)]
    pub labels: Vec<String>,

    /// Metadata bytes after the label table, written by a newer minor
    /// version. Kept verbatim and written back unchanged.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_metadata: Vec<u8>,
}

impl Header {
    /// Creates a header at the current format version with no items.
    pub fn new(labels: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            magic: MAGIC,
            version: CURRENT_VERSION,
            item_count: 0,
            labels: labels.into_iter().map(Into::into).collect(),
            extra_metadata: Vec::new(),
        }
    }

    /// Returns the label name for a class id, if the table has one.
    pub fn label_name(&self, class_id: u32) -> Option<&str> {
        self.labels.get(class_id as usize).map(String::as_str)
    }

    /// Size of the metadata block body in bytes (excluding its length prefix).
    pub fn metadata_len(&self) -> u64 {
        4 + self
            .labels
            .iter()
            .map(|label| 2 + label.len() as u64)
            .sum::<u64>()
            + self.extra_metadata.len() as u64
    }

    /// Total encoded size of the header in bytes.
    pub fn encoded_len(&self) -> u64 {
        super::header::FIXED_HEADER_LEN + self.metadata_len()
    }
}

impl Default for Header {
    fn default() -> Self {
        Self::new(Vec::<String>::new())
    }
}

/// A labeled region within an item's payload.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// Index into the header's label table.
    pub class_id: u32,

    /// Normalized bounding region.
    pub region: Region,
}

impl Annotation {
    /// Number of bytes an annotation record occupies on disk.
    pub const ENCODED_LEN: usize = 4 + Region::ENCODED_LEN;

    pub fn new(class_id: u32, region: Region) -> Self {
        Self { class_id, region }
    }
}

/// One dataset entry: an encoded payload and its annotations.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Item {
    /// Encoded image bytes (PNG, JPEG, ...). Opaque to the codec.
    pub payload: Vec<u8>,

    /// Annotations in file order.
    pub annotations: Vec<Annotation>,
}

impl Item {
    /// Creates an item with no annotations.
    pub fn new(payload: impl Into<Vec<u8>>) -> Self {
        Self {
            payload: payload.into(),
            annotations: Vec::new(),
        }
    }

    /// Adds an annotation to the item.
    pub fn with_annotation(mut self, class_id: u32, region: Region) -> Self {
        self.annotations.push(Annotation::new(class_id, region));
        self
    }

    /// Total encoded size of the item in bytes.
    pub fn encoded_len(&self) -> u64 {
        4 + self.payload.len() as u64
            + 2
            + (self.annotations.len() * Annotation::ENCODED_LEN) as u64
    }
}

/// A complete dataset: header plus every item, in order.
///
/// Decoding only ever produces datasets where `items.len()` equals
/// `header.item_count`. When building a dataset in memory, use
/// [`Dataset::push_item`] to keep the two in step; writers recompute the
/// count from `items` regardless.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dataset {
    pub header: Header,
    pub items: Vec<Item>,
}

impl Dataset {
    /// Creates an empty dataset with the given label table.
    pub fn new(labels: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            header: Header::new(labels),
            items: Vec::new(),
        }
    }

    /// Creates a dataset from a label table and items, setting the count.
    pub fn from_items(
        labels: impl IntoIterator<Item = impl Into<String>>,
        items: Vec<Item>,
    ) -> Self {
        let mut header = Header::new(labels);
        header.item_count = items.len() as u64;
        Self { header, items }
    }

    /// Appends an item and bumps the header's item count.
    pub fn push_item(&mut self, item: Item) {
        self.items.push(item);
        self.header.item_count = self.items.len() as u64;
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the label name for a class id, if the table has one.
    pub fn label_name(&self, class_id: u32) -> Option<&str> {
        self.header.label_name(class_id)
    }

    /// Total number of annotations across all items.
    pub fn annotation_count(&self) -> usize {
        self.items.iter().map(|item| item.annotations.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_creation() {
        let mut dataset = Dataset::new(["person", "car"]);
        assert!(dataset.is_empty());
        assert_eq!(dataset.header.item_count, 0);

        dataset.push_item(
            Item::new(vec![1, 2, 3]).with_annotation(1, Region::new(0.1, 0.1, 0.2, 0.2)),
        );
        dataset.push_item(Item::new(vec![4]));

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.header.item_count, 2);
        assert_eq!(dataset.annotation_count(), 1);
        assert_eq!(dataset.label_name(1), Some("car"));
        assert_eq!(dataset.label_name(2), None);
    }

    #[test]
    fn test_from_items_sets_count() {
        let dataset = Dataset::from_items(Vec::<String>::new(), vec![Item::default(); 3]);
        assert_eq!(dataset.header.item_count, 3);
        assert_eq!(dataset.header.magic, MAGIC);
        assert_eq!(dataset.header.version, CURRENT_VERSION);
    }

    #[test]
    fn test_encoded_lengths() {
        let header = Header::new(["ab", "cde"]);
        // label_count + (2 + 2) + (2 + 3)
        assert_eq!(header.metadata_len(), 4 + 4 + 5);
        assert_eq!(header.encoded_len(), 22 + 13);

        let mut newer = header.clone();
        newer.extra_metadata = vec![0; 5];
        assert_eq!(newer.metadata_len(), 13 + 5);

        let item = Item::new(vec![0u8; 10])
            .with_annotation(0, Region::default())
            .with_annotation(1, Region::default());
        assert_eq!(item.encoded_len(), 4 + 10 + 2 + 40);
    }
}
