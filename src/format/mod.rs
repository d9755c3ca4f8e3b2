//! The JDX binary dataset format.
//!
//! A JDX file is a header followed by `item_count` item records. Each item
//! carries an opaque encoded image payload and a list of annotations, where
//! an annotation is a class id plus a normalized bounding region.
//!
//! # Layout
//!
//! All integers and floats are little-endian.
//!
//! ```text
//! [magic: "JDX1"]                                   4 bytes
//! [version: major u16, minor u16, patch u16]        6 bytes
//! [item_count: u64]                                 8 bytes
//! [metadata_len: u32][metadata block]               4 + metadata_len bytes
//! ---- repeated item_count times ----
//! [payload_len: u32][payload bytes]
//! [annotation_count: u16]
//!   repeated: [class_id: u32][x: f32][y: f32][w: f32][h: f32]
//! ```
//!
//! # Versioning
//!
//! Files carry a semantic [`Version`]. Readers accept any file whose major
//! version is in [`SUPPORTED_MAJOR_VERSIONS`]; newer minor and patch
//! versions may only append data to the metadata block, which older readers
//! skip.
//!
//! # Example
//!
//! ```
//! use jdx::format::{from_jdx_slice, to_jdx_bytes, Dataset, Item, Region};
//!
//! let mut dataset = Dataset::new(["person"]);
//! dataset.push_item(
//!     Item::new(vec![0xFF, 0xD8, 0xFF])
//!         .with_annotation(0, Region::new(0.1, 0.1, 0.5, 0.5)),
//! );
//!
//! let bytes = to_jdx_bytes(&dataset)?;
//! assert_eq!(from_jdx_slice(&bytes)?, dataset);
//! # Ok::<(), jdx::JdxError>(())
//! ```

mod binary;
mod dataset;
mod header;
mod item;
mod model;
mod options;
mod region;
mod version;

pub use binary::{BinaryReader, BinaryWriter};
pub use dataset::{
    encoded_len, from_jdx_slice, read_dataset, read_dataset_from_path,
    read_dataset_from_path_with, read_header_from_path, read_header_only, to_jdx_bytes,
    write_dataset, write_dataset_to_path, DatasetRead,
};
pub use header::{
    read_header, write_header, CURRENT_VERSION, FIXED_HEADER_LEN, MAGIC, SUPPORTED_MAJOR_VERSIONS,
};
#[cfg(feature = "fuzzing")]
pub use item::fuzz_parse_item;
pub use item::{read_item, write_item, MIN_ITEM_LEN};
pub use model::{Annotation, Dataset, Header, Item};
pub use options::{AnnotationPolicy, ReadOptions, ReadWarning, DEFAULT_REGION_TOLERANCE};
pub use region::Region;
pub use version::Version;
