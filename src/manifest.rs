//! JSON manifest interchange for JDX datasets.
//!
//! A manifest describes a dataset with loose payload files, which is how
//! most datasets exist before they are packed:
//!
//! ```json
//! {
//!   "version": { "major": 1, "minor": 0, "patch": 0 },
//!   "labels": ["person", "dog"],
//!   "items": [
//!     {
//!       "payload": "images/0001.jpg",
//!       "annotations": [
//!         { "class_id": 0, "region": { "x": 0.1, "y": 0.1, "width": 0.5, "height": 0.5 } }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! Payload paths are relative to the manifest's directory. `version` is
//! optional and defaults to the current format version.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::JdxError;
use crate::format::{
    read_dataset_from_path_with, write_dataset_to_path, Annotation, AnnotationPolicy, Dataset, Item,
    ReadOptions, ReadWarning, Version, CURRENT_VERSION,
};
use crate::validation::{check_region, check_version};

/// File name used for the manifest written by [`unpack`].
pub const MANIFEST_FILE_NAME: &str = "manifest.json";

/// A dataset description with payloads stored as separate files.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<Version>,

    #[serde(default)]
    pub labels: Vec<String>,

    /// Header metadata from a newer minor version, carried through as-is.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_metadata: Vec<u8>,

    pub items: Vec<ManifestItem>,
}

/// One item in a manifest.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ManifestItem {
    /// Path of the payload file, relative to the manifest.
    pub payload: PathBuf,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
}

/// Reads a manifest from a JSON file.
pub fn read_manifest(path: &Path) -> Result<Manifest, JdxError> {
    let file = File::open(path).map_err(JdxError::Io)?;
    let reader = BufReader::new(file);

    serde_json::from_reader(reader).map_err(|source| JdxError::Manifest {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes a manifest as pretty-printed JSON.
pub fn write_manifest(path: &Path, manifest: &Manifest) -> Result<(), JdxError> {
    let file = File::create(path).map_err(JdxError::Io)?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, manifest).map_err(|source| JdxError::Manifest {
        path: path.to_path_buf(),
        source,
    })?;
    writer.flush().map_err(JdxError::Io)
}

/// Loads every payload a manifest references and builds the dataset.
///
/// Payload paths are resolved against `base_dir`.
pub fn manifest_to_dataset(
    manifest: &Manifest,
    base_dir: &Path,
    manifest_path: &Path,
) -> Result<Dataset, JdxError> {
    let version = manifest.version.unwrap_or(CURRENT_VERSION);
    check_version(&version).map_err(|_| JdxError::ManifestInvalid {
        path: manifest_path.to_path_buf(),
        message: format!("version {} cannot be written by this tool", version),
    })?;

    let mut dataset = Dataset::new(manifest.labels.iter().cloned());
    dataset.header.version = version;
    dataset.header.extra_metadata = manifest.extra_metadata.clone();

    for (index, entry) in manifest.items.iter().enumerate() {
        if entry.payload.is_absolute() {
            return Err(JdxError::ManifestInvalid {
                path: manifest_path.to_path_buf(),
                message: format!(
                    "item {} payload '{}' must be relative to the manifest",
                    index,
                    entry.payload.display()
                ),
            });
        }

        let payload_path = base_dir.join(&entry.payload);
        let payload = fs::read(&payload_path).map_err(JdxError::Io)?;
        dataset.push_item(Item {
            payload,
            annotations: entry.annotations.clone(),
        });
    }

    Ok(dataset)
}

/// Packs a manifest and its payload files into a JDX file.
///
/// Annotation regions are checked with the same policy the reader applies,
/// before anything is written, so a successful pack always produces a file
/// that reads back under `policy`.
pub fn pack(
    manifest_path: &Path,
    output: &Path,
    policy: AnnotationPolicy,
) -> Result<(Dataset, Vec<ReadWarning>), JdxError> {
    let manifest = read_manifest(manifest_path)?;
    let base_dir = manifest_path.parent().unwrap_or(Path::new("."));
    let dataset = manifest_to_dataset(&manifest, base_dir, manifest_path)?;

    let mut warnings = Vec::new();
    for (index, item) in dataset.items.iter().enumerate() {
        for (n, annotation) in item.annotations.iter().enumerate() {
            if let Some(warning) = check_region(&annotation.region, policy, index as u64, n)? {
                warnings.push(warning);
            }
        }
    }

    write_dataset_to_path(&dataset, output)?;
    Ok((dataset, warnings))
}

/// Unpacks a JDX file into payload files plus a manifest.
///
/// Payloads are written as `item_NNNNNN.<ext>`, with the extension taken
/// from the detected image type.
pub fn unpack(
    input: &Path,
    output_dir: &Path,
    opts: &ReadOptions,
) -> Result<(Manifest, Vec<ReadWarning>), JdxError> {
    let read = read_dataset_from_path_with(input, opts)?;
    fs::create_dir_all(output_dir).map_err(JdxError::Io)?;

    let mut items = Vec::with_capacity(read.dataset.items.len());
    for (index, item) in read.dataset.items.iter().enumerate() {
        let file_name = format!("item_{:06}.{}", index, payload_extension(&item.payload));
        fs::write(output_dir.join(&file_name), &item.payload).map_err(JdxError::Io)?;
        items.push(ManifestItem {
            payload: PathBuf::from(file_name),
            annotations: item.annotations.clone(),
        });
    }

    let manifest = Manifest {
        version: Some(read.dataset.header.version),
        labels: read.dataset.header.labels.clone(),
        extra_metadata: read.dataset.header.extra_metadata.clone(),
        items,
    };
    write_manifest(&output_dir.join(MANIFEST_FILE_NAME), &manifest)?;

    Ok((manifest, read.warnings))
}

fn payload_extension(payload: &[u8]) -> &'static str {
    match imagesize::image_type(payload) {
        Ok(imagesize::ImageType::Jpeg) => "jpg",
        Ok(imagesize::ImageType::Png) => "png",
        Ok(imagesize::ImageType::Bmp) => "bmp",
        Ok(imagesize::ImageType::Gif) => "gif",
        Ok(imagesize::ImageType::Webp) => "webp",
        Ok(imagesize::ImageType::Tiff) => "tiff",
        _ => "bin",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::Region;

    #[test]
    fn test_manifest_json_shape() {
        let json = r#"{
            "labels": ["person"],
            "items": [
                { "payload": "a.jpg", "annotations": [
                    { "class_id": 0, "region": { "x": 0.1, "y": 0.2, "width": 0.3, "height": 0.4 } }
                ] },
                { "payload": "b.jpg" }
            ]
        }"#;

        let manifest: Manifest = serde_json::from_str(json).expect("parse manifest");
        assert_eq!(manifest.version, None);
        assert_eq!(manifest.items.len(), 2);
        assert_eq!(
            manifest.items[0].annotations[0],
            Annotation::new(0, Region::new(0.1, 0.2, 0.3, 0.4))
        );
        assert!(manifest.items[1].annotations.is_empty());
    }

    #[test]
    fn test_payload_extension() {
        let png = b"\x89PNG\r\n\x1a\n\0\0\0\x0dIHDR\0\0\0\x01\0\0\0\x01";
        assert_eq!(payload_extension(png), "png");
        assert_eq!(payload_extension(b"plain text"), "bin");
        assert_eq!(payload_extension(b""), "bin");
    }

    #[test]
    fn test_absolute_payload_path_rejected() {
        let manifest = Manifest {
            version: None,
            labels: vec![],
            extra_metadata: vec![],
            items: vec![ManifestItem {
                payload: std::env::temp_dir().join("x.png"),
                annotations: vec![],
            }],
        };
        let err = manifest_to_dataset(&manifest, Path::new("."), Path::new("m.json")).unwrap_err();
        assert!(matches!(err, JdxError::ManifestInvalid { .. }));
    }

    #[test]
    fn test_unwritable_version_rejected() {
        let manifest = Manifest {
            version: Some(Version::new(5, 0, 0)),
            labels: vec![],
            extra_metadata: vec![],
            items: vec![],
        };
        let err = manifest_to_dataset(&manifest, Path::new("."), Path::new("m.json")).unwrap_err();
        assert!(matches!(err, JdxError::ManifestInvalid { .. }));
    }
}
