#![allow(dead_code)]

use std::fs;
use std::path::Path;

use jdx::format::{Dataset, Item, Region};

pub fn bmp_bytes(width: u32, height: u32) -> Vec<u8> {
    let row_stride = (width * 3).div_ceil(4) * 4;
    let pixel_array_size = row_stride * height;
    let file_size = 54 + pixel_array_size;

    let mut bytes = Vec::with_capacity(file_size as usize);
    bytes.extend_from_slice(b"BM");
    bytes.extend_from_slice(&file_size.to_le_bytes());
    bytes.extend_from_slice(&[0, 0, 0, 0]);
    bytes.extend_from_slice(&54u32.to_le_bytes());

    bytes.extend_from_slice(&40u32.to_le_bytes());
    bytes.extend_from_slice(&(width as i32).to_le_bytes());
    bytes.extend_from_slice(&(height as i32).to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&24u16.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&pixel_array_size.to_le_bytes());
    bytes.extend_from_slice(&2835u32.to_le_bytes());
    bytes.extend_from_slice(&2835u32.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());

    bytes.resize(file_size as usize, 0);
    bytes
}

pub fn write_bmp(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(path, bmp_bytes(width, height)).expect("write bmp file");
}

/// Two BMP items with labels `person` and `dog`: the first carries two
/// annotations, the second none.
pub fn sample_dataset() -> Dataset {
    Dataset::from_items(
        ["person", "dog"],
        vec![
            Item::new(bmp_bytes(4, 3))
                .with_annotation(0, Region::new(0.1, 0.2, 0.3, 0.4))
                .with_annotation(1, Region::new(0.5, 0.5, 0.25, 0.25)),
            Item::new(bmp_bytes(2, 2)),
        ],
    )
}

/// Writes `dataset` to `path` as a JDX file.
pub fn write_jdx(path: &Path, dataset: &Dataset) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    jdx::format::write_dataset_to_path(dataset, path).expect("write jdx file");
}
