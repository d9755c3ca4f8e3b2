//! Validation for JDX datasets.
//!
//! Two layers live here:
//! - Structural checks ([`check_magic`], [`check_version`], ...) that the
//!   codecs call while decoding, so corruption fails at the byte where it
//!   is detected.
//! - A semantic pass over a decoded [`Dataset`] that reports label table,
//!   payload and annotation problems without failing the read.

mod checks;
mod report;

pub use checks::{
    check_available, check_encodable_len, check_item_count_fits, check_magic, check_region,
    check_trailing, check_version,
};
pub use report::{IssueCode, IssueContext, Severity, ValidationIssue, ValidationReport};

use std::collections::HashMap;

use crate::format::Dataset;

/// Options for validation behavior.
#[derive(Clone, Debug)]
pub struct ValidateOptions {
    /// If true, sniff each payload for a known image container.
    pub check_payloads: bool,
}

impl Default for ValidateOptions {
    fn default() -> Self {
        Self {
            check_payloads: true,
        }
    }
}

/// Validates a dataset and returns a report of all issues found.
///
/// This function checks:
/// - The header's item count against the item list
/// - The label table for empty and duplicate names
/// - Payloads for emptiness and (optionally) a recognizable image type
/// - Annotations for unknown class ids and malformed regions
pub fn validate_dataset(dataset: &Dataset, opts: &ValidateOptions) -> ValidationReport {
    let mut report = ValidationReport::new();

    if dataset.header.item_count != dataset.items.len() as u64 {
        report.add(ValidationIssue::error(
            IssueCode::ItemCountMismatch,
            format!(
                "Header declares {} item(s) but the dataset holds {}",
                dataset.header.item_count,
                dataset.items.len()
            ),
            IssueContext::Dataset,
        ));
    }

    validate_labels(dataset, &mut report);
    validate_payloads(dataset, opts, &mut report);
    validate_annotations(dataset, &mut report);

    report
}

/// Validates the header's label table.
fn validate_labels(dataset: &Dataset, report: &mut ValidationReport) {
    let mut seen_names: HashMap<&str, usize> = HashMap::new();

    for (index, label) in dataset.header.labels.iter().enumerate() {
        if label.is_empty() {
            report.add(ValidationIssue::warning(
                IssueCode::EmptyLabel,
                "Empty label name",
                IssueContext::Label { index },
            ));
            continue;
        }

        // Duplicate names are legal but make class ids ambiguous to humans.
        if let Some(first) = seen_names.get(label.as_str()) {
            report.add(ValidationIssue::warning(
                IssueCode::DuplicateLabel,
                format!("Duplicate label '{}' (also used by class {})", label, first),
                IssueContext::Label { index },
            ));
        } else {
            seen_names.insert(label, index);
        }
    }
}

/// Validates item payloads.
fn validate_payloads(dataset: &Dataset, opts: &ValidateOptions, report: &mut ValidationReport) {
    for (index, item) in dataset.items.iter().enumerate() {
        if item.payload.is_empty() {
            report.add(ValidationIssue::warning(
                IssueCode::EmptyPayload,
                "Empty payload",
                IssueContext::Item { index },
            ));
            continue;
        }

        if opts.check_payloads && imagesize::blob_size(&item.payload).is_err() {
            report.add(ValidationIssue::warning(
                IssueCode::UnrecognizedPayload,
                format!(
                    "Payload of {} byte(s) is not a recognized image format",
                    item.payload.len()
                ),
                IssueContext::Item { index },
            ));
        }
    }
}

/// Validates all annotations in the dataset.
fn validate_annotations(dataset: &Dataset, report: &mut ValidationReport) {
    let label_count = dataset.header.labels.len();

    for (item_index, item) in dataset.items.iter().enumerate() {
        for (index, annotation) in item.annotations.iter().enumerate() {
            let context = IssueContext::Annotation {
                item: item_index,
                index,
            };

            // Datasets without a label table use bare class ids.
            if label_count > 0 && annotation.class_id as usize >= label_count {
                report.add(ValidationIssue::error(
                    IssueCode::UnknownClassId,
                    format!(
                        "Class id {} has no label (table has {} label(s))",
                        annotation.class_id, label_count
                    ),
                    context.clone(),
                ));
            }

            let region = &annotation.region;
            if !region.is_finite() {
                report.add(ValidationIssue::error(
                    IssueCode::RegionNotFinite,
                    format!("Non-finite region {:?}", region),
                    context,
                ));
                continue; // Skip further region checks if components are invalid
            }

            let excess = region.range_excess();
            if excess > 0.0 {
                report.add(ValidationIssue::warning(
                    IssueCode::RegionOutOfRange,
                    format!(
                        "Region ({:.4}, {:.4}, {:.4}, {:.4}) extends {:e} outside the unit square",
                        region.x, region.y, region.width, region.height, excess
                    ),
                    context.clone(),
                ));
            }

            if region.area() <= 0.0 {
                report.add(ValidationIssue::warning(
                    IssueCode::DegenerateRegion,
                    format!("Zero or negative area: {:.6}", region.area()),
                    context,
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{Item, Region};

    fn bmp_bytes(width: u32, height: u32) -> Vec<u8> {
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
        bytes.resize(file_size as usize, 0);
        bytes
    }

    fn valid_dataset() -> Dataset {
        Dataset::from_items(
            ["person", "dog"],
            vec![Item::new(bmp_bytes(4, 4)).with_annotation(1, Region::new(0.1, 0.2, 0.3, 0.4))],
        )
    }

    #[test]
    fn test_valid_dataset() {
        let report = validate_dataset(&valid_dataset(), &ValidateOptions::default());
        assert!(
            report.is_clean(),
            "Expected no issues, got: {:?}",
            report.issues
        );
    }

    #[test]
    fn test_item_count_mismatch() {
        let mut dataset = valid_dataset();
        dataset.header.item_count = 4;

        let report = validate_dataset(&dataset, &ValidateOptions::default());
        assert_eq!(report.error_count(), 1);
        assert!(report.has(IssueCode::ItemCountMismatch));
    }

    #[test]
    fn test_unknown_class_id() {
        let mut dataset = valid_dataset();
        dataset.items[0].annotations[0].class_id = 2;

        let report = validate_dataset(&dataset, &ValidateOptions::default());
        assert_eq!(report.error_count(), 1);
        assert!(report.has(IssueCode::UnknownClassId));
    }

    #[test]
    fn test_class_ids_unchecked_without_label_table() {
        let mut dataset = valid_dataset();
        dataset.header.labels.clear();
        dataset.items[0].annotations[0].class_id = 500;

        let report = validate_dataset(&dataset, &ValidateOptions::default());
        assert!(report.is_clean());
    }

    #[test]
    fn test_label_table_issues() {
        let mut dataset = valid_dataset();
        dataset.header.labels = vec!["cat".into(), "".into(), "cat".into()];

        let report = validate_dataset(&dataset, &ValidateOptions::default());
        assert_eq!(report.warning_count(), 2);
        assert!(report.has(IssueCode::EmptyLabel));
        assert!(report.has(IssueCode::DuplicateLabel));
    }

    #[test]
    fn test_region_issues() {
        let mut dataset = valid_dataset();
        dataset.items[0].annotations[0].region = Region::new(0.9, 0.5, 0.2, 0.0);

        let report = validate_dataset(&dataset, &ValidateOptions::default());
        assert!(report.is_ok());
        assert!(report.has(IssueCode::RegionOutOfRange));
        assert!(report.has(IssueCode::DegenerateRegion));
    }

    #[test]
    fn test_region_not_finite() {
        let mut dataset = valid_dataset();
        dataset.items[0].annotations[0].region = Region::new(f32::INFINITY, 0.0, 0.1, 0.1);

        let report = validate_dataset(&dataset, &ValidateOptions::default());
        assert_eq!(report.error_count(), 1);
        assert!(report.has(IssueCode::RegionNotFinite));
        assert!(!report.has(IssueCode::RegionOutOfRange));
    }

    #[test]
    fn test_payload_issues() {
        let mut dataset = valid_dataset();
        dataset.push_item(Item::new(Vec::new()));
        dataset.push_item(Item::new(b"hello world, not an image".to_vec()));

        let report = validate_dataset(&dataset, &ValidateOptions::default());
        assert!(report.has(IssueCode::EmptyPayload));
        assert!(report.has(IssueCode::UnrecognizedPayload));

        let opts = ValidateOptions {
            check_payloads: false,
        };
        let report = validate_dataset(&dataset, &opts);
        assert!(!report.has(IssueCode::UnrecognizedPayload));
    }
}
