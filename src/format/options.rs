//! Decoding policy and the non-fatal conditions it can report.

use serde::Serialize;
use std::fmt;

/// Default tolerance for [`AnnotationPolicy::Lenient`].
pub const DEFAULT_REGION_TOLERANCE: f32 = 1e-3;

/// How strictly annotation regions are range-checked while decoding.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AnnotationPolicy {
    /// Every region must be finite and lie inside the unit square.
    Strict,
    /// Regions may stray outside the unit square by at most `tolerance`.
    ///
    /// Accepted out-of-range values are kept as-is and reported through
    /// [`ReadWarning::AnnotationOutOfRange`].
    Lenient { tolerance: f32 },
}

impl Default for AnnotationPolicy {
    fn default() -> Self {
        AnnotationPolicy::Lenient {
            tolerance: DEFAULT_REGION_TOLERANCE,
        }
    }
}

/// Options for reading a full dataset.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ReadOptions {
    /// If true, trailing bytes after the last item are an error.
    pub strict: bool,
    /// Range-check policy for annotation regions.
    pub annotations: AnnotationPolicy,
}

impl ReadOptions {
    /// Strict trailing-data handling and strict annotation ranges.
    pub fn strict() -> Self {
        Self {
            strict: true,
            annotations: AnnotationPolicy::Strict,
        }
    }
}

/// A non-fatal condition noticed while decoding.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReadWarning {
    /// Bytes remained after the last declared item and were ignored.
    TrailingData { offset: u64, bytes: u64 },
    /// A region was slightly outside the unit square but within tolerance.
    AnnotationOutOfRange {
        item: u64,
        annotation: usize,
        excess: f32,
    },
}

impl fmt::Display for ReadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadWarning::TrailingData { offset, bytes } => write!(
                f,
                "ignored {} trailing byte(s) starting at byte {}",
                bytes, offset
            ),
            ReadWarning::AnnotationOutOfRange {
                item,
                annotation,
                excess,
            } => write!(
                f,
                "annotation {} in item {} lies {:e} outside the unit square (within tolerance)",
                annotation, item, excess
            ),
        }
    }
}
