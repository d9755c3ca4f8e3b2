//! Structural checks run while decoding and encoding.
//!
//! Each check is a standalone function so the header, item and dataset
//! codecs can call exactly the ones relevant to the bytes they are looking
//! at. Failures carry the byte offset where the problem was detected.

use crate::error::JdxError;
use crate::format::{
    AnnotationPolicy, ReadWarning, Region, Version, MAGIC, MIN_ITEM_LEN, SUPPORTED_MAJOR_VERSIONS,
};

/// Fails with `Truncated` unless `needed` bytes are available at `offset`.
pub fn check_available(
    offset: u64,
    needed: u64,
    available: u64,
    context: &'static str,
) -> Result<(), JdxError> {
    if needed > available {
        return Err(JdxError::Truncated {
            offset,
            needed,
            available,
            context,
        });
    }
    Ok(())
}

/// Compares the leading bytes of a stream against the format signature.
///
/// `found` may be shorter than the signature when the stream itself is
/// short. Anything other than the full signature is `BadMagic`, including
/// an empty stream or a correct but incomplete prefix.
pub fn check_magic(found: &[u8]) -> Result<(), JdxError> {
    if found != MAGIC {
        return Err(JdxError::BadMagic {
            expected: MAGIC.to_vec(),
            found: found.to_vec(),
        });
    }
    Ok(())
}

/// Fails with `UnsupportedVersion` unless the major version is readable.
///
/// Minor and patch differences are tolerated in both directions.
pub fn check_version(version: &Version) -> Result<(), JdxError> {
    if !SUPPORTED_MAJOR_VERSIONS.contains(&version.major) {
        return Err(JdxError::UnsupportedVersion {
            found: *version,
            supported: SUPPORTED_MAJOR_VERSIONS,
        });
    }
    Ok(())
}

/// Rejects item counts that cannot possibly fit in the remaining bytes.
///
/// Runs before any item is decoded so a corrupt count fails at the header
/// instead of after a long partial read.
pub fn check_item_count_fits(item_count: u64, offset: u64, remaining: u64) -> Result<(), JdxError> {
    check_available(
        offset,
        item_count.saturating_mul(MIN_ITEM_LEN),
        remaining,
        "item records",
    )
}

/// Fails with `Format` if `len` does not fit an on-disk field of `max`.
pub fn check_encodable_len(
    len: usize,
    max: u64,
    what: &str,
    offset: u64,
) -> Result<(), JdxError> {
    if len as u64 > max {
        return Err(JdxError::Format {
            offset,
            message: format!("{what} is {len}, but the format allows at most {max}"),
        });
    }
    Ok(())
}

/// Range-checks one annotation region under the given policy.
///
/// Returns a warning when a lenient policy accepted an out-of-range value.
pub fn check_region(
    region: &Region,
    policy: AnnotationPolicy,
    item: u64,
    annotation: usize,
) -> Result<Option<ReadWarning>, JdxError> {
    let invalid = |message: String| JdxError::InvalidAnnotation {
        item,
        annotation,
        message,
    };

    if !region.is_finite() {
        return Err(invalid(format!("non-finite region {region:?}")));
    }
    if region.is_within_unit_square() {
        return Ok(None);
    }

    let excess = region.range_excess();

    match policy {
        AnnotationPolicy::Lenient { tolerance } if excess <= tolerance => {
            Ok(Some(ReadWarning::AnnotationOutOfRange {
                item,
                annotation,
                excess,
            }))
        }
        AnnotationPolicy::Lenient { tolerance } => Err(invalid(format!(
            "region {region:?} lies {excess} outside the unit square (tolerance {tolerance})"
        ))),
        AnnotationPolicy::Strict => Err(invalid(format!(
            "region {region:?} lies outside the unit square"
        ))),
    }
}

/// Handles bytes left after the last item.
///
/// Trailing data is reserved for future optional trailers: lenient reads
/// ignore it with a warning, strict reads reject it.
pub fn check_trailing(
    offset: u64,
    remaining: u64,
    strict: bool,
) -> Result<Option<ReadWarning>, JdxError> {
    if remaining == 0 {
        return Ok(None);
    }
    if strict {
        return Err(JdxError::TrailingData {
            offset,
            bytes: remaining,
        });
    }
    Ok(Some(ReadWarning::TrailingData {
        offset,
        bytes: remaining,
    }))
}
