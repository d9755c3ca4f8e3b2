//! Semantic version triple used to tag JDX files.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::JdxError;

/// A semantic version (major, minor, patch).
///
/// Ordering is lexicographic: major first, then minor, then patch. Major
/// bumps are breaking; minor and patch bumps only add data that older
/// readers can skip.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Version {
    pub major: u16,
    pub minor: u16,
    pub patch: u16,
}

impl Version {
    /// Number of bytes a version occupies on disk.
    pub const ENCODED_LEN: usize = 6;

    /// Creates a new version.
    #[inline]
    pub const fn new(major: u16, minor: u16, patch: u16) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Encodes the version as three little-endian u16 values.
    pub fn to_bytes(&self) -> [u8; Self::ENCODED_LEN] {
        let mut out = [0u8; Self::ENCODED_LEN];
        out[0..2].copy_from_slice(&self.major.to_le_bytes());
        out[2..4].copy_from_slice(&self.minor.to_le_bytes());
        out[4..6].copy_from_slice(&self.patch.to_le_bytes());
        out
    }

    /// Decodes a version from its on-disk form.
    pub fn from_bytes(bytes: [u8; Self::ENCODED_LEN]) -> Self {
        Self {
            major: u16::from_le_bytes([bytes[0], bytes[1]]),
            minor: u16::from_le_bytes([bytes[2], bytes[3]]),
            patch: u16::from_le_bytes([bytes[4], bytes[5]]),
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for Version {
    type Err = JdxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |message: String| JdxError::Format { offset: 0, message };

        let parts: Vec<&str> = s.trim().split('.').collect();
        if parts.len() != 3 {
            return Err(invalid(format!(
                "version '{s}' must have the form MAJOR.MINOR.PATCH"
            )));
        }

        let mut numbers = [0u16; 3];
        for (slot, (part, name)) in numbers
            .iter_mut()
            .zip(parts.iter().zip(["major", "minor", "patch"]))
        {
            *slot = part.parse::<u16>().map_err(|_| {
                invalid(format!(
                    "invalid {name} component '{part}' in version '{s}'"
                ))
            })?;
        }

        Ok(Version::new(numbers[0], numbers[1], numbers[2]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_ordering() {
        assert!(Version::new(1, 0, 0) < Version::new(1, 0, 1));
        assert!(Version::new(1, 9, 9) < Version::new(2, 0, 0));
        assert!(Version::new(1, 2, 0) > Version::new(1, 1, 65535));
        assert_eq!(Version::new(3, 4, 5), Version::new(3, 4, 5));
    }

    #[test]
    fn test_version_bytes_roundtrip() {
        let version = Version::new(1, 258, 65535);
        let bytes = version.to_bytes();
        assert_eq!(bytes, [1, 0, 2, 1, 255, 255]);
        assert_eq!(Version::from_bytes(bytes), version);
    }

    #[test]
    fn test_version_parse_and_display() {
        let version: Version = "1.2.3".parse().unwrap();
        assert_eq!(version, Version::new(1, 2, 3));
        assert_eq!(version.to_string(), "1.2.3");
    }

    #[test]
    fn test_version_parse_rejects_garbage() {
        assert!("1.2".parse::<Version>().is_err());
        assert!("1.2.x".parse::<Version>().is_err());
        assert!("1.2.70000".parse::<Version>().is_err());
        assert!("".parse::<Version>().is_err());
    }
}
