//! Host version parsing
//!
//! Hosts report versions like `1.16.5-R0.1-SNAPSHOT`. Only the dotted
//! numeric prefix matters for deciding which feature set the host supports.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A `major.minor.patch` version, missing parts count as zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ServerVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl ServerVersion {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parses the numeric prefix of a host version string
    ///
    /// Anything after the first `-` is ignored. Non-numeric parts parse as 0,
    /// so this never fails.
    pub fn parse(raw: &str) -> Self {
        let numeric = raw.trim().split('-').next().unwrap_or_default();
        let mut parts = numeric
            .split('.')
            .map(|part| part.trim().parse::<u32>().unwrap_or(0));

        Self {
            major: parts.next().unwrap_or(0),
            minor: parts.next().unwrap_or(0),
            patch: parts.next().unwrap_or(0),
        }
    }

    /// Inclusive range check
    pub fn is_between(&self, min: ServerVersion, max: ServerVersion) -> bool {
        *self >= min && *self <= max
    }
}

impl fmt::Display for ServerVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Which adapter family a host version belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionChannel {
    /// 1.8 through 1.16
    Legacy,
    /// 1.18 through 1.21
    Modern,
    Unsupported,
}

impl VersionChannel {
    pub fn detect(version: ServerVersion) -> Self {
        // 1.17.x sits between the two ranges and is rejected on purpose
        if version.major == 1 && version.minor == 17 {
            return VersionChannel::Unsupported;
        }

        // Upper bounds cover every patch of the last minor release
        if version.is_between(
            ServerVersion::new(1, 8, 0),
            ServerVersion::new(1, 16, u32::MAX),
        ) {
            VersionChannel::Legacy
        } else if version.is_between(
            ServerVersion::new(1, 18, 0),
            ServerVersion::new(1, 21, u32::MAX),
        ) {
            VersionChannel::Modern
        } else {
            VersionChannel::Unsupported
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, VersionChannel::Unsupported)
    }
}

impl fmt::Display for VersionChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VersionChannel::Legacy => "legacy",
            VersionChannel::Modern => "modern",
            VersionChannel::Unsupported => "unsupported",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_strips_build_suffix() {
        assert_eq!(
            ServerVersion::parse("1.16.5-R0.1-SNAPSHOT"),
            ServerVersion::new(1, 16, 5)
        );
    }

    #[test]
    fn test_parse_fills_missing_parts() {
        assert_eq!(ServerVersion::parse("1.18"), ServerVersion::new(1, 18, 0));
        assert_eq!(ServerVersion::parse("1.x.3"), ServerVersion::new(1, 0, 3));
        assert_eq!(ServerVersion::parse(""), ServerVersion::default());
    }

    #[test]
    fn test_ordering() {
        assert!(ServerVersion::parse("1.9") > ServerVersion::parse("1.8.9"));
        assert!(ServerVersion::parse("1.20.1") < ServerVersion::parse("1.20.4"));
    }

    #[test]
    fn test_channel_detection() {
        let detect = |raw: &str| VersionChannel::detect(ServerVersion::parse(raw));

        assert_eq!(detect("1.8"), VersionChannel::Legacy);
        assert_eq!(detect("1.12.2-R0.1-SNAPSHOT"), VersionChannel::Legacy);
        assert_eq!(detect("1.16.5"), VersionChannel::Legacy);
        assert_eq!(detect("1.17.1"), VersionChannel::Unsupported);
        assert_eq!(detect("1.18"), VersionChannel::Modern);
        assert_eq!(detect("1.20.4-R0.1-SNAPSHOT"), VersionChannel::Modern);
        assert_eq!(detect("1.21.1"), VersionChannel::Modern);
        assert_eq!(detect("1.7.10"), VersionChannel::Unsupported);
        assert_eq!(detect("1.22"), VersionChannel::Unsupported);
    }

    #[test]
    fn test_channel_serializes_lowercase() {
        let json = serde_json::to_string(&VersionChannel::Modern).unwrap();
        assert_eq!(json, "\"modern\"");
    }
}
