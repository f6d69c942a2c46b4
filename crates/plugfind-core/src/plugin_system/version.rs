use std::fmt;

use semver::Version;

/// Display form of a version that could not be parsed
pub const UNKNOWN_VERSION: &str = "unknown";

/// Error type for version parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    Empty,
    ParseError(String),
}

impl fmt::Display for VersionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionError::Empty => write!(f, "Empty version string"),
            VersionError::ParseError(msg) => write!(f, "Version parse error: {}", msg),
        }
    }
}

impl std::error::Error for VersionError {}

/// Parses a declared plugin version.
///
/// Manifests are hand-written, so this accepts a little more than strict
/// semver: surrounding whitespace, one leading `v`, and missing minor or
/// patch components (`"1.2"` reads as `1.2.0`). Pre-release and build
/// suffixes follow the usual semver rules.
pub fn parse_plugin_version(raw: &str) -> Result<Version, VersionError> {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix(['v', 'V']).unwrap_or(trimmed);
    if trimmed.is_empty() {
        return Err(VersionError::Empty);
    }

    let split_at = trimmed.find(['-', '+']).unwrap_or(trimmed.len());
    let (core, suffix) = trimmed.split_at(split_at);
    let normalized = match core.split('.').count() {
        1 => format!("{}.0.0{}", core, suffix),
        2 => format!("{}.0{}", core, suffix),
        _ => trimmed.to_string(),
    };

    Version::parse(&normalized).map_err(|e| VersionError::ParseError(format!("'{}': {}", raw, e)))
}

/// Bucket key for a declared version.
///
/// Every unparsable version, the empty string included, lands in the
/// [`VersionKey::Unknown`] bucket, displayed as `unknown`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VersionKey {
    Parsed(Version),
    Unknown,
}

impl VersionKey {
    pub fn from_declared(raw: &str) -> Self {
        match parse_plugin_version(raw) {
            Ok(version) => VersionKey::Parsed(version),
            Err(_) => VersionKey::Unknown,
        }
    }

    pub fn version(&self) -> Option<&Version> {
        match self {
            VersionKey::Parsed(version) => Some(version),
            VersionKey::Unknown => None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, VersionKey::Unknown)
    }
}

impl fmt::Display for VersionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionKey::Parsed(version) => write!(f, "{}", version),
            VersionKey::Unknown => f.write_str(UNKNOWN_VERSION),
        }
    }
}
