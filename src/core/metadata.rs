use serde::{Deserialize, Serialize};
use std::fmt;

/// Release version of a catalogue. Callers historically pass either a
/// number or a free-form string, so both survive serialization unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Version {
    Number(u64),
    Text(String),
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Version::Number(n) => write!(f, "{}", n),
            Version::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<u64> for Version {
    fn from(n: u64) -> Self {
        Version::Number(n)
    }
}

impl From<&str> for Version {
    fn from(s: &str) -> Self {
        Version::Text(s.to_string())
    }
}

impl From<String> for Version {
    fn from(s: String) -> Self {
        Version::Text(s)
    }
}

/// Describes the runtime the package was generated with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeInfo {
    pub package_version: String,
    pub os: String,
    pub arch: String,
}

impl fmt::Display for RuntimeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "catpack {} ({}/{})", self.package_version, self.os, self.arch)
    }
}

/// Metadata for a packaged catalogue: who made it, from what, and when.
///
/// The identity fields come from the caller; `generated_at`, `host`,
/// `runtime`, and `content_hash` are facts about the packaging act itself
/// and are filled in by the packager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogueMetadata {
    /// Catalogue name, also the stem of the output filename
    pub name: String,

    /// One-line description of the catalogue
    pub summary: String,

    /// Person who generated the release
    pub user: String,

    /// Contact address for questions about the release
    pub contact: String,

    /// Script or pipeline that produced the table
    pub script_name: String,

    /// Release version
    pub version: Version,

    /// Wall-clock time of packaging, human-readable
    pub generated_at: String,

    /// Host the package was generated on
    pub host: String,

    /// Runtime the package was generated with
    pub runtime: RuntimeInfo,

    /// SHA-256 over the table content
    pub content_hash: String,
}
