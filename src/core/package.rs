use crate::core::metadata::{CatalogueMetadata, Version};
use crate::core::sentinel::GuardedField;
use crate::core::storage::StorageError;
use crate::core::table::Table;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// File extension of the packaged artifact.
pub const PACKAGE_EXT: &str = "catpkg";

/// The packaged artifact: one catalogue table, its descriptive metadata,
/// the per-column descriptor vectors, and the free-text readme.
///
/// Invariant: `column_names`, `column_descriptions`, `column_ucds`, and
/// `column_units` all have length equal to the table's column count. The
/// packager refuses to build a package that violates this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CataloguePackage {
    pub table: Table,
    pub metadata: CatalogueMetadata,
    pub column_names: Vec<String>,
    pub column_descriptions: Vec<String>,
    pub column_ucds: Vec<String>,
    pub column_units: Vec<String>,
    pub readme: String,

    /// Free-form payload attached by the caller; absent unless supplied.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub added: Option<serde_json::Value>,
}

/// One failed length check of a descriptor vector against the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeFailure {
    pub vector: &'static str,
    pub expected: usize,
    pub actual: usize,
}

impl fmt::Display for ShapeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} has {} entries, expected {}",
            self.vector, self.actual, self.expected
        )
    }
}

#[derive(Error, Debug)]
pub enum PackageError {
    #[error("field '{field}' still holds the placeholder value '{value}'")]
    Placeholder { field: GuardedField, value: String },

    #[error("descriptor vectors do not match the table: {}", list_failures(.failures))]
    ShapeMismatch { failures: Vec<ShapeFailure> },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

fn list_failures(failures: &[ShapeFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Output filename for a package: `{name}_{DD_MM_YYYY}_v{version}.catpkg`.
pub fn package_filename(name: &str, date: NaiveDate, version: &Version) -> String {
    format!(
        "{}_{}_v{}.{}",
        name,
        date.format("%d_%m_%Y"),
        version,
        PACKAGE_EXT
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_filename() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 7).unwrap();
        assert_eq!(
            package_filename("bright_stars", date, &Version::Number(2)),
            "bright_stars_07_08_2026_v2.catpkg"
        );
        assert_eq!(
            package_filename("bright_stars", date, &Version::from("1.0")),
            "bright_stars_07_08_2026_v1.0.catpkg"
        );
    }

    #[test]
    fn test_shape_mismatch_lists_every_failure() {
        let err = PackageError::ShapeMismatch {
            failures: vec![
                ShapeFailure {
                    vector: "column_ucds",
                    expected: 3,
                    actual: 2,
                },
                ShapeFailure {
                    vector: "column_units",
                    expected: 3,
                    actual: 5,
                },
            ],
        };
        let msg = err.to_string();
        assert!(msg.contains("column_ucds has 2 entries, expected 3"));
        assert!(msg.contains("column_units has 5 entries, expected 3"));
    }
}
