use crate::core::config::PackConfig;
use crate::core::environment::{Environment, SystemEnvironment};
use crate::core::metadata::{CatalogueMetadata, Version};
use crate::core::package::{package_filename, CataloguePackage, PackageError, ShapeFailure};
use crate::core::report;
use crate::core::sentinel::{GuardedValues, SentinelPolicy};
use crate::core::storage::{self, StorageError};
use crate::core::table::Table;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

/// Everything the caller supplies for one packaging run.
#[derive(Debug, Clone)]
pub struct PackageRequest {
    pub name: String,
    pub table: Table,
    pub summary: String,
    pub user: String,
    pub contact: String,
    pub script_name: String,
    pub version: Version,
    pub column_descriptions: Vec<String>,
    pub column_ucds: Vec<String>,
    pub column_units: Vec<String>,
    pub readme: String,

    /// Attached to the artifact under `added` when present
    pub extra: Option<serde_json::Value>,

    /// Bypasses the placeholder guard, for dry runs with template metadata
    pub test_mode: bool,
}

/// Validates, enriches, and writes catalogue packages.
///
/// Each call is independent; two runs producing the same name, date, and
/// version overwrite each other (last write wins).
pub struct Packager<E: Environment = SystemEnvironment> {
    env: E,
    policy: SentinelPolicy,
    output_dir: PathBuf,
}

impl Packager<SystemEnvironment> {
    pub fn new(config: &PackConfig) -> Self {
        Self::with_environment(SystemEnvironment, config)
    }
}

impl<E: Environment> Packager<E> {
    /// Build a packager around an explicit environment query, so tests can
    /// pin the clock and host.
    pub fn with_environment(env: E, config: &PackConfig) -> Self {
        Self {
            env,
            policy: SentinelPolicy::default(),
            output_dir: config.output_dir.clone(),
        }
    }

    /// Replace the default placeholder table.
    pub fn with_policy(mut self, policy: SentinelPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Path a package for `name`/`version` would be written to today.
    pub fn output_path(&self, name: &str, version: &Version) -> PathBuf {
        self.output_dir
            .join(package_filename(name, self.env.now().date_naive(), version))
    }

    /// Run a full packaging pass, reporting progress on stdout.
    pub fn package(&self, request: PackageRequest) -> Result<CataloguePackage, PackageError> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.package_to(request, &mut out)
    }

    /// Same as [`package`](Self::package), with an explicit progress sink.
    ///
    /// Steps, in order: placeholder guard (unless `test_mode`), shape
    /// validation of the three descriptor vectors, enrichment with
    /// generation-time facts, summary emission, single all-or-nothing
    /// write. Nothing is written when any validation step fails.
    pub fn package_to<W: Write>(
        &self,
        request: PackageRequest,
        out: &mut W,
    ) -> Result<CataloguePackage, PackageError> {
        report::banner(out, &request.name)?;

        if request.test_mode {
            writeln!(out, "  test mode: placeholder guard skipped")?;
        } else if let Some((field, value)) = self.policy.check(&guarded_values(&request)) {
            return Err(PackageError::Placeholder { field, value });
        }

        self.validate_shapes(&request, out)?;

        let now = self.env.now();
        let metadata = CatalogueMetadata {
            name: request.name,
            summary: request.summary,
            user: request.user,
            contact: request.contact,
            script_name: request.script_name,
            version: request.version,
            generated_at: now.format("%a %d %b %Y %H:%M:%S").to_string(),
            host: self.env.hostname(),
            runtime: self.env.runtime(),
            content_hash: content_hash(&request.table)?,
        };

        let package = CataloguePackage {
            column_names: request.table.column_names(),
            table: request.table,
            metadata,
            column_descriptions: request.column_descriptions,
            column_ucds: request.column_ucds,
            column_units: request.column_units,
            readme: request.readme,
            added: request.extra,
        };

        report::write_summary(out, &package)?;

        fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(package_filename(
            &package.metadata.name,
            now.date_naive(),
            &package.metadata.version,
        ));
        storage::write_package(&package, &path)?;
        report::completion(out, &path)?;

        Ok(package)
    }

    /// Check each descriptor vector against the table's column count. Every
    /// check runs and is acknowledged; failures are collected so the caller
    /// sees all three statuses at once.
    fn validate_shapes<W: Write>(
        &self,
        request: &PackageRequest,
        out: &mut W,
    ) -> Result<(), PackageError> {
        let expected = request.table.column_count();
        let checks = [
            ("column_descriptions", request.column_descriptions.len()),
            ("column_ucds", request.column_ucds.len()),
            ("column_units", request.column_units.len()),
        ];

        let mut failures = Vec::new();
        for (vector, actual) in checks {
            let ok = actual == expected;
            report::check_line(out, vector, ok, &format!("{} of {}", actual, expected))?;
            if !ok {
                failures.push(ShapeFailure {
                    vector,
                    expected,
                    actual,
                });
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(PackageError::ShapeMismatch { failures })
        }
    }
}

fn guarded_values(request: &PackageRequest) -> GuardedValues<'_> {
    GuardedValues {
        name: &request.name,
        summary: &request.summary,
        user: &request.user,
        contact: &request.contact,
        first_column_description: request.column_descriptions.first().map(String::as_str),
        readme: &request.readme,
    }
}

/// SHA-256 over the canonical JSON form of the table.
fn content_hash(table: &Table) -> Result<String, StorageError> {
    let canonical =
        serde_json::to_vec(table).map_err(|e| StorageError::Serialization(e.to_string()))?;
    let mut hasher = Sha256::new();
    hasher.update(&canonical);
    Ok(format!("{:x}", hasher.finalize()))
}
