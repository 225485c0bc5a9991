// src/lib.rs

pub mod core;

// Re-exports para exponer una API limpia desde fuera del crate
pub use crate::core::config::PackConfig;
pub use crate::core::csv::{import_table, ImportError};
pub use crate::core::environment::{Environment, SystemEnvironment};
pub use crate::core::metadata::{CatalogueMetadata, RuntimeInfo, Version};
pub use crate::core::package::{
    package_filename, CataloguePackage, PackageError, ShapeFailure, PACKAGE_EXT,
};
pub use crate::core::packager::{PackageRequest, Packager};
pub use crate::core::sentinel::{GuardedField, GuardedValues, SentinelPolicy};
pub use crate::core::storage::{read_package, write_package, StorageError};
pub use crate::core::table::{Column, Table, TableError};
pub use crate::core::value::{Value, ValueType};
