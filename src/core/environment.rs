use crate::core::metadata::RuntimeInfo;
use chrono::{DateTime, Local};
use std::env;
use std::fs;

/// Queries about the environment a package is generated in. The packager
/// records these facts in the metadata; tests substitute a fixed
/// implementation so packaging runs are fully deterministic.
pub trait Environment {
    /// Current wall-clock time
    fn now(&self) -> DateTime<Local>;

    /// Name of the generating host
    fn hostname(&self) -> String;

    /// Runtime descriptor of the generating process
    fn runtime(&self) -> RuntimeInfo;
}

/// The real host the packager runs on.
pub struct SystemEnvironment;

impl Environment for SystemEnvironment {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }

    fn hostname(&self) -> String {
        if let Ok(host) = env::var("HOSTNAME") {
            let host = host.trim();
            if !host.is_empty() {
                return host.to_string();
            }
        }
        fs::read_to_string("/etc/hostname")
            .ok()
            .map(|h| h.trim().to_string())
            .filter(|h| !h.is_empty())
            .unwrap_or_else(|| "unknown".to_string())
    }

    fn runtime(&self) -> RuntimeInfo {
        RuntimeInfo {
            package_version: env!("CARGO_PKG_VERSION").to_string(),
            os: env::consts::OS.to_string(),
            arch: env::consts::ARCH.to_string(),
        }
    }
}
