use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackConfig {
    /// Directory packages are written into
    pub output_dir: PathBuf,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
        }
    }
}

impl PackConfig {
    /// Load `catpack.toml` from the working directory, falling back to
    /// defaults when the file is absent or unparseable.
    pub fn load() -> Self {
        let config_path = "catpack.toml";
        if let Ok(content) = fs::read_to_string(config_path) {
            match toml::from_str(&content) {
                Ok(config) => return config,
                Err(e) => eprintln!(
                    "Warning: Failed to parse catpack.toml: {}. Using defaults.",
                    e
                ),
            }
        }
        Self::default()
    }

    pub fn with_output_dir(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }
}
