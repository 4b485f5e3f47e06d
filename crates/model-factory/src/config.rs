// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Factory configuration loaded from TOML files or constructed programmatically.
//!
//! # TOML Format
//! ```toml
//! resource_dirs = ["./resources", "/opt/models"]
//! fallback_dir = "./tensorflow/src/main/resources"
//! temp_prefix = "tempfile"
//! temp_suffix = ".tmp"
//!
//! [session]
//! intra_op_threads = 4
//! ```

use graph_runtime::SessionOptions;
use std::path::{Path, PathBuf};

use crate::LoadError;

/// Configuration for a [`ModelFactory`](crate::ModelFactory).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FactoryConfig {
    /// Resource roots searched first, in order, by `find_resource`.
    #[serde(default = "default_resource_dirs")]
    pub resource_dirs: Vec<PathBuf>,
    /// Fixed directory tried last by `find_resource`.
    #[serde(default = "default_fallback_dir")]
    pub fallback_dir: PathBuf,
    /// Prefix of temporary files created while loading.
    #[serde(default = "default_temp_prefix")]
    pub temp_prefix: String,
    /// Suffix of temporary files created while loading.
    #[serde(default = "default_temp_suffix")]
    pub temp_suffix: String,
    /// Options for sessions created through the factory.
    #[serde(default)]
    pub session: SessionOptions,
}

fn default_resource_dirs() -> Vec<PathBuf> {
    vec![PathBuf::from("resources")]
}

fn default_fallback_dir() -> PathBuf {
    PathBuf::from("tensorflow/src/main/resources")
}

fn default_temp_prefix() -> String {
    "tempfile".to_string()
}

fn default_temp_suffix() -> String {
    ".tmp".to_string()
}

impl FactoryConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            LoadError::Config(format!("cannot read config '{}': {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, LoadError> {
        let config: Self = toml::from_str(toml_str)
            .map_err(|e| LoadError::Config(format!("TOML parse error: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialises configuration to TOML.
    pub fn to_toml(&self) -> Result<String, LoadError> {
        toml::to_string_pretty(self)
            .map_err(|e| LoadError::Config(format!("TOML serialise error: {e}")))
    }

    /// Rejects temp-file affixes that would place files outside the temp dir.
    pub fn validate(&self) -> Result<(), LoadError> {
        for (key, value) in [("temp_prefix", &self.temp_prefix), ("temp_suffix", &self.temp_suffix)] {
            if value.contains(['/', '\\']) {
                return Err(LoadError::Config(format!(
                    "{key} must not contain path separators, got '{value}'"
                )));
            }
        }
        Ok(())
    }
}

impl Default for FactoryConfig {
    fn default() -> Self {
        Self {
            resource_dirs: default_resource_dirs(),
            fallback_dir: default_fallback_dir(),
            temp_prefix: default_temp_prefix(),
            temp_suffix: default_temp_suffix(),
            session: SessionOptions::default(),
        }
    }
}
