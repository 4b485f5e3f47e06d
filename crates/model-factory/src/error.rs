// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for loading and saving models.

use std::path::PathBuf;

/// Errors that can occur while loading, locating or saving a model.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The bundle path does not exist.
    #[error("model file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The bundle could not be decoded, or holds an unsupported collection.
    #[error("invalid bundle: {0}")]
    Format(#[from] bundle_format::BundleError),

    /// The runtime's graph reader returned a non-ok status.
    #[error("runtime error: {0}")]
    Runtime(#[from] graph_runtime::Status),

    /// Reading the bundle or writing a temporary or saved file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The embedded metadata document is not valid JSON for the record.
    #[error("invalid model metadata: {0}")]
    Metadata(#[from] serde_json::Error),

    /// No lookup strategy found the named resource.
    #[error("resource not found: {name}")]
    ResourceNotFound { name: String },

    /// The handle was built without the original bundle bytes.
    #[error("no model bytes to save: the model was not loaded from a bundle")]
    MissingModelBytes,

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}
