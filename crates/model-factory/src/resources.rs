// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Resource lookup and temporary-file staging.
//!
//! A resource is located by trying, in order:
//!
//! 1. each configured resource root (`resource_dirs`),
//! 2. the embedded resources registered on the factory,
//! 3. the fixed fallback directory (`fallback_dir`).
//!
//! An empty payload counts as a miss. The first hit is copied into a fresh
//! temporary file so the runtime always reads from a real path.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

use tempfile::{NamedTempFile, TempPath};

use crate::{FactoryConfig, LoadError};

/// Which lookup strategy produced a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ResourceSource {
    ResourceDir,
    Embedded,
    Fallback,
}

/// Creates an empty temporary file named with the configured affixes.
pub(crate) fn temp_file(config: &FactoryConfig) -> Result<NamedTempFile, LoadError> {
    let file = tempfile::Builder::new()
        .prefix(&config.temp_prefix)
        .suffix(&config.temp_suffix)
        .tempfile()?;
    Ok(file)
}

/// Streams `reader` into a new temporary file and returns its path. The
/// file is removed when the returned [`TempPath`] is dropped.
pub(crate) fn stage<R: Read>(config: &FactoryConfig, mut reader: R) -> Result<TempPath, LoadError> {
    let mut file = temp_file(config)?;
    io::copy(&mut reader, &mut file)?;
    file.flush()?;
    Ok(file.into_temp_path())
}

/// Locates `name` and stages it into a temporary file.
pub(crate) fn locate(
    config: &FactoryConfig,
    embedded: &HashMap<String, &'static [u8]>,
    name: &str,
) -> Result<(TempPath, ResourceSource), LoadError> {
    for dir in &config.resource_dirs {
        let candidate = dir.join(name);
        if !candidate.is_file() {
            continue;
        }
        let bytes = std::fs::read(&candidate)?;
        if bytes.is_empty() {
            tracing::warn!("resource '{}' is empty, skipping", candidate.display());
            continue;
        }
        let path = stage(config, bytes.as_slice())?;
        return Ok((path, ResourceSource::ResourceDir));
    }

    if let Some(bytes) = embedded.get(name).filter(|b| !b.is_empty()) {
        tracing::debug!("resource '{name}' served from embedded data");
        let path = stage(config, *bytes)?;
        return Ok((path, ResourceSource::Embedded));
    }

    let fallback = config.fallback_dir.join(name);
    match open_non_empty(&fallback)? {
        Some(file) => {
            tracing::warn!(
                "resource '{name}' not on any resource root, using fallback {}",
                fallback.display(),
            );
            let path = stage(config, file)?;
            Ok((path, ResourceSource::Fallback))
        }
        None => Err(LoadError::ResourceNotFound {
            name: name.to_string(),
        }),
    }
}

fn open_non_empty(path: &Path) -> Result<Option<File>, LoadError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    if file.metadata()?.len() == 0 {
        return Ok(None);
    }
    Ok(Some(file))
}
