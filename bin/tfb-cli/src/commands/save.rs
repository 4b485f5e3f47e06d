// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `tfb save` command: load a bundle, then write its original bytes back out.

use std::path::PathBuf;

use model_factory::{FactoryConfig, ModelFactory};

pub fn execute(config: FactoryConfig, model: PathBuf, output: PathBuf) -> anyhow::Result<()> {
    let factory = ModelFactory::new(config);
    let loaded = factory.load(&model).map_err(|e| {
        anyhow::anyhow!("failed to load model from '{}': {e}", model.display())
    })?;

    loaded.save_model(&output).map_err(|e| {
        anyhow::anyhow!("failed to save model to '{}': {e}", output.display())
    })?;

    let size = loaded.model_bytes().map_or(0, <[u8]>::len);
    println!(
        "  Saved {} → {} ({:.1} KB)",
        model.display(),
        output.display(),
        size as f64 / 1024.0,
    );
    Ok(())
}
