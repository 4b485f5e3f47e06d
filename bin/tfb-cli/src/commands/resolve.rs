// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `tfb resolve` command: find a named model on the resource roots and load it.

use model_factory::{FactoryConfig, ModelFactory};

pub fn execute(config: FactoryConfig, name: String) -> anyhow::Result<()> {
    println!("╔══════════════════════════════════════════════════════╗");
    println!("║               tfb · Resource Resolver               ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();

    let factory = ModelFactory::new(config);
    let resource = ModelFactory::canonical_name(&name);

    println!("  Model name:     {name}");
    println!("  Resource:       {resource}");
    for dir in &factory.config().resource_dirs {
        println!("   root           {}", dir.display());
    }
    println!("   fallback       {}", factory.config().fallback_dir.display());
    println!();

    let loaded = factory
        .load_named(&name)
        .map_err(|e| anyhow::anyhow!("failed to load model '{name}': {e}"))?;

    super::inspect::print_model(&factory, &loaded)
}
