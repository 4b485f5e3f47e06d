// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `tfb inspect` command: load a bundle and print what the loader extracted.
//!
//! Prints the metadata record, a graph summary, the bundle's collections and
//! signatures, and whether every referenced op resolves in a session.

use std::path::PathBuf;

use bundle_format::MetaGraphDef;
use model_factory::{FactoryConfig, ModelFactory, TensorflowModel};

pub fn execute(config: FactoryConfig, model: PathBuf) -> anyhow::Result<()> {
    println!("╔══════════════════════════════════════════════════════╗");
    println!("║               tfb · Bundle Inspector                ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();

    let factory = ModelFactory::new(config);
    let loaded = factory.load(&model).map_err(|e| {
        anyhow::anyhow!("failed to load model from '{}': {e}", model.display())
    })?;

    println!("  Bundle: {}", model.display());
    print_model(&factory, &loaded)
}

/// Prints the sections shared by `inspect` and `resolve`.
pub fn print_model(factory: &ModelFactory, model: &TensorflowModel) -> anyhow::Result<()> {
    // ── Metadata ───────────────────────────────────────────────
    println!("  Metadata");
    for (key, value) in model.meta.fields() {
        println!("   {:<16} {}", key, display_or_dash(value));
    }
    for (key, value) in &model.meta.extra {
        println!("   {:<16} {} (extra)", key, value);
    }
    println!();

    // ── Graph ──────────────────────────────────────────────────
    let graph = model.graph();
    println!("  Graph");
    println!("   Nodes:          {}", graph.num_nodes());
    println!("   Op types:       {}", graph.op_types().join(", "));
    if let Some(producer) = graph.producer() {
        println!("   Producer:       {producer}");
    }
    println!();

    // ── Collections ────────────────────────────────────────────
    // Handles built from a bundle keep its bytes; re-decode for the
    // sections the metadata record does not carry.
    if let Some(bytes) = model.model_bytes() {
        if let Ok(bundle) = MetaGraphDef::decode(bytes) {
            print_bundle_sections(&bundle);
        }
    }

    // ── Op Resolution ──────────────────────────────────────────
    let session = factory.create_session(model)?;
    println!("  Op resolution");
    for (key, value) in model.meta.fields() {
        if value.is_empty() {
            continue;
        }
        let status = match session.resolve(value) {
            Ok(node) => format!("ok ({})", node.op),
            Err(e) => format!("MISSING: {e}"),
        };
        println!("   {:<16} {:<32} {}", key, truncate(value, 32), status);
    }
    println!();
    Ok(())
}

fn print_bundle_sections(bundle: &MetaGraphDef) {
    let info = &bundle.meta_info_def;
    if !info.tags.is_empty() || !info.tensorflow_version.is_empty() {
        println!("  Meta info");
        if !info.tags.is_empty() {
            println!("   Tags:           {}", info.tags.join(", "));
        }
        if !info.tensorflow_version.is_empty() {
            println!("   TensorFlow:     {}", info.tensorflow_version);
        }
        println!("   Stripped ops:   {}", info.stripped_ops.len());
        println!();
    }

    println!("  {:<28} {:<12} {:>8}", "Collection", "Kind", "Entries");
    println!("  {}", "-".repeat(50));
    for (name, collection) in &bundle.collection_def {
        println!(
            "  {:<28} {:<12} {:>8}",
            truncate(name, 28),
            collection.kind.as_str(),
            collection.kind.len(),
        );
    }
    println!();

    for (name, signature) in &bundle.signature_def {
        println!("  Signature '{name}' ({})", display_or_dash(&signature.method_name));
        for (key, tensor) in &signature.inputs {
            println!("   in  {key:<16} {tensor}");
        }
        for (key, tensor) in &signature.outputs {
            println!("   out {key:<16} {tensor}");
        }
        println!();
    }
}

fn display_or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}

/// Truncates a string to `max_len` characters with ellipsis if needed.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{head}...")
    }
}
