// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # tfb
//!
//! Command-line interface for the bundle loader.
//!
//! ## Usage
//! ```bash
//! # Load a bundle and print its metadata, graph and collections
//! tfb inspect --model ./models/mlp.meta
//!
//! # Load a bundle and write its original bytes back out
//! tfb save --model ./models/mlp.meta --output ./backup/mlp.meta
//!
//! # Locate a named model on the resource roots and inspect it
//! tfb resolve --name MLP --config ./tfb.toml
//!
//! # Print the bundle file name for a model name
//! tfb canonical LeNet
//! ```

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use model_factory::FactoryConfig;

#[derive(Parser)]
#[command(
    name = "tfb",
    about = "Load and inspect TensorFlow MetaGraphDef bundles",
    version,
    author
)]
struct Cli {
    /// Path to a TOML factory configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging (repeat for more: -v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a bundle and print its metadata, graph summary and collections.
    Inspect {
        /// Path to the `.meta` bundle.
        #[arg(short, long)]
        model: PathBuf,
    },

    /// Load a bundle and save its original bytes to another path.
    Save {
        /// Path to the `.meta` bundle.
        #[arg(short, long)]
        model: PathBuf,

        /// Destination file; replaced if it exists.
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Load a model by logical name from the configured resource roots.
    Resolve {
        /// Logical model name, e.g. "MLP".
        #[arg(short, long)]
        name: String,
    },

    /// Print the bundle file name derived from a model name.
    Canonical {
        /// Logical model name.
        name: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    commands::init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => FactoryConfig::from_file(path)?,
        None => FactoryConfig::default(),
    };
    tracing::debug!("factory config: {config:?}");

    match cli.command {
        Commands::Inspect { model } => commands::inspect::execute(config, model),
        Commands::Save { model, output } => commands::save::execute(config, model, output),
        Commands::Resolve { name } => commands::resolve::execute(config, name),
        Commands::Canonical { name } => {
            println!("{}", model_factory::ModelFactory::canonical_name(&name));
            Ok(())
        }
    }
}
