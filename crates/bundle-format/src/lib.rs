// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # bundle-format
//!
//! A reader (and writer) for TensorFlow `MetaGraphDef`
//! bundles, the `*.meta` files written by `tf.train.export_meta_graph`.
//!
//! - [`MetaGraphDef`]: the top-level message: graph, saver descriptor,
//!   collections and signatures.
//! - [`CollectionDef`] / [`CollectionKind`]: named groups of node
//!   references or values, and the rules for reading them as strings
//!   ([`MetaGraphDef::operations`]).
//! - [`GraphDef`] / [`NodeDef`]: the computation graph itself.
//! - [`wire`]: the protobuf wire primitives everything above is built on.
//!
//! Only the fields a model loader needs are decoded; everything else is
//! skipped by wire type.
//!
//! # Example
//! ```no_run
//! use bundle_format::MetaGraphDef;
//!
//! let bytes = std::fs::read("mnist.meta").unwrap();
//! let meta = MetaGraphDef::decode(&bytes).unwrap();
//! println!("train op: {}", meta.first_operation("train").unwrap());
//! ```

mod collection;
mod error;
mod graph_def;
mod meta_graph;
pub mod wire;

pub use collection::{AnyValue, CollectionDef, CollectionKind};
pub use error::BundleError;
pub use graph_def::{GraphDef, NodeDef, VersionDef};
pub use meta_graph::{MetaGraphDef, MetaInfoDef, SaverDef, SignatureDef};
