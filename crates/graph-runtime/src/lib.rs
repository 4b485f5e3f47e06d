// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # graph-runtime
//!
//! The boundary between the model loader and the numerical runtime.
//!
//! - [`GraphReader`]: path in, [`Graph`] or [`Status`] out. The loader
//!   depends only on this trait; [`BinaryProtoReader`] is the default.
//! - [`Graph`]: an imported graph with unique node names and resolved
//!   inputs.
//! - [`Session`] / [`SessionOptions`]: a graph pinned for execution.
//! - [`Status`] / [`Code`]: the runtime's failure report.
//!
//! # Example
//! ```no_run
//! use graph_runtime::{BinaryProtoReader, GraphReader, Session, SessionOptions};
//! use std::{path::Path, sync::Arc};
//!
//! let graph = BinaryProtoReader.read_binary_proto(Path::new("graph.pb")).unwrap();
//! let session = Session::new(Arc::new(graph), SessionOptions::default()).unwrap();
//! println!("{}", session.graph());
//! ```

mod graph;
mod reader;
mod session;
mod status;

pub use graph::{node_name, Graph};
pub use reader::{BinaryProtoReader, GraphReader};
pub use session::{Session, SessionOptions};
pub use status::{Code, Status};
