// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The model handle returned by the factory.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use graph_runtime::{Graph, Session, SessionOptions, Status};

use crate::{LoadError, MetaModel};

/// A loaded model: the runtime graph, its metadata record, and the state a
/// host attaches to it afterwards.
///
/// The graph and metadata are fixed at construction. Parameters can be set
/// at any time, but a session that already exists was built with whatever
/// values were present when it was created.
#[derive(Debug)]
pub struct TensorflowModel {
    graph: Arc<Graph>,
    /// Operation references extracted from the bundle.
    pub meta: MetaModel,
    /// Number of output classes.
    pub classes: usize,
    /// Size of one input frame.
    pub frame_size: usize,
    session: Option<Arc<Session>>,
    parameters: HashMap<String, f32>,
    /// Original bundle bytes, written back by [`save_model`](Self::save_model).
    model_bytes: Option<Vec<u8>>,
}

impl TensorflowModel {
    /// Creates a handle with no original bundle bytes; such a handle cannot
    /// be saved.
    pub fn new(meta: MetaModel, graph: Graph) -> Self {
        Self {
            graph: Arc::new(graph),
            meta,
            classes: 0,
            frame_size: 0,
            session: None,
            parameters: HashMap::new(),
            model_bytes: None,
        }
    }

    /// Attaches the bytes `save_model` writes back.
    pub fn with_model_bytes(mut self, bytes: Vec<u8>) -> Self {
        self.model_bytes = Some(bytes);
        self
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Shared handle to the graph, for building a [`Session`].
    pub fn graph_arc(&self) -> Arc<Graph> {
        Arc::clone(&self.graph)
    }

    pub fn meta(&self) -> &MetaModel {
        &self.meta
    }

    /// Builds a session over this model's graph. The session is not attached;
    /// pass it to [`set_session`](Self::set_session).
    pub fn create_session(&self, options: SessionOptions) -> Result<Session, Status> {
        Session::new(self.graph_arc(), options)
    }

    pub fn set_session(&mut self, session: Arc<Session>) {
        self.session = Some(session);
    }

    pub fn session(&self) -> Option<&Arc<Session>> {
        self.session.as_ref()
    }

    /// Sets a scalar hyperparameter, replacing any previous value.
    pub fn set_parameter(&mut self, name: impl Into<String>, value: f32) {
        let name = name.into();
        if self.session.is_some() {
            tracing::warn!(
                "parameter '{name}' set after a session was attached; the session is unaffected"
            );
        }
        self.parameters.insert(name, value);
    }

    pub fn parameter(&self, name: &str) -> Option<f32> {
        self.parameters.get(name).copied()
    }

    pub fn parameters(&self) -> &HashMap<String, f32> {
        &self.parameters
    }

    pub fn model_bytes(&self) -> Option<&[u8]> {
        self.model_bytes.as_deref()
    }

    /// Writes the original bundle bytes to `path`, replacing any existing file.
    pub fn save_model(&self, path: &Path) -> Result<(), LoadError> {
        let bytes = self
            .model_bytes
            .as_deref()
            .ok_or(LoadError::MissingModelBytes)?;
        std::fs::write(path, bytes)?;
        tracing::info!("saved model ({} bytes) to {}", bytes.len(), path.display());
        Ok(())
    }
}
