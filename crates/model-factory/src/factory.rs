// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Loading bundles into [`TensorflowModel`] handles.
//!
//! ```text
//! path ──► exists? ──► read bytes ──► MetaGraphDef::decode
//!                                          │
//!                  ┌───────────────────────┴──────────────────┐
//!                  ▼                                          ▼
//!      MetaModel::from_bundle                   graph bytes ──► temp file
//!      (meta JSON, saver, collections)                         │
//!                  │                             GraphReader::read_binary_proto
//!                  └──────────────► TensorflowModel ◄──────────┘
//!                                   (+ original bytes)
//! ```

use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use bundle_format::MetaGraphDef;
use graph_runtime::{BinaryProtoReader, Graph, GraphReader, Session};
use tempfile::TempPath;

use crate::resources::{self, ResourceSource};
use crate::{FactoryConfig, LoadError, MetaModel, TensorflowModel};

/// Suffix appended by [`ModelFactory::canonical_name`].
pub const CANONICAL_SUFFIX: &str = ".meta";

/// Loads models from bundle files and named resources.
///
/// # Example
/// ```no_run
/// use model_factory::{FactoryConfig, ModelFactory};
/// use std::path::Path;
///
/// let factory = ModelFactory::new(FactoryConfig::default());
/// let model = factory.load(Path::new("./models/mlp.meta")).unwrap();
/// println!("train op: {}", model.meta.train_op);
/// ```
pub struct ModelFactory {
    config: FactoryConfig,
    reader: Box<dyn GraphReader>,
    /// Resources compiled into the host binary, keyed by resource name.
    embedded: HashMap<String, &'static [u8]>,
}

impl ModelFactory {
    /// Creates a factory that reads graphs with [`BinaryProtoReader`].
    pub fn new(config: FactoryConfig) -> Self {
        Self::with_reader(config, BinaryProtoReader)
    }

    /// Creates a factory with a custom graph reader.
    pub fn with_reader(config: FactoryConfig, reader: impl GraphReader + 'static) -> Self {
        Self {
            config,
            reader: Box::new(reader),
            embedded: HashMap::new(),
        }
    }

    pub fn config(&self) -> &FactoryConfig {
        &self.config
    }

    /// Registers resource bytes (typically from `include_bytes!`) consulted
    /// by [`find_resource`](Self::find_resource) after the resource roots.
    pub fn register_embedded(&mut self, name: impl Into<String>, bytes: &'static [u8]) {
        self.embedded.insert(name.into(), bytes);
    }

    /// Derives the bundle file name for a logical model name:
    /// lower-cased, with `.meta` appended. An existing suffix is not
    /// collapsed, so `"a.meta"` becomes `"a.meta.meta"`.
    pub fn canonical_name(model_name: &str) -> String {
        format!("{}{CANONICAL_SUFFIX}", model_name.to_lowercase())
    }

    /// Loads a bundle from disk.
    ///
    /// Steps:
    /// 1. Check the file exists.
    /// 2. Read it whole; the bytes are kept for [`TensorflowModel::save_model`].
    /// 3. Decode the `MetaGraphDef`.
    /// 4. Build the [`MetaModel`] from the metadata JSON, saver descriptor
    ///    and collections.
    /// 5. Hand the graph to the runtime reader through a temporary file.
    pub fn load(&self, path: &Path) -> Result<TensorflowModel, LoadError> {
        // 1. Existence check.
        if !path.exists() {
            return Err(LoadError::NotFound(path.to_path_buf()));
        }

        // 2. Raw bytes.
        let data = std::fs::read(path)?;

        // 3. Decode.
        let bundle = MetaGraphDef::decode(&data)?;
        log_bundle(&bundle);

        // 4. Metadata record.
        let meta = MetaModel::from_bundle(&bundle)?;

        // 5. Runtime graph.
        let graph = self.read_graph(&bundle.graph_def)?;

        tracing::info!(
            "loaded {} ({} bytes): {}, train='{}', predict='{}'",
            path.display(),
            data.len(),
            graph,
            meta.train_op,
            meta.predict_op,
        );
        Ok(TensorflowModel::new(meta, graph).with_model_bytes(data))
    }

    /// Like [`load`](Self::load), but logs the error and returns `None`.
    pub fn load_or_none(&self, path: &Path) -> Option<TensorflowModel> {
        self.load(path)
            .map_err(|e| tracing::error!("failed to load model from '{}': {e}", path.display()))
            .ok()
    }

    /// Locates a resource and copies it into a temporary file.
    ///
    /// The file is deleted when the returned [`TempPath`] is dropped.
    pub fn find_resource(&self, resource_name: &str) -> Result<TempPath, LoadError> {
        let (path, source) = resources::locate(&self.config, &self.embedded, resource_name)?;
        tracing::debug!(
            "resource '{resource_name}' ({}) staged at {}",
            match source {
                ResourceSource::ResourceDir => "resource root",
                ResourceSource::Embedded => "embedded",
                ResourceSource::Fallback => "fallback",
            },
            path.display(),
        );
        Ok(path)
    }

    /// Loads the bundle for a logical model name, e.g. `"MLP"` → `mlp.meta`.
    pub fn load_named(&self, model_name: &str) -> Result<TensorflowModel, LoadError> {
        let path = self.find_resource(&Self::canonical_name(model_name))?;
        self.load(&path)
    }

    /// Builds a model from a standalone binary `GraphDef` resource and a
    /// standalone JSON metadata resource.
    ///
    /// The handle keeps the graph bytes, so `save_model` writes the graph
    /// file back rather than a bundle.
    pub fn load_from_resources(
        &self,
        meta_resource: &str,
        graph_resource: &str,
    ) -> Result<TensorflowModel, LoadError> {
        let graph_path = self.find_resource(graph_resource)?;
        let graph_bytes = std::fs::read(&graph_path)?;
        let graph = self.reader.read_binary_proto(&graph_path)?;

        let meta_path = self.find_resource(meta_resource)?;
        let meta = MetaModel::from_reader(File::open(&meta_path)?)?;

        tracing::info!(
            "loaded graph resource '{graph_resource}' with metadata '{meta_resource}': {graph}"
        );
        Ok(TensorflowModel::new(meta, graph).with_model_bytes(graph_bytes))
    }

    /// Builds a session over `model`'s graph with the configured options.
    pub fn create_session(&self, model: &TensorflowModel) -> Result<Session, LoadError> {
        Ok(model.create_session(self.config.session.clone())?)
    }

    /// Writes the encoded graph to a temporary file and passes its path to
    /// the runtime reader. The file is removed once the reader returns.
    fn read_graph(&self, graph_bytes: &[u8]) -> Result<Graph, LoadError> {
        let mut file = resources::temp_file(&self.config)?;
        file.write_all(graph_bytes)?;
        file.flush()?;
        let graph = self.reader.read_binary_proto(file.path())?;
        Ok(graph)
    }
}

impl Default for ModelFactory {
    fn default() -> Self {
        Self::new(FactoryConfig::default())
    }
}

impl std::fmt::Debug for ModelFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelFactory")
            .field("config", &self.config)
            .field("embedded", &self.embedded.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

fn log_bundle(bundle: &MetaGraphDef) {
    let info = &bundle.meta_info_def;
    if !info.tags.is_empty() {
        tracing::debug!("bundle tags: {:?}", info.tags);
    }
    if !info.tensorflow_version.is_empty() {
        tracing::debug!("bundle written by TensorFlow {}", info.tensorflow_version);
    }
    for op in &info.stripped_ops {
        tracing::trace!("stripped op: {op}");
    }
    for (name, collection) in &bundle.collection_def {
        tracing::debug!(
            "collection '{name}': {} ({} entries)",
            collection.kind.as_str(),
            collection.kind.len(),
        );
    }
    for (name, signature) in &bundle.signature_def {
        tracing::debug!(
            "signature '{name}': inputs {:?}, outputs {:?}",
            signature.inputs.keys().collect::<Vec<_>>(),
            signature.outputs.keys().collect::<Vec<_>>(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_name() {
        assert_eq!(ModelFactory::canonical_name("MyModel"), "mymodel.meta");
        assert_eq!(ModelFactory::canonical_name("already.meta"), "already.meta.meta");
        assert_eq!(ModelFactory::canonical_name(""), ".meta");
        assert_eq!(ModelFactory::canonical_name("LeNET-5"), "lenet-5.meta");
    }

    #[test]
    fn test_load_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.meta");
        let err = ModelFactory::default().load(&path).unwrap_err();
        assert!(matches!(err, LoadError::NotFound(ref p) if *p == path));
    }

    #[test]
    fn test_load_or_none_swallows() {
        let dir = tempfile::tempdir().unwrap();
        let factory = ModelFactory::default();
        assert!(factory.load_or_none(&dir.path().join("missing.meta")).is_none());
    }

    #[test]
    fn test_debug_lists_embedded_names() {
        let mut factory = ModelFactory::default();
        factory.register_embedded("mlp.meta", b"\x12\x00");
        let dbg = format!("{factory:?}");
        assert!(dbg.contains("mlp.meta"));
    }
}
