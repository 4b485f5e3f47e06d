// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # model-factory
//!
//! Turns TensorFlow `MetaGraphDef` bundles into model handles a host
//! application can drive.
//!
//! - [`ModelFactory`]: loads a bundle from a path or a named resource.
//! - [`TensorflowModel`]: the loaded model, holding the runtime graph, metadata record,
//!   attached session, hyperparameters and the original bytes for saving.
//! - [`MetaModel`]: the operation references (train, predict, init,
//!   save/restore, summaries) extracted from the bundle.
//! - [`FactoryConfig`]: resource roots, fallback directory, temp-file
//!   naming and session options, loadable from TOML.
//!
//! # Example
//! ```no_run
//! use model_factory::ModelFactory;
//! use std::{path::Path, sync::Arc};
//!
//! let factory = ModelFactory::default();
//! let mut model = factory.load(Path::new("./models/mlp.meta")).unwrap();
//! model.set_parameter("learning_rate", 0.01);
//! let session = factory.create_session(&model).unwrap();
//! model.set_session(Arc::new(session));
//! ```

mod config;
mod error;
mod factory;
mod metadata;
mod model;
mod resources;

pub use config::FactoryConfig;
pub use error::LoadError;
pub use factory::{ModelFactory, CANONICAL_SUFFIX};
pub use metadata::{
    MetaModel, INIT_COLLECTION, META_COLLECTION, PREDICTIONS_COLLECTION, SUMMARIES_COLLECTION,
    TRAINABLE_VARIABLES_COLLECTION, TRAIN_COLLECTION, VARIABLES_COLLECTION,
};
pub use model::TensorflowModel;
