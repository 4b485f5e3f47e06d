// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The metadata record attached to every loaded model.
//!
//! Bundles may embed a JSON document as the first entry of their `"meta"`
//! collection:
//!
//! ```json
//! {
//!   "save_filename": "save/Const:0",
//!   "save_op": "save/control_dependency:0",
//!   "restore_op": "save/restore_all",
//!   "summary_op": "Merge/MergeSummary:0",
//!   "predict_op": "predictions:0",
//!   "train_op": "train",
//!   "init": "init",
//!   "inputs": {"batch_image_input": "x:0"}
//! }
//! ```
//!
//! The seven keys above are the recognised schema; all are optional strings
//! defaulting to `""`, and `null` reads as `""`. Anything else is kept in
//! [`MetaModel::extra`].

use std::collections::BTreeMap;

use bundle_format::MetaGraphDef;

use crate::LoadError;

/// Collection whose first entry holds the JSON metadata document.
pub const META_COLLECTION: &str = "meta";
pub const SUMMARIES_COLLECTION: &str = "summaries";
pub const PREDICTIONS_COLLECTION: &str = "predictions";
pub const TRAIN_COLLECTION: &str = "train";
pub const INIT_COLLECTION: &str = "init";
pub const VARIABLES_COLLECTION: &str = "variables";
pub const TRAINABLE_VARIABLES_COLLECTION: &str = "trainable_variables";

/// Operation references the host needs to drive a loaded graph.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MetaModel {
    /// Tensor fed with the checkpoint path when saving or restoring.
    #[serde(deserialize_with = "null_as_empty")]
    pub save_filename: String,
    /// Tensor that writes a checkpoint.
    #[serde(deserialize_with = "null_as_empty")]
    pub save_op: String,
    /// Op that restores all variables from a checkpoint.
    #[serde(deserialize_with = "null_as_empty")]
    pub restore_op: String,
    /// Merged summary tensor.
    #[serde(deserialize_with = "null_as_empty")]
    pub summary_op: String,
    /// Prediction output tensor.
    #[serde(deserialize_with = "null_as_empty")]
    pub predict_op: String,
    /// Training step op.
    #[serde(deserialize_with = "null_as_empty")]
    pub train_op: String,
    /// Variable initialiser op.
    #[serde(deserialize_with = "null_as_empty")]
    pub init: String,
    /// Keys outside the recognised schema, kept verbatim.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = <Option<String> as serde::Deserialize>::deserialize(deserializer)?;
    if value.is_none() {
        tracing::debug!("metadata: null value read as empty string");
    }
    Ok(value.unwrap_or_default())
}

impl MetaModel {
    /// Parses a metadata record from its JSON document.
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let meta: Self = serde_json::from_str(json)?;
        if !meta.extra.is_empty() {
            tracing::debug!(
                "metadata: {} unrecognised key(s) kept: {:?}",
                meta.extra.len(),
                meta.extra.keys().collect::<Vec<_>>(),
            );
        }
        Ok(meta)
    }

    /// Builds the record for a decoded bundle.
    ///
    /// Steps:
    /// 1. Decode the first `"meta"` entry as JSON, or start from defaults.
    /// 2. Overwrite the save/restore fields from the saver descriptor.
    /// 3. Take the first entry of `"summaries"`, `"predictions"`, `"train"`
    ///    and `"init"` (or `""`).
    /// 4. Read `"variables"` and `"trainable_variables"` so that an
    ///    unsupported kind there still fails the load.
    pub fn from_bundle(bundle: &MetaGraphDef) -> Result<Self, LoadError> {
        let json = bundle.first_operation(META_COLLECTION)?;
        let mut meta = if json.is_empty() {
            Self::default()
        } else {
            Self::from_json(&json)?
        };

        let saver = &bundle.saver_def;
        meta.save_filename = saver.filename_tensor_name.clone();
        meta.save_op = saver.save_tensor_name.clone();
        meta.restore_op = saver.restore_op_name.clone();

        meta.summary_op = bundle.first_operation(SUMMARIES_COLLECTION)?;
        meta.predict_op = bundle.first_operation(PREDICTIONS_COLLECTION)?;
        meta.train_op = bundle.first_operation(TRAIN_COLLECTION)?;
        meta.init = bundle.first_operation(INIT_COLLECTION)?;

        // The variable lists are not part of the record.
        let variables = bundle.operations(VARIABLES_COLLECTION)?;
        let trainable = bundle.operations(TRAINABLE_VARIABLES_COLLECTION)?;
        tracing::debug!(
            "metadata: {} variables, {} trainable",
            variables.len(),
            trainable.len(),
        );

        Ok(meta)
    }

    /// Reads and parses a metadata record from any reader.
    pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Self, LoadError> {
        let meta: Self = serde_json::from_reader(reader)?;
        Ok(meta)
    }

    /// The recognised fields as `(key, value)` pairs, in schema order.
    pub fn fields(&self) -> [(&'static str, &str); 7] {
        [
            ("save_filename", self.save_filename.as_str()),
            ("save_op", self.save_op.as_str()),
            ("restore_op", self.restore_op.as_str()),
            ("summary_op", self.summary_op.as_str()),
            ("predict_op", self.predict_op.as_str()),
            ("train_op", self.train_op.as_str()),
            ("init", self.init.as_str()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bundle_format::{CollectionDef, CollectionKind, SaverDef};

    #[test]
    fn test_default_is_empty() {
        let meta = MetaModel::default();
        assert!(meta.fields().iter().all(|(_, v)| v.is_empty()));
        assert!(meta.extra.is_empty());
    }

    #[test]
    fn test_partial_document() {
        let meta = MetaModel::from_json(r#"{"train_op": "train", "init": "init_all"}"#).unwrap();
        assert_eq!(meta.train_op, "train");
        assert_eq!(meta.init, "init_all");
        assert_eq!(meta.predict_op, "");
    }

    #[test]
    fn test_unknown_keys_kept() {
        let meta = MetaModel::from_json(
            r#"{"predict_op": "out:0", "inputs": {"x": "x:0"}, "classes": 10}"#,
        )
        .unwrap();
        assert_eq!(meta.predict_op, "out:0");
        assert_eq!(meta.extra.len(), 2);
        assert_eq!(meta.extra["classes"], serde_json::json!(10));
        assert_eq!(meta.extra["inputs"]["x"], "x:0");
    }

    #[test]
    fn test_wrong_type_is_error() {
        let err = MetaModel::from_json(r#"{"train_op": 5}"#).unwrap_err();
        assert!(matches!(err, LoadError::Metadata(_)));
    }

    #[test]
    fn test_null_values_read_as_empty() {
        let meta =
            MetaModel::from_json(r#"{"summary_op": null, "train_op": "train", "init": null}"#)
                .unwrap();
        assert_eq!(meta.summary_op, "");
        assert_eq!(meta.train_op, "train");
        assert_eq!(meta.init, "");
        assert!(meta.extra.is_empty());
    }

    #[test]
    fn test_not_json_is_error() {
        assert!(MetaModel::from_json("train_op=train").is_err());
    }

    #[test]
    fn test_serialise_roundtrip_with_extra() {
        let mut meta = MetaModel {
            restore_op: "save/restore_all".into(),
            ..Default::default()
        };
        meta.extra.insert("frame_size".into(), serde_json::json!(784));
        let json = serde_json::to_string(&meta).unwrap();
        assert_eq!(MetaModel::from_json(&json).unwrap(), meta);
    }

    fn bundle_with_meta(json: Option<&str>) -> MetaGraphDef {
        let mut bundle = MetaGraphDef {
            saver_def: SaverDef {
                filename_tensor_name: "save/Const:0".into(),
                save_tensor_name: "save/control_dependency:0".into(),
                restore_op_name: "save/restore_all".into(),
                ..Default::default()
            },
            ..Default::default()
        };
        if let Some(json) = json {
            bundle
                .collection_def
                .insert(META_COLLECTION.into(), CollectionDef::bytes_list([json]));
        }
        bundle
    }

    #[test]
    fn test_from_bundle_without_meta() {
        let mut bundle = bundle_with_meta(None);
        bundle.saver_def = SaverDef::default();
        let meta = MetaModel::from_bundle(&bundle).unwrap();
        assert_eq!(meta, MetaModel::default());
    }

    #[test]
    fn test_from_bundle_empty_meta_collection() {
        let mut bundle = bundle_with_meta(None);
        bundle
            .collection_def
            .insert(META_COLLECTION.into(), CollectionDef::bytes_list(Vec::<Vec<u8>>::new()));
        let meta = MetaModel::from_bundle(&bundle).unwrap();
        assert_eq!(meta.predict_op, "");
        assert_eq!(meta.restore_op, "save/restore_all");
    }

    #[test]
    fn test_saver_overrides_json() {
        let bundle = bundle_with_meta(Some(
            r#"{"save_filename": "json", "save_op": "json", "restore_op": "json", "predict_op": "out:0"}"#,
        ));
        let meta = MetaModel::from_bundle(&bundle).unwrap();
        assert_eq!(meta.save_filename, "save/Const:0");
        assert_eq!(meta.save_op, "save/control_dependency:0");
        assert_eq!(meta.restore_op, "save/restore_all");
        // Not in any collection, so the collection lookup blanks it.
        assert_eq!(meta.predict_op, "");
    }

    #[test]
    fn test_collections_fill_ops() {
        let mut bundle = bundle_with_meta(Some(r#"{"classes": 10}"#));
        for (name, op) in [
            (SUMMARIES_COLLECTION, "Merge/MergeSummary:0"),
            (PREDICTIONS_COLLECTION, "softmax:0"),
            (TRAIN_COLLECTION, "Adam"),
            (INIT_COLLECTION, "init"),
        ] {
            bundle
                .collection_def
                .insert(name.into(), CollectionDef::node_list([op, "second"]));
        }
        let meta = MetaModel::from_bundle(&bundle).unwrap();
        assert_eq!(meta.summary_op, "Merge/MergeSummary:0");
        assert_eq!(meta.predict_op, "softmax:0");
        assert_eq!(meta.train_op, "Adam");
        assert_eq!(meta.init, "init");
        assert_eq!(meta.extra["classes"], serde_json::json!(10));
    }

    #[test]
    fn test_from_bundle_null_meta_values() {
        let mut bundle = bundle_with_meta(Some(r#"{"summary_op": null, "classes": 10}"#));
        bundle
            .collection_def
            .insert(SUMMARIES_COLLECTION.into(), CollectionDef::node_list(["Merge/MergeSummary:0"]));
        let meta = MetaModel::from_bundle(&bundle).unwrap();
        assert_eq!(meta.summary_op, "Merge/MergeSummary:0");
        assert_eq!(meta.restore_op, "save/restore_all");
        assert_eq!(meta.extra["classes"], serde_json::json!(10));
    }

    #[test]
    fn test_unsupported_variables_kind_fails() {
        let mut bundle = bundle_with_meta(None);
        bundle.collection_def.insert(
            VARIABLES_COLLECTION.into(),
            CollectionDef::with_kind(CollectionKind::Unknown(11)),
        );
        let err = MetaModel::from_bundle(&bundle).unwrap_err();
        assert!(matches!(err, LoadError::Format(_)));
    }

    #[test]
    fn test_invalid_meta_json_fails() {
        let bundle = bundle_with_meta(Some("{not json"));
        assert!(matches!(
            MetaModel::from_bundle(&bundle),
            Err(LoadError::Metadata(_))
        ));
    }

    #[test]
    fn test_from_reader() {
        let meta = MetaModel::from_reader(&br#"{"summary_op": "s:0"}"#[..]).unwrap();
        assert_eq!(meta.summary_op, "s:0");
    }
}
