//! Error types for the scene builder

use thiserror::Error;

use crate::scene::node::{CollisionKind, NodeType, SceneNodeId};

/// Main error type for the crate
#[derive(Debug, Error)]
pub enum Error {
    #[error("node '{node}' is missing required data key {key}")]
    MissingDataKey { node: String, key: &'static str },

    #[error("node '{node}' already has a parent")]
    AlreadyAttached { node: String },

    #[error("cannot attach '{child}' under '{parent}': it would create a cycle")]
    InvalidAttachment { parent: String, child: String },

    #[error("attribute data for {found} given to {expected} node '{node}'")]
    VariantMismatch {
        node: String,
        expected: NodeType,
        found: NodeType,
    },

    #[error("{found} collision data given to {expected} collision '{node}'")]
    ShapeMismatch {
        node: String,
        expected: CollisionKind,
        found: CollisionKind,
    },

    #[error("unknown scene node {0:?}")]
    UnknownNode(SceneNodeId),

    #[error("Config error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_message_names_node_and_key() {
        let err = Error::MissingDataKey {
            node: "Crate".into(),
            key: "WIDTH",
        };
        let msg = err.to_string();
        assert!(msg.contains("Crate"));
        assert!(msg.contains("WIDTH"));
    }

    #[test]
    fn test_variant_mismatch_message() {
        let err = Error::VariantMismatch {
            node: "Hinge".into(),
            expected: NodeType::Joint,
            found: NodeType::Mesh,
        };
        assert_eq!(
            err.to_string(),
            "attribute data for MESH given to JOINT node 'Hinge'"
        );
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
