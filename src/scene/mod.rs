//! Scene node tree building for export

pub mod attributes;
pub mod config;
pub mod flatten;
pub mod graph;
pub mod lookups;
pub mod node;

pub use attributes::{Attribute, AttributeData, AttributeInput, AttributeValue};
pub use config::BuilderConfig;
pub use flatten::SceneNodeData;
pub use graph::SceneGraph;
pub use node::{
    CollisionKind, CollisionShape, Material, MeshStreams, NodeContent, NodeType, SceneNode,
    SceneNodeId, Stream, Transform,
};
