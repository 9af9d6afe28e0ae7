//! tkscene - builds game scene-node record trees from authored scene hierarchies

pub mod core;
pub mod scene;

pub use crate::core::{Error, Result};
pub use scene::{SceneGraph, SceneNode, SceneNodeData};
