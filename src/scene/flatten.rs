//! Output records produced by flattening the scene graph.
//!
//! `SceneNodeData` is the result of building a node: its name, type, transform and
//! attributes, plus the already-built records of its children. The field names
//! match the scene description schema the engine reads.
//!
//! Child records are shared with the nodes that built them, so a parent holds the
//! same allocation its child stores rather than a copy of it.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::Result;

use super::attributes::{Attribute, AttributeValue};
use super::node::{NodeType, Transform};

/// One immutable scene-node record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SceneNodeData {
    name: String,
    #[serde(rename = "Type")]
    node_type: NodeType,
    transform: Transform,
    attributes: Option<Vec<Attribute>>,
    /// `None` for leaves, never an empty list.
    children: Option<Vec<Arc<SceneNodeData>>>,
}

impl SceneNodeData {
    pub(crate) fn new(
        name: String,
        node_type: NodeType,
        transform: Transform,
        attributes: Option<Vec<Attribute>>,
        children: Option<Vec<Arc<SceneNodeData>>>,
    ) -> Self {
        Self {
            name,
            node_type,
            transform,
            attributes,
            children,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn node_type(&self) -> NodeType {
        self.node_type
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn attributes(&self) -> Option<&[Attribute]> {
        self.attributes.as_deref()
    }

    pub fn children(&self) -> Option<&[Arc<SceneNodeData>]> {
        self.children.as_deref()
    }

    /// Value of the first attribute called `name`.
    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes
            .as_ref()?
            .iter()
            .find(|a| a.name == name)
            .map(|a| &a.value)
    }

    /// Depth-first (pre-order) walk over this record and all nested records.
    pub fn iter(&self) -> Iter<'_> {
        Iter { stack: vec![self] }
    }

    /// Number of records in this tree, including this one.
    pub fn node_count(&self) -> usize {
        self.iter().count()
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Pre-order iterator over a record tree.
pub struct Iter<'a> {
    stack: Vec<&'a SceneNodeData>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a SceneNodeData;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.stack.pop()?;
        if let Some(children) = &record.children {
            self.stack.extend(children.iter().rev().map(Arc::as_ref));
        }
        Some(record)
    }
}

// Unlinks nested records one at a time so deep chains don't drop recursively.
impl Drop for SceneNodeData {
    fn drop(&mut self) {
        let mut pending = self.children.take().unwrap_or_default();
        while let Some(child) = pending.pop() {
            if let Some(mut record) = Arc::into_inner(child) {
                pending.extend(record.children.take().unwrap_or_default());
            }
        }
    }
}
