//! Scene graph: owns the exported hierarchy and builds its records.
//!
//! Nodes are inserted standalone and linked with `attach_child`. Linking a
//! mesh-bearing node sends a registration up the parent chain to the current root,
//! so a Model root always knows every mesh beneath it without rescanning. `build()`
//! walks the tree child-first and produces a nested `SceneNodeData` record.

use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, trace};

use crate::core::{Error, Result};

use super::attributes::{self, AttributeData, AttributeInput, MissingKey};
use super::config::BuilderConfig;
use super::flatten::SceneNodeData;
use super::node::{Material, NodeContent, SceneNode, SceneNodeId, Transform};

/// Arena-backed scene hierarchy. Parents own children; parent links are ids.
pub struct SceneGraph {
    nodes: HashMap<SceneNodeId, SceneNode>,
    next_id: u64,
    config: BuilderConfig,
}

impl SceneGraph {
    /// Create an empty graph with default settings.
    pub fn new() -> Self {
        Self::with_config(BuilderConfig::default())
    }

    pub fn with_config(config: BuilderConfig) -> Self {
        Self {
            nodes: HashMap::new(),
            next_id: 0,
            config,
        }
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// Allocate a fresh node ID.
    fn alloc_id(&mut self) -> SceneNodeId {
        let id = SceneNodeId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Take ownership of a standalone node. Returns its ID.
    pub fn insert(&mut self, node: SceneNode) -> SceneNodeId {
        let id = self.alloc_id();
        trace!("insert {} '{}' as {:?}", node.node_type(), node.name, id);
        self.nodes.insert(id, node);
        id
    }

    fn node(&self, id: SceneNodeId) -> Result<&SceneNode> {
        self.nodes.get(&id).ok_or(Error::UnknownNode(id))
    }

    fn node_mut(&mut self, id: SceneNodeId) -> Result<&mut SceneNode> {
        self.nodes.get_mut(&id).ok_or(Error::UnknownNode(id))
    }

    /// Get an immutable reference to a node.
    pub fn get(&self, id: SceneNodeId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    /// Total number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Iterate over the children of a node.
    pub fn children(&self, id: SceneNodeId) -> impl Iterator<Item = SceneNodeId> + '_ {
        self.nodes
            .get(&id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
            .iter()
            .copied()
    }

    pub fn parent(&self, id: SceneNodeId) -> Option<SceneNodeId> {
        self.nodes.get(&id)?.parent
    }

    /// Follow parent links up to the parentless node at the top.
    pub fn root_of(&self, id: SceneNodeId) -> Result<SceneNodeId> {
        let mut current = id;
        while let Some(parent) = self.node(current)?.parent {
            current = parent;
        }
        Ok(current)
    }

    /// Set the local transform of a node.
    pub fn set_transform(&mut self, id: SceneNodeId, transform: Transform) -> Result<()> {
        self.node_mut(id)?.transform = transform;
        Ok(())
    }

    /// Material of a mesh node, falling back to the configured default.
    pub fn material(&self, id: SceneNodeId) -> Result<Option<Material>> {
        Ok(match &self.node(id)?.content {
            NodeContent::Mesh { material, .. } => Some(
                material
                    .clone()
                    .unwrap_or_else(|| Material::new(self.config.default_material.clone())),
            ),
            _ => None,
        })
    }

    /// Make `child` the last child of `parent`.
    ///
    /// The child must be parentless and must not be an ancestor of `parent`. If the
    /// child is mesh-bearing it is registered on the root above `parent`, followed by
    /// any meshes the child had collected while it was a root of its own.
    pub fn attach_child(&mut self, parent: SceneNodeId, child: SceneNodeId) -> Result<()> {
        let child_node = self.node(child)?;
        let parent_name = self.node(parent)?.name.clone();

        if child_node.parent.is_some() {
            return Err(Error::AlreadyAttached {
                node: child_node.name.clone(),
            });
        }
        if self.root_of(parent)? == child {
            return Err(Error::InvalidAttachment {
                parent: parent_name,
                child: child_node.name.clone(),
            });
        }

        let child_node = self.node_mut(child)?;
        child_node.parent = Some(parent);
        let mut pending = Vec::with_capacity(child_node.mesh_registry.len() + 1);
        if child_node.is_mesh() {
            pending.push(child);
        }
        pending.append(&mut child_node.mesh_registry);
        debug!("attach '{}' under '{}'", child_node.name, parent_name);

        self.node_mut(parent)?.children.push(child);

        for mesh in pending {
            self.register_mesh(parent, mesh)?;
        }
        Ok(())
    }

    /// Pass a mesh registration up from `from` until it reaches the root.
    fn register_mesh(&mut self, from: SceneNodeId, mesh: SceneNodeId) -> Result<()> {
        let root = self.root_of(from)?;
        let root_node = self.node_mut(root)?;
        debug!("register mesh {:?} on '{}'", mesh, root_node.name);
        root_node.mesh_registry.push(mesh);
        Ok(())
    }

    /// Mesh-bearing nodes registered on `id`, in registration order.
    ///
    /// Only a parentless node holds registrations; for any other node this is empty.
    pub fn mesh_registry(&self, id: SceneNodeId) -> Result<&[SceneNodeId]> {
        Ok(&self.node(id)?.mesh_registry)
    }

    /// Numeric mesh IDs for every registered mesh under `root`: their registry positions.
    pub fn mesh_index(&self, root: SceneNodeId) -> Result<HashMap<SceneNodeId, usize>> {
        Ok(self
            .mesh_registry(root)?
            .iter()
            .enumerate()
            .map(|(i, id)| (*id, i))
            .collect())
    }

    /// Registry position of a single mesh node within its root's registry.
    pub fn mesh_id(&self, id: SceneNodeId) -> Result<Option<usize>> {
        let root = self.root_of(id)?;
        Ok(self.mesh_registry(root)?.iter().position(|m| *m == id))
    }

    /// Populate a node's attributes from typed input.
    ///
    /// `None` leaves locators, joints and emitters without attributes; meshes,
    /// models and collisions report their first required key as missing.
    pub fn create_attributes(
        &mut self,
        id: SceneNodeId,
        input: Option<AttributeInput>,
    ) -> Result<()> {
        let node = self.nodes.get_mut(&id).ok_or(Error::UnknownNode(id))?;
        let attributes = attributes::assemble(&node.name, &node.content, input, &self.config)?;
        debug!(
            "'{}': {} attributes",
            node.name,
            attributes.as_ref().map_or(0, Vec::len)
        );
        node.attributes = attributes;
        Ok(())
    }

    /// Populate a node's attributes from untyped external data.
    pub fn create_attributes_from(
        &mut self,
        id: SceneNodeId,
        data: Option<&AttributeData>,
    ) -> Result<()> {
        let input = match data {
            Some(data) => {
                let node = self.node(id)?;
                let input = AttributeInput::from_data(&node.content, data).map_err(
                    |MissingKey(key)| Error::MissingDataKey {
                        node: node.name.clone(),
                        key,
                    },
                )?;
                Some(input)
            }
            None => None,
        };
        self.create_attributes(id, input)
    }

    /// Build the record of `id` and everything below it.
    ///
    /// Children are built first, in sibling order, and each node stores its own
    /// record. A parent's record shares its children's stored records. The walk
    /// keeps its own stack, so tree depth is bounded by memory only.
    pub fn build(&mut self, id: SceneNodeId) -> Result<Arc<SceneNodeData>> {
        let mut stack = vec![(id, false)];
        let mut last = None;

        while let Some((current, children_done)) = stack.pop() {
            if children_done {
                last = Some(self.store_record(current)?);
                continue;
            }
            let node = self.node(current)?;
            stack.push((current, true));
            stack.extend(node.children.iter().rev().map(|&child| (child, false)));
        }

        last.ok_or(Error::UnknownNode(id))
    }

    /// Assemble the record of `id` from its children's stored records.
    fn store_record(&mut self, id: SceneNodeId) -> Result<Arc<SceneNodeData>> {
        let node = self.node(id)?;
        let children = if node.children.is_empty() {
            None
        } else {
            let records = node
                .children
                .iter()
                .map(|&child| {
                    self.node(child)?
                        .built
                        .clone()
                        .ok_or(Error::UnknownNode(child))
                })
                .collect::<Result<Vec<_>>>()?;
            Some(records)
        };

        let record = Arc::new(SceneNodeData::new(
            node.name.clone(),
            node.node_type(),
            node.transform.clone(),
            node.attributes.clone(),
            children,
        ));
        trace!("built {} '{}'", record.node_type(), record.name());
        self.node_mut(id)?.built = Some(Arc::clone(&record));
        Ok(record)
    }

    /// Record stored by the last build of `id`, if any.
    pub fn record(&self, id: SceneNodeId) -> Option<&Arc<SceneNodeData>> {
        self.nodes.get(&id)?.built.as_ref()
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}
