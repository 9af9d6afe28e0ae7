//! Scene node types
//!
//! Core types for the exported scene hierarchy: node IDs, node types, transforms,
//! mesh data streams, content variants, and nodes.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};

use super::attributes::Attribute;
use super::flatten::SceneNodeData;
use super::lookups;

/// Unique identifier for a node inside a [`SceneGraph`](super::SceneGraph).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SceneNodeId(pub u64);

/// Node type tag written into the `Type` field of every record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeType {
    Mesh,
    Locator,
    Collision,
    Model,
    Reference,
    Joint,
    Emitter,
}

impl NodeType {
    pub const ALL: [NodeType; 7] = [
        NodeType::Mesh,
        NodeType::Locator,
        NodeType::Collision,
        NodeType::Model,
        NodeType::Reference,
        NodeType::Joint,
        NodeType::Emitter,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Mesh => "MESH",
            NodeType::Locator => "LOCATOR",
            NodeType::Collision => "COLLISION",
            NodeType::Model => "MODEL",
            NodeType::Reference => "REFERENCE",
            NodeType::Joint => "JOINT",
            NodeType::Emitter => "EMITTER",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Local transform of a node, passed through to the record untouched.
///
/// Rotation is stored as Euler angles in degrees, the way the host hands it over.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Identity transform (no translation, rotation, or scaling).
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a translation-only transform.
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Default::default()
        }
    }

    pub fn new(translation: Vec3, rotation: Vec3, scale: Vec3) -> Self {
        Self {
            translation,
            rotation,
            scale,
        }
    }
}

/// Material reference carried by mesh nodes. Opaque to the builder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Material {
    pub name: String,
}

impl Material {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// One named channel of per-vertex mesh data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Stream {
    Vertices,
    Indexes,
    UVs,
    Normals,
    Tangents,
}

impl Stream {
    pub const ALL: [Stream; 5] = [
        Stream::Vertices,
        Stream::Indexes,
        Stream::UVs,
        Stream::Normals,
        Stream::Tangents,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stream::Vertices => "Vertices",
            Stream::Indexes => "Indexes",
            Stream::UVs => "UVs",
            Stream::Normals => "Normals",
            Stream::Tangents => "Tangents",
        }
    }

    /// Semantic name used by the geometry writer. Indexes have none.
    pub fn semantic(&self) -> Option<&'static str> {
        let index = match self {
            Stream::Vertices => 0,
            Stream::UVs => 1,
            Stream::Normals => 2,
            Stream::Tangents => 3,
            Stream::Indexes => return None,
        };
        lookups::semantic(index)
    }
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw geometry streams of a mesh-bearing node. Any of them may be absent.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshStreams {
    pub vertices: Option<Vec<Vec4>>,
    pub indexes: Option<Vec<u32>>,
    pub uvs: Option<Vec<Vec4>>,
    pub normals: Option<Vec<Vec4>>,
    pub tangents: Option<Vec<Vec4>>,
}

impl MeshStreams {
    pub fn has(&self, stream: Stream) -> bool {
        match stream {
            Stream::Vertices => self.vertices.is_some(),
            Stream::Indexes => self.indexes.is_some(),
            Stream::UVs => self.uvs.is_some(),
            Stream::Normals => self.normals.is_some(),
            Stream::Tangents => self.tangents.is_some(),
        }
    }

    /// Names of the streams that were supplied.
    pub fn provided(&self) -> BTreeSet<Stream> {
        Stream::ALL.into_iter().filter(|s| self.has(*s)).collect()
    }
}

/// Sub-type of a collision node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollisionKind {
    Mesh,
    Box,
    Sphere,
    Capsule,
    Cylinder,
}

impl CollisionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollisionKind::Mesh => "Mesh",
            CollisionKind::Box => "Box",
            CollisionKind::Sphere => "Sphere",
            CollisionKind::Capsule => "Capsule",
            CollisionKind::Cylinder => "Cylinder",
        }
    }
}

impl fmt::Display for CollisionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Collision volume. Mesh collisions carry geometry, primitives carry dimensions.
#[derive(Clone, Debug, PartialEq)]
pub enum CollisionShape {
    Mesh(MeshStreams),
    Box { width: f32, height: f32, depth: f32 },
    Sphere { radius: f32 },
    Capsule { radius: f32, height: f32 },
    Cylinder { radius: f32, height: f32 },
}

impl CollisionShape {
    pub fn kind(&self) -> CollisionKind {
        match self {
            CollisionShape::Mesh(_) => CollisionKind::Mesh,
            CollisionShape::Box { .. } => CollisionKind::Box,
            CollisionShape::Sphere { .. } => CollisionKind::Sphere,
            CollisionShape::Capsule { .. } => CollisionKind::Capsule,
            CollisionShape::Cylinder { .. } => CollisionKind::Cylinder,
        }
    }
}

/// What a scene node is.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeContent {
    /// Renderable geometry. `material` falls back to the configured default.
    Mesh {
        streams: MeshStreams,
        material: Option<Material>,
    },

    /// An attachment point.
    Locator { has_attachment: bool },

    Joint,

    Emitter,

    Collision(CollisionShape),

    /// The top of an exported scene. Owns the mesh registry.
    Model,

    /// Pulls in another scene file. `None` uses the configured placeholder path.
    Reference { scenegraph: Option<String> },
}

impl NodeContent {
    pub fn node_type(&self) -> NodeType {
        match self {
            NodeContent::Mesh { .. } => NodeType::Mesh,
            NodeContent::Locator { .. } => NodeType::Locator,
            NodeContent::Joint => NodeType::Joint,
            NodeContent::Emitter => NodeType::Emitter,
            NodeContent::Collision(_) => NodeType::Collision,
            NodeContent::Model => NodeType::Model,
            NodeContent::Reference { .. } => NodeType::Reference,
        }
    }

    /// Geometry streams, for mesh-bearing content.
    pub fn streams(&self) -> Option<&MeshStreams> {
        match self {
            NodeContent::Mesh { streams, .. } => Some(streams),
            NodeContent::Collision(CollisionShape::Mesh(streams)) => Some(streams),
            _ => None,
        }
    }

    pub fn is_mesh(&self) -> bool {
        self.streams().is_some()
    }
}

/// A single node of the scene hierarchy.
///
/// Nodes are created standalone and handed to a [`SceneGraph`](super::SceneGraph),
/// which owns them and manages links, attributes and built records.
#[derive(Clone, Debug)]
pub struct SceneNode {
    pub(crate) name: String,
    pub(crate) transform: Transform,
    pub(crate) content: NodeContent,
    pub(crate) attributes: Option<Vec<Attribute>>,
    pub(crate) parent: Option<SceneNodeId>,
    pub(crate) children: Vec<SceneNodeId>,
    pub(crate) provided_streams: BTreeSet<Stream>,
    /// Mesh-bearing descendants, in registration order. Only kept while parentless.
    pub(crate) mesh_registry: Vec<SceneNodeId>,
    /// This node's record from the last build.
    pub(crate) built: Option<Arc<SceneNodeData>>,
}

impl SceneNode {
    /// Create a standalone node of any variant.
    pub fn new(name: impl Into<String>, content: NodeContent) -> Self {
        let provided_streams = content
            .streams()
            .map(MeshStreams::provided)
            .unwrap_or_default();

        Self {
            name: name.into(),
            transform: Transform::identity(),
            content,
            attributes: None,
            parent: None,
            children: Vec::new(),
            provided_streams,
            mesh_registry: Vec::new(),
            built: None,
        }
    }

    pub fn mesh(name: impl Into<String>, streams: MeshStreams) -> Self {
        Self::new(
            name,
            NodeContent::Mesh {
                streams,
                material: None,
            },
        )
    }

    pub fn locator(name: impl Into<String>) -> Self {
        Self::new(name, NodeContent::Locator { has_attachment: false })
    }

    pub fn joint(name: impl Into<String>) -> Self {
        Self::new(name, NodeContent::Joint)
    }

    pub fn emitter(name: impl Into<String>) -> Self {
        Self::new(name, NodeContent::Emitter)
    }

    pub fn collision(name: impl Into<String>, shape: CollisionShape) -> Self {
        Self::new(name, NodeContent::Collision(shape))
    }

    pub fn model(name: impl Into<String>) -> Self {
        Self::new(name, NodeContent::Model)
    }

    pub fn reference(name: impl Into<String>) -> Self {
        Self::new(name, NodeContent::Reference { scenegraph: None })
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Set the material of a mesh node. Ignored with a warning on other variants.
    pub fn with_material(mut self, material: Material) -> Self {
        match &mut self.content {
            NodeContent::Mesh { material: slot, .. } => *slot = Some(material),
            other => log::warn!(
                "ignoring material '{}' on {} node '{}'",
                material.name,
                other.node_type(),
                self.name
            ),
        }
        self
    }

    /// Set the scene file a reference node points at. Ignored with a warning on other variants.
    pub fn with_scenegraph(mut self, path: impl Into<String>) -> Self {
        match &mut self.content {
            NodeContent::Reference { scenegraph } => *scenegraph = Some(path.into()),
            other => log::warn!(
                "ignoring scenegraph path on {} node '{}'",
                other.node_type(),
                self.name
            ),
        }
        self
    }

    /// Flag a locator as carrying an attachment. Ignored with a warning on other variants.
    pub fn with_attachment(mut self, has: bool) -> Self {
        match &mut self.content {
            NodeContent::Locator { has_attachment } => *has_attachment = has,
            other => log::warn!(
                "ignoring attachment flag on {} node '{}'",
                other.node_type(),
                self.name
            ),
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn node_type(&self) -> NodeType {
        self.content.node_type()
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn content(&self) -> &NodeContent {
        &self.content
    }

    pub fn attributes(&self) -> Option<&[Attribute]> {
        self.attributes.as_deref()
    }

    pub fn parent(&self) -> Option<SceneNodeId> {
        self.parent
    }

    pub fn children(&self) -> &[SceneNodeId] {
        &self.children
    }

    pub fn is_mesh(&self) -> bool {
        self.content.is_mesh()
    }

    pub fn provided_streams(&self) -> &BTreeSet<Stream> {
        &self.provided_streams
    }

    pub fn built_record(&self) -> Option<&Arc<SceneNodeData>> {
        self.built.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> Vec<Vec4> {
        vec![
            Vec4::new(0.0, 0.0, 0.0, 1.0),
            Vec4::new(1.0, 0.0, 0.0, 1.0),
            Vec4::new(1.0, 1.0, 0.0, 1.0),
            Vec4::new(0.0, 1.0, 0.0, 1.0),
        ]
    }

    #[test]
    fn test_scene_node_id_equality() {
        assert_eq!(SceneNodeId(1), SceneNodeId(1));
        assert_ne!(SceneNodeId(1), SceneNodeId(2));
    }

    #[test]
    fn test_transform_identity() {
        let t = Transform::identity();
        assert_eq!(t.translation, Vec3::ZERO);
        assert_eq!(t.rotation, Vec3::ZERO);
        assert_eq!(t.scale, Vec3::ONE);
    }

    #[test]
    fn test_transform_from_translation() {
        let t = Transform::from_translation(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(t.translation, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(t.scale, Vec3::ONE);
    }

    #[test]
    fn test_node_type_strings() {
        assert_eq!(NodeType::Mesh.to_string(), "MESH");
        assert_eq!(NodeType::Emitter.to_string(), "EMITTER");
        let json = serde_json::to_string(&NodeType::Collision).unwrap();
        assert_eq!(json, "\"COLLISION\"");
    }

    #[test]
    fn test_node_type_serde_matches_display() {
        for node_type in NodeType::ALL {
            let json = serde_json::to_string(&node_type).unwrap();
            assert_eq!(json, format!("\"{node_type}\""));
            let back: NodeType = serde_json::from_str(&json).unwrap();
            assert_eq!(back, node_type);
        }
    }

    #[test]
    fn test_mesh_provided_streams_partial() {
        let streams = MeshStreams {
            vertices: Some(quad()),
            indexes: Some(vec![0, 1, 2, 2, 3, 0]),
            ..Default::default()
        };
        let node = SceneNode::mesh("M1", streams);
        let expected: BTreeSet<Stream> = [Stream::Vertices, Stream::Indexes].into_iter().collect();
        assert_eq!(node.provided_streams(), &expected);
        assert!(node.is_mesh());
    }

    #[test]
    fn test_mesh_with_no_streams_is_still_a_mesh() {
        let node = SceneNode::mesh("Empty", MeshStreams::default());
        assert!(node.provided_streams().is_empty());
        assert!(node.is_mesh());
    }

    #[test]
    fn test_mesh_collision_tracks_streams() {
        let streams = MeshStreams {
            vertices: Some(quad()),
            normals: Some(quad()),
            ..Default::default()
        };
        let node = SceneNode::collision("Hull", CollisionShape::Mesh(streams));
        assert!(node.is_mesh());
        assert!(node.provided_streams().contains(&Stream::Normals));
        assert!(!node.provided_streams().contains(&Stream::UVs));
    }

    #[test]
    fn test_primitive_collision_is_not_a_mesh() {
        let node = SceneNode::collision("Ball", CollisionShape::Sphere { radius: 1.0 });
        assert!(!node.is_mesh());
        assert!(node.provided_streams().is_empty());
        assert_eq!(node.node_type(), NodeType::Collision);
    }

    #[test]
    fn test_new_node_is_standalone() {
        let node = SceneNode::locator("L1");
        assert!(node.parent().is_none());
        assert!(node.children().is_empty());
        assert!(node.attributes().is_none());
        assert!(node.built_record().is_none());
        assert_eq!(node.transform(), &Transform::identity());
    }

    #[test]
    fn test_joint_and_emitter_have_own_types() {
        assert_eq!(SceneNode::joint("J").node_type(), NodeType::Joint);
        assert_eq!(SceneNode::emitter("E").node_type(), NodeType::Emitter);
    }

    #[test]
    fn test_with_material_only_applies_to_mesh() {
        let mesh = SceneNode::mesh("M", MeshStreams::default()).with_material(Material::new("ROCK"));
        assert!(matches!(
            mesh.content(),
            NodeContent::Mesh { material: Some(m), .. } if m.name == "ROCK"
        ));

        let locator = SceneNode::locator("L").with_material(Material::new("ROCK"));
        assert_eq!(locator.content(), &NodeContent::Locator { has_attachment: false });
    }

    #[test]
    fn test_stream_semantics() {
        assert_eq!(Stream::Vertices.semantic(), Some("vertex_stream"));
        assert_eq!(Stream::Tangents.semantic(), Some("t_stream"));
        assert_eq!(Stream::Indexes.semantic(), None);
    }

    #[test]
    fn test_collision_kind_names() {
        assert_eq!(CollisionShape::Capsule { radius: 1.0, height: 2.0 }.kind().to_string(), "Capsule");
        assert_eq!(CollisionKind::Box.as_str(), "Box");
    }
}
