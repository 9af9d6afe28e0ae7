//! Node attributes and their per-variant assembly.
//!
//! External data arrives either as an untyped [`AttributeData`] map (what the host
//! exporter collects from object properties) or as one of the typed inputs whose
//! fields are exactly the keys a variant needs. The untyped map is converted to the
//! typed form first; that conversion is the only place a key can be missing.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{Error, Result};

use super::config::BuilderConfig;
use super::node::{CollisionKind, CollisionShape, NodeContent, NodeType};

pub const ATTACHMENT: &str = "ATTACHMENT";
pub const JOINTINDEX: &str = "JOINTINDEX";
pub const MATERIAL: &str = "MATERIAL";
pub const DATA: &str = "DATA";
pub const BATCHSTART: &str = "BATCHSTART";
pub const BATCHCOUNT: &str = "BATCHCOUNT";
pub const VERTRSTART: &str = "VERTRSTART";
pub const VERTREND: &str = "VERTREND";
pub const FIRSTSKINMAT: &str = "FIRSTSKINMAT";
pub const LASTSKINMAT: &str = "LASTSKINMAT";
pub const MESHLINK: &str = "MESHLINK";
pub const GEOMETRY: &str = "GEOMETRY";
pub const SCENEGRAPH: &str = "SCENEGRAPH";
pub const TYPE: &str = "TYPE";
pub const WIDTH: &str = "WIDTH";
pub const HEIGHT: &str = "HEIGHT";
pub const DEPTH: &str = "DEPTH";
pub const RADIUS: &str = "RADIUS";

/// An attribute value. Passed through as given; never interpreted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Int(v) => write!(f, "{v}"),
            AttributeValue::Float(v) => write!(f, "{v}"),
            AttributeValue::Text(v) => f.write_str(v),
        }
    }
}

impl From<i64> for AttributeValue {
    fn from(v: i64) -> Self {
        AttributeValue::Int(v)
    }
}

impl From<i32> for AttributeValue {
    fn from(v: i32) -> Self {
        AttributeValue::Int(v.into())
    }
}

impl From<u32> for AttributeValue {
    fn from(v: u32) -> Self {
        AttributeValue::Int(v.into())
    }
}

impl From<f64> for AttributeValue {
    fn from(v: f64) -> Self {
        AttributeValue::Float(v)
    }
}

impl From<f32> for AttributeValue {
    fn from(v: f32) -> Self {
        AttributeValue::Float(v.into())
    }
}

impl From<&str> for AttributeValue {
    fn from(v: &str) -> Self {
        AttributeValue::Text(v.to_owned())
    }
}

impl From<String> for AttributeValue {
    fn from(v: String) -> Self {
        AttributeValue::Text(v)
    }
}

/// One `(name, value)` entry of a node's attribute list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Attribute {
    pub name: String,
    pub value: AttributeValue,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A required key was absent from an [`AttributeData`] map.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("missing data key {0}")]
pub struct MissingKey(pub &'static str);

/// Untyped per-node data keyed by attribute name.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeData {
    values: HashMap<String, AttributeValue>,
}

impl AttributeData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<AttributeValue>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.values.get(key)
    }

    pub fn require(&self, key: &'static str) -> std::result::Result<AttributeValue, MissingKey> {
        self.values.get(key).cloned().ok_or(MissingKey(key))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<AttributeValue>> FromIterator<(K, V)> for AttributeData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LocatorData {
    pub attachment: AttributeValue,
}

#[derive(Clone, Debug, PartialEq)]
pub struct JointData {
    pub joint_index: AttributeValue,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EmitterData {
    pub material: AttributeValue,
    pub data: AttributeValue,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MeshData {
    pub batch_start: AttributeValue,
    pub batch_count: AttributeValue,
    pub vert_r_start: AttributeValue,
    pub vert_r_end: AttributeValue,
    pub material: AttributeValue,
    pub attachment: AttributeValue,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ModelData {
    pub geometry: AttributeValue,
}

/// Collision data, one shape per collision sub-type.
#[derive(Clone, Debug, PartialEq)]
pub enum CollisionData {
    Mesh {
        batch_start: AttributeValue,
        batch_count: AttributeValue,
        vert_r_start: AttributeValue,
        vert_r_end: AttributeValue,
    },
    Box {
        width: AttributeValue,
        height: AttributeValue,
        depth: AttributeValue,
    },
    Sphere {
        radius: AttributeValue,
    },
    Capsule {
        radius: AttributeValue,
        height: AttributeValue,
    },
    Cylinder {
        radius: AttributeValue,
        height: AttributeValue,
    },
}

impl LocatorData {
    pub fn from_data(data: &AttributeData) -> std::result::Result<Self, MissingKey> {
        Ok(Self {
            attachment: data.require(ATTACHMENT)?,
        })
    }
}

impl JointData {
    pub fn from_data(data: &AttributeData) -> std::result::Result<Self, MissingKey> {
        Ok(Self {
            joint_index: data.require(JOINTINDEX)?,
        })
    }
}

impl EmitterData {
    pub fn from_data(data: &AttributeData) -> std::result::Result<Self, MissingKey> {
        Ok(Self {
            material: data.require(MATERIAL)?,
            data: data.require(DATA)?,
        })
    }
}

impl MeshData {
    pub fn from_data(data: &AttributeData) -> std::result::Result<Self, MissingKey> {
        Ok(Self {
            batch_start: data.require(BATCHSTART)?,
            batch_count: data.require(BATCHCOUNT)?,
            vert_r_start: data.require(VERTRSTART)?,
            vert_r_end: data.require(VERTREND)?,
            material: data.require(MATERIAL)?,
            attachment: data.require(ATTACHMENT)?,
        })
    }
}

impl ModelData {
    pub fn from_data(data: &AttributeData) -> std::result::Result<Self, MissingKey> {
        Ok(Self {
            geometry: data.require(GEOMETRY)?,
        })
    }
}

impl CollisionData {
    pub fn from_data(
        kind: CollisionKind,
        data: &AttributeData,
    ) -> std::result::Result<Self, MissingKey> {
        Ok(match kind {
            CollisionKind::Mesh => CollisionData::Mesh {
                batch_start: data.require(BATCHSTART)?,
                batch_count: data.require(BATCHCOUNT)?,
                vert_r_start: data.require(VERTRSTART)?,
                vert_r_end: data.require(VERTREND)?,
            },
            CollisionKind::Box => CollisionData::Box {
                width: data.require(WIDTH)?,
                height: data.require(HEIGHT)?,
                depth: data.require(DEPTH)?,
            },
            CollisionKind::Sphere => CollisionData::Sphere {
                radius: data.require(RADIUS)?,
            },
            CollisionKind::Capsule => CollisionData::Capsule {
                radius: data.require(RADIUS)?,
                height: data.require(HEIGHT)?,
            },
            CollisionKind::Cylinder => CollisionData::Cylinder {
                radius: data.require(RADIUS)?,
                height: data.require(HEIGHT)?,
            },
        })
    }

    pub fn kind(&self) -> CollisionKind {
        match self {
            CollisionData::Mesh { .. } => CollisionKind::Mesh,
            CollisionData::Box { .. } => CollisionKind::Box,
            CollisionData::Sphere { .. } => CollisionKind::Sphere,
            CollisionData::Capsule { .. } => CollisionKind::Capsule,
            CollisionData::Cylinder { .. } => CollisionKind::Cylinder,
        }
    }

    /// First key this sub-type requires.
    fn first_key(kind: CollisionKind) -> &'static str {
        match kind {
            CollisionKind::Mesh => BATCHSTART,
            CollisionKind::Box => WIDTH,
            CollisionKind::Sphere | CollisionKind::Capsule | CollisionKind::Cylinder => RADIUS,
        }
    }
}

impl CollisionShape {
    /// Attribute data taken from the shape's own dimensions.
    ///
    /// Mesh collisions have no dimensions; their batch ranges come from the
    /// geometry writer, so this returns `None` for them.
    pub fn attribute_data(&self) -> Option<CollisionData> {
        let data = match *self {
            CollisionShape::Mesh(_) => return None,
            CollisionShape::Box { width, height, depth } => CollisionData::Box {
                width: width.into(),
                height: height.into(),
                depth: depth.into(),
            },
            CollisionShape::Sphere { radius } => CollisionData::Sphere {
                radius: radius.into(),
            },
            CollisionShape::Capsule { radius, height } => CollisionData::Capsule {
                radius: radius.into(),
                height: height.into(),
            },
            CollisionShape::Cylinder { radius, height } => CollisionData::Cylinder {
                radius: radius.into(),
                height: height.into(),
            },
        };
        Some(data)
    }
}

/// Typed attribute input, tagged with the variant it is meant for.
#[derive(Clone, Debug, PartialEq)]
pub enum AttributeInput {
    Locator(LocatorData),
    Joint(JointData),
    Emitter(EmitterData),
    Mesh(MeshData),
    Model(ModelData),
    Collision(CollisionData),
    /// References take everything from the node itself.
    Reference,
}

impl AttributeInput {
    pub fn node_type(&self) -> NodeType {
        match self {
            AttributeInput::Locator(_) => NodeType::Locator,
            AttributeInput::Joint(_) => NodeType::Joint,
            AttributeInput::Emitter(_) => NodeType::Emitter,
            AttributeInput::Mesh(_) => NodeType::Mesh,
            AttributeInput::Model(_) => NodeType::Model,
            AttributeInput::Collision(_) => NodeType::Collision,
            AttributeInput::Reference => NodeType::Reference,
        }
    }

    /// Convert untyped data into the input matching `content`.
    pub fn from_data(
        content: &NodeContent,
        data: &AttributeData,
    ) -> std::result::Result<Self, MissingKey> {
        Ok(match content {
            NodeContent::Locator { .. } => AttributeInput::Locator(LocatorData::from_data(data)?),
            NodeContent::Joint => AttributeInput::Joint(JointData::from_data(data)?),
            NodeContent::Emitter => AttributeInput::Emitter(EmitterData::from_data(data)?),
            NodeContent::Mesh { .. } => AttributeInput::Mesh(MeshData::from_data(data)?),
            NodeContent::Model => AttributeInput::Model(ModelData::from_data(data)?),
            NodeContent::Collision(shape) => {
                AttributeInput::Collision(CollisionData::from_data(shape.kind(), data)?)
            }
            NodeContent::Reference { .. } => AttributeInput::Reference,
        })
    }
}

/// Assemble the attribute list of one node.
///
/// Locators, joints and emitters stay attribute-less without input. Meshes, models
/// and collisions cannot be assembled without input and report their first
/// required key as missing. References ignore the input entirely.
pub(crate) fn assemble(
    name: &str,
    content: &NodeContent,
    input: Option<AttributeInput>,
    config: &BuilderConfig,
) -> Result<Option<Vec<Attribute>>> {
    let missing = |key: &'static str| Error::MissingDataKey {
        node: name.to_owned(),
        key,
    };

    let attributes = match (content, input) {
        (NodeContent::Reference { scenegraph }, _) => {
            let path = scenegraph
                .as_deref()
                .unwrap_or(&config.reference_placeholder);
            vec![Attribute::new(SCENEGRAPH, path)]
        }

        (NodeContent::Locator { has_attachment }, None) => {
            if *has_attachment {
                log::warn!("locator '{name}' is flagged with an attachment but got no data");
            }
            return Ok(None);
        }
        (NodeContent::Joint | NodeContent::Emitter, None) => return Ok(None),
        (NodeContent::Mesh { .. }, None) => return Err(missing(BATCHSTART)),
        (NodeContent::Model, None) => return Err(missing(GEOMETRY)),
        (NodeContent::Collision(shape), None) => {
            return Err(missing(CollisionData::first_key(shape.kind())));
        }

        (NodeContent::Locator { .. }, Some(AttributeInput::Locator(d))) => {
            vec![Attribute::new(ATTACHMENT, d.attachment)]
        }
        (NodeContent::Joint, Some(AttributeInput::Joint(d))) => {
            vec![Attribute::new(JOINTINDEX, d.joint_index)]
        }
        (NodeContent::Emitter, Some(AttributeInput::Emitter(d))) => vec![
            Attribute::new(MATERIAL, d.material),
            Attribute::new(DATA, d.data),
        ],
        (NodeContent::Mesh { .. }, Some(AttributeInput::Mesh(d))) => vec![
            Attribute::new(BATCHSTART, d.batch_start),
            Attribute::new(BATCHCOUNT, d.batch_count),
            Attribute::new(VERTRSTART, d.vert_r_start),
            Attribute::new(VERTREND, d.vert_r_end),
            Attribute::new(FIRSTSKINMAT, 0i64),
            Attribute::new(LASTSKINMAT, 0i64),
            Attribute::new(MATERIAL, d.material),
            Attribute::new(MESHLINK, format!("{name}{}", config.meshlink_suffix)),
            Attribute::new(ATTACHMENT, d.attachment),
        ],
        (NodeContent::Model, Some(AttributeInput::Model(d))) => {
            vec![Attribute::new(GEOMETRY, d.geometry)]
        }
        (NodeContent::Collision(shape), Some(AttributeInput::Collision(d))) => {
            if d.kind() != shape.kind() {
                return Err(Error::ShapeMismatch {
                    node: name.to_owned(),
                    expected: shape.kind(),
                    found: d.kind(),
                });
            }
            let mut attributes = vec![Attribute::new(TYPE, shape.kind().as_str())];
            match d {
                CollisionData::Mesh {
                    batch_start,
                    batch_count,
                    vert_r_start,
                    vert_r_end,
                } => attributes.extend([
                    Attribute::new(BATCHSTART, batch_start),
                    Attribute::new(BATCHCOUNT, batch_count),
                    Attribute::new(VERTRSTART, vert_r_start),
                    Attribute::new(VERTREND, vert_r_end),
                    Attribute::new(FIRSTSKINMAT, 0i64),
                    Attribute::new(LASTSKINMAT, 0i64),
                ]),
                CollisionData::Box {
                    width,
                    height,
                    depth,
                } => attributes.extend([
                    Attribute::new(WIDTH, width),
                    Attribute::new(HEIGHT, height),
                    Attribute::new(DEPTH, depth),
                ]),
                CollisionData::Sphere { radius } => {
                    attributes.push(Attribute::new(RADIUS, radius));
                }
                CollisionData::Capsule { radius, height }
                | CollisionData::Cylinder { radius, height } => attributes.extend([
                    Attribute::new(RADIUS, radius),
                    Attribute::new(HEIGHT, height),
                ]),
            }
            attributes
        }

        (content, Some(other)) => {
            return Err(Error::VariantMismatch {
                node: name.to_owned(),
                expected: content.node_type(),
                found: other.node_type(),
            });
        }
    };

    Ok(Some(attributes))
}
