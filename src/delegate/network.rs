//! Material node networks.
//!
//! Nodes accumulate in an arena while the scene engine streams them in. Once
//! the network is complete, [`MaterialNetwork::wire`] checks every
//! relationship against the node table and builds a read-only view of the
//! connections. Node parameters are never rewritten by wiring.

use glam::{Vec3, Vec4};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use slotmap::{SlotMap, new_key_type};

use crate::errors::{DelegateError, Result};

new_key_type! {
    pub struct NodeKey;
}

/// A shader parameter value as authored in the scene description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Float(f32),
    Vector(Vec<f32>),
    String(String),
}

impl ParamValue {
    #[must_use]
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Int(v) => Some(*v as f32),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_vec3(&self) -> Option<Vec3> {
        match self {
            Self::Vector(v) if v.len() >= 3 => Some(Vec3::new(v[0], v[1], v[2])),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_vec4(&self) -> Option<Vec4> {
        match self {
            Self::Vector(v) if v.len() >= 4 => Some(Vec4::new(v[0], v[1], v[2], v[3])),
            _ => self.as_vec3().map(|v| v.extend(1.0)),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl From<f32> for ParamValue {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}

impl From<Vec3> for ParamValue {
    fn from(v: Vec3) -> Self {
        Self::Vector(v.to_array().to_vec())
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

pub type ParamMap = FxHashMap<String, ParamValue>;

/// A connection between two shader nodes, as delivered by the scene engine.
///
/// `input_id.input_name` is the upstream end (for example a texture reader's
/// `rgb` output); `output_id.output_name` is the downstream parameter it
/// drives (for example a surface's `diffuseColor`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub input_id: String,
    pub input_name: String,
    pub output_id: String,
    pub output_name: String,
}

impl Relationship {
    pub fn new(
        input_id: impl Into<String>,
        input_name: impl Into<String>,
        output_id: impl Into<String>,
        output_name: impl Into<String>,
    ) -> Self {
        Self {
            input_id: input_id.into(),
            input_name: input_name.into(),
            output_id: output_id.into(),
            output_name: output_name.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ShaderNode {
    pub path: String,
    pub network_id: String,
    pub parameters: ParamMap,
}

/// Node table of one material, in insertion order.
#[derive(Debug, Default)]
pub struct MaterialNetwork {
    nodes: SlotMap<NodeKey, ShaderNode>,
    order: Vec<NodeKey>,
    paths: FxHashMap<String, NodeKey>,
}

impl MaterialNetwork {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a node, or replaces the parameters of an existing one while
    /// keeping its position in iteration order.
    pub fn add_or_update_node(&mut self, network_id: &str, path: &str, parameters: ParamMap) {
        if let Some(&key) = self.paths.get(path)
            && let Some(node) = self.nodes.get_mut(key)
        {
            node.network_id = network_id.to_string();
            node.parameters = parameters;
            return;
        }

        let key = self.nodes.insert(ShaderNode {
            path: path.to_string(),
            network_id: network_id.to_string(),
            parameters,
        });
        self.order.push(key);
        self.paths.insert(path.to_string(), key);
    }

    #[must_use]
    pub fn key_of(&self, path: &str) -> Option<NodeKey> {
        self.paths.get(path).copied()
    }

    #[must_use]
    pub fn node(&self, key: NodeKey) -> Option<&ShaderNode> {
        self.nodes.get(key)
    }

    #[must_use]
    pub fn node_by_path(&self, path: &str) -> Option<&ShaderNode> {
        self.key_of(path).and_then(|key| self.nodes.get(key))
    }

    /// Nodes in the order they were first added.
    pub fn iter(&self) -> impl Iterator<Item = (NodeKey, &ShaderNode)> {
        self.order
            .iter()
            .filter_map(|&key| self.nodes.get(key).map(|node| (key, node)))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Resolves relationships into edges between nodes of this network.
    ///
    /// Fails with [`DelegateError::DanglingRelationship`] on the first
    /// endpoint that is not in the node table; nothing is wired in that case.
    pub fn wire(&self, relationships: &[Relationship]) -> Result<WiredNetwork<'_>> {
        let mut edges = Vec::with_capacity(relationships.len());
        for rel in relationships {
            let input = self.key_of(&rel.input_id).ok_or_else(|| {
                DelegateError::DanglingRelationship {
                    node_id: rel.input_id.clone(),
                    role: "input",
                }
            })?;
            let output = self.key_of(&rel.output_id).ok_or_else(|| {
                DelegateError::DanglingRelationship {
                    node_id: rel.output_id.clone(),
                    role: "output",
                }
            })?;
            edges.push(Edge {
                input,
                input_name: rel.input_name.clone(),
                output,
                output_name: rel.output_name.clone(),
            });
        }

        // Both endpoints claim their named parameter; later edges win.
        let mut slots = FxHashMap::default();
        for (index, edge) in edges.iter().enumerate() {
            slots.insert((edge.input, edge.input_name.clone()), index);
            slots.insert((edge.output, edge.output_name.clone()), index);
        }

        Ok(WiredNetwork {
            network: self,
            edges,
            slots,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub input: NodeKey,
    pub input_name: String,
    pub output: NodeKey,
    pub output_name: String,
}

/// Read-only view of a network together with its resolved connections.
#[derive(Debug)]
pub struct WiredNetwork<'a> {
    network: &'a MaterialNetwork,
    edges: Vec<Edge>,
    slots: FxHashMap<(NodeKey, String), usize>,
}

impl WiredNetwork<'_> {
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// The edge attached to `node.parameter`, if any.
    #[must_use]
    pub fn connection(&self, node: NodeKey, parameter: &str) -> Option<&Edge> {
        self.slots
            .get(&(node, parameter.to_string()))
            .and_then(|&index| self.edges.get(index))
    }

    /// True when the node authors `parameter` or has it connected.
    #[must_use]
    pub fn exposes(&self, node: NodeKey, parameter: &str) -> bool {
        self.network
            .node(node)
            .is_some_and(|n| n.parameters.contains_key(parameter))
            || self.connection(node, parameter).is_some()
    }

    /// First node, in table order, exposing `parameter`.
    #[must_use]
    pub fn find_node_exposing(&self, parameter: &str) -> Option<NodeKey> {
        self.network
            .iter()
            .map(|(key, _)| key)
            .find(|&key| self.exposes(key, parameter))
    }

    /// The texture file feeding `node.parameter`: the `file` parameter of the
    /// upstream node on that connection.
    #[must_use]
    pub fn texture_file(&self, node: NodeKey, parameter: &str) -> Option<&str> {
        let edge = self.connection(node, parameter)?;
        self.network
            .node(edge.input)?
            .parameters
            .get("file")?
            .as_str()
    }
}
