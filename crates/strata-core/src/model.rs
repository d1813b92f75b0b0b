//! Domain model supplied by the course/roadmap data service.
//!
//! - [`ConceptNode`] - A learning concept with a closed [`ConceptKind`]
//! - [`Connection`] - A directed, typed link between two concepts
//!
//! Both are plain values: the engine never mutates them. Positions live in the
//! layout and in the interaction state, not here.

use std::collections::BTreeMap;

use log::warn;
use serde::{Deserialize, Deserializer, Serialize};

use crate::identifier::Id;

/// Semantic type of a [`ConceptNode`].
///
/// The names match external configuration strings (snake_case).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConceptKind {
    Concept,
    Skill,
    Topic,
    Course,
    Other,
}

/// Semantic type of a [`Connection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionKind {
    Prerequisite,
    Related,
    BuildsOn,
    Similar,
    Other,
}

/// A learning concept as delivered by the data service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptNode {
    id: Id,
    title: String,
    #[serde(rename = "type")]
    kind: ConceptKind,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    metadata: BTreeMap<String, String>,
}

impl ConceptNode {
    /// Creates a node with an empty metadata bag.
    pub fn new(id: impl Into<Id>, title: impl Into<String>, kind: ConceptKind) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            kind,
            metadata: BTreeMap::new(),
        }
    }

    /// Adds a metadata entry (builder style).
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn kind(&self) -> ConceptKind {
        self.kind
    }

    pub fn metadata(&self) -> &BTreeMap<String, String> {
        &self.metadata
    }
}

/// A directed link between two concepts.
///
/// `strength` is informational only; layout never reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    id: Id,
    from: Id,
    to: Id,
    #[serde(rename = "type")]
    kind: ConnectionKind,
    #[serde(
        default = "default_strength",
        deserialize_with = "deserialize_strength"
    )]
    strength: f32,
}

fn default_strength() -> f32 {
    1.0
}

fn clamp_strength(strength: f32) -> f32 {
    if strength.is_nan() {
        warn!("Connection strength is NaN, using default");
        return default_strength();
    }
    if !(0.0..=1.0).contains(&strength) {
        warn!(strength; "Connection strength outside [0, 1], clamping");
    }
    strength.clamp(0.0, 1.0)
}

fn deserialize_strength<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f32, D::Error> {
    f32::deserialize(deserializer).map(clamp_strength)
}

impl Connection {
    /// Creates a connection with full strength.
    pub fn new(
        id: impl Into<Id>,
        from: impl Into<Id>,
        to: impl Into<Id>,
        kind: ConnectionKind,
    ) -> Self {
        Self {
            id: id.into(),
            from: from.into(),
            to: to.into(),
            kind,
            strength: default_strength(),
        }
    }

    /// Sets the strength (builder style), clamped to `[0, 1]`.
    pub fn with_strength(mut self, strength: f32) -> Self {
        self.strength = clamp_strength(strength);
        self
    }

    pub fn id(&self) -> Id {
        self.id
    }

    /// Returns the source node id.
    pub fn from(&self) -> Id {
        self.from
    }

    /// Returns the target node id.
    pub fn to(&self) -> Id {
        self.to
    }

    pub fn kind(&self) -> ConnectionKind {
        self.kind
    }

    pub fn strength(&self) -> f32 {
        self.strength
    }

    /// Checks whether either endpoint is the given node.
    pub fn touches(&self, node: Id) -> bool {
        self.from == node || self.to == node
    }
}
