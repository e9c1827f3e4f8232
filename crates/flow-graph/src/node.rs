use crate::ids::NodeId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

// ------------------------------------------------------------------
// Node kinds
// ------------------------------------------------------------------

/// Type tag of a node.
///
/// The graph itself never looks at the kind; palettes and the view
/// layer decide what a kind means and how it is drawn.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
    // template builder
    Header,
    Clause,
    Options,
    Date,
    Footer,
    // knowledge graph
    Input,
    Entity,
    Attribute,
    ComboBox,
    ExclusiveBox,
    #[serde(rename = "option")]
    Choice,
    Group,
    Multiplier,
    // contract template graph
    ContractTemplate,
    Section,
    Variable,
    ConditionalLogic,
    UserJourney,
    Country,
    Custom,
}

impl NodeKind {
    pub const ALL: [NodeKind; 20] = [
        NodeKind::Header,
        NodeKind::Clause,
        NodeKind::Options,
        NodeKind::Date,
        NodeKind::Footer,
        NodeKind::Input,
        NodeKind::Entity,
        NodeKind::Attribute,
        NodeKind::ComboBox,
        NodeKind::ExclusiveBox,
        NodeKind::Choice,
        NodeKind::Group,
        NodeKind::Multiplier,
        NodeKind::ContractTemplate,
        NodeKind::Section,
        NodeKind::Variable,
        NodeKind::ConditionalLogic,
        NodeKind::UserJourney,
        NodeKind::Country,
        NodeKind::Custom,
    ];

    /// The tag as it appears in project files.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Header => "header",
            NodeKind::Clause => "clause",
            NodeKind::Options => "options",
            NodeKind::Date => "date",
            NodeKind::Footer => "footer",
            NodeKind::Input => "input",
            NodeKind::Entity => "entity",
            NodeKind::Attribute => "attribute",
            NodeKind::ComboBox => "comboBox",
            NodeKind::ExclusiveBox => "exclusiveBox",
            NodeKind::Choice => "option",
            NodeKind::Group => "group",
            NodeKind::Multiplier => "multiplier",
            NodeKind::ContractTemplate => "contractTemplate",
            NodeKind::Section => "section",
            NodeKind::Variable => "variable",
            NodeKind::ConditionalLogic => "conditionalLogic",
            NodeKind::UserJourney => "userJourney",
            NodeKind::Country => "country",
            NodeKind::Custom => "custom",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown node kind `{0}`")]
pub struct UnknownKind(pub String);

impl FromStr for NodeKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownKind(s.to_owned()))
    }
}

// ------------------------------------------------------------------
// Position
// ------------------------------------------------------------------

/// Free-form canvas position. No layout constraints are applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

// ------------------------------------------------------------------
// Payload
// ------------------------------------------------------------------

pub const LABEL_KEY: &str = "label";

/// Free-form key/value payload carried by a node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeData(Map<String, Value>);

impl NodeData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn labeled(label: impl Into<String>) -> Self {
        Self::new().with(LABEL_KEY, label.into())
    }

    /// Builder form of [`NodeData::insert`].
    pub fn with(
        mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.0.get(key).and_then(Value::as_i64)
    }

    /// The display label, or an empty string when none is set.
    pub fn label(&self) -> &str {
        self.get_str(LABEL_KEY).unwrap_or_default()
    }

    /// Shallow merge: every key of `patch` overwrites the same key here.
    pub fn merge(&mut self, patch: NodeData) {
        for (key, value) in patch.0 {
            self.0.insert(key, value);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Value)> for NodeData {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ------------------------------------------------------------------
// Node
// ------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
    pub position: Position,
    #[serde(default)]
    pub data: NodeData,
    #[serde(default)]
    pub selected: bool,
}

impl Node {
    pub fn new(
        id: impl Into<NodeId>,
        kind: NodeKind,
        position: Position,
        data: NodeData,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            position,
            data,
            selected: false,
        }
    }

    pub fn label(&self) -> &str {
        self.data.label()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn kind_tags_round_trip() {
        for kind in NodeKind::ALL {
            assert_eq!(kind.as_str().parse::<NodeKind>(), Ok(kind));
            assert_eq!(
                serde_json::to_value(kind).unwrap(),
                json!(kind.as_str())
            );
        }
        assert!("diamond".parse::<NodeKind>().is_err());
    }

    #[test]
    fn merge_is_shallow() {
        let mut data = NodeData::labeled("Customer")
            .with("details", "")
            .with("properties", json!({ "minItems": 1, "maxItems": 3 }));

        data.merge(
            NodeData::new()
                .with("details", "buyer")
                .with("properties", json!({ "minItems": 2 })),
        );

        assert_eq!(data.label(), "Customer");
        assert_eq!(data.get_str("details"), Some("buyer"));
        assert_eq!(data.get("properties"), Some(&json!({ "minItems": 2 })));
    }

    #[test]
    fn node_defaults_missing_payload() {
        let node: Node = serde_json::from_value(json!({
            "id": "4",
            "kind": "clause",
            "position": { "x": 50.0, "y": 200.0 }
        }))
        .unwrap();

        assert_eq!(node.kind, NodeKind::Clause);
        assert!(node.data.is_empty());
        assert!(!node.selected);
        assert_eq!(node.label(), "");
    }
}
