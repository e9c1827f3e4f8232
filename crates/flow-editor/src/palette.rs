use flow_graph::{EdgeKind, EdgeStyle, NodeData, NodeKind};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Payload key holding a privacy-policy node's form answer.
pub const VALUE_KEY: &str = "value";

// ------------------------------------------------------------------
// Editor variants
// ------------------------------------------------------------------

/// The flavours of editor built on the same graph model.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Variant {
    /// Drag-and-drop privacy policy / document template canvas.
    PrivacyPolicy,
    /// Contract knowledge graph with a version history.
    #[default]
    KnowledgeGraph,
    /// NDA-style contract template graph.
    ContractTemplate,
}

impl Variant {
    pub const ALL: [Variant; 3] = [
        Variant::PrivacyPolicy,
        Variant::KnowledgeGraph,
        Variant::ContractTemplate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::PrivacyPolicy => "privacy-policy",
            Variant::KnowledgeGraph => "knowledge-graph",
            Variant::ContractTemplate => "contract-template",
        }
    }

    pub fn palette(&self) -> &'static Palette {
        match self {
            Variant::PrivacyPolicy => &PRIVACY_POLICY,
            Variant::KnowledgeGraph => &KNOWLEDGE_GRAPH,
            Variant::ContractTemplate => &CONTRACT_TEMPLATE,
        }
    }

    /// Style given to edges drawn by a connect gesture.
    pub fn edge_style(&self) -> EdgeStyle {
        match self {
            Variant::PrivacyPolicy => EdgeStyle::default(),
            Variant::KnowledgeGraph => EdgeStyle::new(EdgeKind::Custom),
            Variant::ContractTemplate => {
                EdgeStyle::new(EdgeKind::SmoothStep).animated()
            }
        }
    }

    /// Initial payload for a node created from this variant's palette.
    /// `label` and `description` override the palette defaults when
    /// given and non-empty.
    pub fn initial_data(
        &self,
        entry: &PaletteEntry,
        label: Option<&str>,
        description: Option<&str>,
    ) -> NodeData {
        let label = label.filter(|s| !s.is_empty());
        let description =
            description.filter(|s| !s.is_empty()).unwrap_or_default();
        match self {
            Variant::PrivacyPolicy => NodeData::labeled(
                label.map_or_else(
                    || format!("{} node", entry.kind),
                    str::to_owned,
                ),
            )
            .with(VALUE_KEY, ""),
            Variant::KnowledgeGraph => NodeData::labeled(
                label.map_or_else(
                    || format!("New {}", entry.label),
                    str::to_owned,
                ),
            )
            .with("details", description)
            .with("properties", serde_json::json!({})),
            Variant::ContractTemplate => NodeData::labeled(
                label.map_or_else(
                    || format!("New {}", entry.label),
                    str::to_owned,
                ),
            )
            .with("description", description),
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.palette().title)
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error(
    "unknown editor variant `{0}` (expected privacy-policy, knowledge-graph or contract-template)"
)]
pub struct UnknownVariant(pub String);

impl FromStr for Variant {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Variant::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| UnknownVariant(s.to_owned()))
    }
}

// ------------------------------------------------------------------
// Palettes
// ------------------------------------------------------------------

/// A draggable "node type" descriptor shown in the sidebar.
#[derive(Debug, Clone, PartialEq)]
pub struct PaletteEntry {
    pub kind: NodeKind,
    pub label: &'static str,
    pub description: &'static str,
    /// Payload keys the inspector offers for this kind.
    pub properties: &'static [&'static str],
}

/// Collapsible group of palette entries.
#[derive(Debug, Clone, PartialEq)]
pub struct PaletteSection {
    pub title: &'static str,
    pub entries: Vec<PaletteEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub title: &'static str,
    pub sections: Vec<PaletteSection>,
}

impl Palette {
    pub fn entries(&self) -> impl Iterator<Item = &PaletteEntry> {
        self.sections.iter().flat_map(|s| s.entries.iter())
    }

    pub fn entry(&self, kind: NodeKind) -> Option<&PaletteEntry> {
        self.entries().find(|e| e.kind == kind)
    }
}

const fn entry(
    kind: NodeKind,
    label: &'static str,
    description: &'static str,
    properties: &'static [&'static str],
) -> PaletteEntry {
    PaletteEntry {
        kind,
        label,
        description,
        properties,
    }
}

static PRIVACY_POLICY: Lazy<Palette> = Lazy::new(|| Palette {
    title: "Privacy Policy Builder",
    sections: vec![PaletteSection {
        title: "Blocks",
        entries: vec![
            entry(NodeKind::Header, "Header", "Title line of the policy", &["value"]),
            entry(NodeKind::Clause, "Clause", "Free text clause", &["value"]),
            entry(NodeKind::Options, "Options", "Pick one of a fixed list", &["value"]),
            entry(NodeKind::Date, "Date", "Effective or review date", &["value"]),
            entry(NodeKind::Footer, "Footer", "Standard, detailed or minimal footer", &["value"]),
        ],
    }],
});

static KNOWLEDGE_GRAPH: Lazy<Palette> = Lazy::new(|| Palette {
    title: "Contract Knowledge Graph",
    sections: vec![PaletteSection {
        title: "Components",
        entries: vec![
            entry(
                NodeKind::Entity,
                "Entity",
                "Core elements like customer, employee, product",
                &["name", "description", "identifier"],
            ),
            entry(
                NodeKind::Attribute,
                "Attribute",
                "Information storage like dates, prices, descriptions",
                &["name", "type", "required"],
            ),
            entry(
                NodeKind::ComboBox,
                "Combo Option Box",
                "Multiple selection container",
                &["name", "description", "minSelections", "maxSelections"],
            ),
            entry(
                NodeKind::ExclusiveBox,
                "Exclusive Option Box",
                "Single selection container",
                &["name", "description", "defaultOption"],
            ),
            entry(
                NodeKind::Choice,
                "Option",
                "Selection item for combo or exclusive boxes",
                &["name", "value", "description"],
            ),
            entry(
                NodeKind::Group,
                "Group",
                "Organizational container for nodes",
                &["name", "description"],
            ),
            entry(
                NodeKind::Multiplier,
                "Multiplier",
                "Container for repeated elements",
                &["name", "description", "minItems", "maxItems"],
            ),
        ],
    }],
});

static CONTRACT_TEMPLATE: Lazy<Palette> = Lazy::new(|| Palette {
    title: "Contract Builder",
    sections: vec![
        PaletteSection {
            title: "Contract Templates",
            entries: vec![entry(
                NodeKind::ContractTemplate,
                "Contract Template",
                "Template Description",
                &["description"],
            )],
        },
        PaletteSection {
            title: "Sections & Clauses",
            entries: vec![
                entry(NodeKind::Section, "Section", "Group of clauses", &["description"]),
                entry(NodeKind::Clause, "Clause", "Contract wording", &["text"]),
            ],
        },
        PaletteSection {
            title: "Attributes",
            entries: vec![
                entry(NodeKind::Variable, "Variable", "Placeholder filled per contract", &["type"]),
                entry(
                    NodeKind::ConditionalLogic,
                    "Conditional Logic",
                    "Include content when a condition holds",
                    &["condition"],
                ),
            ],
        },
        PaletteSection {
            title: "Countries",
            entries: vec![entry(
                NodeKind::Country,
                "Country",
                "Jurisdiction-specific clauses",
                &["description"],
            )],
        },
        PaletteSection {
            title: "User Journey",
            entries: vec![entry(
                NodeKind::UserJourney,
                "User Journey",
                "Step the user goes through",
                &["description"],
            )],
        },
    ],
});
