// Demo graphs each editor variant opens with

use crate::palette::Variant;
use flow_graph::{
    Edge, EdgeKind, EdgeStyle, Node, NodeData, NodeKind, Position, Snapshot,
};
use serde_json::json;

pub fn seed_snapshot(variant: Variant) -> Snapshot {
    match variant {
        Variant::PrivacyPolicy => Snapshot::default(),
        Variant::KnowledgeGraph => knowledge_graph_seed(),
        Variant::ContractTemplate => contract_template_seed(),
    }
}

fn node(id: &str, kind: NodeKind, x: f32, y: f32, data: NodeData) -> Node {
    Node::new(id, kind, Position::new(x, y), data)
}

fn knowledge_graph_seed() -> Snapshot {
    Snapshot::new(
        vec![node(
            "1",
            NodeKind::Input,
            250.0,
            0.0,
            NodeData::labeled("Contract Agreement")
                .with("details", "Root node for all contract elements")
                .with("type", "entity")
                .with("properties", json!({})),
        )],
        vec![],
    )
}

fn contract_template_seed() -> Snapshot {
    let described = |label: &str, description: &str| {
        NodeData::labeled(label).with("description", description)
    };

    let nodes = vec![
        node(
            "1",
            NodeKind::ContractTemplate,
            250.0,
            0.0,
            described("NDA Template", "Standard Non-Disclosure Agreement"),
        ),
        node(
            "2",
            NodeKind::Section,
            100.0,
            100.0,
            described("Introduction", "Parties and purpose"),
        ),
        node(
            "3",
            NodeKind::Section,
            400.0,
            100.0,
            described("Confidential Information", "Definition and scope"),
        ),
        node(
            "4",
            NodeKind::Clause,
            50.0,
            200.0,
            NodeData::labeled("Parties").with(
                "text",
                "This Agreement is between @CompanyName and @RecipientName",
            ),
        ),
        node(
            "5",
            NodeKind::Clause,
            350.0,
            200.0,
            NodeData::labeled("Definition")
                .with("text", "Confidential Information includes..."),
        ),
        node(
            "6",
            NodeKind::Variable,
            0.0,
            300.0,
            NodeData::labeled("@CompanyName").with("type", "String"),
        ),
        node(
            "7",
            NodeKind::Variable,
            150.0,
            300.0,
            NodeData::labeled("@RecipientName").with("type", "String"),
        ),
        node(
            "8",
            NodeKind::ConditionalLogic,
            500.0,
            300.0,
            NodeData::labeled("Include Legal Disclosure")
                .with("condition", "If @IncludeLegalDisclosure is true"),
        ),
        node(
            "9",
            NodeKind::UserJourney,
            0.0,
            400.0,
            described("User Sign Up", "User creates an account"),
        ),
        node(
            "10",
            NodeKind::UserJourney,
            200.0,
            400.0,
            described("Contract Generation", "AI generates personalized contract"),
        ),
        node(
            "11",
            NodeKind::UserJourney,
            400.0,
            400.0,
            described("Contract Delivery", "User receives final contract"),
        ),
        node(
            "12",
            NodeKind::Country,
            600.0,
            200.0,
            described("United States", "US-specific clauses"),
        ),
    ];

    let animated = EdgeStyle::default().animated();
    let step = EdgeStyle::new(EdgeKind::Step).with_arrow();
    let edges = [
        ("e1-2", "1", "2", animated),
        ("e1-3", "1", "3", animated),
        ("e2-4", "2", "4", animated),
        ("e3-5", "3", "5", animated),
        ("e4-6", "4", "6", animated),
        ("e4-7", "4", "7", animated),
        ("e3-8", "3", "8", animated),
        ("e9-10", "9", "10", step),
        ("e10-11", "10", "11", step),
        ("e1-12", "1", "12", animated),
    ]
    .into_iter()
    .map(|(id, source, target, style)| Edge::new(id, source, target, style))
    .collect();

    Snapshot::new(nodes, edges)
}
