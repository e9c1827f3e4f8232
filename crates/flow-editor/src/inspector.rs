use eframe::egui::{self, Ui};
use flow_graph::{Node, NodeData, NodeKind};
use serde_json::{Map, Value};

use crate::actions::Action;
use crate::canvas::ViewState;
use crate::node_shapes::KindStyle;
use crate::palette::{VALUE_KEY, Variant};
use crate::store::Store;

pub const ATTRIBUTE_TYPES: [&str; 5] =
    ["String", "Number", "Date", "Boolean", "Currency"];
const PROPERTIES_KEY: &str = "properties";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Stored value and caption for each choice of a select-style field.
pub fn value_choices(kind: NodeKind) -> &'static [(&'static str, &'static str)] {
    match kind {
        NodeKind::Options => &[
            ("", "Select an option"),
            ("opt1", "Option 1"),
            ("opt2", "Option 2"),
            ("opt3", "Option 3"),
        ],
        NodeKind::Footer => &[
            ("standard", "Standard Footer"),
            ("detailed", "Detailed Footer"),
            ("minimal", "Minimal Footer"),
        ],
        _ => &[],
    }
}

/// Whether `text` is a calendar date in `YYYY-MM-DD` form. Blank counts
/// as valid since the field is simply unanswered.
pub fn is_valid_date(text: &str) -> bool {
    text.is_empty()
        || chrono::NaiveDate::parse_from_str(text, DATE_FORMAT).is_ok()
}

/// Answer editor for privacy-policy form fields.
fn value_editor(ui: &mut Ui, node: &Node) -> Option<NodeData> {
    let current = node.data.get_str(VALUE_KEY).unwrap_or_default().to_owned();
    let mut value = current.clone();
    ui.label("Value");
    let changed = match node.kind {
        NodeKind::Header => ui.text_edit_singleline(&mut value).changed(),
        NodeKind::Clause => ui.text_edit_multiline(&mut value).changed(),
        NodeKind::Date => {
            let changed = ui
                .add(
                    egui::TextEdit::singleline(&mut value)
                        .hint_text("YYYY-MM-DD"),
                )
                .changed();
            if !is_valid_date(&value) {
                ui.colored_label(
                    ui.visuals().error_fg_color,
                    "Expected a date like 2024-05-01",
                );
            }
            changed
        }
        NodeKind::Options | NodeKind::Footer => {
            let choices = value_choices(node.kind);
            let caption = choices
                .iter()
                .find(|(stored, _)| *stored == current)
                .map_or(current.as_str(), |(_, caption)| caption);
            egui::ComboBox::from_id_salt(("form_value", node.id.as_str()))
                .selected_text(caption)
                .show_ui(ui, |ui| {
                    for (stored, caption) in choices {
                        ui.selectable_value(&mut value, (*stored).to_owned(), *caption);
                    }
                });
            value != current
        }
        _ => ui.text_edit_singleline(&mut value).changed(),
    };
    changed.then(|| NodeData::new().with(VALUE_KEY, value))
}

/// Payload key holding the free text shown under the label.
pub fn details_key(variant: Variant) -> &'static str {
    match variant {
        Variant::ContractTemplate => "description",
        Variant::PrivacyPolicy | Variant::KnowledgeGraph => "details",
    }
}

fn property<'a>(node: &'a Node, key: &str) -> Option<&'a Value> {
    node.data.get(PROPERTIES_KEY)?.as_object()?.get(key)
}

/// Patch replacing the nested `properties` object with one where `key`
/// is set. Sibling properties are carried over since patches merge
/// shallowly.
pub fn property_patch(node: &Node, key: &str, value: Value) -> NodeData {
    let mut properties: Map<String, Value> = node
        .data
        .get(PROPERTIES_KEY)
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();
    properties.insert(key.to_owned(), value);
    NodeData::new().with(PROPERTIES_KEY, Value::Object(properties))
}

fn has_item_bounds(kind: NodeKind) -> bool {
    matches!(kind, NodeKind::ComboBox | NodeKind::Multiplier)
}

/// Node edited by the inspector: the one last clicked if it still
/// exists, otherwise the first selected node.
pub fn inspected_node<'a>(
    store: &'a Store,
    view: &ViewState,
) -> Option<&'a Node> {
    let graph = store.graph.get();
    view.inspected
        .as_ref()
        .and_then(|id| graph.node(id))
        .or_else(|| graph.selected_nodes().into_iter().next())
}

pub fn show(ui: &mut Ui, store: &Store, view: &ViewState) -> Vec<Action> {
    let mut actions = Vec::new();
    ui.heading("Properties");
    ui.separator();

    let Some(node) = inspected_node(store, view) else {
        ui.label("Select a node to edit its properties");
        return actions;
    };
    let id = node.id.clone();

    ui.label(format!("{} · {}", node.kind.title(), node.id));
    ui.add_space(4.0);

    ui.label("Label");
    let mut label = node.label().to_owned();
    if ui.text_edit_singleline(&mut label).changed() {
        actions.push(Action::UpdateNodeData {
            id: id.clone(),
            patch: NodeData::labeled(label),
        });
    }

    let key = details_key(store.variant);
    ui.label("Details");
    let mut details = node.data.get_str(key).unwrap_or_default().to_owned();
    if ui.text_edit_multiline(&mut details).changed() {
        actions.push(Action::UpdateNodeData {
            id: id.clone(),
            patch: NodeData::new().with(key, details),
        });
    }

    if store.variant == Variant::PrivacyPolicy {
        if let Some(patch) = value_editor(ui, node) {
            actions.push(Action::UpdateNodeData {
                id: id.clone(),
                patch,
            });
        }
    }

    if node.kind == NodeKind::Attribute {
        let current = property(node, "type")
            .and_then(Value::as_str)
            .unwrap_or(ATTRIBUTE_TYPES[0])
            .to_owned();
        let mut selected = current.clone();
        ui.label("Type");
        egui::ComboBox::from_id_salt("attribute_type")
            .selected_text(&selected)
            .show_ui(ui, |ui| {
                for ty in ATTRIBUTE_TYPES {
                    ui.selectable_value(&mut selected, ty.to_owned(), ty);
                }
            });
        if selected != current {
            actions.push(Action::UpdateNodeData {
                id: id.clone(),
                patch: property_patch(node, "type", selected.into()),
            });
        }
    }

    if has_item_bounds(node.kind) {
        for (key, caption) in [("minItems", "Min Items"), ("maxItems", "Max Items")]
        {
            let mut value =
                property(node, key).and_then(Value::as_i64).unwrap_or(0);
            ui.horizontal(|ui| {
                ui.label(caption);
                if ui
                    .add(egui::DragValue::new(&mut value).range(0..=i64::MAX))
                    .changed()
                {
                    actions.push(Action::UpdateNodeData {
                        id: id.clone(),
                        patch: property_patch(node, key, value.into()),
                    });
                }
            });
        }
    }

    ui.add_space(8.0);
    if ui.button("Delete Node").clicked() {
        actions.push(Action::DeleteNode { id });
    }
    actions
}

#[cfg(test)]
mod tests {
    use super::*;
    use flow_graph::Position;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn multiplier() -> Node {
        Node::new(
            "n1",
            NodeKind::Multiplier,
            Position::new(0.0, 0.0),
            NodeData::labeled("Parties")
                .with("properties", json!({ "minItems": 1 })),
        )
    }

    #[test]
    fn property_patch_keeps_siblings() {
        let mut node = multiplier();
        let patch = property_patch(&node, "maxItems", json!(4));
        node.data.merge(patch);

        assert_eq!(
            node.data.get("properties"),
            Some(&json!({ "minItems": 1, "maxItems": 4 }))
        );
        assert_eq!(node.label(), "Parties");
    }

    #[test]
    fn property_patch_creates_missing_object() {
        let node = Node::new(
            "n2",
            NodeKind::Attribute,
            Position::new(0.0, 0.0),
            NodeData::labeled("Price"),
        );
        let patch = property_patch(&node, "type", json!("Currency"));
        assert_eq!(patch.get("properties"), Some(&json!({ "type": "Currency" })));
    }

    #[test]
    fn item_bounds_only_for_collections() {
        assert!(has_item_bounds(NodeKind::ComboBox));
        assert!(has_item_bounds(NodeKind::Multiplier));
        assert!(!has_item_bounds(NodeKind::Attribute));
    }

    #[test]
    fn inspected_falls_back_to_selection() {
        let mut store = Store::new(Variant::ContractTemplate);
        let mut view = ViewState::default();
        assert!(inspected_node(&store, &view).is_none());

        store.graph.get_mut().set_node_selected(&"4".into(), true);
        assert_eq!(inspected_node(&store, &view).unwrap().id.as_str(), "4");

        view.inspected = Some("7".into());
        assert_eq!(inspected_node(&store, &view).unwrap().id.as_str(), "7");

        // stale id after a delete
        view.inspected = Some("404".into());
        assert_eq!(inspected_node(&store, &view).unwrap().id.as_str(), "4");
    }

    #[test]
    fn select_fields_offer_fixed_choices() {
        let stored = |kind| -> Vec<&str> {
            value_choices(kind).iter().map(|(v, _)| *v).collect()
        };
        assert_eq!(stored(NodeKind::Options), vec!["", "opt1", "opt2", "opt3"]);
        assert_eq!(
            stored(NodeKind::Footer),
            vec!["standard", "detailed", "minimal"]
        );
        assert_eq!(value_choices(NodeKind::Footer)[1].1, "Detailed Footer");
        assert!(value_choices(NodeKind::Header).is_empty());
    }

    #[test]
    fn date_values_are_checked() {
        assert!(is_valid_date(""));
        assert!(is_valid_date("2024-02-29"));
        assert!(!is_valid_date("2023-02-29"));
        assert!(!is_valid_date("01/05/2024"));
    }
}
