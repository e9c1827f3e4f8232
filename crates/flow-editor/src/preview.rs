use eframe::egui::{self, RichText, Ui};
use flow_graph::{FlowGraph, NodeId};
use serde_json::Value;

use crate::palette::VALUE_KEY;

const EMPTY_VALUE: &str = "Not set";
const PANEL_MAX_HEIGHT: f32 = 220.0;

/// One line of the form preview.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewRow {
    pub id: NodeId,
    pub label: String,
    pub value: Option<String>,
}

impl PreviewRow {
    pub fn display_value(&self) -> &str {
        self.value.as_deref().unwrap_or(EMPTY_VALUE)
    }
}

/// Form rows in reading order: top to bottom by node position, ties
/// kept in insertion order.
pub fn form_rows(graph: &FlowGraph) -> Vec<PreviewRow> {
    let mut nodes = graph.nodes();
    nodes.sort_by(|a, b| a.position.y.total_cmp(&b.position.y));
    nodes
        .into_iter()
        .map(|node| PreviewRow {
            id: node.id.clone(),
            label: node.label().to_owned(),
            value: node.data.get(VALUE_KEY).and_then(answer),
        })
        .collect()
}

/// Blank strings and nulls count as unanswered.
fn answer(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

pub fn show(ui: &mut Ui, graph: &FlowGraph) {
    ui.heading("Form Preview");
    egui::ScrollArea::vertical()
        .max_height(PANEL_MAX_HEIGHT)
        .show(ui, |ui| {
            let rows = form_rows(graph);
            if rows.is_empty() {
                ui.label(RichText::new("Drag fields onto the canvas").weak());
            }
            for row in rows {
                egui::Frame::group(ui.style()).show(ui, |ui| {
                    ui.horizontal_wrapped(|ui| {
                        ui.label(RichText::new(format!("{}:", row.label)).strong());
                        ui.label(row.display_value());
                    });
                });
            }
        });
}
