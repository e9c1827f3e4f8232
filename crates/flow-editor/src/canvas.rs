use eframe::egui::{
    self, Color32, Key, Painter, Pos2, Rect, Sense, Shape, Stroke, Ui, Vec2,
};
use flow_graph::{Edge, EdgeKind, NodeId, NodeKind, Position};
use std::collections::HashMap;

use crate::actions::Action;
use crate::node_shapes::{NodeShape, SELECTED_STROKE_COLOR};
use crate::settings::EditorSettings;
use crate::store::Store;

// UI Constants
const EDGE_PREVIEW_STROKE_WIDTH: f32 = 2.0;
const EDGE_PREVIEW_COLOR: Color32 = Color32::from_rgb(100, 100, 255);
const EDGE_COLOR: Color32 = Color32::from_rgb(150, 150, 150);
const EDGE_HIT_DISTANCE: f32 = 6.0;
const ARROW_LENGTH: f32 = 10.0;
const DELETE_HANDLE_RADIUS: f32 = 8.0;
const DASH_LENGTH: f32 = 6.0;
const GAP_LENGTH: f32 = 4.0;
const SMOOTH_STEP_SAMPLES: usize = 16;
const PULSE_RADIUS: f32 = 3.0;

// ------------------------------------------------------------------
// View state
// ------------------------------------------------------------------

/// Presentation state owned by the app. None of it is part of the
/// project file.
#[derive(Debug, Default)]
pub struct ViewState {
    pub pan: Vec2,
    /// Node a ctrl-drag started from.
    pub connecting: Option<NodeId>,
    /// Node being moved, with the grab offset inside its box.
    pub dragging: Option<(NodeId, Vec2)>,
    /// Palette section expanded in the sidebar.
    pub open_section: Option<&'static str>,
    /// Node shown in the inspector.
    pub inspected: Option<NodeId>,
}

// ------------------------------------------------------------------
// Edge geometry
// ------------------------------------------------------------------

/// Screen-space polyline for an edge between two node boxes.
fn edge_path(
    kind: EdgeKind,
    source: &NodeShape,
    target: &NodeShape,
) -> Vec<Pos2> {
    match kind {
        EdgeKind::Default | EdgeKind::Custom => {
            let from = source.closest_boundary_point(target.rect.center());
            let to = target.closest_boundary_point(source.rect.center());
            vec![from, to]
        }
        EdgeKind::Step => {
            let from = source.rect.center_bottom();
            let to = target.rect.center_top();
            let mid_y = (from.y + to.y) / 2.0;
            vec![from, Pos2::new(from.x, mid_y), Pos2::new(to.x, mid_y), to]
        }
        EdgeKind::SmoothStep => {
            let from = source.rect.center_bottom();
            let to = target.rect.center_top();
            let bend = ((to.y - from.y).abs() / 2.0).max(20.0);
            let c1 = from + Vec2::new(0.0, bend);
            let c2 = to - Vec2::new(0.0, bend);
            (0..=SMOOTH_STEP_SAMPLES)
                .map(|i| {
                    let t = i as f32 / SMOOTH_STEP_SAMPLES as f32;
                    cubic_point(from, c1, c2, to, t)
                })
                .collect()
        }
    }
}

fn cubic_point(p0: Pos2, p1: Pos2, p2: Pos2, p3: Pos2, t: f32) -> Pos2 {
    let u = 1.0 - t;
    let v = p0.to_vec2() * (u * u * u)
        + p1.to_vec2() * (3.0 * u * u * t)
        + p2.to_vec2() * (3.0 * u * t * t)
        + p3.to_vec2() * (t * t * t);
    v.to_pos2()
}

pub(crate) fn distance_to_segment(p: Pos2, a: Pos2, b: Pos2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_sq();
    if len_sq == 0.0 {
        return (p - a).length();
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    (p - (a + ab * t)).length()
}

fn distance_to_path(p: Pos2, path: &[Pos2]) -> f32 {
    path.windows(2)
        .map(|w| distance_to_segment(p, w[0], w[1]))
        .fold(f32::INFINITY, f32::min)
}

/// Point at fraction `t` of the path's arc length.
pub(crate) fn point_along(path: &[Pos2], t: f32) -> Pos2 {
    let total: f32 = path.windows(2).map(|w| (w[1] - w[0]).length()).sum();
    let mut remaining = total * t.clamp(0.0, 1.0);
    for w in path.windows(2) {
        let len = (w[1] - w[0]).length();
        if remaining <= len && len > 0.0 {
            return w[0] + (w[1] - w[0]) * (remaining / len);
        }
        remaining -= len;
    }
    path.last().copied().unwrap_or(Pos2::ZERO)
}

// topmost node wins
fn node_at<'s, 'n>(
    shapes: &'s [NodeShape<'n>],
    pos: Pos2,
) -> Option<&'s NodeShape<'n>> {
    shapes.iter().rev().find(|shape| shape.is_inside(pos))
}

fn edge_at<'s, 'e>(
    edges: &'s [EdgeShape<'e>],
    pos: Pos2,
) -> Option<&'s EdgeShape<'e>> {
    edges
        .iter()
        .find(|e| distance_to_path(pos, &e.path) <= EDGE_HIT_DISTANCE)
}

struct EdgeShape<'a> {
    edge: &'a Edge,
    path: Vec<Pos2>,
}

impl EdgeShape<'_> {
    fn delete_handle(&self) -> Option<Pos2> {
        (self.edge.style.kind == EdgeKind::Custom)
            .then(|| point_along(&self.path, 0.5))
    }

    fn paint(&self, painter: &Painter, settings: &EditorSettings, time: f64) {
        let color = if self.edge.selected {
            SELECTED_STROKE_COLOR
        } else {
            EDGE_COLOR
        };
        let stroke = Stroke::new(settings.edges.width, color);

        if self.edge.style.kind == EdgeKind::Custom {
            painter.extend(Shape::dashed_line(
                &self.path,
                stroke,
                DASH_LENGTH,
                GAP_LENGTH,
            ));
        } else {
            painter.add(Shape::line(self.path.clone(), stroke));
        }

        if self.edge.style.animated {
            let t = (time * 0.5).fract() as f32;
            painter.circle_filled(
                point_along(&self.path, t),
                PULSE_RADIUS,
                color,
            );
        }

        if self.edge.style.arrow_end
            && let [.., before, last] = self.path.as_slice()
        {
            let dir = (*last - *before).normalized();
            let normal = Vec2::new(-dir.y, dir.x);
            let back = *last - dir * ARROW_LENGTH;
            painter.add(Shape::convex_polygon(
                vec![
                    *last,
                    back + normal * ARROW_LENGTH / 2.0,
                    back - normal * ARROW_LENGTH / 2.0,
                ],
                color,
                Stroke::NONE,
            ));
        }

        if let Some(center) = self.delete_handle() {
            painter.circle(
                center,
                DELETE_HANDLE_RADIUS,
                Color32::WHITE,
                Stroke::new(1.0, color),
            );
            painter.text(
                center,
                egui::Align2::CENTER_CENTER,
                "×",
                egui::FontId::proportional(DELETE_HANDLE_RADIUS * 1.5),
                color,
            );
        }
    }
}

// ------------------------------------------------------------------
// Canvas
// ------------------------------------------------------------------

/// Draw the graph and translate this frame's gestures into actions.
pub fn show(
    ui: &mut Ui,
    store: &Store,
    view: &mut ViewState,
) -> Vec<Action> {
    let mut actions = Vec::new();
    let (response, painter) =
        ui.allocate_painter(ui.available_size(), Sense::click_and_drag());
    let origin = response.rect.min + view.pan;
    let graph = store.graph.get();
    let settings = &store.settings;

    let shapes: Vec<NodeShape> = graph
        .nodes()
        .into_iter()
        .map(|node| NodeShape::new(node, origin, &settings.nodes))
        .collect();
    let by_id: HashMap<&NodeId, usize> = shapes
        .iter()
        .enumerate()
        .map(|(i, shape)| (&shape.node.id, i))
        .collect();
    let edges: Vec<EdgeShape> = graph
        .edges()
        .into_iter()
        .filter_map(|edge| {
            let source = &shapes[*by_id.get(&edge.source)?];
            let target = &shapes[*by_id.get(&edge.target)?];
            Some(EdgeShape {
                edge,
                path: edge_path(edge.style.kind, source, target),
            })
        })
        .collect();

    // Painting
    painter.rect_filled(
        response.rect,
        0.0,
        ui.visuals().extreme_bg_color,
    );
    let time = ui.input(|i| i.time);
    for edge in &edges {
        edge.paint(&painter, settings, time);
    }
    for shape in &shapes {
        shape.paint(&painter, &settings.nodes);
    }
    if edges.iter().any(|e| e.edge.style.animated) {
        ui.ctx().request_repaint();
    }

    // Gestures
    let modifiers = ui.input(|i| i.modifiers);
    let pointer = response.interact_pointer_pos();

    if response.drag_started() {
        let start = ui.input(|i| i.pointer.press_origin()).or(pointer);
        match start.and_then(|pos| node_at(&shapes, pos).map(|s| (pos, s))) {
            Some((_, shape)) if modifiers.ctrl || modifiers.command => {
                view.connecting = Some(shape.node.id.clone());
            }
            Some((pos, shape)) => {
                view.dragging =
                    Some((shape.node.id.clone(), pos - shape.rect.min));
            }
            None => {}
        }
    }

    if response.dragged() {
        if let (Some((id, grab)), Some(pos)) = (&view.dragging, pointer) {
            let min = pos - *grab - origin;
            actions.push(Action::MoveNode {
                id: id.clone(),
                position: Position::new(min.x, min.y),
            });
        } else if let (Some(from), Some(pos)) = (&view.connecting, pointer) {
            if let Some(&i) = by_id.get(from) {
                painter.line_segment(
                    [shapes[i].rect.center(), pos],
                    Stroke::new(EDGE_PREVIEW_STROKE_WIDTH, EDGE_PREVIEW_COLOR),
                );
            }
        } else {
            view.pan += response.drag_delta();
        }
    }

    if response.drag_stopped() {
        if let Some(from) = view.connecting.take()
            && let Some(target) = pointer.and_then(|pos| node_at(&shapes, pos))
            && target.node.id != from
        {
            actions.push(Action::Connect {
                source: from,
                target: target.node.id.clone(),
            });
        }
        view.dragging = None;
    }

    if response.clicked()
        && let Some(pos) = pointer
    {
        let extend = modifiers.shift;
        let handle_hit = edges.iter().find(|e| {
            e.delete_handle()
                .is_some_and(|c| (pos - c).length() <= DELETE_HANDLE_RADIUS)
        });
        if let Some(edge) = handle_hit {
            actions.push(Action::DeleteEdge {
                id: edge.edge.id.clone(),
            });
        } else if let Some(shape) = node_at(&shapes, pos) {
            actions.push(Action::SelectNode {
                id: shape.node.id.clone(),
                selected: !(extend && shape.node.selected),
                extend,
            });
            view.inspected = Some(shape.node.id.clone());
        } else if let Some(edge) = edge_at(&edges, pos) {
            actions.push(Action::SelectEdge {
                id: edge.edge.id.clone(),
                selected: !(extend && edge.edge.selected),
                extend,
            });
        } else {
            actions.push(Action::ClearSelection);
            view.inspected = None;
        }
    }

    // Palette drops carry the node kind as payload
    if let Some(kind) = response.dnd_release_payload::<NodeKind>()
        && let Some(pos) = ui.input(|i| i.pointer.hover_pos())
    {
        let at = pos - origin;
        actions.push(Action::AddNodeFromPalette {
            kind: *kind,
            position: Some(Position::new(at.x, at.y)),
            label: None,
            description: None,
        });
    }

    let delete_pressed = ui.input(|i| {
        i.key_pressed(Key::Delete) || i.key_pressed(Key::Backspace)
    });
    if delete_pressed && !ui.ctx().wants_keyboard_input() {
        actions.push(Action::DeleteSelected);
    }

    paint_hint(&painter, response.rect);
    actions
}

fn paint_hint(painter: &Painter, rect: Rect) {
    painter.text(
        rect.left_bottom() + Vec2::new(8.0, -8.0),
        egui::Align2::LEFT_BOTTOM,
        "Drag to move · Ctrl-drag to connect · Shift-click to extend · Del to delete",
        egui::FontId::proportional(11.0),
        Color32::GRAY,
    );
}
