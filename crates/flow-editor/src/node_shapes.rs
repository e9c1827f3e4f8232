use eframe::egui::{
    self, Color32, CornerRadius, FontFamily, FontId, Painter, Pos2, Rect,
    Stroke, StrokeKind, Vec2,
};
use flow_graph::{Node, NodeKind};

use crate::settings::NodeVisualSettings;

const SELECTED_STROKE_WIDTH: f32 = 3.0;
const STROKE_WIDTH: f32 = 1.5;
const CORNER_RADIUS: u8 = 6;
const TITLE_FONT: f32 = 10.0;
pub(crate) const SELECTED_STROKE_COLOR: Color32 = Color32::from_rgb(200, 60, 70);

// ------------------------------------------------------------------
// Kind styling
// ------------------------------------------------------------------

/// How a node kind looks on the canvas. Lives in the view layer so the
/// model crate stays free of rendering types.
pub trait KindStyle {
    fn fill(&self) -> Color32;
    fn stroke(&self) -> Color32;
    /// Small caption drawn above the label.
    fn title(&self) -> &'static str;
}

#[derive(Clone, Copy)]
enum Accent {
    Blue,
    Green,
    Yellow,
    Purple,
    Red,
    Orange,
    Indigo,
    Gray,
    Tableau(usize),
}

impl Accent {
    /// (fill, border) pairs in the light/strong tones of the web palette.
    fn colors(self) -> (Color32, Color32) {
        match self {
            Accent::Blue => (
                Color32::from_rgb(219, 234, 254),
                Color32::from_rgb(59, 130, 246),
            ),
            Accent::Green => (
                Color32::from_rgb(220, 252, 231),
                Color32::from_rgb(34, 197, 94),
            ),
            Accent::Yellow => (
                Color32::from_rgb(254, 249, 195),
                Color32::from_rgb(234, 179, 8),
            ),
            Accent::Purple => (
                Color32::from_rgb(243, 232, 255),
                Color32::from_rgb(168, 85, 247),
            ),
            Accent::Red => (
                Color32::from_rgb(254, 226, 226),
                Color32::from_rgb(239, 68, 68),
            ),
            Accent::Orange => (
                Color32::from_rgb(255, 237, 213),
                Color32::from_rgb(249, 115, 22),
            ),
            Accent::Indigo => (
                Color32::from_rgb(224, 231, 255),
                Color32::from_rgb(99, 102, 241),
            ),
            Accent::Gray => (
                Color32::from_rgb(243, 244, 246),
                Color32::from_rgb(107, 114, 128),
            ),
            Accent::Tableau(i) => {
                let c = colorous::TABLEAU10[i % colorous::TABLEAU10.len()];
                let tint = |v: u8| v + ((255 - v) as f32 * 0.75) as u8;
                (
                    Color32::from_rgb(tint(c.r), tint(c.g), tint(c.b)),
                    Color32::from_rgb(c.r, c.g, c.b),
                )
            }
        }
    }
}

fn accent(kind: NodeKind) -> Accent {
    match kind {
        // privacy policy canvas
        NodeKind::Header => Accent::Blue,
        NodeKind::Clause => Accent::Green,
        NodeKind::Options => Accent::Yellow,
        NodeKind::Date => Accent::Purple,
        NodeKind::Footer => Accent::Gray,
        // knowledge graph
        NodeKind::Input => Accent::Tableau(0),
        NodeKind::Entity => Accent::Tableau(1),
        NodeKind::Attribute => Accent::Tableau(2),
        NodeKind::ComboBox => Accent::Tableau(3),
        NodeKind::ExclusiveBox => Accent::Tableau(4),
        NodeKind::Choice => Accent::Tableau(5),
        NodeKind::Group => Accent::Tableau(6),
        NodeKind::Multiplier => Accent::Tableau(8),
        // contract templates
        NodeKind::ContractTemplate => Accent::Blue,
        NodeKind::Section => Accent::Green,
        NodeKind::Variable => Accent::Purple,
        NodeKind::ConditionalLogic => Accent::Orange,
        NodeKind::UserJourney => Accent::Indigo,
        NodeKind::Country => Accent::Red,
        NodeKind::Custom => Accent::Gray,
    }
}

impl KindStyle for NodeKind {
    fn fill(&self) -> Color32 {
        accent(*self).colors().0
    }

    fn stroke(&self) -> Color32 {
        accent(*self).colors().1
    }

    fn title(&self) -> &'static str {
        match self {
            NodeKind::Header => "Header",
            NodeKind::Clause => "Clause",
            NodeKind::Options => "Options",
            NodeKind::Date => "Date",
            NodeKind::Footer => "Footer",
            NodeKind::Input => "Input",
            NodeKind::Entity => "Entity",
            NodeKind::Attribute => "Attribute",
            NodeKind::ComboBox => "Combo Box",
            NodeKind::ExclusiveBox => "Exclusive Box",
            NodeKind::Choice => "Option",
            NodeKind::Group => "Group",
            NodeKind::Multiplier => "Multiplier",
            NodeKind::ContractTemplate => "Contract Template",
            NodeKind::Section => "Section",
            NodeKind::Variable => "Variable",
            NodeKind::ConditionalLogic => "Conditional Logic",
            NodeKind::UserJourney => "User Journey",
            NodeKind::Country => "Country",
            NodeKind::Custom => "Custom",
        }
    }
}

/// Black on light backgrounds, white on dark ones.
pub fn contrasting_text_color(bg: Color32) -> Color32 {
    let r = bg.r() as f32 / 255.0;
    let g = bg.g() as f32 / 255.0;
    let b = bg.b() as f32 / 255.0;
    let luminance = 0.299 * r + 0.587 * g + 0.114 * b;
    if luminance > 0.5 {
        Color32::BLACK
    } else {
        Color32::WHITE
    }
}

// ------------------------------------------------------------------
// Node box
// ------------------------------------------------------------------

/// Screen-space box of one node. The model position is the top-left
/// corner, offset by the canvas pan.
pub struct NodeShape<'a> {
    pub node: &'a Node,
    pub rect: Rect,
}

impl<'a> NodeShape<'a> {
    pub fn new(
        node: &'a Node,
        origin: Pos2,
        visuals: &NodeVisualSettings,
    ) -> Self {
        let min = origin + Vec2::new(node.position.x, node.position.y);
        let rect =
            Rect::from_min_size(min, Vec2::new(visuals.width, visuals.height));
        Self { node, rect }
    }

    pub fn is_inside(&self, pos: Pos2) -> bool {
        self.rect.contains(pos)
    }

    /// Point where an edge heading towards `toward` leaves the box.
    pub fn closest_boundary_point(&self, toward: Pos2) -> Pos2 {
        let center = self.rect.center();
        let dir = toward - center;
        if dir.x == 0.0 && dir.y == 0.0 {
            return center;
        }
        let half = self.rect.size() / 2.0;
        let tx = if dir.x != 0.0 {
            half.x / dir.x.abs()
        } else {
            f32::INFINITY
        };
        let ty = if dir.y != 0.0 {
            half.y / dir.y.abs()
        } else {
            f32::INFINITY
        };
        center + dir * tx.min(ty)
    }

    pub fn paint(&self, painter: &Painter, visuals: &NodeVisualSettings) {
        let kind = self.node.kind;
        let stroke = if self.node.selected {
            Stroke::new(SELECTED_STROKE_WIDTH, SELECTED_STROKE_COLOR)
        } else {
            Stroke::new(STROKE_WIDTH, kind.stroke())
        };
        painter.rect(
            self.rect,
            CornerRadius::same(CORNER_RADIUS),
            kind.fill(),
            stroke,
            StrokeKind::Inside,
        );

        let text_color = contrasting_text_color(kind.fill());
        painter.text(
            self.rect.left_top() + Vec2::new(8.0, 4.0),
            egui::Align2::LEFT_TOP,
            kind.title(),
            FontId::new(TITLE_FONT, FontFamily::Proportional),
            kind.stroke(),
        );

        if !visuals.show_labels && !self.node.selected {
            return;
        }
        painter.text(
            self.rect.center() + Vec2::new(0.0, TITLE_FONT / 2.0),
            egui::Align2::CENTER_CENTER,
            self.node.label(),
            FontId::new(visuals.label_font_size, FontFamily::Proportional),
            text_color,
        );
    }
}
