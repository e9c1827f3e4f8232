use serde::{Deserialize, Serialize};

/// Common slider metadata so bounds live in one place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderRange {
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl SliderRange {
    pub const fn new(min: f32, max: f32, step: f32) -> Self {
        Self { min, max, step }
    }

    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }
}

// Visual ranges
pub const NODE_WIDTH_RANGE: SliderRange =
    SliderRange::new(80.0, 320.0, 5.0);
pub const NODE_HEIGHT_RANGE: SliderRange =
    SliderRange::new(28.0, 120.0, 2.0);
pub const LABEL_FONT_RANGE: SliderRange =
    SliderRange::new(8.0, 32.0, 1.0);
pub const EDGE_WIDTH_RANGE: SliderRange =
    SliderRange::new(0.5, 6.0, 0.1);

// Placement ranges
pub const SPAWN_EXTENT_RANGE: SliderRange =
    SliderRange::new(50.0, 1000.0, 10.0);

/// Editor preferences, stored alongside the graph in project files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    pub nodes: NodeVisualSettings,
    pub edges: EdgeVisualSettings,
    pub spawn: SpawnArea,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            nodes: NodeVisualSettings::default(),
            edges: EdgeVisualSettings::default(),
            spawn: SpawnArea::default(),
        }
    }
}

impl EditorSettings {
    /// Pull every value back inside its slider range. Used after loading
    /// a hand-edited project file.
    pub fn clamped(mut self) -> Self {
        self.nodes.width = NODE_WIDTH_RANGE.clamp(self.nodes.width);
        self.nodes.height = NODE_HEIGHT_RANGE.clamp(self.nodes.height);
        self.nodes.label_font_size =
            LABEL_FONT_RANGE.clamp(self.nodes.label_font_size);
        self.edges.width = EDGE_WIDTH_RANGE.clamp(self.edges.width);
        self.spawn.width = SPAWN_EXTENT_RANGE.clamp(self.spawn.width);
        self.spawn.height = SPAWN_EXTENT_RANGE.clamp(self.spawn.height);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeVisualSettings {
    pub width: f32,
    pub height: f32,
    pub label_font_size: f32,
    pub show_labels: bool,
}

impl Default for NodeVisualSettings {
    fn default() -> Self {
        Self {
            width: 180.0,
            height: 48.0,
            label_font_size: 14.0,
            show_labels: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeVisualSettings {
    pub width: f32,
}

impl Default for EdgeVisualSettings {
    fn default() -> Self {
        Self { width: 1.5 }
    }
}

/// Rectangle new palette nodes are scattered over when no drop
/// position is given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnArea {
    pub width: f32,
    pub height: f32,
}

impl Default for SpawnArea {
    fn default() -> Self {
        Self {
            width: 400.0,
            height: 400.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_settings_fill_defaults() {
        let settings: EditorSettings =
            serde_json::from_str(r#"{ "nodes": { "width": 220.0 } }"#)
                .unwrap();
        assert_eq!(settings.nodes.width, 220.0);
        assert_eq!(settings.nodes.height, 48.0);
        assert_eq!(settings.edges, EdgeVisualSettings::default());
    }

    #[test]
    fn clamped_pulls_values_into_range() {
        let mut settings = EditorSettings::default();
        settings.nodes.width = 10_000.0;
        settings.edges.width = 0.0;
        let settings = settings.clamped();
        assert_eq!(settings.nodes.width, NODE_WIDTH_RANGE.max);
        assert_eq!(settings.edges.width, EDGE_WIDTH_RANGE.min);
    }
}
