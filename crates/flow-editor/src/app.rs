use eframe::egui::{self, RichText, Ui};
use std::path::PathBuf;

use crate::actions::Action;
use crate::canvas::{self, ViewState};
use crate::inspector;
use crate::palette::Variant;
use crate::preview;
use crate::settings::{
    EDGE_WIDTH_RANGE, EditorSettings, LABEL_FONT_RANGE, NODE_HEIGHT_RANGE,
    NODE_WIDTH_RANGE, SPAWN_EXTENT_RANGE, SliderRange,
};
use crate::state::State;
use crate::store::Store;

const SIDE_PANEL_WIDTH: f32 = 240.0;
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub struct FlowEditorApp {
    state: State,
    view: ViewState,
    /// Name and description typed above the contract-template palette.
    palette_label: String,
    palette_description: String,
}

impl FlowEditorApp {
    pub fn new(store: Store) -> Self {
        Self {
            state: State::new(store),
            view: ViewState::default(),
            palette_label: String::new(),
            palette_description: String::new(),
        }
    }

    fn store(&self) -> &Store {
        &self.state.store
    }

    // ------------------------------------------------------------------
    // Panels
    // ------------------------------------------------------------------

    fn menu_bar(&mut self, ui: &mut Ui) -> Vec<Action> {
        let mut actions = Vec::new();
        egui::MenuBar::new().ui(ui, |ui| {
            ui.menu_button("File", |ui| {
                ui.menu_button("New", |ui| {
                    for variant in Variant::ALL {
                        if ui.button(variant.to_string()).clicked() {
                            ui.close();
                            self.view = ViewState::default();
                            actions.push(Action::SwitchVariant { variant });
                        }
                    }
                });

                if ui.button("Save").clicked() {
                    ui.close();
                    if let Some(path) = self.save_path() {
                        actions.push(Action::SaveToFile { path });
                    }
                }

                if ui.button("Save As…").clicked() {
                    ui.close();
                    if let Some(path) = rfd::FileDialog::new()
                        .add_filter("JSON", &["json"])
                        .save_file()
                    {
                        actions.push(Action::SaveToFile { path });
                    }
                }

                if ui.button("Load").clicked() {
                    ui.close();
                    if let Some(path) = rfd::FileDialog::new()
                        .add_filter("JSON", &["json"])
                        .pick_file()
                    {
                        self.view = ViewState::default();
                        actions.push(Action::LoadFromFile { path });
                    }
                }
            });

            ui.menu_button("View", |ui| {
                let mut show = self.store().settings.nodes.show_labels;
                if ui.checkbox(&mut show, "Show Labels").changed() {
                    actions.push(Action::SetShowLabels { show });
                }
                ui.separator();
                if let Some(settings) = settings_sliders(ui, &self.store().settings)
                {
                    actions.push(Action::UpdateSettings { settings });
                }
                if ui.button("Reset View").clicked() {
                    ui.close();
                    self.view.pan = egui::Vec2::ZERO;
                }
            });
        });
        actions
    }

    /// Current project file, or a fresh pick when the session has none.
    fn save_path(&self) -> Option<PathBuf> {
        self.store().project_path.clone().or_else(|| {
            rfd::FileDialog::new()
                .add_filter("JSON", &["json"])
                .save_file()
        })
    }

    fn version_bar(&mut self, ui: &mut Ui) -> Vec<Action> {
        let mut actions = Vec::new();
        let history = &self.state.store.history;
        ui.horizontal(|ui| {
            ui.label(RichText::new(self.state.store.variant.to_string()).strong());
            ui.separator();
            ui.label("Version");

            let current = history.current();
            let mut selected = current;
            egui::ComboBox::from_id_salt("version_select")
                .selected_text(format!("v{current}"))
                .show_ui(ui, |ui| {
                    for version in history.versions() {
                        ui.selectable_value(
                            &mut selected,
                            version.id,
                            format!(
                                "v{} · {}",
                                version.id,
                                version.saved_at.format(TIMESTAMP_FORMAT)
                            ),
                        );
                    }
                });
            if selected != current {
                actions.push(Action::LoadVersion { id: selected });
            }

            if ui.button("Save Version").clicked() {
                actions.push(Action::SaveVersion);
            }
        });
        actions
    }

    fn palette_panel(&mut self, ui: &mut Ui) -> Vec<Action> {
        let mut actions = Vec::new();
        let variant = self.state.store.variant;
        let palette = variant.palette();

        ui.heading(palette.title);
        ui.separator();

        if variant == Variant::ContractTemplate {
            ui.label("Name");
            ui.text_edit_singleline(&mut self.palette_label);
            ui.label("Description");
            ui.text_edit_multiline(&mut self.palette_description);
            ui.separator();
        }

        egui::ScrollArea::vertical().show(ui, |ui| {
            for section in &palette.sections {
                let open = self.view.open_section == Some(section.title);
                let header = egui::CollapsingHeader::new(section.title)
                    .open(Some(open))
                    .show(ui, |ui| {
                        for entry in &section.entries {
                            ui.horizontal(|ui| {
                                ui.dnd_drag_source(
                                    egui::Id::new(("palette", entry.kind.as_str())),
                                    entry.kind,
                                    |ui| {
                                        ui.label(RichText::new(entry.label).strong())
                                    },
                                )
                                .response
                                .on_hover_text(entry.description);

                                let add = ui
                                    .small_button("+")
                                    .on_hover_text(entry.properties.join(", "));
                                if add.clicked() {
                                    let (label, description) =
                                        if variant == Variant::ContractTemplate {
                                            (
                                                Some(std::mem::take(
                                                    &mut self.palette_label,
                                                )),
                                                Some(std::mem::take(
                                                    &mut self.palette_description,
                                                )),
                                            )
                                        } else {
                                            (None, None)
                                        };
                                    actions.push(Action::AddNodeFromPalette {
                                        kind: entry.kind,
                                        position: None,
                                        label,
                                        description,
                                    });
                                }
                            });
                            ui.label(
                                RichText::new(entry.description).small().weak(),
                            );
                        }
                    });
                if header.header_response.clicked() {
                    self.view.open_section =
                        if open { None } else { Some(section.title) };
                }
            }
        });
        actions
    }

    fn status_bar(&mut self, ui: &mut Ui) {
        let stats = self.state.stats().clone();
        let store = &self.state.store;
        ui.horizontal(|ui| {
            ui.label(format!("Nodes: {}", stats.nodes));
            ui.separator();
            ui.label(format!("Edges: {}", stats.edges));
            ui.separator();
            ui.label(format!("Selected: {}", stats.selected));
            ui.separator();
            let kinds: Vec<String> = stats
                .per_kind
                .iter()
                .map(|(kind, count)| format!("{kind} {count}"))
                .collect();
            ui.label(RichText::new(kinds.join(" · ")).weak());

            ui.with_layout(
                egui::Layout::right_to_left(egui::Align::Center),
                |ui| {
                    if store.is_dirty() {
                        ui.label(RichText::new("● unsaved").italics());
                    }
                    if let Some(path) = &store.project_path {
                        ui.label(path.display().to_string());
                    }
                },
            );
        });
    }
}

fn slider(ui: &mut Ui, value: &mut f32, range: SliderRange, text: &str) -> bool {
    ui.add(
        egui::Slider::new(value, range.min..=range.max)
            .step_by(range.step as f64)
            .text(text),
    )
    .changed()
}

/// Edited copy of `current` when any slider moved this frame.
fn settings_sliders(ui: &mut Ui, current: &EditorSettings) -> Option<EditorSettings> {
    let mut settings = current.clone();
    let mut changed = false;
    changed |= slider(ui, &mut settings.nodes.width, NODE_WIDTH_RANGE, "Node width");
    changed |=
        slider(ui, &mut settings.nodes.height, NODE_HEIGHT_RANGE, "Node height");
    changed |= slider(
        ui,
        &mut settings.nodes.label_font_size,
        LABEL_FONT_RANGE,
        "Label size",
    );
    changed |= slider(ui, &mut settings.edges.width, EDGE_WIDTH_RANGE, "Edge width");
    changed |=
        slider(ui, &mut settings.spawn.width, SPAWN_EXTENT_RANGE, "Spawn width");
    changed |=
        slider(ui, &mut settings.spawn.height, SPAWN_EXTENT_RANGE, "Spawn height");
    changed.then_some(settings)
}

impl eframe::App for FlowEditorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut actions = Vec::new();

        // Menu bar at the very top
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            actions.extend(self.menu_bar(ui));
        });

        egui::TopBottomPanel::top("versions").show(ctx, |ui| {
            actions.extend(self.version_bar(ui));
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            self.status_bar(ui);
        });

        if self.state.store.variant == Variant::PrivacyPolicy {
            egui::TopBottomPanel::bottom("form_preview")
                .resizable(true)
                .show(ctx, |ui| {
                    preview::show(ui, self.state.store.graph.get());
                });
        }

        egui::SidePanel::left("palette_panel")
            .default_width(SIDE_PANEL_WIDTH)
            .frame(egui::Frame::side_top_panel(&ctx.style()).inner_margin(8.0))
            .show(ctx, |ui| {
                actions.extend(self.palette_panel(ui));
            });

        egui::SidePanel::right("inspector_panel")
            .default_width(SIDE_PANEL_WIDTH)
            .frame(egui::Frame::side_top_panel(&ctx.style()).inner_margin(8.0))
            .show(ctx, |ui| {
                actions.extend(inspector::show(ui, &self.state.store, &self.view));
            });

        egui::CentralPanel::default()
            .frame(egui::Frame::central_panel(&ctx.style()).inner_margin(0.0))
            .show(ctx, |ui| {
                actions.extend(canvas::show(ui, &self.state.store, &mut self.view));
            });

        // Display error dialog if there's an error message
        if let Some(error) = self.state.store.error_message.clone() {
            egui::Window::new("Error")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.label(&error);
                    if ui.button("OK").clicked() {
                        actions.push(Action::ClearErrorMessage);
                    }
                });
        }

        for action in actions {
            self.state.dispatch(action);
        }
        self.state.flush_actions();
        self.state.flush_effects();
    }
}
