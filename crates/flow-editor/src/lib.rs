pub mod actions;
pub mod app;
pub mod cache;
pub mod canvas;
pub mod config;
pub mod effects;
pub mod inspector;
pub mod native;
pub mod node_shapes;
pub mod palette;
pub mod preview;
pub mod seed;
pub mod serialization;
pub mod settings;
pub mod state;
pub mod store;
pub mod versioned;

pub use app::FlowEditorApp;
pub use palette::Variant;
pub use store::Store;

/// Build the editor around an already opened session.
pub fn create_app(
    _cc: &eframe::CreationContext<'_>,
    store: Store,
) -> FlowEditorApp {
    FlowEditorApp::new(store)
}
