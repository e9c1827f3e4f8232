use crate::store::Store;
use std::path::PathBuf;
use tracing::warn;

/// Deferred effects that must run outside the main reducer (e.g., file IO)
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Save current project to disk
    SaveToFile { path: PathBuf },
    /// Load a project from disk
    LoadFromFile { path: PathBuf },
}

/// Execute a single effect against the store
pub fn run(store: &mut Store, effect: Effect) {
    match effect {
        Effect::SaveToFile { path } => {
            if let Err(e) = store.save_to_file(&path) {
                warn!(path = %path.display(), error = %e, "save failed");
                store.error_message = Some(format!("Save failed: {e}"));
            }
        }
        Effect::LoadFromFile { path } => {
            if let Err(e) = store.load_from_file(&path) {
                warn!(path = %path.display(), error = %e, "load failed");
                store.error_message = Some(format!("Load failed: {e}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::Variant;

    #[test]
    fn failed_load_sets_error_message() {
        let mut store = Store::new(Variant::KnowledgeGraph);
        let path = std::env::temp_dir().join(format!(
            "flow_editor_effect_missing_{}.json",
            std::process::id()
        ));
        run(&mut store, Effect::LoadFromFile { path });

        let message = store.error_message.as_deref().unwrap();
        assert!(message.starts_with("Load failed"));
        assert_eq!(store.graph.get().node_count(), 1);
    }

    #[test]
    fn save_effect_writes_project() {
        let path = std::env::temp_dir().join(format!(
            "flow_editor_effect_save_{}.json",
            std::process::id()
        ));
        let mut store = Store::new(Variant::ContractTemplate);
        run(&mut store, Effect::SaveToFile { path: path.clone() });

        assert!(store.error_message.is_none());
        assert_eq!(store.project_path.as_deref(), Some(path.as_path()));
        assert!(path.exists());
        std::fs::remove_file(&path).ok();
    }
}
