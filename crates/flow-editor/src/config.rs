use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::palette::Variant;
use crate::store::Store;

pub const PROJECT_ENV: &str = "FLOW_EDITOR_PROJECT";
pub const VARIANT_ENV: &str = "FLOW_EDITOR_VARIANT";
pub const DEFAULT_PROJECT: &str = "flow.json";

/// Where the editor starts: the project file to open and the variant
/// seeded when that file does not exist yet.
#[derive(Debug, Clone, PartialEq)]
pub struct StartupConfig {
    pub project: PathBuf,
    pub variant: Variant,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            project: PathBuf::from(DEFAULT_PROJECT),
            variant: Variant::default(),
        }
    }
}

impl StartupConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. An unknown variant is logged and
    /// replaced by the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(project) = lookup(PROJECT_ENV).filter(|p| !p.is_empty()) {
            config.project = PathBuf::from(project);
        }
        if let Some(raw) = lookup(VARIANT_ENV) {
            match raw.parse() {
                Ok(variant) => config.variant = variant,
                Err(e) => warn!(error = %e, "ignoring {VARIANT_ENV}"),
            }
        }
        config
    }

    /// Open the configured project, or seed a fresh session that will
    /// save to that path. A broken project file is reported in the UI
    /// and left untouched on disk until the user saves.
    pub fn open_store(&self) -> Store {
        if !self.project.exists() {
            info!(
                path = %self.project.display(),
                variant = self.variant.as_str(),
                "no project file, starting from seed"
            );
            return fresh_store(self.variant, &self.project);
        }

        match Store::from_file(&self.project) {
            Ok(store) => store,
            Err(e) => {
                warn!(path = %self.project.display(), error = %e, "project load failed");
                let mut store = fresh_store(self.variant, &self.project);
                store.error_message = Some(format!(
                    "Could not open {}: {e}",
                    self.project.display()
                ));
                store
            }
        }
    }
}

fn fresh_store(variant: Variant, project: &Path) -> Store {
    let mut store = Store::new(variant);
    store.project_path = Some(project.to_path_buf());
    store
}
