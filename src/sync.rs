//! Sync bundle: the whole configuration as text, for copying between deployments

use crate::models::{BrandingConfig, ImageRef, Snapshot, Template};
use crate::repository::transient_fields;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Field order here is the order in the exported text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncBundle {
    pub templates: Vec<Template>,
    #[serde(default)]
    pub site_logo: String,
    #[serde(default)]
    pub play_store_url: String,
    #[serde(default)]
    pub app_store_url: String,
    pub prompt: String,
}

impl SyncBundle {
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        Self {
            templates: snapshot.templates.clone(),
            site_logo: snapshot
                .branding
                .logo
                .as_ref()
                .map(|logo| logo.as_str().to_string())
                .unwrap_or_default(),
            play_store_url: snapshot.branding.play_store_url.clone(),
            app_store_url: snapshot.branding.app_store_url.clone(),
            prompt: snapshot.prompt.clone(),
        }
    }

    /// Pretty JSON; identical snapshots give identical text.
    pub fn to_text(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn parse(text: &str) -> Result<Self, String> {
        serde_json::from_str(text).map_err(|e| e.to_string())
    }

    /// Converts to a snapshot, refusing bundles that could not have come from
    /// a finished export.
    pub fn into_snapshot(self) -> Result<Snapshot, String> {
        let mut seen = HashSet::new();
        if let Some(dup) = self.templates.iter().find(|t| !seen.insert(t.id.as_str())) {
            return Err(format!("template id {} appears more than once", dup.id));
        }

        let snapshot = Snapshot {
            prompt: self.prompt,
            templates: self.templates,
            branding: BrandingConfig {
                logo: (!self.site_logo.is_empty())
                    .then(|| ImageRef::from_stored(&self.site_logo)),
                play_store_url: self.play_store_url,
                app_store_url: self.app_store_url,
            },
        };

        let pending = transient_fields(&snapshot);
        if !pending.is_empty() {
            let names: Vec<String> = pending.iter().map(ToString::to_string).collect();
            return Err(format!("local previews in {}", names.join(", ")));
        }
        Ok(snapshot)
    }
}
