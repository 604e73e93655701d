//! The site configuration as logical keys over a [`KeyValueStore`]

use crate::defaults::{
    default_logo, default_templates, fallback_image_for, GLOBAL_APP_STORE, GLOBAL_PLAY_STORE,
};
use crate::error::StoreError;
use crate::models::{BrandingConfig, ImageField, ImageRef, Snapshot, Template};
use crate::prompts::DEFAULT_SYSTEM_INSTRUCTION;
use crate::store::{
    KeyValueStore, APP_STORE_KEY, LOGO_KEY, PLAY_STORE_KEY, PROMPT_KEY, TEMPLATES_KEY,
};
use log::{info, warn};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Something `load_snapshot` had to paper over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadIssue {
    /// The store itself failed; the default was used for this key.
    Unreadable { key: &'static str, reason: String },
    /// The template list did not parse; the built-in gallery was used.
    MalformedTemplates(String),
    /// A second template carried an id already seen; it was dropped.
    DuplicateTemplate(String),
    /// A saved local preview was replaced with a fallback image.
    TransientImage(ImageField),
}

impl fmt::Display for LoadIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadIssue::Unreadable { key, reason } => write!(f, "could not read {key}: {reason}"),
            LoadIssue::MalformedTemplates(reason) => {
                write!(f, "saved templates are malformed: {reason}")
            }
            LoadIssue::DuplicateTemplate(id) => write!(f, "dropped duplicate template {id}"),
            LoadIssue::TransientImage(field) => {
                write!(f, "replaced stale local preview for {field}")
            }
        }
    }
}

/// Result of loading: always a usable snapshot, plus what was repaired.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub snapshot: Snapshot,
    pub issues: Vec<LoadIssue>,
}

/// Reads and writes the five configuration keys.
#[derive(Clone)]
pub struct ConfigRepository {
    store: Arc<dyn KeyValueStore>,
}

impl ConfigRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Non-empty value for `key`, or `None` when absent, empty or unreadable.
    fn read(&self, key: &'static str, issues: &mut Vec<LoadIssue>) -> Option<String> {
        match self.store.get(key) {
            Ok(Some(value)) if !value.is_empty() => Some(value),
            Ok(_) => None,
            Err(e) => {
                issues.push(LoadIssue::Unreadable {
                    key,
                    reason: e.to_string(),
                });
                None
            }
        }
    }

    /// Loads the persisted snapshot. Never fails: missing or broken data falls
    /// back to the built-in defaults and stale local previews are replaced.
    pub fn load_snapshot(&self) -> LoadReport {
        let mut issues = Vec::new();

        let prompt = self
            .read(PROMPT_KEY, &mut issues)
            .unwrap_or_else(|| DEFAULT_SYSTEM_INSTRUCTION.to_string());

        let templates = match self.read(TEMPLATES_KEY, &mut issues) {
            Some(raw) => match serde_json::from_str::<Vec<Template>>(&raw) {
                Ok(parsed) => repair_templates(parsed, &mut issues),
                Err(e) => {
                    issues.push(LoadIssue::MalformedTemplates(e.to_string()));
                    default_templates()
                }
            },
            None => default_templates(),
        };

        let stored_logo = self.read(LOGO_KEY, &mut issues);
        let logo = match stored_logo.as_deref().map(ImageRef::from_stored) {
            Some(ImageRef::Transient(_)) => {
                issues.push(LoadIssue::TransientImage(ImageField::Logo));
                default_logo()
            }
            Some(logo) => Some(logo),
            None => default_logo(),
        };

        let branding = BrandingConfig {
            logo,
            play_store_url: self
                .read(PLAY_STORE_KEY, &mut issues)
                .unwrap_or_else(|| GLOBAL_PLAY_STORE.to_string()),
            app_store_url: self
                .read(APP_STORE_KEY, &mut issues)
                .unwrap_or_else(|| GLOBAL_APP_STORE.to_string()),
        };

        for issue in &issues {
            warn!("[repository] {}", issue);
        }

        LoadReport {
            snapshot: Snapshot {
                prompt,
                templates,
                branding,
            },
            issues,
        }
    }

    /// Writes every key. A snapshot still holding a local preview is refused
    /// before anything is written.
    pub fn save_snapshot(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        if let Some(field) = first_transient(snapshot) {
            return Err(StoreError::TransientImage(field));
        }

        let templates = serde_json::to_string(&snapshot.templates)?;
        let logo = snapshot
            .branding
            .logo
            .as_ref()
            .map(ImageRef::as_str)
            .unwrap_or_default();

        self.store.set(TEMPLATES_KEY, &templates)?;
        self.store.set(PROMPT_KEY, &snapshot.prompt)?;
        self.store.set(LOGO_KEY, logo)?;
        self.store.set(PLAY_STORE_KEY, &snapshot.branding.play_store_url)?;
        self.store.set(APP_STORE_KEY, &snapshot.branding.app_store_url)?;

        info!(
            "[repository] Saved configuration ({} templates)",
            snapshot.templates.len()
        );
        Ok(())
    }

    /// System instruction the chatbot should run with
    pub fn chatbot_prompt(&self) -> String {
        let mut issues = Vec::new();
        let prompt = self
            .read(PROMPT_KEY, &mut issues)
            .unwrap_or_else(|| DEFAULT_SYSTEM_INSTRUCTION.to_string());
        for issue in &issues {
            warn!("[repository] {}", issue);
        }
        prompt
    }

    pub fn clear(&self) -> Result<(), StoreError> {
        self.store.clear()
    }
}

fn repair_templates(parsed: Vec<Template>, issues: &mut Vec<LoadIssue>) -> Vec<Template> {
    let mut seen = HashSet::new();
    let mut templates = Vec::with_capacity(parsed.len());

    for mut template in parsed {
        if !seen.insert(template.id.clone()) {
            issues.push(LoadIssue::DuplicateTemplate(template.id));
            continue;
        }
        if template.image.is_transient() {
            issues.push(LoadIssue::TransientImage(ImageField::Template(
                template.id.clone(),
            )));
            template.image = fallback_image_for(&template.id);
        }
        templates.push(template);
    }
    templates
}

/// First field of `snapshot` still pointing at a local preview.
pub(crate) fn first_transient(snapshot: &Snapshot) -> Option<ImageField> {
    transient_fields(snapshot).into_iter().next()
}

/// Every field of `snapshot` still pointing at a local preview, in display order.
pub(crate) fn transient_fields(snapshot: &Snapshot) -> Vec<ImageField> {
    let mut fields: Vec<ImageField> = snapshot
        .templates
        .iter()
        .filter(|t| t.image.is_transient())
        .map(|t| ImageField::Template(t.id.clone()))
        .collect();
    if snapshot
        .branding
        .logo
        .as_ref()
        .is_some_and(ImageRef::is_transient)
    {
        fields.push(ImageField::Logo);
    }
    fields
}
