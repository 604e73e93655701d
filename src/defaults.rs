//! Built-in site content used whenever nothing has been saved yet

use crate::models::{BrandingConfig, ImageRef, Snapshot, Template};
use crate::prompts::DEFAULT_SYSTEM_INSTRUCTION;

/// Generic mockup used for new templates and to replace lost local previews
pub const FALLBACK_TEMPLATE_IMAGE: &str =
    "https://images.unsplash.com/photo-1551650975-87deedd944c3?w=800";

/// Site logo shipped with the build (none)
pub const DEFAULT_LOGO: Option<&str> = None;

/// Store links shipped with the build
pub const GLOBAL_PLAY_STORE: &str = "";
pub const GLOBAL_APP_STORE: &str = "";

pub const PLACEHOLDER_TEMPLATE_NAME: &str = "Nuova App";
pub const PLACEHOLDER_TEMPLATE_CATEGORY: &str = "Settore";

fn builtin(id: &str, name: &str, image: &str, description: &str) -> Template {
    Template {
        id: id.to_string(),
        name: name.to_string(),
        category: "Food & Drink".to_string(),
        image: ImageRef::remote(image),
        description: Some(description.to_string()),
        play_store_url: None,
        app_store_url: None,
    }
}

/// The gallery a fresh install shows
pub fn default_templates() -> Vec<Template> {
    vec![
        builtin(
            "1",
            "Ristorante Elite",
            "https://images.unsplash.com/photo-1550966841-3ee32931de15?auto=format&fit=crop&q=80&w=800",
            "Gestione tavoli, menu digitale e prenotazioni veloci.",
        ),
        builtin(
            "2",
            "Gourmet Light",
            "https://images.unsplash.com/photo-1546069901-ba9599a7e63c?auto=format&fit=crop&q=80&w=800",
            "Esperienza utente raffinata per alta cucina.",
        ),
        builtin(
            "3",
            "Cafè Moderno",
            "https://images.unsplash.com/photo-1501339817302-ee4fba293ee8?auto=format&fit=crop&q=80&w=800",
            "Ordini rapidi al bancone e programmi fedeltà.",
        ),
        builtin(
            "4",
            "Bistrot Dark",
            "https://images.unsplash.com/photo-1517248135467-4c7edcad34c4?auto=format&fit=crop&q=80&w=800",
            "Interfaccia elegante con tema scuro.",
        ),
    ]
}

/// Image a repaired template falls back to: its built-in counterpart's, or the
/// generic mockup.
pub fn fallback_image_for(template_id: &str) -> ImageRef {
    default_templates()
        .into_iter()
        .find(|t| t.id == template_id)
        .map(|t| t.image)
        .unwrap_or_else(|| ImageRef::remote(FALLBACK_TEMPLATE_IMAGE))
}

pub fn default_logo() -> Option<ImageRef> {
    DEFAULT_LOGO.map(ImageRef::from_stored)
}

/// Card appended by "add template"
pub fn placeholder_template(id: String) -> Template {
    Template {
        id,
        name: PLACEHOLDER_TEMPLATE_NAME.to_string(),
        category: PLACEHOLDER_TEMPLATE_CATEGORY.to_string(),
        image: ImageRef::remote(FALLBACK_TEMPLATE_IMAGE),
        description: Some(String::new()),
        play_store_url: Some(String::new()),
        app_store_url: Some(String::new()),
    }
}

impl Snapshot {
    pub fn defaults() -> Self {
        Self {
            prompt: DEFAULT_SYSTEM_INSTRUCTION.to_string(),
            templates: default_templates(),
            branding: BrandingConfig {
                logo: default_logo(),
                play_store_url: GLOBAL_PLAY_STORE.to_string(),
                app_store_url: GLOBAL_APP_STORE.to_string(),
            },
        }
    }
}
