//! Admin core for the Fare App marketing site.
//!
//! Holds the editable site configuration (chatbot prompt, portfolio templates,
//! branding), persists it into a string-keyed store, broadcasts changes to the
//! display side, resolves uploaded images either inline or through an image
//! host, and wraps the chat endpoint behind the support chatbot.

pub mod auth;
pub mod chat;
pub mod config;
pub mod db;
pub mod defaults;
pub mod draft;
pub mod error;
pub mod events;
pub mod models;
pub mod panel;
pub mod paths;
pub mod prompts;
pub mod reconcile;
pub mod repository;
pub mod store;
pub mod strategy;
pub mod sync;

pub use auth::{AuthPolicy, Credentials, FixedCredentials, View};
pub use chat::ChatService;
pub use config::PanelSettings;
pub use db::SqliteStore;
pub use draft::FieldRef;
pub use error::{ChatError, ImageError, PanelError, StoreError};
pub use events::{ChangeNotifier, DataUpdated};
pub use models::{BrandingConfig, ImageField, ImageRef, Snapshot, Template, TemplateField};
pub use panel::AdminPanel;
pub use reconcile::{ImageStatus, Reconciled};
pub use repository::ConfigRepository;
pub use store::{KeyValueStore, MemoryStore};
pub use strategy::{EmbedStrategy, HostedStrategy, ImageFile, ImageResolutionStrategy, StrategyKind};
