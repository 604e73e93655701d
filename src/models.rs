//! Data models and structures used throughout the panel

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

const EMBEDDED_PREFIX: &str = "data:";
const TRANSIENT_PREFIX: &str = "blob:";
const TRANSIENT_SCOPE: &str = "fareapp";

/// Session-local handle to an image the operator picked but that has not been
/// made durable yet.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TransientHandle(String);

impl TransientHandle {
    pub fn new(seq: u64, file_name: &str) -> Self {
        let name: String = file_name
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        Self(format!("{TRANSIENT_PREFIX}{TRANSIENT_SCOPE}/{seq}/{name}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Where an image lives.
///
/// Persisted as a plain string so the display side of the site can use it as
/// an `src` directly. [`ImageRef::from_stored`] is the only place that looks
/// at the string shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageRef {
    /// Publicly reachable URL.
    Remote(String),
    /// Self-contained `data:` URL.
    Embedded(String),
    /// Preview of a local file; never valid outside the current session.
    Transient(TransientHandle),
}

impl ImageRef {
    pub fn from_stored(raw: &str) -> Self {
        if raw.starts_with(EMBEDDED_PREFIX) {
            ImageRef::Embedded(raw.to_string())
        } else if raw.starts_with(TRANSIENT_PREFIX) {
            ImageRef::Transient(TransientHandle(raw.to_string()))
        } else {
            ImageRef::Remote(raw.to_string())
        }
    }

    pub fn remote(url: impl Into<String>) -> Self {
        ImageRef::Remote(url.into())
    }

    pub fn embedded(mime: &str, base64_payload: &str) -> Self {
        ImageRef::Embedded(format!("{EMBEDDED_PREFIX}{mime};base64,{base64_payload}"))
    }

    pub fn as_str(&self) -> &str {
        match self {
            ImageRef::Remote(url) => url,
            ImageRef::Embedded(data) => data,
            ImageRef::Transient(handle) => handle.as_str(),
        }
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, ImageRef::Transient(_))
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ImageRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ImageRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(ImageRef::from_stored(&raw))
    }
}

/// Portfolio card shown in the site's template gallery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: String,
    pub name: String,
    pub category: String,
    pub image: ImageRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub play_store_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_store_url: Option<String>,
}

/// Editable text fields of a [`Template`]. The image goes through the
/// reconciliation flow instead, but can still be overwritten by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateField {
    Name,
    Category,
    Image,
    Description,
    PlayStoreUrl,
    AppStoreUrl,
}

impl TemplateField {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "name" => Some(Self::Name),
            "category" => Some(Self::Category),
            "image" => Some(Self::Image),
            "description" => Some(Self::Description),
            "playStoreUrl" | "play_store_url" => Some(Self::PlayStoreUrl),
            "appStoreUrl" | "app_store_url" => Some(Self::AppStoreUrl),
            _ => None,
        }
    }
}

/// Site-wide identity: logo and fallback store links
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BrandingConfig {
    pub logo: Option<ImageRef>,
    pub play_store_url: String,
    pub app_store_url: String,
}

/// Everything the panel edits, persisted and exported as one unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub prompt: String,
    pub templates: Vec<Template>,
    pub branding: BrandingConfig,
}

/// An image slot that can be reconciled independently of the others
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ImageField {
    Template(String),
    Logo,
}

impl fmt::Display for ImageField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageField::Template(id) => write!(f, "template {id} image"),
            ImageField::Logo => f.write_str("site logo"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One turn of a chatbot conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_strings_classify_into_variants() {
        assert_eq!(
            ImageRef::from_stored("https://cdn.example.com/a.png"),
            ImageRef::Remote("https://cdn.example.com/a.png".into())
        );
        assert!(matches!(
            ImageRef::from_stored("data:image/png;base64,AAAA"),
            ImageRef::Embedded(_)
        ));
        assert!(ImageRef::from_stored("blob:https://site/1234").is_transient());
    }

    #[test]
    fn transient_handle_is_recognised_after_a_store_round_trip() {
        let handle = TransientHandle::new(7, "my logo.png");
        assert_eq!(handle.as_str(), "blob:fareapp/7/my_logo.png");
        let reparsed = ImageRef::from_stored(handle.as_str());
        assert_eq!(reparsed, ImageRef::Transient(handle));
    }

    #[test]
    fn template_uses_site_json_field_names() {
        let template = Template {
            id: "9".into(),
            name: "Shop".into(),
            category: "Retail".into(),
            image: ImageRef::remote("https://img/x.jpg"),
            description: None,
            play_store_url: Some("https://play/x".into()),
            app_store_url: None,
        };
        let json = serde_json::to_value(&template).unwrap();
        assert_eq!(json["playStoreUrl"], "https://play/x");
        assert_eq!(json["image"], "https://img/x.jpg");
        assert!(json.get("description").is_none());
        assert!(json.get("appStoreUrl").is_none());
    }

    #[test]
    fn template_field_names_parse() {
        assert_eq!(
            TemplateField::parse("playStoreUrl"),
            Some(TemplateField::PlayStoreUrl)
        );
        assert_eq!(TemplateField::parse("category"), Some(TemplateField::Category));
        assert_eq!(TemplateField::parse("colour"), None);
    }
}
