//! Error types for the admin panel

use crate::models::ImageField;

/// Persistent store failure.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("refusing to persist local preview for {0}")]
    TransientImage(ImageField),

    #[error("{0}")]
    Other(String),
}

/// Failure turning a picked file into a durable image reference.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ImageError {
    #[error("could not read image file: {0}")]
    Unreadable(String),

    #[error("image upload failed: {0}")]
    Upload(String),
}

/// Chat endpoint failure. Callers facing visitors use
/// [`crate::chat::ChatService::reply`], which maps these to canned text.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("chat API key not configured")]
    MissingKey,

    #[error("chat request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("chat API error {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected chat response: {0}")]
    Malformed(String),
}

/// Operator-facing failure of a panel operation.
#[derive(Debug, thiserror::Error)]
pub enum PanelError {
    #[error("the admin panel is closed")]
    Closed,

    #[error("log in to edit the site configuration")]
    Locked,

    #[error("an image upload is already in progress")]
    UploadInProgress,

    #[error("images still uploading or pending: {}", list_fields(.0))]
    PendingImages(Vec<ImageField>),

    #[error("no such field: {0}")]
    UnknownField(String),

    #[error("invalid sync bundle: {0}")]
    InvalidBundle(String),

    #[error(transparent)]
    Image(#[from] ImageError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

fn list_fields(fields: &[ImageField]) -> String {
    fields
        .iter()
        .map(ImageField::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, PanelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_images_lists_every_field() {
        let err = PanelError::PendingImages(vec![
            ImageField::Template("5".into()),
            ImageField::Logo,
        ]);
        assert_eq!(
            err.to_string(),
            "images still uploading or pending: template 5 image, site logo"
        );
    }
}
