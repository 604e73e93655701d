//! In-memory editable copy of the site configuration

use crate::defaults::placeholder_template;
use crate::models::{ImageField, ImageRef, Snapshot, Template, TemplateField};
use crate::repository::{transient_fields, ConfigRepository, LoadIssue};

/// Addresses one editable value of the snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldRef {
    Prompt,
    Template { id: String, field: TemplateField },
    Logo,
    PlayStoreUrl,
    AppStoreUrl,
}

/// The snapshot being edited. Nothing here touches the store; loading and
/// saving happen at explicit boundaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftState {
    snapshot: Snapshot,
}

impl DraftState {
    pub fn load(repo: &ConfigRepository) -> (Self, Vec<LoadIssue>) {
        let report = repo.load_snapshot();
        (Self::from_snapshot(report.snapshot), report.issues)
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self { snapshot }
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn templates(&self) -> &[Template] {
        &self.snapshot.templates
    }

    pub fn template(&self, id: &str) -> Option<&Template> {
        self.snapshot.templates.iter().find(|t| t.id == id)
    }

    fn template_mut(&mut self, id: &str) -> Option<&mut Template> {
        self.snapshot.templates.iter_mut().find(|t| t.id == id)
    }

    /// Sets one field. Returns `false` if it names a template that does not exist.
    pub fn edit(&mut self, field: &FieldRef, value: &str) -> bool {
        match field {
            FieldRef::Prompt => self.snapshot.prompt = value.to_string(),
            FieldRef::Logo => {
                self.snapshot.branding.logo =
                    (!value.is_empty()).then(|| ImageRef::from_stored(value));
            }
            FieldRef::PlayStoreUrl => self.snapshot.branding.play_store_url = value.to_string(),
            FieldRef::AppStoreUrl => self.snapshot.branding.app_store_url = value.to_string(),
            FieldRef::Template { id, field } => {
                let Some(template) = self.template_mut(id) else {
                    return false;
                };
                match field {
                    TemplateField::Name => template.name = value.to_string(),
                    TemplateField::Category => template.category = value.to_string(),
                    TemplateField::Image => template.image = ImageRef::from_stored(value),
                    TemplateField::Description => template.description = Some(value.to_string()),
                    TemplateField::PlayStoreUrl => {
                        template.play_store_url = Some(value.to_string())
                    }
                    TemplateField::AppStoreUrl => template.app_store_url = Some(value.to_string()),
                }
            }
        }
        true
    }

    /// Appends a placeholder card and returns its id. Ids come from the clock
    /// and are bumped past any id already in use.
    pub fn add_template(&mut self) -> String {
        let mut candidate = chrono::Utc::now().timestamp_millis().max(0) as u64;
        while self.template(&candidate.to_string()).is_some() {
            candidate += 1;
        }
        let id = candidate.to_string();
        self.snapshot
            .templates
            .push(placeholder_template(id.clone()));
        id
    }

    /// Removes the template with `id`; `false` if there was none.
    pub fn remove_template(&mut self, id: &str) -> bool {
        let before = self.snapshot.templates.len();
        self.snapshot.templates.retain(|t| t.id != id);
        self.snapshot.templates.len() != before
    }

    /// Whether `field` names a slot that exists in this draft
    pub fn has_image_slot(&self, field: &ImageField) -> bool {
        match field {
            ImageField::Template(id) => self.template(id).is_some(),
            ImageField::Logo => true,
        }
    }

    pub fn image(&self, field: &ImageField) -> Option<&ImageRef> {
        match field {
            ImageField::Template(id) => self.template(id).map(|t| &t.image),
            ImageField::Logo => self.snapshot.branding.logo.as_ref(),
        }
    }

    pub fn set_image(&mut self, field: &ImageField, image: ImageRef) -> bool {
        match field {
            ImageField::Template(id) => match self.template_mut(id) {
                Some(template) => {
                    template.image = image;
                    true
                }
                None => false,
            },
            ImageField::Logo => {
                self.snapshot.branding.logo = Some(image);
                true
            }
        }
    }

    /// Fields currently showing a local preview
    pub fn transient_fields(&self) -> Vec<ImageField> {
        transient_fields(&self.snapshot)
    }

    pub fn replace(&mut self, snapshot: Snapshot) {
        self.snapshot = snapshot;
    }
}
