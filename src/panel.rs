//! The admin panel: session gate, draft editing, image reconciliation and
//! publishing, wired to the store and the change broadcast.
//!
//! The panel is driven by one operator. Long-running work (image resolution)
//! is handed out as [`PendingImage`] futures so the caller decides when to
//! await them; results come back through [`AdminPanel::finish_image`], and
//! results from an earlier opening of the panel are dropped.

use crate::auth::{AuthPolicy, Credentials, FixedCredentials, Session, View};
use crate::config::PanelSettings;
use crate::draft::{DraftState, FieldRef};
use crate::error::{PanelError, Result};
use crate::events::{ChangeNotifier, Subscription};
use crate::models::{ImageField, ImageRef, Snapshot};
use crate::reconcile::{ImageStatus, ImageTracker, PendingImage, Reconciled, ResolvedImage};
use crate::repository::{ConfigRepository, LoadIssue};
use crate::store::KeyValueStore;
use crate::strategy::{ImageFile, ImageResolutionStrategy, StrategyKind};
use crate::sync::SyncBundle;
use log::{info, warn};
use std::sync::Arc;
use std::time::{Duration, Instant};

pub struct AdminPanel {
    repo: ConfigRepository,
    notifier: ChangeNotifier,
    policy: Arc<dyn AuthPolicy>,
    strategy: Arc<dyn ImageResolutionStrategy>,
    saved_ack: Duration,
    session: Session,
    draft: Option<DraftState>,
    tracker: ImageTracker,
    epoch: u64,
    saved_at: Option<Instant>,
}

impl AdminPanel {
    pub fn new(store: Arc<dyn KeyValueStore>, strategy: Arc<dyn ImageResolutionStrategy>) -> Self {
        Self {
            repo: ConfigRepository::new(store),
            notifier: ChangeNotifier::new(),
            policy: Arc::new(FixedCredentials::default()),
            strategy,
            saved_ack: Duration::from_millis(2000),
            session: Session::default(),
            draft: None,
            tracker: ImageTracker::default(),
            epoch: 0,
            saved_at: None,
        }
    }

    /// Panel using the strategy and timings from `settings`
    pub fn from_settings(store: Arc<dyn KeyValueStore>, settings: &PanelSettings) -> Self {
        Self::new(store, settings.build_strategy()).with_saved_ack(settings.saved_ack())
    }

    pub fn with_auth_policy(mut self, policy: Arc<dyn AuthPolicy>) -> Self {
        self.policy = policy;
        self
    }

    /// Shares a notifier with display components created elsewhere
    pub fn with_notifier(mut self, notifier: ChangeNotifier) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_saved_ack(mut self, saved_ack: Duration) -> Self {
        self.saved_ack = saved_ack;
        self
    }

    pub fn repository(&self) -> &ConfigRepository {
        &self.repo
    }

    pub fn strategy_kind(&self) -> StrategyKind {
        self.strategy.kind()
    }

    pub fn subscribe(&self) -> Subscription {
        self.notifier.subscribe()
    }

    // ============ Lifecycle ============

    pub fn is_open(&self) -> bool {
        self.draft.is_some()
    }

    /// Opens the panel: back to the login screen, draft loaded from the store.
    /// Returns what the load had to repair.
    pub fn open(&mut self) -> Vec<LoadIssue> {
        self.epoch += 1;
        self.session.reset();
        self.tracker.reset();
        self.saved_at = None;
        let (draft, issues) = DraftState::load(&self.repo);
        info!(
            "[panel] Opened with {} templates ({} repairs)",
            draft.templates().len(),
            issues.len()
        );
        self.draft = Some(draft);
        issues
    }

    /// Closes the panel, dropping unsaved edits. Resolutions still running
    /// are not cancelled but their results will be discarded.
    pub fn close(&mut self) {
        if self.tracker.any_in_flight() {
            let fields: Vec<String> = self
                .tracker
                .in_flight()
                .iter()
                .map(ToString::to_string)
                .collect();
            warn!(
                "[panel] Closing with resolutions in flight: {}",
                fields.join(", ")
            );
        }
        self.epoch += 1;
        self.draft = None;
        self.tracker.reset();
        self.session.reset();
        self.saved_at = None;
    }

    // ============ Session ============

    pub fn view(&self) -> View {
        self.session.view()
    }

    pub fn login_error(&self) -> bool {
        self.session.login_error()
    }

    pub fn login(&mut self, credentials: &Credentials) -> Result<bool> {
        if !self.is_open() {
            return Err(PanelError::Closed);
        }
        Ok(self.session.login(self.policy.as_ref(), credentials))
    }

    pub fn navigate(&mut self, view: View) -> Result<bool> {
        self.draft()?;
        Ok(self.session.navigate(view))
    }

    // ============ Draft ============

    pub fn draft(&self) -> Result<&DraftState> {
        let draft = self.draft.as_ref().ok_or(PanelError::Closed)?;
        if !self.session.is_authenticated() {
            return Err(PanelError::Locked);
        }
        Ok(draft)
    }

    fn draft_mut(&mut self) -> Result<&mut DraftState> {
        let draft = self.draft.as_mut().ok_or(PanelError::Closed)?;
        if !self.session.is_authenticated() {
            return Err(PanelError::Locked);
        }
        Ok(draft)
    }

    pub fn snapshot(&self) -> Result<&Snapshot> {
        self.draft().map(DraftState::snapshot)
    }

    pub fn edit(&mut self, field: &FieldRef, value: &str) -> Result<()> {
        if self.draft_mut()?.edit(field, value) {
            Ok(())
        } else {
            Err(PanelError::UnknownField(format!("{:?}", field)))
        }
    }

    pub fn add_template(&mut self) -> Result<String> {
        let id = self.draft_mut()?.add_template();
        info!("[panel] Added template {}", id);
        Ok(id)
    }

    pub fn remove_template(&mut self, id: &str) -> Result<bool> {
        let removed = self.draft_mut()?.remove_template(id);
        if removed {
            self.tracker.forget(&ImageField::Template(id.to_string()));
            info!("[panel] Removed template {}", id);
        }
        Ok(removed)
    }

    // ============ Images ============

    /// Starts resolving `file` into `field`.
    ///
    /// With the hosted strategy the field shows a local preview straight away
    /// and only one upload may be outstanding. With embedding the field keeps
    /// its value until the encoded image is ready. Picking another file for a
    /// field that is still resolving supersedes the earlier one.
    pub fn begin_image(&mut self, field: ImageField, file: ImageFile) -> Result<PendingImage> {
        let kind = self.strategy.kind();
        if kind.single_flight() && self.tracker.any_in_flight() {
            return Err(PanelError::UploadInProgress);
        }
        let draft = self.draft.as_mut().ok_or(PanelError::Closed)?;
        if !self.session.is_authenticated() {
            return Err(PanelError::Locked);
        }
        if !draft.has_image_slot(&field) {
            return Err(PanelError::UnknownField(field.to_string()));
        }

        if kind.previews_transient() {
            let handle = self.tracker.next_transient(&file.file_name);
            draft.set_image(&field, ImageRef::Transient(handle));
        }
        info!("[panel] Resolving {} for {}", file.file_name, field);
        let ticket = self.tracker.start(field);

        Ok(PendingImage::new(
            ticket,
            file,
            self.epoch,
            self.strategy.clone(),
        ))
    }

    /// Applies a finished resolution. The durable reference overwrites
    /// whatever the field holds now, manual edits included.
    pub fn finish_image(&mut self, resolved: ResolvedImage) -> Reconciled {
        let ResolvedImage {
            ticket,
            epoch,
            result,
        } = resolved;
        let field = ticket.field().clone();
        let latest = self.tracker.settle(ticket);

        let Some(draft) = self.draft.as_mut().filter(|_| epoch == self.epoch) else {
            info!("[panel] Discarding result for {} from a closed session", field);
            return Reconciled::Discarded;
        };
        if !latest {
            info!("[panel] Discarding result for {}: a newer file was picked", field);
            return Reconciled::Discarded;
        }
        if !draft.has_image_slot(&field) {
            info!("[panel] {} no longer exists; dropping its image", field);
            return Reconciled::Discarded;
        }

        match result {
            Ok(image) => {
                draft.set_image(&field, image.clone());
                Reconciled::Applied(image)
            }
            Err(e) => {
                let reason = e.to_string();
                warn!("[panel] {} left pending: {}", field, reason);
                self.tracker.record_failure(&field, reason.clone());
                Reconciled::Failed(reason)
            }
        }
    }

    /// [`begin_image`](Self::begin_image), resolve and
    /// [`finish_image`](Self::finish_image) in one go.
    pub async fn attach_image(&mut self, field: ImageField, file: ImageFile) -> Result<Reconciled> {
        let pending = self.begin_image(field, file)?;
        let resolved = pending.resolve().await;
        Ok(self.finish_image(resolved))
    }

    pub fn image_status(&self, field: &ImageField) -> Result<ImageStatus> {
        let draft = self.draft()?;
        Ok(self.tracker.status(field, draft.image(field)))
    }

    /// Fields that keep the configuration from being saved or exported
    pub fn pending_fields(&self) -> Result<Vec<ImageField>> {
        Ok(self.draft()?.transient_fields())
    }

    fn ensure_nothing_pending(&self) -> Result<()> {
        let pending = self.pending_fields()?;
        if pending.is_empty() {
            Ok(())
        } else {
            Err(PanelError::PendingImages(pending))
        }
    }

    // ============ Publishing ============

    /// Persists the draft and tells subscribers to re-read the store.
    pub fn save(&mut self) -> Result<()> {
        self.ensure_nothing_pending()?;
        let draft = self.draft()?;
        self.repo.save_snapshot(draft.snapshot())?;
        self.notifier.notify();
        self.saved_at = Some(Instant::now());
        Ok(())
    }

    /// Whether the "saved" acknowledgment should still be showing
    pub fn saved_ack_visible(&self) -> bool {
        self.saved_at
            .is_some_and(|at| at.elapsed() < self.saved_ack)
    }

    /// The whole draft as sync text for another deployment.
    pub fn export_config(&self) -> Result<String> {
        self.ensure_nothing_pending()?;
        let bundle = SyncBundle::from_snapshot(self.draft()?.snapshot());
        bundle
            .to_text()
            .map_err(|e| PanelError::InvalidBundle(e.to_string()))
    }

    /// Replaces the draft with an exported bundle. Nothing is persisted until
    /// [`save`](Self::save).
    pub fn import_config(&mut self, text: &str) -> Result<()> {
        if self.tracker.any_in_flight() {
            return Err(PanelError::UploadInProgress);
        }
        let snapshot = SyncBundle::parse(text)
            .and_then(SyncBundle::into_snapshot)
            .map_err(PanelError::InvalidBundle)?;
        let template_count = snapshot.templates.len();
        self.draft_mut()?.replace(snapshot);
        info!("[panel] Imported bundle with {} templates", template_count);
        Ok(())
    }

    /// Wipes the store and reloads: the panel comes back on the login screen
    /// with the built-in defaults.
    pub fn reset_to_factory(&mut self) -> Result<()> {
        self.draft()?;
        self.repo.clear()?;
        warn!("[panel] Factory reset: all saved configuration cleared");
        self.notifier.notify();
        self.close();
        self.open();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ImageError;
    use crate::models::TemplateField;
    use crate::reconcile::ABANDONED_REASON;
    use crate::store::MemoryStore;
    use crate::strategy::EmbedStrategy;
    use async_trait::async_trait;

    /// Hosted-style strategy answering from a fixed script
    struct ScriptedHost {
        result: std::result::Result<String, String>,
    }

    #[async_trait]
    impl ImageResolutionStrategy for ScriptedHost {
        fn kind(&self) -> StrategyKind {
            StrategyKind::Hosted
        }

        async fn resolve(&self, _file: &ImageFile) -> std::result::Result<ImageRef, ImageError> {
            self.result
                .clone()
                .map(ImageRef::remote)
                .map_err(ImageError::Upload)
        }
    }

    fn admin() -> Credentials {
        Credentials::new("info@fareapp.it", "123456")
    }

    fn unlocked(strategy: Arc<dyn ImageResolutionStrategy>) -> (Arc<MemoryStore>, AdminPanel) {
        let store = Arc::new(MemoryStore::new());
        let mut panel = AdminPanel::new(store.clone(), strategy);
        panel.open();
        assert!(panel.login(&admin()).unwrap());
        (store, panel)
    }

    fn png() -> ImageFile {
        ImageFile::new(
            "shot.png",
            vec![0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0, 0, 0, 0],
        )
    }

    #[test]
    fn editing_requires_an_open_unlocked_panel() {
        let store = Arc::new(MemoryStore::new());
        let mut panel = AdminPanel::new(store, Arc::new(EmbedStrategy));
        assert!(matches!(panel.add_template(), Err(PanelError::Closed)));
        assert!(matches!(panel.login(&admin()), Err(PanelError::Closed)));

        panel.open();
        assert!(matches!(panel.add_template(), Err(PanelError::Locked)));
        assert!(!panel.login(&Credentials::new("info@fareapp.it", "wrong")).unwrap());
        assert!(panel.login_error());
        assert_eq!(panel.view(), View::Login);
        assert!(matches!(panel.save(), Err(PanelError::Locked)));

        assert!(panel.login(&admin()).unwrap());
        assert_eq!(panel.view(), View::Prompt);
        assert!(panel.add_template().is_ok());
    }

    #[test]
    fn reopening_resets_the_session_and_drops_unsaved_edits() {
        let (_, mut panel) = unlocked(Arc::new(EmbedStrategy));
        panel.edit(&FieldRef::Prompt, "unsaved").unwrap();
        panel.close();
        panel.open();
        assert_eq!(panel.view(), View::Login);
        panel.login(&admin()).unwrap();
        assert_eq!(panel.snapshot().unwrap(), &Snapshot::defaults());
    }

    #[test]
    fn save_persists_notifies_and_acknowledges() {
        let (_, mut panel) = unlocked(Arc::new(EmbedStrategy));
        let mut display = panel.subscribe();
        panel.edit(&FieldRef::Prompt, "Rispondi in breve.").unwrap();
        let id = panel.add_template().unwrap();
        panel
            .edit(
                &FieldRef::Template {
                    id: id.clone(),
                    field: TemplateField::Name,
                },
                "Pizzeria",
            )
            .unwrap();

        panel.save().unwrap();
        assert!(display.try_recv().is_ok());
        assert!(panel.saved_ack_visible());

        let saved = panel.snapshot().unwrap().clone();
        panel.close();
        panel.open();
        panel.login(&admin()).unwrap();
        assert_eq!(panel.snapshot().unwrap(), &saved);
    }

    #[test]
    fn saved_ack_expires() {
        let (_, panel) = unlocked(Arc::new(EmbedStrategy));
        let mut panel = panel.with_saved_ack(Duration::ZERO);
        panel.save().unwrap();
        assert!(!panel.saved_ack_visible());
    }

    #[test]
    fn unknown_template_edit_is_reported() {
        let (_, mut panel) = unlocked(Arc::new(EmbedStrategy));
        let err = panel
            .edit(
                &FieldRef::Template {
                    id: "missing".into(),
                    field: TemplateField::Category,
                },
                "x",
            )
            .unwrap_err();
        assert!(matches!(err, PanelError::UnknownField(_)));
    }

    #[tokio::test]
    async fn hosted_upload_shows_preview_then_remote_url() {
        let host = ScriptedHost {
            result: Ok("https://res.cloudinary.com/demo/logo.png".into()),
        };
        let (_, mut panel) = unlocked(Arc::new(host));

        let pending = panel.begin_image(ImageField::Logo, png()).unwrap();
        assert!(panel.snapshot().unwrap().branding.logo.as_ref().unwrap().is_transient());
        assert_eq!(panel.image_status(&ImageField::Logo).unwrap(), ImageStatus::Resolving);
        assert!(matches!(panel.save(), Err(PanelError::PendingImages(_))));

        let outcome = panel.finish_image(pending.resolve().await);
        let expected = ImageRef::remote("https://res.cloudinary.com/demo/logo.png");
        assert_eq!(outcome, Reconciled::Applied(expected.clone()));
        assert_eq!(panel.snapshot().unwrap().branding.logo, Some(expected));
        assert_eq!(panel.image_status(&ImageField::Logo).unwrap(), ImageStatus::Resolved);
        panel.save().unwrap();
    }

    #[tokio::test]
    async fn hosted_uploads_are_single_flight() {
        let host = ScriptedHost {
            result: Ok("https://cdn/x.png".into()),
        };
        let (_, mut panel) = unlocked(Arc::new(host));
        let first = panel.begin_image(ImageField::Logo, png()).unwrap();
        let second = panel.begin_image(ImageField::Template("1".into()), png());
        assert!(matches!(second, Err(PanelError::UploadInProgress)));

        panel.finish_image(first.resolve().await);
        assert!(panel
            .begin_image(ImageField::Template("1".into()), png())
            .is_ok());
    }

    #[tokio::test]
    async fn failed_upload_stays_pending_and_blocks_export() {
        let host = ScriptedHost {
            result: Err("HTTP 401: bad preset".into()),
        };
        let (_, mut panel) = unlocked(Arc::new(host));
        let field = ImageField::Template("3".into());

        let outcome = panel.attach_image(field.clone(), png()).await.unwrap();
        assert!(matches!(outcome, Reconciled::Failed(_)));
        assert!(panel.draft().unwrap().template("3").unwrap().image.is_transient());
        assert!(matches!(
            panel.image_status(&field).unwrap(),
            ImageStatus::Pending { last_error: Some(_) }
        ));
        match panel.export_config() {
            Err(PanelError::PendingImages(fields)) => assert_eq!(fields, vec![field]),
            other => panic!("expected pending images, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn results_after_close_are_discarded() {
        let host = ScriptedHost {
            result: Ok("https://cdn/late.png".into()),
        };
        let (store, mut panel) = unlocked(Arc::new(host));
        let pending = panel.begin_image(ImageField::Logo, png()).unwrap();
        panel.close();
        let resolved = pending.resolve().await;

        panel.open();
        assert_eq!(panel.finish_image(resolved), Reconciled::Discarded);
        panel.login(&admin()).unwrap();
        assert_eq!(panel.snapshot().unwrap().branding.logo, None);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn result_for_a_removed_template_is_dropped() {
        let (_, mut panel) = unlocked(Arc::new(EmbedStrategy));
        let pending = panel
            .begin_image(ImageField::Template("2".into()), png())
            .unwrap();
        panel.remove_template("2").unwrap();
        assert_eq!(panel.finish_image(pending.resolve().await), Reconciled::Discarded);
        assert_eq!(panel.image_status(&ImageField::Logo).unwrap(), ImageStatus::Resolved);
    }

    #[tokio::test]
    async fn embedding_leaves_the_field_alone_until_ready() {
        let (_, mut panel) = unlocked(Arc::new(EmbedStrategy));
        let field = ImageField::Template("1".into());
        let before = panel.draft().unwrap().template("1").unwrap().image.clone();

        let pending = panel.begin_image(field.clone(), png()).unwrap();
        assert_eq!(panel.draft().unwrap().template("1").unwrap().image, before);
        // embedding does not serialise work
        assert!(panel.begin_image(ImageField::Logo, png()).is_ok());

        let outcome = panel.finish_image(pending.resolve().await);
        assert!(matches!(outcome, Reconciled::Applied(ImageRef::Embedded(_))));

        let bad = ImageFile::new("broken.png", Vec::new());
        let outcome = panel.attach_image(field.clone(), bad).await.unwrap();
        assert!(matches!(outcome, Reconciled::Failed(_)));
        assert!(matches!(
            panel.draft().unwrap().template("1").unwrap().image,
            ImageRef::Embedded(_)
        ));
    }

    #[tokio::test]
    async fn manual_edit_during_upload_loses_to_the_later_result() {
        let host = ScriptedHost {
            result: Ok("https://cdn/uploaded.png".into()),
        };
        let (_, mut panel) = unlocked(Arc::new(host));
        let pending = panel.begin_image(ImageField::Logo, png()).unwrap();
        panel.edit(&FieldRef::Logo, "https://cdn/typed.png").unwrap();
        panel.finish_image(pending.resolve().await);
        assert_eq!(
            panel.snapshot().unwrap().branding.logo,
            Some(ImageRef::remote("https://cdn/uploaded.png"))
        );
    }

    #[tokio::test]
    async fn newer_file_for_the_same_field_wins() {
        let (_, mut panel) = unlocked(Arc::new(EmbedStrategy));
        let older = panel.begin_image(ImageField::Logo, png()).unwrap();
        let svg = ImageFile::new("logo.svg", b"<svg/>".to_vec());
        let newer = panel.begin_image(ImageField::Logo, svg).unwrap();

        assert_eq!(panel.finish_image(older.resolve().await), Reconciled::Discarded);
        assert_eq!(panel.image_status(&ImageField::Logo).unwrap(), ImageStatus::Resolving);
        assert_eq!(panel.snapshot().unwrap().branding.logo, None);

        let outcome = panel.finish_image(newer.resolve().await);
        let expected = ImageRef::embedded("image/svg+xml", "PHN2Zy8+");
        assert_eq!(outcome, Reconciled::Applied(expected.clone()));
        assert_eq!(panel.snapshot().unwrap().branding.logo, Some(expected));
        assert_eq!(panel.image_status(&ImageField::Logo).unwrap(), ImageStatus::Resolved);
    }

    /// Host that never answers
    struct SilentHost;

    #[async_trait]
    impl ImageResolutionStrategy for SilentHost {
        fn kind(&self) -> StrategyKind {
            StrategyKind::Hosted
        }

        async fn resolve(&self, _file: &ImageFile) -> std::result::Result<ImageRef, ImageError> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn dropped_upload_does_not_block_the_next_one() {
        let (_, mut panel) = unlocked(Arc::new(SilentHost));
        let pending = panel.begin_image(ImageField::Logo, png()).unwrap();
        drop(pending);

        assert_eq!(
            panel.image_status(&ImageField::Logo).unwrap(),
            ImageStatus::Pending {
                last_error: Some(ABANDONED_REASON.to_string())
            }
        );
        assert!(panel
            .begin_image(ImageField::Template("1".into()), png())
            .is_ok());
    }

    #[tokio::test]
    async fn cancelled_attach_releases_the_upload_slot() {
        let (_, mut panel) = unlocked(Arc::new(SilentHost));
        tokio::select! {
            biased;
            _ = panel.attach_image(ImageField::Logo, png()) => panic!("host never answers"),
            _ = std::future::ready(()) => {}
        }

        assert!(!panel.tracker.any_in_flight());
        assert_eq!(panel.pending_fields().unwrap(), vec![ImageField::Logo]);
        assert!(panel.begin_image(ImageField::Logo, png()).is_ok());
    }

    #[tokio::test]
    async fn failure_for_a_removed_template_is_not_kept() {
        let host = ScriptedHost {
            result: Err("HTTP 500".into()),
        };
        let (_, mut panel) = unlocked(Arc::new(host));
        let field = ImageField::Template("2".into());
        let pending = panel.begin_image(field.clone(), png()).unwrap();
        panel.remove_template("2").unwrap();

        assert_eq!(panel.finish_image(pending.resolve().await), Reconciled::Discarded);
        assert_eq!(panel.tracker.last_error(&field), None);
        assert!(!panel.tracker.any_in_flight());
    }

    #[test]
    fn export_import_moves_configuration_between_deployments() {
        let (_, mut source) = unlocked(Arc::new(EmbedStrategy));
        source.edit(&FieldRef::AppStoreUrl, "https://apps.apple.com/fareapp").unwrap();
        source.remove_template("4").unwrap();
        let text = source.export_config().unwrap();
        assert_eq!(text, source.export_config().unwrap());

        let (target_store, mut target) = unlocked(Arc::new(EmbedStrategy));
        target.import_config(&text).unwrap();
        assert!(target_store.is_empty());
        target.save().unwrap();
        assert_eq!(target.snapshot().unwrap(), source.snapshot().unwrap());

        assert!(matches!(
            target.import_config("{\"templates\": 5}"),
            Err(PanelError::InvalidBundle(_))
        ));
    }

    #[test]
    fn factory_reset_clears_store_and_relocks() {
        let (store, mut panel) = unlocked(Arc::new(EmbedStrategy));
        let mut display = panel.subscribe();
        panel.edit(&FieldRef::Prompt, "custom").unwrap();
        panel.save().unwrap();
        assert!(!store.is_empty());

        panel.reset_to_factory().unwrap();
        assert!(store.is_empty());
        assert!(panel.is_open());
        assert_eq!(panel.view(), View::Login);
        assert!(display.try_recv().is_ok());
        assert!(display.try_recv().is_ok());

        panel.login(&admin()).unwrap();
        assert_eq!(panel.snapshot().unwrap(), &Snapshot::defaults());
    }
}
