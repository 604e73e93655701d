//! Per-field bookkeeping for images on their way to a durable reference

use crate::error::ImageError;
use crate::models::{ImageField, ImageRef, TransientHandle};
use crate::strategy::{ImageFile, ImageResolutionStrategy};
use log::warn;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

/// What the panel shows next to an image slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageStatus {
    /// Durable reference (or no image at all)
    Resolved,
    /// A resolution is in flight
    Resolving,
    /// Showing a local preview with nothing in flight: the upload failed and
    /// the slot stays pending until the operator picks another file.
    Pending { last_error: Option<String> },
}

/// Failure recorded for a resolution whose result was dropped unapplied
pub const ABANDONED_REASON: &str = "abandoned before its result was applied";

#[derive(Debug, Default)]
struct TrackerState {
    /// Latest generation started per field
    in_flight: BTreeMap<ImageField, u64>,
    failures: BTreeMap<ImageField, String>,
    next_generation: u64,
}

fn lock(state: &Mutex<TrackerState>) -> MutexGuard<'_, TrackerState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Tracks in-flight resolutions and their failures, one entry per field.
///
/// Every started resolution gets a [`Ticket`]. Only the newest ticket of a
/// field can settle it, and a ticket dropped unsettled marks its field as
/// failed so the slot never stays in flight.
#[derive(Debug, Default)]
pub struct ImageTracker {
    state: Arc<Mutex<TrackerState>>,
    next_handle: u64,
}

impl ImageTracker {
    pub fn any_in_flight(&self) -> bool {
        !lock(&self.state).in_flight.is_empty()
    }

    pub fn is_in_flight(&self, field: &ImageField) -> bool {
        lock(&self.state).in_flight.contains_key(field)
    }

    pub fn in_flight(&self) -> Vec<ImageField> {
        lock(&self.state).in_flight.keys().cloned().collect()
    }

    pub fn next_transient(&mut self, file_name: &str) -> TransientHandle {
        self.next_handle += 1;
        TransientHandle::new(self.next_handle, file_name)
    }

    /// Marks `field` in flight. A resolution already running for it is
    /// superseded.
    pub fn start(&mut self, field: ImageField) -> Ticket {
        let mut state = lock(&self.state);
        state.next_generation += 1;
        let generation = state.next_generation;
        state.failures.remove(&field);
        state.in_flight.insert(field.clone(), generation);
        Ticket {
            field,
            generation,
            state: Arc::downgrade(&self.state),
            armed: true,
        }
    }

    /// Consumes `ticket`. Returns whether it was the newest one for its field,
    /// in which case the field is no longer in flight.
    pub fn settle(&mut self, mut ticket: Ticket) -> bool {
        ticket.armed = false;
        let mut state = lock(&self.state);
        if state.in_flight.get(&ticket.field) == Some(&ticket.generation) {
            state.in_flight.remove(&ticket.field);
            true
        } else {
            false
        }
    }

    pub fn record_failure(&mut self, field: &ImageField, reason: String) {
        lock(&self.state).failures.insert(field.clone(), reason);
    }

    /// Drops the failure recorded for `field`; used when its slot goes away.
    /// A resolution still running for it settles normally.
    pub fn forget(&mut self, field: &ImageField) {
        lock(&self.state).failures.remove(field);
    }

    pub fn last_error(&self, field: &ImageField) -> Option<String> {
        lock(&self.state).failures.get(field).cloned()
    }

    pub fn status(&self, field: &ImageField, current: Option<&ImageRef>) -> ImageStatus {
        if self.is_in_flight(field) {
            ImageStatus::Resolving
        } else if current.is_some_and(ImageRef::is_transient) {
            ImageStatus::Pending {
                last_error: self.last_error(field),
            }
        } else {
            ImageStatus::Resolved
        }
    }

    /// Forgets everything; used when the panel closes. Tickets handed out
    /// before the reset can no longer settle anything.
    pub fn reset(&mut self) {
        let mut state = lock(&self.state);
        state.in_flight.clear();
        state.failures.clear();
    }
}

/// Claim on one started resolution of a field
#[derive(Debug)]
pub struct Ticket {
    field: ImageField,
    generation: u64,
    state: Weak<Mutex<TrackerState>>,
    armed: bool,
}

impl Ticket {
    pub fn field(&self) -> &ImageField {
        &self.field
    }
}

impl Drop for Ticket {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let Some(shared) = self.state.upgrade() else {
            return;
        };
        let mut state = lock(&shared);
        if state.in_flight.get(&self.field) == Some(&self.generation) {
            state.in_flight.remove(&self.field);
            state
                .failures
                .insert(self.field.clone(), ABANDONED_REASON.to_string());
            warn!("[images] Resolution for {} {}", self.field, ABANDONED_REASON);
        }
    }
}

/// A resolution handed out by the panel. Drive it with [`PendingImage::resolve`]
/// and give the result back to the panel that issued it. Dropping it, or the
/// [`ResolvedImage`] it produces, leaves the field pending.
pub struct PendingImage {
    ticket: Ticket,
    file: ImageFile,
    epoch: u64,
    strategy: Arc<dyn ImageResolutionStrategy>,
}

impl PendingImage {
    pub(crate) fn new(
        ticket: Ticket,
        file: ImageFile,
        epoch: u64,
        strategy: Arc<dyn ImageResolutionStrategy>,
    ) -> Self {
        Self {
            ticket,
            file,
            epoch,
            strategy,
        }
    }

    pub fn field(&self) -> &ImageField {
        self.ticket.field()
    }

    pub async fn resolve(self) -> ResolvedImage {
        let result = self.strategy.resolve(&self.file).await;
        ResolvedImage {
            ticket: self.ticket,
            epoch: self.epoch,
            result,
        }
    }
}

/// Outcome of a [`PendingImage`], not yet applied to the draft
#[derive(Debug)]
pub struct ResolvedImage {
    pub(crate) ticket: Ticket,
    pub(crate) epoch: u64,
    pub(crate) result: Result<ImageRef, ImageError>,
}

impl ResolvedImage {
    pub fn field(&self) -> &ImageField {
        self.ticket.field()
    }
}

/// What applying a [`ResolvedImage`] did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciled {
    /// The field now holds the durable reference.
    Applied(ImageRef),
    /// Resolution failed; the field was left as it was.
    Failed(String),
    /// The panel was closed, the slot removed, or a newer file was picked for
    /// it since the resolution started.
    Discarded,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_follows_the_field_lifecycle() {
        let mut tracker = ImageTracker::default();
        let field = ImageField::Logo;
        let preview = ImageRef::Transient(tracker.next_transient("logo.png"));
        let durable = ImageRef::remote("https://cdn/logo.png");

        assert_eq!(tracker.status(&field, None), ImageStatus::Resolved);

        let ticket = tracker.start(field.clone());
        assert!(tracker.any_in_flight());
        assert_eq!(tracker.status(&field, Some(&preview)), ImageStatus::Resolving);

        assert!(tracker.settle(ticket));
        tracker.record_failure(&field, "HTTP 500".into());
        assert!(!tracker.any_in_flight());
        assert_eq!(
            tracker.status(&field, Some(&preview)),
            ImageStatus::Pending {
                last_error: Some("HTTP 500".into())
            }
        );

        let ticket = tracker.start(field.clone());
        assert!(tracker.settle(ticket));
        assert_eq!(tracker.status(&field, Some(&durable)), ImageStatus::Resolved);
        assert_eq!(tracker.last_error(&field), None);
    }

    #[test]
    fn only_the_newest_ticket_settles_a_field() {
        let mut tracker = ImageTracker::default();
        let field = ImageField::Template("1".into());
        let older = tracker.start(field.clone());
        let newer = tracker.start(field.clone());

        assert!(!tracker.settle(older));
        assert!(tracker.is_in_flight(&field));
        assert!(tracker.settle(newer));
        assert!(!tracker.is_in_flight(&field));
        assert_eq!(tracker.last_error(&field), None);
    }

    #[test]
    fn dropped_ticket_leaves_the_field_failed() {
        let mut tracker = ImageTracker::default();
        let ticket = tracker.start(ImageField::Logo);
        drop(ticket);
        assert!(!tracker.any_in_flight());
        assert_eq!(
            tracker.last_error(&ImageField::Logo).as_deref(),
            Some(ABANDONED_REASON)
        );

        // a superseded ticket going away does not touch its successor
        let older = tracker.start(ImageField::Logo);
        let _newer = tracker.start(ImageField::Logo);
        drop(older);
        assert!(tracker.is_in_flight(&ImageField::Logo));
        assert_eq!(tracker.last_error(&ImageField::Logo), None);
    }

    #[test]
    fn tickets_from_before_a_reset_are_inert() {
        let mut tracker = ImageTracker::default();
        let stale = tracker.start(ImageField::Logo);
        tracker.reset();
        drop(stale);
        assert_eq!(tracker.last_error(&ImageField::Logo), None);

        let stale = tracker.start(ImageField::Logo);
        tracker.reset();
        assert!(!tracker.settle(stale));
    }

    #[test]
    fn transient_handles_are_distinct() {
        let mut tracker = ImageTracker::default();
        let a = tracker.next_transient("same.png");
        let b = tracker.next_transient("same.png");
        assert_ne!(a, b);
    }
}
