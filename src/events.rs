//! Change notification for the display side of the site

use log::info;
use tokio::sync::broadcast;

/// Name the broadcast carries in logs and for hosts that bridge it elsewhere
pub const DATA_UPDATED_EVENT: &str = "fareapp_data_updated";

/// Emitted after every successful save; carries nothing, receivers re-read the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataUpdated;

/// Handle held by a display component interested in configuration changes
pub type Subscription = broadcast::Receiver<DataUpdated>;

/// Fan-out of [`DataUpdated`] to everything that subscribed.
#[derive(Debug, Clone)]
pub struct ChangeNotifier {
    tx: broadcast::Sender<DataUpdated>,
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeNotifier {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(16);
        Self { tx }
    }

    pub fn subscribe(&self) -> Subscription {
        self.tx.subscribe()
    }

    /// Broadcasts one update, returning how many subscribers were reached.
    pub fn notify(&self) -> usize {
        let reached = self.tx.send(DataUpdated).unwrap_or(0);
        info!("[events] {} -> {} subscriber(s)", DATA_UPDATED_EVENT, reached);
        reached
    }
}
