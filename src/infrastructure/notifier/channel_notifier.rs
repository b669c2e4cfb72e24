use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::warn;

use crate::application::ports::conflict_notifier::ConflictNotifier;
use crate::domain::entities::ConflictInfo;

/// Forwards conflicts over a channel so a UI binding (or a test) can present
/// them on its own surface. The receiver decides when a conflict is
/// acknowledged; nothing is dropped silently while it is alive.
pub struct ChannelConflictNotifier {
    sender: mpsc::UnboundedSender<ConflictInfo>,
}

impl ChannelConflictNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ConflictInfo>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

#[async_trait]
impl ConflictNotifier for ChannelConflictNotifier {
    async fn notify(&self, conflict: &ConflictInfo) {
        if self.sender.send(conflict.clone()).is_err() {
            warn!(
                record = %conflict.record_id,
                "conflict receiver dropped, notification lost"
            );
        }
    }
}
