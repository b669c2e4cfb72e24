use async_trait::async_trait;
use tracing::warn;

use crate::application::ports::conflict_notifier::ConflictNotifier;
use crate::domain::entities::ConflictInfo;

/// Log-only notifier for headless deployments and tests.
#[derive(Default)]
pub struct TracingConflictNotifier;

impl TracingConflictNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ConflictNotifier for TracingConflictNotifier {
    async fn notify(&self, conflict: &ConflictInfo) {
        warn!(
            mutation = %conflict.mutation_id,
            record = %conflict.record_id,
            expected = %conflict.expected_version,
            actual = %conflict.actual_version,
            "record was modified by someone else; reload to pick up the latest state"
        );
    }
}
