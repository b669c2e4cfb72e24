use crate::domain::entities::ConflictInfo;
use async_trait::async_trait;

/// Port to whatever surface presents conflicts to the user: a toast, a
/// modal, a log line in tests. A conflict is a correctness-relevant event;
/// implementations must keep it visible until acknowledged, and the primary
/// action offered should call [`OptimisticUpdateService::refresh`] to reload
/// the latest server state and clear the stored conflict.
///
/// [`OptimisticUpdateService::refresh`]: crate::application::services::optimistic_update_service::OptimisticUpdateService::refresh
#[async_trait]
pub trait ConflictNotifier: Send + Sync {
    async fn notify(&self, conflict: &ConflictInfo);
}
