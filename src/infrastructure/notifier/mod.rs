pub mod channel_notifier;
pub mod log_notifier;

pub use channel_notifier::ChannelConflictNotifier;
pub use log_notifier::TracingConflictNotifier;
