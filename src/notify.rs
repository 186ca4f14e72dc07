//! User-facing notifications raised by flows (the toast of the web UI).

/// Receiver for success/failure notices.
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

/// Default notifier: writes notices to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, message: &str) {
        tracing::info!(notice = %message, "Success");
    }

    fn error(&self, message: &str) {
        tracing::warn!(notice = %message, "Failure");
    }
}
