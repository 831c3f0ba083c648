//! Sink for failures that are recorded but never propagated.

use std::error::Error;
use tracing::error;

/// Receives soft failures from best-effort operations such as preview cleanup.
pub trait ErrorReporter: Send + Sync {
    fn report(&self, context: &str, error: &(dyn Error + 'static));
}

/// Default reporter: logs at `error` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn report(&self, context: &str, err: &(dyn Error + 'static)) {
        error!("{context}: {err}");
    }
}
