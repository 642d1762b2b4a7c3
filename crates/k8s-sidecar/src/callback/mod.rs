//! Change webhook: one best-effort HTTP request per change, retried with
//! bounded exponential backoff.

pub mod backoff;
pub mod notifier;

pub use backoff::ExponentialBackoff;
pub use notifier::{redact_url, DispatchOutcome, Notifier, NotifierCallback, MAX_ELAPSED};
