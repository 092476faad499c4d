//! Deduplicated warning emission.

use std::collections::HashSet;
use std::sync::{Mutex, OnceLock};

static EMITTED: OnceLock<Mutex<HashSet<String>>> = OnceLock::new();

/// Emit a warning once per distinct message for the lifetime of the process.
///
/// The simulator produces the same diagnostic at every time step when an
/// operating condition is out of range; repeats are suppressed so the log
/// stays readable.
pub fn warn_once(message: impl AsRef<str>) {
    let message = message.as_ref();
    let emitted = EMITTED.get_or_init(|| Mutex::new(HashSet::new()));
    let mut emitted = match emitted.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    if emitted.insert(message.to_string()) {
        tracing::warn!("{message}");
    }
}
