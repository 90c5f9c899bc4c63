//! Panic handling for FFI boundaries
//!
//! Panics must not unwind into the platform's C code. Every export runs its
//! body through [`catch_panic`].

use std::any::Any;
use std::panic;

/// Catch panics from an FFI call
///
/// Returns the panic message on failure. The message is also logged through
/// `tracing`, which reaches the log handlers once the manager's lock has been
/// released by unwinding.
pub fn catch_panic<F, R>(f: F) -> Result<R, String>
where
    F: FnOnce() -> R + panic::UnwindSafe,
{
    panic::catch_unwind(f).map_err(|payload| {
        let msg = panic_to_string(&payload);
        tracing::error!("FFI panic caught: {}", msg);
        msg
    })
}

/// Convert a panic payload to a human-readable string
fn panic_to_string(payload: &Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("logmux panicked: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("logmux panicked: {}", s)
    } else {
        "logmux panicked with unknown payload".to_string()
    }
}

/// Install a panic hook that reports panics through `tracing`
///
/// Replaces any existing hook for the whole process. A panic raised while a
/// handler runs under the manager's lock is not logged by the hook; the
/// manager drops events raised from inside its own lock.
pub fn install_panic_hook() {
    panic::set_hook(Box::new(|panic_info| {
        let payload = panic_info
            .payload()
            .downcast_ref::<&str>()
            .copied()
            .or_else(|| {
                panic_info
                    .payload()
                    .downcast_ref::<String>()
                    .map(String::as_str)
            })
            .unwrap_or("Box<dyn Any>");

        match panic_info.location() {
            Some(location) => tracing::error!(
                "PANIC at {}:{}:{}: {}",
                location.file(),
                location.line(),
                location.column(),
                payload
            ),
            None => tracing::error!("PANIC at unknown location: {}", payload),
        }
    }));
}
