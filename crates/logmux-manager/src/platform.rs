//! Platform log dispatch registration

use logmux_core::{LogAttributes, LogLevel};
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use std::sync::Arc;

/// Receiver for log events routed by the platform
///
/// The three methods are the platform's logging entry points. They may be
/// called from any thread the platform logs from, so implementations must be
/// fast and must not block.
pub trait LogDispatch: Send + Sync {
    /// Deliver a formatted message
    fn message(&self, msg: &str, level: LogLevel, category: Option<&str>, attrs: &LogAttributes);

    /// Deliver raw data
    fn write(&self, data: &[u8], level: LogLevel, category: Option<&str>);

    /// Check whether a message at `level` in `category` would be accepted
    fn enabled(&self, level: LogLevel, category: Option<&str>) -> bool;
}

/// Global platform instance
static PLATFORM: OnceCell<Platform> = OnceCell::new();

/// The platform's single logging trampoline
///
/// Holds at most one [`LogDispatch`] registration. Registering `None`
/// disables all dispatch: messages are dropped and nothing is enabled.
pub struct Platform {
    dispatch: RwLock<Option<Arc<dyn LogDispatch>>>,
}

impl Platform {
    /// Create a platform with no dispatch registered
    pub fn new() -> Self {
        Self {
            dispatch: RwLock::new(None),
        }
    }

    /// Get the global platform instance
    pub fn global() -> &'static Platform {
        PLATFORM.get_or_init(Platform::new)
    }

    /// Replace the current registration
    pub fn set_dispatch(&self, dispatch: Option<Arc<dyn LogDispatch>>) {
        let mut guard = self.dispatch.write();
        *guard = dispatch;
    }

    /// Remove the registration only if it is `dispatch`
    ///
    /// Returns `true` if the registration was removed. A registration made
    /// by someone else since `dispatch` registered is left in place.
    pub fn clear_dispatch_if(&self, dispatch: &Arc<dyn LogDispatch>) -> bool {
        let mut guard = self.dispatch.write();
        let owned = guard
            .as_ref()
            .is_some_and(|current| std::ptr::addr_eq(Arc::as_ptr(current), Arc::as_ptr(dispatch)));
        if owned {
            *guard = None;
        }
        owned
    }

    /// Get the current registration
    ///
    /// The returned handle is a copy; the registration lock is not held
    /// while the caller uses it.
    pub fn dispatch(&self) -> Option<Arc<dyn LogDispatch>> {
        self.dispatch.read().clone()
    }

    /// Check whether a dispatch is registered
    pub fn is_registered(&self) -> bool {
        self.dispatch.read().is_some()
    }

    /// Route a message to the registered dispatch, if any
    pub fn log_message(
        &self,
        msg: &str,
        level: LogLevel,
        category: Option<&str>,
        attrs: &LogAttributes,
    ) {
        if let Some(dispatch) = self.dispatch() {
            dispatch.message(msg, level, category, attrs);
        }
    }

    /// Route raw data to the registered dispatch, if any
    pub fn log_write(&self, data: &[u8], level: LogLevel, category: Option<&str>) {
        if let Some(dispatch) = self.dispatch() {
            dispatch.write(data, level, category);
        }
    }

    /// Ask the registered dispatch whether a message would be accepted
    ///
    /// Returns `false` when nothing is registered.
    pub fn log_enabled(&self, level: LogLevel, category: Option<&str>) -> bool {
        match self.dispatch() {
            Some(dispatch) => dispatch.enabled(level, category),
            None => false,
        }
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::new()
    }
}
