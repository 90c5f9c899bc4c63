//! Process-wide log manager

use crate::guard::FactoryGuard;
use crate::platform::{LogDispatch, Platform};
use logmux_core::{
    CategoryFilter, HandlerSpec, LogAttributes, LogError, LogLevel, LogResult, LoggingConfig,
};
use logmux_handlers::{
    DefaultHandlerFactory, DefaultStreamFactory, HandlerFactory, LogHandler, OutputStream,
    StreamFactory,
};
use once_cell::sync::OnceCell;
use parking_lot::{Mutex, MutexGuard};
use std::cell::Cell;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

/// Global log manager
static LOG_MANAGER: OnceCell<LogManager> = OnceCell::new();

thread_local! {
    // Number of manager locks held by this thread
    static LOCK_DEPTH: Cell<u32> = const { Cell::new(0) };
}

/// Handler and stream created through the factories, owned by the manager
struct FactoryHandler {
    id: String,
    handler: Arc<dyn LogHandler>,
    stream: Option<Arc<dyn OutputStream>>,
}

struct ManagerState {
    /// Dispatch order is insertion order
    active: Vec<Arc<dyn LogHandler>>,
    factory_handlers: Vec<FactoryHandler>,
    handler_factory: Arc<dyn HandlerFactory>,
    stream_factory: Arc<dyn StreamFactory>,
    registered: bool,
}

impl ManagerState {
    fn is_active(&self, handler: &Arc<dyn LogHandler>) -> bool {
        self.active.iter().any(|h| same_object(h, handler))
    }

    fn deactivate(&mut self, handler: &Arc<dyn LogHandler>) -> bool {
        match self.active.iter().position(|h| same_object(h, handler)) {
            Some(index) => {
                self.active.remove(index);
                true
            }
            None => false,
        }
    }

    fn destroy(&mut self, record: FactoryHandler) {
        self.deactivate(&record.handler);
        self.handler_factory.destroy_handler(record.handler);
        if let Some(stream) = record.stream {
            self.stream_factory.destroy_stream(stream);
        }
    }

    fn destroy_factory_handler(&mut self, id: &str) -> bool {
        match self.factory_handlers.iter().position(|h| h.id == id) {
            Some(index) => {
                let record = self.factory_handlers.remove(index);
                self.destroy(record);
                true
            }
            None => false,
        }
    }

    fn destroy_factory_handlers(&mut self) {
        let records = std::mem::take(&mut self.factory_handlers);
        for record in records {
            self.destroy(record);
        }
    }

    #[allow(clippy::too_many_arguments)] // Mirrors the public add_factory_handler
    fn add_factory_handler(
        &mut self,
        id: &str,
        handler_type: &str,
        level: LogLevel,
        filters: Vec<CategoryFilter>,
        handler_params: &serde_json::Value,
        stream_type: Option<&str>,
        stream_params: &serde_json::Value,
    ) -> LogResult<()> {
        self.destroy_factory_handler(id);
        if id.is_empty() {
            return Err(LogError::EmptyId);
        }

        let stream = match stream_type {
            Some(stream_type) => {
                let created = self
                    .stream_factory
                    .create_stream(stream_type, stream_params)
                    .ok_or_else(|| LogError::UnsupportedStream(stream_type.to_string()))?;
                let factory = self.stream_factory.clone();
                Some(FactoryGuard::new(created, move |s| factory.destroy_stream(s)))
            }
            None => None,
        };

        let created = self
            .handler_factory
            .create_handler(
                handler_type,
                level,
                filters,
                stream.as_ref().map(|s| s.get().clone()),
                handler_params,
            )
            .ok_or_else(|| LogError::UnsupportedHandler(handler_type.to_string()))?;
        let factory = self.handler_factory.clone();
        let handler = FactoryGuard::new(created, move |h| factory.destroy_handler(h));

        // Nothing below may fail once the lists have room
        self.factory_handlers.try_reserve(1)?;
        self.active.try_reserve(1)?;
        if self.is_active(handler.get()) {
            // Already active, so not ours to destroy
            handler.release();
            return Err(LogError::AlreadyRegistered);
        }

        let handler = handler.release();
        let stream = stream.map(FactoryGuard::release);
        self.factory_handlers.push(FactoryHandler {
            id: id.to_string(),
            handler: handler.clone(),
            stream,
        });
        self.active.push(handler);
        Ok(())
    }
}

/// Shared part of the manager registered with the platform
struct ManagerCore {
    state: Mutex<ManagerState>,
}

/// Locked manager state; marks the thread as holding a manager lock
struct StateGuard<'a> {
    guard: MutexGuard<'a, ManagerState>,
}

impl Deref for StateGuard<'_> {
    type Target = ManagerState;

    fn deref(&self) -> &ManagerState {
        &self.guard
    }
}

impl DerefMut for StateGuard<'_> {
    fn deref_mut(&mut self) -> &mut ManagerState {
        &mut self.guard
    }
}

impl Drop for StateGuard<'_> {
    fn drop(&mut self) {
        LOCK_DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

impl ManagerCore {
    fn lock(&self) -> StateGuard<'_> {
        let guard = self.state.lock();
        LOCK_DEPTH.with(|depth| depth.set(depth.get() + 1));
        StateGuard { guard }
    }

    /// Whether this thread already holds a manager lock
    ///
    /// Events raised by handlers, factories, or the manager itself while the
    /// lock is held are dropped instead of deadlocking.
    fn reentered() -> bool {
        LOCK_DEPTH.with(|depth| depth.get() > 0)
    }
}

impl LogDispatch for ManagerCore {
    fn message(&self, msg: &str, level: LogLevel, category: Option<&str>, attrs: &LogAttributes) {
        if Self::reentered() {
            return;
        }
        let state = self.lock();
        for handler in &state.active {
            handler.message(msg, level, category, attrs);
        }
    }

    fn write(&self, data: &[u8], level: LogLevel, category: Option<&str>) {
        if Self::reentered() {
            return;
        }
        let state = self.lock();
        for handler in &state.active {
            handler.write(data, level, category);
        }
    }

    fn enabled(&self, level: LogLevel, category: Option<&str>) -> bool {
        if Self::reentered() {
            return false;
        }
        let state = self.lock();
        let min_level = state
            .active
            .iter()
            .map(|handler| handler.level(category))
            .min();
        min_level.is_some_and(|min| level.passes(min))
    }
}

/// Process-wide coordinator of log handlers
///
/// Tracks the active handlers, owns the handlers created through the
/// factories, and registers itself with the [`Platform`] while at least one
/// handler is active. A single mutex serializes every mutation and every
/// dispatch; handlers and factories run with it held and must not call back
/// into the manager.
///
/// Handlers registered with [`add_handler`](LogManager::add_handler) stay
/// owned by the caller. Handlers created by
/// [`add_factory_handler`](LogManager::add_factory_handler) are owned by the
/// manager and destroyed through the factory that created them.
pub struct LogManager {
    core: Arc<ManagerCore>,
    platform: &'static Platform,
}

impl LogManager {
    /// Create a manager bound to a specific platform with the default factories
    ///
    /// Use [`instance`](LogManager::instance) for the manager behind
    /// [`Platform::global`]. A manager only ever removes its own
    /// registration from `platform`.
    pub fn with_platform(platform: &'static Platform) -> Self {
        Self {
            core: Arc::new(ManagerCore {
                state: Mutex::new(ManagerState {
                    active: Vec::new(),
                    factory_handlers: Vec::new(),
                    handler_factory: DefaultHandlerFactory::instance(),
                    stream_factory: DefaultStreamFactory::instance(),
                    registered: false,
                }),
            }),
            platform,
        }
    }

    /// Get the global manager
    ///
    /// Created on first access and kept for the lifetime of the process.
    pub fn instance() -> &'static LogManager {
        LOG_MANAGER.get_or_init(|| LogManager::with_platform(Platform::global()))
    }

    /// Register or unregister with the platform to match the active set
    fn sync_dispatch(&self, state: &mut ManagerState) {
        let wanted = !state.active.is_empty();
        if wanted == state.registered {
            return;
        }
        let core: Arc<dyn LogDispatch> = self.core.clone();
        if wanted {
            self.platform.set_dispatch(Some(core));
        } else {
            self.platform.clear_dispatch_if(&core);
        }
        state.registered = wanted;
    }

    /// Register a caller-owned handler
    ///
    /// Fails if the handler is already registered.
    pub fn add_handler(&self, handler: Arc<dyn LogHandler>) -> LogResult<()> {
        let mut state = self.core.lock();
        if state.is_active(&handler) {
            return Err(LogError::AlreadyRegistered);
        }
        state.active.try_reserve(1)?;
        state.active.push(handler);
        self.sync_dispatch(&mut state);
        Ok(())
    }

    /// Unregister a caller-owned handler
    pub fn remove_handler(&self, handler: &Arc<dyn LogHandler>) {
        let mut state = self.core.lock();
        if state.deactivate(handler) {
            self.sync_dispatch(&mut state);
        }
    }

    /// Create, own, and activate a handler through the current factories
    ///
    /// An existing factory handler with the same `id` is destroyed first and
    /// stays destroyed even if creating the new one fails. A stream or handler
    /// created along the way is destroyed before an error is returned.
    #[allow(clippy::too_many_arguments)] // One argument per handler setting
    pub fn add_factory_handler(
        &self,
        id: &str,
        handler_type: &str,
        level: LogLevel,
        filters: Vec<CategoryFilter>,
        handler_params: &serde_json::Value,
        stream_type: Option<&str>,
        stream_params: &serde_json::Value,
    ) -> LogResult<()> {
        let result = {
            let mut state = self.core.lock();
            let result = state.add_factory_handler(
                id,
                handler_type,
                level,
                filters,
                handler_params,
                stream_type,
                stream_params,
            );
            self.sync_dispatch(&mut state);
            result
        };
        match &result {
            Ok(()) => tracing::debug!(id, handler_type, ?stream_type, "factory log handler added"),
            Err(e) => tracing::warn!(id, handler_type, error = %e, "failed to add log handler"),
        }
        result
    }

    /// Create a factory handler from a [`HandlerSpec`]
    pub fn add_handler_spec(&self, spec: &HandlerSpec) -> LogResult<()> {
        let (stream_type, stream_params) = match &spec.stream {
            Some(stream) => (Some(stream.type_name.as_str()), &stream.param),
            None => (None, &serde_json::Value::Null),
        };
        self.add_factory_handler(
            &spec.id,
            &spec.handler.type_name,
            spec.level,
            spec.filters.clone(),
            &spec.handler.param,
            stream_type,
            stream_params,
        )
    }

    /// Provision every handler in a configuration, stopping at the first failure
    pub fn apply_config(&self, config: &LoggingConfig) -> LogResult<()> {
        for spec in &config.handlers {
            self.add_handler_spec(spec)?;
        }
        Ok(())
    }

    /// Destroy a factory handler; unknown ids are ignored
    pub fn remove_factory_handler(&self, id: &str) {
        let removed = {
            let mut state = self.core.lock();
            let removed = state.destroy_factory_handler(id);
            self.sync_dispatch(&mut state);
            removed
        };
        if removed {
            tracing::debug!(id, "factory log handler removed");
        }
    }

    /// Visit the ids of all factory handlers in creation order
    ///
    /// `visit` runs with the manager's lock held.
    pub fn enum_factory_handlers(&self, mut visit: impl FnMut(&str)) {
        let state = self.core.lock();
        for record in &state.factory_handlers {
            visit(&record.id);
        }
    }

    /// Ids of all factory handlers in creation order
    pub fn factory_handler_ids(&self) -> Vec<String> {
        let mut ids = Vec::new();
        self.enum_factory_handlers(|id| ids.push(id.to_string()));
        ids
    }

    /// Number of active handlers, caller-owned and factory-owned
    pub fn active_handler_count(&self) -> usize {
        self.core.lock().active.len()
    }

    /// Replace the handler factory
    ///
    /// If `factory` is a different instance, every factory handler is first
    /// destroyed through the factories that created it.
    pub fn set_handler_factory(&self, factory: Arc<dyn HandlerFactory>) {
        let mut state = self.core.lock();
        if !same_object(&state.handler_factory, &factory) {
            state.destroy_factory_handlers();
            state.handler_factory = factory;
            self.sync_dispatch(&mut state);
        }
    }

    /// Replace the stream factory
    ///
    /// If `factory` is a different instance, every factory handler is first
    /// destroyed through the factories that created it.
    pub fn set_stream_factory(&self, factory: Arc<dyn StreamFactory>) {
        let mut state = self.core.lock();
        if !same_object(&state.stream_factory, &factory) {
            state.destroy_factory_handlers();
            state.stream_factory = factory;
            self.sync_dispatch(&mut state);
        }
    }

    /// Deliver a message to every active handler
    pub fn dispatch_message(
        &self,
        msg: &str,
        level: LogLevel,
        category: Option<&str>,
        attrs: &LogAttributes,
    ) {
        self.core.message(msg, level, category, attrs);
    }

    /// Deliver raw data to every active handler
    pub fn dispatch_write(&self, data: &[u8], level: LogLevel, category: Option<&str>) {
        self.core.write(data, level, category);
    }

    /// Check whether at least one active handler accepts `level` in `category`
    pub fn query_enabled(&self, level: LogLevel, category: Option<&str>) -> bool {
        self.core.enabled(level, category)
    }

    /// Destroy all factory handlers and unregister from the platform
    ///
    /// Caller-owned handlers are dropped from the active set but not destroyed.
    pub fn shutdown(&self) {
        let mut state = self.core.lock();
        state.destroy_factory_handlers();
        state.active.clear();
        self.sync_dispatch(&mut state);
    }
}

impl Drop for LogManager {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Identity comparison for shared trait objects
fn same_object<T: ?Sized, U: ?Sized>(a: &Arc<T>, b: &Arc<U>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}
