//! Scope guard for factory-created resources

/// Owns a freshly created resource until construction completes
///
/// Dropping the guard hands the resource to its cleanup function (the
/// factory's destroy call). [`release`](FactoryGuard::release) disarms the
/// guard and transfers the resource to the caller.
pub(crate) struct FactoryGuard<T: Clone, F: FnOnce(T)> {
    value: T,
    cleanup: Option<F>,
}

impl<T: Clone, F: FnOnce(T)> FactoryGuard<T, F> {
    pub(crate) fn new(value: T, cleanup: F) -> Self {
        Self {
            value,
            cleanup: Some(cleanup),
        }
    }

    pub(crate) fn get(&self) -> &T {
        &self.value
    }

    pub(crate) fn release(mut self) -> T {
        self.cleanup = None;
        self.value.clone()
    }
}

impl<T: Clone, F: FnOnce(T)> Drop for FactoryGuard<T, F> {
    fn drop(&mut self) {
        if let Some(cleanup) = self.cleanup.take() {
            cleanup(self.value.clone());
        }
    }
}
