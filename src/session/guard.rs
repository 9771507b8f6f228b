//! Single in-flight operation token.

use std::sync::atomic::{AtomicBool, Ordering};

/// Held for the duration of a session operation; released on drop.
#[derive(Debug)]
pub(crate) struct OperationGuard<'a> {
    busy: &'a AtomicBool,
}

impl<'a> OperationGuard<'a> {
    /// Take the token, or `None` if another operation holds it.
    pub(crate) fn try_acquire(busy: &'a AtomicBool) -> Option<Self> {
        busy.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { busy })
    }
}

impl Drop for OperationGuard<'_> {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}
