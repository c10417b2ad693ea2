//! Cancellation signal owned by a control link.

use parking_lot::RwLock;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// A callback type for cancellation notifications.
pub type CancelCallback = Box<dyn Fn() + Send + Sync>;

/// Shared state between a control link and its [`Canceller`].
#[derive(Default)]
pub(crate) struct CancelState {
    cancelled: AtomicBool,
    /// First reason wins.
    reason: RwLock<Option<String>>,
    /// Drained on cancellation, so each callback runs at most once.
    callbacks: RwLock<Vec<CancelCallback>>,
}

impl CancelState {
    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    pub(crate) fn reason(&self) -> Option<String> {
        self.reason.read().clone()
    }

    fn cancel(&self, reason: String) {
        {
            // The reason is written under the same lock that readers of a
            // set flag wait on.
            let mut slot = self.reason.write();
            if self
                .cancelled
                .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
                .is_err()
            {
                return;
            }
            debug!(reason = %reason, "Context link cancelled");
            *slot = Some(reason);
        }

        let callbacks = std::mem::take(&mut *self.callbacks.write());
        for callback in &callbacks {
            run_callback(callback.as_ref());
        }
    }

    fn on_cancel(&self, callback: CancelCallback) {
        {
            let mut callbacks = self.callbacks.write();
            if !self.is_cancelled() {
                callbacks.push(callback);
                return;
            }
        }
        run_callback(callback.as_ref());
    }
}

fn run_callback(callback: &(dyn Fn() + Send + Sync)) {
    if let Err(e) = std::panic::catch_unwind(std::panic::AssertUnwindSafe(callback)) {
        warn!("Cancellation callback panicked: {:?}", e);
    }
}

impl fmt::Debug for CancelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancelState")
            .field("cancelled", &self.is_cancelled())
            .field("reason", &self.reason())
            .finish()
    }
}

/// Cancels the control link it was handed out with.
///
/// Cancellation is idempotent and only affects that one link; links derived
/// from it or wrapped by it keep their own state.
#[derive(Clone)]
pub struct Canceller {
    state: Arc<CancelState>,
}

impl Canceller {
    pub(crate) fn new(state: Arc<CancelState>) -> Self {
        Self { state }
    }

    /// Requests cancellation with a reason. Only the first reason is kept.
    ///
    /// Registered callbacks run once, on the calling thread. Panics in
    /// callbacks are logged and suppressed.
    pub fn cancel(&self, reason: impl Into<String>) {
        self.state.cancel(reason.into());
    }

    /// Registers a callback to run on cancellation.
    ///
    /// If the link is already cancelled, the callback runs immediately.
    pub fn on_cancel<F>(&self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.state.on_cancel(Box::new(callback));
    }

    /// Returns whether cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.state.is_cancelled()
    }

    /// Returns the cancellation reason, if any.
    #[must_use]
    pub fn reason(&self) -> Option<String> {
        self.state.reason()
    }
}

impl fmt::Debug for Canceller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Canceller")
            .field("cancelled", &self.is_cancelled())
            .field("reason", &self.reason())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn canceller() -> Canceller {
        Canceller::new(Arc::new(CancelState::default()))
    }

    #[test]
    fn test_default_not_cancelled() {
        let canceller = canceller();
        assert!(!canceller.is_cancelled());
        assert!(canceller.reason().is_none());
    }

    #[test]
    fn test_cancel_idempotent() {
        let canceller = canceller();
        canceller.cancel("First reason");
        canceller.cancel("Second reason");

        assert!(canceller.is_cancelled());
        assert_eq!(canceller.reason(), Some("First reason".to_string()));
    }

    #[test]
    fn test_on_cancel_runs_once() {
        let canceller = canceller();
        let counter = Arc::new(AtomicUsize::new(0));
        let counter_clone = counter.clone();

        canceller.on_cancel(move || {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(counter.load(Ordering::SeqCst), 0);

        canceller.cancel("test");
        canceller.cancel("again");

        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_on_cancel_after_cancellation() {
        let canceller = canceller();
        canceller.cancel("test");

        let counter = Arc::new(AtomicUsize::new(0));
        let counter_clone = counter.clone();
        canceller.on_cancel(move || {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_callback_panic_suppressed() {
        let canceller = canceller();
        canceller.on_cancel(|| panic!("Intentional panic"));

        canceller.cancel("test");
        assert!(canceller.is_cancelled());
    }

    #[test]
    fn test_clones_share_state() {
        let canceller = canceller();
        let clone = canceller.clone();

        clone.cancel("from clone");
        assert_eq!(canceller.reason(), Some("from clone".to_string()));
    }

    #[test]
    fn test_reason_visible_once_cancelled() {
        for _ in 0..50 {
            let canceller = canceller();
            let readers: Vec<_> = (0..4)
                .map(|_| {
                    let observer = canceller.clone();
                    std::thread::spawn(move || {
                        while !observer.is_cancelled() {
                            std::hint::spin_loop();
                        }
                        observer.reason()
                    })
                })
                .collect();

            canceller.cancel("racing");

            for reader in readers {
                assert_eq!(reader.join().unwrap(), Some("racing".to_string()));
            }
        }
    }
}
