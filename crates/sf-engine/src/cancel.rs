//! Cooperative cancellation for a running migration.

use sf_db::Interrupt;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Shared flag checked before every statement and ledger write.
///
/// Clones observe the same flag, so a signal handler can hold one clone while
/// the engine holds another. Cancelling also interrupts the statement in
/// flight on every attached connection.
#[derive(Clone, Default)]
pub struct CancelFlag {
    cancelled: Arc<AtomicBool>,
    interrupters: Arc<Mutex<Vec<Arc<dyn Interrupt>>>>,
}

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation and interrupt attached connections
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        let interrupters = self
            .interrupters
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        for interrupter in interrupters.iter() {
            interrupter.interrupt();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Interrupt `handle` on cancellation; immediately if already cancelled.
    pub fn attach(&self, handle: Arc<dyn Interrupt>) {
        let mut interrupters = self
            .interrupters
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if self.is_cancelled() {
            handle.interrupt();
        }
        interrupters.push(handle);
    }
}

impl fmt::Debug for CancelFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancelFlag")
            .field("cancelled", &self.is_cancelled())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[derive(Default)]
    struct CountingInterrupt(AtomicUsize);

    impl Interrupt for CountingInterrupt {
        fn interrupt(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_clones_share_state() {
        let flag = CancelFlag::new();
        let handle = flag.clone();
        assert!(!flag.is_cancelled());
        handle.cancel();
        assert!(flag.is_cancelled());
    }

    #[test]
    fn test_cancel_interrupts_attached_handles() {
        let flag = CancelFlag::new();
        let counter = Arc::new(CountingInterrupt::default());
        flag.attach(counter.clone());
        assert_eq!(counter.0.load(Ordering::SeqCst), 0);

        flag.clone().cancel();
        assert_eq!(counter.0.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_attach_after_cancel_interrupts_immediately() {
        let flag = CancelFlag::new();
        flag.cancel();
        let counter = Arc::new(CountingInterrupt::default());
        flag.attach(counter.clone());
        assert_eq!(counter.0.load(Ordering::SeqCst), 1);
    }
}
