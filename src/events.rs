//! One-shot lifecycle signals for pipeline stages.
//!
//! Each pipeline stage (walker, coordinator) reports its lifecycle
//! boundaries as typed events over dedicated one-shot channels: STARTED
//! fires immediately before the stage begins its work, FINISHED fires
//! unconditionally when it ends. The consuming side can block on either
//! signal without risk of missing it — the events are buffered — and a
//! stage that dies without signaling closes its channel, so waiters are
//! never left hanging.

use crossbeam_channel::{bounded, Receiver, Sender};
use std::sync::{Mutex, PoisonError};

/// Lifecycle boundary of a pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageEvent {
    /// The stage is about to begin its work.
    Started,
    /// The stage has finished, normally or after an aborted run.
    Finished,
}

/// Sending half of a stage's lifecycle signals.
///
/// Each signal fires at most once: the underlying sender is consumed on
/// the first call, and later calls are silently ignored.
#[derive(Debug)]
pub struct StageNotifier {
    started: Mutex<Option<Sender<StageEvent>>>,
    finished: Mutex<Option<Sender<StageEvent>>>,
}

/// Receiving half of a stage's lifecycle signals.
#[derive(Debug)]
pub struct StageSignals {
    started: Receiver<StageEvent>,
    finished: Receiver<StageEvent>,
}

/// Create a connected notifier/signals pair for one stage.
#[must_use]
pub fn stage_channel() -> (StageNotifier, StageSignals) {
    let (started_tx, started_rx) = bounded(1);
    let (finished_tx, finished_rx) = bounded(1);
    (
        StageNotifier {
            started: Mutex::new(Some(started_tx)),
            finished: Mutex::new(Some(finished_tx)),
        },
        StageSignals {
            started: started_rx,
            finished: finished_rx,
        },
    )
}

impl StageNotifier {
    /// Signal that the stage is about to begin. Fires at most once.
    pub fn notify_started(&self) {
        Self::fire(&self.started, StageEvent::Started);
    }

    /// Signal that the stage has finished. Fires at most once.
    pub fn notify_finished(&self) {
        Self::fire(&self.finished, StageEvent::Finished);
    }

    fn fire(slot: &Mutex<Option<Sender<StageEvent>>>, event: StageEvent) {
        // A poisoned slot only means another thread panicked while
        // firing; taking the sender is still safe.
        let mut slot = slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(tx) = slot.take() {
            // The receiver may already be gone; nothing left to notify.
            let _ = tx.send(event);
        }
    }
}

impl StageSignals {
    /// Block until the stage reports STARTED.
    ///
    /// Returns `None` if the notifier was dropped without ever firing.
    pub fn wait_started(&self) -> Option<StageEvent> {
        self.started.recv().ok()
    }

    /// Block until the stage reports FINISHED.
    ///
    /// Returns `None` if the notifier was dropped without ever firing.
    pub fn wait_finished(&self) -> Option<StageEvent> {
        self.finished.recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_signals_are_buffered() {
        let (notifier, signals) = stage_channel();

        // Fire both before anyone waits; nothing blocks or is lost
        notifier.notify_started();
        notifier.notify_finished();

        assert_eq!(signals.wait_started(), Some(StageEvent::Started));
        assert_eq!(signals.wait_finished(), Some(StageEvent::Finished));
    }

    #[test]
    fn test_each_signal_fires_once() {
        let (notifier, signals) = stage_channel();

        notifier.notify_finished();
        notifier.notify_finished();

        assert_eq!(signals.wait_finished(), Some(StageEvent::Finished));
        // The second call was a no-op and the sender is gone
        assert!(signals.finished.recv().is_err());
    }

    #[test]
    fn test_dropped_notifier_unblocks_waiter() {
        let (notifier, signals) = stage_channel();
        drop(notifier);

        assert_eq!(signals.wait_finished(), None);
        assert_eq!(signals.wait_started(), None);
    }

    #[test]
    fn test_wait_across_threads() {
        let (notifier, signals) = stage_channel();

        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(10));
            notifier.notify_started();
            notifier.notify_finished();
        });

        assert_eq!(signals.wait_started(), Some(StageEvent::Started));
        assert_eq!(signals.wait_finished(), Some(StageEvent::Finished));
        handle.join().unwrap();
    }
}
