//! Consumer coordinator: the worker pool that drains the file queue.
//!
//! The coordinator owns a fixed pool of consumer threads, each with its
//! own classifier instance. Workers block on the shared queue; when the
//! producer drops its sender the queue closes, every buffered record is
//! still delivered, and `recv()` reports disconnection only once the
//! queue is drained — that is the whole shutdown protocol, with no
//! polling latency. A supervisor thread joins every worker (unbounded
//! wait) and then fires the coordinator's FINISHED event.

use std::io;
use std::thread;

use crossbeam_channel::Receiver;

use crate::events::StageNotifier;
use crate::scanner::FileRecord;

use super::classifier::ClassifierFactory;

/// Errors from starting the consumer pool.
#[derive(thiserror::Error, Debug)]
pub enum CoordinatorError {
    /// `consume()` was called on a coordinator that is already running.
    #[error("Consumer coordinator is already running")]
    AlreadyStarted,

    /// A pool thread could not be spawned.
    #[error("Failed to spawn consumer thread: {source}")]
    Spawn {
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

/// Runs the fixed-size pool of consumer workers.
pub struct ConsumerCoordinator {
    queue: Receiver<FileRecord>,
    factory: ClassifierFactory,
    workers: usize,
    notifier: Option<StageNotifier>,
    started: bool,
}

impl ConsumerCoordinator {
    /// Create a coordinator over the receiving half of the shared queue.
    ///
    /// `workers` is the pool size; the caller validates it is at least 1.
    #[must_use]
    pub fn new(
        queue: Receiver<FileRecord>,
        factory: ClassifierFactory,
        workers: usize,
        notifier: StageNotifier,
    ) -> Self {
        Self {
            queue,
            factory,
            workers,
            notifier: Some(notifier),
            started: false,
        }
    }

    /// Start the worker pool exactly once.
    ///
    /// A second call fails fast with [`CoordinatorError::AlreadyStarted`]
    /// and performs no work. Completion is observable through the
    /// coordinator's FINISHED signal, which fires after the queue has
    /// been drained and every worker has exited.
    pub fn consume(&mut self) -> Result<(), CoordinatorError> {
        if self.started {
            return Err(CoordinatorError::AlreadyStarted);
        }
        self.started = true;

        let notifier = self.notifier.take();
        if let Some(notifier) = &notifier {
            notifier.notify_started();
        }
        log::info!("Starting {} consumer workers", self.workers);

        let mut handles = Vec::with_capacity(self.workers);
        for index in 0..self.workers {
            let queue = self.queue.clone();
            let mut classifier = self.factory.classifier();

            log::debug!("Spawning consumer worker {index}");
            let handle = thread::Builder::new()
                .name(format!("consumer-{index}"))
                .spawn(move || {
                    // recv() fails only once the producer has dropped its
                    // sender and every queued record has been delivered
                    while let Ok(record) = queue.recv() {
                        log::debug!("File consumed: {}", record.path.display());
                        classifier.classify(&record);
                    }
                    log::debug!("Consumer worker {index} finished draining");
                })
                .map_err(|source| CoordinatorError::Spawn { source })?;
            handles.push(handle);
        }

        // The supervisor detaches; its completion is observable through
        // the FINISHED signal
        thread::Builder::new()
            .name("consumer-supervisor".to_string())
            .spawn(move || {
                log::info!("Waiting for consumer workers to finish");
                for handle in handles {
                    if handle.join().is_err() {
                        log::error!("A consumer worker panicked before finishing");
                    }
                }
                if let Some(notifier) = &notifier {
                    notifier.notify_finished();
                }
                log::info!("All consumer workers finished");
            })
            .map_err(|source| CoordinatorError::Spawn { source })?;

        Ok(())
    }
}
