/**
 * The dispatch queue — central component that owns the pending messages,
 * the background worker, and the transport.
 *
 * Lifecycle:
 * 1. The host creates one `DispatchQueue` and shares it via `Arc`.
 * 2. `configure(url)` stores the webhook URL, `start()` spawns the worker.
 * 3. Any thread calls `enqueue(text)`; the call never blocks.
 * 4. `stop()` at shutdown drops whatever is still queued and joins the
 *    worker. Dropping the queue does the same.
 *
 * Delivery is at-most-once: a message taken off the queue is handed to
 * the transport exactly once, whatever the outcome.
 */
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};
use tracing::{debug, error, info, warn};

use crate::error::{Error, Result};
use crate::protocol::constants::PACING_INTERVAL;
use crate::transport::{Pacer, Transport, TransportOptions, WebhookTransport, Worker, WorkerHandle};

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueOptions {
    /// Pause after every send attempt, successful or not.
    pub pacing_interval: Duration,
}

impl Default for QueueOptions {
    fn default() -> Self {
        Self {
            pacing_interval: PACING_INTERVAL,
        }
    }
}

// ---------------------------------------------------------------------------
// WorkerState
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Stopped,
    Running,
}

// ---------------------------------------------------------------------------
// DispatchQueue
// ---------------------------------------------------------------------------

/// Lifecycle state guarded by one mutex. Enqueueing never touches it.
#[derive(Default)]
struct Lifecycle {
    destination: Option<Arc<str>>,
    worker: Option<WorkerHandle>,
}

impl Lifecycle {
    /**
     * Running worker, if any. A worker whose thread already ended (its
     * transport panicked) is joined and forgotten, so the queue reads as
     * stopped and the next `start()` spawns a fresh one.
     */
    fn live_worker(&mut self) -> Option<&WorkerHandle> {
        if self.worker.as_ref().is_some_and(WorkerHandle::is_finished) {
            if let Some(dead) = self.worker.take() {
                dead.shutdown();
            }
            warn!("webhook worker exited unexpectedly, queue is stopped");
        }
        self.worker.as_ref()
    }
}

/**
 * Rate-limited, single-worker, fire-and-forget message queue.
 *
 * Owns:
 * - Both ends of an unbounded FIFO channel. The worker gets a clone of
 *   the receiver; the queue keeps its own so `stop()` can discard
 *   leftovers and the channel never disconnects under `enqueue()`.
 * - The transport, shared with the worker.
 * - The lifecycle (destination + running worker) behind a mutex.
 */
pub struct DispatchQueue<T: Transport = WebhookTransport> {
    sender: Sender<String>,
    receiver: Receiver<String>,
    transport: Arc<T>,
    pacer: Pacer,
    lifecycle: Mutex<Lifecycle>,
}

impl DispatchQueue<WebhookTransport> {
    /**
     * Builds a queue backed by the real HTTP transport.
     */
    pub fn webhook(transport: TransportOptions, options: QueueOptions) -> Self {
        Self::with_options(WebhookTransport::new(transport), options)
    }
}

impl Default for DispatchQueue<WebhookTransport> {
    fn default() -> Self {
        Self::webhook(TransportOptions::default(), QueueOptions::default())
    }
}

impl<T: Transport> DispatchQueue<T> {
    pub fn new(transport: T) -> Self {
        Self::with_options(transport, QueueOptions::default())
    }

    pub fn with_options(transport: T, options: QueueOptions) -> Self {
        let (sender, receiver) = crossbeam_channel::unbounded();

        Self {
            sender,
            receiver,
            transport: Arc::new(transport),
            pacer: Pacer::new(options.pacing_interval),
            lifecycle: Mutex::new(Lifecycle::default()),
        }
    }

    /**
     * Stores the destination URL. Must be called before `start()`.
     *
     * The only check is that the URL is not blank; the shape is validated
     * by the transport on every send. An empty URL disables delivery but
     * is not fatal: the error is logged and returned.
     *
     * The destination cannot change while the worker runs.
     */
    pub fn configure(&self, destination: impl Into<String>) -> Result<()> {
        let destination = destination.into();
        let destination = destination.trim();

        if destination.is_empty() {
            error!("the webhook url is empty, please provide one");
            return Err(Error::Configuration("webhook url is empty".into()));
        }

        let mut lifecycle = self.lock();
        if lifecycle.live_worker().is_some() {
            warn!("refusing to change the webhook url while the queue is running");
            return Err(Error::Configuration(
                "cannot change the webhook url while the queue is running".into(),
            ));
        }

        lifecycle.destination = Some(Arc::from(destination));
        Ok(())
    }

    /**
     * Appends a message to the tail of the queue and returns immediately.
     *
     * Works whether or not the worker is running: messages queued while
     * stopped are delivered after the next `start()`, or discarded by
     * `stop()`.
     */
    pub fn enqueue(&self, payload: impl Into<String>) {
        /*
         * The queue holds its own receiver, so the channel stays connected
         * for as long as `self` exists.
         */
        if self.sender.send(payload.into()).is_err() {
            warn!("webhook queue is disconnected, dropping message");
        }
    }

    /**
     * Spawns the worker if it is not already running.
     *
     * Idempotent. Fails with `Configuration` when no destination has been
     * configured; nothing is spawned in that case.
     */
    pub fn start(&self) -> Result<()> {
        let mut lifecycle = self.lock();

        if lifecycle.live_worker().is_some() {
            debug!("webhook worker already running");
            return Ok(());
        }

        let destination = match lifecycle.destination.clone() {
            Some(destination) => destination,
            None => {
                error!("webhook url is not configured, the queue will not start");
                return Err(Error::Configuration("webhook url is not configured".into()));
            }
        };

        let handle = Worker::spawn(
            self.receiver.clone(),
            destination,
            Arc::clone(&self.transport),
            self.pacer.clone(),
        )?;
        lifecycle.worker = Some(handle);

        info!(
            pending = self.receiver.len(),
            pacing_ms = self.pacer.interval().as_millis() as u64,
            "webhook worker started"
        );
        Ok(())
    }

    /**
     * Stops the worker and discards every message still queued.
     *
     * Blocks until the worker thread has exited. A send already in flight
     * runs to completion first. Idempotent, and safe without a prior
     * `start()`.
     *
     * The lifecycle lock is held across the join so a concurrent
     * `start()` cannot spawn a second worker in the meantime. `enqueue()`
     * never takes that lock.
     */
    pub fn stop(&self) {
        let mut lifecycle = self.lock();

        if let Some(handle) = lifecycle.worker.take() {
            handle.shutdown();
        }

        let dropped = self.receiver.try_iter().count();
        if dropped > 0 {
            info!(dropped, "discarded queued webhook messages on stop");
        }
    }

    pub fn state(&self) -> WorkerState {
        if self.lock().live_worker().is_some() {
            WorkerState::Running
        } else {
            WorkerState::Stopped
        }
    }

    pub fn is_running(&self) -> bool {
        self.state() == WorkerState::Running
    }

    /// Number of messages waiting to be picked up by the worker.
    pub fn pending(&self) -> usize {
        self.receiver.len()
    }

    pub fn destination(&self) -> Option<String> {
        self.lock().destination.as_deref().map(str::to_string)
    }

    pub fn pacing_interval(&self) -> Duration {
        self.pacer.interval()
    }

    /**
     * A poisoned lock only means a previous holder panicked; the
     * lifecycle data itself is still consistent.
     */
    fn lock(&self) -> MutexGuard<'_, Lifecycle> {
        self.lifecycle
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<T: Transport> Drop for DispatchQueue<T> {
    fn drop(&mut self) {
        self.stop();
    }
}
