/**
 * Background worker thread that drains the message queue and delivers
 * each message to the webhook, one at a time.
 *
 * Architecture overview:
 *
 * ```text
 *  ┌──────────────┐   unbounded channel   ┌─────────────────┐
 *  │  enqueue()   │ ─────── String ──────► │  Worker thread  │
 *  │ (any thread) │                        │    (single)     │
 *  └──────────────┘                        └────────┬────────┘
 *                                                   │
 *  ┌──────────────┐   shutdown channel     Transport::send()
 *  │   stop()     │ ──── (dropped) ──────►          │
 *  └──────────────┘                          pause PACING_INTERVAL
 * ```
 *
 * Cancellation: the shutdown channel never carries a value. `stop()`
 * drops its sender, which disconnects the channel and wakes the worker
 * out of either blocking point (waiting for work, or pausing after a
 * send). Because sends are strictly serial, a flat pause after every send
 * is enough to respect the endpoint's rate limit.
 *
 * The time of the last send lives in a `Pacer` owned by the queue, so a
 * worker spawned right after `stop()` interrupted a pause still waits out
 * the rest of it before its first send.
 */
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{select, Receiver, Sender, TryRecvError};
use tracing::{error, info, warn};

use super::http::Transport;
use crate::error::{Error, Result};
use crate::protocol::destination;

// ---------------------------------------------------------------------------
// Pacer
// ---------------------------------------------------------------------------

/**
 * Pacing interval plus the instant the last send attempt finished.
 * Cloned into every worker the queue spawns.
 */
#[derive(Clone)]
pub struct Pacer {
    interval: Duration,
    last_send: Arc<Mutex<Option<Instant>>>,
}

impl Pacer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_send: Arc::new(Mutex::new(None)),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    fn record_send(&self) {
        *self.last_send.lock().unwrap_or_else(|p| p.into_inner()) = Some(Instant::now());
    }

    /// Time left before the next send is allowed.
    fn remaining(&self) -> Duration {
        match *self.last_send.lock().unwrap_or_else(|p| p.into_inner()) {
            Some(last) => self.interval.saturating_sub(last.elapsed()),
            None => Duration::ZERO,
        }
    }
}

// ---------------------------------------------------------------------------
// WorkerHandle
// ---------------------------------------------------------------------------

/**
 * Owning handle to a running worker thread.
 *
 * Holding the handle keeps the shutdown channel connected. `shutdown()`
 * consumes it, signals the worker and joins the thread.
 */
pub struct WorkerHandle {
    shutdown: Sender<()>,
    thread: JoinHandle<()>,
}

impl WorkerHandle {
    /**
     * `true` once the thread has ended without being asked to, which only
     * happens when the transport panicked.
     */
    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /**
     * Signals the worker to stop and blocks until its thread has exited.
     *
     * An in-flight send is not interrupted; the worker exits as soon as
     * it returns.
     */
    pub fn shutdown(self) {
        drop(self.shutdown);

        if self.thread.join().is_err() {
            error!("webhook worker thread terminated abnormally");
        }
    }
}

// ---------------------------------------------------------------------------
// Worker
// ---------------------------------------------------------------------------

/**
 * State moved into the worker thread.
 */
pub struct Worker<T: Transport> {
    messages: Receiver<String>,
    shutdown: Receiver<()>,
    destination: Arc<str>,
    transport: Arc<T>,
    pacer: Pacer,
}

impl<T: Transport> Worker<T> {
    /**
     * Spawns the background worker thread.
     *
     * # Arguments
     * * `messages` — receiving end of the message queue.
     * * `destination` — webhook URL every message is sent to.
     * * `transport` — performs the actual delivery.
     * * `pacer` — pause after every send attempt, shared across restarts.
     */
    pub fn spawn(
        messages: Receiver<String>,
        destination: Arc<str>,
        transport: Arc<T>,
        pacer: Pacer,
    ) -> Result<WorkerHandle> {
        let (shutdown_tx, shutdown_rx) = crossbeam_channel::bounded(0);

        let worker = Worker {
            messages,
            shutdown: shutdown_rx,
            destination,
            transport,
            pacer,
        };

        let thread = thread::Builder::new()
            .name("webhook-worker".into())
            .spawn(move || {
                /*
                 * A panic inside a transport must not take the host down
                 * with it. Log and let the thread end.
                 */
                let result = panic::catch_unwind(AssertUnwindSafe(|| worker.run_loop()));
                if result.is_err() {
                    error!("webhook worker panicked, the queue is stopped until the next start");
                }
            })
            .map_err(|e| Error::Worker(format!("failed to spawn worker thread: {e}")))?;

        Ok(WorkerHandle {
            shutdown: shutdown_tx,
            thread,
        })
    }

    fn run_loop(&self) {
        while let Some(message) = self.next_message() {
            /*
             * Only non-zero right after a restart that cut the previous
             * worker's pause short.
             */
            if !self.pause(self.pacer.remaining()) {
                break;
            }

            self.deliver(&message);
            self.pacer.record_send();

            if !self.pause(self.pacer.interval()) {
                break;
            }
        }

        info!("webhook processor closed");
    }

    /**
     * Blocks until a message is available or shutdown is signalled.
     *
     * `select!` picks at random when both sides are ready, so the
     * shutdown flag is checked once more after a message is taken: a
     * stopped worker must never start another send.
     */
    fn next_message(&self) -> Option<String> {
        let message = select! {
            recv(self.shutdown) -> _ => None,
            recv(self.messages) -> msg => msg.ok(),
        };

        if self.is_shutdown() {
            return None;
        }
        message
    }

    /// Returns `false` if shutdown arrived during the pause.
    fn pause(&self, duration: Duration) -> bool {
        if duration.is_zero() {
            return !self.is_shutdown();
        }
        select! {
            recv(self.shutdown) -> _ => false,
            default(duration) => true,
        }
    }

    fn is_shutdown(&self) -> bool {
        matches!(self.shutdown.try_recv(), Err(TryRecvError::Disconnected))
    }

    /**
     * One delivery attempt. Every outcome is logged and absorbed here;
     * nothing is retried.
     */
    fn deliver(&self, message: &str) {
        match self.transport.send(&self.destination, message) {
            Ok(()) => {
                info!(bytes = message.len(), "webhook sent successfully");
            }
            Err(Error::RemoteRejected {
                status_code,
                status_line,
            }) => {
                warn!(
                    status_code,
                    status_line = status_line.trim(),
                    "failed to send webhook, message dropped"
                );
            }
            Err(err) => {
                error!(
                    destination = %destination::redact(&self.destination),
                    "webhook delivery error, message dropped: {err}"
                );
            }
        }
    }
}
