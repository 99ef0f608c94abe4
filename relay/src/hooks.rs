/**
 * Host lifecycle hooks.
 *
 * The host calls `on_startup()` once it has loaded its configuration and
 * `on_shutdown()` before exiting. In between, anything that wants to post
 * a message grabs the queue through `queue()`.
 *
 * ```ignore
 * let hooks = relay::WebhookHooks::new(config.webhook);
 * hooks.on_startup();
 *
 * hooks.queue().enqueue("player joined");
 *
 * hooks.on_shutdown();
 * ```
 */
use std::sync::Arc;

use relay_core::{DispatchQueue, Transport, WebhookTransport};
use tracing::{error, info};

use crate::config::WebhookConfig;

pub struct WebhookHooks<T: Transport = WebhookTransport> {
    config: WebhookConfig,
    queue: Arc<DispatchQueue<T>>,
}

impl WebhookHooks<WebhookTransport> {
    pub fn new(config: WebhookConfig) -> Self {
        let queue = DispatchQueue::webhook(config.transport_options(), config.queue_options());
        Self::with_queue(config, Arc::new(queue))
    }
}

impl<T: Transport> WebhookHooks<T> {
    /**
     * Uses an existing queue. Its pacing and transport settings win over
     * the ones in `config`; only the URL is taken from `config`.
     */
    pub fn with_queue(config: WebhookConfig, queue: Arc<DispatchQueue<T>>) -> Self {
        Self { config, queue }
    }

    pub fn queue(&self) -> &Arc<DispatchQueue<T>> {
        &self.queue
    }

    /**
     * Configures and starts the queue.
     *
     * Returns `false` and leaves the module disabled when the URL is empty
     * or the worker cannot start. The host keeps running either way.
     * Calling it again while the queue runs is a no-op returning `true`.
     */
    pub fn on_startup(&self) -> bool {
        if !self.config.is_enabled() {
            error!("webhook url is empty, disabling module, please provide a valid url");
            return false;
        }

        if self.queue.is_running() {
            info!("webhook module already initialized");
            return true;
        }

        let started = self
            .queue
            .configure(self.config.url.as_str())
            .and_then(|()| self.queue.start());

        match started {
            Ok(()) => {
                info!(">> webhook module initialized");
                true
            }
            Err(err) => {
                error!("webhook module disabled: {err}");
                false
            }
        }
    }

    /// Drops queued messages and joins the worker.
    pub fn on_shutdown(&self) {
        info!("stopping webhook queue...");
        self.queue.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_core::{QueueOptions, Result, WorkerState};
    use std::sync::Mutex;
    use std::thread;
    use std::time::{Duration, Instant};

    #[derive(Default)]
    struct Collect {
        sent: Arc<Mutex<Vec<String>>>,
    }

    impl Transport for Collect {
        fn send(&self, _destination: &str, payload: &str) -> Result<()> {
            self.sent.lock().unwrap().push(payload.to_string());
            Ok(())
        }
    }

    fn hooks(url: &str) -> (WebhookHooks<Collect>, Arc<Mutex<Vec<String>>>) {
        let transport = Collect::default();
        let sent = Arc::clone(&transport.sent);
        let queue = DispatchQueue::with_options(
            transport,
            QueueOptions {
                pacing_interval: Duration::from_millis(1),
            },
        );
        let config = WebhookConfig {
            url: url.to_string(),
            ..Default::default()
        };
        (WebhookHooks::with_queue(config, Arc::new(queue)), sent)
    }

    #[test]
    fn test_empty_url_disables_module() {
        let (hooks, sent) = hooks("");

        assert!(!hooks.on_startup());
        hooks.queue().enqueue("ignored");
        thread::sleep(Duration::from_millis(20));

        assert_eq!(hooks.queue().state(), WorkerState::Stopped);
        assert!(sent.lock().unwrap().is_empty());

        hooks.on_shutdown();
        assert_eq!(hooks.queue().pending(), 0);
    }

    #[test]
    fn test_second_startup_is_a_noop() {
        let (hooks, _sent) = hooks("https://discord.com/api/webhooks/1/t");

        assert!(hooks.on_startup());
        assert!(hooks.on_startup());
        assert!(hooks.queue().is_running());

        hooks.on_shutdown();
        assert!(hooks.on_startup());
        assert!(hooks.queue().is_running());
        hooks.on_shutdown();
    }

    #[test]
    fn test_startup_and_shutdown() {
        let (hooks, sent) = hooks("https://discord.com/api/webhooks/1/t");

        assert!(hooks.on_startup());
        assert!(hooks.queue().is_running());

        hooks.queue().enqueue("online");
        let deadline = Instant::now() + Duration::from_secs(5);
        while sent.lock().unwrap().is_empty() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }

        hooks.on_shutdown();
        assert_eq!(hooks.queue().state(), WorkerState::Stopped);
        assert_eq!(*sent.lock().unwrap(), vec!["online".to_string()]);
    }
}
