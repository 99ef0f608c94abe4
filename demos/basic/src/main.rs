/**
 * Minimal harness for the webhook relay.
 *
 * Posts each message (or each stdin line when none are given) to the
 * configured webhook, paced like the real host would:
 *
 *   cargo run -p relay_demo -- --url https://discord.com/api/webhooks/<id>/<token> hello world
 *   echo "from stdin" | cargo run -p relay_demo -- --config relay.toml
 */
use std::io::BufRead;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "relay-demo", version, about = "Send messages through the webhook relay")]
struct Cli {
    /// Path to a relay TOML config.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Webhook URL, overrides `webhook.url` from the config.
    #[arg(short, long, env = "WEBHOOK_URL")]
    url: Option<String>,

    /// Extra time to wait after the queue drains, so the last send can finish.
    #[arg(long, default_value_t = 2000)]
    linger_ms: u64,

    /// Messages to send. Reads stdin lines when empty.
    messages: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    relay::init_logging();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => relay::load_config(path)?,
        None => relay::RelayConfig::default(),
    };
    if let Some(url) = cli.url {
        config.webhook.url = url;
    }

    let hooks = relay::WebhookHooks::new(config.webhook);
    if !hooks.on_startup() {
        anyhow::bail!("webhook module is disabled, see the log above");
    }

    let messages = if cli.messages.is_empty() {
        std::io::stdin().lock().lines().collect::<Result<Vec<_>, _>>()?
    } else {
        cli.messages
    };

    for message in &messages {
        hooks.queue().enqueue(message.as_str());
    }
    println!("[demo] queued {} message(s)", messages.len());

    /*
     * `on_shutdown` drops whatever is still queued, so wait for the
     * backlog to drain first.
     */
    while hooks.queue().pending() > 0 {
        thread::sleep(Duration::from_millis(50));
    }
    thread::sleep(Duration::from_millis(cli.linger_ms));

    hooks.on_shutdown();
    println!("[demo] done");
    Ok(())
}
