mod dispatch;
mod event_reader;

use clap::{Parser, Subcommand};
use hookbell_channels::{sound::SoundChannel, telegram::TelegramChannel, webhook::WebhookChannel};
use hookbell_core::{
    config::{self, Config, Readiness},
    synthesize::synthesize,
    traits::Channel,
};
use std::io::IsTerminal;
use std::sync::Arc;
use tracing::{error, info, warn};

const DEFAULT_FALLBACK: &str = "Claude Code task finished";

#[derive(Parser)]
#[command(
    name = "hookbell",
    version,
    about = "Relay Claude Code hook events to Telegram, webhooks and sound"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to config file.
    #[arg(short, long, default_value_t = config::default_path())]
    config: String,

    /// Text to send when no hook event arrives on stdin.
    #[arg(short, long)]
    message: Option<String>,

    /// Task name; sends "Completed: <task>" when no hook event arrives.
    #[arg(short, long)]
    task: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show which channels are configured.
    Status,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Config errors are logged once tracing is up; the hook must not fail.
    let (mut cfg, load_error) = match config::load(&cli.config) {
        Ok(cfg) => (cfg, None),
        Err(e) => (Config::default(), Some(e)),
    };
    let env_notes = config::apply_env_overrides(&mut cfg, |key| std::env::var(key).ok());

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.hookbell.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Some(e) = load_error {
        error!("{e}; continuing with defaults and environment");
    }
    for note in &env_notes {
        warn!("{note}");
    }

    match cli.command {
        Some(Commands::Status) => {
            print_status(&cli.config, &cfg);
            Ok(())
        }
        None => {
            let fallback = fallback_text(cli.message.as_deref(), cli.task.as_deref());
            run(&cfg, &fallback).await;
            tokio::time::sleep(cfg.hookbell.grace_delay()).await;
            std::process::exit(0);
        }
    }
}

/// Read the event, build the message, deliver it, print the summary.
async fn run(cfg: &Config, fallback: &str) {
    let interactive = std::io::stdin().is_terminal();
    let event = event_reader::read_event(
        tokio::io::stdin(),
        interactive,
        cfg.hookbell.ingest_timeout(),
    )
    .await;
    if let Some(ref ev) = event {
        info!("received {} hook event", ev.hook_event_name);
    }

    let message = Arc::new(synthesize(event.as_ref(), fallback).await);
    let channels = build_channels(cfg);
    if !channels.iter().any(|c| c.is_enabled()) {
        warn!("no channels enabled; set one up in the config file or environment");
    }

    let results =
        dispatch::dispatch_all(message, &channels, cfg.hookbell.delivery_timeout()).await;
    dispatch::print_summary(&results);
}

/// Fallback body used when there is no usable hook event.
fn fallback_text(message: Option<&str>, task: Option<&str>) -> String {
    match (message, task) {
        (Some(m), _) if !m.trim().is_empty() => m.to_string(),
        (_, Some(t)) if !t.trim().is_empty() => format!("Completed: {t}"),
        _ => DEFAULT_FALLBACK.to_string(),
    }
}

/// Build the configured channels in fixed dispatch order.
fn build_channels(cfg: &Config) -> Vec<Arc<dyn Channel>> {
    let mut channels: Vec<Arc<dyn Channel>> = Vec::new();

    if let Some(ref tg) = cfg.channel.telegram {
        channels.push(Arc::new(TelegramChannel::new(tg.clone())));
    }
    if let Some(ref hook) = cfg.channel.webhook {
        channels.push(Arc::new(WebhookChannel::new(hook.clone())));
    }
    if let Some(ref sound) = cfg.channel.sound {
        channels.push(Arc::new(SoundChannel::new(sound.clone())));
    }

    channels
}

fn print_status(config_path: &str, cfg: &Config) {
    println!("hookbell status\n");
    println!("Config: {}", config::shellexpand(config_path));
    println!("Log level: {}", cfg.hookbell.log_level);
    println!();

    let telegram = cfg.channel.telegram.as_ref().map(|tg| {
        let mut line = tg.readiness().describe();
        if tg.readiness() == Readiness::Ready {
            if let Ok(Some(proxy)) = tg.proxy_descriptor() {
                line.push_str(&format!(" (via proxy {}:{})", proxy.host, proxy.port));
            }
        }
        line
    });
    let webhook = cfg.channel.webhook.as_ref().map(|w| w.readiness().describe());
    let sound = cfg.channel.sound.as_ref().map(|s| {
        let mut line = s.readiness().describe();
        if s.enabled {
            line.push_str(&format!(" (command: {})", s.command));
        }
        line
    });

    for (name, state) in [("telegram", telegram), ("webhook", webhook), ("sound", sound)] {
        println!(
            "  {name}: {}",
            state.unwrap_or_else(|| "not configured".to_string())
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_text_priority() {
        assert_eq!(fallback_text(Some("hi"), Some("build")), "hi");
        assert_eq!(fallback_text(None, Some("build")), "Completed: build");
        assert_eq!(fallback_text(Some("  "), Some("build")), "Completed: build");
        assert_eq!(fallback_text(None, None), DEFAULT_FALLBACK);
    }

    #[test]
    fn test_build_channels_order_and_gates() {
        let cfg = config::parse(
            r#"
            [channel.sound]
            enabled = false

            [channel.webhook]
            enabled = true
            url = "http://localhost/x"

            [channel.telegram]
            enabled = true
        "#,
        )
        .unwrap();
        let channels = build_channels(&cfg);
        let names: Vec<_> = channels.iter().map(|c| c.name().to_string()).collect();
        assert_eq!(names, vec!["telegram", "webhook", "sound"]);
        let enabled: Vec<_> = channels.iter().map(|c| c.is_enabled()).collect();
        assert_eq!(enabled, vec![true, true, false]);
    }

    #[test]
    fn test_no_config_no_channels() {
        assert!(build_channels(&Config::default()).is_empty());
    }

    #[test]
    fn test_cli_parses_message_and_task() {
        let cli = Cli::parse_from(["hookbell", "-m", "hello", "--task", "deploy"]);
        assert_eq!(cli.message.as_deref(), Some("hello"));
        assert_eq!(cli.task.as_deref(), Some("deploy"));
        assert!(cli.command.is_none());

        let cli = Cli::parse_from(["hookbell", "--config", "/tmp/h.toml", "status"]);
        assert_eq!(cli.config, "/tmp/h.toml");
        assert!(matches!(cli.command, Some(Commands::Status)));
    }
}
