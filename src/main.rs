use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::{debug, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use planchat::connector::api::controller::EnvelopeController;
use planchat::{Commands, Container, ContainerConfig, MalformedReplyPolicy, ModelProvider, Router};

#[derive(Parser)]
#[command(name = "planchat")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Model service: gemini, anthropic or mock
    #[arg(long, global = true, default_value = "gemini")]
    provider: ModelProvider,

    /// Model name, overriding GEMINI_MODEL / ANTHROPIC_MODEL
    #[arg(long, global = true)]
    model: Option<String>,

    /// Webhook endpoint, overriding PLANCHAT_WEBHOOK_URL
    #[arg(long, global = true)]
    webhook_url: Option<String>,

    /// PEM file whose certificates replace the system trust store for the webhook
    #[arg(long, global = true)]
    ca_cert: Option<PathBuf>,

    /// Answer webhook calls in-process instead of over the network
    #[arg(long, global = true)]
    mock_webhook: bool,

    /// Timeout in seconds for each outbound request (default: none)
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    timeout_secs: Option<u64>,

    /// What to do when the model reply holds malformed JSON: fail or empty
    #[arg(long, global = true, default_value = "fail")]
    on_malformed: MalformedReplyPolicy,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Rendering an envelope needs neither credentials nor network clients.
    if let Commands::Envelope {
        version,
        month,
        measure,
        value,
    } = cli.command
    {
        let output = EnvelopeController::new().envelope(version, month, measure, value)?;
        println!("{}", output);
        return Ok(());
    }

    let config = ContainerConfig {
        provider: cli.provider,
        model: cli.model,
        webhook_url: cli.webhook_url,
        ca_cert: cli.ca_cert,
        mock_webhook: cli.mock_webhook,
        timeout: cli.timeout_secs.map(Duration::from_secs),
        malformed_policy: cli.on_malformed,
    };
    debug!(
        "Provider {}, malformed replies: {}",
        config.provider, config.malformed_policy
    );

    let container = Container::new(config)?;
    let router = Router::new(&container);
    let output = router.route(cli.command).await?;
    println!("{}", output);

    Ok(())
}

#[cfg(test)]
mod cli_tests {
    use super::*;

    #[test]
    fn defaults_to_gemini_and_fail_policy() {
        let cli = Cli::try_parse_from(["planchat", "extract", "hello"]).unwrap();
        assert_eq!(cli.provider, ModelProvider::Gemini);
        assert_eq!(cli.on_malformed, MalformedReplyPolicy::Fail);
        assert!(cli.timeout_secs.is_none());
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let cli = Cli::try_parse_from([
            "planchat",
            "ask",
            "Set March to 5",
            "--provider",
            "mock",
            "--on-malformed",
            "empty",
        ])
        .unwrap();
        assert_eq!(cli.provider, ModelProvider::Mock);
        assert_eq!(cli.on_malformed, MalformedReplyPolicy::Empty);
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let res = Cli::try_parse_from(["planchat", "--provider", "openai", "chat"]);
        assert!(res.is_err());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let res = Cli::try_parse_from(["planchat", "--timeout-secs", "0", "extract", "hi"]);
        assert!(res.is_err());

        let cli =
            Cli::try_parse_from(["planchat", "--timeout-secs", "5", "extract", "hi"]).unwrap();
        assert_eq!(cli.timeout_secs, Some(5));
    }

    #[test]
    fn envelope_takes_plan_version_flag() {
        let cli = Cli::try_parse_from([
            "planchat",
            "envelope",
            "--plan-version",
            "Plan Year 2",
            "--value",
            "3",
        ])
        .unwrap();
        match cli.command {
            Commands::Envelope { version, value, month, .. } => {
                assert_eq!(version, "Plan Year 2");
                assert_eq!(value, "3");
                assert_eq!(month, "");
            }
            _ => panic!("expected envelope command"),
        }
    }
}
