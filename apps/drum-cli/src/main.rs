use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use command_service::{mock::MockProvider, CommandService};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

mod config;
mod repl;

use config::Config;

#[derive(Parser, Debug)]
#[command(
    name = "drum",
    version,
    about = "Voice command interpreter for drummers",
    disable_help_subcommand = true
)]
struct Cli {
    /// JSON config file (wake word, provider, timeout)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Classify a command with the offline rule engine only
    Parse {
        /// Command text
        #[arg(required = true)]
        text: Vec<String>,
        /// Also print the matched rule and normalized text
        #[arg(long, action = ArgAction::SetTrue)]
        explain: bool,
    },
    /// Interpret a command: remote provider first, rule engine as fallback
    Interpret {
        /// Command text
        #[arg(required = true)]
        text: Vec<String>,
        /// Answer with this raw provider output instead of calling a remote model
        #[arg(long)]
        mock_provider: Option<String>,
    },
    /// Read commands from stdin, one per line
    Repl {
        /// Only act on lines addressed with this word (e.g. maestro)
        #[arg(long)]
        wake_word: Option<String>,
        /// Answer with this raw provider output instead of calling a remote model
        #[arg(long)]
        mock_provider: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_tracing();
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Parse { text, explain } => parse(&text.join(" "), explain),
        Commands::Interpret {
            text,
            mock_provider,
        } => {
            let service = build_service(&config, mock_provider)?;
            let interpretation = service.interpret(&text.join(" ")).await?;
            println!("{}", serde_json::to_string_pretty(&interpretation)?);
            Ok(())
        }
        Commands::Repl {
            wake_word,
            mock_provider,
        } => {
            let service = build_service(&config, mock_provider)?;
            let wake_word = wake_word.or(config.wake_word);
            match &wake_word {
                Some(word) => info!("Say '{}' then your command. 'quit' to exit.", word),
                None => info!("Type commands (or 'quit')."),
            }
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            repl::run(&service, wake_word.as_deref(), stdin, std::io::stdout()).await
        }
    }
}

fn setup_tracing() {
    // Best-effort; stdout is reserved for JSON output
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

fn parse(text: &str, explain: bool) -> Result<()> {
    let engine = drum_intent::create_engine()?;
    let result = engine.parse(text);
    if explain {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", serde_json::to_string(&result.action)?);
    }
    Ok(())
}

fn build_service(config: &Config, mock_provider: Option<String>) -> Result<CommandService> {
    let service = CommandService::from_config(&config.service)?;
    Ok(match mock_provider {
        Some(reply) => service.with_provider(Arc::new(MockProvider::with_content(reply))),
        None => service,
    })
}
