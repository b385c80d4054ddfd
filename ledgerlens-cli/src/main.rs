use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ledgerlens_ingest::StatementClient;
use std::io::IsTerminal;
use std::sync::Mutex;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::prelude::*;

mod config;
mod page;
mod render;
mod state;
mod tui;

use config::{Config, DisplayMode};

const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("LEDGERLENS_BUILD_SHA"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "ledgerlens", version = VERSION, about = "Fetch and display a bank statement")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the account page (default)
    View {
        /// Print once to stdout instead of opening the TUI
        #[arg(long)]
        plain: bool,

        /// Backend origin serving /api/getbalance
        #[arg(long)]
        base_url: Option<String>,

        /// IANA timezone for transaction dates (e.g. Europe/Amsterdam)
        #[arg(long)]
        tz: Option<String>,
    },

    /// Fetch the statement once and print the validated JSON
    Fetch {
        #[arg(long)]
        base_url: Option<String>,

        #[arg(long)]
        pretty: bool,
    },

    /// Manage ~/.ledgerlens/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config if none exists
    Init,
    /// Print the effective config
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config()?;

    let command = cli.command.unwrap_or(Command::View {
        plain: false,
        base_url: None,
        tz: None,
    });

    match command {
        Command::View { plain, base_url, tz } => {
            let mode = if plain {
                DisplayMode::Plain
            } else {
                cfg.display.mode
            };
            init_logging(mode)?;

            let tz = match tz {
                Some(name) => config::parse_timezone(&name)?,
                None => cfg.display.tz()?,
            };
            let client = build_client(&cfg, base_url)?;

            match mode {
                DisplayMode::Tui => tui::run_tui(&client, tz).await?,
                DisplayMode::Plain => {
                    let mut page = page::AccountPage::new();
                    page.load(&client).await;
                    for line in render::plain_lines(&page, tz) {
                        println!("{line}");
                    }
                }
            }
        }

        Command::Fetch { base_url, pretty } => {
            init_logging(DisplayMode::Plain)?;
            let client = build_client(&cfg, base_url)?;
            let statement = client
                .fetch()
                .await
                .with_context(|| format!("fetching {}", client.url()))?;

            let json = if pretty {
                serde_json::to_string_pretty(&statement)?
            } else {
                serde_json::to_string(&statement)?
            };
            println!("{json}");
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                println!("# {}", config::config_path()?.display());
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },
    }

    Ok(())
}

fn build_client(cfg: &Config, base_url: Option<String>) -> Result<StatementClient> {
    let base_url = base_url.unwrap_or_else(|| cfg.server.base_url.clone());
    StatementClient::with_timeout(&base_url, cfg.server.timeout())
        .with_context(|| format!("building HTTP client for {base_url}"))
}

/// Logs go to stderr, or to a file while the TUI owns the terminal. `RUST_LOG` overrides the level.
fn init_logging(mode: DisplayMode) -> Result<()> {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();

    match mode {
        DisplayMode::Plain => {
            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_ansi(std::io::stderr().is_terminal()),
                )
                .with(env_filter)
                .init();
        }
        DisplayMode::Tui => {
            let path = state::tui_log_path()?;
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("open {}", path.display()))?;
            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(Mutex::new(file))
                        .with_ansi(false),
                )
                .with(env_filter)
                .init();
        }
    }

    Ok(())
}
