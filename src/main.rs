use std::sync::Arc;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use sposync::{cli, config, error, types::PkceToken};
use tokio::sync::Mutex;

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    /// Without a subcommand a full sync run is performed, so the binary can
    /// sit directly in a scheduler entry.
    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize with Spotify API
    Auth,

    /// Reconcile the managed playlists against the current library
    Sync(SyncOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct SyncOptions {
    /// Restrict the run to one playlist family
    #[clap(long, value_enum)]
    pub only: Option<cli::SyncScope>,

    /// Compute and print the diff without writing anything
    #[clap(long)]
    pub dry_run: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::Sync(SyncOptions {
        only: None,
        dry_run: false,
    }));

    match command {
        Command::Auth => {
            let cfg = load_config();
            let oauth_result: Arc<Mutex<Option<PkceToken>>> = Arc::new(Mutex::new(None));
            cli::auth(&cfg, Arc::clone(&oauth_result)).await;
        }

        Command::Sync(opt) => {
            let cfg = load_config();
            cli::sync(&cfg, opt.only, opt.dry_run).await;
        }

        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}

fn load_config() -> config::Config {
    match config::Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => error!("Invalid configuration: {}", e),
    }
}
