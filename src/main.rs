use std::path::PathBuf;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use spotstatus::{
    cli, config, error,
    management::{StoreKind, StoreOptions},
};

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
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    /// Where the config and tokens are kept
    #[clap(long, global = true, value_enum, env = "CONFIG_STORE", default_value = "local")]
    store: StoreKind,

    /// Path of the local config file (local store only)
    #[clap(long, global = true, env = "CONFIG_FILE")]
    config: Option<PathBuf>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Update the Slack status once from what Spotify is playing
    Run,

    /// Authorize with Spotify and store the first token pair
    Authorize(AuthorizeOptions),

    /// Serve the push endpoint, updating the status once per message
    Serve,

    /// Show the stored config with secrets masked
    Info,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct AuthorizeOptions {
    /// Use this authorization code instead of waiting for the redirect
    #[clap(long)]
    code: Option<String>,

    /// Print the authorization URL instead of opening a browser
    #[clap(long)]
    no_browser: bool,
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
    let store = StoreOptions::new(cli.store, cli.config);

    match cli.command {
        Command::Run => cli::run(store).await,
        Command::Authorize(opt) => cli::authorize(store, opt.code, !opt.no_browser).await,
        Command::Serve => cli::serve(store).await,
        Command::Info => cli::info(store).await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
