//! Spotify → Slack status mirror.
//!
//! This library looks up the track currently playing on Spotify and writes it
//! into the Slack profile status of the same user. OAuth credentials for
//! Spotify are kept in a config store and carried over from run to run.
//!
//! # Modules
//!
//! - `api` - HTTP handlers for the push endpoint and the OAuth callback
//! - `cli` - Command-line interface implementations
//! - `config` - Environment variables and `.env` loading
//! - `error` - Error taxonomy shared by the core and the stores
//! - `http` - Blocking HTTP client construction
//! - `invocation` - One load → fetch → update → save cycle
//! - `management` - Config stores (local TOML file, encrypted cloud object)
//! - `server` - Local HTTP server hosting the handlers
//! - `slack` - Slack profile status updates
//! - `spotify` - Token lifecycle and now-playing lookup
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use spotstatus::{config, invocation, management::LocalStore, slack::SlackClient, spotify::SpotifyClient};
//!
//! fn main() -> spotstatus::Res<()> {
//!     let store = LocalStore::new(config::config_file());
//!     let text = invocation::run_once(&store, &SpotifyClient::from_env()?, &SlackClient::from_env()?)?;
//!     println!("{text}");
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod http;
pub mod invocation;
pub mod management;
pub mod server;
pub mod slack;
pub mod spotify;
pub mod types;
pub mod utils;

/// A convenient Result type alias for top-level glue code.
///
/// The library itself reports [`error::Error`]; this boxed alias is used where
/// errors of different origins (I/O, task joins, server setup) meet.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Fetching currently playing track...");
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only the CLI layer uses this macro. Library code and request handlers
/// return errors instead, since exiting would take the server down with it.
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a dimmed diagnostic line when `SPOTSTATUS_DEBUG` is set.
///
/// Used for the token lifecycle and HTTP status decisions, which are too
/// chatty for normal runs but useful when a run misbehaves.
#[macro_export]
macro_rules! debug {
  ($($arg:tt)*) => ({
    if $crate::config::debug_enabled() {
      use colored::Colorize;
      println!("[{}] {}", "·".dimmed(), std::format_args!($($arg)*));
    }
  })
}
