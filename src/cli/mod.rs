//! # CLI Module
//!
//! Command implementations behind the `spotstatus` binary. Each command
//! prints its own progress and exits the process on fatal errors through the
//! crate's `error!` macro; nothing below this layer exits.
//!
//! ## Commands
//!
//! - [`run`] - one status update cycle (load → now playing → Slack → save)
//! - [`authorize`] - obtain an authorization code and mint the first token pair
//! - [`serve`] - HTTP push endpoint running one cycle per delivered message
//! - [`info`] - show the stored config with secrets masked
//!
//! The core is blocking, so every command hands it to
//! `tokio::task::spawn_blocking` instead of calling it on the runtime.
//!
//! ## Usage Patterns
//!
//! ### Initial Setup
//! ```bash
//! spotstatus authorize             # Grant access in the browser, store tokens
//! spotstatus info                  # Check what is stored
//! ```
//!
//! ### Scheduled Usage
//! ```bash
//! spotstatus run                   # e.g. from cron every minute
//! spotstatus --store cloud serve   # behind a Pub/Sub push subscription
//! ```

mod authorize;
mod info;
mod run;
mod serve;

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

pub use authorize::authorize;
pub use info::info;
pub use run::run;
pub use serve::serve;

fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}
