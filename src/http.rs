//! Blocking HTTP client shared by the Spotify, Slack and cloud store clients.
//!
//! All requests go through a client with a fixed request timeout.

use std::time::Duration;

use reqwest::blocking::Client;

use crate::error::Result;

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Builds the blocking client.
///
/// Must be called (and the client dropped) outside of an async context; async
/// callers go through `tokio::task::spawn_blocking`.
pub fn client() -> Result<Client> {
    let client = Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}
