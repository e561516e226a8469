//! Slack profile status updates.
//!
//! Uses `users.profile.set` with a user token. The call is fire-and-forget:
//! only transport failures are errors, Slack's own `ok: false` replies are
//! logged and otherwise ignored.

use reqwest::blocking::Client;

use crate::{
    config, debug,
    error::{Error, Result},
    http,
    types::{SlackConfig, SlackProfile, SlackResponse},
    warning,
};

pub struct SlackClient {
    http: Client,
    api_url: String,
}

impl SlackClient {
    /// Client for the Slack Web API rooted at `api_url` (e.g. `https://slack.com/api`).
    pub fn new(api_url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            http: http::client()?,
            api_url: api_url.into(),
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(config::slack_apiurl())
    }

    /// Sets the status text and emoji of the token owner.
    ///
    /// # Errors
    ///
    /// `Error::Transport` when the request does not get through,
    /// `Error::Decode` when the profile cannot be serialized.
    pub fn update_status(&self, text: &str, slack: &SlackConfig) -> Result<()> {
        let profile = serde_json::to_string(&SlackProfile {
            status_text: text,
            status_emoji: &slack.emoji,
        })
        .map_err(|e| Error::decode(e.to_string()))?;

        let response = self
            .http
            .post(format!(
                "{api}/users.profile.set",
                api = self.api_url.trim_end_matches('/')
            ))
            .bearer_auth(&slack.access_token)
            .form(&[("profile", profile.as_str())])
            .send()?;

        let status = response.status();
        match response.json::<SlackResponse>() {
            Ok(reply) if reply.ok => debug!("Slack accepted the status update"),
            Ok(reply) => warning!(
                "Slack refused the status update: {}",
                reply.error.unwrap_or_else(|| "unknown error".to_string())
            ),
            Err(_) => warning!("Slack answered {} with an unreadable body", status),
        }

        Ok(())
    }
}
