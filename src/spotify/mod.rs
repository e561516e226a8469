//! # Spotify Integration Module
//!
//! This module implements the two pieces of Spotify interaction spotstatus
//! needs: keeping an OAuth token pair alive and asking which track is playing.
//!
//! ## Core Modules
//!
//! ### Authentication Module
//!
//! [`auth`] - Token lifecycle:
//! - **Mint**: exchanges the one-time authorization code for a token pair when
//!   no access token is stored yet
//! - **Refresh**: exchanges the refresh token for a new access token; the
//!   refresh token is only replaced when the provider hands out a new one
//! - **Authorize URL**: [`Endpoints::authorize_url`] builds the page a user
//!   visits to obtain a fresh code
//!
//! Both token requests use HTTP Basic authentication with the client id and
//! secret and a form-encoded body.
//!
//! ### Player Module
//!
//! [`player`] - Currently-playing lookup with reactive re-authentication:
//!
//! ```text
//! NoToken --mint--> HaveToken --GET--> Playing | NotPlaying
//!                       |
//!                      401 --refresh--> HaveToken --GET--> Playing | NotPlaying | AuthFailed
//! ```
//!
//! No expiry clock is kept. A stale token is discovered by the 401 it causes.
//!
//! ## Error Types
//!
//! All functions return [`crate::error::Result`]:
//! - **`Error::Transport`** - the currently-playing request never got a reply
//! - **`Error::Auth`** - a token request failed or a refreshed token was rejected
//! - **`Error::Decode`** - a body could not be decoded

pub mod auth;
pub mod player;

use reqwest::blocking::Client;

use crate::{config, error::Result, http};

/// Endpoints the Spotify client talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Token endpoint, e.g. `https://accounts.spotify.com/api/token`.
    pub token_url: String,
    /// Authorization page, e.g. `https://accounts.spotify.com/authorize`.
    pub auth_url: String,
    /// Web API base, e.g. `https://api.spotify.com/v1`.
    pub api_url: String,
    pub redirect_uri: String,
    pub scope: String,
}

impl Endpoints {
    pub fn from_env() -> Self {
        Self {
            token_url: config::spotify_apitoken_url(),
            auth_url: config::spotify_apiauth_url(),
            api_url: config::spotify_apiurl(),
            redirect_uri: config::spotify_redirect_uri(),
            scope: config::spotify_scope(),
        }
    }

    /// Endpoints for a single base URL, with the token endpoint at
    /// `{base}/api/token` and the Web API at `{base}/v1`.
    pub fn with_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            token_url: format!("{base}/api/token"),
            auth_url: format!("{base}/authorize"),
            api_url: format!("{base}/v1"),
            redirect_uri: config::DEFAULT_SPOTIFY_API_REDIRECT_URI.to_string(),
            scope: config::DEFAULT_SPOTIFY_API_AUTH_SCOPE.to_string(),
        }
    }

    pub fn currently_playing_url(&self) -> String {
        format!(
            "{api}/me/player/currently-playing",
            api = self.api_url.trim_end_matches('/')
        )
    }
}

/// Blocking Spotify client.
pub struct SpotifyClient {
    http: Client,
    endpoints: Endpoints,
}

impl SpotifyClient {
    pub fn new(endpoints: Endpoints) -> Result<Self> {
        Ok(Self {
            http: http::client()?,
            endpoints,
        })
    }

    /// Client for the endpoints configured in the environment.
    pub fn from_env() -> Result<Self> {
        Self::new(Endpoints::from_env())
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }
}
