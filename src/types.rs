use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// Everything a run needs, as persisted by a config store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, alias = "Slack")]
    pub slack: SlackConfig,
    #[serde(default, alias = "Spotify")]
    pub spotify: SpotifyConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlackConfig {
    #[serde(alias = "Emoji")]
    pub emoji: String,
    pub access_token: String,
}

/// Spotify credential set.
///
/// `authorization_code` is only exchanged while `access_token` is empty, so
/// once a token pair exists the code is never sent again.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpotifyConfig {
    pub client_id: String,
    pub client_secret: String,
    pub authorization_code: String,
    pub access_token: String,
    pub refresh_token: String,
}

/// Body of a token endpoint reply.
///
/// `refresh_token` is absent when the provider keeps the previous one valid.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub token_type: String,
    #[serde(default)]
    pub expires_in: u64,
    #[serde(default)]
    pub scope: String,
}

/// OAuth error body (`{"error": ..., "error_description": ...}`).
#[derive(Debug, Clone, Deserialize)]
pub struct TokenErrorResponse {
    pub error: String,
    #[serde(default)]
    pub error_description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurrentlyPlayingResponse {
    #[serde(default)]
    pub item: Option<PlayingItem>,
    #[serde(default)]
    pub is_playing: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayingItem {
    pub name: String,
    #[serde(default)]
    pub artists: Vec<PlayingArtist>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayingArtist {
    pub name: String,
}

/// Result of a now-playing lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NowPlaying {
    Playing { title: String, artist: String },
    NotPlaying,
}

impl NowPlaying {
    pub const NOT_PLAYING_TEXT: &'static str = "Not Playing";

    /// Text written into the Slack status.
    pub fn status_text(&self) -> String {
        match self {
            NowPlaying::Playing { title, artist } if !title.is_empty() && !artist.is_empty() => {
                format!("Now playing: {title} by {artist}")
            }
            _ => Self::NOT_PLAYING_TEXT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SlackProfile<'a> {
    pub status_text: &'a str,
    pub status_emoji: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SlackResponse {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// Body Pub/Sub posts to a push endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PushEnvelope {
    #[serde(default)]
    pub message: PushMessage,
    #[serde(default)]
    pub subscription: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushMessage {
    /// Base64 payload.
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub message_id: String,
}

/// Pending authorization shared between the CLI and the callback handler.
#[derive(Debug, Clone)]
pub struct PendingAuthorization {
    pub state: String,
    pub code: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GcpAccessToken {
    pub access_token: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct KmsEncryptRequest {
    pub plaintext: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KmsEncryptResponse {
    pub ciphertext: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct KmsDecryptRequest {
    pub ciphertext: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KmsDecryptResponse {
    #[serde(default)]
    pub plaintext: String,
}

#[derive(Tabled)]
pub struct ConfigTableRow {
    pub key: String,
    pub value: String,
}
