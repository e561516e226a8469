use base64::{Engine, engine::general_purpose::STANDARD};
use rand::{Rng, distr::Alphanumeric};

use crate::types::{Config, ConfigTableRow};

/// Random value for the OAuth `state` parameter.
pub fn generate_state() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

/// Shows only the first four characters of a secret.
///
/// Empty values are rendered as `(not set)`.
pub fn mask_secret(secret: &str) -> String {
    if secret.is_empty() {
        return "(not set)".to_string();
    }

    let visible: String = secret.chars().take(4).collect();
    format!("{visible}… ({} chars)", secret.chars().count())
}

/// Decodes the base64 payload of a push message.
///
/// Returns `None` for missing, empty or undecodable payloads; non-UTF-8 bytes
/// are replaced.
pub fn decode_push_data(data: Option<&str>) -> Option<String> {
    let data = data.filter(|d| !d.is_empty())?;
    let bytes = STANDARD.decode(data).ok()?;
    Some(String::from_utf8_lossy(&bytes).into_owned())
}

/// Rows for the `info` table. Secrets are masked.
pub fn config_rows(config: &Config) -> Vec<ConfigTableRow> {
    let row = |key: &str, value: String| ConfigTableRow {
        key: key.to_string(),
        value,
    };

    vec![
        row("spotify.client_id", config.spotify.client_id.clone()),
        row(
            "spotify.client_secret",
            mask_secret(&config.spotify.client_secret),
        ),
        row(
            "spotify.authorization_code",
            mask_secret(&config.spotify.authorization_code),
        ),
        row(
            "spotify.access_token",
            mask_secret(&config.spotify.access_token),
        ),
        row(
            "spotify.refresh_token",
            mask_secret(&config.spotify.refresh_token),
        ),
        row("slack.emoji", config.slack.emoji.clone()),
        row("slack.access_token", mask_secret(&config.slack.access_token)),
    ]
}
