//! Configuration management for spotstatus.
//!
//! This module handles loading and accessing configuration values from environment
//! variables and `.env` files. Credentials themselves live in the config store
//! (see [`crate::management`]); this module only covers the settings needed to
//! reach the services and the store.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (where applicable)

use std::{env, path::PathBuf};

use crate::error::{Error, Result};

const APP_DIR: &str = "spotstatus";

pub const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_SPOTIFY_API_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_SPOTIFY_API_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_SPOTIFY_API_REDIRECT_URI: &str = "http://127.0.0.1:8888/callback";
pub const DEFAULT_SPOTIFY_API_AUTH_SCOPE: &str = "user-read-currently-playing";
pub const DEFAULT_SLACK_API_URL: &str = "https://slack.com/api";
pub const DEFAULT_GCS_API_URL: &str = "https://storage.googleapis.com";
pub const DEFAULT_KMS_API_URL: &str = "https://cloudkms.googleapis.com/v1";
pub const DEFAULT_GCP_METADATA_URL: &str = "http://metadata.google.internal";

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the directory if it doesn't exist. A missing `.env` file is not an
/// error: in a hosted deployment every setting arrives through the process
/// environment instead.
///
/// The function looks for the `.env` file in:
/// - Linux: `~/.local/share/spotstatus/.env`
/// - macOS: `~/Library/Application Support/spotstatus/.env`
/// - Windows: `%LOCALAPPDATA%/spotstatus/.env`
///
/// # Errors
///
/// Returns an error if the directory cannot be created or an existing `.env`
/// file cannot be parsed.
pub async fn load_env() -> std::result::Result<(), String> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if !path.is_file() {
        return Ok(());
    }

    dotenv::from_path(&path).map_err(|e| e.to_string())
}

/// Platform-specific directory holding `.env` and the local config file.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(APP_DIR);
    path
}

/// Whether `debug!` output is enabled (`SPOTSTATUS_DEBUG` set to anything but `0`).
pub fn debug_enabled() -> bool {
    env::var("SPOTSTATUS_DEBUG").is_ok_and(|v| !v.is_empty() && v != "0")
}

/// Path of the local TOML config file.
///
/// `CONFIG_FILE` wins; otherwise `config.toml` in the data directory.
pub fn config_file() -> PathBuf {
    match env::var("CONFIG_FILE") {
        Ok(path) if !path.is_empty() => PathBuf::from(path),
        _ => data_dir().join("config.toml"),
    }
}

/// Returns the address the HTTP server binds to.
///
/// `SERVER_ADDRESS` wins. Hosted platforms usually only hand out a `PORT`, in
/// which case the server listens on all interfaces.
pub fn server_addr() -> String {
    if let Ok(addr) = env::var("SERVER_ADDRESS") {
        return addr;
    }
    match env::var("PORT") {
        Ok(port) => format!("0.0.0.0:{port}"),
        Err(_) => "127.0.0.1:8888".to_string(),
    }
}

/// Base URL of the Spotify Web API (`SPOTIFY_API_URL`).
pub fn spotify_apiurl() -> String {
    var_or("SPOTIFY_API_URL", DEFAULT_SPOTIFY_API_URL)
}

/// Spotify token endpoint used for minting and refreshing (`SPOTIFY_API_TOKEN_URL`).
pub fn spotify_apitoken_url() -> String {
    var_or("SPOTIFY_API_TOKEN_URL", DEFAULT_SPOTIFY_API_TOKEN_URL)
}

/// Spotify authorization page (`SPOTIFY_API_AUTH_URL`).
pub fn spotify_apiauth_url() -> String {
    var_or("SPOTIFY_API_AUTH_URL", DEFAULT_SPOTIFY_API_AUTH_URL)
}

/// OAuth redirect URI (`SPOTIFY_API_REDIRECT_URI`).
///
/// Must match the redirect URI registered for the Spotify application, and
/// must be the same value at authorization time and at token mint time.
pub fn spotify_redirect_uri() -> String {
    var_or("SPOTIFY_API_REDIRECT_URI", DEFAULT_SPOTIFY_API_REDIRECT_URI)
}

/// Scope requested during authorization (`SPOTIFY_API_AUTH_SCOPE`).
pub fn spotify_scope() -> String {
    var_or("SPOTIFY_API_AUTH_SCOPE", DEFAULT_SPOTIFY_API_AUTH_SCOPE)
}

/// Base URL of the Slack Web API (`SLACK_API_URL`).
pub fn slack_apiurl() -> String {
    var_or("SLACK_API_URL", DEFAULT_SLACK_API_URL)
}

pub fn gcs_apiurl() -> String {
    var_or("GCS_API_URL", DEFAULT_GCS_API_URL)
}

pub fn kms_apiurl() -> String {
    var_or("KMS_API_URL", DEFAULT_KMS_API_URL)
}

pub fn gcp_metadata_url() -> String {
    var_or("GCP_METADATA_URL", DEFAULT_GCP_METADATA_URL)
}

/// Explicit Google access token (`GOOGLE_OAUTH_ACCESS_TOKEN`).
///
/// When unset the cloud store asks the metadata server instead.
pub fn gcp_access_token() -> Option<String> {
    env::var("GOOGLE_OAUTH_ACCESS_TOKEN")
        .ok()
        .filter(|t| !t.is_empty())
}

/// Bucket holding the encrypted config (`BUCKET`).
pub fn gcs_bucket() -> Result<String> {
    required("BUCKET")
}

/// Object name of the encrypted config inside the bucket (`FILENAME`).
pub fn gcs_object() -> Result<String> {
    required("FILENAME")
}

/// Full resource name of the KMS key protecting the cloud config.
///
/// Built from `PROJECT_ID`, `LOCATION`, `KEY_RING_NAME` and `KEY_NAME`.
///
/// # Example
///
/// ```
/// let key = kms_key_name()?;
/// // projects/my-project/locations/global/keyRings/ring/cryptoKeys/config
/// ```
pub fn kms_key_name() -> Result<String> {
    Ok(format!(
        "projects/{project}/locations/{location}/keyRings/{ring}/cryptoKeys/{key}",
        project = required("PROJECT_ID")?,
        location = required("LOCATION")?,
        ring = required("KEY_RING_NAME")?,
        key = required("KEY_NAME")?,
    ))
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn required(name: &str) -> Result<String> {
    match env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(Error::config(format!("{name} must be set"))),
    }
}
