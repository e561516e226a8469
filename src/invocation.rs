//! One status update cycle, shared by the CLI and the push endpoint.

use crate::{
    debug,
    error::Result,
    management::{ConfigStore, StoreOptions},
    slack::SlackClient,
    spotify::SpotifyClient,
};

/// Loads the config, looks up the playing track, updates the Slack status
/// and saves the config back. Returns the status text that was set.
///
/// Any failure aborts before the save, so tokens stored by a previous good
/// run are never replaced by the state of a failed one. Callers running
/// invocations concurrently must serialize them around this function.
pub fn run_once(
    store: &dyn ConfigStore,
    spotify: &SpotifyClient,
    slack: &SlackClient,
) -> Result<String> {
    let mut config = store.load()?;
    debug!("Loaded config from {}", store.describe());

    let now_playing = spotify.get_now_playing(&mut config.spotify)?;
    let text = now_playing.status_text();

    slack.update_status(&text, &config.slack)?;
    debug!("Updated status with text: {}", text);

    store.save(&config)?;
    debug!("Saved config to {}", store.describe());

    Ok(text)
}

/// [`run_once`] against the chosen store and the services configured in the
/// environment. Blocking; async callers go through `spawn_blocking`.
pub fn run_from_env(options: &StoreOptions) -> Result<String> {
    let store = options.open()?;
    run_once(
        store.as_ref(),
        &SpotifyClient::from_env()?,
        &SlackClient::from_env()?,
    )
}
