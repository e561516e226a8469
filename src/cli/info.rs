use tabled::Table;

use crate::{
    error, info,
    management::StoreOptions,
    spotify::Endpoints,
    utils, warning,
};

/// Prints the stored config with secrets masked, plus the endpoints in use.
pub async fn info(options: StoreOptions) {
    let result = tokio::task::spawn_blocking(move || -> crate::error::Result<_> {
        let store = options.open()?;
        let stored = store.load()?;
        Ok((store.describe(), stored))
    })
    .await;

    let (location, stored) = match result {
        Ok(Ok(loaded)) => loaded,
        Ok(Err(e)) => error!("Failed to load config: {}", e),
        Err(e) => error!("Config task failed: {}", e),
    };

    info!("Config store: {}", location);
    println!("{}", Table::new(utils::config_rows(&stored)));

    let endpoints = Endpoints::from_env();
    info!("Token endpoint: {}", endpoints.token_url);
    info!("Currently playing: {}", endpoints.currently_playing_url());
    info!("Redirect URI: {}", endpoints.redirect_uri);

    if stored.spotify.access_token.is_empty() {
        if stored.spotify.authorization_code.is_empty() {
            warning!("No tokens and no authorization code stored. Run spotstatus authorize.");
        } else {
            info!("No tokens stored yet; the next run mints them from the authorization code.");
        }
    }
    if stored.slack.access_token.is_empty() {
        warning!("No Slack token stored; status updates will be rejected.");
    }
}
