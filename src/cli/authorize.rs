use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use tokio::sync::Mutex;

use crate::{
    Res,
    api::SharedAuthorization,
    config, error, info,
    management::StoreOptions,
    server,
    spotify::{Endpoints, SpotifyClient},
    success,
    types::{Config, PendingAuthorization},
    utils, warning,
};

const CALLBACK_TIMEOUT: Duration = Duration::from_secs(60);

/// Stores a fresh authorization code and mints the first token pair with it.
///
/// Without `code` the Spotify authorization page is opened in the browser (or
/// printed when `open_browser` is false) and a local callback server waits
/// for the redirect. The redirect URI registered with Spotify has to point at
/// this server for that to work; otherwise copy the `code` parameter from the
/// redirect and pass it with `--code`.
///
/// Stored tokens are discarded before minting, since the new code replaces
/// the grant they belong to.
pub async fn authorize(options: StoreOptions, code: Option<String>, open_browser: bool) {
    let code = match code {
        Some(code) => code,
        None => match wait_for_code(options.clone(), open_browser).await {
            Ok(Some(code)) => code,
            Ok(None) => error!("Authorization failed or timed out."),
            Err(e) => error!("Authorization failed: {}", e),
        },
    };

    let result = tokio::task::spawn_blocking(move || -> crate::error::Result<String> {
        let store = options.open()?;
        let mut stored = store.load()?;
        stored.spotify.authorization_code = code;
        stored.spotify.access_token.clear();
        stored.spotify.refresh_token.clear();

        SpotifyClient::from_env()?.ensure_token(&mut stored.spotify)?;
        store.save(&stored)?;
        Ok(store.describe())
    })
    .await;

    match result {
        Ok(Ok(location)) => success!("Authorization successful, tokens stored in {}", location),
        Ok(Err(e)) => error!("Failed to mint tokens: {}", e),
        Err(e) => error!("Authorization task failed: {}", e),
    }
}

async fn wait_for_code(options: StoreOptions, open_browser: bool) -> Res<Option<String>> {
    let stored = tokio::task::spawn_blocking(move || -> crate::error::Result<Config> {
        options.open()?.load()
    })
    .await??;
    if stored.spotify.client_id.is_empty() {
        return Err("spotify.client_id is not set in the config".into());
    }

    let endpoints = Endpoints::from_env();
    let state = utils::generate_state();
    let auth_url = endpoints.authorize_url(&stored.spotify.client_id, &state)?;

    let shared_state: SharedAuthorization = Arc::new(Mutex::new(Some(PendingAuthorization {
        state,
        code: None,
    })));

    let app = server::callback_router(Arc::clone(&shared_state));
    let addr = config::server_addr();
    let handle = tokio::spawn(async move {
        if let Err(e) = server::start_api_server(app, &addr).await {
            warning!("Callback server stopped: {}", e);
        }
    });

    info!("Waiting for the redirect to {}", endpoints.redirect_uri);
    if !open_browser || webbrowser::open(&auth_url).is_err() {
        warning!(
            "Open the following URL in your browser to authorize spotstatus:\n{}",
            auth_url
        );
    }

    let code = wait_for_callback(shared_state).await;
    handle.abort();
    Ok(code)
}

async fn wait_for_callback(shared_state: SharedAuthorization) -> Option<String> {
    let start = Instant::now();

    while start.elapsed() < CALLBACK_TIMEOUT {
        let lock = shared_state.lock().await;
        if let Some(code) = lock.as_ref().and_then(|p| p.code.clone()) {
            return Some(code);
        }
        drop(lock);
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    None
}
