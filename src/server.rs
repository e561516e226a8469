use std::{net::SocketAddr, str::FromStr, sync::Arc};

use axum::{
    Extension, Router,
    routing::{get, post},
};

use crate::{
    Res,
    api::{self, PushState, SharedAuthorization},
    info,
};

/// Router for the message-triggered entry point.
pub fn push_router(state: Arc<PushState>) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/", post(api::push).layer(Extension(state)))
}

/// Router waiting for the OAuth redirect.
pub fn callback_router(state: SharedAuthorization) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/callback", get(api::callback).layer(Extension(state)))
}

/// Binds `addr` and serves `app` until the process ends.
pub async fn start_api_server(app: Router, addr: &str) -> Res<()> {
    let addr = SocketAddr::from_str(addr)
        .map_err(|e| format!("Failed to parse server address {addr}: {e}"))?;

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
