use std::{collections::HashMap, sync::Arc};

use axum::{Extension, extract::Query, http::StatusCode, response::Html};
use tokio::sync::Mutex;

use crate::{types::PendingAuthorization, warning};

pub type SharedAuthorization = Arc<Mutex<Option<PendingAuthorization>>>;

/// Receives the redirect from the Spotify authorization page.
///
/// Stores the authorization code in the shared state when the `state`
/// parameter matches the pending authorization. The code itself is exchanged
/// by the CLI once it picks it up.
pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(shared_state): Extension<SharedAuthorization>,
) -> (StatusCode, Html<&'static str>) {
    if let Some(error) = params.get("error") {
        warning!("Authorization was denied: {}", error);
        return (
            StatusCode::BAD_REQUEST,
            Html("<h4>Authorization was denied.</h4>"),
        );
    }

    let Some(code) = params.get("code") else {
        return (
            StatusCode::BAD_REQUEST,
            Html("<h4>Missing authorization code.</h4>"),
        );
    };

    let mut state = shared_state.lock().await;
    let Some(pending) = state.as_mut() else {
        return (
            StatusCode::CONFLICT,
            Html("<h4>No authorization in progress.</h4>"),
        );
    };

    if params.get("state") != Some(&pending.state) {
        warning!("Ignoring authorization callback with mismatching state");
        return (StatusCode::BAD_REQUEST, Html("<h4>State mismatch.</h4>"));
    }

    pending.code = Some(code.clone());
    (
        StatusCode::OK,
        Html("<h2>Authorization received.</h2><p>You can close this browser window.</p>"),
    )
}
