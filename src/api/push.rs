use std::sync::Arc;

use axum::{Extension, body::Bytes, http::StatusCode};
use tokio::sync::Mutex;

use crate::{error, info, success, types::PushEnvelope, utils, warning};

type Runner = dyn Fn() -> error::Result<String> + Send + Sync;

/// State behind the push endpoint.
///
/// `runner` performs one blocking invocation. `lock` serializes the
/// load-mutate-save cycles of concurrent deliveries. The guard travels with
/// the blocking task, so a delivery abandoned by its client still holds the
/// lock until its run has finished.
pub struct PushState {
    runner: Arc<Runner>,
    lock: Arc<Mutex<()>>,
}

impl PushState {
    pub fn new(runner: impl Fn() -> error::Result<String> + Send + Sync + 'static) -> Self {
        Self {
            runner: Arc::new(runner),
            lock: Arc::new(Mutex::new(())),
        }
    }
}

/// Handles a Pub/Sub push delivery.
///
/// The message payload is only logged; every delivery triggers one
/// invocation. Answers 204 on success and 500 otherwise, so Pub/Sub
/// redelivers failed messages according to the subscription's policy.
pub async fn push(Extension(state): Extension<Arc<PushState>>, body: Bytes) -> (StatusCode, String) {
    let envelope: PushEnvelope = serde_json::from_slice(&body).unwrap_or_default();
    match utils::decode_push_data(envelope.message.data.as_deref()) {
        Some(payload) => info!(
            "Received message {} with payload: {}",
            envelope.message.message_id,
            payload
        ),
        None => info!("Received message {}", envelope.message.message_id),
    }

    let guard = Arc::clone(&state.lock).lock_owned().await;
    let runner = Arc::clone(&state.runner);
    let run = tokio::task::spawn_blocking(move || {
        let _guard = guard;
        runner()
    });
    match run.await {
        Ok(Ok(text)) => {
            success!("Updated status with text: {}", text);
            (StatusCode::NO_CONTENT, String::new())
        }
        Ok(Err(e)) => {
            warning!("Status update failed, config left untouched: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
        Err(e) => {
            warning!("Status update task failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}
