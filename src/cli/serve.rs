use std::sync::Arc;

use crate::{api::PushState, config, error, info, invocation, management::StoreOptions, server};

/// Runs the message-triggered entry point until the process is stopped.
pub async fn serve(options: StoreOptions) {
    info!("Serving push deliveries with the {:?} config store", options.kind);
    let state = Arc::new(PushState::new(move || invocation::run_from_env(&options)));

    if let Err(e) = server::start_api_server(server::push_router(state), &config::server_addr()).await {
        error!("Server stopped: {}", e);
    }
}
