use crate::{error, invocation, management::StoreOptions, success};

use super::spinner;

pub async fn run(options: StoreOptions) {
    let pb = spinner("Updating status from Spotify...");
    let result = tokio::task::spawn_blocking(move || invocation::run_from_env(&options)).await;
    pb.finish_and_clear();

    match result {
        Ok(Ok(text)) => success!("Updated status with text: {}", text),
        Ok(Err(e)) => error!("Status update failed, config left untouched: {}", e),
        Err(e) => error!("Status update task failed: {}", e),
    }
}
