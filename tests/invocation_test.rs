use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use serde_json::json;
use spotstatus::error::{Error, Result};
use spotstatus::invocation::run_once;
use spotstatus::management::ConfigStore;
use spotstatus::slack::SlackClient;
use spotstatus::spotify::{Endpoints, SpotifyClient};
use spotstatus::types::{Config, SlackConfig, SpotifyConfig};
use wiremock::matchers::{bearer_token, body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PLAYER_PATH: &str = "/v1/me/player/currently-playing";
const TOKEN_PATH: &str = "/api/token";
const SLACK_PATH: &str = "/slack/users.profile.set";

/// Store that keeps the config in memory and counts saves.
#[derive(Default)]
struct MemoryStore {
    config: Mutex<Config>,
    saves: AtomicUsize,
}

impl MemoryStore {
    fn with(config: Config) -> Arc<Self> {
        Arc::new(Self {
            config: Mutex::new(config),
            saves: AtomicUsize::new(0),
        })
    }

    fn current(&self) -> Config {
        self.config.lock().unwrap().clone()
    }

    fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl ConfigStore for MemoryStore {
    fn load(&self) -> Result<Config> {
        Ok(self.current())
    }

    fn save(&self, config: &Config) -> Result<()> {
        *self.config.lock().unwrap() = config.clone();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

fn stored_config(access_token: &str, refresh_token: &str, code: &str) -> Config {
    Config {
        slack: SlackConfig {
            emoji: ":musical_note:".to_string(),
            access_token: "xoxp-user".to_string(),
        },
        spotify: SpotifyConfig {
            client_id: "client-id".to_string(),
            client_secret: "client-secret".to_string(),
            authorization_code: code.to_string(),
            access_token: access_token.to_string(),
            refresh_token: refresh_token.to_string(),
        },
    }
}

async fn invoke(server: &MockServer, store: Arc<MemoryStore>) -> Result<String> {
    let base = server.uri();
    tokio::task::spawn_blocking(move || {
        let spotify = SpotifyClient::new(Endpoints::with_base(&base)).unwrap();
        let slack = SlackClient::new(format!("{base}/slack")).unwrap();
        run_once(store.as_ref(), &spotify, &slack)
    })
    .await
    .unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn test_cold_start_mints_updates_and_saves() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(body_string_contains("grant_type=authorization_code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "minted",
            "refresh_token": "minted-refresh"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(PLAYER_PATH))
        .and(bearer_token("minted"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "item": { "name": "Song A", "artists": [{ "name": "Artist B" }] }
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(SLACK_PATH))
        .and(bearer_token("xoxp-user"))
        .and(body_string_contains("Now+playing%3A+Song+A+by+Artist+B"))
        .and(body_string_contains("musical_note"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&server)
        .await;

    let store = MemoryStore::with(stored_config("", "", "one-time-code"));
    let text = invoke(&server, store.clone()).await.unwrap();

    assert_eq!(text, "Now playing: Song A by Artist B");
    assert_eq!(store.saves(), 1);

    let saved = store.current();
    assert_eq!(saved.spotify.access_token, "minted");
    assert_eq!(saved.spotify.refresh_token, "minted-refresh");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_stale_token_refreshes_and_clears_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(PLAYER_PATH))
        .and(bearer_token("stale"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(body_string_contains("grant_type=refresh_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "fresh"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(PLAYER_PATH))
        .and(bearer_token("fresh"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(SLACK_PATH))
        .and(body_string_contains("Not+Playing"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&server)
        .await;

    let store = MemoryStore::with(stored_config("stale", "r1", ""));
    let text = invoke(&server, store.clone()).await.unwrap();

    assert_eq!(text, "Not Playing");
    assert_eq!(store.saves(), 1);

    let saved = store.current();
    assert_eq!(saved.spotify.access_token, "fresh");
    assert_eq!(saved.spotify.refresh_token, "r1");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_failed_run_leaves_store_untouched() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("garbage"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(SLACK_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(0)
        .mount(&server)
        .await;

    let before = stored_config("", "", "one-time-code");
    let store = MemoryStore::with(before.clone());
    let result = invoke(&server, store.clone()).await;

    assert!(matches!(result, Err(Error::Auth(_))));
    assert_eq!(store.saves(), 0);
    assert_eq!(store.current(), before);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_slack_refusal_still_saves() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(PLAYER_PATH))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(SLACK_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "ok": false, "error": "invalid_auth" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let store = MemoryStore::with(stored_config("stored", "r1", ""));
    let text = invoke(&server, store.clone()).await.unwrap();

    assert_eq!(text, "Not Playing");
    assert_eq!(store.saves(), 1);
}
