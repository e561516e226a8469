use base64::{Engine, engine::general_purpose::STANDARD};
use serde_json::json;
use spotstatus::error::Error;
use spotstatus::management::{CloudStore, ConfigStore, GcpEndpoints, LocalStore};
use spotstatus::types::{Config, SlackConfig, SpotifyConfig};
use tempfile::tempdir;
use wiremock::matchers::{bearer_token, body_json, body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const KEY_NAME: &str = "projects/p/locations/global/keyRings/ring/cryptoKeys/key";
const OBJECT_PATH: &str = "/storage/v1/b/bucket/o/config.toml";

fn create_test_config() -> Config {
    Config {
        slack: SlackConfig {
            emoji: ":headphones:".to_string(),
            access_token: "xoxp-user".to_string(),
        },
        spotify: SpotifyConfig {
            client_id: "client-id".to_string(),
            client_secret: "client-secret".to_string(),
            authorization_code: "code".to_string(),
            access_token: "access".to_string(),
            refresh_token: "refresh".to_string(),
        },
    }
}

fn endpoints(server: &MockServer) -> GcpEndpoints {
    GcpEndpoints {
        storage_url: server.uri(),
        kms_url: format!("{}/kms/v1", server.uri()),
        metadata_url: server.uri(),
    }
}

fn kms_path(action: &str) -> String {
    format!("/kms/v1/{KEY_NAME}:{action}")
}

#[test]
fn test_local_store_roundtrip() {
    let dir = tempdir().unwrap();
    let store = LocalStore::new(dir.path().join("nested").join("config.toml"));
    let config = create_test_config();

    store.save(&config).unwrap();
    assert!(store.path().exists());
    assert_eq!(store.load().unwrap(), config);

    // No temporary file is left behind
    assert!(!dir.path().join("nested").join("config.toml.tmp").exists());
}

#[test]
fn test_local_store_overwrites() {
    let dir = tempdir().unwrap();
    let store = LocalStore::new(dir.path().join("config.toml"));

    let mut config = create_test_config();
    store.save(&config).unwrap();

    config.spotify.access_token = "rotated".to_string();
    store.save(&config).unwrap();

    assert_eq!(store.load().unwrap().spotify.access_token, "rotated");
}

#[test]
fn test_local_store_reads_legacy_keys() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("config.toml");
    std::fs::write(
        &file,
        r#"
[Slack]
Emoji = ":headphones:"
access_token = "xoxp-user"

[Spotify]
client_id = "client-id"
client_secret = "client-secret"
"#,
    )
    .unwrap();

    let config = LocalStore::new(&file).load().unwrap();

    assert_eq!(config.slack.emoji, ":headphones:");
    assert_eq!(config.slack.access_token, "xoxp-user");
    assert_eq!(config.spotify.client_id, "client-id");
    assert!(config.spotify.access_token.is_empty());
    assert!(config.spotify.refresh_token.is_empty());
}

#[test]
fn test_local_store_missing_file() {
    let dir = tempdir().unwrap();
    let store = LocalStore::new(dir.path().join("absent.toml"));

    assert!(matches!(store.load(), Err(Error::Storage(_))));
}

#[test]
fn test_local_store_invalid_toml() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("config.toml");
    std::fs::write(&file, "[slack\nemoji = ").unwrap();

    assert!(matches!(LocalStore::new(&file).load(), Err(Error::Storage(_))));
}

#[cfg(unix)]
#[test]
fn test_local_store_restricts_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let store = LocalStore::new(dir.path().join("config.toml"));
    store.save(&create_test_config()).unwrap();

    let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_cloud_store_load_decrypts_object() {
    let server = MockServer::start().await;
    let config = create_test_config();
    let plaintext = toml::to_string_pretty(&config).unwrap();

    Mock::given(method("GET"))
        .and(path(OBJECT_PATH))
        .and(query_param("alt", "media"))
        .and(bearer_token("gcp-token"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"sealed".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(kms_path("decrypt")))
        .and(bearer_token("gcp-token"))
        .and(body_json(json!({ "ciphertext": STANDARD.encode("sealed") })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "plaintext": STANDARD.encode(&plaintext) })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let gcp = endpoints(&server);
    let loaded = tokio::task::spawn_blocking(move || {
        let store = CloudStore::new(
            "bucket",
            "config.toml",
            KEY_NAME,
            gcp,
            Some("gcp-token".to_string()),
        )
        .unwrap();
        assert_eq!(store.describe(), "gs://bucket/config.toml");
        store.load()
    })
    .await
    .unwrap()
    .unwrap();

    assert_eq!(loaded, config);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_cloud_store_save_encrypts_and_uploads() {
    let server = MockServer::start().await;
    let config = create_test_config();

    Mock::given(method("POST"))
        .and(path(kms_path("encrypt")))
        .and(bearer_token("gcp-token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "ciphertext": STANDARD.encode("sealed") })),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/upload/storage/v1/b/bucket/o"))
        .and(query_param("uploadType", "media"))
        .and(query_param("name", "config.toml"))
        .and(query_param("kmsKeyName", KEY_NAME))
        .and(bearer_token("gcp-token"))
        .and(body_string("sealed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": "config.toml" })))
        .expect(1)
        .mount(&server)
        .await;

    let gcp = endpoints(&server);
    let saved = config.clone();
    tokio::task::spawn_blocking(move || {
        CloudStore::new(
            "bucket",
            "config.toml",
            KEY_NAME,
            gcp,
            Some("gcp-token".to_string()),
        )
        .unwrap()
        .save(&saved)
    })
    .await
    .unwrap()
    .unwrap();

    // The plaintext handed to KMS is the TOML config
    let requests = server.received_requests().await.unwrap();
    let encrypt = requests
        .iter()
        .find(|r| r.url.path() == kms_path("encrypt"))
        .unwrap();
    let body: serde_json::Value = encrypt.body_json().unwrap();
    let plaintext = STANDARD
        .decode(body["plaintext"].as_str().unwrap())
        .unwrap();
    let sent: Config = toml::from_str(std::str::from_utf8(&plaintext).unwrap()).unwrap();

    assert_eq!(sent, config);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_cloud_store_uses_metadata_token() {
    let server = MockServer::start().await;
    let plaintext = toml::to_string_pretty(&create_test_config()).unwrap();

    Mock::given(method("GET"))
        .and(path("/computeMetadata/v1/instance/service-accounts/default/token"))
        .and(header("Metadata-Flavor", "Google"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "metadata-token",
            "expires_in": 3599,
            "token_type": "Bearer"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(OBJECT_PATH))
        .and(bearer_token("metadata-token"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"sealed".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(kms_path("decrypt")))
        .and(bearer_token("metadata-token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "plaintext": STANDARD.encode(&plaintext) })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let gcp = endpoints(&server);
    let result = tokio::task::spawn_blocking(move || {
        CloudStore::new("bucket", "config.toml", KEY_NAME, gcp, None)
            .unwrap()
            .load()
    })
    .await
    .unwrap();

    assert!(result.is_ok());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_cloud_store_missing_object() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(OBJECT_PATH))
        .respond_with(ResponseTemplate::new(404).set_body_string("No such object"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(kms_path("decrypt")))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let gcp = endpoints(&server);
    let result = tokio::task::spawn_blocking(move || {
        CloudStore::new(
            "bucket",
            "config.toml",
            KEY_NAME,
            gcp,
            Some("gcp-token".to_string()),
        )
        .unwrap()
        .load()
    })
    .await
    .unwrap();

    match result {
        Err(Error::Storage(message)) => assert!(message.contains("404")),
        other => panic!("expected storage error, got {:?}", other),
    }
}
