use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::{
    Url,
    blocking::{Client, Response},
};

use crate::{
    config, debug,
    error::{Error, Result},
    http,
    types::{
        Config, GcpAccessToken, KmsDecryptRequest, KmsDecryptResponse, KmsEncryptRequest,
        KmsEncryptResponse,
    },
};

use super::ConfigStore;

/// Google endpoints used by [`CloudStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GcpEndpoints {
    /// Cloud Storage root, e.g. `https://storage.googleapis.com`.
    pub storage_url: String,
    /// Cloud KMS API root including the version, e.g. `https://cloudkms.googleapis.com/v1`.
    pub kms_url: String,
    /// Compute metadata server, e.g. `http://metadata.google.internal`.
    pub metadata_url: String,
}

impl GcpEndpoints {
    pub fn from_env() -> Self {
        Self {
            storage_url: config::gcs_apiurl(),
            kms_url: config::kms_apiurl(),
            metadata_url: config::gcp_metadata_url(),
        }
    }
}

/// Config kept as a KMS-encrypted TOML object in a Cloud Storage bucket.
///
/// Loading downloads the object and decrypts it with the KMS key; saving
/// encrypts with the same key and uploads, asking Cloud Storage to protect
/// the object at rest with that key too.
pub struct CloudStore {
    http: Client,
    bucket: String,
    object: String,
    key_name: String,
    endpoints: GcpEndpoints,
    access_token: Option<String>,
}

impl CloudStore {
    /// `key_name` is the full KMS resource name
    /// (`projects/../locations/../keyRings/../cryptoKeys/..`). Without an
    /// `access_token` one is requested from the metadata server per call.
    pub fn new(
        bucket: impl Into<String>,
        object: impl Into<String>,
        key_name: impl Into<String>,
        endpoints: GcpEndpoints,
        access_token: Option<String>,
    ) -> Result<Self> {
        Ok(Self {
            http: http::client()?,
            bucket: bucket.into(),
            object: object.into(),
            key_name: key_name.into(),
            endpoints,
            access_token,
        })
    }

    /// Store described by `BUCKET`, `FILENAME`, `PROJECT_ID`, `LOCATION`,
    /// `KEY_RING_NAME` and `KEY_NAME`.
    pub fn from_env() -> Result<Self> {
        Self::new(
            config::gcs_bucket()?,
            config::gcs_object()?,
            config::kms_key_name()?,
            GcpEndpoints::from_env(),
            config::gcp_access_token(),
        )
    }

    fn access_token(&self) -> Result<String> {
        if let Some(token) = &self.access_token {
            return Ok(token.clone());
        }

        debug!("Requesting a Google access token from the metadata server");
        let response = self
            .http
            .get(format!(
                "{base}/computeMetadata/v1/instance/service-accounts/default/token",
                base = self.endpoints.metadata_url.trim_end_matches('/')
            ))
            .header("Metadata-Flavor", "Google")
            .send()?;
        let response = check(response, "metadata server")?;
        let token: GcpAccessToken = response
            .json()
            .map_err(|e| Error::decode(format!("metadata token: {e}")))?;
        Ok(token.access_token)
    }

    fn download(&self, token: &str) -> Result<Vec<u8>> {
        let mut url = parse_url(&self.endpoints.storage_url)?;
        url.path_segments_mut()
            .map_err(|_| Error::config("storage URL cannot be a base"))?
            .pop_if_empty()
            .extend(["storage", "v1", "b", self.bucket.as_str(), "o", self.object.as_str()]);
        url.query_pairs_mut().append_pair("alt", "media");

        let response = self.http.get(url).bearer_auth(token).send()?;
        let response = check(response, "cloud storage download")?;
        Ok(response.bytes()?.to_vec())
    }

    fn upload(&self, token: &str, data: Vec<u8>) -> Result<()> {
        let mut url = parse_url(&self.endpoints.storage_url)?;
        url.path_segments_mut()
            .map_err(|_| Error::config("storage URL cannot be a base"))?
            .pop_if_empty()
            .extend(["upload", "storage", "v1", "b", self.bucket.as_str(), "o"]);
        url.query_pairs_mut()
            .append_pair("uploadType", "media")
            .append_pair("name", &self.object)
            .append_pair("kmsKeyName", &self.key_name);

        let response = self
            .http
            .post(url)
            .bearer_auth(token)
            .header("Content-Type", "application/octet-stream")
            .body(data)
            .send()?;
        check(response, "cloud storage upload")?;
        Ok(())
    }

    fn decrypt(&self, token: &str, ciphertext: &[u8]) -> Result<Vec<u8>> {
        let response = self
            .http
            .post(self.kms_url("decrypt"))
            .bearer_auth(token)
            .json(&KmsDecryptRequest {
                ciphertext: STANDARD.encode(ciphertext),
            })
            .send()?;
        let response = check(response, "kms decrypt")?;
        let reply: KmsDecryptResponse = response
            .json()
            .map_err(|e| Error::decode(format!("kms decrypt: {e}")))?;
        STANDARD
            .decode(reply.plaintext)
            .map_err(|e| Error::decode(format!("kms decrypt: {e}")))
    }

    fn encrypt(&self, token: &str, plaintext: &[u8]) -> Result<Vec<u8>> {
        let response = self
            .http
            .post(self.kms_url("encrypt"))
            .bearer_auth(token)
            .json(&KmsEncryptRequest {
                plaintext: STANDARD.encode(plaintext),
            })
            .send()?;
        let response = check(response, "kms encrypt")?;
        let reply: KmsEncryptResponse = response
            .json()
            .map_err(|e| Error::decode(format!("kms encrypt: {e}")))?;
        STANDARD
            .decode(reply.ciphertext)
            .map_err(|e| Error::decode(format!("kms encrypt: {e}")))
    }

    fn kms_url(&self, action: &str) -> String {
        format!(
            "{base}/{key}:{action}",
            base = self.endpoints.kms_url.trim_end_matches('/'),
            key = self.key_name
        )
    }
}

impl ConfigStore for CloudStore {
    fn load(&self) -> Result<Config> {
        let token = self.access_token()?;
        let encrypted = self.download(&token)?;
        let plaintext = self.decrypt(&token, &encrypted)?;
        let content = String::from_utf8(plaintext)
            .map_err(|e| Error::storage(format!("decrypted config is not UTF-8: {e}")))?;
        Ok(toml::from_str(&content)?)
    }

    fn save(&self, config: &Config) -> Result<()> {
        let token = self.access_token()?;
        let content = toml::to_string_pretty(config)?;
        let encrypted = self.encrypt(&token, content.as_bytes())?;
        self.upload(&token, encrypted)
    }

    fn describe(&self) -> String {
        format!("gs://{}/{}", self.bucket, self.object)
    }
}

fn parse_url(url: &str) -> Result<Url> {
    Url::parse(url).map_err(|e| Error::config(format!("invalid URL {url}: {e}")))
}

fn check(response: Response, what: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().unwrap_or_default();
    Err(Error::storage(format!("{what} failed ({status}): {body}")))
}
