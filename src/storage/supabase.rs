//! Supabase Storage REST client.
//!
//! # Endpoints
//! - list: `POST {url}/storage/v1/object/list/{bucket}`
//! - download: `GET {url}/storage/v1/object/authenticated/{bucket}/{key}`
//! - public: `{url}/storage/v1/object/public/{bucket}/{key}`
//! - upload: `POST {url}/storage/v1/object/{bucket}/{key}` (`x-upsert`)
//!
//! Every request carries the project key as both `apikey` and bearer token.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use url::Url;

use crate::storage::{ObjectInfo, ObjectStore, StorageError, StorageResult, UploadOptions};

/// Storage client bound to one bucket of one project.
#[derive(Clone)]
pub struct SupabaseStorage {
    client: Client,
    base: Url,
    bucket: String,
}

/// Error body returned by the storage API.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl SupabaseStorage {
    /// Create a client for `bucket` at the project `url`.
    pub fn new(url: &str, api_key: &str, bucket: &str, timeout: Duration) -> StorageResult<Self> {
        let mut base: Url = url
            .parse()
            .map_err(|e| StorageError::InvalidConfig(format!("Invalid storage URL '{}': {}", url, e)))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(api_key)
            .map_err(|_| StorageError::InvalidConfig("API key is not a valid header value".to_string()))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", api_key))
            .map_err(|_| StorageError::InvalidConfig("API key is not a valid header value".to_string()))?;
        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base,
            bucket: bucket.to_string(),
        })
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    fn endpoint(&self, path: &str) -> StorageResult<Url> {
        self.base
            .join(path)
            .map_err(|e| StorageError::InvalidConfig(format!("Invalid storage path '{}': {}", path, e)))
    }

    fn list_url(&self) -> StorageResult<Url> {
        self.endpoint(&format!("storage/v1/object/list/{}", self.bucket))
    }

    fn download_url(&self, key: &str) -> StorageResult<Url> {
        self.endpoint(&format!("storage/v1/object/authenticated/{}/{}", self.bucket, key))
    }

    fn upload_url(&self, key: &str) -> StorageResult<Url> {
        self.endpoint(&format!("storage/v1/object/{}/{}", self.bucket, key))
    }
}

/// Map a non-success response to a storage error.
async fn error_from(response: Response) -> StorageError {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    let body: Option<ErrorBody> = serde_json::from_str(&text).ok();

    let not_found = status == StatusCode::NOT_FOUND
        || body
            .as_ref()
            .and_then(|b| b.error.as_deref())
            .is_some_and(|e| e.eq_ignore_ascii_case("not_found"));

    let message = body
        .and_then(|b| b.message.or(b.error))
        .unwrap_or_else(|| if text.is_empty() { status.to_string() } else { text });

    if not_found {
        StorageError::NotFound(message)
    } else {
        StorageError::Status {
            status: status.as_u16(),
            message,
        }
    }
}

/// Listing request body. The backend returns one page of at most 100 names,
/// so lookups of a single key narrow the page with `search`.
fn list_body(search: &str) -> Value {
    json!({
        "prefix": "",
        "search": search,
        "limit": 100,
        "offset": 0,
        "sortBy": { "column": "name", "order": "asc" },
    })
}

#[async_trait]
impl ObjectStore for SupabaseStorage {
    async fn list(&self, search: &str) -> StorageResult<Vec<ObjectInfo>> {
        let response = self
            .client
            .post(self.list_url()?)
            .json(&list_body(search))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from(response).await);
        }
        Ok(response.json().await?)
    }

    async fn download(&self, key: &str) -> StorageResult<Vec<u8>> {
        let response = self.client.get(self.download_url(key)?).send().await?;
        if !response.status().is_success() {
            return Err(error_from(response).await);
        }
        Ok(response.bytes().await?.to_vec())
    }

    fn public_url(&self, key: &str) -> Option<Url> {
        self.endpoint(&format!("storage/v1/object/public/{}/{}", self.bucket, key))
            .ok()
    }

    async fn upload(&self, key: &str, body: Vec<u8>, options: UploadOptions) -> StorageResult<()> {
        let response = self
            .client
            .post(self.upload_url(key)?)
            .header(CONTENT_TYPE, options.content_type)
            .header("x-upsert", if options.upsert { "true" } else { "false" })
            .body(body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from(response).await);
        }
        Ok(())
    }
}
