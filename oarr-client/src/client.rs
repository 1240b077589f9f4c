//! Registry API client.

use crate::error::{ClientError, ClientResult};
use async_trait::async_trait;
use oarr_model::{CanonicalRecord, UrlVariants};
use oarr_reconcile::{RecordStore, StoreResult};
use oarr_types::RecordId;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info};

/// Field the registry indexes home-page URLs under, unanalysed.
const URL_INDEX_FIELD: &str = "register.metadata.record.url.exact";

/// Registry client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API root, e.g. `http://oarr.example.org/api/v1/`.
    pub base_url: String,
    /// Key required for writes. Reads work without one.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5007/".to_string(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    hits: Hits,
}

#[derive(Debug, Default, Deserialize)]
struct Hits {
    #[serde(default)]
    hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
struct Hit {
    #[serde(rename = "_source")]
    source: CanonicalRecord,
}

#[derive(Debug, Deserialize)]
struct SaveResponse {
    success: bool,
    #[serde(default)]
    id: Option<RecordId>,
    #[serde(default)]
    error: Option<String>,
}

/// Client for the registry's record API.
#[derive(Debug, Clone)]
pub struct OarrClient {
    base_url: String,
    api_key: Option<String>,
    client: Client,
}

impl OarrClient {
    /// Creates a client. The base URL is normalised to end with `/`.
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let base_url = config.base_url.trim();
        if base_url.is_empty() {
            return Err(ClientError::Config("base_url is empty".to_string()));
        }
        let base_url = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            base_url,
            api_key: config.api_key.filter(|k| !k.is_empty()),
            client,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn can_write(&self) -> bool {
        self.api_key.is_some()
    }

    /// Fetches a record by id; `None` on 404.
    pub async fn fetch(&self, id: &RecordId) -> ClientResult<Option<CanonicalRecord>> {
        let response = self
            .client
            .get(format!("{}record/{}", self.base_url, id))
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = response.error_for_status()?;
        Ok(Some(response.json().await?))
    }

    /// Runs a raw query against the registry's search endpoint.
    pub async fn query(&self, query: &serde_json::Value) -> ClientResult<serde_json::Value> {
        let response = self
            .client
            .get(format!("{}query", self.base_url))
            .query(&[("source", serde_json::to_string(query)?)])
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    /// First record whose home page is one of `urls`.
    pub async fn find_by_urls(&self, urls: &UrlVariants) -> ClientResult<Option<CanonicalRecord>> {
        let mut terms = serde_json::Map::new();
        terms.insert(URL_INDEX_FIELD.to_string(), json!(urls));
        let query = json!({
            "query": {"terms": terms},
            "size": 1
        });
        let raw = self.query(&query).await?;
        let parsed: QueryResponse = serde_json::from_value(raw)?;
        let found = parsed.hits.hits.into_iter().next().map(|hit| hit.source);
        debug!("URL lookup over {} variant(s): {}", urls.len(), if found.is_some() { "hit" } else { "miss" });
        Ok(found)
    }

    /// Creates (`id = None`) or overwrites a record and returns its id.
    ///
    /// Without an explicit id the record's own id is used, if it has one.
    pub async fn save(&self, record: &CanonicalRecord, id: Option<&RecordId>) -> ClientResult<RecordId> {
        let api_key = self.api_key.as_deref().ok_or(ClientError::AuthRequired)?;
        let target = id.or_else(|| record.id());
        let url = match target {
            Some(id) => format!("{}record/{}", self.base_url, id),
            None => format!("{}record", self.base_url),
        };

        let response = self
            .client
            .post(url)
            .query(&[("api_key", api_key)])
            .json(record)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let saved: SaveResponse = serde_json::from_str(&body).map_err(|_| {
            ClientError::Api(format!("unexpected response ({status}): {body}"))
        })?;

        if !saved.success {
            return Err(ClientError::Api(
                saved.error.unwrap_or_else(|| format!("save refused ({status})")),
            ));
        }
        let id = match (saved.id, target) {
            (Some(id), _) => id,
            (None, Some(id)) => id.clone(),
            (None, None) => {
                return Err(ClientError::Api("save succeeded without an id".to_string()));
            }
        };
        info!("Saved record {}", id);
        Ok(id)
    }
}

#[async_trait]
impl RecordStore for OarrClient {
    async fn find_by_url_variants(&self, urls: &UrlVariants) -> StoreResult<Option<CanonicalRecord>> {
        Ok(self.find_by_urls(urls).await?)
    }

    async fn get_record(&self, id: &RecordId) -> StoreResult<Option<CanonicalRecord>> {
        Ok(self.fetch(id).await?)
    }

    async fn save_record(
        &self,
        record: &CanonicalRecord,
        id: Option<&RecordId>,
    ) -> StoreResult<RecordId> {
        Ok(self.save(record, id).await?)
    }
}
