//! PokeAPI client

use std::sync::{Arc, OnceLock};

use reqwest::StatusCode;
use serde::Deserialize;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::state::{CatalogEntry, CatalogPage, NamedResource, PAGE_SIZE};

pub const API_BASE: &str = "https://pokeapi.co/api/v2";
const DETAIL_CONCURRENCY: usize = PAGE_SIZE;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("{0} not found")]
    NotFound(String),
    #[error("could not decode {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("detail task failed: {0}")]
    Task(String),
}

#[derive(Clone, Debug, Deserialize)]
struct ListResponse {
    count: usize,
    results: Vec<NamedResource>,
}

#[derive(Clone, Debug)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::with_base_url(API_BASE)
    }
}

impl ApiClient {
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn page_url(&self, offset: usize) -> String {
        format!(
            "{}/pokemon/?limit={PAGE_SIZE}&offset={offset}",
            self.base_url
        )
    }

    pub fn entry_url(&self, id: &str) -> String {
        format!("{}/pokemon/{}", self.base_url, urlencoding::encode(id))
    }

    /// Listing call plus one detail call per summary, reassembled in listing order.
    pub async fn fetch_page(&self, offset: usize) -> Result<CatalogPage, ApiError> {
        let listing: ListResponse = self.get_json(&self.page_url(offset)).await?;
        tracing::debug!(
            offset,
            count = listing.count,
            listed = listing.results.len(),
            "listing loaded"
        );

        let semaphore = Arc::new(Semaphore::new(DETAIL_CONCURRENCY));
        let mut join_set = JoinSet::new();
        for (index, summary) in listing.results.iter().enumerate() {
            let client = self.clone();
            let url = summary.url.clone();
            let semaphore = semaphore.clone();
            join_set.spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|_| ApiError::Task("detail semaphore closed".to_string()))?;
                let entry: CatalogEntry = client.get_json(&url).await?;
                Ok::<_, ApiError>((index, entry))
            });
        }

        let mut slots: Vec<Option<CatalogEntry>> = vec![None; listing.results.len()];
        while let Some(joined) = join_set.join_next().await {
            let (index, entry) = joined.map_err(|err| ApiError::Task(err.to_string()))??;
            slots[index] = Some(entry);
        }

        Ok(CatalogPage {
            items: slots.into_iter().flatten().collect(),
            total_count: listing.count,
        })
    }

    /// Single-entry lookup by lowercase name or numeric id.
    ///
    /// Dot segments would be collapsed into the listing URL, so they are never sent.
    /// A response without a name or id is treated as a miss.
    pub async fn fetch_entry(&self, id: &str) -> Result<CatalogEntry, ApiError> {
        if id.is_empty() || id.chars().all(|c| c == '.') {
            return Err(ApiError::NotFound(id.to_string()));
        }
        let url = self.entry_url(id);
        match self.get_json::<CatalogEntry>(&url).await {
            Ok(entry) if !entry.is_identified() => {
                tracing::warn!(url, "lookup returned a record without identity");
                Err(ApiError::NotFound(id.to_string()))
            }
            Err(ApiError::Status { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                Err(ApiError::NotFound(id.to_string()))
            }
            other => other,
        }
    }

    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        let response = self.send(url).await?;
        let bytes = response.bytes().await.map_err(|source| ApiError::Request {
            url: url.to_string(),
            source,
        })?;
        Ok(bytes.to_vec())
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        let bytes = self.fetch_bytes(url).await?;
        serde_json::from_slice(&bytes).map_err(|source| {
            tracing::warn!(url, error = %source, "response did not decode");
            ApiError::Decode {
                url: url.to_string(),
                source,
            }
        })
    }

    async fn send(&self, url: &str) -> Result<reqwest::Response, ApiError> {
        tracing::debug!(url, "GET");
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| ApiError::Request {
                url: url.to_string(),
                source,
            })?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url, status = status.as_u16(), "request rejected");
            return Err(ApiError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response)
    }
}

static CLIENT: OnceLock<ApiClient> = OnceLock::new();

/// Install the process-wide client. Only the first call has an effect.
pub fn configure(base_url: &str) {
    if CLIENT.set(ApiClient::with_base_url(base_url)).is_err() {
        tracing::warn!(base_url, "api client already configured");
    }
}

pub fn client() -> &'static ApiClient {
    CLIENT.get_or_init(ApiClient::default)
}
