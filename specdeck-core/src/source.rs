//! System data sources, the read-only data layer the engine consumes.
//!
//! Two implementations are provided: an in-memory catalog (usually loaded
//! from a JSON document) and an HTTP client for a catalog service.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::error::CatalogError;
use crate::spec::SystemRecord;

/// Entry returned by [`SystemSource::list_systems`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemSummary {
    pub name: String,
    pub slug: String,
}

/// Trait for system catalogs.
#[async_trait]
pub trait SystemSource: Send + Sync {
    /// All systems, for search and autocomplete.
    async fn list_systems(&self) -> Result<Vec<SystemSummary>, CatalogError>;

    /// One system with its base record and variants.
    async fn get_system_by_slug(&self, slug: &str) -> Result<Arc<SystemRecord>, CatalogError>;
}

/// On-disk catalog document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogDocument {
    #[serde(default)]
    pub systems: Vec<SystemRecord>,
}

/// Catalog held entirely in memory, in listing order.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    systems: Vec<Arc<SystemRecord>>,
}

impl InMemorySource {
    pub fn new(systems: Vec<SystemRecord>) -> Self {
        Self {
            systems: systems.into_iter().map(Arc::new).collect(),
        }
    }

    /// Parse a JSON catalog document.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let doc: CatalogDocument =
            serde_json::from_str(json).map_err(|e| CatalogError::Malformed {
                message: e.to_string(),
            })?;
        Ok(Self::new(doc.systems))
    }

    /// Read and parse a JSON catalog document from disk.
    pub async fn load(path: &Path) -> Result<Self, CatalogError> {
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| CatalogError::Transport {
                message: format!("Failed to read {}: {}", path.display(), e),
            })?;
        let source = Self::from_json_str(&json)?;
        debug!(path = %path.display(), systems = source.len(), "Loaded catalog file");
        Ok(source)
    }

    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }
}

#[async_trait]
impl SystemSource for InMemorySource {
    async fn list_systems(&self) -> Result<Vec<SystemSummary>, CatalogError> {
        Ok(self
            .systems
            .iter()
            .map(|s| SystemSummary {
                name: s.name.clone(),
                slug: s.slug.clone(),
            })
            .collect())
    }

    async fn get_system_by_slug(&self, slug: &str) -> Result<Arc<SystemRecord>, CatalogError> {
        self.systems
            .iter()
            .find(|s| s.slug == slug)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound {
                slug: slug.to_string(),
            })
    }
}

/// Client for a catalog service exposing `GET /systems` and
/// `GET /systems/{slug}`.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpSource {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, CatalogError> {
        let base_url = Url::parse(base_url).map_err(|e| CatalogError::Transport {
            message: format!("Invalid catalog URL '{base_url}': {e}"),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(CatalogError::Transport {
                message: format!("Catalog URL '{base_url}' cannot be a base"),
            });
        }
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CatalogError::Transport {
                message: e.to_string(),
            })?;
        Ok(Self { client, base_url })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn fetch<T: serde::de::DeserializeOwned>(
        &self,
        url: Url,
        slug: Option<&str>,
    ) -> Result<T, CatalogError> {
        debug!(%url, "Fetching from catalog service");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| CatalogError::Transport {
                message: e.to_string(),
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            if let Some(slug) = slug {
                return Err(CatalogError::NotFound {
                    slug: slug.to_string(),
                });
            }
        }
        if !status.is_success() {
            return Err(CatalogError::Transport {
                message: format!("GET {url} returned {status}"),
            });
        }

        response.json::<T>().await.map_err(|e| {
            if e.is_decode() {
                CatalogError::Malformed {
                    message: e.to_string(),
                }
            } else {
                CatalogError::Transport {
                    message: e.to_string(),
                }
            }
        })
    }
}

#[async_trait]
impl SystemSource for HttpSource {
    async fn list_systems(&self) -> Result<Vec<SystemSummary>, CatalogError> {
        self.fetch(self.endpoint(&["systems"]), None).await
    }

    async fn get_system_by_slug(&self, slug: &str) -> Result<Arc<SystemRecord>, CatalogError> {
        let record: SystemRecord = self
            .fetch(self.endpoint(&["systems", slug]), Some(slug))
            .await?;
        Ok(Arc::new(record))
    }
}
