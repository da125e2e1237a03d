use std::marker::PhantomData;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::config::ClientConfig;
use crate::error::{ApiError, Result};
use crate::field::{EditableField, FieldValue};
use crate::resource::Resource;

/// Access to one REST collection. One attempt per call, no retries.
#[async_trait]
pub trait ResourceClient<R: Resource>: Send + Sync {
    async fn list_all(&self) -> Result<Vec<R>>;

    async fn get(&self, id: &str) -> Result<R>;

    /// Persists exactly one field and returns the stored record.
    async fn update_field(&self, id: &str, field: R::Field, value: &FieldValue) -> Result<R>;

    async fn remove(&self, id: &str) -> Result<()>;

    async fn create(&self, record: &R) -> Result<R>;
}

#[derive(Debug)]
pub struct HttpResourceClient<R> {
    client: Client,
    base_url: String,
    _resource: PhantomData<fn() -> R>,
}

impl<R> Clone for HttpResourceClient<R> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            _resource: PhantomData,
        }
    }
}

impl<R: Resource> HttpResourceClient<R> {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self::with_client(client, &config.base_url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            _resource: PhantomData,
        }
    }

    fn collection_url(&self) -> String {
        format!("{}/api/{}", self.base_url, R::COLLECTION)
    }

    /// The id becomes one percent-encoded path segment, so `/`, `?` and `#`
    /// stay part of the id.
    fn item_url(&self, id: &str) -> Result<Url> {
        let mut url = Url::parse(&self.collection_url())
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.clone()))?
            .push(id);
        Ok(url)
    }

    async fn check(&self, response: Response, id: Option<&str>) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::NOT_FOUND {
            if let Some(id) = id {
                return Err(ApiError::NotFound {
                    collection: R::COLLECTION,
                    id: id.to_string(),
                });
            }
        }

        let message = response.text().await.unwrap_or_default();
        Err(ApiError::ServerError {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl<R: Resource> ResourceClient<R> for HttpResourceClient<R> {
    async fn list_all(&self) -> Result<Vec<R>> {
        let url = self.collection_url();
        debug!("📋 Fetching {}: {}", R::COLLECTION, url);

        let response = self.client.get(&url).send().await?;
        let response = self.check(response, None).await?;

        let records: Vec<R> = response.json().await?;
        info!("✅ Loaded {} {} records", records.len(), R::COLLECTION);
        Ok(records)
    }

    async fn get(&self, id: &str) -> Result<R> {
        let url = self.item_url(id)?;
        debug!("📄 Fetching {} {}: {}", R::COLLECTION, id, url);

        let response = self.client.get(url).send().await?;
        let response = self.check(response, Some(id)).await?;

        Ok(response.json().await?)
    }

    async fn update_field(&self, id: &str, field: R::Field, value: &FieldValue) -> Result<R> {
        let url = self.item_url(id)?;
        debug!("✏️ Updating {} {}.{}: {}", R::COLLECTION, id, field, url);

        let mut body = Map::new();
        body.insert(field.key().to_string(), value.to_json());

        let response = self
            .client
            .put(url)
            .json(&Value::Object(body))
            .send()
            .await?;
        let response = self.check(response, Some(id)).await?;

        Ok(response.json().await?)
    }

    async fn remove(&self, id: &str) -> Result<()> {
        let url = self.item_url(id)?;
        debug!("🗑️ Deleting {} {}: {}", R::COLLECTION, id, url);

        let response = self.client.delete(url).send().await?;
        self.check(response, Some(id)).await?;

        Ok(())
    }

    async fn create(&self, record: &R) -> Result<R> {
        let url = self.collection_url();
        debug!("➕ Creating {} {}: {}", R::COLLECTION, record.id(), url);

        let response = self.client.post(&url).json(record).send().await?;
        let response = self.check(response, None).await?;

        Ok(response.json().await?)
    }
}
