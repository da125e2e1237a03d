use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use storefront_core::field::field_from_key;
use storefront_core::{Resource, ValidationError};
use thiserror::Error;
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{collection} '{id}' not found")]
    NotFound { collection: &'static str, id: String },

    #[error("{collection} '{id}' already exists")]
    Duplicate { collection: &'static str, id: String },

    #[error("Unknown field '{0}'")]
    UnknownField(String),

    #[error("Document id cannot be changed")]
    IdChange,

    #[error("Invalid document: {0}")]
    Invalid(String),

    #[error("Storage failure: {0}")]
    Io(#[from] anyhow::Error),
}

impl From<ValidationError> for StoreError {
    fn from(err: ValidationError) -> Self {
        StoreError::Invalid(err.to_string())
    }
}

/// One document collection, kept in insertion order and mirrored to a JSON file.
pub struct Collection<R: Resource> {
    records: RwLock<Vec<R>>,
    path: Option<PathBuf>,
}

impl<R: Resource> Collection<R> {
    pub fn in_memory(records: Vec<R>) -> Self {
        Self {
            records: RwLock::new(records),
            path: None,
        }
    }

    /// Opens `<data_dir>/<collection>.json`, starting empty if the file is absent.
    pub async fn open(data_dir: &Path) -> anyhow::Result<Self> {
        fs::create_dir_all(data_dir).await?;
        let path = data_dir.join(format!("{}.json", R::COLLECTION));

        let records = match fs::read_to_string(&path).await {
            Ok(content) => serde_json::from_str::<Vec<R>>(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("📁 {} not found, starting with an empty collection", path.display());
                Vec::new()
            }
            Err(e) => return Err(e.into()),
        };
        info!("📁 Loaded {} {} from {}", records.len(), R::COLLECTION, path.display());

        Ok(Self {
            records: RwLock::new(records),
            path: Some(path),
        })
    }

    pub async fn list(&self) -> Vec<R> {
        self.records.read().await.clone()
    }

    pub async fn get(&self, id: &str) -> Result<R, StoreError> {
        self.records
            .read()
            .await
            .iter()
            .find(|r| r.id() == id)
            .cloned()
            .ok_or_else(|| not_found::<R>(id))
    }

    pub async fn insert(&self, record: R) -> Result<R, StoreError> {
        record.validate()?;

        let mut records = self.records.write().await;
        if records.iter().any(|r| r.id() == record.id()) {
            return Err(StoreError::Duplicate {
                collection: R::COLLECTION,
                id: record.id().to_string(),
            });
        }

        let mut next = records.clone();
        next.push(record.clone());
        self.save(&next).await?;
        *records = next;
        Ok(record)
    }

    /// Applies a partial document to the record named `id`.
    ///
    /// Keys must name editable fields. An `id`/`_id` key is accepted only when it
    /// repeats the current id. The merged document must still deserialize and validate.
    pub async fn merge(&self, id: &str, patch: Map<String, Value>) -> Result<R, StoreError> {
        let mut records = self.records.write().await;
        let index = records
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| not_found::<R>(id))?;

        let mut document = match serde_json::to_value(&records[index]) {
            Ok(Value::Object(map)) => map,
            Ok(_) => return Err(StoreError::Invalid("record is not an object".into())),
            Err(e) => return Err(StoreError::Io(e.into())),
        };

        for (key, value) in patch {
            if key == "id" || key == "_id" {
                if value.as_str() != Some(id) {
                    return Err(StoreError::IdChange);
                }
                continue;
            }
            field_from_key::<R::Field>(&key).map_err(|_| StoreError::UnknownField(key.clone()))?;
            document.insert(key, value);
        }

        let merged: R = serde_json::from_value(Value::Object(document))
            .map_err(|e| StoreError::Invalid(e.to_string()))?;
        merged.validate()?;

        let mut next = records.clone();
        next[index] = merged.clone();
        self.save(&next).await?;
        *records = next;
        Ok(merged)
    }

    pub async fn remove(&self, id: &str) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        if !records.iter().any(|r| r.id() == id) {
            return Err(not_found::<R>(id));
        }

        let next: Vec<R> = records.iter().filter(|r| r.id() != id).cloned().collect();
        self.save(&next).await?;
        *records = next;
        Ok(())
    }

    async fn save(&self, records: &[R]) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let content = serde_json::to_string_pretty(records).map_err(anyhow::Error::from)?;
        fs::write(path, content).await.map_err(anyhow::Error::from)?;
        Ok(())
    }
}

fn not_found<R: Resource>(id: &str) -> StoreError {
    StoreError::NotFound {
        collection: R::COLLECTION,
        id: id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use storefront_core::{ColorOption, PaymentOptions, Product, UpiConfig};

    fn shirt() -> Product {
        Product {
            id: "p1".into(),
            image: "shirt.png".into(),
            name: "Shirt".into(),
            mrp: 999.0,
            selling_price: 499.0,
            description: String::new(),
            sizes: vec!["S".into(), "M".into()],
            colors: vec![ColorOption { name: "Red".into(), image: "r.png".into() }],
            variant: "Cotton".into(),
            carousel_images: Vec::new(),
            assured_image: None,
        }
    }

    fn patch(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("patch must be an object"),
        }
    }

    #[tokio::test]
    async fn merge_changes_only_named_fields() {
        let store = Collection::in_memory(vec![shirt()]);
        let merged = store.merge("p1", patch(json!({"sizes": ["S", "L", "XL"]}))).await.unwrap();
        assert_eq!(merged.sizes, vec!["S", "L", "XL"]);
        assert_eq!(merged.name, "Shirt");
        assert_eq!(store.get("p1").await.unwrap(), merged);
    }

    #[tokio::test]
    async fn merge_rejects_unknown_keys_id_changes_and_bad_types() {
        let store = Collection::in_memory(vec![shirt()]);
        assert!(matches!(
            store.merge("p1", patch(json!({"price": 1}))).await,
            Err(StoreError::UnknownField(k)) if k == "price"
        ));
        assert!(matches!(
            store.merge("p1", patch(json!({"id": "p9"}))).await,
            Err(StoreError::IdChange)
        ));
        assert!(matches!(
            store.merge("p1", patch(json!({"mrp": "cheap"}))).await,
            Err(StoreError::Invalid(_))
        ));
        assert!(matches!(
            store.merge("p1", patch(json!({"sellingPrice": -1.0}))).await,
            Err(StoreError::Invalid(_))
        ));
        assert_eq!(store.get("p1").await.unwrap(), shirt());
    }

    #[tokio::test]
    async fn upi_merge_accepts_unchanged_siblings() {
        let store = Collection::in_memory(vec![UpiConfig {
            id: "u1".into(),
            upi_id: "shop@upi".into(),
            upi_name: "Shop".into(),
            payment_options: PaymentOptions::default(),
        }]);
        let merged = store
            .merge(
                "u1",
                patch(json!({"_id": "u1", "upi_name": "Shop", "payment_options": {"divupi": true}})),
            )
            .await
            .unwrap();
        assert!(merged.payment_options.divupi);
        assert_eq!(merged.upi_name, "Shop");
    }

    #[tokio::test]
    async fn insert_refuses_duplicates_and_remove_reports_missing() {
        let store = Collection::in_memory(vec![shirt()]);
        assert!(matches!(store.insert(shirt()).await, Err(StoreError::Duplicate { .. })));
        store.remove("p1").await.unwrap();
        assert!(matches!(store.remove("p1").await, Err(StoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn file_backed_collections_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let store = Collection::<Product>::open(dir.path()).await.unwrap();
        assert!(store.list().await.is_empty());

        store.insert(shirt()).await.unwrap();
        store.merge("p1", patch(json!({"variant": "Linen"}))).await.unwrap();

        let reopened = Collection::<Product>::open(dir.path()).await.unwrap();
        let records = reopened.list().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].variant, "Linen");
    }
}
