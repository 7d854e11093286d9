//! Generic CRUD contract over one backend collection

use std::marker::PhantomData;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use crate::models::{Coin, Payment, Product, Tariff, User, UserStatistic};
use crate::utils::errors::Result;
use super::client::ApiClient;

/// A record type served by a backend collection
pub trait Resource: DeserializeOwned + Send + Sync + 'static {
    /// Collection path, e.g. `/users`
    const COLLECTION: &'static str;
    /// Human-readable name for logs
    const NAME: &'static str;

    /// Path segment identifying this record
    fn key(&self) -> &str;

    fn list_path() -> String {
        Self::COLLECTION.to_string()
    }

    fn create_path() -> String {
        Self::COLLECTION.to_string()
    }

    fn item_path(id: &str) -> String {
        format!("{}/{}", Self::COLLECTION, urlencoding::encode(id))
    }

    fn update_path(id: &str) -> String {
        Self::item_path(id)
    }
}

impl Resource for User {
    const COLLECTION: &'static str = "/users";
    const NAME: &'static str = "user";

    fn key(&self) -> &str {
        &self.id
    }
}

impl Resource for Payment {
    const COLLECTION: &'static str = "/payments";
    const NAME: &'static str = "payment";

    fn key(&self) -> &str {
        &self.payment_id
    }
}

impl Resource for Product {
    const COLLECTION: &'static str = "/products";
    const NAME: &'static str = "product";

    fn key(&self) -> &str {
        &self.id
    }
}

impl Resource for Tariff {
    const COLLECTION: &'static str = "/tariff";
    const NAME: &'static str = "tariff";

    fn key(&self) -> &str {
        &self.id
    }

    fn create_path() -> String {
        "/tariff/add".to_string()
    }
}

impl Resource for Coin {
    const COLLECTION: &'static str = "/coin";
    const NAME: &'static str = "coin";

    fn key(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.currency)
    }
}

impl Resource for UserStatistic {
    const COLLECTION: &'static str = "/statistika/user";
    const NAME: &'static str = "user statistic";

    fn key(&self) -> &str {
        self.id.as_deref().unwrap_or_default()
    }

    // The id travels in the body
    fn update_path(_id: &str) -> String {
        Self::COLLECTION.to_string()
    }
}

/// CRUD calls for resource type `R`
pub struct ResourceClient<R> {
    api: ApiClient,
    _resource: PhantomData<fn() -> R>,
}

impl<R> Clone for ResourceClient<R> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            _resource: PhantomData,
        }
    }
}

impl<R> std::fmt::Debug for ResourceClient<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceClient")
            .field("base_url", &self.api.base_url())
            .finish()
    }
}

impl<R: Resource> ResourceClient<R> {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            _resource: PhantomData,
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Fetch the whole collection
    pub async fn list(&self) -> Result<Vec<R>> {
        let items: Vec<R> = self.api.get_json(&R::list_path()).await?;
        debug!(resource = R::NAME, count = items.len(), "Fetched collection");
        Ok(items)
    }

    pub async fn create<B: Serialize + ?Sized>(&self, payload: &B) -> Result<R> {
        debug!(resource = R::NAME, "Creating record");
        self.api.send_json(Method::POST, &R::create_path(), payload).await
    }

    /// Full replace
    pub async fn update<B: Serialize + ?Sized>(&self, id: &str, payload: &B) -> Result<R> {
        debug!(resource = R::NAME, id = id, "Updating record");
        self.api.send_json(Method::PUT, &R::update_path(id), payload).await
    }

    /// Partial update, used for boolean toggles
    pub async fn patch<B: Serialize + ?Sized>(&self, id: &str, payload: &B) -> Result<()> {
        debug!(resource = R::NAME, id = id, "Patching record");
        self.api.send_empty(Method::PATCH, &R::item_path(id), Some(payload)).await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        debug!(resource = R::NAME, id = id, "Deleting record");
        self.api
            .send_empty::<()>(Method::DELETE, &R::item_path(id), None)
            .await
    }
}
