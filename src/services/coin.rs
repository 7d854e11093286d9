//! Coin balance service

use std::collections::BTreeMap;
use serde::Deserialize;
use tracing::info;
use crate::models::coin::{Coin, CoinDraft};
use crate::utils::errors::Result;
use super::client::ApiClient;
use super::resource::{Resource, ResourceClient};

/// `GET /coin` answers either a list of entries or a `{currency: count}` map
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CoinListing {
    Entries(Vec<Coin>),
    Balances(BTreeMap<String, i64>),
}

impl From<CoinListing> for Vec<Coin> {
    fn from(listing: CoinListing) -> Self {
        match listing {
            CoinListing::Entries(coins) => coins,
            CoinListing::Balances(balances) => balances
                .into_iter()
                .map(|(currency, count)| Coin {
                    id: None,
                    currency,
                    count,
                })
                .collect(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct CoinService {
    coins: ResourceClient<Coin>,
}

impl CoinService {
    pub fn new(api: ApiClient) -> Self {
        Self {
            coins: ResourceClient::new(api),
        }
    }

    pub async fn list(&self) -> Result<Vec<Coin>> {
        let listing: CoinListing = self.coins.api().get_json(&Coin::list_path()).await?;
        Ok(listing.into())
    }

    pub async fn create(&self, draft: &CoinDraft) -> Result<Coin> {
        let coin = self.coins.create(draft).await?;
        info!(currency = %draft.currency, count = draft.count, "Coin balance added");
        Ok(coin)
    }

    /// `key` is the entry id, or its currency when the backend sent no id
    pub async fn update(&self, key: &str, draft: &CoinDraft) -> Result<Coin> {
        let coin = self.coins.update(key, draft).await?;
        info!(key = key, currency = %draft.currency, "Coin balance updated");
        Ok(coin)
    }

    pub async fn delete(&self, key: &str) -> Result<()> {
        self.coins.delete(key).await?;
        info!(key = key, "Coin balance deleted");
        Ok(())
    }
}
