//! Tariff plan service

use tracing::info;
use crate::models::tariff::{Tariff, TariffActivation, TariffDraft};
use crate::utils::errors::Result;
use super::client::ApiClient;
use super::resource::ResourceClient;
use super::upload::Attachment;

#[derive(Clone, Debug)]
pub struct TariffService {
    tariffs: ResourceClient<Tariff>,
}

impl TariffService {
    pub fn new(api: ApiClient) -> Self {
        Self {
            tariffs: ResourceClient::new(api),
        }
    }

    pub async fn list(&self) -> Result<Vec<Tariff>> {
        self.tariffs.list().await
    }

    /// `POST /tariff/add`, uploading the photo first when one is attached
    pub async fn create(&self, mut draft: TariffDraft, attachment: Option<Attachment>) -> Result<Tariff> {
        if let Some(attachment) = attachment {
            draft.photo_url = Some(self.tariffs.api().upload_single(attachment).await?);
        }

        let tariff = self.tariffs.create(&draft).await?;
        info!(tariff_id = %tariff.id, "Tariff created");
        Ok(tariff)
    }

    /// `PATCH /tariff/:id` with the negation of the current flag
    pub async fn toggle_active(&self, tariff: &Tariff) -> Result<()> {
        let activation = TariffActivation {
            is_active: !tariff.is_active,
        };
        self.tariffs.patch(&tariff.id, &activation).await?;
        info!(tariff_id = %tariff.id, is_active = activation.is_active, "Tariff toggled");
        Ok(())
    }

    pub async fn delete(&self, tariff_id: &str) -> Result<()> {
        self.tariffs.delete(tariff_id).await?;
        info!(tariff_id = tariff_id, "Tariff deleted");
        Ok(())
    }
}
