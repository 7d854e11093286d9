//! Product catalog service
//!
//! Create and update send the full product document. When the operator
//! attached a file it is uploaded first and its URL becomes the only entry
//! of `photo_url`.

use tracing::info;
use crate::models::product::{Product, ProductDraft};
use crate::utils::errors::Result;
use super::client::ApiClient;
use super::resource::ResourceClient;
use super::upload::Attachment;

#[derive(Clone, Debug)]
pub struct ProductService {
    products: ResourceClient<Product>,
}

impl ProductService {
    pub fn new(api: ApiClient) -> Self {
        Self {
            products: ResourceClient::new(api),
        }
    }

    pub async fn list(&self) -> Result<Vec<Product>> {
        self.products.list().await
    }

    pub async fn create(&self, draft: ProductDraft, attachment: Option<Attachment>) -> Result<Product> {
        let draft = self.attach(draft, attachment).await?;
        let product = self.products.create(&draft).await?;
        info!(product_id = %product.id, "Product created");
        Ok(product)
    }

    pub async fn update(&self, product_id: &str, draft: ProductDraft, attachment: Option<Attachment>) -> Result<Product> {
        let draft = self.attach(draft, attachment).await?;
        let product = self.products.update(product_id, &draft).await?;
        info!(product_id = product_id, "Product updated");
        Ok(product)
    }

    async fn attach(&self, draft: ProductDraft, attachment: Option<Attachment>) -> Result<ProductDraft> {
        match attachment {
            Some(attachment) => {
                let url = self.products.api().upload_single(attachment).await?;
                Ok(draft.with_photo(Some(url)))
            }
            None => {
                let existing = draft.primary_photo().map(str::to_string);
                Ok(draft.with_photo(existing))
            }
        }
    }
}
