//! Payment history service

use crate::models::payment::Payment;
use crate::utils::errors::Result;
use super::client::ApiClient;
use super::resource::ResourceClient;

#[derive(Clone, Debug)]
pub struct PaymentService {
    payments: ResourceClient<Payment>,
}

impl PaymentService {
    pub fn new(api: ApiClient) -> Self {
        Self {
            payments: ResourceClient::new(api),
        }
    }

    /// `GET /payments`
    pub async fn list(&self) -> Result<Vec<Payment>> {
        self.payments.list().await
    }
}
