//! Services module
//!
//! Resource clients for every backend collection the dashboard manages

pub mod client;
pub mod resource;
pub mod upload;
pub mod user;
pub mod payment;
pub mod product;
pub mod tariff;
pub mod coin;
pub mod statistics;

// Re-export commonly used services
pub use client::ApiClient;
pub use resource::{Resource, ResourceClient};
pub use upload::Attachment;
pub use user::UserService;
pub use payment::PaymentService;
pub use product::ProductService;
pub use tariff::TariffService;
pub use coin::CoinService;
pub use statistics::StatisticsService;

use crate::config::settings::Settings;
use crate::session::Session;
use crate::utils::errors::Result;

/// Service factory for creating and managing all services
#[derive(Clone, Debug)]
pub struct ServiceFactory {
    pub api: ApiClient,
    pub user_service: UserService,
    pub payment_service: PaymentService,
    pub product_service: ProductService,
    pub tariff_service: TariffService,
    pub coin_service: CoinService,
    pub statistics_service: StatisticsService,
}

impl ServiceFactory {
    /// Create a new ServiceFactory sharing one HTTP client and session
    pub fn new(settings: &Settings, session: Session) -> Result<Self> {
        let api = ApiClient::new(&settings.api, session)?;

        Ok(Self {
            user_service: UserService::new(api.clone()),
            payment_service: PaymentService::new(api.clone()),
            product_service: ProductService::new(api.clone()),
            tariff_service: TariffService::new(api.clone()),
            coin_service: CoinService::new(api.clone()),
            statistics_service: StatisticsService::new(api.clone()),
            api,
        })
    }

    pub fn session(&self) -> &Session {
        self.api.session()
    }
}
