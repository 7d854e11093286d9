//! Coin balances screen

use crate::models::coin::{Coin, CoinDraft};
use crate::services::{CoinService, ServiceFactory};
use crate::session::Session;
use crate::utils::errors::{AdminError, ValidationError};
use crate::utils::logging::log_operator_action;
use super::{load_into, surface_error, ListState, Notices};

const SCREEN: &str = "coins";

#[derive(Debug)]
pub struct CoinsScreen {
    service: CoinService,
    session: Session,
    list: ListState<Coin>,
    notices: Notices,
}

fn checked(draft: &CoinDraft) -> Result<(), ValidationError> {
    if draft.currency.trim().is_empty() {
        return Err(ValidationError::MissingField("currency"));
    }
    if draft.count < 0 {
        return Err(ValidationError::InvalidInput("count must not be negative".to_string()));
    }
    Ok(())
}

impl CoinsScreen {
    pub fn new(services: &ServiceFactory) -> Self {
        Self {
            service: services.coin_service.clone(),
            session: services.session().clone(),
            list: ListState::default(),
            notices: Notices::default(),
        }
    }

    /// `GET /coin`
    pub async fn load(&mut self) -> bool {
        load_into(&mut self.list, &self.session, &mut self.notices, SCREEN, self.service.list()).await
    }

    pub fn list(&self) -> &ListState<Coin> {
        &self.list
    }

    pub fn coins(&self) -> &[Coin] {
        self.list.items()
    }

    pub fn total_count(&self) -> i64 {
        self.coins().iter().map(|c| c.count).sum()
    }

    pub async fn add(&mut self, draft: CoinDraft) -> bool {
        if let Err(e) = checked(&draft) {
            self.notices.error(AdminError::from(e).to_string());
            return false;
        }

        log_operator_action(SCREEN, "add", Some(&draft.currency), None);
        match self.service.create(&draft).await {
            Ok(_) => {
                self.notices.success("Coin balance added");
                self.load().await;
                true
            }
            Err(e) => {
                surface_error(&self.session, &mut self.notices, SCREEN, "add", &e);
                false
            }
        }
    }

    /// `key` as returned by [`Coin::key`]
    pub async fn edit(&mut self, key: &str, draft: CoinDraft) -> bool {
        if let Err(e) = checked(&draft) {
            self.notices.error(AdminError::from(e).to_string());
            return false;
        }

        log_operator_action(SCREEN, "edit", Some(key), None);
        match self.service.update(key, &draft).await {
            Ok(_) => {
                self.notices.success("Coin balance updated");
                self.load().await;
                true
            }
            Err(e) => {
                surface_error(&self.session, &mut self.notices, SCREEN, "edit", &e);
                false
            }
        }
    }

    pub async fn delete(&mut self, key: &str) -> bool {
        log_operator_action(SCREEN, "delete", Some(key), None);
        match self.service.delete(key).await {
            Ok(()) => {
                self.notices.success("Coin balance deleted");
                self.load().await;
                true
            }
            Err(e) => {
                surface_error(&self.session, &mut self.notices, SCREEN, "delete", &e);
                false
            }
        }
    }

    pub fn notices(&self) -> &Notices {
        &self.notices
    }

    pub fn notices_mut(&mut self) -> &mut Notices {
        &mut self.notices
    }
}
