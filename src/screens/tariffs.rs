//! Tariff management screen

use crate::models::tariff::{Tariff, TariffDraft};
use crate::services::{Attachment, ServiceFactory, TariffService};
use crate::session::Session;
use crate::utils::errors::ValidationError;
use crate::utils::logging::log_operator_action;
use super::{load_into, surface_error, ListState, Notices};

const SCREEN: &str = "tariffs";

#[derive(Debug)]
pub struct TariffsScreen {
    service: TariffService,
    session: Session,
    list: ListState<Tariff>,
    form: Option<TariffDraft>,
    attachment: Option<Attachment>,
    notices: Notices,
}

impl TariffsScreen {
    pub fn new(services: &ServiceFactory) -> Self {
        Self {
            service: services.tariff_service.clone(),
            session: services.session().clone(),
            list: ListState::default(),
            form: None,
            attachment: None,
            notices: Notices::default(),
        }
    }

    /// `GET /tariff`
    pub async fn load(&mut self) -> bool {
        load_into(&mut self.list, &self.session, &mut self.notices, SCREEN, self.service.list()).await
    }

    pub fn list(&self) -> &ListState<Tariff> {
        &self.list
    }

    pub fn tariffs(&self) -> &[Tariff] {
        self.list.items()
    }

    pub fn active_count(&self) -> usize {
        self.tariffs().iter().filter(|t| t.is_active).count()
    }

    /// Mean coin price, `None` without tariffs
    pub fn average_coin(&self) -> Option<f64> {
        let tariffs = self.tariffs();
        if tariffs.is_empty() {
            return None;
        }
        Some(tariffs.iter().map(|t| t.coin).sum::<f64>() / tariffs.len() as f64)
    }

    pub fn open_create(&mut self) {
        self.form = Some(TariffDraft::default());
        self.attachment = None;
    }

    pub fn form(&self) -> Option<&TariffDraft> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut TariffDraft> {
        self.form.as_mut()
    }

    /// Photo uploaded right before the tariff is created
    pub fn attach(&mut self, attachment: Attachment) {
        self.attachment = Some(attachment);
    }

    pub fn close_form(&mut self) {
        self.form = None;
        self.attachment = None;
    }

    pub async fn submit(&mut self) -> bool {
        let Some(draft) = self.form.clone() else {
            self.notices.error(ValidationError::MissingField("tariff").to_string());
            return false;
        };

        log_operator_action(SCREEN, "create", None, None);
        match self.service.create(draft, self.attachment.clone()).await {
            Ok(_) => {
                self.notices.success("Tariff created");
                self.close_form();
                self.load().await;
                true
            }
            Err(e) => {
                surface_error(&self.session, &mut self.notices, SCREEN, "create", &e);
                false
            }
        }
    }

    /// PATCH the negated active flag, then refetch
    pub async fn toggle_active(&mut self, tariff_id: &str) -> bool {
        let Some(tariff) = self.tariffs().iter().find(|t| t.id == tariff_id).cloned() else {
            self.notices.error(format!("Unknown tariff {}", tariff_id));
            return false;
        };

        log_operator_action(SCREEN, "toggle_active", Some(tariff_id), None);
        match self.service.toggle_active(&tariff).await {
            Ok(()) => {
                self.notices.success(if tariff.is_active { "Tariff deactivated" } else { "Tariff activated" });
                self.load().await;
                true
            }
            Err(e) => {
                surface_error(&self.session, &mut self.notices, SCREEN, "toggle_active", &e);
                false
            }
        }
    }

    pub async fn delete(&mut self, tariff_id: &str) -> bool {
        log_operator_action(SCREEN, "delete", Some(tariff_id), None);
        match self.service.delete(tariff_id).await {
            Ok(()) => {
                self.notices.success("Tariff deleted");
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
