//! Statistics screen

use rust_decimal::Decimal;
use serde_json::{Map, Value};
use crate::models::statistics::{Bar, UserStatistic, WebStatistics};
use crate::services::{ServiceFactory, StatisticsService};
use crate::session::Session;
use crate::utils::logging::log_operator_action;
use super::{load_into, surface_error, ListState, Notices};

const SCREEN: &str = "statistics";

#[derive(Debug)]
pub struct StatisticsScreen {
    service: StatisticsService,
    session: Session,
    web: Option<WebStatistics>,
    user_statistics: ListState<UserStatistic>,
    notices: Notices,
}

impl StatisticsScreen {
    pub fn new(services: &ServiceFactory) -> Self {
        Self {
            service: services.statistics_service.clone(),
            session: services.session().clone(),
            web: None,
            user_statistics: ListState::default(),
            notices: Notices::default(),
        }
    }

    /// Fetch web statistics and user statistic rows
    pub async fn load(&mut self) -> bool {
        let web_loaded = match self.service.web().await {
            Ok(web) => {
                self.web = web;
                true
            }
            Err(e) => {
                self.web = None;
                surface_error(&self.session, &mut self.notices, SCREEN, "load", &e);
                false
            }
        };

        if !self.session.is_authenticated() {
            return false;
        }

        let users_loaded = load_into(
            &mut self.user_statistics,
            &self.session,
            &mut self.notices,
            SCREEN,
            self.service.list_users(),
        )
        .await;

        web_loaded && users_loaded
    }

    pub fn web(&self) -> Option<&WebStatistics> {
        self.web.as_ref()
    }

    pub fn user_statistics(&self) -> &ListState<UserStatistic> {
        &self.user_statistics
    }

    pub fn net_profit(&self) -> Option<Decimal> {
        self.web.as_ref().map(WebStatistics::net_profit)
    }

    pub fn profit_margin(&self) -> Option<Decimal> {
        self.web.as_ref().and_then(WebStatistics::profit_margin)
    }

    pub fn daily_bars(&self) -> Vec<Bar> {
        self.web.as_ref().map(WebStatistics::daily_bars).unwrap_or_default()
    }

    pub fn monthly_bars(&self) -> Vec<Bar> {
        self.web.as_ref().map(WebStatistics::monthly_bars).unwrap_or_default()
    }

    pub async fn publish_web(&mut self, stats: WebStatistics) -> bool {
        log_operator_action(SCREEN, "publish_web", None, None);
        match self.service.publish_web(&stats).await {
            Ok(()) => {
                self.notices.success("Statistics published");
                self.load().await;
                true
            }
            Err(e) => {
                surface_error(&self.session, &mut self.notices, SCREEN, "publish_web", &e);
                false
            }
        }
    }

    pub async fn add_user_statistic(&mut self, fields: Map<String, Value>) -> bool {
        log_operator_action(SCREEN, "add_user_statistic", None, None);
        let result = self.service.create_user(&UserStatistic::new(fields)).await.map(|_| ());
        self.finish_mutation("add_user_statistic", "User statistic added", result).await
    }

    pub async fn update_user_statistic(&mut self, stat: UserStatistic) -> bool {
        log_operator_action(SCREEN, "update_user_statistic", stat.id.as_deref(), None);
        let result = self.service.update_user(&stat).await.map(|_| ());
        self.finish_mutation("update_user_statistic", "User statistic updated", result).await
    }

    pub async fn delete_user_statistic(&mut self, id: &str) -> bool {
        log_operator_action(SCREEN, "delete_user_statistic", Some(id), None);
        let result = self.service.delete_user(id).await;
        self.finish_mutation("delete_user_statistic", "User statistic deleted", result).await
    }

    async fn finish_mutation(&mut self, action: &str, success: &str, result: crate::utils::errors::Result<()>) -> bool {
        match result {
            Ok(()) => {
                self.notices.success(success);
                load_into(
                    &mut self.user_statistics,
                    &self.session,
                    &mut self.notices,
                    SCREEN,
                    self.service.list_users(),
                )
                .await;
                true
            }
            Err(e) => {
                surface_error(&self.session, &mut self.notices, SCREEN, action, &e);
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
