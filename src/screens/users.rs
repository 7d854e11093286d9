//! Users screen

use std::collections::BTreeMap;
use rust_decimal::Decimal;
use tracing::info;
use crate::models::user::{User, UserStatus};
use crate::services::{ServiceFactory, UserService};
use crate::session::Session;
use crate::utils::helpers::contains_ignore_case;
use crate::utils::logging::log_operator_action;
use super::{load_into, surface_error, ListState, Notices};

const SCREEN: &str = "users";

/// Client-side filters; never sent to the backend
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    /// Matched against email and phone number
    pub search: String,
    pub plan: Option<String>,
    pub status: Option<UserStatus>,
}

impl UserFilter {
    pub fn matches(&self, user: &User) -> bool {
        let matches_search = contains_ignore_case(&user.email, &self.search)
            || user
                .phone_number
                .as_deref()
                .is_some_and(|phone| contains_ignore_case(phone, &self.search));
        let matches_plan = self
            .plan
            .as_deref()
            .map_or(true, |plan| user.subscription_plan.as_deref() == Some(plan));
        let matches_status = self.status.map_or(true, |status| UserStatus::of(user) == status);

        matches_search && matches_plan && matches_status
    }
}

#[derive(Debug)]
pub struct UsersScreen {
    service: UserService,
    session: Session,
    list: ListState<User>,
    pub filter: UserFilter,
    notices: Notices,
}

impl UsersScreen {
    pub fn new(services: &ServiceFactory) -> Self {
        Self {
            service: services.user_service.clone(),
            session: services.session().clone(),
            list: ListState::default(),
            filter: UserFilter::default(),
            notices: Notices::default(),
        }
    }

    /// `GET /users`
    pub async fn load(&mut self) -> bool {
        load_into(&mut self.list, &self.session, &mut self.notices, SCREEN, self.service.list()).await
    }

    pub fn list(&self) -> &ListState<User> {
        &self.list
    }

    pub fn users(&self) -> &[User] {
        self.list.items()
    }

    pub fn visible(&self) -> Vec<&User> {
        self.users().iter().filter(|u| self.filter.matches(u)).collect()
    }

    pub fn total_balance(&self) -> Decimal {
        self.users().iter().map(|u| u.balance).sum()
    }

    pub fn active_count(&self) -> usize {
        self.users().iter().filter(|u| u.is_active).count()
    }

    /// Users per subscription plan; accounts without a plan are not counted
    pub fn plan_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for plan in self.users().iter().filter_map(|u| u.subscription_plan.as_ref()) {
            *counts.entry(plan.clone()).or_insert(0) += 1;
        }
        counts
    }

    pub async fn delete(&mut self, user_id: &str) -> bool {
        log_operator_action(SCREEN, "delete", Some(user_id), None);
        match self.service.delete(user_id).await {
            Ok(()) => {
                self.notices.success("User deleted");
                self.load().await;
                true
            }
            Err(e) => {
                surface_error(&self.session, &mut self.notices, SCREEN, "delete", &e);
                false
            }
        }
    }

    /// Block an active user or unblock a blocked one
    pub async fn toggle_block(&mut self, user_id: &str) -> bool {
        let Some(user) = self.users().iter().find(|u| u.id == user_id).cloned() else {
            self.notices.error(format!("Unknown user {}", user_id));
            return false;
        };

        let action = if user.is_blocked() { "deblock" } else { "block" };
        log_operator_action(SCREEN, action, Some(user_id), None);

        match self.service.toggle_block(&user).await {
            Ok(()) => {
                info!(user_id = user_id, action = action, "User block state toggled");
                self.notices.success(if user.is_blocked() { "User unblocked" } else { "User blocked" });
                self.load().await;
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
