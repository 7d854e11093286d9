//! Screen controllers
//!
//! One controller per dashboard section. Each owns its list state, local
//! filters and a queue of operator notices. Controllers never panic on
//! backend failures: errors become notices, and authentication failures log
//! the session out so the shell falls back to the login view.

pub mod users;
pub mod payments;
pub mod payment_desk;
pub mod withdrawals;
pub mod tariffs;
pub mod products;
pub mod coins;
pub mod statistics;
pub mod notifications;

pub use users::{UsersScreen, UserFilter};
pub use payments::{PaymentHistoryScreen, PaymentFilter, PaymentSummary, DateRange};
pub use payment_desk::{PaymentDeskScreen, ResponseForm};
pub use withdrawals::{WithdrawalsScreen, WithdrawalFilter};
pub use tariffs::TariffsScreen;
pub use products::{ProductsScreen, ProductForm};
pub use coins::CoinsScreen;
pub use statistics::StatisticsScreen;
pub use notifications::NotificationsScreen;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};
use crate::session::Session;
use crate::utils::errors::AdminError;
use crate::utils::logging::log_api_error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

/// A toast shown to the operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub at: DateTime<Utc>,
}

/// Pending notices, oldest first
#[derive(Debug, Clone, Default)]
pub struct Notices {
    queue: Vec<Notice>,
}

impl Notices {
    pub fn push(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.queue.push(Notice {
            level,
            message: message.into(),
            at: Utc::now(),
        });
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(NoticeLevel::Success, message);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(NoticeLevel::Info, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(NoticeLevel::Error, message);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.queue.iter()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn count(&self, level: NoticeLevel) -> usize {
        self.queue.iter().filter(|n| n.level == level).count()
    }

    /// Hand every pending notice to the renderer
    pub fn drain(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.queue)
    }
}

/// Server-owned list plus its fetch state
#[derive(Debug, Clone)]
pub struct ListState<T> {
    items: Vec<T>,
    loading: bool,
    error: Option<String>,
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            error: None,
        }
    }
}

impl<T> ListState<T> {
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn begin(&mut self) {
        self.loading = true;
    }

    /// Replace the list wholesale with a fetch result
    pub fn replace(&mut self, items: Vec<T>) {
        self.loading = false;
        self.items = items;
        self.error = None;
    }

    /// A failed fetch leaves the list empty
    pub fn fail(&mut self, error: impl Into<String>) {
        self.loading = false;
        self.items.clear();
        self.error = Some(error.into());
    }

    pub(crate) fn items_mut(&mut self) -> &mut Vec<T> {
        &mut self.items
    }
}

/// Record a failed operation: log it, queue an error notice and log the
/// session out when the backend rejected the credentials
pub(crate) fn surface_error(session: &Session, notices: &mut Notices, screen: &str, action: &str, error: &AdminError) {
    log_api_error(screen, &error.to_string(), Some(action));
    debug!(
        screen = screen,
        severity = %error.severity(),
        recoverable = error.is_recoverable(),
        "Operation failed"
    );
    notices.error(format!("{}: {}", action, error));

    if error.requires_login() {
        warn!(screen = screen, "Credentials rejected, logging out");
        if let Err(e) = session.logout() {
            warn!(error = %e, "Failed to clear the stored token");
        }
    }
}

/// Fetch into `list`, routing failures through [`surface_error`]
pub(crate) async fn load_into<T, F>(
    list: &mut ListState<T>,
    session: &Session,
    notices: &mut Notices,
    screen: &str,
    fetch: F,
) -> bool
where
    F: std::future::Future<Output = crate::utils::errors::Result<Vec<T>>>,
{
    list.begin();
    match fetch.await {
        Ok(items) => {
            list.replace(items);
            true
        }
        Err(e) => {
            list.fail(e.to_string());
            surface_error(session, notices, screen, "load", &e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use crate::config::Settings;
    use crate::session::SessionStorage;

    fn session_with(token: &str) -> Session {
        let storage = Arc::new(SessionStorage::in_memory());
        storage.set("token", token).unwrap();
        Session::new(storage, &Settings::default().session)
    }

    #[test]
    fn test_notices_drain_in_order() {
        let mut notices = Notices::default();
        notices.success("saved");
        notices.error("failed");
        notices.info("hint");

        assert_eq!(notices.count(NoticeLevel::Error), 1);
        let drained: Vec<_> = notices.drain().into_iter().map(|n| n.message).collect();
        assert_eq!(drained, vec!["saved", "failed", "hint"]);
        assert!(notices.is_empty());
    }

    #[test]
    fn test_failed_fetch_clears_list() {
        let mut list = ListState::default();
        list.begin();
        list.replace(vec![1, 2, 3]);
        assert_eq!(list.items(), &[1, 2, 3]);
        assert!(!list.is_loading());

        list.begin();
        list.fail("offline");
        assert!(list.items().is_empty());
        assert_eq!(list.error(), Some("offline"));
    }

    #[test]
    fn test_auth_error_logs_out() {
        let session = session_with("abc");
        let mut notices = Notices::default();

        surface_error(&session, &mut notices, "users", "load", &AdminError::Network("down".to_string()));
        assert!(session.is_authenticated());

        surface_error(&session, &mut notices, "users", "load", &AdminError::Auth("jwt expired".to_string()));
        assert!(!session.is_authenticated());
        assert_eq!(notices.count(NoticeLevel::Error), 2);
    }

    #[tokio::test]
    async fn test_load_into_routes_errors() {
        let session = session_with("abc");
        let mut notices = Notices::default();
        let mut list: ListState<u32> = ListState::default();

        assert!(load_into(&mut list, &session, &mut notices, "coins", async { Ok(vec![7]) }).await);
        assert_eq!(list.items(), &[7]);

        let failed = load_into(&mut list, &session, &mut notices, "coins", async {
            Err(AdminError::Server { status: 500, body: "boom".to_string() })
        })
        .await;
        assert!(!failed);
        assert!(list.items().is_empty());
        assert_eq!(notices.len(), 1);
    }
}
