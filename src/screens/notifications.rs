//! Operator notifications screen
//!
//! Notifications are composed and kept locally; read state is not persisted.

use chrono::{NaiveDate, Utc};
use tracing::info;
use crate::models::notification::{Notification, NotificationDraft};
use crate::utils::errors::{AdminError, ValidationError};
use crate::utils::helpers::{generate_uuid, truncate_text};
use crate::utils::logging::log_operator_action;
use super::Notices;

const SCREEN: &str = "notifications";
const NOTICE_TITLE_LENGTH: usize = 40;

#[derive(Debug, Default)]
pub struct NotificationsScreen {
    notifications: Vec<Notification>,
    form: Option<NotificationDraft>,
    notices: Notices,
}

impl NotificationsScreen {
    pub fn new(notifications: Vec<Notification>) -> Self {
        Self {
            notifications,
            ..Default::default()
        }
    }

    /// Newest first
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn read_count(&self) -> usize {
        self.notifications.iter().filter(|n| n.is_read).count()
    }

    pub fn unread_count(&self) -> usize {
        self.notifications.len() - self.read_count()
    }

    pub fn recent_count(&self) -> usize {
        self.recent_count_at(Utc::now().date_naive())
    }

    pub fn recent_count_at(&self, today: NaiveDate) -> usize {
        self.notifications.iter().filter(|n| n.is_recent(today)).count()
    }

    pub fn open_create(&mut self) {
        self.form = Some(NotificationDraft::default());
    }

    pub fn form(&self) -> Option<&NotificationDraft> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut NotificationDraft> {
        self.form.as_mut()
    }

    pub fn close_form(&mut self) {
        self.form = None;
    }

    /// Title and message are required
    pub fn submit(&mut self) -> bool {
        let Some(draft) = self.form.as_ref() else {
            return false;
        };

        let missing = if draft.title.trim().is_empty() {
            Some("title")
        } else if draft.message.trim().is_empty() {
            Some("message")
        } else {
            None
        };
        if let Some(field) = missing {
            self.notices.error(AdminError::from(ValidationError::MissingField(field)).to_string());
            return false;
        }

        let notification = Notification {
            id: generate_uuid(),
            title: draft.title.trim().to_string(),
            message: draft.message.trim().to_string(),
            kind: draft.kind,
            recipients: draft.recipients,
            created_date: Utc::now().date_naive(),
            is_read: false,
        };

        info!(id = %notification.id, recipients = %notification.recipients, "Notification created");
        log_operator_action(SCREEN, "create", Some(&notification.id), Some(&notification.title));
        self.notices.success(format!(
            "Notification \"{}\" sent to {} users",
            truncate_text(&notification.title, NOTICE_TITLE_LENGTH),
            notification.recipients
        ));
        self.notifications.insert(0, notification);
        self.form = None;
        true
    }

    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.notifications.len();
        self.notifications.retain(|n| n.id != id);
        let removed = self.notifications.len() < before;
        if removed {
            log_operator_action(SCREEN, "delete", Some(id), None);
        }
        removed
    }

    pub fn mark_read(&mut self, id: &str) -> bool {
        match self.notifications.iter_mut().find(|n| n.id == id) {
            Some(notification) => {
                notification.is_read = true;
                true
            }
            None => false,
        }
    }

    pub fn notices(&self) -> &Notices {
        &self.notices
    }

    pub fn notices_mut(&mut self) -> &mut Notices {
        &mut self.notices
    }
}
