//! Operator notification model

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NotificationType {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

/// Audience a notification is addressed to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Recipients {
    #[default]
    All,
    Basic,
    Premium,
    Enterprise,
}

impl std::fmt::Display for Recipients {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Recipients::All => "All",
            Recipients::Basic => "Basic",
            Recipients::Premium => "Premium",
            Recipients::Enterprise => "Enterprise",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub recipients: Recipients,
    pub created_date: NaiveDate,
    #[serde(default)]
    pub is_read: bool,
}

impl Notification {
    /// Created within the last seven days, counting `today`
    pub fn is_recent(&self, today: NaiveDate) -> bool {
        self.created_date <= today && today - self.created_date < Duration::days(7)
    }
}

/// Fields of the create form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationDraft {
    pub title: String,
    pub message: String,
    pub kind: NotificationType,
    pub recipients: Recipients,
}
