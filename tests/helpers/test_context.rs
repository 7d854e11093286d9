//! Test context for unified test setup
//!
//! Builds settings pointing at the mock backends, a session persisted in a
//! temporary directory and the service factory on top of them.

use std::sync::Arc;
use std::time::Duration;
use mlm_admin::config::Settings;
use mlm_admin::realtime::RelayStatus;
use mlm_admin::services::ServiceFactory;
use mlm_admin::session::{Session, SessionStorage};
use serde_json::json;
use tempfile::TempDir;
use tokio::sync::watch;

use super::{api_mock::ApiMock, socket_mock::SocketMock};

pub const TEST_TOKEN: &str = "test-token";

pub struct TestContext {
    pub api: ApiMock,
    pub settings: Settings,
    pub session: Session,
    pub temp_dir: TempDir,
}

impl TestContext {
    /// Context with a stored token and no realtime server
    pub async fn new() -> Self {
        Self::with_token(Some(TEST_TOKEN), None).await
    }

    pub async fn with_token(token: Option<&str>, socket: Option<&SocketMock>) -> Self {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();

        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let api = ApiMock::new().await;
        let settings = create_test_settings(&api, socket, &temp_dir);

        let storage = SessionStorage::open(&settings.session.storage_path).expect("Failed to open storage");
        if let Some(token) = token {
            storage.set(&settings.session.token_key, token).expect("Failed to store token");
        }
        let session = Session::new(Arc::new(storage), &settings.session);

        Self {
            api,
            settings,
            session,
            temp_dir,
        }
    }

    pub fn services(&self) -> ServiceFactory {
        ServiceFactory::new(&self.settings, self.session.clone()).expect("Failed to build services")
    }

    /// English translations with the section labels
    pub fn i18n(&self) -> mlm_admin::I18n {
        let mut i18n = mlm_admin::I18n::new(&self.settings.i18n);
        i18n.insert_translations(
            mlm_admin::i18n::Language::En,
            json!({
                "sections": {"users": "User Management", "payment_desk": "Incoming Payments"},
                "relay": {"connected": "Connected", "disconnected": "Disconnected"},
            }),
        )
        .expect("Failed to insert translations");
        i18n.insert_translations(
            mlm_admin::i18n::Language::Ru,
            json!({"sections": {"users": "Управление пользователями"}}),
        )
        .expect("Failed to insert translations");
        i18n
    }
}

pub fn create_test_settings(api: &ApiMock, socket: Option<&SocketMock>, temp_dir: &TempDir) -> Settings {
    let mut settings = Settings::default();
    settings.api.base_url = api.uri();
    settings.api.timeout_seconds = 5;
    settings.realtime.url = socket.map(SocketMock::url);
    settings.realtime.ack_timeout_seconds = 2;
    settings.realtime.reconnect.initial_delay_ms = 50;
    settings.realtime.reconnect.max_delay_ms = 200;
    settings.realtime.reconnect.jitter = 0.0;
    settings.realtime.reconnect.max_retries = 5;
    settings.session.storage_path = temp_dir
        .path()
        .join("storage.json")
        .to_string_lossy()
        .into_owned();
    settings
}

/// Wait until the relay status satisfies `predicate`
pub async fn wait_for_status<F>(status: &mut watch::Receiver<RelayStatus>, predicate: F) -> RelayStatus
where
    F: Fn(&RelayStatus) -> bool,
{
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            {
                let current = status.borrow_and_update();
                if predicate(&current) {
                    return current.clone();
                }
            }
            status.changed().await.expect("Relay status channel closed");
        }
    })
    .await
    .expect("Timed out waiting for relay status")
}

/// Poll `condition` until it holds
pub async fn eventually<F>(condition: F)
where
    F: Fn() -> bool,
{
    tokio::time::timeout(Duration::from_secs(5), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .expect("Condition not met in time");
}
