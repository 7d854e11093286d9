//! MLM Admin
//!
//! Headless entry point: restores the session, loads the default section and
//! follows the realtime payment feed until Ctrl-C.

use std::sync::Arc;
use anyhow::Context;
use tracing::{error, info, warn};

use mlm_admin::{
    config::Settings,
    i18n::I18n,
    session::{Session, SessionStorage},
    shell::{Shell, ShellView},
    utils::{helpers::format_timestamp, logging},
};

const TOKEN_ENV: &str = "MLM_ADMIN_TOKEN";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new().context("failed to load settings")?;
    settings.validate()?;

    // Initialize logging
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}...", mlm_admin::info());

    // Restore the session
    let storage = SessionStorage::open(&settings.session.storage_path)
        .with_context(|| format!("failed to open session storage at {}", settings.session.storage_path))?;
    let session = Session::new(Arc::new(storage), &settings.session);

    if let Ok(token) = std::env::var(TOKEN_ENV) {
        if !token.trim().is_empty() {
            info!("Using token from {}", TOKEN_ENV);
            session.login(token)?;
        }
    }

    // Initialize i18n system
    info!("Loading translations...");
    let mut i18n = I18n::new(&settings.i18n);
    i18n.load_translations().await?;

    let mut shell = Shell::new(&settings, session, i18n)?;

    if shell.view() == ShellView::Login {
        warn!("{}", shell.t("app.loginRequired"));
        return Ok(());
    }

    shell.start().await;
    for item in shell.menu() {
        info!(section = %item.section, active = item.active, "{}", item.label);
    }

    if !shell.payment_desk.mount().await {
        for notice in shell.payment_desk.notices_mut().drain() {
            error!("{}", notice.message);
        }
        shell.shutdown().await;
        return Ok(());
    }

    let mut status = shell.relay().subscribe();
    loop {
        tokio::select! {
            changed = status.changed() => {
                if changed.is_err() {
                    break;
                }
                let current = status.borrow_and_update().clone();
                info!(
                    pending = current.pending_count(),
                    stale = current.stale,
                    state = ?current.state,
                    snapshot_at = current.last_snapshot_at.map(format_timestamp).as_deref(),
                    "{}",
                    shell.relay_label()
                );
                if shell.view() == ShellView::Login {
                    warn!("{}", shell.t("app.loginRequired"));
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down...");
                break;
            }
        }
    }

    shell.shutdown().await;
    Ok(())
}
