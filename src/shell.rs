//! Dashboard shell
//!
//! Gates every section behind the session token, switches between sections
//! and owns the screen controllers. Entering the payment desk mounts the
//! realtime relay, leaving it unmounts.

use std::collections::HashMap;
use std::fmt;
use tracing::{debug, info, warn};
use crate::config::Settings;
use crate::i18n::{I18n, Language, LanguagePreference};
use crate::realtime::{ConnectionState, RealtimeRelay};
use crate::screens::{
    CoinsScreen, NotificationsScreen, PaymentDeskScreen, PaymentHistoryScreen, ProductsScreen,
    StatisticsScreen, TariffsScreen, UsersScreen, WithdrawalsScreen,
};
use crate::services::ServiceFactory;
use crate::session::Session;
use crate::utils::errors::Result;

/// Dashboard sections in menu order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Users,
    Payments,
    PaymentDesk,
    Withdrawals,
    Tariffs,
    Products,
    Coins,
    Statistics,
    Notifications,
}

impl Section {
    pub const ALL: [Section; 9] = [
        Section::Users,
        Section::Payments,
        Section::PaymentDesk,
        Section::Withdrawals,
        Section::Tariffs,
        Section::Products,
        Section::Coins,
        Section::Statistics,
        Section::Notifications,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Section::Users => "users",
            Section::Payments => "payments",
            Section::PaymentDesk => "payment_desk",
            Section::Withdrawals => "withdrawals",
            Section::Tariffs => "tariffs",
            Section::Products => "products",
            Section::Coins => "coins",
            Section::Statistics => "statistics",
            Section::Notifications => "notifications",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Section::ALL.into_iter().find(|section| section.id() == id)
    }

    pub fn label_key(self) -> String {
        format!("sections.{}", self.id())
    }

    /// Sections whose data lives only in this process
    pub fn is_local(self) -> bool {
        matches!(self, Section::Withdrawals | Section::Notifications)
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellView {
    Login,
    Dashboard { section: Section },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub section: Section,
    pub label: String,
    pub active: bool,
}

pub struct Shell {
    session: Session,
    i18n: I18n,
    language: Language,
    language_key: String,
    active: Section,
    pub users: UsersScreen,
    pub payments: PaymentHistoryScreen,
    pub payment_desk: PaymentDeskScreen,
    pub withdrawals: WithdrawalsScreen,
    pub tariffs: TariffsScreen,
    pub products: ProductsScreen,
    pub coins: CoinsScreen,
    pub statistics: StatisticsScreen,
    pub notifications: NotificationsScreen,
}

impl fmt::Debug for Shell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shell")
            .field("active", &self.active)
            .field("language", &self.language)
            .field("authenticated", &self.session.is_authenticated())
            .finish()
    }
}

impl Shell {
    /// Build every screen; nothing is fetched until [`Shell::start`]
    pub fn new(settings: &Settings, session: Session, i18n: I18n) -> Result<Self> {
        let services = ServiceFactory::new(settings, session.clone())?;
        let relay = RealtimeRelay::new(settings, session.clone())?;

        let language = LanguagePreference::load(
            session.storage(),
            &settings.session.language_key,
            i18n.default_language(),
        );
        let active = Section::from_id(&settings.dashboard.default_section).unwrap_or(Section::Users);

        Ok(Self {
            users: UsersScreen::new(&services),
            payments: PaymentHistoryScreen::new(&services),
            payment_desk: PaymentDeskScreen::new(relay, session.clone()),
            withdrawals: WithdrawalsScreen::default(),
            tariffs: TariffsScreen::new(&services),
            products: ProductsScreen::new(&services),
            coins: CoinsScreen::new(&services),
            statistics: StatisticsScreen::new(&services),
            notifications: NotificationsScreen::default(),
            session,
            i18n,
            language,
            language_key: settings.session.language_key.clone(),
            active,
        })
    }

    pub fn view(&self) -> ShellView {
        if self.session.is_authenticated() {
            ShellView::Dashboard { section: self.active }
        } else {
            ShellView::Login
        }
    }

    pub fn active(&self) -> Section {
        self.active
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn relay(&self) -> &RealtimeRelay {
        self.payment_desk.relay()
    }

    /// Initial fetch of the active section; a no-op without a token
    pub async fn start(&mut self) -> bool {
        if !self.session.is_authenticated() {
            info!("No session token, showing the login view");
            return false;
        }

        info!(section = %self.active, "Starting dashboard");
        self.enter(self.active).await
    }

    /// Store a token and enter the dashboard
    pub async fn login(&mut self, token: &str) -> Result<bool> {
        self.session.login(token)?;
        Ok(self.start().await)
    }

    /// Drop the token; the relay closes itself on the session change
    pub async fn logout(&mut self) -> Result<()> {
        self.payment_desk.unmount().await;
        self.session.logout()
    }

    /// Switch sections, fetching the new one when authenticated
    pub async fn activate(&mut self, section: Section) -> bool {
        if section == self.active {
            return self.session.is_authenticated();
        }

        debug!(from = %self.active, to = %section, "Switching section");
        if self.active == Section::PaymentDesk {
            self.payment_desk.unmount().await;
        }
        self.active = section;

        if !self.session.is_authenticated() {
            return false;
        }
        self.enter(section).await
    }

    async fn enter(&mut self, section: Section) -> bool {
        match section {
            Section::Users => self.users.load().await,
            Section::Payments => self.payments.load().await,
            Section::PaymentDesk => self.payment_desk.mount().await,
            Section::Tariffs => self.tariffs.load().await,
            Section::Products => self.products.load().await,
            Section::Coins => self.coins.load().await,
            Section::Statistics => self.statistics.load().await,
            Section::Withdrawals | Section::Notifications => true,
        }
    }

    pub fn menu(&self) -> Vec<MenuItem> {
        Section::ALL
            .into_iter()
            .map(|section| MenuItem {
                section,
                label: self.i18n.t(&section.label_key(), self.language),
                active: section == self.active,
            })
            .collect()
    }

    pub fn t(&self, key: &str) -> String {
        self.i18n.t(key, self.language)
    }

    /// Connection indicator text for the payment desk header
    pub fn relay_label(&self) -> String {
        let status = self.relay().status();
        let label = match status.state {
            ConnectionState::Disconnected => self.t("relay.disconnected"),
            ConnectionState::Connecting => self.t("relay.connecting"),
            ConnectionState::Connected => self.t("relay.connected"),
            ConnectionState::Reconnecting { attempt } => {
                let params = HashMap::from([("attempt".to_string(), attempt.to_string())]);
                self.i18n.t_with("relay.reconnecting", self.language, Some(&params))
            }
        };

        if status.stale {
            format!("{} · {}", label, self.t("relay.stale"))
        } else {
            label
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn set_language(&mut self, language: Language) -> Result<()> {
        if !self.i18n.is_language_supported(language) {
            warn!(language = %language, "Language is not enabled, keeping {}", self.language);
            return Ok(());
        }

        LanguagePreference::save(self.session.storage(), &self.language_key, language)?;
        self.language = language;
        Ok(())
    }

    /// Unmount the payment desk before exit
    pub async fn shutdown(&mut self) {
        self.payment_desk.unmount().await;
    }
}
