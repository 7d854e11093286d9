//! Payment desk screen
//!
//! Shows the pending payments pushed over the realtime relay and lets the
//! operator answer one of them with the card number the user should pay to.

use std::sync::Arc;
use tracing::{info, warn};
use crate::models::payment::Payment;
use crate::realtime::{AdminAck, AdminResponder, AdminResponse, RealtimeRelay, RelayStatus};
use crate::session::Session;
use crate::utils::errors::AdminError;
use super::{surface_error, Notices};

const SCREEN: &str = "payment_desk";

/// Fields of the response dialog
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseForm {
    pub room: String,
    pub payment_id: String,
    pub card_number: String,
}

impl ResponseForm {
    /// Prefilled for a payment: room `room-<userId>`, empty card number
    pub fn for_payment(payment: &Payment) -> Self {
        Self {
            room: payment.room(),
            payment_id: payment.payment_id.clone(),
            card_number: String::new(),
        }
    }
}

pub struct PaymentDeskScreen {
    relay: RealtimeRelay,
    responder: Arc<dyn AdminResponder>,
    session: Session,
    form: Option<ResponseForm>,
    last_ack: Option<AdminAck>,
    notices: Notices,
}

impl std::fmt::Debug for PaymentDeskScreen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentDeskScreen")
            .field("relay", &self.relay)
            .field("form", &self.form)
            .finish()
    }
}

impl PaymentDeskScreen {
    pub fn new(relay: RealtimeRelay, session: Session) -> Self {
        let responder: Arc<dyn AdminResponder> = Arc::new(relay.clone());
        Self::with_responder(relay, responder, session)
    }

    /// Route admin responses through a custom responder
    pub fn with_responder(relay: RealtimeRelay, responder: Arc<dyn AdminResponder>, session: Session) -> Self {
        Self {
            relay,
            responder,
            session,
            form: None,
            last_ack: None,
            notices: Notices::default(),
        }
    }

    /// Connect the relay
    pub async fn mount(&mut self) -> bool {
        match self.relay.connect().await {
            Ok(()) => true,
            Err(e) => {
                surface_error(&self.session, &mut self.notices, SCREEN, "connect", &e);
                false
            }
        }
    }

    /// Close the relay and drop any open form
    pub async fn unmount(&mut self) {
        self.form = None;
        self.relay.close().await;
    }

    pub fn relay(&self) -> &RealtimeRelay {
        &self.relay
    }

    pub fn status(&self) -> RelayStatus {
        self.relay.status()
    }

    pub fn payments(&self) -> Vec<Payment> {
        self.relay.snapshot()
    }

    pub fn pending_count(&self) -> usize {
        self.relay.status().pending_count()
    }

    pub fn is_stale(&self) -> bool {
        self.relay.status().stale
    }

    /// Open the response dialog for a payment from the current snapshot
    pub fn open_form(&mut self, payment_id: &str) -> bool {
        let snapshot = self.relay.snapshot();
        match snapshot.iter().find(|p| p.payment_id == payment_id) {
            Some(payment) => {
                self.form = Some(ResponseForm::for_payment(payment));
                true
            }
            None => {
                self.notices.error(format!("Payment {} is no longer pending", payment_id));
                false
            }
        }
    }

    /// Open the dialog with operator-provided values
    pub fn open_blank_form(&mut self) {
        self.form = Some(ResponseForm::default());
    }

    pub fn form(&self) -> Option<&ResponseForm> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut ResponseForm> {
        self.form.as_mut()
    }

    pub fn close_form(&mut self) {
        self.form = None;
    }

    pub fn last_ack(&self) -> Option<&AdminAck> {
        self.last_ack.as_ref()
    }

    /// Validate the form and emit it. Invalid input never reaches the relay.
    pub async fn submit(&mut self) -> bool {
        let Some(form) = self.form.as_ref() else {
            self.notices.error("No response form is open");
            return false;
        };

        let response = match AdminResponse::new(&form.room, &form.payment_id, &form.card_number) {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Admin response rejected by validation");
                self.notices.error(AdminError::from(e).to_string());
                return false;
            }
        };

        let payment_id = response.payment_id.clone();
        match self.responder.respond(response).await {
            Ok(ack) if ack.success => {
                info!(payment_id = %payment_id, "Admin response acknowledged");
                self.notices.success(ack.message.clone().unwrap_or_else(|| "Response sent".to_string()));
                self.last_ack = Some(ack);
                self.form = None;
                true
            }
            Ok(ack) => {
                warn!(payment_id = %payment_id, message = ?ack.message, "Admin response refused");
                self.notices.error(ack.message.clone().unwrap_or_else(|| "Response refused".to_string()));
                self.last_ack = Some(ack);
                false
            }
            Err(e) => {
                surface_error(&self.session, &mut self.notices, SCREEN, "respond", &e);
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use async_trait::async_trait;
    use crate::config::Settings;
    use crate::screens::NoticeLevel;
    use crate::session::SessionStorage;
    use crate::utils::errors::Result;

    #[derive(Default)]
    struct CountingResponder {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl AdminResponder for CountingResponder {
        async fn respond(&self, _response: AdminResponse) -> Result<AdminAck> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(AdminAck {
                success: true,
                message: Some("ok".to_string()),
            })
        }
    }

    fn desk() -> (PaymentDeskScreen, Arc<CountingResponder>) {
        let settings = Settings::default();
        let storage = Arc::new(SessionStorage::in_memory());
        storage.set("token", "t").unwrap();
        let session = Session::new(storage, &settings.session);
        let relay = RealtimeRelay::new(&settings, session.clone()).unwrap();
        let responder = Arc::new(CountingResponder::default());
        let screen = PaymentDeskScreen::with_responder(relay, responder.clone(), session);
        (screen, responder)
    }

    #[tokio::test]
    async fn test_missing_field_never_emits() {
        let (mut screen, responder) = desk();
        screen.open_blank_form();
        {
            let form = screen.form_mut().unwrap();
            form.room = "room-1".to_string();
            form.card_number = "1234 5678 9012 3456".to_string();
        }

        assert!(!screen.submit().await);
        assert_eq!(responder.calls.load(Ordering::SeqCst), 0);
        assert_eq!(screen.notices().len(), 1);
        assert_eq!(screen.notices().count(NoticeLevel::Error), 1);
        assert!(screen.form().is_some());
    }

    #[tokio::test]
    async fn test_valid_submit_closes_form() {
        let (mut screen, responder) = desk();
        screen.open_blank_form();
        {
            let form = screen.form_mut().unwrap();
            form.room = "room-1".to_string();
            form.payment_id = "p-1".to_string();
            form.card_number = "1234-5678-9012-3456".to_string();
        }

        assert!(screen.submit().await);
        assert_eq!(responder.calls.load(Ordering::SeqCst), 1);
        assert!(screen.form().is_none());
        assert_eq!(screen.last_ack().map(|a| a.success), Some(true));
    }

    #[tokio::test]
    async fn test_short_card_number_never_emits() {
        let (mut screen, responder) = desk();
        screen.open_blank_form();
        {
            let form = screen.form_mut().unwrap();
            form.room = "room-1".to_string();
            form.payment_id = "p-1".to_string();
            form.card_number = "1234-5678-9012-345".to_string();
        }

        assert!(!screen.submit().await);
        assert_eq!(responder.calls.load(Ordering::SeqCst), 0);
    }
}
