//! Payment history screen

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use crate::models::payment::{Payment, PaymentStatus};
use crate::services::{PaymentService, ServiceFactory};
use crate::session::Session;
use crate::utils::helpers::contains_ignore_case;
use super::{load_into, ListState, Notices};

const SCREEN: &str = "payments";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateRange {
    #[default]
    Last7Days,
    Last30Days,
    Last90Days,
    All,
}

impl DateRange {
    pub fn days(self) -> Option<i64> {
        match self {
            DateRange::Last7Days => Some(7),
            DateRange::Last30Days => Some(30),
            DateRange::Last90Days => Some(90),
            DateRange::All => None,
        }
    }

    /// Undated payments only pass the `All` range
    pub fn contains(self, date: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
        match (self.days(), date) {
            (None, _) => true,
            (Some(days), Some(date)) => date >= now - Duration::days(days),
            (Some(_), None) => false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentFilter {
    /// Matched against user id and phone
    pub search: String,
    pub kind: Option<String>,
    pub status: Option<PaymentStatus>,
    pub range: DateRange,
}

impl PaymentFilter {
    pub fn matches(&self, payment: &Payment, now: DateTime<Utc>) -> bool {
        let matches_search = contains_ignore_case(&payment.user_id, &self.search)
            || payment
                .user_phone
                .as_deref()
                .is_some_and(|phone| contains_ignore_case(phone, &self.search));
        let matches_kind = self
            .kind
            .as_deref()
            .map_or(true, |kind| payment.kind.as_deref() == Some(kind));
        let matches_status = self.status.map_or(true, |status| payment.status == status);

        matches_search && matches_kind && matches_status && self.range.contains(payment.date, now)
    }
}

/// Totals over the filtered payments
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaymentSummary {
    pub total_amount: Decimal,
    pub completed_amount: Decimal,
    pub completed_count: usize,
    pub pending_count: usize,
    pub count: usize,
}

impl PaymentSummary {
    pub fn of<'a>(payments: impl IntoIterator<Item = &'a Payment>) -> Self {
        payments.into_iter().fold(Self::default(), |mut summary, payment| {
            summary.count += 1;
            summary.total_amount += payment.amount;
            match payment.status {
                PaymentStatus::Completed => {
                    summary.completed_count += 1;
                    summary.completed_amount += payment.amount;
                }
                PaymentStatus::Pending => summary.pending_count += 1,
                _ => {}
            }
            summary
        })
    }
}

#[derive(Debug)]
pub struct PaymentHistoryScreen {
    service: PaymentService,
    session: Session,
    list: ListState<Payment>,
    pub filter: PaymentFilter,
    notices: Notices,
}

impl PaymentHistoryScreen {
    pub fn new(services: &ServiceFactory) -> Self {
        Self {
            service: services.payment_service.clone(),
            session: services.session().clone(),
            list: ListState::default(),
            filter: PaymentFilter::default(),
            notices: Notices::default(),
        }
    }

    /// `GET /payments`
    pub async fn load(&mut self) -> bool {
        load_into(&mut self.list, &self.session, &mut self.notices, SCREEN, self.service.list()).await
    }

    pub fn list(&self) -> &ListState<Payment> {
        &self.list
    }

    pub fn visible(&self) -> Vec<&Payment> {
        self.visible_at(Utc::now())
    }

    pub fn visible_at(&self, now: DateTime<Utc>) -> Vec<&Payment> {
        self.list
            .items()
            .iter()
            .filter(|p| self.filter.matches(p, now))
            .collect()
    }

    pub fn summary(&self) -> PaymentSummary {
        PaymentSummary::of(self.visible())
    }

    pub fn notices(&self) -> &Notices {
        &self.notices
    }

    pub fn notices_mut(&mut self) -> &mut Notices {
        &mut self.notices
    }
}
