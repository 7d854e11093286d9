//! Withdrawal requests screen
//!
//! The backend exposes no withdrawal endpoint, so the list lives in this
//! controller and every status change is local.

use rust_decimal::Decimal;
use tracing::{info, warn};
use crate::models::withdrawal::{Withdrawal, WithdrawalStatus};
use crate::utils::helpers::contains_ignore_case;
use crate::utils::logging::log_operator_action;
use super::Notices;

const SCREEN: &str = "withdrawals";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WithdrawalFilter {
    /// Matched against phone and card number
    pub search: String,
    pub status: Option<WithdrawalStatus>,
}

impl WithdrawalFilter {
    pub fn matches(&self, withdrawal: &Withdrawal) -> bool {
        let matches_search = contains_ignore_case(&withdrawal.user_phone, &self.search)
            || contains_ignore_case(&withdrawal.card_number, &self.search);
        let matches_status = self.status.map_or(true, |status| withdrawal.status == status);
        matches_search && matches_status
    }
}

#[derive(Debug, Default)]
pub struct WithdrawalsScreen {
    withdrawals: Vec<Withdrawal>,
    pub filter: WithdrawalFilter,
    notices: Notices,
}

impl WithdrawalsScreen {
    pub fn new(withdrawals: Vec<Withdrawal>) -> Self {
        Self {
            withdrawals,
            ..Default::default()
        }
    }

    /// Replace the request list, e.g. from an imported file
    pub fn import(&mut self, withdrawals: Vec<Withdrawal>) {
        info!(count = withdrawals.len(), "Withdrawal requests imported");
        self.withdrawals = withdrawals;
    }

    pub fn withdrawals(&self) -> &[Withdrawal] {
        &self.withdrawals
    }

    pub fn visible(&self) -> Vec<&Withdrawal> {
        self.withdrawals.iter().filter(|w| self.filter.matches(w)).collect()
    }

    /// Processing and unpaid amounts among the filtered requests
    pub fn pending_amount(&self) -> Decimal {
        self.visible()
            .into_iter()
            .filter(|w| matches!(w.status, WithdrawalStatus::Processing | WithdrawalStatus::Unpaid))
            .map(|w| w.amount)
            .sum()
    }

    pub fn paid_amount(&self) -> Decimal {
        self.visible()
            .into_iter()
            .filter(|w| w.status == WithdrawalStatus::Paid)
            .map(|w| w.amount)
            .sum()
    }

    pub fn unpaid_count(&self) -> usize {
        self.visible()
            .into_iter()
            .filter(|w| w.status == WithdrawalStatus::Unpaid)
            .count()
    }

    pub fn set_status(&mut self, id: &str, status: WithdrawalStatus) -> bool {
        let Some(withdrawal) = self.withdrawals.iter_mut().find(|w| w.id == id) else {
            self.notices.error(format!("Unknown withdrawal request {}", id));
            return false;
        };

        if !withdrawal.status.can_transition_to(status) {
            warn!(id = id, from = ?withdrawal.status, to = ?status, "Rejected withdrawal status change");
            self.notices.error(format!("Cannot move a {:?} request to {:?}", withdrawal.status, status));
            return false;
        }

        withdrawal.status = status;
        log_operator_action(SCREEN, "set_status", Some(id), Some(&format!("{:?}", status)));
        self.notices.success(format!("Request marked {:?}", status));
        true
    }

    /// Mark every processing request paid; returns how many changed
    pub fn mark_all_processing_paid(&mut self) -> usize {
        self.bulk_transition(WithdrawalStatus::Processing, WithdrawalStatus::Paid)
    }

    /// Start processing every unpaid request; returns how many changed
    pub fn move_all_unpaid_to_processing(&mut self) -> usize {
        self.bulk_transition(WithdrawalStatus::Unpaid, WithdrawalStatus::Processing)
    }

    fn bulk_transition(&mut self, from: WithdrawalStatus, to: WithdrawalStatus) -> usize {
        let mut changed = 0;
        for withdrawal in self.withdrawals.iter_mut().filter(|w| w.status == from) {
            withdrawal.status = to;
            changed += 1;
        }

        if changed > 0 {
            log_operator_action(SCREEN, "bulk_status", None, Some(&format!("{} {:?} -> {:?}", changed, from, to)));
            self.notices.success(format!("{} requests marked {:?}", changed, to));
        } else {
            self.notices.info(format!("No {:?} requests", from));
        }
        changed
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
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn request(id: &str, amount: Decimal, status: WithdrawalStatus) -> Withdrawal {
        Withdrawal {
            id: id.to_string(),
            user_id: format!("user-{}", id),
            user_phone: format!("+99890000000{}", id),
            card_number: format!("860012345678000{}", id),
            amount,
            status,
            request_date: Utc::now(),
        }
    }

    fn screen() -> WithdrawalsScreen {
        WithdrawalsScreen::new(vec![
            request("1", dec!(100), WithdrawalStatus::Unpaid),
            request("2", dec!(50.25), WithdrawalStatus::Processing),
            request("3", dec!(10), WithdrawalStatus::Paid),
        ])
    }

    #[test]
    fn test_aggregates() {
        let screen = screen();
        assert_eq!(screen.pending_amount(), dec!(150.25));
        assert_eq!(screen.paid_amount(), dec!(10));
        assert_eq!(screen.unpaid_count(), 1);
    }

    #[test]
    fn test_status_transitions() {
        let mut screen = screen();
        assert!(screen.set_status("1", WithdrawalStatus::Processing));
        assert!(!screen.set_status("3", WithdrawalStatus::Unpaid));
        assert!(!screen.set_status("missing", WithdrawalStatus::Paid));
        assert_eq!(screen.notices().count(crate::screens::NoticeLevel::Error), 2);
    }

    #[test]
    fn test_bulk_actions() {
        let mut screen = screen();
        assert_eq!(screen.move_all_unpaid_to_processing(), 1);
        assert_eq!(screen.mark_all_processing_paid(), 2);
        assert_eq!(screen.paid_amount(), dec!(160.25));
        assert_eq!(screen.mark_all_processing_paid(), 0);
    }

    #[test]
    fn test_search_by_card() {
        let mut screen = screen();
        screen.filter.search = "8600123456780002".to_string();
        let visible = screen.visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, "2");
    }
}
