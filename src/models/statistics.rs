//! Platform statistics records

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyWithdrawal {
    pub date: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyWithdrawal {
    pub month: String,
    pub amount: Decimal,
}

/// One row of a withdrawal bar chart
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label: String,
    pub amount: Decimal,
    /// Share of the largest bar, 0..=100
    pub percentage: Decimal,
}

/// Document behind `/statistika/statis-web`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebStatistics {
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub total_income: Decimal,
    #[serde(default)]
    pub total_expenses: Decimal,
    #[serde(default)]
    pub total_users: u64,
    #[serde(default)]
    pub active_users: u64,
    #[serde(default)]
    pub new_users_today: u64,
    #[serde(default)]
    pub new_users_this_month: u64,
    #[serde(default)]
    pub pending_withdrawals: u64,
    #[serde(default)]
    pub completed_withdrawals: u64,
    #[serde(default)]
    pub daily_withdrawals: Vec<DailyWithdrawal>,
    #[serde(default)]
    pub monthly_withdrawals: Vec<MonthlyWithdrawal>,
}

impl WebStatistics {
    pub fn net_profit(&self) -> Decimal {
        self.total_income - self.total_expenses
    }

    /// Net profit as a percentage of income, rounded to one decimal place.
    /// `None` when there is no income to divide by.
    pub fn profit_margin(&self) -> Option<Decimal> {
        if self.total_income.is_zero() {
            return None;
        }
        Some((self.net_profit() / self.total_income * Decimal::ONE_HUNDRED).round_dp(1))
    }

    pub fn total_withdrawals(&self) -> u64 {
        self.pending_withdrawals + self.completed_withdrawals
    }

    pub fn daily_bars(&self) -> Vec<Bar> {
        bars(self.daily_withdrawals.iter().map(|d| (d.date.clone(), d.amount)))
    }

    pub fn monthly_bars(&self) -> Vec<Bar> {
        bars(self.monthly_withdrawals.iter().map(|m| (m.month.clone(), m.amount)))
    }
}

fn bars(points: impl Iterator<Item = (String, Decimal)>) -> Vec<Bar> {
    let points: Vec<_> = points.collect();
    let max = points
        .iter()
        .map(|(_, amount)| *amount)
        .max()
        .unwrap_or(Decimal::ZERO);

    points
        .into_iter()
        .map(|(label, amount)| {
            let percentage = if max > Decimal::ZERO {
                (amount / max * Decimal::ONE_HUNDRED).round_dp(2)
            } else {
                Decimal::ZERO
            };
            Bar { label, amount, percentage }
        })
        .collect()
}

/// Free-form per-user statistic row from `/statistika/user`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserStatistic {
    #[serde(default, rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl UserStatistic {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { id: None, fields }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }
}
