//! Test data builders
//!
//! JSON shaped the way the backend sends it.

use serde_json::{json, Value};

pub fn user_json(id: &str, balance: f64, plan: Option<&str>, active: bool) -> Value {
    json!({
        "_id": id,
        "email": format!("{}@example.uz", id),
        "phoneNumber": format!("+99890{}", id.len()),
        "role": "USER",
        "coin": balance,
        "isActive": active,
        "subscriptionPlan": plan,
    })
}

pub fn realtime_payment_json(payment_id: &str, user_id: &str, amount: u64) -> Value {
    json!({
        "paymentId": payment_id,
        "userId": user_id,
        "message": "Top up",
        "date": "2024-06-01T08:30:00Z",
        "howMuch": amount,
        "currency": "UZS",
        "status": "PENDING",
    })
}

pub fn tariff_json(id: &str, coin: f64, active: bool) -> Value {
    json!({
        "_id": id,
        "term": 30,
        "coin": coin,
        "dailyProfit": 1.5,
        "referral_bonus": 5.0,
        "isActive": active,
        "translations": [{"language": "en", "name": format!("Tariff {}", id), "description": ""}],
    })
}

pub fn web_statistics_json() -> Value {
    json!({
        "_id": "s1",
        "totalIncome": 1000,
        "totalExpenses": 250,
        "totalUsers": 40,
        "activeUsers": 31,
        "dailyWithdrawals": [{"date": "2024-06-01", "amount": 50}, {"date": "2024-06-02", "amount": 100}],
        "monthlyWithdrawals": [],
    })
}
