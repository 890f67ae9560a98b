//! # EventRegistration Entity
//!
//! イベント登録（参加可能なイベントと日付の根拠）

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// イベント登録
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRegistration {
    pub event_key: String,
    pub user_id: String,
    pub user_email: String,
    #[serde(default)]
    pub event_date: Option<NaiveDate>,
}

impl EventRegistration {
    pub fn new(
        event_key: impl Into<String>,
        user_id: impl Into<String>,
        user_email: impl Into<String>,
        event_date: Option<NaiveDate>,
    ) -> Self {
        Self {
            event_key: event_key.into(),
            user_id: user_id.into(),
            user_email: super::user::normalize_email(&user_email.into()),
            event_date,
        }
    }

    /// 同じ `(event_key, user_id)` を指すか
    pub fn same_key(&self, other: &EventRegistration) -> bool {
        self.event_key == other.event_key && self.user_id == other.user_id
    }
}
