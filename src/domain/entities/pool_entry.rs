//! # PoolEntry Entity
//!
//! ランダムプール（未所属の参加者の待ち行列）のエンティティ

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::user::{Member, User};

/// ランダムプールのエントリ
///
/// `(user_id, event)` ごとに一意
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolEntry {
    pub user_id: String,
    pub user_name: String,
    pub user_email: String,
    pub event: String,
    pub event_date: NaiveDate,
    pub queued_at: DateTime<Utc>,
}

impl PoolEntry {
    /// 参加者から新しいエントリを作成
    pub fn for_user(user: &User, event: impl Into<String>, event_date: NaiveDate) -> Self {
        Self {
            user_id: user.id.clone(),
            user_name: user.name.clone(),
            user_email: user.email.clone(),
            event: event.into(),
            event_date,
            queued_at: Utc::now(),
        }
    }

    /// 同じ `(user_id, event)` を指すか
    pub fn same_key(&self, other: &PoolEntry) -> bool {
        self.user_id == other.user_id && self.event == other.event
    }

    pub fn to_member(&self) -> Member {
        Member::new(&self.user_id, &self.user_name, &self.user_email)
    }
}
