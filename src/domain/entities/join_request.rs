//! # JoinRequest Entity
//!
//! チーム参加リクエストのエンティティ

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::Member;

/// 参加リクエストの状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinRequestStatus {
    Pending,
    Accepted,
    Rejected,
}

/// 参加リクエスト
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinRequest {
    pub id: String,
    pub team_id: String,
    pub user_id: String,
    pub user_name: String,
    pub user_email: String,
    pub status: JoinRequestStatus,
    pub created_at: DateTime<Utc>,
}

impl JoinRequest {
    /// 保留状態の新しいリクエストを作成
    pub fn pending(
        team_id: impl Into<String>,
        user_id: impl Into<String>,
        user_name: impl Into<String>,
        user_email: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            team_id: team_id.into(),
            user_id: user_id.into(),
            user_name: user_name.into(),
            user_email: user_email.into(),
            status: JoinRequestStatus::Pending,
            created_at: Utc::now(),
        }
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.status == JoinRequestStatus::Pending
    }

    /// 申請者をチームメンバーとして返す
    pub fn applicant(&self) -> Member {
        Member::new(&self.user_id, &self.user_name, &self.user_email)
    }
}
