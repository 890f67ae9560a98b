//! # Team Repository Trait
//!
//! チームの永続化を抽象化

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

#[cfg(test)]
use mockall::automock;

use crate::domain::entities::team::Team;

/// チーム検索条件
///
/// 指定した条件すべてに一致するチームを返す
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamFilter {
    pub event: Option<String>,
    pub event_date: Option<NaiveDate>,
    pub leader_id: Option<String>,
}

impl TeamFilter {
    pub fn event(event: impl Into<String>) -> Self {
        Self {
            event: Some(event.into()),
            ..Self::default()
        }
    }

    pub fn leader(leader_id: impl Into<String>) -> Self {
        Self {
            leader_id: Some(leader_id.into()),
            ..Self::default()
        }
    }

    pub fn on_date(mut self, date: NaiveDate) -> Self {
        self.event_date = Some(date);
        self
    }

    /// チームが条件に一致するか
    pub fn matches(&self, team: &Team) -> bool {
        self.event.as_deref().map_or(true, |e| team.event == e)
            && self.event_date.map_or(true, |d| team.event_date == Some(d))
            && self.leader_id.as_deref().map_or(true, |l| team.leader_id == l)
    }
}

/// チームリポジトリ
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TeamRepository: Send + Sync {
    /// IDでチームを取得
    async fn find_by_id(&self, id: &str) -> Result<Option<Team>>;

    /// 条件に一致するチームを作成日時順に返す
    async fn list(&self, filter: &TeamFilter) -> Result<Vec<Team>>;

    /// 指定ユーザーが所属するチームを取得
    async fn find_by_member(&self, user_id: &str) -> Result<Option<Team>>;

    /// チームを保存（IDが一致すれば上書き）
    ///
    /// # Errors
    ///
    /// 書き込みに失敗した場合にエラーを返す
    async fn save(&self, team: &Team) -> Result<()>;

    /// チームを削除
    ///
    /// # Returns
    ///
    /// 削除した場合に `true`
    async fn delete(&self, id: &str) -> Result<bool>;
}
