//! # JoinRequest Repository Trait
//!
//! 参加リクエストの永続化を抽象化

use anyhow::Result;
use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::domain::entities::join_request::JoinRequest;

/// 参加リクエストリポジトリ
#[cfg_attr(test, automock)]
#[async_trait]
pub trait JoinRequestRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<JoinRequest>>;

    /// 指定チーム・ユーザーの保留中リクエストを取得
    async fn find_pending(&self, team_id: &str, user_id: &str) -> Result<Option<JoinRequest>>;

    /// 指定チーム群宛ての保留中リクエストを作成日時順に返す
    async fn list_pending_for_teams(&self, team_ids: &[String]) -> Result<Vec<JoinRequest>>;

    /// リクエストを保存（IDが一致すれば上書き）
    async fn save(&self, request: &JoinRequest) -> Result<()>;

    /// 指定ユーザーの保留中リクエストをすべて削除
    ///
    /// # Returns
    ///
    /// 削除した件数
    async fn delete_pending_for_user(&self, user_id: &str) -> Result<usize>;
}
