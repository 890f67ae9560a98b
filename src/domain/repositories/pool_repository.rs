//! # Pool Repository Trait
//!
//! ランダムプールの永続化を抽象化

use anyhow::Result;
use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::domain::entities::pool_entry::PoolEntry;

/// ランダムプールリポジトリ
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PoolRepository: Send + Sync {
    /// 指定イベントのエントリを登録順に返す
    async fn list(&self, event: &str) -> Result<Vec<PoolEntry>>;

    async fn count(&self, event: &str) -> Result<usize>;

    /// エントリを登録（`(user_id, event)` が既にあれば日付と名前のみ更新し、登録順は維持）
    async fn upsert(&self, entry: &PoolEntry) -> Result<()>;

    /// 指定イベントからユーザーを削除
    ///
    /// # Returns
    ///
    /// 削除した場合に `true`
    async fn remove(&self, user_id: &str, event: &str) -> Result<bool>;

    /// 全イベントからユーザーを削除
    ///
    /// # Returns
    ///
    /// 削除した件数
    async fn remove_user(&self, user_id: &str) -> Result<usize>;
}
