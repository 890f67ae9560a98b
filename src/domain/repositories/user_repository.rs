//! # User Repository Trait
//!
//! 参加者の永続化を抽象化

use anyhow::Result;
use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::domain::entities::user::User;

/// 参加者リポジトリ
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<User>>;

    /// 学籍番号で検索（大文字小文字を区別しない）
    async fn find_by_registration_number(&self, reg_no: &str) -> Result<Option<User>>;

    /// メールアドレスで検索（正規化済みの値で比較）
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;

    /// 指定IDの参加者をまとめて取得（存在しないIDは無視）
    async fn find_many(&self, ids: &[String]) -> Result<Vec<User>>;

    async fn list_all(&self) -> Result<Vec<User>>;

    /// 参加者を保存（IDが一致すれば上書き）
    async fn save(&self, user: &User) -> Result<()>;
}
