//! # Admin Repository Trait
//!
//! 管理者アカウントの永続化を抽象化

use anyhow::Result;
use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::domain::entities::admin::AdminUser;

/// 管理者リポジトリ
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AdminRepository: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<AdminUser>>;

    async fn count(&self) -> Result<usize>;

    async fn save(&self, admin: &AdminUser) -> Result<()>;
}
