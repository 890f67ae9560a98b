//! # Registration Repository Trait
//!
//! イベント登録の参照を抽象化

use anyhow::Result;
use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::domain::entities::registration::EventRegistration;

/// イベント登録リポジトリ
///
/// 登録データは外部から取り込まれる。Use Case からは参照のみ
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RegistrationRepository: Send + Sync {
    /// 指定イベントのユーザー登録を取得
    async fn find(&self, event: &str, user_id: &str) -> Result<Option<EventRegistration>>;

    /// 指定イベントの登録をメールアドレスで取得
    async fn find_by_email(&self, event: &str, email: &str) -> Result<Option<EventRegistration>>;

    async fn list_for_event(&self, event: &str) -> Result<Vec<EventRegistration>>;

    /// 登録を保存（`(event_key, user_id)` が一致すれば上書き）
    async fn save(&self, registration: &EventRegistration) -> Result<()>;
}
