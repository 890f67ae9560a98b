//! # Admin Auth Use Case
//!
//! 管理者のログイン・セッション検証・初期管理者の作成

use std::sync::Arc;

use anyhow::Result;
use log::{info, warn};
use serde::Serialize;

use crate::application::dto::commands::AdminLoginCommand;
use crate::domain::entities::admin::{AdminSession, AdminUser};
use crate::domain::error::{require_fields, TeamError};
use crate::domain::repositories::admin_repository::AdminRepository;

/// 初期管理者のセットアップ結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SetupOutcome {
    /// 管理者が存在しなかったため既定の管理者を作成した
    Created { username: String, password: String },
    /// 既に管理者が存在する
    Exists { count: usize },
}

/// 管理者認証ユースケース
pub struct AdminAuthUseCase<A: AdminRepository> {
    admin_repository: Arc<A>,
}

impl<A: AdminRepository> AdminAuthUseCase<A> {
    pub fn new(admin_repository: Arc<A>) -> Self {
        Self { admin_repository }
    }

    /// ユーザー名とパスワードでログイン
    ///
    /// # Returns
    ///
    /// `admin-session` クッキーに格納するセッション
    ///
    /// # Errors
    ///
    /// 該当する管理者がいない、またはパスワード不一致の場合に `InvalidCredentials`
    pub async fn login(&self, command: &AdminLoginCommand) -> Result<AdminSession> {
        require_fields(
            &[&command.username, &command.password],
            "Missing username or password.",
        )?;

        let admin = self
            .admin_repository
            .find_by_username(&command.username)
            .await?
            .filter(|a| a.password == command.password)
            .ok_or_else(|| {
                warn!("Failed admin login for '{}'", command.username);
                TeamError::InvalidCredentials
            })?;

        info!("Admin '{}' logged in", admin.username);
        Ok(admin.session())
    }

    /// クッキー値のセッションを検証
    ///
    /// # Errors
    ///
    /// クッキーがない、解釈できない、管理者が存在しない場合に `InvalidSession`
    pub async fn validate(&self, cookie: Option<&str>) -> Result<AdminSession> {
        let session = cookie
            .and_then(AdminSession::parse)
            .ok_or(TeamError::InvalidSession)?;

        let admin = self
            .admin_repository
            .find_by_username(&session.username)
            .await?
            .ok_or(TeamError::InvalidSession)?;

        Ok(admin.session())
    }

    /// 管理者が1人もいなければ既定の管理者を作成
    pub async fn setup_default(&self, username: &str, password: &str) -> Result<SetupOutcome> {
        let count = self.admin_repository.count().await?;
        if count > 0 {
            return Ok(SetupOutcome::Exists { count });
        }

        let admin = AdminUser::new(username, password);
        self.admin_repository.save(&admin).await?;

        warn!(
            "Default admin '{}' created; change its password after first login",
            admin.username
        );
        Ok(SetupOutcome::Created {
            username: admin.username,
            password: admin.password,
        })
    }
}
