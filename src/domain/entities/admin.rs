//! # AdminUser Entity
//!
//! 管理者アカウントとセッション

use serde::{Deserialize, Serialize};

/// 管理者
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminUser {
    pub id: String,
    pub username: String,
    pub password: String,
}

impl AdminUser {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            username: username.into(),
            password: password.into(),
        }
    }

    /// セッションに格納する情報を返す
    pub fn session(&self) -> AdminSession {
        AdminSession {
            id: self.id.clone(),
            username: self.username.clone(),
        }
    }
}

/// 管理者セッション
///
/// `admin-session` クッキーにJSONとして格納される
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminSession {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub username: String,
}

impl AdminSession {
    /// クッキー値からセッションを復元
    ///
    /// JSONとして解釈できない、またはユーザー名が空の場合は `None`
    pub fn parse(value: &str) -> Option<Self> {
        let session: AdminSession = serde_json::from_str(value).ok()?;
        if session.username.is_empty() {
            return None;
        }
        Some(session)
    }
}
