//! # User Entity
//!
//! 参加者とチームメンバーのエンティティ

use serde::{Deserialize, Serialize};

/// 参加者
///
/// `id` は学籍番号（registration number）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// 平文のまま比較する（認証強化は対象外）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl User {
    /// 新しい参加者を作成
    ///
    /// メールアドレスは小文字に正規化される
    pub fn new(id: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: normalize_email(&email.into()),
            username: None,
            password: None,
        }
    }

    /// チームに格納するメンバー情報へ変換
    pub fn to_member(&self) -> Member {
        Member {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }

    /// パスワードを除いた公開用の表現を返す
    pub fn without_password(&self) -> Self {
        Self {
            password: None,
            ..self.clone()
        }
    }
}

/// チームメンバー
///
/// チームに埋め込まれる参加者のスナップショット
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
}

impl Member {
    pub fn new(id: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
        }
    }
}

/// メールアドレスを比較用に正規化
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_normalizes_email() {
        let user = User::new("21BCE0001", "Asha", "  Asha@Example.COM ");
        assert_eq!(user.email, "asha@example.com");
        assert!(user.password.is_none());
    }

    #[test]
    fn test_to_member() {
        let user = User::new("21BCE0001", "Asha", "asha@example.com");
        let member = user.to_member();

        assert_eq!(member, Member::new("21BCE0001", "Asha", "asha@example.com"));
    }

    #[test]
    fn test_password_is_not_serialized_after_strip() {
        let mut user = User::new("21BCE0001", "Asha", "asha@example.com");
        user.password = Some("secret".to_string());

        let json = serde_json::to_value(user.without_password()).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["id"], "21BCE0001");
    }
}
