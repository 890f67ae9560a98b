//! Admin Session Cookie
//!
//! `admin-session` クッキーの読み書き

use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};

use super::error::ApiError;
use super::state::AppState;
use crate::domain::entities::admin::AdminSession;

pub const SESSION_COOKIE: &str = "admin-session";

/// リクエストヘッダーから `admin-session` の値を取り出す
pub fn session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_string())
}

/// セッションを保存する `Set-Cookie` ヘッダー
pub fn set_session(session: &AdminSession) -> Result<HeaderMap, ApiError> {
    let value = serde_json::to_string(session).map_err(|e| ApiError::Internal(e.into()))?;
    cookie_header(format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age=86400",
        SESSION_COOKIE, value
    ))
}

/// セッションを破棄する `Set-Cookie` ヘッダー
pub fn clear_session() -> Result<HeaderMap, ApiError> {
    cookie_header(format!(
        "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
        SESSION_COOKIE
    ))
}

fn cookie_header(cookie: String) -> Result<HeaderMap, ApiError> {
    let value = HeaderValue::from_str(&cookie).map_err(|e| ApiError::Internal(e.into()))?;
    let mut headers = HeaderMap::new();
    headers.insert(SET_COOKIE, value);
    Ok(headers)
}

/// 管理者セッションを要求する
///
/// # Errors
///
/// セッションがない、または無効な場合は 401
pub async fn require_admin(state: &AppState, headers: &HeaderMap) -> Result<AdminSession, ApiError> {
    let cookie = session_cookie(headers);
    Ok(state.admin_auth().validate(cookie.as_deref()).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_cookie_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static(r#"theme=dark; admin-session={"id":"a1","username":"admin"}"#),
        );

        let value = session_cookie(&headers).unwrap();
        assert_eq!(AdminSession::parse(&value).unwrap().username, "admin");
    }

    #[test]
    fn test_session_cookie_missing() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("theme=dark"));

        assert!(session_cookie(&headers).is_none());
        assert!(session_cookie(&HeaderMap::new()).is_none());
    }

    #[test]
    fn test_set_and_clear_headers() {
        let session = AdminSession {
            id: "a1".to_string(),
            username: "admin".to_string(),
        };
        let set = set_session(&session).unwrap();
        let cookie = set.get(SET_COOKIE).unwrap().to_str().unwrap();
        assert!(cookie.starts_with(r#"admin-session={"id":"a1","username":"admin"}"#));

        let cleared = clear_session().unwrap();
        assert!(cleared
            .get(SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .contains("Max-Age=0"));
    }
}
