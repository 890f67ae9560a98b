//! JSON Data Store Implementation
//!
//! 全Repositoryトレイトの実装（データセット全体を1つのJSONドキュメントとして保持）
//!
//! ファイルパスを指定した場合は変更のたびにファイルへ書き出す。
//! パスなしの場合はメモリ上のみで動作する。

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

use crate::domain::entities::admin::AdminUser;
use crate::domain::entities::join_request::JoinRequest;
use crate::domain::entities::pool_entry::PoolEntry;
use crate::domain::entities::registration::EventRegistration;
use crate::domain::entities::team::Team;
use crate::domain::entities::user::{normalize_email, User};
use crate::domain::repositories::admin_repository::AdminRepository;
use crate::domain::repositories::join_request_repository::JoinRequestRepository;
use crate::domain::repositories::pool_repository::PoolRepository;
use crate::domain::repositories::registration_repository::RegistrationRepository;
use crate::domain::repositories::team_repository::{TeamFilter, TeamRepository};
use crate::domain::repositories::user_repository::UserRepository;

/// 永続化されるデータセット
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreData {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub registrations: Vec<EventRegistration>,
    #[serde(default)]
    pub teams: Vec<Team>,
    #[serde(default)]
    pub join_requests: Vec<JoinRequest>,
    #[serde(default)]
    pub random_pool: Vec<PoolEntry>,
    #[serde(default)]
    pub admins: Vec<AdminUser>,
}

/// JSONドキュメントベースのデータストア
pub struct JsonDataStore {
    path: Option<PathBuf>,
    data: RwLock<StoreData>,
}

impl JsonDataStore {
    /// メモリ上のみのストアを作成
    pub fn in_memory() -> Self {
        Self::from_data(StoreData::default())
    }

    /// 初期データを持つメモリ上のストアを作成
    pub fn from_data(data: StoreData) -> Self {
        Self {
            path: None,
            data: RwLock::new(data),
        }
    }

    /// ファイルからストアを開く（存在しなければ空で開始）
    ///
    /// # Errors
    ///
    /// ファイルの読み込みまたはパースに失敗した場合にエラーを返す
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let load_path = path.clone();
        let data = tokio::task::spawn_blocking(move || Self::load_sync(&load_path))
            .await
            .map_err(|e| anyhow::anyhow!("Failed to spawn blocking task: {}", e))??;

        Ok(Self {
            path: Some(path),
            data: RwLock::new(data),
        })
    }

    /// 保存先のパス
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// 現在のデータのコピーを返す
    pub async fn snapshot(&self) -> StoreData {
        self.data.read().await.clone()
    }

    /// ファイルからデータを読み込む（同期処理）
    fn load_sync(path: &Path) -> Result<StoreData> {
        if !path.exists() {
            info!("No existing data file found at {}, starting empty", path.display());
            return Ok(StoreData::default());
        }

        let content = fs::read_to_string(path).context("Failed to read data file")?;
        let data: StoreData =
            serde_json::from_str(&content).context("Failed to parse data file JSON")?;

        info!(
            "Loaded data file: {} teams, {} users, {} queued",
            data.teams.len(),
            data.users.len(),
            data.random_pool.len()
        );

        Ok(data)
    }

    /// ファイルにデータを保存する（同期処理）
    fn save_sync(path: &Path, data: &StoreData) -> Result<()> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).context("Failed to create data directory")?;
            }
        }

        let json = serde_json::to_string_pretty(data).context("Failed to serialize data")?;
        fs::write(path, json).context("Failed to write data file")?;

        debug!("Saved data file: {}", path.display());
        Ok(())
    }

    /// 読み取り専用でデータを参照
    async fn read<R>(&self, f: impl FnOnce(&StoreData) -> R) -> R {
        let data = self.data.read().await;
        f(&data)
    }

    /// データを変更し、ファイルへ書き出す
    ///
    /// 変更はコピーに適用し、保存に成功した場合のみメモリ上のデータを置き換える。
    /// 書き込みロックを保持したまま保存するため、保存順は変更順と一致する
    async fn mutate<R>(&self, f: impl FnOnce(&mut StoreData) -> R) -> Result<R> {
        let mut data = self.data.write().await;
        let mut next = data.clone();
        let result = f(&mut next);

        let next = match &self.path {
            Some(path) => {
                let path = path.clone();
                tokio::task::spawn_blocking(move || Self::save_sync(&path, &next).map(|()| next))
                    .await
                    .map_err(|e| anyhow::anyhow!("Failed to spawn blocking task: {}", e))??
            }
            None => next,
        };

        *data = next;
        Ok(result)
    }
}

impl Default for JsonDataStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

fn upsert_by<T: Clone>(items: &mut Vec<T>, item: &T, same: impl Fn(&T) -> bool) {
    match items.iter_mut().find(|existing| same(existing)) {
        Some(existing) => *existing = item.clone(),
        None => items.push(item.clone()),
    }
}

#[async_trait]
impl TeamRepository for JsonDataStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<Team>> {
        Ok(self
            .read(|d| d.teams.iter().find(|t| t.id == id).cloned())
            .await)
    }

    async fn list(&self, filter: &TeamFilter) -> Result<Vec<Team>> {
        let mut teams: Vec<Team> = self
            .read(|d| d.teams.iter().filter(|t| filter.matches(t)).cloned().collect())
            .await;
        teams.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(teams)
    }

    async fn find_by_member(&self, user_id: &str) -> Result<Option<Team>> {
        Ok(self
            .read(|d| d.teams.iter().find(|t| t.has_member(user_id)).cloned())
            .await)
    }

    async fn save(&self, team: &Team) -> Result<()> {
        self.mutate(|d| upsert_by(&mut d.teams, team, |t| t.id == team.id))
            .await
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        self.mutate(|d| {
            let before = d.teams.len();
            d.teams.retain(|t| t.id != id);
            d.teams.len() != before
        })
        .await
    }
}

#[async_trait]
impl UserRepository for JsonDataStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        Ok(self
            .read(|d| d.users.iter().find(|u| u.id == id).cloned())
            .await)
    }

    async fn find_by_registration_number(&self, reg_no: &str) -> Result<Option<User>> {
        let wanted = reg_no.trim().to_uppercase();
        Ok(self
            .read(|d| {
                d.users
                    .iter()
                    .find(|u| u.id.to_uppercase() == wanted)
                    .cloned()
            })
            .await)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let wanted = normalize_email(email);
        Ok(self
            .read(|d| d.users.iter().find(|u| u.email == wanted).cloned())
            .await)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self
            .read(|d| {
                d.users
                    .iter()
                    .find(|u| u.username.as_deref() == Some(username))
                    .cloned()
            })
            .await)
    }

    async fn find_many(&self, ids: &[String]) -> Result<Vec<User>> {
        Ok(self
            .read(|d| {
                d.users
                    .iter()
                    .filter(|u| ids.contains(&u.id))
                    .cloned()
                    .collect()
            })
            .await)
    }

    async fn list_all(&self) -> Result<Vec<User>> {
        Ok(self.read(|d| d.users.clone()).await)
    }

    async fn save(&self, user: &User) -> Result<()> {
        self.mutate(|d| upsert_by(&mut d.users, user, |u| u.id == user.id))
            .await
    }
}

#[async_trait]
impl RegistrationRepository for JsonDataStore {
    async fn find(&self, event: &str, user_id: &str) -> Result<Option<EventRegistration>> {
        Ok(self
            .read(|d| {
                d.registrations
                    .iter()
                    .find(|r| r.event_key == event && r.user_id == user_id)
                    .cloned()
            })
            .await)
    }

    async fn find_by_email(&self, event: &str, email: &str) -> Result<Option<EventRegistration>> {
        let wanted = normalize_email(email);
        Ok(self
            .read(|d| {
                d.registrations
                    .iter()
                    .find(|r| r.event_key == event && r.user_email == wanted)
                    .cloned()
            })
            .await)
    }

    async fn list_for_event(&self, event: &str) -> Result<Vec<EventRegistration>> {
        Ok(self
            .read(|d| {
                d.registrations
                    .iter()
                    .filter(|r| r.event_key == event)
                    .cloned()
                    .collect()
            })
            .await)
    }

    async fn save(&self, registration: &EventRegistration) -> Result<()> {
        self.mutate(|d| {
            upsert_by(&mut d.registrations, registration, |r| {
                r.same_key(registration)
            })
        })
        .await
    }
}

#[async_trait]
impl JoinRequestRepository for JsonDataStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<JoinRequest>> {
        Ok(self
            .read(|d| d.join_requests.iter().find(|r| r.id == id).cloned())
            .await)
    }

    async fn find_pending(&self, team_id: &str, user_id: &str) -> Result<Option<JoinRequest>> {
        Ok(self
            .read(|d| {
                d.join_requests
                    .iter()
                    .find(|r| r.team_id == team_id && r.user_id == user_id && r.is_pending())
                    .cloned()
            })
            .await)
    }

    async fn list_pending_for_teams(&self, team_ids: &[String]) -> Result<Vec<JoinRequest>> {
        let mut requests: Vec<JoinRequest> = self
            .read(|d| {
                d.join_requests
                    .iter()
                    .filter(|r| r.is_pending() && team_ids.contains(&r.team_id))
                    .cloned()
                    .collect()
            })
            .await;
        requests.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(requests)
    }

    async fn save(&self, request: &JoinRequest) -> Result<()> {
        self.mutate(|d| upsert_by(&mut d.join_requests, request, |r| r.id == request.id))
            .await
    }

    async fn delete_pending_for_user(&self, user_id: &str) -> Result<usize> {
        self.mutate(|d| {
            let before = d.join_requests.len();
            d.join_requests
                .retain(|r| !(r.user_id == user_id && r.is_pending()));
            before - d.join_requests.len()
        })
        .await
    }
}

#[async_trait]
impl PoolRepository for JsonDataStore {
    async fn list(&self, event: &str) -> Result<Vec<PoolEntry>> {
        let mut entries: Vec<PoolEntry> = self
            .read(|d| {
                d.random_pool
                    .iter()
                    .filter(|e| e.event == event)
                    .cloned()
                    .collect()
            })
            .await;
        entries.sort_by(|a, b| {
            a.queued_at
                .cmp(&b.queued_at)
                .then_with(|| a.user_id.cmp(&b.user_id))
        });
        Ok(entries)
    }

    async fn count(&self, event: &str) -> Result<usize> {
        Ok(self
            .read(|d| d.random_pool.iter().filter(|e| e.event == event).count())
            .await)
    }

    async fn upsert(&self, entry: &PoolEntry) -> Result<()> {
        self.mutate(|d| match d.random_pool.iter_mut().find(|e| e.same_key(entry)) {
            Some(existing) => {
                existing.user_name = entry.user_name.clone();
                existing.user_email = entry.user_email.clone();
                existing.event_date = entry.event_date;
            }
            None => d.random_pool.push(entry.clone()),
        })
        .await
    }

    async fn remove(&self, user_id: &str, event: &str) -> Result<bool> {
        self.mutate(|d| {
            let before = d.random_pool.len();
            d.random_pool
                .retain(|e| !(e.user_id == user_id && e.event == event));
            d.random_pool.len() != before
        })
        .await
    }

    async fn remove_user(&self, user_id: &str) -> Result<usize> {
        self.mutate(|d| {
            let before = d.random_pool.len();
            d.random_pool.retain(|e| e.user_id != user_id);
            before - d.random_pool.len()
        })
        .await
    }
}

#[async_trait]
impl AdminRepository for JsonDataStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<AdminUser>> {
        Ok(self
            .read(|d| d.admins.iter().find(|a| a.username == username).cloned())
            .await)
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.read(|d| d.admins.len()).await)
    }

    async fn save(&self, admin: &AdminUser) -> Result<()> {
        self.mutate(|d| upsert_by(&mut d.admins, admin, |a| a.id == admin.id))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::user::Member;
    use chrono::{Duration, NaiveDate, Utc};
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, 26).unwrap()
    }

    #[test]
    fn test_load_nonexistent_file() {
        let data = JsonDataStore::load_sync(Path::new("/nonexistent/path/data.json")).unwrap();
        assert_eq!(data, StoreData::default());
    }

    #[test]
    fn test_load_partial_document() {
        let mut file = NamedTempFile::new().unwrap();
        let json = r#"{
            "users": [{"id": "21BCE0001", "name": "Asha", "email": "asha@example.com"}],
            "registrations": [
                {"event_key": "escape-exe-ii", "user_id": "21BCE0001", "user_email": "asha@example.com", "event_date": "2025-09-26"}
            ]
        }"#;
        file.write_all(json.as_bytes()).unwrap();

        let data = JsonDataStore::load_sync(file.path()).unwrap();

        assert_eq!(data.users.len(), 1);
        assert_eq!(data.registrations[0].event_date, Some(date()));
        assert!(data.teams.is_empty());
    }

    #[tokio::test]
    async fn test_file_store_writes_through() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("data.json");

        let store = JsonDataStore::open(&path).await.unwrap();
        let team = Team::new("Cipher", Member::new("u1", "Asha", "a@x.com"), "e", Some(date()));
        TeamRepository::save(&store, &team).await.unwrap();

        let reopened = JsonDataStore::open(&path).await.unwrap();
        let loaded = TeamRepository::find_by_id(&reopened, &team.id).await.unwrap();
        assert_eq!(loaded, Some(team));
    }

    #[tokio::test]
    async fn test_failed_write_leaves_data_unchanged() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data.json");
        let store = JsonDataStore::open(&path).await.unwrap();
        let kept = Team::new("Kept", Member::new("u1", "Asha", "a@x.com"), "e", Some(date()));
        TeamRepository::save(&store, &kept).await.unwrap();

        // 保存先をディレクトリに置き換えて書き込みを失敗させる
        fs::remove_file(&path).unwrap();
        fs::create_dir_all(&path).unwrap();

        let lost = Team::new("Lost", Member::new("u2", "Ravi", "r@x.com"), "e", Some(date()));
        assert!(TeamRepository::save(&store, &lost).await.is_err());
        assert!(TeamRepository::delete(&store, &kept.id).await.is_err());

        let data = store.snapshot().await;
        assert_eq!(data.teams, vec![kept.clone()]);
        assert!(store.find_by_member("u2").await.unwrap().is_none());
        assert!(TeamRepository::find_by_id(&store, &kept.id)
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_team_queries() {
        let store = JsonDataStore::in_memory();
        let mut first = Team::new("A", Member::new("u1", "n", "e"), "e", Some(date()));
        first.created_at = Utc::now() - Duration::minutes(5);
        let second = Team::new("B", Member::new("u2", "n", "e"), "other", None);
        TeamRepository::save(&store, &second).await.unwrap();
        TeamRepository::save(&store, &first).await.unwrap();

        let all = TeamRepository::list(&store, &TeamFilter::default()).await.unwrap();
        assert_eq!(all[0].id, first.id);
        assert_eq!(all.len(), 2);

        let by_event = TeamRepository::list(&store, &TeamFilter::event("e")).await.unwrap();
        assert_eq!(by_event.len(), 1);

        let member_team = store.find_by_member("u2").await.unwrap().unwrap();
        assert_eq!(member_team.id, second.id);

        assert!(TeamRepository::delete(&store, &second.id).await.unwrap());
        assert!(!TeamRepository::delete(&store, &second.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_user_lookups() {
        let store = JsonDataStore::in_memory();
        let mut user = User::new("21BCE0001", "Asha", "Asha@Example.com");
        user.username = Some("asha".to_string());
        UserRepository::save(&store, &user).await.unwrap();

        assert!(store.find_by_registration_number("21bce0001").await.unwrap().is_some());
        assert!(UserRepository::find_by_email(&store, "ASHA@example.com")
            .await
            .unwrap()
            .is_some());
        assert!(UserRepository::find_by_username(&store, "asha")
            .await
            .unwrap()
            .is_some());
        assert!(UserRepository::find_by_username(&store, "other")
            .await
            .unwrap()
            .is_none());

        let many = store
            .find_many(&["21BCE0001".to_string(), "missing".to_string()])
            .await
            .unwrap();
        assert_eq!(many.len(), 1);
    }

    #[tokio::test]
    async fn test_pool_upsert_keeps_queue_position() {
        let store = JsonDataStore::in_memory();
        let user = User::new("u1", "Asha", "a@x.com");
        let first = PoolEntry::for_user(&user, "e", date());
        store.upsert(&first).await.unwrap();

        let mut again = PoolEntry::for_user(&user, "e", date().succ_opt().unwrap());
        again.queued_at = first.queued_at + Duration::hours(1);
        store.upsert(&again).await.unwrap();

        let entries = PoolRepository::list(&store, "e").await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].queued_at, first.queued_at);
        assert_eq!(entries[0].event_date, again.event_date);

        assert_eq!(PoolRepository::count(&store, "e").await.unwrap(), 1);
        assert!(store.remove("u1", "e").await.unwrap());
        assert_eq!(store.remove_user("u1").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_join_request_cleanup_only_touches_pending() {
        let store = JsonDataStore::in_memory();
        let pending = JoinRequest::pending("t1", "u1", "Asha", "a@x.com");
        let mut accepted = JoinRequest::pending("t2", "u1", "Asha", "a@x.com");
        accepted.status = crate::domain::entities::join_request::JoinRequestStatus::Accepted;
        JoinRequestRepository::save(&store, &pending).await.unwrap();
        JoinRequestRepository::save(&store, &accepted).await.unwrap();

        assert!(store.find_pending("t1", "u1").await.unwrap().is_some());
        assert_eq!(store.delete_pending_for_user("u1").await.unwrap(), 1);
        assert!(JoinRequestRepository::find_by_id(&store, &accepted.id)
            .await
            .unwrap()
            .is_some());
    }
}
