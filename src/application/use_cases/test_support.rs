//! テスト用の共通ヘルパー

use std::sync::Arc;

use chrono::NaiveDate;

use crate::adapter::repositories::json_data_store::{JsonDataStore, StoreData};
use crate::domain::entities::registration::EventRegistration;
use crate::domain::entities::team::Team;
use crate::domain::entities::user::{Member, User};
use crate::domain::error::TeamError;

pub(crate) const EVENT: &str = "escape-exe-ii";

pub(crate) fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 9, day).unwrap()
}

pub(crate) fn user(id: &str) -> User {
    User::new(id, format!("name-{}", id), format!("{}@example.com", id))
}

pub(crate) fn member(id: &str) -> Member {
    user(id).to_member()
}

/// 指定ユーザーを登録済み（開催日つき）にしたストア
pub(crate) fn store_with(registered: &[(&str, u32)]) -> Arc<JsonDataStore> {
    let mut data = StoreData::default();
    for (id, day) in registered {
        let u = user(id);
        data.registrations.push(EventRegistration::new(
            EVENT,
            u.id.clone(),
            u.email.clone(),
            Some(date(*day)),
        ));
        data.users.push(u);
    }
    Arc::new(JsonDataStore::from_data(data))
}

/// 指定メンバーのチーム（先頭がリーダー）
pub(crate) fn team(ids: &[&str], day: u32) -> Team {
    Team::with_members(
        format!("team-{}", ids.join("-")),
        ids.iter().map(|id| member(id)).collect(),
        EVENT,
        Some(date(day)),
    )
    .unwrap()
}

pub(crate) fn team_error(err: anyhow::Error) -> TeamError {
    err.downcast::<TeamError>()
        .expect("expected a TeamError")
}
