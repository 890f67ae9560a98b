//! # Import Registrations Use Case
//!
//! 参加登録（学籍番号・メールアドレス・開催日）の一括取り込み
//!
//! 登録は参加資格の根拠になる。名前つきのレコードは参加者プロフィールも作成する
//! （既存のプロフィールは上書きしない）

use std::sync::Arc;

use anyhow::Result;
use chrono::NaiveDate;
use log::{info, warn};
use serde::Deserialize;

use crate::application::dto::team_policy::TeamPolicy;
use crate::domain::entities::registration::EventRegistration;
use crate::domain::entities::user::User;
use crate::domain::repositories::registration_repository::RegistrationRepository;
use crate::domain::repositories::user_repository::UserRepository;

/// 取り込みファイルの1レコード
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRecord {
    pub user_id: String,
    pub user_email: String,
    #[serde(default)]
    pub event_date: Option<NaiveDate>,
    #[serde(default)]
    pub event: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// 取り込み結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub registrations: usize,
    pub users_created: usize,
    pub skipped: usize,
}

pub struct ImportRegistrationsUseCase<R, U>
where
    R: RegistrationRepository,
    U: UserRepository,
{
    registration_repository: Arc<R>,
    user_repository: Arc<U>,
    policy: TeamPolicy,
}

impl<R, U> ImportRegistrationsUseCase<R, U>
where
    R: RegistrationRepository,
    U: UserRepository,
{
    pub fn new(registration_repository: Arc<R>, user_repository: Arc<U>, policy: TeamPolicy) -> Self {
        Self {
            registration_repository,
            user_repository,
            policy,
        }
    }

    /// レコードを取り込む
    ///
    /// 学籍番号またはメールアドレスが空のレコードは読み飛ばす
    pub async fn execute(&self, records: &[RegistrationRecord]) -> Result<ImportSummary> {
        let mut summary = ImportSummary::default();

        for record in records {
            let user_id = record.user_id.trim();
            if user_id.is_empty() || record.user_email.trim().is_empty() {
                warn!("Skipping registration without id or email: {:?}", record);
                summary.skipped += 1;
                continue;
            }

            let event = self.policy.event_or_default(record.event.as_deref());
            let registration =
                EventRegistration::new(event, user_id, &record.user_email, record.event_date);
            self.registration_repository.save(&registration).await?;
            summary.registrations += 1;

            if let Some(name) = record.name.as_deref().filter(|n| !n.trim().is_empty()) {
                if self.user_repository.find_by_id(user_id).await?.is_none() {
                    self.user_repository
                        .save(&User::new(user_id, name.trim(), &record.user_email))
                        .await?;
                    summary.users_created += 1;
                }
            }
        }

        info!(
            "Imported {} registrations ({} new profiles, {} skipped)",
            summary.registrations, summary.users_created, summary.skipped
        );
        Ok(summary)
    }
}
