//! # Participant Use Case
//!
//! 参加者の登録確認・プロフィール登録・ログイン

use std::sync::Arc;

use anyhow::Result;
use chrono::NaiveDate;
use log::{debug, info};
use serde::Serialize;

use crate::application::dto::commands::{OnboardingCommand, ParticipantLoginCommand};
use crate::application::dto::team_policy::TeamPolicy;
use crate::domain::entities::pool_entry::PoolEntry;
use crate::domain::entities::user::{normalize_email, User};
use crate::domain::error::{require_fields, TeamError};
use crate::domain::repositories::pool_repository::PoolRepository;
use crate::domain::repositories::registration_repository::RegistrationRepository;
use crate::domain::repositories::team_repository::TeamRepository;
use crate::domain::repositories::user_repository::UserRepository;

/// プロフィール登録結果
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingOutcome {
    /// パスワードを除いたユーザー
    pub user: User,
    /// ランダムプールに自動登録されたか
    pub queued: bool,
}

/// 参加者ユースケース
pub struct ParticipantUseCase<U, R, T, P>
where
    U: UserRepository,
    R: RegistrationRepository,
    T: TeamRepository,
    P: PoolRepository,
{
    user_repository: Arc<U>,
    registration_repository: Arc<R>,
    team_repository: Arc<T>,
    pool_repository: Arc<P>,
    policy: TeamPolicy,
}

impl<U, R, T, P> ParticipantUseCase<U, R, T, P>
where
    U: UserRepository,
    R: RegistrationRepository,
    T: TeamRepository,
    P: PoolRepository,
{
    pub fn new(
        user_repository: Arc<U>,
        registration_repository: Arc<R>,
        team_repository: Arc<T>,
        pool_repository: Arc<P>,
        policy: TeamPolicy,
    ) -> Self {
        Self {
            user_repository,
            registration_repository,
            team_repository,
            pool_repository,
            policy,
        }
    }

    /// メールアドレスで登録を引き、開催日を返す
    ///
    /// # Errors
    ///
    /// 登録がない場合は `RegistrationNotFound`
    pub async fn registration_date(
        &self,
        user_email: &str,
        event: Option<&str>,
    ) -> Result<Option<NaiveDate>> {
        require_fields(&[user_email], "Missing userEmail.")?;
        let event = self.policy.event_or_default(event);

        let registration = self
            .registration_repository
            .find_by_email(&event, user_email)
            .await?
            .ok_or(TeamError::RegistrationNotFound)?;
        Ok(registration.event_date)
    }

    /// プロフィールを登録
    ///
    /// メールアドレスをキーにユーザーを作成または更新する。未所属で開催日つきの
    /// 登録があればランダムプールにも登録する
    ///
    /// # Errors
    ///
    /// 必須項目不足は `MissingFields`、ユーザー名が他の参加者に使われている場合は `UsernameTaken`
    pub async fn onboard(&self, command: &OnboardingCommand) -> Result<OnboardingOutcome> {
        require_fields(
            &[
                &command.email,
                &command.name,
                &command.username,
                &command.password,
            ],
            "Missing required fields.",
        )?;
        let event = self.policy.event_or_default(command.event.as_deref());
        let email = normalize_email(&command.email);

        let existing = self.user_repository.find_by_email(&email).await?;
        if let Some(owner) = self
            .user_repository
            .find_by_username(&command.username)
            .await?
        {
            if owner.email != email {
                return Err(TeamError::UsernameTaken.into());
            }
        }

        let registration = self
            .registration_repository
            .find_by_email(&event, &email)
            .await?;

        let id = match (&existing, &registration) {
            (Some(user), _) => user.id.clone(),
            (None, Some(reg)) => reg.user_id.clone(),
            (None, None) => uuid::Uuid::new_v4().to_string(),
        };
        let mut user = User::new(id, command.name.trim(), &email);
        user.username = Some(command.username.clone());
        user.password = Some(command.password.clone());
        self.user_repository.save(&user).await?;

        let mut queued = false;
        if self.team_repository.find_by_member(&user.id).await?.is_none() {
            if let Some(date) = registration.and_then(|r| r.event_date) {
                self.pool_repository
                    .upsert(&PoolEntry::for_user(&user, &event, date))
                    .await?;
                queued = true;
                debug!("{} auto-queued for {} on {}", user.id, event, date);
            }
        }

        info!(
            "Profile completed for {} ({})",
            user.id,
            if existing.is_some() { "updated" } else { "created" }
        );
        Ok(OnboardingOutcome {
            user: user.without_password(),
            queued,
        })
    }

    /// 学籍番号とパスワードでログイン
    ///
    /// # Returns
    ///
    /// パスワードを除いたユーザー
    ///
    /// # Errors
    ///
    /// 学籍番号が見つからない場合は `UnknownRegistrationNumber`、
    /// パスワード不一致は `InvalidPassword`
    pub async fn login(&self, command: &ParticipantLoginCommand) -> Result<User> {
        require_fields(
            &[&command.reg_no, &command.password],
            "Missing registration number or password.",
        )?;

        let user = self
            .user_repository
            .find_by_registration_number(&command.reg_no)
            .await?
            .ok_or(TeamError::UnknownRegistrationNumber)?;

        if user.password.as_deref() != Some(command.password.as_str()) {
            return Err(TeamError::InvalidPassword.into());
        }

        info!("Participant {} logged in", user.id);
        Ok(user.without_password())
    }
}
