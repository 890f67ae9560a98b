//! # Join Random Use Case
//!
//! ランダムプールへの登録。実際の配置は管理者のチーム生成で行う

use std::sync::Arc;

use anyhow::Result;
use log::info;
use serde::Serialize;

use crate::application::dto::commands::JoinRandomCommand;
use crate::application::dto::team_policy::TeamPolicy;
use crate::domain::entities::pool_entry::PoolEntry;
use crate::domain::entities::user::User;
use crate::domain::error::require_fields;
use crate::domain::repositories::pool_repository::PoolRepository;
use crate::domain::repositories::registration_repository::RegistrationRepository;
use crate::domain::repositories::team_repository::TeamRepository;
use crate::domain::services::membership::MembershipService;

/// プール登録結果
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRandomOutcome {
    pub entry: PoolEntry,
    /// 同じ開催日の待ち行列における順番（1始まり）
    pub queue_position: usize,
}

/// ランダム参加ユースケース
pub struct JoinRandomUseCase<T, R, P>
where
    T: TeamRepository,
    R: RegistrationRepository,
    P: PoolRepository,
{
    team_repository: Arc<T>,
    registration_repository: Arc<R>,
    pool_repository: Arc<P>,
    policy: TeamPolicy,
}

impl<T, R, P> JoinRandomUseCase<T, R, P>
where
    T: TeamRepository,
    R: RegistrationRepository,
    P: PoolRepository,
{
    pub fn new(
        team_repository: Arc<T>,
        registration_repository: Arc<R>,
        pool_repository: Arc<P>,
        policy: TeamPolicy,
    ) -> Self {
        Self {
            team_repository,
            registration_repository,
            pool_repository,
            policy,
        }
    }

    /// プールに登録（既に登録済みなら順番を保ったまま情報を更新）
    ///
    /// # Errors
    ///
    /// 開催日つきの登録がない場合は `NoEventDate`、所属済みの場合は `AlreadyInTeam`
    pub async fn execute(&self, command: &JoinRandomCommand) -> Result<JoinRandomOutcome> {
        require_fields(
            &[&command.user_id, &command.user_name],
            "Missing required fields.",
        )?;
        let event = self.policy.event_or_default(command.event.as_deref());

        let registration = self
            .registration_repository
            .find(&event, &command.user_id)
            .await?;
        let event_date = MembershipService::ensure_event_date(registration.as_ref())?;

        let current = self
            .team_repository
            .find_by_member(&command.user_id)
            .await?;
        MembershipService::ensure_unassigned(current.as_ref())?;

        let email = match registration {
            Some(r) if command.user_email.trim().is_empty() => r.user_email,
            _ => command.user_email.clone(),
        };
        let user = User::new(&command.user_id, command.user_name.trim(), email);
        let entry = PoolEntry::for_user(&user, &event, event_date);
        self.pool_repository.upsert(&entry).await?;

        let queue = self.pool_repository.list(&event).await?;
        let same_day: Vec<PoolEntry> = queue
            .into_iter()
            .filter(|e| e.event_date == event_date)
            .collect();
        let (queue_position, entry) = match same_day
            .iter()
            .position(|e| e.user_id == entry.user_id)
        {
            Some(i) => (i + 1, same_day[i].clone()),
            None => (same_day.len() + 1, entry),
        };

        info!(
            "{} queued in random pool for {} on {} (position {})",
            command.user_id, event, event_date, queue_position
        );
        Ok(JoinRandomOutcome {
            entry,
            queue_position,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::repositories::json_data_store::JsonDataStore;
    use crate::application::use_cases::test_support::*;
    use crate::domain::entities::registration::EventRegistration;
    use crate::domain::error::TeamError;

    fn use_case(
        store: &Arc<JsonDataStore>,
    ) -> JoinRandomUseCase<JsonDataStore, JsonDataStore, JsonDataStore> {
        JoinRandomUseCase::new(
            store.clone(),
            store.clone(),
            store.clone(),
            TeamPolicy::default(),
        )
    }

    fn command(user_id: &str) -> JoinRandomCommand {
        JoinRandomCommand {
            user_id: user_id.to_string(),
            user_name: format!("name-{}", user_id),
            user_email: format!("{}@example.com", user_id),
            event: None,
        }
    }

    #[tokio::test]
    async fn test_enqueue_reports_position_per_date() {
        let store = store_with(&[("u1", 26), ("u2", 27), ("u3", 26)]);
        let use_case = use_case(&store);

        assert_eq!(use_case.execute(&command("u1")).await.unwrap().queue_position, 1);
        assert_eq!(use_case.execute(&command("u2")).await.unwrap().queue_position, 1);
        let third = use_case.execute(&command("u3")).await.unwrap();

        assert_eq!(third.queue_position, 2);
        assert_eq!(third.entry.event_date, date(26));
        assert_eq!(PoolRepository::count(store.as_ref(), EVENT).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_enqueue_is_idempotent() {
        let store = store_with(&[("u1", 26)]);
        let use_case = use_case(&store);

        let first = use_case.execute(&command("u1")).await.unwrap();
        let second = use_case.execute(&command("u1")).await.unwrap();

        assert_eq!(second.queue_position, 1);
        assert_eq!(second.entry.queued_at, first.entry.queued_at);
        assert_eq!(PoolRepository::count(store.as_ref(), EVENT).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_requires_dated_registration() {
        let store = store_with(&[]);
        RegistrationRepository::save(
            store.as_ref(),
            &EventRegistration::new(EVENT, "u1", "u1@example.com", None),
        )
        .await
        .unwrap();

        let err = use_case(&store).execute(&command("u1")).await.unwrap_err();
        assert_eq!(team_error(err), TeamError::NoEventDate);
    }

    #[tokio::test]
    async fn test_rejects_member_of_team() {
        let store = store_with(&[("u1", 26)]);
        TeamRepository::save(store.as_ref(), &team(&["u1"], 26))
            .await
            .unwrap();

        let err = use_case(&store).execute(&command("u1")).await.unwrap_err();
        assert_eq!(team_error(err), TeamError::AlreadyInTeam);
    }
}
