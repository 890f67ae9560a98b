//! # Create Team Use Case
//!
//! チーム作成ユースケース

use std::sync::Arc;

use anyhow::Result;
use log::info;

use super::placement::release_claims;
use crate::application::dto::commands::CreateTeamCommand;
use crate::application::dto::team_policy::TeamPolicy;
use crate::domain::entities::team::Team;
use crate::domain::entities::user::Member;
use crate::domain::error::{require_fields, TeamError};
use crate::domain::repositories::join_request_repository::JoinRequestRepository;
use crate::domain::repositories::pool_repository::PoolRepository;
use crate::domain::repositories::registration_repository::RegistrationRepository;
use crate::domain::repositories::team_repository::{TeamFilter, TeamRepository};
use crate::domain::services::membership::MembershipService;
use crate::domain::services::slot_schedule::parse_slot_time;

/// チーム作成ユースケース
///
/// 登録済みで未所属の参加者がリーダーとなる新しいチームを作る
pub struct CreateTeamUseCase<T, R, P, J>
where
    T: TeamRepository,
    R: RegistrationRepository,
    P: PoolRepository,
    J: JoinRequestRepository,
{
    team_repository: Arc<T>,
    registration_repository: Arc<R>,
    pool_repository: Arc<P>,
    join_request_repository: Arc<J>,
    policy: TeamPolicy,
}

impl<T, R, P, J> CreateTeamUseCase<T, R, P, J>
where
    T: TeamRepository,
    R: RegistrationRepository,
    P: PoolRepository,
    J: JoinRequestRepository,
{
    pub fn new(
        team_repository: Arc<T>,
        registration_repository: Arc<R>,
        pool_repository: Arc<P>,
        join_request_repository: Arc<J>,
        policy: TeamPolicy,
    ) -> Self {
        Self {
            team_repository,
            registration_repository,
            pool_repository,
            join_request_repository,
            policy,
        }
    }

    /// チームを作成
    ///
    /// # Returns
    ///
    /// 作成されたチーム
    ///
    /// # Errors
    ///
    /// 必須項目不足、未登録、所属済み、スロット不正・満杯の場合に `TeamError` を返す
    pub async fn execute(&self, command: &CreateTeamCommand) -> Result<Team> {
        require_fields(
            &[&command.user_id, &command.user_name, &command.team_name],
            "Missing required fields.",
        )?;
        let event = self.policy.event_or_default(command.event.as_deref());

        let registration = self
            .registration_repository
            .find(&event, &command.user_id)
            .await?;
        let event_date =
            MembershipService::ensure_registered(registration.as_ref(), &command.user_id)?;

        let current = self
            .team_repository
            .find_by_member(&command.user_id)
            .await?;
        MembershipService::ensure_unassigned(current.as_ref())?;

        let slot_time = match command
            .slot_time
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            Some(raw) => {
                let slot =
                    parse_slot_time(raw).ok_or_else(|| TeamError::InvalidSlot(raw.to_string()))?;
                let mut same_day = self.team_repository.list(&TeamFilter::event(&event)).await?;
                same_day.retain(|t| t.event_date == event_date);
                self.policy.schedule.ensure_bookable(slot, &same_day)?;
                Some(slot)
            }
            None => None,
        };

        let email = match registration {
            Some(r) if command.user_email.trim().is_empty() => r.user_email,
            _ => command.user_email.trim().to_lowercase(),
        };
        let leader = Member::new(&command.user_id, command.user_name.trim(), email);
        let team = Team::new(command.team_name.trim(), leader, &event, event_date)
            .with_slot(slot_time);

        self.team_repository.save(&team).await?;
        release_claims(
            self.pool_repository.as_ref(),
            self.join_request_repository.as_ref(),
            &command.user_id,
        )
        .await?;

        info!(
            "Team '{}' ({}) created by {} for {}",
            team.name, team.id, command.user_id, event
        );
        Ok(team)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::repositories::json_data_store::JsonDataStore;
    use crate::application::use_cases::test_support::*;
    use crate::domain::entities::pool_entry::PoolEntry;
    use crate::domain::repositories::registration_repository::MockRegistrationRepository;
    use chrono::NaiveTime;

    type UseCase = CreateTeamUseCase<JsonDataStore, JsonDataStore, JsonDataStore, JsonDataStore>;

    fn use_case(store: &Arc<JsonDataStore>) -> UseCase {
        CreateTeamUseCase::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            TeamPolicy::default(),
        )
    }

    fn command(user_id: &str, slot: Option<&str>) -> CreateTeamCommand {
        CreateTeamCommand {
            user_id: user_id.to_string(),
            user_name: format!("name-{}", user_id),
            user_email: format!("{}@example.com", user_id),
            team_name: "Cipher Syndicate".to_string(),
            event: None,
            slot_time: slot.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_create_team_success() {
        let store = store_with(&[("u1", 26)]);
        store
            .upsert(&PoolEntry::for_user(&user("u1"), EVENT, date(26)))
            .await
            .unwrap();

        let team = use_case(&store)
            .execute(&command("u1", Some("11:30")))
            .await
            .unwrap();

        assert_eq!(team.leader_id, "u1");
        assert_eq!(team.event, EVENT);
        assert_eq!(team.event_date, Some(date(26)));
        assert_eq!(team.slot_time, NaiveTime::from_hms_opt(11, 30, 0));
        assert_eq!(PoolRepository::count(store.as_ref(), EVENT).await.unwrap(), 0);
        assert!(TeamRepository::find_by_id(store.as_ref(), &team.id)
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_create_team_requires_fields() {
        let store = store_with(&[("u1", 26)]);
        let mut cmd = command("u1", None);
        cmd.team_name = " ".to_string();

        let err = use_case(&store).execute(&cmd).await.unwrap_err();
        assert_eq!(team_error(err), TeamError::missing("Missing required fields."));
    }

    #[tokio::test]
    async fn test_create_team_unregistered() {
        let store = store_with(&[]);

        let err = use_case(&store).execute(&command("u9", None)).await.unwrap_err();
        assert_eq!(team_error(err), TeamError::NotRegistered("u9".to_string()));
    }

    #[tokio::test]
    async fn test_create_team_already_in_team() {
        let store = store_with(&[("u1", 26), ("u2", 26)]);
        TeamRepository::save(store.as_ref(), &team(&["u2", "u1"], 26))
            .await
            .unwrap();

        let err = use_case(&store).execute(&command("u1", None)).await.unwrap_err();
        assert_eq!(team_error(err), TeamError::AlreadyInTeam);
    }

    #[tokio::test]
    async fn test_create_team_slot_full() {
        let store = store_with(&[("u1", 26), ("a", 26), ("b", 26)]);
        let eleven = NaiveTime::from_hms_opt(11, 0, 0);
        TeamRepository::save(store.as_ref(), &team(&["a"], 26).with_slot(eleven))
            .await
            .unwrap();
        TeamRepository::save(store.as_ref(), &team(&["b"], 26).with_slot(eleven))
            .await
            .unwrap();

        let err = use_case(&store)
            .execute(&command("u1", Some("11:00")))
            .await
            .unwrap_err();
        assert_eq!(team_error(err), TeamError::SlotFull("11:00".to_string()));
    }

    #[tokio::test]
    async fn test_create_team_slot_on_other_day_is_free() {
        let store = store_with(&[("u1", 26), ("a", 27), ("b", 27)]);
        let eleven = NaiveTime::from_hms_opt(11, 0, 0);
        TeamRepository::save(store.as_ref(), &team(&["a"], 27).with_slot(eleven))
            .await
            .unwrap();
        TeamRepository::save(store.as_ref(), &team(&["b"], 27).with_slot(eleven))
            .await
            .unwrap();

        let created = use_case(&store).execute(&command("u1", Some("11:00"))).await;
        assert!(created.is_ok());
    }

    #[tokio::test]
    async fn test_create_team_invalid_slot() {
        let store = store_with(&[("u1", 26)]);

        let err = use_case(&store)
            .execute(&command("u1", Some("noon")))
            .await
            .unwrap_err();
        assert_eq!(team_error(err), TeamError::InvalidSlot("noon".to_string()));
    }

    #[tokio::test]
    async fn test_create_team_propagates_store_failure() {
        let store = store_with(&[]);
        let mut registrations = MockRegistrationRepository::new();
        registrations
            .expect_find()
            .returning(|_, _| Err(anyhow::anyhow!("connection refused")));

        let use_case = CreateTeamUseCase::new(
            store.clone(),
            Arc::new(registrations),
            store.clone(),
            store.clone(),
            TeamPolicy::default(),
        );

        let err = use_case.execute(&command("u1", None)).await.unwrap_err();
        assert!(err.downcast_ref::<TeamError>().is_none());
        assert!(err.to_string().contains("connection refused"));
    }
}
