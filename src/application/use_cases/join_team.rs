//! # Join Team Use Case
//!
//! 既存チームへの参加

use std::sync::Arc;

use anyhow::Result;
use log::info;

use super::placement::release_claims;
use crate::application::dto::commands::JoinTeamCommand;
use crate::application::dto::team_policy::TeamPolicy;
use crate::domain::entities::team::Team;
use crate::domain::entities::user::{normalize_email, Member};
use crate::domain::error::{require_fields, TeamError};
use crate::domain::repositories::join_request_repository::JoinRequestRepository;
use crate::domain::repositories::pool_repository::PoolRepository;
use crate::domain::repositories::registration_repository::RegistrationRepository;
use crate::domain::repositories::team_repository::TeamRepository;
use crate::domain::services::membership::MembershipService;

/// チーム参加ユースケース
pub struct JoinTeamUseCase<T, R, P, J>
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

impl<T, R, P, J> JoinTeamUseCase<T, R, P, J>
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

    /// チームに参加
    ///
    /// 検証順序: 登録 → 未所属 → チーム存在 → イベント → 開催日 → 定員
    ///
    /// # Returns
    ///
    /// 参加後のチーム
    ///
    /// # Errors
    ///
    /// いずれかの検証に失敗した場合に `TeamError` を返す
    pub async fn execute(&self, command: &JoinTeamCommand) -> Result<Team> {
        require_fields(
            &[&command.user_id, &command.user_name, &command.team_id],
            "Missing required fields.",
        )?;
        let event = self.policy.event_or_default(command.event.as_deref());

        let registration = self
            .registration_repository
            .find(&event, &command.user_id)
            .await?;
        let user_date =
            MembershipService::ensure_registered(registration.as_ref(), &command.user_id)?;

        let current = self
            .team_repository
            .find_by_member(&command.user_id)
            .await?;
        MembershipService::ensure_unassigned(current.as_ref())?;

        let mut team = self
            .team_repository
            .find_by_id(&command.team_id)
            .await?
            .ok_or(TeamError::TeamNotFound)?;
        MembershipService::ensure_can_join(
            &team,
            &event,
            user_date,
            self.policy.max_team_members,
        )?;

        let email = if command.user_email.trim().is_empty() {
            registration.map(|r| r.user_email).unwrap_or_default()
        } else {
            normalize_email(&command.user_email)
        };
        team.add_member(
            Member::new(&command.user_id, command.user_name.trim(), email),
            self.policy.max_team_members,
        )?;

        self.team_repository.save(&team).await?;
        release_claims(
            self.pool_repository.as_ref(),
            self.join_request_repository.as_ref(),
            &command.user_id,
        )
        .await?;

        info!(
            "{} joined team {} ({}/{})",
            command.user_id,
            team.id,
            team.len(),
            self.policy.max_team_members
        );
        Ok(team)
    }
}
