//! # Assign From Pool Use Case
//!
//! プールの参加者を指定チームへ個別に割り当てる（管理者操作）

use std::sync::Arc;

use anyhow::Result;
use log::info;
use serde::Serialize;

use super::placement::release_claims;
use crate::application::dto::commands::AssignFromPoolCommand;
use crate::application::dto::team_policy::TeamPolicy;
use crate::domain::entities::team::Team;
use crate::domain::entities::user::Member;
use crate::domain::error::{require_fields, TeamError};
use crate::domain::repositories::join_request_repository::JoinRequestRepository;
use crate::domain::repositories::pool_repository::PoolRepository;
use crate::domain::repositories::registration_repository::RegistrationRepository;
use crate::domain::repositories::team_repository::TeamRepository;
use crate::domain::repositories::user_repository::UserRepository;
use crate::domain::services::membership::MembershipService;

/// 割り当て結果
#[derive(Debug, Clone, Serialize)]
pub struct PoolAssignment {
    pub team: Team,
    pub user: Member,
}

pub struct AssignFromPoolUseCase<T, U, R, P, J>
where
    T: TeamRepository,
    U: UserRepository,
    R: RegistrationRepository,
    P: PoolRepository,
    J: JoinRequestRepository,
{
    team_repository: Arc<T>,
    user_repository: Arc<U>,
    registration_repository: Arc<R>,
    pool_repository: Arc<P>,
    join_request_repository: Arc<J>,
    policy: TeamPolicy,
}

impl<T, U, R, P, J> AssignFromPoolUseCase<T, U, R, P, J>
where
    T: TeamRepository,
    U: UserRepository,
    R: RegistrationRepository,
    P: PoolRepository,
    J: JoinRequestRepository,
{
    pub fn new(
        team_repository: Arc<T>,
        user_repository: Arc<U>,
        registration_repository: Arc<R>,
        pool_repository: Arc<P>,
        join_request_repository: Arc<J>,
        policy: TeamPolicy,
    ) -> Self {
        Self {
            team_repository,
            user_repository,
            registration_repository,
            pool_repository,
            join_request_repository,
            policy,
        }
    }

    /// 参加者をチームへ割り当てる
    ///
    /// 検証順序: チーム存在 → イベント → 開催日の登録 → 日付一致 → 未所属 → 定員 → プロフィール
    ///
    /// # Errors
    ///
    /// いずれかの検証に失敗した場合に `TeamError` を返す
    pub async fn execute(&self, command: &AssignFromPoolCommand) -> Result<PoolAssignment> {
        require_fields(
            &[&command.user_id, &command.team_id],
            "Missing userId or teamId.",
        )?;
        let event = self.policy.event_or_default(command.event.as_deref());

        let mut team = self
            .team_repository
            .find_by_id(&command.team_id)
            .await?
            .ok_or(TeamError::TeamNotFound)?;
        if team.event != event {
            return Err(TeamError::DifferentEvent.into());
        }

        let registration = self
            .registration_repository
            .find(&event, &command.user_id)
            .await?;
        let user_date = MembershipService::ensure_event_date(registration.as_ref())?;
        if !team.accepts_date(user_date) {
            return Err(TeamError::DateMismatch.into());
        }

        let current = self
            .team_repository
            .find_by_member(&command.user_id)
            .await?;
        MembershipService::ensure_unassigned(current.as_ref())?;

        if team.is_full(self.policy.max_team_members) {
            return Err(TeamError::TeamFull.into());
        }

        let user = self
            .user_repository
            .find_by_id(&command.user_id)
            .await?
            .ok_or(TeamError::UserNotFound)?;
        let member = user.to_member();
        team.add_member(member.clone(), self.policy.max_team_members)?;

        self.team_repository.save(&team).await?;
        release_claims(
            self.pool_repository.as_ref(),
            self.join_request_repository.as_ref(),
            &user.id,
        )
        .await?;

        info!("Assigned {} from pool to team '{}'", user.id, team.name);
        Ok(PoolAssignment { team, user: member })
    }
}
