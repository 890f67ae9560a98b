//! # Join Requests Use Case
//!
//! チームへの参加リクエストの作成・一覧・承認/却下
//!
//! 承認時には申請作成後に変化した状態（他チームへの所属、定員到達、登録日）を再検証し、
//! 条件を満たさなくなったリクエストは却下扱いにする

use std::sync::Arc;

use anyhow::Result;
use log::{info, warn};

use super::placement::release_claims;
use crate::application::dto::commands::{CreateJoinRequestCommand, RespondJoinRequestCommand};
use crate::application::dto::team_policy::TeamPolicy;
use crate::domain::entities::join_request::{JoinRequest, JoinRequestStatus};
use crate::domain::entities::registration::EventRegistration;
use crate::domain::entities::team::Team;
use crate::domain::entities::user::normalize_email;
use crate::domain::error::{require_fields, TeamError};
use crate::domain::repositories::join_request_repository::JoinRequestRepository;
use crate::domain::repositories::pool_repository::PoolRepository;
use crate::domain::repositories::registration_repository::RegistrationRepository;
use crate::domain::repositories::team_repository::{TeamFilter, TeamRepository};
use crate::domain::services::membership::MembershipService;

/// リクエストへの応答
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestAction {
    Accept,
    Reject,
}

impl RequestAction {
    /// "accept" / "reject" を解釈（大文字小文字は区別しない）
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "accept" => Some(Self::Accept),
            "reject" => Some(Self::Reject),
            _ => None,
        }
    }
}

/// 参加リクエストユースケース
pub struct JoinRequestsUseCase<T, R, J, P>
where
    T: TeamRepository,
    R: RegistrationRepository,
    J: JoinRequestRepository,
    P: PoolRepository,
{
    team_repository: Arc<T>,
    registration_repository: Arc<R>,
    join_request_repository: Arc<J>,
    pool_repository: Arc<P>,
    policy: TeamPolicy,
}

impl<T, R, J, P> JoinRequestsUseCase<T, R, J, P>
where
    T: TeamRepository,
    R: RegistrationRepository,
    J: JoinRequestRepository,
    P: PoolRepository,
{
    pub fn new(
        team_repository: Arc<T>,
        registration_repository: Arc<R>,
        join_request_repository: Arc<J>,
        pool_repository: Arc<P>,
        policy: TeamPolicy,
    ) -> Self {
        Self {
            team_repository,
            registration_repository,
            join_request_repository,
            pool_repository,
            policy,
        }
    }

    /// 参加リクエストを作成
    ///
    /// # Errors
    ///
    /// 所属済みは `AlreadyInTeam`、チームがない場合は `TeamNotFound`、
    /// 未登録は `NotRegistered`、開催日が異なる場合は `DateMismatch`、
    /// 同じチームへの保留中リクエストがある場合は `RequestAlreadyPending`
    pub async fn create(&self, command: &CreateJoinRequestCommand) -> Result<JoinRequest> {
        require_fields(
            &[&command.team_id, &command.user_id, &command.user_name],
            "Missing required fields.",
        )?;

        if self
            .team_repository
            .find_by_member(&command.user_id)
            .await?
            .is_some()
        {
            return Err(TeamError::AlreadyInTeam.into());
        }

        let team = self
            .team_repository
            .find_by_id(&command.team_id)
            .await?
            .ok_or(TeamError::TeamNotFound)?;

        let registration = self
            .registration_repository
            .find(&team.event, &command.user_id)
            .await?;
        check_applicant(&team, registration.as_ref(), &command.user_id)?;

        if self
            .join_request_repository
            .find_pending(&team.id, &command.user_id)
            .await?
            .is_some()
        {
            return Err(TeamError::RequestAlreadyPending.into());
        }

        let request = JoinRequest::pending(
            &team.id,
            &command.user_id,
            command.user_name.trim(),
            normalize_email(&command.user_email),
        );
        self.join_request_repository.save(&request).await?;

        info!(
            "Join request {} created: {} -> team {}",
            request.id, request.user_id, team.id
        );
        Ok(request)
    }

    /// リーダーが率いる全チームの保留中リクエストを返す
    ///
    /// リーダーでない場合は空
    pub async fn list_for_leader(&self, leader_id: &str) -> Result<Vec<JoinRequest>> {
        let team_ids: Vec<String> = self
            .team_repository
            .list(&TeamFilter::leader(leader_id))
            .await?
            .into_iter()
            .map(|t| t.id)
            .collect();

        if team_ids.is_empty() {
            return Ok(Vec::new());
        }
        self.join_request_repository
            .list_pending_for_teams(&team_ids)
            .await
    }

    /// リクエストに応答
    ///
    /// # Returns
    ///
    /// 更新後のリクエスト
    ///
    /// # Errors
    ///
    /// - 不正な操作は `MissingFields`
    /// - リクエストがない場合は `JoinRequestNotFound`、処理済みは `RequestAlreadyHandled`
    /// - 承認時に申請者が所属済み・未登録・開催日違い・満員の場合はリクエストを却下したうえで
    ///   `AlreadyInTeam` / `NotRegistered` / `DateMismatch` / `TeamFull`、
    ///   チームが消えている場合は `TeamNotFound`
    pub async fn respond(&self, command: &RespondJoinRequestCommand) -> Result<JoinRequest> {
        require_fields(&[&command.request_id], "Missing requestId or action.")?;
        let action = RequestAction::parse(&command.action)
            .ok_or_else(|| TeamError::missing("Missing requestId or action."))?;

        let mut request = self
            .join_request_repository
            .find_by_id(&command.request_id)
            .await?
            .ok_or(TeamError::JoinRequestNotFound)?;

        if !request.is_pending() {
            return Err(TeamError::RequestAlreadyHandled.into());
        }

        if action == RequestAction::Reject {
            request.status = JoinRequestStatus::Rejected;
            self.join_request_repository.save(&request).await?;
            info!("Join request {} rejected", request.id);
            return Ok(request);
        }

        if self
            .team_repository
            .find_by_member(&request.user_id)
            .await?
            .is_some()
        {
            self.reject_stale(&mut request).await?;
            return Err(TeamError::AlreadyInTeam.into());
        }

        let mut team = self
            .team_repository
            .find_by_id(&request.team_id)
            .await?
            .ok_or(TeamError::TeamNotFound)?;

        let registration = self
            .registration_repository
            .find(&team.event, &request.user_id)
            .await?;
        if let Err(e) = check_applicant(&team, registration.as_ref(), &request.user_id) {
            self.reject_stale(&mut request).await?;
            return Err(e.into());
        }

        if team.is_full(self.policy.max_team_members) {
            self.reject_stale(&mut request).await?;
            return Err(TeamError::TeamFull.into());
        }

        team.add_member(request.applicant(), self.policy.max_team_members)?;
        self.team_repository.save(&team).await?;

        request.status = JoinRequestStatus::Accepted;
        self.join_request_repository.save(&request).await?;
        release_claims(
            self.pool_repository.as_ref(),
            self.join_request_repository.as_ref(),
            &request.user_id,
        )
        .await?;

        info!(
            "Join request {} accepted: {} joined team {}",
            request.id, request.user_id, team.id
        );
        Ok(request)
    }

    async fn reject_stale(&self, request: &mut JoinRequest) -> Result<()> {
        request.status = JoinRequestStatus::Rejected;
        self.join_request_repository.save(request).await?;
        warn!(
            "Join request {} can no longer be accepted; marked rejected",
            request.id
        );
        Ok(())
    }
}

/// 申請者がチームのイベントに登録済みで、開催日が一致するか
fn check_applicant(
    team: &Team,
    registration: Option<&EventRegistration>,
    user_id: &str,
) -> Result<(), TeamError> {
    match MembershipService::ensure_registered(registration, user_id)? {
        Some(date) if !team.accepts_date(date) => Err(TeamError::DateMismatch),
        _ => Ok(()),
    }
}
