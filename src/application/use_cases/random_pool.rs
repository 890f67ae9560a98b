//! # Random Pool Use Case
//!
//! ランダムプールの集計と、プールからのチーム一括生成
//!
//! 割り当て計画は `PoolAllocator` が純粋に作成し、このユースケースは計画を
//! チーム単位で書き込む。書き込みに失敗したチームの参加者はプールに残る。

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use anyhow::Result;
use log::{debug, info, warn};
use serde::Serialize;

use super::placement::release_claims;
use crate::application::dto::commands::GenerateTeamsCommand;
use crate::application::dto::team_policy::TeamPolicy;
use crate::domain::entities::team::Team;
use crate::domain::entities::user::{Member, User};
use crate::domain::error::TeamError;
use crate::domain::repositories::join_request_repository::JoinRequestRepository;
use crate::domain::repositories::pool_repository::PoolRepository;
use crate::domain::repositories::registration_repository::RegistrationRepository;
use crate::domain::repositories::team_repository::{TeamFilter, TeamRepository};
use crate::domain::repositories::user_repository::UserRepository;
use crate::domain::services::pool_allocator::{AllocationInput, AllocationPlan, PoolAllocator};

/// プールの集計
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolStats {
    pub event: String,
    pub count: usize,
    /// 定員人数ごとに組めるチーム数
    pub groups_available: usize,
}

/// 既存チームへの追加
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExistingAssignment {
    pub team_id: String,
    pub added: Vec<String>,
}

/// 書き込めなかった割り当て
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationFailure {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
    pub users: Vec<String>,
    pub error: String,
}

/// チーム生成結果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateOutcome {
    pub event: String,
    pub team_size: usize,
    /// 書き込みを行わず計画のみ返した場合は true
    pub dry_run: bool,
    pub created_team_ids: Vec<String>,
    pub assigned_to_existing: Vec<ExistingAssignment>,
    /// 人数不足でプールに残った参加者
    pub leftovers: Vec<String>,
    /// 既に所属済みのためプールから外した参加者
    pub removed_stale: Vec<String>,
    pub failed: Vec<AllocationFailure>,
    /// 配置された人数
    pub placed: usize,
}

/// ランダムプールユースケース
pub struct RandomPoolUseCase<T, U, R, P, J>
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

impl<T, U, R, P, J> RandomPoolUseCase<T, U, R, P, J>
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

    /// プール人数と組めるチーム数
    pub async fn stats(&self, event: Option<&str>) -> Result<PoolStats> {
        let event = self.policy.event_or_default(event);
        let count = self.pool_repository.count(&event).await?;
        Ok(PoolStats {
            groups_available: count / self.policy.max_team_members.max(1),
            event,
            count,
        })
    }

    /// イベントに登録済みで、プロフィールがあり、どのチームにも属していない参加者
    pub async fn unassigned_users(&self, event: Option<&str>) -> Result<Vec<User>> {
        let event = self.policy.event_or_default(event);

        let registered: Vec<String> = self
            .registration_repository
            .list_for_event(&event)
            .await?
            .into_iter()
            .map(|r| r.user_id)
            .collect();
        let members: HashSet<String> = self
            .team_repository
            .list(&TeamFilter::event(&event))
            .await?
            .into_iter()
            .flat_map(|t| t.members.into_iter().map(|m| m.id))
            .collect();

        let users = self.user_repository.find_many(&registered).await?;
        Ok(users
            .into_iter()
            .filter(|u| !members.contains(&u.id))
            .map(|u| u.without_password())
            .collect())
    }

    /// プールからチームを生成
    ///
    /// # Arguments
    ///
    /// * `command` - 目標人数とイベント
    /// * `dry_run` - true の場合は計画のみ返し、書き込まない
    ///
    /// # Errors
    ///
    /// プールが空の場合は `EmptyPool`。チーム単位の書き込み失敗はエラーにせず
    /// `failed` に記録する
    pub async fn generate(
        &self,
        command: &GenerateTeamsCommand,
        dry_run: bool,
    ) -> Result<GenerateOutcome> {
        let event = self.policy.event_or_default(command.event.as_deref());
        let team_size = PoolAllocator::effective_team_size(
            command.team_size,
            self.policy.max_team_members,
            self.policy.min_new_team_size,
        );

        let pool = self.pool_repository.list(&event).await?;
        if pool.is_empty() {
            return Err(TeamError::EmptyPool.into());
        }

        let ids: Vec<String> = pool.iter().map(|e| e.user_id.clone()).collect();
        let users: HashMap<String, User> = self
            .user_repository
            .find_many(&ids)
            .await?
            .into_iter()
            .map(|u| (u.id.clone(), u))
            .collect();

        let all_teams = self.team_repository.list(&TeamFilter::default()).await?;
        let assigned: HashSet<String> = all_teams
            .iter()
            .flat_map(|t| t.members.iter().map(|m| m.id.clone()))
            .collect();

        let plan = PoolAllocator::plan(AllocationInput {
            event: &event,
            pool: &pool,
            users: &users,
            teams: &all_teams,
            assigned_user_ids: &assigned,
            team_size,
            min_new_team_size: self.policy.min_new_team_size,
            schedule: &self.policy.schedule,
        });
        debug!(
            "Allocation plan for {}: {} fills, {} new teams, {} leftovers",
            event,
            plan.fills.len(),
            plan.new_teams.len(),
            plan.leftovers.len()
        );

        let mut outcome = GenerateOutcome {
            event: event.clone(),
            team_size,
            dry_run,
            leftovers: plan.leftovers.iter().map(|e| e.user_id.clone()).collect(),
            removed_stale: plan.stale.iter().map(|e| e.user_id.clone()).collect(),
            failed: plan
                .unknown
                .iter()
                .map(|e| AllocationFailure {
                    team_id: None,
                    users: vec![e.user_id.clone()],
                    error: TeamError::UserNotFound.to_string(),
                })
                .collect(),
            ..GenerateOutcome::default()
        };

        if dry_run {
            outcome.assigned_to_existing = plan
                .fills
                .iter()
                .map(|f| ExistingAssignment {
                    team_id: f.team_id.clone(),
                    added: member_ids(&f.added),
                })
                .collect();
            outcome.created_team_ids = plan.new_teams.iter().map(|t| t.id.clone()).collect();
            outcome.placed = plan.placed_count();
            return Ok(outcome);
        }

        self.apply(plan, &all_teams, &mut outcome).await?;

        info!(
            "Random allotment for {}: {} new teams, {} existing teams filled, {} placed, {} left in pool, {} failed",
            event,
            outcome.created_team_ids.len(),
            outcome.assigned_to_existing.len(),
            outcome.placed,
            outcome.leftovers.len(),
            outcome.failed.len()
        );
        Ok(outcome)
    }

    /// 計画をチーム単位で書き込む
    async fn apply(
        &self,
        plan: AllocationPlan,
        teams: &[Team],
        outcome: &mut GenerateOutcome,
    ) -> Result<()> {
        for entry in &plan.stale {
            self.pool_repository
                .remove(&entry.user_id, &entry.event)
                .await?;
        }

        let by_id: HashMap<&str, &Team> = teams.iter().map(|t| (t.id.as_str(), t)).collect();

        for fill in plan.fills {
            let added = member_ids(&fill.added);
            let Some(existing) = by_id.get(fill.team_id.as_str()) else {
                outcome.failed.push(AllocationFailure {
                    team_id: Some(fill.team_id),
                    users: added,
                    error: TeamError::TeamNotFound.to_string(),
                });
                continue;
            };

            let mut team = (*existing).clone();
            team.members.extend(fill.added);
            match self.team_repository.save(&team).await {
                Ok(()) => {
                    self.release_all(&added).await?;
                    outcome.placed += added.len();
                    outcome.assigned_to_existing.push(ExistingAssignment {
                        team_id: team.id,
                        added,
                    });
                }
                Err(e) => {
                    warn!("Failed to fill team {}: {:#}", team.id, e);
                    outcome.failed.push(AllocationFailure {
                        team_id: Some(team.id),
                        users: added,
                        error: e.to_string(),
                    });
                }
            }
        }

        for team in plan.new_teams {
            let members = member_ids(&team.members);
            match self.team_repository.save(&team).await {
                Ok(()) => {
                    self.release_all(&members).await?;
                    outcome.placed += members.len();
                    outcome.created_team_ids.push(team.id);
                }
                Err(e) => {
                    warn!("Failed to create team '{}': {:#}", team.name, e);
                    outcome.failed.push(AllocationFailure {
                        team_id: None,
                        users: members,
                        error: e.to_string(),
                    });
                }
            }
        }

        Ok(())
    }

    async fn release_all(&self, user_ids: &[String]) -> Result<()> {
        for user_id in user_ids {
            release_claims(
                self.pool_repository.as_ref(),
                self.join_request_repository.as_ref(),
                user_id,
            )
            .await?;
        }
        Ok(())
    }
}

fn member_ids(members: &[Member]) -> Vec<String> {
    members.iter().map(|m| m.id.clone()).collect()
}
