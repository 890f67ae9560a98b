//! # Assign Leader Use Case
//!
//! チームリーダーの変更（管理者操作）

use std::sync::Arc;

use anyhow::Result;
use chrono::NaiveDate;
use log::info;
use serde::Serialize;

use crate::application::dto::commands::AssignLeaderCommand;
use crate::domain::entities::team::Team;
use crate::domain::entities::user::Member;
use crate::domain::error::{require_fields, TeamError};
use crate::domain::repositories::team_repository::TeamRepository;

/// リーダー表示用のメンバー
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderCandidate {
    pub id: String,
    pub name: String,
    pub email: String,
    pub is_current_leader: bool,
}

/// リーダー変更画面のためのチーム情報
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderAssignmentView {
    pub team_id: String,
    pub team_name: String,
    pub event: String,
    pub event_date: Option<NaiveDate>,
    pub current_leader: Option<Member>,
    pub members: Vec<LeaderCandidate>,
}

impl From<&Team> for LeaderAssignmentView {
    fn from(team: &Team) -> Self {
        Self {
            team_id: team.id.clone(),
            team_name: team.name.clone(),
            event: team.event.clone(),
            event_date: team.event_date,
            current_leader: team.leader().cloned(),
            members: team
                .members
                .iter()
                .map(|m| LeaderCandidate {
                    id: m.id.clone(),
                    name: m.name.clone(),
                    email: m.email.clone(),
                    is_current_leader: team.is_leader(&m.id),
                })
                .collect(),
        }
    }
}

/// リーダー変更結果
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderChange {
    pub team_id: String,
    pub team_name: String,
    pub previous_leader: Option<Member>,
    pub new_leader: Member,
}

pub struct AssignLeaderUseCase<T: TeamRepository> {
    team_repository: Arc<T>,
}

impl<T: TeamRepository> AssignLeaderUseCase<T> {
    pub fn new(team_repository: Arc<T>) -> Self {
        Self { team_repository }
    }

    /// チームとメンバー一覧（現リーダーの印つき）を返す
    ///
    /// # Errors
    ///
    /// チームがない場合は `TeamNotFound`
    pub async fn team_members(&self, team_id: &str) -> Result<LeaderAssignmentView> {
        require_fields(&[team_id], "Missing teamId parameter.")?;
        let team = self
            .team_repository
            .find_by_id(team_id)
            .await?
            .ok_or(TeamError::TeamNotFound)?;
        Ok(LeaderAssignmentView::from(&team))
    }

    /// リーダーを変更
    ///
    /// # Errors
    ///
    /// チームがない場合は `TeamNotFound`、新リーダーがメンバーでない場合は
    /// `LeaderMustBeMember`、既にリーダーの場合は `AlreadyLeader`
    pub async fn assign(&self, command: &AssignLeaderCommand) -> Result<LeaderChange> {
        require_fields(
            &[&command.team_id, &command.new_leader_id],
            "Missing teamId or newLeaderId.",
        )?;

        let mut team = self
            .team_repository
            .find_by_id(&command.team_id)
            .await?
            .ok_or(TeamError::TeamNotFound)?;

        let previous_leader = team.set_leader(&command.new_leader_id)?;
        let new_leader = team
            .leader()
            .cloned()
            .ok_or(TeamError::LeaderMustBeMember)?;
        self.team_repository.save(&team).await?;

        info!(
            "Team {} leader changed: {} -> {}",
            team.id,
            previous_leader.as_ref().map_or("-", |m| m.id.as_str()),
            new_leader.id
        );
        Ok(LeaderChange {
            team_id: team.id,
            team_name: team.name,
            previous_leader,
            new_leader,
        })
    }
}
