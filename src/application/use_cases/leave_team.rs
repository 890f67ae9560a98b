//! # Leave Team Use Case
//!
//! チームからの離脱

use std::sync::Arc;

use anyhow::Result;
use log::info;
use serde::Serialize;

use crate::application::dto::commands::LeaveTeamCommand;
use crate::domain::error::{require_fields, TeamError};
use crate::domain::repositories::team_repository::TeamRepository;

/// 離脱結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum LeaveOutcome {
    /// メンバーとして離脱した
    Left { team_id: String },
    /// 唯一のメンバーであるリーダーが離脱し、チームを解散した
    Disbanded { team_id: String },
}

/// チーム離脱ユースケース
pub struct LeaveTeamUseCase<T: TeamRepository> {
    team_repository: Arc<T>,
}

impl<T: TeamRepository> LeaveTeamUseCase<T> {
    pub fn new(team_repository: Arc<T>) -> Self {
        Self { team_repository }
    }

    /// チームから離脱
    ///
    /// リーダーは他のメンバーが残っている間は離脱できない
    ///
    /// # Errors
    ///
    /// チームがない場合は `TeamNotFound`、メンバーでない場合は `NotAMember`、
    /// リーダーが他メンバーを残して離脱しようとした場合は `LeaderCannotLeave`
    pub async fn execute(&self, command: &LeaveTeamCommand) -> Result<LeaveOutcome> {
        require_fields(
            &[&command.user_id, &command.team_id],
            "Missing required fields.",
        )?;

        let mut team = self
            .team_repository
            .find_by_id(&command.team_id)
            .await?
            .ok_or(TeamError::TeamNotFound)?;

        if !team.has_member(&command.user_id) {
            return Err(TeamError::NotAMember.into());
        }

        if team.is_leader(&command.user_id) {
            if team.len() > 1 {
                return Err(TeamError::LeaderCannotLeave.into());
            }
            self.team_repository.delete(&team.id).await?;
            info!("Team {} disbanded by its leader {}", team.id, command.user_id);
            return Ok(LeaveOutcome::Disbanded { team_id: team.id });
        }

        team.remove_member(&command.user_id)?;
        self.team_repository.save(&team).await?;

        info!("{} left team {}", command.user_id, team.id);
        Ok(LeaveOutcome::Left { team_id: team.id })
    }
}
