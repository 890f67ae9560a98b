//! # Merge Teams Use Case
//!
//! 2つのチームの統合（管理者操作）

use std::sync::Arc;

use anyhow::Result;
use log::info;
use serde::Serialize;

use crate::application::dto::commands::MergeTeamsCommand;
use crate::application::dto::team_policy::TeamPolicy;
use crate::domain::error::{require_fields, TeamError};
use crate::domain::repositories::team_repository::TeamRepository;
use crate::domain::services::membership::MembershipService;

/// 統合結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeOutcome {
    pub target_team_id: String,
    /// 移動したメンバー数（重複を除く）
    pub merged_count: usize,
}

pub struct MergeTeamsUseCase<T: TeamRepository> {
    team_repository: Arc<T>,
    policy: TeamPolicy,
}

impl<T: TeamRepository> MergeTeamsUseCase<T> {
    pub fn new(team_repository: Arc<T>, policy: TeamPolicy) -> Self {
        Self {
            team_repository,
            policy,
        }
    }

    /// 統合元チームのメンバーを統合先へ移し、統合元を削除
    ///
    /// 統合先の更新に成功してから統合元を削除する
    ///
    /// # Errors
    ///
    /// - ID不足は `MissingFields`、同一IDは `SameTeam`
    /// - いずれかのチームがない場合は `SourceTeamNotFound` / `TargetTeamNotFound`
    /// - イベント・開催日の不一致、定員超過
    pub async fn execute(&self, command: &MergeTeamsCommand) -> Result<MergeOutcome> {
        require_fields(
            &[&command.source_team_id, &command.target_team_id],
            "Missing sourceTeamId or targetTeamId.",
        )?;
        if command.source_team_id == command.target_team_id {
            return Err(TeamError::SameTeam.into());
        }

        let source = self
            .team_repository
            .find_by_id(&command.source_team_id)
            .await?
            .ok_or(TeamError::SourceTeamNotFound)?;
        let mut target = self
            .team_repository
            .find_by_id(&command.target_team_id)
            .await?
            .ok_or(TeamError::TargetTeamNotFound)?;

        let (members, merged_count) =
            MembershipService::merge(&source, &target, self.policy.max_team_members)?;
        target.members = members;

        self.team_repository.save(&target).await?;
        self.team_repository.delete(&source.id).await?;

        info!(
            "Merged team {} into {} ({} members moved, {} total)",
            source.id,
            target.id,
            merged_count,
            target.len()
        );
        Ok(MergeOutcome {
            target_team_id: target.id,
            merged_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::test_support::*;
    use crate::domain::entities::team::Team;
    use crate::domain::repositories::team_repository::MockTeamRepository;

    fn command(source: &str, target: &str) -> MergeTeamsCommand {
        MergeTeamsCommand {
            source_team_id: source.to_string(),
            target_team_id: target.to_string(),
        }
    }

    #[tokio::test]
    async fn test_merge_moves_members_and_deletes_source() {
        let store = store_with(&[]);
        let source = team(&["c", "d"], 26);
        let target = team(&["a", "b"], 26);
        TeamRepository::save(store.as_ref(), &source).await.unwrap();
        TeamRepository::save(store.as_ref(), &target).await.unwrap();

        let outcome = MergeTeamsUseCase::new(store.clone(), TeamPolicy::default())
            .execute(&command(&source.id, &target.id))
            .await
            .unwrap();

        assert_eq!(outcome.merged_count, 2);
        let merged = TeamRepository::find_by_id(store.as_ref(), &target.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(merged.len(), 4);
        assert_eq!(merged.leader_id, "a");
        assert!(TeamRepository::find_by_id(store.as_ref(), &source.id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_merge_rejects_overflow() {
        let store = store_with(&[]);
        let source = team(&["d", "e"], 26);
        let target = team(&["a", "b", "c"], 26);
        TeamRepository::save(store.as_ref(), &source).await.unwrap();
        TeamRepository::save(store.as_ref(), &target).await.unwrap();

        let err = MergeTeamsUseCase::new(store.clone(), TeamPolicy::default())
            .execute(&command(&source.id, &target.id))
            .await
            .unwrap_err();

        assert_eq!(team_error(err), TeamError::MergeExceedsCapacity(4));
        assert!(TeamRepository::find_by_id(store.as_ref(), &source.id)
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_merge_rejects_different_dates() {
        let store = store_with(&[]);
        let source = team(&["c"], 27);
        let target = team(&["a"], 26);
        TeamRepository::save(store.as_ref(), &source).await.unwrap();
        TeamRepository::save(store.as_ref(), &target).await.unwrap();

        let err = MergeTeamsUseCase::new(store, TeamPolicy::default())
            .execute(&command(&source.id, &target.id))
            .await
            .unwrap_err();
        assert_eq!(team_error(err), TeamError::MergeDifferentDate);
    }

    #[tokio::test]
    async fn test_merge_same_or_missing_ids() {
        let store = store_with(&[]);
        let use_case = MergeTeamsUseCase::new(store, TeamPolicy::default());

        let err = use_case.execute(&command("t1", "t1")).await.unwrap_err();
        assert_eq!(team_error(err), TeamError::SameTeam);

        let err = use_case.execute(&command("", "t1")).await.unwrap_err();
        assert!(matches!(team_error(err), TeamError::MissingFields(_)));

        let err = use_case.execute(&command("t1", "t2")).await.unwrap_err();
        assert_eq!(team_error(err), TeamError::SourceTeamNotFound);
    }

    #[tokio::test]
    async fn test_source_kept_when_target_update_fails() {
        let source = team(&["c"], 26);
        let target = team(&["a"], 26);
        let (s, t) = (source.clone(), target.clone());
        let (source_id, target_id) = (source.id.clone(), target.id.clone());

        let mut repo = MockTeamRepository::new();
        repo.expect_find_by_id()
            .withf(move |id: &str| id == source_id)
            .returning(move |_| Ok(Some(s.clone())));
        repo.expect_find_by_id()
            .withf(move |id: &str| id == target_id)
            .returning(move |_| Ok(Some(t.clone())));
        repo.expect_save()
            .returning(|_: &Team| Err(anyhow::anyhow!("write failed")));
        repo.expect_delete().never();

        let result = MergeTeamsUseCase::new(Arc::new(repo), TeamPolicy::default())
            .execute(&command(&source.id, &target.id))
            .await;

        assert!(result.is_err());
    }
}
