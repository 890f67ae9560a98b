//! # Update Score Use Case
//!
//! チームのスコア更新

use std::sync::Arc;

use anyhow::Result;
use log::info;

use crate::domain::entities::team::Team;
use crate::domain::error::TeamError;
use crate::domain::repositories::team_repository::TeamRepository;

pub struct UpdateScoreUseCase<T: TeamRepository> {
    team_repository: Arc<T>,
}

impl<T: TeamRepository> UpdateScoreUseCase<T> {
    pub fn new(team_repository: Arc<T>) -> Self {
        Self { team_repository }
    }

    /// スコアを上書き
    ///
    /// # Errors
    ///
    /// チームが存在しない場合に `TeamNotFound`
    pub async fn execute(&self, team_id: &str, score: i64) -> Result<Team> {
        let mut team = self
            .team_repository
            .find_by_id(team_id)
            .await?
            .ok_or(TeamError::TeamNotFound)?;

        let previous = team.score;
        team.score = score;
        self.team_repository.save(&team).await?;

        info!("Team {} score: {} -> {}", team.id, previous, score);
        Ok(team)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::test_support::*;

    #[tokio::test]
    async fn test_update_score() {
        let store = store_with(&[]);
        let t = team(&["a"], 26);
        TeamRepository::save(store.as_ref(), &t).await.unwrap();

        let updated = UpdateScoreUseCase::new(store.clone())
            .execute(&t.id, 1250)
            .await
            .unwrap();

        assert_eq!(updated.score, 1250);
        let stored = TeamRepository::find_by_id(store.as_ref(), &t.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.score, 1250);
    }

    #[tokio::test]
    async fn test_update_score_missing_team() {
        let store = store_with(&[]);

        let err = UpdateScoreUseCase::new(store)
            .execute("missing", 10)
            .await
            .unwrap_err();
        assert_eq!(team_error(err), TeamError::TeamNotFound);
    }
}
