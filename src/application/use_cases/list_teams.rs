//! # List Teams Use Case
//!
//! チーム一覧と空きスロットの参照

use std::sync::Arc;

use anyhow::Result;
use chrono::{NaiveDate, NaiveTime};

use crate::application::dto::team_policy::TeamPolicy;
use crate::domain::entities::team::Team;
use crate::domain::error::TeamError;
use crate::domain::repositories::team_repository::{TeamFilter, TeamRepository};

/// チーム参照の条件
#[derive(Debug, Clone, Default)]
pub struct TeamQuery {
    pub id: Option<String>,
    pub event: Option<String>,
    pub event_date: Option<NaiveDate>,
}

/// チーム参照ユースケース
pub struct ListTeamsUseCase<T: TeamRepository> {
    team_repository: Arc<T>,
    policy: TeamPolicy,
}

impl<T: TeamRepository> ListTeamsUseCase<T> {
    pub fn new(team_repository: Arc<T>, policy: TeamPolicy) -> Self {
        Self {
            team_repository,
            policy,
        }
    }

    /// 条件に合うチームを作成日時順に返す
    ///
    /// `id` が指定された場合はそのチームのみ。イベント未指定時は全イベントが対象
    ///
    /// # Errors
    ///
    /// `id` のチームが存在しない場合に `TeamNotFound`
    pub async fn execute(&self, query: &TeamQuery) -> Result<Vec<Team>> {
        if let Some(id) = query.id.as_deref().filter(|id| !id.trim().is_empty()) {
            let team = self
                .team_repository
                .find_by_id(id)
                .await?
                .ok_or(TeamError::TeamNotFound)?;
            return Ok(vec![team]);
        }

        let filter = TeamFilter {
            event: query.event.clone().filter(|e| !e.trim().is_empty()),
            event_date: query.event_date,
            leader_id: None,
        };
        self.team_repository.list(&filter).await
    }

    /// 指定日で空きのあるスロット時刻を返す
    pub async fn available_slots(
        &self,
        event: Option<&str>,
        event_date: NaiveDate,
    ) -> Result<Vec<NaiveTime>> {
        let event = self.policy.event_or_default(event);
        let teams = self
            .team_repository
            .list(&TeamFilter::event(event).on_date(event_date))
            .await?;
        Ok(self.policy.schedule.available_slots(&teams))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::repositories::json_data_store::JsonDataStore;
    use crate::application::use_cases::test_support::*;

    async fn seeded() -> (Arc<JsonDataStore>, Team) {
        let store = store_with(&[]);
        let eleven = NaiveTime::from_hms_opt(11, 0, 0);
        let first = team(&["a"], 26).with_slot(eleven);
        TeamRepository::save(store.as_ref(), &first).await.unwrap();
        TeamRepository::save(store.as_ref(), &team(&["b"], 26).with_slot(eleven))
            .await
            .unwrap();
        TeamRepository::save(store.as_ref(), &team(&["c"], 27))
            .await
            .unwrap();
        (store, first)
    }

    #[tokio::test]
    async fn test_list_all_and_by_date() {
        let (store, _) = seeded().await;
        let use_case = ListTeamsUseCase::new(store, TeamPolicy::default());

        assert_eq!(use_case.execute(&TeamQuery::default()).await.unwrap().len(), 3);

        let query = TeamQuery {
            event_date: Some(date(27)),
            ..TeamQuery::default()
        };
        let teams = use_case.execute(&query).await.unwrap();
        assert_eq!(teams.len(), 1);
        assert_eq!(teams[0].leader_id, "c");
    }

    #[tokio::test]
    async fn test_find_by_id() {
        let (store, first) = seeded().await;
        let use_case = ListTeamsUseCase::new(store, TeamPolicy::default());

        let query = TeamQuery {
            id: Some(first.id.clone()),
            ..TeamQuery::default()
        };
        assert_eq!(use_case.execute(&query).await.unwrap(), vec![first]);

        let missing = TeamQuery {
            id: Some("nope".to_string()),
            ..TeamQuery::default()
        };
        let err = use_case.execute(&missing).await.unwrap_err();
        assert_eq!(team_error(err), TeamError::TeamNotFound);
    }

    #[tokio::test]
    async fn test_available_slots_excludes_full_slot() {
        let (store, _) = seeded().await;
        let use_case = ListTeamsUseCase::new(store, TeamPolicy::default());

        let on_26 = use_case.available_slots(None, date(26)).await.unwrap();
        assert_eq!(on_26.len(), 15);
        assert!(!on_26.contains(&NaiveTime::from_hms_opt(11, 0, 0).unwrap()));

        let on_27 = use_case.available_slots(None, date(27)).await.unwrap();
        assert_eq!(on_27.len(), 16);
    }
}
