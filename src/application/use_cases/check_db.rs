//! # Check DB Use Case
//!
//! データストアの疎通確認と件数の集計

use std::sync::Arc;

use anyhow::Result;
use log::debug;
use serde::Serialize;

use crate::application::dto::team_policy::TeamPolicy;
use crate::domain::repositories::admin_repository::AdminRepository;
use crate::domain::repositories::pool_repository::PoolRepository;
use crate::domain::repositories::team_repository::{TeamFilter, TeamRepository};
use crate::domain::repositories::user_repository::UserRepository;

/// ストアの件数
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreHealth {
    pub admins: usize,
    pub users: usize,
    pub teams: usize,
    /// 既定イベントのプール人数
    pub queued: usize,
}

pub struct CheckDbUseCase<A, U, T, P>
where
    A: AdminRepository,
    U: UserRepository,
    T: TeamRepository,
    P: PoolRepository,
{
    admin_repository: Arc<A>,
    user_repository: Arc<U>,
    team_repository: Arc<T>,
    pool_repository: Arc<P>,
    policy: TeamPolicy,
}

impl<A, U, T, P> CheckDbUseCase<A, U, T, P>
where
    A: AdminRepository,
    U: UserRepository,
    T: TeamRepository,
    P: PoolRepository,
{
    pub fn new(
        admin_repository: Arc<A>,
        user_repository: Arc<U>,
        team_repository: Arc<T>,
        pool_repository: Arc<P>,
        policy: TeamPolicy,
    ) -> Self {
        Self {
            admin_repository,
            user_repository,
            team_repository,
            pool_repository,
            policy,
        }
    }

    /// 各リポジトリを読み出して件数を返す
    ///
    /// # Errors
    ///
    /// いずれかの読み出しに失敗した場合
    pub async fn execute(&self) -> Result<StoreHealth> {
        let health = StoreHealth {
            admins: self.admin_repository.count().await?,
            users: self.user_repository.list_all().await?.len(),
            teams: self.team_repository.list(&TeamFilter::default()).await?.len(),
            queued: self
                .pool_repository
                .count(&self.policy.default_event)
                .await?,
        };
        debug!("Store health: {:?}", health);
        Ok(health)
    }
}
