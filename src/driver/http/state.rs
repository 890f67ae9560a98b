//! Shared HTTP State
//!
//! ハンドラ間で共有する状態とユースケースの組み立て

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use crate::adapter::config::{Config, DefaultAdmin};
use crate::adapter::repositories::json_data_store::JsonDataStore;
use crate::application::dto::team_policy::TeamPolicy;
use crate::application::use_cases::admin_auth::AdminAuthUseCase;
use crate::application::use_cases::assign_from_pool::AssignFromPoolUseCase;
use crate::application::use_cases::assign_leader::AssignLeaderUseCase;
use crate::application::use_cases::check_db::CheckDbUseCase;
use crate::application::use_cases::create_team::CreateTeamUseCase;
use crate::application::use_cases::import_registrations::ImportRegistrationsUseCase;
use crate::application::use_cases::join_random::JoinRandomUseCase;
use crate::application::use_cases::join_requests::JoinRequestsUseCase;
use crate::application::use_cases::join_team::JoinTeamUseCase;
use crate::application::use_cases::leave_team::LeaveTeamUseCase;
use crate::application::use_cases::list_teams::ListTeamsUseCase;
use crate::application::use_cases::merge_teams::MergeTeamsUseCase;
use crate::application::use_cases::participant::ParticipantUseCase;
use crate::application::use_cases::random_pool::RandomPoolUseCase;
use crate::application::use_cases::update_score::UpdateScoreUseCase;

type Store = JsonDataStore;

/// HTTPハンドラの共有状態
///
/// 変更系のリクエストは `write_gate` を取得してから処理し、
/// 読み出し・検証・書き込みの間に他の変更が割り込まないようにする
#[derive(Clone)]
pub struct AppState {
    store: Arc<Store>,
    policy: TeamPolicy,
    default_admin: DefaultAdmin,
    write_gate: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(store: Arc<Store>, policy: TeamPolicy, default_admin: DefaultAdmin) -> Self {
        Self {
            store,
            policy,
            default_admin,
            write_gate: Arc::new(Mutex::new(())),
        }
    }

    /// 設定ファイルの内容から状態を作成
    pub fn from_config(store: Arc<Store>, config: &Config) -> Self {
        Self::new(store, config.team_policy(), config.default_admin.clone())
    }

    /// 変更系リクエストの直列化
    pub async fn write_gate(&self) -> MutexGuard<'_, ()> {
        self.write_gate.lock().await
    }

    pub fn default_admin(&self) -> &DefaultAdmin {
        &self.default_admin
    }

    pub fn list_teams(&self) -> ListTeamsUseCase<Store> {
        ListTeamsUseCase::new(self.store.clone(), self.policy.clone())
    }

    pub fn create_team(&self) -> CreateTeamUseCase<Store, Store, Store, Store> {
        CreateTeamUseCase::new(
            self.store.clone(),
            self.store.clone(),
            self.store.clone(),
            self.store.clone(),
            self.policy.clone(),
        )
    }

    pub fn join_team(&self) -> JoinTeamUseCase<Store, Store, Store, Store> {
        JoinTeamUseCase::new(
            self.store.clone(),
            self.store.clone(),
            self.store.clone(),
            self.store.clone(),
            self.policy.clone(),
        )
    }

    pub fn join_random(&self) -> JoinRandomUseCase<Store, Store, Store> {
        JoinRandomUseCase::new(
            self.store.clone(),
            self.store.clone(),
            self.store.clone(),
            self.policy.clone(),
        )
    }

    pub fn leave_team(&self) -> LeaveTeamUseCase<Store> {
        LeaveTeamUseCase::new(self.store.clone())
    }

    pub fn update_score(&self) -> UpdateScoreUseCase<Store> {
        UpdateScoreUseCase::new(self.store.clone())
    }

    pub fn join_requests(&self) -> JoinRequestsUseCase<Store, Store, Store, Store> {
        JoinRequestsUseCase::new(
            self.store.clone(),
            self.store.clone(),
            self.store.clone(),
            self.store.clone(),
            self.policy.clone(),
        )
    }

    pub fn participant(&self) -> ParticipantUseCase<Store, Store, Store, Store> {
        ParticipantUseCase::new(
            self.store.clone(),
            self.store.clone(),
            self.store.clone(),
            self.store.clone(),
            self.policy.clone(),
        )
    }

    pub fn admin_auth(&self) -> AdminAuthUseCase<Store> {
        AdminAuthUseCase::new(self.store.clone())
    }

    pub fn check_db(&self) -> CheckDbUseCase<Store, Store, Store, Store> {
        CheckDbUseCase::new(
            self.store.clone(),
            self.store.clone(),
            self.store.clone(),
            self.store.clone(),
            self.policy.clone(),
        )
    }

    pub fn merge_teams(&self) -> MergeTeamsUseCase<Store> {
        MergeTeamsUseCase::new(self.store.clone(), self.policy.clone())
    }

    pub fn assign_leader(&self) -> AssignLeaderUseCase<Store> {
        AssignLeaderUseCase::new(self.store.clone())
    }

    pub fn assign_from_pool(&self) -> AssignFromPoolUseCase<Store, Store, Store, Store, Store> {
        AssignFromPoolUseCase::new(
            self.store.clone(),
            self.store.clone(),
            self.store.clone(),
            self.store.clone(),
            self.store.clone(),
            self.policy.clone(),
        )
    }

    pub fn random_pool(&self) -> RandomPoolUseCase<Store, Store, Store, Store, Store> {
        RandomPoolUseCase::new(
            self.store.clone(),
            self.store.clone(),
            self.store.clone(),
            self.store.clone(),
            self.store.clone(),
            self.policy.clone(),
        )
    }

    pub fn import_registrations(&self) -> ImportRegistrationsUseCase<Store, Store> {
        ImportRegistrationsUseCase::new(self.store.clone(), self.store.clone(), self.policy.clone())
    }
}
