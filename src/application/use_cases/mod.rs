//! # Use Cases
//!
//! チーム編成の操作（ユースケース）
//!
//! ## 参加者向け
//!
//! - **ListTeamsUseCase**: チーム一覧と空きスロット
//! - **CreateTeamUseCase** / **JoinTeamUseCase** / **LeaveTeamUseCase**: チームの作成・参加・離脱
//! - **JoinRandomUseCase**: ランダムプールへの登録
//! - **JoinRequestsUseCase**: 参加リクエスト
//! - **ParticipantUseCase**: 登録確認・プロフィール登録・ログイン
//!
//! ## 管理者向け
//!
//! - **AdminAuthUseCase** / **CheckDbUseCase**: 認証と初期化
//! - **MergeTeamsUseCase** / **AssignLeaderUseCase** / **AssignFromPoolUseCase**: チームの調整
//! - **RandomPoolUseCase**: プールの集計とチーム一括生成
//! - **UpdateScoreUseCase**: スコア更新
//! - **ImportRegistrationsUseCase**: 参加登録の一括取り込み

pub mod admin_auth;
pub mod assign_from_pool;
pub mod assign_leader;
pub mod check_db;
pub mod create_team;
pub mod import_registrations;
pub mod join_random;
pub mod join_requests;
pub mod join_team;
pub mod leave_team;
pub mod list_teams;
pub mod merge_teams;
pub mod participant;
pub mod random_pool;
pub mod update_score;

pub(crate) mod placement;

#[cfg(test)]
mod test_support;
