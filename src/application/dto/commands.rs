//! # Command DTOs
//!
//! Use Case への入力。HTTPのJSONボディ（camelCase）から直接デシリアライズする
//!
//! 項目はすべて省略可能として受け取り、必須チェックは Use Case 側で行う

use serde::Deserialize;

/// チーム作成
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateTeamCommand {
    pub user_id: String,
    pub user_name: String,
    pub user_email: String,
    pub team_name: String,
    pub event: Option<String>,
    pub slot_time: Option<String>,
}

/// チーム参加
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JoinTeamCommand {
    pub user_id: String,
    pub user_name: String,
    pub user_email: String,
    pub team_id: String,
    pub event: Option<String>,
}

/// ランダム参加（プールへの登録）
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JoinRandomCommand {
    pub user_id: String,
    pub user_name: String,
    pub user_email: String,
    pub event: Option<String>,
}

/// チーム離脱
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LeaveTeamCommand {
    pub user_id: String,
    pub team_id: String,
}

/// 参加リクエスト作成
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateJoinRequestCommand {
    pub team_id: String,
    pub user_id: String,
    pub user_name: String,
    pub user_email: String,
}

/// 参加リクエストへの応答
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RespondJoinRequestCommand {
    pub request_id: String,
    /// "accept" または "reject"
    pub action: String,
}

/// プロフィール登録
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OnboardingCommand {
    pub email: String,
    pub name: String,
    pub username: String,
    pub password: String,
    pub event: Option<String>,
}

/// 参加者ログイン
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParticipantLoginCommand {
    pub reg_no: String,
    pub password: String,
}

/// 管理者ログイン
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdminLoginCommand {
    pub username: String,
    pub password: String,
}

/// チーム統合
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MergeTeamsCommand {
    pub source_team_id: String,
    pub target_team_id: String,
}

/// リーダー変更
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssignLeaderCommand {
    pub team_id: String,
    pub new_leader_id: String,
}

/// プールから特定チームへの割り当て
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssignFromPoolCommand {
    pub user_id: String,
    pub team_id: String,
    pub event: Option<String>,
}

/// ランダムチーム生成
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerateTeamsCommand {
    pub team_size: Option<usize>,
    pub event: Option<String>,
}
