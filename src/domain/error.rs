//! # Team Error
//!
//! チーム編成ルール違反を表すドメインエラー
//!
//! Use Case は `anyhow::Result` を返すため、ルール違反は `TeamError` を
//! `anyhow::Error` に包んで伝搬する。Driver層は `downcast_ref` で取り出して
//! HTTPステータスへ変換する。

use thiserror::Error;

/// エラーの分類
///
/// HTTPステータスへの対応付けに使用する
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// 入力値の不備・ルール違反（400）
    Validation,
    /// 認証失敗（401）
    Unauthorized,
    /// 参加資格なし（403）
    Forbidden,
    /// 対象が存在しない（404）
    NotFound,
    /// 現在の状態と衝突（409）
    Conflict,
}

/// チーム編成のドメインエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TeamError {
    #[error("{0}")]
    MissingFields(String),

    #[error("Registration number {0} not verified for this event.")]
    NotRegistered(String),

    #[error("No event date found for this user.")]
    NoEventDate,

    #[error("Registration not found.")]
    RegistrationNotFound,

    #[error("User is already in a team.")]
    AlreadyInTeam,

    #[error("Team not found.")]
    TeamNotFound,

    #[error("Source team not found.")]
    SourceTeamNotFound,

    #[error("Target team not found.")]
    TargetTeamNotFound,

    #[error("User not found.")]
    UserNotFound,

    #[error("Team is already full.")]
    TeamFull,

    #[error("This team is registered for a different event.")]
    DifferentEvent,

    #[error("User can only join a team scheduled for their date.")]
    DateMismatch,

    #[error("Teams must be for the same event.")]
    MergeDifferentEvent,

    #[error("Teams must have the same event date.")]
    MergeDifferentDate,

    #[error("Source and target teams must be different.")]
    SameTeam,

    #[error("Merged team would exceed capacity of {0}.")]
    MergeExceedsCapacity(usize),

    #[error("You are not a member of this team.")]
    NotAMember,

    #[error("New leader must be an existing member of the team.")]
    LeaderMustBeMember,

    #[error("This member is already the team leader.")]
    AlreadyLeader,

    #[error("Leader cannot leave a team with other members. Please transfer leadership first.")]
    LeaderCannotLeave,

    #[error("Join request not found.")]
    JoinRequestNotFound,

    #[error("Request already handled.")]
    RequestAlreadyHandled,

    #[error("Join request already pending.")]
    RequestAlreadyPending,

    #[error("Username already taken. Choose another.")]
    UsernameTaken,

    #[error("No users in random pool to assign.")]
    EmptyPool,

    #[error("Slot {0} is not part of the schedule.")]
    InvalidSlot(String),

    #[error("Slot {0} is already full.")]
    SlotFull(String),

    #[error("Registration number not found in our records.")]
    UnknownRegistrationNumber,

    #[error("Invalid password.")]
    InvalidPassword,

    #[error("Invalid credentials.")]
    InvalidCredentials,

    #[error("Invalid admin session")]
    InvalidSession,
}

impl TeamError {
    /// エラーの分類を返す
    pub fn category(&self) -> ErrorCategory {
        use TeamError::*;

        match self {
            MissingFields(_) | DifferentEvent | DateMismatch | MergeDifferentEvent
            | MergeDifferentDate | SameTeam | MergeExceedsCapacity(_) | LeaderMustBeMember
            | AlreadyLeader | LeaderCannotLeave | RequestAlreadyHandled | EmptyPool
            | InvalidSlot(_) => ErrorCategory::Validation,
            InvalidPassword | InvalidCredentials | InvalidSession => ErrorCategory::Unauthorized,
            NotRegistered(_) | NoEventDate | NotAMember => ErrorCategory::Forbidden,
            RegistrationNotFound | TeamNotFound | SourceTeamNotFound | TargetTeamNotFound
            | UserNotFound | JoinRequestNotFound | UnknownRegistrationNumber => {
                ErrorCategory::NotFound
            }
            AlreadyInTeam | TeamFull | RequestAlreadyPending | UsernameTaken | SlotFull(_) => {
                ErrorCategory::Conflict
            }
        }
    }

    /// 必須項目不足エラーを作成
    pub fn missing(message: impl Into<String>) -> Self {
        TeamError::MissingFields(message.into())
    }
}

/// 必須の文字列項目が空でないことを確認する
///
/// # Errors
///
/// いずれかの値が空白のみの場合に `TeamError::MissingFields` を返す
pub fn require_fields(values: &[&str], message: &str) -> Result<(), TeamError> {
    if values.iter().any(|v| v.trim().is_empty()) {
        return Err(TeamError::missing(message));
    }
    Ok(())
}
