//! # Membership Service
//!
//! チーム所属に関するビジネスルール
//!
//! - 1人のユーザーは最大1チームにのみ所属する
//! - チームの人数は定員を超えない
//! - 参加先チームはイベントと開催日が一致していなければならない

use chrono::NaiveDate;

use crate::domain::entities::registration::EventRegistration;
use crate::domain::entities::team::Team;
use crate::domain::entities::user::Member;
use crate::domain::error::TeamError;

/// 所属ルールサービス
pub struct MembershipService;

impl MembershipService {
    /// ユーザーがどのチームにも所属していないことを確認
    ///
    /// # Errors
    ///
    /// 所属チームがある場合に `AlreadyInTeam`
    pub fn ensure_unassigned(current: Option<&Team>) -> Result<(), TeamError> {
        match current {
            Some(_) => Err(TeamError::AlreadyInTeam),
            None => Ok(()),
        }
    }

    /// 登録済みであることを確認し、登録日を返す
    ///
    /// # Errors
    ///
    /// 登録がない場合は `NotRegistered`
    pub fn ensure_registered(
        registration: Option<&EventRegistration>,
        user_id: &str,
    ) -> Result<Option<NaiveDate>, TeamError> {
        registration
            .map(|r| r.event_date)
            .ok_or_else(|| TeamError::NotRegistered(user_id.to_string()))
    }

    /// 登録があり、開催日が設定されていることを確認
    ///
    /// # Errors
    ///
    /// 登録または開催日がない場合は `NoEventDate`
    pub fn ensure_event_date(
        registration: Option<&EventRegistration>,
    ) -> Result<NaiveDate, TeamError> {
        registration
            .and_then(|r| r.event_date)
            .ok_or(TeamError::NoEventDate)
    }

    /// ユーザーを指定チームへ加えられるか検証
    ///
    /// # Arguments
    ///
    /// * `team` - 参加先チーム
    /// * `event` - 操作対象のイベント
    /// * `user_date` - ユーザーの登録日
    /// * `capacity` - チーム定員
    ///
    /// # Errors
    ///
    /// イベント違いは `DifferentEvent`、日付違いは `DateMismatch`、満員は `TeamFull`
    pub fn ensure_can_join(
        team: &Team,
        event: &str,
        user_date: Option<NaiveDate>,
        capacity: usize,
    ) -> Result<(), TeamError> {
        if team.event != event {
            return Err(TeamError::DifferentEvent);
        }
        if let Some(date) = user_date {
            if !team.accepts_date(date) {
                return Err(TeamError::DateMismatch);
            }
        }
        if team.is_full(capacity) {
            return Err(TeamError::TeamFull);
        }
        Ok(())
    }

    /// 2チームの統合結果を検証して返す
    ///
    /// # Returns
    ///
    /// (統合後のメンバー, 移動したメンバー数)
    ///
    /// # Errors
    ///
    /// 同一チーム、イベント違い、日付違い、定員超過の場合
    pub fn merge(
        source: &Team,
        target: &Team,
        capacity: usize,
    ) -> Result<(Vec<Member>, usize), TeamError> {
        if source.id == target.id {
            return Err(TeamError::SameTeam);
        }
        if source.event != target.event {
            return Err(TeamError::MergeDifferentEvent);
        }
        if source.event_date != target.event_date {
            return Err(TeamError::MergeDifferentDate);
        }

        let (merged, moved) = target.merged_members(source);
        if merged.len() > capacity {
            return Err(TeamError::MergeExceedsCapacity(capacity));
        }
        Ok((merged, moved))
    }
}
