//! # Team Entity
//!
//! チームのドメインエンティティ

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::Member;
use crate::domain::error::TeamError;

/// チーム
///
/// `leader_id` は常に `members` のいずれかを指す
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    pub name: String,
    pub leader_id: String,
    #[serde(default)]
    pub members: Vec<Member>,
    #[serde(default)]
    pub score: i64,
    pub event: String,
    #[serde(default)]
    pub event_date: Option<NaiveDate>,
    #[serde(default)]
    pub slot_time: Option<NaiveTime>,
    pub created_at: DateTime<Utc>,
}

impl Team {
    /// 新しいチームを作成
    ///
    /// # Arguments
    ///
    /// * `name` - チーム名
    /// * `leader` - リーダー（最初のメンバー）
    /// * `event` - イベントキー
    /// * `event_date` - 開催日
    pub fn new(
        name: impl Into<String>,
        leader: Member,
        event: impl Into<String>,
        event_date: Option<NaiveDate>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            leader_id: leader.id.clone(),
            members: vec![leader],
            score: 0,
            event: event.into(),
            event_date,
            slot_time: None,
            created_at: Utc::now(),
        }
    }

    /// 複数メンバーでチームを作成
    ///
    /// 先頭のメンバーがリーダーになる。メンバーが空の場合は `None`
    pub fn with_members(
        name: impl Into<String>,
        members: Vec<Member>,
        event: impl Into<String>,
        event_date: Option<NaiveDate>,
    ) -> Option<Self> {
        let mut iter = members.into_iter();
        let leader = iter.next()?;
        let mut team = Self::new(name, leader, event, event_date);
        team.members.extend(iter);
        Some(team)
    }

    /// スロット時刻を設定
    pub fn with_slot(mut self, slot_time: Option<NaiveTime>) -> Self {
        self.slot_time = slot_time;
        self
    }

    /// メンバー数を返す
    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// メンバーがいないかどうか
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn has_member(&self, user_id: &str) -> bool {
        self.members.iter().any(|m| m.id == user_id)
    }

    pub fn member(&self, user_id: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.id == user_id)
    }

    /// 現在のリーダーを返す
    pub fn leader(&self) -> Option<&Member> {
        self.member(&self.leader_id)
    }

    pub fn is_leader(&self, user_id: &str) -> bool {
        self.leader_id == user_id
    }

    /// 空き枠数を返す
    pub fn open_slots(&self, capacity: usize) -> usize {
        capacity.saturating_sub(self.members.len())
    }

    pub fn is_full(&self, capacity: usize) -> bool {
        self.open_slots(capacity) == 0
    }

    /// 指定日の参加者を受け入れられるか
    ///
    /// 開催日が未設定のチームはどの日付も受け入れる
    pub fn accepts_date(&self, date: NaiveDate) -> bool {
        self.event_date.map_or(true, |d| d == date)
    }

    /// メンバーを追加
    ///
    /// # Errors
    ///
    /// 既にメンバーの場合は `AlreadyInTeam`、定員に達している場合は `TeamFull`
    pub fn add_member(&mut self, member: Member, capacity: usize) -> Result<(), TeamError> {
        if self.has_member(&member.id) {
            return Err(TeamError::AlreadyInTeam);
        }
        if self.is_full(capacity) {
            return Err(TeamError::TeamFull);
        }
        self.members.push(member);
        Ok(())
    }

    /// メンバーを削除
    ///
    /// # Errors
    ///
    /// メンバーでない場合に `NotAMember` を返す
    pub fn remove_member(&mut self, user_id: &str) -> Result<Member, TeamError> {
        let index = self
            .members
            .iter()
            .position(|m| m.id == user_id)
            .ok_or(TeamError::NotAMember)?;
        Ok(self.members.remove(index))
    }

    /// リーダーを変更
    ///
    /// # Returns
    ///
    /// 以前のリーダー（メンバーに残っていれば）
    ///
    /// # Errors
    ///
    /// 新リーダーがメンバーでない場合は `LeaderMustBeMember`、
    /// 既にリーダーの場合は `AlreadyLeader`
    pub fn set_leader(&mut self, user_id: &str) -> Result<Option<Member>, TeamError> {
        if !self.has_member(user_id) {
            return Err(TeamError::LeaderMustBeMember);
        }
        if self.is_leader(user_id) {
            return Err(TeamError::AlreadyLeader);
        }
        let previous = self.leader().cloned();
        self.leader_id = user_id.to_string();
        Ok(previous)
    }

    /// 他チームのメンバーを取り込んだ結果を返す（重複は除外）
    ///
    /// # Returns
    ///
    /// (統合後のメンバー, 新たに加わったメンバー数)
    pub fn merged_members(&self, other: &Team) -> (Vec<Member>, usize) {
        let incoming: Vec<Member> = other
            .members
            .iter()
            .filter(|m| !self.has_member(&m.id))
            .cloned()
            .collect();
        let added = incoming.len();
        let mut merged = self.members.clone();
        merged.extend(incoming);
        (merged, added)
    }
}
