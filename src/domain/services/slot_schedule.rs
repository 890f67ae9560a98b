//! # Slot Schedule Service
//!
//! 開催日ごとの時間枠（スロット）と枠あたりのチーム数上限

use chrono::{Duration, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::domain::entities::team::Team;
use crate::domain::error::TeamError;

/// スロットスケジュール
///
/// `start` から `interval_minutes` 間隔で `count` 個の枠を持ち、
/// 各枠には最大 `teams_per_slot` チームが入れる
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotSchedule {
    #[serde(default = "default_start")]
    pub start: NaiveTime,
    #[serde(default = "default_count")]
    pub count: usize,
    #[serde(default = "default_interval")]
    pub interval_minutes: u32,
    #[serde(default = "default_teams_per_slot")]
    pub teams_per_slot: usize,
}

fn default_start() -> NaiveTime {
    NaiveTime::from_hms_opt(11, 0, 0).unwrap_or(NaiveTime::MIN)
}

fn default_count() -> usize {
    16
}

fn default_interval() -> u32 {
    30
}

fn default_teams_per_slot() -> usize {
    2
}

impl Default for SlotSchedule {
    fn default() -> Self {
        Self {
            start: default_start(),
            count: default_count(),
            interval_minutes: default_interval(),
            teams_per_slot: default_teams_per_slot(),
        }
    }
}

impl SlotSchedule {
    /// すべての枠の開始時刻を返す
    pub fn slots(&self) -> Vec<NaiveTime> {
        (0..self.count)
            .map(|i| self.start + Duration::minutes(i as i64 * self.interval_minutes as i64))
            .collect()
    }

    pub fn contains(&self, slot: NaiveTime) -> bool {
        self.slots().contains(&slot)
    }

    /// 枠を使用しているチーム数
    ///
    /// `teams` は同じ開催日のチームであること
    pub fn usage(&self, slot: NaiveTime, teams: &[Team]) -> usize {
        teams
            .iter()
            .filter(|t| t.slot_time == Some(slot))
            .count()
    }

    /// 空きのある枠を返す
    pub fn available_slots(&self, teams: &[Team]) -> Vec<NaiveTime> {
        self.slots()
            .into_iter()
            .filter(|slot| self.usage(*slot, teams) < self.teams_per_slot)
            .collect()
    }

    /// 最初に空いている枠
    pub fn first_available(&self, teams: &[Team]) -> Option<NaiveTime> {
        self.available_slots(teams).into_iter().next()
    }

    /// 枠を予約できることを確認
    ///
    /// # Errors
    ///
    /// スケジュール外の時刻は `InvalidSlot`、満杯の枠は `SlotFull`
    pub fn ensure_bookable(&self, slot: NaiveTime, teams: &[Team]) -> Result<(), TeamError> {
        let label = format_slot(slot);
        if !self.contains(slot) {
            return Err(TeamError::InvalidSlot(label));
        }
        if self.usage(slot, teams) >= self.teams_per_slot {
            return Err(TeamError::SlotFull(label));
        }
        Ok(())
    }
}

/// 枠の表示形式 ("HH:MM")
pub fn format_slot(slot: NaiveTime) -> String {
    slot.format("%H:%M").to_string()
}

/// "HH:MM" または "HH:MM:SS" 形式の時刻を解釈
pub fn parse_slot_time(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::user::Member;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn team_at(slot: NaiveTime) -> Team {
        Team::new("T", Member::new("u", "n", "e"), "e", None).with_slot(Some(slot))
    }

    #[test]
    fn test_default_slots() {
        let schedule = SlotSchedule::default();
        let slots = schedule.slots();

        assert_eq!(slots.len(), 16);
        assert_eq!(slots[0], time(11, 0));
        assert_eq!(slots[1], time(11, 30));
        assert_eq!(slots[15], time(18, 30));
    }

    #[test]
    fn test_available_slots_excludes_full() {
        let schedule = SlotSchedule::default();
        let teams = vec![team_at(time(11, 0)), team_at(time(11, 0)), team_at(time(11, 30))];

        let available = schedule.available_slots(&teams);

        assert_eq!(available.len(), 15);
        assert_eq!(available[0], time(11, 30));
        assert_eq!(schedule.first_available(&teams), Some(time(11, 30)));
    }

    #[test]
    fn test_ensure_bookable() {
        let schedule = SlotSchedule::default();
        let teams = vec![team_at(time(11, 0)), team_at(time(11, 0))];

        assert!(schedule.ensure_bookable(time(12, 0), &teams).is_ok());
        assert_eq!(
            schedule.ensure_bookable(time(11, 0), &teams),
            Err(TeamError::SlotFull("11:00".to_string()))
        );
        assert_eq!(
            schedule.ensure_bookable(time(11, 15), &teams),
            Err(TeamError::InvalidSlot("11:15".to_string()))
        );
    }

    #[test]
    fn test_error_uses_listed_slot_format() {
        let schedule = SlotSchedule::default();
        let teams = vec![team_at(time(11, 0)), team_at(time(11, 0))];
        let listed: Vec<String> = schedule.slots().into_iter().map(format_slot).collect();

        let err = schedule.ensure_bookable(time(11, 0), &teams).unwrap_err();
        assert!(listed.contains(&"11:00".to_string()));
        assert_eq!(err.to_string(), "Slot 11:00 is already full.");

        let err = schedule
            .ensure_bookable(parse_slot_time("09:15:00").unwrap(), &teams)
            .unwrap_err();
        assert_eq!(err, TeamError::InvalidSlot("09:15".to_string()));
    }

    #[test]
    fn test_parse_slot_time() {
        assert_eq!(parse_slot_time("11:30"), Some(time(11, 30)));
        assert_eq!(parse_slot_time("11:30:00"), Some(time(11, 30)));
        assert_eq!(parse_slot_time("eleven"), None);
    }
}
