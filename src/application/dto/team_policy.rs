//! # Team Policy DTO
//!
//! チーム編成ルールの設定値

use crate::domain::services::slot_schedule::SlotSchedule;

/// チーム編成ルール
///
/// Use Case が参照する定員・既定イベント・スロット設定
#[derive(Debug, Clone)]
pub struct TeamPolicy {
    /// 既定のイベントキー
    pub default_event: String,
    /// チーム定員
    pub max_team_members: usize,
    /// ランダム割り当てで新規作成するチームの最小人数
    pub min_new_team_size: usize,
    /// スロットスケジュール
    pub schedule: SlotSchedule,
}

impl TeamPolicy {
    /// 新しいルールを作成します。
    ///
    /// # 例
    ///
    /// ```
    /// use teamforge::application::dto::team_policy::TeamPolicy;
    /// use teamforge::domain::services::slot_schedule::SlotSchedule;
    ///
    /// let policy = TeamPolicy::new("escape-exe-ii".to_string(), 4, 2, SlotSchedule::default());
    ///
    /// assert_eq!(policy.max_team_members, 4);
    /// assert_eq!(policy.event_or_default(None), "escape-exe-ii");
    /// assert_eq!(policy.event_or_default(Some("code-a-thon")), "code-a-thon");
    /// ```
    pub fn new(
        default_event: String,
        max_team_members: usize,
        min_new_team_size: usize,
        schedule: SlotSchedule,
    ) -> Self {
        Self {
            default_event,
            max_team_members,
            min_new_team_size,
            schedule,
        }
    }

    /// 指定がなければ既定イベントを返す（空文字も未指定扱い）
    pub fn event_or_default(&self, event: Option<&str>) -> String {
        match event.map(str::trim) {
            Some(e) if !e.is_empty() => e.to_string(),
            _ => self.default_event.clone(),
        }
    }
}

impl Default for TeamPolicy {
    fn default() -> Self {
        Self::new("escape-exe-ii".to_string(), 4, 2, SlotSchedule::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = TeamPolicy::default();

        assert_eq!(policy.default_event, "escape-exe-ii");
        assert_eq!(policy.max_team_members, 4);
        assert_eq!(policy.min_new_team_size, 2);
        assert_eq!(policy.schedule.teams_per_slot, 2);
    }

    #[test]
    fn test_event_or_default_treats_blank_as_missing() {
        let policy = TeamPolicy::default();
        assert_eq!(policy.event_or_default(Some("  ")), "escape-exe-ii");
    }
}
