//! # Pool Allocator Service
//!
//! ランダムプールの参加者をチームに割り当てる計画を作成する
//!
//! 計画の作成は純粋な処理で、永続化は Use Case 側で行う。
//! 同じ入力からは常に同じ計画が得られる。

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::NaiveDate;

use super::slot_schedule::SlotSchedule;
use crate::domain::entities::pool_entry::PoolEntry;
use crate::domain::entities::team::Team;
use crate::domain::entities::user::{Member, User};

/// 割り当ての入力
#[derive(Debug, Clone, Copy)]
pub struct AllocationInput<'a> {
    /// 対象イベント
    pub event: &'a str,
    /// 対象イベントのプールエントリ
    pub pool: &'a [PoolEntry],
    /// プール参加者のプロフィール（IDで引く）
    pub users: &'a HashMap<String, User>,
    /// 対象イベントの既存チーム
    pub teams: &'a [Team],
    /// いずれかのチームに所属済みのユーザーID（全イベント）
    pub assigned_user_ids: &'a HashSet<String>,
    /// 1チームの目標人数
    pub team_size: usize,
    /// 新規チームの最小人数
    pub min_new_team_size: usize,
    pub schedule: &'a SlotSchedule,
}

/// 既存チームへの追加
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamFill {
    pub team_id: String,
    pub added: Vec<Member>,
}

/// 割り当て計画
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllocationPlan {
    /// 既存チームへの追加
    pub fills: Vec<TeamFill>,
    /// 新規作成するチーム
    pub new_teams: Vec<Team>,
    /// プールに残る参加者
    pub leftovers: Vec<PoolEntry>,
    /// 既にチームに所属していたためプールから外す参加者
    pub stale: Vec<PoolEntry>,
    /// プロフィールが見つからない参加者
    pub unknown: Vec<PoolEntry>,
}

impl AllocationPlan {
    /// 計画で配置される人数
    pub fn placed_count(&self) -> usize {
        self.fills.iter().map(|f| f.added.len()).sum::<usize>()
            + self.new_teams.iter().map(|t| t.len()).sum::<usize>()
    }
}

/// 割り当てサービス
pub struct PoolAllocator;

impl PoolAllocator {
    /// 目標人数を `[min_new_team_size, capacity]` に収める
    pub fn effective_team_size(
        requested: Option<usize>,
        capacity: usize,
        min_new_team_size: usize,
    ) -> usize {
        requested
            .unwrap_or(capacity)
            .min(capacity)
            .max(min_new_team_size.min(capacity))
    }

    /// 割り当て計画を作成
    ///
    /// 1. プロフィールのない参加者と所属済みの参加者を除外
    /// 2. 開催日ごとに登録順で並べる
    /// 3. 同じ開催日の既存チームの空き枠を作成日時順に埋める
    /// 4. 残りを目標人数ごとに新規チームにまとめる（最小人数未満の端数はプールに残す）
    ///
    /// 新規チームのリーダーは最も早く登録した参加者。スロットは同日の空き枠の先頭
    pub fn plan(input: AllocationInput<'_>) -> AllocationPlan {
        let mut plan = AllocationPlan::default();

        let mut ordered: Vec<&PoolEntry> = input.pool.iter().collect();
        ordered.sort_by(|a, b| {
            a.queued_at
                .cmp(&b.queued_at)
                .then_with(|| a.user_id.cmp(&b.user_id))
        });

        let mut seen = HashSet::new();
        let mut by_date: BTreeMap<NaiveDate, Vec<Member>> = BTreeMap::new();
        let mut entries: HashMap<String, PoolEntry> = HashMap::new();

        for entry in ordered {
            if !seen.insert(entry.user_id.clone()) {
                continue;
            }
            if input.assigned_user_ids.contains(&entry.user_id) {
                plan.stale.push(entry.clone());
                continue;
            }
            let Some(user) = input.users.get(&entry.user_id) else {
                plan.unknown.push(entry.clone());
                continue;
            };
            by_date
                .entry(entry.event_date)
                .or_default()
                .push(user.to_member());
            entries.insert(entry.user_id.clone(), entry.clone());
        }

        let mut teams: Vec<&Team> = input
            .teams
            .iter()
            .filter(|t| t.event == input.event)
            .collect();
        teams.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));

        for (date, queue) in by_date {
            let mut queue = queue.into_iter();

            let dated: Vec<&Team> = teams
                .iter()
                .copied()
                .filter(|t| t.event_date == Some(date))
                .collect();

            for team in &dated {
                let open = team.open_slots(input.team_size);
                if open == 0 {
                    continue;
                }
                let added: Vec<Member> = queue.by_ref().take(open).collect();
                if added.is_empty() {
                    break;
                }
                plan.fills.push(TeamFill {
                    team_id: team.id.clone(),
                    added,
                });
            }

            let remaining: Vec<Member> = queue.collect();
            let mut scheduled: Vec<Team> = dated.into_iter().cloned().collect();
            let mut index = 0;

            for chunk in remaining.chunks(input.team_size.max(1)) {
                if chunk.len() < input.min_new_team_size {
                    plan.leftovers.extend(
                        chunk
                            .iter()
                            .filter_map(|m| entries.get(&m.id).cloned()),
                    );
                    continue;
                }
                index += 1;
                let name = format!("Random Team {} #{}", date.format("%m%d"), index);
                let slot = input.schedule.first_available(&scheduled);
                let Some(team) =
                    Team::with_members(name, chunk.to_vec(), input.event, Some(date))
                else {
                    continue;
                };
                let team = team.with_slot(slot);
                scheduled.push(team.clone());
                plan.new_teams.push(team);
            }
        }

        plan
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveTime, TimeZone, Utc};

    const EVENT: &str = "escape-exe-ii";

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, d).unwrap()
    }

    fn user(id: &str) -> User {
        User::new(id, format!("name-{}", id), format!("{}@example.com", id))
    }

    fn entry(id: &str, d: NaiveDate, order: i64) -> PoolEntry {
        let mut e = PoolEntry::for_user(&user(id), EVENT, d);
        e.queued_at = Utc.with_ymd_and_hms(2025, 9, 1, 9, 0, 0).unwrap() + Duration::seconds(order);
        e
    }

    fn users(ids: &[&str]) -> HashMap<String, User> {
        ids.iter().map(|id| (id.to_string(), user(id))).collect()
    }

    fn team(ids: &[&str], d: NaiveDate, order: i64) -> Team {
        let members = ids.iter().map(|id| user(id).to_member()).collect();
        let mut t = Team::with_members("Existing", members, EVENT, Some(d)).unwrap();
        t.created_at = Utc.with_ymd_and_hms(2025, 8, 1, 9, 0, 0).unwrap() + Duration::seconds(order);
        t
    }

    fn run(
        pool: &[PoolEntry],
        known: &HashMap<String, User>,
        teams: &[Team],
        assigned: &HashSet<String>,
        team_size: usize,
    ) -> AllocationPlan {
        let schedule = SlotSchedule::default();
        PoolAllocator::plan(AllocationInput {
            event: EVENT,
            pool,
            users: known,
            teams,
            assigned_user_ids: assigned,
            team_size,
            min_new_team_size: 2,
            schedule: &schedule,
        })
    }

    #[test]
    fn test_effective_team_size() {
        assert_eq!(PoolAllocator::effective_team_size(None, 4, 2), 4);
        assert_eq!(PoolAllocator::effective_team_size(Some(3), 4, 2), 3);
        assert_eq!(PoolAllocator::effective_team_size(Some(10), 4, 2), 4);
        assert_eq!(PoolAllocator::effective_team_size(Some(1), 4, 2), 2);
        assert_eq!(PoolAllocator::effective_team_size(Some(0), 1, 2), 1);
    }

    #[test]
    fn test_new_teams_are_chunked_in_queue_order() {
        let pool: Vec<PoolEntry> = ["a", "b", "c", "d", "e", "f"]
            .iter()
            .enumerate()
            .map(|(i, id)| entry(id, date(26), i as i64))
            .collect();
        let known = users(&["a", "b", "c", "d", "e", "f"]);

        let plan = run(&pool, &known, &[], &HashSet::new(), 4);

        assert_eq!(plan.new_teams.len(), 2);
        assert_eq!(plan.new_teams[0].len(), 4);
        assert_eq!(plan.new_teams[0].leader_id, "a");
        assert_eq!(plan.new_teams[1].len(), 2);
        assert_eq!(plan.new_teams[1].leader_id, "e");
        assert!(plan.leftovers.is_empty());
        assert_eq!(plan.placed_count(), 6);
    }

    #[test]
    fn test_single_remainder_stays_in_pool() {
        let pool: Vec<PoolEntry> = ["a", "b", "c", "d", "e"]
            .iter()
            .enumerate()
            .map(|(i, id)| entry(id, date(26), i as i64))
            .collect();
        let known = users(&["a", "b", "c", "d", "e"]);

        let plan = run(&pool, &known, &[], &HashSet::new(), 4);

        assert_eq!(plan.new_teams.len(), 1);
        assert_eq!(plan.leftovers.len(), 1);
        assert_eq!(plan.leftovers[0].user_id, "e");
    }

    #[test]
    fn test_existing_teams_are_filled_first_on_same_date() {
        let existing = team(&["x1", "x2"], date(26), 0);
        let other_day = team(&["y1"], date(27), 1);
        let pool = vec![
            entry("a", date(26), 0),
            entry("b", date(26), 1),
            entry("c", date(26), 2),
        ];
        let known = users(&["a", "b", "c"]);

        let plan = run(&pool, &known, &[existing.clone(), other_day], &HashSet::new(), 4);

        assert_eq!(plan.fills.len(), 1);
        assert_eq!(plan.fills[0].team_id, existing.id);
        let added: Vec<&str> = plan.fills[0].added.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(added, vec!["a", "b"]);
        assert!(plan.new_teams.is_empty());
        assert_eq!(plan.leftovers.len(), 1);
        assert_eq!(plan.leftovers[0].user_id, "c");
    }

    #[test]
    fn test_dates_are_never_mixed() {
        let pool = vec![
            entry("a", date(26), 0),
            entry("b", date(27), 1),
            entry("c", date(26), 2),
            entry("d", date(27), 3),
        ];
        let known = users(&["a", "b", "c", "d"]);

        let plan = run(&pool, &known, &[], &HashSet::new(), 4);

        assert_eq!(plan.new_teams.len(), 2);
        for t in &plan.new_teams {
            let d = t.event_date.unwrap();
            for m in &t.members {
                let queued = pool.iter().find(|p| p.user_id == m.id).unwrap();
                assert_eq!(queued.event_date, d);
            }
        }
    }

    #[test]
    fn test_stale_and_unknown_entries_are_reported() {
        let pool = vec![
            entry("a", date(26), 0),
            entry("ghost", date(26), 1),
            entry("b", date(26), 2),
            entry("c", date(26), 3),
        ];
        let known = users(&["a", "b", "c"]);
        let assigned: HashSet<String> = ["a".to_string()].into_iter().collect();

        let plan = run(&pool, &known, &[], &assigned, 4);

        assert_eq!(plan.stale.len(), 1);
        assert_eq!(plan.stale[0].user_id, "a");
        assert_eq!(plan.unknown.len(), 1);
        assert_eq!(plan.unknown[0].user_id, "ghost");
        assert_eq!(plan.new_teams.len(), 1);
        assert_eq!(plan.new_teams[0].leader_id, "b");
    }

    #[test]
    fn test_new_teams_take_free_slots() {
        let mut busy_a = team(&["x1", "x2", "x3", "x4"], date(26), 0);
        busy_a.slot_time = NaiveTime::from_hms_opt(11, 0, 0);
        let mut busy_b = team(&["y1", "y2", "y3", "y4"], date(26), 1);
        busy_b.slot_time = NaiveTime::from_hms_opt(11, 0, 0);

        let pool: Vec<PoolEntry> = ["a", "b", "c", "d"]
            .iter()
            .enumerate()
            .map(|(i, id)| entry(id, date(26), i as i64))
            .collect();
        let known = users(&["a", "b", "c", "d"]);

        let plan = run(&pool, &known, &[busy_a, busy_b], &HashSet::new(), 2);

        assert_eq!(plan.new_teams.len(), 2);
        assert_eq!(plan.new_teams[0].slot_time, NaiveTime::from_hms_opt(11, 30, 0));
        assert_eq!(plan.new_teams[1].slot_time, NaiveTime::from_hms_opt(11, 30, 0));
    }

    #[test]
    fn test_empty_pool_yields_empty_plan() {
        let plan = run(&[], &HashMap::new(), &[], &HashSet::new(), 4);
        assert_eq!(plan, AllocationPlan::default());
    }
}
