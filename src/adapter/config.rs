//! Configuration
//!
//! JSON設定ファイルの読み込み

use anyhow::{Context, Result};
use chrono::{Duration, Timelike};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::application::dto::team_policy::TeamPolicy;
use crate::domain::services::slot_schedule::SlotSchedule;

/// 初期管理者アカウント
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DefaultAdmin {
    pub username: String,
    pub password: String,
}

impl Default for DefaultAdmin {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            password: "admin123".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub bind_address: String,
    /// 省略時はメモリ上のストアで動作する
    pub data_path: Option<String>,
    pub default_event: String,
    pub max_team_members: usize,
    pub min_new_team_size: usize,
    pub slot_schedule: SlotSchedule,
    pub default_admin: DefaultAdmin,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
            data_path: None,
            default_event: "escape-exe-ii".to_string(),
            max_team_members: 4,
            min_new_team_size: 2,
            slot_schedule: SlotSchedule::default(),
            default_admin: DefaultAdmin::default(),
        }
    }
}

impl Config {
    /// 設定ファイルを読み込む
    ///
    /// ファイルが存在しない場合は既定値を使用する
    pub fn load(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            warn!("Config file {} not found, using defaults", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;
        let config: Config =
            serde_json::from_str(&content).context("Failed to parse config JSON")?;
        config.validate()?;

        info!("Loaded config from {}", path);
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.max_team_members == 0 {
            anyhow::bail!("max_team_members must be at least 1");
        }
        if self.min_new_team_size > self.max_team_members {
            anyhow::bail!(
                "min_new_team_size ({}) exceeds max_team_members ({})",
                self.min_new_team_size,
                self.max_team_members
            );
        }
        self.validate_slot_schedule()
    }

    /// 枠は1つ以上、重複せず、同じ日のうちに収まること
    fn validate_slot_schedule(&self) -> Result<()> {
        let schedule = &self.slot_schedule;
        if schedule.count == 0 {
            anyhow::bail!("slot_schedule.count must be at least 1");
        }
        if schedule.teams_per_slot == 0 {
            anyhow::bail!("slot_schedule.teams_per_slot must be at least 1");
        }
        if schedule.interval_minutes == 0 && schedule.count > 1 {
            anyhow::bail!("slot_schedule.interval_minutes must be at least 1");
        }
        let span = Duration::minutes((schedule.count as i64 - 1) * schedule.interval_minutes as i64);
        let last = Duration::seconds(schedule.start.num_seconds_from_midnight() as i64) + span;
        if last >= Duration::days(1) {
            anyhow::bail!(
                "slot_schedule starting at {} with {} slots every {} minutes runs past midnight",
                schedule.start.format("%H:%M"),
                schedule.count,
                schedule.interval_minutes
            );
        }
        Ok(())
    }

    /// `~` を展開したデータファイルのパス
    pub fn resolved_data_path(&self) -> Option<PathBuf> {
        self.data_path
            .as_deref()
            .map(|p| PathBuf::from(shellexpand::tilde(p).as_ref()))
    }

    /// Use Case 用のルールに変換
    pub fn team_policy(&self) -> TeamPolicy {
        TeamPolicy::new(
            self.default_event.clone(),
            self.max_team_members,
            self.min_new_team_size,
            self.slot_schedule.clone(),
        )
    }
}
