//! Workflow Orchestration
//!
//! サブコマンドごとのワークフロー

use anyhow::{Context, Result};
use log::info;

use std::sync::Arc;

use crate::adapter::config::Config;
use crate::adapter::repositories::json_data_store::JsonDataStore;
use crate::application::dto::commands::GenerateTeamsCommand;
use crate::application::use_cases::admin_auth::SetupOutcome;
use crate::application::use_cases::import_registrations::RegistrationRecord;
use crate::application::use_cases::random_pool::GenerateOutcome;

use super::cli::Command;
use super::http::{self, AppState};

/// Team Formation Workflow
pub struct TeamForgeWorkflow {
    config: Config,
    state: AppState,
}

impl TeamForgeWorkflow {
    /// 設定とストアからワークフローを組み立てる
    pub fn new(config: Config, store: Arc<JsonDataStore>) -> Self {
        let state = AppState::from_config(store, &config);
        Self { config, state }
    }

    /// サブコマンドを実行
    pub async fn execute(&self, command: Command) -> Result<()> {
        match command {
            Command::Serve { bind } => {
                let address = bind.unwrap_or_else(|| self.config.bind_address.clone());
                println!("✓ Using configuration:");
                println!("  Event: {}", self.config.default_event);
                println!("  Max team members: {}", self.config.max_team_members);
                match self.config.resolved_data_path() {
                    Some(path) => println!("  Data file: {}", path.display()),
                    None => println!("⚠ No data_path configured, data will not be persisted"),
                }
                info!("Starting server on {}", address);
                http::serve(self.state.clone(), &address).await
            }
            Command::SetupAdmin => self.setup_admin().await,
            Command::CheckDb => self.check_db().await,
            Command::PoolStats { event } => self.pool_stats(event.as_deref()).await,
            Command::Allocate {
                event,
                team_size,
                dry_run,
            } => self.allocate(event, team_size, dry_run).await.map(|_| ()),
            Command::ImportRegistrations { file } => self.import_registrations(&file).await,
        }
    }

    async fn setup_admin(&self) -> Result<()> {
        let admin = self.state.default_admin();
        match self
            .state
            .admin_auth()
            .setup_default(&admin.username, &admin.password)
            .await?
        {
            SetupOutcome::Created { username, .. } => {
                println!("✓ Created default admin '{}'", username);
                println!("⚠ Change the default password after the first login");
            }
            SetupOutcome::Exists { count } => {
                println!("✓ {} admin account(s) already exist, nothing to do", count);
            }
        }
        Ok(())
    }

    async fn check_db(&self) -> Result<()> {
        let health = self.state.check_db().execute().await?;
        println!("✓ Data store reachable");
        println!("  Admins: {}", health.admins);
        println!("  Users: {}", health.users);
        println!("  Teams: {}", health.teams);
        println!("  Queued: {}", health.queued);
        Ok(())
    }

    async fn pool_stats(&self, event: Option<&str>) -> Result<()> {
        let stats = self.state.random_pool().stats(event).await?;
        println!(
            "✓ {} participant(s) waiting for {} ({} full team(s) possible)",
            stats.count, stats.event, stats.groups_available
        );
        Ok(())
    }

    /// プールからチームを生成し、結果を表示する
    pub async fn allocate(
        &self,
        event: Option<String>,
        team_size: Option<usize>,
        dry_run: bool,
    ) -> Result<GenerateOutcome> {
        let command = GenerateTeamsCommand { team_size, event };
        let outcome = self.state.random_pool().generate(&command, dry_run).await?;

        if outcome.dry_run {
            println!("✓ Dry-run mode (nothing written)");
        }
        println!(
            "✓ Placed {} participant(s) for {} (team size {})",
            outcome.placed, outcome.event, outcome.team_size
        );
        for team_id in &outcome.created_team_ids {
            println!("    - New team: {}", team_id);
        }
        for assignment in &outcome.assigned_to_existing {
            println!(
                "    - {} joined {}",
                assignment.added.join(", "),
                assignment.team_id
            );
        }
        if !outcome.leftovers.is_empty() {
            println!(
                "⚠ {} participant(s) left in the pool: {}",
                outcome.leftovers.len(),
                outcome.leftovers.join(", ")
            );
        }
        if !outcome.removed_stale.is_empty() {
            println!(
                "✓ Removed {} stale pool entr(ies)",
                outcome.removed_stale.len()
            );
        }
        for failure in &outcome.failed {
            println!(
                "⚠ Failed to place {}: {}",
                failure.users.join(", "),
                failure.error
            );
        }
        Ok(outcome)
    }

    async fn import_registrations(&self, file: &str) -> Result<()> {
        let content = tokio::fs::read_to_string(file)
            .await
            .with_context(|| format!("Failed to read registrations file: {}", file))?;
        let records: Vec<RegistrationRecord> =
            serde_json::from_str(&content).context("Failed to parse registrations JSON")?;
        println!("✓ Read {} record(s) from {}", records.len(), file);

        let summary = self.state.import_registrations().execute(&records).await?;
        println!(
            "✓ Imported {} registration(s), created {} profile(s)",
            summary.registrations, summary.users_created
        );
        if summary.skipped > 0 {
            println!("⚠ Skipped {} record(s) without id or email", summary.skipped);
        }
        Ok(())
    }
}
