//! Teamforge - Team Formation Server
//!
//! チーム編成サーバーと管理コマンド

// coverage_nightly cfg が設定されている場合のみ coverage_attribute を有効化
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use log::info;

use teamforge::adapter::config::Config;
use teamforge::adapter::repositories::json_data_store::JsonDataStore;
use teamforge::driver::{Args, TeamForgeWorkflow};

#[cfg_attr(coverage_nightly, coverage(off))]
#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();

    // Load configuration
    let config = Config::load(&args.config)?;

    let store = match config.resolved_data_path() {
        Some(path) => {
            info!("Using data file {}", path.display());
            JsonDataStore::open(path).await?
        }
        None => JsonDataStore::in_memory(),
    };

    // Create workflow with injected dependencies
    let workflow = TeamForgeWorkflow::new(config, Arc::new(store));

    workflow.execute(args.command()).await
}
