//! Workflow Integration Tests
//!
//! TeamForgeWorkflow の統合テスト（ファイルに永続化されるストアを使用）

use std::fs;
use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use tempfile::TempDir;

use teamforge::adapter::config::Config;
use teamforge::adapter::repositories::json_data_store::JsonDataStore;
use teamforge::domain::entities::pool_entry::PoolEntry;
use teamforge::domain::entities::user::User;
use teamforge::domain::repositories::pool_repository::PoolRepository;
use teamforge::driver::cli::Command;
use teamforge::driver::workflow::TeamForgeWorkflow;

/// テスト用の登録ファイルを作成
fn create_registrations(dir: &Path, count: usize) -> String {
    let records: Vec<serde_json::Value> = (1..=count)
        .map(|i| {
            serde_json::json!({
                "userId": format!("u{}", i),
                "userEmail": format!("u{}@example.com", i),
                "eventDate": "2025-09-26",
                "name": format!("User {}", i),
            })
        })
        .collect();
    let path = dir.join("registrations.json");
    fs::write(&path, serde_json::to_string(&records).unwrap()).unwrap();
    path.to_string_lossy().to_string()
}

async fn open_workflow(data_path: &Path) -> (TeamForgeWorkflow, Arc<JsonDataStore>) {
    let store = Arc::new(JsonDataStore::open(data_path).await.unwrap());
    (
        TeamForgeWorkflow::new(Config::default(), store.clone()),
        store,
    )
}

async fn queue_all(store: &JsonDataStore, count: usize) {
    let date = NaiveDate::from_ymd_opt(2025, 9, 26).unwrap();
    for i in 1..=count {
        let user = User::new(format!("u{}", i), format!("User {}", i), format!("u{}@example.com", i));
        store
            .upsert(&PoolEntry::for_user(&user, "escape-exe-ii", date))
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn test_import_and_allocate_persist_to_file() {
    let temp_dir = TempDir::new().unwrap();
    let data_path = temp_dir.path().join("data.json");
    let registrations = create_registrations(temp_dir.path(), 5);

    {
        let (workflow, store) = open_workflow(&data_path).await;
        workflow
            .execute(Command::ImportRegistrations {
                file: registrations,
            })
            .await
            .unwrap();
        queue_all(&store, 5).await;

        let outcome = workflow.allocate(None, Some(2), false).await.unwrap();
        assert_eq!(outcome.team_size, 2);
        assert_eq!(outcome.created_team_ids.len(), 2);
        assert_eq!(outcome.placed, 4);
        // 2人に満たない残りはプールに残る
        assert_eq!(outcome.leftovers, vec!["u5".to_string()]);
    }

    // 開き直してもデータが残っている
    let (workflow, store) = open_workflow(&data_path).await;
    let data = store.snapshot().await;
    assert_eq!(data.registrations.len(), 5);
    assert_eq!(data.users.len(), 5);
    assert_eq!(data.teams.len(), 2);
    assert_eq!(data.random_pool.len(), 1);
    for team in &data.teams {
        assert_eq!(team.members.len(), 2);
        assert_eq!(team.leader_id, team.members[0].id);
    }

    workflow.execute(Command::CheckDb).await.unwrap();
    workflow
        .execute(Command::PoolStats { event: None })
        .await
        .unwrap();
}

#[tokio::test]
async fn test_allocate_dry_run_writes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let data_path = temp_dir.path().join("data.json");
    let registrations = create_registrations(temp_dir.path(), 4);

    let (workflow, store) = open_workflow(&data_path).await;
    workflow
        .execute(Command::ImportRegistrations {
            file: registrations,
        })
        .await
        .unwrap();
    queue_all(&store, 4).await;

    workflow
        .execute(Command::Allocate {
            event: None,
            team_size: None,
            dry_run: true,
        })
        .await
        .unwrap();

    let data = store.snapshot().await;
    assert!(data.teams.is_empty());
    assert_eq!(data.random_pool.len(), 4);
}

#[tokio::test]
async fn test_allocate_empty_pool_fails() {
    let temp_dir = TempDir::new().unwrap();
    let (workflow, _) = open_workflow(&temp_dir.path().join("data.json")).await;

    let err = workflow.allocate(None, None, false).await.unwrap_err();
    assert_eq!(err.to_string(), "No users in random pool to assign.");
}
