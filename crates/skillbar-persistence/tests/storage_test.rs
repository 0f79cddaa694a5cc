//! Storage backends driven through `UsageStore`

use pretty_assertions::assert_eq;
use skillbar_core::{Skill, UsageStorage, UsageStore};
use skillbar_persistence::{JsonUsageStorage, SqliteUsageStorage};
use skillbar_types::UsageRecord;
use std::sync::Arc;

const T: i64 = 1_700_000_000_000;

async fn sqlite(dir: &tempfile::TempDir) -> SqliteUsageStorage {
    let path = dir.path().join("usage.db");
    SqliteUsageStorage::new(path.to_str().unwrap()).await.unwrap()
}

#[tokio::test]
async fn test_sqlite_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let storage = sqlite(&dir).await;

    storage
        .save(&[UsageRecord::new("commit", T, 2), UsageRecord::new("test", T, 1)])
        .await
        .unwrap();

    assert_eq!(
        storage.load().await.unwrap(),
        vec![UsageRecord::new("commit", T, 2), UsageRecord::new("test", T, 1)]
    );
}

#[tokio::test]
async fn test_sqlite_stale_write_does_not_clobber_newer_row() {
    let dir = tempfile::tempdir().unwrap();
    let storage = sqlite(&dir).await;

    storage.save(&[UsageRecord::new("commit", T + 10, 5)]).await.unwrap();
    storage.save(&[UsageRecord::new("commit", T, 4)]).await.unwrap();

    assert_eq!(
        storage.load().await.unwrap(),
        vec![UsageRecord::new("commit", T + 10, 5)]
    );
}

#[tokio::test]
async fn test_sqlite_equal_timestamp_keeps_higher_count() {
    let dir = tempfile::tempdir().unwrap();
    let storage = sqlite(&dir).await;

    storage.save(&[UsageRecord::new("commit", T, 2)]).await.unwrap();
    storage.save(&[UsageRecord::new("commit", T, 1)]).await.unwrap();
    assert_eq!(
        storage.load().await.unwrap(),
        vec![UsageRecord::new("commit", T, 2)]
    );

    storage.save(&[UsageRecord::new("commit", T, 3)]).await.unwrap();
    assert_eq!(
        storage.load().await.unwrap(),
        vec![UsageRecord::new("commit", T, 3)]
    );
}

#[tokio::test]
async fn test_json_equal_timestamp_keeps_higher_count() {
    let dir = tempfile::tempdir().unwrap();
    let storage = JsonUsageStorage::new(dir.path().join("skill-usage.json"));

    storage.save(&[UsageRecord::new("commit", T, 2)]).await.unwrap();
    storage.save(&[UsageRecord::new("commit", T, 1)]).await.unwrap();

    assert_eq!(
        storage.load().await.unwrap(),
        vec![UsageRecord::new("commit", T, 2)]
    );
}

#[tokio::test]
async fn test_sqlite_keeps_rows_missing_from_payload() {
    let dir = tempfile::tempdir().unwrap();
    let storage = sqlite(&dir).await;

    storage.save(&[UsageRecord::new("docs", T, 1)]).await.unwrap();
    storage.save(&[UsageRecord::new("commit", T, 1)]).await.unwrap();

    assert_eq!(storage.load().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_sqlite_creates_missing_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a").join("b").join("usage.db");
    let storage = SqliteUsageStorage::new(path.to_str().unwrap()).await.unwrap();
    assert!(storage.load().await.unwrap().is_empty());
    assert!(path.exists());
}

#[tokio::test]
async fn test_usage_survives_restart_with_json_backend() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("skill-usage.json");
    let skills = vec![Skill::new("a"), Skill::new("b"), Skill::new("c")];

    {
        let store = UsageStore::load(Arc::new(JsonUsageStorage::new(&path))).await;
        store.record_usage_at("c", T);
        store.record_usage_at("b", T + 1);
        store.persist().await.unwrap();
    }

    let store = UsageStore::load(Arc::new(JsonUsageStorage::new(&path))).await;
    let order: Vec<&str> = store
        .sorted_skills(&skills)
        .into_iter()
        .map(|s| s.name.as_str())
        .collect();
    assert_eq!(order, vec!["b", "c", "a"]);
}

#[tokio::test]
async fn test_two_stores_share_sqlite_history() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("usage.db");
    let path = path.to_str().unwrap();

    let first = UsageStore::load(Arc::new(SqliteUsageStorage::new(path).await.unwrap())).await;
    let second = UsageStore::load(Arc::new(SqliteUsageStorage::new(path).await.unwrap())).await;

    first.record_usage_at("commit", T);
    first.persist().await.unwrap();

    second.record_usage_at("test", T + 1);
    second.sync().await.unwrap();

    assert_eq!(second.record("commit"), Some(UsageRecord::new("commit", T, 1)));
    assert_eq!(second.len(), 2);
}
