use assess_core::cache::{CacheName, CachedResponse};
use storage::repository::{CacheStorage, KeyValueStore, Storage};
use storage::sqlite::SqliteRepository;

fn asset(body: &str) -> CachedResponse {
    CachedResponse::new(200, Some("text/css".into()), body.as_bytes().to_vec())
}

#[tokio::test]
async fn sqlite_key_value_roundtrip() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_local?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    assert_eq!(repo.get_item("assessmentScores").await.unwrap(), None);
    repo.set_item("assessmentScores", r#"{"total":1}"#)
        .await
        .unwrap();
    repo.set_item("assessmentScores", r#"{"total":2}"#)
        .await
        .unwrap();
    assert_eq!(
        repo.get_item("assessmentScores").await.unwrap().as_deref(),
        Some(r#"{"total":2}"#)
    );

    repo.remove_item("assessmentScores").await.unwrap();
    assert_eq!(repo.get_item("assessmentScores").await.unwrap(), None);
}

#[tokio::test]
async fn sqlite_migrations_are_idempotent() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_migrate?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("first migrate");
    repo.migrate().await.expect("second migrate");
}

#[tokio::test]
async fn sqlite_buckets_store_and_cascade() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_buckets?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let old = CacheName::for_version("v1");
    let current = CacheName::for_version("v2");
    repo.open(&old).await.unwrap();
    repo.open(&current).await.unwrap();
    repo.open(&current).await.unwrap();
    assert_eq!(
        repo.bucket_names().await.unwrap(),
        vec![old.as_str().to_string(), current.as_str().to_string()]
    );

    let key = "https://example.com/css/style.css";
    repo.put(&old, key, &asset("old")).await.unwrap();
    repo.put(&current, key, &asset("a")).await.unwrap();
    repo.put(&current, key, &asset("b")).await.unwrap();

    assert_eq!(repo.lookup(&current, key).await.unwrap(), Some(asset("b")));
    assert_eq!(repo.match_any(key).await.unwrap(), Some(asset("old")));
    assert_eq!(repo.keys(&current).await.unwrap(), vec![key.to_string()]);

    assert!(repo.delete_bucket(old.as_str()).await.unwrap());
    assert_eq!(repo.lookup(&old, key).await.unwrap(), None);
    assert_eq!(repo.match_any(key).await.unwrap(), Some(asset("b")));
    assert_eq!(
        repo.bucket_names().await.unwrap(),
        vec![current.as_str().to_string()]
    );
}

#[tokio::test]
async fn sqlite_put_into_unknown_bucket_is_not_found() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_missing?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let err = repo
        .put(&CacheName::for_version("nope"), "k", &asset("x"))
        .await
        .unwrap_err();
    assert!(matches!(err, storage::StorageError::NotFound));
}

#[tokio::test]
async fn storage_sqlite_wires_both_stores() {
    let storage = Storage::sqlite("sqlite:file:memdb_storage?mode=memory&cache=shared")
        .await
        .expect("storage");
    storage.local.set_item("k", "v").await.unwrap();
    storage
        .caches
        .open(&CacheName::for_version("v1"))
        .await
        .unwrap();
    assert_eq!(storage.local.get_item("k").await.unwrap().as_deref(), Some("v"));
    assert_eq!(storage.caches.bucket_names().await.unwrap().len(), 1);
}
