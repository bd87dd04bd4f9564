use std::path::PathBuf;

use freesound::management::SessionStore;

fn temp_store(name: &str) -> (SessionStore, PathBuf) {
    let dir = std::env::temp_dir().join(format!("freesound-test-{}-{}", std::process::id(), name));
    let path = dir.join("cache").join("session.json");
    (SessionStore::at(&path), dir)
}

#[tokio::test]
async fn test_missing_session_is_none() {
    let (store, _dir) = temp_store("missing");

    assert_eq!(store.load().await.unwrap(), None);
    assert_eq!(store.cookie().await, None);

    // Clearing nothing is fine
    store.clear().await.unwrap();
}

#[tokio::test]
async fn test_persist_load_clear() {
    let (store, dir) = temp_store("roundtrip");

    let stored = store.persist("freesound_session=abc").await.unwrap();
    assert_eq!(stored.cookie, "freesound_session=abc");
    assert!(stored.stored_at > 0);

    let loaded = store.load().await.unwrap().unwrap();
    assert_eq!(loaded, stored);
    assert_eq!(store.cookie().await.as_deref(), Some("freesound_session=abc"));

    store.clear().await.unwrap();
    assert_eq!(store.cookie().await, None);

    let _ = std::fs::remove_dir_all(dir);
}

#[tokio::test]
async fn test_corrupt_session_file() {
    let (store, dir) = temp_store("corrupt");
    std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
    std::fs::write(store.path(), "not json").unwrap();

    assert!(store.load().await.is_err());
    // The lenient accessor treats it as logged out
    assert_eq!(store.cookie().await, None);

    let _ = std::fs::remove_dir_all(dir);
}
