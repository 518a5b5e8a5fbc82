use pretty_assertions::assert_eq;
use std::sync::Arc;
use uitree_core::UiTree;
use uitree_store::{
    default_tree, ChangeLog, FileStateStore, MemoryStateStore, StateStore, StoreError,
};
use uitree_test_utils::{advance_to, temp_file_store};

async fn check_version_sequence(store: &dyn StateStore) {
    let mut state = store.initialize("alice").await.unwrap();
    assert_eq!(state.version, 1);

    for expected in 2..=6 {
        let tree = UiTree::new("Container").with_prop("gap", expected);
        let next = store.save("alice", state.version, tree.clone()).await.unwrap();
        assert_eq!(next.version, state.version + 1);
        assert_eq!(next.version, expected);
        assert_eq!(store.load("alice").await.unwrap().unwrap().tree, tree);
        state = next;
    }
}

async fn check_stale_save_is_rejected(store: &dyn StateStore) {
    advance_to(store, "bob", 3, &UiTree::new("Card")).await;
    let before = store.load("bob").await.unwrap().unwrap();

    for stale in [0, 1, 2, 4, 99] {
        let err = store.save("bob", stale, UiTree::new("Text")).await.unwrap_err();
        match err {
            StoreError::VersionConflict { expected, actual } => {
                assert_eq!(expected, stale);
                assert_eq!(actual, 3);
            }
            other => panic!("expected conflict, got {other}"),
        }
    }

    assert_eq!(store.load("bob").await.unwrap().unwrap(), before);
}

async fn check_reset(store: &dyn StateStore) {
    let fresh = store.reset("carol").await.unwrap();
    assert_eq!(fresh.version, 1);

    store.save("carol", 1, UiTree::new("Card")).await.unwrap();
    let reset = store.reset("carol").await.unwrap();
    assert_eq!(reset.version, 3);
    assert_eq!(reset.tree, default_tree());
}

async fn check_history(store: &dyn StateStore) {
    store.initialize("dave").await.unwrap();
    assert!(store.history("dave", 20).await.unwrap().is_empty());

    for i in 0..4 {
        let entry = ChangeLog::new(format!("step {i}"), UiTree::new("A"), UiTree::new("B"));
        store.record_change("dave", entry).await.unwrap();
    }

    let recent = store.history("dave", 2).await.unwrap();
    let descriptions: Vec<_> = recent.iter().map(|c| c.description.as_str()).collect();
    assert_eq!(descriptions, vec!["step 3", "step 2"]);
}

#[tokio::test]
async fn memory_store_contract() {
    let store = MemoryStateStore::new();
    check_version_sequence(&store).await;
    check_stale_save_is_rejected(&store).await;
    check_reset(&store).await;
    check_history(&store).await;
}

#[tokio::test]
async fn file_store_contract() {
    let (_dir, store) = temp_file_store();
    check_version_sequence(&store).await;
    check_stale_save_is_rejected(&store).await;
    check_reset(&store).await;
    check_history(&store).await;
}

#[tokio::test]
async fn file_store_survives_reopen() {
    let (dir, store) = temp_file_store();
    store.initialize("alice").await.unwrap();
    store.save("alice", 1, UiTree::new("Card")).await.unwrap();
    drop(store);

    let reopened = FileStateStore::new(dir.path());
    let state = reopened.load("alice").await.unwrap().unwrap();
    assert_eq!(state.version, 2);
    assert_eq!(state.tree, UiTree::new("Card"));
}

#[tokio::test]
async fn file_store_history_cap() {
    let (dir, _) = temp_file_store();
    let store = FileStateStore::new(dir.path()).with_max_history(2);
    for i in 0..5 {
        let entry = ChangeLog::new(format!("step {i}"), UiTree::new("A"), UiTree::new("B"));
        store.record_change("erin", entry).await.unwrap();
    }
    assert_eq!(store.history("erin", 100).await.unwrap().len(), 2);
}

async fn race(store: Arc<dyn StateStore>) {
    advance_to(store.as_ref(), "race", 3, &UiTree::new("Card")).await;

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                store
                    .save("race", 3, UiTree::new("Container").with_prop("gap", i))
                    .await
            })
        })
        .collect();

    let mut wins = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(state) => {
                assert_eq!(state.version, 4);
                wins += 1;
            }
            Err(StoreError::VersionConflict { expected, actual }) => {
                assert_eq!((expected, actual), (3, 4));
                conflicts += 1;
            }
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(wins, 1);
    assert_eq!(conflicts, 7);
    assert_eq!(store.load("race").await.unwrap().unwrap().version, 4);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_saves_have_one_winner_in_memory() {
    race(Arc::new(MemoryStateStore::new())).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_saves_have_one_winner_on_disk() {
    let (_dir, store) = temp_file_store();
    race(Arc::new(store)).await;
}
