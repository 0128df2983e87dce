//! Integration tests for corkboard
//!
//! These tests drive the public API end to end: config loading, the board
//! directory, and full board sessions against the in-memory backend.

use corkboard::api::{ApiCall, Failure, MemoryBoardApi};
use corkboard::board::model::is_consistent;
use corkboard::board::{
    ActivityKind, AutoConfirm, BoardStore, CardDraft, CardSlot, DragResult, List, PersistPlan,
    QueuedNotifier,
};
use corkboard::config::{validate_config, CorkboardConfig};
use corkboard::dashboard::Dashboard;
use corkboard::retry::RetryConfig;
use kanban_api::{BoardId, CardId, ListId, UpdateCardRequest, UpdateListRequest};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

/// Helper to build a store over a shared in-memory backend
fn open_store(api: &Arc<MemoryBoardApi>) -> (BoardStore, Arc<QueuedNotifier>) {
    corkboard::logging::init_test();
    let notifier = Arc::new(QueuedNotifier::new());
    let store = BoardStore::new(api.clone(), Arc::new(AutoConfirm(true)), notifier.clone());
    (store, notifier)
}

/// A board with "To Do" (two cards) and "Done" (one card)
fn seeded_board(api: &MemoryBoardApi) -> BoardId {
    let board = api.seed_board("Release");
    let todo = api.seed_list(board, "To Do");
    let done = api.seed_list(board, "Done");
    api.seed_card(todo, "Write changelog");
    api.seed_card(todo, "Tag release");
    api.seed_card(done, "Freeze branch");
    board
}

/// Ids and positions of every list and card, ignoring timestamps
fn shape(lists: &[List]) -> Vec<(ListId, u32, Vec<(CardId, u32, ListId)>)> {
    lists
        .iter()
        .map(|l| {
            let cards = l.cards.iter().map(|c| (c.id, c.position, c.list_id)).collect();
            (l.id, l.position, cards)
        })
        .collect()
}

mod config_tests {
    use super::*;

    #[test]
    fn test_config_save_load_and_validate() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.yaml");

        let mut config = CorkboardConfig::new();
        config.api.base_url = "https://kanban.example.com".to_string();
        config.drag_retry.delay_ms = 250;
        config.save(&config_path).unwrap();

        let loaded = CorkboardConfig::load(&config_path).unwrap();
        assert_eq!(loaded, config);
        assert!(validate_config(&loaded).is_ok());
        assert_eq!(
            loaded.drag_retry.to_retry_config().delay,
            Duration::from_millis(250)
        );
    }

    #[test]
    fn test_invalid_config_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.yaml");
        std::fs::write(
            &config_path,
            "api:\n  base_url: kanban.example.com\nretry:\n  max_attempts: 0\n",
        )
        .unwrap();

        let loaded = CorkboardConfig::load(&config_path).unwrap();
        let errors = validate_config(&loaded).unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}

mod board_session_tests {
    use super::*;

    #[tokio::test]
    async fn test_full_session_keeps_local_and_server_in_step() {
        let api = Arc::new(MemoryBoardApi::new());
        let board = seeded_board(&api);
        let (mut store, notifier) = open_store(&api);

        store.load_board(board).await.unwrap();
        let todo = store.lists()[0].id;
        let done = store.lists()[1].id;

        let review = store.add_list("Review").await.unwrap().unwrap();
        let card = store
            .add_card(review, &CardDraft::new("Check docs").with_description("README and guides"))
            .await
            .unwrap()
            .unwrap();
        store
            .resolve_drag_end(DragResult::list(2, 1))
            .await
            .unwrap();
        store
            .resolve_drag_end(DragResult::card(CardSlot::new(todo, 1), CardSlot::new(review, 0)))
            .await
            .unwrap();
        store
            .resolve_drag_end(DragResult::card(CardSlot::new(review, 1), CardSlot::new(done, 1)))
            .await
            .unwrap();

        assert!(is_consistent(store.lists()));
        assert!(notifier.errors().is_empty());

        // Reloading from the server yields the same order and membership
        let local = shape(store.lists());
        store.load_board(board).await.unwrap();
        assert_eq!(shape(store.lists()), local);

        let titles: Vec<_> = store.lists().iter().map(|l| l.title.as_str()).collect();
        assert_eq!(titles, vec!["To Do", "Review", "Done"]);
        assert_eq!(store.list(done).unwrap().cards[1].id, card);
    }

    #[tokio::test]
    async fn test_card_moves_record_activity_with_list_titles() {
        let api = Arc::new(MemoryBoardApi::new());
        let board = seeded_board(&api);
        let (mut store, _) = open_store(&api);
        store.load_board(board).await.unwrap();
        let todo = store.lists()[0].id;
        let done = store.lists()[1].id;

        store
            .resolve_drag_end(DragResult::card(CardSlot::new(todo, 0), CardSlot::new(done, 0)))
            .await
            .unwrap();
        store
            .resolve_drag_end(DragResult::card(CardSlot::new(done, 0), CardSlot::new(done, 1)))
            .await
            .unwrap();

        let entries: Vec<_> = store.activity().entries().collect();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|a| a.kind == ActivityKind::CardMoved));
        assert_eq!(
            entries[1].description,
            "Moved card \"Write changelog\" from \"To Do\" to \"Done\""
        );
        assert_eq!(entries[0].metadata.from_list.as_deref(), Some("Done"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rollback_after_exhausted_retries_matches_snapshot() {
        let api = Arc::new(MemoryBoardApi::new());
        let board = seeded_board(&api);
        let (store, notifier) = open_store(&api);
        let mut store = store.with_drag_retry(RetryConfig::drag());
        store.load_board(board).await.unwrap();
        let snapshot = store.lists().to_vec();
        let done = snapshot[1].id;
        api.clear_calls();
        api.fail_next(3, Failure::Status(502, "Bad gateway".to_string()));

        let started = tokio::time::Instant::now();
        let err = store
            .resolve_drag_end(DragResult::list(1, 0))
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(502));
        assert_eq!(store.lists(), snapshot.as_slice());
        assert_eq!(
            api.calls(),
            vec![ApiCall::UpdateList(done, UpdateListRequest::position(0)); 3]
        );
        // 500ms then 1000ms, nothing after the last attempt
        assert_eq!(started.elapsed(), Duration::from_millis(1500));
        assert_eq!(
            notifier.errors(),
            vec!["Failed to save new order: Bad gateway".to_string()]
        );

        // the server never saw the move
        let server = api.snapshot(board).unwrap();
        assert_eq!(server.lists[1].list.id, done);
    }

    #[tokio::test]
    async fn test_cross_list_move_sends_one_update() {
        let api = Arc::new(MemoryBoardApi::new());
        let board = seeded_board(&api);
        let (mut store, _) = open_store(&api);
        store.load_board(board).await.unwrap();
        let todo = store.lists()[0].clone();
        let done = store.lists()[1].clone();
        let moved = todo.cards[0].id;
        api.clear_calls();

        let plan = store
            .resolve_drag_end(DragResult::card(CardSlot::new(todo.id, 0), CardSlot::new(done.id, 0)))
            .await
            .unwrap();

        assert_eq!(
            plan,
            Some(PersistPlan::CardMove {
                card_id: moved,
                from_list: todo.id,
                to_list: done.id,
                position: 0,
            })
        );
        assert_eq!(
            api.calls(),
            vec![ApiCall::UpdateCard(moved, UpdateCardRequest::moved_to(done.id, 0))]
        );
        assert_eq!(store.list(todo.id).unwrap().cards.len(), 1);
        assert_eq!(store.list(done.id).unwrap().cards.len(), 2);
        assert_eq!(store.list(done.id).unwrap().cards[0].list_id, done.id);
    }

    #[tokio::test]
    async fn test_deleting_list_cascades_on_server() {
        let api = Arc::new(MemoryBoardApi::new());
        let board = seeded_board(&api);
        let (mut store, _) = open_store(&api);
        store.load_board(board).await.unwrap();
        let todo = store.lists()[0].id;

        assert!(store.delete_list(todo).await.unwrap());

        let server = api.snapshot(board).unwrap();
        assert_eq!(server.lists.len(), 1);
        assert_eq!(server.lists[0].list.position, 0);
        assert!(is_consistent(store.lists()));
        assert_eq!(shape(store.lists()).len(), server.lists.len());
    }
}

mod dashboard_tests {
    use super::*;

    #[tokio::test]
    async fn test_board_lifecycle() {
        let api = Arc::new(MemoryBoardApi::new());
        let notifier = Arc::new(QueuedNotifier::new());
        let mut dashboard = Dashboard::new(api.clone(), Arc::new(AutoConfirm(true)), notifier.clone());

        let id = dashboard.create_board("Roadmap").await.unwrap().unwrap();
        assert!(dashboard.rename_board(id, "Roadmap 2025").await.unwrap());

        dashboard.refresh().await.unwrap();
        assert_eq!(dashboard.find("roadmap 2025").map(|b| b.id), Some(id));

        assert!(dashboard.delete_board(id).await.unwrap());
        dashboard.refresh().await.unwrap();
        assert!(dashboard.boards().is_empty());
        assert!(notifier.errors().is_empty());
    }
}
