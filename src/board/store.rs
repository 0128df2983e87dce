//! Board state store
//!
//! Owns the open board's lists and cards and keeps them consistent with the
//! server. Creates and deletes wait for the server before touching local
//! state. List renames and drag reorders are applied optimistically and
//! rolled back to a snapshot of the whole list tree if the server refuses
//! them. After every change, positions are dense zero-based ranks.

use super::activity::{ActivityKind, ActivityLog, ActivityMetadata};
use super::collaborators::{Confirm, ConfirmRequest, Notifier};
use super::drag::{plan_drag, DragResult, PersistPlan};
use super::model::{non_blank, renumber, Board, CardDraft, List};
use crate::api::BoardApi;
use crate::retry::{with_transient_retry, RetryConfig};
use crate::{CorkboardError, Result};
use kanban_api::{
    BoardId, CardId, CreateCardRequest, CreateListRequest, ListId, UpdateCardRequest,
    UpdateListRequest,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Local view of one board, reconciled against the backend
pub struct BoardStore {
    api: Arc<dyn BoardApi>,
    confirm: Arc<dyn Confirm>,
    notifier: Arc<dyn Notifier>,
    drag_retry: RetryConfig,
    board: Option<Board>,
    lists: Vec<List>,
    activity: ActivityLog,
}

impl BoardStore {
    pub fn new(
        api: Arc<dyn BoardApi>,
        confirm: Arc<dyn Confirm>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            api,
            confirm,
            notifier,
            drag_retry: RetryConfig::drag(),
            board: None,
            lists: Vec::new(),
            activity: ActivityLog::new(),
        }
    }

    /// Override the retry policy used when persisting drags
    pub fn with_drag_retry(mut self, config: RetryConfig) -> Self {
        self.drag_retry = config;
        self
    }

    pub fn board(&self) -> Option<&Board> {
        self.board.as_ref()
    }

    /// Lists in display order
    pub fn lists(&self) -> &[List] {
        &self.lists
    }

    pub fn list(&self, id: ListId) -> Option<&List> {
        self.lists.iter().find(|l| l.id == id)
    }

    fn list_mut(&mut self, id: ListId) -> Option<&mut List> {
        self.lists.iter_mut().find(|l| l.id == id)
    }

    pub fn activity(&self) -> &ActivityLog {
        &self.activity
    }

    pub fn clear_activity(&mut self) {
        self.activity.clear();
    }

    /// Forget the open board when the user leaves it
    pub fn reset(&mut self) {
        self.board = None;
        self.lists.clear();
        self.activity.clear();
    }

    fn board_id(&self) -> Result<BoardId> {
        self.board
            .as_ref()
            .map(|b| b.id)
            .ok_or_else(|| CorkboardError::NotFound("no board loaded".to_string()))
    }

    /// Log, notify, and hand the error back to the caller
    fn fail<T>(&self, action: &str, err: CorkboardError) -> Result<T> {
        warn!(action = action, error = %err, "Board operation failed");
        self.notifier
            .error(&format!("Failed to {}: {}", action, err));
        Err(err)
    }

    /// Fetch a board with all lists and cards and replace local state
    ///
    /// On failure the previous state is kept.
    pub async fn load_board(&mut self, board_id: BoardId) -> Result<()> {
        let full = match self.api.fetch_full_board(board_id).await {
            Ok(full) => full,
            Err(e) => return self.fail("load board", e),
        };

        let mut lists: Vec<List> = full.lists.into_iter().map(List::from).collect();
        lists.sort_by_key(|l| l.position);
        renumber(&mut lists);

        if self.board.as_ref().map(|b| b.id) != Some(board_id) {
            self.activity.clear();
        }

        info!(
            board_id = %board_id,
            lists = lists.len(),
            cards = lists.iter().map(|l| l.cards.len()).sum::<usize>(),
            "Board loaded"
        );
        self.board = Some(full.board);
        self.lists = lists;
        Ok(())
    }

    /// Append a list to the open board
    ///
    /// Blank titles are ignored (`Ok(None)`).
    pub async fn add_list(&mut self, title: &str) -> Result<Option<ListId>> {
        let Some(title) = non_blank(title) else {
            debug!("Ignoring list with blank title");
            return Ok(None);
        };
        let board_id = self.board_id()?;

        let request = CreateListRequest {
            title: title.to_string(),
            board_id,
            position: Some(self.lists.len() as u32),
        };
        let created = match self.api.create_list(&request).await {
            Ok(list) => list,
            Err(e) => return self.fail("create list", e),
        };

        let id = created.id;
        let title = created.title.clone();
        self.lists.push(List::from_created(created));
        renumber(&mut self.lists);

        self.activity.record(
            ActivityKind::ListAdded,
            format!("Created list \"{}\"", title),
            ActivityMetadata::list(&title),
        );
        Ok(Some(id))
    }

    /// Rename a list, optimistically
    ///
    /// Returns `Ok(false)` for a blank title or an unknown list.
    pub async fn edit_list_title(&mut self, list_id: ListId, title: &str) -> Result<bool> {
        let Some(title) = non_blank(title) else {
            return Ok(false);
        };
        let snapshot = self.lists.clone();
        let Some(list) = self.list_mut(list_id) else {
            debug!(list_id = %list_id, "Rename of unknown list ignored");
            return Ok(false);
        };
        let previous = std::mem::replace(&mut list.title, title.to_string());

        let request = UpdateListRequest::title(title);
        if let Err(e) = self.api.update_list(list_id, &request).await {
            self.lists = snapshot;
            return self.fail("update list", e);
        }

        self.activity.record(
            ActivityKind::ListEdited,
            format!("Renamed list \"{}\" to \"{}\"", previous, title),
            ActivityMetadata::list(title),
        );
        Ok(true)
    }

    /// Delete a list and its cards after the user confirms
    ///
    /// Returns `Ok(false)` when the list is unknown or the user cancels.
    pub async fn delete_list(&mut self, list_id: ListId) -> Result<bool> {
        let Some(list) = self.list(list_id) else {
            return Ok(false);
        };
        let title = list.title.clone();
        let card_count = list.cards.len();

        if !self.confirm.confirm(&ConfirmRequest::delete_list(&title)).await {
            info!(list_id = %list_id, "List deletion cancelled");
            return Ok(false);
        }

        if let Err(e) = self.api.delete_list(list_id).await {
            return self.fail("delete list", e);
        }

        self.lists.retain(|l| l.id != list_id);
        renumber(&mut self.lists);

        debug!(list_id = %list_id, cards = card_count, "List deleted");
        self.activity.record(
            ActivityKind::ListDeleted,
            format!("Deleted list \"{}\"", title),
            ActivityMetadata::list(&title),
        );
        Ok(true)
    }

    /// Append a card to a list
    ///
    /// Blank titles and unknown lists are ignored (`Ok(None)`); nothing is
    /// sent to the server.
    pub async fn add_card(&mut self, list_id: ListId, draft: &CardDraft) -> Result<Option<CardId>> {
        let Some(title) = draft.trimmed_title() else {
            debug!("Ignoring card with blank title");
            return Ok(None);
        };
        let Some(list) = self.list(list_id) else {
            debug!(list_id = %list_id, "Card added to unknown list ignored");
            return Ok(None);
        };
        let list_title = list.title.clone();

        let request = CreateCardRequest {
            title: title.to_string(),
            list_id,
            description: draft.normalized_description(),
            position: Some(list.cards.len() as u32),
        };
        let card = match self.api.create_card(&request).await {
            Ok(card) => card,
            Err(e) => return self.fail("create card", e),
        };

        let id = card.id;
        let card_title = card.title.clone();
        if let Some(list) = self.list_mut(list_id) {
            list.cards.push(card);
            list.renumber_cards();
        }

        self.activity.record(
            ActivityKind::CardAdded,
            format!("Added card \"{}\" to \"{}\"", card_title, list_title),
            ActivityMetadata::card(&card_title, &list_title),
        );
        Ok(Some(id))
    }

    /// Save a card's title and description
    ///
    /// Local state changes only once the server accepts the edit.
    pub async fn edit_card(
        &mut self,
        list_id: ListId,
        card_id: CardId,
        draft: &CardDraft,
    ) -> Result<bool> {
        let Some(title) = draft.trimmed_title() else {
            return Ok(false);
        };
        let Some(list) = self.list(list_id) else {
            return Ok(false);
        };
        if list.card(card_id).is_none() {
            return Ok(false);
        }
        let list_title = list.title.clone();

        let request = UpdateCardRequest::content(title, draft.normalized_description());
        let updated = match self.api.update_card(card_id, &request).await {
            Ok(card) => card,
            Err(e) => return self.fail("update card", e),
        };

        if let Some(card) = self.list_mut(list_id).and_then(|l| l.card_mut(card_id)) {
            card.title = updated.title;
            card.description = updated.description;
            card.updated_at = updated.updated_at;
        }

        self.activity.record(
            ActivityKind::CardEdited,
            format!("Edited card \"{}\"", title),
            ActivityMetadata::card(title, &list_title),
        );
        Ok(true)
    }

    /// Delete a card
    ///
    /// If the list is no longer loaded when the server confirms, the local
    /// removal is skipped without error.
    pub async fn delete_card(&mut self, list_id: ListId, card_id: CardId) -> Result<()> {
        let known = self
            .list(list_id)
            .and_then(|l| l.card(card_id).map(|c| (c.title.clone(), l.title.clone())));

        if let Err(e) = self.api.delete_card(card_id).await {
            return self.fail("delete card", e);
        }

        match self.list_mut(list_id) {
            Some(list) => {
                list.cards.retain(|c| c.id != card_id);
                list.renumber_cards();
            }
            None => debug!(list_id = %list_id, card_id = %card_id, "Deleted card's list not loaded"),
        }

        let (description, metadata) = match known {
            Some((card_title, list_title)) => (
                format!("Deleted card \"{}\"", card_title),
                ActivityMetadata::card(&card_title, &list_title),
            ),
            None => (format!("Deleted card #{}", card_id), ActivityMetadata::default()),
        };
        self.activity
            .record(ActivityKind::CardDeleted, description, metadata);
        Ok(())
    }

    /// Apply a finished drag and persist it
    ///
    /// Returns the persisted update, or `None` for a drag that changes
    /// nothing. If persisting fails after retries, the lists are restored
    /// to exactly what they were before the drag.
    pub async fn resolve_drag_end(&mut self, result: DragResult) -> Result<Option<PersistPlan>> {
        let snapshot = self.lists.clone();
        let Some(plan) = plan_drag(&mut self.lists, &result) else {
            return Ok(None);
        };

        debug!(?plan, "Persisting drag");
        if let Err(e) = self.persist(plan).await {
            self.lists = snapshot;
            return self.fail("save new order", e);
        }

        if let Some((description, metadata)) = self.describe_move(&plan, &snapshot) {
            self.activity
                .record(ActivityKind::CardMoved, description, metadata);
        }
        Ok(Some(plan))
    }

    async fn persist(&self, plan: PersistPlan) -> Result<()> {
        let api = self.api.as_ref();
        let retry = &self.drag_retry;

        match plan {
            PersistPlan::ListPosition { list_id, position } => {
                let request = UpdateListRequest::position(position);
                let request = &request;
                with_transient_retry(retry, "persist list position", move || {
                    api.update_list(list_id, request)
                })
                .await?;
            }
            PersistPlan::CardPosition {
                card_id, position, ..
            } => {
                let request = UpdateCardRequest::position(position);
                let request = &request;
                with_transient_retry(retry, "persist card position", move || {
                    api.update_card(card_id, request)
                })
                .await?;
            }
            PersistPlan::CardMove {
                card_id,
                to_list,
                position,
                ..
            } => {
                let request = UpdateCardRequest::moved_to(to_list, position);
                let request = &request;
                with_transient_retry(retry, "persist card move", move || {
                    api.update_card(card_id, request)
                })
                .await?;
            }
        }
        Ok(())
    }

    /// Activity text for a persisted card drag; list drags record nothing
    fn describe_move(&self, plan: &PersistPlan, before: &[List]) -> Option<(String, ActivityMetadata)> {
        let title_of = |lists: &[List], id: ListId| {
            lists
                .iter()
                .find(|l| l.id == id)
                .map(|l| l.title.clone())
                .unwrap_or_default()
        };

        match *plan {
            PersistPlan::ListPosition { .. } => None,
            PersistPlan::CardPosition {
                card_id, list_id, ..
            } => {
                let card = self.list(list_id)?.card(card_id)?.title.clone();
                let list = title_of(&self.lists, list_id);
                Some((
                    format!("Reordered card \"{}\" in \"{}\"", card, list),
                    ActivityMetadata::moved(&card, &list, &list),
                ))
            }
            PersistPlan::CardMove {
                card_id,
                from_list,
                to_list,
                ..
            } => {
                let card = self.list(to_list)?.card(card_id)?.title.clone();
                let from = title_of(before, from_list);
                let to = title_of(&self.lists, to_list);
                Some((
                    format!("Moved card \"{}\" from \"{}\" to \"{}\"", card, from, to),
                    ActivityMetadata::moved(&card, &from, &to),
                ))
            }
        }
    }
}
