//! Board directory
//!
//! The signed-in user's boards: list, create, rename and delete. Blank titles
//! are ignored, deletes ask for confirmation, and failures are reported to
//! the notifier as well as returned.

use crate::api::BoardApi;
use crate::board::model::non_blank;
use crate::board::{Board, Confirm, ConfirmRequest, Notifier};
use crate::{CorkboardError, Result};
use kanban_api::{BoardId, CreateBoardRequest, UpdateBoardRequest};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct Dashboard {
    api: Arc<dyn BoardApi>,
    confirm: Arc<dyn Confirm>,
    notifier: Arc<dyn Notifier>,
    boards: Vec<Board>,
}

impl Dashboard {
    pub fn new(
        api: Arc<dyn BoardApi>,
        confirm: Arc<dyn Confirm>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            api,
            confirm,
            notifier,
            boards: Vec::new(),
        }
    }

    /// Boards as of the last refresh, in server order
    pub fn boards(&self) -> &[Board] {
        &self.boards
    }

    pub fn board(&self, id: BoardId) -> Option<&Board> {
        self.boards.iter().find(|b| b.id == id)
    }

    /// Find a board by id or by exact (case-insensitive) title
    pub fn find(&self, key: &str) -> Option<&Board> {
        if let Ok(id) = key.parse::<BoardId>() {
            if let Some(board) = self.board(id) {
                return Some(board);
            }
        }
        let key = key.trim();
        self.boards
            .iter()
            .find(|b| b.title.eq_ignore_ascii_case(key))
    }

    fn fail<T>(&self, action: &str, err: CorkboardError) -> Result<T> {
        warn!(action = action, error = %err, "Dashboard operation failed");
        self.notifier
            .error(&format!("Failed to {}: {}", action, err));
        Err(err)
    }

    pub async fn refresh(&mut self) -> Result<&[Board]> {
        match self.api.list_boards().await {
            Ok(boards) => {
                debug!(count = boards.len(), "Boards loaded");
                self.boards = boards;
                Ok(&self.boards)
            }
            Err(e) => self.fail("load boards", e),
        }
    }

    /// Create a board; blank titles are ignored (`Ok(None)`)
    pub async fn create_board(&mut self, title: &str) -> Result<Option<BoardId>> {
        let Some(title) = non_blank(title) else {
            return Ok(None);
        };

        let request = CreateBoardRequest {
            title: title.to_string(),
        };
        let board = match self.api.create_board(&request).await {
            Ok(board) => board,
            Err(e) => return self.fail("create board", e),
        };

        info!(board_id = %board.id, title = %board.title, "Board created");
        let id = board.id;
        self.boards.push(board);
        self.notifier.success(&format!("Board \"{}\" created", title));
        Ok(Some(id))
    }

    /// Rename a board; blank titles are ignored (`Ok(false)`)
    pub async fn rename_board(&mut self, id: BoardId, title: &str) -> Result<bool> {
        let Some(title) = non_blank(title) else {
            return Ok(false);
        };

        let request = UpdateBoardRequest {
            title: Some(title.to_string()),
        };
        let updated = match self.api.update_board(id, &request).await {
            Ok(board) => board,
            Err(e) => return self.fail("rename board", e),
        };

        match self.boards.iter_mut().find(|b| b.id == id) {
            Some(board) => *board = updated,
            None => self.boards.push(updated),
        }
        Ok(true)
    }

    /// Delete a board with all its lists and cards after confirmation
    ///
    /// Returns `Ok(false)` when the user cancels.
    pub async fn delete_board(&mut self, id: BoardId) -> Result<bool> {
        let title = self
            .board(id)
            .map(|b| b.title.clone())
            .unwrap_or_else(|| format!("board #{}", id));

        if !self.confirm.confirm(&ConfirmRequest::delete_board(&title)).await {
            info!(board_id = %id, "Board deletion cancelled");
            return Ok(false);
        }

        if let Err(e) = self.api.delete_board(id).await {
            return self.fail("delete board", e);
        }

        self.boards.retain(|b| b.id != id);
        self.notifier.success(&format!("Board \"{}\" deleted", title));
        Ok(true)
    }
}
