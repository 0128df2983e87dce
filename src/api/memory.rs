//! In-process board backend
//!
//! Mirrors the server's behavior closely enough to drive the store without a
//! network: ids are assigned sequentially, sibling positions stay dense when
//! items are inserted, moved or removed, and every call is recorded so tests
//! can assert exactly what would have gone over the wire. Failures can be
//! queued to exercise retry and rollback paths.

use super::BoardApi;
use crate::{CorkboardError, Result};
use async_trait::async_trait;
use chrono::Utc;
use kanban_api::{
    Board, BoardId, Card, CardId, CreateBoardRequest, CreateCardRequest, CreateListRequest,
    FullBoard, FullList, List, ListId, UpdateBoardRequest, UpdateCardRequest, UpdateListRequest,
    UserId,
};
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// One recorded backend call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    ListBoards,
    CreateBoard(CreateBoardRequest),
    UpdateBoard(BoardId, UpdateBoardRequest),
    DeleteBoard(BoardId),
    FetchFullBoard(BoardId),
    CreateList(CreateListRequest),
    UpdateList(ListId, UpdateListRequest),
    DeleteList(ListId),
    CreateCard(CreateCardRequest),
    UpdateCard(CardId, UpdateCardRequest),
    DeleteCard(CardId),
}

impl ApiCall {
    /// Whether the call changes server state
    pub fn is_mutation(&self) -> bool {
        !matches!(self, ApiCall::ListBoards | ApiCall::FetchFullBoard(_))
    }
}

/// A queued failure for the next call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// Connection dropped; transient
    Network,
    /// Non-2xx response with an error message
    Status(u16, String),
}

impl Failure {
    fn into_error(self) -> CorkboardError {
        match self {
            Failure::Network => CorkboardError::Network("connection reset".to_string()),
            Failure::Status(status, message) => CorkboardError::http(status, message),
        }
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    boards: Vec<Board>,
    lists: Vec<List>,
    cards: Vec<Card>,
    next_id: i64,
    calls: Vec<ApiCall>,
    failures: VecDeque<Failure>,
}

impl MemoryState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn board(&self, id: BoardId) -> Result<&Board> {
        self.boards
            .iter()
            .find(|b| b.id == id)
            .ok_or_else(|| CorkboardError::http(404, "Board not found"))
    }

    fn list_index(&self, id: ListId) -> Result<usize> {
        self.lists
            .iter()
            .position(|l| l.id == id)
            .ok_or_else(|| CorkboardError::http(404, "List not found"))
    }

    fn card_index(&self, id: CardId) -> Result<usize> {
        self.cards
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| CorkboardError::http(404, "Card not found"))
    }

    /// Ids of a board's lists in position order
    fn list_order(&self, board_id: BoardId) -> Vec<ListId> {
        let mut lists: Vec<&List> = self.lists.iter().filter(|l| l.board_id == board_id).collect();
        lists.sort_by_key(|l| l.position);
        lists.into_iter().map(|l| l.id).collect()
    }

    /// Ids of a list's cards in position order
    fn card_order(&self, list_id: ListId) -> Vec<CardId> {
        let mut cards: Vec<&Card> = self.cards.iter().filter(|c| c.list_id == list_id).collect();
        cards.sort_by_key(|c| c.position);
        cards.into_iter().map(|c| c.id).collect()
    }

    /// Place `id` at `position` among its siblings and renumber them densely
    fn place_list(&mut self, board_id: BoardId, id: ListId, position: Option<u32>) {
        let mut order = self.list_order(board_id);
        order.retain(|other| *other != id);
        let index = position.map_or(order.len(), |p| (p as usize).min(order.len()));
        order.insert(index, id);

        for list in self.lists.iter_mut().filter(|l| l.board_id == board_id) {
            if let Some(rank) = order.iter().position(|other| *other == list.id) {
                list.position = rank as u32;
            }
        }
    }

    fn place_card(&mut self, list_id: ListId, id: CardId, position: Option<u32>) {
        let mut order = self.card_order(list_id);
        order.retain(|other| *other != id);
        let index = position.map_or(order.len(), |p| (p as usize).min(order.len()));
        order.insert(index, id);

        for card in self.cards.iter_mut().filter(|c| c.list_id == list_id) {
            if let Some(rank) = order.iter().position(|other| *other == card.id) {
                card.position = rank as u32;
            }
        }
    }

    fn renumber_lists(&mut self, board_id: BoardId) {
        let order = self.list_order(board_id);
        for list in self.lists.iter_mut().filter(|l| l.board_id == board_id) {
            if let Some(rank) = order.iter().position(|other| *other == list.id) {
                list.position = rank as u32;
            }
        }
    }

    fn renumber_cards(&mut self, list_id: ListId) {
        let order = self.card_order(list_id);
        for card in self.cards.iter_mut().filter(|c| c.list_id == list_id) {
            if let Some(rank) = order.iter().position(|other| *other == card.id) {
                card.position = rank as u32;
            }
        }
    }

    fn full_board(&self, id: BoardId) -> Result<FullBoard> {
        let board = self.board(id)?.clone();
        let lists = self
            .list_order(id)
            .into_iter()
            .filter_map(|list_id| self.lists.iter().find(|l| l.id == list_id))
            .map(|list| FullList {
                list: list.clone(),
                cards: self
                    .card_order(list.id)
                    .into_iter()
                    .filter_map(|card_id| self.cards.iter().find(|c| c.id == card_id))
                    .cloned()
                    .collect(),
            })
            .collect();

        Ok(FullBoard { board, lists })
    }
}

/// Board backend held entirely in memory
#[derive(Debug)]
pub struct MemoryBoardApi {
    owner: UserId,
    state: Mutex<MemoryState>,
}

impl Default for MemoryBoardApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBoardApi {
    pub fn new() -> Self {
        Self::with_owner(UserId::new(1))
    }

    /// Backend whose new boards belong to `owner`
    pub fn with_owner(owner: UserId) -> Self {
        Self {
            owner,
            state: Mutex::new(MemoryState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record `call` and fail it if a failure is queued
    fn begin(&self, call: ApiCall) -> Result<MutexGuard<'_, MemoryState>> {
        let mut state = self.state();
        tracing::trace!(?call, "Memory backend call");
        state.calls.push(call);

        match state.failures.pop_front() {
            Some(failure) => Err(failure.into_error()),
            None => Ok(state),
        }
    }

    /// Fail the next `times` calls with `failure`
    pub fn fail_next(&self, times: usize, failure: Failure) {
        let mut state = self.state();
        for _ in 0..times {
            state.failures.push_back(failure.clone());
        }
    }

    /// Every call made so far, including failed ones
    pub fn calls(&self) -> Vec<ApiCall> {
        self.state().calls.clone()
    }

    /// Calls that change server state
    pub fn mutations(&self) -> Vec<ApiCall> {
        self.state()
            .calls
            .iter()
            .filter(|c| c.is_mutation())
            .cloned()
            .collect()
    }

    pub fn clear_calls(&self) {
        self.state().calls.clear();
    }

    /// Create a board directly, without recording a call
    pub fn seed_board(&self, title: &str) -> BoardId {
        let mut state = self.state();
        let id = BoardId::new(state.next_id());
        let now = Utc::now();
        state.boards.push(Board {
            id,
            title: title.to_string(),
            owner_id: self.owner,
            created_at: now,
            updated_at: now,
        });
        id
    }

    /// Append a list to a board, without recording a call
    pub fn seed_list(&self, board_id: BoardId, title: &str) -> ListId {
        let mut state = self.state();
        let id = ListId::new(state.next_id());
        let now = Utc::now();
        let position = state.list_order(board_id).len() as u32;
        state.lists.push(List {
            id,
            title: title.to_string(),
            position,
            board_id,
            created_at: now,
            updated_at: now,
        });
        id
    }

    /// Append a card to a list, without recording a call
    pub fn seed_card(&self, list_id: ListId, title: &str) -> CardId {
        let mut state = self.state();
        let id = CardId::new(state.next_id());
        let now = Utc::now();
        let position = state.card_order(list_id).len() as u32;
        state.cards.push(Card {
            id,
            title: title.to_string(),
            description: None,
            position,
            list_id,
            created_at: now,
            updated_at: now,
        });
        id
    }

    /// Current server-side view of a board, without recording a call
    pub fn snapshot(&self, id: BoardId) -> Option<FullBoard> {
        self.state().full_board(id).ok()
    }
}

#[async_trait]
impl BoardApi for MemoryBoardApi {
    async fn list_boards(&self) -> Result<Vec<Board>> {
        let state = self.begin(ApiCall::ListBoards)?;
        Ok(state
            .boards
            .iter()
            .filter(|b| b.owner_id == self.owner)
            .cloned()
            .collect())
    }

    async fn create_board(&self, request: &CreateBoardRequest) -> Result<Board> {
        let mut state = self.begin(ApiCall::CreateBoard(request.clone()))?;
        let now = Utc::now();
        let board = Board {
            id: BoardId::new(state.next_id()),
            title: request.title.clone(),
            owner_id: self.owner,
            created_at: now,
            updated_at: now,
        };
        state.boards.push(board.clone());
        Ok(board)
    }

    async fn update_board(&self, id: BoardId, request: &UpdateBoardRequest) -> Result<Board> {
        let mut state = self.begin(ApiCall::UpdateBoard(id, request.clone()))?;
        let board = state
            .boards
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| CorkboardError::http(404, "Board not found"))?;

        if let Some(ref title) = request.title {
            board.title = title.clone();
        }
        board.updated_at = Utc::now();
        Ok(board.clone())
    }

    async fn delete_board(&self, id: BoardId) -> Result<()> {
        let mut state = self.begin(ApiCall::DeleteBoard(id))?;
        state.board(id)?;

        let list_ids: Vec<ListId> = state
            .lists
            .iter()
            .filter(|l| l.board_id == id)
            .map(|l| l.id)
            .collect();
        state.cards.retain(|c| !list_ids.contains(&c.list_id));
        state.lists.retain(|l| l.board_id != id);
        state.boards.retain(|b| b.id != id);
        Ok(())
    }

    async fn fetch_full_board(&self, id: BoardId) -> Result<FullBoard> {
        let state = self.begin(ApiCall::FetchFullBoard(id))?;
        state.full_board(id)
    }

    async fn create_list(&self, request: &CreateListRequest) -> Result<List> {
        let mut state = self.begin(ApiCall::CreateList(request.clone()))?;
        state.board(request.board_id)?;

        let now = Utc::now();
        let id = ListId::new(state.next_id());
        state.lists.push(List {
            id,
            title: request.title.clone(),
            position: u32::MAX,
            board_id: request.board_id,
            created_at: now,
            updated_at: now,
        });
        state.place_list(request.board_id, id, request.position);

        let index = state.list_index(id)?;
        Ok(state.lists[index].clone())
    }

    async fn update_list(&self, id: ListId, request: &UpdateListRequest) -> Result<List> {
        let mut state = self.begin(ApiCall::UpdateList(id, request.clone()))?;
        let index = state.list_index(id)?;

        if let Some(ref title) = request.title {
            state.lists[index].title = title.clone();
        }
        if let Some(position) = request.position {
            let board_id = state.lists[index].board_id;
            state.place_list(board_id, id, Some(position));
        }
        state.lists[index].updated_at = Utc::now();
        Ok(state.lists[index].clone())
    }

    async fn delete_list(&self, id: ListId) -> Result<()> {
        let mut state = self.begin(ApiCall::DeleteList(id))?;
        let index = state.list_index(id)?;
        let board_id = state.lists[index].board_id;

        state.lists.remove(index);
        state.cards.retain(|c| c.list_id != id);
        state.renumber_lists(board_id);
        Ok(())
    }

    async fn create_card(&self, request: &CreateCardRequest) -> Result<Card> {
        let mut state = self.begin(ApiCall::CreateCard(request.clone()))?;
        state.list_index(request.list_id)?;

        let now = Utc::now();
        let id = CardId::new(state.next_id());
        state.cards.push(Card {
            id,
            title: request.title.clone(),
            description: request.description.clone(),
            position: u32::MAX,
            list_id: request.list_id,
            created_at: now,
            updated_at: now,
        });
        state.place_card(request.list_id, id, request.position);

        let index = state.card_index(id)?;
        Ok(state.cards[index].clone())
    }

    async fn update_card(&self, id: CardId, request: &UpdateCardRequest) -> Result<Card> {
        let mut state = self.begin(ApiCall::UpdateCard(id, request.clone()))?;
        let index = state.card_index(id)?;

        if let Some(ref title) = request.title {
            state.cards[index].title = title.clone();
        }
        if let Some(ref description) = request.description {
            state.cards[index].description = description.clone();
        }

        let from_list = state.cards[index].list_id;
        match request.list_id {
            Some(to_list) if to_list != from_list => {
                state.list_index(to_list)?;
                state.cards[index].list_id = to_list;
                state.renumber_cards(from_list);
                state.place_card(to_list, id, request.position);
            }
            _ => {
                if let Some(position) = request.position {
                    state.place_card(from_list, id, Some(position));
                }
            }
        }

        state.cards[index].updated_at = Utc::now();
        Ok(state.cards[index].clone())
    }

    async fn delete_card(&self, id: CardId) -> Result<()> {
        let mut state = self.begin(ApiCall::DeleteCard(id))?;
        let index = state.card_index(id)?;
        let list_id = state.cards[index].list_id;

        state.cards.remove(index);
        state.renumber_cards(list_id);
        Ok(())
    }
}
