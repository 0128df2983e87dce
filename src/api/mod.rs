//! Board, list and card resources
//!
//! [`BoardApi`] is the seam between the board store and the backend.
//! [`RestBoardApi`] talks to the REST server through [`ApiClient`];
//! [`MemoryBoardApi`] keeps everything in process for tests and offline use.
//!
//! [`ApiClient`]: crate::http::ApiClient

mod memory;
mod rest;

pub use memory::{ApiCall, Failure, MemoryBoardApi};
pub use rest::RestBoardApi;

use crate::Result;
use async_trait::async_trait;
use kanban_api::{
    Board, BoardId, Card, CardId, CreateBoardRequest, CreateCardRequest, CreateListRequest,
    FullBoard, List, ListId, UpdateBoardRequest, UpdateCardRequest, UpdateListRequest,
};

/// Resource operations needed by the dashboard and the board store
#[async_trait]
pub trait BoardApi: Send + Sync {
    /// Boards owned by the signed-in user
    async fn list_boards(&self) -> Result<Vec<Board>>;

    async fn create_board(&self, request: &CreateBoardRequest) -> Result<Board>;

    async fn update_board(&self, id: BoardId, request: &UpdateBoardRequest) -> Result<Board>;

    async fn delete_board(&self, id: BoardId) -> Result<()>;

    /// A board with every list and card nested inside
    async fn fetch_full_board(&self, id: BoardId) -> Result<FullBoard>;

    async fn create_list(&self, request: &CreateListRequest) -> Result<List>;

    async fn update_list(&self, id: ListId, request: &UpdateListRequest) -> Result<List>;

    async fn delete_list(&self, id: ListId) -> Result<()>;

    async fn create_card(&self, request: &CreateCardRequest) -> Result<Card>;

    async fn update_card(&self, id: CardId, request: &UpdateCardRequest) -> Result<Card>;

    async fn delete_card(&self, id: CardId) -> Result<()>;
}
