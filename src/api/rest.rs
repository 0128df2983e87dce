//! REST implementation of [`BoardApi`]

use super::BoardApi;
use crate::http::{ApiClient, Auth};
use crate::Result;
use async_trait::async_trait;
use kanban_api::{
    endpoints, Board, BoardId, BoardResponse, BoardsResponse, Card, CardId, CardResponse,
    CreateBoardRequest, CreateCardRequest, CreateListRequest, FullBoard, FullBoardResponse, List,
    ListId, ListResponse, UpdateBoardRequest, UpdateCardRequest,
    UpdateListRequest,
};
use std::sync::Arc;

/// Board resources served by the Kanban REST API
///
/// Every call is authenticated; entity payloads arrive wrapped under a named
/// key (`{"board": ...}`, `{"lists": [...]}`) and are unwrapped here.
#[derive(Clone)]
pub struct RestBoardApi {
    client: Arc<ApiClient>,
}

impl RestBoardApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Arc<ApiClient> {
        &self.client
    }
}

#[async_trait]
impl BoardApi for RestBoardApi {
    async fn list_boards(&self) -> Result<Vec<Board>> {
        let response: BoardsResponse = self
            .client
            .get(endpoints::boards::COLLECTION, Auth::Bearer)
            .await?
            .into_json()?;
        Ok(response.boards)
    }

    async fn create_board(&self, request: &CreateBoardRequest) -> Result<Board> {
        let response: BoardResponse = self
            .client
            .post(endpoints::boards::COLLECTION, request, Auth::Bearer)
            .await?
            .into_json()?;
        Ok(response.board)
    }

    async fn update_board(&self, id: BoardId, request: &UpdateBoardRequest) -> Result<Board> {
        let response: BoardResponse = self
            .client
            .put(&endpoints::boards::item(id), request, Auth::Bearer)
            .await?
            .into_json()?;
        Ok(response.board)
    }

    async fn delete_board(&self, id: BoardId) -> Result<()> {
        self.client
            .delete(&endpoints::boards::item(id), Auth::Bearer)
            .await?;
        Ok(())
    }

    async fn fetch_full_board(&self, id: BoardId) -> Result<FullBoard> {
        let response: FullBoardResponse = self
            .client
            .get(&endpoints::boards::full(id), Auth::Bearer)
            .await?
            .into_json()?;
        Ok(response.board)
    }

    async fn create_list(&self, request: &CreateListRequest) -> Result<List> {
        let response: ListResponse = self
            .client
            .post(endpoints::lists::COLLECTION, request, Auth::Bearer)
            .await?
            .into_json()?;
        Ok(response.list)
    }

    async fn update_list(&self, id: ListId, request: &UpdateListRequest) -> Result<List> {
        let response: ListResponse = self
            .client
            .put(&endpoints::lists::item(id), request, Auth::Bearer)
            .await?
            .into_json()?;
        Ok(response.list)
    }

    async fn delete_list(&self, id: ListId) -> Result<()> {
        self.client
            .delete(&endpoints::lists::item(id), Auth::Bearer)
            .await?;
        Ok(())
    }

    async fn create_card(&self, request: &CreateCardRequest) -> Result<Card> {
        let response: CardResponse = self
            .client
            .post(endpoints::cards::COLLECTION, request, Auth::Bearer)
            .await?
            .into_json()?;
        Ok(response.card)
    }

    async fn update_card(&self, id: CardId, request: &UpdateCardRequest) -> Result<Card> {
        let response: CardResponse = self
            .client
            .put(&endpoints::cards::item(id), request, Auth::Bearer)
            .await?
            .into_json()?;
        Ok(response.card)
    }

    async fn delete_card(&self, id: CardId) -> Result<()> {
        self.client
            .delete(&endpoints::cards::item(id), Auth::Bearer)
            .await?;
        Ok(())
    }
}
