//! Wire schema for the Kanban REST API
//!
//! Typed ids, entities, request bodies, response envelopes and endpoint
//! paths shared by every client of the backend.
//!
//! # Example
//!
//! ```
//! use kanban_api::{endpoints, ListId, UpdateListRequest};
//!
//! let path = endpoints::lists::item(ListId::new(7));
//! let body = serde_json::to_value(UpdateListRequest::position(0)).unwrap();
//!
//! assert_eq!(path, "/api/lists/7");
//! assert_eq!(body["position"], 0);
//! ```

pub mod endpoints;
mod ids;
mod types;

pub use ids::{BoardId, CardId, ListId, UserId};
pub use types::{
    AuthResponse, Board, BoardResponse, BoardsResponse, Card, CardResponse,
    ChangePasswordRequest, CreateBoardRequest, CreateCardRequest, CreateListRequest, ErrorBody,
    FullBoard, FullBoardResponse, FullList, List, ListResponse, LoginRequest,
    MeResponse, RefreshResponse, RegisterRequest, UpdateBoardRequest,
    UpdateCardRequest, UpdateListRequest, User,
};
