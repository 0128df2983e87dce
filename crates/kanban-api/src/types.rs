//! Request and response bodies exchanged with the REST API
//!
//! Field names follow the backend's camelCase JSON. Create/update responses
//! wrap the entity under a named key next to a `message`; collection
//! responses wrap arrays under the plural key.

use crate::ids::{BoardId, CardId, ListId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================
// Entities
// ============================================

/// Registered user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub full_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Board summary as returned by the board endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: BoardId,
    pub title: String,
    pub owner_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// List (column) without its cards
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct List {
    pub id: ListId,
    pub title: String,
    pub position: u32,
    pub board_id: BoardId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Card inside a list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: CardId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub position: u32,
    pub list_id: ListId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// List with its nested cards, part of the full board payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullList {
    #[serde(flatten)]
    pub list: List,
    #[serde(default)]
    pub cards: Vec<Card>,
}

/// Board with every list and card nested inside it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullBoard {
    #[serde(flatten)]
    pub board: Board,
    #[serde(default)]
    pub lists: Vec<FullList>,
}

// ============================================
// Auth
// ============================================

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Response of login and register
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub user: User,
    #[serde(alias = "token")]
    pub access_token: String,
}

/// Response of the refresh endpoint; the user is optional there
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    #[serde(alias = "token")]
    pub access_token: String,
    #[serde(default)]
    pub user: Option<User>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MeResponse {
    pub user: User,
}

// ============================================
// Boards
// ============================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateBoardRequest {
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct UpdateBoardRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BoardResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub board: Board,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BoardsResponse {
    pub boards: Vec<Board>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FullBoardResponse {
    pub board: FullBoard,
}

// ============================================
// Lists
// ============================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateListRequest {
    pub title: String,
    pub board_id: BoardId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
}

/// Partial list update; absent fields are left untouched by the server
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct UpdateListRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
}

impl UpdateListRequest {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    pub fn position(position: u32) -> Self {
        Self {
            position: Some(position),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub list: List,
}

// ============================================
// Cards
// ============================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCardRequest {
    pub title: String,
    pub list_id: ListId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
}

/// Partial card update
///
/// `description` is doubly optional: `None` leaves it alone, `Some(None)`
/// clears it (serialized as `null`). Setting `list_id` moves the card to
/// another list.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCardRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_id: Option<ListId>,
}

impl UpdateCardRequest {
    pub fn content(title: impl Into<String>, description: Option<String>) -> Self {
        Self {
            title: Some(title.into()),
            description: Some(description),
            ..Default::default()
        }
    }

    pub fn position(position: u32) -> Self {
        Self {
            position: Some(position),
            ..Default::default()
        }
    }

    pub fn moved_to(list_id: ListId, position: u32) -> Self {
        Self {
            position: Some(position),
            list_id: Some(list_id),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CardResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub card: Card,
}

// ============================================
// Misc
// ============================================

/// Error body returned with non-2xx statuses
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub details: Option<serde_json::Value>,
}

impl ErrorBody {
    /// Human-readable message: `error` first, then `message`
    pub fn reason(&self) -> Option<&str> {
        self.error
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.message.as_deref().filter(|s| !s.is_empty()))
    }
}
