//! Endpoint paths, relative to the API base URL

use crate::ids::{BoardId, CardId, ListId};

pub mod auth {
    pub const LOGIN: &str = "/api/auth/login";
    pub const REGISTER: &str = "/api/auth/register";
    pub const REFRESH: &str = "/api/auth/refresh";
    pub const LOGOUT: &str = "/api/auth/logout";
    pub const ME: &str = "/api/auth/me";
    pub const CHANGE_PASSWORD: &str = "/api/auth/change-password";
}

pub mod boards {
    use super::BoardId;

    pub const COLLECTION: &str = "/api/boards";

    pub fn item(id: BoardId) -> String {
        format!("/api/boards/{}", id)
    }

    pub fn full(id: BoardId) -> String {
        format!("/api/boards/{}/full", id)
    }
}

pub mod lists {
    use super::ListId;

    pub const COLLECTION: &str = "/api/lists";

    pub fn item(id: ListId) -> String {
        format!("/api/lists/{}", id)
    }
}

pub mod cards {
    use super::CardId;

    pub const COLLECTION: &str = "/api/cards";

    pub fn item(id: CardId) -> String {
        format!("/api/cards/{}", id)
    }
}
