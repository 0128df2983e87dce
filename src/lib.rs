//! corkboard - Kanban board client
//!
//! Talks to a Kanban REST backend and keeps an ordered tree of lists and
//! cards consistent across optimistic local edits, server persistence and
//! drag-and-drop reordering, rolling back when the server refuses a change.
//!
//! # Architecture
//!
//! - **http**: JSON client with bearer auth and single-flight token refresh
//! - **retry**: Bounded exponential-backoff retry
//! - **api**: `BoardApi` seam with REST and in-memory backends
//! - **board**: Board model, drag resolution, activity log and the store
//! - **dashboard**: Board directory (create/rename/delete)
//! - **auth**: Login, registration, logout and password changes
//! - **config**: YAML configuration and validation

// Core modules
pub mod config;
pub mod error;
pub mod http;
pub mod retry;

// Board state
pub mod api;
pub mod board;
pub mod dashboard;

// Accounts
pub mod auth;

// Terminal front-end
pub mod logging;
pub mod prompt;
pub mod style;

// Re-exports
pub use error::{CorkboardError, Result};
