//! Pluggable UI collaborators
//!
//! Destructive operations ask a [`Confirm`] implementation before touching
//! the server, and failures and successes are surfaced through a
//! [`Notifier`]. Terminal and test front-ends supply their own.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

/// Visual weight of a confirmation dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmTone {
    Danger,
    Warning,
    Info,
}

/// A yes/no question shown before a destructive action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmRequest {
    pub title: String,
    pub message: String,
    pub confirm_text: String,
    pub cancel_text: String,
    pub tone: ConfirmTone,
}

impl ConfirmRequest {
    pub fn danger(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            confirm_text: "Delete".to_string(),
            cancel_text: "Cancel".to_string(),
            tone: ConfirmTone::Danger,
        }
    }

    pub fn delete_list(list_title: &str) -> Self {
        Self::danger(
            "Delete List",
            format!(
                "Are you sure you want to delete \"{}\"? All cards in this list will be permanently deleted.",
                list_title
            ),
        )
    }

    pub fn delete_board(board_title: &str) -> Self {
        Self::danger(
            "Delete Board",
            format!(
                "Are you sure you want to delete \"{}\"? This will delete all lists and cards in this board.",
                board_title
            ),
        )
    }
}

/// Asks the user to confirm or cancel
#[async_trait]
pub trait Confirm: Send + Sync {
    /// `true` to proceed, `false` when the user cancelled
    async fn confirm(&self, request: &ConfirmRequest) -> bool;
}

/// Answers every confirmation with a fixed value
#[derive(Debug, Clone, Copy)]
pub struct AutoConfirm(pub bool);

#[async_trait]
impl Confirm for AutoConfirm {
    async fn confirm(&self, request: &ConfirmRequest) -> bool {
        tracing::debug!(title = %request.title, answer = self.0, "Auto-answering confirmation");
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

/// Receives user-facing notifications
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);

    fn error(&self, message: &str) {
        self.notify(Notification {
            level: NotificationLevel::Error,
            message: message.to_string(),
        });
    }

    fn success(&self, message: &str) {
        self.notify(Notification {
            level: NotificationLevel::Success,
            message: message.to_string(),
        });
    }
}

/// Writes notifications to the tracing log only
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Error => tracing::error!("{}", notification.message),
            NotificationLevel::Warning => tracing::warn!("{}", notification.message),
            NotificationLevel::Success | NotificationLevel::Info => {
                tracing::info!("{}", notification.message)
            }
        }
    }
}

/// Buffers notifications until a front-end drains them
#[derive(Debug, Default)]
pub struct QueuedNotifier {
    queue: Mutex<VecDeque<Notification>>,
}

impl QueuedNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every pending notification, oldest first
    pub fn drain(&self) -> Vec<Notification> {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain(..)
            .collect()
    }

    /// Messages of pending errors, without draining
    pub fn errors(&self) -> Vec<String> {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|n| n.level == NotificationLevel::Error)
            .map(|n| n.message.clone())
            .collect()
    }
}

impl Notifier for QueuedNotifier {
    fn notify(&self, notification: Notification) {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(notification);
    }
}
