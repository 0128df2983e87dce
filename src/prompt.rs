//! Terminal collaborators and prompts
//!
//! dialoguer-backed confirmation and input for the CLI, plus a notifier that
//! prints to stderr. Prompts block, so confirmation runs on the blocking pool.

use crate::board::{Confirm, ConfirmRequest, Notification, NotificationLevel, Notifier};
use crate::style;
use crate::Result;
use anyhow::Context;
use async_trait::async_trait;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Password};

/// Asks on the terminal, or answers yes when `--yes` was given
#[derive(Debug, Clone, Copy)]
pub struct TerminalConfirm {
    assume_yes: bool,
}

impl TerminalConfirm {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

#[async_trait]
impl Confirm for TerminalConfirm {
    async fn confirm(&self, request: &ConfirmRequest) -> bool {
        if self.assume_yes {
            return true;
        }

        let prompt = format!(
            "{} - {} [{} / {}]",
            request.title, request.message, request.confirm_text, request.cancel_text
        );
        let answer = tokio::task::spawn_blocking(move || {
            dialoguer::Confirm::with_theme(&ColorfulTheme::default())
                .with_prompt(prompt)
                .default(false)
                .interact()
        })
        .await;

        // Not a terminal, interrupted, or the task died: treat as cancel
        matches!(answer, Ok(Ok(true)))
    }
}

/// Prints notifications to stderr
///
/// Errors are skipped: the CLI reports them once on exit.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, notification: Notification) {
        if notification.level == NotificationLevel::Error {
            tracing::debug!(message = %notification.message, "Error left to exit path");
            return;
        }
        eprintln!(
            "{} {}",
            style::notification_indicator(notification.level),
            notification.message
        );
    }
}

/// Read a line of text
pub fn input(prompt: &str) -> Result<String> {
    let value: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .interact_text()
        .with_context(|| format!("Failed to read {}", prompt.to_lowercase()))?;
    Ok(value)
}

/// Read a password without echo
pub fn password(prompt: &str) -> Result<String> {
    let value = Password::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .interact()
        .with_context(|| format!("Failed to read {}", prompt.to_lowercase()))?;
    Ok(value)
}
