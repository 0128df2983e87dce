//! Terminal styling utilities
//!
//! Consistent colors for board output. Uses crossterm for cross-platform
//! terminal colors.

use crate::board::{ActivityKind, NotificationLevel};
use crossterm::style::{StyledContent, Stylize};

/// Activity kind colors
/// - added: Green
/// - edited: Yellow
/// - moved: Cyan
/// - deleted: Red
pub fn activity_style(kind: ActivityKind) -> StyledContent<String> {
    let label = format!("[{}]", kind);
    match kind {
        ActivityKind::CardAdded | ActivityKind::ListAdded => label.green(),
        ActivityKind::CardEdited | ActivityKind::ListEdited => label.yellow(),
        ActivityKind::CardMoved => label.cyan(),
        ActivityKind::CardDeleted | ActivityKind::ListDeleted => label.red(),
    }
}

/// Marker printed before a notification
pub fn notification_indicator(level: NotificationLevel) -> StyledContent<&'static str> {
    match level {
        NotificationLevel::Success => "✓".green(),
        NotificationLevel::Info => "ℹ".blue(),
        NotificationLevel::Warning => "!".yellow(),
        NotificationLevel::Error => "✗".red(),
    }
}

/// Card count next to a list title
pub fn card_count(n: usize) -> StyledContent<String> {
    let label = if n == 1 {
        "1 card".to_string()
    } else {
        format!("{} cards", n)
    };
    if n == 0 {
        label.dark_grey()
    } else {
        label.white()
    }
}

/// Section headers
pub fn header(text: &str) -> StyledContent<String> {
    text.to_string().bold()
}

/// Subheaders
pub fn subheader(text: &str) -> StyledContent<String> {
    text.to_string().underlined()
}

/// Dim/muted text
pub fn dim(text: &str) -> StyledContent<String> {
    text.to_string().dark_grey()
}

pub fn success(text: &str) -> StyledContent<String> {
    text.to_string().green()
}

pub fn warning(text: &str) -> StyledContent<String> {
    text.to_string().yellow()
}

pub fn error(text: &str) -> StyledContent<String> {
    text.to_string().red()
}

/// Numeric id shown as `#12`
pub fn id(id: impl std::fmt::Display) -> StyledContent<String> {
    format!("#{}", id).cyan()
}
