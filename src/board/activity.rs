//! Session-local activity log
//!
//! Every successful mutation on the open board records an entry. The log is
//! newest-first, never persisted, and ids are unique for the session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// What happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    CardAdded,
    CardEdited,
    CardDeleted,
    CardMoved,
    ListAdded,
    ListEdited,
    ListDeleted,
}

impl ActivityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::CardAdded => "card_added",
            ActivityKind::CardEdited => "card_edited",
            ActivityKind::CardDeleted => "card_deleted",
            ActivityKind::CardMoved => "card_moved",
            ActivityKind::ListAdded => "list_added",
            ActivityKind::ListEdited => "list_edited",
            ActivityKind::ListDeleted => "list_deleted",
        }
    }
}

impl std::fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Titles involved in an activity, whichever apply
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_list: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_list: Option<String>,
}

impl ActivityMetadata {
    pub fn card(card_title: impl Into<String>, list_title: impl Into<String>) -> Self {
        Self {
            card_title: Some(card_title.into()),
            list_title: Some(list_title.into()),
            ..Default::default()
        }
    }

    pub fn list(list_title: impl Into<String>) -> Self {
        Self {
            list_title: Some(list_title.into()),
            ..Default::default()
        }
    }

    pub fn moved(
        card_title: impl Into<String>,
        from_list: impl Into<String>,
        to_list: impl Into<String>,
    ) -> Self {
        Self {
            card_title: Some(card_title.into()),
            from_list: Some(from_list.into()),
            to_list: Some(to_list.into()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub id: u64,
    pub kind: ActivityKind,
    pub timestamp: DateTime<Utc>,
    pub description: String,
    #[serde(default)]
    pub metadata: ActivityMetadata,
}

/// Newest-first activity entries for the current session
#[derive(Debug, Default)]
pub struct ActivityLog {
    entries: VecDeque<Activity>,
    next_id: u64,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend an entry and return its id
    pub fn record(
        &mut self,
        kind: ActivityKind,
        description: impl Into<String>,
        metadata: ActivityMetadata,
    ) -> u64 {
        self.next_id += 1;
        let activity = Activity {
            id: self.next_id,
            kind,
            timestamp: Utc::now(),
            description: description.into(),
            metadata,
        };

        tracing::debug!(kind = %kind, description = %activity.description, "Activity recorded");
        self.entries.push_front(activity);
        self.next_id
    }

    /// Entries, newest first
    pub fn entries(&self) -> impl Iterator<Item = &Activity> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&Activity> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry; ids keep counting up
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newest_first_with_unique_ids() {
        let mut log = ActivityLog::new();
        let first = log.record(
            ActivityKind::ListAdded,
            "Created list \"To Do\"",
            ActivityMetadata::list("To Do"),
        );
        let second = log.record(
            ActivityKind::CardAdded,
            "Added card \"Write tests\"",
            ActivityMetadata::card("Write tests", "To Do"),
        );

        assert_ne!(first, second);
        let kinds: Vec<_> = log.entries().map(|a| a.kind).collect();
        assert_eq!(kinds, vec![ActivityKind::CardAdded, ActivityKind::ListAdded]);
        assert_eq!(log.latest().map(|a| a.id), Some(second));
    }

    #[test]
    fn test_clear_keeps_counting() {
        let mut log = ActivityLog::new();
        let before = log.record(ActivityKind::ListDeleted, "x", ActivityMetadata::default());
        log.clear();
        assert!(log.is_empty());

        let after = log.record(ActivityKind::ListDeleted, "y", ActivityMetadata::default());
        assert!(after > before);
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_kind_serialization() {
        let json = serde_json::to_string(&ActivityKind::CardMoved).unwrap();
        assert_eq!(json, "\"card_moved\"");
        assert_eq!(ActivityKind::ListEdited.to_string(), "list_edited");
    }

    #[test]
    fn test_metadata_skips_absent_fields() {
        let value = serde_json::to_value(ActivityMetadata::moved("Fix", "To Do", "Done")).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"card_title": "Fix", "from_list": "To Do", "to_list": "Done"})
        );
    }
}
