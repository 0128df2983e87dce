//! Local board entities
//!
//! Boards and cards are the wire types as-is; a list owns its cards so the
//! whole board is one ordered tree. Positions are dense zero-based ranks
//! derived from array order by `renumber`.

use kanban_api::{BoardId, CardId, FullList, ListId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use kanban_api::{Board, Card};

/// A list on the open board, holding its cards in display order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct List {
    pub id: ListId,
    pub title: String,
    pub position: u32,
    pub board_id: BoardId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub cards: Vec<Card>,
}

impl List {
    /// Build an empty local list from a freshly created wire list
    pub fn from_created(list: kanban_api::List) -> Self {
        Self {
            id: list.id,
            title: list.title,
            position: list.position,
            board_id: list.board_id,
            created_at: list.created_at,
            updated_at: list.updated_at,
            cards: Vec::new(),
        }
    }

    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }

    pub fn card_mut(&mut self, id: CardId) -> Option<&mut Card> {
        self.cards.iter_mut().find(|c| c.id == id)
    }

    /// Rewrite card positions and owner ids from array order
    pub fn renumber_cards(&mut self) {
        for (index, card) in self.cards.iter_mut().enumerate() {
            card.position = index as u32;
            card.list_id = self.id;
        }
    }
}

impl From<FullList> for List {
    /// Map a nested list from the full board payload, cards sorted by position
    fn from(full: FullList) -> Self {
        let mut cards = full.cards;
        cards.sort_by_key(|c| c.position);

        Self {
            id: full.list.id,
            title: full.list.title,
            position: full.list.position,
            board_id: full.list.board_id,
            created_at: full.list.created_at,
            updated_at: full.list.updated_at,
            cards,
        }
    }
}

/// Title and description entered for a new or edited card
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardDraft {
    pub title: String,
    pub description: Option<String>,
}

impl CardDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
        }
    }

    /// Draft for editing `card`, keeping whatever is not overridden
    ///
    /// `clear_description` wins over a new description.
    pub fn editing(
        card: &Card,
        title: Option<String>,
        description: Option<String>,
        clear_description: bool,
    ) -> Self {
        let description = if clear_description {
            None
        } else {
            description.or_else(|| card.description.clone())
        };
        Self {
            title: title.unwrap_or_else(|| card.title.clone()),
            description,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Trimmed title, or `None` when nothing but whitespace was entered
    pub fn trimmed_title(&self) -> Option<&str> {
        non_blank(&self.title)
    }

    /// Description with blank text treated as absent
    pub fn normalized_description(&self) -> Option<String> {
        self.description
            .as_deref()
            .and_then(non_blank)
            .map(str::to_string)
    }
}

/// Trim `s`, returning `None` when it is empty afterwards
pub fn non_blank(s: &str) -> Option<&str> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Rewrite list and card positions so every sibling set is {0..n-1}
pub fn renumber(lists: &mut [List]) {
    for (index, list) in lists.iter_mut().enumerate() {
        list.position = index as u32;
        list.renumber_cards();
    }
}

/// Whether every sibling set is dense and every card points at its list
pub fn is_consistent(lists: &[List]) -> bool {
    lists.iter().enumerate().all(|(i, list)| {
        list.position == i as u32
            && list
                .cards
                .iter()
                .enumerate()
                .all(|(j, card)| card.position == j as u32 && card.list_id == list.id)
    })
}
