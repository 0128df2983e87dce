//! Drag-and-drop reorder resolution
//!
//! A finished drag is described by [`DragResult`], independent of whatever
//! front-end produced it. [`plan_drag`] applies the move to the local lists
//! and returns the single update the server needs, or `None` when the drag
//! changes nothing. The function is pure; persisting the plan and rolling
//! back on failure is the store's job.

use super::model::{renumber, List};
use kanban_api::{CardId, ListId};

/// A card slot: the list holding it and its index within that list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardSlot {
    pub list_id: ListId,
    pub index: usize,
}

impl CardSlot {
    pub fn new(list_id: ListId, index: usize) -> Self {
        Self { list_id, index }
    }
}

/// Outcome of a drag gesture
///
/// `destination` is `None` when the item was dropped outside any container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragResult {
    /// A whole list dragged along the board
    List {
        source: usize,
        destination: Option<usize>,
    },
    /// A card dragged within a list or onto another list
    Card {
        source: CardSlot,
        destination: Option<CardSlot>,
    },
}

impl DragResult {
    pub fn list(source: usize, destination: usize) -> Self {
        DragResult::List {
            source,
            destination: Some(destination),
        }
    }

    pub fn card(source: CardSlot, destination: CardSlot) -> Self {
        DragResult::Card {
            source,
            destination: Some(destination),
        }
    }

    /// Dropped outside any container, or back where it started
    pub fn is_noop(&self) -> bool {
        match self {
            DragResult::List {
                source,
                destination,
            } => destination.map_or(true, |d| d == *source),
            DragResult::Card {
                source,
                destination,
            } => destination.map_or(true, |d| d == *source),
        }
    }
}

/// The server update that makes a drag durable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistPlan {
    /// `PUT /lists/{list_id}` with the new position
    ListPosition { list_id: ListId, position: u32 },
    /// `PUT /cards/{card_id}` with a new position in the same list
    CardPosition {
        card_id: CardId,
        list_id: ListId,
        position: u32,
    },
    /// `PUT /cards/{card_id}` with both the new list and position
    CardMove {
        card_id: CardId,
        from_list: ListId,
        to_list: ListId,
        position: u32,
    },
}

/// Apply a drag to `lists` and return what must be persisted
///
/// Indices come from the drag source and are trusted to be in range; a
/// stale source index or unknown list id is ignored with a warning and
/// leaves `lists` untouched. Destination indices past the end append.
pub fn plan_drag(lists: &mut Vec<List>, result: &DragResult) -> Option<PersistPlan> {
    if result.is_noop() {
        return None;
    }

    let plan = match *result {
        DragResult::List {
            source,
            destination: Some(destination),
        } => move_list(lists, source, destination)?,
        DragResult::Card {
            source,
            destination: Some(destination),
        } if source.list_id == destination.list_id => {
            reorder_card(lists, source.list_id, source.index, destination.index)?
        }
        DragResult::Card {
            source,
            destination: Some(destination),
        } => move_card(lists, source, destination)?,
        _ => return None,
    };

    renumber(lists);
    Some(plan)
}

fn move_list(lists: &mut Vec<List>, source: usize, destination: usize) -> Option<PersistPlan> {
    if source >= lists.len() {
        tracing::warn!(source, len = lists.len(), "List drag source out of range");
        return None;
    }

    // Past-the-end drops append; one that lands on the source moves nothing
    let index = destination.min(lists.len() - 1);
    if index == source {
        return None;
    }

    let list = lists.remove(source);
    let list_id = list.id;
    lists.insert(index, list);

    Some(PersistPlan::ListPosition {
        list_id,
        position: index as u32,
    })
}

fn reorder_card(
    lists: &mut [List],
    list_id: ListId,
    source: usize,
    destination: usize,
) -> Option<PersistPlan> {
    let Some(list) = lists.iter_mut().find(|l| l.id == list_id) else {
        tracing::warn!(list_id = %list_id, "Card drag in unknown list");
        return None;
    };
    if source >= list.cards.len() {
        tracing::warn!(source, len = list.cards.len(), "Card drag source out of range");
        return None;
    }

    let index = destination.min(list.cards.len() - 1);
    if index == source {
        return None;
    }

    let card = list.cards.remove(source);
    let card_id = card.id;
    list.cards.insert(index, card);

    Some(PersistPlan::CardPosition {
        card_id,
        list_id,
        position: index as u32,
    })
}

fn move_card(lists: &mut [List], source: CardSlot, destination: CardSlot) -> Option<PersistPlan> {
    let from = lists.iter().position(|l| l.id == source.list_id);
    let to = lists.iter().position(|l| l.id == destination.list_id);
    let (Some(from), Some(to)) = (from, to) else {
        tracing::warn!(
            from = %source.list_id,
            to = %destination.list_id,
            "Card drag between unknown lists"
        );
        return None;
    };
    if source.index >= lists[from].cards.len() {
        tracing::warn!(
            source = source.index,
            len = lists[from].cards.len(),
            "Card drag source out of range"
        );
        return None;
    }

    let mut card = lists[from].cards.remove(source.index);
    card.list_id = destination.list_id;
    let card_id = card.id;

    let target = &mut lists[to].cards;
    let index = destination.index.min(target.len());
    target.insert(index, card);

    Some(PersistPlan::CardMove {
        card_id,
        from_list: source.list_id,
        to_list: destination.list_id,
        position: index as u32,
    })
}
