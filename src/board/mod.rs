//! Board state: model, drag resolution, activity log and the store that
//! reconciles them with the backend

pub mod activity;
pub mod collaborators;
pub mod drag;
pub mod model;
mod store;

pub use activity::{Activity, ActivityKind, ActivityLog, ActivityMetadata};
pub use collaborators::{
    AutoConfirm, Confirm, ConfirmRequest, ConfirmTone, LogNotifier, Notification,
    NotificationLevel, Notifier, QueuedNotifier,
};
pub use drag::{plan_drag, CardSlot, DragResult, PersistPlan};
pub use model::{Board, Card, CardDraft, List};
pub use store::BoardStore;
