//! # Kanban Core
//!
//! Board model, drag state machine and move engine for drag-and-drop kanban
//! boards.
//!
//! This crate holds the ordering logic behind a board UI: which card is being
//! dragged, where it would land, and how cards are relocated between columns
//! while every column keeps a dense 0-based `order`. Rendering, persistence
//! and pointer handling belong to the embedding application.

pub mod domain;
pub mod error;
pub mod services;
pub mod store;

// Re-export commonly used types
pub use domain::{
    board::{Board, BoardConfig, ColumnConfig},
    card::{Card, CardDraft, CardUpdate, DueStatus, Label, Priority, User},
    column::{Column, ColumnDraft, ColumnStatus, ColumnUpdate},
    drag::{drop_index, CardBounds, DragState, DropTarget},
    filter::{filter_board, search_cards},
    ids::{BoardId, CardId, ColumnId, LabelId, UserId},
};
pub use error::{KanbanError, Result};
pub use mockable::{Clock, DefaultClock};
pub use services::{IdGenerator, ManualClock, SequentialIdGenerator, UuidGenerator};
pub use store::KanbanStore;
