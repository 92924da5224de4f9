pub mod board;
pub mod card;
pub mod column;
pub mod drag;
pub mod filter;
pub mod ids;

pub use board::{Board, BoardConfig, ColumnConfig};
pub use card::{Card, CardDraft, CardUpdate, DueStatus, Label, Priority, User};
pub use column::{Column, ColumnDraft, ColumnStatus, ColumnUpdate};
pub use drag::{drop_index, CardBounds, DragState, DropTarget};
pub use filter::{filter_board, search_cards};
pub use ids::{BoardId, CardId, ColumnId, LabelId, UserId};
