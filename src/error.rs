use thiserror::Error;

pub type Result<T> = std::result::Result<T, KanbanError>;

#[derive(Debug, Error)]
pub enum KanbanError {
    #[error("Board not loaded")]
    BoardNotLoaded,

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Card not found: {0}")]
    CardNotFound(String),

    #[error("Card {card_id} not found in column {column_id}")]
    CardNotInColumn { card_id: String, column_id: String },

    #[error("Column position {position} out of range for {len} columns")]
    ColumnPositionOutOfRange { position: usize, len: usize },

    #[error("Card title must not be empty")]
    EmptyTitle,

    #[error("Board invariant violated: {0}")]
    InvariantViolation(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
