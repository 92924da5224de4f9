//! Drag gesture state and drop-position geometry.
//!
//! A drag is `Idle -> Dragging -> Idle`. While dragging, the view reports the
//! column under the pointer together with the insertion index computed by
//! [`drop_index`]; only the latest report is kept. The board itself is only
//! touched when the drop completes.

use crate::domain::ids::{CardId, ColumnId};
use serde::{Deserialize, Serialize};

/// Candidate drop location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropTarget {
    pub column_id: ColumnId,
    pub index: usize,
}

/// State of an in-progress drag
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        card_id: CardId,
        source_column_id: ColumnId,
        target: Option<DropTarget>,
    },
}

impl DragState {
    /// Begins dragging a card, discarding any previous drag and its target
    pub fn start(&mut self, card_id: CardId, source_column_id: ColumnId) {
        *self = Self::Dragging {
            card_id,
            source_column_id,
            target: None,
        };
    }

    /// Records the latest candidate drop location.
    ///
    /// Returns `false` (and changes nothing) when no drag is in progress.
    pub fn update_target(&mut self, column_id: ColumnId, index: usize) -> bool {
        match self {
            Self::Dragging { target, .. } => {
                *target = Some(DropTarget { column_id, index });
                true
            }
            Self::Idle => false,
        }
    }

    /// Returns to idle. Safe to call at any time.
    pub fn end(&mut self) {
        *self = Self::Idle;
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging { .. })
    }

    pub fn dragged_card_id(&self) -> Option<&CardId> {
        match self {
            Self::Dragging { card_id, .. } => Some(card_id),
            Self::Idle => None,
        }
    }

    pub fn source_column_id(&self) -> Option<&ColumnId> {
        match self {
            Self::Dragging {
                source_column_id, ..
            } => Some(source_column_id),
            Self::Idle => None,
        }
    }

    pub fn target(&self) -> Option<&DropTarget> {
        match self {
            Self::Dragging { target, .. } => target.as_ref(),
            Self::Idle => None,
        }
    }

    pub fn target_column_id(&self) -> Option<&ColumnId> {
        self.target().map(|target| &target.column_id)
    }

    pub fn target_index(&self) -> Option<usize> {
        self.target().map(|target| target.index)
    }

    pub fn is_card_dragged(&self, card_id: &CardId) -> bool {
        self.dragged_card_id() == Some(card_id)
    }

    /// True when the pointer is currently over this column
    pub fn is_target_column(&self, column_id: &ColumnId) -> bool {
        self.target_column_id() == Some(column_id)
    }
}

/// Vertical extent of a rendered card
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardBounds {
    pub top: f64,
    pub height: f64,
}

impl CardBounds {
    pub fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    pub fn mid_y(&self) -> f64 {
        self.top + self.height / 2.0
    }
}

/// Insertion index for a pointer at `pointer_y` over cards laid out top to bottom.
///
/// The first card whose midpoint is below the pointer gets displaced; past
/// the last midpoint the card is appended.
pub fn drop_index(pointer_y: f64, cards: &[CardBounds]) -> usize {
    cards
        .iter()
        .position(|bounds| pointer_y < bounds.mid_y())
        .unwrap_or(cards.len())
}
