use crate::domain::{
    card::Card,
    ids::{CardId, ColumnId},
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Workflow status a column represents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColumnStatus {
    #[default]
    Todo,
    InProgress,
    Review,
    Done,
}

impl fmt::Display for ColumnStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Todo => write!(f, "To Do"),
            Self::InProgress => write!(f, "In Progress"),
            Self::Review => write!(f, "Review"),
            Self::Done => write!(f, "Done"),
        }
    }
}

/// A column of ordered cards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub id: ColumnId,
    pub title: String,
    pub status: ColumnStatus,
    pub order: usize,
    /// Advisory WIP limit. Never blocks adds or moves.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default)]
    pub cards: Vec<Card>,
}

impl Column {
    pub fn new(id: impl Into<ColumnId>, title: impl Into<String>, status: ColumnStatus) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            status,
            order: 0,
            limit: None,
            cards: Vec::new(),
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn card(&self, id: &CardId) -> Option<&Card> {
        self.cards.iter().find(|card| &card.id == id)
    }

    pub fn card_mut(&mut self, id: &CardId) -> Option<&mut Card> {
        self.cards.iter_mut().find(|card| &card.id == id)
    }

    /// Sequence position of a card in this column
    pub fn position_of(&self, id: &CardId) -> Option<usize> {
        self.cards.iter().position(|card| &card.id == id)
    }

    fn active_limit(&self) -> Option<usize> {
        self.limit.filter(|&limit| limit > 0).map(|limit| limit as usize)
    }

    /// True when the column holds at least as many cards as its limit
    pub fn is_at_limit(&self) -> bool {
        self.active_limit()
            .map(|limit| self.cards.len() >= limit)
            .unwrap_or(false)
    }

    /// True when the column holds more cards than its limit
    pub fn is_over_limit(&self) -> bool {
        self.active_limit()
            .map(|limit| self.cards.len() > limit)
            .unwrap_or(false)
    }

    /// Rewrites every card's `order` to its sequence position
    pub(crate) fn renumber_cards(&mut self) {
        for (index, card) in self.cards.iter_mut().enumerate() {
            card.order = index;
        }
    }
}

/// Input for creating a column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDraft {
    pub title: String,
    #[serde(default)]
    pub status: ColumnStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl ColumnDraft {
    pub fn new(title: impl Into<String>, status: ColumnStatus) -> Self {
        Self {
            title: title.into(),
            status,
            limit: None,
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Partial update of a column's editable fields
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnUpdate {
    pub title: Option<String>,
    pub status: Option<ColumnStatus>,
    pub limit: Option<Option<u32>>,
}

impl ColumnUpdate {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn status(mut self, status: ColumnStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn limit(mut self, limit: Option<u32>) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn apply_to(self, column: &mut Column) {
        if let Some(title) = self.title {
            column.title = title;
        }
        if let Some(status) = self.status {
            column.status = status;
        }
        if let Some(limit) = self.limit {
            column.limit = limit;
        }
    }
}
