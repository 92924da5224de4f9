use crate::{
    domain::ids::{CardId, ColumnId, LabelId, UserId},
    error::{KanbanError, Result},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Priority of a card
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High"),
        }
    }
}

/// A label attached to cards. Shared reference data, never mutated by the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub id: LabelId,
    pub name: String,
    pub color: String,
}

impl Label {
    pub fn new(id: impl Into<LabelId>, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: color.into(),
        }
    }
}

/// A user that can be assigned to cards
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub initials: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl User {
    /// Creates a user whose initials are derived from the name
    pub fn from_name(id: impl Into<UserId>, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: id.into(),
            initials: initials(&name),
            name,
            avatar: None,
        }
    }

    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }
}

/// First letters of the first two words, uppercased ("Alice Johnson" -> "AJ")
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|part| part.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect()
}

/// How a due date relates to the current day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueStatus {
    /// Past due by this many days
    Overdue(u32),
    Today,
    Tomorrow,
    /// Due within the coming week
    InDays(u32),
    Later,
}

impl DueStatus {
    /// Classifies `due` relative to `now`, counting partial days as whole ones
    pub fn classify(due: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let millis = (due - now).num_milliseconds();
        let mut days = millis.div_euclid(MILLIS_PER_DAY);
        if millis.rem_euclid(MILLIS_PER_DAY) != 0 {
            days += 1;
        }

        match days {
            d if d < 0 => Self::Overdue(u32::try_from(-d).unwrap_or(u32::MAX)),
            0 => Self::Today,
            1 => Self::Tomorrow,
            d @ 2..=7 => Self::InDays(d as u32),
            _ => Self::Later,
        }
    }
}

/// A card on the board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: CardId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Back-reference to the owning column
    pub column_id: ColumnId,
    pub priority: Priority,
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde(default)]
    pub assignees: Vec<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub order: usize,
}

impl Card {
    /// Creates a card with medium priority and no labels or assignees
    pub fn new(
        id: impl Into<CardId>,
        column_id: impl Into<ColumnId>,
        title: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            column_id: column_id.into(),
            priority: Priority::default(),
            labels: Vec::new(),
            assignees: Vec::new(),
            due_date: None,
            created_at: now,
            updated_at: now,
            order: 0,
        }
    }

    pub(crate) fn from_draft(
        id: CardId,
        column_id: ColumnId,
        draft: CardDraft,
        order: usize,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            column_id,
            priority: draft.priority,
            labels: draft.labels,
            assignees: draft.assignees,
            due_date: draft.due_date,
            created_at: now,
            updated_at: now,
            order,
        }
    }

    /// Case-insensitive substring match against the title or description
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.title.to_lowercase().contains(&query)
            || self
                .description
                .as_ref()
                .map(|d| d.to_lowercase().contains(&query))
                .unwrap_or(false)
    }

    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.due_date.map(|due| now > due).unwrap_or(false)
    }

    pub fn due_status(&self, now: DateTime<Utc>) -> Option<DueStatus> {
        self.due_date.map(|due| DueStatus::classify(due, now))
    }
}

/// Validated input for creating a card
#[derive(Debug, Clone, PartialEq)]
pub struct CardDraft {
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) priority: Priority,
    pub(crate) labels: Vec<Label>,
    pub(crate) assignees: Vec<User>,
    pub(crate) due_date: Option<DateTime<Utc>>,
}

impl CardDraft {
    /// Trims the title and rejects it when nothing is left
    pub fn new(title: &str) -> Result<Self> {
        let title = title.trim();
        if title.is_empty() {
            return Err(KanbanError::EmptyTitle);
        }

        Ok(Self {
            title: title.to_string(),
            description: None,
            priority: Priority::default(),
            labels: Vec::new(),
            assignees: Vec::new(),
            due_date: None,
        })
    }

    /// Sets the description; blank input leaves the card without one
    pub fn with_description(mut self, description: &str) -> Self {
        let description = description.trim();
        self.description = (!description.is_empty()).then(|| description.to_string());
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_labels(mut self, labels: Vec<Label>) -> Self {
        self.labels = labels;
        self
    }

    pub fn with_assignees(mut self, assignees: Vec<User>) -> Self {
        self.assignees = assignees;
        self
    }

    pub fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }
}

/// Partial update of a card's editable fields.
///
/// Identity, placement and creation time are owned by the board and cannot
/// be changed through an update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardUpdate {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub priority: Option<Priority>,
    pub labels: Option<Vec<Label>>,
    pub assignees: Option<Vec<User>>,
    pub due_date: Option<Option<DateTime<Utc>>>,
}

impl CardUpdate {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = Some(description);
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn labels(mut self, labels: Vec<Label>) -> Self {
        self.labels = Some(labels);
        self
    }

    pub fn assignees(mut self, assignees: Vec<User>) -> Self {
        self.assignees = Some(assignees);
        self
    }

    pub fn due_date(mut self, due_date: Option<DateTime<Utc>>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Merges the provided fields into `card` and refreshes `updated_at`
    pub fn apply_to(self, card: &mut Card, now: DateTime<Utc>) {
        if let Some(title) = self.title {
            card.title = title;
        }
        if let Some(description) = self.description {
            card.description = description;
        }
        if let Some(priority) = self.priority {
            card.priority = priority;
        }
        if let Some(labels) = self.labels {
            card.labels = labels;
        }
        if let Some(assignees) = self.assignees {
            card.assignees = assignees;
        }
        if let Some(due_date) = self.due_date {
            card.due_date = due_date;
        }
        card.updated_at = now;
    }
}
