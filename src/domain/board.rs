use crate::{
    domain::{
        card::{Card, CardDraft, CardUpdate},
        column::{Column, ColumnDraft, ColumnStatus, ColumnUpdate},
        ids::{BoardId, CardId, ColumnId},
    },
    error::{KanbanError, Result},
    services::IdGenerator,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Configuration for one column of a new board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnConfig {
    pub title: String,
    pub status: ColumnStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl ColumnConfig {
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

/// Board configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardConfig {
    pub title: String,
    pub columns: Vec<ColumnConfig>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            title: "Project Tasks".to_string(),
            columns: vec![
                ColumnConfig::new("To Do", ColumnStatus::Todo),
                ColumnConfig::new("In Progress", ColumnStatus::InProgress),
                ColumnConfig::new("Review", ColumnStatus::Review),
                ColumnConfig::new("Done", ColumnStatus::Done),
            ],
        }
    }
}

/// Kanban board state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub id: BoardId,
    pub title: String,
    pub columns: Vec<Column>,
}

impl Board {
    pub fn new(id: impl Into<BoardId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            columns: Vec::new(),
        }
    }

    /// Builds an empty board with one column per configured entry
    pub fn from_config(config: &BoardConfig, ids: &mut dyn IdGenerator) -> Self {
        let mut board = Self::new(ids.next_id(), config.title.clone());
        for column in &config.columns {
            let draft = ColumnDraft {
                title: column.title.clone(),
                status: column.status,
                limit: column.limit,
            };
            board.add_column(ColumnId::new(ids.next_id()), draft);
        }
        board
    }

    /// Parses a board and checks its invariants
    pub fn from_json(json: &str) -> Result<Self> {
        let board: Board = serde_json::from_str(json)?;
        board.validate()?;
        Ok(board)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn column(&self, id: &ColumnId) -> Option<&Column> {
        self.columns.iter().find(|column| &column.id == id)
    }

    pub fn column_mut(&mut self, id: &ColumnId) -> Option<&mut Column> {
        self.columns.iter_mut().find(|column| &column.id == id)
    }

    fn column_index(&self, id: &ColumnId) -> Result<usize> {
        self.columns
            .iter()
            .position(|column| &column.id == id)
            .ok_or_else(|| KanbanError::ColumnNotFound(id.to_string()))
    }

    /// Finds a card in any column. Ids are unique board-wide, so the first hit wins.
    pub fn find_card(&self, id: &CardId) -> Option<&Card> {
        self.columns.iter().find_map(|column| column.card(id))
    }

    pub fn find_card_mut(&mut self, id: &CardId) -> Option<&mut Card> {
        self.columns.iter_mut().find_map(|column| column.card_mut(id))
    }

    /// Total number of cards across all columns
    pub fn card_count(&self) -> usize {
        self.columns.iter().map(|column| column.cards.len()).sum()
    }

    /// Columns in display order
    pub fn sorted_columns(&self) -> Vec<&Column> {
        let mut columns: Vec<&Column> = self.columns.iter().collect();
        columns.sort_by_key(|column| column.order);
        columns
    }

    /// Moves a card to `target_index` in the target column.
    ///
    /// The index is clamped to the destination length after the card has
    /// been removed from its source, so a same-column move is a plain
    /// reorder. Both affected columns are renumbered. Every lookup happens
    /// before anything is removed; on error the board is untouched.
    ///
    /// Not idempotent: a second identical call starts from the new layout
    /// (and usually fails, since the card has left its source column).
    ///
    /// Returns the index the card was inserted at.
    pub fn move_card(
        &mut self,
        card_id: &CardId,
        source_column_id: &ColumnId,
        target_column_id: &ColumnId,
        target_index: usize,
        now: DateTime<Utc>,
    ) -> Result<usize> {
        let source = self.column_index(source_column_id)?;
        let target = self.column_index(target_column_id)?;
        let position = self.columns[source].position_of(card_id).ok_or_else(|| {
            KanbanError::CardNotInColumn {
                card_id: card_id.to_string(),
                column_id: source_column_id.to_string(),
            }
        })?;

        let mut card = self.columns[source].cards.remove(position);
        card.column_id = target_column_id.clone();
        card.updated_at = now;

        let destination = &mut self.columns[target];
        let index = target_index.min(destination.cards.len());
        destination.cards.insert(index, card);

        self.columns[source].renumber_cards();
        if target != source {
            self.columns[target].renumber_cards();
        }

        Ok(index)
    }

    /// Appends a new card to a column. The WIP limit is not enforced.
    pub fn add_card(
        &mut self,
        column_id: &ColumnId,
        card_id: CardId,
        draft: CardDraft,
        now: DateTime<Utc>,
    ) -> Result<&Card> {
        let index = self.column_index(column_id)?;
        let column = &mut self.columns[index];
        let order = column.cards.len();
        column
            .cards
            .push(Card::from_draft(card_id, column_id.clone(), draft, order, now));
        Ok(&column.cards[order])
    }

    pub fn update_card(
        &mut self,
        card_id: &CardId,
        update: CardUpdate,
        now: DateTime<Utc>,
    ) -> Result<&Card> {
        let card = self
            .find_card_mut(card_id)
            .ok_or_else(|| KanbanError::CardNotFound(card_id.to_string()))?;
        update.apply_to(card, now);
        Ok(&*card)
    }

    /// Removes a card from whichever column holds it and renumbers that column
    pub fn delete_card(&mut self, card_id: &CardId) -> Result<Card> {
        for column in &mut self.columns {
            if let Some(position) = column.position_of(card_id) {
                let card = column.cards.remove(position);
                column.renumber_cards();
                return Ok(card);
            }
        }
        Err(KanbanError::CardNotFound(card_id.to_string()))
    }

    /// Appends a new empty column after the existing ones
    pub fn add_column(&mut self, column_id: ColumnId, draft: ColumnDraft) -> &Column {
        let order = self.columns.len();
        self.columns.push(Column {
            id: column_id,
            title: draft.title,
            status: draft.status,
            order,
            limit: draft.limit,
            cards: Vec::new(),
        });
        &self.columns[order]
    }

    pub fn update_column(&mut self, column_id: &ColumnId, update: ColumnUpdate) -> Result<&Column> {
        let index = self.column_index(column_id)?;
        update.apply_to(&mut self.columns[index]);
        Ok(&self.columns[index])
    }

    /// Removes a column together with its cards and renumbers the rest
    pub fn delete_column(&mut self, column_id: &ColumnId) -> Result<Column> {
        let index = self.column_index(column_id)?;
        let column = self.columns.remove(index);
        self.renumber_columns();
        Ok(column)
    }

    /// Moves the column at display position `from` to display position `to`.
    ///
    /// `to` is clamped to the last position.
    pub fn reorder_columns(&mut self, from: usize, to: usize) -> Result<()> {
        let len = self.columns.len();
        if from >= len {
            return Err(KanbanError::ColumnPositionOutOfRange {
                position: from,
                len,
            });
        }

        // Positions are display positions, so bring the sequence in line first
        self.renumber_columns();
        let column = self.columns.remove(from);
        let to = to.min(self.columns.len());
        self.columns.insert(to, column);
        for (index, column) in self.columns.iter_mut().enumerate() {
            column.order = index;
        }
        Ok(())
    }

    /// Sorts columns by their current `order` (stable) and rewrites it densely
    fn renumber_columns(&mut self) {
        self.columns.sort_by_key(|column| column.order);
        for (index, column) in self.columns.iter_mut().enumerate() {
            column.order = index;
        }
    }

    /// Checks the structural invariants of the board
    pub fn validate(&self) -> Result<()> {
        let mut column_ids = HashSet::new();
        let mut card_ids = HashSet::new();

        let mut column_orders: Vec<usize> = self.columns.iter().map(|c| c.order).collect();
        column_orders.sort_unstable();
        if column_orders.iter().enumerate().any(|(i, &order)| i != order) {
            return Err(KanbanError::InvariantViolation(format!(
                "column orders {:?} are not a dense permutation",
                column_orders
            )));
        }

        for column in &self.columns {
            if !column_ids.insert(&column.id) {
                return Err(KanbanError::InvariantViolation(format!(
                    "duplicate column id {}",
                    column.id
                )));
            }

            for (position, card) in column.cards.iter().enumerate() {
                if !card_ids.insert(&card.id) {
                    return Err(KanbanError::InvariantViolation(format!(
                        "duplicate card id {}",
                        card.id
                    )));
                }
                if card.column_id != column.id {
                    return Err(KanbanError::InvariantViolation(format!(
                        "card {} is in column {} but points at {}",
                        card.id, column.id, card.column_id
                    )));
                }
                if card.order != position {
                    return Err(KanbanError::InvariantViolation(format!(
                        "card {} has order {} at position {} of column {}",
                        card.id, card.order, position, column.id
                    )));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::SequentialIdGenerator;
    use chrono::TimeZone;

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 10, minute, 0).unwrap()
    }

    /// A=[card1, card2], B=[card3]
    fn two_column_board() -> Board {
        let mut board = Board::new("board-1", "Test");
        board.add_column("A".into(), ColumnDraft::new("A", ColumnStatus::Todo));
        board.add_column("B".into(), ColumnDraft::new("B", ColumnStatus::Done));
        let a = ColumnId::from("A");
        let b = ColumnId::from("B");
        for (column, id) in [(&a, "card1"), (&a, "card2"), (&b, "card3")] {
            board
                .add_card(column, id.into(), CardDraft::new(id).unwrap(), at(0))
                .unwrap();
        }
        board
    }

    fn ids(board: &Board, column: &str) -> Vec<String> {
        board
            .column(&column.into())
            .unwrap()
            .cards
            .iter()
            .map(|c| c.id.to_string())
            .collect()
    }

    fn orders(board: &Board, column: &str) -> Vec<usize> {
        board
            .column(&column.into())
            .unwrap()
            .cards
            .iter()
            .map(|c| c.order)
            .collect()
    }

    #[test]
    fn test_board_from_default_config() {
        let mut ids = SequentialIdGenerator::new("id");
        let board = Board::from_config(&BoardConfig::default(), &mut ids);

        assert_eq!(board.id.as_str(), "id-1");
        assert_eq!(board.columns.len(), 4);
        assert_eq!(board.columns[0].title, "To Do");
        assert_eq!(board.columns[1].status, ColumnStatus::InProgress);
        assert_eq!(board.columns[3].order, 3);
        assert_eq!(board.card_count(), 0);
        board.validate().unwrap();
    }

    #[test]
    fn test_move_between_columns() {
        let mut board = two_column_board();
        let index = board
            .move_card(&"card1".into(), &"A".into(), &"B".into(), 0, at(5))
            .unwrap();

        assert_eq!(index, 0);
        assert_eq!(ids(&board, "A"), vec!["card2"]);
        assert_eq!(ids(&board, "B"), vec!["card1", "card3"]);
        assert_eq!(orders(&board, "A"), vec![0]);
        assert_eq!(orders(&board, "B"), vec![0, 1]);

        let moved = board.find_card(&"card1".into()).unwrap();
        assert_eq!(moved.column_id.as_str(), "B");
        assert_eq!(moved.updated_at, at(5));
        board.validate().unwrap();
    }

    #[test]
    fn test_move_clamps_index_to_append() {
        let mut board = two_column_board();
        let index = board
            .move_card(&"card1".into(), &"A".into(), &"B".into(), 99, at(1))
            .unwrap();

        assert_eq!(index, 1);
        assert_eq!(ids(&board, "B"), vec!["card3", "card1"]);
        board.validate().unwrap();
    }

    #[test]
    fn test_move_within_same_column() {
        let mut board = two_column_board();
        board
            .add_card(&"A".into(), "card4".into(), CardDraft::new("card4").unwrap(), at(0))
            .unwrap();

        // Index is interpreted against the list with card1 already removed
        board
            .move_card(&"card1".into(), &"A".into(), &"A".into(), 2, at(1))
            .unwrap();
        assert_eq!(ids(&board, "A"), vec!["card2", "card4", "card1"]);
        assert_eq!(orders(&board, "A"), vec![0, 1, 2]);

        board
            .move_card(&"card1".into(), &"A".into(), &"A".into(), 0, at(2))
            .unwrap();
        assert_eq!(ids(&board, "A"), vec!["card1", "card2", "card4"]);
        board.validate().unwrap();
    }

    #[test]
    fn test_move_with_unknown_references_leaves_board_unchanged() {
        let mut board = two_column_board();
        let before = board.clone();

        let err = board
            .move_card(&"card1".into(), &"missing".into(), &"B".into(), 0, at(1))
            .unwrap_err();
        assert!(matches!(err, KanbanError::ColumnNotFound(_)));

        let err = board
            .move_card(&"card1".into(), &"A".into(), &"missing".into(), 0, at(1))
            .unwrap_err();
        assert!(matches!(err, KanbanError::ColumnNotFound(_)));

        let err = board
            .move_card(&"card3".into(), &"A".into(), &"B".into(), 0, at(1))
            .unwrap_err();
        assert!(matches!(err, KanbanError::CardNotInColumn { .. }));

        assert_eq!(board, before);
    }

    #[test]
    fn test_move_is_not_idempotent() {
        let mut board = two_column_board();
        board
            .move_card(&"card1".into(), &"A".into(), &"B".into(), 0, at(1))
            .unwrap();
        assert!(board
            .move_card(&"card1".into(), &"A".into(), &"B".into(), 0, at(2))
            .is_err());
    }

    #[test]
    fn test_add_card_appends_with_next_order() {
        let mut board = two_column_board();
        let card = board
            .add_card(
                &"A".into(),
                "new".into(),
                CardDraft::new("Fresh").unwrap(),
                at(7),
            )
            .unwrap();

        assert_eq!(card.order, 2);
        assert_eq!(card.column_id.as_str(), "A");
        assert_eq!(card.created_at, at(7));
        assert_eq!(card.updated_at, at(7));
    }

    #[test]
    fn test_add_card_ignores_wip_limit() {
        let mut board = two_column_board();
        board
            .update_column(&"B".into(), ColumnUpdate::default().limit(Some(1)))
            .unwrap();
        assert!(board.column(&"B".into()).unwrap().is_at_limit());

        board
            .add_card(&"B".into(), "x".into(), CardDraft::new("x").unwrap(), at(1))
            .unwrap();
        assert!(board.column(&"B".into()).unwrap().is_over_limit());
    }

    #[test]
    fn test_move_into_column_at_wip_limit() {
        let mut board = two_column_board();
        board
            .update_column(&"B".into(), ColumnUpdate::default().limit(Some(1)))
            .unwrap();
        assert!(board.column(&"B".into()).unwrap().is_at_limit());

        let index = board
            .move_card(&"card1".into(), &"A".into(), &"B".into(), 0, at(1))
            .unwrap();
        assert_eq!(index, 0);
        assert_eq!(ids(&board, "B"), vec!["card1", "card3"]);
        assert!(board.column(&"B".into()).unwrap().is_over_limit());
        board.validate().unwrap();
    }

    #[test]
    fn test_add_card_unknown_column() {
        let mut board = two_column_board();
        let draft = CardDraft::new("x").unwrap();
        let result = board.add_card(&"nope".into(), "x".into(), draft, at(1));
        assert!(matches!(result, Err(KanbanError::ColumnNotFound(_))));
    }

    #[test]
    fn test_delete_card_renumbers() {
        let mut board = two_column_board();
        board
            .add_card(&"A".into(), "card3b".into(), CardDraft::new("c").unwrap(), at(0))
            .unwrap();

        let removed = board.delete_card(&"card2".into()).unwrap();
        assert_eq!(removed.id.as_str(), "card2");
        assert_eq!(ids(&board, "A"), vec!["card1", "card3b"]);
        assert_eq!(orders(&board, "A"), vec![0, 1]);

        assert!(matches!(
            board.delete_card(&"card2".into()),
            Err(KanbanError::CardNotFound(_))
        ));
    }

    #[test]
    fn test_delete_column_renumbers_remaining() {
        let mut board = two_column_board();
        board.add_column("C".into(), ColumnDraft::new("C", ColumnStatus::Review));

        let removed = board.delete_column(&"A".into()).unwrap();
        assert_eq!(removed.cards.len(), 2);

        let order: Vec<(&str, usize)> = board
            .columns
            .iter()
            .map(|c| (c.id.as_str(), c.order))
            .collect();
        assert_eq!(order, vec![("B", 0), ("C", 1)]);
        assert!(board.find_card(&"card1".into()).is_none());
    }

    #[test]
    fn test_reorder_columns() {
        let mut board = two_column_board();
        board.add_column("C".into(), ColumnDraft::new("C", ColumnStatus::Review));

        board.reorder_columns(0, 2).unwrap();
        let titles: Vec<&str> = board.sorted_columns().iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["B", "C", "A"]);
        board.validate().unwrap();

        board.reorder_columns(2, 10).unwrap();
        assert!(matches!(
            board.reorder_columns(3, 0),
            Err(KanbanError::ColumnPositionOutOfRange { position: 3, len: 3 })
        ));
    }

    #[test]
    fn test_rejected_reorder_leaves_board_unchanged() {
        let mut board = two_column_board();
        board.columns[0].order = 1;
        board.columns[1].order = 0;
        let before = board.clone();

        assert!(matches!(
            board.reorder_columns(9, 0),
            Err(KanbanError::ColumnPositionOutOfRange { position: 9, len: 2 })
        ));
        assert_eq!(board, before);
    }

    #[test]
    fn test_reorder_follows_display_order() {
        let mut board = two_column_board();
        board.columns[0].order = 1;
        board.columns[1].order = 0;

        // Display order is [B, A]; move B to the end
        board.reorder_columns(0, 1).unwrap();
        let sorted: Vec<&str> = board.sorted_columns().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(sorted, vec!["A", "B"]);
        board.validate().unwrap();
    }

    #[test]
    fn test_sorted_columns_uses_order_field() {
        let mut board = two_column_board();
        board.columns[0].order = 1;
        board.columns[1].order = 0;

        let sorted: Vec<&str> = board.sorted_columns().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(sorted, vec!["B", "A"]);
        board.validate().unwrap();
    }

    #[test]
    fn test_validate_detects_broken_invariants() {
        let mut board = two_column_board();
        board.columns[0].cards[1].order = 5;
        assert!(matches!(board.validate(), Err(KanbanError::InvariantViolation(_))));

        let mut board = two_column_board();
        board.columns[0].cards[0].column_id = "B".into();
        assert!(board.validate().is_err());

        let mut board = two_column_board();
        board.columns[1].order = 4;
        assert!(board.validate().is_err());
    }

    #[test]
    fn test_json_round_trip_validates() {
        let board = two_column_board();
        let json = board.to_json().unwrap();
        let back = Board::from_json(&json).unwrap();
        assert_eq!(back, board);

        let mut broken = board.clone();
        broken.columns[0].cards[0].order = 9;
        let json = broken.to_json().unwrap();
        assert!(matches!(
            Board::from_json(&json),
            Err(KanbanError::InvariantViolation(_))
        ));

        assert!(matches!(
            Board::from_json("not json"),
            Err(KanbanError::Serialization(_))
        ));
    }
}
