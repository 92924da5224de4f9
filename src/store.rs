//! Application-owned state container for one board and its drag gesture.
//!
//! The mutating methods are permissive: an unknown card or column, or a
//! store with no board loaded, leaves the state untouched and reports
//! `false`/`None` instead of an error. The reason is logged at `debug`.
//! [`KanbanStore::try_move_card`] is the checked variant for callers that
//! want the reason.

use crate::{
    domain::{
        board::{Board, BoardConfig},
        card::{Card, CardDraft, CardUpdate},
        column::{Column, ColumnDraft, ColumnUpdate},
        drag::DragState,
        ids::{CardId, ColumnId},
    },
    error::{KanbanError, Result},
    services::{IdGenerator, UuidGenerator},
};
use mockable::{Clock, DefaultClock};
use tracing::{debug, trace};

fn skipped(operation: &'static str, err: &KanbanError) {
    debug!(operation, error = %err, "Board operation skipped");
}

pub struct KanbanStore<I = UuidGenerator, C = DefaultClock> {
    board: Option<Board>,
    drag: DragState,
    ids: I,
    clock: C,
}

impl KanbanStore {
    /// Store with random UUID ids and the system clock
    pub fn new() -> Self {
        Self::with_services(UuidGenerator, DefaultClock)
    }
}

impl Default for KanbanStore {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: IdGenerator, C: Clock> KanbanStore<I, C> {
    pub fn with_services(ids: I, clock: C) -> Self {
        Self {
            board: None,
            drag: DragState::Idle,
            ids,
            clock,
        }
    }

    /// Replaces the loaded board
    pub fn set_board(&mut self, board: Board) {
        trace!(board_id = %board.id, "Board loaded");
        self.board = Some(board);
    }

    /// Creates and loads an empty board from configuration
    pub fn init_board(&mut self, config: &BoardConfig) -> &Board {
        let board = Board::from_config(config, &mut self.ids);
        self.board.insert(board)
    }

    pub fn board(&self) -> Option<&Board> {
        self.board.as_ref()
    }

    /// Unloads and returns the board
    pub fn take_board(&mut self) -> Option<Board> {
        self.drag.end();
        self.board.take()
    }

    pub fn drag_state(&self) -> &DragState {
        &self.drag
    }

    fn loaded_board(&mut self) -> Result<&mut Board> {
        self.board.as_mut().ok_or(KanbanError::BoardNotLoaded)
    }

    /// Moves a card, returning the index it landed at.
    ///
    /// See [`Board::move_card`] for the exact semantics. Calling this twice
    /// with the same arguments is not a safe retry.
    pub fn try_move_card(
        &mut self,
        card_id: &CardId,
        source_column_id: &ColumnId,
        target_column_id: &ColumnId,
        target_index: usize,
    ) -> Result<usize> {
        let now = self.clock.utc();
        let index = self.loaded_board()?.move_card(
            card_id,
            source_column_id,
            target_column_id,
            target_index,
            now,
        )?;
        trace!(
            card_id = %card_id,
            from = %source_column_id,
            to = %target_column_id,
            index,
            "Card moved"
        );
        Ok(index)
    }

    /// Moves a card; returns `false` and leaves the board unchanged when any
    /// reference is unknown
    pub fn move_card(
        &mut self,
        card_id: &CardId,
        source_column_id: &ColumnId,
        target_column_id: &ColumnId,
        target_index: usize,
    ) -> bool {
        match self.try_move_card(card_id, source_column_id, target_column_id, target_index) {
            Ok(_) => true,
            Err(err) => {
                skipped("move_card", &err);
                false
            }
        }
    }

    /// Appends a card to a column and returns its fresh id
    pub fn add_card(&mut self, column_id: &ColumnId, draft: CardDraft) -> Option<CardId> {
        let now = self.clock.utc();
        let board = match self.board.as_mut() {
            Some(board) if board.column(column_id).is_some() => board,
            Some(_) => {
                skipped("add_card", &KanbanError::ColumnNotFound(column_id.to_string()));
                return None;
            }
            None => {
                skipped("add_card", &KanbanError::BoardNotLoaded);
                return None;
            }
        };

        let card_id = CardId::new(self.ids.next_id());
        match board.add_card(column_id, card_id.clone(), draft, now) {
            Ok(card) => {
                trace!(
                    card_id = %card.id,
                    column_id = %column_id,
                    order = card.order,
                    "Card added"
                );
                Some(card_id)
            }
            Err(err) => {
                skipped("add_card", &err);
                None
            }
        }
    }

    pub fn update_card(&mut self, card_id: &CardId, update: CardUpdate) -> bool {
        let now = self.clock.utc();
        let result = self
            .loaded_board()
            .and_then(|board| board.update_card(card_id, update, now).map(|_| ()));
        match result {
            Ok(()) => true,
            Err(err) => {
                skipped("update_card", &err);
                false
            }
        }
    }

    /// Removes a card and returns it
    pub fn delete_card(&mut self, card_id: &CardId) -> Option<Card> {
        match self.loaded_board().and_then(|board| board.delete_card(card_id)) {
            Ok(card) => {
                trace!(card_id = %card_id, column_id = %card.column_id, "Card deleted");
                Some(card)
            }
            Err(err) => {
                skipped("delete_card", &err);
                None
            }
        }
    }

    /// Appends a column and returns its fresh id
    pub fn add_column(&mut self, draft: ColumnDraft) -> Option<ColumnId> {
        let Some(board) = self.board.as_mut() else {
            skipped("add_column", &KanbanError::BoardNotLoaded);
            return None;
        };

        let column_id = ColumnId::new(self.ids.next_id());
        let column = board.add_column(column_id.clone(), draft);
        trace!(column_id = %column.id, order = column.order, "Column added");
        Some(column_id)
    }

    pub fn update_column(&mut self, column_id: &ColumnId, update: ColumnUpdate) -> bool {
        let result = self
            .loaded_board()
            .and_then(|board| board.update_column(column_id, update).map(|_| ()));
        match result {
            Ok(()) => true,
            Err(err) => {
                skipped("update_column", &err);
                false
            }
        }
    }

    /// Renames a column to the trimmed title. Blank or unchanged titles are ignored.
    pub fn rename_column(&mut self, column_id: &ColumnId, title: &str) -> bool {
        let title = title.trim();
        let unchanged = self
            .board
            .as_ref()
            .and_then(|board| board.column(column_id))
            .map(|column| column.title == title)
            .unwrap_or(false);
        if title.is_empty() || unchanged {
            return false;
        }

        self.update_column(column_id, ColumnUpdate::default().title(title))
    }

    /// Removes a column with all of its cards
    pub fn delete_column(&mut self, column_id: &ColumnId) -> Option<Column> {
        match self
            .loaded_board()
            .and_then(|board| board.delete_column(column_id))
        {
            Ok(column) => {
                trace!(column_id = %column_id, cards = column.cards.len(), "Column deleted");
                Some(column)
            }
            Err(err) => {
                skipped("delete_column", &err);
                None
            }
        }
    }

    /// Moves the column at display position `from` to position `to`
    pub fn reorder_columns(&mut self, from: usize, to: usize) -> bool {
        match self
            .loaded_board()
            .and_then(|board| board.reorder_columns(from, to))
        {
            Ok(()) => true,
            Err(err) => {
                skipped("reorder_columns", &err);
                false
            }
        }
    }

    pub fn start_drag(&mut self, card_id: CardId, source_column_id: ColumnId) {
        trace!(card_id = %card_id, column_id = %source_column_id, "Drag started");
        self.drag.start(card_id, source_column_id);
    }

    /// Records the latest drop candidate. Ignored when no drag is active.
    pub fn update_drag_target(&mut self, column_id: ColumnId, index: usize) -> bool {
        let updated = self.drag.update_target(column_id, index);
        if !updated {
            debug!(index, "Drag target update ignored while idle");
        }
        updated
    }

    pub fn end_drag(&mut self) {
        self.drag.end();
    }

    /// Completes the drag at its recorded target and returns to idle.
    ///
    /// Returns `true` when the board changed. A drag without a target, or one
    /// whose references went stale, only ends.
    pub fn drop_card(&mut self) -> bool {
        let drag = std::mem::take(&mut self.drag);
        match drag {
            DragState::Dragging {
                card_id,
                source_column_id,
                target: Some(target),
            } => self.move_card(&card_id, &source_column_id, &target.column_id, target.index),
            DragState::Dragging { card_id, .. } => {
                debug!(card_id = %card_id, "Drag ended without a drop target");
                false
            }
            DragState::Idle => false,
        }
    }
}
