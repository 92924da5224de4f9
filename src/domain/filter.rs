use crate::domain::{board::Board, card::Card};
use std::borrow::Cow;

/// Board view keeping only the cards that match `query`.
///
/// Matching is a case-insensitive substring test against title and
/// description. Columns are always kept, even when left empty. An empty query
/// borrows the board unchanged.
pub fn filter_board<'a>(board: &'a Board, query: &str) -> Cow<'a, Board> {
    if query.is_empty() {
        return Cow::Borrowed(board);
    }

    let mut filtered = board.clone();
    for column in &mut filtered.columns {
        column.cards.retain(|card| card.matches_query(query));
    }
    Cow::Owned(filtered)
}

/// All matching cards, in column then card order
pub fn search_cards<'a>(board: &'a Board, query: &str) -> Vec<&'a Card> {
    board
        .sorted_columns()
        .into_iter()
        .flat_map(|column| column.cards.iter())
        .filter(|card| card.matches_query(query))
        .collect()
}
