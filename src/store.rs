// In-memory snapshot of the boards the user is looking at
use crate::error::SyncError;
use crate::model::{Board, BoardId, BoardSummary, CardId, ListId};
use crate::reorder;

/// Board summaries for the switcher, plus the fully loaded active board.
///
/// Server state only enters through [`BoardStore::set_summaries`] and
/// [`BoardStore::replace_active`]; the store never merges partial responses.
#[derive(Debug, Default, Clone)]
pub struct BoardStore {
    summaries: Vec<BoardSummary>,
    active_id: Option<BoardId>,
    active: Option<Board>,
}

impl BoardStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn summaries(&self) -> &[BoardSummary] {
        &self.summaries
    }

    pub fn active_id(&self) -> Option<BoardId> {
        self.active_id
    }

    pub fn active(&self) -> Option<&Board> {
        self.active.as_ref()
    }

    /// Replaces the summary list. Keeps the active board if it still exists,
    /// otherwise falls back to the first one. Returns the id whose detail must
    /// now be fetched, if the active board changed.
    pub fn set_summaries(&mut self, summaries: Vec<BoardSummary>) -> Option<BoardId> {
        self.summaries = summaries;
        let still_there = self
            .active_id
            .is_some_and(|id| self.summaries.iter().any(|s| s.id == id));
        if still_there {
            return None;
        }
        let first = self.summaries.first().map(|s| s.id);
        self.active = None;
        self.active_id = first;
        first
    }

    /// Switches the active board. Returns true when a detail fetch is needed.
    pub fn select(&mut self, id: BoardId) -> bool {
        if self.active_id == Some(id) && self.active.is_some() {
            return false;
        }
        self.active_id = Some(id);
        if self.active.as_ref().is_some_and(|b| b.id != id) {
            self.active = None;
        }
        true
    }

    /// Installs a freshly fetched board. A response for a board that is no
    /// longer selected is ignored; returns whether it was applied.
    pub fn replace_active(&mut self, board: Board) -> bool {
        if self.active_id.is_some_and(|id| id != board.id) {
            return false;
        }
        self.active_id = Some(board.id);
        if let Some(s) = self.summaries.iter_mut().find(|s| s.id == board.id) {
            *s = board.summary();
        }
        self.active = Some(board);
        true
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Deleting is refused while only one board is visible.
    pub fn ensure_can_delete_board(&self) -> Result<(), SyncError> {
        if self.summaries.len() <= 1 {
            return Err(SyncError::LastBoard);
        }
        Ok(())
    }

    /// Board to show after `deleted` is gone.
    pub fn next_after_delete(&self, deleted: BoardId) -> Option<BoardId> {
        self.summaries
            .iter()
            .find(|s| s.id != deleted)
            .map(|s| s.id)
    }

    /// Moves `card` to `new_index` within `list`, locally only.
    pub fn reorder_within(&mut self, list: ListId, card: CardId, new_index: usize) -> bool {
        let Some(list) = self.active.as_mut().and_then(|b| b.list_mut(list)) else {
            return false;
        };
        let Some(old_index) = list.position_of(card) else {
            return false;
        };
        reorder::move_in_place(&mut list.cards, old_index, new_index)
    }
}
