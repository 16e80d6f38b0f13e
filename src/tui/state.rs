use crate::drag::DropTarget;
use crate::metrics::PortfolioMetrics;
use crate::model::{Board, BoardId, BoardSummary, Card, CardId, List, User};
use ratatui::widgets::ListState;

#[derive(PartialEq, Clone, Copy, Debug)]
pub enum Focus {
    Sidebar,
    Main,
}

#[derive(PartialEq, Clone, Copy, Debug)]
pub enum InputMode {
    Normal,
    CreatingCard,
    CreatingList,
    CreatingBoard,
    EditingBoard,
    EditingCard,
    ConfirmDeleteBoard,
}

pub struct AppState {
    pub boards: Vec<BoardSummary>,
    pub active_board: Option<BoardId>,
    pub board: Option<Board>,
    pub users: Vec<User>,
    pub portfolio: Option<PortfolioMetrics>,
    pub board_state: ListState,
    pub column: usize,
    pub row: usize,
    pub active_focus: Focus,
    /// Card picked up with Space, waiting to be dropped.
    pub carrying: Option<CardId>,
    pub show_metrics: bool,
    pub message: String,
    pub loading: bool,
    pub mode: InputMode,
    pub input_buffer: String,
    pub cursor_position: usize,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        let mut b_state = ListState::default();
        b_state.select(Some(0));
        Self {
            boards: vec![],
            active_board: None,
            board: None,
            users: vec![],
            portfolio: None,
            board_state: b_state,
            column: 0,
            row: 0,
            active_focus: Focus::Main,
            carrying: None,
            show_metrics: false,
            message: "Tab: Boards | Space: Drag | a: Add | m: Metrics".to_string(),
            loading: true,
            mode: InputMode::Normal,
            input_buffer: String::new(),
            cursor_position: 0,
        }
    }

    /// Installs a fresh snapshot and keeps the cursor on the same card when it still exists.
    pub fn apply_snapshot(
        &mut self,
        boards: Vec<BoardSummary>,
        active: Option<BoardId>,
        board: Option<Board>,
    ) {
        let followed = self.selected_card().map(|c| c.id);
        self.boards = boards;
        self.active_board = active;
        self.board = board;
        self.loading = false;

        if let Some(idx) = active.and_then(|id| self.boards.iter().position(|b| b.id == id)) {
            self.board_state.select(Some(idx));
        }
        if let Some(card) = followed {
            self.focus_card(card);
        }
        self.clamp_cursor_to_board();
    }

    pub fn lists(&self) -> &[List] {
        self.board.as_ref().map(|b| b.lists.as_slice()).unwrap_or(&[])
    }

    pub fn selected_list(&self) -> Option<&List> {
        self.lists().get(self.column)
    }

    pub fn selected_card(&self) -> Option<&Card> {
        self.selected_list().and_then(|l| l.cards.get(self.row))
    }

    pub fn selected_board(&self) -> Option<BoardId> {
        self.board_state
            .selected()
            .and_then(|i| self.boards.get(i))
            .map(|b| b.id)
    }

    /// Where a carried card would land: the card under the cursor, or the column itself when empty.
    pub fn drop_target(&self) -> Option<DropTarget> {
        let list = self.selected_list()?;
        match list.cards.get(self.row) {
            Some(card) => Some(DropTarget::Card(card.id)),
            None => Some(DropTarget::List(list.id)),
        }
    }

    pub fn focus_card(&mut self, card: CardId) {
        let found = self.lists().iter().enumerate().find_map(|(col, l)| {
            l.position_of(card).map(|row| (col, row))
        });
        if let Some((col, row)) = found {
            self.column = col;
            self.row = row;
        }
    }

    fn clamp_cursor_to_board(&mut self) {
        let cols = self.lists().len();
        if cols == 0 {
            self.column = 0;
            self.row = 0;
            return;
        }
        self.column = self.column.min(cols - 1);
        let rows = self.lists()[self.column].cards.len();
        self.row = if rows == 0 { 0 } else { self.row.min(rows - 1) };
    }

    pub fn move_cursor_left(&mut self) {
        let cursor_moved_left = self.cursor_position.saturating_sub(1);
        self.cursor_position = self.clamp_cursor(cursor_moved_left);
    }
    pub fn move_cursor_right(&mut self) {
        let cursor_moved_right = self.cursor_position.saturating_add(1);
        self.cursor_position = self.clamp_cursor(cursor_moved_right);
    }
    pub fn enter_char(&mut self, new_char: char) {
        let byte_idx = self.byte_index();
        self.input_buffer.insert(byte_idx, new_char);
        self.move_cursor_right();
    }
    pub fn delete_char(&mut self) {
        if self.cursor_position != 0 {
            let current_index = self.cursor_position;
            let before = self.input_buffer.chars().take(current_index - 1);
            let after = self.input_buffer.chars().skip(current_index);
            self.input_buffer = before.chain(after).collect();
            self.move_cursor_left();
        }
    }
    pub fn reset_input(&mut self) {
        self.input_buffer.clear();
        self.cursor_position = 0;
    }
    /// Opens an input prompt prefilled with `text`.
    pub fn start_input(&mut self, mode: InputMode, text: &str) {
        self.mode = mode;
        self.input_buffer = text.to_string();
        self.cursor_position = text.chars().count();
    }
    fn byte_index(&self) -> usize {
        self.input_buffer
            .char_indices()
            .map(|(i, _)| i)
            .nth(self.cursor_position)
            .unwrap_or(self.input_buffer.len())
    }
    fn clamp_cursor(&self, new_cursor_pos: usize) -> usize {
        new_cursor_pos.clamp(0, self.input_buffer.chars().count())
    }

    pub fn next(&mut self) {
        match self.active_focus {
            Focus::Main => {
                let len = self.selected_list().map(|l| l.cards.len()).unwrap_or(0);
                // While carrying, one slot past the end means "bottom of the column"
                let slots = if self.carrying.is_some() { len + 1 } else { len };
                if slots == 0 {
                    return;
                }
                self.row = if self.row + 1 >= slots { 0 } else { self.row + 1 };
            }
            Focus::Sidebar => {
                let len = self.boards.len();
                if len == 0 {
                    return;
                }
                let i = match self.board_state.selected() {
                    Some(i) if i + 1 < len => i + 1,
                    _ => 0,
                };
                self.board_state.select(Some(i));
            }
        }
    }
    pub fn previous(&mut self) {
        match self.active_focus {
            Focus::Main => {
                let len = self.selected_list().map(|l| l.cards.len()).unwrap_or(0);
                let slots = if self.carrying.is_some() { len + 1 } else { len };
                if slots == 0 {
                    return;
                }
                self.row = if self.row == 0 { slots - 1 } else { self.row - 1 };
            }
            Focus::Sidebar => {
                let len = self.boards.len();
                if len == 0 {
                    return;
                }
                let i = match self.board_state.selected() {
                    Some(0) | None => len - 1,
                    Some(i) => i - 1,
                };
                self.board_state.select(Some(i));
            }
        }
    }
    pub fn column_right(&mut self) {
        let cols = self.lists().len();
        if cols == 0 {
            return;
        }
        self.column = (self.column + 1).min(cols - 1);
        self.fit_row();
    }
    pub fn column_left(&mut self) {
        self.column = self.column.saturating_sub(1);
        self.fit_row();
    }
    fn fit_row(&mut self) {
        let len = self.selected_list().map(|l| l.cards.len()).unwrap_or(0);
        let max = if self.carrying.is_some() { len } else { len.saturating_sub(1) };
        self.row = self.row.min(max);
    }
    pub fn toggle_focus(&mut self) {
        self.active_focus = match self.active_focus {
            Focus::Main => Focus::Sidebar,
            Focus::Sidebar => Focus::Main,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ListId, Priority};

    fn board() -> Board {
        Board {
            id: BoardId(1),
            title: "Alpha".into(),
            priority: Priority::Medium,
            start_date: None,
            end_date: None,
            lists: vec![
                List {
                    id: ListId(1),
                    title: "L1".into(),
                    cards: vec![Card::new(CardId(1), "c1"), Card::new(CardId(2), "c2")],
                },
                List {
                    id: ListId(2),
                    title: "L2".into(),
                    cards: vec![],
                },
            ],
        }
    }

    fn state() -> AppState {
        let mut s = AppState::new();
        s.apply_snapshot(vec![board().summary()], Some(BoardId(1)), Some(board()));
        s
    }

    #[test]
    fn test_drop_target_on_empty_column_is_the_list() {
        let mut s = state();
        s.carrying = Some(CardId(1));
        s.column_right();
        assert_eq!(s.drop_target(), Some(DropTarget::List(ListId(2))));
        s.column_left();
        assert_eq!(s.drop_target(), Some(DropTarget::Card(CardId(1))));
    }

    #[test]
    fn test_carrying_allows_bottom_slot() {
        let mut s = state();
        s.next();
        s.next();
        assert_eq!(s.row, 0, "wraps without a carried card");
        s.carrying = Some(CardId(1));
        s.next();
        s.next();
        assert_eq!(s.row, 2);
        assert_eq!(s.drop_target(), Some(DropTarget::List(ListId(1))));
    }

    #[test]
    fn test_snapshot_follows_selected_card() {
        let mut s = state();
        s.row = 1;
        let mut moved = board();
        let card = moved.lists[0].cards.remove(1);
        moved.lists[1].cards.push(card);
        s.apply_snapshot(vec![moved.summary()], Some(BoardId(1)), Some(moved));
        assert_eq!((s.column, s.row), (1, 0));
        assert_eq!(s.selected_card().map(|c| c.id), Some(CardId(2)));
    }

    #[test]
    fn test_input_editing_handles_multibyte() {
        let mut s = AppState::new();
        s.start_input(InputMode::CreatingCard, "caf");
        s.enter_char('é');
        s.enter_char('!');
        assert_eq!(s.input_buffer, "café!");
        s.delete_char();
        assert_eq!(s.input_buffer, "café");
    }
}
