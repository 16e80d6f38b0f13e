// Productivity figures derived from board contents
use crate::model::{Board, ListId, Priority, UserId};
use chrono::NaiveDate;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct ListLoad {
    pub list: ListId,
    pub title: String,
    pub cards: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoardMetrics {
    pub total_cards: usize,
    pub per_list: Vec<ListLoad>,
    /// Cards sitting in the last list, taken as the "done" column.
    pub done_cards: usize,
    pub days_remaining: i64,
    pub unassigned_cards: usize,
    /// Cards per member, busiest first.
    pub workload: Vec<(UserId, usize)>,
}

impl BoardMetrics {
    pub fn from_board(board: &Board, today: NaiveDate) -> Self {
        let per_list: Vec<ListLoad> = board
            .lists
            .iter()
            .map(|l| ListLoad {
                list: l.id,
                title: l.title.clone(),
                cards: l.cards.len(),
            })
            .collect();

        let mut load: HashMap<UserId, usize> = HashMap::new();
        let mut unassigned_cards = 0;
        for card in board.lists.iter().flat_map(|l| l.cards.iter()) {
            if card.members.is_empty() {
                unassigned_cards += 1;
            }
            for member in &card.members {
                *load.entry(*member).or_default() += 1;
            }
        }
        let mut workload: Vec<(UserId, usize)> = load.into_iter().collect();
        workload.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

        Self {
            total_cards: board.card_count(),
            done_cards: per_list.last().map(|l| l.cards).unwrap_or(0),
            per_list,
            days_remaining: board.days_remaining(today),
            unassigned_cards,
            workload,
        }
    }

    /// Share of cards in the done column, 0-100.
    pub fn completion_percent(&self) -> u8 {
        if self.total_cards == 0 {
            return 0;
        }
        ((self.done_cards * 100) / self.total_cards) as u8
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PortfolioMetrics {
    pub boards: usize,
    pub total_cards: usize,
    pub done_cards: usize,
    pub by_priority: Vec<(Priority, usize)>,
    pub overdue: usize,
}

impl PortfolioMetrics {
    pub fn from_boards(boards: &[Board], today: NaiveDate) -> Self {
        let mut out = PortfolioMetrics {
            boards: boards.len(),
            by_priority: Priority::ALL.iter().map(|p| (*p, 0)).collect(),
            ..Default::default()
        };
        for board in boards {
            let m = BoardMetrics::from_board(board, today);
            out.total_cards += m.total_cards;
            out.done_cards += m.done_cards;
            if let Some(slot) = out.by_priority.iter_mut().find(|(p, _)| *p == board.priority) {
                slot.1 += 1;
            }
            // Finished boards (everything done) are not overdue
            if board.end_date.is_some_and(|end| end < today) && m.done_cards < m.total_cards {
                out.overdue += 1;
            }
        }
        out
    }
}
