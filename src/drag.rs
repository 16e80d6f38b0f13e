//! Drag-and-drop of cards between and within lists.
//!
//! A [`DragSession`] is opened when a card is picked up and resolved into a
//! [`DropPlan`] when it is released. Planning is pure: it only reads the board
//! snapshot. Carrying out the plan (a local splice or a remote move) is the
//! controller's job.

use crate::model::{Board, Card, CardId, ListId};

/// What the card was released over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    /// Another card; the destination is the list holding it.
    Card(CardId),
    /// A list column itself, e.g. the placeholder of an empty list.
    List(ListId),
}

#[derive(Debug, Clone, PartialEq)]
pub enum DropPlan {
    /// Released outside any target.
    Cancelled,
    /// Source or destination list could not be resolved.
    Aborted,
    /// Dropped onto its own position.
    NoOp,
    /// Same list, new index. Applied locally only.
    Reorder {
        list: ListId,
        card: CardId,
        old_index: usize,
        new_index: usize,
    },
    /// Different list. Needs the server to confirm.
    Move {
        card: CardId,
        from: ListId,
        to: ListId,
    },
}

/// The card currently being dragged.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    card: Card,
}

impl DragSession {
    /// Picks up `card`. Returns `None` when it is not on the board.
    pub fn start(board: &Board, card: CardId) -> Option<Self> {
        board.card(card).cloned().map(|card| Self { card })
    }

    /// Snapshot of the dragged card, for the drag preview.
    pub fn card(&self) -> &Card {
        &self.card
    }

    pub fn card_id(&self) -> CardId {
        self.card.id
    }

    /// Resolves the release into a plan against the current board.
    pub fn plan(&self, board: &Board, target: Option<DropTarget>) -> DropPlan {
        let Some(target) = target else {
            return DropPlan::Cancelled;
        };
        let Some(source) = board.list_of_card(self.card.id) else {
            return DropPlan::Aborted;
        };
        let destination = match target {
            DropTarget::Card(over) => board.list_of_card(over),
            DropTarget::List(list) => board.list(list),
        };
        let Some(destination) = destination else {
            return DropPlan::Aborted;
        };

        if source.id != destination.id {
            return DropPlan::Move {
                card: self.card.id,
                from: source.id,
                to: destination.id,
            };
        }

        let Some(old_index) = source.position_of(self.card.id) else {
            return DropPlan::Aborted;
        };
        let new_index = match target {
            DropTarget::Card(over) => match source.position_of(over) {
                Some(i) => i,
                None => return DropPlan::Aborted,
            },
            // Released over its own column: send it to the bottom
            DropTarget::List(_) => source.cards.len() - 1,
        };

        if old_index == new_index {
            DropPlan::NoOp
        } else {
            DropPlan::Reorder {
                list: source.id,
                card: self.card.id,
                old_index,
                new_index,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BoardId, List, Priority};

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
                    cards: vec![
                        Card::new(CardId(1), "c1"),
                        Card::new(CardId(2), "c2"),
                        Card::new(CardId(3), "c3"),
                    ],
                },
                List {
                    id: ListId(2),
                    title: "L2".into(),
                    cards: vec![],
                },
                List {
                    id: ListId(3),
                    title: "L3".into(),
                    cards: vec![Card::new(CardId(4), "c4")],
                },
            ],
        }
    }

    #[test]
    fn test_start_resolves_card_across_lists() {
        let b = board();
        let session = DragSession::start(&b, CardId(4)).unwrap();
        assert_eq!(session.card().title, "c4");
        assert!(DragSession::start(&b, CardId(42)).is_none());
    }

    #[test]
    fn test_no_target_cancels() {
        let b = board();
        let s = DragSession::start(&b, CardId(1)).unwrap();
        assert_eq!(s.plan(&b, None), DropPlan::Cancelled);
    }

    #[test]
    fn test_drop_on_empty_list_moves() {
        let b = board();
        let s = DragSession::start(&b, CardId(1)).unwrap();
        assert_eq!(
            s.plan(&b, Some(DropTarget::List(ListId(2)))),
            DropPlan::Move {
                card: CardId(1),
                from: ListId(1),
                to: ListId(2)
            }
        );
    }

    #[test]
    fn test_drop_on_card_in_other_list_moves() {
        let b = board();
        let s = DragSession::start(&b, CardId(2)).unwrap();
        assert_eq!(
            s.plan(&b, Some(DropTarget::Card(CardId(4)))),
            DropPlan::Move {
                card: CardId(2),
                from: ListId(1),
                to: ListId(3)
            }
        );
    }

    #[test]
    fn test_drop_within_list_reorders() {
        let b = board();
        let s = DragSession::start(&b, CardId(3)).unwrap();
        assert_eq!(
            s.plan(&b, Some(DropTarget::Card(CardId(1)))),
            DropPlan::Reorder {
                list: ListId(1),
                card: CardId(3),
                old_index: 2,
                new_index: 0
            }
        );
    }

    #[test]
    fn test_drop_on_itself_is_noop() {
        let b = board();
        let s = DragSession::start(&b, CardId(2)).unwrap();
        assert_eq!(s.plan(&b, Some(DropTarget::Card(CardId(2)))), DropPlan::NoOp);
        let last = DragSession::start(&b, CardId(3)).unwrap();
        assert_eq!(last.plan(&b, Some(DropTarget::List(ListId(1)))), DropPlan::NoOp);
    }

    #[test]
    fn test_drop_on_own_column_sends_to_bottom() {
        let b = board();
        let s = DragSession::start(&b, CardId(1)).unwrap();
        assert!(matches!(
            s.plan(&b, Some(DropTarget::List(ListId(1)))),
            DropPlan::Reorder { new_index: 2, .. }
        ));
    }

    #[test]
    fn test_card_gone_from_board_aborts() {
        let mut b = board();
        let s = DragSession::start(&b, CardId(1)).unwrap();
        b.lists[0].cards.remove(0);
        assert_eq!(s.plan(&b, Some(DropTarget::List(ListId(2)))), DropPlan::Aborted);
        let s2 = DragSession::start(&b, CardId(2)).unwrap();
        assert_eq!(s2.plan(&b, Some(DropTarget::List(ListId(99)))), DropPlan::Aborted);
    }
}
