// Searches over a board's nested lists
use crate::model::item::{Board, Card, CardId, List, ListId};

impl Board {
    pub fn list(&self, id: ListId) -> Option<&List> {
        self.lists.iter().find(|l| l.id == id)
    }

    pub fn list_mut(&mut self, id: ListId) -> Option<&mut List> {
        self.lists.iter_mut().find(|l| l.id == id)
    }

    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.lists.iter().flat_map(|l| l.cards.iter()).find(|c| c.id == id)
    }

    /// The list currently holding `card`, if any.
    pub fn list_of_card(&self, card: CardId) -> Option<&List> {
        self.lists
            .iter()
            .find(|l| l.cards.iter().any(|c| c.id == card))
    }

    pub fn card_count(&self) -> usize {
        self.lists.iter().map(|l| l.cards.len()).sum()
    }
}

impl List {
    pub fn position_of(&self, card: CardId) -> Option<usize> {
        self.cards.iter().position(|c| c.id == card)
    }

    pub fn card_ids(&self) -> Vec<CardId> {
        self.cards.iter().map(|c| c.id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::item::BoardId;

    fn board() -> Board {
        Board {
            id: BoardId(1),
            title: "Alpha".into(),
            priority: Default::default(),
            start_date: None,
            end_date: None,
            lists: vec![
                List {
                    id: ListId(1),
                    title: "Todo".into(),
                    cards: vec![Card::new(CardId(1), "a"), Card::new(CardId(2), "b")],
                },
                List {
                    id: ListId(2),
                    title: "Doing".into(),
                    cards: vec![Card::new(CardId(3), "c")],
                },
            ],
        }
    }

    #[test]
    fn test_card_lookup_spans_lists() {
        let b = board();
        assert_eq!(b.card(CardId(3)).map(|c| c.title.as_str()), Some("c"));
        assert_eq!(b.list_of_card(CardId(2)).map(|l| l.id), Some(ListId(1)));
        assert!(b.list_of_card(CardId(99)).is_none());
        assert_eq!(b.card_count(), 3);
    }

    #[test]
    fn test_position_of() {
        let b = board();
        let todo = b.list(ListId(1)).unwrap();
        assert_eq!(todo.position_of(CardId(2)), Some(1));
        assert_eq!(todo.position_of(CardId(3)), None);
        assert_eq!(todo.card_ids(), vec![CardId(1), CardId(2)]);
    }
}
