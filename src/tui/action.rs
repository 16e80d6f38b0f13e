use crate::drag::DropTarget;
use crate::metrics::PortfolioMetrics;
use crate::model::{Board, BoardId, BoardSummary, CardId, ListId, User, UserId};

#[derive(Debug)]
pub enum Action {
    Reload,
    SwitchBoard(BoardId),
    CreateBoard(String),
    EditBoard(String),
    DeleteBoard,
    CreateList(String),
    DeleteList(ListId),
    CreateCard(ListId, String),
    EditCard(CardId, String),
    DeleteCard(CardId),
    ToggleMember(CardId, UserId),
    StartDrag(CardId),
    Drop(Option<DropTarget>),
    LoadPortfolio,
    Quit,
}

#[derive(Debug)]
pub enum AppEvent {
    Snapshot {
        boards: Vec<BoardSummary>,
        active: Option<BoardId>,
        board: Option<Board>,
    },
    UsersLoaded(Vec<User>),
    PortfolioLoaded(PortfolioMetrics),
    Error(String),
    Status(String),
}
