// Aggregates the split model files
pub mod draft;
pub mod item;
pub mod lookup;
pub mod parser;

// Re-export types so callers can use `crate::model::Board` directly
pub use draft::{
    BoardPatch, CardPatch, Credentials, MemberChange, MoveCard, NewBoard, NewCard, NewList,
    ListPatch, NewUser, TokenResponse, UserPatch, ValidationError,
};
pub use item::{Board, BoardId, BoardSummary, Card, CardId, List, ListId, Priority, Profile, User, UserId};
