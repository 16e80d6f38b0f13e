use crate::config::data_dir;
use crate::model::{Board, BoardId, BoardSummary};
use crate::storage::LocalStorage;
use anyhow::Result;
use std::path::PathBuf;

/// Last known server state, shown while the API is unreachable.
pub struct Cache;

impl Cache {
    fn cache_dir() -> Option<PathBuf> {
        data_dir().map(|d| d.join("cache"))
    }

    fn summaries_path() -> Option<PathBuf> {
        Self::cache_dir().map(|d| d.join("boards.json"))
    }

    fn board_path(id: BoardId) -> Option<PathBuf> {
        Self::cache_dir().map(|d| d.join(format!("board_{}.json", id)))
    }

    pub fn save_summaries(boards: &[BoardSummary]) -> Result<()> {
        if let Some(path) = Self::summaries_path() {
            LocalStorage::write_json(&path, boards)?;
        }
        Ok(())
    }

    pub fn load_summaries() -> Result<Vec<BoardSummary>> {
        if let Some(path) = Self::summaries_path() {
            return Ok(LocalStorage::read_json(&path)?.unwrap_or_default());
        }
        Ok(vec![])
    }

    pub fn save_board(board: &Board) -> Result<()> {
        if let Some(path) = Self::board_path(board.id) {
            LocalStorage::write_json(&path, board)?;
        }
        Ok(())
    }

    pub fn load_board(id: BoardId) -> Result<Option<Board>> {
        match Self::board_path(id) {
            Some(path) => LocalStorage::read_json(&path),
            None => Ok(None),
        }
    }
}
