//! User actions against the active board.
//!
//! Every mutation goes to the server first and is followed by a full reload of
//! the active board; the local snapshot is never patched from a response. The
//! one exception is a within-list reorder, which only splices the local list.

use crate::cache::Cache;
use crate::client::BoardClient;
use crate::drag::{DragSession, DropPlan, DropTarget};
use crate::error::{ActionError, SyncError, UserAction};
use crate::model::{
    Board, BoardId, BoardPatch, Card, CardId, CardPatch, ListId, ListPatch, MoveCard, NewBoard,
    NewCard, NewList, NewUser, Profile, User, UserId, UserPatch,
};
use crate::store::BoardStore;

fn fail(action: UserAction, err: impl Into<SyncError>) -> ActionError {
    let err = ActionError::new(action, err);
    tracing::error!(action = ?err.action, "{}", err.detail());
    err
}

#[derive(Debug)]
pub struct BoardController {
    client: BoardClient,
    store: BoardStore,
    drag: Option<DragSession>,
    users: Vec<User>,
}

impl BoardController {
    pub fn new(client: BoardClient) -> Self {
        Self {
            client,
            store: BoardStore::new(),
            drag: None,
            users: Vec::new(),
        }
    }

    pub fn client(&self) -> &BoardClient {
        &self.client
    }

    pub fn store(&self) -> &BoardStore {
        &self.store
    }

    pub fn board(&self) -> Option<&Board> {
        self.store.active()
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    fn active_id(&self, action: UserAction) -> Result<BoardId, ActionError> {
        self.store
            .active_id()
            .ok_or_else(|| fail(action, SyncError::NoActiveBoard))
    }

    fn list_holding(&self, card: CardId, action: UserAction) -> Result<ListId, ActionError> {
        self.store
            .active()
            .and_then(|b| b.list_of_card(card))
            .map(|l| l.id)
            .ok_or_else(|| fail(action, SyncError::UnknownCard(card)))
    }

    fn ensure_list(&self, list: ListId, action: UserAction) -> Result<(), ActionError> {
        match self.store.active().and_then(|b| b.list(list)) {
            Some(_) => Ok(()),
            None => Err(fail(action, SyncError::UnknownList(list))),
        }
    }

    // ============ LOADING ============

    /// Fetches the board summaries, then the detail of the active board.
    pub async fn load_boards(&mut self) -> Result<(), ActionError> {
        let summaries = self
            .client
            .list_boards()
            .await
            .map_err(|e| fail(UserAction::LoadBoards, e))?;
        if let Err(e) = Cache::save_summaries(&summaries) {
            tracing::warn!("Could not cache boards: {}", e);
        }
        self.store.set_summaries(summaries);
        if self.store.active_id().is_some() {
            self.reload_active().await?;
        }
        Ok(())
    }

    /// Like [`load_boards`](Self::load_boards), but falls back to the last cached
    /// boards when the server cannot be reached. Returns a warning in that case.
    pub async fn load_boards_or_cached(&mut self) -> Result<Option<String>, ActionError> {
        match self.load_boards().await {
            Ok(()) => Ok(None),
            Err(err) if err.source.is_connectivity() => {
                let cached = Cache::load_summaries().unwrap_or_default();
                if cached.is_empty() {
                    return Err(err);
                }
                tracing::warn!("Server unreachable, showing cached boards");
                self.store.set_summaries(cached);
                if let Some(id) = self.store.active_id()
                    && let Ok(Some(board)) = Cache::load_board(id)
                {
                    self.store.replace_active(board);
                }
                Ok(Some("Offline Mode".to_string()))
            }
            Err(err) => Err(err),
        }
    }

    /// Picks a board by title or id, e.g. from the config's `default_board`.
    pub async fn select_by_name(&mut self, name: &str) -> Result<bool, ActionError> {
        let found = self
            .store
            .summaries()
            .iter()
            .find(|s| s.title == name || s.id.to_string() == name)
            .map(|s| s.id);
        match found {
            Some(id) => {
                self.select_board(id).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub async fn select_board(&mut self, id: BoardId) -> Result<(), ActionError> {
        self.drag = None;
        if self.store.select(id) {
            self.reload_active().await?;
        }
        Ok(())
    }

    /// Re-fetches the active board and replaces the local snapshot.
    pub async fn reload_active(&mut self) -> Result<(), ActionError> {
        let id = self.active_id(UserAction::LoadBoard)?;
        let board = self
            .client
            .get_board(id)
            .await
            .map_err(|e| fail(UserAction::LoadBoard, e))?;
        if let Err(e) = Cache::save_board(&board) {
            tracing::warn!("Could not cache board {}: {}", id, e);
        }
        tracing::info!(board = %id, lists = board.lists.len(), "Board reloaded");
        self.store.replace_active(board);
        Ok(())
    }

    /// Detail of every visible board, for the portfolio metrics.
    pub async fn fetch_all_boards(&self) -> Vec<Board> {
        self.client.fetch_all_boards(self.store.summaries()).await
    }

    pub async fn list_users(&mut self) -> Result<&[User], ActionError> {
        self.users = self
            .client
            .list_users()
            .await
            .map_err(|e| fail(UserAction::LoadUsers, e))?;
        Ok(&self.users)
    }

    // ============ USERS ============

    pub async fn profile(&self) -> Result<Profile, ActionError> {
        self.client
            .me()
            .await
            .map_err(|e| fail(UserAction::LoadProfile, e))
    }

    /// Creates an account in the caller's company. The company is taken from
    /// `me/` when the draft does not name one.
    pub async fn register_user(&self, mut draft: NewUser) -> Result<(), ActionError> {
        if draft.company_id.is_none() {
            draft.company_id = self.profile().await?.company_id;
        }
        draft
            .validate()
            .map_err(|e| fail(UserAction::RegisterUser, e))?;
        self.client
            .register(&draft)
            .await
            .map_err(|e| fail(UserAction::RegisterUser, e))
    }

    /// Edits an account and refreshes the member list if it was loaded.
    pub async fn update_user(&mut self, user: UserId, patch: &UserPatch) -> Result<User, ActionError> {
        let updated = self
            .client
            .update_user(user, patch)
            .await
            .map_err(|e| fail(UserAction::UpdateUser, e))?;
        if let Some(slot) = self.users.iter_mut().find(|u| u.id == updated.id) {
            *slot = updated.clone();
        }
        Ok(updated)
    }

    // ============ BOARDS ============

    /// Creates a board and makes it active. Incomplete drafts fail before any request.
    pub async fn create_board(&mut self, draft: &NewBoard) -> Result<BoardId, ActionError> {
        draft
            .validate()
            .map_err(|e| fail(UserAction::CreateBoard, e))?;
        let created = self
            .client
            .create_board(draft)
            .await
            .map_err(|e| fail(UserAction::CreateBoard, e))?;
        self.load_boards().await?;
        self.select_board(created.id).await?;
        Ok(created.id)
    }

    pub async fn update_board(&mut self, patch: &BoardPatch) -> Result<(), ActionError> {
        let id = self.active_id(UserAction::UpdateBoard)?;
        self.client
            .update_board(id, patch)
            .await
            .map_err(|e| fail(UserAction::UpdateBoard, e))?;
        self.load_boards().await
    }

    /// Deletes the active board. Refused while it is the only one.
    pub async fn delete_active_board(&mut self) -> Result<(), ActionError> {
        let id = self.active_id(UserAction::DeleteBoard)?;
        self.store
            .ensure_can_delete_board()
            .map_err(|e| fail(UserAction::DeleteBoard, e))?;
        let next = self.store.next_after_delete(id);
        self.client
            .delete_board(id)
            .await
            .map_err(|e| fail(UserAction::DeleteBoard, e))?;
        self.drag = None;
        self.load_boards().await?;
        if let Some(next) = next
            && self.store.summaries().iter().any(|s| s.id == next)
        {
            self.select_board(next).await?;
        }
        Ok(())
    }

    // ============ LISTS ============

    pub async fn create_list(&mut self, title: &str) -> Result<ListId, ActionError> {
        let board = self.active_id(UserAction::CreateList)?;
        let draft = NewList::new(title);
        draft
            .validate()
            .map_err(|e| fail(UserAction::CreateList, e))?;
        let list = self
            .client
            .create_list(board, &draft)
            .await
            .map_err(|e| fail(UserAction::CreateList, e))?;
        self.reload_active().await?;
        Ok(list.id)
    }

    pub async fn rename_list(&mut self, list: ListId, title: &str) -> Result<(), ActionError> {
        let board = self.active_id(UserAction::UpdateList)?;
        self.ensure_list(list, UserAction::UpdateList)?;
        let patch = ListPatch {
            title: Some(title.trim().to_string()),
        };
        self.client
            .update_list(board, list, &patch)
            .await
            .map_err(|e| fail(UserAction::UpdateList, e))?;
        self.reload_active().await
    }

    pub async fn delete_list(&mut self, list: ListId) -> Result<(), ActionError> {
        let board = self.active_id(UserAction::DeleteList)?;
        self.ensure_list(list, UserAction::DeleteList)?;
        self.client
            .delete_list(board, list)
            .await
            .map_err(|e| fail(UserAction::DeleteList, e))?;
        self.reload_active().await
    }

    // ============ CARDS ============

    pub async fn create_card(&mut self, list: ListId, draft: &NewCard) -> Result<CardId, ActionError> {
        let board = self.active_id(UserAction::CreateCard)?;
        draft
            .validate()
            .map_err(|e| fail(UserAction::CreateCard, e))?;
        self.ensure_list(list, UserAction::CreateCard)?;
        let card = self
            .client
            .create_card(board, list, draft)
            .await
            .map_err(|e| fail(UserAction::CreateCard, e))?;
        self.reload_active().await?;
        Ok(card.id)
    }

    pub async fn update_card(&mut self, card: CardId, patch: &CardPatch) -> Result<(), ActionError> {
        let board = self.active_id(UserAction::UpdateCard)?;
        let list = self.list_holding(card, UserAction::UpdateCard)?;
        self.client
            .update_card(board, list, card, patch)
            .await
            .map_err(|e| fail(UserAction::UpdateCard, e))?;
        self.reload_active().await
    }

    pub async fn delete_card(&mut self, card: CardId) -> Result<(), ActionError> {
        let board = self.active_id(UserAction::DeleteCard)?;
        let list = self.list_holding(card, UserAction::DeleteCard)?;
        self.client
            .delete_card(board, list, card)
            .await
            .map_err(|e| fail(UserAction::DeleteCard, e))?;
        self.reload_active().await
    }

    pub async fn add_member(&mut self, card: CardId, user: UserId) -> Result<(), ActionError> {
        let board = self.active_id(UserAction::AddMember)?;
        let list = self.list_holding(card, UserAction::AddMember)?;
        self.client
            .add_member(board, list, card, user)
            .await
            .map_err(|e| fail(UserAction::AddMember, e))?;
        self.reload_active().await
    }

    pub async fn remove_member(&mut self, card: CardId, user: UserId) -> Result<(), ActionError> {
        let board = self.active_id(UserAction::RemoveMember)?;
        let list = self.list_holding(card, UserAction::RemoveMember)?;
        self.client
            .remove_member(board, list, card, user)
            .await
            .map_err(|e| fail(UserAction::RemoveMember, e))?;
        self.reload_active().await
    }

    // ============ DRAG & DROP ============

    /// Picks up a card. Returns the dragged card for the preview.
    pub fn drag_start(&mut self, card: CardId) -> Option<&Card> {
        self.drag = self
            .store
            .active()
            .and_then(|board| DragSession::start(board, card));
        self.drag.as_ref().map(|s| s.card())
    }

    pub fn dragging(&self) -> Option<&Card> {
        self.drag.as_ref().map(|s| s.card())
    }

    pub fn drag_cancel(&mut self) {
        self.drag = None;
    }

    /// Releases the dragged card over `target` and carries out the resulting plan.
    ///
    /// A move to another list is sent to the server and followed by a reload.
    /// A reorder within the same list only changes the local snapshot.
    pub async fn drag_end(&mut self, target: Option<DropTarget>) -> Result<DropPlan, ActionError> {
        let Some(session) = self.drag.take() else {
            return Ok(DropPlan::Cancelled);
        };
        let Some(board) = self.store.active() else {
            return Ok(DropPlan::Cancelled);
        };
        let board_id = board.id;
        let plan = session.plan(board, target);

        match &plan {
            DropPlan::Move { card, from, to } => {
                let target = MoveCard {
                    list_id: *to,
                    position: None,
                };
                self.client
                    .move_card(board_id, *from, *card, &target)
                    .await
                    .map_err(|e| fail(UserAction::MoveCard, e))?;
                tracing::info!(card = %card, from = %from, to = %to, "Card moved");
                self.reload_active().await?;
            }
            DropPlan::Reorder {
                list,
                card,
                new_index,
                ..
            } => {
                // Local only; the next reload restores the server order
                self.store.reorder_within(*list, *card, *new_index);
            }
            DropPlan::Cancelled | DropPlan::Aborted | DropPlan::NoOp => {}
        }
        Ok(plan)
    }
}
