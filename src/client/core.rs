use crate::client::auth::{StaticToken, TokenProvider};
use crate::client::cert::build_connector;
use crate::config::{AuthScheme, Config};
use crate::error::SyncError;
use crate::model::{
    Board, BoardId, BoardPatch, BoardSummary, Card, CardId, CardPatch, Credentials, List, ListId,
    ListPatch, MemberChange, MoveCard, NewBoard, NewCard, NewList, NewUser, Profile, TokenResponse,
    User, UserId, UserPatch,
};

use futures::stream::{self, StreamExt};
use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use http::{Method, Request, Uri};
use http_body_util::BodyExt;
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;

type HttpsClient = Client<HttpsConnector<HttpConnector>, String>;

/// Where the API lives and how to talk to it.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub auth_scheme: AuthScheme,
    pub allow_insecure_certs: bool,
}

impl ApiConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            auth_scheme: AuthScheme::default(),
            allow_insecure_certs: false,
        }
    }
}

impl From<&Config> for ApiConfig {
    fn from(config: &Config) -> Self {
        Self {
            base_url: config.api_url.clone(),
            auth_scheme: config.auth_scheme,
            allow_insecure_certs: config.allow_insecure_certs,
        }
    }
}

/// One method per endpoint of the board API.
///
/// Calls never touch local state. After a successful mutation the caller is
/// expected to fetch the board again with [`BoardClient::get_board`].
#[derive(Clone)]
pub struct BoardClient {
    http: HttpsClient,
    base: String,
    scheme: AuthScheme,
    tokens: Arc<dyn TokenProvider>,
}

impl fmt::Debug for BoardClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoardClient")
            .field("base", &self.base)
            .field("scheme", &self.scheme)
            .field("authenticated", &self.tokens.token().is_some())
            .finish()
    }
}

fn board_path(board: BoardId) -> String {
    format!("/boards/{}/", board)
}

fn list_path(board: BoardId, list: ListId) -> String {
    format!("/boards/{}/lists/{}/", board, list)
}

fn card_path(board: BoardId, list: ListId, card: CardId) -> String {
    format!("/boards/{}/lists/{}/cards/{}/", board, list, card)
}

impl BoardClient {
    pub fn new(config: &ApiConfig, tokens: Arc<dyn TokenProvider>) -> Result<Self, SyncError> {
        let base = config.base_url.trim_end_matches('/').to_string();
        let uri: Uri = base
            .parse()
            .map_err(|e: http::uri::InvalidUri| SyncError::Request(e.to_string()))?;
        let require_roots = uri.scheme_str() == Some("https");

        let connector = build_connector(config.allow_insecure_certs, require_roots)
            .map_err(SyncError::Request)?;
        let http = Client::builder(TokioExecutor::new()).build(connector);

        Ok(Self {
            http,
            base,
            scheme: config.auth_scheme,
            tokens,
        })
    }

    /// Client without credentials, for the token exchange.
    pub fn anonymous(config: &ApiConfig) -> Result<Self, SyncError> {
        Self::new(config, Arc::new(StaticToken::default()))
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    pub fn is_authenticated(&self) -> bool {
        self.tokens.token().is_some()
    }

    async fn send(
        &self,
        op: &'static str,
        method: Method,
        path: &str,
        body: Option<String>,
        with_auth: bool,
    ) -> Result<Vec<u8>, SyncError> {
        let url = format!("{}{}", self.base, path);
        let mut builder = Request::builder()
            .method(method.clone())
            .uri(url.as_str())
            .header(ACCEPT, "application/json");
        if body.is_some() {
            builder = builder.header(CONTENT_TYPE, "application/json");
        }
        if with_auth && let Some(token) = self.tokens.token() {
            builder = builder.header(AUTHORIZATION, self.scheme.header_value(&token));
        }
        let req = builder
            .body(body.unwrap_or_default())
            .map_err(|e| SyncError::Request(e.to_string()))?;

        tracing::debug!(op, %method, url = %url, "API request");

        let resp = self
            .http
            .request(req)
            .await
            .map_err(|e| SyncError::Transport {
                op,
                message: e.to_string(),
            })?;
        let status = resp.status();
        let bytes = resp
            .into_body()
            .collect()
            .await
            .map_err(|e| SyncError::Transport {
                op,
                message: e.to_string(),
            })?
            .to_bytes();

        if !status.is_success() {
            tracing::warn!(op, %status, "API request failed");
            return Err(SyncError::Status { op, status });
        }
        Ok(bytes.to_vec())
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        op: &'static str,
        method: Method,
        path: &str,
        payload: Option<&(impl Serialize + ?Sized)>,
    ) -> Result<T, SyncError> {
        let body = match payload {
            Some(p) => Some(serde_json::to_string(p).map_err(|e| SyncError::Request(e.to_string()))?),
            None => None,
        };
        let bytes = self.send(op, method, path, body, true).await?;
        serde_json::from_slice(&bytes).map_err(|source| SyncError::Decode { op, source })
    }

    async fn execute(
        &self,
        op: &'static str,
        method: Method,
        path: &str,
        payload: Option<&(impl Serialize + ?Sized)>,
    ) -> Result<(), SyncError> {
        let body = match payload {
            Some(p) => Some(serde_json::to_string(p).map_err(|e| SyncError::Request(e.to_string()))?),
            None => None,
        };
        self.send(op, method, path, body, true).await.map(|_| ())
    }

    // ============ AUTH ============

    /// Exchanges credentials for an API token. The token is returned, not stored.
    pub async fn login(&self, credentials: &Credentials) -> Result<String, SyncError> {
        let op = "login";
        let body = serde_json::to_string(credentials).map_err(|e| SyncError::Request(e.to_string()))?;
        let bytes = self
            .send(op, Method::POST, "/auth-token/", Some(body), false)
            .await?;
        let resp: TokenResponse =
            serde_json::from_slice(&bytes).map_err(|source| SyncError::Decode { op, source })?;
        tracing::info!(username = %credentials.username, "Logged in");
        Ok(resp.token)
    }

    pub async fn list_users(&self) -> Result<Vec<User>, SyncError> {
        self.fetch("list users", Method::GET, "/users/", None::<&()>)
            .await
    }

    /// The account behind the current token.
    pub async fn me(&self) -> Result<Profile, SyncError> {
        self.fetch("me", Method::GET, "/me/", None::<&()>).await
    }

    /// Creates an account. Sent without credentials; the response body is ignored.
    pub async fn register(&self, draft: &NewUser) -> Result<(), SyncError> {
        draft.validate()?;
        let body = serde_json::to_string(draft).map_err(|e| SyncError::Request(e.to_string()))?;
        self.send("register", Method::POST, "/register/", Some(body), false)
            .await?;
        tracing::info!(username = %draft.username, "User registered");
        Ok(())
    }

    pub async fn update_user(&self, user: UserId, patch: &UserPatch) -> Result<User, SyncError> {
        let path = format!("/users/{}/", user);
        self.fetch("update user", Method::PATCH, &path, Some(patch))
            .await
    }

    // ============ BOARDS ============

    pub async fn list_boards(&self) -> Result<Vec<BoardSummary>, SyncError> {
        self.fetch("list boards", Method::GET, "/boards/", None::<&()>)
            .await
    }

    pub async fn get_board(&self, board: BoardId) -> Result<Board, SyncError> {
        self.fetch("get board", Method::GET, &board_path(board), None::<&()>)
            .await
    }

    /// Validates before sending; an incomplete draft never reaches the network.
    pub async fn create_board(&self, draft: &NewBoard) -> Result<BoardSummary, SyncError> {
        draft.validate()?;
        self.fetch("create board", Method::POST, "/boards/", Some(draft))
            .await
    }

    pub async fn update_board(
        &self,
        board: BoardId,
        patch: &BoardPatch,
    ) -> Result<BoardSummary, SyncError> {
        self.fetch("update board", Method::PATCH, &board_path(board), Some(patch))
            .await
    }

    pub async fn delete_board(&self, board: BoardId) -> Result<(), SyncError> {
        self.execute("delete board", Method::DELETE, &board_path(board), None::<&()>)
            .await
    }

    /// Detail of every board, four requests in flight. Boards that fail to load are skipped.
    pub async fn fetch_all_boards(&self, summaries: &[BoardSummary]) -> Vec<Board> {
        let ids: Vec<BoardId> = summaries.iter().map(|s| s.id).collect();
        let futures = ids.into_iter().map(|id| {
            let client = self.clone();
            async move { (id, client.get_board(id).await) }
        });
        let mut stream = stream::iter(futures).buffer_unordered(4);
        let mut boards = Vec::new();
        while let Some((id, res)) = stream.next().await {
            match res {
                Ok(board) => boards.push(board),
                Err(e) => tracing::warn!(board = %id, "Skipping board: {}", e),
            }
        }
        // Keep switcher order regardless of completion order
        boards.sort_by_key(|b| summaries.iter().position(|s| s.id == b.id));
        boards
    }

    // ============ LISTS ============

    pub async fn create_list(&self, board: BoardId, draft: &NewList) -> Result<List, SyncError> {
        draft.validate()?;
        let path = format!("/boards/{}/lists/", board);
        self.fetch("create list", Method::POST, &path, Some(draft))
            .await
    }

    pub async fn update_list(
        &self,
        board: BoardId,
        list: ListId,
        patch: &ListPatch,
    ) -> Result<List, SyncError> {
        self.fetch("update list", Method::PATCH, &list_path(board, list), Some(patch))
            .await
    }

    pub async fn delete_list(&self, board: BoardId, list: ListId) -> Result<(), SyncError> {
        self.execute("delete list", Method::DELETE, &list_path(board, list), None::<&()>)
            .await
    }

    // ============ CARDS ============

    pub async fn create_card(
        &self,
        board: BoardId,
        list: ListId,
        draft: &NewCard,
    ) -> Result<Card, SyncError> {
        draft.validate()?;
        let path = format!("/boards/{}/lists/{}/cards/", board, list);
        self.fetch("create card", Method::POST, &path, Some(draft))
            .await
    }

    pub async fn update_card(
        &self,
        board: BoardId,
        list: ListId,
        card: CardId,
        patch: &CardPatch,
    ) -> Result<Card, SyncError> {
        self.fetch(
            "update card",
            Method::PATCH,
            &card_path(board, list, card),
            Some(patch),
        )
        .await
    }

    pub async fn delete_card(
        &self,
        board: BoardId,
        list: ListId,
        card: CardId,
    ) -> Result<(), SyncError> {
        self.execute(
            "delete card",
            Method::DELETE,
            &card_path(board, list, card),
            None::<&()>,
        )
        .await
    }

    /// Re-parents `card` from `from` to `target.list_id`. The response body is ignored.
    pub async fn move_card(
        &self,
        board: BoardId,
        from: ListId,
        card: CardId,
        target: &MoveCard,
    ) -> Result<(), SyncError> {
        let path = format!("{}move/", card_path(board, from, card));
        self.execute("move card", Method::PATCH, &path, Some(target))
            .await
    }

    pub async fn add_member(
        &self,
        board: BoardId,
        list: ListId,
        card: CardId,
        user: UserId,
    ) -> Result<(), SyncError> {
        let path = format!("{}add_member/", card_path(board, list, card));
        self.execute(
            "add member",
            Method::POST,
            &path,
            Some(&MemberChange { user_id: user }),
        )
        .await
    }

    pub async fn remove_member(
        &self,
        board: BoardId,
        list: ListId,
        card: CardId,
        user: UserId,
    ) -> Result<(), SyncError> {
        let path = format!("{}remove_member/", card_path(board, list, card));
        self.execute(
            "remove member",
            Method::POST,
            &path,
            Some(&MemberChange { user_id: user }),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        assert_eq!(board_path(BoardId(3)), "/boards/3/");
        assert_eq!(list_path(BoardId(3), ListId(4)), "/boards/3/lists/4/");
        assert_eq!(
            card_path(BoardId(3), ListId(4), CardId(5)),
            "/boards/3/lists/4/cards/5/"
        );
    }

    #[tokio::test]
    async fn test_base_url_is_normalised() {
        let client = BoardClient::anonymous(&ApiConfig::new("http://localhost:8000/api/")).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000/api");
        assert!(!client.is_authenticated());
    }

    #[test]
    fn test_rejects_garbage_url() {
        let err = BoardClient::anonymous(&ApiConfig::new("not a url")).unwrap_err();
        assert!(matches!(err, SyncError::Request(_)));
    }
}
