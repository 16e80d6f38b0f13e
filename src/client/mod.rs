// Remote side of the board: HTTP transport, auth and the API calls
pub mod auth;
pub mod cert;
pub mod core;

pub use self::auth::{FileTokenStore, StaticToken, TokenProvider};
pub use self::core::{ApiConfig, BoardClient};
