pub mod cache;
pub mod color_utils;
pub mod client;
pub mod config;
pub mod controller;
pub mod drag;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod model;
pub mod reorder;
pub mod storage;
pub mod store;

#[cfg(feature = "tui")]
pub mod tui;
