#![allow(dead_code)]

use std::sync::{Arc, Once};
use taskmy::client::{ApiConfig, BoardClient, StaticToken};
use taskmy::controller::BoardController;

static ISOLATE: Once = Once::new();

/// Points the cache and token files at a throwaway directory, once per test binary.
pub fn isolate() {
    ISOLATE.call_once(|| {
        let dir = std::env::temp_dir().join(format!("taskmy-test-{}", std::process::id()));
        // SAFETY: runs once, before any test reads the environment
        unsafe { std::env::set_var("TASKMY_DATA_DIR", dir) };
    });
}

pub fn controller(server_url: &str) -> BoardController {
    isolate();
    let config = ApiConfig::new(&format!("{}/api", server_url));
    let client = BoardClient::new(&config, Arc::new(StaticToken::new("secret"))).unwrap();
    BoardController::new(client)
}

pub fn summaries(ids: &[u64]) -> String {
    let items: Vec<String> = ids
        .iter()
        .map(|id| {
            format!(
                r#"{{"id": {id}, "title": "Board {id}", "priority": "medium", "start_date": "2025-01-01", "end_date": "2025-03-01"}}"#
            )
        })
        .collect();
    format!("[{}]", items.join(","))
}

/// Board 1 with lists L1 (id 10) and L2 (id 20), cards given by (id, title).
pub fn board(l1: &[(u64, &str)], l2: &[(u64, &str)]) -> String {
    board_with_id(1, l1, l2)
}

pub fn board_with_id(id: u64, l1: &[(u64, &str)], l2: &[(u64, &str)]) -> String {
    let cards = |cards: &[(u64, &str)]| {
        cards
            .iter()
            .map(|(id, title)| format!(r#"{{"id": {id}, "title": "{title}"}}"#))
            .collect::<Vec<_>>()
            .join(",")
    };
    format!(
        r#"{{
            "id": {id}, "title": "Board {id}", "priority": "high",
            "start_date": "2025-01-01", "end_date": "2025-03-01",
            "lists": [
                {{"id": 10, "title": "L1", "cards": [{}]}},
                {{"id": 20, "title": "L2", "cards": [{}]}}
            ]
        }}"#,
        cards(l1),
        cards(l2)
    )
}
