mod common;

use taskmy::cache::Cache;
use taskmy::model::{BoardId, BoardSummary, Priority};

#[tokio::test]
async fn test_unreachable_server_falls_back_to_cached_boards() {
    // Nothing listens on the discard port
    let mut ctl = common::controller("http://127.0.0.1:9");

    let err = ctl.load_boards_or_cached().await.unwrap_err();
    assert!(err.source.is_connectivity(), "unexpected error: {}", err.detail());

    Cache::save_summaries(&[BoardSummary {
        id: BoardId(3),
        title: "Cached".into(),
        priority: Priority::Low,
        start_date: None,
        end_date: None,
    }])
    .unwrap();

    let warning = ctl.load_boards_or_cached().await.unwrap();
    assert_eq!(warning.as_deref(), Some("Offline Mode"));
    assert_eq!(ctl.store().active_id(), Some(BoardId(3)));
    assert!(ctl.board().is_none(), "no detail was ever cached for board 3");
}
