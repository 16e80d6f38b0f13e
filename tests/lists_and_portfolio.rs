mod common;

use mockito::{Matcher, Server};
use taskmy::error::{SyncError, UserAction};
use taskmy::model::{BoardId, ListId};

async fn loaded(server: &mut mockito::ServerGuard) -> taskmy::controller::BoardController {
    let mut ctl = common::controller(&server.url());
    let _boards = server
        .mock("GET", "/api/boards/")
        .with_status(200)
        .with_body(common::summaries(&[1]))
        .create_async()
        .await;
    let detail = server
        .mock("GET", "/api/boards/1/")
        .with_status(200)
        .with_body(common::board(&[(1, "c1")], &[]))
        .create_async()
        .await;
    ctl.load_boards().await.unwrap();
    detail.remove_async().await;
    ctl
}

#[tokio::test]
async fn test_list_lifecycle() {
    let mut server = Server::new_async().await;
    let mut ctl = loaded(&mut server).await;

    let create = server
        .mock("POST", "/api/boards/1/lists/")
        .match_body(Matcher::JsonString(r#"{"title": "Done"}"#.to_string()))
        .with_status(201)
        .with_body(r#"{"id": 30, "title": "Done"}"#)
        .expect(1)
        .create_async()
        .await;
    let rename = server
        .mock("PATCH", "/api/boards/1/lists/10/")
        .match_body(Matcher::JsonString(r#"{"title": "Todo"}"#.to_string()))
        .with_status(200)
        .with_body(r#"{"id": 10, "title": "Todo"}"#)
        .expect(1)
        .create_async()
        .await;
    let delete = server
        .mock("DELETE", "/api/boards/1/lists/20/")
        .with_status(204)
        .expect(1)
        .create_async()
        .await;
    let reloads = server
        .mock("GET", "/api/boards/1/")
        .with_status(200)
        .with_body(common::board(&[(1, "c1")], &[]))
        .expect(3)
        .create_async()
        .await;

    assert_eq!(ctl.create_list("  Done ").await.unwrap(), ListId(30));
    ctl.rename_list(ListId(10), "Todo").await.unwrap();
    ctl.delete_list(ListId(20)).await.unwrap();

    create.assert_async().await;
    rename.assert_async().await;
    delete.assert_async().await;
    reloads.assert_async().await;
}

#[tokio::test]
async fn test_list_guards_run_before_requests() {
    let mut server = Server::new_async().await;
    let mut ctl = loaded(&mut server).await;

    let no_create = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;
    let no_delete = server
        .mock("DELETE", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let err = ctl.create_list("   ").await.unwrap_err();
    assert_eq!(err.action, UserAction::CreateList);
    assert!(matches!(err.source, SyncError::Validation(_)));

    let err = ctl.delete_list(ListId(99)).await.unwrap_err();
    assert!(matches!(err.source, SyncError::UnknownList(ListId(99))));

    no_create.assert_async().await;
    no_delete.assert_async().await;
}

#[tokio::test]
async fn test_fetch_all_boards_skips_failures_and_keeps_order() {
    let mut server = Server::new_async().await;
    let mut ctl = common::controller(&server.url());

    let _boards = server
        .mock("GET", "/api/boards/")
        .with_status(200)
        .with_body(common::summaries(&[3, 1, 2]))
        .create_async()
        .await;
    let _b3 = server
        .mock("GET", "/api/boards/3/")
        .with_status(200)
        .with_body(common::board_with_id(3, &[], &[]))
        .create_async()
        .await;
    let _b1 = server
        .mock("GET", "/api/boards/1/")
        .with_status(200)
        .with_body(common::board(&[(1, "c1")], &[(2, "c2")]))
        .create_async()
        .await;
    let _b2 = server
        .mock("GET", "/api/boards/2/")
        .with_status(500)
        .create_async()
        .await;

    ctl.load_boards().await.unwrap();
    assert_eq!(ctl.store().active_id(), Some(BoardId(3)));

    let boards = ctl.fetch_all_boards().await;
    let ids: Vec<BoardId> = boards.iter().map(|b| b.id).collect();
    assert_eq!(ids, vec![BoardId(3), BoardId(1)]);
    assert_eq!(boards[1].card_count(), 2);
}
