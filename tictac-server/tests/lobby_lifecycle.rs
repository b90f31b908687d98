//! Lobby creation, joining, listing, and teardown over a live server

mod common;

use std::time::Duration;

use common::client::GameClient;
use common::spawn_test_server;

const QUIET: Duration = Duration::from_millis(100);

#[tokio::test]
async fn create_lobby_returns_a_fresh_board() {
    let (_state, addr) = spawn_test_server().await;
    let mut client = GameClient::connect(addr).await;

    client
        .conn
        .send_json(&serde_json::json!({"type": "CREATE_LOBBY"}))
        .await;
    let response = client.expect("LOBBY_CREATED").await;

    let lobby_id = response["lobbyId"].as_str().unwrap();
    assert_eq!(lobby_id.len(), 7);
    assert!(
        lobby_id
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
    );

    assert_eq!(response["players"].as_array().unwrap().len(), 1);
    assert_eq!(response["players"][0]["mark"], "X");
    assert_eq!(response["nextMove"], "X");
    for row in 0..3 {
        for col in 0..3 {
            assert_eq!(response["board"][row][col], "");
        }
    }
}

#[tokio::test]
async fn create_while_already_in_a_lobby_is_rejected() {
    let (_state, addr) = spawn_test_server().await;
    let mut client = GameClient::connect(addr).await;
    client.create_lobby().await;

    client
        .conn
        .send_json(&serde_json::json!({"type": "CREATE_LOBBY"}))
        .await;
    client.expect("ALREADY_IN_LOBBY").await;

    // Only the first lobby exists.
    let sessions = client.list_lobbies().await;
    assert_eq!(sessions.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn join_assigns_o_and_notifies_the_host() {
    let (_state, addr) = spawn_test_server().await;
    let mut host = GameClient::connect(addr).await;
    let mut guest = GameClient::connect(addr).await;

    let lobby_id = host.create_lobby().await;
    let mark = guest.join_lobby(&lobby_id).await;
    assert_eq!(mark, "O");

    let notification = host.expect("PLAYER_JOINED").await;
    assert_eq!(notification["lobbyId"], lobby_id.as_str());
    assert_eq!(notification["players"].as_array().unwrap().len(), 2);

    // The joiner already got the full picture in JOINED_LOBBY and is not
    // echoed the membership broadcast.
    guest.expect_no_message(QUIET).await;
}

#[tokio::test]
async fn join_unknown_lobby_reports_not_found() {
    let (_state, addr) = spawn_test_server().await;
    let mut client = GameClient::connect(addr).await;

    client
        .conn
        .send_json(&serde_json::json!({"type": "JOIN_LOBBY", "lobbyId": "zzzzzzz"}))
        .await;
    client.expect("LOBBY_NOT_FOUND").await;
}

#[tokio::test]
async fn join_full_lobby_reports_full_and_changes_nothing() {
    let (_state, addr) = spawn_test_server().await;
    let mut host = GameClient::connect(addr).await;
    let mut guest = GameClient::connect(addr).await;
    let mut third = GameClient::connect(addr).await;

    let lobby_id = host.create_lobby().await;
    guest.join_lobby(&lobby_id).await;

    third
        .conn
        .send_json(&serde_json::json!({"type": "JOIN_LOBBY", "lobbyId": lobby_id}))
        .await;
    third.expect("LOBBY_FULL").await;

    let sessions = third.list_lobbies().await;
    assert_eq!(sessions[0]["occupancy"], 2);
}

#[tokio::test]
async fn lobby_directory_tracks_occupancy() {
    let (_state, addr) = spawn_test_server().await;
    let mut host = GameClient::connect(addr).await;
    let mut guest = GameClient::connect(addr).await;
    let mut solo = GameClient::connect(addr).await;
    let mut asker = GameClient::connect(addr).await;

    let paired = host.create_lobby().await;
    guest.join_lobby(&paired).await;
    let waiting = solo.create_lobby().await;

    let sessions = asker.list_lobbies().await;
    let sessions = sessions.as_array().unwrap();
    assert_eq!(sessions.len(), 2);

    let occupancy_of = |id: &str| {
        sessions
            .iter()
            .find(|s| s["id"] == id)
            .map(|s| s["occupancy"].as_u64().unwrap())
            .unwrap()
    };
    assert_eq!(occupancy_of(&paired), 2);
    assert_eq!(occupancy_of(&waiting), 1);
}

#[tokio::test]
async fn last_leave_removes_the_lobby_from_the_directory() {
    let (_state, addr) = spawn_test_server().await;
    let mut client = GameClient::connect(addr).await;
    let mut asker = GameClient::connect(addr).await;

    let lobby_id = client.create_lobby().await;
    client.leave_lobby().await;
    client.expect("LEFT_LOBBY").await;
    let removed = client.expect("LOBBY_REMOVED").await;
    assert_eq!(removed["lobbyId"], lobby_id.as_str());

    let sessions = asker.list_lobbies().await;
    assert!(sessions.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn leave_notifies_the_remaining_player() {
    let (_state, addr) = spawn_test_server().await;
    let mut host = GameClient::connect(addr).await;
    let mut guest = GameClient::connect(addr).await;

    let lobby_id = host.create_lobby().await;
    guest.join_lobby(&lobby_id).await;
    host.expect("PLAYER_JOINED").await;

    guest.leave_lobby().await;
    guest.expect("LEFT_LOBBY").await;

    let notice = host.expect("PLAYER_LEFT").await;
    assert_eq!(notice["lobbyId"], lobby_id.as_str());

    // The lobby survives with one seat taken.
    let sessions = host.list_lobbies().await;
    assert_eq!(sessions[0]["occupancy"], 1);
}

#[tokio::test]
async fn leave_without_a_lobby_reports_not_found() {
    let (_state, addr) = spawn_test_server().await;
    let mut client = GameClient::connect(addr).await;

    client.leave_lobby().await;
    client.expect("LOBBY_NOT_FOUND").await;
}

#[tokio::test]
async fn disconnect_is_treated_as_leaving() {
    let (_state, addr) = spawn_test_server().await;
    let mut host = GameClient::connect(addr).await;
    let mut guest = GameClient::connect(addr).await;

    let lobby_id = host.create_lobby().await;
    guest.join_lobby(&lobby_id).await;
    host.expect("PLAYER_JOINED").await;

    guest.conn.close().await;

    let notice = host.expect("PLAYER_LEFT").await;
    assert_eq!(notice["lobbyId"], lobby_id.as_str());
}

#[tokio::test]
async fn disconnect_of_last_player_evicts_the_lobby() {
    let (state, addr) = spawn_test_server().await;
    let mut client = GameClient::connect(addr).await;
    let mut asker = GameClient::connect(addr).await;

    client.create_lobby().await;
    client.conn.close().await;

    // Poll the directory until the close has been processed.
    let mut sessions = asker.list_lobbies().await;
    for _ in 0..50 {
        if sessions.as_array().unwrap().is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
        sessions = asker.list_lobbies().await;
    }
    assert!(sessions.as_array().unwrap().is_empty());
    assert_eq!(state.lobby_count().await, 0);
}

#[tokio::test]
async fn malformed_messages_are_dropped_without_killing_the_socket() {
    let (_state, addr) = spawn_test_server().await;
    let mut client = GameClient::connect(addr).await;

    client.conn.send_raw("this is not json").await;
    client.conn.send_raw(r#"{"type":"NO_SUCH_THING"}"#).await;
    client.expect_no_message(QUIET).await;

    // The connection still works.
    client.create_lobby().await;
}
