//! End-to-end tests for vote recording
//!
//! Tests the stored vote records, the ledger rows and payload validation.

mod common;

use common::{
    TestClient, TestServer, ARTIST_1_KEY, ARTIST_1_NAME, ARTIST_2_KEY, ARTIST_2_NAME, GUEST_1_ID,
    GUEST_2_ID, HOST_ID,
};
use lineup_vote_relay::config::VotingSettings;
use lineup_vote_relay::KeyValueStore;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn test_record_votes_fills_missing_participants() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    // Generates the artist order, which makes display names resolvable
    assert_eq!(client.artist_info().await.status(), StatusCode::OK);

    let response = client
        .record_votes(&json!({
            "artist": ARTIST_1_KEY,
            "votes": { GUEST_1_ID: "yes" }
        }))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"success": true}));

    let record = server
        .store
        .get(&format!("votes/{}", ARTIST_1_KEY))
        .await
        .unwrap()
        .expect("Vote record not stored");
    assert_eq!(record["originalName"], ARTIST_1_NAME);
    assert_eq!(
        record["votes"],
        json!({ GUEST_1_ID: "yes", GUEST_2_ID: "no", HOST_ID: "no" })
    );

    // Roster is sorted: george, gwen, hannah
    let ledger = server.ledger();
    assert_eq!(ledger.len(), 2);
    assert_eq!(
        ledger[0],
        vec!["TIMESTAMP", "ARTIST", GUEST_1_ID, GUEST_2_ID, HOST_ID]
    );
    assert_eq!(ledger[1][1..], [ARTIST_1_NAME, "yes", "no", "no"]);
}

#[tokio::test]
async fn test_record_votes_appends_one_row_per_submission() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());
    client.artist_info().await;

    for (artist, vote) in [(ARTIST_1_KEY, "yes"), (ARTIST_2_KEY, "no"), (ARTIST_1_KEY, "no")] {
        let response = client
            .record_votes(&json!({ "artist": artist, "votes": { HOST_ID: vote } }))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let ledger = server.ledger();
    assert_eq!(ledger.len(), 4);
    assert_eq!(ledger[2][1], ARTIST_2_NAME);

    // The stored record only keeps the latest submission
    let record = server
        .store
        .get(&format!("votes/{}", ARTIST_1_KEY))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record["votes"][HOST_ID], "no");
}

#[tokio::test]
async fn test_record_votes_without_filling() {
    let server = TestServer::spawn_with(VotingSettings {
        fill_missing_votes: false,
    })
    .await;
    let client = TestClient::new(server.base_url.clone());

    let response = client
        .record_votes(&json!({
            "artist": ARTIST_1_KEY,
            "votes": { GUEST_2_ID: true, "visitor": "yes" }
        }))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let record = server
        .store
        .get(&format!("votes/{}", ARTIST_1_KEY))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record["votes"], json!({ GUEST_2_ID: "yes", "visitor": "yes" }));

    // No order stored yet, so the name falls back to the key
    let ledger = server.ledger();
    assert_eq!(ledger[1][1..], [ARTIST_1_KEY, "", "yes"]);
}

#[tokio::test]
async fn test_record_votes_rejects_blank_artist() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client
        .record_votes(&json!({ "artist": "", "votes": {} }))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].is_string());

    assert!(server.ledger().is_empty());
    assert!(server.store.get("votes").await.unwrap().is_none());
}

#[tokio::test]
async fn test_record_votes_rejects_malformed_payloads() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.record_votes_raw("{\"artist\": ").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    for body in [
        json!({ "votes": {} }),
        json!({ "artist": ARTIST_1_KEY, "votes": "yes" }),
        json!({ "artist": ARTIST_1_KEY, "votes": { HOST_ID: "perhaps" } }),
        json!([ARTIST_1_KEY]),
    ] {
        let response = client.record_votes(&body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", body);
    }

    assert!(server.ledger().is_empty());
}

#[tokio::test]
async fn test_record_votes_rejects_keys_outside_votes() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());
    let tokens = json!({ "access_token": "kept", "refresh_token": "kept" });
    server.store.set("tokens", tokens.clone()).await.unwrap();
    assert_eq!(client.artist_info().await.status(), StatusCode::OK);
    let order = server.store.get("artistOrder").await.unwrap();

    for body in [
        json!({ "artist": "../tokens", "votes": { HOST_ID: "yes" } }),
        json!({ "artist": "../artistOrder", "votes": {} }),
        json!({ "artist": "a/b", "votes": {} }),
        json!({ "artist": ARTIST_1_KEY, "votes": { "j.doe": "yes" } }),
    ] {
        let response = client.record_votes(&body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", body);
    }

    assert_eq!(server.store.get("tokens").await.unwrap(), Some(tokens));
    assert_eq!(server.store.get("artistOrder").await.unwrap(), order);
    assert!(server.store.get("votes").await.unwrap().is_none());
    assert!(server.ledger().is_empty());
}

#[tokio::test]
async fn test_record_votes_with_a_large_roster() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let guests: Vec<String> = (0..30).map(|i| format!("guest{:02}", i)).collect();
    let guest_map: serde_json::Map<String, Value> =
        guests.iter().map(|g| (g.clone(), json!(true))).collect();
    server.store.set("guests", Value::Object(guest_map)).await.unwrap();

    let last_guest = guests.last().unwrap().clone();
    let response = client
        .record_votes(&json!({
            "artist": ARTIST_1_KEY,
            "votes": { last_guest.clone(): "yes" }
        }))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    // 30 guests and the host, after the timestamp and artist columns
    let ledger = server.ledger();
    assert_eq!(ledger[0].len(), 33);
    assert_eq!(ledger[0][31], last_guest);
    assert_eq!(ledger[1][31], "yes");

    let response = client.throb_count(&last_guest).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "count": 1 }));
}
