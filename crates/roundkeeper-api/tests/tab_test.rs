//! Integration tests for the Tab bounded context.

mod common;

use axum::Router;
use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

/// Tab with admin Ana (beer, €3) and Ben (wine, €5), Ana acting.
struct Bar {
    tab_id: Uuid,
    ana: Uuid,
    ben: Uuid,
}

async fn open_bar(app: &Router) -> Bar {
    let tab_id = common::start_tab(app).await;
    let ana = common::create(app, "add-member", &json!({ "tab_id": tab_id, "name": "Ana", "is_admin": true })).await;
    let ben = common::create(app, "add-member", &json!({ "tab_id": tab_id, "name": "Ben" })).await;
    let beer = common::create(app, "add-drink", &json!({ "tab_id": tab_id, "name": "Beer", "price": "3" })).await;
    let wine = common::create(app, "add-drink", &json!({ "tab_id": tab_id, "name": "Wine", "price": "5.00" })).await;
    for (member_id, drink_id) in [(ana, beer), (ben, wine)] {
        let (status, _) = common::post_json(
            app,
            "/api/v1/tabs/set-default-drink",
            &json!({ "tab_id": tab_id, "member_id": member_id, "drink_id": drink_id }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }
    Bar { tab_id, ana, ben }
}

async fn start_round(app: &Router, tab_id: Uuid, buyer_id: Uuid) -> Uuid {
    common::create(app, "start-round", &json!({ "tab_id": tab_id, "buyer_id": buyer_id })).await
}

async fn tab_command(app: &Router, path: &str, body: &serde_json::Value) -> (StatusCode, serde_json::Value) {
    common::post_json(app, &format!("/api/v1/tabs/{path}"), body).await
}

#[tokio::test]
async fn test_tab_start_session_round_trip() {
    let app = common::build_test_app();

    let tab_id = common::start_tab(&app).await;

    // GET /api/v1/tabs/{tab_id} — verify persisted state
    let (status, json) = common::get_json(&app, &format!("/api/v1/tabs/{tab_id}")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["tab_id"], tab_id.to_string());
    assert_eq!(json["code"], "AAAA");
    assert_eq!(json["status"], "active");
    assert_eq!(json["next_round_number"], 1);
    assert_eq!(json["version"], 1);
}

#[tokio::test]
async fn test_tab_round_confirm_and_standings_round_trip() {
    let app = common::build_test_app();
    let bar = open_bar(&app).await;

    // Both members auto-join with a default, so the round has two lines.
    let round_id = start_round(&app, bar.tab_id, bar.ana).await;
    let (_, json) = common::get_json(&app, &format!("/api/v1/tabs/{}", bar.tab_id)).await;
    assert_eq!(json["editing_id"], round_id.to_string());
    assert_eq!(json["rounds"][0]["status"], "draft");
    assert_eq!(json["rounds"][0]["items"].as_array().unwrap().len(), 2);
    assert_eq!(json["rounds"][0]["subtotal"], 8.0);
    let ana_line = json["rounds"][0]["items"][0]["id"].as_str().unwrap().to_owned();

    // Ana has a second beer.
    let (status, json) = tab_command(
        &app,
        "step-item",
        &json!({ "tab_id": bar.tab_id, "round_id": round_id, "item_id": ana_line, "step": "up" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["event_ids"].as_array().unwrap().len(), 1);

    let (status, _) = tab_command(&app, "confirm-round", &json!({ "tab_id": bar.tab_id, "round_id": round_id })).await;
    assert_eq!(status, StatusCode::OK);

    let (_, json) = common::get_json(&app, &format!("/api/v1/tabs/{}", bar.tab_id)).await;
    assert_eq!(json["rounds"][0]["status"], "confirmed");
    assert_eq!(json["rounds"][0]["confirmed_at"], "2026-07-04T21:30:00Z");
    assert_eq!(json["ledger_total"], 11.0);
    assert!(json["editing_id"].is_null());

    let (status, json) = common::get_json(&app, &format!("/api/v1/tabs/{}/standings", bar.tab_id)).await;
    assert_eq!(status, StatusCode::OK);
    let rows = json["standings"].as_array().unwrap();
    assert_eq!(rows[0]["member_id"], bar.ben.to_string());
    assert_eq!(rows[0]["rounds_bought"], 0);
    assert_eq!(rows[0]["drinks_received"], 1);
    assert_eq!(rows[0]["net"], -1);
    assert_eq!(rows[1]["member_id"], bar.ana.to_string());
    assert_eq!(rows[1]["rounds_bought"], 1);
    assert_eq!(rows[1]["drinks_received"], 2);
}

#[tokio::test]
async fn test_tab_confirmed_round_rejects_item_edits() {
    let app = common::build_test_app();
    let bar = open_bar(&app).await;
    let round_id = start_round(&app, bar.tab_id, bar.ana).await;
    let (status, _) = tab_command(&app, "confirm-round", &json!({ "tab_id": bar.tab_id, "round_id": round_id })).await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = tab_command(
        &app,
        "add-recipient-item",
        &json!({ "tab_id": bar.tab_id, "round_id": round_id, "recipient_id": bar.ben }),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"], "invalid_state");
}

#[tokio::test]
async fn test_tab_non_admin_cannot_add_drink() {
    let app = common::build_test_app();
    let bar = open_bar(&app).await;
    let (status, _) = tab_command(
        &app,
        "switch-acting-member",
        &json!({ "tab_id": bar.tab_id, "member_id": bar.ben }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = tab_command(&app, "add-drink", &json!({ "tab_id": bar.tab_id, "name": "Gin", "price": "7" })).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["error"], "forbidden");
    let (_, json) = common::get_json(&app, &format!("/api/v1/tabs/{}", bar.tab_id)).await;
    assert_eq!(json["drinks"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_tab_only_buyer_can_delete_draft() {
    let app = common::build_test_app();
    let bar = open_bar(&app).await;
    let round_id = start_round(&app, bar.tab_id, bar.ana).await;
    let (status, _) = tab_command(
        &app,
        "switch-acting-member",
        &json!({ "tab_id": bar.tab_id, "member_id": bar.ben }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = tab_command(&app, "delete-draft", &json!({ "tab_id": bar.tab_id, "round_id": round_id })).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["error"], "forbidden");
    let (_, json) = common::get_json(&app, &format!("/api/v1/tabs/{}", bar.tab_id)).await;
    assert_eq!(json["rounds"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_tab_round_numbers_skip_deleted_draft() {
    let app = common::build_test_app();
    let bar = open_bar(&app).await;
    for _ in 0..2 {
        let round_id = start_round(&app, bar.tab_id, bar.ana).await;
        let (status, _) = tab_command(&app, "confirm-round", &json!({ "tab_id": bar.tab_id, "round_id": round_id })).await;
        assert_eq!(status, StatusCode::OK);
    }
    let third = start_round(&app, bar.tab_id, bar.ana).await;
    let (status, _) = tab_command(&app, "delete-draft", &json!({ "tab_id": bar.tab_id, "round_id": third })).await;
    assert_eq!(status, StatusCode::OK);

    start_round(&app, bar.tab_id, bar.ana).await;

    let (_, json) = common::get_json(&app, &format!("/api/v1/tabs/{}", bar.tab_id)).await;
    let numbers: Vec<u64> = json["rounds"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["number"].as_u64().unwrap())
        .collect();
    assert_eq!(numbers, vec![1, 2, 4]);
}

#[tokio::test]
async fn test_tab_cancel_discards_empty_split_round() {
    let app = common::build_test_app();
    let bar = open_bar(&app).await;
    let round_id = common::create(
        &app,
        "start-split-round",
        &json!({ "tab_id": bar.tab_id, "buyer_id": bar.ana, "member_ids": [] }),
    )
    .await;

    let (status, json) = tab_command(&app, "cancel-editing", &json!({ "tab_id": bar.tab_id })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["event_ids"].as_array().unwrap().len(), 1);
    let (status, json) = tab_command(&app, "confirm-round", &json!({ "tab_id": bar.tab_id, "round_id": round_id })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "entity_not_found");
}

#[tokio::test]
async fn test_tab_closed_session_rejects_new_rounds() {
    let app = common::build_test_app();
    let bar = open_bar(&app).await;
    let (status, _) = tab_command(&app, "close-session", &json!({ "tab_id": bar.tab_id })).await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = tab_command(&app, "start-round", &json!({ "tab_id": bar.tab_id, "buyer_id": bar.ana })).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"], "invalid_state");
}

#[tokio::test]
async fn test_tab_change_item_rejects_zero_quantity() {
    let app = common::build_test_app();
    let bar = open_bar(&app).await;
    let round_id = start_round(&app, bar.tab_id, bar.ana).await;
    let (_, json) = common::get_json(&app, &format!("/api/v1/tabs/{}", bar.tab_id)).await;
    let item_id = json["rounds"][0]["items"][0]["id"].as_str().unwrap().to_owned();

    let (status, json) = tab_command(
        &app,
        "change-item",
        &json!({ "tab_id": bar.tab_id, "round_id": round_id, "item_id": item_id, "qty": 0 }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "validation_error");
}

#[tokio::test]
async fn test_tab_unknown_buyer_returns_entity_not_found() {
    let app = common::build_test_app();
    let tab_id = common::start_tab(&app).await;

    let (status, json) = tab_command(&app, "start-round", &json!({ "tab_id": tab_id, "buyer_id": Uuid::new_v4() })).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "entity_not_found");
}

#[tokio::test]
async fn test_tab_get_nonexistent_returns_404() {
    let app = common::build_test_app();
    let tab_id = Uuid::new_v4();

    let (status, json) = common::get_json(&app, &format!("/api/v1/tabs/{tab_id}")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "aggregate_not_found");
}
