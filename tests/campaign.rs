#[macro_use]
mod common;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use pledge_server::campaign::{CampaignBody, CampaignId};
use serde_json::{json, Value};

use common::TestState;

fn campaign_json(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "description": "Renovating the kitchen",
        "startDate": "2024-05-01",
        "endDate": "2024-06-30",
        "targetAmount": 500000,
        "currentAmount": 0,
        "isActive": true,
    })
}

#[actix_web::test]
async fn save_then_list_then_delete() {
    let state = TestState::new();
    let app = init_app!(state);

    let req = TestRequest::post()
        .uri("/admin/campaigns")
        .set_json(campaign_json("1714550000000", "Kitchen"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({ "success": true }));

    let req = TestRequest::get().uri("/campaigns").to_request();
    let campaigns: Vec<CampaignBody> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(campaigns.len(), 1);
    assert_eq!(campaigns[0].id, "1714550000000".parse::<CampaignId>().unwrap());
    assert_eq!(campaigns[0].target_amount, 500000);

    let req = TestRequest::delete()
        .uri("/admin/campaigns/1714550000000")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({ "success": true }));

    let req = TestRequest::get().uri("/campaigns").to_request();
    let campaigns: Vec<CampaignBody> = test::call_and_read_body_json(&app, req).await;
    assert!(campaigns.is_empty());
}

#[actix_web::test]
async fn saving_an_existing_id_replaces_it() {
    let state = TestState::new();
    let app = init_app!(state);

    for name in ["Kitchen", "Kitchen and counter"] {
        let req = TestRequest::post()
            .uri("/admin/campaigns")
            .set_json(campaign_json("a1", name))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    let req = TestRequest::get().uri("/campaigns").to_request();
    let campaigns: Vec<CampaignBody> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(campaigns.len(), 1);
    assert_eq!(campaigns[0].name, "Kitchen and counter");
}

#[actix_web::test]
async fn deleting_an_unknown_id_is_a_no_op() {
    let state = TestState::new();
    let app = init_app!(state);

    let req = TestRequest::post()
        .uri("/admin/campaigns")
        .set_json(campaign_json("a1", "Kitchen"))
        .to_request();
    test::call_service(&app, req).await;
    let before = std::fs::read(state.data_file("campaigns.json")).unwrap();

    let req = TestRequest::delete().uri("/admin/campaigns/zzz").to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);

    let after = std::fs::read(state.data_file("campaigns.json")).unwrap();
    assert_eq!(before, after);
}

#[actix_web::test]
async fn malformed_json_is_a_validation_failure() {
    let state = TestState::new();
    let app = init_app!(state);

    let req = TestRequest::post()
        .uri("/admin/campaigns")
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"name\": ")
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error_code"], "E4001000");
}

#[actix_web::test]
async fn unknown_paths_are_not_found() {
    let state = TestState::new();
    let app = init_app!(state);

    let req = TestRequest::get().uri("/nowhere").to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error_code"], "E4041000");
}
