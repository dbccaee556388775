#[macro_use]
mod common;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use pledge_server::sponsor::SponsorBody;
use serde_json::{json, Value};

use common::TestState;

fn sponsor_form<'a>(sponsorship: &'a str, custom_amount: &'a str) -> [(&'a str, &'a str); 6] {
    [
        ("name", "Takahashi"),
        ("email", "takahashi@example.com"),
        ("message", "Good luck!"),
        ("lineRegistration", "true"),
        ("sponsorship", sponsorship),
        ("customAmount", custom_amount),
    ]
}

#[actix_web::test]
async fn tier_and_custom_amounts_are_recorded() {
    let state = TestState::new();
    let app = init_app!(state);

    let req = TestRequest::post()
        .uri("/sponsors")
        .set_form(sponsor_form("3", ""))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({ "success": true }));

    let req = TestRequest::post()
        .uri("/sponsors")
        .set_form(sponsor_form("custom", "12345"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({ "success": true }));

    let req = TestRequest::get()
        .uri("/admin/sponsors?sort=amount&order=asc")
        .to_request();
    let sponsors: Vec<SponsorBody> = test::call_and_read_body_json(&app, req).await;
    let amounts: Vec<_> = sponsors.iter().map(|s| s.amount).collect();
    assert_eq!(amounts, [12345, 15000]);
    assert!(sponsors.iter().all(|s| s.line_registration));
}

#[actix_web::test]
async fn invalid_custom_amount_is_rejected_without_writing() {
    let state = TestState::new();
    let app = init_app!(state);

    let req = TestRequest::post()
        .uri("/sponsors")
        .set_form(sponsor_form("custom", "abc"))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error_code"], "E4001005");
    assert_eq!(body["error_meta"]["value"], "abc");
    assert!(!state.data_file("sponsors.json").exists());
}

#[actix_web::test]
async fn legacy_sponsors_without_amount_read_as_one_unit() {
    let state = TestState::new();
    std::fs::write(
        state.data_file("sponsors.json"),
        r#"[{"id": "1700000000000", "name": "Ito", "email": "ito@example.com", "message": "", "lineRegistration": false, "createdAt": "2023-11-14T22:13:20.000Z"}]"#,
    )
    .unwrap();
    let app = init_app!(state);

    let req = TestRequest::get().uri("/admin/sponsors").to_request();
    let sponsors: Vec<SponsorBody> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(sponsors.len(), 1);
    assert_eq!(sponsors[0].amount, 5000);
}
