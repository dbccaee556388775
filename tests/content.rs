#[macro_use]
mod common;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use pledge_server::content::UploadBody;
use serde_json::{json, Value};

use common::TestState;

#[actix_web::test]
async fn content_is_null_until_saved() {
    let state = TestState::new();
    let app = init_app!(state);

    let req = TestRequest::get().uri("/content").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, Value::Null);

    let content = json!({
        "shopName": "居酒屋「高橋」",
        "message": "Help us open our doors this summer.",
        "deadline": "2024-06-30",
        "images": [{ "id": "1", "url": "http://shop.example/uploads/a.jpg" }],
        "lineQrCode": "",
        "lineFriendUrl": "https://lin.ee/abcdefg",
    });
    let req = TestRequest::put()
        .uri("/admin/content")
        .set_json(&content)
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({ "success": true }));

    let req = TestRequest::get().uri("/content").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, content);
}

#[actix_web::test]
async fn uploaded_images_are_served_back() {
    let state = TestState::new();
    let app = init_app!(state);

    let req = TestRequest::post()
        .uri("/admin/uploads?file_name=front.PNG")
        .set_payload(&b"not really a png"[..])
        .to_request();
    let body: UploadBody = test::call_and_read_body_json(&app, req).await;
    assert!(body.url.starts_with("http://shop.example/uploads/"));
    assert!(body.url.ends_with(".png"));

    let path = body.url.trim_start_matches("http://shop.example").to_string();
    let req = TestRequest::get().uri(&path).to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers().get("content-type").unwrap(), "image/png");

    let bytes = test::read_body(res).await;
    assert_eq!(&bytes[..], b"not really a png");
}

#[actix_web::test]
async fn empty_uploads_are_rejected() {
    let state = TestState::new();
    let app = init_app!(state);

    let req = TestRequest::post()
        .uri("/admin/uploads?file_name=front.png")
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["error_code"], "E4001007");
    assert!(!state.dir.join("uploads").exists());
}

#[actix_web::test]
async fn missing_uploads_are_not_found() {
    let state = TestState::new();
    let app = init_app!(state);

    let req = TestRequest::get().uri("/uploads/absent.png").to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["error_code"], "E4041001");
}

#[actix_web::test]
async fn send_email_without_provider_succeeds() {
    let state = TestState::new();
    let app = init_app!(state);

    let req = TestRequest::post()
        .uri("/api/send-email")
        .set_json(json!({
            "to": "sato@example.com",
            "subject": "Thank you",
            "text": "We appreciate your support.",
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({ "success": true }));
}
