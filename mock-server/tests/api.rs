use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::app;
use serde_json::Value;
use tower::ServiceExt;

const TOKEN: &str = "Bearer KEY_TEST";

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<String> {
    Request::builder()
        .uri(uri)
        .header(http::header::AUTHORIZATION, TOKEN)
        .body(String::new())
        .unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::AUTHORIZATION, TOKEN)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

// --- auth ---

#[tokio::test]
async fn missing_token_returns_401_error_document() {
    let resp = app()
        .oneshot(Request::builder().uri("/phone_numbers").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(resp).await;
    assert_eq!(body["errors"][0]["code"], "10009");
}

// --- calls ---

#[tokio::test]
async fn dial_returns_live_call() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/calls",
            r#"{"connection_id":"conn","to":"+18005550199","from":"+18005550100"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["data"]["is_alive"], true);
    assert!(body["data"]["call_control_id"].as_str().unwrap().starts_with("v3:"));
    assert_eq!(body["data"]["client_state"], Value::Null);
}

#[tokio::test]
async fn dial_without_connection_returns_422() {
    let resp = app()
        .oneshot(json_request("POST", "/calls", r#"{"to":"+1","from":"+2"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(resp).await;
    assert_eq!(body["errors"][0]["code"], "10015");
}

#[tokio::test]
async fn unknown_call_returns_404() {
    let resp = app().oneshot(get("/calls/v3:missing")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = body_json(resp).await;
    assert_eq!(body["errors"][0]["title"], "Resource not found");
}

// --- messages ---

#[tokio::test]
async fn send_message_queues_recipient() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/messages",
            r#"{"to":"+18665550001","from":"+18445550001","text":"Hello"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["data"]["type"], "SMS");
    assert_eq!(body["data"]["to"][0]["status"], "queued");
}

#[tokio::test]
async fn send_message_with_media_is_mms() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/messages",
            r#"{"to":"+18665550001","media_urls":["https://example.com/cat.png"]}"#,
        ))
        .await
        .unwrap();

    let body = body_json(resp).await;
    assert_eq!(body["data"]["type"], "MMS");
}

#[tokio::test]
async fn send_message_rejects_non_e164_destination() {
    let resp = app()
        .oneshot(json_request("POST", "/messages", r#"{"to":"8665550001"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(resp).await;
    assert_eq!(body["errors"][0]["source"]["pointer"], "/to");
}

// --- phone numbers ---

#[tokio::test]
async fn empty_inventory_lists_one_empty_page() {
    let resp = app().oneshot(get("/phone_numbers")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["data"], serde_json::json!([]));
    assert_eq!(body["meta"]["total_pages"], 1);
    assert_eq!(body["meta"]["total_results"], 0);
}

#[tokio::test]
async fn invalid_page_size_returns_422() {
    let resp = app()
        .oneshot(get("/phone_numbers?page%5Bsize%5D=0"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn page_far_past_the_end_is_empty() {
    let resp = app()
        .oneshot(get("/phone_numbers?page%5Bnumber%5D=18446744073709551615&page%5Bsize%5D=2"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["data"], serde_json::json!([]));
    assert_eq!(body["meta"]["total_pages"], 1);
}

// --- full order lifecycle ---

#[tokio::test]
async fn number_order_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    // order two numbers
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            "/number_orders",
            r#"{"phone_numbers":[{"phone_number":"+19705555098"},{"phone_number":"+19705550100"}]}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let order = body_json(resp).await;
    assert_eq!(order["data"]["status"], "pending");
    let order_id = order["data"]["id"].as_str().unwrap().to_string();

    // first lookup settles the order
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get(&format!("/number_orders/{order_id}")))
        .await
        .unwrap();
    let order = body_json(resp).await;
    assert_eq!(order["data"]["status"], "success");
    assert_eq!(order["data"]["phone_numbers_count"], 2);

    // filter the inventory
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/phone_numbers?filter%5Bphone_number%5D%5Bcontains%5D=5555"))
        .await
        .unwrap();
    let page = body_json(resp).await;
    assert_eq!(page["meta"]["total_results"], 1);
    assert_eq!(page["data"][0]["status"], "active");
    let number_id = page["data"][0]["id"].as_str().unwrap().to_string();

    // page through with size 1
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/phone_numbers?page%5Bnumber%5D=2&page%5Bsize%5D=1"))
        .await
        .unwrap();
    let page = body_json(resp).await;
    assert_eq!(page["meta"]["total_pages"], 2);
    assert_eq!(page["data"].as_array().unwrap().len(), 1);

    // update: set tags and customer reference, then clear the reference
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "PATCH",
            &format!("/phone_numbers/{number_id}"),
            r#"{"tags":["vip"],"customer_reference":"acct-1"}"#,
        ))
        .await
        .unwrap();
    let updated = body_json(resp).await;
    assert_eq!(updated["data"]["tags"][0], "vip");
    assert_eq!(updated["data"]["customer_reference"], "acct-1");

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "PATCH",
            &format!("/phone_numbers/{number_id}"),
            r#"{"customer_reference":null}"#,
        ))
        .await
        .unwrap();
    let updated = body_json(resp).await;
    assert_eq!(updated["data"]["customer_reference"], Value::Null);
    assert_eq!(updated["data"]["tags"][0], "vip"); // unchanged

    // delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(
            Request::builder()
                .method("DELETE")
                .uri(&format!("/phone_numbers/{number_id}"))
                .header(http::header::AUTHORIZATION, TOKEN)
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let deleted = body_json(resp).await;
    assert_eq!(deleted["data"]["status"], "deleted");

    // get after delete — 404
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get(&format!("/phone_numbers/{number_id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
