use std::collections::HashMap;

use crate::helpers::spawn_app;

#[tokio::test]
async fn non_post_requests_are_answered_with_a_405() {
    let app = spawn_app().await;

    let response = app.get_logout().await;

    assert_eq!(response.status().as_u16(), 405);
}

#[tokio::test]
async fn logging_out_without_a_target_returns_an_empty_200() {
    let app = spawn_app().await;

    let response = app.post_logout(&HashMap::<String, String>::new()).await;

    assert_eq!(response.status().as_u16(), 200);
    assert!(response.headers().get("Location").is_none());
    assert_eq!(response.text().await.unwrap(), "");
}

#[tokio::test]
async fn logging_out_redirects_to_a_server_relative_target() {
    let app = spawn_app().await;

    let response = app.post_logout(&[("then", "/console")]).await;

    assert_eq!(response.status().as_u16(), 302);
    assert_eq!(response.headers().get("Location").unwrap(), "/console");
}

#[tokio::test]
async fn logging_out_redirects_to_the_trusted_origin() {
    let app = spawn_app().await;

    let response = app
        .post_logout(&[("then", "https://console.example/console")])
        .await;

    assert_eq!(response.status().as_u16(), 302);
    assert_eq!(
        response.headers().get("Location").unwrap(),
        "https://console.example/console"
    );
}

#[tokio::test]
async fn logging_out_never_redirects_to_a_foreign_origin() {
    let app = spawn_app().await;

    let response = app
        .post_logout(&[("then", "https://evil.example/phish")])
        .await;

    assert_eq!(response.status().as_u16(), 200);
    assert!(response.headers().get("Location").is_none());
    assert_eq!(response.text().await.unwrap(), "");
}

#[tokio::test]
async fn logging_out_never_redirects_to_a_protocol_relative_target() {
    let app = spawn_app().await;

    let response = app.post_logout(&[("then", "//evil.example")]).await;

    assert_eq!(response.status().as_u16(), 200);
    assert!(response.headers().get("Location").is_none());
}

#[tokio::test]
async fn a_body_that_is_not_a_form_counts_as_no_target() {
    let app = spawn_app().await;

    let response = app
        .api_client
        .post(format!("{}/logout", &app.address))
        .header("Content-Type", "application/json")
        .body(r#"{"then": "/console"}"#)
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(response.status().as_u16(), 200);
    assert!(response.headers().get("Location").is_none());
}

#[tokio::test]
async fn a_target_in_the_query_string_is_ignored() {
    let app = spawn_app().await;

    // The target is only read from the form body, not the URL.
    let response = app
        .api_client
        .post(format!("{}/logout?then=/console", &app.address))
        .form(&HashMap::<String, String>::new())
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(response.status().as_u16(), 200);
    assert!(response.headers().get("Location").is_none());
}

#[tokio::test]
async fn logging_out_twice_in_a_row_succeeds() {
    let app = spawn_app().await;

    let first = app.post_logout(&HashMap::<String, String>::new()).await;
    let second = app.post_logout(&HashMap::<String, String>::new()).await;

    assert_eq!(first.status().as_u16(), 200);
    assert_eq!(second.status().as_u16(), 200);
}

#[tokio::test]
async fn every_response_carries_the_standard_security_headers() {
    let app = spawn_app().await;

    // Including the 405 produced before the handler's happy path.
    let response = app.get_logout().await;

    let headers = response.headers();
    assert_eq!(headers.get("Cache-Control").unwrap(), "no-cache, no-store");
    assert_eq!(headers.get("X-Frame-Options").unwrap(), "DENY");
    assert_eq!(headers.get("X-Content-Type-Options").unwrap(), "nosniff");
    assert_eq!(
        headers.get("Referrer-Policy").unwrap(),
        "strict-origin-when-cross-origin"
    );
}
