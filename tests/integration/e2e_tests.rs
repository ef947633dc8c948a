//! End-to-end tests against a real listener

use ping_service::{
    api::routes,
    config::Settings,
    server::{self, AppMetadata},
};

#[tokio::test]
async fn test_serve_ping_over_tcp() {
    let mut settings = Settings::default();
    settings.server.host = "127.0.0.1".to_string();
    settings.server.port = 0;

    let api = routes::create_router(&settings.api.prefix);
    let app = server::build_app(
        &api,
        &AppMetadata::from(&settings.api),
        &settings.docs,
        &settings.server,
    )
    .unwrap();

    let listener = server::bind(&settings.server).await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(server::serve(listener, app));

    let client = reqwest::Client::new();

    let response = client
        .get(format!("http://{}/api/v1/ping", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, serde_json::json!({ "message": "pong" }));

    let response = client
        .get(format!("http://{}/ping", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
}
