use chat_widget::server::api::start_http_server;

#[tokio::test]
async fn serves_page_assets_and_widget_config() {
    let addr = start_http_server("127.0.0.1:0", 4100).await.unwrap();
    let base = format!("http://{}", addr);
    let http = reqwest::Client::new();

    let page = http.get(format!("{}/", base)).send().await.unwrap();
    assert!(page.status().is_success());
    let html = page.text().await.unwrap();
    assert!(html.contains("id=\"chatWindow\""));
    assert!(html.contains("/static/widget.js"));

    let script = http.get(format!("{}/static/widget.js", base)).send().await.unwrap();
    assert!(script.headers()["content-type"].to_str().unwrap().starts_with("application/javascript"));
    let js = script.text().await.unwrap();
    assert!(js.contains("textContent"));
    assert!(!js.contains("innerHTML"));

    let css = http.get(format!("{}/static/style.css", base)).send().await.unwrap();
    assert!(css.status().is_success());

    let config: serde_json::Value = http
        .get(format!("{}/api/widget-config", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(config, serde_json::json!({ "ws_port": 4100, "ws_path": "/" }));

    let health = http.get(format!("{}/health", base)).send().await.unwrap();
    assert_eq!(health.text().await.unwrap(), "ok");
}
