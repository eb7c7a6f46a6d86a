//! HTTP関数テスト
//!
//! 固定結果を返す解析器でサーバーを起動し、multipartリクエストで検証

use async_trait::async_trait;
use pantry_vision::error::{PantryVisionError, Result};
use pantry_vision::server::{self, AppState, HEALTH_ROUTE, PROCESS_ROUTE};
use pantry_vision::vision::ImageAnalyzer;
use pantry_vision_common::{AnalysisResult, Caption, DetectedObject, Detection, PantryAiResponse};
use reqwest::multipart::{Form, Part};
use std::sync::Arc;
use tokio::net::TcpListener;

struct FixedAnalyzer(AnalysisResult);

#[async_trait]
impl ImageAnalyzer for FixedAnalyzer {
    async fn analyze(&self, _image: &[u8]) -> Result<AnalysisResult> {
        Ok(self.0.clone())
    }
}

struct UnreachableAnalyzer;

#[async_trait]
impl ImageAnalyzer for UnreachableAnalyzer {
    async fn analyze(&self, _image: &[u8]) -> Result<AnalysisResult> {
        Err(PantryVisionError::VisionService {
            status: 503,
            message: "Service Unavailable".into(),
        })
    }
}

fn banana_result() -> AnalysisResult {
    AnalysisResult {
        caption: Some(Caption {
            text: "a bunch of bananas on a counter".into(),
            confidence: 0.83,
        }),
        objects: vec![DetectedObject::with_tags(vec![Detection::new("banana", 0.91)])],
        tags: vec![Detection::new("indoor", 0.99), Detection::new("fruit", 0.97)],
    }
}

/// エフェメラルポートでサーバーを起動してベースURLを返す
async fn spawn_server(analyzer: Arc<dyn ImageAnalyzer>) -> String {
    spawn_server_with_limit(analyzer, 1024 * 1024).await
}

async fn spawn_server_with_limit(analyzer: Arc<dyn ImageAnalyzer>, max_upload_bytes: usize) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind失敗");
    let addr = listener.local_addr().expect("アドレス取得失敗");
    let app = server::router(AppState::new(analyzer), max_upload_bytes);
    tokio::spawn(server::serve_listener(listener, app));
    format!("http://{}", addr)
}

fn image_form() -> Form {
    let part = Part::bytes(b"\xff\xd8\xff\xe0fake-jpeg".to_vec())
        .file_name("bananas.jpg")
        .mime_str("image/jpeg")
        .expect("MIME指定失敗");
    Form::new().text("note", "kitchen").part("image", part)
}

#[tokio::test]
async fn test_health() {
    let base = spawn_server(Arc::new(FixedAnalyzer(AnalysisResult::default()))).await;
    let resp = reqwest::get(format!("{}{}", base, HEALTH_ROUTE)).await.expect("リクエスト失敗");

    assert_eq!(resp.status(), reqwest::StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn test_process_pantry_image_success() {
    let base = spawn_server(Arc::new(FixedAnalyzer(banana_result()))).await;
    let resp = reqwest::Client::new()
        .post(format!("{}{}", base, PROCESS_ROUTE))
        .multipart(image_form())
        .send()
        .await
        .expect("リクエスト失敗");

    assert_eq!(resp.status(), reqwest::StatusCode::OK);
    assert_eq!(
        resp.headers().get(reqwest::header::CONTENT_TYPE).and_then(|v| v.to_str().ok()),
        Some("application/json; charset=utf-8")
    );

    let body: serde_json::Value = resp.json().await.expect("JSONではない");
    assert_eq!(body["success"], true);
    assert!(body["error"].is_null());
    assert_eq!(body["data"]["itemName"], "Banana");
    assert_eq!(body["data"]["description"], "a bunch of bananas on a counter");
    assert_eq!(body["data"]["category"], "Produce");
    assert!(body["data"]["estimatedExpiry"].is_null());
    assert_eq!(body["data"]["nutritionalInfo"], serde_json::json!({}));
    assert_eq!(body["data"]["confidence"], 0.91);
}

#[tokio::test]
async fn test_process_pantry_image_without_file() {
    let base = spawn_server(Arc::new(FixedAnalyzer(banana_result()))).await;
    let resp = reqwest::Client::new()
        .post(format!("{}{}", base, PROCESS_ROUTE))
        .multipart(Form::new().text("note", "no image here"))
        .send()
        .await
        .expect("リクエスト失敗");

    assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: PantryAiResponse = resp.json().await.expect("JSONではない");
    assert_eq!(body, PantryAiResponse::failure("No image file found."));
}

#[tokio::test]
async fn test_process_pantry_image_not_multipart() {
    let base = spawn_server(Arc::new(FixedAnalyzer(banana_result()))).await;
    let resp = reqwest::Client::new()
        .post(format!("{}{}", base, PROCESS_ROUTE))
        .body("plain body")
        .send()
        .await
        .expect("リクエスト失敗");

    assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: PantryAiResponse = resp.json().await.expect("JSONではない");
    assert!(!body.success);
    assert!(body.data.is_none());
}

#[tokio::test]
async fn test_process_pantry_image_vision_failure() {
    let base = spawn_server(Arc::new(UnreachableAnalyzer)).await;
    let resp = reqwest::Client::new()
        .post(format!("{}{}", base, PROCESS_ROUTE))
        .multipart(image_form())
        .send()
        .await
        .expect("リクエスト失敗");

    assert_eq!(resp.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
    let body: PantryAiResponse = resp.json().await.expect("JSONではない");
    assert!(!body.success);
    assert!(body.error.unwrap_or_default().contains("Service Unavailable"));
}

/// 上限を超える画像は413とJSONエンベロープ
#[tokio::test]
async fn test_process_pantry_image_too_large() {
    let base = spawn_server_with_limit(Arc::new(FixedAnalyzer(banana_result())), 1024).await;
    let part = Part::bytes(vec![0xffu8; 4096])
        .file_name("huge.jpg")
        .mime_str("image/jpeg")
        .expect("MIME指定失敗");
    let resp = reqwest::Client::new()
        .post(format!("{}{}", base, PROCESS_ROUTE))
        .multipart(Form::new().part("image", part))
        .send()
        .await
        .expect("リクエスト失敗");

    assert_eq!(resp.status(), reqwest::StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(
        resp.headers().get(reqwest::header::CONTENT_TYPE).and_then(|v| v.to_str().ok()),
        Some("application/json; charset=utf-8")
    );
    let body: PantryAiResponse = resp.json().await.expect("JSONではない");
    assert_eq!(body, PantryAiResponse::failure("Image file is too large."));
}
