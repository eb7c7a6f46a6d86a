//! HTTP関数
//!
//! - `POST /api/ProcessPantryImage`: multipart/form-data で画像を受け取り、
//!   Vision APIで解析してパントリー品目レコードを返す
//! - `GET /api/health`: 死活確認

use crate::error::{PantryVisionError, Result};
use crate::vision::ImageAnalyzer;
use axum::{
    body::Bytes,
    extract::{
        multipart::{MultipartError, MultipartRejection},
        DefaultBodyLimit, Multipart, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use pantry_vision_common::{PantryAiResponse, PantryMapper};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, instrument};

pub const PROCESS_ROUTE: &str = "/api/ProcessPantryImage";
pub const HEALTH_ROUTE: &str = "/api/health";

const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// ルート間で共有する状態
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<dyn ImageAnalyzer>,
    pub mapper: PantryMapper<'static>,
}

impl AppState {
    pub fn new(analyzer: Arc<dyn ImageAnalyzer>) -> Self {
        Self {
            analyzer,
            mapper: PantryMapper::default(),
        }
    }
}

/// アップロードされた画像
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub file_name: String,
    pub data: Bytes,
}

pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route(PROCESS_ROUTE, post(process_pantry_image))
        .route(HEALTH_ROUTE, get(|| async { "OK" }))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}

/// 受け付け済みのリスナーでサーバーを起動
pub async fn serve_listener(listener: TcpListener, app: Router) -> Result<()> {
    axum::serve(listener, app).await?;
    Ok(())
}

#[instrument(skip(state))]
pub async fn serve(addr: SocketAddr, state: AppState, max_upload_bytes: usize) -> Result<()> {
    let listener = TcpListener::bind(&addr).await?;
    info!("HTTP関数を起動: http://{}{}", listener.local_addr()?, PROCESS_ROUTE);
    serve_listener(listener, router(state, max_upload_bytes)).await
}

async fn process_pantry_image(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Response {
    info!("パントリー画像の解析リクエストを受信");

    let multipart = match multipart {
        Ok(m) => m,
        Err(rejection) => {
            error!("multipartとして読み込めません: {}", rejection.body_text());
            return json_response(
                StatusCode::BAD_REQUEST,
                &PantryAiResponse::failure(rejection.body_text()),
            );
        }
    };

    let image = match first_file(multipart).await {
        Ok(image) => image,
        Err(e) => {
            error!("multipartの読み込みに失敗: {}", e.body_text());
            let message = match e.status() {
                StatusCode::PAYLOAD_TOO_LARGE => PantryVisionError::UploadTooLarge.to_string(),
                _ => e.body_text(),
            };
            return json_response(e.status(), &PantryAiResponse::failure(message));
        }
    };

    let (status, body) = process_image(state.analyzer.as_ref(), &state.mapper, image).await;
    json_response(status, &body)
}

/// ファイル名を持つ最初のパートを画像として取り出す
async fn first_file(mut multipart: Multipart) -> std::result::Result<Option<UploadedImage>, MultipartError> {
    while let Some(field) = multipart.next_field().await? {
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let data = field.bytes().await?;
        return Ok(Some(UploadedImage { file_name, data }));
    }
    Ok(None)
}

/// 画像1枚を解析してレスポンスを作る（HTTPに依存しない部分）
pub async fn process_image(
    analyzer: &dyn ImageAnalyzer,
    mapper: &PantryMapper<'_>,
    image: Option<UploadedImage>,
) -> (StatusCode, PantryAiResponse) {
    let Some(image) = image else {
        error!("multipartリクエストに画像ファイルがありません");
        return (
            StatusCode::BAD_REQUEST,
            PantryAiResponse::failure(PantryVisionError::NoImageFile.to_string()),
        );
    };

    info!(file_name = %image.file_name, size = image.data.len(), "画像ファイルを受信");

    match analyzer.analyze(&image.data).await {
        Ok(result) => {
            info!("Vision APIの解析結果を受信");
            let record = mapper.map(&result);
            info!(
                item_name = %record.item_name,
                category = %record.category,
                confidence = record.confidence,
                "パントリー品目に変換"
            );
            (StatusCode::OK, PantryAiResponse::ok(record))
        }
        Err(e) => {
            error!("画像の解析に失敗: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, PantryAiResponse::failure(e.to_string()))
        }
    }
}

fn json_response(status: StatusCode, body: &PantryAiResponse) -> Response {
    match serde_json::to_string(body) {
        Ok(json) => (status, [(header::CONTENT_TYPE, JSON_CONTENT_TYPE)], json).into_response(),
        Err(e) => {
            error!("レスポンスのシリアライズに失敗: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
