//! Vision APIレスポンスパーサー
//!
//! Azure AI Vision Image Analysis 4.0 (`imageanalysis:analyze`) の
//! JSONレスポンスを AnalysisResult に変換する

use crate::error::Result;
use crate::types::{AnalysisResult, Caption, DetectedObject, Detection};
use serde::Deserialize;

/// `{ "values": [...] }` 形式のブロック
#[derive(Debug, Deserialize)]
struct Values<T> {
    #[serde(default = "Vec::new")]
    values: Vec<T>,
}

/// imageanalysis:analyze のレスポンス本体
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeResponse {
    #[serde(default)]
    caption_result: Option<Caption>,
    #[serde(default)]
    objects_result: Option<Values<DetectedObject>>,
    #[serde(default)]
    tags_result: Option<Values<Detection>>,
}

impl From<AnalyzeResponse> for AnalysisResult {
    fn from(response: AnalyzeResponse) -> Self {
        Self {
            caption: response.caption_result,
            objects: response.objects_result.map(|o| o.values).unwrap_or_default(),
            tags: response.tags_result.map(|t| t.values).unwrap_or_default(),
        }
    }
}

/// Vision APIのエラー情報
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServiceError {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Deserialize)]
struct ServiceErrorEnvelope {
    error: ServiceError,
}

/// 解析レスポンスをパース
///
/// 要求しなかった（または結果のない）ブロックは空として扱う
///
/// # Arguments
/// * `body` - レスポンスボディ
///
/// # Returns
/// * `Ok(AnalysisResult)` - パース成功
/// * `Err` - JSONとして不正
///
/// # Examples
/// ```
/// use pantry_vision_common::parse_analysis_response;
///
/// let body = r#"{"tagsResult": {"values": [{"name": "milk", "confidence": 0.9}]}}"#;
/// let result = parse_analysis_response(body).unwrap();
/// assert_eq!(result.tags[0].name, "milk");
/// ```
pub fn parse_analysis_response(body: &str) -> Result<AnalysisResult> {
    let response: AnalyzeResponse = serde_json::from_str(body.trim())?;
    Ok(response.into())
}

/// エラーレスポンス `{"error": {"code", "message"}}` を取り出す
///
/// 形式が異なる場合は None
pub fn parse_service_error(body: &str) -> Option<ServiceError> {
    serde_json::from_str::<ServiceErrorEnvelope>(body)
        .ok()
        .map(|envelope| envelope.error)
}
