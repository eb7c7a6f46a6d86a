//! Azure AI Vision (Image Analysis 4.0) クライアント
//!
//! `POST {endpoint}/computervision/imageanalysis:analyze` に画像バイナリを送り、
//! caption / objects / tags を取得する

use super::ImageAnalyzer;
use crate::config::{Config, VisionCredentials};
use crate::error::{PantryVisionError, Result};
use async_trait::async_trait;
use pantry_vision_common::{parse_analysis_response, parse_service_error, AnalysisResult};
use std::time::Duration;
use tracing::debug;

const ANALYZE_PATH: &str = "computervision/imageanalysis:analyze";
const FEATURES: &str = "caption,objects,tags";
const KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// Vision APIクライアント（起動時に1つ作成して使い回す）
#[derive(Debug, Clone)]
pub struct AzureVisionClient {
    http: reqwest::Client,
    analyze_url: String,
    key: String,
    api_version: String,
    language: String,
}

impl AzureVisionClient {
    /// 設定から作成（接続情報がなければエラー）
    pub fn from_config(config: &Config) -> Result<Self> {
        let credentials = config.vision_credentials()?;
        Self::new(
            &credentials,
            &config.api_version,
            &config.language,
            Duration::from_secs(config.timeout_seconds),
        )
    }

    pub fn new(
        credentials: &VisionCredentials,
        api_version: &str,
        language: &str,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            analyze_url: analyze_url(&credentials.endpoint),
            key: credentials.key.clone(),
            api_version: api_version.to_string(),
            language: language.to_string(),
        })
    }

    pub fn analyze_url(&self) -> &str {
        &self.analyze_url
    }
}

/// エンドポイントから解析URLを組み立てる（末尾スラッシュの有無は問わない）
fn analyze_url(endpoint: &str) -> String {
    format!("{}/{}", endpoint.trim_end_matches('/'), ANALYZE_PATH)
}

#[async_trait]
impl ImageAnalyzer for AzureVisionClient {
    async fn analyze(&self, image: &[u8]) -> Result<AnalysisResult> {
        debug!(url = %self.analyze_url, bytes = image.len(), "Vision APIへ送信");

        let response = self
            .http
            .post(&self.analyze_url)
            .query(&[
                ("api-version", self.api_version.as_str()),
                ("features", FEATURES),
                ("language", self.language.as_str()),
            ])
            .header(KEY_HEADER, &self.key)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(image.to_vec())
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = match parse_service_error(&body) {
                Some(error) => format!("{}: {}", error.code, error.message),
                None => body,
            };
            return Err(PantryVisionError::VisionService {
                status: status.as_u16(),
                message,
            });
        }

        Ok(parse_analysis_response(&body)?)
    }
}
