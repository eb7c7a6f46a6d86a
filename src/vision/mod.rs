//! 画像解析サービス連携
//!
//! 解析処理は `ImageAnalyzer` トレイトの背後に置き、
//! HTTP関数・CLIからは実装を差し替え可能にする

mod azure;

pub use azure::AzureVisionClient;

use crate::error::Result;
use async_trait::async_trait;
use pantry_vision_common::AnalysisResult;

/// 画像1枚を解析してキャプション・物体・タグを返すサービス
#[async_trait]
pub trait ImageAnalyzer: Send + Sync {
    async fn analyze(&self, image: &[u8]) -> Result<AnalysisResult>;
}
