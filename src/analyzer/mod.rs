pub mod cache;

pub use cache::{compute_hash, CacheFile};

use crate::error::Result;
use crate::scanner::ImageInfo;
use crate::vision::ImageAnalyzer;
use pantry_vision_common::{AnalysisResult, PantryAiResponse, PantryMapper};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// 画像1枚分の解析結果
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageReport {
    pub file_name: String,
    pub response: PantryAiResponse,
}

/// 画像を順に解析してパントリー品目に変換
///
/// 1枚の失敗はその画像の失敗レスポンスとして記録し、残りは続行する。
/// `cache` を渡すと同一内容の画像は再解析しない。
pub async fn analyze_images(
    images: &[ImageInfo],
    analyzer: &dyn ImageAnalyzer,
    mut cache: Option<&mut CacheFile>,
) -> Vec<ImageReport> {
    let mapper = PantryMapper::default();
    let mut reports = Vec::with_capacity(images.len());

    for (idx, image) in images.iter().enumerate() {
        info!("[{}/{}] {}", idx + 1, images.len(), image.file_name);

        let response = match analyze_one(image, analyzer, cache.as_deref_mut()).await {
            Ok(result) => PantryAiResponse::ok(mapper.map(&result)),
            Err(e) => {
                warn!(file_name = %image.file_name, "解析に失敗: {}", e);
                PantryAiResponse::failure(e.to_string())
            }
        };

        reports.push(ImageReport {
            file_name: image.file_name.clone(),
            response,
        });
    }

    reports
}

async fn analyze_one(
    image: &ImageInfo,
    analyzer: &dyn ImageAnalyzer,
    cache: Option<&mut CacheFile>,
) -> Result<AnalysisResult> {
    let data = tokio::fs::read(&image.path).await?;

    let Some(cache) = cache else {
        return analyzer.analyze(&data).await;
    };

    let hash = compute_hash(&data);
    if let Some(cached) = cache.get(&hash) {
        debug!(file_name = %image.file_name, "キャッシュヒット");
        return Ok(cached.clone());
    }

    let result = analyzer.analyze(&data).await?;
    cache.insert(hash, image.file_name.clone(), data.len() as u64, result.clone());
    Ok(result)
}

/// キャッシュを置くフォルダ（ファイル指定時はその親）
pub fn cache_folder(path: &Path) -> PathBuf {
    if path.is_file() {
        path.parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    } else {
        path.to_path_buf()
    }
}
