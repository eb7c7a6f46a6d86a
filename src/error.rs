use thiserror::Error;

#[derive(Error, Debug)]
pub enum PantryVisionError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("VISION_ENDPOINT または VISION_KEY が設定されていません。環境変数か `pantry-vision config --set-endpoint URL --set-key KEY` で設定してください")]
    MissingVisionConfig,

    #[error("パスが見つかりません: {0}")]
    PathNotFound(String),

    #[error("画像が見つかりません: {0}")]
    NoImagesFound(String),

    #[error("No image file found.")]
    NoImageFile,

    #[error("Image file is too large.")]
    UploadTooLarge,

    #[error("Vision APIエラー (HTTP {status}): {message}")]
    VisionService { status: u16, message: String },

    #[error("HTTP通信エラー: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] pantry_vision_common::Error),
}

pub type Result<T> = std::result::Result<T, PantryVisionError>;
