//! 解析結果の型定義
//!
//! HTTP関数とCLIで共有される型:
//! - AnalysisResult: Vision APIの解析結果（キャプション・物体・タグ）
//! - PantryRecord: パントリー品目レコード（最終出力）

use crate::category::Category;
use serde::{Deserialize, Serialize};

/// 品目名が決まらなかった場合の名前
pub const UNKNOWN_ITEM_NAME: &str = "Unknown Item";

/// ラベルと信頼度の組
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub name: String,
    pub confidence: f64,
}

impl Detection {
    pub fn new(name: impl Into<String>, confidence: f64) -> Self {
        Self {
            name: name.into(),
            confidence,
        }
    }
}

/// 物体の外接矩形（ピクセル）
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

/// 検出された物体
///
/// `tags` は検出器の順位順（先頭が最も確からしい）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedObject {
    #[serde(default)]
    pub bounding_box: Option<BoundingBox>,

    #[serde(default)]
    pub tags: Vec<Detection>,
}

impl DetectedObject {
    /// 矩形なしで物体を作成
    pub fn with_tags(tags: Vec<Detection>) -> Self {
        Self {
            bounding_box: None,
            tags,
        }
    }
}

/// 画像全体のキャプション
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Caption {
    pub text: String,
    #[serde(default)]
    pub confidence: f64,
}

/// Vision APIの解析結果
///
/// `objects` と `tags` の欠落は空配列と同じ扱い
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    #[serde(default)]
    pub caption: Option<Caption>,

    #[serde(default)]
    pub objects: Vec<DetectedObject>,

    #[serde(default)]
    pub tags: Vec<Detection>,
}

/// 栄養情報（未実装のため常に空）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NutritionalInfo {}

/// パントリー品目レコード
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PantryRecord {
    pub item_name: String,

    /// キャプション由来の説明（空なら null）
    pub description: Option<String>,

    pub category: Category,

    /// 賞味期限の推定（未実装、常に null）
    pub estimated_expiry: Option<String>,

    /// 栄養情報（未実装、常に {}）
    pub nutritional_info: NutritionalInfo,

    /// item_name の根拠となった検出の信頼度
    pub confidence: f64,
}

impl Default for PantryRecord {
    fn default() -> Self {
        Self {
            item_name: UNKNOWN_ITEM_NAME.to_string(),
            description: None,
            category: Category::Other,
            estimated_expiry: None,
            nutritional_info: NutritionalInfo::default(),
            confidence: 0.0,
        }
    }
}
