//! 解析結果 → パントリー品目レコード変換
//!
//! 品目名の決定順序:
//! 1. 物体検出（objects）: 先頭タグの信頼度が最大の物体
//! 2. 画像タグ（tags）: 信頼度が最大のタグ
//! 3. どちらもなければ "Unknown Item"
//!
//! カテゴリは tags を先頭から走査し、最初に対応表に一致したものを採用する。
//! 入力が同じなら出力も常に同じ（I/O・内部状態なし）。

use crate::category::{Category, CategoryTable};
use crate::types::{AnalysisResult, DetectedObject, Detection, NutritionalInfo, PantryRecord, UNKNOWN_ITEM_NAME};

/// 信頼度が最大の検出を返す（同値なら先に出現したもの）
///
/// `Iterator::max_by` は同値のとき最後の要素を返すため使わない
fn first_max_by_confidence<'a, I>(detections: I) -> Option<&'a Detection>
where
    I: IntoIterator<Item = &'a Detection>,
{
    detections.into_iter().fold(None, |best, candidate| match best {
        Some(current) if current.confidence >= candidate.confidence => Some(current),
        _ => Some(candidate),
    })
}

/// 先頭タグの信頼度が最大の物体を選び、その先頭タグを返す
///
/// タグを持たない物体は対象外。同値なら先に出現した物体が優先。
pub fn select_top_object(objects: &[DetectedObject]) -> Option<&Detection> {
    first_max_by_confidence(objects.iter().filter_map(|object| object.tags.first()))
}

/// 信頼度が最大のタグを返す（同値なら先に出現したもの）
pub fn select_top_tag(tags: &[Detection]) -> Option<&Detection> {
    first_max_by_confidence(tags)
}

/// 先頭1文字だけを大文字にする（残りはそのまま）
///
/// # Examples
/// ```
/// use pantry_vision_common::capitalize_first_letter;
///
/// assert_eq!(capitalize_first_letter("green apple"), "Green apple");
/// assert_eq!(capitalize_first_letter(""), "");
/// ```
pub fn capitalize_first_letter(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => {
            // 大文字が1文字にならない文字（ß など）はそのまま
            let mut upper = first.to_uppercase();
            let head = match (upper.next(), upper.next()) {
                (Some(u), None) => u,
                _ => first,
            };
            std::iter::once(head).chain(chars).collect()
        }
        None => String::new(),
    }
}

/// カテゴリ対応表を持つ変換器
#[derive(Debug, Clone, Copy)]
pub struct PantryMapper<'a> {
    table: &'a CategoryTable,
}

impl Default for PantryMapper<'static> {
    fn default() -> Self {
        Self::new(CategoryTable::builtin())
    }
}

impl<'a> PantryMapper<'a> {
    pub fn new(table: &'a CategoryTable) -> Self {
        Self { table }
    }

    /// 解析結果をパントリー品目レコードに変換
    pub fn map(&self, result: &AnalysisResult) -> PantryRecord {
        let description = result
            .caption
            .as_ref()
            .filter(|caption| !caption.text.is_empty())
            .map(|caption| caption.text.clone());

        // 物体が1つでもあれば物体側で決める（全て無タグでもタグ側へは落ちない）
        let top = if !result.objects.is_empty() {
            select_top_object(&result.objects)
        } else {
            select_top_tag(&result.tags)
        };

        let (item_name, confidence) = match top {
            Some(detection) => (capitalize_first_letter(&detection.name), detection.confidence),
            None => (UNKNOWN_ITEM_NAME.to_string(), 0.0),
        };

        PantryRecord {
            item_name,
            description,
            category: self.infer_category(&result.tags),
            estimated_expiry: None,
            nutritional_info: NutritionalInfo::default(),
            confidence,
        }
    }

    /// タグを出現順に走査し、最初に一致したカテゴリを返す
    pub fn infer_category(&self, tags: &[Detection]) -> Category {
        tags.iter()
            .find_map(|tag| self.table.lookup(&tag.name))
            .unwrap_or(Category::Other)
    }
}

/// 組み込みの対応表で変換
pub fn map_to_pantry_record(result: &AnalysisResult) -> PantryRecord {
    PantryMapper::default().map(result)
}
