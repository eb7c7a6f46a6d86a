//! APIレスポンスの共通エンベロープ

use crate::types::PantryRecord;
use serde::{Deserialize, Serialize};

/// HTTP関数・CLIが返すレスポンス
///
/// 成功時は `data`、失敗時は `error` のみが入る（もう一方は null）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PantryAiResponse {
    pub success: bool,
    pub data: Option<PantryRecord>,
    pub error: Option<String>,
}

impl PantryAiResponse {
    pub fn ok(record: PantryRecord) -> Self {
        Self {
            success: true,
            data: Some(record),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}
