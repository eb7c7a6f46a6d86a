//! Pantry Vision Common Library
//!
//! 画像解析結果（Vision API）からパントリー品目レコードへの変換ルールと、
//! HTTP関数・CLIで共有される型

pub mod types;
pub mod category;
pub mod error;
pub mod mapper;
pub mod parser;
pub mod response;

pub use types::{AnalysisResult, BoundingBox, Caption, DetectedObject, Detection, NutritionalInfo, PantryRecord};
pub use category::{Category, CategoryTable};
pub use error::{Error, Result};
pub use mapper::{PantryMapper, capitalize_first_letter, map_to_pantry_record, select_top_object, select_top_tag};
pub use parser::{ServiceError, parse_analysis_response, parse_service_error};
pub use response::PantryAiResponse;
