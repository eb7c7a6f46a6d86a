//! カテゴリ推定テーブル
//!
//! Vision APIのタグ名（小文字）からパントリーのカテゴリを引く。
//! 組み込みテーブルは初回参照時に一度だけ構築され、以降は読み取り専用。

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// パントリー品目のカテゴリ
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Produce,
    Dairy,
    Meat,
    Bakery,
    Pantry,
    #[default]
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Produce => "Produce",
            Category::Dairy => "Dairy",
            Category::Meat => "Meat",
            Category::Bakery => "Bakery",
            Category::Pantry => "Pantry",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 組み込みのタグ → カテゴリ対応（キーはすべて小文字）
const BUILTIN_ENTRIES: &[(&str, Category)] = &[
    ("fruit", Category::Produce),
    ("vegetable", Category::Produce),
    ("apple", Category::Produce),
    ("banana", Category::Produce),
    ("orange", Category::Produce),
    ("milk", Category::Dairy),
    ("cheese", Category::Dairy),
    ("yogurt", Category::Dairy),
    ("beef", Category::Meat),
    ("chicken", Category::Meat),
    ("pork", Category::Meat),
    ("fish", Category::Meat),
    ("bread", Category::Bakery),
    ("cereal", Category::Pantry),
    ("pasta", Category::Pantry),
    ("soda", Category::Pantry),
    ("juice", Category::Pantry),
    ("soft drink", Category::Pantry),
    ("water", Category::Pantry),
];

lazy_static::lazy_static! {
    static ref BUILTIN_TABLE: CategoryTable = CategoryTable::from_entries(BUILTIN_ENTRIES);
}

/// タグ名 → カテゴリの対応表
#[derive(Debug, Clone, Default)]
pub struct CategoryTable {
    entries: HashMap<String, Category>,
}

impl CategoryTable {
    /// 組み込みテーブルを取得
    pub fn builtin() -> &'static CategoryTable {
        &BUILTIN_TABLE
    }

    /// (ラベル, カテゴリ) の組から作成
    ///
    /// キーは小文字に揃えて保持する
    pub fn from_entries(entries: &[(&str, Category)]) -> Self {
        let entries = entries
            .iter()
            .map(|(label, category)| (label.to_lowercase(), *category))
            .collect();
        Self { entries }
    }

    /// ラベルを小文字化して完全一致で検索（部分一致はしない）
    pub fn lookup(&self, label: &str) -> Option<Category> {
        self.entries.get(&label.to_lowercase()).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
