//! # リソース識別子
//!
//! バックエンドの識別子は実装によって UUID 文字列だったり整数だったりする。
//! クライアントは識別子を解釈しないため、文字列表現のまま保持する。

use derive_more::Display;
use serde::{Deserialize, Deserializer, Serialize};

/// バックエンドのリソース識別子
///
/// JSON の文字列・数値のどちらからでもデシリアライズでき、
/// シリアライズは常に文字列で行う。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Display)]
#[display("{_0}")]
pub struct ResourceId(String);

impl ResourceId {
    /// 文字列から識別子を作成する
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// 文字列参照を取得する
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ResourceId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ResourceId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl<'de> Deserialize<'de> for ResourceId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(text) => Self(text),
            Raw::Number(number) => Self(number.to_string()),
        })
    }
}
