//! # バックエンドのエラーボディ
//!
//! REST バックエンドが非 2xx レスポンスで返す JSON ボディを解釈する。
//!
//! ## 形式
//!
//! バックエンドは次のいずれかの形式でエラーを返す:
//!
//! ```json
//! { "message": "Place not found" }
//! { "error": "Invalid credentials" }
//! ```
//!
//! `message` を優先し、なければ `error` を使う。どちらも文字列でない場合や
//! ボディが JSON でない場合は「ボディなし」として扱う。

use serde::{Deserialize, Serialize};

/// バックエンドのエラーボディ
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error:   Option<String>,
}

impl ErrorBody {
    /// レスポンスボディのバイト列からエラーボディを読み取る
    ///
    /// JSON オブジェクトでなければ `None`。フィールドの型が文字列でない場合は
    /// そのフィールドだけを無視する（例: バリデーション詳細がオブジェクトで返る場合）。
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let value: serde_json::Value = serde_json::from_slice(bytes).ok()?;
        let object = value.as_object()?;

        let field = |key: &str| {
            object
                .get(key)
                .and_then(serde_json::Value::as_str)
                .map(str::to_string)
        };

        Some(Self {
            message: field("message"),
            error:   field("error"),
        })
    }

    /// ユーザーに提示するサーバー側メッセージ
    ///
    /// 空文字列のフィールドは未設定と同じ扱いにする。
    pub fn detail(&self) -> Option<&str> {
        self.message
            .as_deref()
            .filter(|m| !m.is_empty())
            .or_else(|| self.error.as_deref().filter(|e| !e.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_messageフィールドを優先する() {
        let body =
            ErrorBody::from_slice(br#"{"message": "Place not found", "error": "other"}"#).unwrap();

        assert_eq!(body.detail(), Some("Place not found"));
    }

    #[test]
    fn test_messageがなければerrorフィールドを使う() {
        let body = ErrorBody::from_slice(br#"{"error": "Invalid credentials"}"#).unwrap();

        assert_eq!(body.detail(), Some("Invalid credentials"));
    }

    #[test]
    fn test_空のmessageはerrorにフォールバックする() {
        let body = ErrorBody::from_slice(br#"{"message": "", "error": "Bad"}"#).unwrap();

        assert_eq!(body.detail(), Some("Bad"));
    }

    #[test]
    fn test_文字列でないフィールドは無視する() {
        let body = ErrorBody::from_slice(
            br#"{"message": {"text": "nested"}, "errors": {"price": "required"}}"#,
        )
        .unwrap();

        assert_eq!(body.detail(), None);
    }

    #[test]
    fn test_jsonでないボディはnoneを返す() {
        assert_eq!(ErrorBody::from_slice(b"<html>Bad Gateway</html>"), None);
        assert_eq!(ErrorBody::from_slice(b""), None);
    }

    #[test]
    fn test_配列ボディはnoneを返す() {
        assert_eq!(ErrorBody::from_slice(br#"["a", "b"]"#), None);
    }

    #[test]
    fn test_シリアライズで未設定フィールドを省略する() {
        let body = ErrorBody {
            message: Some("boom".to_string()),
            error:   None,
        };

        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json, serde_json::json!({ "message": "boom" }));
    }
}
