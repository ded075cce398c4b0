//! # ドメイン層エラー定義
//!
//! クライアント側の入力検証で発生するエラー。
//! ここで発生したエラーはネットワーク呼び出しの前に呼び出し元へ返され、
//! Gateway には到達しない。

use thiserror::Error;

/// ドメイン層で発生するエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// バリデーションエラー
    ///
    /// # 例
    ///
    /// - 必須フィールドが未入力
    /// - メールアドレスの形式が不正
    /// - レビュー本文が短すぎる
    #[error("{0}")]
    Validation(String),
}

impl DomainError {
    /// バリデーションエラーを作成する
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
