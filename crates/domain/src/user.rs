//! # ユーザー
//!
//! 宿泊先のホスト情報と、ログインフォームの検証。

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{DomainError, ResourceId};

/// ホスト名が分からない場合の表示名
pub const UNKNOWN_HOST: &str = "Unknown Host";

/// メールアドレスの形式（`local@domain.tld`、空白と余分な `@` を含まない）
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("メールアドレスの正規表現が不正です")
});

/// ユーザー（ホストのプロフィール）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id:         Option<ResourceId>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name:  Option<String>,
    #[serde(default)]
    pub email:      Option<String>,
}

impl User {
    /// 表示名
    ///
    /// 「名 姓」を優先し、空ならメールアドレス、それもなければ [`UNKNOWN_HOST`]。
    pub fn display_name(&self) -> String {
        let full_name = format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or_default(),
            self.last_name.as_deref().unwrap_or_default()
        );
        let full_name = full_name.trim();
        if !full_name.is_empty() {
            return full_name.to_string();
        }

        self.email
            .as_deref()
            .filter(|e| !e.is_empty())
            .unwrap_or(UNKNOWN_HOST)
            .to_string()
    }
}

/// メールアドレス
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// メールアドレスを作成する
    ///
    /// 前後の空白を除いたうえで形式を検証する。
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into().trim().to_string();

        if value.is_empty() {
            return Err(DomainError::validation("メールアドレスは必須です"));
        }

        if !EMAIL_PATTERN.is_match(&value) {
            return Err(DomainError::validation(
                "有効なメールアドレスを入力してください",
            ));
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// パスワード（平文）
///
/// ログインリクエストにのみ使う。Debug 出力はマスクする。
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Password(String);

impl Password {
    /// パスワードを作成する（空は不可、前後の空白はそのまま）
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        if value.is_empty() {
            return Err(DomainError::validation("パスワードは必須です"));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Password").field(&"[REDACTED]").finish()
    }
}

/// 検証済みのログインフォーム
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginForm {
    pub email:    Email,
    pub password: Password,
}

impl LoginForm {
    /// フォーム入力を検証する
    ///
    /// どちらかが未入力なら形式チェックより先に「すべて入力」エラーを返す。
    pub fn new(email: &str, password: &str) -> Result<Self, DomainError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(DomainError::validation("すべての項目を入力してください"));
        }

        Ok(Self {
            email:    Email::new(email)?,
            password: Password::new(password)?,
        })
    }
}
