//! # クライアント設定
//!
//! 環境変数から API ゲートウェイとセッション Cookie の設定を読み込む。
//!
//! | 変数名 | デフォルト | 説明 |
//! |--------|-----------|------|
//! | `HBNB_API_BASE_URL` | `http://localhost:5000/api/v1` | バックエンドのベース URL |
//! | `HBNB_COOKIE_NAME` | `token` | セッション Cookie 名 |
//! | `HBNB_COOKIE_EXPIRY_DAYS` | `7` | セッション Cookie の有効日数（1〜3650） |
//! | `HBNB_SESSION_FILE` | `.hbnb/cookies.json` | Cookie ジャーのパス |
//! | `HBNB_ROUTE_PROFILE` | `nested` | バックエンドのルート構成（`nested` / `flat`） |
//! | `HBNB_REVIEW_MIN_LENGTH` | `10` | レビュー本文の最小文字数 |
//! | `HBNB_UNAUTHORIZED_REDIRECT_DELAY_MS` | `1500` | 401 応答後ログイン画面へ遷移するまでの待機時間 |

use std::{env, path::PathBuf, str::FromStr, time::Duration};

use hbnb_domain::review::DEFAULT_REVIEW_MIN_LENGTH;
use thiserror::Error;

use crate::api::RouteProfile;

const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api/v1";
const DEFAULT_COOKIE_NAME: &str = "token";
const DEFAULT_COOKIE_EXPIRY_DAYS: u32 = 7;
const MAX_COOKIE_EXPIRY_DAYS: u32 = 3650;
const DEFAULT_SESSION_FILE: &str = ".hbnb/cookies.json";
const DEFAULT_REDIRECT_DELAY_MS: u64 = 1500;

/// 設定エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// 値の形式が不正
    #[error("{name} の値が不正です: {value:?}（{expected}）")]
    InvalidValue {
        name:     &'static str,
        value:    String,
        expected: &'static str,
    },
}

/// クライアント設定
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// バックエンドのベース URL（末尾の `/` は除去済み）
    pub api_base_url:       String,
    /// セッション Cookie 名
    pub cookie_name:        String,
    /// セッション Cookie の有効日数
    pub cookie_expiry_days: u32,
    /// Cookie ジャーのパス
    pub session_file:       PathBuf,
    /// バックエンドのルート構成
    pub route_profile:      RouteProfile,
    /// レビュー本文の最小文字数
    pub review_min_length:  usize,
    /// 401 応答後のリダイレクト待機時間
    pub redirect_delay:     Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url:       DEFAULT_API_BASE_URL.to_string(),
            cookie_name:        DEFAULT_COOKIE_NAME.to_string(),
            cookie_expiry_days: DEFAULT_COOKIE_EXPIRY_DAYS,
            session_file:       PathBuf::from(DEFAULT_SESSION_FILE),
            route_profile:      RouteProfile::default(),
            review_min_length:  DEFAULT_REVIEW_MIN_LENGTH,
            redirect_delay:     Duration::from_millis(DEFAULT_REDIRECT_DELAY_MS),
        }
    }
}

impl ClientConfig {
    /// 環境変数から設定を読み込む
    ///
    /// `.env` の読み込みは呼び出し側（`main`）で行う。
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// 任意の参照関数から設定を読み込む
    ///
    /// 未設定・空文字列の変数はデフォルト値を使う。
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let api_base_url = match get("HBNB_API_BASE_URL") {
            Some(url) => parse_base_url(&url)?,
            None => defaults.api_base_url,
        };

        let cookie_expiry_days = match get("HBNB_COOKIE_EXPIRY_DAYS") {
            Some(value) => parse_expiry_days(&value)?,
            None => defaults.cookie_expiry_days,
        };

        let route_profile = match get("HBNB_ROUTE_PROFILE") {
            Some(value) => RouteProfile::from_str(value.trim()).map_err(|_| {
                ConfigError::InvalidValue {
                    name: "HBNB_ROUTE_PROFILE",
                    value,
                    expected: "nested または flat",
                }
            })?,
            None => defaults.route_profile,
        };

        let review_min_length = match get("HBNB_REVIEW_MIN_LENGTH") {
            Some(value) => parse_number("HBNB_REVIEW_MIN_LENGTH", &value)?,
            None => defaults.review_min_length,
        };

        let redirect_delay = match get("HBNB_UNAUTHORIZED_REDIRECT_DELAY_MS") {
            Some(value) => Duration::from_millis(parse_number(
                "HBNB_UNAUTHORIZED_REDIRECT_DELAY_MS",
                &value,
            )?),
            None => defaults.redirect_delay,
        };

        Ok(Self {
            api_base_url,
            cookie_name: get("HBNB_COOKIE_NAME").unwrap_or(defaults.cookie_name),
            cookie_expiry_days,
            session_file: get("HBNB_SESSION_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.session_file),
            route_profile,
            review_min_length,
            redirect_delay,
        })
    }

    /// セッション Cookie の有効期間
    pub fn cookie_max_age(&self) -> chrono::Duration {
        chrono::Duration::days(i64::from(self.cookie_expiry_days))
    }
}

/// ベース URL を検証し、末尾の `/` を除去する
fn parse_base_url(value: &str) -> Result<String, ConfigError> {
    let trimmed = value.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::InvalidValue {
            name:     "HBNB_API_BASE_URL",
            value:    value.to_string(),
            expected: "http:// または https:// で始まる URL",
        });
    }
    Ok(trimmed.to_string())
}

fn parse_number<T: FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue {
            name,
            value: value.to_string(),
            expected: "0 以上の整数",
        })
}

fn parse_positive(name: &'static str, value: &str) -> Result<u32, ConfigError> {
    match parse_number::<u32>(name, value) {
        Ok(0) | Err(_) => Err(ConfigError::InvalidValue {
            name,
            value: value.to_string(),
            expected: "1 以上の整数",
        }),
        Ok(n) => Ok(n),
    }
}

fn parse_expiry_days(value: &str) -> Result<u32, ConfigError> {
    match parse_positive("HBNB_COOKIE_EXPIRY_DAYS", value)? {
        days if days > MAX_COOKIE_EXPIRY_DAYS => Err(ConfigError::InvalidValue {
            name:     "HBNB_COOKIE_EXPIRY_DAYS",
            value:    value.to_string(),
            expected: "3650 以下の整数",
        }),
        days => Ok(days),
    }
}
