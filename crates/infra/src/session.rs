//! # セッション管理
//!
//! ベアラートークンを名前付き Cookie として保存・取得・削除する。
//!
//! ## Cookie の属性
//!
//! | 属性 | 値 |
//! |-----|-----|
//! | 名前 | `token`（設定で変更可） |
//! | 有効期限 | 保存時刻 + 7 日（設定で変更可） |
//! | パス | `/`（クライアント全体で共有） |
//!
//! 有効期限を過ぎた Cookie は存在しないものとして扱い、読み出し時に削除する。
//!
//! ## 保存先の抽象化
//!
//! [`TokenStore`] トレイトで保存先を差し替えられる。
//! 本番は [`FileTokenStore`](crate::FileTokenStore)、テストは [`InMemoryTokenStore`] を使う。

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use hbnb_domain::clock::{Clock, SystemClock};
use serde::{Deserialize, Serialize};

use crate::InfraError;

/// セッショントークン（不透明なベアラートークン）
///
/// 空文字列は「トークンなし」と同じ扱いのため作成できない。
/// Debug 出力はマスクする。
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionToken(String);

impl SessionToken {
    /// トークン文字列を検証して作成する
    ///
    /// 空文字列の場合は `None`。
    pub fn parse(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        if value.is_empty() {
            None
        } else {
            Some(Self(value))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SessionToken {
    type Error = &'static str;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value).ok_or("セッショントークンが空です")
    }
}

impl From<SessionToken> for String {
    fn from(token: SessionToken) -> Self {
        token.0
    }
}

impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SessionToken").field(&"[REDACTED]").finish()
    }
}

/// 保存されたセッション Cookie
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCookie {
    pub name:       String,
    pub value:      SessionToken,
    pub path:       String,
    pub expires_at: DateTime<Utc>,
}

impl SessionCookie {
    /// `now` を起点に有効期限を設定した Cookie を作成する
    ///
    /// 有効期限が日時の表現範囲を超える場合はエラー。
    pub fn new(
        name: impl Into<String>,
        value: SessionToken,
        now: DateTime<Utc>,
        max_age: Duration,
    ) -> Result<Self, InfraError> {
        let expires_at = now.checked_add_signed(max_age).ok_or_else(|| {
            InfraError::unexpected(format!("Cookie の有効期限が範囲外です: {max_age}"))
        })?;

        Ok(Self {
            name: name.into(),
            value,
            path: "/".to_string(),
            expires_at,
        })
    }

    /// 有効期限を過ぎているか
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Cookie の保存先トレイト
///
/// Cookie 名をキーとして 1 件ずつ読み書きする。
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Cookie を取得する
    ///
    /// # 戻り値
    ///
    /// 保存されていれば `Some(SessionCookie)`、なければ `None`
    async fn load(&self, name: &str) -> Result<Option<SessionCookie>, InfraError>;

    /// Cookie を保存する（同名の Cookie は上書き）
    async fn save(&self, cookie: &SessionCookie) -> Result<(), InfraError>;

    /// Cookie を削除する
    ///
    /// 存在しない Cookie を削除しても成功とする。
    async fn remove(&self, name: &str) -> Result<(), InfraError>;
}

/// メモリ上の Cookie 保存先
///
/// プロセス終了で消える。
#[derive(Debug, Default)]
pub struct InMemoryTokenStore {
    cookies: Mutex<HashMap<String, SessionCookie>>,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, SessionCookie>>, InfraError> {
        self.cookies
            .lock()
            .map_err(|e| InfraError::unexpected(format!("Cookie ストアのロックに失敗: {e}")))
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn load(&self, name: &str) -> Result<Option<SessionCookie>, InfraError> {
        Ok(self.lock()?.get(name).cloned())
    }

    async fn save(&self, cookie: &SessionCookie) -> Result<(), InfraError> {
        self.lock()?.insert(cookie.name.clone(), cookie.clone());
        Ok(())
    }

    async fn remove(&self, name: &str) -> Result<(), InfraError> {
        self.lock()?.remove(name);
        Ok(())
    }
}

/// セッション
///
/// Cookie 名と有効期間を束ね、トークンの保存・取得・削除を提供する。
/// クローンしても同じ保存先を共有する。
#[derive(Clone)]
pub struct Session {
    store:       Arc<dyn TokenStore>,
    clock:       Arc<dyn Clock>,
    cookie_name: String,
    max_age:     Duration,
}

impl Session {
    /// システム時刻を使うセッションを作成する
    pub fn new(store: Arc<dyn TokenStore>, cookie_name: impl Into<String>, max_age: Duration) -> Self {
        Self::with_clock(store, Arc::new(SystemClock), cookie_name, max_age)
    }

    /// 時刻プロバイダを指定してセッションを作成する
    pub fn with_clock(
        store: Arc<dyn TokenStore>,
        clock: Arc<dyn Clock>,
        cookie_name: impl Into<String>,
        max_age: Duration,
    ) -> Self {
        Self {
            store,
            clock,
            cookie_name: cookie_name.into(),
            max_age,
        }
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// 現在のトークンを取得する
    ///
    /// 保存先の読み出しに失敗した場合は警告ログを出して `None` を返す。
    /// 期限切れの Cookie は削除を試みたうえで `None` を返す。
    pub async fn token(&self) -> Option<SessionToken> {
        let cookie = match self.store.load(&self.cookie_name).await {
            Ok(cookie) => cookie?,
            Err(e) => {
                tracing::warn!(
                    error.category = "infrastructure",
                    error.kind = "session_read",
                    "セッション Cookie の読み込みに失敗: {}",
                    e
                );
                return None;
            }
        };

        if cookie.is_expired(self.clock.now()) {
            tracing::debug!(cookie = %self.cookie_name, "期限切れのセッション Cookie を削除");
            if let Err(e) = self.store.remove(&self.cookie_name).await {
                tracing::warn!(
                    error.category = "infrastructure",
                    error.kind = "session_remove",
                    "期限切れ Cookie の削除に失敗: {}",
                    e
                );
            }
            return None;
        }

        Some(cookie.value)
    }

    /// トークンが保存されているか
    pub async fn is_authenticated(&self) -> bool {
        self.token().await.is_some()
    }

    /// トークンを保存する
    ///
    /// 有効期限は現在時刻 + 有効期間。既存のトークンは上書きする。
    pub async fn store(&self, token: SessionToken) -> Result<(), InfraError> {
        let cookie = SessionCookie::new(&self.cookie_name, token, self.clock.now(), self.max_age)?;
        self.store.save(&cookie).await
    }

    /// トークンを削除する（ログアウト・401 応答時）
    pub async fn clear(&self) -> Result<(), InfraError> {
        self.store.remove(&self.cookie_name).await
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("cookie_name", &self.cookie_name)
            .field("max_age", &self.max_age)
            .finish_non_exhaustive()
    }
}
