//! # Cookie ジャー
//!
//! セッション Cookie を JSON ファイルに保存する [`TokenStore`] 実装。
//!
//! ## ファイル形式
//!
//! ```json
//! {
//!   "cookies": {
//!     "token": {
//!       "name": "token",
//!       "value": "eyJhbGciOi...",
//!       "path": "/",
//!       "expires_at": "2025-01-12T12:00:00Z"
//!     }
//!   }
//! }
//! ```
//!
//! ファイルが存在しない、または空の場合は空のジャーとして扱う。
//! 書き込みは一時ファイルに書いてから rename する。
//! 壊れたファイルは読み込みではエラーになるが、書き込み時は警告ログを出して
//! 空のジャーから作り直す。

use std::{
    collections::BTreeMap,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::{InfraError, InfraErrorKind, SessionCookie, TokenStore};

/// ジャー全体の内容
#[derive(Debug, Default, Serialize, Deserialize)]
struct CookieJar {
    #[serde(default)]
    cookies: BTreeMap<String, SessionCookie>,
}

/// ファイルに保存する Cookie ジャー
///
/// 同一プロセス内の読み書きは Mutex で直列化する。
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileTokenStore {
    /// Cookie ジャーを作成する
    ///
    /// ファイルは最初の書き込み時に作成される。
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    #[tracing::instrument(skip_all, fields(path = %self.path.display()))]
    async fn read_jar(&self) -> Result<CookieJar, InfraError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(CookieJar::default()),
            Err(e) => return Err(e.into()),
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(CookieJar::default());
        }

        Ok(serde_json::from_slice(&bytes)?)
    }

    /// 書き込み前の読み込み
    ///
    /// 内容が壊れていれば空のジャーを返す。戻り値の `bool` は作り直したかどうか。
    async fn read_jar_for_write(&self) -> Result<(CookieJar, bool), InfraError> {
        match self.read_jar().await {
            Ok(jar) => Ok((jar, false)),
            Err(e) if matches!(e.kind(), InfraErrorKind::Serialization(_)) => {
                tracing::warn!(
                    error.category = "infrastructure",
                    error.kind = "cookie_jar_corrupt",
                    path = %self.path.display(),
                    "Cookie ジャーが壊れているため作り直します: {}",
                    e
                );
                Ok((CookieJar::default(), true))
            }
            Err(e) => Err(e),
        }
    }

    #[tracing::instrument(skip_all, fields(path = %self.path.display()))]
    async fn write_jar(&self, jar: &CookieJar) -> Result<(), InfraError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_vec_pretty(jar)?;
        let tmp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, json).await?;
        restrict_permissions(&tmp_path).await?;
        tokio::fs::rename(&tmp_path, &self.path).await?;

        Ok(())
    }
}

/// トークンを含むファイルを所有者のみ読み書き可能にする
#[cfg(unix)]
async fn restrict_permissions(path: &Path) -> Result<(), InfraError> {
    use std::os::unix::fs::PermissionsExt;

    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)).await?;
    Ok(())
}

#[cfg(not(unix))]
async fn restrict_permissions(_path: &Path) -> Result<(), InfraError> {
    Ok(())
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self, name: &str) -> Result<Option<SessionCookie>, InfraError> {
        let _guard = self.lock.lock().await;
        let jar = self.read_jar().await?;
        Ok(jar.cookies.get(name).cloned())
    }

    async fn save(&self, cookie: &SessionCookie) -> Result<(), InfraError> {
        let _guard = self.lock.lock().await;
        let (mut jar, _) = self.read_jar_for_write().await?;
        jar.cookies.insert(cookie.name.clone(), cookie.clone());
        self.write_jar(&jar).await
    }

    async fn remove(&self, name: &str) -> Result<(), InfraError> {
        let _guard = self.lock.lock().await;
        let (mut jar, recovered) = self.read_jar_for_write().await?;
        if jar.cookies.remove(name).is_none() && !recovered {
            return Ok(());
        }
        self.write_jar(&jar).await
    }
}
