//! # HBnB インフラ層
//!
//! セッショントークンの保存先を担当するインフラストラクチャ層。
//!
//! ## 責務
//!
//! ブラウザでは Cookie に保存していたベアラートークンを、
//! CLI のプロファイルディレクトリにある Cookie ジャー（JSON ファイル）に保存する。
//!
//! ## 依存関係
//!
//! ```text
//! client → infra → domain
//!    ↘               ↑
//!      shared        │
//!    └───────────────┘
//! ```
//!
//! ## モジュール構成
//!
//! - [`cookie_jar`] - ファイルに保存する Cookie ジャー
//! - [`error`] - インフラ層エラー定義
//! - [`session`] - セッショントークンと保存先の抽象化
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! use hbnb_infra::{FileTokenStore, Session};
//!
//! async fn setup() -> Result<(), hbnb_infra::InfraError> {
//!     let store = Arc::new(FileTokenStore::new(".hbnb/cookies.json"));
//!     let session = Session::new(store, "token", chrono::Duration::days(7));
//!
//!     if session.is_authenticated().await {
//!         session.clear().await?;
//!     }
//!     Ok(())
//! }
//! ```

pub mod cookie_jar;
pub mod error;
pub mod session;

pub use cookie_jar::FileTokenStore;
pub use error::{InfraError, InfraErrorKind};
pub use session::{InMemoryTokenStore, Session, SessionCookie, SessionToken, TokenStore};
