//! # HBnB 共有ユーティリティ
//!
//! このクレートは、HBnB クライアント全体で使用される共通ユーティリティを提供する。
//!
//! ## 設計方針
//!
//! - 他のすべてのクレート（domain, infra, client）から依存される
//! - ビジネスロジックを含まない純粋なユーティリティのみを配置
//! - 外部クレートへの依存は最小限に抑える

pub mod error_body;
pub mod observability;

pub use error_body::ErrorBody;
