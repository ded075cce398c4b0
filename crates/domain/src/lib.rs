//! # HBnB ドメイン層
//!
//! 宿泊先（Place）・レビュー・ユーザーの表現と、クライアント側で行う
//! 入力検証・絞り込みのルールを定義する。
//!
//! ## 設計方針
//!
//! - バックエンドから受け取るエンティティは寛容にデシリアライズする
//!   （未知のフィールドは無視し、欠けた任意フィールドはデフォルト値）
//! - フォーム入力は値オブジェクトで検証し、ネットワーク呼び出し前に弾く
//! - HTTP や永続化には一切依存しない
//!
//! ## モジュール構成
//!
//! - [`clock`] - 時刻プロバイダ
//! - [`error`] - ドメイン層で発生するエラーの定義
//! - [`id`] - バックエンドの識別子
//! - [`place`] - 宿泊先・設備と価格フィルタ
//! - [`review`] - レビューとレビュー投稿フォーム
//! - [`user`] - ユーザーとログインフォーム

pub mod clock;
pub mod error;
pub mod id;
pub mod place;
pub mod review;
pub mod user;

mod serde_helpers;

pub use error::DomainError;
pub use id::ResourceId;
