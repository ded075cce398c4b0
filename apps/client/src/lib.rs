//! # HBnB クライアント
//!
//! 宿泊予約サービス HBnB の REST API を利用する端末向けクライアント。
//!
//! ## 構成
//!
//! ```text
//! CLI (main.rs)
//!   └─ controller   画面ごとの処理
//!        ├─ HbnbApi     エンドポイントごとの呼び出し
//!        │    └─ ApiGateway   認証ヘッダー・エラーの分類・401 の後処理
//!        │         └─ Session     セッション Cookie
//!        └─ Navigator   画面遷移
//! ```
//!
//! ## モジュール構成
//!
//! - [`gateway`] - 認証付き API 呼び出しとエラーの分類
//! - [`api`] - エンドポイントごとの型付き呼び出し
//! - [`controller`] - ログイン・一覧・詳細・レビュー投稿の各画面
//! - [`navigation`] - 画面と遅延リダイレクト
//! - [`listing_cache`] - 一覧のキャッシュ
//! - [`view`] - 端末向けの表示
//! - [`config`] - 環境変数からの設定

pub mod api;
pub mod config;
pub mod controller;
pub mod gateway;
pub mod listing_cache;
pub mod navigation;
pub mod view;
