//! # ページコントローラ
//!
//! ブラウザ版の各ページのスクリプトに相当する。
//! 入力検証はネットワーク呼び出しの前に行い、ゲートウェイの失敗はそのまま呼び出し側に返す。
//! 例外は宿泊先詳細での設備名の解決で、失敗した設備は表示から省く。
//!
//! ## モジュール構成
//!
//! - [`login`] - ログイン画面とログアウト
//! - [`index`] - 宿泊先一覧と価格フィルタ
//! - [`place_detail`] - 宿泊先詳細
//! - [`add_review`] - レビュー投稿

pub mod add_review;
pub mod index;
pub mod login;
pub mod place_detail;

pub use add_review::AddReviewPage;
pub use index::{IndexPage, ListingView};
pub use login::{LoginPage, LoginState, logout};
pub use place_detail::{HOST_UNAVAILABLE, PlaceDetailPage, PlaceDetailView};

use hbnb_domain::DomainError;
use hbnb_infra::InfraError;
use thiserror::Error;

use crate::gateway::GatewayError;

/// コントローラのエラー
#[derive(Debug, Error)]
pub enum ControllerError {
    /// 入力検証エラー（ネットワーク呼び出し前）
    #[error(transparent)]
    Validation(#[from] DomainError),

    /// ゲートウェイのエラー
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// ログイン応答にトークンが含まれない
    #[error("トークンを受け取れませんでした")]
    MissingToken,

    /// ログインが必要な操作を未ログインで行った
    #[error("レビューを投稿するにはログインしてください")]
    LoginRequired,

    /// セッションの保存・削除に失敗
    #[error("セッションの保存に失敗しました: {0}")]
    Session(#[from] InfraError),
}

/// 失敗したユーザー操作（表示メッセージの選択に使う）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
    Login,
    LoadPlaces,
    LoadPlace,
    SubmitReview,
}

impl UserAction {
    /// 詳細を表示できない場合のメッセージ
    pub fn fallback_message(self) -> &'static str {
        match self {
            Self::Login => "ログインに失敗しました。入力内容を確認してください。",
            Self::LoadPlaces => "宿泊先の読み込みに失敗しました。しばらくしてから再度お試しください。",
            Self::LoadPlace => "宿泊先の詳細の読み込みに失敗しました。しばらくしてから再度お試しください。",
            Self::SubmitReview => "レビューの投稿に失敗しました。再度お試しください。",
        }
    }
}

impl ControllerError {
    /// 認証切れか
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Gateway(e) if e.is_unauthorized())
    }

    /// 画面に表示するメッセージ
    ///
    /// 入力検証とサーバーのメッセージはそのまま、それ以外は操作ごとの定型文にする。
    pub fn user_message(&self, action: UserAction) -> String {
        match self {
            Self::Validation(e) => e.to_string(),
            Self::Gateway(GatewayError::Unauthorized) if action == UserAction::Login => {
                "メールアドレスまたはパスワードが正しくありません".to_string()
            }
            Self::Gateway(
                e @ (GatewayError::Unauthorized
                | GatewayError::Http { .. }
                | GatewayError::Network(_)),
            ) => e.user_message(),
            Self::MissingToken | Self::LoginRequired => self.to_string(),
            Self::Gateway(GatewayError::InvalidResponse(_) | GatewayError::InvalidRequest(_))
            | Self::Session(_) => action.fallback_message().to_string(),
        }
    }
}
