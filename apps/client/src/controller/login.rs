//! # ログイン
//!
//! ログインフォームの送信とログアウト。
//!
//! ## ログインの流れ
//!
//! 1. フォームを検証する（未入力・メールアドレス形式）
//! 2. `POST /auth/login` を認証ヘッダーなしで呼び出す
//! 3. 応答の `access_token` をセッション Cookie に保存する
//! 4. 一覧画面へ遷移する

use std::sync::Arc;

use hbnb_domain::user::LoginForm;
use hbnb_infra::{Session, SessionToken};

use super::ControllerError;
use crate::{
    api::HbnbApi,
    navigation::{Navigator, Page},
};

/// ログイン画面を開いたときの状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginState {
    /// ログイン済みのため一覧画面へ遷移した
    AlreadyAuthenticated,
    /// フォームを表示する
    ShowForm,
}

/// ログイン画面
pub struct LoginPage {
    api:       Arc<dyn HbnbApi>,
    session:   Session,
    navigator: Arc<dyn Navigator>,
}

impl LoginPage {
    pub fn new(api: Arc<dyn HbnbApi>, session: Session, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            api,
            session,
            navigator,
        }
    }

    /// ログイン画面を開く
    pub async fn open(&self) -> LoginState {
        if self.session.is_authenticated().await {
            self.navigator.navigate(Page::Index);
            return LoginState::AlreadyAuthenticated;
        }

        self.navigator.navigate(Page::Login);
        LoginState::ShowForm
    }

    /// ログインフォームを送信する
    #[tracing::instrument(skip_all)]
    pub async fn submit(&self, email: &str, password: &str) -> Result<(), ControllerError> {
        let form = LoginForm::new(email, password)?;

        let response = self.api.login(&form).await?;

        let Some(token) = response.access_token.and_then(SessionToken::parse) else {
            tracing::error!(
                error.category = "external_service",
                error.kind = "missing_token",
                "ログイン応答にトークンが含まれていません"
            );
            return Err(ControllerError::MissingToken);
        };

        self.session.store(token).await?;
        tracing::info!(email = %form.email, "ログインしました");

        self.navigator.navigate(Page::Index);
        Ok(())
    }
}

/// ログアウトする
///
/// トークンを削除してログイン画面へ遷移する。
pub async fn logout(session: &Session, navigator: &dyn Navigator) -> Result<(), ControllerError> {
    session.clear().await?;
    tracing::info!("ログアウトしました");
    navigator.navigate(Page::Login);
    Ok(())
}
