//! # API ゲートウェイ
//!
//! すべてのバックエンド呼び出しが通る共通のリクエスト処理。
//!
//! ## 処理の流れ
//!
//! 1. ベース URL とエンドポイントを連結する
//! 2. `Content-Type: application/json` を既定値に、呼び出し側のヘッダーをマージする
//!    （同名ヘッダーは大文字小文字を区別せず呼び出し側が優先）
//! 3. トークンがあり、オプトアウトされていなければ `Authorization: Bearer <token>` を付与する
//! 4. リクエストを送信する
//! 5. 401: トークンを削除し、ログイン画面以外ならログイン画面への遅延遷移を予約する
//! 6. その他の非 2xx: エラーボディの `message`（なければ `error`）か、
//!    ステータスコードを含む汎用メッセージで失敗する
//! 7. 2xx: JSON ボディを返す
//!
//! 接続失敗などの送信エラーは [`GatewayError::Network`] として区別する。

use std::{sync::Arc, time::Duration};

use hbnb_infra::Session;
use hbnb_shared::ErrorBody;
use reqwest::{
    Method,
    StatusCode,
    header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue},
};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use thiserror::Error;

use crate::navigation::{Navigator, Page};

/// ゲートウェイのエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// 認証切れ（401）
    ///
    /// トークンは削除済みで、必要ならログイン画面への遷移が予約されている。
    #[error("セッションの有効期限が切れました。再度ログインしてください。")]
    Unauthorized,

    /// 401 以外の非 2xx 応答
    ///
    /// `message` はサーバーのメッセージそのもの、またはステータスコードを含む汎用メッセージ。
    #[error("{message}")]
    Http { status: u16, message: String },

    /// 接続失敗などの送信エラー
    #[error("ネットワークエラー。接続を確認してください。")]
    Network(String),

    /// 2xx だがボディを解釈できない
    #[error("レスポンスの解析に失敗しました: {0}")]
    InvalidResponse(String),

    /// リクエストを組み立てられない（不正なヘッダー等）
    #[error("リクエストの作成に失敗しました: {0}")]
    InvalidRequest(String),
}

impl GatewayError {
    /// 認証切れか
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// HTTP ステータスコード（応答を受け取った場合のみ）
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized => Some(StatusCode::UNAUTHORIZED.as_u16()),
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// 画面に表示するメッセージ
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

/// ステータスコードを含む汎用エラーメッセージ
fn generic_http_message(status: StatusCode) -> String {
    format!("HTTP エラー: ステータス {}", status.as_u16())
}

/// リクエストオプション
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// HTTP メソッド（デフォルト: GET）
    pub method:    Method,
    /// シリアライズ済みのリクエストボディ
    pub body:      Option<String>,
    /// 追加ヘッダー
    pub headers:   Vec<(String, String)>,
    /// 認証ヘッダーを付与しない
    pub skip_auth: bool,
}

impl RequestOptions {
    /// GET リクエスト
    pub fn get() -> Self {
        Self::default()
    }

    /// ボディ付きの POST リクエスト
    pub fn post(body: impl Into<String>) -> Self {
        Self {
            method: Method::POST,
            body: Some(body.into()),
            ..Self::default()
        }
    }

    /// POST リクエストのボディを JSON で設定する
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, GatewayError> {
        let body = serde_json::to_string(value)
            .map_err(|e| GatewayError::InvalidRequest(e.to_string()))?;
        Ok(Self::post(body))
    }

    /// ヘッダーを追加する
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// 認証ヘッダーを付与しない
    pub fn skip_auth(mut self) -> Self {
        self.skip_auth = true;
        self
    }
}

/// API ゲートウェイ
///
/// セッションと Navigator を明示的に受け取り、リクエストごとに参照する。
#[derive(Clone)]
pub struct ApiGateway {
    client:         reqwest::Client,
    base_url:       String,
    session:        Session,
    navigator:      Arc<dyn Navigator>,
    redirect_delay: Duration,
}

impl ApiGateway {
    pub fn new(
        base_url: &str,
        session: Session,
        navigator: Arc<dyn Navigator>,
        redirect_delay: Duration,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
            navigator,
            redirect_delay,
        }
    }

    /// リクエストを送信し、JSON ボディを返す
    #[tracing::instrument(skip_all, fields(http.method = %options.method, endpoint = %endpoint))]
    pub async fn request(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<Value, GatewayError> {
        let url = format!("{}{}", self.base_url, endpoint);
        let headers = self.build_headers(&options).await.inspect_err(|e| {
            tracing::error!(
                error.category = "client",
                error.kind = "invalid_request",
                "リクエストを組み立てられません: {}",
                e
            );
        })?;

        let mut builder = self.client.request(options.method, &url).headers(headers);
        if let Some(body) = options.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| {
            tracing::error!(
                error.category = "external_service",
                error.kind = "network",
                "バックエンドへの接続に失敗: {}",
                e
            );
            GatewayError::Network(e.to_string())
        })?;

        let result = interpret_response(response).await;

        if let Err(err) = &result {
            if err.is_unauthorized() {
                self.handle_unauthorized().await;
            } else {
                tracing::error!(
                    error.category = "external_service",
                    error.kind = "http",
                    http.status = err.status(),
                    "バックエンドがエラーを返しました: {}",
                    err
                );
            }
        }

        result
    }

    /// リクエストを送信し、ボディを `T` にデシリアライズする
    pub async fn request_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<T, GatewayError> {
        let value = self.request(endpoint, options).await?;
        serde_json::from_value(value).map_err(|e| {
            tracing::error!(
                error.category = "external_service",
                error.kind = "deserialize",
                "レスポンスの形式が想定と異なります: {}",
                e
            );
            GatewayError::InvalidResponse(e.to_string())
        })
    }

    /// ヘッダーを組み立てる
    ///
    /// オプトアウト時は呼び出し側が指定した `Authorization` も送らない。
    async fn build_headers(&self, options: &RequestOptions) -> Result<HeaderMap, GatewayError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        for (name, value) in &options.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| GatewayError::InvalidRequest(format!("ヘッダー名 {name:?}: {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| GatewayError::InvalidRequest(format!("ヘッダー値 {name}: {e}")))?;
            headers.insert(name, value);
        }

        if options.skip_auth {
            headers.remove(AUTHORIZATION);
        } else if let Some(token) = self.session.token().await {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.as_str()))
                .map_err(|e| GatewayError::InvalidRequest(format!("トークン: {e}")))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        Ok(headers)
    }

    /// 401 応答の後処理
    ///
    /// トークン削除の失敗はログに残すのみで、呼び出し側には 401 を返す。
    async fn handle_unauthorized(&self) {
        tracing::warn!(http.status = 401, "認証切れのためセッションを破棄します");

        if let Err(e) = self.session.clear().await {
            tracing::error!(
                error.category = "infrastructure",
                error.kind = "session_clear",
                "セッションの削除に失敗: {}",
                e
            );
        }

        if self.navigator.current_page() != Page::Login {
            self.navigator.schedule_redirect(Page::Login, self.redirect_delay);
        }
    }
}

impl std::fmt::Debug for ApiGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiGateway")
            .field("base_url", &self.base_url)
            .field("session", &self.session)
            .field("redirect_delay", &self.redirect_delay)
            .finish_non_exhaustive()
    }
}

/// レスポンスを解釈する
///
/// 副作用は持たない。401 の後処理は [`ApiGateway::request`] が行う。
pub(crate) async fn interpret_response(response: reqwest::Response) -> Result<Value, GatewayError> {
    let status = response.status();

    if status == StatusCode::UNAUTHORIZED {
        return Err(GatewayError::Unauthorized);
    }

    if !status.is_success() {
        let body = response.bytes().await.unwrap_or_default();
        let message = ErrorBody::from_slice(&body)
            .and_then(|b| b.detail().map(str::to_string))
            .unwrap_or_else(|| generic_http_message(status));
        return Err(GatewayError::Http {
            status: status.as_u16(),
            message,
        });
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| GatewayError::Network(e.to_string()))?;

    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }

    serde_json::from_slice(&body).map_err(|e| GatewayError::InvalidResponse(e.to_string()))
}
