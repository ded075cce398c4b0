//! テスト共通フィクスチャ
//!
//! `wiremock` の `MockServer` に向けたゲートウェイ・API の組み立てヘルパー。
//! Rust の統合テスト規約に従い `tests/common/mod.rs` に配置。

// 各テストファイルが独立したクレートとしてコンパイルされるため、
// 使用しない関数に dead_code 警告が出る。モジュール全体で抑制する。
#![allow(dead_code)]

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use hbnb_client::{
    api::{GatewayApi, RouteProfile},
    gateway::ApiGateway,
    navigation::{Navigator, Page, SessionNavigator},
};
use hbnb_infra::{InMemoryTokenStore, Session, SessionToken};
use wiremock::MockServer;

/// テストで使うリダイレクト待機時間
pub const REDIRECT_DELAY: Duration = Duration::from_millis(20);

/// 空のインメモリセッション
pub fn memory_session() -> Session {
    Session::new(
        Arc::new(InMemoryTokenStore::new()),
        "token",
        chrono::Duration::days(7),
    )
}

/// トークン `token` を保持したセッション
pub async fn session_with_token(token: &str) -> Session {
    let session = memory_session();
    session
        .store(SessionToken::parse(token).unwrap())
        .await
        .unwrap();
    session
}

/// 一覧画面から始まる Navigator
pub fn navigator() -> Arc<SessionNavigator> {
    Arc::new(SessionNavigator::new(Page::Index))
}

/// モックサーバーに向けたゲートウェイ
pub fn gateway(server: &MockServer, session: Session, navigator: Arc<dyn Navigator>) -> ApiGateway {
    ApiGateway::new(&server.uri(), session, navigator, REDIRECT_DELAY)
}

/// モックサーバーに向けた API
pub fn api(
    server: &MockServer,
    session: Session,
    navigator: Arc<dyn Navigator>,
    profile: RouteProfile,
) -> GatewayApi {
    GatewayApi::new(gateway(server, session, navigator), profile)
}

/// 受信したリクエストの `Authorization` ヘッダー（リクエスト順）
pub async fn received_authorization(server: &MockServer) -> Vec<Option<String>> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|request| {
            request
                .headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        })
        .collect()
}

/// リダイレクトの予約を記録する Navigator
///
/// 予約は記録するだけで、遷移は行わない。
#[derive(Debug)]
pub struct RecordingNavigator {
    current:   Mutex<Page>,
    scheduled: Mutex<Vec<(Page, Duration)>>,
}

impl RecordingNavigator {
    pub fn new(initial: Page) -> Self {
        Self {
            current:   Mutex::new(initial),
            scheduled: Mutex::new(Vec::new()),
        }
    }

    pub fn scheduled(&self) -> Vec<(Page, Duration)> {
        self.scheduled.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn current_page(&self) -> Page {
        self.current.lock().unwrap().clone()
    }

    fn navigate(&self, page: Page) {
        *self.current.lock().unwrap() = page;
    }

    fn schedule_redirect(&self, page: Page, delay: Duration) -> bool {
        self.scheduled.lock().unwrap().push((page, delay));
        true
    }
}
