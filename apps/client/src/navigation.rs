//! # 画面遷移
//!
//! ブラウザの `window.location` と `setTimeout` による遷移を、
//! 明示的な状態を持つ [`Navigator`] として表現する。
//!
//! ## 遅延リダイレクト
//!
//! 401 応答を受けたゲートウェイは、一定時間後にログイン画面へ遷移させる。
//! 保留中のリダイレクトは常に高々 1 件で、保留中に再度予約しても無視される。
//!
//! ```text
//! schedule_redirect(Login, 1500ms)
//!   │
//!   ├─ pending = Some(Login) ──(1500ms)──▶ current = Login, pending = None
//!   │
//!   └─ 2 回目の予約 → false（何もしない）
//! ```

use std::{
    fmt,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use hbnb_domain::ResourceId;
use tokio::task::JoinHandle;

/// クライアントの画面
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    /// ログイン画面
    Login,
    /// 宿泊先一覧
    Index,
    /// 宿泊先詳細
    Place(ResourceId),
    /// レビュー投稿
    AddReview(ResourceId),
}

impl Page {
    /// ブラウザ版での遷移先
    pub fn location(&self) -> String {
        match self {
            Self::Login => "login.html".to_string(),
            Self::Index => "index.html".to_string(),
            Self::Place(id) => format!("place.html?id={id}"),
            Self::AddReview(id) => format!("add_review.html?place_id={id}"),
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.location())
    }
}

/// 画面遷移トレイト
///
/// ゲートウェイとページコントローラはこのトレイトを通じて遷移する。
pub trait Navigator: Send + Sync {
    /// 現在の画面
    fn current_page(&self) -> Page;

    /// 即座に遷移する
    fn navigate(&self, page: Page);

    /// `delay` 経過後に遷移するよう予約する
    ///
    /// 既に保留中のリダイレクトがある場合は何もせず `false` を返す。
    fn schedule_redirect(&self, page: Page, delay: Duration) -> bool;
}

#[derive(Debug)]
struct NavigationState {
    current: Page,
    pending: Option<Page>,
    task:    Option<JoinHandle<()>>,
}

/// tokio ランタイム上で遅延リダイレクトを実行する Navigator
///
/// クローンしても同じ状態を共有する。
#[derive(Debug, Clone)]
pub struct SessionNavigator {
    state: Arc<Mutex<NavigationState>>,
}

impl SessionNavigator {
    pub fn new(initial: Page) -> Self {
        Self {
            state: Arc::new(Mutex::new(NavigationState {
                current: initial,
                pending: None,
                task:    None,
            })),
        }
    }

    /// 保留中のリダイレクト先
    pub fn pending_redirect(&self) -> Option<Page> {
        self.lock().pending.clone()
    }

    /// 保留中のリダイレクトの完了を待ち、現在の画面を返す
    pub async fn wait_for_redirect(&self) -> Page {
        let task = self.lock().task.take();
        if let Some(task) = task
            && let Err(e) = task.await
        {
            tracing::warn!("リダイレクトタスクが異常終了しました: {}", e);
        }
        self.current_page()
    }

    fn lock(&self) -> MutexGuard<'_, NavigationState> {
        lock_state(&self.state)
    }
}

fn lock_state(state: &Mutex<NavigationState>) -> MutexGuard<'_, NavigationState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Navigator for SessionNavigator {
    fn current_page(&self) -> Page {
        self.lock().current.clone()
    }

    fn navigate(&self, page: Page) {
        tracing::debug!(page = %page, "画面遷移");
        self.lock().current = page;
    }

    fn schedule_redirect(&self, page: Page, delay: Duration) -> bool {
        let mut state = self.lock();
        if state.pending.is_some() {
            tracing::debug!(page = %page, "リダイレクトは既に予約済み");
            return false;
        }

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(page = %page, "ランタイム外のため即座に遷移します");
            state.current = page;
            return true;
        };

        tracing::debug!(
            page = %page,
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            "リダイレクトを予約"
        );
        state.pending = Some(page);

        let shared = Arc::clone(&self.state);
        state.task = Some(runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            let mut state = lock_state(&shared);
            if let Some(page) = state.pending.take() {
                tracing::debug!(page = %page, "予約されたリダイレクトを実行");
                state.current = page;
            }
        }));

        true
    }
}
