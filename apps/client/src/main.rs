//! # HBnB クライアント CLI
//!
//! ブラウザ版の各画面をサブコマンドとして提供する。
//!
//! ## サブコマンド
//!
//! | コマンド | 画面 |
//! |----------|------|
//! | `hbnb login --email <EMAIL> --password <PASSWORD>` | ログイン |
//! | `hbnb logout` | ログアウト |
//! | `hbnb places [--max-price all\|10\|50\|100]` | 宿泊先一覧 |
//! | `hbnb place <ID>` | 宿泊先詳細 |
//! | `hbnb review <PLACE_ID> --rating <1-5> --text <TEXT>` | レビュー投稿 |
//! | `hbnb whoami` | セッションの状態 |
//!
//! 設定は環境変数（`.env` も可）から読み込む。一覧は [`hbnb_client::config`] を参照。
//! ログは stderr、画面表示は stdout に出力する。

use std::sync::Arc;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use hbnb_client::{
    api::{GatewayApi, HbnbApi},
    config::ClientConfig,
    controller::{
        AddReviewPage,
        ControllerError,
        IndexPage,
        LoginPage,
        LoginState,
        PlaceDetailPage,
        UserAction,
        logout,
    },
    gateway::ApiGateway,
    navigation::{Page, SessionNavigator},
    view,
};
use hbnb_domain::{ResourceId, place::PriceFilter};
use hbnb_infra::{FileTokenStore, Session};
use hbnb_shared::observability::{TracingConfig, init_tracing};
use tracing::Instrument as _;

#[derive(Debug, Parser)]
#[command(name = "hbnb", version, about = "HBnB 宿泊予約サービスのクライアント")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// ログインしてセッション Cookie を保存する
    Login {
        #[arg(long)]
        email:    String,
        #[arg(long)]
        password: String,
    },
    /// セッション Cookie を削除する
    Logout,
    /// 宿泊先の一覧を表示する
    Places {
        /// 上限価格（all, 10, 50, 100）
        #[arg(long, default_value = "all")]
        max_price: PriceFilter,
    },
    /// 宿泊先の詳細を表示する
    Place { id: String },
    /// レビューを投稿する（要ログイン）
    Review {
        place_id: String,
        /// 評価（1〜5）
        #[arg(long)]
        rating:   Option<u8>,
        /// レビュー本文
        #[arg(long)]
        text:     String,
    },
    /// ログイン状態を表示する
    Whoami,
}

/// 組み立て済みの依存関係
struct App {
    config:    ClientConfig,
    session:   Session,
    navigator: Arc<SessionNavigator>,
    api:       Arc<dyn HbnbApi>,
}

impl App {
    /// 設定から依存関係を組み立てる
    ///
    /// Cookie ジャー → セッション → Navigator → ゲートウェイ → API の順に構築する。
    fn build(config: ClientConfig, initial: Page) -> Self {
        let store = Arc::new(FileTokenStore::new(&config.session_file));
        let session = Session::new(store, config.cookie_name.clone(), config.cookie_max_age());
        let navigator = Arc::new(SessionNavigator::new(initial));

        let gateway = ApiGateway::new(
            &config.api_base_url,
            session.clone(),
            navigator.clone(),
            config.redirect_delay,
        );
        let api: Arc<dyn HbnbApi> = Arc::new(GatewayApi::new(gateway, config.route_profile));

        Self {
            config,
            session,
            navigator,
            api,
        }
    }

    /// コントローラのエラーを表示し、CLI のエラーに変換する
    ///
    /// 認証切れの場合はリダイレクトの完了を待ち、遷移先を表示する。
    async fn fail(&self, err: ControllerError, action: UserAction) -> anyhow::Error {
        if err.is_unauthorized() && self.navigator.pending_redirect().is_some() {
            let page = self.navigator.wait_for_redirect().await;
            eprintln!("Redirecting to {page}");
        }

        anyhow::anyhow!(err.user_message(action))
    }
}

/// CLI のエントリーポイント
///
/// 以下の順序で初期化を行う:
///
/// 1. 環境変数の読み込み（.env ファイル）
/// 2. トレーシングの初期化
/// 3. 引数と設定の読み込み
/// 4. 依存関係の組み立てとサブコマンドの実行
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    let tracing_config = TracingConfig::from_env("hbnb");
    let app_name = tracing_config.app_name.clone();
    init_tracing(tracing_config);
    let app_span = tracing::info_span!("app", app = %app_name);

    let cli = Cli::parse();
    let config = ClientConfig::from_env().context("設定の読み込みに失敗しました")?;
    tracing::debug!(
        api_base_url = %config.api_base_url,
        route_profile = %config.route_profile,
        "設定を読み込みました"
    );

    run(cli.command, config).instrument(app_span).await
}

async fn run(command: Command, config: ClientConfig) -> anyhow::Result<()> {
    match command {
        Command::Login { email, password } => {
            let app = App::build(config, Page::Login);
            let page = LoginPage::new(app.api.clone(), app.session.clone(), app.navigator.clone());

            if page.open().await == LoginState::AlreadyAuthenticated {
                println!("Already logged in. Run `hbnb logout` to switch accounts.");
                return Ok(());
            }

            match page.submit(&email, &password).await {
                Ok(()) => println!("Login successful."),
                Err(e) => return Err(app.fail(e, UserAction::Login).await),
            }
        }

        Command::Logout => {
            let app = App::build(config, Page::Index);
            if let Err(e) = logout(&app.session, app.navigator.as_ref()).await {
                return Err(anyhow::Error::new(e).context("ログアウトに失敗しました"));
            }
            println!("Logged out.");
        }

        Command::Places { max_price } => {
            let app = App::build(config, Page::Index);
            let mut page = IndexPage::new(app.api.clone(), app.session.clone(), app.navigator.clone());

            if let Err(e) = page.load().await {
                return Err(app.fail(e, UserAction::LoadPlaces).await);
            }
            print!("{}", view::render_listing(&page.apply_filter(max_price)));
        }

        Command::Place { id } => {
            let app = App::build(config, Page::Index);
            let page = PlaceDetailPage::new(app.api.clone(), app.session.clone(), app.navigator.clone());

            match page.load(&ResourceId::new(id)).await {
                Ok(detail) => print!("{}", view::render_place_detail(&detail)),
                Err(e) => return Err(app.fail(e, UserAction::LoadPlace).await),
            }
        }

        Command::Review {
            place_id,
            rating,
            text,
        } => {
            let place_id = ResourceId::new(place_id);
            let app = App::build(config, Page::Place(place_id.clone()));
            let page = AddReviewPage::new(
                app.api.clone(),
                app.session.clone(),
                app.navigator.clone(),
                app.config.review_min_length,
            );

            if let Err(e) = page.open(&place_id).await {
                return Err(app.fail(e, UserAction::SubmitReview).await);
            }
            match page.submit(&place_id, rating, &text).await {
                Ok(_) => println!("Review submitted successfully!"),
                Err(e) => return Err(app.fail(e, UserAction::SubmitReview).await),
            }
        }

        Command::Whoami => {
            let app = App::build(config, Page::Index);
            if app.session.is_authenticated().await {
                println!(
                    "Logged in (cookie `{}` in {})",
                    app.session.cookie_name(),
                    app.config.session_file.display()
                );
            } else {
                println!("Not logged in.");
            }
        }
    }

    Ok(())
}
