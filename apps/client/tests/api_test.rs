//! GatewayApi とページコントローラの統合テスト
//!
//! モックサーバーをバックエンドとして、ログインからレビュー投稿までの流れと
//! ルート構成ごとのエンドポイントを検証する。
//!
//! 実行方法:
//! ```bash
//! cargo test -p hbnb-client --test api_test
//! ```

mod common;

use std::sync::Arc;

use common::{api, memory_session, navigator, received_authorization, session_with_token};
use hbnb_client::{
    api::{HbnbApi, RouteProfile},
    controller::{AddReviewPage, ControllerError, IndexPage, LoginPage, PlaceDetailPage, UserAction},
    navigation::{Navigator, Page},
};
use hbnb_domain::{
    ResourceId,
    place::PriceFilter,
    review::{DEFAULT_REVIEW_MIN_LENGTH, ReviewForm},
};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, header, method, path, path_regex},
};

fn place_id() -> ResourceId {
    ResourceId::new("p1")
}

// =============================================================================
// ログインから認証付きリクエストまで
// =============================================================================

#[tokio::test]
async fn test_ログインで受け取ったトークンを以降のリクエストに付与する() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({"email": "user@example.com", "password": "secret"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "abc"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/places/p1"))
        .and(header("authorization", "Bearer abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "p1",
            "title": "Loft",
            "reviews": [{"text": "Great", "rating": 5}],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = memory_session();
    let navigator = navigator();
    let api: Arc<dyn HbnbApi> = Arc::new(api(
        &server,
        session.clone(),
        navigator.clone(),
        RouteProfile::Nested,
    ));
    let login = LoginPage::new(api.clone(), session.clone(), navigator.clone());
    let detail = PlaceDetailPage::new(api, session.clone(), navigator.clone());

    // Act
    login.submit("user@example.com", "secret").await.unwrap();
    let view = detail.load(&place_id()).await.unwrap();

    // Assert
    assert_eq!(session.token().await.unwrap().as_str(), "abc");
    assert_eq!(view.place.display_title(), "Loft");
    assert!(view.can_review);
    assert_eq!(
        received_authorization(&server).await,
        vec![None, Some("Bearer abc".to_string())]
    );
}

#[tokio::test]
async fn test_ログイン失敗は資格情報のメッセージになりリダイレクトしない() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "Invalid credentials"})))
        .mount(&server)
        .await;
    let session = memory_session();
    let navigator = navigator();
    let api = Arc::new(api(&server, session.clone(), navigator.clone(), RouteProfile::Nested));
    let login = LoginPage::new(api, session.clone(), navigator.clone());
    login.open().await;

    let err = login.submit("user@example.com", "wrong").await.unwrap_err();

    assert_eq!(
        err.user_message(UserAction::Login),
        "メールアドレスまたはパスワードが正しくありません"
    );
    assert_eq!(navigator.pending_redirect(), None);
    assert_eq!(navigator.current_page(), Page::Login);
}

// =============================================================================
// 一覧
// =============================================================================

#[tokio::test]
async fn test_一覧は認証ヘッダーなしで取得しフィルタは再取得しない() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/places"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "a", "title": "Loft", "price": 120},
            {"id": "b", "title": "Cabin", "price": 45},
        ])))
        .expect(1)
        .mount(&server)
        .await;
    let session = session_with_token("abc").await;
    let navigator = navigator();
    let api = Arc::new(api(&server, session.clone(), navigator.clone(), RouteProfile::Nested));
    let mut page = IndexPage::new(api, session, navigator);

    let view = page.load().await.unwrap();
    assert_eq!(view.places.len(), 2);

    let view = page.apply_filter(PriceFilter::Max(50));
    assert_eq!(view.places.len(), 1);
    assert_eq!(view.places[0].id.as_str(), "b");

    assert_eq!(received_authorization(&server).await, vec![None]);
}

#[tokio::test]
async fn test_フラット構成の一覧は末尾スラッシュ付きのパスを使う() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/places/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;
    let api = api(&server, memory_session(), navigator(), RouteProfile::Flat);

    let places = api.list_places().await.unwrap();

    assert!(places.is_empty());
}

#[tokio::test]
async fn test_titleとnameが混在する一覧も全件取得できる() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/places"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "a", "title": "Loft"},
            {"id": "b", "title": "Cabin", "name": "Cabin"},
            {"id": "c", "name": "Barn", "reviews": [{"text": "Cozy", "comment": "Cozy"}]},
        ])))
        .mount(&server)
        .await;
    let api = api(&server, memory_session(), navigator(), RouteProfile::Nested);

    // Act
    let places = api.list_places().await.unwrap();

    // Assert
    let titles: Vec<&str> = places.iter().map(|p| p.display_title()).collect();
    assert_eq!(titles, vec!["Loft", "Cabin", "Barn"]);
    assert_eq!(places[2].reviews[0].body(), "Cozy");
}

// =============================================================================
// 詳細
// =============================================================================

#[tokio::test]
async fn test_フラット構成の詳細はホストと設備とレビューを解決する() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/places/p1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "p1",
            "title": "Loft",
            "price": 80,
            "owner_id": "u1",
            "amenities": ["a1", "a2"],
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/u1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"first_name": "Ada", "last_name": "Lovelace"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/amenities/a1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "a1", "name": "Wi-Fi"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/amenities/a2"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Amenity not found"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/reviews/places/p1/reviews"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"text": "Great stay", "rating": 5, "user_name": "Grace"},
            {"text": "Decent", "rating": 3},
        ])))
        .mount(&server)
        .await;
    let session = memory_session();
    let navigator = navigator();
    let api = Arc::new(api(&server, session.clone(), navigator.clone(), RouteProfile::Flat));
    let page = PlaceDetailPage::new(api, session, navigator.clone());

    // Act
    let view = page.load(&place_id()).await.unwrap();

    // Assert
    assert_eq!(view.host, "Ada Lovelace");
    assert_eq!(view.amenities, vec!["Wi-Fi"]);
    assert_eq!(view.reviews.len(), 2);
    assert_eq!(view.stats.unwrap().average_label(), "4.0");
    assert!(!view.can_review);
    assert_eq!(navigator.current_page(), Page::Place(place_id()));
}

#[tokio::test]
async fn test_ネスト構成では設備の文字列を設備名として扱う() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/places/p1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "p1",
            "amenities": ["Wi-Fi", {"id": "a2", "name": "Pool"}],
            "reviews": [{"text": "Nice", "rating": 4}],
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex("^/amenities/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let session = memory_session();
    let navigator = navigator();
    let api = Arc::new(api(&server, session.clone(), navigator.clone(), RouteProfile::Nested));
    let page = PlaceDetailPage::new(api, session, navigator);

    let view = page.load(&place_id()).await.unwrap();

    assert_eq!(view.amenities, vec!["Wi-Fi", "Pool"]);
}

#[tokio::test]
async fn test_フラット構成のレビュー一覧パス() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/reviews/places/p1/reviews"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"text": "Nice", "rating": 4}])))
        .expect(1)
        .mount(&server)
        .await;
    let api = api(&server, memory_session(), navigator(), RouteProfile::Flat);

    let reviews = api.list_reviews(&place_id()).await.unwrap();

    assert_eq!(reviews.len(), 1);
}

#[tokio::test]
async fn test_期限切れのセッションで詳細を開くとログイン画面へリダイレクトする() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/places/p1"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    let session = session_with_token("stale").await;
    let navigator = navigator();
    let api = Arc::new(api(&server, session.clone(), navigator.clone(), RouteProfile::Nested));
    let page = PlaceDetailPage::new(api, session.clone(), navigator.clone());

    let err = page.load(&place_id()).await.unwrap_err();

    assert!(err.is_unauthorized());
    assert!(!session.is_authenticated().await);
    assert_eq!(navigator.wait_for_redirect().await, Page::Login);
}

// =============================================================================
// レビュー投稿
// =============================================================================

#[tokio::test]
async fn test_ネスト構成のレビュー投稿() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/places/p1/reviews"))
        .and(header("authorization", "Bearer abc"))
        .and(body_json(json!({"text": "Lovely place, would return", "rating": 4})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "r1",
            "text": "Lovely place, would return",
            "rating": 4,
        })))
        .expect(1)
        .mount(&server)
        .await;
    let session = session_with_token("abc").await;
    let navigator = navigator();
    let api = Arc::new(api(&server, session.clone(), navigator.clone(), RouteProfile::Nested));
    let page = AddReviewPage::new(api, session, navigator.clone(), DEFAULT_REVIEW_MIN_LENGTH);

    // Act
    page.open(&place_id()).await.unwrap();
    let review = page
        .submit(&place_id(), Some(4), "Lovely place, would return")
        .await
        .unwrap();

    // Assert
    assert_eq!(review.rating, Some(4));
    assert_eq!(navigator.current_page(), Page::Place(place_id()));
}

#[tokio::test]
async fn test_フラット構成のレビュー投稿はplace_idをボディに含める() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/reviews/"))
        .and(header("authorization", "Bearer abc"))
        .and(body_json(json!({"place_id": "p1", "rating": 5, "text": "Spotless and quiet"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"text": "Spotless and quiet", "rating": 5})))
        .expect(1)
        .mount(&server)
        .await;
    let api = api(
        &server,
        session_with_token("abc").await,
        navigator(),
        RouteProfile::Flat,
    );
    let form = ReviewForm::new(Some(5), "Spotless and quiet", DEFAULT_REVIEW_MIN_LENGTH).unwrap();

    let review = api.create_review(&place_id(), &form).await.unwrap();

    assert_eq!(review.body(), "Spotless and quiet");
}

#[tokio::test]
async fn test_短いレビューはリクエストを送らずに拒否する() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;
    let session = session_with_token("abc").await;
    let navigator = navigator();
    let api = Arc::new(api(&server, session.clone(), navigator.clone(), RouteProfile::Nested));
    let page = AddReviewPage::new(api, session, navigator, DEFAULT_REVIEW_MIN_LENGTH);

    let err = page.submit(&place_id(), Some(5), "Too short").await.unwrap_err();

    assert!(matches!(err, ControllerError::Validation(_)));
}

#[tokio::test]
async fn test_未ログインではレビュー画面を開けない() {
    let server = MockServer::start().await;
    let navigator = navigator();
    let api = Arc::new(api(&server, memory_session(), navigator.clone(), RouteProfile::Nested));
    let page = AddReviewPage::new(api, memory_session(), navigator.clone(), DEFAULT_REVIEW_MIN_LENGTH);

    let err = page.open(&place_id()).await.unwrap_err();

    assert_eq!(
        err.user_message(UserAction::SubmitReview),
        "レビューを投稿するにはログインしてください"
    );
    assert_eq!(navigator.current_page(), Page::Index);
    assert_eq!(received_authorization(&server).await, Vec::<Option<String>>::new());
}
