//! # バックエンド API
//!
//! ゲートウェイの上に型付きのバックエンド呼び出しを提供する。
//!
//! ## ルート構成
//!
//! バックエンドの実装によってレビューのルートが異なるため、[`RouteProfile`] で切り替える。
//!
//! | 操作 | `nested` | `flat` |
//! |------|----------|--------|
//! | 一覧 | `GET /places` | `GET /places/` |
//! | レビュー一覧 | `GET /places/{id}/reviews` | `GET /reviews/places/{id}/reviews` |
//! | レビュー投稿 | `POST /places/{id}/reviews` | `POST /reviews/`（ボディに `place_id`） |
//! | 設備の文字列 | 設備名 | 識別子（`GET /amenities/{id}` で取得） |
//!
//! ログイン・一覧・設備の取得は認証ヘッダーを付与しない。

use async_trait::async_trait;
use hbnb_domain::{
    ResourceId,
    place::{Amenity, AmenityRef, Place},
    review::{Review, ReviewForm},
    user::{LoginForm, User},
};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

use crate::gateway::{ApiGateway, GatewayError, RequestOptions};

/// バックエンドのルート構成
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum RouteProfile {
    /// レビューを宿泊先の下にネストする構成
    #[default]
    Nested,
    /// レビューを独立したリソースとして扱う構成
    Flat,
}

impl RouteProfile {
    fn places_path(self) -> &'static str {
        match self {
            Self::Nested => "/places",
            Self::Flat => "/places/",
        }
    }

    fn place_reviews_path(self, place_id: &ResourceId) -> String {
        match self {
            Self::Nested => format!("/places/{place_id}/reviews"),
            Self::Flat => format!("/reviews/places/{place_id}/reviews"),
        }
    }
}

/// ログインのレスポンス
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub access_token: Option<String>,
}

/// ネスト構成のレビュー投稿ボディ
#[derive(Debug, Serialize)]
struct NestedReviewBody<'a> {
    text:   &'a str,
    rating: u8,
}

/// フラット構成のレビュー投稿ボディ
#[derive(Debug, Serialize)]
struct FlatReviewBody<'a> {
    place_id: &'a ResourceId,
    rating:   u8,
    text:     &'a str,
}

/// バックエンド API トレイト
///
/// ページコントローラはこのトレイトを通じてバックエンドを呼び出す。
/// テストではスタブ実装に差し替える。
#[async_trait]
pub trait HbnbApi: Send + Sync {
    /// ログインする（認証ヘッダーなし）
    async fn login(&self, form: &LoginForm) -> Result<LoginResponse, GatewayError>;

    /// 宿泊先の一覧を取得する
    async fn list_places(&self) -> Result<Vec<Place>, GatewayError>;

    /// 宿泊先の詳細を取得する
    async fn get_place(&self, id: &ResourceId) -> Result<Place, GatewayError>;

    /// 宿泊先のレビュー一覧を取得する
    async fn list_reviews(&self, place_id: &ResourceId) -> Result<Vec<Review>, GatewayError>;

    /// レビューを投稿する（要認証）
    async fn create_review(
        &self,
        place_id: &ResourceId,
        form: &ReviewForm,
    ) -> Result<Review, GatewayError>;

    /// ユーザー（ホスト）を取得する
    async fn get_user(&self, id: &ResourceId) -> Result<User, GatewayError>;

    /// 設備を取得する
    async fn get_amenity(&self, id: &ResourceId) -> Result<Amenity, GatewayError>;

    /// 宿泊先に含まれる設備の参照を設備名にする
    ///
    /// 埋め込みはそのまま、文字列は識別子として [`HbnbApi::get_amenity`] で取得する。
    async fn amenity_name(&self, amenity: &AmenityRef) -> Result<String, GatewayError> {
        match amenity {
            AmenityRef::Embedded(amenity) => Ok(amenity.name.clone()),
            AmenityRef::Id(id) => Ok(self.get_amenity(id).await?.name),
        }
    }
}

/// ゲートウェイ経由の API 実装
#[derive(Debug, Clone)]
pub struct GatewayApi {
    gateway: ApiGateway,
    profile: RouteProfile,
}

impl GatewayApi {
    pub fn new(gateway: ApiGateway, profile: RouteProfile) -> Self {
        Self { gateway, profile }
    }
}

#[async_trait]
impl HbnbApi for GatewayApi {
    async fn login(&self, form: &LoginForm) -> Result<LoginResponse, GatewayError> {
        let options = RequestOptions::json(form)?.skip_auth();
        self.gateway.request_json("/auth/login", options).await
    }

    async fn list_places(&self) -> Result<Vec<Place>, GatewayError> {
        self.gateway
            .request_json(self.profile.places_path(), RequestOptions::get().skip_auth())
            .await
    }

    async fn get_place(&self, id: &ResourceId) -> Result<Place, GatewayError> {
        self.gateway
            .request_json(&format!("/places/{id}"), RequestOptions::get())
            .await
    }

    async fn list_reviews(&self, place_id: &ResourceId) -> Result<Vec<Review>, GatewayError> {
        self.gateway
            .request_json(&self.profile.place_reviews_path(place_id), RequestOptions::get())
            .await
    }

    async fn create_review(
        &self,
        place_id: &ResourceId,
        form: &ReviewForm,
    ) -> Result<Review, GatewayError> {
        let text = form.text.as_str();
        let rating = form.rating.value();

        let (endpoint, options) = match self.profile {
            RouteProfile::Nested => (
                self.profile.place_reviews_path(place_id),
                RequestOptions::json(&NestedReviewBody { text, rating })?,
            ),
            RouteProfile::Flat => (
                "/reviews/".to_string(),
                RequestOptions::json(&FlatReviewBody {
                    place_id,
                    rating,
                    text,
                })?,
            ),
        };

        self.gateway.request_json(&endpoint, options).await
    }

    async fn get_user(&self, id: &ResourceId) -> Result<User, GatewayError> {
        self.gateway
            .request_json(&format!("/users/{id}"), RequestOptions::get())
            .await
    }

    async fn get_amenity(&self, id: &ResourceId) -> Result<Amenity, GatewayError> {
        self.gateway
            .request_json(&format!("/amenities/{id}"), RequestOptions::get().skip_auth())
            .await
    }

    /// ネスト構成のバックエンドは文字列で設備名を返すため、取得しない
    async fn amenity_name(&self, amenity: &AmenityRef) -> Result<String, GatewayError> {
        match (self.profile, amenity) {
            (_, AmenityRef::Embedded(amenity)) => Ok(amenity.name.clone()),
            (RouteProfile::Nested, AmenityRef::Id(name)) => Ok(name.to_string()),
            (RouteProfile::Flat, AmenityRef::Id(id)) => Ok(self.get_amenity(id).await?.name),
        }
    }
}
