//! # 宿泊先詳細
//!
//! 宿泊先を取得し、ホスト名・設備名・レビューを解決して表示内容を組み立てる。
//!
//! ## 解決の方針
//!
//! | 項目 | 取得元 | 失敗時 |
//! |------|--------|--------|
//! | ホスト | `GET /users/{owner_id}` | [`HOST_UNAVAILABLE`] を表示 |
//! | 設備 | [`HbnbApi::amenity_name`]（ルート構成による） | その設備を省く |
//! | レビュー | 埋め込みがあればそれ、なければレビュー一覧 API | エラーを返す |

use std::sync::Arc;

use hbnb_domain::{
    ResourceId,
    place::Place,
    review::{Review, ReviewStats},
};
use hbnb_infra::Session;

use super::ControllerError;
use crate::{
    api::HbnbApi,
    navigation::{Navigator, Page},
};

/// ホスト情報を取得できない場合の表示
pub const HOST_UNAVAILABLE: &str = "Host information not available";

/// 詳細画面の表示内容
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceDetailView {
    pub place:      Place,
    /// ホストの表示名
    pub host:       String,
    /// 解決できた設備名（元の順序）
    pub amenities:  Vec<String>,
    pub reviews:    Vec<Review>,
    /// レビューがなければ `None`
    pub stats:      Option<ReviewStats>,
    /// レビュー投稿フォームを表示するか（ログイン済みなら表示）
    pub can_review: bool,
}

/// 宿泊先詳細画面
pub struct PlaceDetailPage {
    api:       Arc<dyn HbnbApi>,
    session:   Session,
    navigator: Arc<dyn Navigator>,
}

impl PlaceDetailPage {
    pub fn new(api: Arc<dyn HbnbApi>, session: Session, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            api,
            session,
            navigator,
        }
    }

    /// 宿泊先詳細を読み込む
    #[tracing::instrument(skip_all, fields(place_id = %place_id))]
    pub async fn load(&self, place_id: &ResourceId) -> Result<PlaceDetailView, ControllerError> {
        self.navigator.navigate(Page::Place(place_id.clone()));

        let place = self.api.get_place(place_id).await?;
        let host = self.resolve_host(&place).await;
        let amenities = self.resolve_amenities(&place).await;

        let reviews = if place.reviews.is_empty() {
            self.api.list_reviews(place_id).await?
        } else {
            place.reviews.clone()
        };

        Ok(PlaceDetailView {
            host,
            amenities,
            stats: ReviewStats::from_reviews(&reviews),
            reviews,
            can_review: self.session.is_authenticated().await,
            place,
        })
    }

    async fn resolve_host(&self, place: &Place) -> String {
        let Some(owner_id) = &place.owner_id else {
            return HOST_UNAVAILABLE.to_string();
        };

        match self.api.get_user(owner_id).await {
            Ok(user) => user.display_name(),
            Err(e) => {
                tracing::warn!(owner_id = %owner_id, "ホスト情報の取得に失敗: {}", e);
                HOST_UNAVAILABLE.to_string()
            }
        }
    }

    /// 設備名を解決する
    ///
    /// 取得に失敗した設備は省く（詳細画面で唯一握りつぶす失敗）。
    async fn resolve_amenities(&self, place: &Place) -> Vec<String> {
        let mut names = Vec::with_capacity(place.amenities.len());

        for amenity in &place.amenities {
            match self.api.amenity_name(amenity).await {
                Ok(name) => names.push(name),
                Err(e) => {
                    tracing::warn!(amenity = ?amenity, "設備の取得に失敗したため省略: {}", e);
                }
            }
        }

        names
    }
}
