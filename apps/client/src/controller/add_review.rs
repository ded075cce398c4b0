//! # レビュー投稿
//!
//! 未ログインでは開けない。フォームの検証はネットワーク呼び出しの前に行う。

use std::sync::Arc;

use hbnb_domain::{
    ResourceId,
    review::{Review, ReviewForm},
};
use hbnb_infra::Session;

use super::ControllerError;
use crate::{
    api::HbnbApi,
    navigation::{Navigator, Page},
};

/// レビュー投稿画面
pub struct AddReviewPage {
    api:        Arc<dyn HbnbApi>,
    session:    Session,
    navigator:  Arc<dyn Navigator>,
    min_length: usize,
}

impl AddReviewPage {
    pub fn new(
        api: Arc<dyn HbnbApi>,
        session: Session,
        navigator: Arc<dyn Navigator>,
        min_length: usize,
    ) -> Self {
        Self {
            api,
            session,
            navigator,
            min_length,
        }
    }

    /// 投稿画面を開く
    ///
    /// 未ログインの場合は一覧画面へ遷移し、[`ControllerError::LoginRequired`] を返す。
    pub async fn open(&self, place_id: &ResourceId) -> Result<(), ControllerError> {
        if !self.session.is_authenticated().await {
            self.navigator.navigate(Page::Index);
            return Err(ControllerError::LoginRequired);
        }

        self.navigator.navigate(Page::AddReview(place_id.clone()));
        Ok(())
    }

    /// レビューを投稿する
    ///
    /// 成功したら宿泊先詳細へ遷移する。
    #[tracing::instrument(skip_all, fields(place_id = %place_id))]
    pub async fn submit(
        &self,
        place_id: &ResourceId,
        rating: Option<u8>,
        text: &str,
    ) -> Result<Review, ControllerError> {
        let form = ReviewForm::new(rating, text, self.min_length)?;

        let review = self.api.create_review(place_id, &form).await?;
        tracing::info!(rating = form.rating.value(), "レビューを投稿しました");

        self.navigator.navigate(Page::Place(place_id.clone()));
        Ok(review)
    }
}
