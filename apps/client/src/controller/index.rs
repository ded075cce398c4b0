//! # 宿泊先一覧
//!
//! 一覧を取得してキャッシュし、価格フィルタはキャッシュに対して適用する。

use std::sync::Arc;

use hbnb_domain::place::{Place, PriceFilter};
use hbnb_infra::Session;

use super::ControllerError;
use crate::{
    api::HbnbApi,
    listing_cache::ListingCache,
    navigation::{Navigator, Page},
};

/// 一覧画面の表示内容
#[derive(Debug, Clone, PartialEq)]
pub struct ListingView {
    /// フィルタ適用後の宿泊先
    pub places:        Vec<Place>,
    /// キャッシュ済みの全件数
    pub total:         usize,
    /// 適用中のフィルタ
    pub filter:        PriceFilter,
    /// ログイン済みか（ログインリンクの表示切り替え）
    pub authenticated: bool,
}

/// 宿泊先一覧画面
pub struct IndexPage {
    api:           Arc<dyn HbnbApi>,
    session:       Session,
    navigator:     Arc<dyn Navigator>,
    cache:         ListingCache,
    filter:        PriceFilter,
    authenticated: bool,
}

impl IndexPage {
    pub fn new(api: Arc<dyn HbnbApi>, session: Session, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            api,
            session,
            navigator,
            cache: ListingCache::new(),
            filter: PriceFilter::All,
            authenticated: false,
        }
    }

    /// 一覧を取得してキャッシュを置き換える
    ///
    /// 失敗した場合、キャッシュは以前の内容のまま残る。
    #[tracing::instrument(skip_all)]
    pub async fn load(&mut self) -> Result<ListingView, ControllerError> {
        self.navigator.navigate(Page::Index);
        self.authenticated = self.session.is_authenticated().await;

        let places = self.api.list_places().await?;
        tracing::debug!(count = places.len(), "宿泊先一覧を取得しました");
        self.cache.replace(places);

        Ok(self.view())
    }

    /// 価格フィルタを適用する（再取得はしない）
    pub fn apply_filter(&mut self, filter: PriceFilter) -> ListingView {
        self.filter = filter;
        self.view()
    }

    pub fn cache(&self) -> &ListingCache {
        &self.cache
    }

    fn view(&self) -> ListingView {
        ListingView {
            places:        self.cache.filtered(self.filter),
            total:         self.cache.len(),
            filter:        self.filter,
            authenticated: self.authenticated,
        }
    }
}
