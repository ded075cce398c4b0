//! # 宿泊先一覧のキャッシュ
//!
//! 直近に取得した宿泊先一覧を保持し、再取得なしで価格フィルタを適用する。
//! 取得に成功するたびに丸ごと置き換え、差分のマージはしない。

use hbnb_domain::place::{Place, PriceFilter, filter_by_max_price};

/// 宿泊先一覧のキャッシュ
#[derive(Debug, Clone, Default)]
pub struct ListingCache {
    places: Vec<Place>,
}

impl ListingCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// 一覧を置き換える
    pub fn replace(&mut self, places: Vec<Place>) {
        self.places = places;
    }

    /// キャッシュ済みの一覧
    pub fn all(&self) -> &[Place] {
        &self.places
    }

    /// フィルタを適用した一覧（元の並び順を保つ）
    pub fn filtered(&self, filter: PriceFilter) -> Vec<Place> {
        filter_by_max_price(&self.places, filter)
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }
}
