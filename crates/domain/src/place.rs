//! # 宿泊先
//!
//! 宿泊先（Place）と設備（Amenity）の表現、および一覧の価格フィルタ。
//!
//! ## 価格フィルタ
//!
//! 一覧ページの選択肢は `All`, `$10`, `$50`, `$100` の 4 つ。
//! 上限価格以下の宿泊先だけを、元の並び順のまま残す。

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{DomainError, ResourceId, review::Review, serde_helpers::null_as_default};

/// タイトルが無い宿泊先の表示名
pub const UNNAMED_PLACE: &str = "Unnamed Place";

/// 宿泊先
///
/// バックエンドのペイロードをそのまま受け取る。`title` の代わりに `name`、
/// `price` の代わりに `price_per_night` を返す実装にも対応する。
/// `title` と `name` は両方届くことがあるため別々に保持し、表示時に
/// `title` を優先する。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub id:          ResourceId,
    #[serde(default)]
    pub title:       Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name:        Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "price_per_night")]
    pub price:       Option<f64>,
    #[serde(default)]
    pub latitude:    Option<f64>,
    #[serde(default)]
    pub longitude:   Option<f64>,
    #[serde(default)]
    pub owner_id:    Option<ResourceId>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub amenities:   Vec<AmenityRef>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub reviews:     Vec<Review>,
}

impl Place {
    /// 表示用タイトル
    ///
    /// `title`、`name` の順に空でない方を使う。
    pub fn display_title(&self) -> &str {
        [self.title.as_deref(), self.name.as_deref()]
            .into_iter()
            .flatten()
            .find(|t| !t.is_empty())
            .unwrap_or(UNNAMED_PLACE)
    }

    /// 1 泊あたりの価格（未設定は 0）
    pub fn nightly_price(&self) -> f64 {
        self.price.unwrap_or(0.0)
    }
}

/// 設備
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amenity {
    #[serde(default)]
    pub id:   Option<ResourceId>,
    pub name: String,
}

/// 宿泊先に含まれる設備の参照
///
/// バックエンドによって、設備オブジェクトを埋め込む場合と文字列だけを返す場合がある。
/// 文字列が設備名か識別子かはバックエンドのルート構成で決まる。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AmenityRef {
    /// 埋め込まれた設備
    Embedded(Amenity),
    /// 文字列（設備名または未解決の識別子）
    Id(ResourceId),
}

/// 一覧ページの価格フィルタ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriceFilter {
    /// 絞り込みなし
    #[default]
    All,
    /// 上限価格（この値以下を残す）
    Max(u32),
}

impl PriceFilter {
    /// 画面で選択できるフィルタ
    pub const CHOICES: [PriceFilter; 4] = [
        PriceFilter::All,
        PriceFilter::Max(10),
        PriceFilter::Max(50),
        PriceFilter::Max(100),
    ];

    /// 選択肢の値からフィルタを作成する
    ///
    /// `"all"`・空文字列・`"0"` は絞り込みなし。それ以外は正の整数のみ受け付ける。
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }

        match value.parse::<u32>() {
            Ok(0) => Ok(Self::All),
            Ok(max) => Ok(Self::Max(max)),
            Err(_) => Err(DomainError::validation(format!(
                "価格フィルタの値が不正です: {value}"
            ))),
        }
    }

    /// フィルタの表示ラベル
    pub fn label(&self) -> String {
        match self {
            Self::All => "All".to_string(),
            Self::Max(max) => format!("${max}"),
        }
    }

    /// 宿泊先がフィルタの条件を満たすか
    pub fn matches(&self, place: &Place) -> bool {
        match self {
            Self::All => true,
            Self::Max(max) => place.nightly_price() <= f64::from(*max),
        }
    }
}

impl FromStr for PriceFilter {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// 宿泊先の一覧を上限価格で絞り込む
///
/// 元の並び順を保つ。`PriceFilter::All` の場合は一覧をそのまま返す。
pub fn filter_by_max_price(places: &[Place], filter: PriceFilter) -> Vec<Place> {
    places
        .iter()
        .filter(|place| filter.matches(place))
        .cloned()
        .collect()
}
