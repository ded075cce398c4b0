//! # レビュー
//!
//! レビューの表現、レビュー投稿フォームの検証、評価の集計。
//!
//! ## 投稿フォームの検証順序
//!
//! 1. 評価（1〜5）が選択されていること
//! 2. 本文が最小文字数以上であること（前後の空白を除いて数える）
//!
//! どちらもネットワーク呼び出しの前に判定する。

use serde::{Deserialize, Serialize};

use crate::{DomainError, ResourceId};

/// レビュー本文の最小文字数（デフォルト）
pub const DEFAULT_REVIEW_MIN_LENGTH: usize = 10;

/// 評価の最大値
pub const MAX_RATING: u8 = 5;

/// レビュー
///
/// 本文は `text` または `comment` で届く。両方届いた場合は `text` を優先する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    #[serde(default)]
    pub id:         Option<ResourceId>,
    #[serde(default)]
    pub text:       Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment:    Option<String>,
    #[serde(default)]
    pub rating:     Option<u8>,
    #[serde(default)]
    pub user_id:    Option<ResourceId>,
    #[serde(default)]
    pub user_name:  Option<String>,
    #[serde(default)]
    pub place_id:   Option<ResourceId>,
    #[serde(default, alias = "date")]
    pub created_at: Option<String>,
}

impl Review {
    /// 表示用の本文（`text`、`comment` の順に空でない方。どちらもなければ空文字）
    pub fn body(&self) -> &str {
        [self.text.as_deref(), self.comment.as_deref()]
            .into_iter()
            .flatten()
            .find(|t| !t.is_empty())
            .unwrap_or_default()
    }

    /// 表示用の投稿者名
    ///
    /// 名前がなければユーザー ID、それもなければ `Anonymous`。
    pub fn author(&self) -> String {
        if let Some(name) = self.user_name.as_deref().filter(|n| !n.is_empty()) {
            return name.to_string();
        }
        match &self.user_id {
            Some(id) => format!("User {id}"),
            None => "Anonymous".to_string(),
        }
    }

    /// 評価（未設定は 0、上限は 5 に丸める）
    pub fn stars(&self) -> u8 {
        self.rating.unwrap_or(0).min(MAX_RATING)
    }
}

/// 評価（1〜5）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    /// 評価を作成する
    ///
    /// 1〜5 以外はバリデーションエラー。
    pub fn new(value: u8) -> Result<Self, DomainError> {
        if (1..=MAX_RATING).contains(&value) {
            Ok(Self(value))
        } else {
            Err(DomainError::validation(format!(
                "評価は 1〜{MAX_RATING} で指定してください"
            )))
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    /// 評価の呼び名
    pub fn label(&self) -> &'static str {
        match self.0 {
            1 => "Poor",
            2 => "Fair",
            3 => "Good",
            4 => "Very Good",
            _ => "Excellent",
        }
    }
}

impl TryFrom<u8> for Rating {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

/// レビュー本文
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ReviewText(String);

impl ReviewText {
    /// レビュー本文を作成する
    ///
    /// 前後の空白を除いたうえで `min_length` 文字以上であること。
    pub fn new(value: impl Into<String>, min_length: usize) -> Result<Self, DomainError> {
        let value = value.into().trim().to_string();

        if value.chars().count() < min_length {
            return Err(DomainError::validation(format!(
                "レビューは {min_length} 文字以上で入力してください"
            )));
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// 検証済みのレビュー投稿フォーム
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewForm {
    pub rating: Rating,
    pub text:   ReviewText,
}

impl ReviewForm {
    /// フォーム入力を検証する
    ///
    /// 評価の未選択を本文の長さより先に判定する。
    pub fn new(rating: Option<u8>, text: &str, min_length: usize) -> Result<Self, DomainError> {
        let rating = rating
            .ok_or_else(|| DomainError::validation("評価を選択してください"))
            .and_then(Rating::new)?;
        let text = ReviewText::new(text, min_length)?;

        Ok(Self { rating, text })
    }
}

/// レビューの集計
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReviewStats {
    pub count:   usize,
    pub average: f64,
}

impl ReviewStats {
    /// レビュー一覧から集計する（空なら `None`）
    ///
    /// 評価のないレビューは 0 として平均に含める。
    pub fn from_reviews(reviews: &[Review]) -> Option<Self> {
        if reviews.is_empty() {
            return None;
        }

        let total: u32 = reviews
            .iter()
            .map(|r| u32::from(r.rating.unwrap_or(0)))
            .sum();

        Some(Self {
            count:   reviews.len(),
            average: f64::from(total) / reviews.len() as f64,
        })
    }

    /// 小数 1 桁の平均評価
    pub fn average_label(&self) -> String {
        format!("{:.1}", self.average)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn review(rating: Option<u8>) -> Review {
        Review {
            id: None,
            text: Some("Great stay".to_string()),
            comment: None,
            rating,
            user_id: None,
            user_name: None,
            place_id: None,
            created_at: None,
        }
    }

    #[rstest]
    #[case(1, "Poor")]
    #[case(2, "Fair")]
    #[case(3, "Good")]
    #[case(4, "Very Good")]
    #[case(5, "Excellent")]
    fn test_評価のラベル(#[case] value: u8, #[case] label: &str) {
        assert_eq!(Rating::new(value).unwrap().label(), label);
    }

    #[rstest]
    #[case(0)]
    #[case(6)]
    #[case(255)]
    fn test_範囲外の評価はエラー(#[case] value: u8) {
        assert!(Rating::new(value).is_err());
    }

    #[test]
    fn test_短いレビューはエラー() {
        let result = ReviewText::new("too short", DEFAULT_REVIEW_MIN_LENGTH);

        assert_eq!(
            result,
            Err(DomainError::Validation(
                "レビューは 10 文字以上で入力してください".to_string()
            ))
        );
    }

    #[test]
    fn test_前後の空白は文字数に含めない() {
        assert!(ReviewText::new("   short    ", 10).is_err());

        let text = ReviewText::new("  日本語のレビュー本文です  ", 10).unwrap();
        assert_eq!(text.as_str(), "日本語のレビュー本文です");
    }

    #[test]
    fn test_評価未選択は本文より先に判定する() {
        let result = ReviewForm::new(None, "x", DEFAULT_REVIEW_MIN_LENGTH);

        assert_eq!(
            result,
            Err(DomainError::Validation("評価を選択してください".to_string()))
        );
    }

    #[test]
    fn test_正しいフォームは検証を通る() {
        let form = ReviewForm::new(Some(4), "Lovely place, would return", 10).unwrap();

        assert_eq!(form.rating.value(), 4);
        assert_eq!(form.text.as_str(), "Lovely place, would return");
    }

    #[test]
    fn test_集計は小数1桁の平均を返す() {
        let reviews = vec![review(Some(5)), review(Some(4)), review(Some(4))];

        let stats = ReviewStats::from_reviews(&reviews).unwrap();

        assert_eq!(stats.count, 3);
        assert_eq!(stats.average_label(), "4.3");
    }

    #[test]
    fn test_評価なしは0として集計する() {
        let stats = ReviewStats::from_reviews(&[review(None), review(Some(3))]).unwrap();

        assert_eq!(stats.average_label(), "1.5");
    }

    #[test]
    fn test_空の一覧は集計しない() {
        assert_eq!(ReviewStats::from_reviews(&[]), None);
    }

    #[test]
    fn test_commentとdateの別名を受け付ける() {
        let json = r#"{"comment": "Nice", "rating": 4, "user_id": 9, "date": "2025-01-05"}"#;

        let review: Review = serde_json::from_str(json).unwrap();

        assert_eq!(review.body(), "Nice");
        assert_eq!(review.created_at.as_deref(), Some("2025-01-05"));
        assert_eq!(review.author(), "User 9");
    }

    #[test]
    fn test_textとcommentが両方あればtextを優先する() {
        let json = r#"{"text": "Quiet street", "comment": "Old note", "rating": 5}"#;

        let review: Review = serde_json::from_str(json).unwrap();

        assert_eq!(review.body(), "Quiet street");
    }

    #[test]
    fn test_本文がなければ空文字() {
        assert_eq!(serde_json::from_str::<Review>("{}").unwrap().body(), "");
    }

    #[test]
    fn test_星の数は5に丸める() {
        assert_eq!(review(Some(9)).stars(), 5);
        assert_eq!(review(None).stars(), 0);
    }

    #[test]
    fn test_評価は数値でシリアライズされる() {
        let rating = Rating::new(3).unwrap();

        assert_eq!(serde_json::to_value(rating).unwrap(), serde_json::json!(3));
    }
}
