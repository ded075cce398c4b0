//! # 画面表示
//!
//! ページコントローラの表示内容を端末向けのテキストに整形する。

use std::fmt::Write as _;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use hbnb_domain::{
    place::Place,
    review::{MAX_RATING, Review},
};

use crate::controller::{ListingView, PlaceDetailView};

/// 一覧カードの説明文の最大文字数
pub const CARD_DESCRIPTION_LIMIT: usize = 120;

const NO_DESCRIPTION: &str = "No description available";
const DATE_NOT_AVAILABLE: &str = "Date not available";

/// 価格を `$1,234` 形式にする（未設定は `$0`）
///
/// 小数は 2 桁までに丸め、末尾の 0 は表示しない。
pub fn format_price(price: Option<f64>) -> String {
    let price = price.filter(|p| p.is_finite()).unwrap_or(0.0);
    let cents = (price.abs() * 100.0).round() as u64;
    let (whole, fraction) = (cents / 100, cents % 100);

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if price < 0.0 && cents > 0 { "-" } else { "" };
    match fraction {
        0 => format!("{sign}${grouped}"),
        f if f % 10 == 0 => format!("{sign}${grouped}.{}", f / 10),
        f => format!("{sign}${grouped}.{f:02}"),
    }
}

/// 文字数で切り詰め、切り詰めた場合は `...` を付ける
pub fn truncate(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(limit).collect();
    truncated.push_str("...");
    truncated
}

/// 日付を `January 5, 2025` 形式にする
///
/// RFC 3339・タイムゾーンなしの ISO 8601・`YYYY-MM-DD` を受け付ける。
/// 解釈できなければ元の文字列をそのまま返す。
pub fn format_date(date: Option<&str>) -> String {
    let Some(date) = date.map(str::trim).filter(|d| !d.is_empty()) else {
        return DATE_NOT_AVAILABLE.to_string();
    };

    let parsed = DateTime::parse_from_rfc3339(date)
        .map(|d| d.date_naive())
        .or_else(|_| NaiveDateTime::parse_from_str(date, "%Y-%m-%dT%H:%M:%S%.f").map(|d| d.date()))
        .or_else(|_| NaiveDate::parse_from_str(date, "%Y-%m-%d"));

    match parsed {
        Ok(day) => day.format("%B %-d, %Y").to_string(),
        Err(_) => date.to_string(),
    }
}

/// 評価を星で表す（5 段階）
pub fn stars(rating: u8) -> String {
    let filled = usize::from(rating.min(MAX_RATING));
    let empty = usize::from(MAX_RATING) - filled;
    format!("{}{}", "★".repeat(filled), "☆".repeat(empty))
}

/// 件数の表示
pub fn count_line(count: usize) -> String {
    if count == 1 {
        "1 place available".to_string()
    } else {
        format!("{count} places available")
    }
}

/// 一覧のカード
pub fn place_card(place: &Place) -> String {
    let description = place
        .description
        .as_deref()
        .filter(|d| !d.is_empty())
        .unwrap_or(NO_DESCRIPTION);

    format!(
        "{} ({} / night)\n  {}\n  id: {}",
        place.display_title(),
        format_price(place.price),
        truncate(description, CARD_DESCRIPTION_LIMIT),
        place.id
    )
}

/// レビューのカード
pub fn review_card(review: &Review) -> String {
    format!(
        "{}  {}\n  {}\n  {}",
        review.author(),
        stars(review.stars()),
        review.body(),
        format_date(review.created_at.as_deref())
    )
}

/// 一覧画面
pub fn render_listing(view: &ListingView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Max price: {}", view.filter.label());
    let _ = writeln!(out, "{}", count_line(view.places.len()));

    if view.places.is_empty() {
        let _ = writeln!(out, "\nNo places found.");
    }
    for place in &view.places {
        let _ = writeln!(out, "\n{}", place_card(place));
    }

    if !view.authenticated {
        let _ = writeln!(out, "\nLogin to write reviews: hbnb login");
    }
    out
}

/// 詳細画面
pub fn render_place_detail(view: &PlaceDetailView) -> String {
    let place = &view.place;
    let mut out = String::new();

    let _ = writeln!(out, "{}", place.display_title());
    let _ = writeln!(out, "{} / night", format_price(place.price));
    let _ = writeln!(out, "Host: {}", view.host);
    let _ = writeln!(
        out,
        "{}",
        place
            .description
            .as_deref()
            .filter(|d| !d.is_empty())
            .unwrap_or("No description available.")
    );
    let _ = writeln!(
        out,
        "Location: {}, {}",
        coordinate(place.latitude),
        coordinate(place.longitude)
    );

    let _ = writeln!(out, "\nAmenities:");
    if view.amenities.is_empty() {
        let _ = writeln!(out, "  No amenities listed");
    }
    for name in &view.amenities {
        let _ = writeln!(out, "  - {name}");
    }

    match &view.stats {
        Some(stats) => {
            let _ = writeln!(
                out,
                "\nReviews ({}, average {})",
                stats.count,
                stats.average_label()
            );
        }
        None => {
            let _ = writeln!(out, "\nReviews");
        }
    }
    if view.reviews.is_empty() {
        let _ = writeln!(out, "  No reviews yet. Be the first to review!");
    }
    for review in &view.reviews {
        let _ = writeln!(out, "\n{}", review_card(review));
    }

    if view.can_review {
        let _ = writeln!(
            out,
            "\nAdd a review: hbnb review {} --rating <1-5> --text <TEXT>",
            place.id
        );
    }
    out
}

fn coordinate(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| v.to_string())
}
