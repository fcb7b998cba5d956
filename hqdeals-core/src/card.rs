// Display formatting for a single offer card

use chrono::{Local, TimeZone};
use hqdeals_fetch::{Link, Offer, Price};
use serde::Serialize;

pub const STAR_COUNT: usize = 5;
pub const FILLED_STAR: char = '★';
pub const EMPTY_STAR: char = '☆';

/// Discount in whole percent, `round(100 * (original - current) / original)`.
/// Prices without a positive original have no discount.
pub fn discount_percent(price: &Price) -> i64 {
    if price.original.is_nan() || price.original <= 0.0 || !price.current.is_finite() {
        return 0;
    }
    (100.0 * (price.original - price.current) / price.original).round() as i64
}

/// `-25%` for a reduction, `+5%` when the price went up.
pub fn format_discount(price: &Price) -> String {
    let percent = discount_percent(price);
    if percent < 0 {
        format!("+{}%", -percent)
    } else {
        format!("-{}%", percent)
    }
}

pub fn filled_stars(rating: f64) -> usize {
    if !rating.is_finite() {
        return 0;
    }
    rating.round().clamp(0.0, STAR_COUNT as f64) as usize
}

pub fn star_strip(rating: f64) -> String {
    let filled = filled_stars(rating);
    std::iter::repeat_n(FILLED_STAR, filled)
        .chain(std::iter::repeat_n(EMPTY_STAR, STAR_COUNT - filled))
        .collect()
}

pub fn format_price(amount: f64) -> String {
    format!("€{:.2}", amount)
}

pub fn format_rating(rating: f64) -> String {
    format!("{:.1}", rating)
}

pub fn format_review_count(count: u64) -> String {
    format!("({})", count)
}

pub fn link_label(link: &Link) -> String {
    format!("Auf {} ansehen", link.rel)
}

/// Manifest timestamp (epoch millis) as local date and time.
pub fn format_timestamp(millis: i64) -> String {
    match Local.timestamp_millis_opt(millis).single() {
        Some(datetime) => datetime.format("%d.%m.%Y, %H:%M:%S").to_string(),
        None => "-".to_string(),
    }
}

/// An offer with every display field already formatted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OfferCard {
    pub asin: String,
    pub title: String,
    pub image: String,
    pub price: String,
    pub original_price: String,
    pub discount: String,
    pub discount_percent: i64,
    pub rating: String,
    pub stars: String,
    pub stars_filled: usize,
    pub stars_empty: usize,
    pub review_count: String,
    pub link: String,
    pub link_label: String,
}

impl From<&Offer> for OfferCard {
    fn from(offer: &Offer) -> Self {
        let stars_filled = filled_stars(offer.reviews.rating);
        Self {
            asin: offer.asin.clone(),
            title: offer.title.clone(),
            image: offer.image.clone(),
            price: format_price(offer.price.current),
            original_price: format_price(offer.price.original),
            discount: format_discount(&offer.price),
            discount_percent: discount_percent(&offer.price),
            rating: format_rating(offer.reviews.rating),
            stars: star_strip(offer.reviews.rating),
            stars_filled,
            stars_empty: STAR_COUNT - stars_filled,
            review_count: format_review_count(offer.reviews.count),
            link: offer.link.href.clone(),
            link_label: link_label(&offer.link),
        }
    }
}
