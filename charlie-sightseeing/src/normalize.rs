//! The transform from raw provider records to the tours Charlie returns.

use std::cmp::Ordering;

use charlie_settings::ListingSettings;
use serde_json::Value;

use crate::domain::{
    is_truthy, NormalizedTour, RawTourRecord, TourPrice, DEFAULT_CURRENCY, MISSING_TEXT,
};

/// Post-processing applied to a normalized list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Sort by descending rating.
    pub rank: bool,
    /// Keep at most this many tours, after sorting.
    pub limit: Option<usize>,
}

impl NormalizeOptions {
    /// Keep every tour in the order the provider sent them.
    pub fn unranked() -> Self {
        Self {
            rank: false,
            limit: None,
        }
    }

    /// Keep the `limit` best rated tours.
    pub fn top(limit: usize) -> Self {
        Self {
            rank: true,
            limit: Some(limit),
        }
    }
}

impl From<ListingSettings> for NormalizeOptions {
    fn from(settings: ListingSettings) -> Self {
        Self {
            rank: settings.rank,
            limit: settings.limit,
        }
    }
}

/// Normalize raw records, then rank and truncate them as `options` asks.
///
/// Normalizing a record never fails. Missing or malformed fields fall back to
/// their defaults.
pub fn normalize<I>(records: I, options: NormalizeOptions) -> Vec<NormalizedTour>
where
    I: IntoIterator<Item = RawTourRecord>,
{
    let mut tours: Vec<NormalizedTour> = records.into_iter().map(NormalizedTour::from).collect();

    if options.rank {
        // `sort_by` is stable, so ties keep the provider's order.
        tours.sort_by(|a, b| compare_ratings(a.rating.as_ref(), b.rating.as_ref()));
    }

    if let Some(limit) = options.limit {
        tours.truncate(limit);
    }

    tours
}

impl From<RawTourRecord> for NormalizedTour {
    fn from(raw: RawTourRecord) -> Self {
        let price = TourPrice {
            price: or_default(raw.price_total(), MISSING_TEXT),
            currency: or_default(raw.price_currency(), DEFAULT_CURRENCY),
        };

        Self {
            description: or_missing(raw.description),
            image: or_missing(raw.image),
            title: or_missing(raw.title),
            link: or_missing(raw.url),
            price,
            category: raw.category,
            rating: raw.rating,
        }
    }
}

/// `value` if it is truthy, otherwise `"N/A"`.
fn or_missing(value: Option<Value>) -> Value {
    match value {
        Some(value) if is_truthy(&value) => value,
        _ => Value::String(MISSING_TEXT.to_owned()),
    }
}

/// A copy of `value` if it is truthy, otherwise `default`.
fn or_default(value: Option<&Value>, default: &str) -> Value {
    match value {
        Some(value) if is_truthy(value) => value.clone(),
        _ => Value::String(default.to_owned()),
    }
}

/// Order ratings best first.
///
/// Numeric ratings come before everything else, highest first. Ratings that
/// are absent or not numbers compare equal to each other and sort after all
/// numeric ones. Numeric strings such as `"4.9"` and `null` count as
/// non-numeric; they are never coerced to numbers.
fn compare_ratings(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (numeric_rating(a), numeric_rating(b)) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// The rating as a number, if it is one.
fn numeric_rating(rating: Option<&Value>) -> Option<f64> {
    rating.and_then(Value::as_f64)
}

#[cfg(test)]
mod tests {
    use super::{normalize, NormalizeOptions};
    use crate::{NormalizedTour, RawTourRecord, TourPrice};
    use charlie_settings::ListingSettings;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    fn records(values: Vec<Value>) -> Vec<RawTourRecord> {
        values.into_iter().map(RawTourRecord::from).collect()
    }

    fn rated(ratings: &[f64]) -> Vec<RawTourRecord> {
        records(
            ratings
                .iter()
                .enumerate()
                .map(|(idx, rating)| json!({"title": format!("tour {}", idx), "rating": rating}))
                .collect(),
        )
    }

    fn ratings(tours: &[NormalizedTour]) -> Vec<Option<Value>> {
        tours.iter().map(|tour| tour.rating.clone()).collect()
    }

    #[test]
    fn empty_record_gets_every_default() {
        let tours = normalize(records(vec![json!({})]), NormalizeOptions::unranked());
        assert_eq!(
            tours,
            vec![NormalizedTour {
                category: None,
                description: json!("N/A"),
                image: json!("N/A"),
                title: json!("N/A"),
                link: json!("N/A"),
                price: TourPrice {
                    price: json!("N/A"),
                    currency: json!("USD"),
                },
                rating: None,
            }]
        );
    }

    #[test]
    fn empty_record_serializes_without_passthrough_fields() {
        let tours = normalize(records(vec![json!({})]), NormalizeOptions::unranked());
        assert_eq!(
            serde_json::to_value(&tours).expect("should serialize"),
            json!([{
                "description": "N/A",
                "image": "N/A",
                "title": "N/A",
                "link": "N/A",
                "price": {"price": "N/A", "currency": "USD"},
            }])
        );
    }

    #[test]
    fn complete_record_is_reshaped() {
        let tours = normalize(
            records(vec![json!({
                "category": "Walking Tours",
                "description": "See the city on foot",
                "image": "https://img.example.com/1.jpg",
                "title": "Old Town Walk",
                "url": "https://tours.example.com/1",
                "rating": 4.5,
                "price": {"total": 150, "currency": "EUR"},
                "reviews": 1200,
            })]),
            NormalizeOptions::unranked(),
        );
        assert_eq!(
            serde_json::to_value(&tours).expect("should serialize"),
            json!([{
                "category": "Walking Tours",
                "description": "See the city on foot",
                "image": "https://img.example.com/1.jpg",
                "title": "Old Town Walk",
                "link": "https://tours.example.com/1",
                "price": {"price": 150, "currency": "EUR"},
                "rating": 4.5,
            }])
        );
    }

    #[test]
    fn zero_price_is_treated_as_missing() {
        let tours = normalize(
            records(vec![json!({"price": {"total": 0}})]),
            NormalizeOptions::unranked(),
        );
        assert_eq!(tours[0].price.price, json!("N/A"));
        assert_eq!(tours[0].price.currency, json!("USD"));
    }

    #[test]
    fn falsy_text_is_replaced() {
        let tours = normalize(
            records(vec![json!({
                "description": "",
                "image": null,
                "title": false,
                "url": 0,
                "price": {"total": "", "currency": ""},
            })]),
            NormalizeOptions::unranked(),
        );
        let tour = &tours[0];
        assert_eq!(tour.description, json!("N/A"));
        assert_eq!(tour.image, json!("N/A"));
        assert_eq!(tour.title, json!("N/A"));
        assert_eq!(tour.link, json!("N/A"));
        assert_eq!(tour.price.price, json!("N/A"));
        assert_eq!(tour.price.currency, json!("USD"));
    }

    #[test]
    fn string_prices_are_kept() {
        let tours = normalize(
            records(vec![json!({"price": {"total": "$45.00"}})]),
            NormalizeOptions::unranked(),
        );
        assert_eq!(tours[0].price.price, json!("$45.00"));
    }

    #[test]
    fn category_and_rating_pass_through_verbatim() {
        let tours = normalize(
            records(vec![json!({"category": "", "rating": null})]),
            NormalizeOptions::unranked(),
        );
        assert_eq!(tours[0].category, Some(json!("")));
        assert_eq!(tours[0].rating, Some(Value::Null));
    }

    #[test]
    fn ranked_keeps_the_best_four() {
        let tours = normalize(rated(&[3.0, 5.0, 1.0, 4.0, 2.0, 4.5]), NormalizeOptions::top(4));
        assert_eq!(
            ratings(&tours),
            vec![Some(json!(5.0)), Some(json!(4.5)), Some(json!(4.0)), Some(json!(3.0))]
        );
    }

    #[test]
    fn ranked_with_few_records_returns_all_sorted() {
        let tours = normalize(rated(&[2.0, 4.0, 3.0]), NormalizeOptions::top(4));
        assert_eq!(
            ratings(&tours),
            vec![Some(json!(4.0)), Some(json!(3.0)), Some(json!(2.0))]
        );
    }

    #[test]
    fn ranked_ties_keep_provider_order() {
        let tours = normalize(rated(&[4.0, 5.0, 4.0]), NormalizeOptions::top(4));
        let titles: Vec<_> = tours.iter().map(|tour| tour.title.clone()).collect();
        assert_eq!(titles, vec![json!("tour 1"), json!("tour 0"), json!("tour 2")]);
    }

    #[test]
    fn ranked_puts_non_numeric_ratings_last() {
        let tours = normalize(
            records(vec![
                json!({"title": "absent"}),
                json!({"title": "text", "rating": "4.9"}),
                json!({"title": "low", "rating": 1}),
                json!({"title": "null", "rating": null}),
                json!({"title": "high", "rating": 4.8}),
            ]),
            NormalizeOptions {
                rank: true,
                limit: None,
            },
        );
        let titles: Vec<_> = tours.iter().map(|tour| tour.title.clone()).collect();
        assert_eq!(
            titles,
            vec![
                json!("high"),
                json!("low"),
                json!("absent"),
                json!("text"),
                json!("null")
            ]
        );
    }

    #[test]
    fn unranked_preserves_order_and_count() {
        let input = [3.0, 5.0, 1.0, 4.0, 2.0, 4.5];
        let tours = normalize(rated(&input), NormalizeOptions::unranked());
        assert_eq!(
            ratings(&tours),
            input.iter().map(|r| Some(json!(r))).collect::<Vec<_>>()
        );
    }

    #[test]
    fn empty_input_is_empty_output() {
        assert!(normalize(Vec::<RawTourRecord>::new(), NormalizeOptions::top(4)).is_empty());
        assert!(normalize(Vec::<RawTourRecord>::new(), NormalizeOptions::unranked()).is_empty());
    }

    #[test]
    fn limit_without_ranking_truncates_in_order() {
        let options = NormalizeOptions {
            rank: false,
            limit: Some(2),
        };
        let tours = normalize(rated(&[1.0, 5.0, 3.0]), options);
        assert_eq!(ratings(&tours), vec![Some(json!(1.0)), Some(json!(5.0))]);
    }

    #[test]
    fn options_from_settings() {
        let options: NormalizeOptions = ListingSettings {
            rank: true,
            limit: Some(4),
        }
        .into();
        assert_eq!(options, NormalizeOptions::top(4));
        assert_eq!(
            NormalizeOptions::from(ListingSettings::default()),
            NormalizeOptions::unranked()
        );
    }
}
