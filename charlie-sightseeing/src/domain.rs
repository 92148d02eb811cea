//! Data types for raw and normalized tours.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Placeholder for text fields the provider left empty.
pub(crate) const MISSING_TEXT: &str = "N/A";

/// Currency assumed when the provider does not name one.
pub(crate) const DEFAULT_CURRENCY: &str = "USD";

/// A tour as the provider sent it.
///
/// Nothing about the shape is trusted. Every field is optional and kept as raw
/// JSON, so that the normalizer can apply its rules to whatever arrived. A
/// record that is not a JSON object at all has every field absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTourRecord {
    /// Provider's category label.
    pub category: Option<Value>,
    /// Free text description.
    pub description: Option<Value>,
    /// Image URL.
    pub image: Option<Value>,
    /// Tour name.
    pub title: Option<Value>,
    /// Link to the tour's page. Named `link` once normalized.
    pub url: Option<Value>,
    /// Review score, usually a number.
    pub rating: Option<Value>,
    /// Usually an object with `total` and `currency`.
    pub price: Option<Value>,
}

impl RawTourRecord {
    /// `price.total`, if `price` is an object that has it.
    pub(crate) fn price_total(&self) -> Option<&Value> {
        self.price_field("total")
    }

    /// `price.currency`, if `price` is an object that has it.
    pub(crate) fn price_currency(&self) -> Option<&Value> {
        self.price_field("currency")
    }

    /// Look up a field of the nested price object.
    fn price_field(&self, name: &str) -> Option<&Value> {
        self.price.as_ref()?.as_object()?.get(name)
    }
}

impl From<Value> for RawTourRecord {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(mut fields) => {
                let mut take = |name: &str| fields.remove(name);
                Self {
                    category: take("category"),
                    description: take("description"),
                    image: take("image"),
                    title: take("title"),
                    url: take("url"),
                    rating: take("rating"),
                    price: take("price"),
                }
            }
            _ => Self::default(),
        }
    }
}

impl<'de> Deserialize<'de> for RawTourRecord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(Self::from)
    }
}

/// A tour in the shape Charlie returns to its clients.
///
/// `category` and `rating` are passed through untouched: if the provider did
/// not send them they are left out of the serialized object. Every other field
/// is always present.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedTour {
    /// The provider's category, verbatim.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Value>,
    /// Description, or `"N/A"`.
    pub description: Value,
    /// Image URL, or `"N/A"`.
    pub image: Value,
    /// Title, or `"N/A"`.
    pub title: Value,
    /// Link to the tour, or `"N/A"`.
    pub link: Value,
    /// Price and currency, with defaults filled in.
    pub price: TourPrice,
    /// The provider's rating, verbatim.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<Value>,
}

/// Price of a normalized tour.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TourPrice {
    /// The total price as sent by the provider (string or number), or `"N/A"`.
    pub price: Value,
    /// Currency code, or `"USD"`.
    pub currency: Value,
}

/// What the provider answered with, once classified.
#[derive(Debug, Clone, PartialEq)]
pub enum UpstreamPayload {
    /// The body had a `data` list. Its entries are raw tour records.
    Tours(Vec<Value>),
    /// The body did not have a `data` list. The whole body is kept for
    /// diagnostics.
    Unrecognized(Value),
}

impl UpstreamPayload {
    /// Classify a response body from the provider.
    pub fn from_body(mut body: Value) -> Self {
        if body.get("data").map_or(false, Value::is_array) {
            if let Some(Value::Array(tours)) = body.get_mut("data").map(Value::take) {
                return Self::Tours(tours);
            }
        }
        Self::Unrecognized(body)
    }

    /// Build a payload from a raw body that may or may not be JSON.
    ///
    /// Bodies that are not JSON are kept as a JSON string.
    pub fn from_text(text: &str) -> Self {
        Self::from_body(body_to_json(text))
    }
}

/// Parse `text` as JSON, falling back to a JSON string holding the text.
pub(crate) fn body_to_json(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_owned()))
}

/// Test a JSON value for truthiness.
///
/// `null`, `false`, zero, and the empty string are falsy. Everything else,
/// including empty arrays and objects, is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
