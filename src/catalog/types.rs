use serde::{Deserialize, Serialize};
use serde_json::Number;

/// One product as returned by the catalog API
///
/// Only the fields the harvester keeps are decoded; everything else in the
/// payload is ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawItem {
    pub item_id: String,

    pub name: String,

    pub brand: Option<String>,

    pub product_type: Option<String>,

    /// Image URL templates carrying `${screen}` and `${format}` placeholders
    pub image_urls: Vec<RawImage>,

    pub in_stock: bool,

    pub price: RawPrice,
}

/// A single image entry
#[derive(Debug, Clone, Deserialize)]
pub struct RawImage {
    pub url: String,
}

/// Price container; `actual` is null for products without a current price
#[derive(Debug, Clone, Deserialize)]
pub struct RawPrice {
    #[serde(default)]
    pub actual: Option<RawAmount>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawAmount {
    pub amount: Number,
}

/// One normalized product, written as a single JSONL line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Record {
    pub id: String,

    pub name: String,

    pub brand: String,

    #[serde(rename = "type")]
    pub product_type: String,

    /// Fully resolved image URLs, in the order the API listed them
    pub photos: Vec<String>,

    pub in_stock: bool,

    /// Serialized as `null` when the product has no actual price
    pub price: Option<Number>,
}
