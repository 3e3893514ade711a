//! Raw item to record normalization
//!
//! Decoding is the only fallible step: once an item has the required fields,
//! turning it into a [`Record`] always succeeds.

use crate::catalog::types::{RawItem, Record};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Placeholder value for a missing brand or product type
pub const NOT_SPECIFIED: &str = "not specified";

const SCREEN_PLACEHOLDER: &str = "${screen}";
const FORMAT_PLACEHOLDER: &str = "${format}";
const SCREEN_SIZE: &str = "fullhd";
const IMAGE_FORMAT: &str = "jpg";

/// A catalog item that does not have the shape the harvester expects
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("Malformed catalog item{}: {source}", item_label(.item_id))]
    Malformed {
        /// The item id, when it could still be read from the payload
        item_id: Option<String>,
        source: serde_json::Error,
    },
}

fn item_label(item_id: &Option<String>) -> String {
    match item_id {
        Some(id) => format!(" '{}'", id),
        None => String::new(),
    }
}

/// Decodes and normalizes one product object from a catalog page
///
/// # Returns
///
/// * `Ok(Record)` - The normalized record
/// * `Err(NormalizeError)` - A required field is missing or has the wrong type
pub fn normalize(item: &Value) -> Result<Record, NormalizeError> {
    let raw = RawItem::deserialize(item).map_err(|source| NormalizeError::Malformed {
        item_id: item
            .get("itemId")
            .and_then(Value::as_str)
            .map(str::to_string),
        source,
    })?;

    Ok(normalize_item(raw))
}

/// Flattens an already decoded item into a record
pub fn normalize_item(raw: RawItem) -> Record {
    let photos = raw
        .image_urls
        .iter()
        .map(|image| resolve_photo_url(&image.url))
        .collect();

    Record {
        id: raw.item_id,
        name: raw.name,
        brand: raw.brand.unwrap_or_else(|| NOT_SPECIFIED.to_string()),
        product_type: raw.product_type.unwrap_or_else(|| NOT_SPECIFIED.to_string()),
        photos,
        in_stock: raw.in_stock,
        price: raw.price.actual.map(|actual| actual.amount),
    }
}

/// Fills the screen and format placeholders of an image URL template
///
/// A URL without placeholders is returned unchanged.
pub fn resolve_photo_url(template: &str) -> String {
    template
        .replace(SCREEN_PLACEHOLDER, SCREEN_SIZE)
        .replace(FORMAT_PLACEHOLDER, IMAGE_FORMAT)
}
