//! Catalog payload types and normalization
//!
//! The catalog API hands back loosely shaped product objects. This module
//! decodes them into [`RawItem`] and flattens each one into the stable
//! [`Record`] that ends up in the output file.

mod normalize;
mod types;

pub use normalize::{normalize, normalize_item, resolve_photo_url, NormalizeError, NOT_SPECIFIED};
pub use types::{RawAmount, RawImage, RawItem, RawPrice, Record};
