//! # card_codec
//!
//! Pure conversions between a [`Document`] (the card under edit) and its
//! external representations:
//! - [`encode`] / [`decode`]: compact URL-safe token placed in a location fragment
//! - [`fingerprint`]: token of the card content without its identifier
//! - [`to_location`]: canonical [`LocationDescriptor`](location::LocationDescriptor)
//!   for a document, its dirty flag, extra query parameters and focused row
//!
//! Failures never escape as panics: decoding reports [`DecodeError::Malformed`],
//! encoding reports [`SerializeError::Unrepresentable`] and [`to_location`]
//! degrades to an identifier-only location.

mod document;
mod error;
mod model;
mod token;
mod urls;

pub use document::Document;
pub use error::{DecodeError, SerializeError};
pub use model::{is_ad_hoc_model, source_table};
pub use token::{EncodeOptions, decode, encode, encode_or_empty, encode_with, fingerprint};
pub use urls::{OBJECT_ID_PARAM, UrlOptions, object_focus_of, to_location, to_location_preserving};
