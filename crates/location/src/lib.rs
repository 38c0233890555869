//! # location
//!
//! Structured, immutable view of a navigable URL and the pure functions that
//! reason about it:
//! - [`LocationDescriptor`]: path, query string, fragment and an optional state payload
//! - [`same_location`]: equivalence under a configurable granularity
//! - [`resolve_mode`] / [`path_for_mode`]: the total mapping between path suffixes
//!   and [`EditorMode`](core_types::EditorMode)
//! - [`parse_question_path`] / [`question_path`]: card id, slug and focused row
//!   encoded in a question path
//!
//! Nothing here touches a navigation stack; callers own that.

mod compare;
mod descriptor;
mod error;
mod mode;
mod question;

pub use compare::{CompareOptions, same_location, same_url, url_key};
pub use descriptor::{LocationDescriptor, LocationState};
pub use error::LocationError;
pub use mode::{
    KNOWN_SUFFIXES, mode_suffix, path_for_mode, resolve_mode, resolve_mode_from_path,
    strip_mode_suffix,
};
pub use question::{QuestionPath, is_path_safe, parse_question_path, question_path, slugify};
