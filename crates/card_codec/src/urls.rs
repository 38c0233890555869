use crate::document::Document;
use crate::token::{EncodeOptions, encode_or_empty};
use core_types::ObjectId;
use location::{
    LocationDescriptor, LocationState, is_path_safe, parse_question_path, question_path, slugify,
};

/// Query parameter carrying the focused row when it cannot live in the path.
pub const OBJECT_ID_PARAM: &str = "objectId";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UrlOptions {
    pub base_path: String,
    pub include_slug: bool,
    pub encode: EncodeOptions,
}

impl Default for UrlOptions {
    fn default() -> Self {
        Self {
            base_path: "/question".to_string(),
            include_slug: true,
            encode: EncodeOptions::default(),
        }
    }
}

/// Canonical, mode-less location for `document`.
///
/// A clean saved document is addressed by identifier only; a dirty or unsaved
/// one embeds its full token in the fragment. If the token cannot be produced
/// the location degrades to the identifier-only form.
///
/// The focused row goes into the path for saved documents when it is
/// path-safe, otherwise into the `objectId` query parameter. It is also
/// recorded in the location state.
pub fn to_location(
    document: &Document,
    dirty: bool,
    extra_params: &[(String, String)],
    object_focus: Option<&ObjectId>,
    options: &UrlOptions,
) -> LocationDescriptor {
    to_location_preserving(document, dirty, "", extra_params, object_focus, options)
}

/// [`to_location`] on top of an existing raw query string.
///
/// Segments of `preserved_query` are kept verbatim unless `extra_params` sets
/// the same key; a stale `objectId` is always dropped.
pub fn to_location_preserving(
    document: &Document,
    dirty: bool,
    preserved_query: &str,
    extra_params: &[(String, String)],
    object_focus: Option<&ObjectId>,
    options: &UrlOptions,
) -> LocationDescriptor {
    let hash = if dirty || !document.is_saved() {
        encode_or_empty(document, &options.encode)
    } else {
        String::new()
    };

    let slug = if options.include_slug {
        document
            .name
            .as_deref()
            .map(slugify)
            .filter(|slug| !slug.is_empty())
    } else {
        None
    };

    let path_focus = object_focus.filter(|o| document.is_saved() && is_path_safe(o.as_str()));

    let mut params: Vec<(String, String)> = extra_params
        .iter()
        .filter(|(key, _)| key != OBJECT_ID_PARAM)
        .cloned()
        .collect();
    if let (Some(focus), None) = (object_focus, path_focus) {
        params.push((OBJECT_ID_PARAM.to_string(), focus.as_str().to_string()));
    }

    let path = question_path(&options.base_path, document.id, slug.as_deref(), path_focus);
    let state = object_focus.map(|focus| LocationState {
        object_id: Some(focus.clone()),
    });

    LocationDescriptor::new(path)
        .with_merged_query(preserved_query, &params, &[OBJECT_ID_PARAM])
        .with_hash(hash)
        .with_state(state)
}

/// The row a location focuses: state payload first, then the `objectId`
/// query parameter, then the question path's object segment.
pub fn object_focus_of(location: &LocationDescriptor, base_path: &str) -> Option<ObjectId> {
    if let Some(object_id) = location.state_object_id() {
        return Some(object_id.clone());
    }
    if let Some(raw) = location.query_param(OBJECT_ID_PARAM).filter(|raw| !raw.is_empty()) {
        return Some(ObjectId::new(raw));
    }
    parse_question_path(base_path, &location.path).and_then(|parsed| parsed.object_id)
}
