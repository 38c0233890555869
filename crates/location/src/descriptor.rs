use crate::error::LocationError;
use core_types::ObjectId;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::{Url, form_urlencoded};

// Relative locations are resolved against this origin; only path, query and
// fragment are kept.
const PARSE_BASE: &str = "http://qbnav.invalid/";

/// Opaque payload carried alongside a history entry.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocationState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_id: Option<ObjectId>,
}

/// Immutable value describing a navigable URL.
///
/// `search` and `hash` are stored raw, without their leading `?` / `#`.
/// Two descriptors point at the same URL iff `path`, `search` and `hash` are
/// equal as strings; `state` never takes part in URL equality.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct LocationDescriptor {
    pub path: String,
    pub search: String,
    pub hash: String,
    pub state: Option<LocationState>,
}

impl LocationDescriptor {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Parse an absolute URL or a path-relative location string.
    pub fn parse(input: &str) -> Result<Self, LocationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(LocationError::Empty);
        }

        let url = match Url::parse(trimmed) {
            Ok(url) if url.has_host() => url,
            _ => Url::parse(PARSE_BASE)
                .and_then(|base| base.join(trimmed))
                .map_err(|source| LocationError::Unparseable {
                    input: trimmed.to_string(),
                    source,
                })?,
        };

        Ok(Self {
            path: url.path().to_string(),
            search: url.query().unwrap_or_default().to_string(),
            hash: url.fragment().unwrap_or_default().to_string(),
            state: None,
        })
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        let search = search.into();
        self.search = search.strip_prefix('?').unwrap_or(&search).to_string();
        self
    }

    pub fn with_hash(mut self, hash: impl Into<String>) -> Self {
        let hash = hash.into();
        self.hash = hash.strip_prefix('#').unwrap_or(&hash).to_string();
        self
    }

    pub fn with_state(mut self, state: Option<LocationState>) -> Self {
        self.state = state;
        self
    }

    /// Replace the query string with the given pairs, in order.
    pub fn with_query_pairs(self, pairs: &[(String, String)]) -> Self {
        self.with_merged_query("", pairs, &[])
    }

    /// Query string built from the raw segments of `preserved` followed by
    /// `pairs`.
    ///
    /// Preserved segments are copied byte for byte unless their key is set by
    /// `pairs` or listed in `dropped`; only `pairs` are form-encoded.
    pub fn with_merged_query(mut self, preserved: &str, pairs: &[(String, String)], dropped: &[&str]) -> Self {
        let preserved = preserved.strip_prefix('?').unwrap_or(preserved);
        let mut segments: Vec<String> = preserved
            .split('&')
            .filter(|segment| !segment.is_empty())
            .filter(|segment| {
                let key = segment_key(segment);
                !dropped.contains(&key.as_str()) && !pairs.iter().any(|(k, _)| *k == key)
            })
            .map(str::to_string)
            .collect();

        for (key, value) in pairs {
            let mut serializer = form_urlencoded::Serializer::new(String::new());
            serializer.append_pair(key, value);
            segments.push(serializer.finish());
        }

        self.search = segments.join("&");
        self
    }

    pub fn query_pairs(&self) -> Vec<(String, String)> {
        form_urlencoded::parse(self.search.as_bytes())
            .into_owned()
            .collect()
    }

    /// First value of the named query parameter.
    pub fn query_param(&self, name: &str) -> Option<String> {
        form_urlencoded::parse(self.search.as_bytes())
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }

    pub fn has_hash(&self) -> bool {
        !self.hash.is_empty()
    }

    pub fn state_object_id(&self) -> Option<&ObjectId> {
        self.state.as_ref().and_then(|s| s.object_id.as_ref())
    }

    /// `path?search#hash`, omitting empty parts.
    pub fn to_url_string(&self) -> String {
        let mut out = String::with_capacity(self.path.len() + self.search.len() + self.hash.len() + 2);
        out.push_str(&self.path);
        if !self.search.is_empty() {
            out.push('?');
            out.push_str(&self.search);
        }
        if !self.hash.is_empty() {
            out.push('#');
            out.push_str(&self.hash);
        }
        out
    }
}

fn segment_key(segment: &str) -> String {
    form_urlencoded::parse(segment.as_bytes())
        .next()
        .map(|(key, _)| key.into_owned())
        .unwrap_or_default()
}

impl fmt::Display for LocationDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_url_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_relative_location() {
        let loc = LocationDescriptor::parse("/question/42?a=1&b=2#abc").unwrap();
        assert_eq!(loc.path, "/question/42");
        assert_eq!(loc.search, "a=1&b=2");
        assert_eq!(loc.hash, "abc");
        assert!(loc.state.is_none());
    }

    #[test]
    fn parse_absolute_url_keeps_only_path_query_fragment() {
        let loc = LocationDescriptor::parse("https://bi.example.com/question#tok").unwrap();
        assert_eq!(loc.path, "/question");
        assert_eq!(loc.search, "");
        assert_eq!(loc.hash, "tok");
    }

    #[test]
    fn parse_rejects_empty() {
        assert!(matches!(
            LocationDescriptor::parse("   "),
            Err(LocationError::Empty)
        ));
    }

    #[test]
    fn url_string_omits_empty_parts() {
        let loc = LocationDescriptor::new("/question/42");
        assert_eq!(loc.to_url_string(), "/question/42");

        let loc = loc.with_search("?x=1").with_hash("#t");
        assert_eq!(loc.to_url_string(), "/question/42?x=1#t");
    }

    #[test]
    fn query_pairs_preserve_order_and_decode() {
        let pairs = vec![
            ("b".to_string(), "2".to_string()),
            ("a".to_string(), "x y".to_string()),
        ];
        let loc = LocationDescriptor::new("/q").with_query_pairs(&pairs);
        assert_eq!(loc.search, "b=2&a=x+y");
        assert_eq!(loc.query_pairs(), pairs);
        assert_eq!(loc.query_param("a").as_deref(), Some("x y"));
        assert_eq!(loc.query_param("missing"), None);
    }

    #[test]
    fn merged_query_keeps_untouched_segments_verbatim() {
        let pairs = vec![("tab".to_string(), "a b".to_string())];
        let loc = LocationDescriptor::new("/q").with_merged_query("flag&x=a%20b&tab=1&objectId=3", &pairs, &["objectId"]);
        assert_eq!(loc.search, "flag&x=a%20b&tab=a+b");

        let loc = LocationDescriptor::new("/q").with_merged_query("?flag&&x=a%20b", &[], &[]);
        assert_eq!(loc.search, "flag&x=a%20b");
    }
}
