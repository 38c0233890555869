use crate::descriptor::LocationDescriptor;
use crate::mode::strip_mode_suffix;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CompareOptions {
    /// When false, a trailing mode suffix is ignored on both paths.
    pub include_mode: bool,
}

impl CompareOptions {
    pub const WITH_MODE: Self = Self { include_mode: true };
    pub const WITHOUT_MODE: Self = Self { include_mode: false };
}

/// Comparison key: path (optionally without mode suffix) + `?search` + `#hash`.
pub fn url_key(location: &LocationDescriptor, options: CompareOptions) -> String {
    let path = if options.include_mode {
        location.path.as_str()
    } else {
        strip_mode_suffix(&location.path)
    };

    let mut key = String::with_capacity(path.len() + location.search.len() + location.hash.len() + 2);
    key.push_str(path);
    if !location.search.is_empty() {
        key.push('?');
        key.push_str(&location.search);
    }
    if !location.hash.is_empty() {
        key.push('#');
        key.push_str(&location.hash);
    }
    key
}

pub fn same_location(a: &LocationDescriptor, b: &LocationDescriptor, options: CompareOptions) -> bool {
    url_key(a, options) == url_key(b, options)
}

/// Exact path + search + hash equality.
pub fn same_url(a: &LocationDescriptor, b: &LocationDescriptor) -> bool {
    a.path == b.path && a.search == b.search && a.hash == b.hash
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::LocationState;

    fn loc(s: &str) -> LocationDescriptor {
        LocationDescriptor::parse(s).unwrap()
    }

    #[test]
    fn mode_suffix_ignored_only_without_mode() {
        let a = loc("/question/42/notebook#t");
        let b = loc("/question/42#t");
        assert!(same_location(&a, &b, CompareOptions::WITHOUT_MODE));
        assert!(!same_location(&a, &b, CompareOptions::WITH_MODE));
    }

    #[test]
    fn search_and_hash_always_compared_verbatim() {
        let a = loc("/question/42?a=1&b=2");
        let b = loc("/question/42?b=2&a=1");
        assert!(!same_location(&a, &b, CompareOptions::WITHOUT_MODE));

        let c = loc("/question#abc");
        let d = loc("/question#abd");
        assert!(!same_location(&c, &d, CompareOptions::WITHOUT_MODE));
    }

    #[test]
    fn state_is_not_part_of_url_equality() {
        let a = loc("/question/42");
        let b = loc("/question/42").with_state(Some(LocationState {
            object_id: Some("7".into()),
        }));
        assert!(same_url(&a, &b));
        assert!(same_location(&a, &b, CompareOptions::WITH_MODE));
    }

    #[test]
    fn url_key_matches_url_string_with_mode() {
        let a = loc("/question/42/notebook?x=1#tok");
        assert_eq!(url_key(&a, CompareOptions::WITH_MODE), a.to_url_string());
        assert_eq!(url_key(&a, CompareOptions::WITHOUT_MODE), "/question/42?x=1#tok");
    }
}
