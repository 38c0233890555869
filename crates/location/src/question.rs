//! Question paths: `<base>[/<id>[-<slug>][/<object>]][/<mode>]`.

use crate::mode::{KNOWN_SUFFIXES, resolve_mode_from_path, strip_mode_suffix};
use core_types::{CardId, ModeState, ObjectId};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QuestionPath {
    pub card_id: Option<CardId>,
    pub slug: Option<String>,
    pub object_id: Option<ObjectId>,
    pub mode: ModeState,
}

/// Lowercase ASCII slug; runs of anything else collapse into one `-`.
pub fn slugify(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_dash = false;
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    out
}

/// Whether `raw` can be embedded as a path segment without escaping or
/// being mistaken for a mode suffix.
pub fn is_path_safe(raw: &str) -> bool {
    !raw.is_empty()
        && raw
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.'))
        && raw != "."
        && raw != ".."
        && !KNOWN_SUFFIXES.iter().any(|(suffix, _)| *suffix == raw)
}

/// Build the mode-less question path for a card.
///
/// The object segment is only emitted for saved cards with a path-safe id;
/// callers place any other focus in the query string.
pub fn question_path(
    base: &str,
    card_id: Option<CardId>,
    slug: Option<&str>,
    object_id: Option<&ObjectId>,
) -> String {
    let base = base.trim_end_matches('/');
    let Some(id) = card_id else {
        return if base.is_empty() { "/".to_string() } else { base.to_string() };
    };

    let mut path = format!("{base}/{id}");
    if let Some(slug) = slug.filter(|s| !s.is_empty()) {
        path.push('-');
        path.push_str(slug);
    }
    if let Some(object_id) = object_id.filter(|o| is_path_safe(o.as_str())) {
        path.push('/');
        path.push_str(object_id.as_str());
    }
    path
}

/// Parse a question path under `base`. Returns `None` for paths outside `base`.
pub fn parse_question_path(base: &str, path: &str) -> Option<QuestionPath> {
    let mode = resolve_mode_from_path(path);
    let stripped = strip_mode_suffix(path);
    let base = base.trim_end_matches('/');

    let rest = stripped.strip_prefix(base)?;
    if !(rest.is_empty() || rest.starts_with('/')) {
        return None;
    }

    let mut segments = rest.split('/').filter(|s| !s.is_empty());
    let mut parsed = QuestionPath {
        mode,
        ..QuestionPath::default()
    };

    let Some(first) = segments.next() else {
        return Some(parsed);
    };

    let digits_end = first
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(first.len());
    let id = first[..digits_end].parse::<u64>().ok()?;
    parsed.card_id = Some(CardId::from_raw(id));

    let tail = &first[digits_end..];
    if let Some(slug) = tail.strip_prefix('-').filter(|s| !s.is_empty()) {
        parsed.slug = Some(slug.to_string());
    } else if !tail.is_empty() {
        return None;
    }

    if let Some(object) = segments.next() {
        parsed.object_id = Some(ObjectId::new(object));
    }
    if segments.next().is_some() {
        return None;
    }
    Some(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::EditorMode;

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("Orders, by Month!"), "orders-by-month");
        assert_eq!(slugify("  leading"), "leading");
        assert_eq!(slugify("Ünïcode"), "n-code");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn ad_hoc_question_path_is_the_base() {
        assert_eq!(question_path("/question", None, Some("x"), None), "/question");
    }

    #[test]
    fn saved_question_path_with_slug_and_object() {
        let object = ObjectId::from(7u64);
        assert_eq!(
            question_path("/question/", Some(CardId::from_raw(42)), Some("orders"), Some(&object)),
            "/question/42-orders/7"
        );
    }

    #[test]
    fn unsafe_object_id_is_not_put_in_the_path() {
        let object = ObjectId::new("a/b");
        assert_eq!(
            question_path("/question", Some(CardId::from_raw(42)), None, Some(&object)),
            "/question/42"
        );
    }

    #[test]
    fn mode_names_are_not_path_safe() {
        assert!(is_path_safe("7"));
        assert!(!is_path_safe("notebook"));
        assert!(!is_path_safe(".."));
        assert!(!is_path_safe(""));
    }

    #[test]
    fn parse_full_question_path() {
        let parsed = parse_question_path("/question", "/question/42-orders/7/notebook").unwrap();
        assert_eq!(parsed.card_id, Some(CardId::from_raw(42)));
        assert_eq!(parsed.slug.as_deref(), Some("orders"));
        assert_eq!(parsed.object_id, Some(ObjectId::from(7u64)));
        assert_eq!(parsed.mode.mode, EditorMode::Notebook);
    }

    #[test]
    fn parse_ad_hoc_question_path() {
        let parsed = parse_question_path("/question", "/question/notebook").unwrap();
        assert_eq!(parsed.card_id, None);
        assert_eq!(parsed.mode.mode, EditorMode::Notebook);
    }

    #[test]
    fn parse_rejects_foreign_paths() {
        assert_eq!(parse_question_path("/question", "/dashboard/1"), None);
        assert_eq!(parse_question_path("/question", "/questionnaire"), None);
        assert_eq!(parse_question_path("/question", "/question/abc"), None);
        assert_eq!(parse_question_path("/question", "/question/42x"), None);
        assert_eq!(parse_question_path("/question", "/question/42/7/extra"), None);
    }
}
