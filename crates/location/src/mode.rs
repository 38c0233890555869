//! Bidirectional mapping between path suffixes and editor modes.
//!
//! Both directions are total: every mode encodes to a valid path, and every
//! path decodes to a mode (unknown suffixes fall back to `View`).

use crate::descriptor::LocationDescriptor;
use core_types::{DatasetTab, EditorMode, ModeState};

/// Known trailing path segments and the mode each one selects.
///
/// `view` is only ever decoded (older links carry it); `View` encodes to the
/// bare path.
pub const KNOWN_SUFFIXES: [(&str, ModeState); 4] = [
    ("notebook", ModeState::new(EditorMode::Notebook, DatasetTab::Query)),
    ("query", ModeState::new(EditorMode::DatasetEdit, DatasetTab::Query)),
    ("metadata", ModeState::new(EditorMode::DatasetEdit, DatasetTab::Metadata)),
    ("view", ModeState::view()),
];

fn trim_trailing_slash(path: &str) -> &str {
    if path.len() > 1 {
        path.strip_suffix('/').unwrap_or(path)
    } else {
        path
    }
}

/// The known suffix at the end of `path`, matched on a whole segment.
pub fn mode_suffix(path: &str) -> Option<(&'static str, ModeState)> {
    let path = trim_trailing_slash(path);
    let (_, last) = path.rsplit_once('/')?;
    KNOWN_SUFFIXES
        .iter()
        .find(|(suffix, _)| *suffix == last)
        .copied()
}

/// `path` without its known mode suffix (and without a trailing slash).
pub fn strip_mode_suffix(path: &str) -> &str {
    let trimmed = trim_trailing_slash(path);
    match mode_suffix(trimmed) {
        Some((suffix, _)) => &trimmed[..trimmed.len() - suffix.len() - 1],
        None => trimmed,
    }
}

pub fn resolve_mode_from_path(path: &str) -> ModeState {
    mode_suffix(path)
        .map(|(_, mode)| mode)
        .unwrap_or_default()
}

pub fn resolve_mode(location: &LocationDescriptor) -> ModeState {
    resolve_mode_from_path(&location.path)
}

/// Encode `mode` onto `base`, replacing any suffix `base` already carries.
pub fn path_for_mode(base: &str, mode: ModeState) -> String {
    let stripped = strip_mode_suffix(base);
    let suffix = match mode.mode {
        EditorMode::View => None,
        EditorMode::Notebook => Some("notebook"),
        EditorMode::DatasetEdit => match mode.tab {
            DatasetTab::Query => Some("query"),
            DatasetTab::Metadata => Some("metadata"),
        },
    };

    match suffix {
        None if stripped.is_empty() => "/".to_string(),
        None => stripped.to_string(),
        Some(suffix) => format!("{}/{suffix}", stripped.trim_end_matches('/')),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_mode_round_trips_through_its_path() {
        let modes = [
            ModeState::view(),
            ModeState::from(EditorMode::Notebook),
            ModeState::new(EditorMode::DatasetEdit, DatasetTab::Query),
            ModeState::new(EditorMode::DatasetEdit, DatasetTab::Metadata),
        ];
        for base in ["/question", "/question/42", "/question/42-orders/7"] {
            for mode in modes {
                let path = path_for_mode(base, mode);
                assert_eq!(resolve_mode_from_path(&path), mode, "path {path}");
                assert_eq!(strip_mode_suffix(&path), base);
            }
        }
    }

    #[test]
    fn view_is_the_bare_path() {
        assert_eq!(path_for_mode("/question/42", ModeState::view()), "/question/42");
        assert_eq!(path_for_mode("/question/42/notebook", ModeState::view()), "/question/42");
    }

    #[test]
    fn legacy_view_suffix_decodes_to_view() {
        assert_eq!(resolve_mode_from_path("/question/42/view"), ModeState::view());
        assert_eq!(strip_mode_suffix("/question/42/view"), "/question/42");
    }

    #[test]
    fn unknown_suffix_falls_back_to_view() {
        assert_eq!(resolve_mode_from_path("/question/42/whatever"), ModeState::view());
        assert_eq!(resolve_mode_from_path(""), ModeState::view());
        assert_eq!(resolve_mode_from_path("/"), ModeState::view());
    }

    #[test]
    fn suffix_must_be_a_whole_segment() {
        assert_eq!(mode_suffix("/question/mynotebook"), None);
        assert_eq!(strip_mode_suffix("/question/mynotebook"), "/question/mynotebook");
    }

    #[test]
    fn trailing_slash_is_tolerated() {
        assert_eq!(
            resolve_mode_from_path("/question/notebook/"),
            ModeState::from(EditorMode::Notebook)
        );
        assert_eq!(strip_mode_suffix("/question/notebook/"), "/question");
    }

    #[test]
    fn root_level_suffix() {
        assert_eq!(path_for_mode("/notebook", ModeState::view()), "/");
        assert_eq!(path_for_mode("/", ModeState::from(EditorMode::Notebook)), "/notebook");
    }
}
