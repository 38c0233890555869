use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a saved card. Ad-hoc (unsaved) documents have none.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(u64);

impl CardId {
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn as_raw(self) -> u64 {
        self.0
    }
}

impl From<u64> for CardId {
    #[inline]
    fn from(raw: u64) -> Self {
        Self::from_raw(raw)
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a focused (zoomed) row.
///
/// Row keys may be numeric or textual, so the raw form is kept as a string and
/// compared verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(String);

impl ObjectId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ObjectId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<u64> for ObjectId {
    fn from(raw: u64) -> Self {
        Self(raw.to_string())
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sub-tab of the dataset editor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DatasetTab {
    #[default]
    Query,
    Metadata,
}

/// Discrete editor mode, derived from the shape of a location's path.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EditorMode {
    #[default]
    View,
    Notebook,
    DatasetEdit,
}

impl EditorMode {
    pub const ALL: [EditorMode; 3] = [EditorMode::View, EditorMode::Notebook, EditorMode::DatasetEdit];
}

/// Editor mode together with the sub-tab that only matters in `DatasetEdit`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModeState {
    pub mode: EditorMode,
    #[serde(default)]
    pub tab: DatasetTab,
}

impl ModeState {
    pub const fn new(mode: EditorMode, tab: DatasetTab) -> Self {
        Self { mode, tab }
    }

    pub const fn view() -> Self {
        Self::new(EditorMode::View, DatasetTab::Query)
    }

    /// Equality that ignores the sub-tab outside of `DatasetEdit`.
    pub fn same_as(&self, other: &ModeState) -> bool {
        match (self.mode, other.mode) {
            (EditorMode::DatasetEdit, EditorMode::DatasetEdit) => self.tab == other.tab,
            (a, b) => a == b,
        }
    }
}

impl From<EditorMode> for ModeState {
    fn from(mode: EditorMode) -> Self {
        Self::new(mode, DatasetTab::Query)
    }
}
