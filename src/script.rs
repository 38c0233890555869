use card_codec::Document;
use core_types::{DatasetTab, EditorMode};
use serde::Deserialize;
use serde_json::Value;

/// A scripted navigation session.
///
/// ```toml
/// start = "/question"
///
/// [[saved]]
/// id = 1
/// name = "Orders"
/// dataset_query = { query = { source-table = 2 } }
///
/// [[step]]
/// action = "edit"
/// dataset_query = { query = { source-table = 3 } }
///
/// [[step]]
/// action = "back"
/// ```
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Script {
    #[serde(default = "default_start")]
    pub start: String,
    #[serde(default)]
    pub saved: Vec<Document>,
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

fn default_start() -> String {
    "/question".to_string()
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum Step {
    /// External in-place navigation (address bar, redirect).
    Load { url: String },
    /// External navigation that adds an entry (link click).
    Link { url: String },
    Edit {
        dataset_query: Value,
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        parameters: Option<Vec<Value>>,
    },
    Save,
    Commit {
        #[serde(default)]
        replace: Option<bool>,
        #[serde(default)]
        dirty: Option<bool>,
    },
    Mode {
        mode: EditorMode,
        #[serde(default)]
        tab: Option<DatasetTab>,
    },
    Focus {
        #[serde(default)]
        object_id: Option<String>,
    },
    Back,
    Forward,
}

impl Script {
    pub fn from_toml_str(input: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::CardId;
    use serde_json::json;

    #[test]
    fn parses_a_full_script() {
        let script = Script::from_toml_str(
            r#"
            start = "/question/1"

            [[saved]]
            id = 1
            name = "Orders"
            dataset_query = { query = { source-table = 2 } }

            [[step]]
            action = "edit"
            dataset_query = { query = { source-table = 3 } }

            [[step]]
            action = "mode"
            mode = "dataset-edit"
            tab = "metadata"

            [[step]]
            action = "focus"
            object_id = "7"

            [[step]]
            action = "back"
            "#,
        )
        .unwrap();

        assert_eq!(script.start, "/question/1");
        assert_eq!(script.saved[0].id, Some(CardId::from_raw(1)));
        assert_eq!(
            script.steps,
            vec![
                Step::Edit {
                    dataset_query: json!({"query": {"source-table": 3}}),
                    name: None,
                    parameters: None,
                },
                Step::Mode {
                    mode: EditorMode::DatasetEdit,
                    tab: Some(DatasetTab::Metadata),
                },
                Step::Focus {
                    object_id: Some("7".to_string()),
                },
                Step::Back,
            ]
        );
    }

    #[test]
    fn empty_script_starts_at_the_blank_question() {
        let script = Script::from_toml_str("").unwrap();
        assert_eq!(script.start, "/question");
        assert!(script.steps.is_empty());
    }

    #[test]
    fn unknown_actions_are_rejected() {
        assert!(Script::from_toml_str("[[step]]\naction = \"teleport\"").is_err());
    }
}
