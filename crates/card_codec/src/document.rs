use core_types::{CardId, ObjectId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The card under edit.
///
/// `dataset_query` is opaque to navigation; it only has to be a JSON object
/// (or null) to be representable in a token. `object_focus` is navigation
/// state and never travels inside a token.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CardId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub dataset_query: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Value>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub visualization_settings: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_card_id: Option<CardId>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub dataset: bool,
    #[serde(skip)]
    pub object_focus: Option<ObjectId>,
}

impl Document {
    /// An unsaved document with the given query payload.
    pub fn ad_hoc(dataset_query: Value) -> Self {
        Self {
            dataset_query,
            ..Self::default()
        }
    }

    pub fn saved(id: CardId, dataset_query: Value) -> Self {
        Self {
            id: Some(id),
            dataset_query,
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_parameters(mut self, parameters: Vec<Value>) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn with_focus(mut self, object_focus: Option<ObjectId>) -> Self {
        self.object_focus = object_focus;
        self
    }

    pub fn is_saved(&self) -> bool {
        self.id.is_some()
    }

    /// User-facing parameters must survive in the URL even when the card is clean.
    pub fn has_parameters(&self) -> bool {
        !self.parameters.is_empty()
    }

    /// Copy without identifier or focus: the part that describes the card's content.
    pub fn clean_copy(&self) -> Self {
        Self {
            id: None,
            object_focus: None,
            ..self.clone()
        }
    }

    /// Equality on everything a token carries, ignoring the focused row.
    pub fn content_eq(&self, other: &Document) -> bool {
        self.id == other.id
            && self.name == other.name
            && self.description == other.description
            && self.dataset_query == other.dataset_query
            && self.display == other.display
            && self.parameters == other.parameters
            && self.visualization_settings == other.visualization_settings
            && self.original_card_id == other.original_card_id
            && self.dataset == other.dataset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn content_eq_ignores_focus() {
        let a = Document::saved(CardId::from_raw(1), json!({"query": "A"}));
        let b = a.clone().with_focus(Some(ObjectId::from(3u64)));
        assert!(a.content_eq(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn clean_copy_drops_identity_and_focus() {
        let doc = Document::saved(CardId::from_raw(9), json!({"query": "A"}))
            .with_name("Orders")
            .with_focus(Some("x".into()));
        let copy = doc.clean_copy();
        assert_eq!(copy.id, None);
        assert_eq!(copy.object_focus, None);
        assert_eq!(copy.name.as_deref(), Some("Orders"));
        assert_eq!(copy.dataset_query, doc.dataset_query);
    }

    #[test]
    fn empty_optionals_are_not_serialized() {
        let doc = Document::ad_hoc(json!({"query": "A"}));
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value, json!({"dataset_query": {"query": "A"}}));
    }

    #[test]
    fn unknown_fields_from_older_tokens_are_ignored() {
        let doc: Document = serde_json::from_value(json!({
            "dataset_query": {"query": "A"},
            "dashboardId": 3,
            "dashcardId": 4
        }))
        .unwrap();
        assert_eq!(doc.dataset_query, json!({"query": "A"}));
    }
}
