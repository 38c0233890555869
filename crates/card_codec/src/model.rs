//! Models viewed through an ad-hoc wrapper query.
//!
//! Opening a model produces a document whose query selects from the model's
//! own virtual table (`card__<id>`). That document differs structurally from
//! the saved model but is not an edit of it.

use crate::document::Document;
use serde_json::Value;

/// `dataset_query.query.source-table`, rendered as a string.
pub fn source_table(document: &Document) -> Option<String> {
    match &document.dataset_query["query"]["source-table"] {
        Value::String(table) => Some(table.clone()),
        Value::Number(table) => Some(table.to_string()),
        _ => None,
    }
}

pub fn is_ad_hoc_model(document: &Document, original: &Document) -> bool {
    let Some(original_id) = original.id else {
        return false;
    };
    let is_model = document.dataset || original.dataset;
    let same_card = document.id == original.id;
    let virtual_table = format!("card__{original_id}");
    let self_referencing = source_table(document).is_some_and(|table| table == virtual_table);

    is_model && same_card && self_referencing
}
