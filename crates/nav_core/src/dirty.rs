use card_codec::{Document, is_ad_hoc_model};

/// Whether `document` has unsaved changes relative to `original`.
///
/// Without an original everything is dirty. A model opened through its
/// wrapper query is never dirty. Parameters are handled by the caller.
pub fn compute_dirty(
    document: &Document,
    original: Option<&Document>,
    equal: &dyn Fn(&Document, &Document) -> bool,
) -> bool {
    let Some(original) = original else {
        return true;
    };
    if is_ad_hoc_model(document, original) {
        return false;
    }
    !equal(document, original)
}
