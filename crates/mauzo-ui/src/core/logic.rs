//! Pure listing helpers extracted from the controller for non-wasm testing.

use mauzo_api_models::Document;
use serde_json::Value;

/// Map a UI sort label to the backend field path.
///
/// `"created time"` is the creation timestamp; address parts sort on their
/// nested path; everything else is the snake_cased field name.
#[must_use]
pub fn sort_field(label: &str) -> String {
    let label = label.trim();
    match label {
        "created time" => "createdAt".to_string(),
        "region" | "location" | "street" => format!("address.{label}"),
        other => other.to_lowercase().replace(' ', "_"),
    }
}

/// Trim a search keyword, rejecting empty/whitespace input.
#[must_use]
pub fn normalized_keyword(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// The `_id` of a backend document, when present.
#[must_use]
pub fn doc_id(document: &Document) -> Option<&str> {
    document.get("_id").and_then(Value::as_str)
}

/// Toggle one id in or out of the selection.
#[must_use]
pub fn toggle_selection(selected: &[String], id: &str) -> Vec<String> {
    if selected.iter().any(|existing| existing == id) {
        selected
            .iter()
            .filter(|existing| *existing != id)
            .cloned()
            .collect()
    } else {
        let mut next = selected.to_vec();
        next.push(id.to_string());
        next
    }
}

/// Select every visible row, or clear when the selection already covers the
/// full list.
#[must_use]
pub fn select_all_or_clear(selected: &[String], rows: &[Document]) -> Vec<String> {
    if selected.len() == rows.len() {
        Vec::new()
    } else {
        rows.iter()
            .filter_map(|row| doc_id(row).map(ToString::to_string))
            .collect()
    }
}

/// The field/value pair a bulk status change assigns.
#[must_use]
pub fn status_patch(status: &str) -> (&'static str, Value) {
    match status {
        "deleted" => ("visible", Value::Bool(false)),
        "restored" => ("visible", Value::Bool(true)),
        "enabled" => ("disabled", Value::Bool(false)),
        "disabled" => ("disabled", Value::Bool(true)),
        other => ("status", Value::String(other.to_string())),
    }
}

/// Whether a bulk status change removes the affected rows from the list the
/// user is looking at (delete/restore flips visibility out of the view).
#[must_use]
pub fn removes_from_list(status: &str) -> bool {
    matches!(status, "deleted" | "restored")
}

/// Reconcile the in-memory list after a fully successful bulk update:
/// delete/restore drops the affected rows, any other status patches them in
/// place by id match.
#[must_use]
pub fn reconcile_after_bulk(rows: &[Document], ids: &[String], status: &str) -> Vec<Document> {
    if removes_from_list(status) {
        return rows
            .iter()
            .filter(|row| doc_id(row).is_none_or(|id| !ids.iter().any(|sel| sel == id)))
            .cloned()
            .collect();
    }
    let (field, value) = status_patch(status);
    rows.iter()
        .map(|row| {
            let affected = doc_id(row).is_some_and(|id| ids.iter().any(|sel| sel == id));
            if !affected {
                return row.clone();
            }
            let mut patched = row.clone();
            if let Some(object) = patched.as_object_mut() {
                object.insert(field.to_string(), value.clone());
            }
            patched
        })
        .collect()
}

/// Shallow-merge a page-supplied extra condition into a base condition.
#[must_use]
pub fn merge_conditions(base: Value, extra: Option<&Value>) -> Value {
    let Some(Value::Object(extra)) = extra else {
        return base;
    };
    let mut merged = base;
    if let Some(object) = merged.as_object_mut() {
        for (key, value) in extra {
            object.insert(key.clone(), value.clone());
        }
    }
    merged
}

/// `"1 record"` / `"3 records"` style counting for notifications.
#[must_use]
pub fn pluralized(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(id: &str) -> Document {
        json!({"_id": id, "name": id, "visible": true})
    }

    #[test]
    fn sort_labels_map_to_field_paths() {
        assert_eq!(sort_field("created time"), "createdAt");
        assert_eq!(sort_field("region"), "address.region");
        assert_eq!(sort_field("street"), "address.street");
        assert_eq!(sort_field("Paid Amount"), "paid_amount");
    }

    #[test]
    fn keyword_guard_rejects_whitespace() {
        assert_eq!(normalized_keyword("  "), None);
        assert_eq!(normalized_keyword(" rice "), Some("rice".to_string()));
    }

    #[test]
    fn toggle_adds_then_removes() {
        let selected = toggle_selection(&[], "a");
        assert_eq!(selected, vec!["a".to_string()]);
        assert!(toggle_selection(&selected, "a").is_empty());
    }

    #[test]
    fn select_all_flips_to_clear_when_full() {
        let rows = vec![row("a"), row("b")];
        let all = select_all_or_clear(&[], &rows);
        assert_eq!(all, vec!["a".to_string(), "b".to_string()]);
        assert!(select_all_or_clear(&all, &rows).is_empty());
    }

    #[test]
    fn deleted_rows_drop_from_the_list() {
        let rows = vec![row("a"), row("b"), row("c")];
        let next = reconcile_after_bulk(&rows, &["a".to_string(), "c".to_string()], "deleted");
        assert_eq!(next.len(), 1);
        assert_eq!(doc_id(&next[0]), Some("b"));
    }

    #[test]
    fn enabled_rows_patch_in_place() {
        let rows = vec![row("a"), row("b")];
        let next = reconcile_after_bulk(&rows, &["b".to_string()], "enabled");
        assert_eq!(next.len(), 2);
        assert_eq!(next[1]["disabled"], json!(false));
        assert!(next[0].get("disabled").is_none());
    }

    #[test]
    fn other_statuses_patch_the_status_field() {
        let rows = vec![row("a")];
        let next = reconcile_after_bulk(&rows, &["a".to_string()], "confirmed");
        assert_eq!(next[0]["status"], json!("confirmed"));
    }

    #[test]
    fn extra_condition_wins_on_key_clash() {
        let merged = merge_conditions(
            json!({"visible": true, "branch": "b1"}),
            Some(&json!({"visible": false, "type": "shop"})),
        );
        assert_eq!(merged, json!({"visible": false, "branch": "b1", "type": "shop"}));
    }

    #[test]
    fn pluralizes_by_count() {
        assert_eq!(pluralized(1, "record", "records"), "1 record");
        assert_eq!(pluralized(4, "record", "records"), "4 records");
    }
}
