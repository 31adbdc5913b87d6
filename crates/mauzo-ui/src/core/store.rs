//! App-wide yewdux store slices.
//!
//! # Design
//! - One store for all shared screen state; every mutation goes through the
//!   reducer in [`crate::core::reducer`].
//! - Entity data lives in typed slots keyed by [`EntityKind`] instead of
//!   dynamic string keys, so accessors are compile-time checked.

use crate::core::entity::EntityKind;
use crate::i18n::{DEFAULT_LOCALE, LocaleCode};
use mauzo_api_models::Document;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::rc::Rc;
use yewdux::store::Store;

/// Global application store for shared state.
#[derive(Clone, Debug, PartialEq, Store, Default)]
pub struct AppStore {
    /// Who is signed in and how the shell looks.
    pub session: SessionSlice,
    /// Active listing parameters and pagination aids.
    pub listing: ListingSlice,
    /// Fetched entity records and lists.
    pub slots: EntitySlots,
    /// Transient user-facing notification, cleared by the view layer.
    pub notification: String,
    /// A network call is in flight.
    pub loading: bool,
    /// Submissions are blocked (duplicate-submit guard or field error).
    pub disabled: bool,
    /// Pending bulk action applied by `update_backend_status`.
    pub backend_status: String,
    /// Per-field validation errors keyed by field name.
    pub field_errors: BTreeMap<String, String>,
    /// Dependent form fields auto-populated by a validation hit.
    pub form_seed: Map<String, Value>,
}

/// Session and shell preferences.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionSlice {
    /// A user is signed in.
    pub authenticated: bool,
    /// The signed-in user record.
    pub user: Option<Document>,
    /// Active theme name.
    pub theme: String,
    /// Accent color for the shell.
    pub primary_color: String,
    /// Active UI language.
    pub locale: LocaleCode,
}

impl Default for SessionSlice {
    fn default() -> Self {
        Self {
            authenticated: false,
            user: None,
            theme: "light".to_string(),
            primary_color: "#0f766e".to_string(),
            locale: DEFAULT_LOCALE,
        }
    }
}

/// Parameters of the active listing screen.
///
/// Invariant: exactly one `schema` and one `collection` are active at a
/// time; every generic list operation keys off these two fields.
#[derive(Clone, Debug, PartialEq)]
pub struct ListingSlice {
    /// Singular entity kind of the active screen.
    pub schema: Option<EntityKind>,
    /// Plural entity kind whose list slot the screen renders.
    pub collection: Option<EntityKind>,
    /// Active named filter.
    pub condition: String,
    /// Page-supplied condition merged into every read.
    pub extra_condition: Option<Value>,
    /// JSON projection of returned fields.
    pub select: Option<Value>,
    /// Field paths keyword searches match against.
    pub fields: Option<Value>,
    /// Ask the backend to populate related-entity references.
    pub join_foreign_keys: bool,
    /// Active sort label as shown in the UI.
    pub sort: String,
    /// Sort direction, `1` ascending or `-1` descending.
    pub order: i64,
    /// Page size.
    pub limit: u64,
    /// 1-based current page.
    pub page: u64,
    /// Selected row identifiers for bulk actions.
    pub ids: Vec<String>,
    /// Page numbers offered by the pagination control.
    pub page_numbers: Vec<u64>,
    /// Page sizes offered by the pagination control.
    pub limits: Vec<u64>,
    /// Identifier of the record being edited, `None` when creating.
    pub edit_id: Option<String>,
}

impl Default for ListingSlice {
    fn default() -> Self {
        Self {
            schema: None,
            collection: None,
            condition: String::new(),
            extra_condition: None,
            select: None,
            fields: None,
            join_foreign_keys: false,
            sort: "created time".to_string(),
            order: -1,
            limit: 10,
            page: 1,
            ids: Vec::new(),
            page_numbers: Vec::new(),
            limits: Vec::new(),
            edit_id: None,
        }
    }
}

/// Typed entity slots: the most recently fetched record and record-array per
/// kind, plus the shared datalist slot for autocomplete searches.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct EntitySlots {
    records: BTreeMap<EntityKind, Document>,
    lists: BTreeMap<EntityKind, Rc<Vec<Document>>>,
    datalist: Rc<Vec<Document>>,
}

impl EntitySlots {
    /// The most recently fetched record for a kind.
    #[must_use]
    pub fn record(&self, kind: EntityKind) -> Option<&Document> {
        self.records.get(&kind)
    }

    /// The most recently fetched list for a kind; empty when never loaded.
    #[must_use]
    pub fn list(&self, kind: EntityKind) -> Rc<Vec<Document>> {
        self.lists.get(&kind).cloned().unwrap_or_default()
    }

    /// Autocomplete results, independent of the active collection.
    #[must_use]
    pub fn datalist(&self) -> Rc<Vec<Document>> {
        Rc::clone(&self.datalist)
    }

    pub(crate) fn set_record(&mut self, kind: EntityKind, record: Document) {
        self.records.insert(kind, record);
    }

    pub(crate) fn clear_record(&mut self, kind: EntityKind) {
        self.records.remove(&kind);
    }

    pub(crate) fn set_list(&mut self, kind: EntityKind, rows: Rc<Vec<Document>>) {
        self.lists.insert(kind, rows);
    }

    pub(crate) fn clear_list(&mut self, kind: EntityKind) {
        self.lists.remove(&kind);
    }

    pub(crate) fn set_datalist(&mut self, rows: Rc<Vec<Document>>) {
        self.datalist = rows;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn list_slot_defaults_to_empty() {
        let slots = EntitySlots::default();
        assert!(slots.list(EntityKind::Customer).is_empty());
        assert!(slots.record(EntityKind::Customer).is_none());
    }

    #[test]
    fn slots_hold_one_value_per_kind() {
        let mut slots = EntitySlots::default();
        slots.set_record(EntityKind::Branch, json!({"name": "hq"}));
        slots.set_record(EntityKind::Branch, json!({"name": "depot"}));
        assert_eq!(
            slots.record(EntityKind::Branch),
            Some(&json!({"name": "depot"}))
        );
        slots.clear_record(EntityKind::Branch);
        assert!(slots.record(EntityKind::Branch).is_none());
    }

    #[test]
    fn listing_defaults_match_first_screen() {
        let listing = ListingSlice::default();
        assert_eq!(listing.page, 1);
        assert_eq!(listing.limit, 10);
        assert_eq!(listing.order, -1);
        assert!(listing.ids.is_empty());
    }
}
