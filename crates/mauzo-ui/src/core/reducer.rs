//! The state machine: every mutation of [`AppStore`] is one [`Action`].
//!
//! Merge semantics are shallow by design. A [`StatePatch`] assigns only the
//! fields it populates, clears the error paired with each assigned field and
//! finishes by re-enabling submissions; the control-flag variants assign
//! with no side effects so they never cascade into that reset.

use crate::core::entity::EntityKind;
use crate::core::store::{AppStore, SessionSlice};
use crate::i18n::LocaleCode;
use mauzo_api_models::Document;
use serde_json::{Map, Value};
use std::rc::Rc;
use yewdux::prelude::Reducer;

/// One reducer action.
#[derive(Clone, Debug)]
pub enum Action {
    /// Shallow-merge a partial patch; clears paired field errors and resets
    /// the disabled flag.
    Patch(StatePatch),
    /// Record a field validation error and lock submissions.
    FieldError {
        /// Field the error belongs to.
        field: String,
        /// Human-readable message.
        message: String,
    },
    /// Assign the authenticated flag, no side effects.
    Authenticated(bool),
    /// Assign the loading flag, no side effects.
    Loading(bool),
    /// Assign the disabled flag, no side effects.
    Disabled(bool),
    /// Discard all transient state, carrying over the session shell
    /// (authenticated, notification, theme, primary color).
    Unmount,
}

/// A partial patch over [`AppStore`]; `None` fields are left untouched.
#[derive(Clone, Debug, Default)]
pub struct StatePatch {
    /// Transient notification text.
    pub notification: Option<String>,
    /// Active schema kind.
    pub schema: Option<EntityKind>,
    /// Active collection kind.
    pub collection: Option<EntityKind>,
    /// Active named filter.
    pub condition: Option<String>,
    /// Page-supplied extra condition.
    pub extra_condition: Option<Value>,
    /// Projection of returned fields.
    pub select: Option<Value>,
    /// Keyword-search field paths.
    pub fields: Option<Value>,
    /// Populate-related-references flag.
    pub join_foreign_keys: Option<bool>,
    /// Sort label.
    pub sort: Option<String>,
    /// Sort direction.
    pub order: Option<i64>,
    /// Page size.
    pub limit: Option<u64>,
    /// Current page.
    pub page: Option<u64>,
    /// Selected row ids.
    pub ids: Option<Vec<String>>,
    /// Pagination page-number aids.
    pub page_numbers: Option<Vec<u64>>,
    /// Pagination page-size aids.
    pub limits: Option<Vec<u64>>,
    /// Pending bulk action.
    pub backend_status: Option<String>,
    /// Record being edited.
    pub edit_id: Option<String>,
    /// Signed-in user record.
    pub user: Option<Document>,
    /// Theme name.
    pub theme: Option<String>,
    /// Accent color.
    pub primary_color: Option<String>,
    /// UI language.
    pub locale: Option<LocaleCode>,
    /// Store a fetched record in its slot.
    pub record: Option<(EntityKind, Document)>,
    /// Store a fetched list in its slot.
    pub list: Option<(EntityKind, Rc<Vec<Document>>)>,
    /// Clear the record slot for a kind.
    pub clear_record: Option<EntityKind>,
    /// Clear the list slot for a kind.
    pub clear_list: Option<EntityKind>,
    /// Replace the autocomplete datalist.
    pub datalist: Option<Rc<Vec<Document>>>,
    /// Replace the auto-populated form fields.
    pub form_seed: Option<Map<String, Value>>,
}

impl StatePatch {
    /// A patch that only sets the notification text.
    #[must_use]
    pub fn notify(message: impl Into<String>) -> Self {
        Self {
            notification: Some(message.into()),
            ..Self::default()
        }
    }

    fn apply(self, store: &mut AppStore) {
        let mut touch = |field: &str| {
            store.field_errors.remove(field);
        };
        if let Some(value) = self.notification {
            touch("notification");
            store.notification = value;
        }
        if let Some(value) = self.schema {
            touch(value.schema());
            store.listing.schema = Some(value);
        }
        if let Some(value) = self.collection {
            touch(value.collection());
            store.listing.collection = Some(value);
        }
        if let Some(value) = self.condition {
            touch("condition");
            store.listing.condition = value;
        }
        if let Some(value) = self.extra_condition {
            touch("extra_condition");
            store.listing.extra_condition = Some(value);
        }
        if let Some(value) = self.select {
            touch("select");
            store.listing.select = Some(value);
        }
        if let Some(value) = self.fields {
            touch("fields");
            store.listing.fields = Some(value);
        }
        if let Some(value) = self.join_foreign_keys {
            touch("join_foreign_keys");
            store.listing.join_foreign_keys = value;
        }
        if let Some(value) = self.sort {
            touch("sort");
            store.listing.sort = value;
        }
        if let Some(value) = self.order {
            touch("order");
            store.listing.order = value;
        }
        if let Some(value) = self.limit {
            touch("limit");
            store.listing.limit = value;
        }
        if let Some(value) = self.page {
            touch("page");
            store.listing.page = value;
        }
        if let Some(value) = self.ids {
            touch("ids");
            store.listing.ids = value;
        }
        if let Some(value) = self.page_numbers {
            touch("page_numbers");
            store.listing.page_numbers = value;
        }
        if let Some(value) = self.limits {
            touch("limits");
            store.listing.limits = value;
        }
        if let Some(value) = self.backend_status {
            touch("backend_status");
            store.backend_status = value;
        }
        if let Some(value) = self.edit_id {
            touch("edit_id");
            store.listing.edit_id = Some(value);
        }
        if let Some(value) = self.user {
            touch("user");
            store.session.user = Some(value);
        }
        if let Some(value) = self.theme {
            touch("theme");
            store.session.theme = value;
        }
        if let Some(value) = self.primary_color {
            touch("primary_color");
            store.session.primary_color = value;
        }
        if let Some(value) = self.locale {
            touch("locale");
            store.session.locale = value;
        }
        if let Some((kind, record)) = self.record {
            touch(kind.schema());
            store.slots.set_record(kind, record);
        }
        if let Some((kind, rows)) = self.list {
            touch(kind.collection());
            store.slots.set_list(kind, rows);
        }
        if let Some(kind) = self.clear_record {
            touch(kind.schema());
            store.slots.clear_record(kind);
        }
        if let Some(kind) = self.clear_list {
            touch(kind.collection());
            store.slots.clear_list(kind);
        }
        if let Some(rows) = self.datalist {
            touch("datalist");
            store.slots.set_datalist(rows);
        }
        if let Some(seed) = self.form_seed {
            touch("form_seed");
            store.form_seed = seed;
        }
    }
}

impl Reducer<AppStore> for Action {
    fn apply(self, store: Rc<AppStore>) -> Rc<AppStore> {
        let mut next = (*store).clone();
        match self {
            Self::Patch(patch) => {
                patch.apply(&mut next);
                next.disabled = false;
            }
            Self::FieldError { field, message } => {
                next.field_errors.insert(field, message);
                next.disabled = true;
            }
            Self::Authenticated(value) => next.session.authenticated = value,
            Self::Loading(value) => next.loading = value,
            Self::Disabled(value) => next.disabled = value,
            Self::Unmount => next = unmounted(&next),
        }
        Rc::new(next)
    }
}

/// The initial state with the session shell carried over.
fn unmounted(outgoing: &AppStore) -> AppStore {
    AppStore {
        session: SessionSlice {
            authenticated: outgoing.session.authenticated,
            theme: outgoing.session.theme.clone(),
            primary_color: outgoing.session.primary_color.clone(),
            ..SessionSlice::default()
        },
        notification: outgoing.notification.clone(),
        ..AppStore::default()
    }
}
