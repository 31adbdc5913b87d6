//! The console controller: the single authorized path from UI intent to
//! server mutation/query and back into state.
//!
//! Every operation follows the same shape: guard locally, dispatch control
//! flags, issue the wire call through [`ApiClient`], and fold the outcome
//! back into the store through reducer actions. No operation propagates an
//! error to its caller; every failure ends as a notification.
//!
//! In-flight requests are never cancelled. Two overlapping calls for the
//! same screen race and the last response to resolve wins.

use crate::conditions::{FilterContext, translate};
use crate::core::catalog::{self, VocabularyKind};
use crate::core::config::AppConfig;
use crate::core::entity::EntityKind;
use crate::core::logic;
use crate::core::paging;
use crate::core::reducer::{Action, StatePatch};
use crate::core::store::AppStore;
use crate::i18n::TranslationBundle;
use crate::models::{ListingRoute, MountOptions};
use crate::services::api::{ApiClient, QueryBuilder, Transport};
use mauzo_api_models::{
    BulkOutcome, BulkQuery, Condition, DirectPatch, Method, params, routes,
};
use serde_json::{Map, Value, json};
use std::rc::Rc;
use yewdux::prelude::Dispatch;

/// Form fields auto-populated when a product validation finds an existing
/// record, so restocking an existing product pre-fills its pricing.
const PRODUCT_SEED_FIELDS: &[&str] = &[
    "stock",
    "store_stock",
    "buying_price",
    "selling_price",
    "reorder_stock_level",
    "barcode",
];

/// The application controller. Generic over the transport so every
/// operation is exercised natively against a recording transport.
pub struct Console<T> {
    api: ApiClient<T>,
    dispatch: Dispatch<AppStore>,
    bundle: TranslationBundle,
}

impl<T: Transport> Console<T> {
    /// Build a controller bound to the global store.
    #[must_use]
    pub fn new(config: AppConfig, transport: T) -> Self {
        let dispatch = Dispatch::<AppStore>::new();
        let bundle = TranslationBundle::new(dispatch.get().session.locale);
        Self {
            api: ApiClient::new(config, transport),
            dispatch,
            bundle,
        }
    }

    /// The current state snapshot.
    #[must_use]
    pub fn store(&self) -> Rc<AppStore> {
        self.dispatch.get()
    }

    /// Discard the active screen's state, keeping the session shell.
    pub fn unmount(&self) {
        self.dispatch.apply(Action::Unmount);
    }

    /// Filter-name or sort-label vocabulary for the active collection.
    #[must_use]
    pub fn sort_or_condition(&self, kind: VocabularyKind) -> Vec<&'static str> {
        self.dispatch
            .get()
            .listing
            .collection
            .map(|collection| catalog::sort_or_condition(collection, kind))
            .unwrap_or_default()
    }

    /// Load a page's data when it mounts: record the listing parameters,
    /// then read a single record, the full visible set, or one page.
    ///
    /// On failure the target slot is cleared and the server message becomes
    /// the notification.
    pub async fn mount(&self, options: MountOptions) {
        let schema = options.schema;
        self.patch(StatePatch {
            schema: Some(schema),
            collection: Some(schema),
            condition: Some(options.condition.unwrap_or_else(|| "active".to_string())),
            extra_condition: options.extra_condition,
            select: options.select,
            fields: options.fields,
            sort: options.sort,
            join_foreign_keys: Some(options.join_foreign_keys),
            ..StatePatch::default()
        });
        self.dispatch.apply(Action::Loading(true));
        let route = options.route;
        let envelope = self
            .api
            .call(
                Method::Get,
                route.route(),
                self.listing_query(route == ListingRoute::List),
                None,
                self.user_id().as_deref(),
            )
            .await;
        match route {
            ListingRoute::Read => {
                if envelope.success {
                    self.patch(StatePatch {
                        record: Some((schema, envelope.message)),
                        ..StatePatch::default()
                    });
                } else {
                    self.patch(StatePatch {
                        clear_record: Some(schema),
                        notification: Some(
                            envelope.error_text().unwrap_or("request failed").to_string(),
                        ),
                        ..StatePatch::default()
                    });
                }
            }
            ListingRoute::ListAll => match envelope.documents() {
                Ok(rows) => self.patch(StatePatch {
                    list: Some((schema, Rc::new(rows))),
                    ..StatePatch::default()
                }),
                Err(err) => self.patch(StatePatch {
                    clear_list: Some(schema),
                    notification: Some(err.to_string()),
                    ..StatePatch::default()
                }),
            },
            ListingRoute::List => match envelope.list_payload() {
                Ok(payload) => self.patch(StatePatch {
                    list: Some((schema, Rc::new(payload.documents.clone()))),
                    ..self.pagination_patch(&payload.total_documents, payload.current_page, payload.limit)
                }),
                Err(err) => self.patch(StatePatch {
                    clear_list: Some(schema),
                    notification: Some(err.to_string()),
                    ..StatePatch::default()
                }),
            },
        }
        self.dispatch.apply(Action::Loading(false));
    }

    /// Keyword search across the active collection's search fields. Search
    /// results are not paginated, so the pagination aids are cleared.
    pub async fn search_data(&self, keyword: &str) {
        let Some(keyword) = logic::normalized_keyword(keyword) else {
            self.notify("notify.empty_keyword", "type something to search");
            return;
        };
        let store = self.dispatch.get();
        let Some(collection) = store.listing.collection else {
            return;
        };
        self.dispatch.apply(Action::Loading(true));
        let mut query = QueryBuilder::default()
            .text(params::SCHEMA, collection.schema())
            .text(params::KEYWORD, keyword)
            .value(params::CONDITION, &self.active_condition());
        if let Some(fields) = &store.listing.fields {
            query = query.value(params::FIELDS, fields);
        }
        let envelope = self
            .api
            .call(
                Method::Get,
                routes::SEARCH,
                query,
                None,
                self.user_id().as_deref(),
            )
            .await;
        match envelope.documents() {
            Ok(rows) => self.patch(StatePatch {
                list: Some((collection, Rc::new(rows))),
                page: Some(1),
                page_numbers: Some(Vec::new()),
                limits: Some(Vec::new()),
                ids: Some(Vec::new()),
                ..StatePatch::default()
            }),
            Err(err) => self.patch(StatePatch::notify(err.to_string())),
        }
        self.dispatch.apply(Action::Loading(false));
    }

    /// Re-list under a new named filter, sort, order and page size. A call
    /// matching the current combination is a no-op.
    ///
    /// On failure the list empties into a safe single-page state while the
    /// requested parameters stay recorded, so the controls reflect what the
    /// user asked for.
    pub async fn filter_data(&self, condition: &str, sort: &str, order: i64, limit: u64) {
        let store = self.dispatch.get();
        let Some(collection) = store.listing.collection else {
            return;
        };
        if store.listing.condition == condition
            && store.listing.sort == sort
            && store.listing.order == order
            && store.listing.limit == limit
        {
            return;
        }
        self.patch(StatePatch {
            condition: Some(condition.to_string()),
            sort: Some(sort.to_string()),
            order: Some(order),
            limit: Some(limit),
            page: Some(1),
            page_numbers: Some(Vec::new()),
            limits: Some(Vec::new()),
            ..StatePatch::default()
        });
        self.dispatch.apply(Action::Loading(true));
        let envelope = self
            .api
            .call(
                Method::Get,
                routes::LIST,
                self.listing_query(true),
                None,
                self.user_id().as_deref(),
            )
            .await;
        match envelope.list_payload() {
            Ok(payload) => self.patch(StatePatch {
                list: Some((collection, Rc::new(payload.documents.clone()))),
                ids: Some(Vec::new()),
                ..self.pagination_patch(&payload.total_documents, payload.current_page, payload.limit)
            }),
            Err(err) => self.patch(StatePatch {
                list: Some((collection, Rc::new(Vec::new()))),
                ids: Some(Vec::new()),
                page: Some(1),
                page_numbers: Some(vec![1]),
                notification: Some(err.to_string()),
                ..StatePatch::default()
            }),
        }
        self.dispatch.apply(Action::Loading(false));
    }

    /// Jump to another page of the current listing. Page `0` and the
    /// current page are rejected locally.
    pub async fn paginate_data(&self, page: u64) {
        let store = self.dispatch.get();
        let Some(collection) = store.listing.collection else {
            return;
        };
        if page == 0 || page == store.listing.page {
            return;
        }
        self.patch(StatePatch {
            page: Some(page),
            ..StatePatch::default()
        });
        self.dispatch.apply(Action::Loading(true));
        let envelope = self
            .api
            .call(
                Method::Get,
                routes::LIST,
                self.listing_query(true),
                None,
                self.user_id().as_deref(),
            )
            .await;
        match envelope.list_payload() {
            Ok(payload) => self.patch(StatePatch {
                list: Some((collection, Rc::new(payload.documents.clone()))),
                ..self.pagination_patch(&payload.total_documents, payload.current_page, payload.limit)
            }),
            Err(err) => self.patch(StatePatch::notify(err.to_string())),
        }
        self.dispatch.apply(Action::Loading(false));
    }

    /// Toggle one row in or out of the selection, or with no id flip
    /// between select-all and clear based on the current coverage.
    pub fn select_list(&self, id: Option<&str>) {
        let store = self.dispatch.get();
        let Some(collection) = store.listing.collection else {
            return;
        };
        let ids = id.map_or_else(
            || logic::select_all_or_clear(&store.listing.ids, &store.slots.list(collection)),
            |id| logic::toggle_selection(&store.listing.ids, id),
        );
        self.patch(StatePatch {
            ids: Some(ids),
            ..StatePatch::default()
        });
    }

    /// Apply the pending bulk status to every selected row.
    ///
    /// Product and purchase screens use their dedicated routes with a
    /// direct field-patch body; everything else goes through the generic
    /// bulk routes with `$set` patches — one descriptor object, or the
    /// multi-descriptor array when several rows are selected. Only a batch
    /// with zero
    /// failed descriptors reconciles the local list; a partial failure
    /// leaves the rows as they were until the next fetch. The selection is
    /// cleared and the success notification shown either way.
    pub async fn update_backend_status(&self) {
        let store = self.dispatch.get();
        let Some(collection) = store.listing.collection else {
            return;
        };
        let schema = store.listing.schema.unwrap_or(collection);
        if store.listing.ids.is_empty() {
            self.notify("notify.no_selection", "no records selected");
            return;
        }
        let status = store.backend_status.clone();
        let (field, value) = logic::status_patch(&status);
        let (route, body) = bulk_request(schema, &store.listing.ids, field, &value);
        self.dispatch.apply(Action::Loading(true));
        let envelope = self
            .api
            .call(
                Method::Put,
                route,
                QueryBuilder::default(),
                Some(&body),
                self.user_id().as_deref(),
            )
            .await;
        if envelope.success {
            let outcome: BulkOutcome =
                serde_json::from_value(envelope.message.clone()).unwrap_or_default();
            let mut patch = StatePatch {
                ids: Some(Vec::new()),
                backend_status: Some(String::new()),
                notification: Some(self.bulk_notification(store.listing.ids.len(), &status)),
                ..StatePatch::default()
            };
            if outcome.failed_queries.is_empty() {
                let rows = logic::reconcile_after_bulk(
                    &store.slots.list(collection),
                    &store.listing.ids,
                    &status,
                );
                patch.list = Some((collection, Rc::new(rows)));
            }
            self.patch(patch);
        } else {
            self.patch(StatePatch::notify(
                envelope.error_text().unwrap_or("request failed").to_string(),
            ));
        }
        self.dispatch.apply(Action::Loading(false));
    }

    /// Check a field value for uniqueness against the backend. A hit
    /// records the conflicting record, locks submissions with a field
    /// error, and for products seeds the dependent form fields from the
    /// found record.
    pub async fn validate(&self, field: &str, value: &str) {
        let store = self.dispatch.get();
        let Some(schema) = store.listing.schema else {
            return;
        };
        if value.trim().is_empty() || store.field_errors.contains_key(field) {
            return;
        }
        let mut condition = Map::new();
        condition.insert(field.to_string(), Value::String(value.to_string()));
        condition.insert("visible".to_string(), Value::Bool(true));
        if let Some(edit_id) = &store.listing.edit_id {
            condition.insert("_id".to_string(), json!({"$ne": edit_id}));
        }
        let query = QueryBuilder::default()
            .text(params::SCHEMA, schema.schema())
            .value(params::CONDITION, &Value::Object(condition));
        let envelope = self
            .api
            .call(
                Method::Get,
                routes::VALIDATE,
                query,
                None,
                self.user_id().as_deref(),
            )
            .await;
        let found = envelope.message.clone();
        let duplicate =
            envelope.success && found.as_object().is_some_and(|object| !object.is_empty());
        if !duplicate {
            return;
        }
        let mut patch = StatePatch {
            record: Some((schema, found.clone())),
            ..StatePatch::default()
        };
        if schema == EntityKind::Product {
            let mut seed = Map::new();
            for key in PRODUCT_SEED_FIELDS {
                if let Some(entry) = found.get(*key) {
                    seed.insert((*key).to_string(), entry.clone());
                }
            }
            patch.form_seed = Some(seed);
        }
        self.patch(patch);
        self.dispatch.apply(Action::FieldError {
            field: field.to_string(),
            message: format!(
                "{field} {}",
                self.bundle.text("validate.exists", "already exists")
            ),
        });
    }

    /// Autocomplete search against an arbitrary schema, filling the shared
    /// datalist slot instead of the active collection.
    pub async fn datalist_search(&self, schema: EntityKind, keyword: &str, fields: &Value) {
        let Some(keyword) = logic::normalized_keyword(keyword) else {
            return;
        };
        let query = QueryBuilder::default()
            .text(params::SCHEMA, schema.schema())
            .text(params::KEYWORD, keyword)
            .value(params::FIELDS, fields)
            .value(params::CONDITION, &self.active_condition());
        let envelope = self
            .api
            .call(
                Method::Get,
                routes::SEARCH,
                query,
                None,
                self.user_id().as_deref(),
            )
            .await;
        match envelope.documents() {
            Ok(rows) => self.patch(StatePatch {
                datalist: Some(Rc::new(rows)),
                ..StatePatch::default()
            }),
            Err(err) => self.patch(StatePatch::notify(err.to_string())),
        }
    }

    /// Create a record, or update the one being edited. Blocked while a
    /// prior submission is in flight or a field error is unresolved.
    pub async fn create_or_update(&self, document: &Value) {
        let store = self.dispatch.get();
        let Some(schema) = store.listing.schema else {
            return;
        };
        if store.disabled {
            return;
        }
        self.dispatch.apply(Action::Disabled(true));
        let (method, route, query, key, default) = store.listing.edit_id.as_ref().map_or_else(
            || {
                (
                    Method::Post,
                    routes::CREATE,
                    QueryBuilder::default().text(params::SCHEMA, schema.schema()),
                    "notify.saved",
                    "saved successfully",
                )
            },
            |edit_id| {
                (
                    Method::Put,
                    routes::UPDATE,
                    QueryBuilder::default()
                        .text(params::SCHEMA, schema.schema())
                        .value(params::CONDITION, &json!({"_id": edit_id})),
                    "notify.updated",
                    "updated successfully",
                )
            },
        );
        let envelope = self
            .api
            .call(method, route, query, Some(document), self.user_id().as_deref())
            .await;
        if envelope.success {
            let mut patch = StatePatch::notify(self.bundle.text(key, default));
            if envelope.message.is_object() {
                patch.record = Some((schema, envelope.message));
            }
            self.patch(patch);
        } else {
            self.patch(StatePatch::notify(
                envelope.error_text().unwrap_or("request failed").to_string(),
            ));
        }
    }

    /// Read a single record by condition into its slot. Blocked while
    /// another submission is in flight.
    pub async fn read_record(&self, condition: &Value) {
        let store = self.dispatch.get();
        let Some(schema) = store.listing.schema else {
            return;
        };
        if store.disabled {
            return;
        }
        self.dispatch.apply(Action::Disabled(true));
        let query = QueryBuilder::default()
            .text(params::SCHEMA, schema.schema())
            .value(params::CONDITION, condition);
        let envelope = self
            .api
            .call(
                Method::Get,
                routes::READ,
                query,
                None,
                self.user_id().as_deref(),
            )
            .await;
        if envelope.success {
            self.patch(StatePatch {
                record: Some((schema, envelope.message)),
                ..StatePatch::default()
            });
        } else {
            self.patch(StatePatch::notify(
                envelope.error_text().unwrap_or("request failed").to_string(),
            ));
        }
    }

    /// Delete a single record by condition. A deleted row also leaves the
    /// visible list when the condition names its id. Blocked while another
    /// submission is in flight.
    pub async fn delete_record(&self, condition: &Value) {
        let store = self.dispatch.get();
        let Some(schema) = store.listing.schema else {
            return;
        };
        if store.disabled {
            return;
        }
        self.dispatch.apply(Action::Disabled(true));
        let query = QueryBuilder::default()
            .text(params::SCHEMA, schema.schema())
            .value(params::CONDITION, condition);
        let envelope = self
            .api
            .call(
                Method::Delete,
                routes::DELETE,
                query,
                None,
                self.user_id().as_deref(),
            )
            .await;
        if envelope.success {
            let mut patch =
                StatePatch::notify(self.bundle.text("notify.deleted", "deleted successfully"));
            if let Some(id) = condition.get("_id").and_then(Value::as_str) {
                let rows = logic::reconcile_after_bulk(
                    &store.slots.list(schema),
                    &[id.to_string()],
                    "deleted",
                );
                patch.list = Some((schema, Rc::new(rows)));
            }
            self.patch(patch);
        } else {
            self.patch(StatePatch::notify(
                envelope.error_text().unwrap_or("request failed").to_string(),
            ));
        }
    }

    fn patch(&self, patch: StatePatch) {
        self.dispatch.apply(Action::Patch(patch));
    }

    fn notify(&self, key: &str, default: &str) {
        self.patch(StatePatch::notify(self.bundle.text(key, default)));
    }

    fn user_id(&self) -> Option<String> {
        let from_state = self
            .dispatch
            .get()
            .session
            .user
            .as_ref()
            .and_then(|user| logic::doc_id(user).map(ToString::to_string));
        #[cfg(target_arch = "wasm32")]
        {
            from_state.or_else(crate::app::stored_user_id)
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            from_state
        }
    }

    fn branch_scope(&self) -> Option<String> {
        let store = self.dispatch.get();
        let branch = store.session.user.as_ref()?.get("branch")?;
        branch.as_str().map(ToString::to_string).or_else(|| {
            branch
                .get("_id")
                .and_then(Value::as_str)
                .map(ToString::to_string)
        })
    }

    /// The wire condition for the active screen: the named filter applied
    /// to the branch-scoped base, shallow-merged with any page-supplied
    /// extra condition.
    fn active_condition(&self) -> Value {
        let store = self.dispatch.get();
        let ctx = FilterContext::current(&current_path());
        let translated = translate(
            &store.listing.condition,
            &ctx,
            Condition::base(self.branch_scope()),
        );
        logic::merge_conditions(
            serde_json::to_value(translated).unwrap_or_default(),
            store.listing.extra_condition.as_ref(),
        )
    }

    fn listing_query(&self, paginated: bool) -> QueryBuilder {
        let store = self.dispatch.get();
        let schema = store.listing.schema.map_or("", EntityKind::schema);
        let mut sort = Map::new();
        sort.insert(
            logic::sort_field(&store.listing.sort),
            Value::from(store.listing.order),
        );
        let mut query = QueryBuilder::default()
            .text(params::SCHEMA, schema)
            .value(params::CONDITION, &self.active_condition())
            .value(params::SORT, &Value::Object(sort))
            .text(
                params::JOIN_FOREIGN_KEYS,
                store.listing.join_foreign_keys.to_string(),
            );
        if let Some(select) = &store.listing.select {
            query = query.value(params::SELECT, select);
        }
        if paginated {
            query = query
                .text(params::PAGE, store.listing.page.to_string())
                .text(params::LIMIT, store.listing.limit.to_string());
        }
        query
    }

    /// Fold fresh server pagination metadata into the cumulative aids.
    fn pagination_patch(&self, pages: &[u64], current_page: u64, limit: u64) -> StatePatch {
        let store = self.dispatch.get();
        let current = current_page.max(1);
        let window = paging::page_window(pages, current, paging::window_capacity(viewport_width()));
        let limit = if limit == 0 { store.listing.limit } else { limit };
        StatePatch {
            page: Some(current),
            limit: Some(limit),
            page_numbers: Some(paging::merge_page_numbers(
                &store.listing.page_numbers,
                &window,
            )),
            limits: Some(paging::merge_limits(
                &store.listing.limits,
                &paging::limit_ladder(limit),
            )),
            ..StatePatch::default()
        }
    }

    fn bulk_notification(&self, count: usize, status: &str) -> String {
        let (key, default) = match status {
            "deleted" => ("notify.deleted", "deleted successfully"),
            "restored" => ("notify.restored", "restored successfully"),
            _ => ("notify.updated", "updated successfully"),
        };
        format!(
            "{} {}",
            logic::pluralized(count, "record", "records"),
            self.bundle.text(key, default)
        )
    }
}

fn bulk_request(
    schema: EntityKind,
    ids: &[String],
    field: &str,
    value: &Value,
) -> (&'static str, Value) {
    match schema {
        EntityKind::Product | EntityKind::Purchase => {
            let patches: Vec<DirectPatch> = ids
                .iter()
                .map(|id| {
                    let mut fields = Map::new();
                    fields.insert(field.to_string(), value.clone());
                    DirectPatch {
                        id: id.clone(),
                        fields,
                    }
                })
                .collect();
            let route = if schema == EntityKind::Product {
                routes::PRODUCT_BULK_UPDATE
            } else {
                routes::PURCHASE_BULK_UPDATE
            };
            (route, serde_json::to_value(patches).unwrap_or_default())
        }
        _ => {
            let queries: Vec<BulkQuery> = ids
                .iter()
                .map(|id| {
                    let mut set = Map::new();
                    set.insert(field.to_string(), value.clone());
                    let mut update = Map::new();
                    update.insert("$set".to_string(), Value::Object(set));
                    BulkQuery {
                        schema: schema.schema().to_string(),
                        condition: json!({"_id": id}),
                        update: Value::Object(update),
                    }
                })
                .collect();
            // A lone descriptor travels as one object on the single route.
            if let [query] = queries.as_slice() {
                (
                    routes::BULK_UPDATE,
                    serde_json::to_value(query).unwrap_or_default(),
                )
            } else {
                (
                    routes::BULK_UPDATE_MANY,
                    serde_json::to_value(queries).unwrap_or_default(),
                )
            }
        }
    }
}

#[allow(clippy::missing_const_for_fn)]
fn current_path() -> String {
    #[cfg(target_arch = "wasm32")]
    {
        web_sys::window()
            .and_then(|window| window.location().pathname().ok())
            .unwrap_or_default()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        String::new()
    }
}

/// Only the wide/narrow split matters downstream, so the browser reading is
/// collapsed onto the breakpoint instead of cast through float widths.
#[allow(clippy::missing_const_for_fn)]
fn viewport_width() -> u16 {
    #[cfg(target_arch = "wasm32")]
    {
        let width = web_sys::window()
            .and_then(|window| window.inner_width().ok())
            .and_then(|value| value.as_f64())
            .unwrap_or(0.0);
        if width > f64::from(paging::WIDE_VIEWPORT_MIN) {
            paging::WIDE_VIEWPORT_MIN + 1
        } else {
            paging::WIDE_VIEWPORT_MIN
        }
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        1280
    }
}

#[cfg(target_arch = "wasm32")]
impl<T: Transport> Console<T> {
    /// Upload a picked file into a server folder via multipart form.
    pub async fn upload_file(&self, file: &web_sys::File, folder: &str) {
        let body = mauzo_api_models::UploadBody {
            folder: folder.to_string(),
        };
        let Ok(body_text) = serde_json::to_string(&body) else {
            return;
        };
        let Ok(form) = web_sys::FormData::new() else {
            self.notify("notify.upload_failed", "file upload failed");
            return;
        };
        if form.append_with_blob("file", file).is_err()
            || form.append_with_str("body", &body_text).is_err()
        {
            self.notify("notify.upload_failed", "file upload failed");
            return;
        }
        let url = self.api.config().route_url(routes::UPLOAD_FILE);
        let token = self.api.token_for(self.user_id().as_deref());
        let outcome = gloo_net::http::Request::post(&url)
            .header("token", &token)
            .body(form)
            .send()
            .await;
        match outcome {
            Ok(response) if response.ok() => {
                self.notify("notify.uploaded", "file uploaded successfully");
            }
            Ok(response) => self.patch(StatePatch::notify(format!(
                "upload failed with status {}",
                response.status()
            ))),
            Err(err) => self.patch(StatePatch::notify(err.to_string())),
        }
    }

    /// Download the active collection's rows as a CSV sheet.
    pub fn export_rows(&self, filename: &str) {
        let store = self.dispatch.get();
        let Some(collection) = store.listing.collection else {
            return;
        };
        let rows = store.slots.list(collection);
        match crate::services::spreadsheet::rows_to_csv(&rows) {
            Ok(sheet) => {
                if crate::services::files::download_text(filename, &sheet, "text/csv").is_err() {
                    self.notify("notify.export_failed", "export failed");
                }
            }
            Err(err) => self.patch(StatePatch::notify(err.to_string())),
        }
    }

    /// Import a picked CSV file, creating one record per row.
    pub async fn import_rows(&self, file: &web_sys::File) {
        let Ok(text) = crate::services::files::read_file_text(file).await else {
            self.notify("notify.import_failed", "import failed");
            return;
        };
        let rows = match crate::services::spreadsheet::csv_to_rows(&text) {
            Ok(rows) => rows,
            Err(err) => {
                self.patch(StatePatch::notify(err.to_string()));
                return;
            }
        };
        self.dispatch.apply(Action::Loading(true));
        for row in &rows {
            self.create_or_update(row).await;
        }
        self.patch(StatePatch::notify(format!(
            "{} {}",
            logic::pluralized(rows.len(), "record", "records"),
            self.bundle.text("notify.imported", "imported successfully")
        )));
        self.dispatch.apply(Action::Loading(false));
    }

    /// Render the active sale's fiscal receipt and offer it as a text
    /// download for the printer bridge.
    pub fn download_tra_receipt(&self) {
        let store = self.dispatch.get();
        let receipt = store
            .slots
            .record(EntityKind::Sale)
            .zip(store.session.user.as_ref())
            .and_then(|(sale, user)| {
                crate::services::fiscal::FiscalReceipt::from_sale(sale, user)
            });
        let Some(receipt) = receipt else {
            self.notify("notify.receipt_failed", "no receipt to print");
            return;
        };
        if crate::services::files::download_text("receipt.txt", &receipt.render(), "text/plain")
            .is_err()
        {
            self.notify("notify.receipt_failed", "no receipt to print");
        }
    }

    /// Send one SMS through the relay with the branch credentials.
    pub async fn send_message(&self, recipient: &str, text: &str) {
        let store = self.dispatch.get();
        let settings = store
            .session
            .user
            .as_ref()
            .and_then(crate::services::sms::settings_from_user);
        let Some(settings) = settings else {
            self.notify("notify.sms_failed", "branch has no SMS settings");
            return;
        };
        match crate::services::sms::send_message(&settings, recipient, text).await {
            Ok(()) => self.notify("notify.sms_sent", "message sent successfully"),
            Err(err) => self.patch(StatePatch::notify(err.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{RecordingTransport, SeenRequests};
    use mauzo_api_models::Document;

    fn console(responses: &[&str]) -> (Console<RecordingTransport>, SeenRequests) {
        let (transport, seen) = RecordingTransport::replying(responses);
        (Console::new(AppConfig::default(), transport), seen)
    }

    fn seed_listing(schema: EntityKind, rows: &[Document], ids: &[&str], status: &str) {
        let dispatch = Dispatch::<AppStore>::new();
        dispatch.apply(Action::Patch(StatePatch {
            schema: Some(schema),
            collection: Some(schema),
            ids: Some(ids.iter().map(ToString::to_string).collect()),
            backend_status: Some(status.to_string()),
            list: Some((schema, Rc::new(rows.to_vec()))),
            ..StatePatch::default()
        }));
    }

    fn row(id: &str) -> Document {
        json!({"_id": id, "name": id})
    }

    #[tokio::test]
    async fn mounting_a_list_fills_the_slot_and_page_numbers() {
        let (console, seen) = console(&[r#"{
            "success": true,
            "message": {
                "documents": [
                    {"_id": "c1", "name": "Asha"},
                    {"_id": "c2", "name": "Bakari"},
                    {"_id": "c3", "name": "Chausiku"}
                ],
                "currentPage": 1,
                "nextPage": 0,
                "previousPage": 0,
                "totalDocuments": [1],
                "limit": 10
            }
        }"#]);
        console.mount(MountOptions::list(EntityKind::Customer)).await;
        let store = console.store();
        assert_eq!(store.slots.list(EntityKind::Customer).len(), 3);
        assert_eq!(store.listing.page_numbers, vec![1]);
        assert_eq!(store.listing.limits.first(), Some(&10));
        assert_eq!(store.listing.limits.last(), Some(&1000));
        assert!(!store.loading);
        let url = &seen.borrow()[0].url;
        assert!(url.contains("list?"), "{url}");
        assert!(url.contains("schema=customer"), "{url}");
    }

    #[tokio::test]
    async fn mount_failure_clears_the_slot_and_notifies() {
        let (console, _seen) = console(&[r#"{"success": false, "message": "no permission"}"#]);
        console.mount(MountOptions::list(EntityKind::Customer)).await;
        let store = console.store();
        assert!(store.slots.list(EntityKind::Customer).is_empty());
        assert_eq!(store.notification, "no permission");
        assert!(!store.loading);
    }

    #[tokio::test]
    async fn whitespace_search_never_touches_the_network() {
        let (console, seen) = console(&[]);
        seed_listing(EntityKind::Customer, &[], &[], "");
        console.search_data("   ").await;
        assert!(seen.borrow().is_empty());
        assert!(!console.store().notification.is_empty());
    }

    #[tokio::test]
    async fn search_clears_the_pagination_aids() {
        let (console, seen) = console(&[r#"{"success": true, "message": [{"_id": "c9"}]}"#]);
        seed_listing(EntityKind::Customer, &[row("c1")], &[], "");
        let dispatch = Dispatch::<AppStore>::new();
        dispatch.apply(Action::Patch(StatePatch {
            page_numbers: Some(vec![1, 2, 3]),
            ..StatePatch::default()
        }));
        console.search_data(" asha ").await;
        let store = console.store();
        assert_eq!(store.slots.list(EntityKind::Customer).len(), 1);
        assert!(store.listing.page_numbers.is_empty());
        assert!(seen.borrow()[0].url.contains("keyword=asha"));
    }

    #[tokio::test]
    async fn filter_data_is_idempotent_on_the_same_combination() {
        let (console, seen) = console(&[r#"{
            "success": true,
            "message": {"documents": [], "currentPage": 1, "totalDocuments": [1], "limit": 10}
        }"#]);
        seed_listing(EntityKind::Sale, &[], &[], "");
        console.filter_data("unpaid", "created time", -1, 10).await;
        console.filter_data("unpaid", "created time", -1, 10).await;
        assert_eq!(seen.borrow().len(), 1);
    }

    #[tokio::test]
    async fn filter_failure_keeps_the_requested_parameters() {
        let (console, _seen) = console(&[r#"{"success": false, "message": "boom"}"#]);
        seed_listing(EntityKind::Sale, &[row("s1")], &[], "");
        console.filter_data("unpaid", "total amount", 1, 25).await;
        let store = console.store();
        assert!(store.slots.list(EntityKind::Sale).is_empty());
        assert_eq!(store.listing.condition, "unpaid");
        assert_eq!(store.listing.sort, "total amount");
        assert_eq!(store.listing.order, 1);
        assert_eq!(store.listing.limit, 25);
        assert_eq!(store.listing.page, 1);
        assert_eq!(store.listing.page_numbers, vec![1]);
        assert_eq!(store.notification, "boom");
    }

    #[tokio::test]
    async fn paginate_rejects_page_zero_and_the_current_page() {
        let (console, seen) = console(&[]);
        seed_listing(EntityKind::Customer, &[], &[], "");
        console.paginate_data(0).await;
        console.paginate_data(1).await;
        assert!(seen.borrow().is_empty());
    }

    #[tokio::test]
    async fn select_list_toggles_and_selects_all() {
        let (console, _seen) = console(&[]);
        seed_listing(EntityKind::Customer, &[row("a"), row("b")], &[], "");
        console.select_list(Some("a"));
        assert_eq!(console.store().listing.ids, vec!["a".to_string()]);
        console.select_list(None);
        assert_eq!(
            console.store().listing.ids,
            vec!["a".to_string(), "b".to_string()]
        );
        console.select_list(None);
        assert!(console.store().listing.ids.is_empty());
    }

    #[tokio::test]
    async fn bulk_delete_removes_rows_and_clears_selection() {
        let (console, seen) = console(&[r#"{
            "success": true,
            "message": {"failedQueries": [], "passedQueries": [{}, {}]}
        }"#]);
        seed_listing(
            EntityKind::Customer,
            &[row("a"), row("b"), row("c")],
            &["a", "c"],
            "deleted",
        );
        console.update_backend_status().await;
        let store = console.store();
        assert_eq!(store.slots.list(EntityKind::Customer).len(), 1);
        assert!(store.listing.ids.is_empty());
        assert!(store.backend_status.is_empty());
        assert!(store.notification.starts_with("2 records"));
        let request = seen.borrow()[0].clone();
        assert!(request.url.ends_with("bulk-update-many"));
        let body: Value = serde_json::from_str(request.body.as_deref().unwrap()).unwrap();
        assert_eq!(body[0]["update"], json!({"$set": {"visible": false}}));
    }

    #[tokio::test]
    async fn bulk_enable_patches_rows_in_place() {
        let (console, _seen) = console(&[r#"{
            "success": true,
            "message": {"failedQueries": [], "passedQueries": [{}]}
        }"#]);
        seed_listing(EntityKind::User, &[row("u1"), row("u2")], &["u2"], "enabled");
        console.update_backend_status().await;
        let rows = console.store().slots.list(EntityKind::User);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1]["disabled"], json!(false));
    }

    #[tokio::test]
    async fn partial_bulk_failure_leaves_the_list_untouched() {
        let (console, _seen) = console(&[r#"{
            "success": true,
            "message": {"failedQueries": [{}], "passedQueries": [{}]}
        }"#]);
        seed_listing(
            EntityKind::Customer,
            &[row("a"), row("b")],
            &["a", "b"],
            "deleted",
        );
        console.update_backend_status().await;
        let store = console.store();
        assert_eq!(store.slots.list(EntityKind::Customer).len(), 2);
        assert!(store.listing.ids.is_empty());
        assert!(store.notification.starts_with("2 records"));
    }

    #[tokio::test]
    async fn bulk_update_with_no_selection_only_notifies() {
        let (console, seen) = console(&[]);
        seed_listing(EntityKind::Customer, &[row("a")], &[], "deleted");
        console.update_backend_status().await;
        assert!(seen.borrow().is_empty());
        assert!(!console.store().notification.is_empty());
    }

    #[tokio::test]
    async fn product_bulk_updates_use_the_dedicated_route_and_body() {
        let (console, seen) = console(&[r#"{
            "success": true,
            "message": {"failedQueries": [], "passedQueries": [{}]}
        }"#]);
        seed_listing(EntityKind::Product, &[row("p1")], &["p1"], "deleted");
        console.update_backend_status().await;
        let request = seen.borrow()[0].clone();
        assert!(request.url.ends_with("product/bulk-update"));
        let body: Value = serde_json::from_str(request.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!([{"_id": "p1", "visible": false}]));
    }

    #[tokio::test]
    async fn duplicate_validation_locks_submissions_and_seeds_products() {
        let (console, _seen) = console(&[r#"{
            "success": true,
            "message": {
                "_id": "p1",
                "name": "Rice 5kg",
                "stock": 40,
                "selling_price": 18000,
                "barcode": "6291041500213"
            }
        }"#]);
        seed_listing(EntityKind::Product, &[], &[], "");
        console.validate("name", "Rice 5kg").await;
        let store = console.store();
        assert!(store.disabled);
        assert!(store.field_errors.contains_key("name"));
        assert_eq!(store.form_seed.get("stock"), Some(&json!(40)));
        assert_eq!(store.form_seed.get("barcode"), Some(&json!("6291041500213")));
        assert!(store.form_seed.get("name").is_none());
        assert!(store.slots.record(EntityKind::Product).is_some());
    }

    #[tokio::test]
    async fn validation_misses_change_nothing() {
        let (console, _seen) = console(&[r#"{"success": false, "message": "not found"}"#]);
        seed_listing(EntityKind::Customer, &[], &[], "");
        console.validate("name", "Asha").await;
        let store = console.store();
        assert!(!store.disabled);
        assert!(store.field_errors.is_empty());
    }

    #[tokio::test]
    async fn create_is_blocked_while_disabled() {
        let (console, seen) = console(&[]);
        seed_listing(EntityKind::Customer, &[], &[], "");
        Dispatch::<AppStore>::new().apply(Action::Disabled(true));
        console.create_or_update(&json!({"name": "Asha"})).await;
        assert!(seen.borrow().is_empty());
    }

    #[tokio::test]
    async fn editing_routes_through_update_with_an_id_condition() {
        let (console, seen) = console(&[r#"{"success": true, "message": {"_id": "c1"}}"#]);
        seed_listing(EntityKind::Customer, &[], &[], "");
        Dispatch::<AppStore>::new().apply(Action::Patch(StatePatch {
            edit_id: Some("c1".to_string()),
            ..StatePatch::default()
        }));
        console.create_or_update(&json!({"name": "Asha"})).await;
        let request = seen.borrow()[0].clone();
        assert_eq!(request.method, Method::Put);
        assert!(request.url.contains("update?"));
        assert!(request.url.contains("_id"));
        assert!(!console.store().disabled);
    }

    #[tokio::test]
    async fn single_selection_routes_through_the_single_descriptor_body() {
        let (console, seen) = console(&[r#"{
            "success": true,
            "message": {"failedQueries": [], "passedQueries": [{}]}
        }"#]);
        seed_listing(EntityKind::Customer, &[row("a")], &["a"], "deleted");
        console.update_backend_status().await;
        let request = seen.borrow()[0].clone();
        assert!(request.url.ends_with("bulk-update"), "{}", request.url);
        assert!(!request.url.ends_with("bulk-update-many"));
        let body: Value = serde_json::from_str(request.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["schema"], json!("customer"));
        assert_eq!(body["condition"], json!({"_id": "a"}));
        assert_eq!(body["update"], json!({"$set": {"visible": false}}));
    }

    #[tokio::test]
    async fn read_and_delete_are_blocked_while_disabled() {
        let (console, seen) = console(&[]);
        seed_listing(EntityKind::Customer, &[row("a")], &[], "");
        Dispatch::<AppStore>::new().apply(Action::Disabled(true));
        console.read_record(&json!({"_id": "a"})).await;
        console.delete_record(&json!({"_id": "a"})).await;
        assert!(seen.borrow().is_empty());
        assert_eq!(console.store().slots.list(EntityKind::Customer).len(), 1);
    }

    #[tokio::test]
    async fn delete_record_drops_the_row_from_the_list() {
        let (console, _seen) = console(&[r#"{"success": true, "message": "deleted"}"#]);
        seed_listing(EntityKind::Customer, &[row("a"), row("b")], &[], "");
        console.delete_record(&json!({"_id": "a"})).await;
        let rows = console.store().slots.list(EntityKind::Customer);
        assert_eq!(rows.len(), 1);
        assert_eq!(logic::doc_id(&rows[0]), Some("b"));
    }

    #[tokio::test]
    async fn vocabulary_follows_the_active_collection() {
        let (console, _seen) = console(&[]);
        seed_listing(EntityKind::Sale, &[], &[], "");
        let filters = console.sort_or_condition(VocabularyKind::Condition);
        assert!(filters.contains(&"unpaid"));
        assert!(!console.sort_or_condition(VocabularyKind::Sort).is_empty());
    }
}
