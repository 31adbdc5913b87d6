#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::multiple_crate_versions)]
//! Shared HTTP DTOs for the Mauzo admin API.
//!
//! Every console request and response passes through these types so the wire
//! contract stays in one place: the `{success, message}` envelope, the list
//! payload with its pagination metadata, the bulk-update descriptors, and
//! the Mongo-style condition tree sent as the `condition` query parameter.
//! The backend itself is an external collaborator with a fixed contract;
//! nothing here is negotiable per deployment.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod condition;

pub use condition::{Condition, Expr, Operand};

/// A backend record. Documents are schema-driven on the server, so the
/// console treats them as opaque JSON objects.
pub type Document = Value;

/// Route fragments appended to the versioned API base
/// (`{serverURL}/{apiV1}{route}`).
pub mod routes {
    /// Create a single record of the active schema.
    pub const CREATE: &str = "create";
    /// Read a single record by condition.
    pub const READ: &str = "read";
    /// Paginated listing.
    pub const LIST: &str = "list";
    /// Unpaginated listing (entire visible set).
    pub const LIST_ALL: &str = "list-all";
    /// Keyword search across selected fields.
    pub const SEARCH: &str = "search";
    /// Field-uniqueness existence check.
    pub const VALIDATE: &str = "validate";
    /// Update a single record.
    pub const UPDATE: &str = "update";
    /// Delete a single record.
    pub const DELETE: &str = "delete";
    /// Single-batch bulk update (one descriptor).
    pub const BULK_UPDATE: &str = "bulk-update";
    /// Multi-descriptor bulk update (one entry per affected id).
    pub const BULK_UPDATE_MANY: &str = "bulk-update-many";
    /// Dedicated product bulk route with a direct field-patch body.
    pub const PRODUCT_BULK_UPDATE: &str = "product/bulk-update";
    /// Dedicated purchase bulk route with a direct field-patch body.
    pub const PURCHASE_BULK_UPDATE: &str = "purchase/bulk-update";
    /// Multipart file upload.
    pub const UPLOAD_FILE: &str = "upload-file";
}

/// Query parameter names used by read-style routes. Structured parameters
/// are JSON-serialized and percent-encoded individually by the caller.
pub mod params {
    /// Singular entity-type name of the request.
    pub const SCHEMA: &str = "schema";
    /// JSON condition object scoping the read.
    pub const CONDITION: &str = "condition";
    /// JSON projection of returned fields.
    pub const SELECT: &str = "select";
    /// JSON sort object (`{field: 1|-1}`).
    pub const SORT: &str = "sort";
    /// Backend populate flag for related-entity references.
    pub const JOIN_FOREIGN_KEYS: &str = "joinForeignKeys";
    /// JSON array of field paths a keyword search matches against.
    pub const FIELDS: &str = "fields";
    /// Keyword for search routes.
    pub const KEYWORD: &str = "keyword";
    /// 1-based page number for paginated listings.
    pub const PAGE: &str = "page";
    /// Page size for paginated listings.
    pub const LIMIT: &str = "limit";
    /// The single sealed parameter replacing all others in sealed mode.
    pub const PAYLOAD: &str = "payload";
}

/// HTTP methods the console issues. Kept as a contract enum so call sites
/// stay symbolic and transport clients map to their own request builders.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    /// Read-style request.
    Get,
    /// Create-style request.
    Post,
    /// Update-style request.
    Put,
    /// Delete-style request.
    Delete,
}

impl Method {
    /// Canonical method token.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

/// Errors raised while interpreting a response envelope.
#[derive(Debug, thiserror::Error)]
pub enum EnvelopeError {
    /// The server reported a business failure (`success: false`).
    #[error("{0}")]
    Failure(String),
    /// The payload did not match the expected shape.
    #[error("unexpected payload shape: {0}")]
    Shape(#[from] serde_json::Error),
}

/// The `{success, message}` envelope wrapping every server response.
///
/// `message` is polymorphic by contract: the payload object, a list payload,
/// or a human-readable error string when `success` is false.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Envelope {
    /// Whether the server accepted and completed the request.
    pub success: bool,
    /// Payload or error string, depending on `success`.
    #[serde(default)]
    pub message: Value,
}

impl Envelope {
    /// Build a failure envelope from a local error description. Transport
    /// and decode failures are normalized through this so callers only ever
    /// see the envelope shape.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Value::String(message.into()),
        }
    }

    /// The error text carried by a failure envelope, when present.
    #[must_use]
    pub fn error_text(&self) -> Option<&str> {
        if self.success { None } else { self.message.as_str() }
    }

    /// Interpret the message as a paginated list payload.
    ///
    /// # Errors
    /// Returns [`EnvelopeError::Failure`] when the envelope reports a
    /// business failure, or [`EnvelopeError::Shape`] when the payload does
    /// not carry the list fields.
    pub fn list_payload(&self) -> Result<ListPayload, EnvelopeError> {
        if !self.success {
            return Err(EnvelopeError::Failure(
                self.error_text().unwrap_or("request failed").to_string(),
            ));
        }
        Ok(serde_json::from_value(self.message.clone())?)
    }

    /// Interpret the message as a raw array of documents (`list-all`,
    /// `search` and datalist responses).
    ///
    /// # Errors
    /// Returns [`EnvelopeError::Failure`] on a business failure, or
    /// [`EnvelopeError::Shape`] when the payload is not an array.
    pub fn documents(&self) -> Result<Vec<Document>, EnvelopeError> {
        if !self.success {
            return Err(EnvelopeError::Failure(
                self.error_text().unwrap_or("request failed").to_string(),
            ));
        }
        Ok(serde_json::from_value(self.message.clone())?)
    }
}

/// Pagination payload carried by `list` responses.
///
/// `total_documents` is the server-provided set of valid page numbers, not
/// a record count; the console scans it when computing the visible
/// page-number window. A `next_page`/`previous_page` of `0` means none.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPayload {
    /// Records for the requested page.
    #[serde(default)]
    pub documents: Vec<Document>,
    /// 1-based page the payload describes.
    #[serde(default)]
    pub current_page: u64,
    /// Following page number, `0` when exhausted.
    #[serde(default)]
    pub next_page: u64,
    /// Preceding page number, `0` on the first page.
    #[serde(default)]
    pub previous_page: u64,
    /// Valid page numbers for the current condition and limit.
    #[serde(default)]
    pub total_documents: Vec<u64>,
    /// Page size the listing was computed with.
    #[serde(default)]
    pub limit: u64,
}

/// One per-id descriptor sent to the generic bulk routes. The update is a
/// Mongo-style patch (`{"$set": {...}}`) keyed by a condition.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct BulkQuery {
    /// Singular entity-type name the descriptor targets.
    pub schema: String,
    /// Condition selecting the affected record (`{"_id": id}`).
    pub condition: Value,
    /// Mongo-style update document.
    pub update: Value,
}

/// One entry of the direct field-patch body used by the dedicated
/// `product`/`purchase` bulk routes: the id plus the raw fields to assign.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct DirectPatch {
    /// Identifier of the affected record.
    #[serde(rename = "_id")]
    pub id: String,
    /// Fields assigned verbatim (no `$set` wrapper).
    #[serde(flatten)]
    pub fields: serde_json::Map<String, Value>,
}

/// Outcome payload of a bulk update: the per-descriptor pass/fail split.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkOutcome {
    /// Descriptors the backend failed to apply.
    #[serde(default)]
    pub failed_queries: Vec<Value>,
    /// Descriptors applied successfully.
    #[serde(default)]
    pub passed_queries: Vec<Value>,
}

/// JSON body accompanying a multipart file upload (`body` form field).
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub struct UploadBody {
    /// Target folder name on the server.
    pub folder: String,
}
