//! Controller-facing request option types.

use crate::core::entity::EntityKind;
use mauzo_api_models::routes;
use serde_json::Value;

/// Which read shape a page mounts with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListingRoute {
    /// Paginated listing.
    List,
    /// The entire visible set, unpaginated.
    ListAll,
    /// A single record.
    Read,
}

impl ListingRoute {
    /// The route fragment the shape maps to.
    #[must_use]
    pub const fn route(self) -> &'static str {
        match self {
            Self::List => routes::LIST,
            Self::ListAll => routes::LIST_ALL,
            Self::Read => routes::READ,
        }
    }
}

/// What a page asks the console to load when it mounts.
#[derive(Clone, Debug, PartialEq)]
pub struct MountOptions {
    /// Read shape.
    pub route: ListingRoute,
    /// Entity kind the page works with.
    pub schema: EntityKind,
    /// Named filter to start from; defaults to `active`.
    pub condition: Option<String>,
    /// Raw extra condition merged into every read on this page.
    pub extra_condition: Option<Value>,
    /// Projection of returned fields.
    pub select: Option<Value>,
    /// Field paths keyword searches match against.
    pub fields: Option<Value>,
    /// Starting sort label; keeps the store default when `None`.
    pub sort: Option<String>,
    /// Ask the backend to populate related-entity references.
    pub join_foreign_keys: bool,
}

impl MountOptions {
    /// A paginated listing mount with defaults.
    #[must_use]
    pub const fn list(schema: EntityKind) -> Self {
        Self {
            route: ListingRoute::List,
            schema,
            condition: None,
            extra_condition: None,
            select: None,
            fields: None,
            sort: None,
            join_foreign_keys: false,
        }
    }

    /// An unpaginated listing mount with defaults.
    #[must_use]
    pub fn list_all(schema: EntityKind) -> Self {
        Self {
            route: ListingRoute::ListAll,
            ..Self::list(schema)
        }
    }

    /// A single-record mount with defaults.
    #[must_use]
    pub fn read(schema: EntityKind) -> Self {
        Self {
            route: ListingRoute::Read,
            ..Self::list(schema)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_map_to_wire_fragments() {
        assert_eq!(ListingRoute::List.route(), "list");
        assert_eq!(ListingRoute::ListAll.route(), "list-all");
        assert_eq!(ListingRoute::Read.route(), "read");
    }

    #[test]
    fn mount_presets_differ_only_in_route() {
        let list = MountOptions::list(EntityKind::Customer);
        let all = MountOptions::list_all(EntityKind::Customer);
        let read = MountOptions::read(EntityKind::Customer);
        assert_eq!(list.route, ListingRoute::List);
        assert_eq!(all.route, ListingRoute::ListAll);
        assert_eq!(read.route, ListingRoute::Read);
        assert_eq!(all.schema, list.schema);
        assert_eq!(list.schema, read.schema);
        assert!(read.condition.is_none());
    }
}
