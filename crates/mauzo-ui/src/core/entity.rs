//! The platform's entity catalog.
//!
//! Every screen is generic over one of these kinds: the singular `schema`
//! name travels on the wire, the plural `collection` name keys the list slot
//! in state. Keeping the catalog as an enum replaces the original dynamic
//! string-keyed state record with compile-time-checked accessors.

use serde::{Deserialize, Serialize};

/// One entity type the backend serves.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// A branch of the business.
    Branch,
    /// A console user.
    User,
    /// A permission role.
    Role,
    /// A customer.
    Customer,
    /// A supplier.
    Supplier,
    /// A sellable product.
    Product,
    /// A product category.
    Category,
    /// A point-of-sale sale.
    Sale,
    /// A customer order.
    Order,
    /// A stock purchase.
    Purchase,
    /// An expense.
    Expense,
    /// An expense type.
    ExpenseType,
    /// A payment against a sale, debt or expense.
    Payment,
    /// A debt.
    Debt,
    /// One debt history entry.
    DebtHistory,
    /// An account transaction.
    Transaction,
    /// A money account.
    Account,
    /// A stock adjustment.
    Adjustment,
    /// A store (warehouse).
    Store,
    /// A quotation.
    Quotation,
    /// A quotation invoice.
    Invoice,
    /// A fiscal device.
    Device,
    /// An SMS message.
    Message,
    /// A tourism booking.
    Tour,
    /// A truck.
    Truck,
    /// A trucking/freight order.
    TruckOrder,
    /// A freight route.
    Route,
}

impl EntityKind {
    /// Every kind, in display order.
    #[must_use]
    pub const fn all() -> [Self; 27] {
        [
            Self::Branch,
            Self::User,
            Self::Role,
            Self::Customer,
            Self::Supplier,
            Self::Product,
            Self::Category,
            Self::Sale,
            Self::Order,
            Self::Purchase,
            Self::Expense,
            Self::ExpenseType,
            Self::Payment,
            Self::Debt,
            Self::DebtHistory,
            Self::Transaction,
            Self::Account,
            Self::Adjustment,
            Self::Store,
            Self::Quotation,
            Self::Invoice,
            Self::Device,
            Self::Message,
            Self::Tour,
            Self::Truck,
            Self::TruckOrder,
            Self::Route,
        ]
    }

    /// Singular wire name sent as the `schema` query parameter.
    #[must_use]
    pub const fn schema(self) -> &'static str {
        match self {
            Self::Branch => "branch",
            Self::User => "user",
            Self::Role => "role",
            Self::Customer => "customer",
            Self::Supplier => "supplier",
            Self::Product => "product",
            Self::Category => "category",
            Self::Sale => "sale",
            Self::Order => "order",
            Self::Purchase => "purchase",
            Self::Expense => "expense",
            Self::ExpenseType => "expense_type",
            Self::Payment => "payment",
            Self::Debt => "debt",
            Self::DebtHistory => "debt_history",
            Self::Transaction => "transaction",
            Self::Account => "account",
            Self::Adjustment => "adjustment",
            Self::Store => "store",
            Self::Quotation => "quotation",
            Self::Invoice => "invoice",
            Self::Device => "device",
            Self::Message => "message",
            Self::Tour => "tour",
            Self::Truck => "truck",
            Self::TruckOrder => "truck_order",
            Self::Route => "route",
        }
    }

    /// Plural state key holding the fetched list for this kind.
    #[must_use]
    pub const fn collection(self) -> &'static str {
        match self {
            Self::Branch => "branches",
            Self::User => "users",
            Self::Role => "roles",
            Self::Customer => "customers",
            Self::Supplier => "suppliers",
            Self::Product => "products",
            Self::Category => "categories",
            Self::Sale => "sales",
            Self::Order => "orders",
            Self::Purchase => "purchases",
            Self::Expense => "expenses",
            Self::ExpenseType => "expense_types",
            Self::Payment => "payments",
            Self::Debt => "debts",
            Self::DebtHistory => "debt_histories",
            Self::Transaction => "transactions",
            Self::Account => "accounts",
            Self::Adjustment => "adjustments",
            Self::Store => "stores",
            Self::Quotation => "quotations",
            Self::Invoice => "invoices",
            Self::Device => "devices",
            Self::Message => "messages",
            Self::Tour => "tours",
            Self::Truck => "trucks",
            Self::TruckOrder => "truck_orders",
            Self::Route => "routes",
        }
    }

    /// Look a kind up by its singular wire name.
    #[must_use]
    pub fn from_schema(name: &str) -> Option<Self> {
        Self::all().into_iter().find(|kind| kind.schema() == name)
    }
}
