//! Per-collection filter and sort vocabularies.
//!
//! Pure derivation used to populate the filter UI: each collection offers a
//! fixed set of named filters (fed to the condition translator) and sort
//! labels (fed to [`crate::core::logic::sort_field`]).

use crate::core::entity::EntityKind;

/// Which vocabulary to derive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VocabularyKind {
    /// Sort labels.
    Sort,
    /// Named filter conditions.
    Condition,
}

const BASE_FILTERS: &[&str] = &["active", "deleted"];
const BASE_SORTS: &[&str] = &["created time", "name"];
const LIFECYCLE: &[&str] = &["pending", "confirmed", "cancelled", "completed"];

/// The deduplicated filter-name or sort-label vocabulary for a collection.
#[must_use]
pub fn sort_or_condition(collection: EntityKind, kind: VocabularyKind) -> Vec<&'static str> {
    match kind {
        VocabularyKind::Condition => dedup(filters_for(collection)),
        VocabularyKind::Sort => dedup(sorts_for(collection)),
    }
}

fn filters_for(collection: EntityKind) -> Vec<&'static str> {
    let mut names: Vec<&'static str> = BASE_FILTERS.to_vec();
    match collection {
        EntityKind::Sale => names.extend([
            "today_sales",
            "paid",
            "unpaid",
            "partial_paid",
            "cash_sales",
            "credit_sales",
            "mobile_sales",
            "bank_sales",
            "with_receipt",
            "without_receipt",
        ]),
        EntityKind::Order => {
            names.push("today_orders");
            names.extend(LIFECYCLE);
        }
        EntityKind::Product => names.extend([
            "products",
            "in_stock",
            "almost_out_of_stock",
            "out_of_stock",
            "expired",
            "almost_expired",
        ]),
        EntityKind::Purchase => names.extend([
            "today_purchases",
            "paid",
            "unpaid",
            "partial_paid",
            "store_purchases",
            "shop_purchases",
        ]),
        EntityKind::Expense => names.extend(["today_expenses", "paid", "unpaid", "partial_paid"]),
        EntityKind::Payment => names.extend([
            "today_payments",
            "sale_payments",
            "debt_payments",
            "expense_payments",
        ]),
        EntityKind::Debt => names.extend([
            "today_debts",
            "paid",
            "unpaid",
            "partial_paid",
            "shop_debts",
            "supplier_debts",
        ]),
        EntityKind::Transaction => names.extend([
            "today_transactions",
            "deposit_transactions",
            "withdraw_transactions",
            "customer_deposit_transactions",
            "customer_withdraw_transactions",
            "supplier_deposit_transactions",
            "supplier_withdraw_transactions",
            "cash_transactions",
            "bank_transactions",
            "mobile_transactions",
        ]),
        EntityKind::Account => names.extend([
            "customer_accounts",
            "supplier_accounts",
            "user_accounts",
            "cash_accounts",
            "bank_accounts",
            "mobile_accounts",
        ]),
        EntityKind::Adjustment => names.extend([
            "today_adjustments",
            "increased_adjustments",
            "decreased_adjustments",
        ]),
        EntityKind::Customer => names.extend([
            "local_customers",
            "foreign_customers",
            "with_tin_number",
            "without_tin_number",
        ]),
        EntityKind::Supplier => names.extend(["with_tin_number", "without_tin_number"]),
        EntityKind::User => names.extend(["enabled", "disabled", "verified", "unverified"]),
        EntityKind::Device => names.extend(["enabled", "disabled"]),
        EntityKind::Tour => {
            names.push("today_bookings");
            names.extend(LIFECYCLE);
        }
        EntityKind::Truck => names.extend(["available_trucks", "on_route_trucks"]),
        EntityKind::TruckOrder => names.extend([
            "today_deliveries",
            "delivered",
            "on_transit",
            "failed",
        ]),
        EntityKind::Quotation | EntityKind::Invoice => names.extend(LIFECYCLE),
        _ => {}
    }
    names
}

fn sorts_for(collection: EntityKind) -> Vec<&'static str> {
    let mut labels: Vec<&'static str> = BASE_SORTS.to_vec();
    match collection {
        EntityKind::Customer | EntityKind::Supplier => {
            labels.extend(["region", "location", "street", "phone number"]);
        }
        EntityKind::Product => labels.extend(["stock", "buying price", "selling price"]),
        EntityKind::Sale | EntityKind::Purchase | EntityKind::Expense | EntityKind::Debt => {
            labels.extend(["total amount", "paid amount"]);
        }
        EntityKind::Payment | EntityKind::Transaction => labels.push("total amount"),
        EntityKind::Account => labels.push("balance"),
        EntityKind::User => labels.push("phone number"),
        EntityKind::Branch | EntityKind::Store => labels.extend(["region", "location"]),
        _ => {}
    }
    labels
}

fn dedup(names: Vec<&'static str>) -> Vec<&'static str> {
    let mut seen = std::collections::BTreeSet::new();
    names.into_iter().filter(|name| seen.insert(*name)).collect()
}
