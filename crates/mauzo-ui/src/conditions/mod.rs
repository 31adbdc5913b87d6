//! The backend-condition translator.
//!
//! Maps a named UI filter (`"unpaid"`, `"almost_out_of_stock"`, ...) to a
//! Mongo-style [`Condition`], composed with the caller-supplied base
//! condition so filters narrow the tenant/branch scoping instead of
//! replacing it. Filters are registered in a lookup table of builder
//! functions; each builder is a pure function testable in isolation.
//!
//! Unknown names return the base condition unchanged. A builder failure
//! returns the base condition with its `error` slot populated rather than
//! propagating; call sites tolerate that shape on the wire, so the latent
//! type inconsistency of the contract is preserved here deliberately.

use chrono::{Duration, Local, NaiveDateTime};
use mauzo_api_models::{Condition, Expr, Operand};
use serde_json::{Value, json};

/// Ambient inputs every filter builder may consult.
#[derive(Clone, Debug, PartialEq)]
pub struct FilterContext {
    today: NaiveDateTime,
    soon: NaiveDateTime,
    store_scope: bool,
}

impl FilterContext {
    /// Horizon for "almost expired" stock, in days past the today boundary.
    pub const EXPIRY_HORIZON_DAYS: i64 = 30;

    /// Build a context from the current URL path and a wall-clock reading.
    ///
    /// The today boundary is the start of the local day (hours, minutes and
    /// seconds zeroed) and is shared by every date-bound filter. A `store`
    /// path segment switches the location-sensitive stock filters to the
    /// store-side fields.
    #[must_use]
    pub fn new(path: &str, now: NaiveDateTime) -> Self {
        let today = now.date().and_hms_opt(0, 0, 0).unwrap_or(now);
        Self {
            today,
            soon: today + Duration::days(Self::EXPIRY_HORIZON_DAYS),
            store_scope: path.split('/').any(|segment| segment == "store"),
        }
    }

    /// Context for the current local time.
    #[must_use]
    pub fn current(path: &str) -> Self {
        Self::new(path, Local::now().naive_local())
    }

    /// Start of the current local day.
    #[must_use]
    pub const fn today(&self) -> NaiveDateTime {
        self.today
    }

    /// Whether the screen is scoped to the store rather than the shop.
    #[must_use]
    pub const fn store_scoped(&self) -> bool {
        self.store_scope
    }

    fn today_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self.today)
    }

    fn soon_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self.soon)
    }

    const fn stock_field(&self) -> &'static str {
        if self.store_scope { "store_stock" } else { "stock" }
    }
}

type Builder = fn(&str, &FilterContext, Condition) -> Result<Condition, serde_json::Error>;

/// Translate a named filter into a backend condition composed with `base`.
#[must_use]
pub fn translate(name: &str, ctx: &FilterContext, base: Condition) -> Condition {
    REGISTRY
        .iter()
        .find(|(registered, _)| *registered == name)
        .map_or_else(
            || base.clone(),
            |(_, builder)| match builder(name, ctx, base.clone()) {
                Ok(condition) => condition,
                Err(err) => base.clone().carry_error(err.to_string()),
            },
        )
}

const REGISTRY: &[(&str, Builder)] = &[
    // Visibility.
    ("active", visibility),
    ("deleted", visibility),
    // User/device flags.
    ("enabled", flag),
    ("disabled", flag),
    ("verified", flag),
    ("unverified", flag),
    // Payment status.
    ("paid", payment_status),
    ("unpaid", payment_status),
    ("partial_paid", payment_status),
    // Date-bound.
    ("today_sales", today),
    ("today_orders", today),
    ("today_purchases", today),
    ("today_expenses", today),
    ("today_payments", today),
    ("today_transactions", today),
    ("today_adjustments", today),
    ("today_bookings", today),
    ("today_deliveries", today),
    ("today_debts", today),
    // Stock, location-sensitive.
    ("products", products),
    ("in_stock", stock_level),
    ("out_of_stock", stock_level),
    ("almost_out_of_stock", stock_level),
    ("expired", expiry),
    ("almost_expired", expiry),
    // Tax registration.
    ("with_tin_number", tin_number),
    ("without_tin_number", tin_number),
    // Transactions.
    ("deposit_transactions", transactions),
    ("withdraw_transactions", transactions),
    ("customer_deposit_transactions", transactions),
    ("customer_withdraw_transactions", transactions),
    ("supplier_deposit_transactions", transactions),
    ("supplier_withdraw_transactions", transactions),
    ("cash_transactions", transactions),
    ("bank_transactions", transactions),
    ("mobile_transactions", transactions),
    // Accounts.
    ("customer_accounts", accounts),
    ("supplier_accounts", accounts),
    ("user_accounts", accounts),
    ("cash_accounts", accounts),
    ("bank_accounts", accounts),
    ("mobile_accounts", accounts),
    // Sales channels.
    ("cash_sales", sales_channel),
    ("credit_sales", sales_channel),
    ("mobile_sales", sales_channel),
    ("bank_sales", sales_channel),
    ("with_receipt", receipt),
    ("without_receipt", receipt),
    // Debts.
    ("shop_debts", debts),
    ("supplier_debts", debts),
    // Payments by source.
    ("sale_payments", payments),
    ("debt_payments", payments),
    ("expense_payments", payments),
    // Lifecycle statuses.
    ("pending", lifecycle),
    ("confirmed", lifecycle),
    ("cancelled", lifecycle),
    ("completed", lifecycle),
    ("delivered", lifecycle),
    ("on_transit", lifecycle),
    ("failed", lifecycle),
    // Adjustments.
    ("increased_adjustments", adjustments),
    ("decreased_adjustments", adjustments),
    // Customers.
    ("local_customers", customers),
    ("foreign_customers", customers),
    // Trucks.
    ("available_trucks", trucks),
    ("on_route_trucks", trucks),
    // Purchases.
    ("store_purchases", purchases),
    ("shop_purchases", purchases),
];

fn visibility(name: &str, _ctx: &FilterContext, base: Condition) -> Result<Condition, serde_json::Error> {
    Ok(base.with_visible(name == "active"))
}

fn flag(name: &str, _ctx: &FilterContext, base: Condition) -> Result<Condition, serde_json::Error> {
    let condition = match name {
        "enabled" => base.with_field("disabled", json!(false)),
        "disabled" => base.with_field("disabled", json!(true)),
        "verified" => base.with_field("verified", json!(true)),
        _ => base.with_field("verified", json!(false)),
    };
    Ok(condition)
}

fn payment_status(
    name: &str,
    _ctx: &FilterContext,
    base: Condition,
) -> Result<Condition, serde_json::Error> {
    let expr = match name {
        "paid" => Expr::Eq(Operand::field("total_amount"), Operand::field("paid_amount")),
        "unpaid" => Expr::Eq(Operand::field("paid_amount"), Operand::literal(0)),
        _ => Expr::And(vec![
            Expr::Gt(Operand::field("paid_amount"), Operand::literal(0)),
            Expr::Lt(Operand::field("paid_amount"), Operand::field("total_amount")),
        ]),
    };
    Ok(base.compose(expr))
}

fn today(_name: &str, ctx: &FilterContext, base: Condition) -> Result<Condition, serde_json::Error> {
    Ok(base.compose(Expr::Gte(
        Operand::field("createdAt"),
        Operand::Literal(ctx.today_value()?),
    )))
}

fn products(_name: &str, ctx: &FilterContext, base: Condition) -> Result<Condition, serde_json::Error> {
    let field = if ctx.store_scope {
        "is_store_product"
    } else {
        "is_shop_product"
    };
    Ok(base.with_field(field, json!(true)))
}

fn stock_level(
    name: &str,
    ctx: &FilterContext,
    base: Condition,
) -> Result<Condition, serde_json::Error> {
    let stock = ctx.stock_field();
    let expr = match name {
        "in_stock" => Expr::Gt(Operand::field(stock), Operand::literal(0)),
        "out_of_stock" => Expr::Lte(Operand::field(stock), Operand::literal(0)),
        _ => Expr::And(vec![
            Expr::Gt(Operand::field(stock), Operand::literal(0)),
            Expr::Lte(
                Operand::subtract(
                    Operand::field(stock),
                    Operand::field("reorder_stock_level"),
                ),
                Operand::literal(0),
            ),
        ]),
    };
    Ok(products(name, ctx, base)?.compose(expr))
}

fn expiry(name: &str, ctx: &FilterContext, base: Condition) -> Result<Condition, serde_json::Error> {
    let expr = if name == "expired" {
        Expr::Lte(
            Operand::field("expire_date"),
            Operand::Literal(ctx.today_value()?),
        )
    } else {
        Expr::And(vec![
            Expr::Gt(
                Operand::field("expire_date"),
                Operand::Literal(ctx.today_value()?),
            ),
            Expr::Lte(
                Operand::field("expire_date"),
                Operand::Literal(ctx.soon_value()?),
            ),
        ])
    };
    Ok(products(name, ctx, base)?.compose(expr))
}

fn tin_number(
    name: &str,
    _ctx: &FilterContext,
    base: Condition,
) -> Result<Condition, serde_json::Error> {
    let expr = if name == "with_tin_number" {
        Expr::Ne(Operand::field("tin_number"), Operand::literal(""))
    } else {
        Expr::Eq(Operand::field("tin_number"), Operand::literal(""))
    };
    Ok(base.compose(expr))
}

/// Compound names split on `_` recover sub-tokens selecting sub-conditions:
/// `customer_deposit_transactions` scopes both the owning party and the
/// transaction kind.
fn transactions(
    name: &str,
    _ctx: &FilterContext,
    base: Condition,
) -> Result<Condition, serde_json::Error> {
    let mut condition = base;
    for token in name.split('_') {
        condition = match token {
            "deposit" | "withdraw" => condition.with_field("type", json!(token)),
            "customer" | "supplier" => condition.with_field("owner_type", json!(token)),
            "cash" | "bank" | "mobile" => condition.with_field("account_type", json!(token)),
            _ => condition,
        };
    }
    Ok(condition)
}

fn accounts(name: &str, _ctx: &FilterContext, base: Condition) -> Result<Condition, serde_json::Error> {
    let mut condition = base;
    for token in name.split('_') {
        condition = match token {
            "customer" | "supplier" | "user" => condition.with_field("type", json!(token)),
            "cash" | "bank" | "mobile" => condition.with_field("channel", json!(token)),
            _ => condition,
        };
    }
    Ok(condition)
}

fn sales_channel(
    name: &str,
    _ctx: &FilterContext,
    base: Condition,
) -> Result<Condition, serde_json::Error> {
    let method = name.split('_').next().unwrap_or_default();
    Ok(base.with_field("payment_method", json!(method)))
}

fn receipt(name: &str, _ctx: &FilterContext, base: Condition) -> Result<Condition, serde_json::Error> {
    let expr = if name == "with_receipt" {
        Expr::Ne(Operand::field("receipt_number"), Operand::literal(""))
    } else {
        Expr::Eq(Operand::field("receipt_number"), Operand::literal(""))
    };
    Ok(base.compose(expr))
}

fn debts(name: &str, _ctx: &FilterContext, base: Condition) -> Result<Condition, serde_json::Error> {
    let kind = name.split('_').next().unwrap_or_default();
    Ok(base.with_field("type", json!(kind)))
}

fn payments(name: &str, _ctx: &FilterContext, base: Condition) -> Result<Condition, serde_json::Error> {
    let source = name.split('_').next().unwrap_or_default();
    Ok(base.with_field("type", json!(source)))
}

fn lifecycle(name: &str, _ctx: &FilterContext, base: Condition) -> Result<Condition, serde_json::Error> {
    Ok(base.with_field("status", json!(name)))
}

fn adjustments(
    name: &str,
    _ctx: &FilterContext,
    base: Condition,
) -> Result<Condition, serde_json::Error> {
    let direction = name.split('_').next().unwrap_or_default();
    Ok(base.with_field("type", json!(direction)))
}

fn customers(name: &str, _ctx: &FilterContext, base: Condition) -> Result<Condition, serde_json::Error> {
    Ok(base.with_field("is_foreigner", json!(name == "foreign_customers")))
}

fn trucks(name: &str, _ctx: &FilterContext, base: Condition) -> Result<Condition, serde_json::Error> {
    let status = if name == "available_trucks" {
        "available"
    } else {
        "on_route"
    };
    Ok(base.with_field("status", json!(status)))
}

fn purchases(name: &str, _ctx: &FilterContext, base: Condition) -> Result<Condition, serde_json::Error> {
    Ok(base.with_field("is_store", json!(name == "store_purchases")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ctx() -> FilterContext {
        let noon = NaiveDate::from_ymd_opt(2026, 8, 30)
            .unwrap()
            .and_hms_opt(12, 34, 56)
            .unwrap();
        FilterContext::new("/branch/sales", noon)
    }

    fn store_ctx() -> FilterContext {
        let noon = NaiveDate::from_ymd_opt(2026, 8, 30)
            .unwrap()
            .and_hms_opt(12, 34, 56)
            .unwrap();
        FilterContext::new("/store/products", noon)
    }

    fn base() -> Condition {
        Condition::base(Some("b1".to_string()))
    }

    #[test]
    fn today_boundary_zeroes_the_time() {
        let boundary = ctx().today();
        assert_eq!(
            boundary,
            NaiveDate::from_ymd_opt(2026, 8, 30)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        );
    }

    #[test]
    fn deleted_flips_visibility() {
        let condition = translate("deleted", &ctx(), base());
        assert_eq!(condition.visible, Some(false));
        assert_eq!(translate("active", &ctx(), base()).visible, Some(true));
    }

    #[test]
    fn paid_composes_an_and_with_the_equality() {
        let value = serde_json::to_value(translate("paid", &ctx(), base())).unwrap();
        let branches = value["$expr"]["$and"].as_array().unwrap();
        assert!(branches.contains(&json!({"$eq": ["$total_amount", "$paid_amount"]})));
    }

    #[test]
    fn unknown_names_return_the_base_unchanged() {
        assert_eq!(translate("unknown_name", &ctx(), base()), base());
    }

    #[test]
    fn filters_wrap_an_existing_expr_instead_of_replacing_it() {
        let scoped = base().compose(Expr::Gt(Operand::field("total_amount"), Operand::literal(0)));
        let value = serde_json::to_value(translate("unpaid", &ctx(), scoped)).unwrap();
        let branches = value["$expr"]["$and"].as_array().unwrap();
        assert_eq!(branches.len(), 2);
        assert_eq!(branches[1], json!({"$eq": ["$paid_amount", 0]}));
    }

    #[test]
    fn today_filters_bound_on_the_local_day_start() {
        let value = serde_json::to_value(translate("today_sales", &ctx(), base())).unwrap();
        let branches = value["$expr"]["$and"].as_array().unwrap();
        assert_eq!(
            branches[0],
            json!({"$gte": ["$createdAt", "2026-08-30T00:00:00"]})
        );
    }

    #[test]
    fn stock_filters_follow_the_url_scope() {
        let shop = serde_json::to_value(translate("almost_out_of_stock", &ctx(), base())).unwrap();
        assert_eq!(shop["is_shop_product"], json!(true));
        let shop_expr = shop["$expr"]["$and"].as_array().unwrap();
        assert!(
            shop_expr[0]["$and"]
                .as_array()
                .unwrap()
                .contains(&json!({"$lte": [{"$subtract": ["$stock", "$reorder_stock_level"]}, 0]}))
        );

        let store =
            serde_json::to_value(translate("almost_out_of_stock", &store_ctx(), base())).unwrap();
        assert_eq!(store["is_store_product"], json!(true));
        assert!(
            store["$expr"]["$and"].as_array().unwrap()[0]["$and"]
                .as_array()
                .unwrap()
                .contains(&json!({"$gt": ["$store_stock", 0]}))
        );
    }

    #[test]
    fn compound_transaction_names_split_into_sub_conditions() {
        let condition = translate("customer_deposit_transactions", &ctx(), base());
        assert_eq!(condition.fields.get("owner_type"), Some(&json!("customer")));
        assert_eq!(condition.fields.get("type"), Some(&json!("deposit")));

        let channel = translate("mobile_transactions", &ctx(), base());
        assert_eq!(channel.fields.get("account_type"), Some(&json!("mobile")));
    }

    #[test]
    fn account_filters_distinguish_type_from_channel() {
        let owner = translate("supplier_accounts", &ctx(), base());
        assert_eq!(owner.fields.get("type"), Some(&json!("supplier")));
        let channel = translate("bank_accounts", &ctx(), base());
        assert_eq!(channel.fields.get("channel"), Some(&json!("bank")));
    }

    #[test]
    fn tin_filters_compare_against_the_empty_string() {
        let with = serde_json::to_value(translate("with_tin_number", &ctx(), base())).unwrap();
        let branches = with["$expr"]["$and"].as_array().unwrap();
        assert!(branches.contains(&json!({"$ne": ["$tin_number", ""]})));
    }

    #[test]
    fn expiry_window_spans_the_horizon() {
        let value = serde_json::to_value(translate("almost_expired", &ctx(), base())).unwrap();
        let window = value["$expr"]["$and"].as_array().unwrap()[0]["$and"]
            .as_array()
            .unwrap()
            .clone();
        assert_eq!(window[0], json!({"$gt": ["$expire_date", "2026-08-30T00:00:00"]}));
        assert_eq!(window[1], json!({"$lte": ["$expire_date", "2026-09-29T00:00:00"]}));
    }

    #[test]
    fn lifecycle_and_channel_filters_assign_plain_fields() {
        assert_eq!(
            translate("on_transit", &ctx(), base()).fields.get("status"),
            Some(&json!("on_transit"))
        );
        assert_eq!(
            translate("credit_sales", &ctx(), base())
                .fields
                .get("payment_method"),
            Some(&json!("credit"))
        );
        assert_eq!(
            translate("foreign_customers", &ctx(), base())
                .fields
                .get("is_foreigner"),
            Some(&json!(true))
        );
        assert_eq!(
            translate("store_purchases", &ctx(), base()).fields.get("is_store"),
            Some(&json!(true))
        );
        assert_eq!(
            translate("decreased_adjustments", &ctx(), base())
                .fields
                .get("type"),
            Some(&json!("decreased"))
        );
    }

    #[test]
    fn every_registered_name_translates_cleanly() {
        for (name, _) in REGISTRY {
            let condition = translate(name, &ctx(), base());
            assert!(condition.error.is_none(), "{name}");
        }
    }
}
