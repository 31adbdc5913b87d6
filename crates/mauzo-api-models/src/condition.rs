//! Typed Mongo-style query conditions.
//!
//! The backend accepts a condition object whose plain fields are equality
//! matches and whose optional `$expr` entry is a boolean operator tree. The
//! console builds these trees from named UI filters; keeping the tree typed
//! here means every filter builder composes the same vocabulary instead of
//! hand-assembling JSON at each call site.

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::{Map, Value};

/// A backend query condition: equality fields, tenant scoping, and an
/// optional `$expr` operator tree.
///
/// The `error` slot mirrors the wire contract's tolerance for translator
/// failures: a condition that could not be built carries a message instead
/// of aborting the request. Call sites treat such a condition as opaque.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct Condition {
    /// Tenant/branch scoping id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    /// Soft-delete visibility flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    /// Boolean operator tree, serialized under `$expr`.
    #[serde(rename = "$expr", skip_serializing_if = "Option::is_none")]
    pub expr: Option<Expr>,
    /// Translator failure message carried in place of a valid condition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Additional equality fields (`type`, `status` and friends).
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Condition {
    /// The base "visible record for the current branch" condition every
    /// filter composes with.
    #[must_use]
    pub fn base(branch: Option<String>) -> Self {
        Self {
            branch,
            visible: Some(true),
            ..Self::default()
        }
    }

    /// Add or replace an equality field.
    #[must_use]
    pub fn with_field(mut self, name: &str, value: Value) -> Self {
        self.fields.insert(name.to_string(), value);
        self
    }

    /// Set the visibility flag.
    #[must_use]
    pub const fn with_visible(mut self, visible: bool) -> Self {
        self.visible = Some(visible);
        self
    }

    /// Compose an expression with the existing `$expr`, wrapping both inside
    /// a top-level `$and` so filters narrow the base scoping rather than
    /// replace it.
    #[must_use]
    pub fn compose(mut self, expr: Expr) -> Self {
        let branches = match self.expr.take() {
            Some(previous) => vec![previous, expr],
            None => vec![expr],
        };
        self.expr = Some(Expr::And(branches));
        self
    }

    /// Record a translator failure on the condition.
    #[must_use]
    pub fn carry_error(mut self, message: impl Into<String>) -> Self {
        self.error = Some(message.into());
        self
    }
}

/// One node of the `$expr` operator tree.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// `{"$eq": [a, b]}`
    Eq(Operand, Operand),
    /// `{"$ne": [a, b]}`
    Ne(Operand, Operand),
    /// `{"$gt": [a, b]}`
    Gt(Operand, Operand),
    /// `{"$gte": [a, b]}`
    Gte(Operand, Operand),
    /// `{"$lt": [a, b]}`
    Lt(Operand, Operand),
    /// `{"$lte": [a, b]}`
    Lte(Operand, Operand),
    /// `{"$and": [...]}`
    And(Vec<Expr>),
    /// `{"$or": [...]}`
    Or(Vec<Expr>),
}

impl Expr {
    const fn operator(&self) -> &'static str {
        match self {
            Self::Eq(..) => "$eq",
            Self::Ne(..) => "$ne",
            Self::Gt(..) => "$gt",
            Self::Gte(..) => "$gte",
            Self::Lt(..) => "$lt",
            Self::Lte(..) => "$lte",
            Self::And(_) => "$and",
            Self::Or(_) => "$or",
        }
    }
}

impl Serialize for Expr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            Self::Eq(a, b)
            | Self::Ne(a, b)
            | Self::Gt(a, b)
            | Self::Gte(a, b)
            | Self::Lt(a, b)
            | Self::Lte(a, b) => {
                map.serialize_entry(self.operator(), &OperandPair(a, b))?;
            }
            Self::And(branches) | Self::Or(branches) => {
                map.serialize_entry(self.operator(), branches)?;
            }
        }
        map.end()
    }
}

struct OperandPair<'a>(&'a Operand, &'a Operand);

impl Serialize for OperandPair<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(2))?;
        seq.serialize_element(self.0)?;
        seq.serialize_element(self.1)?;
        seq.end()
    }
}

/// One operand of a comparison: a document field path, a literal, or a
/// computed sub-expression such as `$subtract`.
#[derive(Clone, Debug, PartialEq)]
pub enum Operand {
    /// Field path, serialized with the `$` prefix.
    Field(String),
    /// Literal JSON value.
    Literal(Value),
    /// Arithmetic sub-expression: `{"$subtract": [a, b]}`.
    Subtract(Box<Operand>, Box<Operand>),
}

impl Operand {
    /// Field path operand.
    #[must_use]
    pub fn field(name: &str) -> Self {
        Self::Field(name.to_string())
    }

    /// Literal operand.
    #[must_use]
    pub fn literal(value: impl Into<Value>) -> Self {
        Self::Literal(value.into())
    }

    /// `a - b` as an operand.
    #[must_use]
    pub fn subtract(a: Self, b: Self) -> Self {
        Self::Subtract(Box::new(a), Box::new(b))
    }
}

impl Serialize for Operand {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Field(name) => serializer.serialize_str(&format!("${name}")),
            Self::Literal(value) => value.serialize(serializer),
            Self::Subtract(a, b) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("$subtract", &OperandPair(a, b))?;
                map.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn comparison_serializes_as_operator_pair() {
        let expr = Expr::Eq(Operand::field("total_amount"), Operand::field("paid_amount"));
        assert_eq!(
            serde_json::to_value(&expr).unwrap(),
            json!({"$eq": ["$total_amount", "$paid_amount"]})
        );
    }

    #[test]
    fn subtract_nests_inside_comparisons() {
        let expr = Expr::Lte(
            Operand::subtract(Operand::field("stock"), Operand::field("reorder_stock_level")),
            Operand::literal(0),
        );
        assert_eq!(
            serde_json::to_value(&expr).unwrap(),
            json!({"$lte": [{"$subtract": ["$stock", "$reorder_stock_level"]}, 0]})
        );
    }

    #[test]
    fn compose_wraps_previous_expr_in_and() {
        let condition = Condition::base(Some("b1".to_string()))
            .compose(Expr::Gt(Operand::field("paid_amount"), Operand::literal(0)))
            .compose(Expr::Lt(
                Operand::field("paid_amount"),
                Operand::field("total_amount"),
            ));
        assert_eq!(
            serde_json::to_value(&condition).unwrap(),
            json!({
                "branch": "b1",
                "visible": true,
                "$expr": {"$and": [
                    {"$and": [{"$gt": ["$paid_amount", 0]}]},
                    {"$lt": ["$paid_amount", "$total_amount"]}
                ]}
            })
        );
    }

    #[test]
    fn extra_fields_flatten_beside_scoping() {
        let condition = Condition::base(None).with_field("type", json!("deposit"));
        assert_eq!(
            serde_json::to_value(&condition).unwrap(),
            json!({"visible": true, "type": "deposit"})
        );
    }

    #[test]
    fn error_slot_survives_serialization() {
        let condition = Condition::base(None).carry_error("boom");
        let value = serde_json::to_value(&condition).unwrap();
        assert_eq!(value.get("error"), Some(&json!("boom")));
    }
}
