//! Fiscal receipt rendering for the TRA printer bridge.
//!
//! The bridge consumes a plain-text line protocol: one `R_`-prefixed tag
//! per line, CRLF-terminated including the final line. The tag set and
//! ordering are fixed by the printer firmware.

use mauzo_api_models::Document;
use serde_json::Value;

const CRLF: &str = "\r\n";

/// One sold line on the receipt.
#[derive(Clone, Debug, PartialEq)]
pub struct ReceiptItem {
    /// Product description as printed.
    pub description: String,
    /// Units sold.
    pub quantity: u64,
    /// Line total.
    pub amount: f64,
}

/// A renderable fiscal receipt.
#[derive(Clone, Debug, PartialEq)]
pub struct FiscalReceipt {
    /// Registered business name.
    pub business_name: String,
    /// VAT registration number.
    pub vrn: String,
    /// Taxpayer identification number.
    pub tin: String,
    /// Branch street address.
    pub address: String,
    /// Sold lines in sale order.
    pub items: Vec<ReceiptItem>,
    /// Receipt grand total.
    pub total_amount: f64,
    /// Payment method label.
    pub payment_method: String,
    /// Sale timestamp as recorded by the backend.
    pub receipt_time: String,
}

impl FiscalReceipt {
    /// Build a receipt from a sale document and the signed-in user's branch.
    /// Returns `None` when the sale carries no product lines.
    #[must_use]
    pub fn from_sale(sale: &Document, user: &Document) -> Option<Self> {
        let branch = user.get("branch")?;
        let items: Vec<ReceiptItem> = sale
            .get("products")?
            .as_array()?
            .iter()
            .filter_map(|line| {
                Some(ReceiptItem {
                    description: line.get("name")?.as_str()?.to_string(),
                    quantity: line.get("quantity").and_then(Value::as_u64).unwrap_or(1),
                    amount: line.get("amount").and_then(Value::as_f64).unwrap_or(0.0),
                })
            })
            .collect();
        if items.is_empty() {
            return None;
        }
        Some(Self {
            business_name: text(branch, "name"),
            vrn: text(branch, "vrn"),
            tin: text(branch, "tin_number"),
            address: text(branch, "address"),
            items,
            total_amount: sale.get("total_amount").and_then(Value::as_f64).unwrap_or(0.0),
            payment_method: text(sale, "payment_method"),
            receipt_time: text(sale, "createdAt"),
        })
    }

    /// Render the printer line protocol.
    #[must_use]
    pub fn render(&self) -> String {
        let mut lines = vec![
            format!("R_NAM:{}", self.business_name),
            format!("R_VRN:{}", self.vrn),
            format!("R_TIN:{}", self.tin),
            format!("R_ADR:{}", self.address),
        ];
        for item in &self.items {
            lines.push(format!(
                "R_TXT:{}*{}*{:.2}",
                item.description, item.quantity, item.amount
            ));
        }
        lines.push(format!("R_TRP:{:.2}", self.total_amount));
        lines.push(format!("R_PM1:{}", self.payment_method));
        lines.push(format!("R_STT:{}", self.receipt_time));
        let mut rendered = lines.join(CRLF);
        rendered.push_str(CRLF);
        rendered
    }
}

fn text(document: &Value, key: &str) -> String {
    document
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn receipt() -> FiscalReceipt {
        FiscalReceipt {
            business_name: "Duka la Asha".to_string(),
            vrn: "40005304W".to_string(),
            tin: "123-456-789".to_string(),
            address: "Uhuru St, Mwanza".to_string(),
            items: vec![
                ReceiptItem {
                    description: "Rice 5kg".to_string(),
                    quantity: 2,
                    amount: 36000.0,
                },
                ReceiptItem {
                    description: "Cooking oil".to_string(),
                    quantity: 1,
                    amount: 9500.0,
                },
            ],
            total_amount: 45500.0,
            payment_method: "cash".to_string(),
            receipt_time: "2026-08-30T09:15:00Z".to_string(),
        }
    }

    #[test]
    fn render_emits_the_exact_line_protocol() {
        assert_eq!(
            receipt().render(),
            "R_NAM:Duka la Asha\r\n\
             R_VRN:40005304W\r\n\
             R_TIN:123-456-789\r\n\
             R_ADR:Uhuru St, Mwanza\r\n\
             R_TXT:Rice 5kg*2*36000.00\r\n\
             R_TXT:Cooking oil*1*9500.00\r\n\
             R_TRP:45500.00\r\n\
             R_PM1:cash\r\n\
             R_STT:2026-08-30T09:15:00Z\r\n"
        );
    }

    #[test]
    fn from_sale_reads_branch_and_product_lines() {
        let user = json!({"branch": {
            "name": "Duka la Asha",
            "vrn": "40005304W",
            "tin_number": "123-456-789",
            "address": "Uhuru St, Mwanza"
        }});
        let sale = json!({
            "products": [{"name": "Rice 5kg", "quantity": 2, "amount": 36000.0}],
            "total_amount": 36000.0,
            "payment_method": "cash",
            "createdAt": "2026-08-30T09:15:00Z"
        });
        let receipt = FiscalReceipt::from_sale(&sale, &user).unwrap();
        assert_eq!(receipt.business_name, "Duka la Asha");
        assert_eq!(receipt.items.len(), 1);
        assert_eq!(receipt.items[0].quantity, 2);
    }

    #[test]
    fn sales_without_lines_render_nothing() {
        let sale = json!({"products": [], "total_amount": 0.0});
        let user = json!({"branch": {"name": "x"}});
        assert!(FiscalReceipt::from_sale(&sale, &user).is_none());
    }
}
