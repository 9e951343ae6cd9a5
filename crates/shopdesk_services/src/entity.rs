//! Entity models.
//!
//! Every model keeps columns it does not name in `extra`, so rows written by
//! other pages survive a read-modify-write through a typed service.

use crate::de;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A row type stored in one table and scoped to one business.
pub trait Entity: Serialize + DeserializeOwned + Send + Sync {
    /// Backing table.
    const TABLE: &'static str;

    /// Column holding the tenant scope.
    const SCOPE_COLUMN: &'static str = "business_id";

    /// Row id, once stored.
    fn id(&self) -> Option<&str>;

    /// Tenant scope of the row.
    fn business_id(&self) -> &str;
}

macro_rules! entity {
    ($ty:ty, $table:literal) => {
        impl Entity for $ty {
            const TABLE: &'static str = $table;

            fn id(&self) -> Option<&str> {
                self.id.as_deref()
            }

            fn business_id(&self) -> &str {
                &self.business_id
            }
        }
    };
}

/// A stocked item.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Product {
    /// Row id.
    #[serde(
        default,
        deserialize_with = "de::id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    /// Owning business.
    #[serde(default, deserialize_with = "de::text")]
    pub business_id: String,
    /// Display name.
    #[serde(default, deserialize_with = "de::text")]
    pub name: String,
    /// Stock keeping unit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    /// Selling price.
    #[serde(default, deserialize_with = "de::amount")]
    pub price: f64,
    /// Purchase price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_price: Option<f64>,
    /// Units on hand.
    #[serde(default, deserialize_with = "de::count")]
    pub stock_quantity: i64,
    /// Category name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Other columns.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
entity!(Product, "products");

/// A buyer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Customer {
    /// Row id.
    #[serde(
        default,
        deserialize_with = "de::id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    /// Owning business.
    #[serde(default, deserialize_with = "de::text")]
    pub business_id: String,
    /// Full name.
    #[serde(default, deserialize_with = "de::text")]
    pub name: String,
    /// Email address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Outstanding credit.
    #[serde(default, deserialize_with = "de::amount")]
    pub balance: f64,
    /// Other columns.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
entity!(Customer, "customers");

/// A customer order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Order {
    /// Row id.
    #[serde(
        default,
        deserialize_with = "de::id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    /// Owning business.
    #[serde(default, deserialize_with = "de::text")]
    pub business_id: String,
    /// Ordering customer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    /// Workflow status.
    #[serde(default, deserialize_with = "de::text")]
    pub status: String,
    /// Order total. Missing totals read as zero.
    #[serde(default, deserialize_with = "de::amount")]
    pub total_amount: f64,
    /// Other columns.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
entity!(Order, "orders");

/// A point-of-sale transaction.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Sale {
    /// Row id.
    #[serde(
        default,
        deserialize_with = "de::id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    /// Owning business.
    #[serde(default, deserialize_with = "de::text")]
    pub business_id: String,
    /// Sold product.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    /// Buying customer, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    /// Units sold.
    #[serde(default, deserialize_with = "de::amount")]
    pub quantity: f64,
    /// Price per unit.
    #[serde(default, deserialize_with = "de::amount")]
    pub unit_price: f64,
    /// Sale total.
    #[serde(default, deserialize_with = "de::amount")]
    pub total_amount: f64,
    /// Cash, card, mobile money, ...
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    /// Other columns.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
entity!(Sale, "sales");

/// A business expense.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Expense {
    /// Row id.
    #[serde(
        default,
        deserialize_with = "de::id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    /// Owning business.
    #[serde(default, deserialize_with = "de::text")]
    pub business_id: String,
    /// Expense category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    /// What was paid for.
    #[serde(default, deserialize_with = "de::text")]
    pub description: String,
    /// Amount paid.
    #[serde(default, deserialize_with = "de::amount")]
    pub amount: f64,
    /// ISO date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expense_date: Option<String>,
    /// Other columns.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
entity!(Expense, "expenses");

/// An expense category.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExpenseCategory {
    /// Row id.
    #[serde(
        default,
        deserialize_with = "de::id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    /// Owning business.
    #[serde(default, deserialize_with = "de::text")]
    pub business_id: String,
    /// Category name.
    #[serde(default, deserialize_with = "de::text")]
    pub name: String,
    /// Other columns.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
entity!(ExpenseCategory, "expense_categories");

/// A vendor.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Supplier {
    /// Row id.
    #[serde(
        default,
        deserialize_with = "de::id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    /// Owning business.
    #[serde(default, deserialize_with = "de::text")]
    pub business_id: String,
    /// Company name.
    #[serde(default, deserialize_with = "de::text")]
    pub name: String,
    /// Contact person.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    /// Phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Email address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Other columns.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
entity!(Supplier, "suppliers");

/// A payment collected against a customer balance.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Collection {
    /// Row id.
    #[serde(
        default,
        deserialize_with = "de::id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    /// Owning business.
    #[serde(default, deserialize_with = "de::text")]
    pub business_id: String,
    /// Paying customer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    /// Amount collected.
    #[serde(default, deserialize_with = "de::amount")]
    pub amount: f64,
    /// Payment method.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// ISO date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collected_at: Option<String>,
    /// Other columns.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
entity!(Collection, "collections");

/// Damaged stock awaiting write-off or replacement.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Damage {
    /// Row id.
    #[serde(
        default,
        deserialize_with = "de::id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    /// Owning business.
    #[serde(default, deserialize_with = "de::text")]
    pub business_id: String,
    /// Damaged product.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    /// Units damaged.
    #[serde(default, deserialize_with = "de::amount")]
    pub quantity: f64,
    /// Free-text reason.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// `pending_replacement`, `replaced`, `written_off`.
    #[serde(default, deserialize_with = "de::text")]
    pub status: String,
    /// Other columns.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
entity!(Damage, "damages");
