//! REST-style path to table resolution.
//!
//! Known resources resolve through an explicit table. Anything else falls
//! back to using the cleaned path itself as the table name, which is how
//! older call sites addressed tables. Identifiers embedded in a path are
//! never turned into filters; pass them as an `id` filter instead.

use std::fmt;

/// Resources with a known path and table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    /// `/products`
    Products,
    /// `/customers`
    Customers,
    /// `/sales`
    Sales,
    /// `/orders`
    Orders,
    /// `/expenses`
    Expenses,
    /// `/expenses/categories`
    ExpenseCategories,
    /// `/suppliers`
    Suppliers,
    /// `/collections`
    Collections,
    /// `/damages`
    Damages,
    /// `/damages/pending-replacement`
    DamagesPendingReplacement,
    /// `/profiles`
    Profiles,
    /// `/businesses`
    Businesses,
    /// `/inventory/movements`
    InventoryMovements,
}

impl Resource {
    /// Every known resource.
    pub const ALL: [Resource; 13] = [
        Resource::Products,
        Resource::Customers,
        Resource::Sales,
        Resource::Orders,
        Resource::Expenses,
        Resource::ExpenseCategories,
        Resource::Suppliers,
        Resource::Collections,
        Resource::Damages,
        Resource::DamagesPendingReplacement,
        Resource::Profiles,
        Resource::Businesses,
        Resource::InventoryMovements,
    ];

    /// Path without leading slash.
    pub fn path(self) -> &'static str {
        match self {
            Resource::Products => "products",
            Resource::Customers => "customers",
            Resource::Sales => "sales",
            Resource::Orders => "orders",
            Resource::Expenses => "expenses",
            Resource::ExpenseCategories => "expenses/categories",
            Resource::Suppliers => "suppliers",
            Resource::Collections => "collections",
            Resource::Damages => "damages",
            Resource::DamagesPendingReplacement => "damages/pending-replacement",
            Resource::Profiles => "profiles",
            Resource::Businesses => "businesses",
            Resource::InventoryMovements => "inventory/movements",
        }
    }

    /// Backing table.
    pub fn table(self) -> &'static str {
        match self {
            Resource::ExpenseCategories => "expense_categories",
            Resource::DamagesPendingReplacement => "damages_pending_replacement",
            Resource::InventoryMovements => "inventory_movements",
            other => other.path(),
        }
    }

    /// Looks up a cleaned path (no slashes at either end, no query string).
    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.path() == path)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.path())
    }
}

/// A resolved path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// Path with query string and outer slashes removed.
    pub path: String,
    /// Table the path addresses.
    pub table: String,
    /// Matching resource, if the path is a known one.
    pub resource: Option<Resource>,
    /// Last segment of an unknown path whose parent is a known resource,
    /// e.g. `123` in `/products/123`.
    pub trailing_segment: Option<String>,
    /// `key=value` pairs from the query string, in order.
    pub query: Vec<(String, String)>,
}

impl Endpoint {
    /// Resolves `raw` into a table.
    pub fn resolve(raw: &str) -> Self {
        let (path, query) = match raw.split_once('?') {
            Some((path, query)) => (path, parse_query(query)),
            None => (raw, Vec::new()),
        };
        let path = path.trim_matches('/').to_string();

        if let Some(resource) = Resource::from_path(&path) {
            return Self {
                table: resource.table().to_string(),
                resource: Some(resource),
                trailing_segment: None,
                path,
                query,
            };
        }

        let trailing_segment = path
            .rsplit_once('/')
            .filter(|(parent, _)| Resource::from_path(parent).is_some())
            .map(|(_, last)| last.to_string());

        Self {
            table: path.clone(),
            resource: None,
            trailing_segment,
            path,
            query,
        }
    }

    /// Returns true if the path looks like `<known resource>/<id>`.
    pub fn has_suspected_id(&self) -> bool {
        self.trailing_segment.is_some()
    }
}

fn parse_query(query: &str) -> Vec<(String, String)> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((k, v)) => (k.to_string(), v.to_string()),
            None => (pair.to_string(), String::new()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_paths_resolve_to_tables() {
        for (path, table) in [
            ("/products", "products"),
            ("/customers", "customers"),
            ("/sales", "sales"),
            ("/orders", "orders"),
            ("/expenses", "expenses"),
            ("/suppliers", "suppliers"),
            ("/collections", "collections"),
        ] {
            assert_eq!(Endpoint::resolve(path).table, table);
        }
    }

    #[test]
    fn sub_resources_map_to_their_own_table() {
        let categories = Endpoint::resolve("/expenses/categories");
        assert_eq!(categories.table, "expense_categories");
        assert_eq!(categories.resource, Some(Resource::ExpenseCategories));
        assert!(!categories.has_suspected_id());

        let pending = Endpoint::resolve("/damages/pending-replacement");
        assert_eq!(pending.table, "damages_pending_replacement");
    }

    #[test]
    fn strips_query_string_and_slashes() {
        let endpoint = Endpoint::resolve("products/?business_id=B1&active=true");
        assert_eq!(endpoint.table, "products");
        assert_eq!(
            endpoint.query,
            vec![
                ("business_id".to_string(), "B1".to_string()),
                ("active".to_string(), "true".to_string())
            ]
        );
    }

    #[test]
    fn path_ids_are_not_parsed() {
        let endpoint = Endpoint::resolve("/products/123");
        assert_eq!(endpoint.table, "products/123");
        assert_eq!(endpoint.resource, None);
        assert_eq!(endpoint.trailing_segment.as_deref(), Some("123"));
    }

    #[test]
    fn unknown_paths_are_used_verbatim() {
        let endpoint = Endpoint::resolve("/reports/monthly");
        assert_eq!(endpoint.table, "reports/monthly");
        assert!(!endpoint.has_suspected_id());
    }

    #[test]
    fn every_resource_round_trips_through_its_path() {
        for resource in Resource::ALL {
            assert_eq!(Resource::from_path(resource.path()), Some(resource));
        }
    }
}
