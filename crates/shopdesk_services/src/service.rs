//! Per-entity services.

use crate::dashboard::Dashboard;
use crate::entity::{
    Collection, Customer, Damage, Entity, Expense, ExpenseCategory, Order, Product, Sale, Supplier,
};
use serde_json::Value;
use shopdesk_client::{ClientError, Envelope, ResilientClient, Row};
use std::fmt;
use std::marker::PhantomData;
use tracing::debug;

/// Equality filter applied by [`EntityService::list`].
#[derive(Debug, Clone, PartialEq)]
pub struct FieldFilter {
    /// Column name.
    pub column: String,
    /// Value the column must equal.
    pub value: Value,
}

impl FieldFilter {
    /// Creates a filter.
    pub fn new(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }
}

/// Tenant-scoped CRUD over one entity table.
pub struct EntityService<T> {
    api: ResilientClient,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for EntityService<T> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T: Entity> fmt::Debug for EntityService<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityService")
            .field("table", &T::TABLE)
            .finish()
    }
}

impl<T: Entity> EntityService<T> {
    /// Creates a service dispatching through `api`.
    pub fn new(api: ResilientClient) -> Self {
        Self {
            api,
            _marker: PhantomData,
        }
    }

    /// Lists the rows of `business_id` matching every filter.
    ///
    /// A blank business id fails with `VALIDATION_ERROR` without touching
    /// the store.
    pub async fn list(&self, business_id: &str, filters: &[FieldFilter]) -> Envelope<Vec<T>> {
        if let Err(err) = require("business_id", business_id) {
            return Envelope::err(err.into());
        }
        let filters = filters.to_vec();
        let envelope = self
            .api
            .read(T::TABLE, move |query| {
                filters
                    .into_iter()
                    .fold(query.eq(T::SCOPE_COLUMN, business_id), |query, filter| {
                        query.eq(filter.column, filter.value)
                    })
            })
            .await;
        decode_many(envelope)
    }

    /// Fetches one row by id.
    pub async fn get(&self, id: &str) -> Envelope<T> {
        if let Err(err) = require("id", id) {
            return Envelope::err(err.into());
        }
        let envelope = self.api.read_one(T::TABLE, |query| query.eq("id", id)).await;
        decode_one(envelope)
    }

    /// Stores a new entity and returns it as stored.
    pub async fn create(&self, entity: &T) -> Envelope<T> {
        if let Err(err) = require("business_id", entity.business_id()) {
            return Envelope::err(err.into());
        }
        let value = match serde_json::to_value(entity) {
            Ok(value) => value,
            Err(err) => return Envelope::err(ClientError::from(err).into()),
        };
        let envelope = self.api.write(T::TABLE, |query| query.insert(value)).await;
        let Envelope {
            data,
            error,
            is_mock,
        } = envelope;
        if let Some(error) = error {
            return Envelope::err(error);
        }
        match data.and_then(|rows| rows.into_iter().next()) {
            Some(row) => decode_one(Envelope {
                data: Some(row),
                error: None,
                is_mock,
            }),
            None => Envelope::empty(),
        }
    }

    /// Merges `patch` into the row with `id`.
    pub async fn update(&self, id: &str, patch: Value) -> Envelope<Vec<T>> {
        if let Err(err) = require("id", id) {
            return Envelope::err(err.into());
        }
        let envelope = self
            .api
            .write(T::TABLE, |query| query.eq("id", id).update(patch))
            .await;
        decode_many(envelope)
    }

    /// Deletes the row with `id`, returning the removed rows.
    pub async fn delete(&self, id: &str) -> Envelope<Vec<T>> {
        if let Err(err) = require("id", id) {
            return Envelope::err(err.into());
        }
        let envelope = self
            .api
            .write(T::TABLE, |query| query.eq("id", id).delete())
            .await;
        decode_many(envelope)
    }
}

fn require(field: &str, value: &str) -> Result<(), ClientError> {
    if value.trim().is_empty() {
        debug!(field, "rejected before dispatch");
        return Err(ClientError::validation(format!("{field} is required")));
    }
    Ok(())
}

fn decode_many<T: Entity>(envelope: Envelope<Vec<Row>>) -> Envelope<Vec<T>> {
    let Envelope {
        data,
        error,
        is_mock,
    } = envelope;
    if let Some(error) = error {
        return Envelope::err(error);
    }
    let Some(rows) = data else {
        return Envelope {
            data: None,
            error: None,
            is_mock,
        };
    };
    let decoded: Result<Vec<T>, _> = rows
        .into_iter()
        .map(|row| serde_json::from_value(Value::Object(row)))
        .collect();
    match decoded {
        Ok(items) => Envelope {
            data: Some(items),
            error: None,
            is_mock,
        },
        Err(err) => Envelope::err(ClientError::from(err).into()),
    }
}

fn decode_one<T: Entity>(envelope: Envelope<Row>) -> Envelope<T> {
    let Envelope {
        data,
        error,
        is_mock,
    } = envelope;
    if let Some(error) = error {
        return Envelope::err(error);
    }
    let Some(row) = data else {
        return Envelope {
            data: None,
            error: None,
            is_mock,
        };
    };
    match serde_json::from_value(Value::Object(row)) {
        Ok(item) => Envelope {
            data: Some(item),
            error: None,
            is_mock,
        },
        Err(err) => Envelope::err(ClientError::from(err).into()),
    }
}

/// Every entity service over one client.
#[derive(Debug, Clone)]
pub struct Services {
    api: ResilientClient,
}

impl Services {
    /// Creates the service set.
    pub fn new(api: ResilientClient) -> Self {
        Self { api }
    }

    /// The shared resilient client.
    pub fn api(&self) -> &ResilientClient {
        &self.api
    }

    fn service<T: Entity>(&self) -> EntityService<T> {
        EntityService::new(self.api.clone())
    }

    /// Products.
    pub fn products(&self) -> EntityService<Product> {
        self.service()
    }

    /// Customers.
    pub fn customers(&self) -> EntityService<Customer> {
        self.service()
    }

    /// Orders.
    pub fn orders(&self) -> EntityService<Order> {
        self.service()
    }

    /// Sales.
    pub fn sales(&self) -> EntityService<Sale> {
        self.service()
    }

    /// Expenses.
    pub fn expenses(&self) -> EntityService<Expense> {
        self.service()
    }

    /// Expense categories.
    pub fn expense_categories(&self) -> EntityService<ExpenseCategory> {
        self.service()
    }

    /// Suppliers.
    pub fn suppliers(&self) -> EntityService<Supplier> {
        self.service()
    }

    /// Collections.
    pub fn collections(&self) -> EntityService<Collection> {
        self.service()
    }

    /// Damages.
    pub fn damages(&self) -> EntityService<Damage> {
        self.service()
    }

    /// Dashboard aggregates.
    pub fn dashboard(&self) -> Dashboard {
        Dashboard::new(self.clone())
    }
}
