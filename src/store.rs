//! The narrow persistence seam the terminal controller talks to. The
//! controller never touches SQL; it asks a [`Store`] for rows keyed by
//! [`Entity`] and gets [`Record`]s back.

use anyhow::Context;
use rusqlite::Connection;
use thiserror::Error;

use crate::db::{
    count_customers, count_products, create_customer, create_product, delete_customer,
    delete_product, fetch_customer, fetch_customers, fetch_product, fetch_products,
    update_customer, update_product,
};
use crate::models::{Entity, FormData, Record};

/// Failures crossing the store boundary.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store refused the write outright (read-only snapshot, injected
    /// failure in tests).
    #[error("{0}")]
    Rejected(String),
    /// Anything raised by the SQL layer, with its context chain intact.
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Synchronous CRUD per entity type.
pub trait Store {
    /// All rows of one table in a stable order.
    fn list(&self, entity: Entity) -> StoreResult<Vec<Record>>;
    fn get(&self, entity: Entity, id: i64) -> StoreResult<Option<Record>>;
    /// Insert a row built from `fields` and return it with its generated id.
    fn create(&mut self, entity: Entity, fields: &FormData) -> StoreResult<Record>;
    /// `Ok(None)` when no row with `id` exists.
    fn update(&mut self, entity: Entity, id: i64, fields: &FormData)
        -> StoreResult<Option<Record>>;
    /// `Ok(false)` when no row with `id` exists.
    fn delete(&mut self, entity: Entity, id: i64) -> StoreResult<bool>;
    fn count(&self, entity: Entity) -> StoreResult<usize>;
}

/// [`Store`] backed by the embedded SQLite database.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }
}

impl Store for SqliteStore {
    fn list(&self, entity: Entity) -> StoreResult<Vec<Record>> {
        let records = match entity {
            Entity::Customer => fetch_customers(&self.conn)?
                .into_iter()
                .map(Record::Customer)
                .collect(),
            Entity::Product => fetch_products(&self.conn)?
                .into_iter()
                .map(Record::Product)
                .collect(),
        };
        Ok(records)
    }

    fn get(&self, entity: Entity, id: i64) -> StoreResult<Option<Record>> {
        let record = match entity {
            Entity::Customer => fetch_customer(&self.conn, id)?.map(Record::Customer),
            Entity::Product => fetch_product(&self.conn, id)?.map(Record::Product),
        };
        Ok(record)
    }

    fn create(&mut self, entity: Entity, fields: &FormData) -> StoreResult<Record> {
        let record = match Record::from_form_data(entity, 0, fields) {
            Record::Customer(customer) => Record::Customer(create_customer(&self.conn, &customer)?),
            Record::Product(product) => Record::Product(create_product(&self.conn, &product)?),
        };
        Ok(record)
    }

    fn update(
        &mut self,
        entity: Entity,
        id: i64,
        fields: &FormData,
    ) -> StoreResult<Option<Record>> {
        let record = match Record::from_form_data(entity, id, fields) {
            Record::Customer(customer) => {
                update_customer(&self.conn, &customer)?.map(Record::Customer)
            }
            Record::Product(product) => update_product(&self.conn, &product)?.map(Record::Product),
        };
        Ok(record)
    }

    fn delete(&mut self, entity: Entity, id: i64) -> StoreResult<bool> {
        let deleted = match entity {
            Entity::Customer => delete_customer(&self.conn, id),
            Entity::Product => delete_product(&self.conn, id),
        }
        .with_context(|| format!("{entity} #{id} could not be deleted"))?;
        Ok(deleted)
    }

    fn count(&self, entity: Entity) -> StoreResult<usize> {
        let count = match entity {
            Entity::Customer => count_customers(&self.conn)?,
            Entity::Product => count_products(&self.conn)?,
        };
        Ok(count)
    }
}

/// Ordered in-memory [`Store`]. Ids are generated per table starting at 1.
/// Setting `reject_writes` makes every create/update/delete fail with
/// [`StoreError::Rejected`], which is how the failure path gets exercised
/// without a broken database.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Vec<Record>,
    next_id: i64,
    pub reject_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with already-built rows, keeping their ids.
    pub fn with_records(records: Vec<Record>) -> Self {
        let next_id = records.iter().map(Record::id).max().unwrap_or(0);
        Self {
            records,
            next_id,
            reject_writes: false,
        }
    }

    fn check_writable(&self) -> StoreResult<()> {
        if self.reject_writes {
            Err(StoreError::Rejected("store is read-only".into()))
        } else {
            Ok(())
        }
    }

    fn position(&self, entity: Entity, id: i64) -> Option<usize> {
        self.records
            .iter()
            .position(|record| record.entity() == entity && record.id() == id)
    }
}

impl Store for MemoryStore {
    fn list(&self, entity: Entity) -> StoreResult<Vec<Record>> {
        Ok(self
            .records
            .iter()
            .filter(|record| record.entity() == entity)
            .cloned()
            .collect())
    }

    fn get(&self, entity: Entity, id: i64) -> StoreResult<Option<Record>> {
        Ok(self
            .position(entity, id)
            .map(|index| self.records[index].clone()))
    }

    fn create(&mut self, entity: Entity, fields: &FormData) -> StoreResult<Record> {
        self.check_writable()?;
        self.next_id += 1;
        let record = Record::from_form_data(entity, self.next_id, fields);
        self.records.push(record.clone());
        Ok(record)
    }

    fn update(
        &mut self,
        entity: Entity,
        id: i64,
        fields: &FormData,
    ) -> StoreResult<Option<Record>> {
        self.check_writable()?;
        let Some(index) = self.position(entity, id) else {
            return Ok(None);
        };
        let record = Record::from_form_data(entity, id, fields);
        self.records[index] = record.clone();
        Ok(Some(record))
    }

    fn delete(&mut self, entity: Entity, id: i64) -> StoreResult<bool> {
        self.check_writable()?;
        match self.position(entity, id) {
            Some(index) => {
                self.records.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn count(&self, entity: Entity) -> StoreResult<usize> {
        Ok(self
            .records
            .iter()
            .filter(|record| record.entity() == entity)
            .count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;
    use crate::models::{fields, FieldValue};

    fn customer_fields(name: &str) -> FormData {
        let mut data = FormData::new();
        data.insert(fields::CUSTOMER_NAME, FieldValue::Text(name.into()));
        data.insert(fields::CREDIT_LIMIT, FieldValue::Number(10.0));
        data
    }

    fn exercise(store: &mut dyn Store) {
        let created = store
            .create(Entity::Customer, &customer_fields("Ada"))
            .unwrap();
        assert_eq!(store.count(Entity::Customer).unwrap(), 1);
        assert_eq!(store.count(Entity::Product).unwrap(), 0);

        let updated = store
            .update(Entity::Customer, created.id(), &customer_fields("Ada King"))
            .unwrap()
            .unwrap();
        assert_eq!(updated.search_fields()[0], "Ada King");
        assert_eq!(
            store.get(Entity::Customer, created.id()).unwrap(),
            Some(updated)
        );

        assert!(store
            .update(Entity::Product, created.id(), &FormData::new())
            .unwrap()
            .is_none());
        assert!(store.delete(Entity::Customer, created.id()).unwrap());
        assert!(!store.delete(Entity::Customer, created.id()).unwrap());
        assert!(store.list(Entity::Customer).unwrap().is_empty());
    }

    #[test]
    fn sqlite_store_follows_the_store_contract() {
        let mut store = SqliteStore::new(open_in_memory().unwrap());
        exercise(&mut store);
    }

    #[test]
    fn memory_store_follows_the_store_contract() {
        let mut store = MemoryStore::new();
        exercise(&mut store);
    }

    #[test]
    fn rejected_writes_leave_memory_store_untouched() {
        let mut store = MemoryStore::new();
        store.reject_writes = true;

        let err = store
            .create(Entity::Customer, &customer_fields("Ada"))
            .unwrap_err();
        assert!(matches!(err, StoreError::Rejected(_)));
        assert_eq!(store.count(Entity::Customer).unwrap(), 0);
    }
}
