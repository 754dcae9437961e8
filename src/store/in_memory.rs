//! InMemoryStore - Vec-backed record store for testing and development.

use std::sync::{Arc, RwLock};

use serde_json::Value;

use super::{Collection, Filter, RecordStore, StoreError};
use crate::record::{loosely_equal, pk_key, same_pk, Record};

/// The collection state. Transactions work on a clone of it.
#[derive(Clone)]
struct Table {
    pk_field: String,
    unique: Vec<String>,
    next_id: u64,
    rows: Vec<Record>,
}

impl Table {
    fn position(&self, pk: &Value) -> Option<usize> {
        self.rows
            .iter()
            .position(|row| row.get(&self.pk_field).is_some_and(|v| same_pk(v, pk)))
    }

    /// Next auto-increment key not taken by any stored key, numeric or
    /// textual.
    fn next_free_id(&mut self) -> u64 {
        loop {
            self.next_id += 1;
            if self.position(&Value::from(self.next_id)).is_none() {
                return self.next_id;
            }
        }
    }

    /// Unique fields compare with [`loosely_equal`], so `1` and `"1"` clash
    /// the same way they do as primary keys.
    fn check_unique(&self, candidate: &Record, skip: Option<usize>) -> Result<(), StoreError> {
        for field in &self.unique {
            let Some(value) = candidate.get(field).filter(|v| !v.is_null()) else {
                continue;
            };
            let clash = self.rows.iter().enumerate().any(|(i, row)| {
                Some(i) != skip && row.get(field).is_some_and(|v| loosely_equal(v, value))
            });
            if clash {
                return Err(StoreError::Duplicate {
                    field: field.clone(),
                    value: value.to_string(),
                });
            }
        }
        Ok(())
    }
}

impl Collection for Table {
    fn pk_field(&self) -> &str {
        &self.pk_field
    }

    fn get(&self, scope: &Filter, pk: &Value) -> Result<Option<Record>, StoreError> {
        Ok(self
            .position(pk)
            .map(|i| &self.rows[i])
            .filter(|row| scope.matches(row))
            .cloned())
    }

    fn find(&self, filter: &Filter) -> Result<Vec<Record>, StoreError> {
        Ok(self
            .rows
            .iter()
            .filter(|row| filter.matches(row))
            .cloned()
            .collect())
    }

    fn create(&mut self, mut fields: Record) -> Result<Record, StoreError> {
        match fields.get(&self.pk_field) {
            None | Some(Value::Null) => {
                let id = self.next_free_id();
                fields.insert(self.pk_field.clone(), Value::from(id));
            }
            Some(pk) => {
                if pk_key(pk).is_none() {
                    return Err(StoreError::InvalidKey(pk.to_string()));
                }
                if self.position(pk).is_some() {
                    return Err(StoreError::Duplicate {
                        field: self.pk_field.clone(),
                        value: pk.to_string(),
                    });
                }
                if let Some(n) = pk.as_u64() {
                    self.next_id = self.next_id.max(n);
                }
            }
        }

        self.check_unique(&fields, None)?;
        self.rows.push(fields.clone());
        Ok(fields)
    }

    fn get_or_create(&mut self, scope: &Filter, fields: Record) -> Result<Record, StoreError> {
        let existing = self.rows.iter().find(|row| {
            scope.matches(row)
                && fields
                    .iter()
                    .all(|(k, v)| row.get(k).is_some_and(|stored| loosely_equal(stored, v)))
        });

        match existing {
            Some(row) => Ok(row.clone()),
            None => self.create(fields),
        }
    }

    fn update(&mut self, pk: &Value, changes: Record) -> Result<Record, StoreError> {
        let index = self
            .position(pk)
            .ok_or_else(|| StoreError::NotFound(pk.to_string()))?;

        let mut updated = self.rows[index].clone();
        for (field, value) in changes {
            // The primary key is immutable.
            if field == self.pk_field {
                continue;
            }
            updated.insert(field, value);
        }

        self.check_unique(&updated, Some(index))?;
        self.rows[index] = updated.clone();
        Ok(updated)
    }

    fn delete_excluding(&mut self, filter: &Filter, keep: &[Value]) -> Result<usize, StoreError> {
        let pk_field = self.pk_field.clone();
        let before = self.rows.len();
        self.rows.retain(|row| {
            let kept = row
                .get(&pk_field)
                .is_some_and(|pk| keep.iter().any(|k| same_pk(pk, k)));
            kept || !filter.matches(row)
        });
        Ok(before - self.rows.len())
    }
}

/// In-memory record store.
///
/// Primary keys are auto-incremented integers unless supplied. Clone-friendly
/// via Arc: clones share storage.
#[derive(Clone)]
pub struct InMemoryStore {
    table: Arc<RwLock<Table>>,
}

impl InMemoryStore {
    /// Create an empty store whose primary key is `pk_field`.
    pub fn new(pk_field: &str) -> Self {
        Self {
            table: Arc::new(RwLock::new(Table {
                pk_field: pk_field.to_string(),
                unique: Vec::new(),
                next_id: 0,
                rows: Vec::new(),
            })),
        }
    }

    /// Declare fields whose values must be unique across the collection.
    pub fn with_unique(self, fields: &[&str]) -> Result<Self, StoreError> {
        {
            let mut table = self
                .table
                .write()
                .map_err(|_| StoreError::LockPoisoned("with_unique"))?;
            table.unique = fields.iter().map(|f| f.to_string()).collect();
        }
        Ok(self)
    }

    /// Create a store pre-populated with `rows`.
    pub fn seeded(pk_field: &str, rows: Vec<Record>) -> Result<Self, StoreError> {
        let store = Self::new(pk_field);
        store.atomic(|tx| -> Result<(), StoreError> {
            for row in rows {
                tx.create(row)?;
            }
            Ok(())
        })?;
        Ok(store)
    }

    /// Number of stored records.
    pub fn len(&self) -> Result<usize, StoreError> {
        let table = self
            .table
            .read()
            .map_err(|_| StoreError::LockPoisoned("len"))?;
        Ok(table.rows.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

impl RecordStore for InMemoryStore {
    fn read<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&dyn Collection) -> Result<T, StoreError>,
    {
        let table = self
            .table
            .read()
            .map_err(|_| StoreError::LockPoisoned("read"))?;
        f(&*table)
    }

    fn atomic<T, E, F>(&self, f: F) -> Result<T, E>
    where
        E: From<StoreError>,
        F: FnOnce(&mut dyn Collection) -> Result<T, E>,
    {
        let mut table = self
            .table
            .write()
            .map_err(|_| StoreError::LockPoisoned("atomic"))?;

        // Writes land on a staged copy that replaces the table on success.
        let mut staged = table.clone();
        let result = f(&mut staged)?;
        *table = staged;
        Ok(result)
    }
}
