//! # Document Collection
//!
//! An insertion-ordered set of JSON documents guarded by a `RwLock`.
//!
//! Every document carries a store-assigned `_id` (UUID v4 string). Writes are
//! serialized by the collection lock; callers composing several calls get no
//! atomicity across them, except through `insert_unless`.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::errors::{StoreError, StoreResult};
use super::filter::{Filter, FilterExpr, SortSpec};

/// Identifier field present on every stored document
pub const ID_FIELD: &str = "_id";

/// A stored JSON object
pub type Document = Map<String, Value>;

/// Result of a single insert
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertOneResult {
    pub acknowledged: bool,
    pub inserted_id: String,
}

/// Result of an update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
}

/// Result of a delete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

impl DeleteResult {
    pub fn new(deleted_count: u64) -> Self {
        Self {
            acknowledged: true,
            deleted_count,
        }
    }
}

/// Outcome of a conditional insert
#[derive(Debug, Clone, PartialEq)]
pub enum InsertOutcome {
    /// The document was stored
    Inserted(Document),

    /// A document matching the guard already existed; nothing was stored
    Existing(Document),
}

/// Filter matching a document by identifier.
///
/// Identifiers that are not UUIDs can never have been assigned by the store,
/// so they yield `None`.
pub fn id_filter(id: &str) -> Option<Filter> {
    Uuid::parse_str(id)
        .ok()
        .map(|_| FilterExpr::eq(ID_FIELD, id).into())
}

/// Serialize a typed record into a document
pub fn to_document<T: Serialize>(record: &T) -> StoreResult<Document> {
    match serde_json::to_value(record)? {
        Value::Object(doc) => Ok(doc),
        other => Err(StoreError::InvalidDocument(format!(
            "expected an object, got {}",
            other
        ))),
    }
}

/// Deserialize a document into a typed record
pub fn from_document<T: DeserializeOwned>(doc: Document) -> StoreResult<T> {
    Ok(serde_json::from_value(Value::Object(doc))?)
}

/// A named collection of documents
#[derive(Debug)]
pub struct Collection {
    name: &'static str,
    documents: RwLock<Vec<Value>>,
}

impl Collection {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            documents: RwLock::new(Vec::new()),
        }
    }

    /// Collection name
    pub fn name(&self) -> &'static str {
        self.name
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Vec<Value>>> {
        self.documents
            .read()
            .map_err(|_| StoreError::Unavailable(format!("{} lock poisoned", self.name)))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Vec<Value>>> {
        self.documents
            .write()
            .map_err(|_| StoreError::Unavailable(format!("{} lock poisoned", self.name)))
    }

    /// Find all matching documents, optionally sorted and truncated
    pub fn find(
        &self,
        filter: &Filter,
        sort: Option<&SortSpec>,
        limit: Option<usize>,
    ) -> StoreResult<Vec<Document>> {
        let documents = self.read()?;

        let mut matched: Vec<Value> = documents
            .iter()
            .filter(|doc| filter.matches(doc))
            .cloned()
            .collect();
        drop(documents);

        if let Some(sort) = sort {
            sort.sort(&mut matched);
        }
        if let Some(limit) = limit {
            matched.truncate(limit);
        }

        Ok(matched.into_iter().filter_map(into_object).collect())
    }

    /// Find the first matching document in storage order
    pub fn find_one(&self, filter: &Filter) -> StoreResult<Option<Document>> {
        let documents = self.read()?;
        Ok(documents
            .iter()
            .find(|doc| filter.matches(doc))
            .cloned()
            .and_then(into_object))
    }

    /// Count matching documents
    pub fn count(&self, filter: &Filter) -> StoreResult<usize> {
        let documents = self.read()?;
        Ok(documents.iter().filter(|doc| filter.matches(doc)).count())
    }

    /// Insert a document, assigning a fresh `_id`
    pub fn insert_one(&self, doc: Document) -> StoreResult<InsertOneResult> {
        let doc = assign_id(doc);
        let inserted_id = document_id(&doc);

        self.write()?.push(Value::Object(doc));

        Ok(InsertOneResult {
            acknowledged: true,
            inserted_id,
        })
    }

    /// Insert a document unless one matching `guard` already exists.
    ///
    /// The existence check and the insert happen under one write lock.
    pub fn insert_unless(&self, guard: &Filter, doc: Document) -> StoreResult<InsertOutcome> {
        let mut documents = self.write()?;

        if let Some(existing) = documents.iter().find(|d| guard.matches(d)) {
            if let Some(existing) = existing.as_object() {
                return Ok(InsertOutcome::Existing(existing.clone()));
            }
        }

        let doc = assign_id(doc);
        documents.push(Value::Object(doc.clone()));
        Ok(InsertOutcome::Inserted(doc))
    }

    /// Overwrite the given fields on the first matching document.
    ///
    /// Fields not present in `set` are left untouched.
    pub fn update_one(&self, filter: &Filter, set: &Document) -> StoreResult<UpdateResult> {
        let mut documents = self.write()?;

        let Some(doc) = documents
            .iter_mut()
            .find(|d| filter.matches(d))
            .and_then(Value::as_object_mut)
        else {
            return Ok(UpdateResult {
                acknowledged: true,
                matched_count: 0,
                modified_count: 0,
            });
        };

        let mut modified = false;
        for (key, value) in set {
            if key == ID_FIELD {
                continue;
            }
            if doc.get(key) != Some(value) {
                doc.insert(key.clone(), value.clone());
                modified = true;
            }
        }

        Ok(UpdateResult {
            acknowledged: true,
            matched_count: 1,
            modified_count: u64::from(modified),
        })
    }

    /// Remove the first matching document
    pub fn delete_one(&self, filter: &Filter) -> StoreResult<DeleteResult> {
        let mut documents = self.write()?;

        match documents.iter().position(|d| filter.matches(d)) {
            Some(idx) => {
                documents.remove(idx);
                Ok(DeleteResult::new(1))
            }
            None => Ok(DeleteResult::new(0)),
        }
    }

    /// Remove every matching document
    pub fn delete_many(&self, filter: &Filter) -> StoreResult<DeleteResult> {
        let mut documents = self.write()?;

        let before = documents.len();
        documents.retain(|d| !filter.matches(d));

        Ok(DeleteResult::new((before - documents.len()) as u64))
    }
}

fn assign_id(mut doc: Document) -> Document {
    doc.insert(
        ID_FIELD.to_string(),
        Value::String(Uuid::new_v4().to_string()),
    );
    doc
}

fn document_id(doc: &Document) -> String {
    doc.get(ID_FIELD)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn into_object(value: Value) -> Option<Document> {
    match value {
        Value::Object(doc) => Some(doc),
        _ => None,
    }
}
