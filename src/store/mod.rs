use std::collections::HashSet;
use std::fmt::Debug;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Error;
use crate::typedid::{TypedId, TypedIdMarker};

pub mod file;
pub mod mongo;

pub use file::JsonFile;
pub use mongo::{MongoDocument, MongoRecords};

/// A record kept in a collection whose members are unique by id.
pub trait Record:
    TypedIdMarker + Clone + Debug + Serialize + DeserializeOwned + Unpin + Send + Sync + 'static
{
    fn id(&self) -> &TypedId<Self>;
}

/// Whole-collection persistence: the collection is always read and written
/// in full.
#[async_trait]
pub trait RecordStore<T: Record>: Send + Sync {
    /// Reads every record. A collection that has never been written, or
    /// that cannot be parsed, reads as empty.
    async fn load_all(&self) -> Result<Vec<T>, Error>;

    /// Replaces the whole collection with `records`.
    async fn save_all(&self, records: &[T]) -> Result<(), Error>;
}

/// Persistence for a single document that is always replaced in full.
#[async_trait]
pub trait DocumentStore<T>: Send + Sync
where
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    async fn load(&self) -> Result<Option<T>, Error>;

    async fn save(&self, document: &T) -> Result<(), Error>;
}

// The operations below are plain read-modify-write cycles with no isolation.
// Two interleaved cycles on the same collection lose the first write.

#[tracing::instrument(skip(store))]
pub async fn upsert<T: Record>(store: &dyn RecordStore<T>, record: T) -> Result<(), Error> {
    let mut records = store.load_all().await?;

    match records.iter_mut().find(|r| r.id() == record.id()) {
        Some(existing) => *existing = record,
        None => records.push(record),
    }

    store.save_all(&records).await
}

#[tracing::instrument(skip(store))]
pub async fn remove_by_ids<T: Record>(
    store: &dyn RecordStore<T>,
    ids: &[TypedId<T>],
) -> Result<(), Error> {
    let ids: HashSet<&TypedId<T>> = ids.iter().collect();

    let mut records = store.load_all().await?;
    records.retain(|r| !ids.contains(r.id()));

    store.save_all(&records).await
}

#[tracing::instrument(skip(store, update))]
pub async fn update_by_ids<T, F>(
    store: &dyn RecordStore<T>,
    ids: &[TypedId<T>],
    update: F,
) -> Result<(), Error>
where
    T: Record,
    F: Fn(&mut T) + Send,
{
    let ids: HashSet<&TypedId<T>> = ids.iter().collect();

    let mut records = store.load_all().await?;
    for record in records.iter_mut().filter(|r| ids.contains(r.id())) {
        update(record);
    }

    store.save_all(&records).await
}
