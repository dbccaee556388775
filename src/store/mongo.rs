use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::options::FindOptions;
use mongodb::{bson, Client, Collection};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use crate::error::Error;

use super::{DocumentStore, Record, RecordStore};

/// Location of a collection, kept so it can be replaced through a rename.
#[derive(Debug, Clone)]
struct Namespace {
    client: Client,
    database: String,
    name: String,
}

impl Namespace {
    fn new(client: &Client, database: &str, name: &str) -> Namespace {
        Namespace {
            client: client.clone(),
            database: database.to_string(),
            name: name.to_string(),
        }
    }

    fn collection<T: Send + Sync>(&self) -> Collection<T> {
        self.client.database(&self.database).collection(&self.name)
    }
}

/// Writes `documents` into a fresh staging collection and renames it over
/// the target. Readers see either the old contents or the new ones, and a
/// failed write leaves the target untouched.
async fn replace_collection<T>(namespace: &Namespace, documents: &[T]) -> Result<(), Error>
where
    T: Serialize + Send + Sync,
{
    let database = namespace.client.database(&namespace.database);
    let staging_name = format!("{}_staging_{}", namespace.name, Uuid::new_v4().simple());
    let staging = database.collection::<T>(&staging_name);

    let staged = if documents.is_empty() {
        database.create_collection(&staging_name, None).await
    } else {
        staging.insert_many(documents, None).await.map(|_| ())
    };

    let replaced = match staged {
        Ok(()) => namespace
            .client
            .database("admin")
            .run_command(
                bson::doc! {
                    "renameCollection": format!("{}.{}", namespace.database, staging_name),
                    "to": format!("{}.{}", namespace.database, namespace.name),
                    "dropTarget": true,
                },
                None,
            )
            .await
            .map(|_| ()),
        Err(err) => Err(err),
    };

    if let Err(err) = replaced {
        if let Err(drop_err) = staging.drop(None).await {
            warn!(collection = %staging_name, error = %drop_err, "failed to drop staging collection");
        }
        return Err(err.into());
    }

    Ok(())
}

/// A collection kept as a MongoDB collection of one document per record.
///
/// Saving replaces the whole collection, which keeps the same semantics as
/// the file store (and the same lost-update behavior under concurrent
/// writers).
#[derive(Debug, Clone)]
pub struct MongoRecords<T: Send + Sync> {
    collection: Collection<T>,
    namespace: Namespace,
}

impl<T: Send + Sync> MongoRecords<T> {
    pub fn new(client: &Client, database: &str, name: &str) -> MongoRecords<T> {
        let namespace = Namespace::new(client, database, name);

        MongoRecords {
            collection: namespace.collection(),
            namespace,
        }
    }
}

/// A single document kept as the only member of a MongoDB collection.
#[derive(Debug, Clone)]
pub struct MongoDocument<T: Send + Sync> {
    collection: Collection<T>,
    namespace: Namespace,
}

impl<T: Send + Sync> MongoDocument<T> {
    pub fn new(client: &Client, database: &str, name: &str) -> MongoDocument<T> {
        let namespace = Namespace::new(client, database, name);

        MongoDocument {
            collection: namespace.collection(),
            namespace,
        }
    }
}

#[async_trait]
impl<T: Record> RecordStore<T> for MongoRecords<T> {
    #[tracing::instrument(skip(self), fields(collection = %self.namespace.name))]
    async fn load_all(&self) -> Result<Vec<T>, Error> {
        let options = FindOptions::builder().sort(bson::doc! { "_id": 1 }).build();
        let records: Vec<T> = self
            .collection
            .find(bson::doc! {}, options)
            .await?
            .try_collect()
            .await?;

        Ok(records)
    }

    #[tracing::instrument(skip(self, records), fields(collection = %self.namespace.name, count = records.len()))]
    async fn save_all(&self, records: &[T]) -> Result<(), Error> {
        replace_collection(&self.namespace, records).await
    }
}

#[async_trait]
impl<T> DocumentStore<T> for MongoDocument<T>
where
    T: Serialize + DeserializeOwned + Unpin + Send + Sync + 'static,
{
    #[tracing::instrument(skip(self), fields(collection = %self.namespace.name))]
    async fn load(&self) -> Result<Option<T>, Error> {
        let document = self.collection.find_one(bson::doc! {}, None).await?;

        Ok(document)
    }

    #[tracing::instrument(skip(self, document), fields(collection = %self.namespace.name))]
    async fn save(&self, document: &T) -> Result<(), Error> {
        replace_collection(&self.namespace, std::slice::from_ref(document)).await
    }
}
