use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::fs;
use tracing::warn;
use uuid::Uuid;

use crate::error::Error;

use super::{DocumentStore, Record, RecordStore};

/// A JSON document on local disk, holding either a whole collection or a
/// single object.
pub struct JsonFile<T> {
    path: PathBuf,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonFile<T> {
    pub fn new(path: impl Into<PathBuf>) -> JsonFile<T> {
        JsonFile {
            path: path.into(),
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<T> Clone for JsonFile<T> {
    fn clone(&self) -> JsonFile<T> {
        JsonFile::new(self.path.clone())
    }
}

impl<T> std::fmt::Debug for JsonFile<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("JsonFile").field(&self.path).finish()
    }
}

/// Reads and parses the document. `Ok(None)` when the file does not exist or
/// is not JSON at all. JSON that does not fit `V` is an error, so a write
/// never replaces records that merely failed to load.
async fn read_document<V: DeserializeOwned>(path: &Path) -> Result<Option<V>, Error> {
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(error) if error.kind() == ErrorKind::NotFound => return Ok(None),
        Err(error) => {
            return Err(Error::FailedToReadDocument {
                path: path.to_owned(),
                error,
            })
        }
    };

    let value: serde_json::Value = match serde_json::from_slice(&bytes) {
        Ok(value) => value,
        Err(error) => {
            warn!(path = %path.display(), %error, "unparseable document treated as absent");
            return Ok(None);
        }
    };

    match serde_json::from_value(value) {
        Ok(document) => Ok(Some(document)),
        Err(error) => Err(Error::InvalidDocument {
            path: path.to_owned(),
            error,
        }),
    }
}

/// Serializes `value` and swaps it in over `path` with a rename, so a reader
/// sees either the old document or the new one.
async fn write_document<V: Serialize + ?Sized>(path: &Path, value: &V) -> Result<(), Error> {
    let bytes = serde_json::to_vec_pretty(value)?;

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let temp_path = path.with_file_name(format!(".{}.{}.tmp", file_name, Uuid::new_v4()));

    if let Err(error) = fs::write(&temp_path, &bytes).await {
        return Err(Error::FailedToWriteDocument {
            path: path.to_owned(),
            error,
        });
    }

    if let Err(error) = fs::rename(&temp_path, path).await {
        let _ = fs::remove_file(&temp_path).await;
        return Err(Error::FailedToWriteDocument {
            path: path.to_owned(),
            error,
        });
    }

    Ok(())
}

#[async_trait]
impl<T: Record> RecordStore<T> for JsonFile<T> {
    #[tracing::instrument(skip(self), fields(path = %self.path.display()))]
    async fn load_all(&self) -> Result<Vec<T>, Error> {
        let records = read_document(&self.path).await?;

        Ok(records.unwrap_or_default())
    }

    #[tracing::instrument(skip(self, records), fields(path = %self.path.display(), count = records.len()))]
    async fn save_all(&self, records: &[T]) -> Result<(), Error> {
        write_document(&self.path, records).await
    }
}

#[async_trait]
impl<T> DocumentStore<T> for JsonFile<T>
where
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    #[tracing::instrument(skip(self), fields(path = %self.path.display()))]
    async fn load(&self) -> Result<Option<T>, Error> {
        read_document(&self.path).await
    }

    #[tracing::instrument(skip(self, document), fields(path = %self.path.display()))]
    async fn save(&self, document: &T) -> Result<(), Error> {
        write_document(&self.path, document).await
    }
}
