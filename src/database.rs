use std::path::PathBuf;

use crate::campaign::Campaign;
use crate::content::Content;
use crate::error::Error;
use crate::inquiry::Inquiry;
use crate::sponsor::Sponsor;
use crate::store::{DocumentStore, JsonFile, MongoDocument, MongoRecords, RecordStore};

const CAMPAIGNS: &str = "campaigns";
const INQUIRIES: &str = "inquiries";
const SPONSORS: &str = "sponsors";
const CONTENT: &str = "content";

pub trait Database: Send + Sync {
    fn campaigns(&self) -> &dyn RecordStore<Campaign>;
    fn inquiries(&self) -> &dyn RecordStore<Inquiry>;
    fn sponsors(&self) -> &dyn RecordStore<Sponsor>;
    fn content(&self) -> &dyn DocumentStore<Content>;
}

/// One JSON document per collection inside a data directory.
#[derive(Debug, Clone)]
pub struct FileDatabase {
    campaigns: JsonFile<Campaign>,
    inquiries: JsonFile<Inquiry>,
    sponsors: JsonFile<Sponsor>,
    content: JsonFile<Content>,
}

impl FileDatabase {
    pub fn new(data_dir: impl Into<PathBuf>) -> FileDatabase {
        let data_dir = data_dir.into();
        let document = |name: &str| data_dir.join(format!("{}.json", name));

        FileDatabase {
            campaigns: JsonFile::new(document(CAMPAIGNS)),
            inquiries: JsonFile::new(document(INQUIRIES)),
            sponsors: JsonFile::new(document(SPONSORS)),
            content: JsonFile::new(document(CONTENT)),
        }
    }

    /// Creates the data directory if needed. The documents themselves are
    /// created on first write.
    pub async fn initialize(data_dir: impl Into<PathBuf>) -> Result<FileDatabase, Error> {
        let data_dir = data_dir.into();
        tokio::fs::create_dir_all(&data_dir).await?;

        Ok(FileDatabase::new(data_dir))
    }
}

impl Database for FileDatabase {
    fn campaigns(&self) -> &dyn RecordStore<Campaign> {
        &self.campaigns
    }

    fn inquiries(&self) -> &dyn RecordStore<Inquiry> {
        &self.inquiries
    }

    fn sponsors(&self) -> &dyn RecordStore<Sponsor> {
        &self.sponsors
    }

    fn content(&self) -> &dyn DocumentStore<Content> {
        &self.content
    }
}

#[derive(Debug, Clone)]
pub struct MongoDatabase {
    campaigns: MongoRecords<Campaign>,
    inquiries: MongoRecords<Inquiry>,
    sponsors: MongoRecords<Sponsor>,
    content: MongoDocument<Content>,
}

impl MongoDatabase {
    pub fn new(client: &mongodb::Client, name: &str) -> MongoDatabase {
        MongoDatabase {
            campaigns: MongoRecords::new(client, name, CAMPAIGNS),
            inquiries: MongoRecords::new(client, name, INQUIRIES),
            sponsors: MongoRecords::new(client, name, SPONSORS),
            content: MongoDocument::new(client, name, CONTENT),
        }
    }

    #[tracing::instrument(skip(uri))]
    pub async fn initialize(uri: &str, name: &str) -> Result<MongoDatabase, Error> {
        let client = mongodb::Client::with_uri_str(uri).await?;

        Ok(MongoDatabase::new(&client, name))
    }
}

impl Database for MongoDatabase {
    fn campaigns(&self) -> &dyn RecordStore<Campaign> {
        &self.campaigns
    }

    fn inquiries(&self) -> &dyn RecordStore<Inquiry> {
        &self.inquiries
    }

    fn sponsors(&self) -> &dyn RecordStore<Sponsor> {
        &self.sponsors
    }

    fn content(&self) -> &dyn DocumentStore<Content> {
        &self.content
    }
}
