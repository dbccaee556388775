use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::Error;

const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Where the collections live.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StorageBackend {
    File,
    Mongo { uri: String, database: String },
}

/// Application configuration, read from the environment.
#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Directory holding one json document per collection.
    pub data_dir: PathBuf,
    pub upload_dir: PathBuf,
    /// Prefix for the urls handed out for uploaded images.
    pub public_base_url: String,
    pub storage: StorageBackend,
    pub sendgrid_api_key: Option<String>,
    pub email_from: Option<String>,
    pub send_thank_you_email: bool,
    pub max_upload_bytes: usize,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            host: "127.0.0.1".to_string(),
            port: 8080,
            data_dir: PathBuf::from("data"),
            upload_dir: PathBuf::from("public/uploads"),
            public_base_url: "http://localhost:8080".to_string(),
            storage: StorageBackend::File,
            sendgrid_api_key: None,
            email_from: None,
            send_thank_you_email: false,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Loads `.env` if present, then reads every variable over the defaults.
    pub fn from_env() -> Result<Config, Error> {
        // a missing .env is fine
        let _ = dotenvy::dotenv();

        Config::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Config, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let storage = match var("STORAGE_BACKEND").as_deref().map(str::trim) {
            None | Some("file") => StorageBackend::File,
            Some("mongo") => StorageBackend::Mongo {
                uri: var("MONGODB_URI")
                    .unwrap_or_else(|| "mongodb://localhost:27017".to_string()),
                database: var("MONGODB_DATABASE").unwrap_or_else(|| "pledge".to_string()),
            },
            Some(other) => {
                return Err(Error::InvalidConfiguration {
                    variable: "STORAGE_BACKEND",
                    value: other.to_string(),
                })
            }
        };

        Ok(Config {
            host: var("HOST").unwrap_or(defaults.host),
            port: parse_var("PORT", var("PORT"))?.unwrap_or(defaults.port),
            data_dir: var("DATA_DIR").map(PathBuf::from).unwrap_or(defaults.data_dir),
            upload_dir: var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.upload_dir),
            public_base_url: var("PUBLIC_BASE_URL").unwrap_or(defaults.public_base_url),
            storage,
            sendgrid_api_key: var("SENDGRID_API_KEY"),
            email_from: var("EMAIL_FROM"),
            send_thank_you_email: parse_var("SEND_THANK_YOU_EMAIL", var("SEND_THANK_YOU_EMAIL"))?
                .unwrap_or(defaults.send_thank_you_email),
            max_upload_bytes: parse_var("MAX_UPLOAD_BYTES", var("MAX_UPLOAD_BYTES"))?
                .unwrap_or(defaults.max_upload_bytes),
            log_level: var("LOG_LEVEL").unwrap_or(defaults.log_level),
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T: FromStr>(variable: &'static str, value: Option<String>) -> Result<Option<T>, Error> {
    value
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|_| Error::InvalidConfiguration { variable, value })
        })
        .transpose()
}
