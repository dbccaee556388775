#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use actix_web::web::Data;
use pledge_server::config::Config;
use pledge_server::database::{Database, FileDatabase};
use pledge_server::notification::{LogNotifier, Notifier};
use uuid::Uuid;

/// Shared state for one app under test, backed by a fresh temp directory.
pub struct TestState {
    pub dir: PathBuf,
    pub db: Data<Box<dyn Database>>,
    pub notifier: Data<dyn Notifier>,
    pub config: Data<Config>,
}

impl TestState {
    pub fn new() -> TestState {
        let dir = std::env::temp_dir().join(format!("pledge-http-{}", Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();

        let config = Config {
            data_dir: dir.join("data"),
            upload_dir: dir.join("uploads"),
            public_base_url: "http://shop.example".to_string(),
            ..Config::default()
        };
        std::fs::create_dir_all(&config.data_dir).unwrap();

        let db: Box<dyn Database> = Box::new(FileDatabase::new(config.data_dir.clone()));
        let notifier: Arc<dyn Notifier> = Arc::new(LogNotifier);

        TestState {
            dir,
            db: Data::new(db),
            notifier: Data::from(notifier),
            config: Data::new(config),
        }
    }

    pub fn data_file(&self, name: &str) -> PathBuf {
        self.config.data_dir.join(name)
    }
}

/// Builds the service for a `TestState`.
macro_rules! init_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data($state.db.clone())
                .app_data($state.notifier.clone())
                .app_data($state.config.clone())
                .configure(pledge_server::configure),
        )
        .await
    };
}
