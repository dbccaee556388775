use actix_web::web::{self, Data, FormConfig, JsonConfig, PathConfig, PayloadConfig, QueryConfig};
use actix_web::{App, HttpServer, ResponseError};
use tracing::info;
use tracing_actix_web::TracingLogger;

pub mod campaign;
pub mod config;
pub mod content;
pub mod database;
pub mod error;
pub mod inquiry;
pub mod notification;
pub mod sponsor;
pub mod store;
pub mod typedid;
pub mod utils;

use config::{Config, StorageBackend};
use database::{Database, FileDatabase, MongoDatabase};
use error::Error;
use notification::Notifier;

/// Registers every route along with the extractor error formats. The app is
/// expected to carry `Data<Box<dyn Database>>`, `Data<dyn Notifier>` and
/// `Data<Config>`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(JsonConfig::default().error_handler(|err, _req| {
        // format json errors with custom format
        Error::InvalidJson(err).into()
    }))
    .app_data(PathConfig::default().error_handler(|err, _req| {
        // format path errors with custom format
        Error::InvalidPath(err).into()
    }))
    .app_data(FormConfig::default().error_handler(|err, _req| {
        // format form errors with custom format
        Error::InvalidForm(err).into()
    }))
    .app_data(QueryConfig::default().error_handler(|err, _req| {
        // format query errors with custom format
        Error::InvalidQuery(err).into()
    }))
    .service(campaign::endpoints::get_campaigns)
    .service(campaign::endpoints::save_campaign)
    .service(campaign::endpoints::delete_campaign)
    .service(content::endpoints::get_content)
    .service(content::endpoints::put_content)
    .service(content::endpoints::upload_image)
    .service(content::endpoints::get_upload)
    .service(inquiry::endpoints::create_inquiry)
    .service(inquiry::endpoints::get_inquiries)
    .service(inquiry::endpoints::update_inquiry_status)
    .service(inquiry::endpoints::delete_inquiries)
    .service(sponsor::endpoints::create_sponsor)
    .service(sponsor::endpoints::get_sponsors)
    .service(notification::send_email)
    .default_service(web::to(|| async { Error::PathNotFound.error_response() }));
}

async fn open_database(config: &Config) -> Result<Box<dyn Database>, Error> {
    let db: Box<dyn Database> = match &config.storage {
        StorageBackend::File => {
            info!(data_dir = %config.data_dir.display(), "using file storage");
            Box::new(FileDatabase::initialize(config.data_dir.clone()).await?)
        }
        StorageBackend::Mongo { uri, database } => {
            info!(%database, "using mongodb storage");
            Box::new(MongoDatabase::initialize(uri, database).await?)
        }
    };

    Ok(db)
}

pub async fn run(config: Config) -> Result<(), Error> {
    let db = Data::new(open_database(&config).await?);
    let notifier: Data<dyn Notifier> = Data::from(notification::from_config(&config));
    let addr = config.addr();
    let max_upload_bytes = config.max_upload_bytes;
    let config = Data::new(config);

    info!("listening on {}", addr);

    HttpServer::new(move || {
        App::new()
            .app_data(db.clone())
            .app_data(notifier.clone())
            .app_data(config.clone())
            .app_data(PayloadConfig::new(max_upload_bytes))
            .wrap(TracingLogger::default())
            .configure(configure)
    })
    .bind(addr)?
    .run()
    .await?;

    Ok(())
}

