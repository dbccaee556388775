use std::io::ErrorKind;

use actix_web::web::{Bytes, Data, Json, Path, Query};
use actix_web::{get, post, put, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::database::Database;
use crate::error::Error;
use crate::utils::OutcomeBody;

use super::{manager, Content};

#[derive(Clone, Debug, Deserialize)]
pub struct UploadQuery {
    pub file_name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UploadBody {
    pub url: String,
}

#[get("/content")]
#[tracing::instrument(skip(db))]
pub async fn get_content(db: Data<Box<dyn Database>>) -> Json<Option<Content>> {
    Json(manager::get_content(&***db).await)
}

#[put("/admin/content")]
#[tracing::instrument(skip(db))]
pub async fn put_content(
    db: Data<Box<dyn Database>>,
    body: Json<Content>,
) -> Result<Json<OutcomeBody>, Error> {
    manager::put_content(&***db, body.into_inner()).await?;

    Ok(OutcomeBody::succeeded())
}

#[post("/admin/uploads")]
#[tracing::instrument(skip(config, bytes))]
pub async fn upload_image(
    config: Data<Config>,
    query: Query<UploadQuery>,
    bytes: Bytes,
) -> Result<Json<UploadBody>, Error> {
    let url = manager::upload_image(
        &config.upload_dir,
        &config.public_base_url,
        &query.file_name,
        &bytes,
    )
    .await?;

    Ok(Json(UploadBody { url }))
}

#[get("/uploads/{file_name}")]
#[tracing::instrument(skip(config))]
pub async fn get_upload(
    config: Data<Config>,
    params: Path<String>,
) -> Result<HttpResponse, Error> {
    let file_name = params.into_inner();
    let path = manager::upload_path(&config.upload_dir, &file_name)?;

    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            return Err(Error::UploadNotFound { file_name })
        }
        Err(err) => return Err(err.into()),
    };

    Ok(HttpResponse::Ok()
        .content_type(content_type(&file_name))
        .body(bytes))
}

fn content_type(file_name: &str) -> &'static str {
    let extension = file_name.rsplit('.').next().unwrap_or_default();
    match extension.to_ascii_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}
