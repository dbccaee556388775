use actix_web::web::{Data, Form, Json, Query};
use actix_web::{get, post};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::database::Database;
use crate::error::Error;
use crate::utils::{iso_timestamp, OutcomeBody, SortQuery};

use super::{manager, Inquiry, InquiryId, InquirySortKey, InquiryStatus};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CreateInquiryBody {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct UpdateInquiryStatusBody {
    pub ids: Vec<InquiryId>,
    pub status: InquiryStatus,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct DeleteInquiriesBody {
    pub ids: Vec<InquiryId>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InquiryBody {
    pub id: InquiryId,
    pub name: String,
    pub email: String,
    pub message: String,
    #[serde(with = "iso_timestamp")]
    pub created_at: DateTime<Utc>,
    pub status: InquiryStatus,
}

impl InquiryBody {
    pub fn render(inquiry: Inquiry) -> InquiryBody {
        InquiryBody {
            id: inquiry.id,
            name: inquiry.name,
            email: inquiry.email,
            message: inquiry.message,
            created_at: inquiry.created_at,
            status: inquiry.status,
        }
    }
}

#[post("/inquiries")]
#[tracing::instrument(skip(db, body))]
pub async fn create_inquiry(
    db: Data<Box<dyn Database>>,
    body: Form<CreateInquiryBody>,
) -> Result<Json<OutcomeBody>, Error> {
    let body = body.into_inner();

    manager::submit_inquiry(&***db, body.name, body.email, body.message).await?;

    Ok(OutcomeBody::succeeded())
}

#[get("/admin/inquiries")]
#[tracing::instrument(skip(db))]
pub async fn get_inquiries(
    db: Data<Box<dyn Database>>,
    query: Query<SortQuery<InquirySortKey>>,
) -> Result<Json<Vec<InquiryBody>>, Error> {
    let query = query.into_inner();

    let inquiries = manager::get_inquiries(
        &***db,
        query.sort.unwrap_or_default(),
        query.order.unwrap_or_default(),
    )
    .await?;

    let body = inquiries.into_iter().map(InquiryBody::render).collect();

    Ok(Json(body))
}

#[post("/admin/inquiries/status")]
#[tracing::instrument(skip(db))]
pub async fn update_inquiry_status(
    db: Data<Box<dyn Database>>,
    body: Json<UpdateInquiryStatusBody>,
) -> Result<Json<OutcomeBody>, Error> {
    let body = body.into_inner();

    manager::set_inquiry_status(&***db, &body.ids, body.status).await?;

    Ok(OutcomeBody::succeeded())
}

#[post("/admin/inquiries/delete")]
#[tracing::instrument(skip(db))]
pub async fn delete_inquiries(
    db: Data<Box<dyn Database>>,
    body: Json<DeleteInquiriesBody>,
) -> Result<Json<OutcomeBody>, Error> {
    let body = body.into_inner();

    manager::delete_inquiries(&***db, &body.ids).await?;

    Ok(OutcomeBody::succeeded())
}
