use crate::database::Database;
use crate::error::Error;
use crate::store;
use crate::utils::{self, require_filled, SortOrder};

use super::{Inquiry, InquiryId, InquirySortKey, InquiryStatus};

#[tracing::instrument(skip(db, email, message))]
pub async fn submit_inquiry(
    db: &dyn Database,
    name: String,
    email: String,
    message: String,
) -> Result<Inquiry, Error> {
    require_filled("name", &name)?;
    require_filled("email", &email)?;
    require_filled("message", &message)?;

    let inquiry = Inquiry {
        id: InquiryId::new(),
        name,
        email,
        message,
        created_at: utils::now(),
        status: InquiryStatus::Unhandled,
    };

    store::upsert(db.inquiries(), inquiry.clone()).await?;

    Ok(inquiry)
}

#[tracing::instrument(skip(db))]
pub async fn get_inquiries(
    db: &dyn Database,
    sort: InquirySortKey,
    order: SortOrder,
) -> Result<Vec<Inquiry>, Error> {
    let mut inquiries = db.inquiries().load_all().await?;

    inquiries.sort_by(|a, b| {
        let ordering = match sort {
            InquirySortKey::CreatedAt => a.created_at.cmp(&b.created_at),
            InquirySortKey::Name => a.name.cmp(&b.name),
            InquirySortKey::Email => a.email.cmp(&b.email),
            InquirySortKey::Status => a.status.as_str().cmp(b.status.as_str()),
        };
        order.apply(ordering)
    });

    Ok(inquiries)
}

#[tracing::instrument(skip(db))]
pub async fn set_inquiry_status(
    db: &dyn Database,
    inquiry_ids: &[InquiryId],
    status: InquiryStatus,
) -> Result<(), Error> {
    store::update_by_ids(db.inquiries(), inquiry_ids, |inquiry| inquiry.status = status).await?;

    Ok(())
}

#[tracing::instrument(skip(db))]
pub async fn delete_inquiries(db: &dyn Database, inquiry_ids: &[InquiryId]) -> Result<(), Error> {
    store::remove_by_ids(db.inquiries(), inquiry_ids).await?;

    Ok(())
}
