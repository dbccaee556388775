use actix_web::web::{Data, Form, Json, Query};
use actix_web::{get, post};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::content;
use crate::database::Database;
use crate::error::Error;
use crate::notification::Notifier;
use crate::utils::{iso_timestamp, OutcomeBody, SortQuery};

use super::{manager, AmountChoice, Sponsor, SponsorId, SponsorSortKey, SponsorSubmission};

const CUSTOM_SPONSORSHIP: &str = "custom";

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSponsorBody {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub line_registration: String,
    /// A unit count, or `"custom"` to use `custom_amount`.
    #[serde(default)]
    pub sponsorship: String,
    #[serde(default)]
    pub custom_amount: String,
}

impl CreateSponsorBody {
    fn into_submission(self) -> SponsorSubmission {
        let amount = if self.sponsorship == CUSTOM_SPONSORSHIP {
            AmountChoice::Custom(self.custom_amount)
        } else {
            AmountChoice::Tier(self.sponsorship)
        };

        SponsorSubmission {
            name: self.name,
            email: self.email,
            message: self.message,
            line_registration: self.line_registration == "true",
            amount,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SponsorBody {
    pub id: SponsorId,
    pub name: String,
    pub email: String,
    pub message: String,
    pub line_registration: bool,
    #[serde(with = "iso_timestamp")]
    pub created_at: DateTime<Utc>,
    pub amount: u64,
}

impl SponsorBody {
    pub fn render(sponsor: Sponsor) -> SponsorBody {
        SponsorBody {
            id: sponsor.id,
            name: sponsor.name,
            email: sponsor.email,
            message: sponsor.message,
            line_registration: sponsor.line_registration,
            created_at: sponsor.created_at,
            amount: sponsor.amount,
        }
    }
}

#[post("/sponsors")]
#[tracing::instrument(skip(db, config, notifier, body))]
pub async fn create_sponsor(
    db: Data<Box<dyn Database>>,
    config: Data<Config>,
    notifier: Data<dyn Notifier>,
    body: Form<CreateSponsorBody>,
) -> Result<Json<OutcomeBody>, Error> {
    let submission = body.into_inner().into_submission();

    let sponsor = manager::submit_sponsor(&***db, submission).await?;

    if config.send_thank_you_email {
        let content = content::manager::get_content(&***db).await;
        let shop_name = content.as_ref().map(|content| content.shop_name.as_str());
        let email = manager::thank_you_email(&sponsor, shop_name);
        manager::send_in_background(notifier.into_inner(), email);
    }

    Ok(OutcomeBody::succeeded())
}

#[get("/admin/sponsors")]
#[tracing::instrument(skip(db))]
pub async fn get_sponsors(
    db: Data<Box<dyn Database>>,
    query: Query<SortQuery<SponsorSortKey>>,
) -> Result<Json<Vec<SponsorBody>>, Error> {
    let query = query.into_inner();

    let sponsors = manager::get_sponsors(
        &***db,
        query.sort.unwrap_or_default(),
        query.order.unwrap_or_default(),
    )
    .await?;

    let body = sponsors.into_iter().map(SponsorBody::render).collect();

    Ok(Json(body))
}
