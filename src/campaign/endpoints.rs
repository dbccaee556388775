use actix_web::web::{Data, Json, Path};
use actix_web::{delete, get, post};
use serde::{Deserialize, Serialize};

use crate::database::Database;
use crate::error::Error;
use crate::utils::OutcomeBody;

use super::{manager, Campaign, CampaignId};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignBody {
    pub id: CampaignId,
    pub name: String,
    pub description: String,
    pub start_date: String,
    pub end_date: String,
    pub target_amount: u64,
    pub current_amount: u64,
    pub is_active: bool,
}

impl CampaignBody {
    pub fn render(campaign: Campaign) -> CampaignBody {
        CampaignBody {
            id: campaign.id,
            name: campaign.name,
            description: campaign.description,
            start_date: campaign.start_date,
            end_date: campaign.end_date,
            target_amount: campaign.target_amount,
            current_amount: campaign.current_amount,
            is_active: campaign.is_active,
        }
    }

    fn into_campaign(self) -> Campaign {
        Campaign {
            id: self.id,
            name: self.name,
            description: self.description,
            start_date: self.start_date,
            end_date: self.end_date,
            target_amount: self.target_amount,
            current_amount: self.current_amount,
            is_active: self.is_active,
        }
    }
}

#[get("/campaigns")]
#[tracing::instrument(skip(db))]
pub async fn get_campaigns(db: Data<Box<dyn Database>>) -> Result<Json<Vec<CampaignBody>>, Error> {
    let campaigns = manager::get_campaigns(&***db).await?;

    let body = campaigns.into_iter().map(CampaignBody::render).collect();

    Ok(Json(body))
}

/// Creates the campaign, or replaces the one with the same id.
#[post("/admin/campaigns")]
#[tracing::instrument(skip(db))]
pub async fn save_campaign(
    db: Data<Box<dyn Database>>,
    body: Json<CampaignBody>,
) -> Result<Json<OutcomeBody>, Error> {
    let campaign = body.into_inner().into_campaign();

    manager::save_campaign(&***db, campaign).await?;

    Ok(OutcomeBody::succeeded())
}

#[delete("/admin/campaigns/{campaign_id}")]
#[tracing::instrument(skip(db))]
pub async fn delete_campaign(
    db: Data<Box<dyn Database>>,
    params: Path<CampaignId>,
) -> Result<Json<OutcomeBody>, Error> {
    let campaign_id = params.into_inner();

    manager::delete_campaign(&***db, campaign_id).await?;

    Ok(OutcomeBody::succeeded())
}
