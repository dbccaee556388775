use crate::database::Database;
use crate::error::Error;
use crate::store;

use super::{Campaign, CampaignId};

#[tracing::instrument(skip(db))]
pub async fn get_campaigns(db: &dyn Database) -> Result<Vec<Campaign>, Error> {
    let campaigns = db.campaigns().load_all().await?;

    Ok(campaigns)
}

#[tracing::instrument(skip(db))]
pub async fn save_campaign(db: &dyn Database, campaign: Campaign) -> Result<(), Error> {
    store::upsert(db.campaigns(), campaign).await?;

    Ok(())
}

#[tracing::instrument(skip(db))]
pub async fn delete_campaign(db: &dyn Database, campaign_id: CampaignId) -> Result<(), Error> {
    store::remove_by_ids(db.campaigns(), &[campaign_id]).await?;

    Ok(())
}
