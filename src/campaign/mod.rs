use serde::{Deserialize, Serialize};

use crate::store::Record;
use crate::typedid::{TypedId, TypedIdMarker};

pub mod endpoints;
pub mod manager;
pub use endpoints::*;

pub type CampaignId = TypedId<Campaign>;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: CampaignId,
    pub name: String,
    pub description: String,
    // dates are kept as the admin entered them, no ordering is enforced
    pub start_date: String,
    pub end_date: String,
    pub target_amount: u64,
    pub current_amount: u64,
    pub is_active: bool,
}

impl TypedIdMarker for Campaign {
    fn tag() -> &'static str {
        "CPN"
    }
}

impl Record for Campaign {
    fn id(&self) -> &CampaignId {
        &self.id
    }
}
