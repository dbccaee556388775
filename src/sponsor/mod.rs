use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::store::Record;
use crate::typedid::{TypedId, TypedIdMarker};
use crate::utils::iso_timestamp;

pub mod endpoints;
pub mod manager;
pub use endpoints::*;

/// Price of one sponsorship unit (口), in yen.
pub const TIER_UNIT_AMOUNT: u64 = 5000;

pub type SponsorId = TypedId<Sponsor>;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sponsor {
    pub id: SponsorId,
    pub name: String,
    pub email: String,
    pub message: String,
    pub line_registration: bool,
    #[serde(with = "iso_timestamp")]
    pub created_at: DateTime<Utc>,
    // records from before amounts were tracked count as a single unit
    #[serde(default = "single_unit")]
    pub amount: u64,
}

fn single_unit() -> u64 {
    TIER_UNIT_AMOUNT
}

impl TypedIdMarker for Sponsor {
    fn tag() -> &'static str {
        "SPN"
    }
}

impl Record for Sponsor {
    fn id(&self) -> &SponsorId {
        &self.id
    }
}

/// How a sponsor chose their amount, as entered on the form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AmountChoice {
    /// A number of units, each worth `TIER_UNIT_AMOUNT`.
    Tier(String),
    /// A free amount in yen.
    Custom(String),
}

impl AmountChoice {
    pub fn resolve(&self) -> Result<u64, Error> {
        match self {
            AmountChoice::Tier(units) => parse_amount(units)
                .filter(|units| *units > 0)
                .and_then(|units| units.checked_mul(TIER_UNIT_AMOUNT))
                .ok_or_else(|| Error::InvalidAmount {
                    value: units.clone(),
                }),
            AmountChoice::Custom(amount) => {
                parse_amount(amount).ok_or_else(|| Error::InvalidAmount {
                    value: amount.clone(),
                })
            }
        }
    }
}

fn parse_amount(value: &str) -> Option<u64> {
    let value = value.trim();
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    value.parse().ok()
}

#[derive(Clone, Debug)]
pub struct SponsorSubmission {
    pub name: String,
    pub email: String,
    pub message: String,
    pub line_registration: bool,
    pub amount: AmountChoice,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SponsorSortKey {
    #[default]
    CreatedAt,
    Name,
    Amount,
}
