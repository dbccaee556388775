use std::cmp::Ordering;

use actix_web::web::Json;
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// The current time at millisecond precision, which is what the stored
/// timestamp format keeps.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

pub fn require_filled(field: &'static str, value: &str) -> Result<(), Error> {
    if value.trim().is_empty() {
        return Err(Error::RequiredFieldMissing { field });
    }

    Ok(())
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

/// The body of a successful mutation. Failures carry `"success": false`,
/// see `Error::error_response`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct OutcomeBody {
    pub success: bool,
}

impl OutcomeBody {
    pub fn succeeded() -> Json<OutcomeBody> {
        Json(OutcomeBody { success: true })
    }
}

/// Query parameters for the sortable admin listings.
#[derive(Clone, Debug, Deserialize)]
pub struct SortQuery<K> {
    pub sort: Option<K>,
    pub order: Option<SortOrder>,
}

/// Timestamps as `2024-05-01T09:30:00.000Z`: RFC 3339, UTC, always with
/// milliseconds. Existing documents use exactly this shape, so records that
/// are read and written back keep their bytes.
pub mod iso_timestamp {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(D::Error::custom)
    }
}
