use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::Record;
use crate::typedid::{TypedId, TypedIdMarker};
use crate::utils::iso_timestamp;

pub mod endpoints;
pub mod manager;
pub use endpoints::*;

pub type InquiryId = TypedId<Inquiry>;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Inquiry {
    pub id: InquiryId,
    pub name: String,
    pub email: String,
    pub message: String,
    #[serde(with = "iso_timestamp")]
    pub created_at: DateTime<Utc>,
    pub status: InquiryStatus,
}

impl TypedIdMarker for Inquiry {
    fn tag() -> &'static str {
        "INQ"
    }
}

impl Record for Inquiry {
    fn id(&self) -> &InquiryId {
        &self.id
    }
}

/// Handling state of an inquiry. Any state may be set from any other.
///
/// The serialized names, emoji included, are what existing documents hold;
/// the plain aliases are accepted on input.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum InquiryStatus {
    #[serde(rename = "\u{1F4E8}未対応", alias = "unhandled")]
    Unhandled,
    #[serde(rename = "\u{1F50D}対応中", alias = "in_progress")]
    InProgress,
    #[serde(rename = "\u{1F4E4}\u{FE0F}返信済", alias = "replied")]
    Replied,
    #[serde(rename = "\u{2705}対応完了", alias = "completed")]
    Completed,
    #[serde(rename = "\u{23F8}\u{FE0F}保留", alias = "on_hold")]
    OnHold,
    #[serde(rename = "\u{1F512}クローズ", alias = "closed")]
    Closed,
}

impl InquiryStatus {
    pub const ALL: [InquiryStatus; 6] = [
        InquiryStatus::Unhandled,
        InquiryStatus::InProgress,
        InquiryStatus::Replied,
        InquiryStatus::Completed,
        InquiryStatus::OnHold,
        InquiryStatus::Closed,
    ];

    /// The stored literal. Listings sorted by status compare these strings.
    pub fn as_str(self) -> &'static str {
        match self {
            InquiryStatus::Unhandled => "\u{1F4E8}未対応",
            InquiryStatus::InProgress => "\u{1F50D}対応中",
            InquiryStatus::Replied => "\u{1F4E4}\u{FE0F}返信済",
            InquiryStatus::Completed => "\u{2705}対応完了",
            InquiryStatus::OnHold => "\u{23F8}\u{FE0F}保留",
            InquiryStatus::Closed => "\u{1F512}クローズ",
        }
    }
}

impl Default for InquiryStatus {
    fn default() -> InquiryStatus {
        InquiryStatus::Unhandled
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InquirySortKey {
    #[default]
    CreatedAt,
    Name,
    Email,
    Status,
}
