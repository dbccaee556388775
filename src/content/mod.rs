use serde::{Deserialize, Serialize};

pub mod endpoints;
pub mod manager;
pub use endpoints::*;

/// Site-wide editable content. There is exactly one, always replaced whole.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    pub shop_name: String,
    pub message: String,
    pub deadline: String,
    #[serde(default)]
    pub images: Vec<ImageData>,
    #[serde(default)]
    pub line_qr_code: String,
    #[serde(default)]
    pub line_friend_url: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ImageData {
    pub id: String,
    pub url: String,
}
