//! In-app notifications.

use serde::{Deserialize, Serialize};

use crate::de;
use crate::types::{NotificationId, Timestamp};

/// A notification shown to the signed-in user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    #[serde(default, alias = "_id")]
    pub id: NotificationId,
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "de::lenient_bool")]
    pub read: bool,
    #[serde(default, deserialize_with = "de::lenient_datetime")]
    pub created_at: Option<Timestamp>,
}
