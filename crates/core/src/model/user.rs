//! Panel users.

use serde::{Deserialize, Serialize};

use crate::de;
use crate::types::{Role, UserId};

/// A user account.
///
/// Users are created by an administrator, edited on role or status changes,
/// and soft-deactivated rather than deleted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID.
    #[serde(default, alias = "_id")]
    pub id: UserId,
    /// Display name.
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub name: Option<String>,
    /// Login email address.
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub email: Option<String>,
    /// Role, or `None` when missing or not one of the known roles.
    #[serde(default, deserialize_with = "de::lenient")]
    pub role: Option<Role>,
    /// Whether the account may sign in.
    #[serde(default, deserialize_with = "de::lenient_bool")]
    pub is_active: bool,
    /// Extra permission names granted on top of the role.
    #[serde(default)]
    pub permissions: Vec<String>,
}
