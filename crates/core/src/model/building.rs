//! Buildings served by the field teams.

use serde::{Deserialize, Serialize};

use crate::de;
use crate::types::{BuildingId, BuildingType};

/// A building. Splitters and orders reference buildings by ID.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Building {
    #[serde(default, alias = "_id")]
    pub id: BuildingId,
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub name: Option<String>,
    #[serde(
        default,
        alias = "type",
        deserialize_with = "de::lenient"
    )]
    pub building_type: Option<BuildingType>,
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub address: Option<String>,
}

impl Building {
    /// Display name, falling back to the ID.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or_else(|| self.id.as_str())
    }
}
