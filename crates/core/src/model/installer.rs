//! Service installers (field technicians).

use serde::{Deserialize, Serialize};

use crate::de;
use crate::types::InstallerId;

/// Assignment ceiling used when an installer record carries none.
pub const DEFAULT_MAX_ASSIGNMENTS: u32 = 5;

/// A field technician orders can be assigned to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInstaller {
    #[serde(default, alias = "_id")]
    pub id: InstallerId,
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "de::lenient_bool")]
    pub is_active: bool,
    #[serde(default, deserialize_with = "de::lenient_u32")]
    pub max_assignments: Option<u32>,
}

impl ServiceInstaller {
    /// Assignment ceiling for this installer.
    #[must_use]
    pub fn max_assignments(&self) -> u32 {
        self.max_assignments.unwrap_or(DEFAULT_MAX_ASSIGNMENTS)
    }

    /// Whether the installer can take another order given their current
    /// number of active assignments.
    #[must_use]
    pub fn is_available(&self, active_assignments: u32) -> bool {
        self.is_active && active_assignments < self.max_assignments()
    }

    /// Display name, falling back to the ID.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or_else(|| self.id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_availability() {
        let installer = ServiceInstaller {
            is_active: true,
            ..ServiceInstaller::default()
        };
        assert!(installer.is_available(4));
        assert!(!installer.is_available(5));

        let inactive = ServiceInstaller::default();
        assert!(!inactive.is_available(0));

        let custom = ServiceInstaller {
            is_active: true,
            max_assignments: Some(1),
            ..ServiceInstaller::default()
        };
        assert!(!custom.is_available(1));
    }
}
