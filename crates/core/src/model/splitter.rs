//! Fiber splitters installed in buildings.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::de;
use crate::types::{BuildingId, SplitterId};

/// Usage record for one splitter port.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortUsage {
    #[serde(default, deserialize_with = "de::lenient_bool")]
    pub is_used: bool,
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub service_id: Option<String>,
}

/// A splitter with a fixed number of ports.
///
/// `ports` is sparse: a port without an entry is free. Entries keyed outside
/// `1..=port_count` are ignored, which keeps
/// `used_ports() + available_ports() == port_count`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Splitter {
    #[serde(default, alias = "_id")]
    pub id: SplitterId,
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub splitter_number: Option<String>,
    #[serde(default, alias = "building", deserialize_with = "de::lenient_ref")]
    pub building_id: Option<BuildingId>,
    #[serde(default, deserialize_with = "de::lenient_u32")]
    pub port_count: Option<u32>,
    #[serde(default)]
    pub ports: BTreeMap<u32, PortUsage>,
}

impl Splitter {
    /// Total number of ports (zero when unknown).
    #[must_use]
    pub fn port_count(&self) -> u32 {
        self.port_count.unwrap_or(0)
    }

    /// Number of in-range ports marked as used.
    #[must_use]
    pub fn used_ports(&self) -> u32 {
        if self.port_count() == 0 {
            return 0;
        }
        let used = self
            .ports
            .range(1..=self.port_count())
            .filter(|(_, usage)| usage.is_used)
            .count();
        u32::try_from(used).unwrap_or(u32::MAX)
    }

    /// Number of ports still free.
    #[must_use]
    pub fn available_ports(&self) -> u32 {
        self.port_count().saturating_sub(self.used_ports())
    }

    /// Whether a given port is in use. Out-of-range ports are never used.
    #[must_use]
    pub fn is_port_used(&self, port: u32) -> bool {
        (1..=self.port_count()).contains(&port)
            && self.ports.get(&port).is_some_and(|usage| usage.is_used)
    }
}
