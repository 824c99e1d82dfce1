//! Field orders (activations).

use serde::{Deserialize, Serialize};

use crate::de;
use crate::types::{
    BuildingId, InstallerId, OrderId, OrderStatus, OrderType, Timestamp, TrackerNumber,
};

/// A scheduled unit of field work.
///
/// An order without a `service_installer_id` is unassigned and never counts
/// toward an installer's workload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(default, alias = "_id")]
    pub id: OrderId,
    /// Upstream-assigned `TR<YY><MM><NNNN>` number, displayed as-is.
    #[serde(default, alias = "trackerNumber", deserialize_with = "de::lenient_string")]
    pub tracker_id: Option<String>,
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub customer_name: Option<String>,
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub service_id: Option<String>,
    #[serde(default, deserialize_with = "de::lenient")]
    pub status: Option<OrderStatus>,
    #[serde(default, deserialize_with = "de::lenient")]
    pub order_type: Option<OrderType>,
    #[serde(default, deserialize_with = "de::lenient_datetime")]
    pub appointment_date: Option<Timestamp>,
    #[serde(default, alias = "building", deserialize_with = "de::lenient_ref")]
    pub building_id: Option<BuildingId>,
    #[serde(
        default,
        alias = "serviceInstaller",
        deserialize_with = "de::lenient_ref"
    )]
    pub service_installer_id: Option<InstallerId>,
    #[serde(default, deserialize_with = "de::lenient_bool")]
    pub materials_assigned: bool,
    #[serde(default, deserialize_with = "de::lenient_datetime")]
    pub assigned_at: Option<Timestamp>,
    #[serde(default, deserialize_with = "de::lenient_datetime")]
    pub completed_at: Option<Timestamp>,
    #[serde(default, deserialize_with = "de::lenient_datetime")]
    pub created_at: Option<Timestamp>,
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub remarks: Option<String>,
}

impl Order {
    /// Whether the order has an installer.
    #[must_use]
    pub const fn is_assigned(&self) -> bool {
        self.service_installer_id.is_some()
    }

    /// Whether the order is completed or cancelled.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.status.is_some_and(OrderStatus::is_terminal)
    }

    /// The tracker number, if present and well formed.
    #[must_use]
    pub fn tracker_number(&self) -> Option<TrackerNumber> {
        self.tracker_id
            .as_deref()
            .and_then(|s| TrackerNumber::parse(s).ok())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_from_upstream_json() {
        let order: Order = serde_json::from_str(
            r#"{
                "_id": "o1",
                "trackerId": "TR25040012",
                "status": "in_progress",
                "orderType": "activation",
                "appointmentDate": "2025-04-02T09:00:00Z",
                "building": {"_id": "b1", "name": "Menara"},
                "serviceInstallerId": "si1",
                "materialsAssigned": true
            }"#,
        )
        .unwrap();
        assert_eq!(order.status, Some(OrderStatus::InProgress));
        assert_eq!(order.building_id.as_ref().unwrap().as_str(), "b1");
        assert!(order.is_assigned());
        assert!(order.materials_assigned);
        assert_eq!(order.tracker_number().unwrap().sequence(), 12);
        assert!(matches!(
            order.appointment_date,
            Some(crate::Timestamp::Instant(_))
        ));
    }

    #[test]
    fn test_sparse_order() {
        let order: Order = serde_json::from_str(r#"{"_id":"o2","status":"lost"}"#).unwrap();
        assert!(order.status.is_none());
        assert!(!order.is_assigned());
        assert!(!order.is_closed());
        assert!(order.tracker_number().is_none());
    }
}
