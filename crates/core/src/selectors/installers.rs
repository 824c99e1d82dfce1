//! Service installer selectors: workload, availability and performance.

use std::collections::BTreeMap;

use chrono::Utc;
use serde::Serialize;

use super::{find_by_id, percentage, search};
use crate::model::{Order, ServiceInstaller};
use crate::types::{InstallerId, OrderStatus};

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

pub fn installer_by_id<'a>(
    installers: &'a [ServiceInstaller],
    id: &str,
) -> Option<&'a ServiceInstaller> {
    find_by_id(installers, id)
}

pub fn active_installers<'a>(
    installers: impl IntoIterator<Item = &'a ServiceInstaller>,
) -> Vec<&'a ServiceInstaller> {
    installers.into_iter().filter(|i| i.is_active).collect()
}

fn installer_search_fields(installer: &ServiceInstaller) -> [Option<&str>; 3] {
    [
        installer.name.as_deref(),
        installer.email.as_deref(),
        installer.phone.as_deref(),
    ]
}

/// Search name, email and phone.
pub fn search_installers<'a>(
    installers: impl IntoIterator<Item = &'a ServiceInstaller>,
    query: &str,
) -> Vec<&'a ServiceInstaller> {
    search(installers, query, installer_search_fields)
}

/// Orders assigned to one installer, bucketed by status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallerWorkload {
    pub total: usize,
    pub pending: usize,
    pub assigned: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub cancelled: usize,
}

impl InstallerWorkload {
    /// Assignments that count against the installer's ceiling.
    #[must_use]
    pub const fn active(&self) -> usize {
        self.assigned + self.in_progress
    }

    fn record(&mut self, status: Option<OrderStatus>) {
        self.total += 1;
        match status {
            Some(OrderStatus::Pending) => self.pending += 1,
            Some(OrderStatus::Assigned) => self.assigned += 1,
            Some(OrderStatus::InProgress) => self.in_progress += 1,
            Some(OrderStatus::Completed) => self.completed += 1,
            Some(OrderStatus::Cancelled) => self.cancelled += 1,
            None => {}
        }
    }
}

/// Workload per installer. Unassigned orders are skipped.
pub fn installer_workload<'a>(
    orders: impl IntoIterator<Item = &'a Order>,
) -> BTreeMap<InstallerId, InstallerWorkload> {
    let mut workload: BTreeMap<InstallerId, InstallerWorkload> = BTreeMap::new();
    for order in orders {
        if let Some(installer) = order.service_installer_id.as_ref() {
            workload
                .entry(installer.clone())
                .or_default()
                .record(order.status);
        }
    }
    workload
}

/// An installer with its current workload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallerWithStats<'a> {
    pub installer: &'a ServiceInstaller,
    pub workload: InstallerWorkload,
    pub active_assignments: usize,
    pub max_assignments: u32,
    pub available: bool,
}

/// Join every installer with the workload derived from `orders`.
pub fn service_installers_with_stats<'a, 'o>(
    installers: impl IntoIterator<Item = &'a ServiceInstaller>,
    orders: impl IntoIterator<Item = &'o Order>,
) -> Vec<InstallerWithStats<'a>> {
    let workload = installer_workload(orders);
    installers
        .into_iter()
        .map(|installer| {
            let stats = workload.get(&installer.id).copied().unwrap_or_default();
            let active = stats.active();
            InstallerWithStats {
                installer,
                workload: stats,
                active_assignments: active,
                max_assignments: installer.max_assignments(),
                available: installer.is_available(u32::try_from(active).unwrap_or(u32::MAX)),
            }
        })
        .collect()
}

/// Active installers below their assignment ceiling.
pub fn available_installers<'a, 'o>(
    installers: impl IntoIterator<Item = &'a ServiceInstaller>,
    orders: impl IntoIterator<Item = &'o Order>,
) -> Vec<&'a ServiceInstaller> {
    service_installers_with_stats(installers, orders)
        .into_iter()
        .filter(|stats| stats.available)
        .map(|stats| stats.installer)
        .collect()
}

/// Delivery metrics for one installer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallerPerformance {
    pub total_orders: usize,
    pub completed_orders: usize,
    /// Completed orders as a percentage of all assigned orders.
    pub completion_rate: f64,
    /// Completed orders finished on or before their appointment day, as a
    /// percentage of completed orders.
    pub on_time_rate: f64,
    /// Mean hours from assignment to completion over orders carrying both
    /// timestamps.
    pub average_completion_hours: f64,
}

#[derive(Default)]
struct PerformanceTally {
    total: usize,
    completed: usize,
    on_time: usize,
    timed: usize,
    completion_millis: i64,
}

impl PerformanceTally {
    fn record(&mut self, order: &Order) {
        self.total += 1;
        if order.status == Some(OrderStatus::Completed) {
            self.completed += 1;
            // Wall-clock readings on both sides share one clock, so any zone works.
            let on_time = match (order.completed_at, order.appointment_date) {
                (Some(done), Some(due)) => done.date_in(&Utc) <= due.date_in(&Utc),
                _ => false,
            };
            if on_time {
                self.on_time += 1;
            }
        }
        if let (Some(assigned), Some(done)) = (order.assigned_at, order.completed_at) {
            let elapsed = done.to_utc_in(&Utc) - assigned.to_utc_in(&Utc);
            let millis = elapsed.num_milliseconds();
            if millis >= 0 {
                self.timed += 1;
                self.completion_millis = self.completion_millis.saturating_add(millis);
            }
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn finish(self) -> InstallerPerformance {
        let average_completion_hours = if self.timed == 0 {
            0.0
        } else {
            self.completion_millis as f64 / self.timed as f64 / MILLIS_PER_HOUR
        };
        InstallerPerformance {
            total_orders: self.total,
            completed_orders: self.completed,
            completion_rate: percentage(self.completed, self.total),
            on_time_rate: percentage(self.on_time, self.completed),
            average_completion_hours,
        }
    }
}

/// Performance per installer. Unassigned orders are skipped.
///
/// Orders whose completion precedes their assignment are left out of the
/// average rather than pulling it negative.
pub fn service_installer_performance<'a>(
    orders: impl IntoIterator<Item = &'a Order>,
) -> BTreeMap<InstallerId, InstallerPerformance> {
    let mut tallies: BTreeMap<InstallerId, PerformanceTally> = BTreeMap::new();
    for order in orders {
        if let Some(installer) = order.service_installer_id.as_ref() {
            tallies.entry(installer.clone()).or_default().record(order);
        }
    }
    tallies
        .into_iter()
        .map(|(id, tally)| (id, tally.finish()))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::Timestamp;

    fn installer(id: &str, active: bool) -> ServiceInstaller {
        ServiceInstaller {
            id: id.into(),
            name: Some(format!("Installer {id}")),
            is_active: active,
            ..ServiceInstaller::default()
        }
    }

    fn order(installer: Option<&str>, status: OrderStatus) -> Order {
        Order {
            service_installer_id: installer.map(InstallerId::from),
            status: Some(status),
            ..Order::default()
        }
    }

    fn completed(installer: &str, assigned: &str, done: &str, appointment: &str) -> Order {
        Order {
            assigned_at: Timestamp::parse(assigned),
            completed_at: Timestamp::parse(done),
            appointment_date: Timestamp::parse(appointment),
            ..order(Some(installer), OrderStatus::Completed)
        }
    }

    #[test]
    fn test_workload_skips_unassigned_orders() {
        let orders = vec![
            order(Some("si1"), OrderStatus::Assigned),
            order(Some("si1"), OrderStatus::InProgress),
            order(Some("si1"), OrderStatus::Completed),
            order(None, OrderStatus::Pending),
        ];
        let workload = installer_workload(&orders);
        assert_eq!(workload.len(), 1);
        let si1 = workload[&InstallerId::new("si1")];
        assert_eq!(si1.total, 3);
        assert_eq!(si1.active(), 2);
    }

    #[test]
    fn test_availability_respects_ceiling_and_activity() {
        let installers = vec![
            installer("busy", true),
            installer("free", true),
            installer("inactive", false),
        ];
        let orders: Vec<Order> = (0..5)
            .map(|_| order(Some("busy"), OrderStatus::Assigned))
            .collect();
        let available = available_installers(&installers, &orders);
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].id.as_str(), "free");

        let stats = service_installers_with_stats(&installers, &orders);
        assert_eq!(stats[0].active_assignments, 5);
        assert_eq!(stats[0].max_assignments, 5);
        assert!(!stats[0].available);
    }

    #[test]
    fn test_performance_rates() {
        let orders = vec![
            completed(
                "si1",
                "2025-04-01T08:00:00Z",
                "2025-04-01T12:00:00Z",
                "2025-04-01T09:00:00Z",
            ),
            completed(
                "si1",
                "2025-04-01T08:00:00Z",
                "2025-04-03T08:00:00Z",
                "2025-04-02T09:00:00Z",
            ),
            order(Some("si1"), OrderStatus::InProgress),
            order(Some("si1"), OrderStatus::Assigned),
        ];
        let performance = service_installer_performance(&orders);
        let si1 = &performance[&InstallerId::new("si1")];
        assert_eq!(si1.total_orders, 4);
        assert_eq!(si1.completed_orders, 2);
        assert!((si1.completion_rate - 50.0).abs() < f64::EPSILON);
        assert!((si1.on_time_rate - 50.0).abs() < f64::EPSILON);
        assert!((si1.average_completion_hours - 26.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_performance_with_wall_clock_times() {
        let orders = vec![completed(
            "si2",
            "2025-04-02T08:00:00",
            "2025-04-02T23:30:00",
            "2025-04-02T09:00:00",
        )];
        let performance = service_installer_performance(&orders);
        let si2 = &performance[&InstallerId::new("si2")];
        assert!((si2.on_time_rate - 100.0).abs() < f64::EPSILON);
        assert!((si2.average_completion_hours - 15.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_performance_without_completions_is_zero() {
        let orders = vec![order(Some("si1"), OrderStatus::Assigned)];
        let performance = service_installer_performance(&orders);
        let si1 = &performance[&InstallerId::new("si1")];
        assert!(si1.on_time_rate.abs() < f64::EPSILON);
        assert!(si1.average_completion_hours.abs() < f64::EPSILON);
        assert!(si1.completion_rate.is_finite());
        assert!(service_installer_performance(&Vec::<Order>::new()).is_empty());
    }

    #[test]
    fn test_search_and_lookup() {
        let installers = vec![installer("si1", true), installer("si2", false)];
        assert_eq!(search_installers(&installers, "installer si2").len(), 1);
        assert_eq!(active_installers(&installers).len(), 1);
        assert!(installer_by_id(&installers, "si2").is_some());
    }
}
