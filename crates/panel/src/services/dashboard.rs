//! Role dashboards.
//!
//! Each role lands on its own dashboard: a row of headline numbers and a
//! short list of the records that need attention first. Everything is
//! derived from the user's [`TrackerState`] through the selector layer.

use chrono::{DateTime, TimeZone};
use serde::Serialize;

use cephas_core::access::DashboardKind;
use cephas_core::selectors::{installers, materials, orders, percentage, tasks, users};
use cephas_core::{
    CollectionKind, Filter, InstallerId, Order, OrderStatus, StockState, TaskStatus,
    TrackerState, UserId,
};

/// One headline number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatCard {
    pub label: String,
    pub value: String,
    /// Page the card links to, if any.
    pub href: Option<&'static str>,
}

impl StatCard {
    fn new(label: &str, value: impl ToString) -> Self {
        Self {
            label: label.to_owned(),
            value: value.to_string(),
            href: None,
        }
    }

    const fn link(mut self, href: &'static str) -> Self {
        self.href = Some(href);
        self
    }
}

/// A short list of records shown under the cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Highlight {
    pub title: String,
    pub items: Vec<String>,
}

/// Rendered content of one dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardView {
    pub kind: DashboardKind,
    pub heading: &'static str,
    pub cards: Vec<StatCard>,
    pub highlights: Vec<Highlight>,
    /// Collections whose last fetch failed.
    pub failed: Vec<CollectionKind>,
}

/// Most records listed per highlight.
const HIGHLIGHT_LIMIT: usize = 5;

fn order_line(order: &Order) -> String {
    let tracker = order.tracker_id.as_deref().unwrap_or("(no tracker ID)");
    match order.customer_name.as_deref() {
        Some(customer) if !customer.trim().is_empty() => format!("{tracker} · {customer}"),
        _ => tracker.to_owned(),
    }
}

fn highlight<'a, T: 'a>(
    title: &str,
    items: impl IntoIterator<Item = &'a T>,
    line: impl Fn(&T) -> String,
) -> Highlight {
    Highlight {
        title: title.to_owned(),
        items: items.into_iter().take(HIGHLIGHT_LIMIT).map(line).collect(),
    }
}

/// Build the dashboard for `kind`.
///
/// `viewer` is the signed-in user's ID; installer dashboards only count
/// orders assigned to it.
#[must_use]
pub fn build_dashboard<Tz: TimeZone>(
    kind: DashboardKind,
    state: &TrackerState,
    viewer: &UserId,
    now: &DateTime<Tz>,
) -> DashboardView {
    let all_orders = state.orders.items();
    let (heading, cards, highlights) = match kind {
        DashboardKind::Admin => {
            let status = orders::order_status_counts(all_orders);
            let unassigned = orders::unassigned_orders(all_orders);
            let roles = users::user_role_counts(state.users.items());
            (
                "Overview",
                vec![
                    StatCard::new("Activations", status.total()).link("/activations"),
                    StatCard::new("Today", orders::todays_orders(all_orders, now).len())
                        .link("/activations/today"),
                    StatCard::new("Overdue", orders::overdue_orders(all_orders, now).len())
                        .link("/activations/overdue"),
                    StatCard::new("Unassigned", unassigned.len()).link("/activations/unassigned"),
                    StatCard::new(
                        "Low stock",
                        materials::low_stock_materials(state.materials.items()).len(),
                    )
                    .link("/materials/low-stock"),
                    StatCard::new("Users", roles.total()).link("/users"),
                ],
                vec![highlight("Unassigned activations", unassigned, order_line)],
            )
        }
        DashboardKind::Supervisor => {
            let unassigned = orders::unassigned_orders(all_orders);
            let available =
                installers::available_installers(state.service_installers.items(), all_orders);
            let task_status = tasks::task_status_counts(state.tasks.items());
            let overdue = orders::overdue_orders(all_orders, now);
            (
                "Operations",
                vec![
                    StatCard::new("Today", orders::todays_orders(all_orders, now).len())
                        .link("/activations/today"),
                    StatCard::new("Unassigned", unassigned.len()).link("/activations/unassigned"),
                    StatCard::new("Overdue", overdue.len()).link("/activations/overdue"),
                    StatCard::new("Available installers", available.len())
                        .link("/service-installers"),
                    StatCard::new(
                        "Open tasks",
                        task_status.get(TaskStatus::Todo) + task_status.get(TaskStatus::InProgress),
                    )
                    .link("/tasks"),
                ],
                vec![
                    highlight("Overdue activations", overdue, order_line),
                    highlight("Unassigned activations", unassigned, order_line),
                ],
            )
        }
        DashboardKind::Installer => {
            let own = orders::orders_by_installer(
                all_orders,
                &Filter::One(InstallerId::new(viewer.as_str())),
            );
            let today = orders::todays_orders(own.iter().copied(), now);
            let overdue = orders::overdue_orders(own.iter().copied(), now);
            let status = orders::order_status_counts(own.iter().copied());
            (
                "My jobs",
                vec![
                    StatCard::new("Today", today.len()).link("/activations/today"),
                    StatCard::new("Overdue", overdue.len()).link("/activations/overdue"),
                    StatCard::new("In progress", status.get(OrderStatus::InProgress)),
                    StatCard::new("Completed", status.get(OrderStatus::Completed)),
                ],
                vec![
                    highlight("Today's jobs", today, order_line),
                    highlight("Overdue jobs", overdue, order_line),
                ],
            )
        }
        DashboardKind::Accountant => {
            let status = orders::order_status_counts(all_orders);
            let completed =
                orders::orders_by_status(all_orders, &Filter::One(OrderStatus::Completed));
            let completed_this_week = orders::this_weeks_orders(completed.iter().copied(), now);
            (
                "Billing",
                vec![
                    StatCard::new("Completed", status.get(OrderStatus::Completed))
                        .link("/invoices"),
                    StatCard::new("Completed this week", completed_this_week.len()),
                    StatCard::new(
                        "Completion rate",
                        format!(
                            "{:.1}%",
                            percentage(status.get(OrderStatus::Completed), status.total())
                        ),
                    )
                    .link("/reports"),
                    StatCard::new("Cancelled", status.get(OrderStatus::Cancelled)),
                ],
                vec![highlight("Ready to invoice", completed, order_line)],
            )
        }
        DashboardKind::Warehouse => {
            let stock = materials::material_stock_counts(state.materials.items());
            let low = materials::low_stock_materials(state.materials.items());
            let awaiting = orders::orders_awaiting_materials(all_orders);
            (
                "Stock",
                vec![
                    StatCard::new("Materials", stock.total()).link("/materials"),
                    StatCard::new("Low stock", low.len()).link("/materials/low-stock"),
                    StatCard::new(
                        "Out of stock",
                        stock.get(StockState::OutOfStock),
                    ),
                    StatCard::new("Awaiting materials", awaiting.len()),
                    StatCard::new(
                        "Inventory value",
                        format!("{:.2}", materials::inventory_value(state.materials.items())),
                    ),
                ],
                vec![
                    highlight("Low stock", low, |m| {
                        format!(
                            "{} ({} left)",
                            m.sap_code.as_deref().unwrap_or("(no SAP code)"),
                            m.stock_keeping_unit.normalize()
                        )
                    }),
                    highlight("Activations awaiting materials", awaiting, order_line),
                ],
            )
        }
    };

    DashboardView {
        kind,
        heading,
        cards,
        highlights,
        failed: state.failed_collections(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use cephas_core::{Collection, Material, MaterialId, OrderId};
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    use super::*;

    fn order(id: &str, installer: Option<&str>, status: OrderStatus, day: u32) -> Order {
        let appointment = Utc.with_ymd_and_hms(2025, 4, day, 10, 0, 0).unwrap();
        Order {
            id: OrderId::new(id),
            tracker_id: Some(format!("TR{id}")),
            status: Some(status),
            service_installer_id: installer.map(InstallerId::new),
            appointment_date: Some(appointment.into()),
            ..Order::default()
        }
    }

    fn state() -> TrackerState {
        TrackerState {
            orders: Collection::from_items(vec![
                order("1", Some("i1"), OrderStatus::Assigned, 2),
                order("2", Some("i1"), OrderStatus::Assigned, 1),
                order("3", None, OrderStatus::Pending, 2),
                order("4", Some("i2"), OrderStatus::Completed, 1),
            ]),
            materials: Collection::from_items(vec![Material {
                id: MaterialId::new("m1"),
                sap_code: Some("SAP1-A".to_owned()),
                stock_keeping_unit: Decimal::ONE,
                minimum_stock: Decimal::TEN,
                ..Material::default()
            }]),
            ..TrackerState::default()
        }
    }

    fn card<'a>(view: &'a DashboardView, label: &str) -> &'a str {
        &view.cards.iter().find(|c| c.label == label).unwrap().value
    }

    #[test]
    fn test_installer_dashboard_counts_own_orders() {
        let now = Utc.with_ymd_and_hms(2025, 4, 2, 12, 0, 0).unwrap();
        let view = build_dashboard(DashboardKind::Installer, &state(), &UserId::new("i1"), &now);

        assert_eq!(card(&view, "Today"), "1");
        assert_eq!(card(&view, "Overdue"), "2");
        assert_eq!(view.highlights[0].items, vec!["TR1".to_owned()]);
    }

    #[test]
    fn test_supervisor_dashboard() {
        let now = Utc.with_ymd_and_hms(2025, 4, 2, 12, 0, 0).unwrap();
        let view = build_dashboard(DashboardKind::Supervisor, &state(), &UserId::new("s"), &now);

        assert_eq!(card(&view, "Today"), "2");
        assert_eq!(card(&view, "Unassigned"), "1");
    }

    #[test]
    fn test_warehouse_dashboard_lists_low_stock() {
        let now = Utc.with_ymd_and_hms(2025, 4, 2, 12, 0, 0).unwrap();
        let view = build_dashboard(DashboardKind::Warehouse, &state(), &UserId::new("w"), &now);

        assert_eq!(card(&view, "Low stock"), "1");
        assert_eq!(view.highlights[0].items, vec!["SAP1-A (1 left)".to_owned()]);
    }

    #[test]
    fn test_failed_collections_are_reported() {
        let mut state = state();
        state.buildings.fail("down");
        let now = Utc::now();
        let view = build_dashboard(DashboardKind::Admin, &state, &UserId::new("a"), &now);
        assert_eq!(view.failed, vec![CollectionKind::Buildings]);
    }
}
