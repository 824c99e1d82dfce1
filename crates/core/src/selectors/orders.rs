//! Order (activation) selectors.

use chrono::{DateTime, TimeZone};
use serde::Serialize;

use super::{Counts, count_by, dates, filter_by, find_by_id, search};
use crate::filter::Filter;
use crate::model::{Building, Order, ServiceInstaller};
use crate::types::{BuildingId, InstallerId, OrderStatus, OrderType};

/// Look up an order by ID.
pub fn order_by_id<'a>(orders: &'a [Order], id: &str) -> Option<&'a Order> {
    find_by_id(orders, id)
}

/// Look up an order by its `TR…` tracker number.
pub fn order_by_tracker_id<'a>(orders: &'a [Order], tracker_id: &str) -> Option<&'a Order> {
    let wanted = tracker_id.trim();
    orders
        .iter()
        .find(|o| o.tracker_id.as_deref().is_some_and(|t| t.eq_ignore_ascii_case(wanted)))
}

pub fn orders_by_status<'a>(
    orders: impl IntoIterator<Item = &'a Order>,
    status: &Filter<OrderStatus>,
) -> Vec<&'a Order> {
    filter_by(orders, status, |o| o.status.as_ref())
}

pub fn orders_by_type<'a>(
    orders: impl IntoIterator<Item = &'a Order>,
    order_type: &Filter<OrderType>,
) -> Vec<&'a Order> {
    filter_by(orders, order_type, |o| o.order_type.as_ref())
}

pub fn orders_by_building<'a>(
    orders: impl IntoIterator<Item = &'a Order>,
    building: &Filter<BuildingId>,
) -> Vec<&'a Order> {
    filter_by(orders, building, |o| o.building_id.as_ref())
}

pub fn orders_by_installer<'a>(
    orders: impl IntoIterator<Item = &'a Order>,
    installer: &Filter<InstallerId>,
) -> Vec<&'a Order> {
    filter_by(orders, installer, |o| o.service_installer_id.as_ref())
}

/// Open orders with no installer.
pub fn unassigned_orders<'a>(orders: impl IntoIterator<Item = &'a Order>) -> Vec<&'a Order> {
    orders
        .into_iter()
        .filter(|o| !o.is_assigned() && !o.is_closed())
        .collect()
}

/// Open orders whose materials have not been issued yet.
pub fn orders_awaiting_materials<'a>(
    orders: impl IntoIterator<Item = &'a Order>,
) -> Vec<&'a Order> {
    orders
        .into_iter()
        .filter(|o| !o.materials_assigned && !o.is_closed())
        .collect()
}

pub fn order_status_counts<'a>(orders: impl IntoIterator<Item = &'a Order>) -> Counts<OrderStatus> {
    count_by(orders, |o| o.status)
}

pub fn order_type_counts<'a>(orders: impl IntoIterator<Item = &'a Order>) -> Counts<OrderType> {
    count_by(orders, |o| o.order_type)
}

/// Orders whose appointment falls inside the inclusive range. Orders without
/// an appointment date are excluded unless both bounds are open.
pub fn orders_by_date_range<'a, Tz: TimeZone>(
    orders: impl IntoIterator<Item = &'a Order>,
    start: Option<&DateTime<Tz>>,
    end: Option<&DateTime<Tz>>,
) -> Vec<&'a Order> {
    if start.is_none() && end.is_none() {
        return orders.into_iter().collect();
    }
    orders
        .into_iter()
        .filter(|o| {
            o.appointment_date
                .as_ref()
                .is_some_and(|d| dates::in_range(d, start, end))
        })
        .collect()
}

/// Orders with an appointment on the calendar day of `now`.
pub fn todays_orders<'a, Tz: TimeZone>(
    orders: impl IntoIterator<Item = &'a Order>,
    now: &DateTime<Tz>,
) -> Vec<&'a Order> {
    orders
        .into_iter()
        .filter(|o| {
            o.appointment_date
                .as_ref()
                .is_some_and(|d| dates::is_same_day(d, now))
        })
        .collect()
}

/// Orders with an appointment in the Sunday-to-Saturday week of `now`.
pub fn this_weeks_orders<'a, Tz: TimeZone>(
    orders: impl IntoIterator<Item = &'a Order>,
    now: &DateTime<Tz>,
) -> Vec<&'a Order> {
    orders
        .into_iter()
        .filter(|o| {
            o.appointment_date
                .as_ref()
                .is_some_and(|d| dates::is_in_week(d, now))
        })
        .collect()
}

/// Open orders whose appointment is already in the past.
pub fn overdue_orders<'a, Tz: TimeZone>(
    orders: impl IntoIterator<Item = &'a Order>,
    now: &DateTime<Tz>,
) -> Vec<&'a Order> {
    orders
        .into_iter()
        .filter(|o| {
            !o.is_closed()
                && o.appointment_date
                    .as_ref()
                    .is_some_and(|d| dates::is_before(d, now))
        })
        .collect()
}

fn order_search_fields(order: &Order) -> [Option<&str>; 4] {
    [
        order.tracker_id.as_deref(),
        order.customer_name.as_deref(),
        order.service_id.as_deref(),
        order.remarks.as_deref(),
    ]
}

/// Search tracker number, customer, service ID and remarks.
pub fn search_orders<'a>(
    orders: impl IntoIterator<Item = &'a Order>,
    query: &str,
) -> Vec<&'a Order> {
    search(orders, query, order_search_fields)
}

/// An order joined with its building and installer.
#[derive(Debug, Clone, Serialize)]
pub struct OrderDetails<'a> {
    pub order: &'a Order,
    pub building: Option<&'a Building>,
    pub installer: Option<&'a ServiceInstaller>,
}

/// Join every order with the building and installer it references.
///
/// Dangling references resolve to `None`.
pub fn orders_with_details<'a>(
    orders: impl IntoIterator<Item = &'a Order>,
    buildings: &'a [Building],
    installers: &'a [ServiceInstaller],
) -> Vec<OrderDetails<'a>> {
    orders
        .into_iter()
        .map(|order| OrderDetails {
            order,
            building: order
                .building_id
                .as_ref()
                .and_then(|id| find_by_id(buildings, id)),
            installer: order
                .service_installer_id
                .as_ref()
                .and_then(|id| find_by_id(installers, id)),
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::Timestamp;
    use chrono::{FixedOffset, Utc};

    fn order(id: &str, status: Option<OrderStatus>) -> Order {
        Order {
            id: id.into(),
            status,
            ..Order::default()
        }
    }

    fn dated(id: &str, appointment: &str, status: OrderStatus) -> Order {
        Order {
            appointment_date: Timestamp::parse(appointment),
            ..order(id, Some(status))
        }
    }

    fn instant(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn ids(orders: &[&Order]) -> Vec<String> {
        orders.iter().map(|o| o.id.to_string()).collect()
    }

    #[test]
    fn test_empty_filters_are_noops() {
        let orders = vec![
            order("1", Some(OrderStatus::Pending)),
            order("2", None),
            order("3", Some(OrderStatus::Completed)),
        ];
        assert_eq!(orders_by_status(&orders, &Filter::Any).len(), 3);
        assert_eq!(orders_by_status(&orders, &Filter::AnyOf(vec![])).len(), 3);
        assert_eq!(orders_by_type(&orders, &Filter::Any).len(), 3);
        assert_eq!(orders_by_building(&orders, &Filter::AnyOf(vec![])).len(), 3);
        assert_eq!(orders_by_installer(&orders, &Filter::Any).len(), 3);
    }

    #[test]
    fn test_orders_by_status_one_and_any_of() {
        let orders = vec![
            order("1", Some(OrderStatus::Pending)),
            order("2", Some(OrderStatus::Assigned)),
            order("3", Some(OrderStatus::Completed)),
            order("4", None),
        ];
        let pending = orders_by_status(&orders, &Filter::One(OrderStatus::Pending));
        assert_eq!(ids(&pending), vec!["1"]);

        let open = orders_by_status(
            &orders,
            &Filter::AnyOf(vec![OrderStatus::Pending, OrderStatus::Assigned]),
        );
        assert_eq!(ids(&open), vec!["1", "2"]);
    }

    #[test]
    fn test_status_counts_total_includes_unknown() {
        let orders = vec![
            order("1", Some(OrderStatus::Pending)),
            order("2", None),
            order("3", Some(OrderStatus::InProgress)),
        ];
        let counts = order_status_counts(&orders);
        assert_eq!(counts.total(), 3);
        assert_eq!(counts.bucket_sum(), 2);
        assert_eq!(counts.get(OrderStatus::InProgress), 1);
        assert_eq!(counts.get(OrderStatus::Cancelled), 0);
    }

    #[test]
    fn test_type_counts_on_empty_input() {
        let counts = order_type_counts(&Vec::<Order>::new());
        assert_eq!(counts.total(), 0);
        assert_eq!(counts.get(OrderType::Activation), 0);
    }

    #[test]
    fn test_todays_orders_day_boundary() {
        let orders = vec![
            dated("today", "2025-04-02T23:59:59Z", OrderStatus::Assigned),
            dated("yesterday", "2025-04-01T23:59:59Z", OrderStatus::Assigned),
            order("undated", Some(OrderStatus::Assigned)),
        ];
        let now = instant("2025-04-02T08:00:00Z");
        assert_eq!(ids(&todays_orders(&orders, &now)), vec!["today"]);
    }

    #[test]
    fn test_todays_orders_with_zoneless_upstream_times() {
        let orders: Vec<Order> = serde_json::from_str(
            r#"[
                {"_id":"today","appointmentDate":"2025-04-02T23:59:59"},
                {"_id":"yesterday","appointmentDate":"2025-04-01T23:59:59"}
            ]"#,
        )
        .unwrap();
        let east = FixedOffset::east_opt(8 * 3600).unwrap();
        let now = east.with_ymd_and_hms(2025, 4, 2, 10, 0, 0).unwrap();
        assert_eq!(ids(&todays_orders(&orders, &now)), vec!["today"]);

        let west = FixedOffset::west_opt(5 * 3600).unwrap();
        let now = west.with_ymd_and_hms(2025, 4, 2, 10, 0, 0).unwrap();
        assert_eq!(ids(&todays_orders(&orders, &now)), vec!["today"]);
    }

    #[test]
    fn test_this_weeks_orders() {
        let orders = vec![
            dated("sun", "2025-03-30T00:00:00Z", OrderStatus::Pending),
            dated("sat", "2025-04-05T23:59:59.999Z", OrderStatus::Pending),
            dated("prev-sat", "2025-03-29T23:59:59Z", OrderStatus::Pending),
            dated("next-sun", "2025-04-06T00:00:00Z", OrderStatus::Pending),
        ];
        let now = instant("2025-04-02T08:00:00Z");
        assert_eq!(ids(&this_weeks_orders(&orders, &now)), vec!["sun", "sat"]);
    }

    #[test]
    fn test_overdue_excludes_closed_orders() {
        let orders = vec![
            dated("late", "2025-04-01T09:00:00Z", OrderStatus::Assigned),
            dated("done", "2025-04-01T09:00:00Z", OrderStatus::Completed),
            dated("dropped", "2025-04-01T09:00:00Z", OrderStatus::Cancelled),
            dated("future", "2025-04-03T09:00:00Z", OrderStatus::Pending),
        ];
        let now = instant("2025-04-02T08:00:00Z");
        assert_eq!(ids(&overdue_orders(&orders, &now)), vec!["late"]);
    }

    #[test]
    fn test_date_range_inclusive() {
        let orders = vec![
            dated("a", "2025-04-01T00:00:00Z", OrderStatus::Pending),
            dated("b", "2025-04-10T00:00:00Z", OrderStatus::Pending),
            order("c", None),
        ];
        let start = instant("2025-04-01T00:00:00Z");
        let end = instant("2025-04-05T00:00:00Z");
        assert_eq!(
            ids(&orders_by_date_range(&orders, Some(&start), Some(&end))),
            vec!["a"]
        );
        assert_eq!(
            orders_by_date_range(&orders, None::<&DateTime<Utc>>, None).len(),
            3
        );
    }

    #[test]
    fn test_search_orders() {
        let orders = vec![
            Order {
                tracker_id: Some("TR25040012".into()),
                customer_name: Some("Lim Wei".into()),
                ..order("1", None)
            },
            Order {
                service_id: Some("SVC-778".into()),
                ..order("2", None)
            },
        ];
        assert_eq!(ids(&search_orders(&orders, "tr2504")), vec!["1"]);
        assert_eq!(ids(&search_orders(&orders, " wei ")), vec!["1"]);
        assert_eq!(ids(&search_orders(&orders, "svc")), vec!["2"]);
        assert_eq!(search_orders(&orders, "   ").len(), 2);
    }

    #[test]
    fn test_unassigned_and_awaiting_materials() {
        let orders = vec![
            Order {
                service_installer_id: Some("si1".into()),
                materials_assigned: true,
                ..order("assigned", Some(OrderStatus::Assigned))
            },
            order("open", Some(OrderStatus::Pending)),
            order("cancelled", Some(OrderStatus::Cancelled)),
        ];
        assert_eq!(ids(&unassigned_orders(&orders)), vec!["open"]);
        assert_eq!(ids(&orders_awaiting_materials(&orders)), vec!["open"]);
    }

    #[test]
    fn test_lookup_by_tracker_id() {
        let orders = vec![Order {
            tracker_id: Some("TR25040012".into()),
            ..order("1", None)
        }];
        assert!(order_by_tracker_id(&orders, "tr25040012").is_some());
        assert!(order_by_tracker_id(&orders, "TR25040013").is_none());
        assert!(order_by_id(&orders, "1").is_some());
        assert!(order_by_id(&orders, "9").is_none());
    }

    #[test]
    fn test_orders_with_details_tolerates_dangling_refs() {
        let buildings = vec![Building {
            id: "b1".into(),
            ..Building::default()
        }];
        let orders = vec![
            Order {
                building_id: Some("b1".into()),
                service_installer_id: Some("ghost".into()),
                ..order("1", None)
            },
            order("2", None),
        ];
        let details = orders_with_details(&orders, &buildings, &[]);
        assert_eq!(details.len(), 2);
        assert!(details[0].building.is_some());
        assert!(details[0].installer.is_none());
        assert!(details[1].building.is_none());
    }
}
