//! Table builders for the list pages.
//!
//! Each manifest [`Page`] maps to one table computed from the signed-in
//! user's [`TrackerState`] through the selector layer. `?q=` narrows rows by
//! free-text search and `?status=a,b` by the page's main discriminant
//! (order status, building type, stock state, task status or role).

use chrono::{DateTime, TimeZone};
use rust_decimal::Decimal;
use serde::Deserialize;

use cephas_core::navigation::Page;
use cephas_core::selectors::{
    buildings, installers, materials, orders, percentage, projects, splitters, tasks, users,
};
use cephas_core::{
    BuildingType, Filter, InstallerId, Material, Order, OrderStatus, OrderType, Role, StockState,
    TaskStatus, Timestamp, TrackerState,
};

use super::data_table::{DataTable, TableColumn, TableFilter, humanize};
use crate::models::CurrentUser;

/// Query string accepted by every list page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TableQuery {
    /// Free-text search.
    #[serde(default)]
    pub q: Option<String>,
    /// Comma-separated discriminant filter.
    #[serde(default)]
    pub status: Option<String>,
}

impl TableQuery {
    fn search(&self) -> &str {
        self.q.as_deref().unwrap_or_default()
    }

    fn filter<T: std::str::FromStr>(&self) -> Filter<T> {
        Filter::parse_list(self.status.as_deref())
    }
}

/// Everything a table builder reads.
pub struct PageContext<'a, Tz: TimeZone> {
    pub state: &'a TrackerState,
    pub viewer: &'a CurrentUser,
    pub now: &'a DateTime<Tz>,
}

const BLANK: &str = "-";

fn text(value: Option<&str>) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(BLANK)
        .to_owned()
}

fn wire<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| BLANK.to_owned(), |v| humanize(&v.to_string()))
}

fn timestamp<Tz: TimeZone>(value: Option<&Timestamp>, now: &DateTime<Tz>) -> String
where
    Tz::Offset: core::fmt::Display,
{
    value.map_or_else(
        || BLANK.to_owned(),
        |v| {
            v.in_zone(&now.timezone())
                .format("%Y-%m-%d %H:%M")
                .to_string()
        },
    )
}

fn rate(value: f64) -> String {
    format!("{value:.1}%")
}

fn money(value: Option<Decimal>) -> String {
    value.map_or_else(|| BLANK.to_owned(), |v| format!("{v:.2}"))
}

impl<Tz: TimeZone> PageContext<'_, Tz>
where
    Tz::Offset: core::fmt::Display,
{
    /// Orders the viewer may see. Installers only see their own jobs.
    fn orders(&self) -> Vec<&Order> {
        let all = self.state.orders.items();
        if self.viewer.role() == Some(Role::Installer) {
            let own = Filter::One(InstallerId::new(self.viewer.id.as_str()));
            orders::orders_by_installer(all, &own)
        } else {
            all.iter().collect()
        }
    }

    /// Build the table for a page.
    #[must_use]
    pub fn table(&self, page: Page, query: &TableQuery) -> DataTable {
        match page {
            Page::Activations => {
                let visible = self.orders();
                let filtered = orders::orders_by_status(visible, &query.filter());
                let rows = orders::search_orders(filtered, query.search());
                self.order_table("activations", rows, query)
                    .filter(TableFilter::for_values(
                        "status",
                        "Status",
                        OrderStatus::ALL,
                        query.status.as_deref(),
                    ))
            }
            Page::UnassignedActivations => {
                let unassigned = orders::unassigned_orders(self.orders());
                self.order_table(
                    "unassigned-activations",
                    orders::search_orders(unassigned, query.search()),
                    query,
                )
            }
            Page::TodaysActivations => {
                let today = orders::todays_orders(self.orders(), self.now);
                self.order_table(
                    "todays-activations",
                    orders::search_orders(today, query.search()),
                    query,
                )
            }
            Page::OverdueActivations => {
                let overdue = orders::overdue_orders(self.orders(), self.now);
                self.order_table(
                    "overdue-activations",
                    orders::search_orders(overdue, query.search()),
                    query,
                )
            }
            Page::Buildings => self.buildings_table(query),
            Page::Splitters => self.splitters_table(query),
            Page::Materials => {
                let filtered = materials::materials_by_stock_state(
                    self.state.materials.items(),
                    &query.filter(),
                );
                let rows = materials::search_materials(filtered, query.search());
                self.materials_table("materials", rows, query)
                    .filter(TableFilter::for_values(
                        "status",
                        "Stock",
                        StockState::ALL,
                        query.status.as_deref(),
                    ))
            }
            Page::LowStockMaterials => {
                let low = materials::low_stock_materials(self.state.materials.items());
                self.materials_table(
                    "low-stock-materials",
                    materials::search_materials(low, query.search()),
                    query,
                )
            }
            Page::ServiceInstallers => self.installers_table(query),
            Page::InstallerPerformance => self.performance_table(),
            Page::Invoices => self.invoices_table(query),
            Page::Reports => self.reports_table(),
            Page::Projects => self.projects_table(query),
            Page::Tasks => self.tasks_table(query),
            Page::Users => self.users_table(query),
            Page::Profile => self.profile_table(),
            Page::Notifications => self.notifications_table(),
        }
    }

    fn order_table<'o>(
        &'o self,
        id: &str,
        rows: impl IntoIterator<Item = &'o Order>,
        query: &TableQuery,
    ) -> DataTable {
        let mut table = DataTable::new(id)
            .column(TableColumn::new("tracker_id", "Tracker ID"))
            .column(TableColumn::new("customer", "Customer"))
            .column(TableColumn::new("type", "Type"))
            .column(TableColumn::new("status", "Status"))
            .column(TableColumn::new("building", "Building"))
            .column(TableColumn::new("installer", "Installer"))
            .column(TableColumn::new("appointment", "Appointment"))
            .column(TableColumn::new("service_id", "Service ID").visible(false))
            .search("Search by tracker ID, customer or service ID...", query.q.as_deref())
            .empty_state(
                "ph-clipboard-text",
                "No activations found",
                Some("Try adjusting your search or filters"),
            );

        let details = orders::orders_with_details(
            rows,
            self.state.buildings.items(),
            self.state.service_installers.items(),
        );
        for detail in details {
            let order = detail.order;
            table.push_row(
                order.id.as_str(),
                vec![
                    text(order.tracker_id.as_deref()),
                    text(order.customer_name.as_deref()),
                    wire(order.order_type),
                    wire(order.status),
                    detail
                        .building
                        .map_or_else(|| BLANK.to_owned(), |b| b.display_name().to_owned()),
                    detail
                        .installer
                        .map_or_else(|| BLANK.to_owned(), |i| i.display_name().to_owned()),
                    timestamp(order.appointment_date.as_ref(), self.now),
                    text(order.service_id.as_deref()),
                ],
            );
        }
        table
    }

    fn buildings_table(&self, query: &TableQuery) -> DataTable {
        let filtered = buildings::buildings_by_type(self.state.buildings.items(), &query.filter());
        let utilization = splitters::splitter_utilization_by_building(self.state.splitters.items());

        let mut table = DataTable::new("buildings")
            .column(TableColumn::new("name", "Building"))
            .column(TableColumn::new("type", "Type"))
            .column(TableColumn::new("location", "Location"))
            .column(TableColumn::new("address", "Address").visible(false))
            .column(TableColumn::numeric("splitters", "Splitters"))
            .column(TableColumn::numeric("utilization", "Port utilization"))
            .filter(TableFilter::for_values(
                "status",
                "Type",
                BuildingType::ALL,
                query.status.as_deref(),
            ))
            .search("Search by name, location or address...", query.q.as_deref())
            .empty_state("ph-buildings", "No buildings found", None);

        for building in buildings::search_buildings(filtered, query.search()) {
            let usage = utilization.get(&building.id);
            table.push_row(
                building.id.as_str(),
                vec![
                    building.display_name().to_owned(),
                    wire(building.building_type),
                    text(building.location.as_deref()),
                    text(building.address.as_deref()),
                    usage.map_or(0, |u| u.splitters).to_string(),
                    rate(usage.map_or(0.0, |u| u.utilization)),
                ],
            );
        }
        table
    }

    fn splitters_table(&self, query: &TableQuery) -> DataTable {
        let building_list = self.state.buildings.items();
        let mut table = DataTable::new("splitters")
            .column(TableColumn::new("number", "Splitter"))
            .column(TableColumn::new("building", "Building"))
            .column(TableColumn::numeric("ports", "Ports"))
            .column(TableColumn::numeric("used", "Used"))
            .column(TableColumn::numeric("available", "Available"))
            .search("Search by splitter number...", query.q.as_deref())
            .empty_state("ph-git-fork", "No splitters found", None);

        for splitter in splitters::search_splitters(self.state.splitters.items(), query.search()) {
            let building = splitter
                .building_id
                .as_ref()
                .and_then(|id| buildings::building_by_id(building_list, id.as_str()));
            table.push_row(
                splitter.id.as_str(),
                vec![
                    text(splitter.splitter_number.as_deref()),
                    building.map_or_else(|| BLANK.to_owned(), |b| b.display_name().to_owned()),
                    splitter.port_count().to_string(),
                    splitter.used_ports().to_string(),
                    splitter.available_ports().to_string(),
                ],
            );
        }
        table
    }

    fn materials_table<'m>(
        &self,
        id: &str,
        rows: impl IntoIterator<Item = &'m Material>,
        query: &TableQuery,
    ) -> DataTable {
        let mut table = DataTable::new(id)
            .column(TableColumn::new("sap_code", "SAP code"))
            .column(TableColumn::new("description", "Description"))
            .column(TableColumn::new("type", "Type"))
            .column(TableColumn::numeric("stock", "Stock"))
            .column(TableColumn::numeric("minimum", "Minimum"))
            .column(TableColumn::numeric("unit_price", "Unit price").visible(false))
            .column(TableColumn::new("state", "State"))
            .search("Search by SAP code, description or type...", query.q.as_deref())
            .empty_state("ph-package", "No materials found", None);

        for material in rows {
            let unit = material.unit.as_deref().unwrap_or_default();
            table.push_row(
                material.id.as_str(),
                vec![
                    text(material.sap_code.as_deref()),
                    text(material.description.as_deref()),
                    text(material.material_type.as_deref()),
                    format!("{} {unit}", material.stock_keeping_unit.normalize())
                        .trim_end()
                        .to_owned(),
                    material.minimum_stock.normalize().to_string(),
                    money(material.unit_price),
                    wire(Some(material.stock_state())),
                ],
            );
        }
        table
    }

    fn installers_table(&self, query: &TableQuery) -> DataTable {
        let matching =
            installers::search_installers(self.state.service_installers.items(), query.search());
        let mut table = DataTable::new("service-installers")
            .column(TableColumn::new("name", "Installer"))
            .column(TableColumn::new("email", "Email"))
            .column(TableColumn::new("phone", "Phone").visible(false))
            .column(TableColumn::new("active", "Active"))
            .column(TableColumn::numeric("assignments", "Assignments"))
            .column(TableColumn::numeric("completed", "Completed"))
            .column(TableColumn::new("available", "Available"))
            .search("Search by name, email or phone...", query.q.as_deref())
            .empty_state("ph-hard-hat", "No service installers found", None);

        let with_stats =
            installers::service_installers_with_stats(matching, self.state.orders.items());
        for stats in with_stats {
            let installer = stats.installer;
            table.push_row(
                installer.id.as_str(),
                vec![
                    installer.display_name().to_owned(),
                    text(installer.email.as_deref()),
                    text(installer.phone.as_deref()),
                    yes_no(installer.is_active),
                    format!("{}/{}", stats.active_assignments, stats.max_assignments),
                    stats.workload.completed.to_string(),
                    yes_no(stats.available),
                ],
            );
        }
        table
    }

    fn performance_table(&self) -> DataTable {
        let performance = installers::service_installer_performance(self.state.orders.items());
        let mut table = DataTable::new("installer-performance")
            .column(TableColumn::new("name", "Installer"))
            .column(TableColumn::numeric("orders", "Orders"))
            .column(TableColumn::numeric("completed", "Completed"))
            .column(TableColumn::numeric("completion_rate", "Completion rate"))
            .column(TableColumn::numeric("on_time_rate", "On-time rate"))
            .column(TableColumn::numeric("average_hours", "Avg. hours to complete"))
            .empty_state("ph-chart-line", "No installer activity yet", None);

        for installer in self.state.service_installers.items() {
            let stats = performance.get(&installer.id).copied().unwrap_or_default();
            table.push_row(
                installer.id.as_str(),
                vec![
                    installer.display_name().to_owned(),
                    stats.total_orders.to_string(),
                    stats.completed_orders.to_string(),
                    rate(stats.completion_rate),
                    rate(stats.on_time_rate),
                    format!("{:.1}", stats.average_completion_hours),
                ],
            );
        }
        table
    }

    fn invoices_table(&self, query: &TableQuery) -> DataTable {
        let completed =
            orders::orders_by_status(self.orders(), &Filter::One(OrderStatus::Completed));
        let typed = orders::orders_by_type(completed, &query.filter());
        let mut table = DataTable::new("invoices")
            .column(TableColumn::new("tracker_id", "Tracker ID"))
            .column(TableColumn::new("customer", "Customer"))
            .column(TableColumn::new("service_id", "Service ID"))
            .column(TableColumn::new("type", "Type"))
            .column(TableColumn::new("completed", "Completed"))
            .filter(TableFilter::for_values(
                "status",
                "Type",
                OrderType::ALL,
                query.status.as_deref(),
            ))
            .search("Search by tracker ID, customer or service ID...", query.q.as_deref())
            .empty_state(
                "ph-receipt",
                "Nothing to invoice",
                Some("Completed activations appear here"),
            );

        for order in orders::search_orders(typed, query.search()) {
            table.push_row(
                order.id.as_str(),
                vec![
                    text(order.tracker_id.as_deref()),
                    text(order.customer_name.as_deref()),
                    text(order.service_id.as_deref()),
                    wire(order.order_type),
                    timestamp(order.completed_at.as_ref(), self.now),
                ],
            );
        }
        table
    }

    fn reports_table(&self) -> DataTable {
        let visible = self.orders();
        let status_counts = orders::order_status_counts(visible.iter().copied());
        let type_counts = orders::order_type_counts(visible.iter().copied());
        let week = orders::this_weeks_orders(visible.iter().copied(), self.now);

        let mut table = DataTable::new("reports")
            .column(TableColumn::new("metric", "Metric"))
            .column(TableColumn::numeric("value", "Value"))
            .empty_state("ph-chart-bar", "No data to report", None);

        let total = status_counts.total().to_string();
        table.push_row("total", vec!["Activations".to_owned(), total]);
        for (status, count) in status_counts.iter() {
            table.push_row(
                format!("status-{status}"),
                vec![format!("Status: {}", humanize(status.as_str())), count.to_string()],
            );
        }
        for (kind, count) in type_counts.iter() {
            table.push_row(
                format!("type-{kind}"),
                vec![format!("Type: {}", humanize(kind.as_str())), count.to_string()],
            );
        }
        let scheduled = week.len().to_string();
        table.push_row("this-week", vec!["Scheduled this week".to_owned(), scheduled]);
        table.push_row(
            "completion-rate",
            vec![
                "Completion rate".to_owned(),
                rate(percentage(
                    status_counts.get(OrderStatus::Completed),
                    status_counts.total(),
                )),
            ],
        );
        table.push_row(
            "inventory-value",
            vec![
                "Inventory value".to_owned(),
                money(Some(materials::inventory_value(self.state.materials.items()))),
            ],
        );

        let people = self.state.users.items();
        let workload = tasks::assignee_workload(self.state.tasks.items(), self.now);
        for (assignee, load) in &workload {
            let name = users::user_by_id(people, assignee.as_str())
                .and_then(|u| u.name.as_deref())
                .unwrap_or(assignee.as_str());
            table.push_row(
                format!("workload-{assignee}"),
                vec![
                    format!("Tasks: {name}"),
                    format!(
                        "{} open, {} overdue, {} done",
                        load.todo + load.in_progress,
                        load.overdue,
                        rate(load.completion_rate)
                    ),
                ],
            );
        }
        table
    }

    fn projects_table(&self, query: &TableQuery) -> DataTable {
        let filtered = projects::projects_by_status(self.state.projects.items(), &query.filter());
        let matching = projects::search_projects(filtered, query.search());
        let mut table = DataTable::new("projects")
            .column(TableColumn::new("name", "Project"))
            .column(TableColumn::new("status", "Status"))
            .column(TableColumn::new("priority", "Priority"))
            .column(TableColumn::numeric("tasks", "Tasks"))
            .column(TableColumn::numeric("progress", "Progress"))
            .column(TableColumn::new("due", "Due"))
            .filter(TableFilter::for_values(
                "status",
                "Status",
                TaskStatus::ALL,
                query.status.as_deref(),
            ))
            .search("Search by name or description...", query.q.as_deref())
            .empty_state("ph-kanban", "No projects found", None);

        for joined in projects::projects_with_tasks(matching, self.state.tasks.items()) {
            let project = joined.project;
            table.push_row(
                project.id.as_str(),
                vec![
                    text(project.name.as_deref()),
                    wire(project.status),
                    wire(project.priority),
                    joined.tasks.len().to_string(),
                    rate(joined.progress),
                    timestamp(project.due_date.as_ref(), self.now),
                ],
            );
        }
        table
    }

    fn tasks_table(&self, query: &TableQuery) -> DataTable {
        let filtered = tasks::tasks_by_status(self.state.tasks.items(), &query.filter());
        let project_list = self.state.projects.items();
        let mut table = DataTable::new("tasks")
            .column(TableColumn::new("title", "Task"))
            .column(TableColumn::new("status", "Status"))
            .column(TableColumn::new("priority", "Priority"))
            .column(TableColumn::new("project", "Project"))
            .column(TableColumn::new("due", "Due"))
            .filter(TableFilter::for_values(
                "status",
                "Status",
                TaskStatus::ALL,
                query.status.as_deref(),
            ))
            .search("Search by title or description...", query.q.as_deref())
            .empty_state("ph-check-square", "No tasks found", None);

        for task in tasks::search_tasks(filtered, query.search()) {
            let project = task
                .project_id
                .as_ref()
                .and_then(|id| projects::project_by_id(project_list, id.as_str()));
            table.push_row(
                task.id.as_str(),
                vec![
                    text(task.title.as_deref()),
                    wire(task.status),
                    wire(task.priority),
                    project.map_or_else(|| BLANK.to_owned(), |p| text(p.name.as_deref())),
                    timestamp(task.due_date.as_ref(), self.now),
                ],
            );
        }
        table
    }

    fn users_table(&self, query: &TableQuery) -> DataTable {
        let filtered = users::users_by_role(self.state.users.items(), &query.filter());
        let mut table = DataTable::new("users")
            .column(TableColumn::new("name", "Name"))
            .column(TableColumn::new("email", "Email"))
            .column(TableColumn::new("role", "Role"))
            .column(TableColumn::new("active", "Active"))
            .filter(TableFilter::for_values(
                "status",
                "Role",
                Role::ALL,
                query.status.as_deref(),
            ))
            .search("Search by name or email...", query.q.as_deref())
            .empty_state("ph-users", "No users found", None);

        for user in users::search_users(filtered, query.search()) {
            table.push_row(
                user.id.as_str(),
                vec![
                    text(user.name.as_deref()),
                    text(user.email.as_deref()),
                    wire(user.role),
                    yes_no(user.is_active),
                ],
            );
        }
        table
    }

    fn profile_table(&self) -> DataTable {
        let viewer = self.viewer;
        let mut table = DataTable::new("profile")
            .column(TableColumn::new("field", "Field"))
            .column(TableColumn::new("value", "Value"));
        table.push_row("name", vec!["Name".to_owned(), viewer.name.clone()]);
        table.push_row("email", vec!["Email".to_owned(), text(Some(&viewer.email))]);
        table.push_row("role", vec!["Role".to_owned(), wire(viewer.role.as_deref())]);
        table.push_row("id", vec!["User ID".to_owned(), viewer.id.to_string()]);
        table
    }

    fn notifications_table(&self) -> DataTable {
        let mut table = DataTable::new("notifications")
            .column(TableColumn::new("title", "Title"))
            .column(TableColumn::new("message", "Message"))
            .column(TableColumn::new("read", "Read"))
            .column(TableColumn::new("received", "Received"))
            .empty_state("ph-bell", "No notifications", None);

        for notification in self.state.notifications.items() {
            table.push_row(
                notification.id.as_str(),
                vec![
                    text(notification.title.as_deref()),
                    text(notification.message.as_deref()),
                    yes_no(notification.read),
                    timestamp(notification.created_at.as_ref(), self.now),
                ],
            );
        }
        table
    }
}

fn yes_no(value: bool) -> String {
    if value { "Yes" } else { "No" }.to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use cephas_core::{
        Building, BuildingId, Collection, MaterialId, OrderId, Priority, Task, TaskId, User, UserId,
    };
    use chrono::Utc;

    use super::*;
    use crate::api::{Envelope, LoginData};

    fn viewer(role: &str, id: &str) -> CurrentUser {
        let json = format!(
            r#"{{"data":{{"token":"t","user":{{"_id":"{id}","name":"Viewer","email":"v@cephas.test","role":"{role}"}}}}}}"#
        );
        CurrentUser::from_login(
            serde_json::from_str::<Envelope<LoginData>>(&json)
                .unwrap()
                .data
                .unwrap(),
        )
    }

    fn order(id: &str, installer: Option<&str>, status: OrderStatus) -> Order {
        Order {
            id: OrderId::new(id),
            tracker_id: Some(format!("TR2504{id:0>4}")),
            status: Some(status),
            building_id: Some(BuildingId::new("b1")),
            service_installer_id: installer.map(InstallerId::new),
            ..Order::default()
        }
    }

    fn state() -> TrackerState {
        TrackerState {
            orders: Collection::from_items(vec![
                order("1", Some("i1"), OrderStatus::Assigned),
                order("2", Some("i2"), OrderStatus::Completed),
                order("3", None, OrderStatus::Pending),
            ]),
            buildings: Collection::from_items(vec![Building {
                id: BuildingId::new("b1"),
                name: Some("Tower A".to_owned()),
                ..Building::default()
            }]),
            materials: Collection::from_items(vec![
                Material {
                    id: MaterialId::new("m1"),
                    sap_code: Some("SAP1-A".to_owned()),
                    stock_keeping_unit: Decimal::from(2),
                    minimum_stock: Decimal::from(5),
                    ..Material::default()
                },
                Material {
                    id: MaterialId::new("m2"),
                    sap_code: Some("SAP2-B".to_owned()),
                    stock_keeping_unit: Decimal::from(50),
                    minimum_stock: Decimal::from(5),
                    ..Material::default()
                },
            ]),
            ..TrackerState::default()
        }
    }

    fn ids(table: &DataTable) -> Vec<&str> {
        table.rows.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_installer_sees_only_own_orders() {
        let state = state();
        let viewer = viewer("installer", "i1");
        let now = Utc::now();
        let ctx = PageContext {
            state: &state,
            viewer: &viewer,
            now: &now,
        };

        let table = ctx.table(Page::Activations, &TableQuery::default());
        assert_eq!(ids(&table), vec!["1"]);
    }

    #[test]
    fn test_status_filter_and_building_join() {
        let state = state();
        let viewer = viewer("supervisor", "u9");
        let now = Utc::now();
        let ctx = PageContext {
            state: &state,
            viewer: &viewer,
            now: &now,
        };
        let query = TableQuery {
            q: None,
            status: Some("pending,assigned".to_owned()),
        };

        let table = ctx.table(Page::Activations, &query);
        assert_eq!(ids(&table), vec!["1", "3"]);
        assert_eq!(table.rows[0].cells[4], "Tower A");
        assert_eq!(table.rows[1].cells[5], BLANK);
    }

    #[test]
    fn test_low_stock_search() {
        let state = state();
        let viewer = viewer("warehouse", "w1");
        let now = Utc::now();
        let ctx = PageContext {
            state: &state,
            viewer: &viewer,
            now: &now,
        };
        let query = TableQuery {
            q: Some("sap1".to_owned()),
            status: None,
        };

        assert_eq!(ids(&ctx.table(Page::Materials, &query)), vec!["m1"]);
        let low_stock = ctx.table(Page::LowStockMaterials, &TableQuery::default());
        assert_eq!(ids(&low_stock), vec!["m1"]);
    }

    #[test]
    fn test_invoices_list_completed_orders() {
        let state = state();
        let viewer = viewer("accountant", "a1");
        let now = Utc::now();
        let ctx = PageContext {
            state: &state,
            viewer: &viewer,
            now: &now,
        };

        let invoices = ctx.table(Page::Invoices, &TableQuery::default());
        assert_eq!(ids(&invoices), vec!["2"]);
    }

    #[test]
    fn test_profile_shows_viewer() {
        let state = TrackerState::default();
        let viewer = viewer("super-admin", "u1");
        let now = Utc::now();
        let ctx = PageContext {
            state: &state,
            viewer: &viewer,
            now: &now,
        };

        let table = ctx.table(Page::Profile, &TableQuery::default());
        assert_eq!(table.rows[2].cells[1], "Super admin");
        assert_eq!(table.rows[3].cells[1], "u1");
    }

    #[test]
    fn test_reports_include_assignee_workload() {
        let task = |id: &str, assignee: &str, status: TaskStatus, due: &str| Task {
            id: TaskId::new(id),
            status: Some(status),
            priority: Some(Priority::High),
            assignee_id: Some(UserId::new(assignee)),
            due_date: Timestamp::parse(due),
            ..Task::default()
        };
        let state = TrackerState {
            tasks: Collection::from_items(vec![
                task("t1", "u1", TaskStatus::Todo, "2025-04-01T09:00:00Z"),
                task("t2", "u1", TaskStatus::Completed, "2025-04-01T09:00:00Z"),
                task("t3", "u2", TaskStatus::InProgress, "2025-04-30T09:00:00Z"),
            ]),
            users: Collection::from_items(vec![User {
                id: UserId::new("u1"),
                name: Some("Aisha".to_owned()),
                ..User::default()
            }]),
            ..TrackerState::default()
        };
        let viewer = viewer("super-admin", "admin");
        let now = Utc.with_ymd_and_hms(2025, 4, 10, 12, 0, 0).unwrap();
        let ctx = PageContext {
            state: &state,
            viewer: &viewer,
            now: &now,
        };

        let table = ctx.table(Page::Reports, &TableQuery::default());
        let rows: Vec<_> = table
            .rows
            .iter()
            .filter(|r| r.id.starts_with("workload-"))
            .collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, "workload-u1");
        assert_eq!(rows[0].cells[0], "Tasks: Aisha");
        assert_eq!(rows[0].cells[1], "1 open, 1 overdue, 50.0% done");
        assert_eq!(rows[1].cells[0], "Tasks: u2");
        assert_eq!(rows[1].cells[1], "1 open, 0 overdue, 0.0% done");
    }
}
