//! Data table component types.
//!
//! Every list page renders one [`DataTable`]: its column definitions, the
//! filters shown above it, and the already-formatted rows.

use serde::Serialize;

/// Column definition for a data table.
#[derive(Debug, Clone, Serialize)]
pub struct TableColumn {
    /// Unique key for the column.
    pub key: String,
    /// Display label for the column header.
    pub label: String,
    /// Whether cells are right-aligned numbers.
    pub numeric: bool,
    /// Whether the column is visible by default.
    pub default_visible: bool,
}

impl TableColumn {
    /// Create a new text column.
    #[must_use]
    pub fn new(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            numeric: false,
            default_visible: true,
        }
    }

    /// Create a new numeric column.
    #[must_use]
    pub fn numeric(key: &str, label: &str) -> Self {
        Self {
            numeric: true,
            ..Self::new(key, label)
        }
    }

    /// Set whether the column is visible by default.
    #[must_use]
    pub const fn visible(mut self, visible: bool) -> Self {
        self.default_visible = visible;
        self
    }
}

/// Filter type for data tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterType {
    /// Single-select dropdown.
    Select,
    /// Multi-select checkboxes, submitted comma-separated.
    MultiSelect,
}

/// Filter definition for a data table.
#[derive(Debug, Clone, Serialize)]
pub struct TableFilter {
    /// Query parameter key.
    pub key: String,
    /// Display label.
    pub label: String,
    /// Filter type.
    pub filter_type: FilterType,
    /// Available options.
    pub options: Vec<FilterOption>,
}

/// Option for select/multiselect filters.
#[derive(Debug, Clone, Serialize)]
pub struct FilterOption {
    /// Option value.
    pub value: String,
    /// Display label.
    pub label: String,
    /// Whether the option is part of the current request's filter.
    pub selected: bool,
}

impl FilterOption {
    /// Create a new filter option.
    #[must_use]
    pub fn new(value: &str, label: &str) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
            selected: false,
        }
    }
}

impl TableFilter {
    /// Create a select filter.
    #[must_use]
    pub fn select(key: &str, label: &str, options: Vec<FilterOption>) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            filter_type: FilterType::Select,
            options,
        }
    }

    /// Create a multi-select filter.
    #[must_use]
    pub fn multi_select(key: &str, label: &str, options: Vec<FilterOption>) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            filter_type: FilterType::MultiSelect,
            options,
        }
    }

    /// Multi-select over every value of a status enum, with the values in
    /// `raw` (comma-separated wire names) pre-selected.
    #[must_use]
    pub fn for_values<T: Copy + core::fmt::Display>(
        key: &str,
        label: &str,
        values: &[T],
        raw: Option<&str>,
    ) -> Self {
        let selected: Vec<&str> = raw
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        let options = values
            .iter()
            .map(|value| {
                let wire = value.to_string();
                let mut option = FilterOption::new(&wire, &humanize(&wire));
                option.selected = selected.iter().any(|s| s.eq_ignore_ascii_case(&wire));
                option
            })
            .collect();
        Self::multi_select(key, label, options)
    }
}

/// One formatted table row.
#[derive(Debug, Clone, Serialize)]
pub struct TableRow {
    /// Record ID, used as the row's DOM id.
    pub id: String,
    /// Cell text, one per column.
    pub cells: Vec<String>,
}

/// A rendered data table.
#[derive(Debug, Clone, Serialize)]
pub struct DataTable {
    /// Unique table identifier.
    pub table_id: String,
    /// Column definitions.
    pub columns: Vec<TableColumn>,
    /// Filter definitions.
    pub filters: Vec<TableFilter>,
    /// Rows after search and filters.
    pub rows: Vec<TableRow>,
    /// Search placeholder text.
    pub search_placeholder: String,
    /// Current search text.
    pub search: String,
    /// Icon for empty state.
    pub empty_icon: String,
    /// Title for empty state.
    pub empty_title: String,
    /// Description for empty state.
    pub empty_description: Option<String>,
    /// Whether to show the search box.
    pub searchable: bool,
    /// Whether to show filter panel.
    pub has_filters: bool,
}

impl DataTable {
    /// Create a new, empty data table.
    #[must_use]
    pub fn new(table_id: &str) -> Self {
        Self {
            table_id: table_id.to_string(),
            columns: vec![],
            filters: vec![],
            rows: vec![],
            search_placeholder: "Search...".to_string(),
            search: String::new(),
            empty_icon: "ph-list".to_string(),
            empty_title: "No items found".to_string(),
            empty_description: None,
            searchable: false,
            has_filters: false,
        }
    }

    /// Add a column.
    #[must_use]
    pub fn column(mut self, column: TableColumn) -> Self {
        self.columns.push(column);
        self
    }

    /// Add a filter.
    #[must_use]
    pub fn filter(mut self, filter: TableFilter) -> Self {
        self.has_filters = true;
        self.filters.push(filter);
        self
    }

    /// Enable the search box with the given placeholder and current text.
    #[must_use]
    pub fn search(mut self, placeholder: &str, current: Option<&str>) -> Self {
        self.searchable = true;
        self.search_placeholder = placeholder.to_string();
        self.search = current.unwrap_or_default().trim().to_string();
        self
    }

    /// Set empty state configuration.
    #[must_use]
    pub fn empty_state(mut self, icon: &str, title: &str, description: Option<&str>) -> Self {
        self.empty_icon = icon.to_string();
        self.empty_title = title.to_string();
        self.empty_description = description.map(ToString::to_string);
        self
    }

    /// Append a row. Missing trailing cells are padded with blanks.
    pub fn push_row(&mut self, id: impl Into<String>, mut cells: Vec<String>) {
        cells.resize(self.columns.len().max(cells.len()), String::new());
        self.rows.push(TableRow {
            id: id.into(),
            cells,
        });
    }

    /// Get default visible column keys.
    #[must_use]
    pub fn default_columns(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| c.default_visible)
            .map(|c| c.key.clone())
            .collect()
    }
}

/// Turn a wire name (`in_progress`, `super-admin`) into a label
/// (`In progress`, `Super admin`).
#[must_use]
pub fn humanize(wire: &str) -> String {
    let spaced = wire.replace(['_', '-'], " ");
    let mut chars = spaced.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

#[cfg(test)]
mod tests {
    use cephas_core::OrderStatus;

    use super::*;

    #[test]
    fn test_humanize() {
        assert_eq!(humanize("in_progress"), "In progress");
        assert_eq!(humanize("super-admin"), "Super admin");
        assert_eq!(humanize(""), "");
    }

    #[test]
    fn test_filter_marks_selected_values() {
        let filter = TableFilter::for_values(
            "status",
            "Status",
            OrderStatus::ALL,
            Some("pending, COMPLETED"),
        );
        let selected: Vec<&str> = filter
            .options
            .iter()
            .filter(|o| o.selected)
            .map(|o| o.value.as_str())
            .collect();
        assert_eq!(selected, vec!["pending", "completed"]);
        assert_eq!(filter.options.len(), OrderStatus::ALL.len());
    }

    #[test]
    fn test_push_row_pads_cells() {
        let mut table = DataTable::new("t")
            .column(TableColumn::new("a", "A"))
            .column(TableColumn::new("b", "B"));
        table.push_row("r1", vec!["x".to_string()]);
        assert_eq!(table.rows[0].cells, vec!["x".to_string(), String::new()]);
        assert_eq!(table.default_columns(), vec!["a", "b"]);
    }
}
