//! Reusable view components.

pub mod data_table;
pub mod layout;
pub mod tables;

pub use data_table::{DataTable, TableColumn, TableFilter};
pub use layout::{Layout, NavLink};
pub use tables::{PageContext, TableQuery};
