//! Админка: фильмы, залы, сеансы, пользователи.

pub mod screens;
pub mod table;

pub use screens::{build_view, filter_items, load_table, AdminScreen, Searchable};
pub use table::{paginate, AdminTable, Page, TableQuery, TableView};
