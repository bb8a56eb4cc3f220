//! Application services: the detail view, the list renderer and the page handoffs.

pub mod delete;
pub mod detail;
pub mod error;
pub mod list;
pub mod navigation;
pub mod repos;
pub mod state;
