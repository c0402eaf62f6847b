//! # sift-planner
//!
//! Decides which tables a run touches and what statement it sends to each.
//!
//! - [`TableFilter`] applies the include/exclude glob lists to table names.
//! - [`build_search`] turns a table's columns and the search term into a
//!   parameterized [`SearchStatement`] plus a display-only rendering.
//!
//! For a table `users(id, email)` in schema `shop` and the term `bob`:
//!
//! ```sql
//! -- executed, two parameters bound to '%bob%'
//! SELECT t.* FROM shop.users t WHERE `id` LIKE ? OR `email` LIKE ? LIMIT 20;
//! -- displayed
//! SELECT t.* FROM shop.users t WHERE `id` LIKE '%bob%' OR `email` LIKE '%bob%' LIMIT 20;
//! ```
//!
//! Nothing in this crate performs I/O.

pub mod filter;
pub mod query;

pub use filter::TableFilter;
pub use query::{PlanError, SearchStatement, build_search};
