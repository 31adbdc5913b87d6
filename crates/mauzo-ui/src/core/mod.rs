//! Shared state, reducer and the pure logic both depend on.

pub mod catalog;
pub mod config;
pub mod entity;
pub mod logic;
pub mod paging;
pub mod reducer;
pub mod store;
