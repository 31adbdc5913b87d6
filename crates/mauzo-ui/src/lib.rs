#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::multiple_crate_versions)]
#![allow(clippy::future_not_send)]
//! Mauzo console core.
//!
//! The browser-side administration console for the Mauzo multi-branch retail
//! platform. This crate holds the parts with actual behavior: the shared
//! reducer-driven state store, the backend-condition translator, the
//! [`console::Console`] controller that wraps every network call, and the
//! service edges (transport sealing, fiscal receipts, SMS relay, spreadsheet
//! contract). Page components and routing live in the (external) view crate
//! and only ever call into what is exported here.

pub mod conditions;
pub mod console;
pub mod core;
pub mod i18n;
pub mod models;
pub mod services;

#[cfg(target_arch = "wasm32")]
pub mod app;

#[cfg(test)]
pub(crate) mod testing;
