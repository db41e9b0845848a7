//! Derived totals and reconciliation for a small fuel and convenience store ledger.
//!
//! The [`engine`] recomputes every derived figure (ticket sales, cumulative monthly fuel sales,
//! reconciled sales totals and the merged ticket catalogue) from the values it is given. The
//! [`commands`] load ledger snapshots from a [`store::Store`], drive the engine and save results.

pub mod args;
pub mod commands;
mod config;
pub mod engine;
mod error;
pub mod model;
pub mod store;
mod utils;


pub use commands::Out;
pub use config::Config;
pub use error::Error;
pub use error::Result;
