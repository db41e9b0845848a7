//! Command handlers for the ledger CLI.
//!
//! Each handler loads the snapshot it needs from a [`Store`], applies one edit, lets the engine
//! recompute what depends on it and saves the result.

mod catalogue;
mod clear;
mod fuel;
mod init;
mod section;
mod ticket;
mod totals;

use crate::engine::merge_catalogue;
use crate::model::{Catalogue, FuelLedger, LedgerSection, SectionKind, TicketLedger};
use crate::store::{load_json, save_json, Store, CATALOGUE_KEY, FUEL_KEY, TICKETS_KEY};
use crate::{Config, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Debug;
use tracing::{debug, info};

pub use catalogue::{catalogue_add, catalogue_delete, catalogue_list};
pub use clear::{clear, Cleared};
pub use fuel::{fuel_edit, fuel_record, fuel_show, FuelDay, FuelMonth};
pub use init::init;
pub use section::{section_clear, section_remove_field, section_set, section_show, SectionReport};
pub use ticket::{ticket_delete, ticket_list, ticket_record, TicketRecorded};
pub use totals::{totals, TotalsReport};

/// The output type for a command. This allows the command to return a consistent message and,
/// optionally, structured data.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message that can be printed to the user regarding the outcome of the command execution.
    message: String,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,
}

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
        }
    }

    /// Create a new `Out` object that has `None` for `structure`.
    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: None,
        }
    }

    /// Get the `message`.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the structured data stored in `structure`.
    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// Print the message to `info!` and the structured data (if it exists) as JSON to `debug!`.
    pub fn print(&self) {
        info!("{}", self.message);
        if let Some(structure) = self.structure() {
            if let Ok(json) = serde_json::to_string_pretty(structure) {
                debug!("Command output:\n\n{json}\n\n");
            }
        }
    }
}

async fn load_tickets<S: Store + ?Sized>(store: &S) -> Result<TicketLedger> {
    load_json(store, TICKETS_KEY).await
}

async fn save_tickets<S: Store + ?Sized>(store: &S, tickets: &TicketLedger) -> Result<()> {
    save_json(store, TICKETS_KEY, tickets).await
}

/// The configured defaults merged with whatever has been saved.
async fn load_catalogue<S: Store + ?Sized>(config: &Config, store: &S) -> Result<Catalogue> {
    let saved: Catalogue = load_json(store, CATALOGUE_KEY).await?;
    Ok(merge_catalogue(config.default_catalogue(), &saved))
}

async fn save_catalogue<S: Store + ?Sized>(store: &S, catalogue: &Catalogue) -> Result<()> {
    save_json(store, CATALOGUE_KEY, catalogue).await
}

async fn load_fuel<S: Store + ?Sized>(store: &S) -> Result<FuelLedger> {
    load_json(store, FUEL_KEY).await
}

async fn save_fuel<S: Store + ?Sized>(store: &S, fuel: &FuelLedger) -> Result<()> {
    save_json(store, FUEL_KEY, fuel).await
}

async fn load_section<S: Store + ?Sized>(store: &S, kind: SectionKind) -> Result<LedgerSection> {
    let saved: BTreeMap<String, String> = load_json(store, kind.store_key()).await?;
    Ok(LedgerSection::from_fields(kind, saved))
}

async fn save_section<S: Store + ?Sized>(store: &S, section: &LedgerSection) -> Result<()> {
    save_json(store, section.kind().store_key(), section.fields()).await
}
