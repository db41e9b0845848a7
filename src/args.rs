//! These structs provide the CLI interface for the ledger CLI.

use crate::model::{Denomination, FuelType, SectionKind};
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// ledger: daily ledgers for a fuel and convenience store.
///
/// Record scratch-ticket counter readings, daily fuel figures and the sales and money sections of
/// the day sheet. The ledger derives sold counts, ticket revenue, cumulative monthly fuel sales
/// and the reconciled sales totals from whatever has been entered so far.
///
/// Run `ledger init` once to create the data directory.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the data directory and the default configuration file.
    ///
    /// The configuration file, `$LEDGER_HOME/config.json`, holds the denomination table (roll
    /// length per ticket price) and the default ticket catalogue. Edit it to match your stock.
    Init,
    /// Record, delete or list scratch-ticket counter readings.
    Ticket(TicketArgs),
    /// Manage the list of known ticket numbers per denomination.
    Catalogue(CatalogueArgs),
    /// Record, edit or show daily fuel figures.
    Fuel(FuelArgs),
    /// Set, remove or show fields of the sales, sales-totals and money sections.
    Section(SectionArgs),
    /// Show the reconciled totals across every section and the ticket revenue.
    Totals,
    /// Clear the current period's data. The ticket catalogue is kept.
    Clear(ClearArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where ledger data and configuration is held. Defaults to ~/ledger
    #[arg(long, env = "LEDGER_HOME", default_value_t = default_ledger_home())]
    ledger_home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, ledger_home: PathBuf) -> Self {
        Self {
            log_level,
            ledger_home: ledger_home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn ledger_home(&self) -> &DisplayPath {
        &self.ledger_home
    }
}

/// Args for the `ledger ticket` command.
#[derive(Debug, Parser, Clone)]
pub struct TicketArgs {
    #[command(subcommand)]
    action: TicketSubcommand,
}

impl TicketArgs {
    pub fn action(&self) -> &TicketSubcommand {
        &self.action
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum TicketSubcommand {
    /// Record the open and close readings of a ticket roll and recompute its totals.
    Record(RecordTicketArgs),
    /// Delete a ticket's readings and remove it from the catalogue.
    Delete(TicketRef),
    /// List every recorded ticket with its group totals.
    List,
}

/// Identifies a ticket by denomination and catalogue number.
#[derive(Debug, Parser, Clone)]
pub struct TicketRef {
    /// The ticket price, e.g. `$5` or `5`.
    #[arg(long)]
    denomination: Denomination,

    /// The ticket catalogue number.
    #[arg(long)]
    ticket: String,
}

impl TicketRef {
    pub fn new(denomination: Denomination, ticket: impl Into<String>) -> Self {
        Self {
            denomination,
            ticket: ticket.into(),
        }
    }

    pub fn denomination(&self) -> Denomination {
        self.denomination
    }

    pub fn ticket(&self) -> &str {
        &self.ticket
    }
}

/// Args for `ledger ticket record`.
#[derive(Debug, Parser, Clone)]
pub struct RecordTicketArgs {
    #[clap(flatten)]
    ticket: TicketRef,

    /// The counter reading at the start of the period. Defaults to the last recorded close.
    #[arg(long)]
    open: Option<String>,

    /// The counter reading at the end of the period.
    #[arg(long)]
    close: String,
}

impl RecordTicketArgs {
    pub fn new(ticket: TicketRef, open: Option<String>, close: impl Into<String>) -> Self {
        Self {
            ticket,
            open,
            close: close.into(),
        }
    }

    pub fn ticket(&self) -> &TicketRef {
        &self.ticket
    }

    pub fn open(&self) -> Option<&str> {
        self.open.as_deref()
    }

    pub fn close(&self) -> &str {
        &self.close
    }
}

/// Args for the `ledger catalogue` command.
#[derive(Debug, Parser, Clone)]
pub struct CatalogueArgs {
    #[command(subcommand)]
    action: CatalogueSubcommand,
}

impl CatalogueArgs {
    pub fn action(&self) -> &CatalogueSubcommand {
        &self.action
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum CatalogueSubcommand {
    /// Add a ticket number to a denomination's list.
    Add(TicketRef),
    /// Remove a ticket number from a denomination's list.
    Delete(TicketRef),
    /// Show the catalogue: the configured defaults merged with saved entries.
    List,
}

/// Args for the `ledger fuel` command.
#[derive(Debug, Parser, Clone)]
pub struct FuelArgs {
    #[command(subcommand)]
    action: FuelSubcommand,
}

impl FuelArgs {
    pub fn action(&self) -> &FuelSubcommand {
        &self.action
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum FuelSubcommand {
    /// Enter the figures for a day. Fields that are not given keep their current value.
    Record(RecordFuelArgs),
    /// Replace the monthly sale of a day and recompute the month.
    Edit(EditFuelArgs),
    /// Show a month's records.
    Show(ShowFuelArgs),
}

/// Args for `ledger fuel record`.
#[derive(Debug, Parser, Clone)]
pub struct RecordFuelArgs {
    /// The fuel type: primary (gas) or secondary (diesel).
    #[arg(long, value_enum)]
    fuel: FuelType,

    /// The month, 1 through 12. Defaults to the current month.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    month: Option<u32>,

    /// The day of the month. Defaults to today.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=31))]
    day: Option<u32>,

    #[arg(long)]
    opening_stock: Option<String>,

    #[arg(long)]
    today_sale: Option<String>,

    #[arg(long)]
    new_stock: Option<String>,

    /// The sale attributed to this day, which feeds the cumulative monthly sale.
    #[arg(long)]
    monthly_sale: Option<String>,
}

impl RecordFuelArgs {
    pub fn new(fuel: FuelType, month: Option<u32>, day: Option<u32>) -> Self {
        Self {
            fuel,
            month,
            day,
            opening_stock: None,
            today_sale: None,
            new_stock: None,
            monthly_sale: None,
        }
    }

    pub fn with_opening_stock(mut self, value: impl Into<String>) -> Self {
        self.opening_stock = Some(value.into());
        self
    }

    pub fn with_today_sale(mut self, value: impl Into<String>) -> Self {
        self.today_sale = Some(value.into());
        self
    }

    pub fn with_new_stock(mut self, value: impl Into<String>) -> Self {
        self.new_stock = Some(value.into());
        self
    }

    pub fn with_monthly_sale(mut self, value: impl Into<String>) -> Self {
        self.monthly_sale = Some(value.into());
        self
    }

    pub fn fuel(&self) -> FuelType {
        self.fuel
    }

    pub fn month(&self) -> Option<u32> {
        self.month
    }

    pub fn day(&self) -> Option<u32> {
        self.day
    }

    pub fn opening_stock(&self) -> Option<&str> {
        self.opening_stock.as_deref()
    }

    pub fn today_sale(&self) -> Option<&str> {
        self.today_sale.as_deref()
    }

    pub fn new_stock(&self) -> Option<&str> {
        self.new_stock.as_deref()
    }

    pub fn monthly_sale(&self) -> Option<&str> {
        self.monthly_sale.as_deref()
    }
}

/// Args for `ledger fuel edit`.
#[derive(Debug, Parser, Clone)]
pub struct EditFuelArgs {
    #[arg(long, value_enum)]
    fuel: FuelType,

    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    month: u32,

    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=31))]
    day: u32,

    /// The new monthly sale. Pass an empty string to clear it.
    #[arg(long)]
    monthly_sale: String,
}

impl EditFuelArgs {
    pub fn new(fuel: FuelType, month: u32, day: u32, monthly_sale: impl Into<String>) -> Self {
        Self {
            fuel,
            month,
            day,
            monthly_sale: monthly_sale.into(),
        }
    }

    pub fn fuel(&self) -> FuelType {
        self.fuel
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn monthly_sale(&self) -> &str {
        &self.monthly_sale
    }
}

/// Args for `ledger fuel show`.
#[derive(Debug, Parser, Clone)]
pub struct ShowFuelArgs {
    #[arg(long, value_enum)]
    fuel: FuelType,

    /// Defaults to the current month.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    month: Option<u32>,
}

impl ShowFuelArgs {
    pub fn new(fuel: FuelType, month: Option<u32>) -> Self {
        Self { fuel, month }
    }

    pub fn fuel(&self) -> FuelType {
        self.fuel
    }

    pub fn month(&self) -> Option<u32> {
        self.month
    }
}

/// Args for the `ledger section` command.
#[derive(Debug, Parser, Clone)]
pub struct SectionArgs {
    #[command(subcommand)]
    action: SectionSubcommand,
}

impl SectionArgs {
    pub fn action(&self) -> &SectionSubcommand {
        &self.action
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum SectionSubcommand {
    /// Set a field. A field that is not one of the section's defaults is added as a custom field.
    Set(SetFieldArgs),
    /// Remove a custom field.
    RemoveField(FieldRef),
    /// Blank every value in a section.
    Clear(SectionRef),
    /// Show a section's fields and their sum.
    Show(SectionRef),
}

#[derive(Debug, Parser, Clone)]
pub struct SectionRef {
    /// One of: sales, sales-totals, money
    #[arg(long, value_enum)]
    section: SectionKind,
}

impl SectionRef {
    pub fn new(section: SectionKind) -> Self {
        Self { section }
    }

    pub fn section(&self) -> SectionKind {
        self.section
    }
}

#[derive(Debug, Parser, Clone)]
pub struct FieldRef {
    #[clap(flatten)]
    section: SectionRef,

    #[arg(long)]
    key: String,
}

impl FieldRef {
    pub fn new(section: SectionKind, key: impl Into<String>) -> Self {
        Self {
            section: SectionRef::new(section),
            key: key.into(),
        }
    }

    pub fn section(&self) -> SectionKind {
        self.section.section()
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

#[derive(Debug, Parser, Clone)]
pub struct SetFieldArgs {
    #[clap(flatten)]
    field: FieldRef,

    #[arg(long)]
    value: String,
}

impl SetFieldArgs {
    pub fn new(section: SectionKind, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: FieldRef::new(section, key),
            value: value.into(),
        }
    }

    pub fn section(&self) -> SectionKind {
        self.field.section()
    }

    pub fn key(&self) -> &str {
        self.field.key()
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Args for `ledger clear`.
#[derive(Debug, Parser, Clone)]
pub struct ClearArgs {
    /// Only clear the ticket readings, keeping fuel and section data.
    #[arg(long)]
    tickets_only: bool,
}

impl ClearArgs {
    pub fn new(tickets_only: bool) -> Self {
        Self { tickets_only }
    }

    pub fn tickets_only(&self) -> bool {
        self.tickets_only
    }
}

fn default_ledger_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("ledger"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --ledger-home or LEDGER_HOME instead of relying on the default \
                ledger home directory.",
            );
            PathBuf::from("ledger")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}
