//! Types that represent the ledger data model: tickets, fuel records, ledger sections and the
//! ticket catalogue.
mod amount;
mod catalogue;
mod denomination;
mod fuel;
mod section;
mod ticket;

pub use amount::{Amount, AmountError, AmountFormat};
pub use catalogue::Catalogue;
pub use denomination::{
    Denomination, DenominationSpec, Denominations, WrapRule, FALLBACK_ROLL_LENGTH,
};
pub use fuel::{DailyFuelRecord, FuelLedger, FuelType, MonthRecords};
pub use section::{LedgerSection, SectionKind};
pub use ticket::{DenominationGroup, Ticket, TicketLedger};
