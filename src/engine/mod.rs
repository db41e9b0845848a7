//! The derived-totals and reconciliation engine.
//!
//! Everything here is a pure function over the values passed in. Nothing is cached and nothing
//! touches storage; callers load a snapshot, apply an edit, call in, and persist what comes back.
mod catalogue;
mod cumulative;
mod roll;
mod totals;

pub use catalogue::merge_catalogue;
pub use cumulative::recompute_cumulative;
pub use roll::{compute_ticket_totals, parse_counter, TicketTotals};
pub use totals::{compute_aggregate_totals, AggregateTotals};
