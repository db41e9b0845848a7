//! Roll-counter accounting: turns a ticket's open and close counter readings into a sold count
//! and a revenue total.

use crate::model::{DenominationSpec, WrapRule};
use serde::Serialize;

/// The derived figures for one ticket.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketTotals {
    /// Tickets sold. Negative only under `WrapRule::Reversed`.
    pub total_sold: i64,
    /// `|total_sold| * price`.
    pub total: i64,
}

/// Parses a counter reading. Anything that is not an integer reads as zero.
pub fn parse_counter(s: &str) -> i64 {
    s.trim().parse::<i64>().unwrap_or_default()
}

/// Computes the sold count and revenue for a ticket of `spec`'s denomination.
///
/// When `close >= open` the counter did not wrap and the sold count is `close - open`. Otherwise
/// the roll ran out and restarted and `spec.wrap` decides the arithmetic. Out-of-range readings
/// are not rejected; the arithmetic saturates rather than overflowing.
pub fn compute_ticket_totals(spec: &DenominationSpec, open: i64, close: i64) -> TicketTotals {
    let roll = spec.roll_length;
    let total_sold = if close >= open {
        close.saturating_sub(open)
    } else {
        match spec.wrap {
            WrapRule::Remainder => roll.saturating_sub(open.saturating_sub(close)),
            WrapRule::Reversed => {
                roll.saturating_sub(roll.saturating_sub(open).saturating_add(close))
            }
        }
    };
    let total = total_sold
        .saturating_abs()
        .saturating_mul(spec.denomination.price());
    TicketTotals { total_sold, total }
}
