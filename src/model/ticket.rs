use crate::engine::{compute_ticket_totals, parse_counter};
use crate::model::{Denomination, Denominations};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// The counter readings for one ticket of one denomination, with its derived totals.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    /// Counter reading at period start, as entered.
    pub(crate) open: String,
    /// Counter reading at period end, as entered.
    pub(crate) close: String,
    pub(crate) total_sold: i64,
    /// Revenue, always non-negative.
    pub(crate) total: i64,
}

impl Ticket {
    pub fn open(&self) -> &str {
        &self.open
    }

    pub fn close(&self) -> &str {
        &self.close
    }

    pub fn total_sold(&self) -> i64 {
        self.total_sold
    }

    pub fn total(&self) -> i64 {
        self.total
    }

    /// The reading the next period opens with: this period's close.
    pub fn next_open(&self) -> &str {
        &self.close
    }
}

/// The tickets recorded for a single denomination.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DenominationGroup {
    tickets: BTreeMap<String, Ticket>,
    abs_total: i64,
}

impl DenominationGroup {
    pub fn tickets(&self) -> &BTreeMap<String, Ticket> {
        &self.tickets
    }

    /// Sum of `|total|` over every ticket in the group.
    pub fn abs_total(&self) -> i64 {
        self.abs_total
    }

    pub fn get(&self, ticket: &str) -> Option<&Ticket> {
        self.tickets.get(ticket)
    }

    fn recompute(&mut self) {
        self.abs_total = self
            .tickets
            .values()
            .fold(0i64, |sum, t| sum.saturating_add(t.total.saturating_abs()));
    }
}

/// Every denomination group for the current period, keyed by denomination.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketLedger(BTreeMap<Denomination, DenominationGroup>);

impl TicketLedger {
    /// Records the `open` and `close` readings for `ticket`, replacing any earlier readings, and
    /// recomputes the group total. Unparsable readings count as zero.
    pub fn record(
        &mut self,
        table: &Denominations,
        denomination: Denomination,
        ticket: impl Into<String>,
        open: impl Into<String>,
        close: impl Into<String>,
    ) -> &Ticket {
        let ticket = ticket.into();
        let open = open.into();
        let close = close.into();
        let spec = table.spec_for(denomination);
        let totals = compute_ticket_totals(&spec, parse_counter(&open), parse_counter(&close));
        debug!(
            "{denomination} ticket {ticket}: open {open}, close {close}, sold {}, total {}",
            totals.total_sold, totals.total
        );

        let group = self.0.entry(denomination).or_default();
        let _ = group.tickets.insert(
            ticket.clone(),
            Ticket {
                open,
                close,
                total_sold: totals.total_sold,
                total: totals.total,
            },
        );
        group.recompute();
        &group.tickets[&ticket]
    }

    /// Removes a ticket. Returns the removed ticket if it was present. A group left without
    /// tickets is dropped.
    pub fn remove(&mut self, denomination: Denomination, ticket: &str) -> Option<Ticket> {
        let group = self.0.get_mut(&denomination)?;
        let removed = group.tickets.remove(ticket);
        group.recompute();
        if group.tickets.is_empty() {
            let _ = self.0.remove(&denomination);
        }
        removed
    }

    pub fn group(&self, denomination: Denomination) -> Option<&DenominationGroup> {
        self.0.get(&denomination)
    }

    pub fn groups(&self) -> impl Iterator<Item = (&Denomination, &DenominationGroup)> {
        self.0.iter()
    }

    /// Sum of every group's `abs_total`, computed fresh.
    pub fn subtotal(&self) -> i64 {
        self.0
            .values()
            .fold(0i64, |sum, g| sum.saturating_add(g.abs_total()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
