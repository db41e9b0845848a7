use crate::model::{Amount, LedgerSection};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::trace;

/// A reconciled sales-totals key and the sales-entry field it pairs with.
struct KnownKey {
    totals_key: &'static str,
    sales_key: &'static str,
    /// Whether ticket revenue is part of this total.
    tickets: bool,
}

const fn known(totals_key: &'static str, sales_key: &'static str, tickets: bool) -> KnownKey {
    KnownKey {
        totals_key,
        sales_key,
        tickets,
    }
}

const KNOWN_KEYS: &[KnownKey] = &[
    known("gas", "gasSales", false),
    known("lotto", "lottoSales", true),
    known("lottery", "lotterySales", true),
    known("taxGrocery", "taxGrocerySales", false),
    known("nontaxGrocery", "nonTaxGrocerySales", false),
    known("deli", "deliSales", false),
    known("salesTax", "salesTaxSales", false),
    known("groceryPurchase", "groceryPurchaseSales", false),
];

/// Read-only totals derived from the ledger sections and ticket revenue. Never stored; rebuild it
/// from the current inputs whenever it is needed.
#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct AggregateTotals {
    totals: BTreeMap<String, Amount>,
    ticket_subtotal: Amount,
}

impl AggregateTotals {
    /// The total for a sales-totals key, if it was computed.
    pub fn get(&self, key: &str) -> Option<Amount> {
        self.totals.get(key).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Amount)> {
        self.totals.iter()
    }

    /// The ticket revenue that was folded into the ticket categories.
    pub fn ticket_subtotal(&self) -> Amount {
        self.ticket_subtotal
    }
}

/// Combines the sales-totals entry, the sales entry and the ticket subtotal.
///
/// Every reconciled key `k` gets `sales_totals[k] + sales_entry[partner(k)]`, with blanks and
/// malformed values read as zero. The two ticket categories (`lotto` and `lottery`) also add
/// `ticket_subtotal`. Custom fields of `sales_totals` have no partner and report their own value.
pub fn compute_aggregate_totals(
    sales_entry: &LedgerSection,
    sales_totals: &LedgerSection,
    ticket_subtotal: Amount,
) -> AggregateTotals {
    let mut totals = BTreeMap::new();
    for key in KNOWN_KEYS {
        let mut total = sales_totals.value(key.totals_key) + sales_entry.value(key.sales_key);
        if key.tickets {
            total += ticket_subtotal;
        }
        trace!("{} total {}", key.totals_key, total);
        let _ = totals.insert(key.totals_key.to_string(), Amount::new(total.value()));
    }

    for (key, value) in sales_totals.fields() {
        if !KNOWN_KEYS.iter().any(|k| k.totals_key == key) {
            let _ = totals.insert(key.clone(), Amount::new(Amount::lenient(value).value()));
        }
    }

    AggregateTotals {
        totals,
        ticket_subtotal: Amount::new(ticket_subtotal.value()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Denomination, Denominations, SectionKind, TicketLedger};
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn sections() -> (LedgerSection, LedgerSection) {
        let mut sales = LedgerSection::new(SectionKind::Sales);
        sales.set("gasSales", "100").unwrap();
        sales.set("lottoSales", "20").unwrap();
        sales.set("lotterySales", "bad").unwrap();
        sales.set("nonTaxGrocerySales", "7.5").unwrap();
        let mut totals = LedgerSection::new(SectionKind::SalesTotals);
        totals.set("gas", "50.25").unwrap();
        totals.set("lotto", "5").unwrap();
        totals.set("nontaxGrocery", "2.5").unwrap();
        (sales, totals)
    }

    #[test]
    fn test_pairs_sections() {
        let (sales, totals) = sections();
        let out = compute_aggregate_totals(&sales, &totals, Amount::ZERO);
        assert_eq!(out.get("gas").unwrap().value(), dec("150.25"));
        assert_eq!(out.get("nontaxGrocery").unwrap().value(), dec("10"));
        assert_eq!(out.get("deli").unwrap().value(), Decimal::ZERO);
        assert_eq!(out.iter().count(), 8);
    }

    #[test]
    fn test_ticket_subtotal_only_in_ticket_categories() {
        let (sales, totals) = sections();
        let out = compute_aggregate_totals(&sales, &totals, Amount::from(300));
        assert_eq!(out.get("lotto").unwrap().value(), dec("325"));
        assert_eq!(out.get("lottery").unwrap().value(), dec("300"));
        assert_eq!(out.get("gas").unwrap().value(), dec("150.25"));
        assert_eq!(out.ticket_subtotal().value(), dec("300"));
    }

    #[test]
    fn test_subtotal_from_ticket_ledger() {
        let table = Denominations::default();
        let mut tickets = TicketLedger::default();
        tickets.record(&table, Denomination::new(2), "1510", "10", "160");
        tickets.record(&table, Denomination::new(5), "7023", "50", "10");
        // $2: 150 sold = 300; $5: 60 - 40 = 20 sold = 100
        let subtotal = Amount::from(tickets.subtotal());
        let (sales, totals) = sections();
        let out = compute_aggregate_totals(&sales, &totals, subtotal);
        assert_eq!(out.get("lottery").unwrap().value(), dec("400"));

        tickets.remove(Denomination::new(2), "1510");
        let out = compute_aggregate_totals(&sales, &totals, Amount::from(tickets.subtotal()));
        assert_eq!(out.get("lottery").unwrap().value(), dec("100"));
    }

    #[test]
    fn test_custom_fields_pass_through() {
        let (sales, mut totals) = sections();
        totals.set("carWash", "12.5").unwrap();
        totals.set("propane", "").unwrap();
        let out = compute_aggregate_totals(&sales, &totals, Amount::from(10));
        assert_eq!(out.get("carWash").unwrap().value(), dec("12.5"));
        assert!(out.get("propane").unwrap().is_zero());
        assert_eq!(out.iter().count(), 10);
    }

    #[test]
    fn test_is_pure() {
        let (sales, totals) = sections();
        let first = compute_aggregate_totals(&sales, &totals, Amount::from(42));
        let _ = compute_aggregate_totals(&totals, &sales, Amount::from(7));
        let again = compute_aggregate_totals(&sales, &totals, Amount::from(42));
        assert_eq!(first, again);
    }

    #[test]
    fn test_serializes_plain_values() {
        let (sales, totals) = sections();
        let out = compute_aggregate_totals(&sales, &totals, Amount::ZERO);
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["totals"]["gas"], "150.25");
        assert_eq!(json["ticket_subtotal"], "0.00");
    }
}
