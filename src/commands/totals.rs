use crate::commands::{load_section, load_tickets, Out};
use crate::engine::{compute_aggregate_totals, AggregateTotals};
use crate::model::{Amount, AmountFormat, SectionKind};
use crate::store::Store;
use crate::Result;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write;

/// The reconciled totals together with each section's total. The sales entry's total includes
/// the ticket subtotal.
#[derive(Debug, Clone, Serialize)]
pub struct TotalsReport {
    totals: AggregateTotals,
    section_totals: BTreeMap<SectionKind, Amount>,
}

impl TotalsReport {
    pub fn totals(&self) -> &AggregateTotals {
        &self.totals
    }

    pub fn section_total(&self, kind: SectionKind) -> Amount {
        self.section_totals.get(&kind).copied().unwrap_or_default()
    }
}

/// Rebuilds every derived total from the stored sections and ticket readings.
pub async fn totals<S: Store + ?Sized>(store: &S) -> Result<Out<TotalsReport>> {
    let sales = load_section(store, SectionKind::Sales).await?;
    let sales_totals = load_section(store, SectionKind::SalesTotals).await?;
    let money = load_section(store, SectionKind::Money).await?;
    let tickets = load_tickets(store).await?;

    let ticket_subtotal = Amount::from(tickets.subtotal());
    let totals = compute_aggregate_totals(&sales, &sales_totals, ticket_subtotal);
    let section_totals: BTreeMap<SectionKind, Amount> = [
        (SectionKind::Sales, sales.sum() + ticket_subtotal),
        (SectionKind::SalesTotals, sales_totals.sum()),
        (SectionKind::Money, money.sum()),
    ]
    .into_iter()
    .collect();

    let mut message = String::from("Totals:");
    for (key, total) in totals.iter() {
        let _ = write!(message, "\n  {key}: {}", total.with_format(AmountFormat::DOLLARS));
    }
    let _ = write!(
        message,
        "\nTicket subtotal: {}",
        totals.ticket_subtotal().with_format(AmountFormat::DOLLARS)
    );
    for (kind, total) in &section_totals {
        let _ = write!(
            message,
            "\n{kind} section total: {}",
            total.with_format(AmountFormat::DOLLARS)
        );
    }

    Ok(Out::new(
        message,
        TotalsReport {
            totals,
            section_totals,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::{RecordTicketArgs, SetFieldArgs, TicketRef};
    use crate::commands::{section_set, ticket_delete, ticket_record};
    use crate::model::Denomination;
    use crate::store::MemoryStore;
    use crate::test::TestEnv;

    async fn set(store: &MemoryStore, kind: SectionKind, key: &str, value: &str) {
        section_set(store, &SetFieldArgs::new(kind, key, value))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_totals_reconcile_sections_and_tickets() {
        let env = TestEnv::new().await;
        let store = MemoryStore::new();
        let ticket = RecordTicketArgs::new(
            TicketRef::new(Denomination::new(2), "1510"),
            Some("0".to_string()),
            "50",
        );
        ticket_record(env.config(), &store, &ticket).await.unwrap();
        set(&store, SectionKind::SalesTotals, "lotto", "10").await;
        set(&store, SectionKind::Sales, "lottoSales", "5").await;
        set(&store, SectionKind::SalesTotals, "gas", "200").await;
        set(&store, SectionKind::SalesTotals, "carWash", "7").await;
        set(&store, SectionKind::Money, "cash", "300").await;

        let out = totals(&store).await.unwrap();
        let report = out.structure().unwrap();
        let t = report.totals();
        assert_eq!(t.ticket_subtotal().to_string(), "100.00");
        assert_eq!(t.get("lotto").unwrap().to_string(), "115.00");
        assert_eq!(t.get("lottery").unwrap().to_string(), "100.00");
        assert_eq!(t.get("gas").unwrap().to_string(), "200.00");
        assert_eq!(t.get("deli").unwrap().to_string(), "0.00");
        assert_eq!(t.get("carWash").unwrap().to_string(), "7.00");
        assert_eq!(report.section_total(SectionKind::Money).to_string(), "300.00");
        // lottoSales 5 plus $100 of tickets.
        assert_eq!(report.section_total(SectionKind::Sales).to_string(), "105.00");
        assert_eq!(
            report.section_total(SectionKind::SalesTotals).to_string(),
            "217.00"
        );
        assert!(out.message().contains("lotto: $115.00"));
    }

    #[tokio::test]
    async fn test_totals_follow_ticket_deletion() {
        let env = TestEnv::new().await;
        let store = MemoryStore::new();
        for (number, close) in [("1510", "10"), ("1541", "5")] {
            let ticket = RecordTicketArgs::new(
                TicketRef::new(Denomination::new(2), number),
                Some("0".to_string()),
                close,
            );
            ticket_record(env.config(), &store, &ticket).await.unwrap();
        }
        let before = totals(&store).await.unwrap();
        assert_eq!(
            before.structure().unwrap().totals().ticket_subtotal().to_string(),
            "30.00"
        );

        ticket_delete(env.config(), &store, &TicketRef::new(Denomination::new(2), "1510"))
            .await
            .unwrap();
        let after = totals(&store).await.unwrap();
        let t = after.structure().unwrap().totals();
        assert_eq!(t.ticket_subtotal().to_string(), "10.00");
        assert_eq!(t.get("lottery").unwrap().to_string(), "10.00");
    }

    #[tokio::test]
    async fn test_totals_on_empty_store() {
        let store = MemoryStore::new();
        let out = totals(&store).await.unwrap();
        let t = out.structure().unwrap().totals();
        assert_eq!(t.iter().count(), 8);
        assert!(t.iter().all(|(_, v)| v.is_zero()));
    }
}
