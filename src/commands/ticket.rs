use crate::args::{RecordTicketArgs, TicketRef};
use crate::commands::{load_catalogue, load_tickets, save_catalogue, save_tickets, Out};
use crate::model::{Amount, AmountFormat, Denomination, Ticket, TicketLedger};
use crate::store::Store;
use crate::{Config, Result};
use anyhow::bail;
use serde::Serialize;
use std::fmt::Write;
use tracing::{debug, info};

/// The outcome of recording a ticket's readings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketRecorded {
    denomination: Denomination,
    ticket: String,
    #[serde(flatten)]
    readings: Ticket,
    /// The denomination group's `absTotal` after the edit.
    group_total: i64,
    /// The ticket subtotal across all groups after the edit.
    subtotal: i64,
}

impl TicketRecorded {
    pub fn readings(&self) -> &Ticket {
        &self.readings
    }

    pub fn group_total(&self) -> i64 {
        self.group_total
    }

    pub fn subtotal(&self) -> i64 {
        self.subtotal
    }
}

/// Records the open and close readings of a ticket and recomputes its group.
///
/// When no open reading is given, the ticket's last recorded close carries forward as the open.
/// A ticket number the catalogue does not know yet is added to it.
pub async fn ticket_record<S: Store + ?Sized>(
    config: &Config,
    store: &S,
    args: &RecordTicketArgs,
) -> Result<Out<TicketRecorded>> {
    let denomination = args.ticket().denomination();
    let number = args.ticket().ticket();
    let mut tickets = load_tickets(store).await?;

    let open = match args.open() {
        Some(open) => open.to_string(),
        None => match tickets.group(denomination).and_then(|g| g.get(number)) {
            Some(previous) => {
                debug!(
                    "Carrying forward close {} as the open for {denomination} ticket {number}",
                    previous.next_open()
                );
                previous.next_open().to_string()
            }
            None => bail!(
                "There is no earlier close for {denomination} ticket {number}, pass --open"
            ),
        },
    };

    let readings = tickets
        .record(config.denominations(), denomination, number, open, args.close())
        .clone();
    save_tickets(store, &tickets).await?;

    let mut catalogue = load_catalogue(config, store).await?;
    if catalogue.add(denomination.to_string(), number) {
        info!("Added {denomination} ticket {number} to the catalogue");
        save_catalogue(store, &catalogue).await?;
    }

    let group_total = tickets
        .group(denomination)
        .map(|g| g.abs_total())
        .unwrap_or_default();
    let subtotal = tickets.subtotal();
    let message = format!(
        "{denomination} ticket {number}: sold {}, total {}. {denomination} total {}, ticket \
        subtotal {}",
        readings.total_sold(),
        dollars(readings.total()),
        dollars(group_total),
        dollars(subtotal),
    );
    Ok(Out::new(
        message,
        TicketRecorded {
            denomination,
            ticket: number.to_string(),
            readings,
            group_total,
            subtotal,
        },
    ))
}

/// Removes a ticket's readings and its catalogue entry.
pub async fn ticket_delete<S: Store + ?Sized>(
    config: &Config,
    store: &S,
    args: &TicketRef,
) -> Result<Out<()>> {
    let denomination = args.denomination();
    let number = args.ticket();

    let mut tickets = load_tickets(store).await?;
    let removed = tickets.remove(denomination, number);
    if removed.is_some() {
        save_tickets(store, &tickets).await?;
    }

    let mut catalogue = load_catalogue(config, store).await?;
    let uncatalogued = catalogue.remove(&denomination.to_string(), number);
    if uncatalogued {
        save_catalogue(store, &catalogue).await?;
    }

    if removed.is_none() && !uncatalogued {
        bail!("{denomination} ticket {number} was not found")
    }

    let mut message = format!(
        "Deleted {denomination} ticket {number}, ticket subtotal is now {}",
        dollars(tickets.subtotal())
    );
    if config
        .default_catalogue()
        .contains(&denomination.to_string(), number)
    {
        // Defaults are merged back in on every load.
        let _ = write!(
            message,
            ". It is listed in the default catalogue of {} and will reappear until it is removed \
            there",
            config.config_path().display()
        );
    }
    Ok(message.into())
}

/// Lists every recorded ticket with its group totals.
pub async fn ticket_list<S: Store + ?Sized>(store: &S) -> Result<Out<TicketLedger>> {
    let tickets = load_tickets(store).await?;
    if tickets.is_empty() {
        return Ok(Out::new("No tickets have been recorded", tickets));
    }

    let mut message = String::new();
    for (denomination, group) in tickets.groups() {
        let _ = writeln!(message, "{denomination}: {}", dollars(group.abs_total()));
        for (number, ticket) in group.tickets() {
            let _ = writeln!(
                message,
                "  {number}: open {}, close {}, sold {}, total {}",
                ticket.open(),
                ticket.close(),
                ticket.total_sold(),
                dollars(ticket.total())
            );
        }
    }
    let _ = write!(message, "Ticket subtotal: {}", dollars(tickets.subtotal()));
    Ok(Out::new(message, tickets))
}

fn dollars(value: i64) -> Amount {
    Amount::from(value).with_format(AmountFormat::DOLLARS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::test::TestEnv;

    fn record(price: u32, ticket: &str, open: Option<&str>, close: &str) -> RecordTicketArgs {
        RecordTicketArgs::new(
            TicketRef::new(Denomination::new(price), ticket),
            open.map(str::to_string),
            close,
        )
    }

    #[tokio::test]
    async fn test_record_computes_totals() {
        let env = TestEnv::new().await;
        let store = MemoryStore::new();
        let out = ticket_record(env.config(), &store, &record(2, "1510", Some("0"), "10"))
            .await
            .unwrap();
        let recorded = out.structure().unwrap();
        assert_eq!(recorded.readings().total_sold(), 10);
        assert_eq!(recorded.readings().total(), 20);
        assert_eq!(recorded.group_total(), 20);
        assert_eq!(recorded.subtotal(), 20);
    }

    #[tokio::test]
    async fn test_record_wraps_roll() {
        let env = TestEnv::new().await;
        let store = MemoryStore::new();
        let out = ticket_record(env.config(), &store, &record(5, "7023", Some("50"), "10"))
            .await
            .unwrap();
        let recorded = out.structure().unwrap();
        assert_eq!(recorded.readings().total_sold(), 20);
        assert_eq!(recorded.readings().total(), 100);
    }

    #[tokio::test]
    async fn test_record_carries_close_forward() {
        let env = TestEnv::new().await;
        let store = MemoryStore::new();
        ticket_record(env.config(), &store, &record(1, "1544", Some("0"), "40"))
            .await
            .unwrap();
        let out = ticket_record(env.config(), &store, &record(1, "1544", None, "55"))
            .await
            .unwrap();
        let recorded = out.structure().unwrap();
        assert_eq!(recorded.readings().open(), "40");
        assert_eq!(recorded.readings().total_sold(), 15);
        assert_eq!(recorded.subtotal(), 15);
    }

    #[tokio::test]
    async fn test_record_without_open_or_history_fails() {
        let env = TestEnv::new().await;
        let store = MemoryStore::new();
        let result = ticket_record(env.config(), &store, &record(1, "1544", None, "5")).await;
        assert!(result.unwrap_err().to_string().contains("--open"));
    }

    #[tokio::test]
    async fn test_record_adds_unknown_ticket_to_catalogue() {
        let env = TestEnv::new().await;
        let store = MemoryStore::new();
        ticket_record(env.config(), &store, &record(3, "9999", Some("0"), "1"))
            .await
            .unwrap();
        let catalogue = load_catalogue(env.config(), &store).await.unwrap();
        assert!(catalogue.contains("$3", "9999"));
        // Defaults are still there.
        assert!(catalogue.contains("$3", "1531"));
    }

    #[tokio::test]
    async fn test_delete_updates_subtotal_and_catalogue() {
        let env = TestEnv::new().await;
        let store = MemoryStore::new();
        ticket_record(env.config(), &store, &record(3, "9999", Some("0"), "2"))
            .await
            .unwrap();
        ticket_record(env.config(), &store, &record(3, "8888", Some("0"), "1"))
            .await
            .unwrap();

        let out = ticket_delete(env.config(), &store, &TicketRef::new(Denomination::new(3), "9999"))
            .await
            .unwrap();
        assert!(out.message().contains("$3.00"));

        let tickets = load_tickets(&store).await.unwrap();
        assert_eq!(tickets.subtotal(), 3);
        let catalogue = load_catalogue(env.config(), &store).await.unwrap();
        assert!(!catalogue.contains("$3", "9999"));
        assert!(catalogue.contains("$3", "8888"));
    }

    #[tokio::test]
    async fn test_delete_default_entry_warns() {
        let env = TestEnv::new().await;
        let store = MemoryStore::new();
        let out = ticket_delete(env.config(), &store, &TicketRef::new(Denomination::new(30), "5048"))
            .await
            .unwrap();
        assert!(out.message().contains("default catalogue"));
    }

    #[tokio::test]
    async fn test_delete_unknown_fails() {
        let env = TestEnv::new().await;
        let store = MemoryStore::new();
        let result =
            ticket_delete(env.config(), &store, &TicketRef::new(Denomination::new(30), "0")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_list_with_file_store() {
        let env = TestEnv::new().await;
        let store = env.store();
        let empty = ticket_list(&store).await.unwrap();
        assert!(empty.structure().unwrap().is_empty());

        ticket_record(env.config(), &store, &record(10, "1547", Some("5"), "8"))
            .await
            .unwrap();
        let out = ticket_list(&store).await.unwrap();
        assert!(out.message().contains("1547"));
        assert!(out.message().contains("Ticket subtotal: $30.00"));
        assert_eq!(out.structure().unwrap().subtotal(), 30);
    }
}
