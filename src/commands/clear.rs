use crate::args::ClearArgs;
use crate::commands::Out;
use crate::model::SectionKind;
use crate::store::{Store, FUEL_KEY, TICKETS_KEY};
use crate::Result;
use serde::Serialize;
use tracing::debug;

/// The store keys that were cleared.
#[derive(Debug, Clone, Serialize)]
pub struct Cleared {
    keys: Vec<String>,
}

impl Cleared {
    pub fn keys(&self) -> &[String] {
        &self.keys
    }
}

/// Clears the current period's data: ticket readings and, unless `--tickets-only` is given, the
/// fuel records and every section. The ticket catalogue is never cleared.
pub async fn clear<S: Store + ?Sized>(store: &S, args: &ClearArgs) -> Result<Out<Cleared>> {
    let mut keys = vec![TICKETS_KEY];
    if !args.tickets_only() {
        keys.push(FUEL_KEY);
        keys.extend(
            [SectionKind::Sales, SectionKind::SalesTotals, SectionKind::Money]
                .iter()
                .map(|k| k.store_key()),
        );
    }

    for key in &keys {
        debug!("Clearing '{key}'");
        store.remove(key).await?;
    }

    let message = if args.tickets_only() {
        "Cleared the ticket readings"
    } else {
        "Cleared the ticket readings, fuel records and ledger sections"
    };
    Ok(Out::new(
        message,
        Cleared {
            keys: keys.into_iter().map(String::from).collect(),
        },
    ))
}
