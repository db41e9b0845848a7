use crate::args::TicketRef;
use crate::commands::{load_catalogue, save_catalogue, Out};
use crate::model::Catalogue;
use crate::store::Store;
use crate::{Config, Result};
use anyhow::bail;
use std::fmt::Write;

/// Adds a ticket number to its denomination's list.
pub async fn catalogue_add<S: Store + ?Sized>(
    config: &Config,
    store: &S,
    args: &TicketRef,
) -> Result<Out<Catalogue>> {
    let category = args.denomination().to_string();
    let mut catalogue = load_catalogue(config, store).await?;
    if !catalogue.add(&category, args.ticket()) {
        return Ok(Out::new(
            format!("{category} ticket {} is already catalogued", args.ticket()),
            catalogue,
        ));
    }
    save_catalogue(store, &catalogue).await?;
    Ok(Out::new(
        format!("Added {category} ticket {}", args.ticket()),
        catalogue,
    ))
}

/// Removes a ticket number from its denomination's list. Recorded readings are left alone.
pub async fn catalogue_delete<S: Store + ?Sized>(
    config: &Config,
    store: &S,
    args: &TicketRef,
) -> Result<Out<Catalogue>> {
    let category = args.denomination().to_string();
    let mut catalogue = load_catalogue(config, store).await?;
    if !catalogue.remove(&category, args.ticket()) {
        bail!("{category} ticket {} is not in the catalogue", args.ticket())
    }
    save_catalogue(store, &catalogue).await?;

    let mut message = format!("Removed {category} ticket {}", args.ticket());
    if config.default_catalogue().contains(&category, args.ticket()) {
        let _ = write!(
            message,
            ". It is a default in {} and will be merged back on the next load",
            config.config_path().display()
        );
    }
    Ok(Out::new(message, catalogue))
}

/// Shows the configured defaults merged with the saved entries.
pub async fn catalogue_list<S: Store + ?Sized>(
    config: &Config,
    store: &S,
) -> Result<Out<Catalogue>> {
    let catalogue = load_catalogue(config, store).await?;
    let mut message = String::new();
    for (category, entries) in catalogue.categories() {
        let _ = writeln!(message, "{category}: {}", entries.join(", "));
    }
    if message.is_empty() {
        message.push_str("The catalogue is empty");
    }
    Ok(Out::new(message.trim_end(), catalogue))
}
