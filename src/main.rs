use clap::Parser;
use std::process::ExitCode;
use station_ledger::args::{
    Args, CatalogueSubcommand, Command, FuelSubcommand, SectionSubcommand, TicketSubcommand,
};
use station_ledger::{commands, Config, Result};
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().ledger_home().path();

    // Route to appropriate command handler
    let _: () = match args.command() {
        Command::Init => commands::init(home).await?.print(),

        Command::Ticket(ticket_args) => {
            let config = Config::load(home).await?;
            let store = config.store();
            match ticket_args.action() {
                TicketSubcommand::Record(args) => commands::ticket_record(&config, &store, args)
                    .await?
                    .print(),
                TicketSubcommand::Delete(args) => commands::ticket_delete(&config, &store, args)
                    .await?
                    .print(),
                TicketSubcommand::List => commands::ticket_list(&store).await?.print(),
            }
        }

        Command::Catalogue(catalogue_args) => {
            let config = Config::load(home).await?;
            let store = config.store();
            match catalogue_args.action() {
                CatalogueSubcommand::Add(args) => commands::catalogue_add(&config, &store, args)
                    .await?
                    .print(),
                CatalogueSubcommand::Delete(args) => {
                    commands::catalogue_delete(&config, &store, args)
                        .await?
                        .print()
                }
                CatalogueSubcommand::List => {
                    commands::catalogue_list(&config, &store).await?.print()
                }
            }
        }

        Command::Fuel(fuel_args) => {
            let store = Config::load(home).await?.store();
            match fuel_args.action() {
                FuelSubcommand::Record(args) => commands::fuel_record(&store, args).await?.print(),
                FuelSubcommand::Edit(args) => commands::fuel_edit(&store, args).await?.print(),
                FuelSubcommand::Show(args) => commands::fuel_show(&store, args).await?.print(),
            }
        }

        Command::Section(section_args) => {
            let store = Config::load(home).await?.store();
            match section_args.action() {
                SectionSubcommand::Set(args) => commands::section_set(&store, args).await?.print(),
                SectionSubcommand::RemoveField(args) => {
                    commands::section_remove_field(&store, args).await?.print()
                }
                SectionSubcommand::Clear(args) => {
                    commands::section_clear(&store, args).await?.print()
                }
                SectionSubcommand::Show(args) => {
                    commands::section_show(&store, args).await?.print()
                }
            }
        }

        Command::Totals => {
            let store = Config::load(home).await?.store();
            commands::totals(&store).await?.print()
        }

        Command::Clear(clear_args) => {
            let store = Config::load(home).await?.store();
            commands::clear(&store, clear_args).await?.print()
        }
    };
    Ok(())
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate only.
            EnvFilter::new(format!(
                "{}={},{}={}",
                env!("CARGO_CRATE_NAME"),
                level,
                env!("CARGO_PKG_NAME").replace('-', "_"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
