use crate::args::{FieldRef, SectionRef, SetFieldArgs};
use crate::commands::{load_section, load_tickets, save_section, Out};
use crate::model::{Amount, LedgerSection, SectionKind};
use crate::store::Store;
use crate::Result;
use anyhow::bail;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write;

/// A section's fields together with their sum. The sales entry's grand total also carries the
/// ticket subtotal.
#[derive(Debug, Clone, Serialize)]
pub struct SectionReport {
    section: SectionKind,
    fields: BTreeMap<String, String>,
    custom_fields: Vec<String>,
    sum: Amount,
    ticket_subtotal: Option<Amount>,
    total: Amount,
}

impl SectionReport {
    fn new(section: &LedgerSection, ticket_subtotal: Option<Amount>) -> Self {
        let sum = section.sum();
        Self {
            section: section.kind(),
            fields: section.fields().clone(),
            custom_fields: section.custom_fields().map(|(k, _)| k.clone()).collect(),
            sum,
            ticket_subtotal,
            total: sum + ticket_subtotal.unwrap_or_default(),
        }
    }

    /// Builds the report, loading the ticket subtotal when `section` is the sales entry.
    pub(crate) async fn load<S: Store + ?Sized>(store: &S, section: &LedgerSection) -> Result<Self> {
        let ticket_subtotal = match section.kind() {
            SectionKind::Sales => Some(Amount::from(load_tickets(store).await?.subtotal())),
            SectionKind::SalesTotals | SectionKind::Money => None,
        };
        Ok(Self::new(section, ticket_subtotal))
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    pub fn custom_fields(&self) -> &[String] {
        &self.custom_fields
    }

    /// The plain sum of the section's fields.
    pub fn sum(&self) -> Amount {
        self.sum
    }

    pub fn ticket_subtotal(&self) -> Option<Amount> {
        self.ticket_subtotal
    }

    /// `sum` plus the ticket subtotal, if the section carries one.
    pub fn total(&self) -> Amount {
        self.total
    }
}

/// Sets a field, adding it as a custom field if the section does not have it yet.
pub async fn section_set<S: Store + ?Sized>(
    store: &S,
    args: &SetFieldArgs,
) -> Result<Out<SectionReport>> {
    let mut section = load_section(store, args.section()).await?;
    let before = section.fields().len();
    let key = section.set(args.key(), args.value())?;
    let added = section.fields().len() > before;
    save_section(store, &section).await?;

    let report = SectionReport::load(store, &section).await?;
    let verb = if added { "Added" } else { "Set" };
    Ok(Out::new(
        format!(
            "{verb} {} field {key}, the section total is now {}",
            args.section(),
            report.total()
        ),
        report,
    ))
}

/// Removes a custom field.
pub async fn section_remove_field<S: Store + ?Sized>(
    store: &S,
    args: &FieldRef,
) -> Result<Out<SectionReport>> {
    let mut section = load_section(store, args.section()).await?;
    if section.remove_field(args.key())?.is_none() {
        bail!("The {} section has no field '{}'", args.section(), args.key())
    }
    save_section(store, &section).await?;
    let report = SectionReport::load(store, &section).await?;
    Ok(Out::new(
        format!(
            "Removed {} field {}, the section total is now {}",
            args.section(),
            args.key(),
            report.total()
        ),
        report,
    ))
}

/// Blanks every value of a section. Clearing the sales entry also drops its custom fields.
pub async fn section_clear<S: Store + ?Sized>(
    store: &S,
    args: &SectionRef,
) -> Result<Out<SectionReport>> {
    let mut section = load_section(store, args.section()).await?;
    section.clear();
    save_section(store, &section).await?;
    Ok(Out::new(
        format!("Cleared the {} section", args.section()),
        SectionReport::load(store, &section).await?,
    ))
}

pub async fn section_show<S: Store + ?Sized>(
    store: &S,
    args: &SectionRef,
) -> Result<Out<SectionReport>> {
    let section = load_section(store, args.section()).await?;
    let report = SectionReport::load(store, &section).await?;
    let mut message = format!("{} section:", args.section());
    for (key, value) in section.fields() {
        let marker = if section.is_default_field(key) { "" } else { " (custom)" };
        let _ = write!(message, "\n  {key}{marker}: {}", section.value(key));
        if !value.is_empty() && value.parse::<Amount>().is_err() {
            let _ = write!(message, " (entered '{value}', read as zero)");
        }
    }
    if let Some(tickets) = report.ticket_subtotal() {
        let _ = write!(message, "\n  ticket subtotal: {tickets}");
    }
    let _ = write!(message, "\nTotal: {}", report.total());
    Ok(Out::new(message, report))
}
