use crate::model::Amount;
use crate::Result;
use anyhow::bail;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The three independent ledger sections an operator fills in each day.
#[derive(
    Debug,
    Clone,
    Copy,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    /// Fuel and grocery sales entry.
    Sales,
    /// Sales totals entry, reconciled against `Sales` and ticket revenue.
    SalesTotals,
    /// Money management: payment methods, payouts and cash on hand.
    Money,
}

serde_plain::derive_display_from_serialize!(SectionKind);
serde_plain::derive_fromstr_from_deserialize!(SectionKind);

const SALES_FIELDS: &[&str] = &[
    "gasSales",
    "taxGrocerySales",
    "nonTaxGrocerySales",
    "deliSales",
    "lottoSales",
    "lotterySales",
    "salesTaxSales",
    "groceryPurchaseSales",
    "paidIn",
    "cashIn",
];

const SALES_TOTALS_FIELDS: &[&str] = &[
    "gas",
    "lotto",
    "lottery",
    "taxGrocery",
    "nontaxGrocery",
    "deli",
    "salesTax",
    "groceryPurchase",
];

const MONEY_FIELDS: &[&str] = &[
    "creditDebit",
    "storeCredit",
    "groceryPurchaseSales",
    "lotteryPaidOut",
    "lottoPaidOut",
    "cashInRegister",
    "cash",
    "check",
    "ebt",
    "cashToATM",
];

impl SectionKind {
    /// The fixed field set every section of this kind starts with.
    pub fn default_fields(&self) -> &'static [&'static str] {
        match self {
            SectionKind::Sales => SALES_FIELDS,
            SectionKind::SalesTotals => SALES_TOTALS_FIELDS,
            SectionKind::Money => MONEY_FIELDS,
        }
    }

    /// The key the section is persisted under.
    pub fn store_key(&self) -> &'static str {
        match self {
            SectionKind::Sales => "sales_entry",
            SectionKind::SalesTotals => "sales_totals",
            SectionKind::Money => "money",
        }
    }
}

/// A flat mapping from field name to the value the operator entered. It always contains the
/// default fields of its kind and may carry custom fields added at runtime.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LedgerSection {
    kind: SectionKind,
    fields: BTreeMap<String, String>,
}

impl LedgerSection {
    /// A section with every default field present and blank.
    pub fn new(kind: SectionKind) -> Self {
        let fields = kind
            .default_fields()
            .iter()
            .map(|f| (f.to_string(), String::new()))
            .collect();
        Self { kind, fields }
    }

    /// Builds a section from saved values. Missing default fields are added back blank.
    pub fn from_fields(kind: SectionKind, saved: BTreeMap<String, String>) -> Self {
        let mut section = Self::new(kind);
        section.fields.extend(saved);
        section
    }

    pub fn kind(&self) -> SectionKind {
        self.kind
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    /// The raw value of `key`, or `""` when the key is absent.
    pub fn raw(&self, key: &str) -> &str {
        self.fields.get(key).map(String::as_str).unwrap_or_default()
    }

    /// The value of `key` with malformed or missing input read as zero.
    pub fn value(&self, key: &str) -> Amount {
        Amount::lenient(self.raw(key))
    }

    pub fn is_default_field(&self, key: &str) -> bool {
        self.kind.default_fields().contains(&key)
    }

    /// Fields that are not part of the default set.
    pub fn custom_fields(&self) -> impl Iterator<Item = (&String, &String)> {
        self.fields
            .iter()
            .filter(|(k, _)| !self.is_default_field(k))
    }

    /// Sets `key` to `value`. Unknown keys become custom fields; their first letter is lowercased
    /// so that `Car Wash` and `car Wash` land on the same field.
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> Result<String> {
        let key = normalize_field_name(key)?;
        let _ = self.fields.insert(key.clone(), value.into());
        Ok(key)
    }

    /// Removes a custom field. Default fields cannot be removed.
    pub fn remove_field(&mut self, key: &str) -> Result<Option<String>> {
        if self.is_default_field(key) {
            bail!("'{key}' is a default {} field and cannot be removed", self.kind)
        }
        Ok(self.fields.remove(key))
    }

    /// Blanks every value. The sales entry also drops its custom fields; the other kinds keep
    /// theirs in place.
    pub fn clear(&mut self) {
        if self.kind == SectionKind::Sales {
            let defaults = self.kind.default_fields();
            self.fields.retain(|k, _| defaults.contains(&k.as_str()));
        }
        for value in self.fields.values_mut() {
            value.clear();
        }
    }

    /// Sum over every field, custom fields included.
    pub fn sum(&self) -> Amount {
        self.fields.values().map(|v| Amount::lenient(v)).sum()
    }
}

fn normalize_field_name(key: &str) -> Result<String> {
    let trimmed = key.trim();
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => Ok(first.to_lowercase().chain(chars).collect()),
        None => bail!("A field name cannot be empty"),
    }
}
