use crate::engine::recompute_cumulative;
use crate::model::Amount;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::warn;

/// The two fuel grades the station tracks.
#[derive(
    Debug,
    Default,
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
pub enum FuelType {
    #[default]
    #[serde(alias = "gas")]
    #[value(alias = "gas")]
    Primary,
    #[serde(alias = "diesel")]
    #[value(alias = "diesel")]
    Secondary,
}

serde_plain::derive_display_from_serialize!(FuelType);
serde_plain::derive_fromstr_from_deserialize!(FuelType);

/// One day's fuel entry. Every field is kept as the operator typed it.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DailyFuelRecord {
    pub opening_stock: String,
    pub today_sale: String,
    pub new_stock: String,
    /// The sale attributed to this day.
    pub monthly_sale: String,
    /// Running sum of `monthly_sale` from day 1 through this day. Derived, never entered.
    pub cumulative_monthly_sale: String,
}

impl DailyFuelRecord {
    /// Stock left at the end of the day: `opening_stock - today_sale + new_stock`.
    pub fn closing_stock(&self) -> Amount {
        let opening = Amount::lenient(&self.opening_stock).value();
        let sale = Amount::lenient(&self.today_sale).value();
        let new_stock = Amount::lenient(&self.new_stock).value();
        Amount::new(opening.saturating_sub(sale).saturating_add(new_stock))
    }

    /// Overlays the non-empty fields of `other` onto `self`. The cumulative value is left alone.
    pub(crate) fn merge_entered(&mut self, other: &DailyFuelRecord) {
        let overlay = |dst: &mut String, src: &String| {
            if !src.is_empty() {
                dst.clone_from(src);
            }
        };
        overlay(&mut self.opening_stock, &other.opening_stock);
        overlay(&mut self.today_sale, &other.today_sale);
        overlay(&mut self.new_stock, &other.new_stock);
        overlay(&mut self.monthly_sale, &other.monthly_sale);
    }
}

/// The records of one month for one fuel type, keyed and ordered by day number. Stored day keys
/// are read through [`MonthRecords::from_raw`].
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MonthRecords(BTreeMap<u32, DailyFuelRecord>);

impl<'de> Deserialize<'de> for MonthRecords {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        HashMap::<String, DailyFuelRecord>::deserialize(deserializer).map(Self::from_raw)
    }
}

impl MonthRecords {
    pub fn new(records: BTreeMap<u32, DailyFuelRecord>) -> Self {
        Self(records)
    }

    /// Builds from records keyed by day strings. Keys are parsed as integers so that day `10`
    /// sorts after day `2`; keys that are not day numbers are dropped.
    pub fn from_raw(raw: HashMap<String, DailyFuelRecord>) -> Self {
        let mut records = BTreeMap::new();
        for (key, record) in raw {
            match key.trim().parse::<u32>() {
                Ok(day) => {
                    let _ = records.insert(day, record);
                }
                Err(_) => warn!("Ignoring fuel record with a day key of '{key}'"),
            }
        }
        Self(records)
    }

    pub fn get(&self, day: u32) -> Option<&DailyFuelRecord> {
        self.0.get(&day)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&u32, &DailyFuelRecord)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn records_mut(&mut self) -> &mut BTreeMap<u32, DailyFuelRecord> {
        &mut self.0
    }

    /// Enters the fields of `record` for `day`, then rescans cumulative sales through
    /// `through_day`.
    pub fn upsert(&mut self, day: u32, record: &DailyFuelRecord, through_day: u32) {
        self.0.entry(day).or_default().merge_entered(record);
        *self = recompute_cumulative(self, through_day.max(day));
    }

    /// Replaces the monthly sale of `day` (an empty value clears it), then rescans cumulative
    /// sales through `through_day`.
    pub fn set_monthly_sale(&mut self, day: u32, value: impl Into<String>, through_day: u32) {
        self.0.entry(day).or_default().monthly_sale = value.into();
        *self = recompute_cumulative(self, through_day.max(day));
    }
}

/// Fuel records for every fuel type and month.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FuelLedger(BTreeMap<FuelType, BTreeMap<u32, MonthRecords>>);

impl FuelLedger {
    pub fn month(&self, fuel: FuelType, month: u32) -> Option<&MonthRecords> {
        self.0.get(&fuel).and_then(|months| months.get(&month))
    }

    pub fn month_mut(&mut self, fuel: FuelType, month: u32) -> &mut MonthRecords {
        self.0.entry(fuel).or_default().entry(month).or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(|months| months.is_empty())
    }
}
