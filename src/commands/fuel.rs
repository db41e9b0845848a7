use crate::args::{EditFuelArgs, RecordFuelArgs, ShowFuelArgs};
use crate::commands::{load_fuel, save_fuel, Out};
use crate::model::{Amount, DailyFuelRecord, FuelType, MonthRecords};
use crate::store::Store;
use crate::Result;
use anyhow::bail;
use chrono::Datelike;
use serde::Serialize;
use std::fmt::Write;
use tracing::trace;

/// The most days each month can have. Records carry no year, so February allows 29.
const DAYS_IN_MONTH: [u32; 12] = [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// One day of fuel figures with its derived closing stock.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelDay {
    day: u32,
    #[serde(flatten)]
    record: DailyFuelRecord,
    closing_stock: Amount,
}

impl FuelDay {
    fn new(day: u32, record: &DailyFuelRecord) -> Self {
        Self {
            day,
            record: record.clone(),
            closing_stock: record.closing_stock(),
        }
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn record(&self) -> &DailyFuelRecord {
        &self.record
    }

    pub fn closing_stock(&self) -> Amount {
        self.closing_stock
    }
}

/// A month of fuel records for one fuel type, in day order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelMonth {
    fuel: FuelType,
    month: u32,
    days: Vec<FuelDay>,
}

impl FuelMonth {
    fn new(fuel: FuelType, month: u32, records: &MonthRecords) -> Self {
        Self {
            fuel,
            month,
            days: records.iter().map(|(d, r)| FuelDay::new(*d, r)).collect(),
        }
    }

    pub fn days(&self) -> &[FuelDay] {
        &self.days
    }
}

/// Enters the given figures for a day and recomputes the month's cumulative sales. Month and day
/// default to today.
pub async fn fuel_record<S: Store + ?Sized>(
    store: &S,
    args: &RecordFuelArgs,
) -> Result<Out<FuelDay>> {
    let today = chrono::Local::now().date_naive();
    let month = args.month().unwrap_or_else(|| today.month());
    let day = args.day().unwrap_or_else(|| today.day());
    let through_day = last_day_of(month, day)?;

    let entered = DailyFuelRecord {
        opening_stock: args.opening_stock().unwrap_or_default().to_string(),
        today_sale: args.today_sale().unwrap_or_default().to_string(),
        new_stock: args.new_stock().unwrap_or_default().to_string(),
        monthly_sale: args.monthly_sale().unwrap_or_default().to_string(),
        cumulative_monthly_sale: String::new(),
    };
    if entered == DailyFuelRecord::default() {
        bail!(
            "Nothing to record, pass at least one of --opening-stock, --today-sale, --new-stock \
            or --monthly-sale"
        )
    }
    trace!("Entering {entered:?} for {} {month}/{day}", args.fuel());

    let mut fuel = load_fuel(store).await?;
    let records = fuel.month_mut(args.fuel(), month);
    records.upsert(day, &entered, through_day);
    let out = day_out(args.fuel(), month, day, records)?;
    save_fuel(store, &fuel).await?;
    Ok(out)
}

/// Replaces the monthly sale of an existing or new day and recomputes the month.
pub async fn fuel_edit<S: Store + ?Sized>(store: &S, args: &EditFuelArgs) -> Result<Out<FuelDay>> {
    let through_day = last_day_of(args.month(), args.day())?;
    let mut fuel = load_fuel(store).await?;
    let records = fuel.month_mut(args.fuel(), args.month());
    records.set_monthly_sale(args.day(), args.monthly_sale(), through_day);
    let out = day_out(args.fuel(), args.month(), args.day(), records)?;
    save_fuel(store, &fuel).await?;
    Ok(out)
}

/// Shows a month's records with their closing stock. The month defaults to the current one.
pub async fn fuel_show<S: Store + ?Sized>(store: &S, args: &ShowFuelArgs) -> Result<Out<FuelMonth>> {
    let month = args
        .month()
        .unwrap_or_else(|| chrono::Local::now().date_naive().month());
    let fuel = load_fuel(store).await?;
    let records = fuel.month(args.fuel(), month).cloned().unwrap_or_default();
    if records.is_empty() {
        return Ok(Out::new(
            format!("There are no {} records for month {month}", args.fuel()),
            FuelMonth::new(args.fuel(), month, &records),
        ));
    }

    let mut message = format!("{} records for month {month}:", args.fuel());
    for (day, record) in records.iter() {
        let _ = write!(
            message,
            "\n  {day:>2}: opening {}, sale {}, new {}, closing {}, monthly {}, cumulative {}",
            blank_as_dash(&record.opening_stock),
            blank_as_dash(&record.today_sale),
            blank_as_dash(&record.new_stock),
            record.closing_stock(),
            blank_as_dash(&record.monthly_sale),
            blank_as_dash(&record.cumulative_monthly_sale),
        );
    }
    Ok(Out::new(message, FuelMonth::new(args.fuel(), month, &records)))
}

fn last_day_of(month: u32, day: u32) -> Result<u32> {
    let Some(last) = month
        .checked_sub(1)
        .and_then(|i| DAYS_IN_MONTH.get(i as usize))
        .copied()
    else {
        bail!("{month} is not a month, expected 1 through 12")
    };
    if day == 0 || day > last {
        bail!("Month {month} has no day {day}")
    }
    Ok(last)
}

fn day_out(fuel: FuelType, month: u32, day: u32, records: &MonthRecords) -> Result<Out<FuelDay>> {
    let Some(record) = records.get(day) else {
        bail!("The {fuel} record for {month}/{day} is missing after the update")
    };
    let message = format!(
        "{fuel} {month}/{day}: closing stock {}, cumulative monthly sale {}",
        record.closing_stock(),
        record.cumulative_monthly_sale
    );
    Ok(Out::new(message, FuelDay::new(day, record)))
}

fn blank_as_dash(s: &str) -> &str {
    if s.is_empty() {
        "-"
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn sale(fuel: FuelType, month: u32, day: u32, value: &str) -> RecordFuelArgs {
        RecordFuelArgs::new(fuel, Some(month), Some(day)).with_monthly_sale(value)
    }

    fn cumulative(out: &Out<FuelMonth>) -> Vec<(u32, String)> {
        out.structure()
            .unwrap()
            .days()
            .iter()
            .map(|d| (d.day(), d.record().cumulative_monthly_sale.clone()))
            .collect()
    }

    #[tokio::test]
    async fn test_record_days_accumulate() {
        let store = MemoryStore::new();
        fuel_record(&store, &sale(FuelType::Primary, 3, 1, "100"))
            .await
            .unwrap();
        fuel_record(&store, &sale(FuelType::Primary, 3, 2, "50.5"))
            .await
            .unwrap();
        let out = fuel_record(&store, &sale(FuelType::Primary, 3, 3, ""))
            .await
            .unwrap_err();
        assert!(out.to_string().contains("Nothing to record"));

        let day3 = RecordFuelArgs::new(FuelType::Primary, Some(3), Some(3)).with_today_sale("7");
        fuel_record(&store, &day3).await.unwrap();

        let shown = fuel_show(&store, &ShowFuelArgs::new(FuelType::Primary, Some(3)))
            .await
            .unwrap();
        assert_eq!(
            cumulative(&shown),
            vec![
                (1, "100.00".to_string()),
                (2, "150.50".to_string()),
                (3, "150.50".to_string())
            ]
        );
    }

    #[tokio::test]
    async fn test_edit_earlier_day_updates_later_days() {
        let store = MemoryStore::new();
        for (day, value) in [(1, "10"), (2, "20"), (10, "5")] {
            fuel_record(&store, &sale(FuelType::Secondary, 7, day, value))
                .await
                .unwrap();
        }
        let out = fuel_edit(&store, &EditFuelArgs::new(FuelType::Secondary, 7, 1, "15"))
            .await
            .unwrap();
        assert_eq!(out.structure().unwrap().record().cumulative_monthly_sale, "15.00");

        let shown = fuel_show(&store, &ShowFuelArgs::new(FuelType::Secondary, Some(7)))
            .await
            .unwrap();
        assert_eq!(
            cumulative(&shown),
            vec![
                (1, "15.00".to_string()),
                (2, "35.00".to_string()),
                (10, "40.00".to_string())
            ]
        );
    }

    #[tokio::test]
    async fn test_record_keeps_other_fields() {
        let store = MemoryStore::new();
        let first = RecordFuelArgs::new(FuelType::Primary, Some(1), Some(5))
            .with_opening_stock("1000")
            .with_today_sale("200");
        fuel_record(&store, &first).await.unwrap();
        let second = RecordFuelArgs::new(FuelType::Primary, Some(1), Some(5)).with_new_stock("500");
        let out = fuel_record(&store, &second).await.unwrap();
        let day = out.structure().unwrap();
        assert_eq!(day.record().opening_stock, "1000");
        assert_eq!(day.closing_stock().value().to_string(), "1300");
    }

    #[tokio::test]
    async fn test_fuel_types_and_months_are_separate() {
        let store = MemoryStore::new();
        fuel_record(&store, &sale(FuelType::Primary, 4, 1, "10"))
            .await
            .unwrap();
        fuel_record(&store, &sale(FuelType::Secondary, 4, 1, "99"))
            .await
            .unwrap();
        let out = fuel_record(&store, &sale(FuelType::Primary, 5, 1, "1"))
            .await
            .unwrap();
        assert_eq!(out.structure().unwrap().record().cumulative_monthly_sale, "1.00");

        let april = fuel_show(&store, &ShowFuelArgs::new(FuelType::Primary, Some(4)))
            .await
            .unwrap();
        assert_eq!(cumulative(&april), vec![(1, "10.00".to_string())]);
    }

    #[tokio::test]
    async fn test_rejects_impossible_days() {
        let store = MemoryStore::new();
        assert!(fuel_record(&store, &sale(FuelType::Primary, 4, 31, "1"))
            .await
            .is_err());
        assert!(fuel_edit(&store, &EditFuelArgs::new(FuelType::Primary, 2, 30, "1"))
            .await
            .is_err());
        assert!(fuel_edit(&store, &EditFuelArgs::new(FuelType::Primary, 2, 29, "1"))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_show_empty_month() {
        let store = MemoryStore::new();
        let out = fuel_show(&store, &ShowFuelArgs::new(FuelType::Primary, Some(12)))
            .await
            .unwrap();
        assert!(out.message().contains("no primary records"));
        assert!(out.structure().unwrap().days().is_empty());
    }
}
