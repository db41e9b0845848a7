use crate::model::{Amount, MonthRecords};
use rust_decimal::Decimal;
use tracing::debug;

/// Recomputes `cumulative_monthly_sale` for every recorded day from 1 through `through_day`.
///
/// Days are visited in ascending day order. Each recorded day adds its `monthly_sale` (blank or
/// malformed reads as zero) to a running total and stores the total to two decimal places.
/// Missing days contribute nothing and do not reset the total. Days after `through_day` and
/// every other field are passed through untouched.
///
/// There is no incremental path: an edit to any day changes every later day, so callers rerun
/// the whole scan after each edit.
pub fn recompute_cumulative(month: &MonthRecords, through_day: u32) -> MonthRecords {
    let mut out = month.clone();
    if through_day == 0 {
        return out;
    }
    let mut running = Decimal::ZERO;
    for (day, record) in out.records_mut().range_mut(1..=through_day) {
        running = running.saturating_add(Amount::lenient(&record.monthly_sale).value());
        record.cumulative_monthly_sale = Amount::new(running).to_plain_string();
        debug!("Day {day} cumulative monthly sale {}", record.cumulative_monthly_sale);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DailyFuelRecord;
    use std::collections::BTreeMap;

    fn month(sales: &[(u32, &str)]) -> MonthRecords {
        MonthRecords::new(
            sales
                .iter()
                .map(|(day, sale)| {
                    (
                        *day,
                        DailyFuelRecord {
                            monthly_sale: sale.to_string(),
                            ..Default::default()
                        },
                    )
                })
                .collect::<BTreeMap<_, _>>(),
        )
    }

    fn cumulative(month: &MonthRecords) -> Vec<(u32, String)> {
        month
            .iter()
            .map(|(d, r)| (*d, r.cumulative_monthly_sale.clone()))
            .collect()
    }

    #[test]
    fn test_blank_day_carries_running_total() {
        let out = recompute_cumulative(&month(&[(1, "10"), (2, ""), (3, "5")]), 3);
        assert_eq!(
            cumulative(&out),
            vec![
                (1, "10.00".to_string()),
                (2, "10.00".to_string()),
                (3, "15.00".to_string())
            ]
        );
    }

    #[test]
    fn test_edit_earlier_day_changes_later_days() {
        let mut records = recompute_cumulative(&month(&[(1, "10"), (2, ""), (3, "5")]), 3);
        records.set_monthly_sale(1, "20", 3);
        assert_eq!(
            cumulative(&records),
            vec![
                (1, "20.00".to_string()),
                (2, "20.00".to_string()),
                (3, "25.00".to_string())
            ]
        );
    }

    #[test]
    fn test_edit_leaves_earlier_days_alone() {
        let before = recompute_cumulative(&month(&[(1, "3"), (4, "4"), (9, "5"), (20, "6")]), 31);
        let mut after = before.clone();
        after.set_monthly_sale(9, "50", 31);
        for (day, record) in before.iter() {
            let edited = &after.get(*day).unwrap().cumulative_monthly_sale;
            if *day < 9 {
                assert_eq!(&record.cumulative_monthly_sale, edited);
            } else {
                assert_ne!(&record.cumulative_monthly_sale, edited);
            }
        }
        assert_eq!(after.get(20).unwrap().cumulative_monthly_sale, "63.00");
    }

    #[test]
    fn test_numeric_day_order() {
        // Lexicographic order would visit day 10 before day 2.
        let out = recompute_cumulative(&month(&[(10, "1"), (2, "2"), (1, "4")]), 31);
        assert_eq!(out.get(2).unwrap().cumulative_monthly_sale, "6.00");
        assert_eq!(out.get(10).unwrap().cumulative_monthly_sale, "7.00");
    }

    #[test]
    fn test_gaps_do_not_reset() {
        let out = recompute_cumulative(&month(&[(1, "1.5"), (15, "2.25"), (28, "x")]), 31);
        assert_eq!(out.get(15).unwrap().cumulative_monthly_sale, "3.75");
        assert_eq!(out.get(28).unwrap().cumulative_monthly_sale, "3.75");
    }

    #[test]
    fn test_days_after_through_day_untouched() {
        let mut records = month(&[(1, "1"), (5, "1")]);
        records
            .records_mut()
            .get_mut(&5)
            .unwrap()
            .cumulative_monthly_sale = "stale".to_string();
        let out = recompute_cumulative(&records, 4);
        assert_eq!(out.get(1).unwrap().cumulative_monthly_sale, "1.00");
        assert_eq!(out.get(5).unwrap().cumulative_monthly_sale, "stale");
    }

    #[test]
    fn test_other_fields_pass_through() {
        let mut records = month(&[(1, "8")]);
        records.records_mut().get_mut(&1).unwrap().opening_stock = "900".to_string();
        let out = recompute_cumulative(&records, 1);
        let day = out.get(1).unwrap();
        assert_eq!(day.opening_stock, "900");
        assert_eq!(day.monthly_sale, "8");
    }

    #[test]
    fn test_monotonic_for_non_negative_sales() {
        let sales: Vec<(u32, String)> = (1..=31).map(|d| (d, ((d * 7) % 5).to_string())).collect();
        let borrowed: Vec<(u32, &str)> = sales.iter().map(|(d, s)| (*d, s.as_str())).collect();
        let out = recompute_cumulative(&month(&borrowed), 31);
        let values: Vec<Decimal> = out
            .iter()
            .map(|(_, r)| Amount::lenient(&r.cumulative_monthly_sale).value())
            .collect();
        assert!(values.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_empty_month() {
        let out = recompute_cumulative(&MonthRecords::default(), 31);
        assert!(out.is_empty());
    }

    #[test]
    fn test_through_day_zero_changes_nothing() {
        let input = month(&[(1, "10"), (2, "5")]);
        assert_eq!(recompute_cumulative(&input, 0), input);
    }
}
