use crate::models::{DailySeriesPoint, ShiftEfficiency, ShiftMetrics, ShiftRecord, ShiftType};
use chrono::{Datelike, Weekday};
use std::collections::BTreeMap;

/// Reduces history into the ASPH and walk-in baseline for one shift type.
///
/// Records on `target_weekday` are preferred; when none exist the whole
/// shift history is used instead. The footfall multiplier is damped per
/// shift before it scales the walk-in average.
pub fn compute_metrics(
    records: &[ShiftRecord],
    shift: ShiftType,
    target_weekday: Option<Weekday>,
    footfall_multiplier: f64,
) -> ShiftMetrics {
    let shift_records: Vec<&ShiftRecord> =
        records.iter().filter(|record| record.shift == shift).collect();

    let same_day: Vec<&ShiftRecord> = match target_weekday {
        Some(weekday) => shift_records
            .iter()
            .copied()
            .filter(|record| record.date.weekday() == weekday)
            .collect(),
        None => Vec::new(),
    };

    let day_matched = !same_day.is_empty();
    let relevant = if day_matched { same_day } else { shift_records };

    let total_sales: f64 = relevant.iter().map(|record| record.sales).sum();
    let total_covers: u64 = relevant.iter().map(|record| u64::from(record.covers)).sum();
    let total_walkins: u64 = relevant.iter().map(|record| u64::from(record.walkins)).sum();

    let raw_avg_walkins = total_walkins as f64 / relevant.len().max(1) as f64;

    ShiftMetrics {
        asph: total_sales / total_covers.max(1) as f64,
        avg_walkins: raw_avg_walkins * effective_multiplier(shift, footfall_multiplier),
        sample_size: relevant.len(),
        day_matched,
    }
}

pub fn effective_multiplier(shift: ShiftType, footfall_multiplier: f64) -> f64 {
    let multiplier = if footfall_multiplier.is_finite() {
        footfall_multiplier.max(0.0)
    } else {
        1.0
    };
    1.0 + (multiplier - 1.0) * shift.footfall_sensitivity()
}

pub fn shift_efficiency(records: &[ShiftRecord], shift: ShiftType) -> ShiftEfficiency {
    let mut sales = 0.0;
    let mut staff = 0u64;
    let mut covers = 0u64;
    for record in records.iter().filter(|record| record.shift == shift) {
        sales += record.sales;
        staff += u64::from(record.staff_count);
        covers += u64::from(record.covers);
    }

    let staff_denom = staff.max(1) as f64;
    ShiftEfficiency {
        revenue_per_staff: sales / staff_denom,
        covers_per_staff: covers as f64 / staff_denom,
        asph: sales / covers.max(1) as f64,
    }
}

/// One point per service date, oldest first, for the dashboard chart.
pub fn daily_series(
    records: &[ShiftRecord],
    target_weekday: Option<Weekday>,
) -> Vec<DailySeriesPoint> {
    let mut days: BTreeMap<chrono::NaiveDate, DailySeriesPoint> = BTreeMap::new();
    for record in records {
        let weekday = record.date.weekday();
        let point = days.entry(record.date).or_insert_with(|| DailySeriesPoint {
            date: record.date,
            day_name: short_day_name(weekday),
            lunch_sales: 0.0,
            dinner_sales: 0.0,
            lunch_covers: 0,
            dinner_covers: 0,
            staff: 0,
            matches_target_day: target_weekday == Some(weekday),
        });
        match record.shift {
            ShiftType::Lunch => {
                point.lunch_sales += record.sales;
                point.lunch_covers = point.lunch_covers.saturating_add(record.covers);
            }
            ShiftType::Dinner => {
                point.dinner_sales += record.sales;
                point.dinner_covers = point.dinner_covers.saturating_add(record.covers);
            }
        }
        point.staff = point.staff.saturating_add(record.staff_count);
    }
    days.into_values().collect()
}

pub fn short_day_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(date: (i32, u32, u32), shift: ShiftType, sales: f64, covers: u32, reservations: u32) -> ShiftRecord {
        ShiftRecord {
            id: format!("{date:?}-{shift}"),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            shift,
            sales,
            staff_count: 2,
            covers,
            reservations,
            walkins: covers - reservations,
        }
    }

    #[test]
    fn empty_history_yields_zeros() {
        for shift in ShiftType::ALL {
            let metrics = compute_metrics(&[], shift, Some(Weekday::Fri), 1.3);
            assert_eq!(metrics.asph, 0.0);
            assert_eq!(metrics.avg_walkins, 0.0);
            assert_eq!(metrics.sample_size, 0);
        }
    }

    #[test]
    fn prefers_same_weekday_records() {
        let records = vec![
            // 2025-01-24 and 2025-01-31 are Fridays, 2025-01-27 a Monday.
            record((2025, 1, 24), ShiftType::Lunch, 280.0, 12, 6),
            record((2025, 1, 27), ShiftType::Lunch, 180.0, 8, 4),
            record((2025, 1, 31), ShiftType::Lunch, 260.0, 11, 5),
        ];
        let metrics = compute_metrics(&records, ShiftType::Lunch, Some(Weekday::Fri), 1.0);
        assert!(metrics.day_matched);
        assert_eq!(metrics.sample_size, 2);
        assert!((metrics.asph - 540.0 / 23.0).abs() < 1e-9);
        assert!((metrics.avg_walkins - 6.0).abs() < 1e-9);
    }

    #[test]
    fn falls_back_to_all_history_when_weekday_missing() {
        let records = vec![
            record((2025, 1, 27), ShiftType::Dinner, 1320.0, 60, 40),
            record((2025, 2, 2), ShiftType::Dinner, 1210.0, 55, 35),
        ];
        let metrics = compute_metrics(&records, ShiftType::Dinner, Some(Weekday::Fri), 1.0);
        assert!(!metrics.day_matched);
        assert_eq!(metrics.sample_size, 2);
        assert!((metrics.asph - 2530.0 / 115.0).abs() < 1e-9);
        assert!((metrics.avg_walkins - 20.0).abs() < 1e-9);
    }

    #[test]
    fn other_shift_records_are_ignored() {
        let records = vec![
            record((2025, 1, 24), ShiftType::Dinner, 2090.0, 95, 70),
            record((2025, 1, 24), ShiftType::Lunch, 280.0, 12, 6),
        ];
        let metrics = compute_metrics(&records, ShiftType::Lunch, None, 1.0);
        assert_eq!(metrics.sample_size, 1);
        assert!((metrics.avg_walkins - 6.0).abs() < 1e-9);
    }

    #[test]
    fn neutral_multiplier_leaves_walkins_unchanged() {
        for shift in ShiftType::ALL {
            assert_eq!(effective_multiplier(shift, 1.0), 1.0);
        }
    }

    #[test]
    fn lunch_is_damped_dinner_is_not() {
        assert!((effective_multiplier(ShiftType::Lunch, 1.5) - 1.2).abs() < 1e-9);
        assert!((effective_multiplier(ShiftType::Dinner, 1.5) - 1.5).abs() < 1e-9);
        assert!((effective_multiplier(ShiftType::Lunch, 0.5) - 0.8).abs() < 1e-9);

        let records = vec![record((2025, 1, 24), ShiftType::Dinner, 2090.0, 95, 70)];
        let metrics = compute_metrics(&records, ShiftType::Dinner, None, 1.2);
        assert!((metrics.avg_walkins - 30.0).abs() < 1e-9);
    }

    #[test]
    fn negative_multiplier_is_clamped() {
        assert_eq!(effective_multiplier(ShiftType::Dinner, -2.0), 0.0);
    }

    #[test]
    fn efficiency_uses_staff_and_covers() {
        let records = vec![
            record((2025, 1, 24), ShiftType::Lunch, 280.0, 12, 6),
            record((2025, 1, 25), ShiftType::Lunch, 360.0, 18, 10),
        ];
        let lunch = shift_efficiency(&records, ShiftType::Lunch);
        assert!((lunch.revenue_per_staff - 160.0).abs() < 1e-9);
        assert!((lunch.covers_per_staff - 7.5).abs() < 1e-9);
        assert!((lunch.asph - 640.0 / 30.0).abs() < 1e-9);

        let dinner = shift_efficiency(&records, ShiftType::Dinner);
        assert_eq!(dinner.revenue_per_staff, 0.0);
        assert_eq!(dinner.asph, 0.0);
    }

    #[test]
    fn daily_series_merges_shifts_per_date() {
        let records = vec![
            record((2025, 1, 31), ShiftType::Dinner, 2150.0, 98, 72),
            record((2025, 1, 24), ShiftType::Dinner, 2090.0, 95, 70),
            record((2025, 1, 24), ShiftType::Lunch, 280.0, 12, 6),
            record((2025, 1, 27), ShiftType::Lunch, 180.0, 8, 4),
        ];
        let series = daily_series(&records, Some(Weekday::Fri));
        assert_eq!(series.len(), 3);
        assert_eq!(series[0].date.to_string(), "2025-01-24");
        assert_eq!(series[0].lunch_covers, 12);
        assert_eq!(series[0].dinner_covers, 95);
        assert_eq!(series[0].staff, 4);
        assert!(series[0].matches_target_day);
        assert_eq!(series[1].day_name, "Mon");
        assert!(!series[1].matches_target_day);
    }
}
