use crate::models::{
    DailyPrediction, ShiftMetrics, ShiftPrediction, ShiftRecord, ShiftType, StaffingStatus,
};
use crate::stats::compute_metrics;
use chrono::{Datelike, NaiveDate};

pub const DEFAULT_LUNCH_BOOKINGS: u32 = 12;
pub const DEFAULT_DINNER_BOOKINGS: u32 = 55;
pub const DEFAULT_HOURLY_WAGE: f64 = 15.0;

/// Cover thresholds and SPLH bands used to turn a cover forecast into a
/// headcount and an adequacy label.
///
/// Each ladder is `(exclusive lower bound, staff)` from the highest tier
/// down; a forecast that clears none of them gets the floor value.
#[derive(Debug, Clone, PartialEq)]
pub struct StaffingPolicy {
    pub lunch_ladder: Vec<(u32, u32)>,
    pub lunch_floor: u32,
    pub dinner_ladder: Vec<(u32, u32)>,
    pub dinner_floor: u32,
    pub surplus_below: f64,
    pub understaffed_above: f64,
}

impl Default for StaffingPolicy {
    fn default() -> Self {
        Self {
            lunch_ladder: vec![(45, 3), (22, 2)],
            lunch_floor: 1,
            dinner_ladder: vec![(110, 5), (85, 4), (55, 3)],
            dinner_floor: 2,
            surplus_below: 40.0,
            understaffed_above: 80.0,
        }
    }
}

impl StaffingPolicy {
    pub fn suggested_staff(&self, shift: ShiftType, predicted_covers: u32) -> u32 {
        let (ladder, floor) = match shift {
            ShiftType::Lunch => (&self.lunch_ladder, self.lunch_floor),
            ShiftType::Dinner => (&self.dinner_ladder, self.dinner_floor),
        };
        ladder
            .iter()
            .find(|(threshold, _)| predicted_covers > *threshold)
            .map(|(_, staff)| *staff)
            .unwrap_or(floor)
    }

    pub fn classify(&self, sales_per_labor_hour: f64) -> StaffingStatus {
        if sales_per_labor_hour < self.surplus_below {
            StaffingStatus::Surplus
        } else if sales_per_labor_hour > self.understaffed_above {
            StaffingStatus::Understaffed
        } else {
            StaffingStatus::Optimal
        }
    }

    pub fn project(&self, shift: ShiftType, bookings: u32, metrics: &ShiftMetrics) -> ShiftPrediction {
        let predicted_walkins = metrics.avg_walkins.max(0.0).round() as u32;
        let predicted_covers = bookings.saturating_add(predicted_walkins);
        let suggested_staff = self.suggested_staff(shift, predicted_covers).max(1);
        let predicted_sales = f64::from(predicted_covers) * metrics.asph;
        let est_sales_per_labor_hour = predicted_sales / (f64::from(suggested_staff) * shift.hours());

        ShiftPrediction {
            shift,
            predicted_walkins,
            predicted_covers,
            predicted_sales,
            suggested_staff,
            est_sales_per_labor_hour,
            status: self.classify(est_sales_per_labor_hour),
            peak_time: shift.peak_time(),
        }
    }
}

pub fn suggested_staff(shift: ShiftType, predicted_covers: u32) -> u32 {
    StaffingPolicy::default().suggested_staff(shift, predicted_covers)
}

pub fn classify_status(sales_per_labor_hour: f64) -> StaffingStatus {
    StaffingPolicy::default().classify(sales_per_labor_hour)
}

pub fn project(shift: ShiftType, bookings: u32, metrics: &ShiftMetrics) -> ShiftPrediction {
    StaffingPolicy::default().project(shift, bookings, metrics)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastInput {
    pub target_date: NaiveDate,
    pub lunch_bookings: u32,
    pub dinner_bookings: u32,
    pub footfall_multiplier: f64,
    pub hourly_wage: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayForecast {
    pub lunch_metrics: ShiftMetrics,
    pub dinner_metrics: ShiftMetrics,
    pub prediction: DailyPrediction,
}

pub fn project_day(records: &[ShiftRecord], input: &ForecastInput, capacity: u32) -> DayForecast {
    let weekday = Some(input.target_date.weekday());
    let lunch_metrics = compute_metrics(records, ShiftType::Lunch, weekday, input.footfall_multiplier);
    let dinner_metrics = compute_metrics(records, ShiftType::Dinner, weekday, input.footfall_multiplier);

    let lunch = project(ShiftType::Lunch, input.lunch_bookings, &lunch_metrics);
    let dinner = project(ShiftType::Dinner, input.dinner_bookings, &dinner_metrics);

    DayForecast {
        lunch_metrics,
        dinner_metrics,
        prediction: roll_up(lunch, dinner, capacity, input.hourly_wage),
    }
}

pub fn roll_up(
    lunch: ShiftPrediction,
    dinner: ShiftPrediction,
    capacity: u32,
    hourly_wage: f64,
) -> DailyPrediction {
    let total_sales = lunch.predicted_sales + dinner.predicted_sales;
    let total_covers = lunch.predicted_covers.saturating_add(dinner.predicted_covers);
    let labor_hours = f64::from(lunch.suggested_staff) * lunch.shift.hours()
        + f64::from(dinner.suggested_staff) * dinner.shift.hours();
    let labor_cost = labor_hours * hourly_wage.max(0.0);
    let labor_cost_ratio = if total_sales > 0.0 {
        labor_cost / total_sales * 100.0
    } else {
        0.0
    };

    DailyPrediction {
        capacity_load: f64::from(total_covers) / f64::from(capacity.max(1)) * 100.0,
        lunch,
        dinner,
        total_covers,
        total_sales,
        labor_hours,
        labor_cost,
        labor_cost_ratio,
    }
}
