use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShiftType {
    Lunch,
    Dinner,
}

impl ShiftType {
    pub const ALL: [ShiftType; 2] = [ShiftType::Lunch, ShiftType::Dinner];

    /// Paid hours a front-of-house shift is rostered for.
    pub fn hours(self) -> f64 {
        match self {
            ShiftType::Lunch => 4.0,
            ShiftType::Dinner => 6.0,
        }
    }

    pub fn peak_time(self) -> &'static str {
        match self {
            ShiftType::Lunch => "13:00",
            ShiftType::Dinner => "20:00",
        }
    }

    /// How strongly the footfall multiplier moves walk-ins for this shift.
    pub fn footfall_sensitivity(self) -> f64 {
        match self {
            ShiftType::Lunch => 0.4,
            ShiftType::Dinner => 1.0,
        }
    }
}

impl fmt::Display for ShiftType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShiftType::Lunch => f.write_str("Lunch"),
            ShiftType::Dinner => f.write_str("Dinner"),
        }
    }
}

/// Actuals observed for one service. Built only through
/// [`NewShiftRecord::validate`] so `walkins` always equals
/// `covers - reservations`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShiftRecord {
    pub id: String,
    pub date: NaiveDate,
    pub shift: ShiftType,
    pub sales: f64,
    pub staff_count: u32,
    pub covers: u32,
    pub reservations: u32,
    pub walkins: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("missing required field '{0}'")]
    MissingField(&'static str),
    #[error("sales must be a non-negative amount")]
    InvalidSales,
    #[error("staff_count must be at least 1")]
    NoStaff,
    #[error("reservations ({reservations}) cannot exceed covers ({covers})")]
    ReservationsExceedCovers { covers: u32, reservations: u32 },
}

/// Record entry payload. Numeric fields are optional on the wire so a
/// missing value is reported by name instead of as a generic decode error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewShiftRecord {
    pub date: NaiveDate,
    pub shift: ShiftType,
    pub sales: Option<f64>,
    pub staff_count: Option<u32>,
    pub covers: Option<u32>,
    pub reservations: Option<u32>,
}

impl NewShiftRecord {
    pub fn validate(self, id: String) -> Result<ShiftRecord, RecordError> {
        let sales = self.sales.ok_or(RecordError::MissingField("sales"))?;
        let staff_count = self
            .staff_count
            .ok_or(RecordError::MissingField("staff_count"))?;
        let covers = self.covers.ok_or(RecordError::MissingField("covers"))?;
        let reservations = self
            .reservations
            .ok_or(RecordError::MissingField("reservations"))?;

        if !sales.is_finite() || sales < 0.0 {
            return Err(RecordError::InvalidSales);
        }
        if staff_count == 0 {
            return Err(RecordError::NoStaff);
        }
        let walkins = covers
            .checked_sub(reservations)
            .ok_or(RecordError::ReservationsExceedCovers {
                covers,
                reservations,
            })?;

        Ok(ShiftRecord {
            id,
            date: self.date,
            shift: self.shift,
            sales,
            staff_count,
            covers,
            reservations,
            walkins,
        })
    }
}

/// Append-only history, newest first.
#[derive(Debug, Clone, Default)]
pub struct RecordBook {
    records: Vec<ShiftRecord>,
}

impl RecordBook {
    pub fn new(seed: Vec<ShiftRecord>) -> Self {
        Self { records: seed }
    }

    pub fn push(&mut self, record: ShiftRecord) {
        self.records.insert(0, record);
    }

    pub fn records(&self) -> &[ShiftRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Everything the dashboard mutates at runtime.
#[derive(Debug, Clone)]
pub struct AppData {
    pub book: RecordBook,
    pub location: String,
    pub target_date: NaiveDate,
    pub footfall_multiplier: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ShiftMetrics {
    pub asph: f64,
    pub avg_walkins: f64,
    pub sample_size: usize,
    pub day_matched: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StaffingStatus {
    Understaffed,
    Optimal,
    Surplus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShiftPrediction {
    pub shift: ShiftType,
    pub predicted_walkins: u32,
    pub predicted_covers: u32,
    pub predicted_sales: f64,
    pub suggested_staff: u32,
    pub est_sales_per_labor_hour: f64,
    pub status: StaffingStatus,
    pub peak_time: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyPrediction {
    pub lunch: ShiftPrediction,
    pub dinner: ShiftPrediction,
    pub total_covers: u32,
    pub total_sales: f64,
    pub capacity_load: f64,
    pub labor_hours: f64,
    pub labor_cost: f64,
    pub labor_cost_ratio: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ShiftEfficiency {
    pub revenue_per_staff: f64,
    pub covers_per_staff: f64,
    pub asph: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySeriesPoint {
    pub date: NaiveDate,
    pub day_name: &'static str,
    pub lunch_sales: f64,
    pub dinner_sales: f64,
    pub lunch_covers: u32,
    pub dinner_covers: u32,
    pub staff: u32,
    pub matches_target_day: bool,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub lunch: ShiftEfficiency,
    pub dinner: ShiftEfficiency,
    pub daily: Vec<DailySeriesPoint>,
}

#[derive(Debug, Serialize)]
pub struct ForecastResponse {
    pub target_date: NaiveDate,
    pub day_name: String,
    pub footfall_multiplier: f64,
    pub lunch_metrics: ShiftMetrics,
    pub dinner_metrics: ShiftMetrics,
    pub prediction: DailyPrediction,
}

#[derive(Debug, Serialize)]
pub struct ContextResponse {
    pub location: String,
    pub target_date: NaiveDate,
    pub footfall_multiplier: f64,
    pub engine_connected: bool,
}
