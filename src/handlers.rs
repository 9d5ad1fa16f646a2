use crate::advice::{AdviceContext, AdviceSections, Source, consult};
use crate::errors::AppError;
use crate::forecast::{
    DEFAULT_DINNER_BOOKINGS, DEFAULT_HOURLY_WAGE, DEFAULT_LUNCH_BOOKINGS, DayForecast,
    ForecastInput, project_day,
};
use crate::models::{
    AppData, ContextResponse, ForecastResponse, NewShiftRecord, ShiftRecord, ShiftType,
    StatsResponse,
};
use crate::state::AppState;
use crate::stats::{daily_series, shift_efficiency};
use crate::ui::{IndexView, render_index};
use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::Html,
};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Default, Deserialize)]
pub struct ForecastQuery {
    pub date: Option<NaiveDate>,
    pub lunch_bookings: Option<u32>,
    pub dinner_bookings: Option<u32>,
    pub hourly_wage: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StatsQuery {
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AdviceRequest {
    pub location: Option<String>,
    pub target_date: Option<NaiveDate>,
    pub bookings: Option<u32>,
    pub lunch_bookings: Option<u32>,
    pub dinner_bookings: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct AdviceResponse {
    pub location: String,
    pub target_date: NaiveDate,
    pub bookings: u32,
    pub sections: AdviceSections,
    pub sources: Vec<Source>,
    pub footfall_index: f64,
    pub placeholder: bool,
    pub warning: Option<String>,
}

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let data = state.data.lock().await;
    let forecast = forecast_for(&data, &ForecastQuery::default(), state.capacity);
    let view = IndexView {
        location: &data.location,
        target_date: data.target_date,
        record_count: data.book.len(),
        footfall_multiplier: data.footfall_multiplier,
        engine_connected: state.advisor.is_configured(),
        prediction: &forecast.prediction,
    };
    Html(render_index(&view))
}

pub async fn list_records(State(state): State<AppState>) -> Json<Vec<ShiftRecord>> {
    let data = state.data.lock().await;
    Json(data.book.records().to_vec())
}

pub async fn create_record(
    State(state): State<AppState>,
    payload: Result<Json<NewShiftRecord>, JsonRejection>,
) -> Result<(StatusCode, Json<ShiftRecord>), AppError> {
    let Json(payload) = payload?;
    let record = payload.validate(new_record_id())?;

    let mut data = state.data.lock().await;
    data.book.push(record.clone());
    info!(
        id = %record.id,
        date = %record.date,
        shift = %record.shift,
        covers = record.covers,
        "recorded shift actuals"
    );

    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn get_stats(
    State(state): State<AppState>,
    Query(query): Query<StatsQuery>,
) -> Json<StatsResponse> {
    let data = state.data.lock().await;
    let target = query.date.unwrap_or(data.target_date);
    let records = data.book.records();
    Json(StatsResponse {
        lunch: shift_efficiency(records, ShiftType::Lunch),
        dinner: shift_efficiency(records, ShiftType::Dinner),
        daily: daily_series(records, Some(target.weekday())),
    })
}

pub async fn get_forecast(
    State(state): State<AppState>,
    Query(query): Query<ForecastQuery>,
) -> Result<Json<ForecastResponse>, AppError> {
    if query.hourly_wage.is_some_and(|wage| !wage.is_finite() || wage < 0.0) {
        return Err(AppError::bad_request("hourly_wage must be a non-negative amount"));
    }

    let data = state.data.lock().await;
    let target_date = query.date.unwrap_or(data.target_date);
    let forecast = forecast_for(&data, &query, state.capacity);

    Ok(Json(ForecastResponse {
        target_date,
        day_name: target_date.format("%A").to_string(),
        footfall_multiplier: data.footfall_multiplier,
        lunch_metrics: forecast.lunch_metrics,
        dinner_metrics: forecast.dinner_metrics,
        prediction: forecast.prediction,
    }))
}

pub async fn get_context(State(state): State<AppState>) -> Json<ContextResponse> {
    let data = state.data.lock().await;
    Json(ContextResponse {
        location: data.location.clone(),
        target_date: data.target_date,
        footfall_multiplier: data.footfall_multiplier,
        engine_connected: state.advisor.is_configured(),
    })
}

pub async fn request_advice(
    State(state): State<AppState>,
    payload: Result<Json<AdviceRequest>, JsonRejection>,
) -> Result<Json<AdviceResponse>, AppError> {
    let Json(payload) = payload?;
    let context = {
        let data = state.data.lock().await;
        let location = payload
            .location
            .map(|location| location.trim().to_string())
            .unwrap_or_else(|| data.location.clone());
        if location.is_empty() {
            return Err(AppError::bad_request("location must not be empty"));
        }
        let target_date = payload.target_date.unwrap_or(data.target_date);
        let bookings = payload.bookings.unwrap_or_else(|| {
            let query = ForecastQuery {
                date: Some(target_date),
                lunch_bookings: payload.lunch_bookings,
                dinner_bookings: payload.dinner_bookings,
                hourly_wage: None,
            };
            forecast_for(&data, &query, state.capacity).prediction.total_covers
        });
        AdviceContext {
            history: data.book.records().to_vec(),
            location,
            target_date,
            bookings,
        }
    };

    let consultation = consult(
        state.advisor.as_ref(),
        &state.placeholder,
        &context,
        state.vocabulary,
    )
    .await;

    {
        let mut data = state.data.lock().await;
        data.location = context.location.clone();
        data.target_date = context.target_date;
        data.footfall_multiplier = consultation.result.footfall_index;
    }
    info!(
        location = %context.location,
        footfall_index = consultation.result.footfall_index,
        placeholder = consultation.placeholder_used,
        "footfall multiplier updated"
    );

    Ok(Json(AdviceResponse {
        location: context.location,
        target_date: context.target_date,
        bookings: context.bookings,
        sections: consultation.sections,
        sources: consultation.result.sources,
        footfall_index: consultation.result.footfall_index,
        placeholder: consultation.placeholder_used,
        warning: consultation.warning,
    }))
}

fn forecast_for(data: &AppData, query: &ForecastQuery, capacity: u32) -> DayForecast {
    let input = ForecastInput {
        target_date: query.date.unwrap_or(data.target_date),
        lunch_bookings: query.lunch_bookings.unwrap_or(DEFAULT_LUNCH_BOOKINGS),
        dinner_bookings: query.dinner_bookings.unwrap_or(DEFAULT_DINNER_BOOKINGS),
        footfall_multiplier: data.footfall_multiplier,
        hourly_wage: query.hourly_wage.unwrap_or(DEFAULT_HOURLY_WAGE),
    };
    project_day(data.book.records(), &input, capacity)
}

fn new_record_id() -> String {
    format!("r{:08x}", rand::random::<u32>())
}
