use crate::dates::{day_abbreviation, format_date, month_name, parse_date, Period};
use crate::errors::AppError;
use crate::models::{
    AddHabitRequest, DashboardResponse, DayLabel, GridRow, Habit, HabitLog, LogBook, MonthRequest,
    PeriodResponse, RemoveHabitRequest, RemoveHabitResponse, ToggleRequest,
};
use crate::state::AppState;
use crate::stats::{build_dashboard, habit_grid};
use axum::{
    extract::{Path, State},
    Json,
};

pub async fn list_habits(State(state): State<AppState>) -> Json<Vec<Habit>> {
    let store = state.store.lock().await;
    Json(store.habits().to_vec())
}

pub async fn add_habit(
    State(state): State<AppState>,
    Json(payload): Json<AddHabitRequest>,
) -> Json<Option<Habit>> {
    let mut store = state.store.lock().await;
    Json(store.add_habit(&payload.name, payload.category))
}

/// The client shows the confirmation prompt and reports the answer.
pub async fn remove_habit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<RemoveHabitRequest>,
) -> Json<RemoveHabitResponse> {
    let mut store = state.store.lock().await;
    let removed = store.remove_habit(&id, |_| payload.confirmed);
    Json(RemoveHabitResponse { removed })
}

pub async fn list_logs(State(state): State<AppState>) -> Json<LogBook> {
    let store = state.store.lock().await;
    Json(store.logs().clone())
}

pub async fn toggle_log(
    State(state): State<AppState>,
    Json(payload): Json<ToggleRequest>,
) -> Result<Json<HabitLog>, AppError> {
    let date = parse_date(&payload.date)
        .ok_or_else(|| AppError::bad_request("date must be formatted as YYYY-MM-DD"))?;

    let mut store = state.store.lock().await;
    Ok(Json(store.toggle_log(&payload.habit_id, date)))
}

pub async fn get_month(State(state): State<AppState>) -> Json<PeriodResponse> {
    let period = *state.period.lock().await;
    Json(period_response(period))
}

pub async fn change_month(
    State(state): State<AppState>,
    Json(payload): Json<MonthRequest>,
) -> Json<PeriodResponse> {
    let mut period = state.period.lock().await;
    *period = period.shift(payload.delta);
    Json(period_response(*period))
}

pub async fn get_dashboard(State(state): State<AppState>) -> Json<DashboardResponse> {
    let period = *state.period.lock().await;
    let store = state.store.lock().await;
    Json(build_dashboard(store.snapshot(), period))
}

pub async fn get_grid(State(state): State<AppState>) -> Json<Vec<GridRow>> {
    let period = *state.period.lock().await;
    let store = state.store.lock().await;
    Json(habit_grid(store.snapshot(), period))
}

fn period_response(period: Period) -> PeriodResponse {
    let days = period
        .dates()
        .zip(1..)
        .map(|(date, day)| DayLabel {
            day,
            date: format_date(date),
            weekday: day_abbreviation(day, period.month0, period.year),
        })
        .collect();

    PeriodResponse {
        year: period.year,
        month: period.month0,
        month_name: month_name(period.month0),
        days_in_month: period.days(),
        days,
    }
}
