use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/habits", get(handlers::list_habits).post(handlers::add_habit))
        .route("/api/habits/:id/remove", post(handlers::remove_habit))
        .route("/api/logs", get(handlers::list_logs))
        .route("/api/logs/toggle", post(handlers::toggle_log))
        .route("/api/month", get(handlers::get_month).post(handlers::change_month))
        .route("/api/dashboard", get(handlers::get_dashboard))
        .route("/api/grid", get(handlers::get_grid))
        .with_state(state)
}
