use crate::{chart::Figure, state::AppState};
use axum::{extract::State, Json};

/// Plotly figure consumed by the static page
pub async fn get_chart(State(state): State<AppState>) -> Json<Figure> {
    Json(state.figure.as_ref().clone())
}
