use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};

use crate::models::booking::{BookingLookupResponse, BookingQuery};
use crate::models::ErrorResponse;
use crate::services::booking_lookup;
use crate::AppState;

pub async fn get_booking(
    State(state): State<AppState>,
    Query(params): Query<BookingQuery>,
) -> Result<Json<BookingLookupResponse>, (StatusCode, Json<ErrorResponse>)> {
    let booking = booking_lookup::lookup(&state.db, params.id, params.payment).await?;

    Ok(Json(BookingLookupResponse {
        success: true,
        booking,
    }))
}
