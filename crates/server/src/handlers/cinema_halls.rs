//! `/cinema_halls`: unpaginated CRUD.

use super::{required_positive, required_text};
use crate::error::{ApiError, Result};
use crate::extract::Payload;
use crate::fields::Field;
use crate::projections::CinemaHallView;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use store::{CinemaHall, CinemaHallId, CinemaHallInput, ValidationErrors};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CinemaHallPayload {
    pub name: Field<String>,
    pub rows: Field<i32>,
    pub seats_in_row: Field<i32>,
}

impl CinemaHallPayload {
    fn merged_over(self, current: CinemaHall) -> Self {
        Self {
            name: self.name.or_stored(current.name),
            rows: self.rows.or_stored(current.rows),
            seats_in_row: self.seats_in_row.or_stored(current.seats_in_row),
        }
    }

    fn validate(self) -> Result<CinemaHallInput> {
        let mut errors = ValidationErrors::new();
        let name = required_text(self.name, "name", &mut errors);
        let rows = required_positive(self.rows, "rows", &mut errors);
        let seats_in_row = required_positive(self.seats_in_row, "seats_in_row", &mut errors);

        match (name, rows, seats_in_row) {
            (Some(name), Some(rows), Some(seats_in_row)) => Ok(CinemaHallInput {
                name,
                rows,
                seats_in_row,
            }),
            _ => Err(ApiError::Validation(errors)),
        }
    }
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<CinemaHallView>>> {
    let halls = state.db.list_cinema_halls().await?;
    Ok(Json(halls.into_iter().map(CinemaHallView::from).collect()))
}

pub async fn retrieve(
    State(state): State<AppState>,
    Path(id): Path<CinemaHallId>,
) -> Result<Json<CinemaHallView>> {
    Ok(Json(state.db.get_cinema_hall(id).await?.into()))
}

pub async fn create(
    State(state): State<AppState>,
    Payload(payload): Payload<CinemaHallPayload>,
) -> Result<(StatusCode, Json<CinemaHallView>)> {
    let hall = state.db.create_cinema_hall(&payload.validate()?).await?;
    Ok((StatusCode::CREATED, Json(hall.into())))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<CinemaHallId>,
    Payload(payload): Payload<CinemaHallPayload>,
) -> Result<Json<CinemaHallView>> {
    state.db.get_cinema_hall(id).await?;
    let hall = state.db.update_cinema_hall(id, &payload.validate()?).await?;
    Ok(Json(hall.into()))
}

pub async fn partial_update(
    State(state): State<AppState>,
    Path(id): Path<CinemaHallId>,
    Payload(payload): Payload<CinemaHallPayload>,
) -> Result<Json<CinemaHallView>> {
    let current = state.db.get_cinema_hall(id).await?;
    let hall = state
        .db
        .update_cinema_hall(id, &payload.merged_over(current).validate()?)
        .await?;
    Ok(Json(hall.into()))
}

pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<CinemaHallId>,
) -> Result<StatusCode> {
    state.db.delete_cinema_hall(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
