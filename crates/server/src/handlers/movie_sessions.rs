//! `/movie_sessions`: CRUD with `date` and `movie` filters on the listing.
//!
//! The listing carries `tickets_available`, computed by the store query.

use super::required;
use crate::error::{ApiError, Result};
use crate::extract::{Params, Payload};
use crate::fields::Field;
use crate::projections::{SessionDetailView, SessionListItem, SessionRecord};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDateTime;
use filters::filters::{SessionOfMovie, ShowDate};
use filters::{parse_date, FilterPipeline};
use serde::Deserialize;
use store::{CinemaHallId, MovieId, MovieSession, MovieSessionId, MovieSessionInput, ValidationErrors};

const INVALID_DATE: &str = "Enter a valid date.";
const INVALID_CHOICE: &str = "Select a valid choice. That choice is not one of the available choices.";

/// Session listing query parameters
#[derive(Debug, Default, Deserialize)]
pub struct SessionListParams {
    pub date: Option<String>,
    pub movie: Option<String>,
}

impl SessionListParams {
    /// Build the listing filters, rejecting malformed values
    pub fn filters(&self) -> std::result::Result<FilterPipeline, ValidationErrors> {
        let mut pipeline = FilterPipeline::new();
        let mut errors = ValidationErrors::new();

        if let Some(raw) = non_empty(&self.date) {
            match parse_date(raw) {
                Ok(date) => pipeline.push(ShowDate::new(date)),
                Err(_) => errors.add("date", INVALID_DATE),
            }
        }

        if let Some(raw) = non_empty(&self.movie) {
            match raw.parse::<MovieId>() {
                Ok(movie_id) => pipeline.push(SessionOfMovie::new(movie_id)),
                Err(_) => errors.add("movie", INVALID_CHOICE),
            }
        }

        if errors.is_empty() {
            Ok(pipeline)
        } else {
            Err(errors)
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SessionPayload {
    pub show_time: Field<NaiveDateTime>,
    pub movie: Field<MovieId>,
    pub cinema_hall: Field<CinemaHallId>,
}

impl SessionPayload {
    fn merged_over(self, current: MovieSession) -> Self {
        Self {
            show_time: self.show_time.or_stored(current.show_time),
            movie: self.movie.or_stored(current.movie_id),
            cinema_hall: self.cinema_hall.or_stored(current.cinema_hall_id),
        }
    }

    fn validate(self) -> Result<MovieSessionInput> {
        let mut errors = ValidationErrors::new();
        let show_time = required(self.show_time, "show_time", &mut errors);
        let movie = required(self.movie, "movie", &mut errors);
        let cinema_hall = required(self.cinema_hall, "cinema_hall", &mut errors);

        match (show_time, movie, cinema_hall) {
            (Some(show_time), Some(movie_id), Some(cinema_hall_id)) => Ok(MovieSessionInput {
                show_time,
                movie_id,
                cinema_hall_id,
            }),
            _ => Err(ApiError::Validation(errors)),
        }
    }
}

pub async fn list(
    State(state): State<AppState>,
    Params(params): Params<SessionListParams>,
) -> Result<Json<Vec<SessionListItem>>> {
    let sessions = state.db.list_sessions(&params.filters()?).await?;
    Ok(Json(sessions.into_iter().map(SessionListItem::from).collect()))
}

pub async fn retrieve(
    State(state): State<AppState>,
    Path(id): Path<MovieSessionId>,
) -> Result<Json<SessionDetailView>> {
    Ok(Json(state.db.get_session_detail(id).await?.into()))
}

pub async fn create(
    State(state): State<AppState>,
    Payload(payload): Payload<SessionPayload>,
) -> Result<(StatusCode, Json<SessionRecord>)> {
    let session = state.db.create_session(&payload.validate()?).await?;
    Ok((StatusCode::CREATED, Json(session.into())))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<MovieSessionId>,
    Payload(payload): Payload<SessionPayload>,
) -> Result<Json<SessionRecord>> {
    state.db.get_session(id).await?;
    let session = state.db.update_session(id, &payload.validate()?).await?;
    Ok(Json(session.into()))
}

pub async fn partial_update(
    State(state): State<AppState>,
    Path(id): Path<MovieSessionId>,
    Payload(payload): Payload<SessionPayload>,
) -> Result<Json<SessionRecord>> {
    let current = state.db.get_session(id).await?;
    let session = state
        .db
        .update_session(id, &payload.merged_over(current).validate()?)
        .await?;
    Ok(Json(session.into()))
}

pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<MovieSessionId>,
) -> Result<StatusCode> {
    state.db.delete_session(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
