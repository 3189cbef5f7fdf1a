//! `/genres`: unpaginated CRUD.

use super::required_text;
use crate::error::{ApiError, Result};
use crate::extract::Payload;
use crate::fields::Field;
use crate::projections::GenreView;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use store::{Genre, GenreId, GenreInput, ValidationErrors};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GenrePayload {
    pub name: Field<String>,
}

impl GenrePayload {
    fn merged_over(self, current: Genre) -> Self {
        Self {
            name: self.name.or_stored(current.name),
        }
    }

    fn validate(self) -> Result<GenreInput> {
        let mut errors = ValidationErrors::new();
        match required_text(self.name, "name", &mut errors) {
            Some(name) => Ok(GenreInput { name }),
            None => Err(ApiError::Validation(errors)),
        }
    }
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<GenreView>>> {
    let genres = state.db.list_genres().await?;
    Ok(Json(genres.into_iter().map(GenreView::from).collect()))
}

pub async fn retrieve(
    State(state): State<AppState>,
    Path(id): Path<GenreId>,
) -> Result<Json<GenreView>> {
    Ok(Json(state.db.get_genre(id).await?.into()))
}

pub async fn create(
    State(state): State<AppState>,
    Payload(payload): Payload<GenrePayload>,
) -> Result<(StatusCode, Json<GenreView>)> {
    let genre = state.db.create_genre(&payload.validate()?).await?;
    Ok((StatusCode::CREATED, Json(genre.into())))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<GenreId>,
    Payload(payload): Payload<GenrePayload>,
) -> Result<Json<GenreView>> {
    state.db.get_genre(id).await?;
    let genre = state.db.update_genre(id, &payload.validate()?).await?;
    Ok(Json(genre.into()))
}

pub async fn partial_update(
    State(state): State<AppState>,
    Path(id): Path<GenreId>,
    Payload(payload): Payload<GenrePayload>,
) -> Result<Json<GenreView>> {
    let current = state.db.get_genre(id).await?;
    let genre = state
        .db
        .update_genre(id, &payload.merged_over(current).validate()?)
        .await?;
    Ok(Json(genre.into()))
}

pub async fn destroy(State(state): State<AppState>, Path(id): Path<GenreId>) -> Result<StatusCode> {
    state.db.delete_genre(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
