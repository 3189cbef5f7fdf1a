//! `/movies`: CRUD with title, genre and actor filters on the listing.

use super::{required, required_positive, required_text};
use crate::error::{ApiError, Result};
use crate::extract::{Params, Payload};
use crate::fields::Field;
use crate::projections::{movie_projection, Action, MovieView};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use filters::filters::{MatchNothing, RelatedAny, TitleContains};
use filters::{parse_ids, FilterPipeline};
use serde::Deserialize;
use store::{ActorId, GenreId, MovieId, MovieInput, MovieWithRelations, ValidationErrors};
use tracing::debug;

/// Movie listing query parameters
#[derive(Debug, Default, Deserialize)]
pub struct MovieListParams {
    pub title: Option<String>,
    pub genres: Option<String>,
    pub actors: Option<String>,
}

impl MovieListParams {
    /// Build the listing filters.
    ///
    /// A malformed `genres` or `actors` list is not an error: it is
    /// replaced by a filter matching nothing, so the listing comes back
    /// empty.
    pub fn filters(&self) -> FilterPipeline {
        let mut pipeline = FilterPipeline::new();

        if let Some(title) = non_empty(&self.title) {
            pipeline.push(TitleContains::new(title));
        }

        for (param, raw, build) in [
            ("genres", &self.genres, RelatedAny::genres as fn(Vec<i64>) -> RelatedAny),
            ("actors", &self.actors, RelatedAny::actors),
        ] {
            let Some(raw) = non_empty(raw) else {
                continue;
            };
            match parse_ids(raw) {
                Ok(ids) => pipeline.push(build(ids)),
                Err(e) => {
                    debug!("Ignoring malformed {} filter: {}", param, e);
                    pipeline.push(MatchNothing);
                }
            }
        }

        pipeline
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MoviePayload {
    pub title: Field<String>,
    pub description: Field<String>,
    pub duration: Field<i32>,
    pub genres: Field<Vec<GenreId>>,
    pub actors: Field<Vec<ActorId>>,
}

impl MoviePayload {
    fn merged_over(self, current: MovieWithRelations) -> Self {
        let MovieWithRelations {
            movie,
            genres,
            actors,
        } = current;
        Self {
            title: self.title.or_stored(movie.title),
            description: self.description.or_stored(movie.description),
            duration: self.duration.or_stored(movie.duration),
            genres: self.genres.or_stored(genres.iter().map(|g| g.id).collect()),
            actors: self.actors.or_stored(actors.iter().map(|a| a.id).collect()),
        }
    }

    fn validate(self) -> Result<MovieInput> {
        let mut errors = ValidationErrors::new();
        let title = required_text(self.title, "title", &mut errors);
        let description = required_text(self.description, "description", &mut errors);
        let duration = required_positive(self.duration, "duration", &mut errors);
        let genres = required(self.genres, "genres", &mut errors);
        let actors = required(self.actors, "actors", &mut errors);

        match (title, description, duration, genres, actors) {
            (Some(title), Some(description), Some(duration), Some(genres), Some(actors)) => {
                Ok(MovieInput {
                    title,
                    description,
                    duration,
                    genres,
                    actors,
                })
            }
            _ => Err(ApiError::Validation(errors)),
        }
    }
}

pub async fn list(
    State(state): State<AppState>,
    Params(params): Params<MovieListParams>,
) -> Result<Json<Vec<MovieView>>> {
    let movies = state.db.list_movies(&params.filters()).await?;
    let project = movie_projection(Action::List);
    Ok(Json(movies.into_iter().map(project).collect()))
}

pub async fn retrieve(
    State(state): State<AppState>,
    Path(id): Path<MovieId>,
) -> Result<Json<MovieView>> {
    let project = movie_projection(Action::Retrieve);
    Ok(Json(project(state.db.get_movie(id).await?)))
}

pub async fn create(
    State(state): State<AppState>,
    Payload(payload): Payload<MoviePayload>,
) -> Result<(StatusCode, Json<MovieView>)> {
    let project = movie_projection(Action::Create);
    let movie = state.db.create_movie(&payload.validate()?).await?;
    Ok((StatusCode::CREATED, Json(project(movie))))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<MovieId>,
    Payload(payload): Payload<MoviePayload>,
) -> Result<Json<MovieView>> {
    let project = movie_projection(Action::Update);
    state.db.get_movie(id).await?;
    let movie = state.db.update_movie(id, &payload.validate()?).await?;
    Ok(Json(project(movie)))
}

pub async fn partial_update(
    State(state): State<AppState>,
    Path(id): Path<MovieId>,
    Payload(payload): Payload<MoviePayload>,
) -> Result<Json<MovieView>> {
    let project = movie_projection(Action::PartialUpdate);
    let current = state.db.get_movie(id).await?;
    let movie = state
        .db
        .update_movie(id, &payload.merged_over(current).validate()?)
        .await?;
    Ok(Json(project(movie)))
}

pub async fn destroy(State(state): State<AppState>, Path(id): Path<MovieId>) -> Result<StatusCode> {
    state.db.delete_movie(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
