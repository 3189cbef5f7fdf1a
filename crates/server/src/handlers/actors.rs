//! `/actors`: unpaginated CRUD.

use super::required_text;
use crate::error::{ApiError, Result};
use crate::extract::Payload;
use crate::fields::Field;
use crate::projections::ActorView;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use store::{Actor, ActorId, ActorInput, ValidationErrors};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ActorPayload {
    pub first_name: Field<String>,
    pub last_name: Field<String>,
}

impl ActorPayload {
    fn merged_over(self, current: Actor) -> Self {
        Self {
            first_name: self.first_name.or_stored(current.first_name),
            last_name: self.last_name.or_stored(current.last_name),
        }
    }

    fn validate(self) -> Result<ActorInput> {
        let mut errors = ValidationErrors::new();
        let first_name = required_text(self.first_name, "first_name", &mut errors);
        let last_name = required_text(self.last_name, "last_name", &mut errors);

        match (first_name, last_name) {
            (Some(first_name), Some(last_name)) => Ok(ActorInput {
                first_name,
                last_name,
            }),
            _ => Err(ApiError::Validation(errors)),
        }
    }
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<ActorView>>> {
    let actors = state.db.list_actors().await?;
    Ok(Json(actors.into_iter().map(ActorView::from).collect()))
}

pub async fn retrieve(
    State(state): State<AppState>,
    Path(id): Path<ActorId>,
) -> Result<Json<ActorView>> {
    Ok(Json(state.db.get_actor(id).await?.into()))
}

pub async fn create(
    State(state): State<AppState>,
    Payload(payload): Payload<ActorPayload>,
) -> Result<(StatusCode, Json<ActorView>)> {
    let actor = state.db.create_actor(&payload.validate()?).await?;
    Ok((StatusCode::CREATED, Json(actor.into())))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<ActorId>,
    Payload(payload): Payload<ActorPayload>,
) -> Result<Json<ActorView>> {
    state.db.get_actor(id).await?;
    let actor = state.db.update_actor(id, &payload.validate()?).await?;
    Ok(Json(actor.into()))
}

pub async fn partial_update(
    State(state): State<AppState>,
    Path(id): Path<ActorId>,
    Payload(payload): Payload<ActorPayload>,
) -> Result<Json<ActorView>> {
    let current = state.db.get_actor(id).await?;
    let actor = state
        .db
        .update_actor(id, &payload.merged_over(current).validate()?)
        .await?;
    Ok(Json(actor.into()))
}

pub async fn destroy(State(state): State<AppState>, Path(id): Path<ActorId>) -> Result<StatusCode> {
    state.db.delete_actor(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
