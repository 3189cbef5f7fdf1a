//! `/orders`: the caller's own orders.
//!
//! Every query is scoped with the caller's ownership filter, so another
//! user's order is indistinguishable from a missing one. Orders cannot be
//! changed after they are placed.

use crate::error::{ApiError, Result};
use crate::extract::{Identity, Params, Payload};
use crate::fields::{type_name, Field, FieldValue};
use crate::pagination::{Page, PageParams};
use crate::projections::{order_projection, Action, OrderView};
use crate::state::AppState;
use axum::extract::{OriginalUri, Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::Value;
use store::{MovieSessionId, OrderId, TicketRequest, ValidationErrors};
use tracing::info;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TicketPayload {
    pub row: Field<i32>,
    pub seat: Field<i32>,
    pub movie_session: Field<MovieSessionId>,
}

impl FieldValue for Vec<TicketPayload> {
    fn from_json(value: Value) -> std::result::Result<Self, String> {
        let Value::Array(items) = value else {
            return Err(format!(
                "Expected a list of items but got type \"{}\".",
                type_name(&value)
            ));
        };
        items
            .into_iter()
            .map(|item| match item {
                Value::Object(_) => serde_json::from_value(item).map_err(|e| e.to_string()),
                other => Err(format!(
                    "Invalid data. Expected a dictionary, but got {}.",
                    type_name(&other)
                )),
            })
            .collect()
    }
}

/// New order body. Any owner sent by the client is ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct OrderPayload {
    pub tickets: Field<Vec<TicketPayload>>,
}

impl OrderPayload {
    fn validate(self) -> Result<Vec<TicketRequest>> {
        let tickets = self
            .tickets
            .into_result()
            .map_err(|message| ValidationErrors::single("tickets", message))?;

        let mut errors = ValidationErrors::new();
        let mut requests = Vec::with_capacity(tickets.len());

        for (index, ticket) in tickets.into_iter().enumerate() {
            let row = ticket_field(index, "row", ticket.row, &mut errors);
            let seat = ticket_field(index, "seat", ticket.seat, &mut errors);
            let movie_session = ticket_field(index, "movie_session", ticket.movie_session, &mut errors);

            if let (Some(row), Some(seat), Some(movie_session_id)) = (row, seat, movie_session) {
                requests.push(TicketRequest {
                    movie_session_id,
                    row,
                    seat,
                });
            }
        }

        if errors.is_empty() {
            Ok(requests)
        } else {
            Err(ApiError::Validation(errors))
        }
    }
}

/// A ticket's field, or its error recorded under `tickets`
fn ticket_field<T>(
    index: usize,
    name: &str,
    field: Field<T>,
    errors: &mut ValidationErrors,
) -> Option<T> {
    match field.into_result() {
        Ok(value) => Some(value),
        Err(message) => {
            errors.add("tickets", format!("tickets[{index}].{name}: {message}"));
            None
        }
    }
}

pub async fn list(
    State(state): State<AppState>,
    identity: Identity,
    OriginalUri(uri): OriginalUri,
    Params(params): Params<PageParams>,
) -> Result<Json<Page<OrderView>>> {
    let scope = identity.order_scope();
    let page = params.resolve()?;

    let count = state.db.count_orders(&scope).await?;
    page.check(count)?;

    let orders = state.db.list_orders(&scope, page.size, page.offset()).await?;
    let project = order_projection(Action::List);
    let results = orders.into_iter().map(project).collect();

    Ok(Json(Page::new(count, page, &uri, results)))
}

pub async fn retrieve(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<OrderId>,
) -> Result<Json<OrderView>> {
    let project = order_projection(Action::Retrieve);
    let order = state.db.get_order(id, &identity.order_scope()).await?;
    Ok(Json(project(order)))
}

pub async fn create(
    State(state): State<AppState>,
    identity: Identity,
    Payload(payload): Payload<OrderPayload>,
) -> Result<(StatusCode, Json<OrderView>)> {
    let project = order_projection(Action::Create);
    let tickets = payload.validate()?;

    let order = state.db.create_order(identity.user_id, &tickets).await?;
    info!(
        "User {} placed order {} ({} tickets)",
        identity.username,
        order.order.id,
        order.tickets.len()
    );

    Ok((StatusCode::CREATED, Json(project(order))))
}
