//! Orders and seat reservation.
//!
//! An order and all of its tickets are written in one transaction. The
//! `UNIQUE (movie_session_id, row, seat)` constraint on tickets is what
//! finally decides a race between two orders for the same seat: the losing
//! transaction fails on insert, is rolled back, and is reported as a
//! validation error like any other taken seat.
//!
//! Reads take the caller's filters explicitly; the order controller always
//! passes an ownership filter so a user only ever sees their own orders.

use crate::db::{push_id_list, Database};
use crate::error::{is_unique_violation, Result, StoreError, ValidationErrors};
use crate::types::*;
use chrono::{NaiveDateTime, Utc};
use filters::FilterPipeline;
use sqlx::{FromRow, QueryBuilder, Sqlite, SqliteConnection};
use std::collections::{HashMap, HashSet};
use tracing::{info, warn};

/// Ticket joined with its session, movie and hall
#[derive(FromRow)]
struct TicketRow {
    id: TicketId,
    row: i32,
    seat: i32,
    order_id: OrderId,
    session_id: MovieSessionId,
    show_time: NaiveDateTime,
    movie_title: String,
    cinema_hall_name: String,
    cinema_hall_capacity: i64,
}

/// Hall dimensions for a session
#[derive(Debug, Clone, Copy, FromRow)]
struct HallBounds {
    rows: i32,
    seats_in_row: i32,
}

impl Database {
    /// Count orders matching `filters`.
    ///
    /// Filters see the orders table as `o`.
    pub async fn count_orders(&self, filters: &FilterPipeline) -> Result<i64> {
        let mut query = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM orders o WHERE 1=1");
        filters.apply(&mut query);

        let count: i64 = query.build_query_scalar().fetch_one(&self.pool).await?;
        Ok(count)
    }

    /// One page of orders matching `filters`, newest first, with tickets.
    pub async fn list_orders(
        &self,
        filters: &FilterPipeline,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<OrderWithTickets>> {
        let mut query =
            QueryBuilder::<Sqlite>::new("SELECT o.id, o.created_at, o.user_id FROM orders o WHERE 1=1");
        filters.apply(&mut query);
        query.push(" ORDER BY o.created_at DESC, o.id DESC LIMIT ");
        query.push_bind(limit);
        query.push(" OFFSET ");
        query.push_bind(offset);

        let orders: Vec<Order> = query.build_query_as().fetch_all(&self.pool).await?;
        self.attach_tickets(orders).await
    }

    /// One order, if it matches `filters`.
    ///
    /// An order hidden by the filters is reported as not found.
    pub async fn get_order(
        &self,
        id: OrderId,
        filters: &FilterPipeline,
    ) -> Result<OrderWithTickets> {
        let mut query = QueryBuilder::<Sqlite>::new(
            "SELECT o.id, o.created_at, o.user_id FROM orders o WHERE o.id = ",
        );
        query.push_bind(id);
        filters.apply(&mut query);

        let order: Order = query
            .build_query_as()
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::not_found("order", id))?;

        self.attach_tickets(vec![order])
            .await?
            .pop()
            .ok_or(StoreError::not_found("order", id))
    }

    /// Place an order for `user_id` reserving every requested seat.
    ///
    /// ## Algorithm
    /// 1. Insert the order row (this takes the database write lock)
    /// 2. For each ticket, check the seat lies inside its session's hall,
    ///    is not requested twice and is not already sold
    /// 3. Insert the tickets; a UNIQUE violation means a concurrent order
    ///    took the seat first
    /// 4. Commit
    ///
    /// Any failure drops the transaction, so neither the order nor any of
    /// its tickets is persisted.
    pub async fn create_order(
        &self,
        user_id: UserId,
        tickets: &[TicketRequest],
    ) -> Result<OrderWithTickets> {
        if tickets.is_empty() {
            return Err(ValidationErrors::single("tickets", "This list may not be empty.").into());
        }

        let mut tx = self.pool.begin().await?;

        let order = sqlx::query_as::<_, Order>(
            "INSERT INTO orders (created_at, user_id) VALUES (?, ?) \
             RETURNING id, created_at, user_id",
        )
        .bind(Utc::now())
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        let errors = check_tickets(&mut tx, tickets).await?;
        if !errors.is_empty() {
            warn!("Rejected order for user {}: {}", user_id, errors);
            return Err(StoreError::Validation(errors));
        }

        insert_tickets(&mut tx, order.id, user_id, tickets).await?;

        tx.commit().await?;
        info!(
            "Created order {} for user {} with {} tickets",
            order.id,
            user_id,
            tickets.len()
        );

        self.attach_tickets(vec![order.clone()])
            .await?
            .pop()
            .ok_or(StoreError::not_found("order", order.id))
    }

    /// Load the tickets of `orders` in one query
    async fn attach_tickets(&self, orders: Vec<Order>) -> Result<Vec<OrderWithTickets>> {
        if orders.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<OrderId> = orders.iter().map(|o| o.id).collect();

        let mut query = QueryBuilder::<Sqlite>::new(
            r#"SELECT t.id, t."row", t.seat, t.order_id,
                      ms.id AS session_id,
                      ms.show_time,
                      m.title AS movie_title,
                      ch.name AS cinema_hall_name,
                      ch."rows" * ch.seats_in_row AS cinema_hall_capacity
               FROM tickets t
               JOIN movie_sessions ms ON ms.id = t.movie_session_id
               JOIN movies m ON m.id = ms.movie_id
               JOIN cinema_halls ch ON ch.id = ms.cinema_hall_id
               WHERE t.order_id IN ("#,
        );
        push_id_list(&mut query, &ids);
        query.push(") ORDER BY t.id");

        let rows: Vec<TicketRow> = query.build_query_as().fetch_all(&self.pool).await?;

        let mut tickets: HashMap<OrderId, Vec<OrderTicket>> = HashMap::new();
        for row in rows {
            tickets.entry(row.order_id).or_default().push(OrderTicket {
                id: row.id,
                row: row.row,
                seat: row.seat,
                movie_session: SessionSummary {
                    id: row.session_id,
                    show_time: row.show_time,
                    movie_title: row.movie_title,
                    cinema_hall_name: row.cinema_hall_name,
                    cinema_hall_capacity: row.cinema_hall_capacity,
                },
            });
        }

        Ok(orders
            .into_iter()
            .map(|order| OrderWithTickets {
                tickets: tickets.remove(&order.id).unwrap_or_default(),
                order,
            })
            .collect())
    }
}

const SEAT_TAKEN: &str = "seat is already taken";

/// Insert checked tickets for `order_id`.
///
/// A UNIQUE violation here means a concurrent order took the seat between
/// the check and the insert; it is reported like any other taken seat.
async fn insert_tickets(
    conn: &mut SqliteConnection,
    order_id: OrderId,
    user_id: UserId,
    tickets: &[TicketRequest],
) -> Result<()> {
    for (index, ticket) in tickets.iter().enumerate() {
        sqlx::query(
            r#"INSERT INTO tickets ("row", seat, movie_session_id, order_id) VALUES (?, ?, ?, ?)"#,
        )
        .bind(ticket.row)
        .bind(ticket.seat)
        .bind(ticket.movie_session_id)
        .bind(order_id)
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                warn!("Lost seat race for user {}: {:?}", user_id, ticket);
                ValidationErrors::single("tickets", describe(index, ticket, SEAT_TAKEN)).into()
            } else {
                StoreError::Database(e)
            }
        })?;
    }
    Ok(())
}

/// Validate every requested ticket, collecting one message per bad ticket
async fn check_tickets(
    conn: &mut SqliteConnection,
    tickets: &[TicketRequest],
) -> Result<ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let mut halls: HashMap<MovieSessionId, Option<HallBounds>> = HashMap::new();
    let mut requested: HashSet<(MovieSessionId, i32, i32)> = HashSet::new();

    for (index, ticket) in tickets.iter().enumerate() {
        let bounds = match halls.get(&ticket.movie_session_id) {
            Some(bounds) => *bounds,
            None => {
                let bounds = hall_bounds(conn, ticket.movie_session_id).await?;
                halls.insert(ticket.movie_session_id, bounds);
                bounds
            }
        };

        let Some(bounds) = bounds else {
            errors.add("tickets", describe(index, ticket, "movie session does not exist"));
            continue;
        };

        if let Some(problem) = out_of_bounds(ticket, bounds) {
            errors.add("tickets", describe(index, ticket, &problem));
            continue;
        }

        if !requested.insert((ticket.movie_session_id, ticket.row, ticket.seat)) {
            errors.add("tickets", describe(index, ticket, "seat is requested more than once"));
            continue;
        }

        if seat_taken(conn, ticket).await? {
            errors.add("tickets", describe(index, ticket, SEAT_TAKEN));
        }
    }

    Ok(errors)
}

async fn hall_bounds(
    conn: &mut SqliteConnection,
    session_id: MovieSessionId,
) -> Result<Option<HallBounds>> {
    let bounds = sqlx::query_as::<_, HallBounds>(
        r#"SELECT ch."rows", ch.seats_in_row
           FROM movie_sessions ms
           JOIN cinema_halls ch ON ch.id = ms.cinema_hall_id
           WHERE ms.id = ?"#,
    )
    .bind(session_id)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(bounds)
}

async fn seat_taken(conn: &mut SqliteConnection, ticket: &TicketRequest) -> Result<bool> {
    let taken: Option<i64> = sqlx::query_scalar(
        r#"SELECT id FROM tickets WHERE movie_session_id = ? AND "row" = ? AND seat = ?"#,
    )
    .bind(ticket.movie_session_id)
    .bind(ticket.row)
    .bind(ticket.seat)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(taken.is_some())
}

/// Why a ticket falls outside its hall, if it does
fn out_of_bounds(ticket: &TicketRequest, bounds: HallBounds) -> Option<String> {
    if !(1..=bounds.rows).contains(&ticket.row) {
        return Some(format!("row must be in range [1, {}]", bounds.rows));
    }
    if !(1..=bounds.seats_in_row).contains(&ticket.seat) {
        return Some(format!("seat must be in range [1, {}]", bounds.seats_in_row));
    }
    None
}

/// Name the offending ticket in an error message
fn describe(index: usize, ticket: &TicketRequest, problem: &str) -> String {
    format!(
        "tickets[{}] (movie_session {}, row {}, seat {}): {}",
        index, ticket.movie_session_id, ticket.row, ticket.seat, problem
    )
}
