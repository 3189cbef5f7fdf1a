//! Core domain types for the cinema.
//!
//! This module defines the records read from and written to the store:
//! - Catalog records (Genre, Actor, CinemaHall, Movie)
//! - Sessions, with the joined shapes the listing and detail queries return
//! - Orders and their tickets
//! - Input types accepted by the write operations

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// =============================================================================
// Type Aliases
// =============================================================================

pub type UserId = i64;
pub type GenreId = i64;
pub type ActorId = i64;
pub type CinemaHallId = i64;
pub type MovieId = i64;
pub type MovieSessionId = i64;
pub type OrderId = i64;
pub type TicketId = i64;

// =============================================================================
// Catalog
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Genre {
    pub id: GenreId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Actor {
    pub id: ActorId,
    pub first_name: String,
    pub last_name: String,
}

impl Actor {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct CinemaHall {
    pub id: CinemaHallId,
    pub name: String,
    pub rows: i32,
    pub seats_in_row: i32,
}

impl CinemaHall {
    /// Total number of seats
    pub fn capacity(&self) -> i64 {
        i64::from(self.rows) * i64::from(self.seats_in_row)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    pub description: String,
    /// Running time in minutes
    pub duration: i32,
}

/// A movie with its genres and actors loaded alongside it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MovieWithRelations {
    pub movie: Movie,
    pub genres: Vec<Genre>,
    pub actors: Vec<Actor>,
}

// =============================================================================
// Sessions
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct MovieSession {
    pub id: MovieSessionId,
    pub show_time: NaiveDateTime,
    pub movie_id: MovieId,
    pub cinema_hall_id: CinemaHallId,
}

/// A session joined with its movie title and hall
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct SessionSummary {
    pub id: MovieSessionId,
    pub show_time: NaiveDateTime,
    pub movie_title: String,
    pub cinema_hall_name: String,
    pub cinema_hall_capacity: i64,
}

/// One row of the session listing.
///
/// `tickets_available` is computed by the listing query as hall capacity
/// minus the number of tickets sold for the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct SessionListing {
    #[sqlx(flatten)]
    pub summary: SessionSummary,
    pub tickets_available: i64,
}

/// An occupied seat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, FromRow)]
pub struct Seat {
    pub row: i32,
    pub seat: i32,
}

/// A session with its movie, hall and taken seats
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionDetail {
    pub id: MovieSessionId,
    pub show_time: NaiveDateTime,
    pub movie: MovieWithRelations,
    pub cinema_hall: CinemaHall,
    pub taken_places: Vec<Seat>,
}

// =============================================================================
// Orders
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Order {
    pub id: OrderId,
    pub created_at: DateTime<Utc>,
    pub user_id: UserId,
}

/// A ticket with the session it admits to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderTicket {
    pub id: TicketId,
    pub row: i32,
    pub seat: i32,
    pub movie_session: SessionSummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderWithTickets {
    pub order: Order,
    pub tickets: Vec<OrderTicket>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub token: String,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Write Inputs
// =============================================================================
// Already validated for shape by the caller; the store checks references
// and uniqueness.

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GenreInput {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ActorInput {
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CinemaHallInput {
    pub name: String,
    pub rows: i32,
    pub seats_in_row: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MovieInput {
    pub title: String,
    pub description: String,
    pub duration: i32,
    pub genres: Vec<GenreId>,
    pub actors: Vec<ActorId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MovieSessionInput {
    pub show_time: NaiveDateTime,
    pub movie_id: MovieId,
    pub cinema_hall_id: CinemaHallId,
}

/// One seat requested in a new order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub struct TicketRequest {
    pub movie_session_id: MovieSessionId,
    pub row: i32,
    pub seat: i32,
}
