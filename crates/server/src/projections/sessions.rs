//! Movie session views.
//!
//! Unlike movies, each session action reads a different record from the
//! store (a listing row, a detail with taken seats, or the bare session),
//! so every view converts from its own source type.

use super::catalog::CinemaHallView;
use super::movies::MovieListItem;
use chrono::NaiveDateTime;
use serde::Serialize;
use store::{
    CinemaHallId, MovieId, MovieSession, MovieSessionId, Seat, SessionDetail, SessionListing,
    SessionSummary,
};

/// A session as it appears inside an order's tickets
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummaryView {
    pub id: MovieSessionId,
    pub show_time: NaiveDateTime,
    pub movie_title: String,
    pub cinema_hall_name: String,
    pub cinema_hall_capacity: i64,
}

impl From<SessionSummary> for SessionSummaryView {
    fn from(summary: SessionSummary) -> Self {
        Self {
            id: summary.id,
            show_time: summary.show_time,
            movie_title: summary.movie_title,
            cinema_hall_name: summary.cinema_hall_name,
            cinema_hall_capacity: summary.cinema_hall_capacity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionListItem {
    #[serde(flatten)]
    pub summary: SessionSummaryView,
    pub tickets_available: i64,
}

impl From<SessionListing> for SessionListItem {
    fn from(listing: SessionListing) -> Self {
        Self {
            summary: listing.summary.into(),
            tickets_available: listing.tickets_available,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeatView {
    pub row: i32,
    pub seat: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionDetailView {
    pub id: MovieSessionId,
    pub show_time: NaiveDateTime,
    pub movie: MovieListItem,
    pub cinema_hall: CinemaHallView,
    pub taken_places: Vec<SeatView>,
}

impl From<SessionDetail> for SessionDetailView {
    fn from(detail: SessionDetail) -> Self {
        Self {
            id: detail.id,
            show_time: detail.show_time,
            movie: detail.movie.into(),
            cinema_hall: detail.cinema_hall.into(),
            taken_places: detail
                .taken_places
                .into_iter()
                .map(|Seat { row, seat }| SeatView { row, seat })
                .collect(),
        }
    }
}

/// Write projection: references by id
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionRecord {
    pub id: MovieSessionId,
    pub show_time: NaiveDateTime,
    pub movie: MovieId,
    pub cinema_hall: CinemaHallId,
}

impl From<MovieSession> for SessionRecord {
    fn from(session: MovieSession) -> Self {
        Self {
            id: session.id,
            show_time: session.show_time,
            movie: session.movie_id,
            cinema_hall: session.cinema_hall_id,
        }
    }
}
