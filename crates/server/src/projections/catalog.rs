//! Genre, actor and cinema hall views (the same for every action).

use serde::Serialize;
use store::{Actor, ActorId, CinemaHall, CinemaHallId, Genre, GenreId};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreView {
    pub id: GenreId,
    pub name: String,
}

impl From<Genre> for GenreView {
    fn from(genre: Genre) -> Self {
        Self {
            id: genre.id,
            name: genre.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActorView {
    pub id: ActorId,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
}

impl From<Actor> for ActorView {
    fn from(actor: Actor) -> Self {
        Self {
            full_name: actor.full_name(),
            id: actor.id,
            first_name: actor.first_name,
            last_name: actor.last_name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CinemaHallView {
    pub id: CinemaHallId,
    pub name: String,
    pub rows: i32,
    pub seats_in_row: i32,
    pub capacity: i64,
}

impl From<CinemaHall> for CinemaHallView {
    fn from(hall: CinemaHall) -> Self {
        Self {
            capacity: hall.capacity(),
            id: hall.id,
            name: hall.name,
            rows: hall.rows,
            seats_in_row: hall.seats_in_row,
        }
    }
}
