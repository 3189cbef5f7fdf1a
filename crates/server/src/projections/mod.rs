//! Response shapes.
//!
//! Each resource renders differently depending on the action being served.
//! Resources whose actions all start from the same record (movies, orders)
//! expose a `*_projection(Action)` function returning the projection to
//! apply; the handler picks it once and maps every record through it.

pub mod catalog;
pub mod movies;
pub mod orders;
pub mod sessions;

pub use catalog::{ActorView, CinemaHallView, GenreView};
pub use movies::{movie_projection, MovieDetail, MovieListItem, MovieRecord, MovieView};
pub use orders::{order_projection, OrderDetail, OrderRecord, OrderView};
pub use sessions::{SeatView, SessionDetailView, SessionListItem, SessionRecord, SessionSummaryView};

/// What a request is doing to a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    List,
    Retrieve,
    Create,
    Update,
    PartialUpdate,
}
