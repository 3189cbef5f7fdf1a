//! Movie sessions and seat availability.
//!
//! The listing computes `tickets_available` in SQL: the session is joined
//! with its movie and hall, left-joined with its tickets, and grouped, so
//! the count of sold seats never requires loading ticket rows.

use crate::db::Database;
use crate::error::{invalid_pk, Result, StoreError, ValidationErrors};
use crate::movies::missing_ids;
use crate::types::*;
use chrono::NaiveDateTime;
use filters::FilterPipeline;
use sqlx::{FromRow, QueryBuilder, Sqlite};
use tracing::info;

const SESSION_LISTING: &str = r#"
    SELECT ms.id,
           ms.show_time,
           m.title AS movie_title,
           ch.name AS cinema_hall_name,
           ch."rows" * ch.seats_in_row AS cinema_hall_capacity,
           ch."rows" * ch.seats_in_row - COUNT(t.id) AS tickets_available
    FROM movie_sessions ms
    JOIN movies m ON m.id = ms.movie_id
    JOIN cinema_halls ch ON ch.id = ms.cinema_hall_id
    LEFT JOIN tickets t ON t.movie_session_id = ms.id
    WHERE 1=1"#;

const SESSION_DETAIL: &str = r#"
    SELECT ms.id,
           ms.show_time,
           m.id AS movie_id,
           m.title AS movie_title,
           m.description AS movie_description,
           m.duration AS movie_duration,
           ch.id AS hall_id,
           ch.name AS hall_name,
           ch."rows" AS hall_rows,
           ch.seats_in_row AS hall_seats_in_row
    FROM movie_sessions ms
    JOIN movies m ON m.id = ms.movie_id
    JOIN cinema_halls ch ON ch.id = ms.cinema_hall_id
    WHERE ms.id = ?"#;

/// Session joined with movie and hall in one row
#[derive(FromRow)]
struct SessionJoinRow {
    id: MovieSessionId,
    show_time: NaiveDateTime,
    movie_id: MovieId,
    movie_title: String,
    movie_description: String,
    movie_duration: i32,
    hall_id: CinemaHallId,
    hall_name: String,
    hall_rows: i32,
    hall_seats_in_row: i32,
}

impl Database {
    /// List sessions matching `filters`, newest show time first.
    ///
    /// Filters see the sessions table as `ms`.
    pub async fn list_sessions(&self, filters: &FilterPipeline) -> Result<Vec<SessionListing>> {
        let mut query = QueryBuilder::<Sqlite>::new(SESSION_LISTING);
        filters.apply(&mut query);
        query.push(" GROUP BY ms.id ORDER BY ms.show_time DESC, ms.id");

        let sessions: Vec<SessionListing> =
            query.build_query_as().fetch_all(&self.pool).await?;
        Ok(sessions)
    }

    /// The bare session row
    pub async fn get_session(&self, id: MovieSessionId) -> Result<MovieSession> {
        sqlx::query_as::<_, MovieSession>(
            "SELECT id, show_time, movie_id, cinema_hall_id FROM movie_sessions WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::not_found("movie session", id))
    }

    /// A session with its movie, hall and taken seats
    pub async fn get_session_detail(&self, id: MovieSessionId) -> Result<SessionDetail> {
        let row = sqlx::query_as::<_, SessionJoinRow>(SESSION_DETAIL)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::not_found("movie session", id))?;

        let movie = Movie {
            id: row.movie_id,
            title: row.movie_title,
            description: row.movie_description,
            duration: row.movie_duration,
        };
        let movie = self
            .attach_relations(vec![movie])
            .await?
            .pop()
            .ok_or(StoreError::not_found("movie", row.movie_id))?;

        let taken_places = sqlx::query_as::<_, Seat>(
            r#"SELECT "row", seat FROM tickets WHERE movie_session_id = ? ORDER BY "row", seat"#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(SessionDetail {
            id: row.id,
            show_time: row.show_time,
            movie,
            cinema_hall: CinemaHall {
                id: row.hall_id,
                name: row.hall_name,
                rows: row.hall_rows,
                seats_in_row: row.hall_seats_in_row,
            },
            taken_places,
        })
    }

    pub async fn create_session(&self, input: &MovieSessionInput) -> Result<MovieSession> {
        self.check_session_refs(input).await?;

        let session = sqlx::query_as::<_, MovieSession>(
            "INSERT INTO movie_sessions (show_time, movie_id, cinema_hall_id) VALUES (?, ?, ?) \
             RETURNING id, show_time, movie_id, cinema_hall_id",
        )
        .bind(input.show_time)
        .bind(input.movie_id)
        .bind(input.cinema_hall_id)
        .fetch_one(&self.pool)
        .await?;

        info!(
            "Created movie session {} (movie {}, hall {}, {})",
            session.id, session.movie_id, session.cinema_hall_id, session.show_time
        );
        Ok(session)
    }

    pub async fn update_session(
        &self,
        id: MovieSessionId,
        input: &MovieSessionInput,
    ) -> Result<MovieSession> {
        self.check_session_refs(input).await?;

        let session = sqlx::query_as::<_, MovieSession>(
            "UPDATE movie_sessions SET show_time = ?, movie_id = ?, cinema_hall_id = ? \
             WHERE id = ? RETURNING id, show_time, movie_id, cinema_hall_id",
        )
        .bind(input.show_time)
        .bind(input.movie_id)
        .bind(input.cinema_hall_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::not_found("movie session", id))?;

        info!("Updated movie session {}", id);
        Ok(session)
    }

    pub async fn delete_session(&self, id: MovieSessionId) -> Result<()> {
        self.delete_by_id("movie_sessions", "movie session", id).await
    }

    async fn check_session_refs(&self, input: &MovieSessionInput) -> Result<()> {
        let mut conn = self.pool.acquire().await?;
        let mut errors = ValidationErrors::new();

        for id in missing_ids(&mut conn, "movies", &[input.movie_id]).await? {
            errors.add("movie", invalid_pk(id));
        }
        for id in missing_ids(&mut conn, "cinema_halls", &[input.cinema_hall_id]).await? {
            errors.add("cinema_hall", invalid_pk(id));
        }

        errors.into_result()
    }
}
