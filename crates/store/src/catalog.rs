//! Reference data: genres, actors and cinema halls.
//!
//! These tables are small, so listings return every row ordered by id.

use crate::db::Database;
use crate::error::{is_unique_violation, Result, StoreError, ValidationErrors};
use crate::types::*;
use tracing::info;

const DUPLICATE_GENRE: &str = "genre with this name already exists.";

impl Database {
    // -------------------------------------------------------------------------
    // Genres
    // -------------------------------------------------------------------------

    pub async fn list_genres(&self) -> Result<Vec<Genre>> {
        let genres = sqlx::query_as::<_, Genre>("SELECT id, name FROM genres ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(genres)
    }

    pub async fn get_genre(&self, id: GenreId) -> Result<Genre> {
        sqlx::query_as::<_, Genre>("SELECT id, name FROM genres WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::not_found("genre", id))
    }

    /// Create a genre. Names are unique.
    pub async fn create_genre(&self, input: &GenreInput) -> Result<Genre> {
        let genre = sqlx::query_as::<_, Genre>(
            "INSERT INTO genres (name) VALUES (?) RETURNING id, name",
        )
        .bind(input.name.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| unique_to_validation(e, "name", DUPLICATE_GENRE))?;

        info!("Created genre {} ({})", genre.id, genre.name);
        Ok(genre)
    }

    pub async fn update_genre(&self, id: GenreId, input: &GenreInput) -> Result<Genre> {
        let genre = sqlx::query_as::<_, Genre>(
            "UPDATE genres SET name = ? WHERE id = ? RETURNING id, name",
        )
        .bind(input.name.as_str())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| unique_to_validation(e, "name", DUPLICATE_GENRE))?
        .ok_or(StoreError::not_found("genre", id))?;

        info!("Updated genre {}", id);
        Ok(genre)
    }

    pub async fn delete_genre(&self, id: GenreId) -> Result<()> {
        self.delete_by_id("genres", "genre", id).await
    }

    // -------------------------------------------------------------------------
    // Actors
    // -------------------------------------------------------------------------

    pub async fn list_actors(&self) -> Result<Vec<Actor>> {
        let actors = sqlx::query_as::<_, Actor>(
            "SELECT id, first_name, last_name FROM actors ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(actors)
    }

    pub async fn get_actor(&self, id: ActorId) -> Result<Actor> {
        sqlx::query_as::<_, Actor>("SELECT id, first_name, last_name FROM actors WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::not_found("actor", id))
    }

    pub async fn create_actor(&self, input: &ActorInput) -> Result<Actor> {
        let actor = sqlx::query_as::<_, Actor>(
            "INSERT INTO actors (first_name, last_name) VALUES (?, ?) \
             RETURNING id, first_name, last_name",
        )
        .bind(input.first_name.as_str())
        .bind(input.last_name.as_str())
        .fetch_one(&self.pool)
        .await?;

        info!("Created actor {} ({})", actor.id, actor.full_name());
        Ok(actor)
    }

    pub async fn update_actor(&self, id: ActorId, input: &ActorInput) -> Result<Actor> {
        let actor = sqlx::query_as::<_, Actor>(
            "UPDATE actors SET first_name = ?, last_name = ? WHERE id = ? \
             RETURNING id, first_name, last_name",
        )
        .bind(input.first_name.as_str())
        .bind(input.last_name.as_str())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::not_found("actor", id))?;

        info!("Updated actor {}", id);
        Ok(actor)
    }

    pub async fn delete_actor(&self, id: ActorId) -> Result<()> {
        self.delete_by_id("actors", "actor", id).await
    }

    // -------------------------------------------------------------------------
    // Cinema halls
    // -------------------------------------------------------------------------

    pub async fn list_cinema_halls(&self) -> Result<Vec<CinemaHall>> {
        let halls = sqlx::query_as::<_, CinemaHall>(
            r#"SELECT id, name, "rows", seats_in_row FROM cinema_halls ORDER BY id"#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(halls)
    }

    pub async fn get_cinema_hall(&self, id: CinemaHallId) -> Result<CinemaHall> {
        sqlx::query_as::<_, CinemaHall>(
            r#"SELECT id, name, "rows", seats_in_row FROM cinema_halls WHERE id = ?"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::not_found("cinema hall", id))
    }

    pub async fn create_cinema_hall(&self, input: &CinemaHallInput) -> Result<CinemaHall> {
        let hall = sqlx::query_as::<_, CinemaHall>(
            r#"INSERT INTO cinema_halls (name, "rows", seats_in_row) VALUES (?, ?, ?)
               RETURNING id, name, "rows", seats_in_row"#,
        )
        .bind(input.name.as_str())
        .bind(input.rows)
        .bind(input.seats_in_row)
        .fetch_one(&self.pool)
        .await?;

        info!(
            "Created cinema hall {} ({}, capacity {})",
            hall.id,
            hall.name,
            hall.capacity()
        );
        Ok(hall)
    }

    pub async fn update_cinema_hall(
        &self,
        id: CinemaHallId,
        input: &CinemaHallInput,
    ) -> Result<CinemaHall> {
        let hall = sqlx::query_as::<_, CinemaHall>(
            r#"UPDATE cinema_halls SET name = ?, "rows" = ?, seats_in_row = ? WHERE id = ?
               RETURNING id, name, "rows", seats_in_row"#,
        )
        .bind(input.name.as_str())
        .bind(input.rows)
        .bind(input.seats_in_row)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::not_found("cinema hall", id))?;

        info!("Updated cinema hall {}", id);
        Ok(hall)
    }

    pub async fn delete_cinema_hall(&self, id: CinemaHallId) -> Result<()> {
        self.delete_by_id("cinema_halls", "cinema hall", id).await
    }

    /// Delete one row by id; dependent rows go with it (ON DELETE CASCADE)
    pub(crate) async fn delete_by_id(
        &self,
        table: &'static str,
        entity: &'static str,
        id: i64,
    ) -> Result<()> {
        let result = sqlx::query(&format!("DELETE FROM {table} WHERE id = ?"))
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(entity, id));
        }

        info!("Deleted {} {}", entity, id);
        Ok(())
    }
}

/// Turn a UNIQUE violation into a validation error on `field`
pub(crate) fn unique_to_validation(err: sqlx::Error, field: &str, message: &str) -> StoreError {
    if is_unique_violation(&err) {
        StoreError::Validation(ValidationErrors::single(field, message))
    } else {
        StoreError::Database(err)
    }
}
