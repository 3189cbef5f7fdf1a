//! Movies and their genre/actor associations.
//!
//! Listing is two-phase:
//! 1. One query selects the movie rows, with the caller's filters applied
//!    in SQL
//! 2. One batched query each loads the genres and actors of every listed
//!    movie, so the number of queries does not grow with the page
//!
//! Writes replace the link rows inside the same transaction as the movie
//! row.

use crate::db::{push_id_list, Database};
use crate::error::{invalid_pk, Result, StoreError, ValidationErrors};
use crate::types::*;
use filters::FilterPipeline;
use sqlx::{FromRow, QueryBuilder, Sqlite, SqliteConnection};
use std::collections::HashMap;
use tracing::{debug, info};

#[derive(FromRow)]
struct GenreLink {
    movie_id: MovieId,
    #[sqlx(flatten)]
    genre: Genre,
}

#[derive(FromRow)]
struct ActorLink {
    movie_id: MovieId,
    #[sqlx(flatten)]
    actor: Actor,
}

impl Database {
    /// List movies matching `filters`, each with its genres and actors.
    ///
    /// Filters see the movies table as `m`.
    pub async fn list_movies(&self, filters: &FilterPipeline) -> Result<Vec<MovieWithRelations>> {
        let mut query = QueryBuilder::<Sqlite>::new(
            "SELECT DISTINCT m.id, m.title, m.description, m.duration FROM movies m WHERE 1=1",
        );
        filters.apply(&mut query);
        query.push(" ORDER BY m.id");

        let movies: Vec<Movie> = query.build_query_as().fetch_all(&self.pool).await?;
        debug!("Movie query matched {} rows", movies.len());

        self.attach_relations(movies).await
    }

    pub async fn get_movie(&self, id: MovieId) -> Result<MovieWithRelations> {
        let movie = sqlx::query_as::<_, Movie>(
            "SELECT id, title, description, duration FROM movies WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::not_found("movie", id))?;

        let mut loaded = self.attach_relations(vec![movie]).await?;
        loaded.pop().ok_or(StoreError::not_found("movie", id))
    }

    /// Create a movie and link it to existing genres and actors.
    pub async fn create_movie(&self, input: &MovieInput) -> Result<MovieWithRelations> {
        let mut tx = self.pool.begin().await?;

        check_links(&mut tx, input).await?;

        let id: MovieId = sqlx::query_scalar(
            "INSERT INTO movies (title, description, duration) VALUES (?, ?, ?) RETURNING id",
        )
        .bind(input.title.as_str())
        .bind(input.description.as_str())
        .bind(input.duration)
        .fetch_one(&mut *tx)
        .await?;

        replace_links(&mut tx, id, input).await?;
        tx.commit().await?;

        info!("Created movie {} ({})", id, input.title);
        self.get_movie(id).await
    }

    /// Overwrite a movie, including its full set of genres and actors.
    pub async fn update_movie(
        &self,
        id: MovieId,
        input: &MovieInput,
    ) -> Result<MovieWithRelations> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            "UPDATE movies SET title = ?, description = ?, duration = ? WHERE id = ?",
        )
        .bind(input.title.as_str())
        .bind(input.description.as_str())
        .bind(input.duration)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(StoreError::not_found("movie", id));
        }

        check_links(&mut tx, input).await?;
        replace_links(&mut tx, id, input).await?;
        tx.commit().await?;

        info!("Updated movie {}", id);
        self.get_movie(id).await
    }

    pub async fn delete_movie(&self, id: MovieId) -> Result<()> {
        self.delete_by_id("movies", "movie", id).await
    }

    /// Load genres and actors for `movies` in one query per relation.
    pub(crate) async fn attach_relations(
        &self,
        movies: Vec<Movie>,
    ) -> Result<Vec<MovieWithRelations>> {
        if movies.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<MovieId> = movies.iter().map(|m| m.id).collect();

        let mut query = QueryBuilder::<Sqlite>::new(
            "SELECT mg.movie_id, g.id, g.name FROM movie_genres mg \
             JOIN genres g ON g.id = mg.genre_id WHERE mg.movie_id IN (",
        );
        push_id_list(&mut query, &ids);
        query.push(") ORDER BY g.id");
        let genre_links: Vec<GenreLink> = query.build_query_as().fetch_all(&self.pool).await?;

        let mut query = QueryBuilder::<Sqlite>::new(
            "SELECT ma.movie_id, a.id, a.first_name, a.last_name FROM movie_actors ma \
             JOIN actors a ON a.id = ma.actor_id WHERE ma.movie_id IN (",
        );
        push_id_list(&mut query, &ids);
        query.push(") ORDER BY a.id");
        let actor_links: Vec<ActorLink> = query.build_query_as().fetch_all(&self.pool).await?;

        let mut genres: HashMap<MovieId, Vec<Genre>> = HashMap::new();
        for link in genre_links {
            genres.entry(link.movie_id).or_default().push(link.genre);
        }

        let mut actors: HashMap<MovieId, Vec<Actor>> = HashMap::new();
        for link in actor_links {
            actors.entry(link.movie_id).or_default().push(link.actor);
        }

        Ok(movies
            .into_iter()
            .map(|movie| MovieWithRelations {
                genres: genres.remove(&movie.id).unwrap_or_default(),
                actors: actors.remove(&movie.id).unwrap_or_default(),
                movie,
            })
            .collect())
    }
}

/// Reject genre/actor ids that do not exist.
async fn check_links(conn: &mut SqliteConnection, input: &MovieInput) -> Result<()> {
    let mut errors = ValidationErrors::new();

    for id in missing_ids(conn, "genres", &input.genres).await? {
        errors.add("genres", invalid_pk(id));
    }
    for id in missing_ids(conn, "actors", &input.actors).await? {
        errors.add("actors", invalid_pk(id));
    }

    errors.into_result()
}

/// The subset of `ids` with no row in `table`, in request order
pub(crate) async fn missing_ids(
    conn: &mut SqliteConnection,
    table: &'static str,
    ids: &[i64],
) -> Result<Vec<i64>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut query = QueryBuilder::<Sqlite>::new(format!("SELECT id FROM {table} WHERE id IN ("));
    push_id_list(&mut query, ids);
    query.push(")");

    let found: Vec<i64> = query.build_query_scalar().fetch_all(&mut *conn).await?;

    let mut missing: Vec<i64> = Vec::new();
    for id in ids {
        if !found.contains(id) && !missing.contains(id) {
            missing.push(*id);
        }
    }
    Ok(missing)
}

/// Replace the movie's link rows with the ids in `input`
async fn replace_links(conn: &mut SqliteConnection, id: MovieId, input: &MovieInput) -> Result<()> {
    sqlx::query("DELETE FROM movie_genres WHERE movie_id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    sqlx::query("DELETE FROM movie_actors WHERE movie_id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    for genre_id in unique_ids(&input.genres) {
        sqlx::query("INSERT INTO movie_genres (movie_id, genre_id) VALUES (?, ?)")
            .bind(id)
            .bind(genre_id)
            .execute(&mut *conn)
            .await?;
    }
    for actor_id in unique_ids(&input.actors) {
        sqlx::query("INSERT INTO movie_actors (movie_id, actor_id) VALUES (?, ?)")
            .bind(id)
            .bind(actor_id)
            .execute(&mut *conn)
            .await?;
    }

    Ok(())
}

fn unique_ids(ids: &[i64]) -> Vec<i64> {
    let mut ids = ids.to_vec();
    ids.sort_unstable();
    ids.dedup();
    ids
}
