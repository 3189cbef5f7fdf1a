//! Movie views.
//!
//! - list: genre names and actor full names
//! - retrieve: nested genre and actor objects
//! - writes: genre and actor ids, mirroring the request body

use super::catalog::{ActorView, GenreView};
use super::Action;
use serde::Serialize;
use store::{ActorId, GenreId, MovieId, MovieWithRelations};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieListItem {
    pub id: MovieId,
    pub title: String,
    pub description: String,
    pub duration: i32,
    pub genres: Vec<String>,
    pub actors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieDetail {
    pub id: MovieId,
    pub title: String,
    pub description: String,
    pub duration: i32,
    pub genres: Vec<GenreView>,
    pub actors: Vec<ActorView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieRecord {
    pub id: MovieId,
    pub title: String,
    pub description: String,
    pub duration: i32,
    pub genres: Vec<GenreId>,
    pub actors: Vec<ActorId>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MovieView {
    List(MovieListItem),
    Detail(MovieDetail),
    Record(MovieRecord),
}

pub type MovieProjection = fn(MovieWithRelations) -> MovieView;

/// The projection movies are rendered with for `action`
pub fn movie_projection(action: Action) -> MovieProjection {
    match action {
        Action::List => as_list_item,
        Action::Retrieve => as_detail,
        Action::Create | Action::Update | Action::PartialUpdate => as_record,
    }
}

fn as_list_item(movie: MovieWithRelations) -> MovieView {
    MovieView::List(MovieListItem::from(movie))
}

fn as_detail(movie: MovieWithRelations) -> MovieView {
    let MovieWithRelations {
        movie,
        genres,
        actors,
    } = movie;
    MovieView::Detail(MovieDetail {
        id: movie.id,
        title: movie.title,
        description: movie.description,
        duration: movie.duration,
        genres: genres.into_iter().map(GenreView::from).collect(),
        actors: actors.into_iter().map(ActorView::from).collect(),
    })
}

fn as_record(movie: MovieWithRelations) -> MovieView {
    let MovieWithRelations {
        movie,
        genres,
        actors,
    } = movie;
    MovieView::Record(MovieRecord {
        id: movie.id,
        title: movie.title,
        description: movie.description,
        duration: movie.duration,
        genres: genres.iter().map(|g| g.id).collect(),
        actors: actors.iter().map(|a| a.id).collect(),
    })
}

// Also nested inside the session detail view
impl From<MovieWithRelations> for MovieListItem {
    fn from(movie: MovieWithRelations) -> Self {
        let MovieWithRelations {
            movie,
            genres,
            actors,
        } = movie;
        Self {
            id: movie.id,
            title: movie.title,
            description: movie.description,
            duration: movie.duration,
            genres: genres.into_iter().map(|g| g.name).collect(),
            actors: actors.iter().map(|a| a.full_name()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use store::{Actor, Genre, Movie};

    fn matrix() -> MovieWithRelations {
        MovieWithRelations {
            movie: Movie {
                id: 1,
                title: "The Matrix".to_string(),
                description: "Red pill".to_string(),
                duration: 136,
            },
            genres: vec![Genre {
                id: 2,
                name: "Sci-Fi".to_string(),
            }],
            actors: vec![Actor {
                id: 3,
                first_name: "Keanu".to_string(),
                last_name: "Reeves".to_string(),
            }],
        }
    }

    #[test]
    fn test_list_projection_flattens_relations() {
        let view = movie_projection(Action::List)(matrix());
        let value = serde_json::to_value(view).unwrap();

        assert_eq!(value["genres"], json!(["Sci-Fi"]));
        assert_eq!(value["actors"], json!(["Keanu Reeves"]));
    }

    #[test]
    fn test_retrieve_projection_nests_relations() {
        let view = movie_projection(Action::Retrieve)(matrix());
        let value = serde_json::to_value(view).unwrap();

        assert_eq!(value["genres"], json!([{"id": 2, "name": "Sci-Fi"}]));
        assert_eq!(value["actors"][0]["full_name"], "Keanu Reeves");
    }

    #[test]
    fn test_write_projections_use_ids() {
        for action in [Action::Create, Action::Update, Action::PartialUpdate] {
            let value = serde_json::to_value(movie_projection(action)(matrix())).unwrap();
            assert_eq!(value["genres"], json!([2]));
            assert_eq!(value["actors"], json!([3]));
        }
    }
}
