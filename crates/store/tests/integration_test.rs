//! Integration tests for the store.
//!
//! Every test runs against a fresh database with the real migrations
//! applied: in memory, or in a temporary file when a test needs more than
//! one connection.

use chrono::NaiveDate;
use filters::filters::*;
use filters::FilterPipeline;
use store::*;

async fn setup() -> Database {
    let db = Database::in_memory().await.unwrap();
    db.migrate().await.unwrap();
    db
}

fn show_time(day: u32, hour: u32) -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

struct Fixture {
    drama: Genre,
    comedy: Genre,
    action: Genre,
    keanu: Actor,
    carrie: Actor,
    small_hall: CinemaHall,
    matrix: MovieWithRelations,
    reloaded: MovieWithRelations,
    amelie: MovieWithRelations,
    session: MovieSession,
}

async fn seed(db: &Database) -> Fixture {
    let drama = db.create_genre(&GenreInput { name: "Drama".into() }).await.unwrap();
    let comedy = db.create_genre(&GenreInput { name: "Comedy".into() }).await.unwrap();
    let action = db.create_genre(&GenreInput { name: "Action".into() }).await.unwrap();

    let keanu = db
        .create_actor(&ActorInput {
            first_name: "Keanu".into(),
            last_name: "Reeves".into(),
        })
        .await
        .unwrap();
    let carrie = db
        .create_actor(&ActorInput {
            first_name: "Carrie-Anne".into(),
            last_name: "Moss".into(),
        })
        .await
        .unwrap();

    let small_hall = db
        .create_cinema_hall(&CinemaHallInput {
            name: "Small".into(),
            rows: 2,
            seats_in_row: 3,
        })
        .await
        .unwrap();

    let matrix = db
        .create_movie(&MovieInput {
            title: "The Matrix".into(),
            description: "Red pill.".into(),
            duration: 136,
            genres: vec![action.id, drama.id],
            actors: vec![keanu.id, carrie.id],
        })
        .await
        .unwrap();
    let reloaded = db
        .create_movie(&MovieInput {
            title: "The MATRIX Reloaded".into(),
            description: "Blue pill.".into(),
            duration: 138,
            genres: vec![action.id],
            actors: vec![keanu.id],
        })
        .await
        .unwrap();
    let amelie = db
        .create_movie(&MovieInput {
            title: "Amelie".into(),
            description: "Montmartre.".into(),
            duration: 122,
            genres: vec![comedy.id],
            actors: vec![],
        })
        .await
        .unwrap();

    let session = db
        .create_session(&MovieSessionInput {
            show_time: show_time(1, 18),
            movie_id: matrix.movie.id,
            cinema_hall_id: small_hall.id,
        })
        .await
        .unwrap();

    Fixture {
        drama,
        comedy,
        action,
        keanu,
        carrie,
        small_hall,
        matrix,
        reloaded,
        amelie,
        session,
    }
}

fn titles(movies: &[MovieWithRelations]) -> Vec<&str> {
    movies.iter().map(|m| m.movie.title.as_str()).collect()
}

fn seat(session: &MovieSession, row: i32, seat: i32) -> TicketRequest {
    TicketRequest {
        movie_session_id: session.id,
        row,
        seat,
    }
}

#[tokio::test]
async fn test_movie_relations_are_loaded() {
    let db = setup().await;
    let fx = seed(&db).await;

    let movie = db.get_movie(fx.matrix.movie.id).await.unwrap();
    assert_eq!(movie.genres, vec![fx.drama.clone(), fx.action.clone()]);
    assert_eq!(movie.actors, vec![fx.keanu.clone(), fx.carrie.clone()]);

    let all = db.list_movies(&FilterPipeline::new()).await.unwrap();
    assert_eq!(titles(&all), vec!["The Matrix", "The MATRIX Reloaded", "Amelie"]);
    assert!(all[2].actors.is_empty());
}

#[tokio::test]
async fn test_title_filter_is_case_insensitive() {
    let db = setup().await;
    let _fx = seed(&db).await;

    let pipeline = FilterPipeline::new().add_filter(TitleContains::new("matrix"));
    let movies = db.list_movies(&pipeline).await.unwrap();

    assert_eq!(titles(&movies), vec!["The Matrix", "The MATRIX Reloaded"]);
}

#[tokio::test]
async fn test_genre_filter_matches_any_without_duplicates() {
    let db = setup().await;
    let fx = seed(&db).await;

    // The Matrix is in both genres and must still appear once
    let pipeline =
        FilterPipeline::new().add_filter(RelatedAny::genres(vec![fx.action.id, fx.drama.id]));
    let movies = db.list_movies(&pipeline).await.unwrap();
    assert_eq!(titles(&movies), vec!["The Matrix", "The MATRIX Reloaded"]);

    let pipeline =
        FilterPipeline::new().add_filter(RelatedAny::genres(vec![fx.drama.id, fx.comedy.id]));
    let movies = db.list_movies(&pipeline).await.unwrap();
    assert_eq!(titles(&movies), vec!["The Matrix", "Amelie"]);
}

#[tokio::test]
async fn test_filters_combine_with_and() {
    let db = setup().await;
    let fx = seed(&db).await;

    let pipeline = FilterPipeline::new()
        .add_filter(RelatedAny::actors(vec![fx.keanu.id]))
        .add_filter(RelatedAny::genres(vec![fx.drama.id]));
    let movies = db.list_movies(&pipeline).await.unwrap();
    assert_eq!(titles(&movies), vec!["The Matrix"]);

    let pipeline = FilterPipeline::new()
        .add_filter(TitleContains::new("amelie"))
        .add_filter(MatchNothing);
    assert!(db.list_movies(&pipeline).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_movie_with_unknown_genre_is_rejected() {
    let db = setup().await;
    let fx = seed(&db).await;

    let err = db
        .create_movie(&MovieInput {
            title: "Ghost".into(),
            description: "".into(),
            duration: 90,
            genres: vec![fx.drama.id, 999],
            actors: vec![],
        })
        .await
        .unwrap_err();

    match err {
        StoreError::Validation(errors) => {
            assert_eq!(errors.field("genres"), ["Invalid pk \"999\" - object does not exist."]);
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    assert_eq!(db.list_movies(&FilterPipeline::new()).await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_update_movie_replaces_relations() {
    let db = setup().await;
    let fx = seed(&db).await;

    let updated = db
        .update_movie(
            fx.amelie.movie.id,
            &MovieInput {
                title: "Amélie".into(),
                description: "Paris.".into(),
                duration: 123,
                genres: vec![fx.drama.id, fx.drama.id],
                actors: vec![fx.carrie.id],
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.movie.title, "Amélie");
    assert_eq!(updated.genres, vec![fx.drama.clone()]);
    assert_eq!(updated.actors, vec![fx.carrie.clone()]);

    let input = MovieInput {
        title: "x".into(),
        description: "".into(),
        duration: 1,
        genres: vec![],
        actors: vec![],
    };
    assert!(matches!(
        db.update_movie(999, &input).await,
        Err(StoreError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_duplicate_genre_name_is_a_validation_error() {
    let db = setup().await;
    let _fx = seed(&db).await;

    let err = db
        .create_genre(&GenreInput { name: "Drama".into() })
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::Validation(ref e) if !e.field("name").is_empty()));
}

#[tokio::test]
async fn test_catalog_not_found() {
    let db = setup().await;

    assert!(matches!(db.get_genre(1).await, Err(StoreError::NotFound { .. })));
    assert!(matches!(db.delete_actor(1).await, Err(StoreError::NotFound { .. })));
    assert!(matches!(
        db.update_cinema_hall(
            1,
            &CinemaHallInput {
                name: "Red".into(),
                rows: 1,
                seats_in_row: 1
            }
        )
        .await,
        Err(StoreError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_tickets_available_is_capacity_minus_sold() {
    let db = setup().await;
    let fx = seed(&db).await;
    let user = db.create_user("alice").await.unwrap();

    db.create_order(user.id, &[seat(&fx.session, 1, 1), seat(&fx.session, 2, 3)])
        .await
        .unwrap();

    let empty = db
        .create_session(&MovieSessionInput {
            show_time: show_time(2, 20),
            movie_id: fx.amelie.movie.id,
            cinema_hall_id: fx.small_hall.id,
        })
        .await
        .unwrap();

    let sessions = db.list_sessions(&FilterPipeline::new()).await.unwrap();
    assert_eq!(sessions.len(), 2);

    // Newest show time first
    assert_eq!(sessions[0].summary.id, empty.id);
    assert_eq!(sessions[0].tickets_available, 6);

    let sold = &sessions[1];
    assert_eq!(sold.summary.id, fx.session.id);
    assert_eq!(sold.summary.movie_title, "The Matrix");
    assert_eq!(sold.summary.cinema_hall_name, "Small");
    assert_eq!(sold.summary.cinema_hall_capacity, 6);
    assert_eq!(sold.tickets_available, 4);
}

#[tokio::test]
async fn test_session_filters() {
    let db = setup().await;
    let fx = seed(&db).await;

    db.create_session(&MovieSessionInput {
        show_time: show_time(2, 20),
        movie_id: fx.reloaded.movie.id,
        cinema_hall_id: fx.small_hall.id,
    })
    .await
    .unwrap();

    let on_first = FilterPipeline::new()
        .add_filter(ShowDate::new(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()));
    let sessions = db.list_sessions(&on_first).await.unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].summary.id, fx.session.id);

    let of_reloaded = FilterPipeline::new().add_filter(SessionOfMovie::new(fx.reloaded.movie.id));
    let sessions = db.list_sessions(&of_reloaded).await.unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].summary.movie_title, "The MATRIX Reloaded");
}

#[tokio::test]
async fn test_session_detail() {
    let db = setup().await;
    let fx = seed(&db).await;
    let user = db.create_user("alice").await.unwrap();

    db.create_order(user.id, &[seat(&fx.session, 2, 1), seat(&fx.session, 1, 2)])
        .await
        .unwrap();

    let detail = db.get_session_detail(fx.session.id).await.unwrap();
    assert_eq!(detail.movie.movie.title, "The Matrix");
    assert_eq!(detail.movie.actors.len(), 2);
    assert_eq!(detail.cinema_hall, fx.small_hall);
    assert_eq!(
        detail.taken_places,
        vec![Seat { row: 1, seat: 2 }, Seat { row: 2, seat: 1 }]
    );
}

#[tokio::test]
async fn test_session_with_unknown_hall_is_rejected() {
    let db = setup().await;
    let fx = seed(&db).await;

    let err = db
        .create_session(&MovieSessionInput {
            show_time: show_time(3, 10),
            movie_id: fx.matrix.movie.id,
            cinema_hall_id: 404,
        })
        .await
        .unwrap_err();

    match err {
        StoreError::Validation(errors) => {
            assert!(errors.field("movie").is_empty());
            assert_eq!(errors.field("cinema_hall").len(), 1);
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_out_of_range_seat_creates_nothing() {
    let db = setup().await;
    let fx = seed(&db).await;
    let user = db.create_user("alice").await.unwrap();
    let owned = FilterPipeline::new().add_filter(OwnedBy::new(user.id));

    let err = db
        .create_order(user.id, &[seat(&fx.session, 1, 1), seat(&fx.session, 3, 1)])
        .await
        .unwrap_err();

    match err {
        StoreError::Validation(errors) => {
            assert_eq!(
                errors.field("tickets"),
                ["tickets[1] (movie_session 1, row 3, seat 1): row must be in range [1, 2]"]
            );
        }
        other => panic!("expected validation error, got {other:?}"),
    }

    assert_eq!(db.count_orders(&owned).await.unwrap(), 0);
    let detail = db.get_session_detail(fx.session.id).await.unwrap();
    assert!(detail.taken_places.is_empty());
}

#[tokio::test]
async fn test_seat_cannot_be_sold_twice() {
    let db = setup().await;
    let fx = seed(&db).await;
    let alice = db.create_user("alice").await.unwrap();
    let bob = db.create_user("bob").await.unwrap();

    db.create_order(alice.id, &[seat(&fx.session, 1, 1)]).await.unwrap();

    let err = db
        .create_order(bob.id, &[seat(&fx.session, 1, 2), seat(&fx.session, 1, 1)])
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Validation(ref e)
        if e.field("tickets")[0].ends_with("seat is already taken")));

    // Bob's first seat was rolled back along with the order
    let bob_orders = FilterPipeline::new().add_filter(OwnedBy::new(bob.id));
    assert_eq!(db.count_orders(&bob_orders).await.unwrap(), 0);
    let sessions = db.list_sessions(&FilterPipeline::new()).await.unwrap();
    assert_eq!(sessions[0].tickets_available, 5);
}

#[tokio::test]
async fn test_duplicate_seat_in_one_request_is_rejected() {
    let db = setup().await;
    let fx = seed(&db).await;
    let user = db.create_user("alice").await.unwrap();

    let err = db
        .create_order(user.id, &[seat(&fx.session, 2, 2), seat(&fx.session, 2, 2)])
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::Validation(ref e)
        if e.field("tickets")[0].starts_with("tickets[1]")));
}

#[tokio::test]
async fn test_empty_order_and_unknown_session_are_rejected() {
    let db = setup().await;
    let _fx = seed(&db).await;
    let user = db.create_user("alice").await.unwrap();

    let err = db.create_order(user.id, &[]).await.unwrap_err();
    assert!(matches!(err, StoreError::Validation(ref e)
        if e.field("tickets") == ["This list may not be empty."]));

    let ghost = TicketRequest {
        movie_session_id: 77,
        row: 1,
        seat: 1,
    };
    let err = db.create_order(user.id, &[ghost]).await.unwrap_err();
    assert!(matches!(err, StoreError::Validation(ref e)
        if e.field("tickets")[0].ends_with("movie session does not exist")));
}

#[tokio::test]
async fn test_title_search_folds_ascii_case_only() {
    let db = setup().await;
    db.create_movie(&MovieInput {
        title: "Амели".into(),
        description: "Монмартр.".into(),
        duration: 122,
        genres: vec![],
        actors: vec![],
    })
    .await
    .unwrap();

    let search = |needle: &str| FilterPipeline::new().add_filter(TitleContains::new(needle));

    let same_case = db.list_movies(&search("Амел")).await.unwrap();
    assert_eq!(titles(&same_case), vec!["Амели"]);

    let folded = db.list_movies(&search("амели")).await.unwrap();
    assert!(folded.is_empty());
}

#[tokio::test]
async fn test_concurrent_orders_for_one_seat() {
    let db = setup().await;
    let fx = seed(&db).await;
    let alice = db.create_user("alice").await.unwrap();
    let bob = db.create_user("bob").await.unwrap();

    let wanted = [seat(&fx.session, 2, 2)];
    let (first, second) = tokio::join!(
        db.create_order(alice.id, &wanted),
        db.create_order(bob.id, &wanted),
    );

    let successes = [&first, &second].iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1);
    assert!(matches!(
        if first.is_err() { first } else { second },
        Err(StoreError::Validation(_))
    ));

    let detail = db.get_session_detail(fx.session.id).await.unwrap();
    assert_eq!(detail.taken_places, vec![Seat { row: 2, seat: 2 }]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_racing_orders_across_pooled_connections() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("cinema.db").display());
    let db = Database::connect(&url, 8).await.unwrap();
    db.migrate().await.unwrap();
    let fx = seed(&db).await;

    let mut users = Vec::new();
    for name in ["u1", "u2", "u3", "u4", "u5", "u6", "u7", "u8"] {
        users.push(db.create_user(name).await.unwrap());
    }

    let wanted = [seat(&fx.session, 1, 3)];
    let handles: Vec<_> = users
        .iter()
        .map(|user| {
            let db = db.clone();
            let user_id = user.id;
            tokio::spawn(async move { db.create_order(user_id, &wanted).await })
        })
        .collect();

    let mut placed = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => placed += 1,
            Err(StoreError::Validation(e)) => {
                assert!(e.field("tickets")[0].ends_with("seat is already taken"))
            }
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }
    assert_eq!(placed, 1);

    let sessions = db
        .list_sessions(&FilterPipeline::new().add_filter(SessionOfMovie::new(fx.matrix.movie.id)))
        .await
        .unwrap();
    let listing = sessions
        .iter()
        .find(|s| s.summary.id == fx.session.id)
        .unwrap();
    assert_eq!(listing.tickets_available, fx.small_hall.capacity() - 1);
}

#[tokio::test]
async fn test_orders_are_scoped_to_their_owner() {
    let db = setup().await;
    let fx = seed(&db).await;
    let alice = db.create_user("alice").await.unwrap();
    let bob = db.create_user("bob").await.unwrap();

    let alices = db
        .create_order(alice.id, &[seat(&fx.session, 1, 1), seat(&fx.session, 1, 2)])
        .await
        .unwrap();
    db.create_order(bob.id, &[seat(&fx.session, 2, 1)]).await.unwrap();

    let for_alice = FilterPipeline::new().add_filter(OwnedBy::new(alice.id));
    let for_bob = FilterPipeline::new().add_filter(OwnedBy::new(bob.id));

    let listed = db.list_orders(&for_alice, 5, 0).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].order.id, alices.order.id);
    assert_eq!(listed[0].tickets.len(), 2);
    assert_eq!(listed[0].tickets[0].movie_session.movie_title, "The Matrix");

    assert!(db.get_order(alices.order.id, &for_alice).await.is_ok());
    assert!(matches!(
        db.get_order(alices.order.id, &for_bob).await,
        Err(StoreError::NotFound { .. })
    ));
    assert_eq!(db.count_orders(&for_bob).await.unwrap(), 1);
}

#[tokio::test]
async fn test_order_pages_are_newest_first() {
    let db = setup().await;
    let fx = seed(&db).await;
    let user = db.create_user("alice").await.unwrap();
    let owned = FilterPipeline::new().add_filter(OwnedBy::new(user.id));

    let mut created = Vec::new();
    for s in 1..=3 {
        let order = db.create_order(user.id, &[seat(&fx.session, 1, s)]).await.unwrap();
        created.push(order.order.id);
    }

    let first_page = db.list_orders(&owned, 2, 0).await.unwrap();
    let second_page = db.list_orders(&owned, 2, 2).await.unwrap();

    assert_eq!(
        first_page.iter().map(|o| o.order.id).collect::<Vec<_>>(),
        vec![created[2], created[1]]
    );
    assert_eq!(second_page.len(), 1);
    assert_eq!(second_page[0].order.id, created[0]);
}

#[tokio::test]
async fn test_deleting_a_hall_cascades() {
    let db = setup().await;
    let fx = seed(&db).await;

    db.delete_cinema_hall(fx.small_hall.id).await.unwrap();

    assert!(db.list_sessions(&FilterPipeline::new()).await.unwrap().is_empty());
    assert!(matches!(
        db.get_session(fx.session.id).await,
        Err(StoreError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_users_and_tokens() {
    let db = setup().await;

    let alice = db.create_user("alice").await.unwrap();
    let found = db.find_user_by_token(&alice.token).await.unwrap();
    assert_eq!(found.map(|u| u.id), Some(alice.id));

    assert!(db.find_user_by_token("nope").await.unwrap().is_none());
    assert!(matches!(
        db.create_user("alice").await,
        Err(StoreError::Validation(_))
    ));
    assert!(matches!(db.create_user("  ").await, Err(StoreError::Validation(_))));
}
