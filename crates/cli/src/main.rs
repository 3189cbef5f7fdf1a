use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use colored::Colorize;
use server::handlers::movie_sessions::SessionListParams;
use server::handlers::movies::MovieListParams;
use server::{DatabaseConfig, ServerConfig};
use store::{Database, MovieWithRelations, SessionListing};
use tracing::info;

/// Cinema - booking API for movies, sessions and tickets
#[derive(Parser)]
#[command(name = "cinema")]
#[command(about = "Cinema booking REST API and admin tools", long_about = None)]
struct Cli {
    #[command(flatten)]
    database: DatabaseConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the REST API
    Serve {
        #[command(flatten)]
        server: ServerConfig,
    },

    /// Apply pending schema migrations and exit
    Migrate,

    /// Create a user and print their API token
    CreateUser {
        #[arg(long)]
        username: String,
    },

    /// Search movies by title, genres or actors
    Search {
        /// Case-insensitive substring of the title
        #[arg(long)]
        title: Option<String>,

        /// Comma-separated genre ids (any of)
        #[arg(long)]
        genres: Option<String>,

        /// Comma-separated actor ids (any of)
        #[arg(long)]
        actors: Option<String>,
    },

    /// List sessions with the seats still available
    Sessions {
        /// Show date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,

        /// Movie id
        #[arg(long)]
        movie: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let db = cli
        .database
        .open()
        .await
        .with_context(|| format!("Failed to open database {}", cli.database.database_url))?;

    match cli.command {
        Commands::Serve { server: config } => {
            info!("Starting cinema API");
            server::serve(db, &config).await?
        }
        Commands::Migrate => println!("{} Database schema is up to date", "✓".green()),
        Commands::CreateUser { username } => handle_create_user(&db, &username).await?,
        Commands::Search {
            title,
            genres,
            actors,
        } => {
            let params = MovieListParams {
                title,
                genres,
                actors,
            };
            handle_search(&db, &params).await?
        }
        Commands::Sessions { date, movie } => {
            handle_sessions(&db, &SessionListParams { date, movie }).await?
        }
    }

    Ok(())
}

/// Handle the 'create-user' command
async fn handle_create_user(db: &Database, username: &str) -> Result<()> {
    let user = db
        .create_user(username)
        .await
        .context("Failed to create user")?;

    println!("{} Created user {} (id {})", "✓".green(), user.username.bold(), user.id);
    println!("Token: {}", user.token.yellow());
    println!("Send it as: Authorization: Token {}", user.token);
    Ok(())
}

/// Handle the 'search' command
async fn handle_search(db: &Database, params: &MovieListParams) -> Result<()> {
    let movies = db.list_movies(&params.filters()).await?;

    println!("{}", format!("{} movies found:", movies.len()).bold().blue());
    for movie in &movies {
        print_movie(movie);
    }
    Ok(())
}

/// Handle the 'sessions' command
async fn handle_sessions(db: &Database, params: &SessionListParams) -> Result<()> {
    let filters = params
        .filters()
        .map_err(|errors| anyhow!("Invalid filter: {}", errors))?;
    let sessions = db.list_sessions(&filters).await?;

    println!("{}", format!("{} sessions:", sessions.len()).bold().blue());
    for session in &sessions {
        print_session(session);
    }
    Ok(())
}

fn print_movie(movie: &MovieWithRelations) {
    let genres = movie
        .genres
        .iter()
        .map(|g| g.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let actors = movie
        .actors
        .iter()
        .map(|a| a.full_name())
        .collect::<Vec<_>>()
        .join(", ");

    println!(
        "{}: {} ({} min) [{}]",
        movie.movie.id.to_string().green(),
        movie.movie.title.bold(),
        movie.movie.duration,
        genres
    );
    if !actors.is_empty() {
        println!("   Starring: {}", actors);
    }
}

fn print_session(session: &SessionListing) {
    let summary = &session.summary;
    let available = if session.tickets_available == 0 {
        "sold out".red()
    } else {
        format!("{} seats left", session.tickets_available).green()
    };

    println!(
        "{}: {} {} in {} ({}/{}) {}",
        summary.id.to_string().green(),
        summary.show_time.format("%Y-%m-%d %H:%M"),
        summary.movie_title.bold(),
        summary.cinema_hall_name,
        session.tickets_available,
        summary.cinema_hall_capacity,
        available
    );
}
