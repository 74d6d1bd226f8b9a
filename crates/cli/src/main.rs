use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::MatchKind;
use poster_client::{NoPosters, PosterClient, PosterSource, DEFAULT_API_URL};
use rand::Rng;
use server::{AppState, Recommendation, Recommender, DEFAULT_TOP_N};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::warn;

/// ReelMatch - Content-Based Movie Recommender
#[derive(Parser)]
#[command(name = "reel-match")]
#[command(about = "Movie recommendations from plot-overview similarity", long_about = None)]
struct Cli {
    /// Path to the movie metadata CSV
    #[arg(short, long, env = "MOVIES_CSV", default_value = "movies_metadata.csv")]
    data_file: PathBuf,

    /// Movies with fewer votes than this are left out of the catalog
    #[arg(long, env = "MIN_VOTE_COUNT", default_value_t = data_loader::DEFAULT_MIN_VOTES)]
    min_votes: f64,

    /// TMDB API key; posters are skipped without one
    #[arg(long, env = "TMDB_API_KEY", hide_env_values = true)]
    tmdb_api_key: Option<String>,

    /// TMDB API root
    #[arg(long, env = "TMDB_API_URL", default_value = DEFAULT_API_URL)]
    tmdb_api_url: String,

    /// Timeout for each poster request, in seconds (none by default)
    #[arg(long, env = "POSTER_TIMEOUT_SECS")]
    poster_timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend movies similar to a title
    Recommend {
        /// Movie title (case-insensitive exact match)
        #[arg(long)]
        title: String,

        /// Number of recommendations to return
        #[arg(long, default_value_t = DEFAULT_TOP_N)]
        limit: usize,

        /// Show similarity scores and the terms the movies share
        #[arg(long)]
        explain: bool,
    },

    /// Search for movies by title
    Search {
        /// Movie title to search for (case-insensitive substring match)
        #[arg(long)]
        title: String,

        /// Maximum number of results
        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// Serve the interactive web UI
    Serve {
        /// Address to listen on
        #[arg(long, env = "BIND_ADDR", default_value = "127.0.0.1:8501")]
        addr: SocketAddr,

        /// Recommendations shown per request
        #[arg(long, default_value_t = DEFAULT_TOP_N)]
        top_n: usize,
    },

    /// Run benchmark to test ranking performance (posters are not fetched)
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "100")]
        requests: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let posters = build_poster_source(&cli)?;

    // Load catalog and build the index once (this may take a moment)
    println!("Loading movie catalog from {}...", cli.data_file.display());
    let start = Instant::now();
    let data_file = cli.data_file.clone();
    let min_votes = cli.min_votes;
    let recommender = tokio::task::spawn_blocking(move || {
        Recommender::load(&data_file, min_votes, posters)
    })
    .await
    .context("Catalog loading task panicked")??;
    println!(
        "{} Indexed {} movies in {:?}",
        "✓".green(),
        recommender.catalog().len(),
        start.elapsed()
    );

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Recommend {
            title,
            limit,
            explain,
        } => handle_recommend(&recommender, &title, limit, explain).await?,
        Commands::Search { title, limit } => handle_search(&recommender, &title, limit)?,
        Commands::Serve { addr, top_n } => {
            let state = AppState::new(recommender).with_default_top_n(top_n);
            server::serve(state, addr).await?
        }
        Commands::Benchmark { requests } => handle_benchmark(&recommender, requests)?,
    }

    Ok(())
}

/// Pick the poster source from configuration
fn build_poster_source(cli: &Cli) -> Result<Arc<dyn PosterSource>> {
    match cli.tmdb_api_key.as_deref().filter(|k| !k.is_empty()) {
        Some(key) => {
            let timeout = cli.poster_timeout_secs.map(Duration::from_secs);
            let client = PosterClient::new(key, timeout)
                .context("Failed to build poster client")?
                .with_api_url(cli.tmdb_api_url.as_str());
            Ok(Arc::new(client))
        }
        None => {
            warn!("TMDB_API_KEY not set; recommendations will have no posters");
            Ok(Arc::new(NoPosters))
        }
    }
}

/// Handle the 'recommend' command
async fn handle_recommend(
    recommender: &Recommender,
    title: &str,
    limit: usize,
    explain: bool,
) -> Result<()> {
    let recommendations = recommender.recommend(title, limit).await;

    if recommendations.is_empty() {
        println!("No recommendations found. Try another movie.");
        return Ok(());
    }

    print_recommendations(title, &recommendations);

    // If explain is true, show why each movie was picked
    if explain {
        for line in explain_lines(recommender, title, &recommendations) {
            println!("{}", line);
        }
    }
    Ok(())
}

/// Key terms of the query and the terms each recommendation shares with it
fn explain_lines(
    recommender: &Recommender,
    title: &str,
    recommendations: &[Recommendation],
) -> Vec<String> {
    let index = recommender.index();
    let Some(query_row) = recommender.catalog().find_by_title(title) else {
        return Vec::new();
    };

    let key_terms: Vec<&str> = index
        .top_terms(query_row, 8)
        .into_iter()
        .map(|(term, _)| term)
        .collect();
    let mut lines = vec![format!("\n{} {}", "Key terms:".bold(), key_terms.join(", "))];

    for rec in recommendations {
        let shared = index.shared_terms(query_row, rec.row, 5);
        lines.push(format!(
            "  {} score {:.3}, shared terms: [{}]",
            rec.title.cyan(),
            rec.score,
            shared.join(", ")
        ));
    }
    lines
}

/// Handle the 'search' command
fn handle_search(recommender: &Recommender, title: &str, limit: usize) -> Result<()> {
    let hits = recommender.catalog().search(title, limit);

    println!("{}", format!("Search results for '{}':", title).bold().blue());
    if hits.is_empty() {
        println!("  (no matches)");
    }
    for hit in hits {
        let marker = match hit.kind {
            MatchKind::Exact => "•".green(),
            MatchKind::Substring => "•".normal(),
        };
        println!(
            "{} {}: {} avg {:.1} ({} votes)",
            marker, hit.movie.id, hit.movie.title, hit.movie.vote_average, hit.movie.vote_count
        );
    }
    Ok(())
}

/// Handle the 'benchmark' command
fn handle_benchmark(recommender: &Recommender, requests: usize) -> Result<()> {
    let catalog = recommender.catalog();
    anyhow::ensure!(!catalog.is_empty(), "Catalog is empty, nothing to benchmark");
    anyhow::ensure!(requests > 0, "Need at least one request");

    // Pick random titles from the catalog
    let mut rng = rand::rng();
    let titles: Vec<String> = (0..requests)
        .map(|_| {
            let row = rng.random_range(0..catalog.len());
            catalog.get(row).map(|m| m.title.clone()).unwrap_or_default()
        })
        .collect();

    let wall = Instant::now();
    let mut timings: Vec<Duration> = titles
        .iter()
        .map(|title| {
            let start = Instant::now();
            let ranked = recommender.rank(title, DEFAULT_TOP_N);
            std::hint::black_box(ranked);
            start.elapsed()
        })
        .collect();
    let total_time = wall.elapsed();

    let avg_latency = timings.iter().sum::<Duration>() / (timings.len() as u32);
    timings.sort();
    let percentile = |p: f32| timings[((timings.len() as f32 * p) as usize).min(timings.len() - 1)];
    let throughput = requests as f32 / total_time.as_secs_f32();

    println!("Benchmark results:");
    println!("Total time: {:?}", total_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(0.50));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!("Throughput: {:.2} requests/second", throughput);

    Ok(())
}

/// Helper function to format and print recommendations
fn print_recommendations(title: &str, recommendations: &[Recommendation]) {
    println!("{}", format!("Movies like '{}':", title).bold().blue());
    for (i, rec) in recommendations.iter().enumerate() {
        println!("{}. {}", (i + 1).to_string().green(), rec.title);
        if !rec.poster_url.is_empty() {
            println!("   {}", rec.poster_url.dimmed());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_recommend_defaults() {
        let cli = Cli::try_parse_from(["reel-match", "recommend", "--title", "Inception"]).unwrap();
        match cli.command {
            Commands::Recommend { title, limit, explain } => {
                assert_eq!(title, "Inception");
                assert_eq!(limit, DEFAULT_TOP_N);
                assert!(!explain);
            }
            _ => panic!("expected recommend"),
        }
    }

    #[tokio::test]
    async fn test_explain_covers_each_recommendation() {
        colored::control::set_override(false);
        let movie = |id: &str, title: &str, overview: &str| data_loader::Movie {
            id: id.to_string(),
            title: title.to_string(),
            overview: overview.to_string(),
            vote_count: 100.0,
            vote_average: 7.0,
        };
        let recommender = Recommender::new(
            data_loader::Catalog::from_movies(vec![
                movie("155", "The Dark Knight", "Batman fights the Joker in Gotham."),
                movie("49026", "The Dark Knight Rises", "Batman returns to Gotham to face Bane."),
                movie("1124", "The Prestige", "Two rival magicians duel."),
            ]),
            Arc::new(NoPosters),
        );

        let recommendations = recommender.recommend("the dark knight", 1).await;
        let lines = explain_lines(&recommender, "the dark knight", &recommendations);

        assert_eq!(lines.len(), 2);
        assert!(lines[1].contains("The Dark Knight Rises"));
        assert!(lines[1].contains("batman"));
        assert!(lines[1].contains("gotham"));
        assert!(explain_lines(&recommender, "Nonexistent", &[]).is_empty());
    }

    #[test]
    fn test_no_api_key_means_no_posters() {
        let cli = Cli::try_parse_from([
            "reel-match",
            "--tmdb-api-key",
            "",
            "search",
            "--title",
            "dark",
        ])
        .unwrap();
        assert!(build_poster_source(&cli).is_ok());
    }
}
