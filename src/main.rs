use async_trait::async_trait;
use celebmatch_api::{ApiContext, RestApi};
use celebmatch_core::{
    DisplayNames, EmbeddingStore, FetchError, PostFetcher, SentenceEncoder, TextCleaner,
    UserMatcher,
};
use celebmatch_pipeline::{HashingEncoder, RemoteEncoder, StoreBuilder, TweetCleaner};
use celebmatch_scrape::TwitterClient;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Match Twitter accounts against a precomputed celebrity embedding set
#[derive(Parser, Debug)]
#[command(name = "celebmatch")]
#[command(about = "Twitter user matching via sentence-embedding similarity", long_about = None)]
struct Cli {
    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct StoreArgs {
    /// Path to the celebrity embedding table (CSV: username,v1..vD)
    #[arg(long, default_value = "celebrity-embeddings.csv")]
    store: PathBuf,

    /// Optional celebrity listing CSV with display names
    #[arg(long)]
    listing: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct BoundaryArgs {
    /// Twitter API bearer token; falls back to CELEBMATCH_BEARER_TOKEN.
    /// Without one, usernames missing from the store cannot be resolved.
    #[arg(long)]
    bearer_token: Option<String>,

    /// Sentence encoder service URL; falls back to CELEBMATCH_ENCODER_URL.
    /// Without one, a deterministic hashing encoder stands in.
    #[arg(long)]
    encoder_url: Option<String>,

    /// Timeout in seconds for platform and encoder requests
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the REST API server
    Serve {
        #[command(flatten)]
        store: StoreArgs,

        #[command(flatten)]
        boundary: BoundaryArgs,

        /// HTTP API port
        #[arg(long, default_value_t = 8080)]
        http_port: u16,

        /// Result count for the /results endpoint
        #[arg(long, default_value_t = 100)]
        top_n: usize,
    },

    /// Compare two users, one user against a random one, or a random pair
    Compare {
        /// Zero, one or two Twitter usernames
        #[arg(num_args = 0..=2)]
        users: Vec<String>,

        /// Seed for the random draw (ignored with two usernames)
        #[arg(long, default_value_t = 43)]
        seed: u64,

        #[command(flatten)]
        store: StoreArgs,

        #[command(flatten)]
        boundary: BoundaryArgs,
    },

    /// Rank the whole store against one user
    Rank {
        /// Twitter username
        user: String,

        /// How many matches to print
        #[arg(long, default_value_t = 10)]
        top: usize,

        #[command(flatten)]
        store: StoreArgs,

        #[command(flatten)]
        boundary: BoundaryArgs,
    },

    /// Build the embedding table from a directory of per-user post CSVs
    Prepare {
        /// Directory of <username>.csv post files
        #[arg(long)]
        posts_dir: PathBuf,

        /// Output embedding table path
        #[arg(long)]
        out: PathBuf,

        /// Hashing encoder dimension, used when no encoder URL is set
        #[arg(long, default_value_t = 384)]
        dim: usize,

        #[command(flatten)]
        boundary: BoundaryArgs,
    },
}

/// Stands in when no bearer token is configured: store lookups still work,
/// scrape-path resolution fails with a clear message.
struct ScrapingDisabled;

#[async_trait]
impl PostFetcher for ScrapingDisabled {
    async fn fetch_posts(&self, _handle: &str) -> Result<Vec<String>, FetchError> {
        Err(FetchError::Network(
            "scraping disabled: no bearer token configured".to_string(),
        ))
    }
}

fn build_fetcher(boundary: &BoundaryArgs) -> anyhow::Result<Arc<dyn PostFetcher>> {
    let token = boundary
        .bearer_token
        .clone()
        .or_else(|| std::env::var("CELEBMATCH_BEARER_TOKEN").ok());
    let timeout = Duration::from_secs(boundary.timeout_secs);
    match token {
        Some(token) => Ok(Arc::new(TwitterClient::new(token, timeout)?)),
        None => Ok(Arc::new(ScrapingDisabled)),
    }
}

fn build_encoder(boundary: &BoundaryArgs, dim: usize) -> anyhow::Result<Arc<dyn SentenceEncoder>> {
    let url = boundary
        .encoder_url
        .clone()
        .or_else(|| std::env::var("CELEBMATCH_ENCODER_URL").ok());
    let timeout = Duration::from_secs(boundary.timeout_secs);
    match url {
        Some(url) => Ok(Arc::new(RemoteEncoder::new(url, timeout)?)),
        None => {
            info!(dim, "no encoder URL configured, using hashing encoder");
            Ok(Arc::new(HashingEncoder::new(dim)))
        }
    }
}

fn build_matcher(
    store_args: &StoreArgs,
    boundary: &BoundaryArgs,
) -> anyhow::Result<(UserMatcher, DisplayNames)> {
    let store = Arc::new(EmbeddingStore::load(&store_args.store)?);
    let names = match &store_args.listing {
        Some(path) => DisplayNames::load(path)?,
        None => DisplayNames::empty(),
    };

    let fetcher = build_fetcher(boundary)?;
    let encoder = build_encoder(boundary, store.dim())?;
    let cleaner: Arc<dyn TextCleaner> = Arc::new(TweetCleaner::new());

    Ok((UserMatcher::new(store, fetcher, cleaner, encoder), names))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Command::Serve {
            store,
            boundary,
            http_port,
            top_n,
        } => {
            let (matcher, names) = build_matcher(&store, &boundary)?;
            let ctx = Arc::new(ApiContext {
                matcher,
                names,
                top_n,
            });

            info!("Starting celebmatch v{}", env!("CARGO_PKG_VERSION"));
            info!("HTTP API: http://localhost:{}/", http_port);

            let http_handle = std::thread::spawn(move || {
                let sys = actix_web::rt::System::new();
                sys.block_on(async {
                    if let Err(e) = RestApi::start(ctx, http_port).await {
                        eprintln!("HTTP server error: {}", e);
                    }
                })
            });

            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("Shutdown signal received");
                }
                _ = tokio::task::spawn_blocking(move || {
                    http_handle.join().ok();
                }) => {
                    info!("HTTP server stopped");
                }
            }
            info!("Shutting down...");
        }

        Command::Compare {
            users,
            seed,
            store,
            boundary,
        } => {
            let (matcher, _) = build_matcher(&store, &boundary)?;
            let result = match users.as_slice() {
                [] => matcher.compare_random_pair(seed).await?,
                [single] => matcher.compare_with_random(single, seed).await?,
                [first, second, ..] => matcher.compare(first, second).await?,
            };
            println!(
                "Similarity between {} and {} is: {:.2}%",
                result.subject,
                result.candidate,
                result.score * 100.0
            );
        }

        Command::Rank {
            user,
            top,
            store,
            boundary,
        } => {
            let (matcher, names) = build_matcher(&store, &boundary)?;
            let entries = matcher.top_matches(&user, top).await?;
            for (position, entry) in entries.iter().enumerate() {
                match names.get(&entry.candidate) {
                    Some(name) => println!(
                        "{:>3}. {} ({}): {:.4}",
                        position + 1,
                        entry.candidate,
                        name,
                        entry.score
                    ),
                    None => println!(
                        "{:>3}. {}: {:.4}",
                        position + 1,
                        entry.candidate,
                        entry.score
                    ),
                }
            }
        }

        Command::Prepare {
            posts_dir,
            out,
            dim,
            boundary,
        } => {
            let encoder = build_encoder(&boundary, dim)?;
            let cleaner: Arc<dyn TextCleaner> = Arc::new(TweetCleaner::new());
            let builder = StoreBuilder::new(cleaner, encoder);
            let summary = builder.build(&posts_dir, &out).await?;
            println!(
                "Embedded {} user(s) into {}",
                summary.processed,
                out.display()
            );
            if !summary.failed.is_empty() {
                println!("Failed: {}", summary.failed.join(", "));
            }
        }
    }

    Ok(())
}
