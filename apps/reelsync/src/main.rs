use stub_server::StubServer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use reelsync::config::Config;
use reelsync::services::{PostsClient, TmdbClient};
use reelsync::{fixtures, scenario, Result};

fn init_tracing() {
    // RUST_LOG controls log levels
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("reelsync=debug,stub_server=debug,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Run both scenarios against live TMDB and an in-process `/posts` stub.
async fn run(config: &Config) -> Result<()> {
    let tmdb = TmdbClient::from_config(&config.tmdb)?;

    let stubs = StubServer::start(fixtures::posts_stubs()).await?;
    let posts = PostsClient::new(stubs.base_url())?;
    tracing::info!(base_url = %stubs.base_url(), "Posts stub ready");

    let outcome = run_scenarios(&tmdb, &posts, &config.scenario.search_query).await;

    stubs.stop().await?;
    outcome
}

async fn run_scenarios(tmdb: &TmdbClient, posts: &PostsClient, query: &str) -> Result<()> {
    let report = scenario::now_playing_round_trip(tmdb, posts).await?;
    tracing::info!(
        movie = %report.movie.title,
        created_id = report.created_id,
        delete_status = %report.delete_status,
        "now_playing round trip passed"
    );

    let report = scenario::search_and_post(tmdb, posts, query).await?;
    tracing::info!(
        movie = %report.movie.title,
        created_id = report.created_id,
        "search and post passed"
    );

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_tracing();

    tracing::info!("Starting reelsync v{}", env!("CARGO_PKG_VERSION"));

    let config = match Config::load() {
        Ok(cfg) => {
            tracing::debug!("TMDB: {:?}", cfg.tmdb);
            cfg
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = config.require_api_key() {
        tracing::error!("{}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(&config).await {
        tracing::error!("Scenario failed: {}", e);
        std::process::exit(1);
    }

    tracing::info!("All scenarios passed");
}
