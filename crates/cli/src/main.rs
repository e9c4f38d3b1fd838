use anyhow::Result;
use clap::{Parser, Subcommand};
use cli::render;
use services::http::{HttpServiceConfig, HttpTagService};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use taglens_core::config;
use taglens_core::recognize::RecognizeController;
use taglens_core::search::SearchController;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let cfg = config::load(cli.config.as_deref())?;
    let service = Arc::new(HttpTagService::new(HttpServiceConfig {
        base_url: cfg.api.base_url.clone(),
        timeout: Duration::from_secs(cfg.api.timeout_secs),
    })?);

    match cli.command {
        Commands::Recognize { image, json } => run_recognize(service, image, json).await,
        Commands::Search { query, json } => run_search(service, query, json).await,
    }
}

#[derive(Parser)]
#[command(name = "taglens")]
#[command(about = "Image recognition and tag search client", long_about = None)]
struct Cli {
    /// Path to config TOML
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload an image and print the recognized tags
    Recognize {
        /// Image file to send to the recognition service
        image: PathBuf,
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
    /// Search indexed images by tag text
    Search {
        /// Query text
        query: String,
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
}

async fn run_recognize(service: Arc<HttpTagService>, image: PathBuf, json: bool) -> Result<()> {
    let ctrl = RecognizeController::new(service);
    ctrl.select_image_file(&image).await;
    if ctrl.selection().await.is_none() {
        anyhow::bail!("{} is not a readable image file", image.display());
    }
    ctrl.recognize().await;

    let tags = ctrl.tags().await;
    if json {
        println!("{}", serde_json::to_string(&tags)?);
    } else if tags.is_empty() {
        println!("No tags recognized.");
    } else {
        println!("Tags: {}", render::render_tags(&tags));
    }
    Ok(())
}

async fn run_search(service: Arc<HttpTagService>, query: String, json: bool) -> Result<()> {
    let ctrl = SearchController::new(service);
    ctrl.set_query(&query).await;
    ctrl.search().await;

    let outcome = ctrl.outcome().await;
    if json {
        println!("{}", serde_json::to_string(&render::search_rows(&outcome))?);
    } else {
        let rendered = render::render_search(&ctrl.query().await, &outcome);
        if !rendered.is_empty() {
            println!("{}", rendered);
        }
    }
    Ok(())
}
