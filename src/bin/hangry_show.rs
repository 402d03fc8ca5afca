use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use hangry_dashboard::model::{OutputFormat, Rating, RestaurantId};
use hangry_dashboard::page::{Page, Region};
use hangry_dashboard::panel::DetailPanel;
use hangry_dashboard::source::http::{DEFAULT_ENDPOINT, DEFAULT_SERVER};
use hangry_dashboard::source::yelp::YELP_API;
use hangry_dashboard::source::{
    HttpDetailSource, HttpSourceConfig, RatingSource, YelpCredentials, YelpRatingSource,
};

/// Hangry Show: fetch restaurant details and print the rendered regions.
#[derive(Parser, Debug)]
#[command(name = "hangry-show", version, about)]
struct Cli {
    /// Base URL of the server providing restaurant details
    #[arg(long, default_value = DEFAULT_SERVER)]
    server: String,

    /// Path of the show-more endpoint
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,

    /// Output format: html or text
    #[arg(long, default_value = "html")]
    format: String,

    /// Also look up each restaurant's Yelp rating near this location
    /// (credentials from ACCESS_TOKEN, or CLIENT_ID and CLIENT_SECRET)
    #[arg(long)]
    yelp_location: Option<String>,

    /// Root of the Yelp API
    #[arg(long, default_value = YELP_API)]
    yelp_api: String,

    /// Restaurant ids to load, in order
    #[arg(required = true)]
    ids: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Log to stderr (stdout carries the rendered regions)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("hangry_dashboard=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let cli = Cli::parse();

    let config = HttpSourceConfig {
        server: cli.server,
        endpoint: cli.endpoint,
        timeout: Duration::from_secs(cli.timeout_secs),
    };
    let source = HttpDetailSource::new(&config)?;
    tracing::info!(url = source.url(), "fetching details");

    let ratings = match &cli.yelp_location {
        Some(location) => {
            let credentials = YelpCredentials::from_env()?;
            let client = reqwest::Client::builder()
                .timeout(Duration::from_secs(cli.timeout_secs))
                .build()?;
            let yelp = YelpRatingSource::with_client(client, cli.yelp_api.as_str(), credentials);
            Some((yelp, location.as_str()))
        }
        None => None,
    };

    // Ids are requested as given: repeats load again, and no id is reserved
    // by the page's own elements
    let page = Page::new();

    // Loads are awaited one by one, so nothing arrives on the channel
    let (loaded_tx, _loaded_rx) = mpsc::unbounded_channel();
    let mut panel = DetailPanel::for_page(&page, Arc::new(source), loaded_tx);
    let format = OutputFormat::from_str_loose(&cli.format);

    for id in cli.ids.iter().map(|id| RestaurantId::new(id.as_str())) {
        let applied = panel
            .load(id.clone())
            .await
            .with_context(|| format!("loading details for {id}"))?;
        tracing::debug!(?applied, "loaded");

        let name = panel.shown().map(|(_, name)| name.to_string()).unwrap_or_default();
        let rating = match &ratings {
            Some((yelp, location)) => lookup_rating(yelp, &name, location).await,
            None => None,
        };
        print_regions(
            &name,
            &page.reviews().borrow(),
            &page.photos().borrow(),
            rating,
            format,
        );
    }

    Ok(())
}

/// A missing rating does not stop the run.
async fn lookup_rating(source: &dyn RatingSource, name: &str, location: &str) -> Option<Rating> {
    match source.rating(name, location).await {
        Ok(rating) => Some(rating),
        Err(e) => {
            tracing::warn!(name, location, error = %e, "yelp rating lookup failed");
            None
        }
    }
}

fn print_regions(
    name: &str,
    reviews: &Region,
    photos: &Region,
    rating: Option<Rating>,
    format: OutputFormat,
) {
    match format {
        OutputFormat::Html => {
            println!("<!-- {name} -->");
            if let Some(rating) = rating {
                println!("<p class=\"yelp-rating\">Yelp rating: {rating}</p>");
            }
            println!("<div class=\"{}\">{}</div>", reviews.name(), reviews.to_html());
            println!("<div class=\"{}\">{}</div>", photos.name(), photos.to_html());
        }
        OutputFormat::Text => {
            println!("== {name} ==");
            if let Some(rating) = rating {
                println!("Yelp rating: {rating}");
            }
            println!("Reviews:");
            for line in reviews.text_lines() {
                println!("  {line}");
            }
            println!("Photos:");
            for line in photos.text_lines() {
                println!("  {line}");
            }
        }
    }
}
