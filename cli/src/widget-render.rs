use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use lib_delivery::configs::DeliveryConfig;
use lib_delivery::loggers::setup_logging;
use lib_delivery::render::{apply_type_filter, filter_tabs, property_types};
use lib_delivery::sources::{widget_chain, ChainSources, SanityClient, StaticSource};
use lib_delivery::{CoordinationRegistry, LoadOutcome, Region, Widget};
use tokio_util::sync::CancellationToken;

#[derive(Parser, Debug)]
#[command(
    name = "widget-render",
    version,
    about = "Resolve one site widget through its fallback chain and print the rendered region"
)]
struct Args {
    /// Widget to render (exclusive-listings, notable-transactions, testimonials, projects)
    #[arg(value_parser = parse_widget)]
    widget: Widget,

    /// JSON5 configuration file
    #[arg(long, env = "SITE_CONFIG_PATH")]
    config: Option<PathBuf>,

    /// Path or URL of properties.json, overriding the configuration
    #[arg(long)]
    static_data: Option<String>,

    /// Skip the CMS and resolve from local sources only
    #[arg(long)]
    offline: bool,

    /// Print the resolved items as JSON instead of HTML
    #[arg(long)]
    json: bool,

    /// Show only this property type in the projects grid ("all" for every card)
    #[arg(long = "type")]
    type_filter: Option<String>,

    /// Step the carousel forward this many times after rendering
    #[arg(long, default_value_t = 0)]
    steps: u32,

    /// Let the carousel auto-advance for this many seconds
    #[arg(long)]
    watch: Option<u64>,

    /// Directory for log files
    #[arg(long, env = "SITE_LOG_DIR", default_value = "./logs")]
    log_dir: PathBuf,

    /// Logging level (trace, debug, info, warn, error)
    #[arg(long, env = "SITE_LOG_LEVEL", default_value = "warn")]
    log_level: String,
}

fn parse_widget(raw: &str) -> Result<Widget, String> {
    raw.parse()
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    setup_logging(&args.log_dir, "widget_render", &args.log_level)?;

    let mut config = DeliveryConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    if let Some(location) = &args.static_data {
        config.static_data = Some(location.clone());
    }

    let sanity = match (args.offline, config.sanity_config()) {
        (false, Some(sanity)) => Some(Arc::new(
            SanityClient::new(sanity, config.transport_retries(), config.http_timeout())
                .context("Failed to build Sanity client")?,
        )),
        _ => None,
    };
    let sources = ChainSources {
        sanity,
        static_data: config.static_source(),
        retry: config.retry_policy(),
        timeout: config.http_timeout(),
    };
    if let Some(StaticSource::File(path)) = &sources.static_data {
        if !path.exists() {
            log::warn!("Static data file {} does not exist, that link will fail", path.display());
        }
    }

    let widget = args.widget;
    let chain = widget_chain(widget, &sources)?;
    log::info!("Chain for '{}': {:?}", widget, chain.provider_names());

    let loader = widget.loader(chain, config.render_options(), config.settle());
    let region = Region::shared(widget.region_key());
    let outcome = loader.load(&CoordinationRegistry::new(), &region).await;

    let carousel = match outcome {
        LoadOutcome::Rendered {
            source_name,
            count,
            carousel,
        } => {
            eprintln!("[INFO] {} item(s) from '{}'", count, source_name);
            carousel
        }
        LoadOutcome::Placeholder => {
            eprintln!("[WARN] Every source failed, showing placeholder");
            None
        }
        LoadOutcome::Skipped => None,
    };

    if let Some(carousel) = &carousel {
        for _ in 0..args.steps {
            if let Some(index) = carousel.next().await? {
                if let Some(item) = carousel.current_item().await {
                    eprintln!("[INFO] Slide {} -> {}", index, item.title);
                }
            }
        }

        if let (Some(seconds), Some(period)) = (args.watch, config.auto_advance()) {
            let token = CancellationToken::new();
            let task = carousel.spawn_auto_advance(period, token.clone());
            tokio::time::sleep(Duration::from_secs(seconds)).await;
            token.cancel();
            task.await?;
            eprintln!("[INFO] Carousel settled on slide {}", carousel.current().await);
        }
    }

    let mut region = region
        .lock()
        .map_err(|_| anyhow::anyhow!("region lock poisoned"))?;
    if let Some(filter) = &args.type_filter {
        let visible = apply_type_filter(&mut region, filter);
        eprintln!("[INFO] {} card(s) match type '{}'", visible, filter);
    }
    if args.json {
        println!("{}", serde_json::to_string_pretty(region.render_state().items())?);
    } else {
        if !widget.is_slider() && !region.render_state().is_empty() {
            let types = property_types(region.render_state().items());
            let active = args.type_filter.as_deref().unwrap_or("all");
            println!("{}", filter_tabs(&types, active).to_html());
        }
        println!("{}", region.to_html());
    }

    Ok(())
}
