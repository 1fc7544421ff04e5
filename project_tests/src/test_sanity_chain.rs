//! # Sanity Chain Live Test
//!
//! Resolves every widget chain against the real CMS and prints which source
//! answered and what was rendered. Use `--offline` to check the local links.

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use lib_delivery::render::RenderOptions;
use lib_delivery::sources::{widget_chain, ChainSources, SanityClient, SanityConfig, StaticSource};
use lib_delivery::{CoordinationRegistry, LoadOutcome, Region, RetryPolicy, Widget};

#[derive(Parser, Debug)]
struct Args {
    /// Skip the CMS links
    #[arg(long)]
    offline: bool,

    /// properties.json location
    #[arg(long)]
    static_data: Option<String>,
}

/// Executes one live load per widget.
///
/// // Statement: Exits with status 1 if any widget ends on its placeholder.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // // Statement: One attempt per source keeps the run short
    let sanity = if args.offline {
        None
    } else {
        Some(Arc::new(SanityClient::new(SanityConfig::default(), 0, Duration::from_secs(10))?))
    };
    let sources = ChainSources {
        sanity,
        static_data: args.static_data.as_deref().map(StaticSource::parse),
        retry: RetryPolicy::once(),
        timeout: Duration::from_secs(10),
    };

    let registry = CoordinationRegistry::new();
    let mut failed = false;

    for widget in Widget::ALL {
        let chain = widget_chain(widget, &sources)?;
        println!("[*] {} via {:?}", widget, chain.provider_names());

        let region = Region::shared(widget.region_key());
        let loader = widget.loader(chain, RenderOptions::default(), Duration::ZERO);

        match loader.load(&registry, &region).await {
            LoadOutcome::Rendered { source_name, count, .. } => {
                println!("[SUCCESS] {} item(s) from '{}'", count, source_name);
                let region = region.lock().map_err(|_| anyhow::anyhow!("region lock poisoned"))?;
                for item in region.render_state().items() {
                    println!("    - {} | {}", item.title, item.price.as_deref().unwrap_or("-"));
                }
            }
            LoadOutcome::Placeholder => {
                eprintln!("[ERROR] {} fell through to its placeholder", widget);
                failed = true;
            }
            LoadOutcome::Skipped => eprintln!("[WARN] {} was already claimed", widget),
        }
    }

    if failed {
        std::process::exit(1);
    }
    Ok(())
}
