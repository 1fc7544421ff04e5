use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use lib_delivery::loggers::setup_logging;
use lib_delivery::sources::geo_chain;

#[derive(Parser, Debug)]
#[command(
    name = "geo-locate",
    version,
    about = "Look up the public IP location through the geolocation fallback chain"
)]
struct Args {
    /// Per-service request timeout in seconds
    #[arg(long, default_value_t = 5)]
    timeout: u64,

    /// Directory for log files
    #[arg(long, env = "SITE_LOG_DIR", default_value = "./logs")]
    log_dir: PathBuf,

    /// Logging level (trace, debug, info, warn, error)
    #[arg(long, env = "SITE_LOG_LEVEL", default_value = "warn")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    setup_logging(&args.log_dir, "geo_locate", &args.log_level)?;

    let chain = geo_chain(Duration::from_secs(args.timeout))?;

    match chain.resolve().await {
        Ok(resolved) => {
            let location = resolved
                .items
                .into_iter()
                .next()
                .ok_or_else(|| anyhow::anyhow!("resolver returned no location"))?;
            println!("{}", serde_json::to_string_pretty(&location)?);
        }
        Err(e) => {
            eprintln!("\n[ERROR] Location detection failed:");
            eprintln!(">>> {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}
