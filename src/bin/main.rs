use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tmdb_proxy::config::{Config, LogFormat};

#[derive(Parser, Debug)]
#[command(name = "tmdb-proxy-server")]
#[command(about = "Movie browser with a server-side TMDB proxy", long_about = None)]
struct Args {
    /// YAML config file. Defaults plus environment are used when omitted.
    #[arg(short, long)]
    config: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn init_tracing(format: LogFormat, debug: bool) {
    let default_filter = if debug {
        "tmdb_proxy=debug,tower_http=debug"
    } else {
        "tmdb_proxy=info,tower_http=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());

    match format {
        LogFormat::Text => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let mut config = match Config::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("FATAL ERROR: {}", e);
            std::process::exit(1);
        }
    };
    config.debug_logs = args.debug;

    init_tracing(config.logging.format, args.debug);

    if let Some(ref path) = args.config {
        tracing::info!("Using config file: {}", path);
    }

    if let Err(e) = tmdb_proxy::run(config).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
