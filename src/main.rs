use clap::Parser;
use persona::core::config::{self, CliOverrides, PersonaConfig};
use persona::tui;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;

#[derive(Parser)]
#[command(name = "persona", about = "Big Five personality analysis from your own words")]
struct Args {
    /// Backend base URL (default http://localhost:8000)
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    /// Request timeout in seconds (waits indefinitely when unset)
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Don't probe the backend on startup
    #[arg(long)]
    skip_health_check: bool,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to persona.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("persona.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = config::load_config().unwrap_or_else(|e| {
        log::warn!("Falling back to default config: {}", e);
        PersonaConfig::default()
    });
    let cli = CliOverrides {
        api_url: args.api_url,
        timeout_secs: args.timeout,
        skip_health_check: args.skip_health_check,
    };
    let resolved = config::resolve(&file_config, &cli);

    log::info!("Persona starting up against {}", resolved.api_url);

    tui::run(resolved)
}
