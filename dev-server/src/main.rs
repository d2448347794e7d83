//! Development driver for the dashboard data layer
//!
//! Reads the configuration from the environment (and `.env`), builds the
//! dashboard context against the mock or a real backend, and walks through
//! every page, logging what it sees.
//!
//! Usage: cargo run -p dev-server
//!        USE_MOCK_API=false API_URL=http://localhost:3001/api cargo run -p dev-server

use anyhow::Result;
use dashboard::{AppContext, Config, telemetry};
use test_helpers::mock::DevSession;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    let subscriber = telemetry::get_subscriber("info".into());
    telemetry::init_subscriber(subscriber)?;

    let config = Config::from_env()?;
    info!("🚀 Starting dashboard dev session");
    if config.use_mock {
        info!("🧪 Mock backend, {:?} latency per request", config.mock_delay);
    } else {
        info!("🌐 Backend at {}", config.base_url());
    }

    let ctx = AppContext::from_config(&config)?;
    let session = match DevSession::run(&ctx).await {
        Ok(session) => session,
        Err(e) => {
            telemetry::log_error(e);
            std::process::exit(1);
        }
    };

    info!("");
    session.print_summary();
    info!("");
    info!("✅ Walkthrough finished, ended on {:?}", ctx.navigator.current());
    Ok(())
}
