mod config;
mod service;
mod strategies;
mod view;

use anyhow::Result;
use config::Config;
use service::LauncherService;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = Config::load()?;

    // Create and run the launcher session
    let launcher = LauncherService::new(config);
    launcher.run().await
}
