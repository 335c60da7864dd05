//! CLI command implementations

use crate::config::{self, load_config};
use crate::error::Result;
use std::fs;

/// Initialize a new kudos.toml configuration file
pub async fn init() -> Result<()> {
    let config_path = std::path::Path::new("kudos.toml");

    if config_path.exists() {
        println!("kudos.toml already exists");
        return Ok(());
    }

    let content = config::default_config_content();
    fs::write(config_path, content)?;

    println!("Created kudos.toml");
    println!("Set SESSION_SECRET and run 'kudos serve' to start the server");

    Ok(())
}

/// Start the HTTP API server
pub async fn serve(host: &str, port: u16) -> Result<()> {
    let config = load_config()?;

    println!("Starting server at http://{}:{}", host, port);

    crate::api::run_server(config, host, port).await?;
    Ok(())
}
