use cliplet_client::{BrowserSurface, LoginSurface};

use crate::commands::CommandError;
use crate::config::Config;

/// Plan changes and billing happen in the web app, not here.
pub fn run(config: &Config) -> Result<(), CommandError> {
    let url = config.base_url().to_string();

    BrowserSurface::new(url.clone())
        .open()
        .map_err(std::io::Error::other)?;

    println!("Opened {url} in your browser.");
    Ok(())
}
