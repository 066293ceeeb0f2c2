mod client;
mod error;
mod gate;
mod types;

pub use client::ApiClient;
pub use error::Error;
pub use gate::{BrowserSurface, LoginGate, LoginSurface};
pub use types::*;
