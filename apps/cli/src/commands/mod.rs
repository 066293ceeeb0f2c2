pub mod account;
pub mod clips;
pub mod export;
pub mod login;
pub mod logout;
pub mod plans;
pub mod preview;
pub mod signup;
pub mod upload;
pub mod whoami;

use std::io::Write;
use std::sync::Arc;

use cliplet_client::{ApiClient, Error as ApiError, LoginGate, LoginSurface};
use cliplet_http::ReqwestClient;

use crate::config::Config;

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl CommandError {
    /// Exit codes scripts can branch on: 2 means log in, 3 means top up
    /// credits, 1 is everything else.
    pub fn exit_code(&self) -> i32 {
        match self {
            CommandError::Api(ApiError::AuthRequired(_)) => 2,
            CommandError::Api(ApiError::NoCredits) => 3,
            _ => 1,
        }
    }
}

pub(crate) fn prompt_line(label: &str) -> std::io::Result<String> {
    eprint!("{label}");
    std::io::stderr().flush()?;

    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

pub(crate) async fn password_or_prompt(password: Option<String>) -> std::io::Result<String> {
    match password {
        Some(password) => Ok(password),
        None => tokio::task::spawn_blocking(|| prompt_line("Password: "))
            .await
            .map_err(std::io::Error::other)?,
    }
}

/// Login surface for plain terminal commands: prompts for credentials on
/// the spot and resolves the gate with the outcome.
pub(crate) struct PromptSurface {
    api: Arc<ApiClient<ReqwestClient>>,
    gate: Arc<LoginGate>,
}

impl PromptSurface {
    pub fn new(api: Arc<ApiClient<ReqwestClient>>, gate: Arc<LoginGate>) -> Self {
        Self { api, gate }
    }
}

impl LoginSurface for PromptSurface {
    fn open(&self) -> Result<(), cliplet_http::Error> {
        let api = self.api.clone();
        let gate = self.gate.clone();
        tokio::spawn(async move {
            gate.resolve(login_at_prompt(&api).await);
        });
        Ok(())
    }
}

async fn login_at_prompt(api: &ApiClient<ReqwestClient>) -> bool {
    eprintln!("You need to be logged in for this.");
    let credentials = tokio::task::spawn_blocking(|| {
        let username = prompt_line("Username: ")?;
        let password = prompt_line("Password: ")?;
        Ok::<_, std::io::Error>((username, password))
    })
    .await;

    let (username, password) = match credentials {
        Ok(Ok((username, password))) if !username.is_empty() => (username, password),
        _ => return false,
    };

    match api.login(&username, &password).await {
        Ok(identity) => {
            eprintln!("Logged in as {}.", identity.username);
            true
        }
        Err(e) => {
            eprintln!("Login failed: {e}");
            false
        }
    }
}

/// Run the login gate with the terminal prompt surface, caching the session
/// cookie if the prompt logged us in.
pub(crate) async fn gate_via_prompt(
    config: &Config,
    http: &ReqwestClient,
    api: &Arc<ApiClient<ReqwestClient>>,
    gate: &Arc<LoginGate>,
) -> Result<bool, CommandError> {
    let surface = PromptSurface::new(api.clone(), gate.clone());
    let passed = gate.ensure_logged_in(api, &surface).await?;

    if passed && let Some(cookie) = http.session_cookie() {
        if let Err(e) = config.save_cookie(&cookie) {
            tracing::warn!("could not cache the session cookie: {e}");
        }
    }
    Ok(passed)
}
