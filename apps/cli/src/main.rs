mod commands;
mod config;
mod tui;

use clap::{Parser, Subcommand};

use crate::config::Config;

#[derive(Parser)]
#[command(
    name = "cliplet",
    version,
    about = "Clip previews with karaoke captions, from the terminal"
)]
struct Cli {
    /// Base URL of the clipping service.
    #[arg(
        long,
        global = true,
        env = "CLIPLET_BASE_URL",
        default_value = "http://127.0.0.1:8000"
    )]
    base_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Log in and cache the session cookie.
    Login(commands::login::Args),
    /// Create an account and log in.
    Signup(commands::signup::Args),
    /// End the session here and on the service.
    Logout,
    /// Show the logged-in account.
    Whoami,
    /// List the billing plans.
    Plans,
    /// Open the account page in the browser.
    Account,
    /// Upload a video and cut it into captioned clips. Costs one credit.
    Upload(commands::upload::Args),
    /// List a job's clips.
    Clips(commands::clips::Args),
    /// Download a clip's captions as SRT.
    Export(commands::export::Args),
    /// Play a clip's captions in the terminal.
    Preview(commands::preview::Args),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::new(cli.base_url);

    let result = match cli.command {
        Command::Login(args) => commands::login::run(&config, args).await,
        Command::Signup(args) => commands::signup::run(&config, args).await,
        Command::Logout => commands::logout::run(&config).await,
        Command::Whoami => commands::whoami::run(&config).await,
        Command::Plans => commands::plans::run(&config).await,
        Command::Account => commands::account::run(&config),
        Command::Upload(args) => commands::upload::run(&config, args).await,
        Command::Clips(args) => commands::clips::run(&config, args).await,
        Command::Export(args) => commands::export::run(&config, args).await,
        Command::Preview(args) => commands::preview::run(&config, args).await,
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(e.exit_code());
    }
}
