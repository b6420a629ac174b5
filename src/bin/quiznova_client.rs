use std::{
    error::Error,
    fs::File,
    path::{Path, PathBuf},
};

use clap::Parser;
use env_logger::{Env, Target};

use quiznova_server::client::{api::DEFAULT_API_URL, tui, QuizApiClient};

#[derive(Parser, Debug)]
#[command(version, about = "Terminal client for the QuizNova quiz service", long_about = None)]
struct Args {
    /// Base URL of the quiz generation service
    #[arg(long, env = "QUIZ_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Write logs to this file; the terminal is taken over by the quiz
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;

    let api = QuizApiClient::new(args.api_url.as_str())?;
    log::info!("Using quiz service at {}", api.base_url());

    tui::run(&api, api.base_url()).await
}

/// Logging is off unless a file is given.
fn init_logging(log_file: Option<&Path>) -> std::io::Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(File::create(path)?)))
        .init();
    Ok(())
}
