use std::io::{self, Write};
use std::sync::Arc;

use clap::{Parser, Subcommand};

use suppression_admin::config::AppConfig;
use suppression_admin::suppression::{MAX_PAGE_SIZE, SesDirectory, SuppressionCache};

#[derive(Parser, Debug)]
#[command(
    name = "suppression_cli",
    about = "List or prune the SES account-level suppression list"
)]
struct Args {
    /// AWS region (defaults to AWS_REGION or the SDK region chain).
    #[arg(long)]
    region: Option<String>,

    /// Named AWS profile (defaults to AWS_PROFILE or the default credential chain).
    #[arg(long)]
    profile: Option<String>,

    /// Addresses requested per page, at most 1000.
    #[arg(long)]
    page_size: Option<i32>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every suppressed address, sorted case-insensitively.
    List,
    /// Remove the given addresses (matched case-insensitively).
    Remove {
        #[arg(required = true)]
        emails: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    let args = Args::parse();
    let mut config = AppConfig::from_env();
    if args.region.is_some() {
        config.ses.region = args.region;
    }
    if args.profile.is_some() {
        config.ses.profile = args.profile;
    }
    let page_size = args
        .page_size
        .unwrap_or(config.page_size)
        .clamp(1, MAX_PAGE_SIZE);

    let directory = SesDirectory::connect(&config.ses).await;
    let cache = SuppressionCache::new(Arc::new(directory), page_size);
    cache.refresh().await?;

    let mut stdout = io::stdout().lock();
    match args.command {
        Command::List => {
            for address in cache.snapshot() {
                writeln!(stdout, "{address}")?;
            }
        }
        Command::Remove { emails } => {
            let inputs: Vec<String> = emails
                .iter()
                .map(|email| email.trim().to_string())
                .filter(|email| !email.is_empty())
                .collect();
            let outcomes = cache.remove_all(&inputs).await;
            for outcome in &outcomes {
                writeln!(stdout, "{outcome}")?;
            }
            if outcomes.iter().any(|outcome| !outcome.is_removed()) {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
