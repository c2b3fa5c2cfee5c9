//! Adjclose CLI: export prior-day or five-year adjusted closes and deliver them.
//!
//! Commands:
//! - `daily`: one row per ticker for the most recent completed trading day
//! - `history`: five-year date × ticker matrix
//!
//! Both take `--deliver local|cloud|email`. Secrets come from the environment
//! and are checked before anything is fetched:
//! - cloud: `AZURE_TENANT_ID`, `AZURE_CLIENT_ID`, `AZURE_CLIENT_SECRET`
//! - email: `EMAIL_PASSWORD`

use std::path::PathBuf;

use adjclose_core::data::{StdoutProgress, YahooProvider};
use adjclose_core::domain::TickerList;
use adjclose_core::TodayPolicy;
use adjclose_runner::config::DEFAULT_FILE_PREFIX;
use adjclose_runner::{
    build_delivery, run_pipeline, DeliveryTarget, DriveOwner, EmailSettings, GraphCredentials,
    RunConfig, RunMode, RunOutcome,
};
use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "adjclose",
    about = "Adjclose CLI: adjusted closing prices to a spreadsheet, delivered"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export adjusted closes for the most recent completed trading day.
    Daily {
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Export five years of adjusted closes as a date × ticker matrix.
    History {
        #[command(flatten)]
        common: CommonArgs,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum DeliverKind {
    Local,
    Cloud,
    Email,
}

#[derive(Args)]
struct CommonArgs {
    /// Comma separated tickers. Defaults to the built-in list.
    #[arg(long)]
    tickers: Option<String>,

    /// Use the UTC date as "today" instead of the local date.
    #[arg(long, default_value_t = false)]
    utc: bool,

    /// Directory the spreadsheet is written to. Defaults to ./output.
    #[arg(long, default_value = "output")]
    output_dir: PathBuf,

    /// File name prefix.
    #[arg(long, default_value = DEFAULT_FILE_PREFIX)]
    prefix: String,

    /// Delivery target.
    #[arg(long, value_enum, default_value = "local")]
    deliver: DeliverKind,

    /// Local delivery folder (may be a mapped share). Defaults to --output-dir.
    #[arg(long)]
    folder: Option<PathBuf>,

    /// OneDrive owner UPN for cloud delivery. Omit to upload to the token owner's drive.
    #[arg(long)]
    drive_user: Option<String>,

    /// OneDrive folder for cloud delivery, relative to the drive root.
    #[arg(long, default_value = "Adjusted Close Tickers")]
    drive_folder: String,

    /// Sender address (also the SMTP login) for email delivery.
    #[arg(long)]
    email_from: Option<String>,

    /// Recipient address for email delivery. Repeat for several.
    #[arg(long)]
    email_to: Vec<String>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let (mode, common) = match cli.command {
        Commands::Daily { common } => (RunMode::Daily, common),
        Commands::History { common } => (RunMode::Historical, common),
    };

    let config = build_config(mode, common)?;
    run(&config)
}

/// Assemble the run configuration; every required secret is read here.
fn build_config(mode: RunMode, args: CommonArgs) -> Result<RunConfig> {
    let tickers = match args.tickers.as_deref() {
        Some(list) => TickerList::parse_csv(list)?,
        None => TickerList::default_list(),
    };

    let delivery = match args.deliver {
        DeliverKind::Local => DeliveryTarget::Local {
            folder: args.folder.unwrap_or_else(|| args.output_dir.clone()),
        },
        DeliverKind::Cloud => DeliveryTarget::Cloud {
            credentials: GraphCredentials::from_env()?,
            owner: args.drive_user.map_or(DriveOwner::Me, DriveOwner::User),
            folder: args.drive_folder,
        },
        DeliverKind::Email => {
            let Some(from) = args.email_from else {
                bail!("--email-from is required with --deliver email");
            };
            let to = if args.email_to.is_empty() {
                vec![from.clone()]
            } else {
                args.email_to
            };
            DeliveryTarget::Email(EmailSettings::from_lookup(from, to, |key| {
                std::env::var(key).ok()
            })?)
        }
    };

    let config = RunConfig {
        mode,
        tickers,
        today_policy: if args.utc {
            TodayPolicy::Utc
        } else {
            TodayPolicy::Local
        },
        output_dir: args.output_dir,
        file_prefix: args.prefix,
        delivery,
    };
    config.validate()?;
    Ok(config)
}

fn run(config: &RunConfig) -> Result<()> {
    let provider = YahooProvider::new()?;
    let delivery = build_delivery(&config.delivery)?;
    let progress = StdoutProgress;
    let today = config.today_policy.today();
    log::info!(
        "{:?} run: {} tickers, {} delivery, today = {today}",
        config.mode,
        config.tickers.len(),
        config.delivery.kind()
    );

    let outcome = run_pipeline(config, &provider, delivery.as_ref(), &progress, today)?;
    print_summary(config, &outcome);
    Ok(())
}

fn print_summary(config: &RunConfig, outcome: &RunOutcome) {
    println!();
    println!("=== Adjusted Close Export ===");
    println!("Date:           {}", outcome.content_date);
    println!("Tickers:        {}", outcome.tickers);
    println!("Fetch failures: {}", outcome.failed_fetches);
    match config.mode {
        RunMode::Daily => println!("Missing values: {}", outcome.missing_values),
        RunMode::Historical => println!("Empty columns:  {}", outcome.missing_values),
    }
    println!("Delivery:       {}", config.delivery.kind());
    println!();
    println!("Saved file to: {}", outcome.artifact.display());
    println!("Delivered to:  {}", outcome.receipt.location);
}
