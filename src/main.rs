use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use tripbot::{
    ImageUpload, SectionId, SectionResponse, TripBotConfig, TripBotError, UserInput, logging, web,
};

#[derive(Debug, Parser)]
#[command(name = "tripbot", version, about = "TripBot AI: smarter planning for better journeys")]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the web interface (default)
    Serve {
        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },
    /// Ask one section from the terminal
    Ask {
        /// location-finder, trip-planner, budget-planner, transport-guide or accommodation-planner
        section: SectionId,
        #[arg(long)]
        destination: Option<String>,
        /// YYYY-MM-DD, defaults to today
        #[arg(long)]
        start_date: Option<NaiveDate>,
        /// YYYY-MM-DD, defaults to today
        #[arg(long)]
        end_date: Option<NaiveDate>,
        #[arg(long, allow_negative_numbers = true)]
        budget: Option<f64>,
        /// JPEG or PNG picture of a place
        #[arg(long)]
        image: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            match e.downcast_ref::<TripBotError>() {
                Some(err) => eprintln!("Error: {}", err.user_message()),
                None => eprintln!("Error: {e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let mut config = TripBotConfig::load_from_path(cli.config.clone())?;
    logging::init(&config.logging, cli.verbose)?;

    match cli.command.unwrap_or(Command::Serve { port: None }) {
        Command::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            web::run(config).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Ask {
            section,
            destination,
            start_date,
            end_date,
            budget,
            image,
        } => {
            let image = match image {
                Some(path) => Some(read_image(path).await?),
                None => None,
            };
            let input = UserInput {
                destination,
                start_date,
                end_date,
                budget,
                image,
            };

            let router = web::build_router(&config)?;
            let response = router.handle(section, &input).await?;
            print_response(&response);

            Ok(if response.result.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
    }
}

async fn read_image(path: PathBuf) -> Result<ImageUpload> {
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(TripBotError::from)
        .with_context(|| format!("Failed to read image {}", path.display()))?;
    let content_type = match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("png") => Some("image/png".to_string()),
        Some(ext) if ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg") => {
            Some("image/jpeg".to_string())
        }
        _ => None,
    };
    Ok(ImageUpload::new(bytes, content_type))
}

fn print_response(response: &SectionResponse) {
    println!("{}:", response.section.heading());
    println!("{}", response.result);

    if let Some(title) = response.section.links_title() {
        println!();
        println!("{title}:");
        for link in response.links {
            println!("  - {} ({})", link.label, link.url);
        }
    }
}
