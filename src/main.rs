use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use wanderlust::{
    EndpointClient, FormSession, GeminiClient, GenerationClient, Month, TripForm,
    WanderlustConfig, api::AppState, build_prompt, metrics::Metrics, models::catalog, telemetry,
    web,
};

#[derive(Parser)]
#[command(name = "wanderlust", version, about = "Travel itinerary generator backed by Gemini")]
struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the web server
    Serve {
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Print the prompt for a trip
    Prompt(TripArgs),
    /// Generate an itinerary and print it
    Plan {
        #[command(flatten)]
        trip: TripArgs,
        /// Use a running server instead of calling Gemini directly
        #[arg(long)]
        endpoint: Option<String>,
        /// Print the reply without cleanup
        #[arg(long)]
        raw: bool,
    },
}

#[derive(Args)]
struct TripArgs {
    /// Country or free-text destination
    #[arg(short, long, default_value = "")]
    destination: String,
    /// Trip length in days
    #[arg(long, default_value = "5", allow_hyphen_values = true)]
    days: String,
    /// Month name or "Any month"
    #[arg(short, long, default_value = "Any month")]
    month: Month,
    #[arg(long)]
    no_hotels: bool,
    #[arg(long)]
    no_restaurants: bool,
}

impl TripArgs {
    fn into_form(self) -> TripForm {
        let mut form = TripForm::default();
        if !form.select_popular(&self.destination) {
            let destination = catalog::find_country(&self.destination)
                .map_or(self.destination, str::to_string);
            form.set_destination(destination);
        }
        form.set_duration(self.days);
        form.set_month(self.month);
        form.set_include_hotels(!self.no_hotels);
        form.set_include_restaurants(!self.no_restaurants);
        form
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = WanderlustConfig::load_from_path(cli.config.clone())?;
    let _telemetry = telemetry::init(&config.logging, &config.telemetry, cli.verbose)?;

    match cli.command {
        Command::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            if config.gemini.api_key.is_none() {
                tracing::warn!("GEMINI_API_KEY is not set, generation requests will fail");
            }
            let client: Arc<dyn GenerationClient> = Arc::new(GeminiClient::new(&config.gemini)?);
            let metrics = Arc::new(Metrics::new().context("Failed to register metrics")?);
            web::run(AppState::new(client, metrics), &config.server).await
        }
        Command::Prompt(trip) => {
            println!("{}", build_prompt(&trip.into_form().parameters()));
            Ok(())
        }
        Command::Plan { trip, endpoint, raw } => {
            let session = FormSession::new(trip.into_form());
            let params = session.form.parameters();
            if params.duration_days().is_none() {
                tracing::warn!("Duration '{}' is not a positive number of days", params.duration);
            }

            let client: Box<dyn GenerationClient> = match endpoint {
                Some(url) => Box::new(EndpointClient::new(&url, config.gemini.timeout_seconds)?),
                None => Box::new(GeminiClient::new(&config.gemini)?),
            };

            let cleaned = session
                .generate(client.as_ref())
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;
            if raw {
                println!("{}", session.raw_output());
            } else {
                println!("{cleaned}");
            }
            Ok(())
        }
    }
}
