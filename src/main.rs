use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vsd_hotspots::ai::OpenAiChatClient;
use vsd_hotspots::generator::HotspotGenerator;
use vsd_hotspots::image::UploadStore;
use vsd_hotspots::models::Config;
use vsd_hotspots::server::{self, AppState};

#[derive(Debug, Parser)]
#[command(name = "vsd-hotspots")]
#[command(about = "Suggest communication hotspots for visual scene displays")]
struct CliArgs {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP API (default).
    Serve,
    /// Generate hotspots for a local image and print them as JSON.
    Generate {
        #[arg(value_name = "IMAGE")]
        image: PathBuf,
    },
}

fn build_generator(config: &Config) -> Result<HotspotGenerator> {
    let chat = OpenAiChatClient::new(
        config.openai_api_key.expose().to_string(),
        config.request_timeout,
    )?
    .with_base_url(config.openai_base_url.clone());

    info!(
        "Chat provider: OpenAI (model: {}, max_tokens: {})",
        config.model, config.max_tokens
    );
    Ok(HotspotGenerator::new(Arc::new(chat), config.request_config()))
}

async fn run(command: Command, config: Config) -> Result<()> {
    let generator = build_generator(&config)?;

    match command {
        Command::Serve => {
            let listen = format!("{}:{}", config.host, config.port);
            let addr: SocketAddr = listen
                .parse()
                .with_context(|| format!("Invalid listen address {}", listen))?;

            let state = AppState {
                generator: Arc::new(generator),
                uploads: Arc::new(UploadStore::new(&config.upload_dir)?),
                vsd_path: config.vsd_path.clone(),
                max_upload_bytes: config.max_upload_bytes,
            };
            server::serve(addr, state).await?;
        }
        Command::Generate { image } => {
            let hotspots = generator.generate_hotspots(&image).await?;
            println!("{}", serde_json::to_string_pretty(&hotspots)?);
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vsd_hotspots=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(args.command.unwrap_or(Command::Serve), config).await {
        error!("Command failed: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
