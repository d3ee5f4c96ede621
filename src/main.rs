use clap::{Parser, Subcommand};
use std::io::Read;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use tracing::{info, warn, Level};
use tracing_subscriber::EnvFilter;
use zivpn_api::settings::UNKNOWN_DOMAIN;
use zivpn_api::{Config, FileSettings, ZivpnCli};

#[derive(Parser)]
#[command(name = "zivpn-api")]
#[command(about = "HTTP control-plane for the ZIVPN account CLI")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the account API
    Serve {
        /// Config file (default: search standard locations)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Override the listening port
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Generate default config file
    Init {
        #[arg(short, long, default_value = "zivpn-api.toml")]
        output: PathBuf,
    },
    /// Parse captured CLI output and print it as JSON
    ///
    /// Reads from FILE, or stdin when omitted. Useful when adapting the
    /// zivpn script's output format.
    Parse { file: Option<PathBuf> },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Set up logging, RUST_LOG overrides the verbosity flag
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Serve { config, port } => {
            let mut config = zivpn_api::config::load_config(config.as_deref())?;
            if let Some(port) = port {
                config.server.port = port;
            }

            // Keep the process away from anything worth exposing
            if let Err(e) = std::env::set_current_dir(&config.server.workdir) {
                warn!(
                    "Failed to change directory to {}: {}",
                    config.server.workdir.display(),
                    e
                );
            }

            let ip: IpAddr = config.server.bind.parse()?;
            let addr = SocketAddr::new(ip, config.server.port);
            info!("Using CLI at {}", config.cli.binary.display());

            zivpn_api::serve(
                addr,
                FileSettings::from_config(&config),
                ZivpnCli::from_config(&config.cli),
            )
            .await?;
        }
        Commands::Init { output } => {
            info!("Generating default config...");
            Config::default().save(&output)?;
            println!("Created default config: {}", output.display());
        }
        Commands::Parse { file } => {
            let raw = match file {
                Some(path) => std::fs::read_to_string(path)?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };
            let account = zivpn_api::parse_output(&raw, || UNKNOWN_DOMAIN.to_string());
            println!("{}", serde_json::to_string_pretty(&account)?);
        }
    }

    Ok(())
}
