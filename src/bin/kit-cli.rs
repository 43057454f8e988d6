use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};

use map_starter_kit::config::{PathsConfig, ResolvedPaths};
use map_starter_kit::maps::{PublishClient, PublishOutcome};
use map_starter_kit::pages::{Page, PageController};
use map_starter_kit::render::{HeadScriptCache, TemplateComposer};
use map_starter_kit::secret::SecretConfigReader;

#[derive(Parser)]
#[command(name = "kit-cli")]
#[command(about = "Offline tooling for the Map Starter Kit", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a page to stdout without starting the server
    Render {
        /// Page name, e.g. index or step3-steps
        page: Page,

        #[arg(long, env = "KIT_CORE_ROOT")]
        core_root: Option<PathBuf>,
    },
    /// Show whether publishing is configured
    Status {
        #[arg(long, env = "KIT_CORE_ROOT")]
        core_root: Option<PathBuf>,
    },
    /// Ask the upload endpoint to publish the built maps
    Publish {
        #[arg(short, long, default_value = "http://localhost:3000")]
        url: String,

        #[arg(long, default_value_t = 30)]
        timeout_secs: u64,
    },
}

fn resolve(core_root: Option<PathBuf>) -> Result<ResolvedPaths, Box<dyn std::error::Error>> {
    let paths = PathsConfig {
        core_root,
        ..PathsConfig::default()
    };
    Ok(ResolvedPaths::resolve(&paths)?)
}

fn presence(value: &Option<String>) -> &'static str {
    match value {
        Some(_) => "set",
        None => "missing",
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Render { page, core_root } => {
            let paths = resolve(core_root)?;
            let controller = PageController::new(
                TemplateComposer::new(&paths.views_dir),
                Arc::new(HeadScriptCache::new(paths.head_scripts_dir())),
                Arc::new(SecretConfigReader::new(&paths.secret_file, false)),
            );
            let html = controller.render(page).await?;
            println!("{html}");
        }
        Commands::Status { core_root } => {
            let paths = resolve(core_root)?;
            let reader = SecretConfigReader::new(&paths.secret_file, false);
            println!("Secret file: {}", paths.secret_file.display());

            match reader.get_secret_config().await {
                Some(secret) => {
                    println!("MAP_STORAGE_URL:     {}", presence(&secret.map_storage_url));
                    println!("MAP_STORAGE_API_KEY: {}", presence(&secret.map_storage_api_key));
                    println!("UPLOAD_DIRECTORY:    {}", presence(&secret.upload_directory));
                    println!("Publishing configured: {}", secret.is_complete());
                }
                None => {
                    println!("Secret file not found");
                    println!("Publishing configured: false");
                }
            }
        }
        Commands::Publish { url, timeout_secs } => {
            let client = PublishClient::new(&url, Duration::from_secs(timeout_secs))?;
            match client.publish().await {
                PublishOutcome::Published { redirect } => {
                    println!("Maps published. Continue at {}{redirect}", url.trim_end_matches('/'));
                }
                PublishOutcome::Failed(message) => {
                    eprintln!("Error: {message}");
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}
