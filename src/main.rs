//! CLI entry point for ezdocs

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "ezdocs")]
#[command(version)]
#[command(about = "A static documentation site generator for Markdown content", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new documentation site
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Create a new document
    New {
        /// Category directory to create the document in
        #[arg(short = 'C', long, default_value = "game-developers")]
        category: String,

        /// Title of the new document
        title: String,

        /// Slug to use instead of the slugified title
        #[arg(short, long)]
        slug: Option<String>,
    },

    /// Generate static files
    #[command(alias = "g", alias = "build")]
    Generate {
        /// Watch for file changes
        #[arg(short, long)]
        watch: bool,
    },

    /// Start a local server
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Open browser automatically
        #[arg(short, long)]
        open: bool,

        /// Enable static mode (no file watching)
        #[arg(long)]
        r#static: bool,
    },

    /// Clean the public folder
    Clean,

    /// List site information
    List {
        /// Type of content to list (route, category)
        #[arg(default_value = "route")]
        r#type: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "ezdocs=debug,info"
    } else {
        "ezdocs=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to read the current directory")?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing site in {:?}", target_dir);
            ezdocs::commands::init::init_site(&target_dir)?;
            println!("Initialized documentation site in {:?}", target_dir);
        }

        Commands::New {
            category,
            title,
            slug,
        } => {
            let docs = ezdocs::Docs::new(&base_dir)?;
            let path =
                ezdocs::commands::new::create_document(&docs, &title, &category, slug.as_deref())?;
            println!("Created: {:?}", path);
        }

        Commands::Generate { watch } => {
            let docs = ezdocs::Docs::new(&base_dir)?;
            tracing::info!("Generating static files...");

            docs.generate()?;
            println!("Generated successfully!");

            if watch {
                ezdocs::commands::generate::watch(&docs)?;
            }
        }

        Commands::Server {
            port,
            ip,
            open,
            r#static,
        } => {
            let docs = ezdocs::Docs::new(&base_dir)?;
            tracing::info!("Starting server at http://{}:{}", ip, port);
            ezdocs::server::start(&docs, &ip, port, !r#static, open).await?;
        }

        Commands::Clean => {
            let docs = ezdocs::Docs::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            docs.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::List { r#type, json } => {
            let docs = ezdocs::Docs::new(&base_dir)?;
            ezdocs::commands::list::run(&docs, &r#type, json)?;
        }

        Commands::Version => {
            println!("ezdocs version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
