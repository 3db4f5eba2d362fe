//! Offline administration for the links file.
//!
//! Operates on the JSON file directly through the same alias store the servers use, so the
//! normalization, conflict, and not-found rules are identical. Do not point it at a file that a
//! running server is writing; the single-writer guarantee is per process.
use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rustylink::{
    backend::{AliasMap, JsonFileBackend},
    config::{self, Config},
    logging,
    store::{AliasApi, AliasStore, StoreSettings},
};

#[derive(Parser)]
#[command(
    name = "rustylink-cli",
    about = "Manage Rusty Link short links without the HTTP server"
)]
struct Cli {
    /// Links file; defaults to LINKS_DATA_PATH or data/link.json.
    #[arg(long, global = true)]
    data: Option<PathBuf>,
    /// Prefix for printed short URLs; defaults to PUBLIC_BASE_URL or http://localhost:3000.
    #[arg(long, global = true)]
    base_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Shorten a URL.
    Add {
        target: String,
        /// Custom code; whitespace becomes '-'.
        #[arg(long)]
        code: Option<String>,
    },
    /// Print every code and target.
    List,
    /// Print the target stored under a code.
    Get { code: String },
    /// Point an existing code at a new target.
    Update { code: String, target: String },
    /// Delete a code.
    Remove { code: String },
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();
    logging::init_cli_tracing();
    let config = Config::from_env().context("failed to load configuration")?;

    let path = cli.data.unwrap_or_else(|| config.links_data_path.clone());
    let base_url = cli.base_url.unwrap_or_else(|| {
        config.base_url_for_port(config.server_port.unwrap_or(config::DEFAULT_PORT))
    });
    let settings = StoreSettings::new(base_url)
        .with_max_generation_attempts(config.code_generation_max_attempts);
    let store = AliasStore::new(Box::new(JsonFileBackend::new(path.clone())), settings);

    let output = match cli.command {
        Command::Add { target, code } => {
            let entry = store
                .create(target, code)
                .await
                .with_context(|| format!("failed to add link in {}", path.display()))?;
            entry.short_url
        }
        Command::List => {
            let links = store
                .list()
                .await
                .with_context(|| format!("failed to read {}", path.display()))?;
            render_links(&links)
        }
        Command::Get { code } => store.get(&code).await?,
        Command::Update { code, target } => store.update(&code, target).await?.short_url,
        Command::Remove { code } => {
            store.delete(&code).await?;
            format!("Deleted {code}")
        }
    };

    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}

fn render_links(links: &AliasMap) -> String {
    let width = links.keys().map(|code| code.chars().count()).max().unwrap_or(0);
    let mut rendered = String::new();
    for (code, target) in links {
        if !rendered.is_empty() {
            rendered.push('\n');
        }
        let _ = write!(rendered, "{code:<width$}  {target}");
    }
    rendered
}
