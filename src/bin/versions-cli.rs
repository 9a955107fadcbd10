use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde_json::json;

use page_versions::config::{build_catalog, load_config};
use page_versions::versions::{switcher, CatalogHandle, RequestContext, StaticRequest};

#[derive(Parser)]
#[command(name = "versions-cli")]
#[command(about = "Inspect version resolution without running the server", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "page-versions.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the configuration and list the versions
    Check,
    /// Resolve the version a request would get
    Resolve(RequestArgs),
    /// Show the version switcher for a request
    Links(RequestArgs),
}

#[derive(Args)]
struct RequestArgs {
    /// Full request URL, e.g. https://v2.example.com/page
    #[arg(short, long)]
    url: String,

    /// Stored preference value sent by the client
    #[arg(short, long)]
    preference: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_config(&cli.config)?;
    let catalogs = CatalogHandle::with_catalog(build_catalog(&config)?);
    let catalog = catalogs.catalog()?;

    let output = match cli.command {
        Commands::Check => json!({
            "addressing_mode": catalog.addressing_mode(),
            "persist_preference": catalog.persist_preference(),
            "default": catalog.default_descriptor().name,
            "versions": catalog.descriptors(),
        }),
        Commands::Resolve(args) => {
            let mut request = request(&args)?;
            let resolved = catalogs.resolve(&mut request)?;
            json!({
                "version": resolved.name,
                "source": resolved.source,
                "stored_preference": request.preference.writes() > 0,
            })
        }
        Commands::Links(args) => {
            let mut request = request(&args)?;
            let resolved = catalogs.resolve(&mut request)?;
            json!({
                "version": resolved.name,
                "switcher": switcher::entries(&catalog, &resolved, request.url())?,
            })
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn request(args: &RequestArgs) -> Result<StaticRequest, url::ParseError> {
    let request = StaticRequest::parse(&args.url)?;
    Ok(match &args.preference {
        Some(value) => request.with_preference(value.as_str()),
        None => request,
    })
}
