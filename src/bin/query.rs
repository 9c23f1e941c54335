// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use weaviate_query::client::{ClientConfig, QueryClient};
use weaviate_query::core::types::QuerySpec;
use weaviate_query::query::build;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Build and run Get, Aggregate and Explore queries from a JSON query spec"
)]
struct Args {
    /// Print the built document and variables instead of running the query
    #[arg(long)]
    print: bool,

    /// Path to the query spec JSON file
    spec: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "weaviate_query=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let raw = std::fs::read_to_string(&args.spec)
        .with_context(|| format!("failed to read {}", args.spec.display()))?;
    let spec: QuerySpec = serde_json::from_str(&raw)
        .with_context(|| format!("invalid query spec in {}", args.spec.display()))?;

    if args.print {
        let document = build(&spec)?;
        println!("{}", document.text);
        println!("{}", serde_json::to_string_pretty(&document.variables)?);
        return Ok(());
    }

    let config = ClientConfig::from_env()?;
    info!("Running {} query against {}", spec.kind.name(), config.graphql_url());

    let client = QueryClient::from_config(&config)?;
    let records = client.run(&spec).await?;

    info!("Received {} records", records.len());
    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}
