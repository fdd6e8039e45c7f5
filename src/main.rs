use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cache;
mod cli;
mod client;
mod config;
mod connectivity;
mod context;
mod enhance;
mod extract;
mod fallback;
mod generator;
mod normalize;
mod prompts;
mod schema;
#[cfg(test)]
mod test_support;
mod util;

use cache::{CacheStore, DisabledCache, FileCache};
use cli::RootArgs;
use client::OllamaClient;
use config::{resolve_cache_dir, GeneratorConfig};
use generator::{CacheMode, Generator};
use schema::Ontology;

fn main() {
    let args = RootArgs::parse();
    init_tracing(args.verbose);

    let ontology = run(&args).unwrap_or_else(|err| {
        tracing::error!(error = %format!("{err:#}"), "ontology generation aborted");
        Ontology::unreachable(&args.domain, format!("Error: {err:#}"))
    });

    match render(&ontology, args.pretty) {
        Ok(text) => println!("{text}"),
        Err(err) => {
            tracing::error!(error = %err, "failed to serialize ontology");
            println!("{}", fallback_error_json(&args.domain, &err.to_string()));
        }
    }
}

fn run(args: &RootArgs) -> Result<Ontology> {
    let config = GeneratorConfig::resolve(args.base_url.as_deref(), args.model.as_deref())?;
    let cache: Box<dyn CacheStore> = if args.no_cache {
        Box::new(DisabledCache)
    } else {
        let dir = resolve_cache_dir(args.cache_dir.as_deref()).context("resolve cache dir")?;
        let cache = FileCache::new(dir);
        tracing::debug!(cache_dir = %cache.root().display(), "using ontology cache");
        Box::new(cache)
    };
    let cache_mode = if args.refresh {
        CacheMode::Refresh
    } else {
        CacheMode::ReadWrite
    };

    let client = OllamaClient::new(&config);
    let generator = Generator::new(&client, &*cache, &config).with_cache_mode(cache_mode);
    Ok(generator.generate_ontology(&args.domain, args.context))
}

fn render(ontology: &Ontology, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(ontology)
    } else {
        serde_json::to_string(ontology)
    }
}

fn fallback_error_json(domain: &str, error: &str) -> serde_json::Value {
    serde_json::json!({
        "domain": domain,
        "error": format!("Error: {error}"),
        "relationships": [],
    })
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
