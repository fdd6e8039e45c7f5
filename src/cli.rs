//! CLI argument parsing.
//!
//! One invocation generates one ontology and prints it as JSON on stdout.
//! Logs go to stderr so the output can be piped directly.
use crate::config::DEFAULT_NUM_CTX;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "ontogen",
    version,
    about = "Generate a connected domain ontology with a local LM",
    after_help = "Environment:\n  ONTOGEN_BASE_URL   Generation service URL (default http://localhost:11434)\n  ONTOGEN_MODEL      Model name (default llama3.2)\n  ONTOGEN_CACHE_DIR  Cache directory (default <user cache dir>/ontogen)\n  RUST_LOG           Log filter, overrides -v\n\nExamples:\n  ontogen music\n  ontogen \"software engineering\" --context 8192 --pretty\n  ontogen chemistry --refresh -v"
)]
pub struct RootArgs {
    /// Domain to build an ontology for
    pub domain: String,

    /// Context window size for the generation request
    #[arg(short = 'c', long = "context", value_name = "N", default_value_t = DEFAULT_NUM_CTX)]
    pub context: u32,

    /// Model name to request from the generation service
    #[arg(long, value_name = "NAME")]
    pub model: Option<String>,

    /// Base URL of the generation service
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Directory holding cached ontologies
    #[arg(long, value_name = "DIR", conflicts_with = "no_cache")]
    pub cache_dir: Option<PathBuf>,

    /// Neither read nor write the cache
    #[arg(long)]
    pub no_cache: bool,

    /// Ignore any cached document but store the new one
    #[arg(long, conflicts_with = "no_cache")]
    pub refresh: bool,

    /// Pretty-print the JSON document
    #[arg(long)]
    pub pretty: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
