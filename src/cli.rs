use clap::Parser;
use playerseek::config::ConfigOverrides;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "playerseek")]
#[command(about = "Search players as you type and jump to their page")]
#[command(version)]
pub struct Cli {
    /// YAML config file
    #[arg(long)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub api_url: Option<String>,
    #[arg(long)]
    pub site_url: Option<String>,
    /// Quiet period before a lookup is issued
    #[arg(long)]
    pub debounce_ms: Option<u64>,
    /// Newline-separated player names served instead of the HTTP API
    #[arg(long)]
    pub players_file: Option<PathBuf>,
    /// Write logs here; logging is off otherwise unless RUST_LOG is set
    #[arg(long)]
    pub log_file: Option<PathBuf>,
    /// Run a single lookup, print the ranked names and exit
    #[arg(long)]
    pub query: Option<String>,
}

impl Cli {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            api_url: self.api_url.clone(),
            site_url: self.site_url.clone(),
            debounce_ms: self.debounce_ms,
            players_file: self.players_file.clone(),
        }
    }
}
