mod cli;

use clap::Parser;
use cli::Cli;
use playerseek::combobox::Combobox;
use playerseek::config::Config;
use playerseek::navigation::PlayerPageNavigator;
use playerseek::runtime::key_bindings::KeyBindings;
use playerseek::runtime::{RunOutcome, Runtime};
use playerseek::search::{
    HttpLookup, LookupExecutor, LookupService, StaticLookup, rank_candidates,
};
use playerseek::terminal::Terminal;
use playerseek::ui::Renderer;
use playerseek::{Error, Result};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Arc;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;

    let config = match cli.config.as_deref() {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    }
    .with_overrides(cli.overrides());
    config.validate()?;

    let service = build_lookup(&config)?;
    if let Some(query) = cli.query.as_deref() {
        return print_lookup(service.as_ref(), query);
    }

    let key_bindings = KeyBindings::new();
    let renderer = Renderer::new(config.max_visible).with_hints(key_bindings.hints());
    let mut runtime = Runtime::new(
        Combobox::new(config.debounce()),
        Terminal::new()?,
        LookupExecutor::new(service),
        PlayerPageNavigator::new(config.site_url.as_str()),
        renderer,
    )
    .with_key_bindings(key_bindings);

    match runtime.run()? {
        RunOutcome::Navigated(identifier) => {
            let href = runtime.navigator().destination().unwrap_or(identifier.as_str());
            println!("{}", href);
        }
        RunOutcome::Exited => {}
    }
    Ok(())
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let default_filter = if log_file.is_some() { "info" } else { "off" };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter));
    if let Some(path) = log_file {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    // Fails only when a logger is already installed; keep that one.
    let _ = builder.try_init();
    Ok(())
}

fn build_lookup(config: &Config) -> Result<Arc<dyn LookupService>> {
    if let Some(path) = config.players_file.as_deref() {
        let text = std::fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let lookup = StaticLookup::from_lines(text.as_str());
        log::info!("serving {} players from {}", lookup.len(), path.display());
        return Ok(Arc::new(lookup));
    }

    let lookup = HttpLookup::new(config.api_url.as_str(), config.lookup_timeout())
        .with_headers(config.headers.clone());
    log::info!("searching players via {}", lookup.endpoint());
    Ok(Arc::new(lookup))
}

fn print_lookup(service: &dyn LookupService, query: &str) -> Result<()> {
    let query = query.trim();
    if query.is_empty() {
        return Err(Error::InvalidConfig("--query must not be blank".to_string()));
    }
    let candidates = rank_candidates(query, service.search(query)?);
    if candidates.is_empty() {
        println!("Nothing found");
    }
    for candidate in candidates {
        println!("{}", candidate.name);
    }
    Ok(())
}
