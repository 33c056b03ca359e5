//! Subcommand handlers for the Specdeck CLI.

use crate::{CompareArgs, Commands, ConfigAction};
use specdeck_core::config::{CatalogConfig, SpecdeckConfig};
use specdeck_core::params::{ParamStore, ShareParams, Side};
use specdeck_core::selection::{SelectionManager, SideState};
use specdeck_core::source::{HttpSource, InMemorySource, SystemSource};
use specdeck_core::view::{self, ComparisonOutcome, ViewOptions};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Handle a CLI subcommand.
pub async fn handle_command(
    command: Commands,
    config: SpecdeckConfig,
    workspace: &Path,
) -> anyhow::Result<()> {
    match command {
        Commands::Compare(args) => handle_compare(args, &config).await,
        Commands::Systems => handle_systems(&config).await,
        Commands::Search { query, limit } => handle_search(&query, limit, &config).await,
        Commands::Config { action } => handle_config(action, &config, workspace),
    }
}

async fn handle_compare(args: CompareArgs, config: &SpecdeckConfig) -> anyhow::Result<()> {
    let source = open_source(&config.catalog).await?;

    let store = ParamStore::new(link_params(args.link.as_deref()));
    override_side(&store, Side::Left, args.left, args.left_variant);
    override_side(&store, Side::Right, args.right, args.right_variant);

    let manager = SelectionManager::new(source, Arc::new(store));
    manager.mount().await;

    let mut options = ViewOptions::from(&config.view);
    options.diff_only |= args.diff_only;
    options.show_category_headers &= !args.no_headers;

    let outcome = view::build_from(&manager, options);
    let share = manager.params().snapshot();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    match &outcome {
        ComparisonOutcome::Matrix(matrix) => print!("{}", crate::render::render_matrix(matrix)),
        ComparisonOutcome::AwaitingSelection { waiting_on } => {
            let states: Vec<(Side, SideState)> = waiting_on
                .iter()
                .map(|side| (*side, manager.state(*side)))
                .collect();
            print!("{}", crate::render::render_awaiting(&states));
        }
    }
    if !share.is_empty() {
        println!("\nShare: ?{}", share);
    }
    Ok(())
}

/// Parse a shareable link. Accepts a bare query string or a full URL.
fn link_params(link: Option<&str>) -> ShareParams {
    match link {
        Some(link) => {
            let query = link.rsplit_once('?').map_or(link, |(_, q)| q);
            ShareParams::parse(query)
        }
        None => ShareParams::new(),
    }
}

/// Apply `--a`/`--var-a` style flags on top of the link. Switching the
/// system without naming a variant drops the link's variant.
fn override_side(
    store: &ParamStore,
    side: Side,
    system: Option<String>,
    variant: Option<String>,
) {
    if system.is_none() && variant.is_none() {
        return;
    }
    store.update_side(side, |params| {
        if let Some(system) = system {
            if params.system.as_deref() != Some(system.as_str()) {
                params.variant = None;
            }
            params.system = Some(system);
        }
        if let Some(variant) = variant {
            params.variant = Some(variant);
        }
    });
}

async fn handle_systems(config: &SpecdeckConfig) -> anyhow::Result<()> {
    let source = open_source(&config.catalog).await?;
    let systems = source.list_systems().await?;
    if systems.is_empty() {
        println!("The catalog is empty.");
        return Ok(());
    }
    print!("{}", crate::render::render_systems(&systems));
    Ok(())
}

async fn handle_search(query: &str, limit: usize, config: &SpecdeckConfig) -> anyhow::Result<()> {
    let source = open_source(&config.catalog).await?;
    let systems = source.list_systems().await?;
    let matches = crate::search::fuzzy_find(&systems, query, limit);
    if matches.is_empty() {
        println!("No systems match '{}'.", query);
        return Ok(());
    }
    let found: Vec<_> = matches.into_iter().map(|m| m.summary).collect();
    print!("{}", crate::render::render_systems(&found));
    Ok(())
}

fn handle_config(
    action: ConfigAction,
    config: &SpecdeckConfig,
    workspace: &Path,
) -> anyhow::Result<()> {
    match action {
        ConfigAction::Init => {
            match specdeck_core::config::write_default_config(workspace) {
                Ok(path) => println!("Created default configuration at: {}", path.display()),
                Err(e) => println!("Configuration not written: {}", e),
            }
            Ok(())
        }
        ConfigAction::Show => {
            println!("{}", config_report(config)?);
            Ok(())
        }
    }
}

/// Effective configuration as TOML, preceded by validation warnings.
fn config_report(config: &SpecdeckConfig) -> anyhow::Result<String> {
    let mut report: String = config
        .validate()
        .iter()
        .map(|warning| format!("# warning: {}\n", warning))
        .collect();
    report.push_str(&toml::to_string_pretty(config)?);
    Ok(report)
}

/// Open the configured catalog. A base URL takes precedence over a file.
async fn open_source(config: &CatalogConfig) -> anyhow::Result<Arc<dyn SystemSource>> {
    for warning in config.validate() {
        warn!("{}", warning);
    }

    if let Some(url) = &config.base_url {
        info!(url = %url, "Using catalog service");
        let source = HttpSource::new(url, Duration::from_secs(config.timeout_secs))?;
        return Ok(Arc::new(source));
    }
    if let Some(path) = &config.path {
        let source = InMemorySource::load(path).await?;
        info!(path = %path.display(), systems = source.len(), "Loaded catalog file");
        return Ok(Arc::new(source));
    }
    anyhow::bail!(
        "No catalog configured. Pass --catalog <file> or --catalog-url <url>, \
         or set catalog.path in .specdeck/config.toml"
    )
}
